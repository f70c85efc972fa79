// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Beta Law** - *Density, CDF, Quantile and a Five-way Variate Generator*
//!
//! The sampler splits the parameter plane the way each method is most efficient:
//!
//! | region | method |
//! |---|---|
//! | a = b = 1 | uniform |
//! | a = 1 or b = 1 | inversion of the power-law CDF |
//! | a + b ≤ 1 | Jöhnk, accepted in log space |
//! | min(a, b) > 1 | Cheng's BB |
//! | otherwise, max(a, b) < 1 | Atkinson-Whittaker switching, both exponents below one |
//! | otherwise | Atkinson-Whittaker switching, one exponent above one |

use rand::Rng;

use super::{check_positive, check_probability, select_tail};
use crate::config::NumericalConfig;
use crate::errors::KernelError;
use crate::kernels::scientific::distributions::dcdflib::cdf::{BetaQuery, cdf_beta};
use crate::kernels::scientific::distributions::dcdflib::settle;
use crate::kernels::scientific::distributions::shared::sampler::open_uniform;
use crate::kernels::scientific::special::beta::{beta_ratio_inc_pair_with, ln_beta};

const LN_4: f64 = 1.386_294_361_119_890_6;
/// 1 + ln 5
const ONE_PLUS_LN_5: f64 = 2.609_437_912_434_100_3;

fn check_shapes(fname: &str, a: f64, b: f64) -> Result<(), KernelError> {
    check_positive(fname, "a", a)?;
    check_positive(fname, "b", b)
}

/// Density x^(a-1) (1-x)^(b-1) / B(a, b) on [0, 1].
pub fn d_beta(a: f64, b: f64, x: f64) -> Result<f64, KernelError> {
    check_shapes("d_beta", a, b)?;
    if !(0.0..=1.0).contains(&x) {
        return Ok(0.0);
    }
    // endpoint limits: the density at 0 is governed by a, at 1 by b
    let edge = |shape: f64, other: f64| {
        if shape < 1.0 {
            f64::INFINITY
        } else if shape == 1.0 {
            // 1 / B(1, other)
            other
        } else {
            0.0
        }
    };
    if x == 0.0 {
        return Ok(edge(a, b));
    }
    if x == 1.0 {
        return Ok(edge(b, a));
    }
    Ok(((a - 1.0) * x.ln() + (b - 1.0) * (-x).ln_1p() - ln_beta(a, b)).exp())
}

/// I_x(a, b), or 1 - I_x(a, b) when `tail` is set.
pub fn p_beta(a: f64, b: f64, x: f64, tail: bool) -> Result<f64, KernelError> {
    check_shapes("p_beta", a, b)?;
    let pair = beta_ratio_inc_pair_with(a, b, x, &NumericalConfig::DEFAULT.spec_func)?;
    Ok(select_tail(pair, tail))
}

/// The x with I_x(a, b) = p (or 1 - I_x(a, b) = p when `tail` is set).
pub fn q_beta(a: f64, b: f64, p: f64, tail: bool) -> Result<f64, KernelError> {
    check_shapes("q_beta", a, b)?;
    check_probability("q_beta", p)?;
    let (lower, upper) = if tail { (0.5 - p + 0.5, p) } else { (p, 0.5 - p + 0.5) };
    if lower == 0.0 {
        return Ok(0.0);
    }
    if upper == 0.0 {
        return Ok(1.0);
    }
    settle(
        "q_beta",
        cdf_beta(BetaQuery::Argument { p: lower, q: upper, a, b }).map(|pt| pt.x),
    )
}

/// One Beta(a, b) variate.
pub fn r_beta<R: Rng + ?Sized>(rng: &mut R, a: f64, b: f64) -> Result<f64, KernelError> {
    check_shapes("r_beta", a, b)?;
    if a == 1.0 && b == 1.0 {
        return Ok(rng.random::<f64>());
    }
    if b == 1.0 {
        return Ok(open_uniform(rng).powf(1.0 / a));
    }
    if a == 1.0 {
        return Ok(1.0 - open_uniform(rng).powf(1.0 / b));
    }
    if a + b <= 1.0 {
        return Ok(johnk(rng, a, b));
    }
    // the remaining generators sample with the smaller shape first
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if lo > 1.0 {
        return Ok(cheng_bb(rng, a, b));
    }
    let x = if hi < 1.0 {
        atkinson_whittaker_both_below(rng, lo, hi)
    } else {
        atkinson_whittaker_one_above(rng, lo, hi)
    };
    Ok(if a == lo { x } else { 1.0 - x })
}

/// Jöhnk: X = U^(1/a), Y = V^(1/b), accept X + Y ≤ 1, return X / (X + Y).
/// Carried out on logarithms so very small shapes do not underflow.
fn johnk<R: Rng + ?Sized>(rng: &mut R, a: f64, b: f64) -> f64 {
    loop {
        let lx = open_uniform(rng).ln() / a;
        let ly = open_uniform(rng).ln() / b;
        let lm = lx.max(ly);
        let ls = lm + ((lx - lm).exp() + (ly - lm).exp()).ln();
        if ls <= 0.0 {
            return (lx - ls).exp();
        }
    }
}

/// Cheng (1978) algorithm BB, both shapes above one.
fn cheng_bb<R: Rng + ?Sized>(rng: &mut R, a: f64, b: f64) -> f64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let alpha = lo + hi;
    let beta = ((alpha - 2.0) / (2.0 * lo * hi - alpha)).sqrt();
    let gamma = lo + 1.0 / beta;
    let w = loop {
        let u1 = open_uniform(rng);
        let u2 = open_uniform(rng);
        let v = beta * (u1 / (1.0 - u1)).ln();
        let w = lo * v.exp();
        let z = u1 * u1 * u2;
        let r = gamma * v - LN_4;
        let s = lo + r - w;
        if s + ONE_PLUS_LN_5 >= 5.0 * z {
            break w;
        }
        let t = z.ln();
        if s > t || r + alpha * (alpha / (hi + w)).ln() >= t {
            break w;
        }
    };
    if a == lo { w / (hi + w) } else { hi / (hi + w) }
}

/// Atkinson-Whittaker with a < 1 and b < 1: envelope x^(a-1) (1-t)^(b-1) left
/// of the switch point t, t^(a-1) (1-x)^(b-1) right of it.
fn atkinson_whittaker_both_below<R: Rng + ?Sized>(rng: &mut R, a: f64, b: f64) -> f64 {
    let t = 1.0 / (1.0 + (b * (1.0 - b) / (a * (1.0 - a))).sqrt());
    let p = b * t / (b * t + a * (1.0 - t));
    loop {
        let u = rng.random::<f64>();
        let e = -open_uniform(rng).ln();
        if u <= p {
            let x = t * (u / p).powf(1.0 / a);
            if e >= (1.0 - b) * ((1.0 - x) / (1.0 - t)).ln() {
                return x;
            }
        } else {
            let x = 1.0 - (1.0 - t) * ((1.0 - u) / (1.0 - p)).powf(1.0 / b);
            if e >= (1.0 - a) * (x / t).ln() {
                return x;
            }
        }
    }
}

/// Atkinson-Whittaker with a ≤ 1 < b: envelope x^(a-1) left of t,
/// t^(a-1) (1-x)^(b-1) right of it.
fn atkinson_whittaker_one_above<R: Rng + ?Sized>(rng: &mut R, a: f64, b: f64) -> f64 {
    let t = (1.0 - a) / (b + 1.0 - a);
    let p = b * t / (b * t + a * (1.0 - t).powf(b));
    loop {
        let u = rng.random::<f64>();
        let e = -open_uniform(rng).ln();
        if u <= p {
            let x = t * (u / p).powf(1.0 / a);
            if e >= -(b - 1.0) * (-x).ln_1p() {
                return x;
            }
        } else {
            let x = 1.0 - (1.0 - t) * ((1.0 - u) / (1.0 - p)).powf(1.0 / b);
            if e >= (1.0 - a) * (x / t).ln() {
                return x;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::scientific::distributions::shared::sampler::RandomGenerator;

    fn rel(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn density() {
        // 12 x (1-x)² at x = 0.4
        assert!(rel(d_beta(2.0, 3.0, 0.4).unwrap(), 1.728) < 1e-14);
        assert_eq!(d_beta(1.0, 3.0, 0.0).unwrap(), 3.0);
        assert_eq!(d_beta(0.5, 3.0, 0.0).unwrap(), f64::INFINITY);
        assert_eq!(d_beta(2.0, 3.0, 1.0).unwrap(), 0.0);
        assert_eq!(d_beta(2.0, 3.0, 1.5).unwrap(), 0.0);
        assert!(d_beta(-1.0, 3.0, 0.5).is_err());
    }

    #[test]
    fn cdf_and_tail() {
        // mpmath.betainc(regularized=True)
        assert!(rel(p_beta(2.0, 3.0, 0.4, false).unwrap(), 0.5248) < 1e-14);
        assert!(rel(p_beta(2.0, 3.0, 0.4, true).unwrap(), 0.4752) < 1e-14);
        assert!(rel(p_beta(0.5, 0.5, 0.1, false).unwrap(), 0.20483276469913346) < 1e-13);
        assert!(rel(p_beta(50.0, 60.0, 0.7, true).unwrap(), 4.6942004131388914e-8) < 1e-11);
        assert_eq!(p_beta(2.0, 3.0, -0.1, false).unwrap(), 0.0);
        assert_eq!(p_beta(2.0, 3.0, 1.1, true).unwrap(), 0.0);
    }

    #[test]
    fn quantile_round_trip() {
        for &(a, b) in &[(0.5, 0.5), (2.0, 3.0), (0.3, 6.0), (40.0, 2.0)] {
            for &x in &[0.01, 0.2, 0.55, 0.93] {
                let p = p_beta(a, b, x, false).unwrap();
                let q = p_beta(a, b, x, true).unwrap();
                // a tail that rounds to 1 carries no information about x
                if p < 1.0 - f64::EPSILON {
                    assert!(rel(q_beta(a, b, p, false).unwrap(), x) < 1e-9, "a={} b={} x={}", a, b, x);
                }
                if q < 1.0 - f64::EPSILON {
                    assert!(rel(q_beta(a, b, q, true).unwrap(), x) < 1e-9, "a={} b={} x={}", a, b, x);
                }
            }
        }
        assert_eq!(q_beta(2.0, 3.0, 0.0, false).unwrap(), 0.0);
        assert_eq!(q_beta(2.0, 3.0, 0.0, true).unwrap(), 1.0);
    }

    #[test]
    fn every_sampler_branch_hits_its_moments() {
        let mut rng = RandomGenerator::from_seed(3);
        let n = 100_000;
        for &(a, b) in &[
            (1.0, 1.0),
            (2.0, 1.0),
            (1.0, 3.0),
            (0.3, 0.4),
            (0.02, 0.01),
            (2.5, 4.0),
            (7.0, 1.5),
            (0.6, 0.7),
            (0.5, 3.0),
            (3.0, 0.5),
        ] {
            let xs: Vec<f64> = (0..n).map(|_| r_beta(&mut rng, a, b).unwrap()).collect();
            assert!(xs.iter().all(|x| (0.0..=1.0).contains(x)));
            let mean = xs.iter().sum::<f64>() / n as f64;
            let var = a * b / ((a + b) * (a + b) * (a + b + 1.0));
            let want = a / (a + b);
            assert!(
                (mean - want).abs() < 5.0 * (var / n as f64).sqrt(),
                "a={} b={} mean={}",
                a,
                b,
                mean
            );
        }
    }
}
