// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! Poisson law with mean `lambda`.
//!
//! The CDF is the upper regularised gamma ratio, P(X ≤ k) = Q(k + 1, λ).
//! Variates come from sequential inversion below λ = 10 and from Hörmann's
//! PTRS transformed rejection above.

use log::debug;
use rand::Rng;

use super::{check_non_negative, check_probability, select_tail};
use crate::config::NumericalConfig;
use crate::errors::KernelError;
use crate::kernels::scientific::distributions::dcdflib::cdf::{PoissonQuery, cdf_poisson};
use crate::kernels::scientific::special::gamma::{gamma_ratio_inc_pair_with, ln_gamma};

const INVERSION_MEAN_LIMIT: f64 = 10.0;
/// Search cap for the inversion sampler before it restarts on a fresh uniform.
const INVERSION_RESTART: u64 = 1000;

/// P(X = k).
pub fn d_poisson(lambda: f64, k: u64) -> Result<f64, KernelError> {
    check_non_negative("d_poisson", "lambda", lambda)?;
    if lambda == 0.0 {
        return Ok(if k == 0 { 1.0 } else { 0.0 });
    }
    let kf = k as f64;
    Ok((kf * lambda.ln() - lambda - ln_gamma(kf + 1.0)).exp())
}

fn cdf_pair(lambda: f64, k: u64) -> Result<(f64, f64), KernelError> {
    if lambda == 0.0 {
        return Ok((1.0, 0.0));
    }
    let (lower, upper) =
        gamma_ratio_inc_pair_with(k as f64 + 1.0, lambda, &NumericalConfig::DEFAULT.spec_func)?;
    Ok((upper, lower))
}

/// P(X ≤ k), or P(X > k) when `tail` is set.
pub fn p_poisson(lambda: f64, k: u64, tail: bool) -> Result<f64, KernelError> {
    check_non_negative("p_poisson", "lambda", lambda)?;
    Ok(select_tail(cdf_pair(lambda, k)?, tail))
}

/// Smallest k with P(X ≤ k) ≥ p, or with P(X > k) ≤ p when `tail` is set.
///
/// Returned as `f64` so the unbounded case (p = 1, or p = 0 with `tail`)
/// can be reported as `+∞`.
pub fn q_poisson(lambda: f64, p: f64, tail: bool) -> Result<f64, KernelError> {
    check_non_negative("q_poisson", "lambda", lambda)?;
    check_probability("q_poisson", p)?;
    let (lower, upper) = if tail { (0.5 - p + 0.5, p) } else { (p, 0.5 - p + 0.5) };
    if upper == 0.0 && lambda > 0.0 {
        return Ok(f64::INFINITY);
    }
    let reached = |k: u64| -> Result<bool, KernelError> {
        let (cdf, ccdf) = cdf_pair(lambda, k)?;
        Ok(if tail { ccdf <= upper } else { cdf >= lower })
    };
    if reached(0)? {
        return Ok(0.0);
    }

    // continuous inversion lands within a step or two of the answer
    let seed = match cdf_poisson(PoissonQuery::Count { p: lower, q: upper, lambda }) {
        Ok(pt) => pt.s.ceil(),
        Err(e) => {
            debug!("q_poisson: continuous seed failed ({}), starting from the mean", e);
            lambda.floor()
        }
    };
    let mut k = if seed.is_finite() && seed > 0.0 { seed as u64 } else { 1 };
    while k > 0 && reached(k - 1)? {
        k -= 1;
    }
    while !reached(k)? {
        k += 1;
    }
    Ok(k as f64)
}

/// One Poisson(λ) variate.
pub fn r_poisson<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> Result<u64, KernelError> {
    check_non_negative("r_poisson", "lambda", lambda)?;
    if lambda == 0.0 {
        return Ok(0);
    }
    Ok(if lambda < INVERSION_MEAN_LIMIT {
        poisson_inversion(rng, lambda)
    } else {
        ptrs(rng, lambda)
    })
}

fn poisson_inversion<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> u64 {
    let p0 = (-lambda).exp();
    'restart: loop {
        let mut u = rng.random::<f64>();
        let mut p = p0;
        let mut k = 0u64;
        while u > p {
            u -= p;
            k += 1;
            if k > INVERSION_RESTART {
                continue 'restart;
            }
            p *= lambda / k as f64;
        }
        return k;
    }
}

/// Hörmann (1993), transformed rejection with squeeze, for λ ≥ 10.
fn ptrs<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> u64 {
    let slam = lambda.sqrt();
    let log_lam = lambda.ln();
    let b = 0.931 + 2.53 * slam;
    let a = -0.059 + 0.02483 * b;
    let inv_alpha = 1.1239 + 1.1328 / (b - 3.4);
    let v_r = 0.9277 - 3.6224 / (b - 2.0);
    loop {
        let u = rng.random::<f64>() - 0.5;
        let v = rng.random::<f64>();
        let us = 0.5 - u.abs();
        let k = ((2.0 * a / us + b) * u + lambda + 0.43).floor();
        if us >= 0.07 && v <= v_r {
            return k as u64;
        }
        if k < 0.0 || (us < 0.013 && v > us) {
            continue;
        }
        if v.ln() + inv_alpha.ln() - (a / (us * us) + b).ln()
            <= -lambda + k * log_lam - ln_gamma(k + 1.0)
        {
            return k as u64;
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
    fn mass_and_cdf() {
        // mpmath
        assert!(rel(d_poisson(4.0, 3).unwrap(), 0.19536681481316459) < 1e-13);
        assert!(rel(p_poisson(4.0, 3, false).unwrap(), 0.43347012036670893) < 1e-13);
        assert!(rel(p_poisson(2.5, 11, true).unwrap(), 1.2598459103199901e-5) < 1e-11);
        assert_eq!(d_poisson(0.0, 0).unwrap(), 1.0);
        assert_eq!(p_poisson(0.0, 3, true).unwrap(), 0.0);
        assert!(d_poisson(-1.0, 0).is_err());
    }

    #[test]
    fn quantile_is_smallest_count_reaching_target() {
        assert_eq!(q_poisson(4.0, 0.4334, false).unwrap(), 3.0);
        assert_eq!(q_poisson(4.0, 0.4335, false).unwrap(), 4.0);
        assert_eq!(q_poisson(2.5, 1.26e-5, true).unwrap(), 11.0);
        assert_eq!(q_poisson(2.5, 1.25e-5, true).unwrap(), 12.0);
        for &lambda in &[0.3, 4.0, 37.5] {
            for k in 0..60u64 {
                let p = p_poisson(lambda, k, false).unwrap();
                if p < 1.0 - 1e-10 {
                    assert_eq!(q_poisson(lambda, p, false).unwrap(), k as f64, "lambda={} k={}", lambda, k);
                }
            }
        }
    }

    #[test]
    fn quantile_edges() {
        assert_eq!(q_poisson(4.0, 0.0, false).unwrap(), 0.0);
        assert_eq!(q_poisson(4.0, 1.0, false).unwrap(), f64::INFINITY);
        assert_eq!(q_poisson(4.0, 0.0, true).unwrap(), f64::INFINITY);
        assert_eq!(q_poisson(4.0, 1.0, true).unwrap(), 0.0);
        assert_eq!(q_poisson(0.0, 0.7, false).unwrap(), 0.0);
        assert!(q_poisson(4.0, -0.1, false).is_err());
    }

    #[test]
    fn sample_moments_both_regimes() {
        let mut rng = RandomGenerator::from_seed(4);
        let n = 100_000;
        for &lambda in &[0.5, 4.0, 9.9, 10.0, 37.0, 1000.0] {
            let xs: Vec<f64> = (0..n).map(|_| r_poisson(&mut rng, lambda).unwrap() as f64).collect();
            let mean = xs.iter().sum::<f64>() / n as f64;
            let var = xs.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n as f64 - 1.0);
            assert!((mean - lambda).abs() < 5.0 * (lambda / n as f64).sqrt(), "lambda={}", lambda);
            assert!((var / lambda - 1.0).abs() < 0.04, "lambda={} var={}", lambda, var);
        }
        assert_eq!(r_poisson(&mut rng, 0.0).unwrap(), 0);
    }
}
