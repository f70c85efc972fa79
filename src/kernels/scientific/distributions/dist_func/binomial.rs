// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Binomial Law** - *Mass, CDF and Variates for n Trials of Probability p*
//!
//! Variates are generated on the side p ≤ ½ and mirrored. When the mean `n·p`
//! is at most 15 the CDF is inverted by sequential search from zero; above that
//! Hörmann's BTRD ratio-of-uniforms rejection with squeeze is used, closing out
//! with the Stirling remainder `fc(k)` (tabulated for k < 10).

use log::debug;
use rand::Rng;

use super::{check_probability, select_tail};
use crate::errors::KernelError;
use crate::kernels::scientific::distributions::dcdflib::cdf::{BinomialQuery, cdf_binomial};
use crate::kernels::scientific::distributions::shared::constants::STIRLING_CORRECTION;
use crate::kernels::scientific::distributions::shared::scalar::ln_choose;

/// Mean below which the sampler inverts the CDF.
const INVERSION_MEAN_LIMIT: f64 = 15.0;
/// Distance from the mode up to which BTRD evaluates the mass ratio recursively.
const RECURSION_LIMIT: u64 = 15;

/// P(X = k).
pub fn d_binomial(n: u64, p: f64, k: u64) -> Result<f64, KernelError> {
    check_probability("d_binomial", p)?;
    if k > n {
        return Ok(0.0);
    }
    if p == 0.0 {
        return Ok(if k == 0 { 1.0 } else { 0.0 });
    }
    if p == 1.0 {
        return Ok(if k == n { 1.0 } else { 0.0 });
    }
    let (kf, nf) = (k as f64, n as f64);
    Ok((ln_choose(n, k) + kf * p.ln() + (nf - kf) * (-p).ln_1p()).exp())
}

/// P(X ≤ k), or P(X > k) when `tail` is set.
pub fn p_binomial(n: u64, p: f64, k: u64, tail: bool) -> Result<f64, KernelError> {
    check_probability("p_binomial", p)?;
    let pair = if k >= n || p == 0.0 {
        (1.0, 0.0)
    } else if p == 1.0 {
        (0.0, 1.0)
    } else {
        let pt = cdf_binomial(BinomialQuery::Probability {
            s: k as f64,
            xn: n as f64,
            pr: p,
            ompr: 0.5 - p + 0.5,
        })?;
        (pt.p, pt.q)
    };
    Ok(select_tail(pair, tail))
}

/// Smallest k with P(X ≤ k) ≥ prob, or with P(X > k) ≤ prob when `tail` is set.
pub fn q_binomial(n: u64, p: f64, prob: f64, tail: bool) -> Result<u64, KernelError> {
    check_probability("q_binomial", p)?;
    check_probability("q_binomial", prob)?;
    let (lower, upper) = if tail { (0.5 - prob + 0.5, prob) } else { (prob, 0.5 - prob + 0.5) };
    let reached = |k: u64| -> Result<bool, KernelError> {
        if k >= n {
            return Ok(true);
        }
        let cdf = p_binomial(n, p, k, false)?;
        let ccdf = p_binomial(n, p, k, true)?;
        Ok(if tail { ccdf <= upper } else { cdf >= lower })
    };
    if reached(0)? {
        return Ok(0);
    }

    // continuous inversion lands within a step or two of the answer
    let seed = match cdf_binomial(BinomialQuery::Successes {
        p: lower,
        q: upper,
        xn: n as f64,
        pr: p,
        ompr: 0.5 - p + 0.5,
    }) {
        Ok(pt) => pt.s.ceil(),
        Err(e) => {
            debug!("q_binomial: continuous seed failed ({}), starting from the mean", e);
            (n as f64 * p).floor()
        }
    };
    let mut k = if seed.is_finite() && seed > 0.0 { (seed as u64).min(n) } else { 1 };
    while k > 0 && reached(k - 1)? {
        k -= 1;
    }
    while !reached(k)? {
        k += 1;
    }
    Ok(k)
}

/// One Binomial(n, p) variate.
pub fn r_binomial<R: Rng + ?Sized>(rng: &mut R, n: u64, p: f64) -> Result<u64, KernelError> {
    check_probability("r_binomial", p)?;
    if p == 0.0 || n == 0 {
        return Ok(0);
    }
    if p == 1.0 {
        return Ok(n);
    }
    let (pp, mirrored) = if p > 0.5 { (1.0 - p, true) } else { (p, false) };
    let x = if n as f64 * pp <= INVERSION_MEAN_LIMIT {
        binomial_inversion(rng, n, pp)
    } else {
        btrd(rng, n, pp)
    };
    Ok(if mirrored { n - x } else { x })
}

/// Stirling remainder fc(k) = ln k! - (k + ½) ln(k + 1) + (k + 1) - ½ ln 2π.
#[inline]
pub(crate) fn stirling_correction(k: u64) -> f64 {
    if let Some(&c) = STIRLING_CORRECTION.get(k as usize) {
        return c;
    }
    let r = 1.0 / (k as f64 + 1.0);
    let r2 = r * r;
    (1.0 / 12.0 - (1.0 / 360.0 - r2 / 1260.0) * r2) * r
}

fn binomial_inversion<R: Rng + ?Sized>(rng: &mut R, n: u64, p: f64) -> u64 {
    let q = 1.0 - p;
    let s = p / q;
    let a = (n as f64 + 1.0) * s;
    let p0 = q.powf(n as f64);
    'restart: loop {
        let mut u = rng.random::<f64>();
        let mut r = p0;
        let mut x = 0u64;
        while u > r {
            u -= r;
            x += 1;
            if x > n {
                // rounding left u above the total mass
                continue 'restart;
            }
            r *= a / x as f64 - s;
        }
        return x;
    }
}

/// Hörmann (1993), algorithm BTRD, for p ≤ ½ and n·p > 15.
fn btrd<R: Rng + ?Sized>(rng: &mut R, n: u64, p: f64) -> u64 {
    let nf = n as f64;
    let q = 1.0 - p;
    let m = ((nf + 1.0) * p).floor();
    let r = p / q;
    let nr = (nf + 1.0) * r;
    let npq = nf * p * q;
    let spq = npq.sqrt();
    let b = 1.15 + 2.53 * spq;
    let a = -0.0873 + 0.0248 * b + 0.01 * p;
    let c = nf * p + 0.5;
    let alpha = (2.83 + 5.1 / b) * spq;
    let v_r = 0.92 - 4.2 / b;
    let u_rv_r = 0.86 * v_r;
    let mi = m as u64;

    loop {
        let mut v = rng.random::<f64>();
        if v <= u_rv_r {
            let u = v / v_r - 0.43;
            return ((2.0 * a / (0.5 - u.abs()) + b) * u + c).floor() as u64;
        }
        let u = if v >= v_r {
            rng.random::<f64>() - 0.5
        } else {
            let u = v / v_r - 0.93;
            v = rng.random::<f64>() * v_r;
            0.5f64.copysign(u) - u
        };

        let us = 0.5 - u.abs();
        let kf = ((2.0 * a / us + b) * u + c).floor();
        if kf < 0.0 || kf > nf {
            continue;
        }
        let k = kf as u64;
        v *= alpha / (a / (us * us) + b);
        let km = k.abs_diff(mi);

        if km <= RECURSION_LIMIT {
            // f(k) / f(m) by the ratio recurrence
            let mut f = 1.0;
            if mi < k {
                for i in mi + 1..=k {
                    f *= nr / i as f64 - r;
                }
            } else {
                for i in k + 1..=mi {
                    v *= nr / i as f64 - r;
                }
            }
            if v <= f {
                return k;
            }
            continue;
        }

        // squeeze on ln v
        let v = v.ln();
        let kmf = km as f64;
        let rho = (kmf / npq) * (((kmf / 3.0 + 0.625) * kmf + 1.0 / 6.0) / npq + 0.5);
        let t = -kmf * kmf / (2.0 * npq);
        if v < t - rho {
            return k;
        }
        if v > t + rho {
            continue;
        }

        let nm = nf - m + 1.0;
        let h = (m + 0.5) * ((m + 1.0) / (r * nm)).ln()
            + stirling_correction(mi)
            + stirling_correction(n - mi);
        let nk = nf - kf + 1.0;
        let bound = h + (nf + 1.0) * (nm / nk).ln() + (kf + 0.5) * (nk * r / (kf + 1.0)).ln()
            - stirling_correction(k)
            - stirling_correction(n - k);
        if v <= bound {
            return k;
        }
    }
}
