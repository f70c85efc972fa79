// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! Standard gamma law with shape `k` and unit scale.

use rand::Rng;

use super::{check_positive, check_probability, select_tail};
use crate::config::NumericalConfig;
use crate::errors::KernelError;
use crate::kernels::scientific::distributions::dcdflib::gamma_inc::gamma_inc_inv;
use crate::kernels::scientific::distributions::dcdflib::settle;
use crate::kernels::scientific::distributions::shared::sampler::sample_gamma;
use crate::kernels::scientific::special::gamma::{gamma_ratio_inc_pair_with, ln_gamma};

/// Density x^(k-1) e^(-x) / Γ(k).
///
/// # Errors
/// `InvalidArguments` unless k is positive and finite.
pub fn d_gamma(k: f64, x: f64) -> Result<f64, KernelError> {
    check_positive("d_gamma", "k", k)?;
    if x < 0.0 || x == f64::INFINITY {
        return Ok(0.0);
    }
    if x == 0.0 {
        return Ok(if k < 1.0 {
            f64::INFINITY
        } else if k == 1.0 {
            1.0
        } else {
            0.0
        });
    }
    Ok(((k - 1.0) * x.ln() - x - ln_gamma(k)).exp())
}

/// P(k, x), or Q(k, x) when `tail` is set.
pub fn p_gamma(k: f64, x: f64, tail: bool) -> Result<f64, KernelError> {
    check_positive("p_gamma", "k", k)?;
    if x <= 0.0 {
        return Ok(if tail { 1.0 } else { 0.0 });
    }
    let pair = gamma_ratio_inc_pair_with(k, x, &NumericalConfig::DEFAULT.spec_func)?;
    Ok(select_tail(pair, tail))
}

/// The x with P(k, x) = p (or Q(k, x) = p when `tail` is set).
pub fn q_gamma(k: f64, p: f64, tail: bool) -> Result<f64, KernelError> {
    check_positive("q_gamma", "k", k)?;
    check_probability("q_gamma", p)?;
    let (lower, upper) = if tail { (0.5 - p + 0.5, p) } else { (p, 0.5 - p + 0.5) };
    if lower == 0.0 {
        return Ok(0.0);
    }
    if upper == 0.0 {
        return Ok(f64::INFINITY);
    }
    settle("q_gamma", gamma_inc_inv(k, lower, upper))
}

/// One Gamma(k, 1) variate (Marsaglia-Tsang).
pub fn r_gamma<R: Rng + ?Sized>(rng: &mut R, k: f64) -> Result<f64, KernelError> {
    check_positive("r_gamma", "k", k)?;
    Ok(sample_gamma(rng, k, 1.0))
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
        // mpmath: exp(1.5 log 3 - 3 - loggamma(2.5))
        assert!(rel(d_gamma(2.5, 3.0).unwrap(), 0.19460869331856584) < 1e-14);
        assert_eq!(d_gamma(0.5, 0.0).unwrap(), f64::INFINITY);
        assert_eq!(d_gamma(1.0, 0.0).unwrap(), 1.0);
        assert_eq!(d_gamma(2.0, -1.0).unwrap(), 0.0);
        assert!(d_gamma(0.0, 1.0).is_err());
    }

    #[test]
    fn cdf_and_tail() {
        // mpmath.gammainc(regularized=True)
        assert!(rel(p_gamma(2.5, 1.5, false).unwrap(), 0.30001416412137249) < 1e-13);
        assert!(rel(p_gamma(2.5, 1.5, true).unwrap(), 0.69998583587862751) < 1e-13);
        assert!(rel(p_gamma(0.5, 1e-3, false).unwrap(), 0.035670591729679885) < 1e-13);
        assert!(rel(p_gamma(30.0, 50.0, true).unwrap(), 0.00091682886145607987) < 1e-12);
        assert_eq!(p_gamma(3.0, 0.0, false).unwrap(), 0.0);
        assert_eq!(p_gamma(3.0, -2.0, true).unwrap(), 1.0);
    }

    #[test]
    fn quantile_round_trip() {
        for &k in &[0.3, 1.0, 2.5, 40.0] {
            for &x in &[0.05, 0.8, 3.0, 45.0] {
                let p = p_gamma(k, x, false).unwrap();
                if p > 1e-290 && p < 1.0 - 1e-12 {
                    assert!(rel(q_gamma(k, p, false).unwrap(), x) < 1e-8, "k={} x={}", k, x);
                }
                let q = p_gamma(k, x, true).unwrap();
                if q > 1e-290 && q < 1.0 - 1e-12 {
                    assert!(rel(q_gamma(k, q, true).unwrap(), x) < 1e-8, "k={} x={}", k, x);
                }
            }
        }
        assert_eq!(q_gamma(2.0, 0.0, false).unwrap(), 0.0);
        assert_eq!(q_gamma(2.0, 0.0, true).unwrap(), f64::INFINITY);
        assert!(q_gamma(2.0, 1.2, false).is_err());
    }

    #[test]
    fn sample_moments() {
        let mut rng = RandomGenerator::from_seed(5);
        for &k in &[0.4, 3.0] {
            let n = 100_000;
            let xs: Vec<f64> = (0..n).map(|_| r_gamma(&mut rng, k).unwrap()).collect();
            let mean = xs.iter().sum::<f64>() / n as f64;
            let var = xs.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n as f64 - 1.0);
            // mean = var = k
            assert!((mean - k).abs() < 5.0 * (k / n as f64).sqrt(), "k={} mean={}", k, mean);
            assert!((var - k).abs() < 0.05 * k, "k={} var={}", k, var);
        }
    }
}
