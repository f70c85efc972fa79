// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # Poisson Distribution
//!
//! Counts with mean λ ≥ 0. λ = 0 is the point mass at zero.

mod std;

use minarrow::{Bitmask, FloatArray};

use crate::errors::KernelError;

/// Poisson PMF: P(K = k | λ) = e^{-λ} λ^k / k!
#[inline(always)]
pub fn poisson_pmf(
    k: &[u64],
    lambda: f64,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::poisson_pmf_std(k, lambda, null_mask, null_count)
}

/// Poisson CDF via the upper incomplete gamma ratio Q(k + 1, λ).
/// With `tail` set, P(K > k) = P(k + 1, λ).
#[inline(always)]
pub fn poisson_cdf(
    k: &[u64],
    lambda: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::poisson_cdf_std(k, lambda, tail, null_mask, null_count)
}

/// Poisson quantile function (inverse CDF).
///
/// For probability `p` returns the smallest integer `k` with P(K ≤ k) ≥ p.
/// `p = 1` gives `+∞` when λ > 0.
#[inline(always)]
pub fn poisson_quantile(
    p: &[f64],
    lambda: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::poisson_quantile_std(p, lambda, tail, null_mask, null_count)
}

#[cfg(test)]
mod tests {
    use minarrow::vec64;

    use super::*;
    use crate::kernels::scientific::distributions::shared::scalar::ln_gamma_plus1;
    use crate::kernels::scientific::distributions::univariate::common::{
        assert_close, dense_data, single_null_mask,
    };

    // exact sums in mpmath, λ = 3.2
    #[test]
    fn poisson_pmf_and_cdf() {
        let k = vec64![0u64, 3, 9];
        let pmf = dense_data(poisson_pmf(&k, 3.2, None, None).unwrap());
        let cdf = dense_data(poisson_cdf(&k, 3.2, false, None, None).unwrap());
        let pmf_expect = [0.04076220397836622, 0.22261598332718402, 0.003952250198235518];
        let cdf_expect = [0.04076220397836622, 0.6025197244055571, 0.9982381121318153];
        for i in 0..3 {
            assert_close(pmf[i], pmf_expect[i], 1e-13);
            assert_close(cdf[i], cdf_expect[i], 1e-13);
        }
    }

    #[test]
    fn poisson_pmf_matches_log_factorial_form() {
        let k = vec64![5u64, 40];
        let pmf = dense_data(poisson_pmf(&k, 11.0, None, None).unwrap());
        for (i, &ki) in k.iter().enumerate() {
            let direct = (ki as f64 * 11.0f64.ln() - 11.0 - ln_gamma_plus1(ki as f64)).exp();
            assert_close(pmf[i], direct, 1e-12);
        }
    }

    #[test]
    fn poisson_upper_tail_and_point_mass() {
        let sf = dense_data(poisson_cdf(&[20u64], 3.2, true, None, None).unwrap());
        assert_close(sf[0], 3.7826606843984566e-11, 1e-11);
        let pmf = dense_data(poisson_pmf(&[0u64, 1], 0.0, None, None).unwrap());
        assert_eq!(pmf[0], 1.0);
        assert_eq!(pmf[1], 0.0);
    }

    #[test]
    fn poisson_quantile_values() {
        let q = dense_data(poisson_quantile(&[0.5, 0.99, 1.0, -0.5], 3.2, false, None, None).unwrap());
        assert_eq!(q[0], 3.0);
        assert_eq!(q[1], 8.0);
        assert_eq!(q[2], f64::INFINITY);
        assert!(q[3].is_nan());
        let q = dense_data(poisson_quantile(&[0.01], 3.2, true, None, None).unwrap());
        assert_eq!(q[0], 8.0);
    }

    #[test]
    fn poisson_nulls_and_invalid() {
        let k = vec64![1u64, 2];
        let mask = single_null_mask(2, 0);
        let arr = poisson_cdf(&k, 2.0, false, Some(&mask), Some(1)).unwrap();
        assert!(arr.data[0].is_nan());
        assert!(arr.null_mask.as_ref().unwrap().get(1));
        assert!(poisson_pmf(&k, -1.0, None, None).is_err());
        assert!(poisson_quantile(&[0.5], f64::INFINITY, false, None, None).is_err());
    }
}
