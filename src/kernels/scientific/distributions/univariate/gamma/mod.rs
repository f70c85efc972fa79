// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # Gamma Distribution
//!
//! Shape α and rate β, both strictly positive. SciPy's `scale` is `1/β`:
//!
//! - **PDF**: f(x; α, β) = β^α x^(α-1) exp(-βx) / Γ(α) for x ≥ 0
//! - **CDF**: F(x; α, β) = P(α, βx), the regularised lower incomplete gamma ratio
//! - **Quantile**: x such that F(x) = p
//!
//! The upper tail `Q(α, βx)` is evaluated directly by the incomplete gamma
//! routine rather than as `1 - P`, so `tail = true` keeps relative precision
//! far into the right tail.

mod std;

use minarrow::{Bitmask, FloatArray};

use crate::errors::KernelError;

/// Gamma PDF with null-aware handling.
///
/// # Special Cases
/// - x < 0 gives 0
/// - at x = 0 the density is +∞ for α < 1, β for α = 1 and 0 otherwise
#[inline(always)]
pub fn gamma_pdf(
    x: &[f64],
    shape: f64,
    rate: f64,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::gamma_pdf_std(x, shape, rate, null_mask, null_count)
}

/// Gamma CDF, or the complementary CDF when `tail` is set.
#[inline(always)]
pub fn gamma_cdf(
    x: &[f64],
    shape: f64,
    rate: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::gamma_cdf_std(x, shape, rate, tail, null_mask, null_count)
}

/// Gamma quantile. Probabilities outside [0, 1] give `NaN`.
#[inline(always)]
pub fn gamma_quantile(
    p: &[f64],
    shape: f64,
    rate: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::gamma_quantile_std(p, shape, rate, tail, null_mask, null_count)
}

#[cfg(test)]
mod tests {
    use minarrow::vec64;

    use super::*;
    use crate::kernels::scientific::distributions::univariate::common::{
        assert_close, dense_data, single_null_mask,
    };

    // references: mpmath at 40 digits, shape 3 and rate 1/2
    const X: [f64; 4] = [0.5, 1.0, 2.0, 7.0];

    #[test]
    fn gamma_pdf_values() {
        let expect = [
            0.012168762235490701,
            0.03790816623203959,
            0.09196986029286058,
            0.09247948673085041,
        ];
        let arr = dense_data(gamma_pdf(&X, 3.0, 0.5, None, None).unwrap());
        for (a, e) in arr.iter().zip(expect.iter()) {
            assert_close(*a, *e, 1e-13);
        }
    }

    #[test]
    fn gamma_pdf_support_edges() {
        let x = vec64![-1.0, 0.0];
        let arr = dense_data(gamma_pdf(&x, 1.0, 0.25, None, None).unwrap());
        assert_eq!(arr[0], 0.0);
        assert_close(arr[1], 0.25, 1e-15);
        let arr = dense_data(gamma_pdf(&[0.0], 0.5, 1.0, None, None).unwrap());
        assert_eq!(arr[0], f64::INFINITY);
    }

    #[test]
    fn gamma_cdf_values_and_tail() {
        let expect = [
            0.0021614966897625125,
            0.014387677966970687,
            0.08030139707139419,
            0.6791528011378659,
        ];
        let arr = dense_data(gamma_cdf(&X, 3.0, 0.5, false, None, None).unwrap());
        for (a, e) in arr.iter().zip(expect.iter()) {
            assert_close(*a, *e, 1e-13);
        }
        let up = dense_data(gamma_cdf(&[60.0], 3.0, 0.5, true, None, None).unwrap());
        assert_close(up[0], 4.501016648012124e-11, 1e-12);
    }

    #[test]
    fn gamma_quantile_inverts() {
        let arr = dense_data(gamma_quantile(&[0.9, 0.0, 1.0, 1.5], 3.0, 0.5, false, None, None).unwrap());
        assert_close(arr[0], 10.64464067566842, 1e-12);
        assert_eq!(arr[1], 0.0);
        assert_eq!(arr[2], f64::INFINITY);
        assert!(arr[3].is_nan());
        let up = dense_data(gamma_quantile(&[0.1], 3.0, 0.5, true, None, None).unwrap());
        assert_close(up[0], 10.64464067566842, 1e-12);
    }

    #[test]
    fn second_parameter_is_rate() {
        // rate 3 is scipy.stats.gamma(3, scale=1/3); mpmath P(3, 0.3)
        let cdf = dense_data(gamma_cdf(&[0.1], 3.0, 3.0, false, None, None).unwrap());
        assert_close(cdf[0], 0.0035994931830894701, 1e-14);
        let pdf = dense_data(gamma_pdf(&[0.1], 3.0, 3.0, None, None).unwrap());
        assert_close(pdf[0], 0.10001045979203191, 1e-14);
        let q = dense_data(gamma_quantile(&[0.5], 2.0, 4.0, false, None, None).unwrap());
        assert_close(q[0], 1.6783469900166607 / 4.0, 1e-12);
    }

    #[test]
    fn gamma_mask_propagation() {
        let mask = single_null_mask(4, 2);
        let arr = gamma_cdf(&X, 3.0, 0.5, false, Some(&mask), Some(1)).unwrap();
        let out_mask = arr.null_mask.as_ref().unwrap();
        assert!(!out_mask.get(2));
        assert!(arr.data[2].is_nan());
        assert_close(arr.data[3], 0.6791528011378659, 1e-13);
    }

    #[test]
    fn gamma_invalid_params_and_empty() {
        assert!(gamma_pdf(&[1.0], 0.0, 1.0, None, None).is_err());
        assert!(gamma_cdf(&[1.0], 2.0, -1.0, false, None, None).is_err());
        assert!(gamma_quantile(&[0.5], f64::NAN, 1.0, false, None, None).is_err());
        let arr = gamma_pdf(&[], 2.0, 1.0, None, None).unwrap();
        assert!(arr.data.is_empty());
    }
}
