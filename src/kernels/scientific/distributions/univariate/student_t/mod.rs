// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # Student's t Distribution
//!
//! Central t with ν > 0 degrees of freedom, fractional ν allowed. The CDF
//! and quantile go through the incomplete beta package, so both tails carry
//! full relative precision.

mod std;

use minarrow::{Bitmask, FloatArray};

use crate::errors::KernelError;

/// Student t PDF.
#[inline(always)]
pub fn student_t_pdf(
    x: &[f64],
    df: f64,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::student_t_pdf_std(x, df, null_mask, null_count)
}

/// Student t CDF, or its complement when `tail` is set.
#[inline(always)]
pub fn student_t_cdf(
    x: &[f64],
    df: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::student_t_cdf_std(x, df, tail, null_mask, null_count)
}

/// Student t quantile.
#[inline(always)]
pub fn student_t_quantile(
    p: &[f64],
    df: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::student_t_quantile_std(p, df, tail, null_mask, null_count)
}

#[cfg(test)]
mod tests {
    use minarrow::vec64;

    use super::*;
    use crate::kernels::scientific::distributions::univariate::common::{
        assert_close, dense_data, single_null_mask,
    };

    // mpmath, ν = 4.5
    #[test]
    fn student_t_values() {
        let x = vec64![-2.0, 0.5, 3.0];
        let pdf = dense_data(student_t_pdf(&x, 4.5, None, None).unwrap());
        let cdf = dense_data(student_t_cdf(&x, 4.5, false, None, None).unwrap());
        let pdf_expect = [0.06567546929159984, 0.3253852064852856, 0.01840294665072774];
        let cdf_expect = [0.054128953590562516, 0.6797252489629765, 0.9828095660556202];
        for i in 0..3 {
            assert_close(pdf[i], pdf_expect[i], 1e-13);
            assert_close(cdf[i], cdf_expect[i], 1e-13);
        }
    }

    #[test]
    fn student_t_upper_tail() {
        let up = dense_data(student_t_cdf(&[30.0], 4.5, true, None, None).unwrap());
        assert_close(up[0], 1.1719871493942602e-06, 1e-12);
        let lo = dense_data(student_t_cdf(&[-30.0], 4.5, false, None, None).unwrap());
        assert_close(lo[0], up[0], 1e-14);
    }

    #[test]
    fn student_t_quantile_values() {
        let q = dense_data(student_t_quantile(&[0.975, 0.5], 4.5, false, None, None).unwrap());
        assert_close(q[0], 2.658912347204404, 1e-12);
        assert!(q[1].abs() < 1e-14);
        let q = dense_data(student_t_quantile(&[0.025], 4.5, true, None, None).unwrap());
        assert_close(q[0], 2.658912347204404, 1e-12);
    }

    #[test]
    fn student_t_cauchy_case() {
        // ν = 1: F(x) = 1/2 + atan(x)/π
        let x = vec64![-1.0, 2.0];
        let cdf = dense_data(student_t_cdf(&x, 1.0, false, None, None).unwrap());
        assert_close(cdf[0], 0.25, 1e-14);
        assert_close(cdf[1], 0.5 + 2.0f64.atan() / core::f64::consts::PI, 1e-14);
    }

    #[test]
    fn student_t_nulls_and_invalid() {
        let x = vec64![0.0, 1.0];
        let mask = single_null_mask(2, 0);
        let arr = student_t_pdf(&x, 3.0, Some(&mask), Some(1)).unwrap();
        assert!(arr.data[0].is_nan());
        assert!(arr.null_mask.as_ref().unwrap().get(1));
        assert!(student_t_pdf(&x, 0.0, None, None).is_err());
        assert!(student_t_quantile(&x, -2.0, false, None, None).is_err());
    }
}
