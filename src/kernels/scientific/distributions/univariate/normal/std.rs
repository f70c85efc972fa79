// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! Normal kernel bodies over the standard-form primitives in `dist_func::normal`.

use minarrow::{Bitmask, FloatArray};

use crate::errors::KernelError;
use crate::kernels::scientific::distributions::dist_func::normal::{d_normal, p_normal, q_normal};
use crate::kernels::scientific::distributions::univariate::common::std::univariate_kernel_f64_std;

#[inline(always)]
fn check_location_scale(fname: &str, mean: f64, std: f64) -> Result<(), KernelError> {
    if !(std > 0.0) || !std.is_finite() || !mean.is_finite() {
        return Err(KernelError::InvalidArguments(format!(
            "{}: invalid parameters (mean={}, std={})",
            fname, mean, std
        )));
    }
    Ok(())
}

#[inline(always)]
pub fn normal_pdf_std(
    x: &[f64],
    mean: f64,
    std: f64,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_location_scale("normal_pdf", mean, std)?;
    let inv_sigma = 1.0 / std;
    Ok(univariate_kernel_f64_std(x, null_mask, null_count, |xi| {
        d_normal((xi - mean) * inv_sigma) * inv_sigma
    }))
}

#[inline(always)]
pub fn normal_cdf_std(
    x: &[f64],
    mean: f64,
    std: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_location_scale("normal_cdf", mean, std)?;
    let inv_sigma = 1.0 / std;
    Ok(univariate_kernel_f64_std(x, null_mask, null_count, |xi| {
        p_normal((xi - mean) * inv_sigma, tail)
    }))
}

/// Probabilities outside [0, 1] give `NaN`.
#[inline(always)]
pub fn normal_quantile_std(
    p: &[f64],
    mean: f64,
    std: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_location_scale("normal_quantile", mean, std)?;
    Ok(univariate_kernel_f64_std(p, null_mask, null_count, |pi| {
        q_normal(pi, tail).map_or(f64::NAN, |z| mean + std * z)
    }))
}
