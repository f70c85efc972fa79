// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

use minarrow::{Bitmask, FloatArray};

use crate::errors::KernelError;
use crate::kernels::scientific::distributions::dist_func::gamma::{d_gamma, p_gamma, q_gamma};
use crate::kernels::scientific::distributions::univariate::common::std::univariate_kernel_f64_std;

// The second parameter is the rate β = 1/θ throughout.

#[inline(always)]
fn check_shape_rate(fname: &str, shape: f64, rate: f64) -> Result<(), KernelError> {
    if !(shape > 0.0) || !shape.is_finite() || !(rate > 0.0) || !rate.is_finite() {
        return Err(KernelError::InvalidArguments(format!(
            "{}: invalid parameters (shape={}, rate={})",
            fname, shape, rate
        )));
    }
    Ok(())
}

#[inline(always)]
pub fn gamma_pdf_std(
    x: &[f64],
    shape: f64,
    rate: f64,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_shape_rate("gamma_pdf", shape, rate)?;
    Ok(univariate_kernel_f64_std(x, null_mask, null_count, |xi| {
        d_gamma(shape, xi * rate).map_or(f64::NAN, |d| d * rate)
    }))
}

#[inline(always)]
pub fn gamma_cdf_std(
    x: &[f64],
    shape: f64,
    rate: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_shape_rate("gamma_cdf", shape, rate)?;
    Ok(univariate_kernel_f64_std(x, null_mask, null_count, |xi| {
        p_gamma(shape, xi * rate, tail).unwrap_or(f64::NAN)
    }))
}

#[inline(always)]
pub fn gamma_quantile_std(
    p: &[f64],
    shape: f64,
    rate: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_shape_rate("gamma_quantile", shape, rate)?;
    Ok(univariate_kernel_f64_std(p, null_mask, null_count, |pi| {
        q_gamma(shape, pi, tail).map_or(f64::NAN, |z| z / rate)
    }))
}
