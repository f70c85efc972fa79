// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

use minarrow::{Bitmask, FloatArray};

use crate::errors::KernelError;
use crate::kernels::scientific::distributions::dist_func::beta::{d_beta, p_beta, q_beta};
use crate::kernels::scientific::distributions::univariate::common::std::univariate_kernel_f64_std;

#[inline(always)]
fn check_shapes(fname: &str, alpha: f64, beta: f64) -> Result<(), KernelError> {
    if !(alpha > 0.0) || !alpha.is_finite() || !(beta > 0.0) || !beta.is_finite() {
        return Err(KernelError::InvalidArguments(format!(
            "{}: invalid parameters (alpha={}, beta={})",
            fname, alpha, beta
        )));
    }
    Ok(())
}

#[inline(always)]
pub fn beta_pdf_std(
    x: &[f64],
    alpha: f64,
    beta: f64,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_shapes("beta_pdf", alpha, beta)?;
    Ok(univariate_kernel_f64_std(x, null_mask, null_count, |xi| {
        d_beta(alpha, beta, xi).unwrap_or(f64::NAN)
    }))
}

#[inline(always)]
pub fn beta_cdf_std(
    x: &[f64],
    alpha: f64,
    beta: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_shapes("beta_cdf", alpha, beta)?;
    Ok(univariate_kernel_f64_std(x, null_mask, null_count, |xi| {
        p_beta(alpha, beta, xi, tail).unwrap_or(f64::NAN)
    }))
}

#[inline(always)]
pub fn beta_quantile_std(
    p: &[f64],
    alpha: f64,
    beta: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_shapes("beta_quantile", alpha, beta)?;
    Ok(univariate_kernel_f64_std(p, null_mask, null_count, |pi| {
        q_beta(alpha, beta, pi, tail).unwrap_or(f64::NAN)
    }))
}
