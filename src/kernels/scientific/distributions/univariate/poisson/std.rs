// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

use minarrow::{Bitmask, FloatArray};

use crate::errors::KernelError;
use crate::kernels::scientific::distributions::dist_func::poisson::{
    d_poisson, p_poisson, q_poisson,
};
use crate::kernels::scientific::distributions::univariate::common::std::{
    univariate_kernel_f64_std, univariate_kernel_u64_std,
};

#[inline(always)]
fn check_lambda(fname: &str, lambda: f64) -> Result<(), KernelError> {
    if !(lambda >= 0.0) || !lambda.is_finite() {
        return Err(KernelError::InvalidArguments(format!(
            "{}: invalid lambda {}",
            fname, lambda
        )));
    }
    Ok(())
}

#[inline(always)]
pub fn poisson_pmf_std(
    k: &[u64],
    lambda: f64,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_lambda("poisson_pmf", lambda)?;
    Ok(univariate_kernel_u64_std(k, null_mask, null_count, |ki| {
        d_poisson(lambda, ki).unwrap_or(f64::NAN)
    }))
}

#[inline(always)]
pub fn poisson_cdf_std(
    k: &[u64],
    lambda: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_lambda("poisson_cdf", lambda)?;
    Ok(univariate_kernel_u64_std(k, null_mask, null_count, |ki| {
        p_poisson(lambda, ki, tail).unwrap_or(f64::NAN)
    }))
}

#[inline(always)]
pub fn poisson_quantile_std(
    p: &[f64],
    lambda: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_lambda("poisson_quantile", lambda)?;
    Ok(univariate_kernel_f64_std(p, null_mask, null_count, |pi| {
        q_poisson(lambda, pi, tail).unwrap_or(f64::NAN)
    }))
}
