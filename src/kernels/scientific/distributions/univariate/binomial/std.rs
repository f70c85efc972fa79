// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

use minarrow::{Bitmask, FloatArray};

use crate::errors::KernelError;
use crate::kernels::scientific::distributions::dist_func::binomial::{
    d_binomial, p_binomial, q_binomial,
};
use crate::kernels::scientific::distributions::univariate::common::std::{
    univariate_kernel_f64_std, univariate_kernel_u64_std,
};

#[inline(always)]
fn check_success_probability(fname: &str, p: f64) -> Result<(), KernelError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(KernelError::InvalidArguments(format!(
            "{}: success probability {} outside [0, 1]",
            fname, p
        )));
    }
    Ok(())
}

#[inline(always)]
pub fn binomial_pmf_std(
    k: &[u64],
    n: u64,
    p: f64,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_success_probability("binomial_pmf", p)?;
    Ok(univariate_kernel_u64_std(k, null_mask, null_count, |ki| {
        d_binomial(n, p, ki).unwrap_or(f64::NAN)
    }))
}

#[inline(always)]
pub fn binomial_cdf_std(
    k: &[u64],
    n: u64,
    p: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_success_probability("binomial_cdf", p)?;
    Ok(univariate_kernel_u64_std(k, null_mask, null_count, |ki| {
        p_binomial(n, p, ki, tail).unwrap_or(f64::NAN)
    }))
}

#[inline(always)]
pub fn binomial_quantile_std(
    pr: &[f64],
    n: u64,
    p: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_success_probability("binomial_quantile", p)?;
    Ok(univariate_kernel_f64_std(pr, null_mask, null_count, |pi| {
        q_binomial(n, p, pi, tail).map_or(f64::NAN, |k| k as f64)
    }))
}
