// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

use minarrow::{Bitmask, FloatArray};

use crate::errors::KernelError;
use crate::kernels::scientific::distributions::dist_func::student::{
    d_student, p_student, q_student,
};
use crate::kernels::scientific::distributions::univariate::common::std::univariate_kernel_f64_std;

#[inline(always)]
fn check_df(fname: &str, df: f64) -> Result<(), KernelError> {
    if !(df > 0.0) || df.is_nan() {
        return Err(KernelError::InvalidArguments(format!(
            "{}: invalid degrees of freedom {}",
            fname, df
        )));
    }
    Ok(())
}

#[inline(always)]
pub fn student_t_pdf_std(
    x: &[f64],
    df: f64,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_df("student_t_pdf", df)?;
    Ok(univariate_kernel_f64_std(x, null_mask, null_count, |xi| {
        d_student(df, xi).unwrap_or(f64::NAN)
    }))
}

#[inline(always)]
pub fn student_t_cdf_std(
    x: &[f64],
    df: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_df("student_t_cdf", df)?;
    Ok(univariate_kernel_f64_std(x, null_mask, null_count, |xi| {
        p_student(df, xi, tail).unwrap_or(f64::NAN)
    }))
}

#[inline(always)]
pub fn student_t_quantile_std(
    p: &[f64],
    df: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_df("student_t_quantile", df)?;
    Ok(univariate_kernel_f64_std(p, null_mask, null_count, |pi| {
        q_student(df, pi, tail).unwrap_or(f64::NAN)
    }))
}
