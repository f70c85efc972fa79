// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

use minarrow::{Bitmask, FloatArray};

use crate::errors::KernelError;
use crate::kernels::scientific::distributions::univariate::gamma::{
    gamma_cdf, gamma_pdf, gamma_quantile,
};

#[inline(always)]
fn check_df(fname: &str, df: f64) -> Result<(), KernelError> {
    if !(df > 0.0) || !df.is_finite() {
        return Err(KernelError::InvalidArguments(format!(
            "{}: invalid degrees of freedom {}",
            fname, df
        )));
    }
    Ok(())
}

#[inline(always)]
pub fn chi_square_pdf_std(
    x: &[f64],
    df: f64,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_df("chi_square_pdf", df)?;
    gamma_pdf(x, 0.5 * df, 0.5, null_mask, null_count)
}

#[inline(always)]
pub fn chi_square_cdf_std(
    x: &[f64],
    df: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_df("chi_square_cdf", df)?;
    gamma_cdf(x, 0.5 * df, 0.5, tail, null_mask, null_count)
}

#[inline(always)]
pub fn chi_square_quantile_std(
    p: &[f64],
    df: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    check_df("chi_square_quantile", df)?;
    gamma_quantile(p, 0.5 * df, 0.5, tail, null_mask, null_count)
}
