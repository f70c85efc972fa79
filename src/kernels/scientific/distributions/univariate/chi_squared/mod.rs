// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # Chi-Squared Distribution
//!
//! χ²(ν) is Gamma(ν/2, scale 2). Degrees of freedom may be fractional.

mod std;

use minarrow::{Bitmask, FloatArray};

use crate::errors::KernelError;

/// Chi-squared PDF.
#[inline(always)]
pub fn chi_square_pdf(
    x: &[f64],
    df: f64,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::chi_square_pdf_std(x, df, null_mask, null_count)
}

/// Chi-squared CDF, or the survival function when `tail` is set.
#[inline(always)]
pub fn chi_square_cdf(
    x: &[f64],
    df: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::chi_square_cdf_std(x, df, tail, null_mask, null_count)
}

/// Chi-squared quantile.
#[inline(always)]
pub fn chi_square_quantile(
    p: &[f64],
    df: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::chi_square_quantile_std(p, df, tail, null_mask, null_count)
}
