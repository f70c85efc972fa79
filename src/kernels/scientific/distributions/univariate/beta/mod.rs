// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # Beta Distribution
//!
//! Shapes α, β > 0 on the unit interval:
//!
//! - **PDF**: f(x; α, β) = x^(α-1) (1-x)^(β-1) / B(α, β)
//! - **CDF**: I_x(α, β), the regularised incomplete beta ratio
//!
//! Both tails come from the same incomplete beta evaluation, so neither is
//! formed by subtraction.

mod std;

use minarrow::{Bitmask, FloatArray};

use crate::errors::KernelError;

/// Beta PDF. Zero outside [0, 1]; at an endpoint the density is +∞ when the
/// governing shape is below one.
#[inline(always)]
pub fn beta_pdf(
    x: &[f64],
    alpha: f64,
    beta: f64,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::beta_pdf_std(x, alpha, beta, null_mask, null_count)
}

/// Beta CDF, or the complementary CDF when `tail` is set.
#[inline(always)]
pub fn beta_cdf(
    x: &[f64],
    alpha: f64,
    beta: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::beta_cdf_std(x, alpha, beta, tail, null_mask, null_count)
}

/// Beta quantile.
#[inline(always)]
pub fn beta_quantile(
    p: &[f64],
    alpha: f64,
    beta: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::beta_quantile_std(p, alpha, beta, tail, null_mask, null_count)
}
