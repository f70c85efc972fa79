// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Normal Distribution Module** - *Gaussian Density, CDF and Quantile over Arrays*
//!
//! Location-scale wrappers around the standard normal primitives. The CDF and
//! quantile take a `tail` flag; the upper tail is evaluated directly so it keeps
//! relative precision where `1 - Φ` would round to zero.
//!
//! ## Usage Examples
//! ```rust,ignore
//! use minarrow::vec64;
//! use stat_kernels::kernels::scientific::distributions::univariate::normal::*;
//!
//! let x = vec64![-2.0, -1.0, 0.0, 1.0, 2.0];
//! let pdf = normal_pdf(&x, 0.0, 1.0, None, None).unwrap();
//! let cdf = normal_cdf(&x, 0.0, 1.0, false, None, None).unwrap();
//!
//! // two-sided critical values
//! let alpha = vec64![0.001, 0.01, 0.05];
//! let half: Vec<f64> = alpha.iter().map(|a| a / 2.0).collect();
//! let z = normal_quantile(&half, 0.0, 1.0, true, None, None).unwrap();
//! ```

mod std;

use minarrow::{Bitmask, FloatArray};

use crate::errors::KernelError;

/// Normal PDF with null-aware handling.
/// Propagates input nulls; null lanes come out as `NaN`.
///
/// # Parameters
/// - `x`: input data
/// - `mean`: normal mean
/// - `std`: normal standard deviation
/// - `null_mask`: optional input null bitmap
/// - `null_count`: optional input null count
#[inline(always)]
pub fn normal_pdf(
    x: &[f64],
    mean: f64,
    std: f64,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::normal_pdf_std(x, mean, std, null_mask, null_count)
}

/// Normal CDF, or the complementary CDF when `tail` is set.
#[inline(always)]
pub fn normal_cdf(
    x: &[f64],
    mean: f64,
    std: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::normal_cdf_std(x, mean, std, tail, null_mask, null_count)
}

/// Normal quantile of `p`, or of the upper-tail probability `p` when `tail` is set.
/// https://stackedboxes.org/2017/05/01/acklams-normal-quantile-function/
#[inline(always)]
pub fn normal_quantile(
    p: &[f64],
    mean: f64,
    std: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::normal_quantile_std(p, mean, std, tail, null_mask, null_count)
}
