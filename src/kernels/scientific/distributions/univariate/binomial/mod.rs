// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # Binomial Distribution
//!
//! Successes in `n` independent trials with success probability `p`. The CDF
//! is the incomplete beta ratio `I_{1-p}(n - k, k + 1)`; the quantile is the
//! smallest count whose CDF reaches the requested level.

mod std;

use minarrow::{Bitmask, FloatArray};

use crate::errors::KernelError;

/// Binomial PMF P(X = k).
///
/// ## Example
/// ```rust,ignore
/// use stat_kernels::kernels::scientific::distributions::univariate::binomial::binomial_pmf;
/// use minarrow::vec64;
///
/// let k = vec64![0u64, 1, 2, 3];
/// let result = binomial_pmf(&k, 3, 0.5, None, None).unwrap();
/// // [0.125, 0.375, 0.375, 0.125]
/// ```
#[inline(always)]
pub fn binomial_pmf(
    k: &[u64],
    n: u64,
    p: f64,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::binomial_pmf_std(k, n, p, null_mask, null_count)
}

/// Binomial CDF P(X ≤ k), or P(X > k) when `tail` is set.
///
/// Counts at or beyond `n` give 1 (0 for the upper tail).
#[inline(always)]
pub fn binomial_cdf(
    k: &[u64],
    n: u64,
    p: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::binomial_cdf_std(k, n, p, tail, null_mask, null_count)
}

/// Binomial quantile, returned as counts in `f64` lanes.
///
/// Probabilities outside [0, 1] give `NaN`.
#[inline(always)]
pub fn binomial_quantile(
    pr: &[f64],
    n: u64,
    p: f64,
    tail: bool,
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
) -> Result<FloatArray<f64>, KernelError> {
    std::binomial_quantile_std(pr, n, p, tail, null_mask, null_count)
}
