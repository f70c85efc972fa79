// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Monte Carlo Orthant Probabilities** - *Blocked Running Mean and Variance*
//!
//! Last-resort CDF estimator for very high dimension. Indicator draws are summed in
//! blocks; block means feed a Welford accumulator whose standard error drives the
//! stopping rule. Slow, and of little use for small probabilities.

use rand::Rng;

use crate::utils::clamp_probability;

/// Two-sided 99% normal quantile.
const CONFIDENCE_QUANTILE: f64 = 2.576;

/// Target relative half-width of the confidence interval.
const RELATIVE_PRECISION: f64 = 1.0e-3;

/// -ln(0.01): after N draws without a miss the miss probability is below this over N at 99%.
const NO_MISS_BOUND: f64 = 4.605;

/// Welford running mean and variance.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningMoments {
    count: usize,
    mean: f64,
    m2: f64,
}

impl RunningMoments {
    #[inline]
    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Unbiased sample variance, 0 below two observations.
    #[inline]
    pub fn variance(&self) -> f64 {
        if self.count < 2 { 0.0 } else { self.m2 / (self.count - 1) as f64 }
    }

    /// Standard error of the mean.
    #[inline]
    pub fn standard_error(&self) -> f64 {
        (self.variance() / self.count.max(1) as f64).sqrt()
    }
}

/// Estimate of P(event) from `hit` draws, in blocks of `block_size`, stopping
/// at `max_points` draws or once the 99% half-width falls below 0.1% of the estimate.
///
/// The half-width is never taken below `4.605 / draws`, so blocks that agree
/// exactly (every draw a hit, say) stop the search only after enough draws to
/// bound the missing mass at the target precision.
pub fn monte_carlo_probability<R, F>(
    rng: &mut R,
    block_size: usize,
    max_points: usize,
    mut hit: F,
) -> f64
where
    R: Rng + ?Sized,
    F: FnMut(&mut R) -> bool,
{
    let block_size = block_size.max(1);
    let max_blocks = (max_points / block_size).max(2);
    let mut moments = RunningMoments::default();
    for _ in 0..max_blocks {
        let mut hits = 0usize;
        for _ in 0..block_size {
            if hit(rng) {
                hits += 1;
            }
        }
        moments.push(hits as f64 / block_size as f64);
        if moments.count() >= 2 {
            let draws = (moments.count() * block_size) as f64;
            let half_width = (CONFIDENCE_QUANTILE * moments.standard_error()).max(NO_MISS_BOUND / draws);
            if moments.mean() > 0.0 && half_width <= RELATIVE_PRECISION * moments.mean() {
                break;
            }
        }
    }
    clamp_probability(moments.mean())
}
