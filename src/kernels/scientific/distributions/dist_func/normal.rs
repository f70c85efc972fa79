// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! Standard normal N(0, 1).

use minarrow::Vec64;
use rand::Rng;

use super::check_probability;
use crate::errors::KernelError;
use crate::kernels::scientific::distributions::shared::sampler::{
    sample_standard_normal, standard_normal_vec,
};
use crate::kernels::scientific::distributions::shared::scalar::{
    normal_cdf_scalar, normal_pdf_scalar, normal_quantile_scalar,
};

/// φ(x)
#[inline]
pub fn d_normal(x: f64) -> f64 {
    normal_pdf_scalar(x)
}

/// Φ(x), or 1 - Φ(x) when `tail` is set.
///
/// The upper tail is evaluated as Φ(-x) so it keeps full relative precision
/// far into the tail.
#[inline]
pub fn p_normal(x: f64, tail: bool) -> f64 {
    if tail { normal_cdf_scalar(-x) } else { normal_cdf_scalar(x) }
}

/// Φ⁻¹(p), or Φ⁻¹(1 - p) when `tail` is set.
///
/// # Errors
/// `InvalidArguments` when p is outside [0, 1].
pub fn q_normal(p: f64, tail: bool) -> Result<f64, KernelError> {
    check_probability("q_normal", p)?;
    let z = normal_quantile_scalar(p, 0.0, 1.0);
    Ok(if tail { -z } else { z })
}

/// One standard normal variate (ziggurat).
#[inline]
pub fn r_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    sample_standard_normal(rng)
}

/// `size` independent standard normal variates.
#[inline]
pub fn r_normal_sample<R: Rng + ?Sized>(rng: &mut R, size: usize) -> Vec64<f64> {
    standard_normal_vec(rng, size)
}
