// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! Student's t with `nu` degrees of freedom.

use rand::Rng;

use super::{check_positive, check_probability};
use crate::errors::KernelError;
use crate::kernels::scientific::distributions::dcdflib::cdf::{StudentQuery, cdf_student};
use crate::kernels::scientific::distributions::dcdflib::settle;
use crate::kernels::scientific::distributions::shared::constants::LN_PI;
use crate::kernels::scientific::distributions::shared::sampler::{
    sample_gamma, sample_standard_normal,
};
use crate::kernels::scientific::special::gamma::ln_gamma;

/// Log of the normalising constant Γ((ν+1)/2) / (√(νπ) Γ(ν/2)).
#[inline]
pub(crate) fn ln_student_norm(nu: f64) -> f64 {
    ln_gamma(0.5 * (nu + 1.0)) - ln_gamma(0.5 * nu) - 0.5 * (nu.ln() + LN_PI)
}

/// Density (1 + x²/ν)^(-(ν+1)/2), normalised.
pub fn d_student(nu: f64, x: f64) -> Result<f64, KernelError> {
    check_positive("d_student", "nu", nu)?;
    if x.is_infinite() {
        return Ok(0.0);
    }
    Ok((ln_student_norm(nu) - 0.5 * (nu + 1.0) * (x * x / nu).ln_1p()).exp())
}

/// CDF at x, or its complement when `tail` is set.
pub fn p_student(nu: f64, x: f64, tail: bool) -> Result<f64, KernelError> {
    check_positive("p_student", "nu", nu)?;
    let pt = cdf_student(StudentQuery::Probability { t: x, df: nu })?;
    Ok(if tail { pt.q } else { pt.p })
}

/// The x with CDF p (or complementary CDF p when `tail` is set).
pub fn q_student(nu: f64, p: f64, tail: bool) -> Result<f64, KernelError> {
    check_positive("q_student", "nu", nu)?;
    check_probability("q_student", p)?;
    let (lower, upper) = if tail { (0.5 - p + 0.5, p) } else { (p, 0.5 - p + 0.5) };
    settle(
        "q_student",
        cdf_student(StudentQuery::Argument { p: lower, q: upper, df: nu }).map(|pt| pt.t),
    )
}

/// One t variate as Z / √(χ²_ν / ν).
pub fn r_student<R: Rng + ?Sized>(rng: &mut R, nu: f64) -> Result<f64, KernelError> {
    check_positive("r_student", "nu", nu)?;
    let z = sample_standard_normal(rng);
    let chi2 = 2.0 * sample_gamma(rng, 0.5 * nu, 1.0);
    Ok(z / (chi2 / nu).sqrt())
}
