// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Distribution Objects** - *Common Interface, Intervals and 1-D Marginals*
//!
//! [`Distribution`] is the object-safe interface shared by the multivariate laws, the
//! copulas and [`super::composed::ComposedDistribution`]. Points are plain `&[f64]`
//! slices of length [`Distribution::dimension`]; vector results come back as `Vec64<f64>`.
//!
//! The marginal types here are thin parameterised wrappers over [`super::dist_func`]
//! carrying a numerical range and a description, which is what the composition layer
//! needs from a 1-D component.
//!
//! ## Conditional distributions
//! `conditional_*(x, y)` describe component `k = y.len()` given that the first `k`
//! components equal `y`. For a 1-D distribution `y` is empty and the conditional is
//! the distribution itself.

use core::fmt;

use minarrow::Vec64;
use rand::RngCore;

use crate::config::NumericalConfig;
use crate::errors::{KernelError, log_length_mismatch};
use crate::kernels::scientific::distributions::dist_func::beta::{d_beta, p_beta, q_beta, r_beta};
use crate::kernels::scientific::distributions::dist_func::check_probability;
use crate::kernels::scientific::distributions::dist_func::gamma::{
    d_gamma, p_gamma, q_gamma, r_gamma,
};
use crate::kernels::scientific::distributions::dist_func::normal::{
    d_normal, p_normal, q_normal, r_normal,
};
use crate::kernels::scientific::distributions::dist_func::student::{
    d_student, p_student, q_student, r_student,
};
use crate::kernels::scientific::distributions::dist_func::uniform::r_uniform;
use crate::kernels::scientific::distributions::shared::constants::HALF_LOG_TWO_PI;

/// Largest dimension for which [`Distribution::probability`] expands an interval
/// into CDF values at its corners.
pub const MAXIMUM_CORNER_DIMENSION: usize = 20;

/// Axis-aligned box `[lower_i, upper_i]`, possibly unbounded.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    lower: Vec64<f64>,
    upper: Vec64<f64>,
}

impl Interval {
    /// Box from its corner vectors.
    ///
    /// # Errors
    /// `LengthMismatch` when the bounds differ in length, `InvalidArguments` on NaN bounds.
    pub fn new(lower: &[f64], upper: &[f64]) -> Result<Self, KernelError> {
        if lower.len() != upper.len() {
            return Err(KernelError::LengthMismatch(log_length_mismatch(
                "Interval::new".into(),
                lower.len(),
                upper.len(),
            )));
        }
        if lower.iter().chain(upper.iter()).any(|v| v.is_nan()) {
            return Err(KernelError::InvalidArguments(
                "Interval::new: NaN bound".into(),
            ));
        }
        Ok(Interval {
            lower: Vec64::from_slice(lower),
            upper: Vec64::from_slice(upper),
        })
    }

    /// The whole of ℝ^d.
    pub fn unbounded(d: usize) -> Self {
        let mut lower = Vec64::with_capacity(d);
        let mut upper = Vec64::with_capacity(d);
        lower.resize(d, f64::NEG_INFINITY);
        upper.resize(d, f64::INFINITY);
        Interval { lower, upper }
    }

    /// The unit cube [0, 1]^d.
    pub fn unit(d: usize) -> Self {
        let mut lower = Vec64::with_capacity(d);
        let mut upper = Vec64::with_capacity(d);
        lower.resize(d, 0.0);
        upper.resize(d, 1.0);
        Interval { lower, upper }
    }

    /// The segment [a, b].
    pub fn segment(a: f64, b: f64) -> Self {
        Interval {
            lower: Vec64::from_slice(&[a]),
            upper: Vec64::from_slice(&[b]),
        }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.lower.len()
    }

    #[inline]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    #[inline]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// True when some axis has `lower > upper`.
    pub fn is_empty(&self) -> bool {
        self.lower.iter().zip(self.upper.iter()).any(|(a, b)| a > b)
    }

    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.dimension()
            && x
                .iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .all(|(v, (a, b))| *a <= *v && *v <= *b)
    }

    /// Component-wise intersection.
    pub fn intersect(&self, other: &Interval) -> Result<Interval, KernelError> {
        if other.dimension() != self.dimension() {
            return Err(KernelError::LengthMismatch(log_length_mismatch(
                "Interval::intersect".into(),
                self.dimension(),
                other.dimension(),
            )));
        }
        let lower: Vec64<f64> = self
            .lower
            .iter()
            .zip(other.lower.iter())
            .map(|(a, b)| a.max(*b))
            .collect();
        let upper: Vec64<f64> = self
            .upper
            .iter()
            .zip(other.upper.iter())
            .map(|(a, b)| a.min(*b))
            .collect();
        Ok(Interval { lower, upper })
    }
}

/// Object-safe interface of every distribution in the crate.
///
/// Defaults cover what can be derived from the required methods: the complementary
/// CDF from the CDF, interval probabilities from CDF values at the corners, and the
/// conditional distributions of a 1-D law.
pub trait Distribution: fmt::Debug + Send + Sync {
    /// Short type name, used when no description is given.
    fn class_name(&self) -> &'static str;

    fn dimension(&self) -> usize;

    /// One label per component.
    fn description(&self) -> &[String];

    /// Box outside of which the density is numerically zero.
    fn range(&self) -> &Interval;

    fn pdf(&self, x: &[f64]) -> Result<f64, KernelError>;

    fn log_pdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        Ok(self.pdf(x)?.ln())
    }

    fn cdf(&self, x: &[f64]) -> Result<f64, KernelError>;

    /// 1 - F(x).
    fn complementary_cdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        Ok((0.5 - self.cdf(x)? + 0.5).clamp(0.0, 1.0))
    }

    /// P(X ∈ interval) by inclusion-exclusion over the corners of the box.
    fn probability(&self, interval: &Interval) -> Result<f64, KernelError> {
        let d = self.dimension();
        check_dimension("Distribution::probability", d, interval.dimension())?;
        if interval.is_empty() {
            return Ok(0.0);
        }
        corner_probability(interval.lower(), interval.upper(), |x| self.cdf(x))
    }

    /// Quantile `p` of the distribution. For `d > 1` this is the iso-quantile: the
    /// point on the diagonal ray of the law whose CDF equals `p`.
    fn quantile(&self, p: f64, tail: bool) -> Result<Vec64<f64>, KernelError>;

    /// One draw.
    fn realization(&self, rng: &mut dyn RngCore) -> Result<Vec64<f64>, KernelError>;

    /// `size` independent draws.
    fn sample(
        &self,
        rng: &mut dyn RngCore,
        size: usize,
    ) -> Result<Vec<Vec64<f64>>, KernelError> {
        (0..size).map(|_| self.realization(rng)).collect()
    }

    /// Density of component `y.len()` at `x` given the preceding components `y`.
    fn conditional_pdf(&self, x: f64, y: &[f64]) -> Result<f64, KernelError> {
        if self.dimension() == 1 && y.is_empty() {
            return self.pdf(&[x]);
        }
        Err(conditional_not_implemented(self.class_name(), "conditional_pdf"))
    }

    /// CDF of component `y.len()` at `x` given the preceding components `y`.
    fn conditional_cdf(&self, x: f64, y: &[f64]) -> Result<f64, KernelError> {
        if self.dimension() == 1 && y.is_empty() {
            return self.cdf(&[x]);
        }
        Err(conditional_not_implemented(self.class_name(), "conditional_cdf"))
    }

    /// Quantile `q` of component `y.len()` given the preceding components `y`.
    fn conditional_quantile(&self, q: f64, y: &[f64]) -> Result<f64, KernelError> {
        if self.dimension() == 1 && y.is_empty() {
            return Ok(self.quantile(q, false)?[0]);
        }
        Err(conditional_not_implemented(
            self.class_name(),
            "conditional_quantile",
        ))
    }

    /// True when the components are mutually independent.
    fn has_independent_copula(&self) -> bool {
        self.dimension() == 1
    }
}

fn conditional_not_implemented(class_name: &str, op: &str) -> KernelError {
    KernelError::NotYetImplemented(format!("{}::{}", class_name, op))
}

#[inline]
pub(crate) fn check_dimension(fname: &str, expected: usize, got: usize) -> Result<(), KernelError> {
    if expected != got {
        return Err(KernelError::LengthMismatch(log_length_mismatch(
            fname.into(),
            expected,
            got,
        )));
    }
    Ok(())
}

/// Checks a conditioning vector against the dimension: `y.len() < d`.
#[inline]
pub(crate) fn check_conditioning(fname: &str, d: usize, y: &[f64]) -> Result<(), KernelError> {
    if y.len() >= d {
        return Err(KernelError::OutOfBounds(format!(
            "{}: conditioning on {} components of a {}-dimensional law",
            fname,
            y.len(),
            d
        )));
    }
    Ok(())
}

/// Σ over the 2^d corners of the box `[lower, upper]` of (-1)^{#lower} F(corner),
/// clamped to [0, 1].
///
/// Corners with a `-∞` coordinate carry no mass and are skipped.
pub(crate) fn corner_probability<F>(lower: &[f64], upper: &[f64], mut cdf: F) -> Result<f64, KernelError>
where
    F: FnMut(&[f64]) -> Result<f64, KernelError>,
{
    let d = lower.len();
    check_dimension("corner_probability", d, upper.len())?;
    if d > MAXIMUM_CORNER_DIMENSION {
        return Err(KernelError::NotYetImplemented(format!(
            "probability: corner expansion in dimension {} (maximum {})",
            d, MAXIMUM_CORNER_DIMENSION
        )));
    }
    let mut corner = vec![0.0; d];
    let mut total = 0.0;
    'corners: for mask in 0u32..(1u32 << d) {
        let mut lowers = 0;
        for i in 0..d {
            if mask & (1 << i) != 0 {
                if lower[i] == f64::NEG_INFINITY {
                    continue 'corners;
                }
                corner[i] = lower[i];
                lowers += 1;
            } else {
                corner[i] = upper[i];
            }
        }
        let f = cdf(&corner)?;
        if lowers % 2 == 0 { total += f } else { total -= f }
    }
    Ok(total.clamp(0.0, 1.0))
}

#[inline]
fn scalar_point(fname: &str, x: &[f64]) -> Result<f64, KernelError> {
    check_dimension(fname, 1, x.len())?;
    Ok(x[0])
}

#[inline]
fn one(v: f64) -> Vec64<f64> {
    Vec64::from_slice(&[v])
}

fn default_description(name: &str) -> Vec<String> {
    vec![name.to_string()]
}

/// Normal marginal N(μ, σ²).
#[derive(Debug, Clone)]
pub struct NormalMarginal {
    mu: f64,
    sigma: f64,
    range: Interval,
    description: Vec<String>,
}

impl NormalMarginal {
    pub fn new(mu: f64, sigma: f64) -> Result<Self, KernelError> {
        Self::with_config(mu, sigma, &NumericalConfig::DEFAULT)
    }

    pub fn with_config(mu: f64, sigma: f64, config: &NumericalConfig) -> Result<Self, KernelError> {
        if !mu.is_finite() || !(sigma > 0.0) || !sigma.is_finite() {
            return Err(KernelError::InvalidArguments(format!(
                "NormalMarginal: need finite mu and positive sigma, got ({}, {})",
                mu, sigma
            )));
        }
        let z = q_normal(config.dist_func.quantile_epsilon, true)?;
        Ok(NormalMarginal {
            mu,
            sigma,
            range: Interval::segment(mu - sigma * z, mu + sigma * z),
            description: default_description("X0"),
        })
    }

    pub fn with_description(mut self, name: impl Into<String>) -> Self {
        self.description = vec![name.into()];
        self
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Distribution for NormalMarginal {
    fn class_name(&self) -> &'static str {
        "Normal"
    }

    fn dimension(&self) -> usize {
        1
    }

    fn description(&self) -> &[String] {
        &self.description
    }

    fn range(&self) -> &Interval {
        &self.range
    }

    fn pdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        let z = (scalar_point("NormalMarginal::pdf", x)? - self.mu) / self.sigma;
        Ok(d_normal(z) / self.sigma)
    }

    fn log_pdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        let z = (scalar_point("NormalMarginal::log_pdf", x)? - self.mu) / self.sigma;
        Ok(-0.5 * z * z - self.sigma.ln() - HALF_LOG_TWO_PI)
    }

    fn cdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        let z = (scalar_point("NormalMarginal::cdf", x)? - self.mu) / self.sigma;
        Ok(p_normal(z, false))
    }

    fn complementary_cdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        let z = (scalar_point("NormalMarginal::complementary_cdf", x)? - self.mu) / self.sigma;
        Ok(p_normal(z, true))
    }

    fn quantile(&self, p: f64, tail: bool) -> Result<Vec64<f64>, KernelError> {
        Ok(one(self.mu + self.sigma * q_normal(p, tail)?))
    }

    fn realization(&self, rng: &mut dyn RngCore) -> Result<Vec64<f64>, KernelError> {
        Ok(one(self.mu + self.sigma * r_normal(rng)))
    }
}

/// Continuous uniform marginal on [a, b].
#[derive(Debug, Clone)]
pub struct UniformMarginal {
    a: f64,
    b: f64,
    range: Interval,
    description: Vec<String>,
}

impl UniformMarginal {
    pub fn new(a: f64, b: f64) -> Result<Self, KernelError> {
        if !(a < b) || !(b - a).is_finite() {
            return Err(KernelError::InvalidArguments(format!(
                "UniformMarginal: need finite a < b, got [{}, {}]",
                a, b
            )));
        }
        Ok(UniformMarginal {
            a,
            b,
            range: Interval::segment(a, b),
            description: default_description("X0"),
        })
    }

    pub fn with_description(mut self, name: impl Into<String>) -> Self {
        self.description = vec![name.into()];
        self
    }
}

impl Distribution for UniformMarginal {
    fn class_name(&self) -> &'static str {
        "Uniform"
    }

    fn dimension(&self) -> usize {
        1
    }

    fn description(&self) -> &[String] {
        &self.description
    }

    fn range(&self) -> &Interval {
        &self.range
    }

    fn pdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        let x = scalar_point("UniformMarginal::pdf", x)?;
        Ok(if self.a <= x && x <= self.b { 1.0 / (self.b - self.a) } else { 0.0 })
    }

    fn cdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        let x = scalar_point("UniformMarginal::cdf", x)?;
        Ok(((x - self.a) / (self.b - self.a)).clamp(0.0, 1.0))
    }

    fn complementary_cdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        let x = scalar_point("UniformMarginal::complementary_cdf", x)?;
        Ok(((self.b - x) / (self.b - self.a)).clamp(0.0, 1.0))
    }

    fn quantile(&self, p: f64, tail: bool) -> Result<Vec64<f64>, KernelError> {
        check_probability("UniformMarginal::quantile", p)?;
        let w = self.b - self.a;
        Ok(one(if tail { self.b - p * w } else { self.a + p * w }))
    }

    fn realization(&self, rng: &mut dyn RngCore) -> Result<Vec64<f64>, KernelError> {
        Ok(one(r_uniform(rng, self.a, self.b)?))
    }
}

/// Gamma marginal with shape `k` and scale `θ`, density x^{k-1} e^{-x/θ} / (Γ(k) θ^k).
#[derive(Debug, Clone)]
pub struct GammaMarginal {
    shape: f64,
    scale: f64,
    range: Interval,
    description: Vec<String>,
}

impl GammaMarginal {
    pub fn new(shape: f64, scale: f64) -> Result<Self, KernelError> {
        Self::with_config(shape, scale, &NumericalConfig::DEFAULT)
    }

    pub fn with_config(
        shape: f64,
        scale: f64,
        config: &NumericalConfig,
    ) -> Result<Self, KernelError> {
        if !(scale > 0.0) || !scale.is_finite() {
            return Err(KernelError::InvalidArguments(format!(
                "GammaMarginal: invalid scale {}",
                scale
            )));
        }
        let upper = scale * q_gamma(shape, config.dist_func.quantile_epsilon, true)?;
        Ok(GammaMarginal {
            shape,
            scale,
            range: Interval::segment(0.0, upper),
            description: default_description("X0"),
        })
    }

    pub fn with_description(mut self, name: impl Into<String>) -> Self {
        self.description = vec![name.into()];
        self
    }
}

impl Distribution for GammaMarginal {
    fn class_name(&self) -> &'static str {
        "Gamma"
    }

    fn dimension(&self) -> usize {
        1
    }

    fn description(&self) -> &[String] {
        &self.description
    }

    fn range(&self) -> &Interval {
        &self.range
    }

    fn pdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        let x = scalar_point("GammaMarginal::pdf", x)?;
        Ok(d_gamma(self.shape, x / self.scale)? / self.scale)
    }

    fn cdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        let x = scalar_point("GammaMarginal::cdf", x)?;
        p_gamma(self.shape, x / self.scale, false)
    }

    fn complementary_cdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        let x = scalar_point("GammaMarginal::complementary_cdf", x)?;
        p_gamma(self.shape, x / self.scale, true)
    }

    fn quantile(&self, p: f64, tail: bool) -> Result<Vec64<f64>, KernelError> {
        Ok(one(self.scale * q_gamma(self.shape, p, tail)?))
    }

    fn realization(&self, rng: &mut dyn RngCore) -> Result<Vec64<f64>, KernelError> {
        Ok(one(self.scale * r_gamma(rng, self.shape)?))
    }
}

/// Beta marginal with shapes (α, β), stretched onto [a, b].
#[derive(Debug, Clone)]
pub struct BetaMarginal {
    alpha: f64,
    beta: f64,
    a: f64,
    b: f64,
    range: Interval,
    description: Vec<String>,
}

impl BetaMarginal {
    pub fn new(alpha: f64, beta: f64, a: f64, b: f64) -> Result<Self, KernelError> {
        if !(a < b) || !(b - a).is_finite() {
            return Err(KernelError::InvalidArguments(format!(
                "BetaMarginal: need finite a < b, got [{}, {}]",
                a, b
            )));
        }
        // shape validation
        d_beta(alpha, beta, 0.5)?;
        Ok(BetaMarginal {
            alpha,
            beta,
            a,
            b,
            range: Interval::segment(a, b),
            description: default_description("X0"),
        })
    }

    pub fn with_description(mut self, name: impl Into<String>) -> Self {
        self.description = vec![name.into()];
        self
    }

    #[inline]
    fn reduce(&self, x: f64) -> f64 {
        (x - self.a) / (self.b - self.a)
    }
}

impl Distribution for BetaMarginal {
    fn class_name(&self) -> &'static str {
        "Beta"
    }

    fn dimension(&self) -> usize {
        1
    }

    fn description(&self) -> &[String] {
        &self.description
    }

    fn range(&self) -> &Interval {
        &self.range
    }

    fn pdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        let u = self.reduce(scalar_point("BetaMarginal::pdf", x)?);
        Ok(d_beta(self.alpha, self.beta, u)? / (self.b - self.a))
    }

    fn cdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        let u = self.reduce(scalar_point("BetaMarginal::cdf", x)?);
        p_beta(self.alpha, self.beta, u, false)
    }

    fn complementary_cdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        let u = self.reduce(scalar_point("BetaMarginal::complementary_cdf", x)?);
        p_beta(self.alpha, self.beta, u, true)
    }

    fn quantile(&self, p: f64, tail: bool) -> Result<Vec64<f64>, KernelError> {
        let u = q_beta(self.alpha, self.beta, p, tail)?;
        Ok(one(self.a + (self.b - self.a) * u))
    }

    fn realization(&self, rng: &mut dyn RngCore) -> Result<Vec64<f64>, KernelError> {
        let u = r_beta(rng, self.alpha, self.beta)?;
        Ok(one(self.a + (self.b - self.a) * u))
    }
}

/// Location-scale Student marginal μ + σ T_ν.
#[derive(Debug, Clone)]
pub struct StudentMarginal {
    nu: f64,
    mu: f64,
    sigma: f64,
    range: Interval,
    description: Vec<String>,
}

impl StudentMarginal {
    pub fn new(nu: f64, mu: f64, sigma: f64) -> Result<Self, KernelError> {
        Self::with_config(nu, mu, sigma, &NumericalConfig::DEFAULT)
    }

    pub fn with_config(
        nu: f64,
        mu: f64,
        sigma: f64,
        config: &NumericalConfig,
    ) -> Result<Self, KernelError> {
        if !mu.is_finite() || !(sigma > 0.0) || !sigma.is_finite() {
            return Err(KernelError::InvalidArguments(format!(
                "StudentMarginal: need finite mu and positive sigma, got ({}, {})",
                mu, sigma
            )));
        }
        let t = q_student(nu, config.dist_func.quantile_epsilon, true)?;
        Ok(StudentMarginal {
            nu,
            mu,
            sigma,
            range: Interval::segment(mu - sigma * t, mu + sigma * t),
            description: default_description("X0"),
        })
    }

    pub fn with_description(mut self, name: impl Into<String>) -> Self {
        self.description = vec![name.into()];
        self
    }
}

impl Distribution for StudentMarginal {
    fn class_name(&self) -> &'static str {
        "Student"
    }

    fn dimension(&self) -> usize {
        1
    }

    fn description(&self) -> &[String] {
        &self.description
    }

    fn range(&self) -> &Interval {
        &self.range
    }

    fn pdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        let t = (scalar_point("StudentMarginal::pdf", x)? - self.mu) / self.sigma;
        Ok(d_student(self.nu, t)? / self.sigma)
    }

    fn cdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        let t = (scalar_point("StudentMarginal::cdf", x)? - self.mu) / self.sigma;
        student_cdf(self.nu, t, false)
    }

    fn complementary_cdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        let t = (scalar_point("StudentMarginal::complementary_cdf", x)? - self.mu) / self.sigma;
        student_cdf(self.nu, t, true)
    }

    fn quantile(&self, p: f64, tail: bool) -> Result<Vec64<f64>, KernelError> {
        Ok(one(self.mu + self.sigma * student_quantile(self.nu, p, tail)?))
    }

    fn realization(&self, rng: &mut dyn RngCore) -> Result<Vec64<f64>, KernelError> {
        Ok(one(self.mu + self.sigma * r_student(rng, self.nu)?))
    }
}

/// Student CDF extended to ±∞.
#[inline]
pub(crate) fn student_cdf(nu: f64, t: f64, tail: bool) -> Result<f64, KernelError> {
    if t.is_infinite() {
        let lower = if t > 0.0 { 1.0 } else { 0.0 };
        return Ok(if tail { 1.0 - lower } else { lower });
    }
    p_student(nu, t, tail)
}

/// Student quantile with the saturated levels mapped to ±∞.
#[inline]
pub(crate) fn student_quantile(nu: f64, p: f64, tail: bool) -> Result<f64, KernelError> {
    check_probability("student_quantile", p)?;
    let lower = if tail { 1.0 - p } else { p };
    if lower <= 0.0 {
        return Ok(f64::NEG_INFINITY);
    }
    if lower >= 1.0 {
        return Ok(f64::INFINITY);
    }
    q_student(nu, p, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::scientific::distributions::shared::sampler::RandomGenerator;
    use crate::kernels::scientific::distributions::univariate::common::assert_close;

    #[test]
    fn interval_basics() {
        let i = Interval::new(&[0.0, -1.0], &[1.0, 2.0]).unwrap();
        assert_eq!(i.dimension(), 2);
        assert!(i.contains(&[0.5, 0.0]));
        assert!(!i.contains(&[1.5, 0.0]));
        assert!(!i.is_empty());
        let j = Interval::new(&[0.5, 3.0], &[4.0, 4.0]).unwrap();
        assert!(i.intersect(&j).unwrap().is_empty());
        assert!(Interval::new(&[0.0], &[1.0, 2.0]).is_err());
        assert!(Interval::new(&[f64::NAN], &[1.0]).is_err());
    }

    #[test]
    fn normal_marginal_values() {
        let n = NormalMarginal::new(1.0, 2.0).unwrap();
        assert_close(n.cdf(&[1.0]).unwrap(), 0.5, 1e-15);
        assert_close(n.pdf(&[1.0]).unwrap(), 0.19947114020071635, 1e-14);
        assert_close(n.log_pdf(&[3.0]).unwrap(), n.pdf(&[3.0]).unwrap().ln(), 1e-13);
        assert_close(n.quantile(0.975, false).unwrap()[0], 1.0 + 2.0 * 1.959963984540054, 1e-12);
        let r = n.range();
        assert!(r.lower()[0] < -14.0 && r.upper()[0] > 16.0);
        assert!(n.pdf(&[1.0, 2.0]).is_err());
        assert!(NormalMarginal::new(0.0, -1.0).is_err());
    }

    #[test]
    fn interval_probability_of_marginal() {
        let n = NormalMarginal::new(0.0, 1.0).unwrap();
        let p = n.probability(&Interval::segment(-1.0, 1.0)).unwrap();
        assert_close(p, 0.6826894921370859, 1e-13);
        assert_eq!(n.probability(&Interval::segment(1.0, -1.0)).unwrap(), 0.0);
    }

    #[test]
    fn uniform_marginal_values() {
        let u = UniformMarginal::new(-1.0, 3.0).unwrap();
        assert_eq!(u.pdf(&[0.0]).unwrap(), 0.25);
        assert_eq!(u.pdf(&[4.0]).unwrap(), 0.0);
        assert_eq!(u.cdf(&[1.0]).unwrap(), 0.5);
        assert_eq!(u.cdf(&[-7.0]).unwrap(), 0.0);
        assert_eq!(u.quantile(0.25, false).unwrap()[0], 0.0);
        assert_eq!(u.quantile(0.25, true).unwrap()[0], 2.0);
    }

    #[test]
    fn gamma_and_beta_marginals_match_kernels() {
        // shape 3, scale 2 at x = 2 (mpmath)
        let g = GammaMarginal::new(3.0, 2.0).unwrap();
        assert_close(g.pdf(&[2.0]).unwrap(), 0.09196986029286058, 1e-13);
        assert_close(g.cdf(&[2.0]).unwrap(), 0.08030139707139419, 1e-13);
        assert_close(g.quantile(0.9, false).unwrap()[0], 10.64464067566842, 1e-12);
        assert_eq!(g.range().lower()[0], 0.0);

        // Beta(2, 2) on [0, 2]: F(x) = 3u² - 2u³ with u = x/2
        let b = BetaMarginal::new(2.0, 2.0, 0.0, 2.0).unwrap();
        let u: f64 = 0.3;
        assert_close(b.cdf(&[0.6]).unwrap(), 3.0 * u * u - 2.0 * u * u * u, 1e-14);
        assert_close(b.pdf(&[0.6]).unwrap(), 6.0 * u * (1.0 - u) / 2.0, 1e-14);
        assert_close(b.quantile(0.5, false).unwrap()[0], 1.0, 1e-12);
    }

    #[test]
    fn student_marginal_values() {
        let s = StudentMarginal::new(4.5, 1.0, 2.0).unwrap();
        // t = 0.5 at ν = 4.5 (mpmath)
        assert_close(s.cdf(&[2.0]).unwrap(), 0.6797252489629765, 1e-13);
        assert_close(s.pdf(&[2.0]).unwrap(), 0.3253852064852856 / 2.0, 1e-13);
        assert_eq!(s.cdf(&[f64::INFINITY]).unwrap(), 1.0);
        assert_eq!(s.quantile(0.0, false).unwrap()[0], f64::NEG_INFINITY);
        assert_close(s.quantile(0.975, false).unwrap()[0], 1.0 + 2.0 * 2.658912347204404, 1e-12);
    }

    #[test]
    fn default_conditionals_of_a_marginal() {
        let n = NormalMarginal::new(0.0, 1.0).unwrap();
        assert_eq!(n.conditional_cdf(0.0, &[]).unwrap(), 0.5);
        assert_close(n.conditional_quantile(0.975, &[]).unwrap(), 1.959963984540054, 1e-12);
        assert!(matches!(
            n.conditional_cdf(0.0, &[1.0]),
            Err(KernelError::NotYetImplemented(_))
        ));
        assert!(n.has_independent_copula());
    }

    #[test]
    fn marginal_realizations_stay_in_support() {
        let mut g = RandomGenerator::from_seed(7);
        let b = BetaMarginal::new(0.5, 3.0, 2.0, 5.0).unwrap();
        for x in b.sample(&mut g, 200).unwrap() {
            assert!((2.0..=5.0).contains(&x[0]));
        }
        let u = UniformMarginal::new(0.0, 1.0).unwrap();
        let draws = u.sample(&mut g, 2000).unwrap();
        let mean = draws.iter().map(|v| v[0]).sum::<f64>() / 2000.0;
        assert!((mean - 0.5).abs() < 4.0 * (1.0f64 / 12.0 / 2000.0).sqrt());
    }

    #[test]
    fn descriptions() {
        let n = NormalMarginal::new(0.0, 1.0).unwrap().with_description("height");
        assert_eq!(n.description(), &["height".to_string()]);
    }
}
