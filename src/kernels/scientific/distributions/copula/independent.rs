// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! Product copula `C(u) = Π uᵢ`.

use minarrow::Vec64;
use rand::RngCore;

use super::{check_copula_dimension, unit_box_volume};
use crate::errors::KernelError;
use crate::kernels::scientific::distributions::dist_func::check_probability;
use crate::kernels::scientific::distributions::dist_func::uniform::r_uniform;
use crate::kernels::scientific::distributions::distribution::{
    Distribution, Interval, check_conditioning, check_dimension,
};
use crate::kernels::scientific::distributions::multivariate::default_description;

/// Copula of mutually independent components.
#[derive(Debug, Clone)]
pub struct IndependentCopula {
    range: Interval,
    description: Vec<String>,
}

impl IndependentCopula {
    pub fn new(d: usize) -> Result<Self, KernelError> {
        check_copula_dimension("IndependentCopula::new", d)?;
        Ok(IndependentCopula {
            range: Interval::unit(d),
            description: default_description(d),
        })
    }
}

impl Distribution for IndependentCopula {
    fn class_name(&self) -> &'static str {
        "IndependentCopula"
    }

    fn dimension(&self) -> usize {
        self.range.dimension()
    }

    fn description(&self) -> &[String] {
        &self.description
    }

    fn range(&self) -> &Interval {
        &self.range
    }

    fn pdf(&self, u: &[f64]) -> Result<f64, KernelError> {
        check_dimension("IndependentCopula::pdf", self.dimension(), u.len())?;
        Ok(if self.range.contains(u) { 1.0 } else { 0.0 })
    }

    fn cdf(&self, u: &[f64]) -> Result<f64, KernelError> {
        check_dimension("IndependentCopula::cdf", self.dimension(), u.len())?;
        Ok(u.iter().map(|v| v.clamp(0.0, 1.0)).product())
    }

    fn probability(&self, interval: &Interval) -> Result<f64, KernelError> {
        check_dimension("IndependentCopula::probability", self.dimension(), interval.dimension())?;
        Ok(unit_box_volume(interval))
    }

    /// `(p^{1/d}, …, p^{1/d})`.
    fn quantile(&self, p: f64, tail: bool) -> Result<Vec64<f64>, KernelError> {
        check_probability("IndependentCopula::quantile", p)?;
        let q = if tail { 0.5 - p + 0.5 } else { p };
        let d = self.dimension();
        Ok((0..d).map(|_| q.powf(1.0 / d as f64)).collect())
    }

    fn realization(&self, rng: &mut dyn RngCore) -> Result<Vec64<f64>, KernelError> {
        (0..self.dimension()).map(|_| r_uniform(&mut *rng, 0.0, 1.0)).collect()
    }

    fn conditional_pdf(&self, x: f64, y: &[f64]) -> Result<f64, KernelError> {
        check_conditioning("IndependentCopula::conditional_pdf", self.dimension(), y)?;
        Ok(if (0.0..=1.0).contains(&x) { 1.0 } else { 0.0 })
    }

    fn conditional_cdf(&self, x: f64, y: &[f64]) -> Result<f64, KernelError> {
        check_conditioning("IndependentCopula::conditional_cdf", self.dimension(), y)?;
        Ok(x.clamp(0.0, 1.0))
    }

    fn conditional_quantile(&self, q: f64, y: &[f64]) -> Result<f64, KernelError> {
        check_conditioning("IndependentCopula::conditional_quantile", self.dimension(), y)?;
        check_probability("IndependentCopula::conditional_quantile", q)?;
        Ok(q)
    }

    fn has_independent_copula(&self) -> bool {
        true
    }
}
