// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Min Copula** - *Comonotonic Upper Fréchet Bound*
//!
//! All mass sits on the diagonal `u₁ = … = u_d`, so `C(u) = min uᵢ`. The law is
//! singular for `d > 1`: its density is 0 almost everywhere, and every component
//! given its predecessors is a point mass at their common value.

use minarrow::Vec64;
use rand::RngCore;

use super::check_copula_dimension;
use crate::errors::KernelError;
use crate::kernels::scientific::distributions::dist_func::check_probability;
use crate::kernels::scientific::distributions::dist_func::uniform::r_uniform;
use crate::kernels::scientific::distributions::distribution::{
    Distribution, Interval, check_conditioning, check_dimension,
};
use crate::kernels::scientific::distributions::multivariate::default_description;

/// Copula of perfectly positively dependent components.
#[derive(Debug, Clone)]
pub struct MinCopula {
    range: Interval,
    description: Vec<String>,
}

impl MinCopula {
    pub fn new(d: usize) -> Result<Self, KernelError> {
        check_copula_dimension("MinCopula::new", d)?;
        Ok(MinCopula {
            range: Interval::unit(d),
            description: default_description(d),
        })
    }

    /// Diagonal point `(u, …, u)`.
    fn diagonal(&self, u: f64) -> Vec64<f64> {
        (0..self.dimension()).map(|_| u).collect()
    }
}

impl Distribution for MinCopula {
    fn class_name(&self) -> &'static str {
        "MinCopula"
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

    /// 0 off the diagonal; the diagonal itself carries a singular mass.
    fn pdf(&self, u: &[f64]) -> Result<f64, KernelError> {
        check_dimension("MinCopula::pdf", self.dimension(), u.len())?;
        if self.dimension() == 1 && self.range.contains(u) {
            return Ok(1.0);
        }
        Ok(0.0)
    }

    fn cdf(&self, u: &[f64]) -> Result<f64, KernelError> {
        check_dimension("MinCopula::cdf", self.dimension(), u.len())?;
        let m = u.iter().fold(f64::INFINITY, |m, v| m.min(*v));
        Ok(m.clamp(0.0, 1.0))
    }

    /// Length of the diagonal segment inside the box.
    fn probability(&self, interval: &Interval) -> Result<f64, KernelError> {
        check_dimension("MinCopula::probability", self.dimension(), interval.dimension())?;
        let lo = interval.lower().iter().fold(0.0f64, |m, v| m.max(*v));
        let hi = interval.upper().iter().fold(1.0f64, |m, v| m.min(*v));
        Ok((hi - lo).max(0.0))
    }

    fn quantile(&self, p: f64, tail: bool) -> Result<Vec64<f64>, KernelError> {
        check_probability("MinCopula::quantile", p)?;
        Ok(self.diagonal(if tail { 0.5 - p + 0.5 } else { p }))
    }

    fn realization(&self, rng: &mut dyn RngCore) -> Result<Vec64<f64>, KernelError> {
        Ok(self.diagonal(r_uniform(rng, 0.0, 1.0)?))
    }

    fn conditional_pdf(&self, x: f64, y: &[f64]) -> Result<f64, KernelError> {
        check_conditioning("MinCopula::conditional_pdf", self.dimension(), y)?;
        if y.is_empty() && (0.0..=1.0).contains(&x) {
            return Ok(1.0);
        }
        Ok(0.0)
    }

    /// Step at the conditioning value: 1 once `x ≥ y₀`.
    fn conditional_cdf(&self, x: f64, y: &[f64]) -> Result<f64, KernelError> {
        check_conditioning("MinCopula::conditional_cdf", self.dimension(), y)?;
        match y.first() {
            None => Ok(x.clamp(0.0, 1.0)),
            Some(&y0) => Ok(if x >= y0 { 1.0 } else { 0.0 }),
        }
    }

    fn conditional_quantile(&self, q: f64, y: &[f64]) -> Result<f64, KernelError> {
        check_conditioning("MinCopula::conditional_quantile", self.dimension(), y)?;
        check_probability("MinCopula::conditional_quantile", q)?;
        Ok(y.first().copied().unwrap_or(q))
    }

    fn has_independent_copula(&self) -> bool {
        self.dimension() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::scientific::distributions::shared::sampler::RandomGenerator;

    #[test]
    fn cdf_is_minimum() {
        let c = MinCopula::new(3).unwrap();
        assert_eq!(c.cdf(&[0.4, 0.2, 0.9]).unwrap(), 0.2);
        assert_eq!(c.cdf(&[1.4, 1.2, 3.0]).unwrap(), 1.0);
        assert_eq!(c.pdf(&[0.4, 0.4, 0.4]).unwrap(), 0.0);
        assert_eq!(MinCopula::new(1).unwrap().pdf(&[0.4]).unwrap(), 1.0);
    }

    #[test]
    fn mass_on_the_diagonal() {
        let c = MinCopula::new(2).unwrap();
        let i = Interval::new(&[0.1, 0.3], &[0.6, 0.8]).unwrap();
        assert!((c.probability(&i).unwrap() - 0.3).abs() < 1e-15);
        let off = Interval::new(&[0.0, 0.5], &[0.4, 1.0]).unwrap();
        assert_eq!(c.probability(&off).unwrap(), 0.0);
        let mut rng = RandomGenerator::from_seed(8);
        let u = c.realization(&mut rng).unwrap();
        assert_eq!(u[0], u[1]);
        let q = c.quantile(0.3, false).unwrap();
        assert_eq!((q.len(), q[0], q[1]), (2, 0.3, 0.3));
    }

    #[test]
    fn degenerate_conditionals() {
        let c = MinCopula::new(3).unwrap();
        assert_eq!(c.conditional_cdf(0.4, &[0.5]).unwrap(), 0.0);
        assert_eq!(c.conditional_cdf(0.5, &[0.5, 0.5]).unwrap(), 1.0);
        assert_eq!(c.conditional_quantile(0.1, &[0.5]).unwrap(), 0.5);
        assert_eq!(c.conditional_quantile(0.1, &[]).unwrap(), 0.1);
        assert_eq!(c.conditional_pdf(0.5, &[0.5]).unwrap(), 0.0);
    }
}
