// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Copulas** - *Dependence Structures on the Unit Cube*
//!
//! A copula is a distribution on [0, 1]^d with uniform marginals. Three are provided:
//!
//! - [`IndependentCopula`]: the product copula, `C(u) = Π uᵢ`.
//! - [`NormalCopula`]: the Gaussian copula of a correlation matrix `R`.
//! - [`MinCopula`]: the comonotonic upper Fréchet bound, `C(u) = min uᵢ`.
//!
//! [`Copula`] gathers them behind one value so that
//! [`super::composed::ComposedDistribution`] can pick a specialised path per kind,
//! such as the Nataf transform for the normal copula.

use minarrow::Vec64;
use rand::RngCore;

use crate::errors::KernelError;
use crate::kernels::scientific::distributions::distribution::{Distribution, Interval};
use crate::kernels::scientific::linalg::SquareMatrix;

pub mod independent;
pub mod min;
pub mod normal;

pub use independent::IndependentCopula;
pub use min::MinCopula;
pub use normal::NormalCopula;

/// One of the supported copulas.
#[derive(Debug, Clone)]
pub enum Copula {
    Independent(IndependentCopula),
    Normal(NormalCopula),
    Min(MinCopula),
}

impl Copula {
    pub fn independent(d: usize) -> Result<Self, KernelError> {
        Ok(Copula::Independent(IndependentCopula::new(d)?))
    }

    pub fn normal(correlation: SquareMatrix) -> Result<Self, KernelError> {
        Ok(Copula::Normal(NormalCopula::new(correlation)?))
    }

    pub fn min(d: usize) -> Result<Self, KernelError> {
        Ok(Copula::Min(MinCopula::new(d)?))
    }

    #[inline]
    fn inner(&self) -> &dyn Distribution {
        match self {
            Copula::Independent(c) => c,
            Copula::Normal(c) => c,
            Copula::Min(c) => c,
        }
    }
}

impl From<IndependentCopula> for Copula {
    fn from(c: IndependentCopula) -> Self {
        Copula::Independent(c)
    }
}

impl From<NormalCopula> for Copula {
    fn from(c: NormalCopula) -> Self {
        Copula::Normal(c)
    }
}

impl From<MinCopula> for Copula {
    fn from(c: MinCopula) -> Self {
        Copula::Min(c)
    }
}

impl Distribution for Copula {
    fn class_name(&self) -> &'static str {
        self.inner().class_name()
    }

    fn dimension(&self) -> usize {
        self.inner().dimension()
    }

    fn description(&self) -> &[String] {
        self.inner().description()
    }

    fn range(&self) -> &Interval {
        self.inner().range()
    }

    fn pdf(&self, u: &[f64]) -> Result<f64, KernelError> {
        self.inner().pdf(u)
    }

    fn log_pdf(&self, u: &[f64]) -> Result<f64, KernelError> {
        self.inner().log_pdf(u)
    }

    fn cdf(&self, u: &[f64]) -> Result<f64, KernelError> {
        self.inner().cdf(u)
    }

    fn complementary_cdf(&self, u: &[f64]) -> Result<f64, KernelError> {
        self.inner().complementary_cdf(u)
    }

    fn probability(&self, interval: &Interval) -> Result<f64, KernelError> {
        self.inner().probability(interval)
    }

    fn quantile(&self, p: f64, tail: bool) -> Result<Vec64<f64>, KernelError> {
        self.inner().quantile(p, tail)
    }

    fn realization(&self, rng: &mut dyn RngCore) -> Result<Vec64<f64>, KernelError> {
        self.inner().realization(rng)
    }

    fn conditional_pdf(&self, x: f64, y: &[f64]) -> Result<f64, KernelError> {
        self.inner().conditional_pdf(x, y)
    }

    fn conditional_cdf(&self, x: f64, y: &[f64]) -> Result<f64, KernelError> {
        self.inner().conditional_cdf(x, y)
    }

    fn conditional_quantile(&self, q: f64, y: &[f64]) -> Result<f64, KernelError> {
        self.inner().conditional_quantile(q, y)
    }

    fn has_independent_copula(&self) -> bool {
        self.inner().has_independent_copula()
    }
}

/// Checks that a copula has at least one component.
pub(crate) fn check_copula_dimension(fname: &str, d: usize) -> Result<(), KernelError> {
    if d == 0 {
        return Err(KernelError::InvalidArguments(format!(
            "{}: dimension must be positive",
            fname
        )));
    }
    Ok(())
}

/// Product of the lengths of `[lower, upper] ∩ [0, 1]` per axis.
pub(crate) fn unit_box_volume(interval: &Interval) -> f64 {
    interval
        .lower()
        .iter()
        .zip(interval.upper())
        .map(|(a, b)| (b.min(1.0) - a.max(0.0)).max(0.0))
        .product()
}
