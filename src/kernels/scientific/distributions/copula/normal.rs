// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Normal Copula** - *Gaussian Dependence of a Correlation Matrix*
//!
//! `C(u) = Φ_R(Φ⁻¹(u₁), …, Φ⁻¹(u_d))` with density
//! `exp(-½ zᵀ(R⁻¹ - I)z) / √det R` at `z = Φ⁻¹(u)`. Every operation maps to the
//! standard normal space and defers to [`Normal`].

use minarrow::Vec64;
use rand::RngCore;

use super::check_copula_dimension;
use crate::config::NumericalConfig;
use crate::errors::KernelError;
use crate::kernels::scientific::distributions::dist_func::normal::{p_normal, q_normal};
use crate::kernels::scientific::distributions::distribution::{
    Distribution, Interval, check_conditioning, check_dimension,
};
use crate::kernels::scientific::distributions::multivariate::{EllipticalParameters, Normal};
use crate::kernels::scientific::distributions::shared::constants::HALF_LOG_TWO_PI;
use crate::kernels::scientific::linalg::{LowerTriangular, SquareMatrix};

/// Gaussian copula.
#[derive(Debug, Clone)]
pub struct NormalCopula {
    normal: Normal,
    range: Interval,
}

impl NormalCopula {
    /// # Errors
    /// `InvalidArguments` for a correlation matrix that is not a positive-definite
    /// correlation matrix.
    pub fn new(correlation: SquareMatrix) -> Result<Self, KernelError> {
        Self::with_config(correlation, NumericalConfig::DEFAULT)
    }

    pub fn with_config(correlation: SquareMatrix, config: NumericalConfig) -> Result<Self, KernelError> {
        let d = correlation.dim();
        check_copula_dimension("NormalCopula::new", d)?;
        let params = EllipticalParameters::new(&vec![0.0; d], &vec![1.0; d], correlation)?;
        Ok(NormalCopula {
            normal: Normal::from_parameters(params, config)?,
            range: Interval::unit(d),
        })
    }

    pub fn correlation(&self) -> &SquareMatrix {
        self.normal.correlation()
    }

    /// Cholesky factor of the correlation matrix.
    pub fn cholesky(&self) -> &LowerTriangular {
        self.normal.cholesky()
    }

    /// Inverse Cholesky factor, the linear step of the Nataf transform.
    pub fn inverse_cholesky(&self) -> &LowerTriangular {
        self.normal.inverse_cholesky()
    }

    /// Standard normal law with the copula's correlation.
    pub fn standard_normal(&self) -> &Normal {
        &self.normal
    }
}

/// Φ⁻¹ on levels pulled inside (0, 1), so conditioning values stay finite.
#[inline]
fn interior_quantile(u: f64) -> Result<f64, KernelError> {
    q_normal(u.clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON), false)
}

fn to_standard(y: &[f64]) -> Result<Vec<f64>, KernelError> {
    y.iter().map(|&u| interior_quantile(u)).collect()
}

impl Distribution for NormalCopula {
    fn class_name(&self) -> &'static str {
        "NormalCopula"
    }

    fn dimension(&self) -> usize {
        self.range.dimension()
    }

    fn description(&self) -> &[String] {
        self.normal.description()
    }

    fn range(&self) -> &Interval {
        &self.range
    }

    fn pdf(&self, u: &[f64]) -> Result<f64, KernelError> {
        check_dimension("NormalCopula::pdf", self.dimension(), u.len())?;
        if u.iter().any(|v| !(*v > 0.0 && *v < 1.0)) {
            return Ok(0.0);
        }
        Ok(self.log_pdf(u)?.exp())
    }

    fn log_pdf(&self, u: &[f64]) -> Result<f64, KernelError> {
        check_dimension("NormalCopula::log_pdf", self.dimension(), u.len())?;
        if u.iter().any(|v| !(*v > 0.0 && *v < 1.0)) {
            return Ok(f64::NEG_INFINITY);
        }
        let z = u.iter().map(|&v| q_normal(v, false)).collect::<Result<Vec<f64>, _>>()?;
        let marginal: f64 = z.iter().map(|v| -0.5 * v * v - HALF_LOG_TWO_PI).sum();
        Ok(self.normal.log_pdf(&z)? - marginal)
    }

    fn cdf(&self, u: &[f64]) -> Result<f64, KernelError> {
        check_dimension("NormalCopula::cdf", self.dimension(), u.len())?;
        if u.iter().any(|v| v.is_nan()) {
            return Err(KernelError::InvalidArguments("NormalCopula::cdf: NaN coordinate".into()));
        }
        if u.iter().any(|v| *v <= 0.0) {
            return Ok(0.0);
        }
        let z = u.iter().map(|v| q_normal(v.min(1.0), false)).collect::<Result<Vec<f64>, _>>()?;
        self.normal.standard_cdf(&z)
    }

    fn probability(&self, interval: &Interval) -> Result<f64, KernelError> {
        check_dimension("NormalCopula::probability", self.dimension(), interval.dimension())?;
        let clipped = interval.intersect(&self.range)?;
        if clipped.is_empty() {
            return Ok(0.0);
        }
        let lower = clipped.lower().iter().map(|&v| q_normal(v, false)).collect::<Result<Vec<f64>, _>>()?;
        let upper = clipped.upper().iter().map(|&v| q_normal(v, false)).collect::<Result<Vec<f64>, _>>()?;
        self.normal.standard_box_probability(&lower, &upper)
    }

    fn quantile(&self, p: f64, tail: bool) -> Result<Vec64<f64>, KernelError> {
        let z = self.normal.quantile(p, tail)?;
        Ok(z.iter().map(|&v| p_normal(v, false)).collect())
    }

    fn realization(&self, rng: &mut dyn RngCore) -> Result<Vec64<f64>, KernelError> {
        let z = self.normal.realization(rng)?;
        Ok(z.iter().map(|&v| p_normal(v, false)).collect())
    }

    fn conditional_pdf(&self, x: f64, y: &[f64]) -> Result<f64, KernelError> {
        check_conditioning("NormalCopula::conditional_pdf", self.dimension(), y)?;
        if !(x > 0.0 && x < 1.0) {
            return Ok(0.0);
        }
        let z = q_normal(x, false)?;
        let density = self.normal.conditional_pdf(z, &to_standard(y)?)?;
        Ok(density / (-0.5 * z * z - HALF_LOG_TWO_PI).exp())
    }

    fn conditional_cdf(&self, x: f64, y: &[f64]) -> Result<f64, KernelError> {
        check_conditioning("NormalCopula::conditional_cdf", self.dimension(), y)?;
        if x <= 0.0 {
            return Ok(0.0);
        }
        if x >= 1.0 {
            return Ok(1.0);
        }
        self.normal.conditional_cdf(q_normal(x, false)?, &to_standard(y)?)
    }

    fn conditional_quantile(&self, q: f64, y: &[f64]) -> Result<f64, KernelError> {
        check_conditioning("NormalCopula::conditional_quantile", self.dimension(), y)?;
        let z = self.normal.conditional_quantile(q, &to_standard(y)?)?;
        Ok(p_normal(z, false))
    }

    fn has_independent_copula(&self) -> bool {
        self.normal.has_independent_copula()
    }
}
