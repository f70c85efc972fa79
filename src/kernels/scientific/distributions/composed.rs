// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Composed Distribution** - *Marginals Joined by a Copula*
//!
//! Joint law of `X = (F₁⁻¹(U₁), …, F_d⁻¹(U_d))` with `U` distributed by a copula:
//!
//! - `pdf(x) = c(F₁(x₁), …, F_d(x_d)) · Π fᵢ(xᵢ)`
//! - `cdf(x) = C(F₁(x₁), …, F_d(x_d))`
//!
//! An independent copula skips the copula entirely and takes plain products of the
//! marginal values, which is both the cheap path and the exact definition of that case.
//!
//! ## Iso-probabilistic transform
//! Maps `x` to a standard normal vector `z`:
//! - independent copula: `zᵢ = Φ⁻¹(Fᵢ(xᵢ))`;
//! - normal copula (Nataf): `z = L⁻¹ Φ⁻¹(F(x))` with `R = L Lᵀ`;
//! - any other copula (Rosenblatt): `z_k = Φ⁻¹(F(x_k | x₁, …, x_{k-1}))`.

use log::info;
use minarrow::Vec64;
use rand::RngCore;

use crate::errors::{KernelError, log_length_mismatch};
use crate::kernels::scientific::distributions::copula::Copula;
use crate::kernels::scientific::distributions::dist_func::normal::{p_normal, q_normal};
use crate::kernels::scientific::distributions::distribution::{
    Distribution, Interval, check_conditioning, check_dimension,
};

/// Joint distribution built from 1-D marginals and a copula.
#[derive(Debug)]
pub struct ComposedDistribution {
    marginals: Vec<Box<dyn Distribution>>,
    copula: Copula,
    range: Interval,
    description: Vec<String>,
}

impl ComposedDistribution {
    /// # Errors
    /// - `InvalidArguments` when there are no marginals or one of them is not 1-D.
    /// - `LengthMismatch` when the copula dimension differs from the marginal count.
    pub fn new(marginals: Vec<Box<dyn Distribution>>, copula: Copula) -> Result<Self, KernelError> {
        if marginals.is_empty() {
            return Err(KernelError::InvalidArguments(
                "ComposedDistribution: at least one marginal is required".into(),
            ));
        }
        if let Some((i, m)) = marginals.iter().enumerate().find(|(_, m)| m.dimension() != 1) {
            return Err(KernelError::InvalidArguments(format!(
                "ComposedDistribution: marginal {} ({}) has dimension {}, expected 1",
                i,
                m.class_name(),
                m.dimension()
            )));
        }
        if copula.dimension() != marginals.len() {
            return Err(KernelError::LengthMismatch(log_length_mismatch(
                "ComposedDistribution::new".into(),
                marginals.len(),
                copula.dimension(),
            )));
        }
        let description = marginals
            .iter()
            .enumerate()
            .map(|(i, m)| match m.description().first() {
                Some(label) if !label.is_empty() => label.clone(),
                _ => {
                    info!(
                        "ComposedDistribution: marginal {} has no description, using {}",
                        i,
                        m.class_name()
                    );
                    m.class_name().to_string()
                }
            })
            .collect();
        let lower: Vec<f64> = marginals.iter().map(|m| m.range().lower()[0]).collect();
        let upper: Vec<f64> = marginals.iter().map(|m| m.range().upper()[0]).collect();
        let range = Interval::new(&lower, &upper)?;
        Ok(ComposedDistribution {
            marginals,
            copula,
            range,
            description,
        })
    }

    /// Marginals joined by the independent copula.
    pub fn independent(marginals: Vec<Box<dyn Distribution>>) -> Result<Self, KernelError> {
        let copula = Copula::independent(marginals.len())?;
        Self::new(marginals, copula)
    }

    pub fn marginals(&self) -> &[Box<dyn Distribution>] {
        &self.marginals
    }

    pub fn marginal(&self, i: usize) -> Result<&dyn Distribution, KernelError> {
        self.marginals.get(i).map(|m| m.as_ref()).ok_or_else(|| {
            KernelError::OutOfBounds(format!(
                "ComposedDistribution::marginal: component {} of {}",
                i,
                self.marginals.len()
            ))
        })
    }

    pub fn copula(&self) -> &Copula {
        &self.copula
    }

    /// `(F₁(x₁), …, F_d(x_d))`.
    fn to_unit(&self, x: &[f64]) -> Result<Vec64<f64>, KernelError> {
        self.marginals.iter().zip(x).map(|(m, &v)| m.cdf(&[v])).collect()
    }

    /// `(F₁⁻¹(u₁), …, F_d⁻¹(u_d))`.
    fn from_unit(&self, u: &[f64]) -> Result<Vec64<f64>, KernelError> {
        self.marginals
            .iter()
            .zip(u)
            .map(|(m, &v)| Ok(m.quantile(v.clamp(0.0, 1.0), false)?[0]))
            .collect()
    }

    /// Image of `x` in the standard normal space.
    pub fn iso_probabilistic_transform(&self, x: &[f64]) -> Result<Vec64<f64>, KernelError> {
        check_dimension("ComposedDistribution::iso_probabilistic_transform", self.dimension(), x.len())?;
        match &self.copula {
            Copula::Normal(c) if !c.has_independent_copula() => {
                let y = self.standard_marginals(x)?;
                Ok(c.inverse_cholesky().mul_vec(&y))
            }
            c if c.has_independent_copula() => self.standard_marginals(x),
            _ => {
                let mut z = Vec64::with_capacity(x.len());
                for k in 0..x.len() {
                    let u = self.conditional_cdf(x[k], &x[..k])?;
                    z.push(q_normal(u, false)?);
                }
                Ok(z)
            }
        }
    }

    /// Inverse of [`Self::iso_probabilistic_transform`].
    pub fn inverse_iso_probabilistic_transform(&self, z: &[f64]) -> Result<Vec64<f64>, KernelError> {
        check_dimension(
            "ComposedDistribution::inverse_iso_probabilistic_transform",
            self.dimension(),
            z.len(),
        )?;
        match &self.copula {
            Copula::Normal(c) if !c.has_independent_copula() => {
                let y = c.cholesky().mul_vec(z);
                let u: Vec<f64> = y.iter().map(|&v| p_normal(v, false)).collect();
                self.from_unit(&u)
            }
            c if c.has_independent_copula() => {
                let u: Vec<f64> = z.iter().map(|&v| p_normal(v, false)).collect();
                self.from_unit(&u)
            }
            _ => {
                let mut x = Vec64::with_capacity(z.len());
                for k in 0..z.len() {
                    let xk = self.conditional_quantile(p_normal(z[k], false), &x[..k])?;
                    x.push(xk);
                }
                Ok(x)
            }
        }
    }

    /// `Φ⁻¹(Fᵢ(xᵢ))` per component.
    fn standard_marginals(&self, x: &[f64]) -> Result<Vec64<f64>, KernelError> {
        self.to_unit(x)?.iter().map(|&u| q_normal(u, false)).collect()
    }
}

impl Distribution for ComposedDistribution {
    fn class_name(&self) -> &'static str {
        "ComposedDistribution"
    }

    fn dimension(&self) -> usize {
        self.marginals.len()
    }

    fn description(&self) -> &[String] {
        &self.description
    }

    fn range(&self) -> &Interval {
        &self.range
    }

    fn pdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        check_dimension("ComposedDistribution::pdf", self.dimension(), x.len())?;
        let mut product = 1.0;
        for (m, &v) in self.marginals.iter().zip(x) {
            product *= m.pdf(&[v])?;
        }
        if self.copula.has_independent_copula() || product == 0.0 {
            return Ok(product);
        }
        Ok(self.copula.pdf(&self.to_unit(x)?)? * product)
    }

    fn log_pdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        check_dimension("ComposedDistribution::log_pdf", self.dimension(), x.len())?;
        let mut sum = 0.0;
        for (m, &v) in self.marginals.iter().zip(x) {
            sum += m.log_pdf(&[v])?;
        }
        if self.copula.has_independent_copula() || sum == f64::NEG_INFINITY {
            return Ok(sum);
        }
        Ok(self.copula.log_pdf(&self.to_unit(x)?)? + sum)
    }

    fn cdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        check_dimension("ComposedDistribution::cdf", self.dimension(), x.len())?;
        if self.copula.has_independent_copula() {
            let mut product = 1.0;
            for (m, &v) in self.marginals.iter().zip(x) {
                product *= m.cdf(&[v])?;
            }
            return Ok(product);
        }
        self.copula.cdf(&self.to_unit(x)?)
    }

    fn probability(&self, interval: &Interval) -> Result<f64, KernelError> {
        check_dimension("ComposedDistribution::probability", self.dimension(), interval.dimension())?;
        if interval.is_empty() {
            return Ok(0.0);
        }
        if self.copula.has_independent_copula() {
            let mut product = 1.0;
            for (i, m) in self.marginals.iter().enumerate() {
                product *= m.probability(&Interval::segment(interval.lower()[i], interval.upper()[i]))?;
            }
            return Ok(product);
        }
        let lower = self.to_unit(interval.lower())?;
        let upper = self.to_unit(interval.upper())?;
        self.copula.probability(&Interval::new(&lower, &upper)?)
    }

    fn quantile(&self, p: f64, tail: bool) -> Result<Vec64<f64>, KernelError> {
        let u = self.copula.quantile(p, tail)?;
        self.from_unit(&u)
    }

    fn realization(&self, rng: &mut dyn RngCore) -> Result<Vec64<f64>, KernelError> {
        let u = self.copula.realization(rng)?;
        self.from_unit(&u)
    }

    fn conditional_pdf(&self, x: f64, y: &[f64]) -> Result<f64, KernelError> {
        check_conditioning("ComposedDistribution::conditional_pdf", self.dimension(), y)?;
        let m = &self.marginals[y.len()];
        let density = m.pdf(&[x])?;
        if self.copula.has_independent_copula() || density == 0.0 {
            return Ok(density);
        }
        let uy = self.to_unit(y)?;
        Ok(self.copula.conditional_pdf(m.cdf(&[x])?, &uy)? * density)
    }

    fn conditional_cdf(&self, x: f64, y: &[f64]) -> Result<f64, KernelError> {
        check_conditioning("ComposedDistribution::conditional_cdf", self.dimension(), y)?;
        let m = &self.marginals[y.len()];
        if self.copula.has_independent_copula() {
            return m.cdf(&[x]);
        }
        let uy = self.to_unit(y)?;
        self.copula.conditional_cdf(m.cdf(&[x])?, &uy)
    }

    fn conditional_quantile(&self, q: f64, y: &[f64]) -> Result<f64, KernelError> {
        check_conditioning("ComposedDistribution::conditional_quantile", self.dimension(), y)?;
        let m = &self.marginals[y.len()];
        let u = if self.copula.has_independent_copula() {
            q
        } else {
            self.copula.conditional_quantile(q, &self.to_unit(y)?)?
        };
        Ok(m.quantile(u, false)?[0])
    }

    fn has_independent_copula(&self) -> bool {
        self.copula.has_independent_copula()
    }
}
