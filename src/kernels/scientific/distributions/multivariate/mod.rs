// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Multivariate Elliptical Distributions** - *Normal and Student with Dimension Dispatch*
//!
//! Both families are parameterised by a mean vector `μ`, a scale vector `σ` and a
//! correlation matrix `R`, with `X = μ + σ ∘ Y` and `Y` standard with correlation `R`.
//!
//! ## CDF and box probabilities
//! After standardisation, coordinates left unconstrained (`(-∞, +∞)`) are dropped and
//! the remaining problem is dispatched on its dimension `d`:
//!
//! | `d` | regime |
//! |---|---|
//! | 1 | univariate CDF |
//! | 2, 3 | bivariate / trivariate routines (Student: integral ν only) |
//! | ≤ `small_dimension` | nested Gauss-Legendre, nodes clamped to the point budget |
//! | ≤ `large_dimension` | randomised lattice, budget ×10 on each retry |
//! | above | Monte Carlo |
//!
//! The lattice and Monte Carlo regimes borrow the process-wide generator and restore
//! its state afterwards, so a CDF call never shifts the caller's random stream.
//!
//! ## Caching
//! Parameters are immutable values. The Cholesky factor, its inverse, the
//! log-determinant and the independence flag are derived once into a cache struct
//! and rebuilt wholesale by every setter.

use log::{debug, warn};
use minarrow::Vec64;

use crate::config::EllipticalSettings;
use crate::errors::{KernelError, log_length_mismatch};
use crate::kernels::scientific::distributions::dcdflib::solver::{Root, SolverSettings, solve};
use crate::kernels::scientific::distributions::dcdflib::{CdfError, settle};
use crate::kernels::scientific::linalg::{LowerTriangular, SquareMatrix};

pub mod bivariate;
pub mod genz;
pub mod monte_carlo;
pub mod normal;
pub mod student;

pub use normal::Normal;
pub use student::Student;

use genz::LatticeEstimate;

/// Tolerance on the diagonal and symmetry of a correlation matrix.
const CORRELATION_TOLERANCE: f64 = 1e-12;

/// Absolute and relative tolerance of the iso-quantile search along the ray `μ + tσ`.
const ISO_QUANTILE_TOLERANCE: f64 = 1e-10;

/// Mean, scale and correlation of an elliptical law.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipticalParameters {
    mean: Vec64<f64>,
    sigma: Vec64<f64>,
    correlation: SquareMatrix,
}

impl EllipticalParameters {
    /// # Errors
    /// - `LengthMismatch` when the three parameters disagree in dimension.
    /// - `InvalidArguments` for a non-finite mean, a non-positive scale, or a
    ///   correlation matrix that is not symmetric with unit diagonal and entries in [-1, 1].
    pub fn new(mean: &[f64], sigma: &[f64], correlation: SquareMatrix) -> Result<Self, KernelError> {
        let d = mean.len();
        if d == 0 {
            return Err(KernelError::InvalidArguments(
                "EllipticalParameters: dimension must be positive".into(),
            ));
        }
        for (what, len) in [("sigma", sigma.len()), ("correlation", correlation.dim())] {
            if len != d {
                return Err(KernelError::LengthMismatch(log_length_mismatch(
                    format!("EllipticalParameters::new ({})", what),
                    d,
                    len,
                )));
            }
        }
        if let Some(m) = mean.iter().find(|m| !m.is_finite()) {
            return Err(KernelError::InvalidArguments(format!(
                "EllipticalParameters: non-finite mean {}",
                m
            )));
        }
        if let Some(s) = sigma.iter().find(|s| !(**s > 0.0) || !s.is_finite()) {
            return Err(KernelError::InvalidArguments(format!(
                "EllipticalParameters: sigma must be positive and finite, got {}",
                s
            )));
        }
        if !correlation.is_symmetric(CORRELATION_TOLERANCE) {
            return Err(KernelError::InvalidArguments(
                "EllipticalParameters: correlation matrix is not symmetric".into(),
            ));
        }
        for j in 0..d {
            if (correlation.get(j, j) - 1.0).abs() > CORRELATION_TOLERANCE {
                return Err(KernelError::InvalidArguments(format!(
                    "EllipticalParameters: correlation diagonal entry {} is {}",
                    j,
                    correlation.get(j, j)
                )));
            }
            for i in 0..d {
                let r = correlation.get(i, j);
                if !(r.abs() <= 1.0) {
                    return Err(KernelError::InvalidArguments(format!(
                        "EllipticalParameters: correlation ({}, {}) = {} outside [-1, 1]",
                        i, j, r
                    )));
                }
            }
        }
        Ok(EllipticalParameters {
            mean: Vec64::from_slice(mean),
            sigma: Vec64::from_slice(sigma),
            correlation,
        })
    }

    /// Zero mean, unit scale, identity correlation.
    pub fn standard(d: usize) -> Result<Self, KernelError> {
        Self::new(&vec![0.0; d], &vec![1.0; d], SquareMatrix::identity(d))
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.mean.len()
    }

    #[inline]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    #[inline]
    pub fn sigma(&self) -> &[f64] {
        &self.sigma
    }

    #[inline]
    pub fn correlation(&self) -> &SquareMatrix {
        &self.correlation
    }

    /// `diag(σ) R diag(σ)`.
    pub fn scale_matrix(&self) -> SquareMatrix {
        self.correlation.scaled(&self.sigma)
    }

    /// `(x - μ) / σ` component-wise.
    pub(crate) fn standardize(&self, x: &[f64]) -> Vec64<f64> {
        x.iter()
            .zip(self.mean.iter().zip(self.sigma.iter()))
            .map(|(v, (m, s))| (v - m) / s)
            .collect()
    }

    /// `μ + σ ∘ y` component-wise.
    pub(crate) fn destandardize(&self, y: &[f64]) -> Vec64<f64> {
        y.iter()
            .zip(self.mean.iter().zip(self.sigma.iter()))
            .map(|(v, (m, s))| m + s * v)
            .collect()
    }
}

/// Facts derived from [`EllipticalParameters`], rebuilt on every parameter change.
#[derive(Debug, Clone)]
pub(crate) struct EllipticalCache {
    pub cholesky: LowerTriangular,
    pub inverse_cholesky: LowerTriangular,
    /// `ln det(diag(σ) L) = Σ ln σᵢ + Σ ln Lᵢᵢ`.
    pub log_det_scale: f64,
    pub independent: bool,
}

impl EllipticalCache {
    /// # Errors
    /// `InvalidArguments` when the correlation matrix is not positive-definite.
    pub fn build(params: &EllipticalParameters) -> Result<Self, KernelError> {
        let cholesky = params.correlation.cholesky()?;
        let inverse_cholesky = cholesky.inverse();
        let log_det_scale = params.sigma.iter().map(|s| s.ln()).sum::<f64>() + cholesky.log_det();
        Ok(EllipticalCache {
            cholesky,
            inverse_cholesky,
            log_det_scale,
            independent: params.correlation.is_diagonal(),
        })
    }

    /// `|L⁻¹ u|²` for a standardised point `u`.
    pub fn mahalanobis(&self, u: &[f64]) -> f64 {
        self.inverse_cholesky.mul_vec(u).iter().map(|w| w * w).sum()
    }
}

/// Default component labels `X0, X1, …`.
pub(crate) fn default_description(d: usize) -> Vec<String> {
    (0..d).map(|i| format!("X{}", i)).collect()
}

/// Algorithm chosen for a CDF or box probability of a given dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CdfRegime {
    Univariate,
    ClosedForm,
    GaussLegendre,
    Lattice,
    MonteCarlo,
}

/// Regime for dimension `d`. `closed_form` says whether the family has a
/// bivariate/trivariate routine for this problem.
pub fn select_regime(d: usize, closed_form: bool, settings: &EllipticalSettings) -> CdfRegime {
    if d <= 1 {
        CdfRegime::Univariate
    } else if closed_form && d <= 3 {
        CdfRegime::ClosedForm
    } else if d <= settings.small_dimension {
        CdfRegime::GaussLegendre
    } else if d <= settings.large_dimension {
        CdfRegime::Lattice
    } else {
        CdfRegime::MonteCarlo
    }
}

/// A standardised box after removing unconstrained coordinates.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ReducedBox {
    /// Probability 0.
    Empty,
    /// Probability 1.
    Full,
    /// The remaining bounds; `kept` lists the surviving coordinates when some were dropped.
    Bounds {
        lower: Vec64<f64>,
        upper: Vec64<f64>,
        kept: Option<Vec<usize>>,
    },
}

pub(crate) fn reduce_box(fname: &str, lower: &[f64], upper: &[f64]) -> Result<ReducedBox, KernelError> {
    if lower.iter().chain(upper.iter()).any(|v| v.is_nan()) {
        return Err(KernelError::InvalidArguments(format!("{}: NaN coordinate", fname)));
    }
    let mut kept = Vec::with_capacity(lower.len());
    for (i, (&a, &b)) in lower.iter().zip(upper.iter()).enumerate() {
        if a >= b || b == f64::NEG_INFINITY || a == f64::INFINITY {
            return Ok(ReducedBox::Empty);
        }
        if !(a == f64::NEG_INFINITY && b == f64::INFINITY) {
            kept.push(i);
        }
    }
    if kept.is_empty() {
        return Ok(ReducedBox::Full);
    }
    let all = kept.len() == lower.len();
    Ok(ReducedBox::Bounds {
        lower: kept.iter().map(|&i| lower[i]).collect(),
        upper: kept.iter().map(|&i| upper[i]).collect(),
        kept: if all { None } else { Some(kept) },
    })
}

/// Correlation and Cholesky factor of the coordinates kept by [`reduce_box`],
/// reusing the cached factor when nothing was dropped.
pub(crate) fn reduced_structure(
    correlation: &SquareMatrix,
    cache: &EllipticalCache,
    kept: Option<&[usize]>,
) -> Result<(SquareMatrix, LowerTriangular), KernelError> {
    match kept {
        None => Ok((correlation.clone(), cache.cholesky.clone())),
        Some(idx) => {
            let sub = correlation.select(idx);
            let l = sub.cholesky()?;
            Ok((sub, l))
        }
    }
}

/// Gauss-Legendre nodes per axis in dimension `d`: the requested count, capped
/// so that `nodes^d` stays within the point budget.
pub(crate) fn integration_nodes(fname: &str, d: usize, settings: &EllipticalSettings) -> usize {
    let requested = settings.marginal_integration_nodes.max(1);
    let allowed = ((settings.maximum_number_of_points as f64).powf(1.0 / d as f64) + 1e-9).floor() as usize;
    if allowed < requested {
        warn!(
            "{}: {} integration nodes per axis requested in dimension {}, using {} to stay within {} points",
            fname, requested, d, allowed.max(1), settings.maximum_number_of_points
        );
        return allowed.max(1);
    }
    requested
}

/// Runs the lattice integrator from the minimum point budget, multiplying it by ten
/// while the requested precision is not met and the ceiling allows.
///
/// # Errors
/// `Internal` when the integrator reports an `inform` other than 0 or 1.
pub(crate) fn lattice_with_retries<F>(
    fname: &str,
    d: usize,
    settings: &EllipticalSettings,
    mut integrate: F,
) -> Result<f64, KernelError>
where
    F: FnMut(usize, f64) -> Result<LatticeEstimate, KernelError>,
{
    let eps = settings.cdf_epsilon(d);
    let ceiling = settings.maximum_number_of_points.max(1);
    let mut points = settings.minimum_number_of_points.clamp(1, ceiling);
    loop {
        let r = integrate(points, eps)?;
        debug!(
            "{}: lattice with {} points gave {} (error {}, inform {})",
            fname, points, r.value, r.error, r.inform
        );
        match r.inform {
            0 => return Ok(r.value),
            1 if points < ceiling => points = points.saturating_mul(10).min(ceiling),
            1 => {
                warn!(
                    "{}: precision {} not reached in dimension {} after {} points, error estimate {}",
                    fname, eps, d, points, r.error
                );
                return Ok(r.value);
            }
            code => {
                return Err(KernelError::Internal(format!(
                    "{}: lattice integrator failed with inform {}",
                    fname, code
                )));
            }
        }
    }
}

/// Conditioning on the first `k = y.len()` coordinates.
///
/// Returns `(shift, l_kk, δ²)`: the standardised conditional location
/// `Σ_{j<k} L_kj z_j`, the conditional standard scale `L_kk`, and `δ² = Σ z_j²`,
/// where `z` solves the leading `k × k` block of `L z = (y - μ)/σ`.
pub(crate) fn condition_on_prefix(
    params: &EllipticalParameters,
    cache: &EllipticalCache,
    y: &[f64],
) -> (f64, f64, f64) {
    let k = y.len();
    let l = &cache.cholesky;
    let mut z = Vec::with_capacity(k);
    for i in 0..k {
        let u = (y[i] - params.mean[i]) / params.sigma[i];
        let s: f64 = (0..i).map(|j| l.get(i, j) * z[j]).sum();
        z.push((u - s) / l.get(i, i));
    }
    let shift = (0..k).map(|j| l.get(k, j) * z[j]).sum();
    let delta2 = z.iter().map(|v| v * v).sum();
    (shift, l.get(k, k), delta2)
}

/// Finds `t ∈ [lower, upper]` with `cdf_on_ray(t) = q`, for the iso-quantile `μ + tσ`.
///
/// A search that runs out of iterations logs and returns its best estimate.
pub(crate) fn solve_on_ray<F>(
    fname: &str,
    q: f64,
    lower: f64,
    upper: f64,
    start: f64,
    mut cdf_on_ray: F,
) -> Result<f64, KernelError>
where
    F: FnMut(f64) -> Result<f64, KernelError>,
{
    let settings = SolverSettings {
        abs_tol: ISO_QUANTILE_TOLERANCE,
        rel_tol: ISO_QUANTILE_TOLERANCE,
        ..SolverSettings::bounded(lower, upper)
    };
    let mut f = |t: f64| cdf_on_ray(t).map_err(|e| CdfError::Evaluator(e.to_string()));
    let root = solve(&mut f, q, start.clamp(lower, upper), &settings);
    settle(fname, root.and_then(Root::into_result))
}
