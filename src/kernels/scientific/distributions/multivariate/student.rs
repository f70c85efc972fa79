// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Multivariate Student** - *μ + diag(σ) L Z / √(χ²_ν / ν)*
//!
//! Shares the dimension dispatch of [`super::Normal`]. The closed-form regime needs an
//! integral ν; other ν go straight to nested quadrature. An identity correlation does
//! not make the components independent here, it only lets realisations skip the
//! Cholesky product.

use log::{debug, warn};
use minarrow::Vec64;
use rand::RngCore;

use super::bivariate::{bivariate_student_cdf, trivariate_student_cdf};
use super::genz::{mvtdst, nested_student};
use super::monte_carlo::monte_carlo_probability;
use super::{
    CdfRegime, EllipticalCache, EllipticalParameters, ReducedBox, condition_on_prefix,
    default_description, integration_nodes, lattice_with_retries, reduce_box, reduced_structure,
    select_regime, solve_on_ray,
};
use crate::config::NumericalConfig;
use crate::errors::KernelError;
use crate::kernels::scientific::distributions::dist_func::check_probability;
use crate::kernels::scientific::distributions::dist_func::student::d_student;
use crate::kernels::scientific::distributions::distribution::{
    Distribution, Interval, StudentMarginal, check_conditioning, check_dimension, corner_probability,
    student_cdf, student_quantile,
};
use crate::kernels::scientific::distributions::shared::constants::LN_PI;
use crate::kernels::scientific::distributions::shared::sampler::{
    sample_gamma, standard_normal_vec, with_isolated_global,
};
use crate::kernels::scientific::linalg::{LowerTriangular, SquareMatrix};
use crate::kernels::scientific::quadrature::GaussLegendre;
use crate::kernels::scientific::special::gamma::ln_gamma;
use crate::utils::clamp_probability;

/// Largest ν handed to the finite-series bivariate and trivariate routines.
const MAXIMUM_CLOSED_FORM_NU: f64 = 10_000.0;

const MONTE_CARLO_BLOCK_SIZE: usize = 1_000;

/// Multivariate Student law with `nu` degrees of freedom.
#[derive(Debug, Clone)]
pub struct Student {
    nu: f64,
    params: EllipticalParameters,
    cache: EllipticalCache,
    config: NumericalConfig,
    range: Interval,
    description: Vec<String>,
}

impl Student {
    /// # Errors
    /// `InvalidArguments` unless `nu > 0`; see also [`EllipticalParameters::new`].
    pub fn new(nu: f64, mean: &[f64], sigma: &[f64], correlation: SquareMatrix) -> Result<Self, KernelError> {
        Self::with_config(nu, mean, sigma, correlation, NumericalConfig::DEFAULT)
    }

    pub fn with_config(
        nu: f64,
        mean: &[f64],
        sigma: &[f64],
        correlation: SquareMatrix,
        config: NumericalConfig,
    ) -> Result<Self, KernelError> {
        let params = EllipticalParameters::new(mean, sigma, correlation)?;
        Self::from_parameters(nu, params, config)
    }

    /// Standard Student in dimension `d`.
    pub fn standard(nu: f64, d: usize) -> Result<Self, KernelError> {
        Self::from_parameters(nu, EllipticalParameters::standard(d)?, NumericalConfig::DEFAULT)
    }

    pub fn from_parameters(
        nu: f64,
        params: EllipticalParameters,
        config: NumericalConfig,
    ) -> Result<Self, KernelError> {
        check_nu(nu)?;
        let cache = EllipticalCache::build(&params)?;
        let range = student_range(nu, &params, &config)?;
        let description = default_description(params.dimension());
        Ok(Student {
            nu,
            params,
            cache,
            config,
            range,
            description,
        })
    }

    pub fn with_description(mut self, description: Vec<String>) -> Result<Self, KernelError> {
        check_dimension("Student::with_description", self.dimension(), description.len())?;
        self.description = description;
        Ok(self)
    }

    #[inline]
    pub fn nu(&self) -> f64 {
        self.nu
    }

    pub fn parameters(&self) -> &EllipticalParameters {
        &self.params
    }

    /// Location vector μ.
    pub fn location(&self) -> &[f64] {
        self.params.mean()
    }

    pub fn sigma(&self) -> &[f64] {
        self.params.sigma()
    }

    pub fn correlation(&self) -> &SquareMatrix {
        self.params.correlation()
    }

    pub fn cholesky(&self) -> &LowerTriangular {
        &self.cache.cholesky
    }

    /// # Errors
    /// `InvalidArguments` unless `nu > 1`.
    pub fn mean(&self) -> Result<&[f64], KernelError> {
        if !(self.nu > 1.0) {
            return Err(KernelError::InvalidArguments(format!(
                "Student::mean: undefined for nu = {} <= 1",
                self.nu
            )));
        }
        Ok(self.params.mean())
    }

    /// `ν / (ν - 2) · diag(σ) R diag(σ)`.
    ///
    /// # Errors
    /// `InvalidArguments` unless `nu > 2`.
    pub fn covariance(&self) -> Result<SquareMatrix, KernelError> {
        if !(self.nu > 2.0) {
            return Err(KernelError::InvalidArguments(format!(
                "Student::covariance: undefined for nu = {} <= 2",
                self.nu
            )));
        }
        let mut c = self.params.scale_matrix();
        c.scale_in_place(self.nu / (self.nu - 2.0));
        Ok(c)
    }

    pub fn marginal(&self, i: usize) -> Result<StudentMarginal, KernelError> {
        if i >= self.dimension() {
            return Err(KernelError::OutOfBounds(format!(
                "Student::marginal: component {} of {}",
                i,
                self.dimension()
            )));
        }
        Ok(
            StudentMarginal::with_config(self.nu, self.location()[i], self.sigma()[i], &self.config)?
                .with_description(self.description[i].clone()),
        )
    }

    pub fn set_nu(&mut self, nu: f64) -> Result<(), KernelError> {
        check_nu(nu)?;
        let range = student_range(nu, &self.params, &self.config)?;
        self.nu = nu;
        self.range = range;
        Ok(())
    }

    pub fn set_location(&mut self, mean: &[f64]) -> Result<(), KernelError> {
        let params = EllipticalParameters::new(mean, self.sigma(), self.correlation().clone())?;
        self.rebuild(params)
    }

    pub fn set_sigma(&mut self, sigma: &[f64]) -> Result<(), KernelError> {
        let params = EllipticalParameters::new(self.location(), sigma, self.correlation().clone())?;
        self.rebuild(params)
    }

    pub fn set_correlation(&mut self, correlation: SquareMatrix) -> Result<(), KernelError> {
        let params = EllipticalParameters::new(self.location(), self.sigma(), correlation)?;
        self.rebuild(params)
    }

    fn rebuild(&mut self, params: EllipticalParameters) -> Result<(), KernelError> {
        let cache = EllipticalCache::build(&params)?;
        let range = student_range(self.nu, &params, &self.config)?;
        self.params = params;
        self.cache = cache;
        self.range = range;
        Ok(())
    }

    /// True when the bivariate and trivariate series apply.
    fn closed_form(&self) -> bool {
        self.nu.fract() == 0.0 && self.nu <= MAXIMUM_CLOSED_FORM_NU
    }

    /// P(lower ≤ Y ≤ upper) for the standardised Student vector with correlation `R`.
    pub(crate) fn standard_box_probability(&self, lower: &[f64], upper: &[f64]) -> Result<f64, KernelError> {
        const FNAME: &str = "Student::probability";
        let (lower, upper, kept) = match reduce_box(FNAME, lower, upper)? {
            ReducedBox::Empty => return Ok(0.0),
            ReducedBox::Full => return Ok(1.0),
            ReducedBox::Bounds { lower, upper, kept } => (lower, upper, kept),
        };
        let d = lower.len();
        let nu = self.nu;
        let settings = &self.config.student;
        let regime = select_regime(d, self.closed_form(), settings);
        debug!("{}: dimension {} with nu = {} evaluated with {:?}", FNAME, d, nu, regime);
        if regime == CdfRegime::Univariate {
            return student_interval(nu, lower[0], upper[0]);
        }
        let (r, l) = reduced_structure(self.params.correlation(), &self.cache, kept.as_deref())?;
        let p = match regime {
            CdfRegime::Univariate | CdfRegime::ClosedForm => {
                // integral and bounded by the closed-form check
                let n = nu as u32;
                corner_probability(&lower, &upper, |x| standard_orthant(n, &r, x))?
            }
            CdfRegime::GaussLegendre => {
                let rule = GaussLegendre::new(integration_nodes(FNAME, d, settings));
                nested_student(nu, &l, &lower, &upper, &rule)?
            }
            CdfRegime::Lattice => lattice_with_retries(FNAME, d, settings, |points, eps| {
                with_isolated_global(|g| mvtdst(nu, &l, &lower, &upper, points, eps, g))
            })?,
            CdfRegime::MonteCarlo => {
                warn!(
                    "{}: Monte Carlo estimate in dimension {}, slow and inaccurate for small probabilities",
                    FNAME, d
                );
                with_isolated_global(|g| {
                    monte_carlo_probability(g, MONTE_CARLO_BLOCK_SIZE, settings.maximum_number_of_points, |g| {
                        let y = l.mul_vec(&standard_normal_vec(g, d));
                        let s = (sample_gamma(g, 0.5 * nu, 2.0) / nu).sqrt();
                        y.iter()
                            .zip(lower.iter().zip(upper.iter()))
                            .all(|(v, (a, b))| *a * s <= *v && *v <= *b * s)
                    })
                })
            }
        };
        Ok(clamp_probability(p))
    }

    fn standard_cdf(&self, u: &[f64]) -> Result<f64, KernelError> {
        let lower = vec![f64::NEG_INFINITY; u.len()];
        self.standard_box_probability(&lower, u)
    }

    /// Degrees of freedom, location and scale of component `y.len()` given `y`.
    fn conditional_law(&self, fname: &str, y: &[f64]) -> Result<(f64, f64, f64), KernelError> {
        check_conditioning(fname, self.dimension(), y)?;
        let k = y.len();
        let (shift, lkk, delta2) = condition_on_prefix(&self.params, &self.cache, y);
        let nu_k = self.nu + k as f64;
        let (m, s) = (self.location()[k], self.sigma()[k]);
        let scale = s * lkk * ((self.nu + delta2) / nu_k).sqrt();
        Ok((nu_k, m + s * shift, scale))
    }
}

fn check_nu(nu: f64) -> Result<(), KernelError> {
    if !(nu > 0.0) || nu.is_infinite() {
        return Err(KernelError::InvalidArguments(format!(
            "Student: nu must be positive and finite, got {}",
            nu
        )));
    }
    Ok(())
}

fn student_range(nu: f64, params: &EllipticalParameters, config: &NumericalConfig) -> Result<Interval, KernelError> {
    let t = student_quantile(nu, config.dist_func.quantile_epsilon, true)?;
    let lower: Vec<f64> = params.mean().iter().zip(params.sigma()).map(|(m, s)| m - t * s).collect();
    let upper: Vec<f64> = params.mean().iter().zip(params.sigma()).map(|(m, s)| m + t * s).collect();
    Interval::new(&lower, &upper)
}

fn student_interval(nu: f64, a: f64, b: f64) -> Result<f64, KernelError> {
    if a >= b {
        return Ok(0.0);
    }
    let p = if a > 0.0 {
        student_cdf(nu, a, true)? - student_cdf(nu, b, true)?
    } else {
        student_cdf(nu, b, false)? - student_cdf(nu, a, false)?
    };
    Ok(p.max(0.0))
}

/// P(T ≤ x) for the standard Student with integral `nu` in dimension 1 to 3.
fn standard_orthant(nu: u32, r: &SquareMatrix, x: &[f64]) -> Result<f64, KernelError> {
    let n = nu as f64;
    Ok(match x.len() {
        1 => student_cdf(n, x[0], false)?,
        2 => bivariate_student_cdf(nu, x[0], x[1], r.get(0, 1), |t| {
            student_cdf(n, t, false).unwrap_or(f64::NAN)
        }),
        _ => trivariate_student_cdf(
            nu,
            [x[0], x[1], x[2]],
            [r.get(0, 1), r.get(0, 2), r.get(1, 2)],
            |t| student_cdf(n, t, false).unwrap_or(f64::NAN),
        ),
    })
}

impl Distribution for Student {
    fn class_name(&self) -> &'static str {
        "Student"
    }

    fn dimension(&self) -> usize {
        self.params.dimension()
    }

    fn description(&self) -> &[String] {
        &self.description
    }

    fn range(&self) -> &Interval {
        &self.range
    }

    fn pdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        Ok(self.log_pdf(x)?.exp())
    }

    fn log_pdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        let d = self.dimension();
        check_dimension("Student::log_pdf", d, x.len())?;
        let nu = self.nu;
        let df = d as f64;
        let q = self.cache.mahalanobis(&self.params.standardize(x));
        Ok(ln_gamma(0.5 * (nu + df)) - ln_gamma(0.5 * nu) - 0.5 * df * (nu.ln() + LN_PI)
            - self.cache.log_det_scale
            - 0.5 * (nu + df) * (q / nu).ln_1p())
    }

    fn cdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        check_dimension("Student::cdf", self.dimension(), x.len())?;
        self.standard_cdf(&self.params.standardize(x))
    }

    fn probability(&self, interval: &Interval) -> Result<f64, KernelError> {
        check_dimension("Student::probability", self.dimension(), interval.dimension())?;
        if interval.is_empty() {
            return Ok(0.0);
        }
        let lower = self.params.standardize(interval.lower());
        let upper = self.params.standardize(interval.upper());
        self.standard_box_probability(&lower, &upper)
    }

    fn quantile(&self, p: f64, tail: bool) -> Result<Vec64<f64>, KernelError> {
        const FNAME: &str = "Student::quantile";
        check_probability(FNAME, p)?;
        let d = self.dimension();
        let nu = self.nu;
        let q = if tail { 0.5 - p + 0.5 } else { p };
        let t = if q <= 0.0 {
            f64::NEG_INFINITY
        } else if q >= 1.0 {
            f64::INFINITY
        } else if d == 1 {
            student_quantile(nu, q, false)?
        } else {
            let lo = student_quantile(nu, q, false)? - 0.5;
            let hi = student_quantile(nu, (1.0 - q) / d as f64, true)? + 0.5;
            let start = student_quantile(nu, q.powf(1.0 / d as f64), false)?;
            solve_on_ray(FNAME, q, lo, hi, start, |t| self.standard_cdf(&vec![t; d]))?
        };
        Ok(self.params.destandardize(&vec![t; d]))
    }

    fn realization(&self, rng: &mut dyn RngCore) -> Result<Vec64<f64>, KernelError> {
        let d = self.dimension();
        let z = standard_normal_vec(rng, d);
        let s = (sample_gamma(rng, 0.5 * self.nu, 2.0) / self.nu).sqrt();
        let y: Vec64<f64> = if self.cache.independent {
            z.iter().map(|v| v / s).collect()
        } else {
            self.cache.cholesky.mul_vec(&z).iter().map(|v| v / s).collect()
        };
        Ok(self.params.destandardize(&y))
    }

    fn conditional_pdf(&self, x: f64, y: &[f64]) -> Result<f64, KernelError> {
        let (nu, m, s) = self.conditional_law("Student::conditional_pdf", y)?;
        Ok(d_student(nu, (x - m) / s)? / s)
    }

    fn conditional_cdf(&self, x: f64, y: &[f64]) -> Result<f64, KernelError> {
        let (nu, m, s) = self.conditional_law("Student::conditional_cdf", y)?;
        student_cdf(nu, (x - m) / s, false)
    }

    fn conditional_quantile(&self, q: f64, y: &[f64]) -> Result<f64, KernelError> {
        let (nu, m, s) = self.conditional_law("Student::conditional_quantile", y)?;
        Ok(m + s * student_quantile(nu, q, false)?)
    }

    fn has_independent_copula(&self) -> bool {
        self.dimension() == 1
    }
}
