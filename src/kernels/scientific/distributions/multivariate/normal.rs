// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Multivariate Normal** - *N(μ, diag(σ) R diag(σ))*
//!
//! Density, CDF and box probabilities with dimension dispatch, the diagonal
//! iso-quantile, Cholesky realisations and the exact conditional law of a
//! component given its predecessors.

use log::{debug, warn};
use minarrow::Vec64;
use rand::RngCore;

use super::bivariate::{bivariate_normal_cdf, trivariate_normal_cdf};
use super::genz::{mvndst, nested_normal};
use super::monte_carlo::monte_carlo_probability;
use super::{
    CdfRegime, EllipticalCache, EllipticalParameters, ReducedBox, condition_on_prefix,
    default_description, integration_nodes, lattice_with_retries, reduce_box, reduced_structure,
    select_regime, solve_on_ray,
};
use crate::config::NumericalConfig;
use crate::errors::KernelError;
use crate::kernels::scientific::distributions::dist_func::check_probability;
use crate::kernels::scientific::distributions::dist_func::normal::{d_normal, p_normal, q_normal};
use crate::kernels::scientific::distributions::distribution::{
    Distribution, Interval, NormalMarginal, check_conditioning, check_dimension, corner_probability,
};
use crate::kernels::scientific::distributions::shared::constants::HALF_LOG_TWO_PI;
use crate::kernels::scientific::distributions::shared::sampler::{standard_normal_vec, with_isolated_global};
use crate::kernels::scientific::linalg::{LowerTriangular, SquareMatrix};
use crate::kernels::scientific::quadrature::GaussLegendre;
use crate::utils::clamp_probability;

/// Indicator draws per Monte Carlo block.
const MONTE_CARLO_BLOCK_SIZE: usize = 1_000;

/// Multivariate normal law.
#[derive(Debug, Clone)]
pub struct Normal {
    params: EllipticalParameters,
    cache: EllipticalCache,
    config: NumericalConfig,
    range: Interval,
    description: Vec<String>,
}

impl Normal {
    /// # Errors
    /// See [`EllipticalParameters::new`]; also `InvalidArguments` when `correlation`
    /// is not positive-definite.
    pub fn new(mean: &[f64], sigma: &[f64], correlation: SquareMatrix) -> Result<Self, KernelError> {
        Self::with_config(mean, sigma, correlation, NumericalConfig::DEFAULT)
    }

    pub fn with_config(
        mean: &[f64],
        sigma: &[f64],
        correlation: SquareMatrix,
        config: NumericalConfig,
    ) -> Result<Self, KernelError> {
        let params = EllipticalParameters::new(mean, sigma, correlation)?;
        Self::from_parameters(params, config)
    }

    /// Standard normal in dimension `d`.
    pub fn standard(d: usize) -> Result<Self, KernelError> {
        Self::from_parameters(EllipticalParameters::standard(d)?, NumericalConfig::DEFAULT)
    }

    pub fn from_parameters(params: EllipticalParameters, config: NumericalConfig) -> Result<Self, KernelError> {
        let cache = EllipticalCache::build(&params)?;
        let range = normal_range(&params, &config)?;
        let description = default_description(params.dimension());
        Ok(Normal {
            params,
            cache,
            config,
            range,
            description,
        })
    }

    /// Replaces the component labels.
    pub fn with_description(mut self, description: Vec<String>) -> Result<Self, KernelError> {
        check_dimension("Normal::with_description", self.dimension(), description.len())?;
        self.description = description;
        Ok(self)
    }

    pub fn parameters(&self) -> &EllipticalParameters {
        &self.params
    }

    pub fn config(&self) -> &NumericalConfig {
        &self.config
    }

    pub fn mean(&self) -> &[f64] {
        self.params.mean()
    }

    pub fn sigma(&self) -> &[f64] {
        self.params.sigma()
    }

    pub fn correlation(&self) -> &SquareMatrix {
        self.params.correlation()
    }

    pub fn covariance(&self) -> SquareMatrix {
        self.params.scale_matrix()
    }

    /// Cholesky factor of the correlation matrix.
    pub fn cholesky(&self) -> &LowerTriangular {
        &self.cache.cholesky
    }

    /// Inverse of the Cholesky factor of the correlation matrix.
    pub fn inverse_cholesky(&self) -> &LowerTriangular {
        &self.cache.inverse_cholesky
    }

    /// 1-D marginal of component `i`.
    pub fn marginal(&self, i: usize) -> Result<NormalMarginal, KernelError> {
        if i >= self.dimension() {
            return Err(KernelError::OutOfBounds(format!(
                "Normal::marginal: component {} of {}",
                i,
                self.dimension()
            )));
        }
        Ok(NormalMarginal::with_config(self.mean()[i], self.sigma()[i], &self.config)?
            .with_description(self.description[i].clone()))
    }

    pub fn set_mean(&mut self, mean: &[f64]) -> Result<(), KernelError> {
        let params = EllipticalParameters::new(mean, self.sigma(), self.correlation().clone())?;
        self.rebuild(params)
    }

    pub fn set_sigma(&mut self, sigma: &[f64]) -> Result<(), KernelError> {
        let params = EllipticalParameters::new(self.mean(), sigma, self.correlation().clone())?;
        self.rebuild(params)
    }

    pub fn set_correlation(&mut self, correlation: SquareMatrix) -> Result<(), KernelError> {
        let params = EllipticalParameters::new(self.mean(), self.sigma(), correlation)?;
        self.rebuild(params)
    }

    /// Swaps in new parameters together with everything derived from them.
    /// On error `self` is unchanged.
    fn rebuild(&mut self, params: EllipticalParameters) -> Result<(), KernelError> {
        let cache = EllipticalCache::build(&params)?;
        let range = normal_range(&params, &self.config)?;
        self.params = params;
        self.cache = cache;
        self.range = range;
        Ok(())
    }

    /// P(lower ≤ Y ≤ upper) for the standardised vector `Y ~ N(0, R)`.
    pub(crate) fn standard_box_probability(&self, lower: &[f64], upper: &[f64]) -> Result<f64, KernelError> {
        const FNAME: &str = "Normal::probability";
        if self.cache.independent {
            if lower.iter().chain(upper.iter()).any(|v| v.is_nan()) {
                return Err(KernelError::InvalidArguments(format!("{}: NaN coordinate", FNAME)));
            }
            let p = lower
                .iter()
                .zip(upper.iter())
                .map(|(&a, &b)| normal_interval(a, b))
                .product::<f64>();
            return Ok(clamp_probability(p));
        }
        let (lower, upper, kept) = match reduce_box(FNAME, lower, upper)? {
            ReducedBox::Empty => return Ok(0.0),
            ReducedBox::Full => return Ok(1.0),
            ReducedBox::Bounds { lower, upper, kept } => (lower, upper, kept),
        };
        let d = lower.len();
        let settings = &self.config.normal;
        let regime = select_regime(d, true, settings);
        debug!("{}: dimension {} evaluated with {:?}", FNAME, d, regime);
        if regime == CdfRegime::Univariate {
            return Ok(normal_interval(lower[0], upper[0]));
        }
        let (r, l) = reduced_structure(self.params.correlation(), &self.cache, kept.as_deref())?;
        let p = match regime {
            CdfRegime::Univariate | CdfRegime::ClosedForm => {
                corner_probability(&lower, &upper, |x| Ok(standard_orthant(&r, x)))?
            }
            CdfRegime::GaussLegendre => {
                let rule = GaussLegendre::new(integration_nodes(FNAME, d, settings));
                nested_normal(&l, &lower, &upper, &rule)
            }
            CdfRegime::Lattice => lattice_with_retries(FNAME, d, settings, |points, eps| {
                Ok(with_isolated_global(|g| mvndst(&l, &lower, &upper, points, eps, g)))
            })?,
            CdfRegime::MonteCarlo => {
                warn!(
                    "{}: Monte Carlo estimate in dimension {}, slow and inaccurate for small probabilities",
                    FNAME, d
                );
                with_isolated_global(|g| {
                    monte_carlo_probability(g, MONTE_CARLO_BLOCK_SIZE, settings.maximum_number_of_points, |g| {
                        let y = l.mul_vec(&standard_normal_vec(g, d));
                        y.iter()
                            .zip(lower.iter().zip(upper.iter()))
                            .all(|(v, (a, b))| a <= v && v <= b)
                    })
                })
            }
        };
        Ok(clamp_probability(p))
    }

    /// CDF of the standardised vector at `u`.
    pub(crate) fn standard_cdf(&self, u: &[f64]) -> Result<f64, KernelError> {
        let lower = vec![f64::NEG_INFINITY; u.len()];
        self.standard_box_probability(&lower, u)
    }

    /// Standardised location and scale of component `y.len()` given `y`.
    fn conditional_location_scale(&self, fname: &str, y: &[f64]) -> Result<(f64, f64), KernelError> {
        check_conditioning(fname, self.dimension(), y)?;
        let k = y.len();
        let (shift, lkk, _) = condition_on_prefix(&self.params, &self.cache, y);
        let (m, s) = (self.mean()[k], self.sigma()[k]);
        Ok((m + s * shift, s * lkk))
    }
}

/// Box outside which each component has tail mass below the configured epsilon.
fn normal_range(params: &EllipticalParameters, config: &NumericalConfig) -> Result<Interval, KernelError> {
    let z = q_normal(config.dist_func.quantile_epsilon, true)?;
    let lower: Vec<f64> = params.mean().iter().zip(params.sigma()).map(|(m, s)| m - z * s).collect();
    let upper: Vec<f64> = params.mean().iter().zip(params.sigma()).map(|(m, s)| m + z * s).collect();
    Interval::new(&lower, &upper)
}

/// Φ(b) - Φ(a), taken on the side where the two tails do not cancel.
#[inline]
pub(crate) fn normal_interval(a: f64, b: f64) -> f64 {
    if a >= b {
        return 0.0;
    }
    if a > 0.0 {
        p_normal(a, true) - p_normal(b, true)
    } else {
        p_normal(b, false) - p_normal(a, false)
    }
}

/// P(Y ≤ x) for `Y ~ N(0, R)` in dimension 1 to 3.
fn standard_orthant(r: &SquareMatrix, x: &[f64]) -> f64 {
    match x.len() {
        1 => p_normal(x[0], false),
        2 => bivariate_normal_cdf(x[0], x[1], r.get(0, 1)),
        _ => trivariate_normal_cdf([x[0], x[1], x[2]], [r.get(0, 1), r.get(0, 2), r.get(1, 2)]),
    }
}

impl Distribution for Normal {
    fn class_name(&self) -> &'static str {
        "Normal"
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
        check_dimension("Normal::log_pdf", d, x.len())?;
        let u = self.params.standardize(x);
        Ok(-(d as f64) * HALF_LOG_TWO_PI - self.cache.log_det_scale - 0.5 * self.cache.mahalanobis(&u))
    }

    fn cdf(&self, x: &[f64]) -> Result<f64, KernelError> {
        check_dimension("Normal::cdf", self.dimension(), x.len())?;
        self.standard_cdf(&self.params.standardize(x))
    }

    fn probability(&self, interval: &Interval) -> Result<f64, KernelError> {
        check_dimension("Normal::probability", self.dimension(), interval.dimension())?;
        if interval.is_empty() {
            return Ok(0.0);
        }
        let lower = self.params.standardize(interval.lower());
        let upper = self.params.standardize(interval.upper());
        self.standard_box_probability(&lower, &upper)
    }

    /// Point `μ + tσ` with `F(μ + tσ) = p`.
    fn quantile(&self, p: f64, tail: bool) -> Result<Vec64<f64>, KernelError> {
        const FNAME: &str = "Normal::quantile";
        check_probability(FNAME, p)?;
        let d = self.dimension();
        let q = if tail { 0.5 - p + 0.5 } else { p };
        let t = if q <= 0.0 {
            f64::NEG_INFINITY
        } else if q >= 1.0 {
            f64::INFINITY
        } else if d == 1 || self.cache.independent {
            q_normal(q.powf(1.0 / d as f64), false)?
        } else {
            // min(Φ(t)) ≥ F ≥ 1 - d(1 - Φ(t)) on the diagonal
            let lo = q_normal(q, false)? - 0.5;
            let hi = q_normal((1.0 - q) / d as f64, true)? + 0.5;
            let start = q_normal(q.powf(1.0 / d as f64), false)?;
            solve_on_ray(FNAME, q, lo, hi, start, |t| self.standard_cdf(&vec![t; d]))?
        };
        Ok(self.params.destandardize(&vec![t; d]))
    }

    fn realization(&self, rng: &mut dyn RngCore) -> Result<Vec64<f64>, KernelError> {
        let z = standard_normal_vec(rng, self.dimension());
        if self.cache.independent {
            return Ok(self.params.destandardize(&z));
        }
        Ok(self.params.destandardize(&self.cache.cholesky.mul_vec(&z)))
    }

    fn conditional_pdf(&self, x: f64, y: &[f64]) -> Result<f64, KernelError> {
        let (m, s) = self.conditional_location_scale("Normal::conditional_pdf", y)?;
        Ok(d_normal((x - m) / s) / s)
    }

    fn conditional_cdf(&self, x: f64, y: &[f64]) -> Result<f64, KernelError> {
        let (m, s) = self.conditional_location_scale("Normal::conditional_cdf", y)?;
        Ok(p_normal((x - m) / s, false))
    }

    fn conditional_quantile(&self, q: f64, y: &[f64]) -> Result<f64, KernelError> {
        let (m, s) = self.conditional_location_scale("Normal::conditional_quantile", y)?;
        Ok(m + s * q_normal(q, false)?)
    }

    fn has_independent_copula(&self) -> bool {
        self.cache.independent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::scientific::distributions::multivariate::bivariate::bvnd;
    use crate::kernels::scientific::distributions::shared::sampler::RandomGenerator;
    use crate::kernels::scientific::distributions::univariate::common::assert_close;

    fn equicorrelated(d: usize, r: f64) -> SquareMatrix {
        let mut m = SquareMatrix::identity(d);
        for i in 0..d {
            for j in 0..d {
                if i != j {
                    m.set(i, j, r);
                }
            }
        }
        m
    }

    /// Orthant P(Y ≤ 0) of an equicorrelated normal with correlation 1/2 is 1/(d+1).
    fn half_orthant(d: usize, config: NumericalConfig) -> f64 {
        let n = Normal::with_config(&vec![0.0; d], &vec![1.0; d], equicorrelated(d, 0.5), config).unwrap();
        n.cdf(&vec![0.0; d]).unwrap()
    }

    #[test]
    fn independent_quadrant() {
        let n = Normal::new(&[0.0, 0.0], &[1.0, 1.0], SquareMatrix::identity(2)).unwrap();
        assert_eq!(n.cdf(&[0.0, 0.0]).unwrap(), 0.25);
        assert!(n.has_independent_copula());
    }

    #[test]
    fn density_matches_closed_form() {
        let r = 0.6;
        let n = Normal::new(&[1.0, -1.0], &[2.0, 0.5], equicorrelated(2, r)).unwrap();
        let (x, y) = (2.0, -0.5);
        let (u, v) = ((x - 1.0) / 2.0, (y + 1.0) / 0.5);
        let q = (u * u - 2.0 * r * u * v + v * v) / (1.0 - r * r);
        let expected = (-0.5 * q).exp() / (2.0 * core::f64::consts::PI * 2.0 * 0.5 * (1.0 - r * r).sqrt());
        assert_close(n.pdf(&[x, y]).unwrap(), expected, 1e-13);
        assert!(n.pdf(&[1.0]).is_err());
    }

    #[test]
    fn bivariate_cdf_uses_closed_form() {
        let n = Normal::new(&[0.0, 0.0], &[1.0, 1.0], equicorrelated(2, 0.3)).unwrap();
        assert_close(n.cdf(&[0.5, -0.2]).unwrap(), bvnd(-0.5, 0.2, 0.3), 1e-14);
        assert_close(n.cdf(&[0.0, 0.0]).unwrap(), 0.25 + 0.3f64.asin() / (2.0 * core::f64::consts::PI), 1e-13);
    }

    #[test]
    fn orthants_across_regimes() {
        // closed form and nested Gauss-Legendre
        for d in 2..=5 {
            assert_close(half_orthant(d, NumericalConfig::DEFAULT), 1.0 / (d as f64 + 1.0), 1e-6);
        }
        // lattice
        let mut cfg = NumericalConfig::DEFAULT;
        cfg.normal.small_dimension = 3;
        cfg.normal.minimum_cdf_epsilon = 1e-4;
        cfg.normal.maximum_cdf_epsilon = 1e-3;
        cfg.normal.maximum_number_of_points = 1_000_000;
        assert_close(half_orthant(5, cfg), 1.0 / 6.0, 5e-3);
        // Monte Carlo
        let mut cfg = NumericalConfig::DEFAULT;
        cfg.normal.small_dimension = 2;
        cfg.normal.large_dimension = 3;
        cfg.normal.maximum_number_of_points = 200_000;
        assert_close(half_orthant(4, cfg), 0.2, 0.05);
    }

    #[test]
    fn unconstrained_coordinates_are_dropped() {
        let n = Normal::new(&[0.0; 3], &[1.0; 3], equicorrelated(3, 0.4)).unwrap();
        let inf = f64::INFINITY;
        let p = n
            .probability(&Interval::new(&[-inf, -inf, -inf], &[0.3, inf, -0.1]).unwrap())
            .unwrap();
        assert_close(p, bvnd(-0.3, 0.1, 0.4), 1e-13);
        assert_eq!(n.cdf(&[inf, inf, inf]).unwrap(), 1.0);
        assert_eq!(n.cdf(&[0.0, -inf, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn box_probability_of_independent_law() {
        let n = Normal::standard(2).unwrap();
        let i = Interval::new(&[-1.0, -1.0], &[1.0, 1.0]).unwrap();
        assert_close(n.probability(&i).unwrap(), 0.6826894921370859f64.powi(2), 1e-13);
    }

    #[test]
    fn box_probability_of_correlated_law() {
        let n = Normal::new(&[0.0, 0.0], &[1.0, 1.0], equicorrelated(2, -0.5)).unwrap();
        let (a, b) = ([-1.0, -0.5], [0.5, 2.0]);
        let expected = n.cdf(&[b[0], b[1]]).unwrap() - n.cdf(&[a[0], b[1]]).unwrap() - n.cdf(&[b[0], a[1]]).unwrap()
            + n.cdf(&[a[0], a[1]]).unwrap();
        let p = n.probability(&Interval::new(&a, &b).unwrap()).unwrap();
        assert_close(p, expected, 1e-13);
    }

    #[test]
    fn iso_quantile_inverts_cdf() {
        let n = Normal::new(&[1.0, 2.0, 3.0], &[1.0, 2.0, 0.5], equicorrelated(3, 0.3)).unwrap();
        for &p in &[0.05, 0.5, 0.9] {
            let x = n.quantile(p, false).unwrap();
            assert_close(n.cdf(&x).unwrap(), p, 1e-8);
            let t0 = x[0] - 1.0;
            assert_close((x[1] - 2.0) / 2.0, t0, 1e-12);
        }
        let x = n.quantile(0.0, false).unwrap();
        assert!(x.iter().all(|v| *v == f64::NEG_INFINITY));
        let x = n.quantile(0.0, true).unwrap();
        assert!(x.iter().all(|v| *v == f64::INFINITY));
        assert!(n.quantile(1.5, false).is_err());
    }

    #[test]
    fn independent_quantile_is_exact() {
        let n = Normal::standard(2).unwrap();
        let x = n.quantile(0.25, false).unwrap();
        assert_close(x[0], 0.0, 1e-15);
        assert_close(x[1], 0.0, 1e-15);
    }

    #[test]
    fn conditional_law_of_bivariate() {
        let r = 0.6;
        let n = Normal::new(&[1.0, -1.0], &[2.0, 0.5], equicorrelated(2, r)).unwrap();
        // X1 | X0 = 3 ~ N(-1 + 0.5·0.6·1, 0.5·0.8)
        let (m, s) = (-1.0 + 0.3, 0.4);
        assert_close(n.conditional_cdf(-0.5, &[3.0]).unwrap(), p_normal((-0.5 - m) / s, false), 1e-14);
        assert_close(n.conditional_pdf(-0.5, &[3.0]).unwrap(), d_normal((-0.5 - m) / s) / s, 1e-14);
        assert_close(n.conditional_quantile(0.975, &[3.0]).unwrap(), m + s * 1.959963984540054, 1e-12);
        // first component is its marginal
        assert_close(n.conditional_cdf(2.0, &[]).unwrap(), p_normal(0.5, false), 1e-15);
        assert!(matches!(n.conditional_cdf(0.0, &[1.0, 2.0]), Err(KernelError::OutOfBounds(_))));
    }

    #[test]
    fn realizations_have_target_moments() {
        let n = Normal::new(&[1.0, -2.0], &[2.0, 1.0], equicorrelated(2, 0.8)).unwrap();
        let mut rng = RandomGenerator::from_seed(11);
        let xs = n.sample(&mut rng, 20_000).unwrap();
        let m0 = xs.iter().map(|x| x[0]).sum::<f64>() / xs.len() as f64;
        let m1 = xs.iter().map(|x| x[1]).sum::<f64>() / xs.len() as f64;
        let c01 = xs.iter().map(|x| (x[0] - m0) * (x[1] - m1)).sum::<f64>() / xs.len() as f64;
        assert!((m0 - 1.0).abs() < 0.06);
        assert!((m1 + 2.0).abs() < 0.03);
        assert!((c01 - 1.6).abs() < 0.08, "{}", c01);
    }

    #[test]
    fn cdf_calls_leave_global_stream_untouched() {
        use crate::kernels::scientific::distributions::shared::sampler::with_global;
        let mut cfg = NumericalConfig::DEFAULT;
        cfg.normal.small_dimension = 3;
        cfg.normal.maximum_number_of_points = 100_000;
        let n = Normal::with_config(&[0.0; 4], &[1.0; 4], equicorrelated(4, 0.2), cfg).unwrap();
        let peek = || {
            with_global(|g| {
                let mut copy = g.clone();
                copy.uniform()
            })
        };
        let before = peek();
        n.cdf(&[0.1, 0.2, 0.3, 0.4]).unwrap();
        assert_eq!(before, peek());
    }

    #[test]
    fn setters_rebuild_derived_state() {
        let mut n = Normal::standard(2).unwrap();
        assert!(n.has_independent_copula());
        n.set_correlation(equicorrelated(2, 0.5)).unwrap();
        assert!(!n.has_independent_copula());
        assert_close(n.cdf(&[0.0, 0.0]).unwrap(), 1.0 / 3.0, 1e-13);
        n.set_sigma(&[2.0, 2.0]).unwrap();
        assert!(n.range().upper()[0] > 2.0 * 7.0);
        assert!(n.set_correlation(equicorrelated(2, 1.0)).is_err());
        assert_close(n.correlation().get(0, 1), 0.5, 0.0);
        let c = n.covariance();
        assert_close(c.get(0, 1), 2.0, 1e-15);
    }
}
