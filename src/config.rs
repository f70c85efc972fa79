// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

// These parameters should rarely need adjustment.

//! # **Configuration** - *Numerical Tolerances and Algorithm Switch-over Points*
//!
//! Named tolerances, iteration caps and sample budgets read by every numerical routine.
//! The defaults are exposed as constants and bundled into the immutable [`NumericalConfig`],
//! which distribution objects store by value and free functions read through
//! [`NumericalConfig::DEFAULT`].

/// Convergence threshold for special-function series, continued fractions and Newton loops.
pub const SPEC_FUNC_PRECISION: f64 = 2.0e-16;

/// Iteration cap for special-function series and Newton iterations.
pub const SPEC_FUNC_MAXIMUM_ITERATION: usize = 1000;

/// Convergence threshold for the univariate distribution primitives,
/// notably the non-central mixture summations.
pub const DIST_FUNC_PRECISION: f64 = 1.0e-14;

/// Iteration cap for the non-central mixture summations and rejection loops.
pub const DIST_FUNC_MAXIMUM_ITERATION: usize = 5000;

/// Tail mass left outside the numerical range of a distribution.
pub const DISTRIBUTION_QUANTILE_EPSILON: f64 = 1.0e-14;

/// Largest dimension handled by Gauss-Legendre product quadrature.
pub const NORMAL_SMALL_DIMENSION: usize = 6;

/// Largest dimension handled by the Genz lattice integrator; above it Monte Carlo is used.
pub const NORMAL_LARGE_DIMENSION: usize = 500;

/// Requested Gauss-Legendre nodes per axis before the total-budget clamp.
pub const NORMAL_MARGINAL_INTEGRATION_NODES: usize = 16;

/// Initial integration-point budget of the lattice integrator and Monte Carlo block size floor.
pub const NORMAL_MINIMUM_NUMBER_OF_POINTS: usize = 100_000;

/// Ceiling on the total number of integrand evaluations for any CDF regime.
pub const NORMAL_MAXIMUM_NUMBER_OF_POINTS: usize = 10_000_000;

/// Absolute precision requested from the lattice integrator at the small-dimension end.
pub const NORMAL_MINIMUM_CDF_EPSILON: f64 = 1.0e-15;

/// Absolute precision requested from the lattice integrator at the large-dimension end.
pub const NORMAL_MAXIMUM_CDF_EPSILON: f64 = 1.0e-5;

/// Which forward evaluator backs the incomplete beta and gamma functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncompleteEvaluator {
    /// Multi-regime evaluators of the incomplete beta/gamma package.
    Dcdflib,
    /// Plain power series and Lentz continued fractions.
    SeriesFallback,
}

/// Special-function tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecFuncSettings {
    pub precision: f64,
    pub maximum_iteration: usize,
    pub incomplete_evaluator: IncompleteEvaluator,
}

/// Univariate distribution primitive tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistFuncSettings {
    pub precision: f64,
    pub maximum_iteration: usize,
    /// Tail mass excluded when computing a distribution's numerical range.
    pub quantile_epsilon: f64,
}

/// Dimension thresholds and budgets of the multivariate elliptical CDF dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipticalSettings {
    pub small_dimension: usize,
    pub large_dimension: usize,
    pub marginal_integration_nodes: usize,
    pub minimum_number_of_points: usize,
    pub maximum_number_of_points: usize,
    pub minimum_cdf_epsilon: f64,
    pub maximum_cdf_epsilon: f64,
}

impl EllipticalSettings {
    pub const DEFAULT: EllipticalSettings = EllipticalSettings {
        small_dimension: NORMAL_SMALL_DIMENSION,
        large_dimension: NORMAL_LARGE_DIMENSION,
        marginal_integration_nodes: NORMAL_MARGINAL_INTEGRATION_NODES,
        minimum_number_of_points: NORMAL_MINIMUM_NUMBER_OF_POINTS,
        maximum_number_of_points: NORMAL_MAXIMUM_NUMBER_OF_POINTS,
        minimum_cdf_epsilon: NORMAL_MINIMUM_CDF_EPSILON,
        maximum_cdf_epsilon: NORMAL_MAXIMUM_CDF_EPSILON,
    };

    /// Absolute precision requested from the lattice integrator in dimension `d`,
    /// interpolated geometrically between the minimum and maximum epsilon over
    /// `(small_dimension, large_dimension]`.
    pub fn cdf_epsilon(&self, d: usize) -> f64 {
        let lo = self.small_dimension as f64;
        let hi = self.large_dimension as f64;
        if hi <= lo {
            return self.maximum_cdf_epsilon;
        }
        let t = ((d as f64 - lo) / (hi - lo)).clamp(0.0, 1.0);
        self.minimum_cdf_epsilon * (self.maximum_cdf_epsilon / self.minimum_cdf_epsilon).powf(t)
    }
}

impl Default for EllipticalSettings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Immutable numerical configuration.
///
/// Replaces a string-keyed global resource map with named fields. Copy it,
/// adjust the fields of interest and hand it to a constructor taking a config.
///
/// ```rust,ignore
/// use stat_kernels::config::NumericalConfig;
/// let mut cfg = NumericalConfig::DEFAULT;
/// cfg.normal.marginal_integration_nodes = 8;
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericalConfig {
    pub spec_func: SpecFuncSettings,
    pub dist_func: DistFuncSettings,
    pub normal: EllipticalSettings,
    pub student: EllipticalSettings,
}

impl NumericalConfig {
    pub const DEFAULT: NumericalConfig = NumericalConfig {
        spec_func: SpecFuncSettings {
            precision: SPEC_FUNC_PRECISION,
            maximum_iteration: SPEC_FUNC_MAXIMUM_ITERATION,
            incomplete_evaluator: IncompleteEvaluator::Dcdflib,
        },
        dist_func: DistFuncSettings {
            precision: DIST_FUNC_PRECISION,
            maximum_iteration: DIST_FUNC_MAXIMUM_ITERATION,
            quantile_epsilon: DISTRIBUTION_QUANTILE_EPSILON,
        },
        normal: EllipticalSettings::DEFAULT,
        student: EllipticalSettings::DEFAULT,
    };
}

impl Default for NumericalConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdf_epsilon_interpolates_geometrically() {
        let s = EllipticalSettings::DEFAULT;
        assert_eq!(s.cdf_epsilon(s.small_dimension), s.minimum_cdf_epsilon);
        assert!((s.cdf_epsilon(s.large_dimension) - s.maximum_cdf_epsilon).abs() < 1e-20);
        let mid = (s.small_dimension + s.large_dimension) / 2;
        let e = s.cdf_epsilon(mid);
        assert!(e > s.minimum_cdf_epsilon && e < s.maximum_cdf_epsilon);
        // geometric midpoint
        let t = (mid - s.small_dimension) as f64 / (s.large_dimension - s.small_dimension) as f64;
        let expect = (1e-15f64.ln() * (1.0 - t) + 1e-5f64.ln() * t).exp();
        assert!((e / expect - 1.0).abs() < 1e-10);
    }

    #[test]
    fn default_matches_constants() {
        let cfg = NumericalConfig::default();
        assert_eq!(cfg.spec_func.precision, 2.0e-16);
        assert_eq!(cfg.dist_func.maximum_iteration, 5000);
        assert_eq!(cfg.student, cfg.normal);
        assert_eq!(cfg.spec_func.incomplete_evaluator, IncompleteEvaluator::Dcdflib);
    }
}
