// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Incomplete Beta/Gamma Package** - *Forward Ratios and Generic CDF Inversion*
//!
//! Forward evaluators for the regularised incomplete beta and gamma functions, each
//! switching between series, continued fractions and asymptotic expansions by the
//! relative magnitude of the arguments, plus one bracket-and-refine solver reused by
//! every family to recover whichever argument of a CDF is unknown.
//!
//! ## Layout
//! - [`beta_inc`]: `I_x(a, b)` and its complement, together.
//! - [`gamma_inc`]: `P(a, x)`, `Q(a, x)` and the inverse in `x`.
//! - [`solver`]: monotone root finder over [`solver::MonotoneFunction`].
//! - [`cdf`]: per-family query enums; exactly one quantity is unknown per query.
//!
//! Failures are reported as [`CdfError`], which converts into
//! [`KernelError`](crate::errors::KernelError) at the crate boundary.

use core::fmt;
use std::error::Error;

use log::warn;

use crate::errors::KernelError;

pub mod beta_inc;
pub mod cdf;
pub(crate) mod elementary;
pub mod gamma_inc;
pub mod solver;

/// Which end of the search interval a failed bracket ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Lower,
    Upper,
}

/// Error type of the incomplete beta/gamma package.
#[derive(Debug, Clone, PartialEq)]
pub enum CdfError {
    /// An input is outside its domain, or the given probabilities do not sum to one.
    InvalidArgument(String),

    /// The target value lies beyond what the search interval can reach.
    /// `bound` is the interval end the search stopped at.
    OutOfBracket { side: Side, bound: f64 },

    /// The refinement stage ran out of iterations; `best` is the last bracket midpoint.
    NoConvergence { best: f64 },

    /// A forward evaluator failed numerically (underflow of a required term).
    Evaluator(String),
}

impl fmt::Display for CdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CdfError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            CdfError::OutOfBracket { side, bound } => {
                let side = match side {
                    Side::Lower => "lower",
                    Side::Upper => "upper",
                };
                write!(f, "answer appears to be beyond the {} bound {}", side, bound)
            }
            CdfError::NoConvergence { best } => {
                write!(f, "search did not converge (best estimate {})", best)
            }
            CdfError::Evaluator(msg) => write!(f, "evaluator failure: {}", msg),
        }
    }
}

impl Error for CdfError {}

impl From<CdfError> for KernelError {
    fn from(e: CdfError) -> Self {
        match e {
            CdfError::InvalidArgument(_) | CdfError::OutOfBracket { .. } => {
                KernelError::InvalidArguments(e.to_string())
            }
            CdfError::NoConvergence { .. } | CdfError::Evaluator(_) => {
                KernelError::Internal(e.to_string())
            }
        }
    }
}

/// Result alias used throughout the package.
pub type CdfResult<T> = Result<T, CdfError>;

/// Builds a [`CdfError::InvalidArgument`] prefixed with the calling routine.
#[inline]
pub(crate) fn invalid(fname: &str, msg: impl fmt::Display) -> CdfError {
    CdfError::InvalidArgument(format!("{}: {}", fname, msg))
}

/// Lifts a package result into the crate error type, keeping the best
/// estimate of a search that ran out of iterations instead of failing.
pub(crate) fn settle(fname: &str, r: CdfResult<f64>) -> Result<f64, KernelError> {
    match r {
        Err(CdfError::NoConvergence { best }) => {
            warn!("{}: search did not converge, returning best estimate {}", fname, best);
            Ok(best)
        }
        other => other.map_err(KernelError::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_conversion() {
        let e: KernelError = CdfError::OutOfBracket {
            side: Side::Upper,
            bound: 1e300,
        }
        .into();
        assert!(matches!(e, KernelError::InvalidArguments(_)));
        let e: KernelError = CdfError::NoConvergence { best: 0.5 }.into();
        assert!(matches!(e, KernelError::Internal(_)));
        assert_eq!(
            invalid("cdf_beta", "a must be positive").to_string(),
            "invalid argument: cdf_beta: a must be positive"
        );
    }

    #[test]
    fn settle_keeps_best_estimate() {
        assert_eq!(settle("q", Err(CdfError::NoConvergence { best: 0.25 })).unwrap(), 0.25);
        assert_eq!(settle("q", Ok(1.5)).unwrap(), 1.5);
        let e = settle("q", Err(CdfError::Evaluator("underflow".into()))).unwrap_err();
        assert!(matches!(e, KernelError::Internal(_)));
    }
}
