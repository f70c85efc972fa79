// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Univariate Distribution Primitives** - *Density, CDF, Quantile and Sampling per Family*
//!
//! Scalar functions named after what they compute:
//!
//! - `d_*`: probability density (or mass) function
//! - `p_*`: cumulative distribution function, with a `tail` flag selecting
//!   the complementary CDF computed directly rather than as `1 - p`
//! - `q_*`: quantile function, with the same `tail` convention
//! - `r_*`: a single variate drawn from a caller-supplied generator
//!
//! Families are parameterised in their standard form (unit scale, zero location);
//! location-scale wrappers live with the array kernels and distribution objects.
//!
//! ## Failure semantics
//! Invalid shape or degrees-of-freedom parameters and probabilities outside `[0, 1]`
//! return [`KernelError::InvalidArguments`]. Iterative summations and inversions that
//! exhaust their budget log a warning and return their best estimate.
//!
//! ## Modules
//! - **`normal`**, **`gamma`**, **`beta`**, **`student`**: d/p/q/r
//! - **`binomial`**, **`poisson`**: d/p/q/r
//! - **`non_central`**: non-central chi-square and Student d/p/q/r by
//!   Benton-Krishnamoorthy mixture summation
//! - **`kolmogorov`**: exact and asymptotic Kolmogorov statistic CDF
//! - **`dickey_fuller`**: asymptotic unit-root critical value interpolation
//! - **`uniform`**: continuous and discrete uniform variates

use crate::errors::KernelError;

pub mod beta;
pub mod binomial;
pub mod dickey_fuller;
pub mod gamma;
pub mod kolmogorov;
pub mod non_central;
pub mod normal;
pub mod poisson;
pub mod student;
pub mod uniform;

#[inline]
pub(crate) fn check_probability(fname: &str, p: f64) -> Result<(), KernelError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(KernelError::InvalidArguments(format!(
            "{}: probability {} outside [0, 1]",
            fname, p
        )));
    }
    Ok(())
}

#[inline]
pub(crate) fn check_positive(fname: &str, name: &str, v: f64) -> Result<(), KernelError> {
    if !(v > 0.0) || v.is_infinite() {
        return Err(KernelError::InvalidArguments(format!(
            "{}: {} must be positive and finite, got {}",
            fname, name, v
        )));
    }
    Ok(())
}

#[inline]
pub(crate) fn check_non_negative(fname: &str, name: &str, v: f64) -> Result<(), KernelError> {
    if !(v >= 0.0) || v.is_infinite() {
        return Err(KernelError::InvalidArguments(format!(
            "{}: {} must be non-negative and finite, got {}",
            fname, name, v
        )));
    }
    Ok(())
}

/// Picks the lower or upper member of a `(cdf, ccdf)` pair.
#[inline(always)]
pub(crate) fn select_tail((lower, upper): (f64, f64), tail: bool) -> f64 {
    if tail { upper } else { lower }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_checks() {
        assert!(check_probability("f", 0.0).is_ok());
        assert!(check_probability("f", 1.0).is_ok());
        assert!(check_probability("f", -1e-300).is_err());
        assert!(check_probability("f", f64::NAN).is_err());
        assert!(check_positive("f", "k", 0.0).is_err());
        assert!(check_positive("f", "k", f64::INFINITY).is_err());
        assert!(check_non_negative("f", "lambda", 0.0).is_ok());
        assert!(check_non_negative("f", "lambda", -0.5).is_err());
        assert_eq!(select_tail((0.25, 0.75), true), 0.75);
    }
}
