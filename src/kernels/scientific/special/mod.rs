// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Special Functions** - *Multi-regime Scalar Transcendental Functions*
//!
//! Scalar special functions evaluated to near double precision over their whole
//! domain. Each function picks among a handful of regimes by argument magnitude:
//! power series close to the origin, continued fractions or recurrences in the
//! middle, asymptotic expansions far out.
//!
//! ## Modules
//! - **`gamma`**: real and complex Gamma, log-Gamma, digamma, trigamma and its inverse,
//!   regularised incomplete gamma and its inverse.
//! - **`beta`**: Beta, log-Beta, regularised incomplete beta and its inverse.
//! - **`bessel`**: modified Bessel functions I₀, I₁ and their logarithms.
//! - **`debye`**: Debye functions of order 1 to 20.
//! - **`dawson`**: Dawson's integral.
//! - **`faddeeva`**: the complex Faddeeva function w(z).
//! - **`lambert_w`**: both real branches of Lambert W.
//! - **`hypergeometric`**: ₁F₁, ₂F₁ and ₂F₂ power series, real and complex.
//!
//! Invalid arguments (poles, an out-of-range Debye order) return
//! [`KernelError::InvalidArguments`](crate::errors::KernelError::InvalidArguments);
//! every other function is total and saturates at its domain boundaries.

pub mod bessel;
pub mod beta;
pub mod dawson;
pub mod debye;
pub mod faddeeva;
pub mod gamma;
pub mod hypergeometric;
pub mod lambert_w;
