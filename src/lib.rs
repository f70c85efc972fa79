// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under the Mozilla Public License (MPL) 2.0.
// See LICENSE for details.

//! # **Stat Kernels** - *Special Functions, Distributions and Copulas*
//!
//! Numerical core for probability work over `minarrow` arrays:
//!
//! - **Special functions**: gamma family, Bessel I₀/I₁, Debye, Dawson, Faddeeva,
//!   Lambert W and hypergeometric series, each switching algorithm by argument range.
//! - **Incomplete beta/gamma package**: forward regularised ratios plus a generic
//!   bracket-and-refine solver that inverts any family CDF for any of its arguments.
//! - **Univariate primitives**: density, CDF, quantile and variate generation for the
//!   classical families, including the non-central chi-square and Student laws.
//! - **Multivariate elliptical evaluation**: Normal and Student distributions whose CDF
//!   dispatches by dimension between closed forms, Gauss-Legendre product quadrature,
//!   a randomised lattice integrator and Monte Carlo.
//! - **Copulas and composed distributions**: independent, normal and min copulas glued
//!   to 1-D marginals.
//!
//! All tolerances and switch-over points live in [`config::NumericalConfig`].

// Link OpenBLAS when linear_algebra feature is enabled.
// This forces the linker to include the OpenBLAS symbols.
#[cfg(feature = "linear_algebra")]
extern crate openblas_src;

pub mod kernels {
    pub mod scientific {
        #[cfg(feature = "probability_distributions")]
        pub mod distributions;
        #[cfg(feature = "probability_distributions")]
        pub mod erf;
        pub mod linalg;
        pub mod quadrature;
        #[cfg(feature = "probability_distributions")]
        pub mod special;
    }
}

pub mod config;

pub mod errors;

pub mod utils;
