// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Statistical Distributions Module** - *Univariate Primitives, Multivariate Laws and Copulas*
//!
//! Layered from the bottom up:
//!
//! - **`shared`**: constants tables, the random generator and scalar helpers.
//! - **`dcdflib`**: forward incomplete beta/gamma ratios and the generic CDF inversion solver.
//! - **`dist_func`**: named scalar primitives `d_*`, `p_*`, `q_*`, `r_*` per family.
//! - **`univariate`**: null-aware array kernels over `minarrow` buffers built on `dist_func`.
//! - **`distribution`**: the [`distribution::Distribution`] trait, intervals and 1-D marginals.
//! - **`multivariate`**: Normal and Student distributions with dimension-dispatched CDFs.
//! - **`copula`** and **`composed`**: dependence structures and marginal-plus-copula joints.
//!
//! ### Null Value Philosophy
//! Rather than assume, we choose to recognise inf and NaN as valid float values
//! (consistent with Apache Arrow semantics), leaving it to the user to subsequently
//! treat them as nulls if they wish, given that there are numerical scenarios where
//! they represent information gain.
//!
//! ## Numerical Precision and Stability
//! Reference values in `./tests` were produced with SciPy 1.16.1. Platform specific
//! differences may impact results in the last few bits.
//!
//! ## Disclaimer
//! This implementation is provided on a best-effort basis and is intended for
//! general scientific and engineering use. We make no guarantees as to correctness,
//! fitness for any particular purpose, or suitability for uses such as in life-critical,
//! safety-critical, or financial applications.

/// # **Shared Distribution Utilities** - *Common Infrastructure for Distribution Computing*
///
/// ## Modules
/// - **`constants`**: Mathematical constants and precomputed tables
/// - **`sampler`**: Random generator value type and base variates
/// - **`scalar`**: Lanczos gamma, series/continued-fraction incomplete ratios, normal helpers
pub mod shared {
    pub mod constants;
    pub mod sampler;
    pub mod scalar;
}

pub mod dcdflib;

pub mod dist_func;

/// # **Univariate Array Kernels** - *Null-aware Vectorised Distribution Functions*
///
/// Each family maps a slice plus optional validity bitmap to a `FloatArray<f64>`,
/// delegating the per-element work to [`super::dist_func`].
pub mod univariate {
    // common kernel patterns
    pub mod common;

    pub mod beta;
    pub mod binomial;
    pub mod chi_squared;
    pub mod gamma;
    pub mod normal;
    pub mod poisson;
    pub mod student_t;
}

pub mod distribution;

pub mod multivariate;

pub mod copula;

pub mod composed;
