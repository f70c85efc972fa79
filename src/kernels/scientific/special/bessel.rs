// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Modified Bessel Functions** - *I₀, I₁ and Their Logarithms*
//!
//! Below the switch-over point (23.5 for I₀, 22 for I₁) the ascending series
//!
//! ```text
//! I₀(x) = Σ (x²/4)ᵏ / (k!)²        I₁(x) = (x/2) Σ (x²/4)ᵏ / (k! (k+1)!)
//! ```
//!
//! is summed until the relative term drops below the configured precision.
//! Beyond it the logarithm is taken from the Hankel expansion
//!
//! ```text
//! ln Iₙ(x) ~ x - ½ ln(2πx) + ln Σₖ cₖ(n) / xᵏ
//! ```
//!
//! with 12 terms, cut to 9 from |x| = 35 and to 7 from |x| = 50 where the
//! extra terms no longer improve the sum.

use std::f64::consts::PI;

use crate::config::{NumericalConfig, SpecFuncSettings};
use crate::utils::horner;

const I0_SERIES_LIMIT: f64 = 23.5;
const I1_SERIES_LIMIT: f64 = 22.0;

/// Hankel coefficients cₖ(0) = ((2k-1)!!)² / (k! 8ᵏ).
const I0_ASYMPTOTIC: [f64; 12] = [
    1.0,
    0.125,
    0.0703125,
    0.0732421875,
    0.112152099609375,
    0.22710800170898438,
    0.5725014209747314,
    1.7277275025844574,
    6.074042001273483,
    24.380529699556064,
    110.01714026924674,
    551.3358961220206,
];

/// Hankel coefficients cₖ(1).
const I1_ASYMPTOTIC: [f64; 12] = [
    1.0,
    -0.375,
    -0.1171875,
    -0.1025390625,
    -0.144195556640625,
    -0.2775764465332031,
    -0.6765925884246826,
    -1.993531733751297,
    -6.883914268109947,
    -27.248827311268542,
    -121.59789187653587,
    -603.8440767050702,
];

#[inline]
fn asymptotic_terms(ax: f64) -> usize {
    if ax >= 50.0 {
        7
    } else if ax >= 35.0 {
        9
    } else {
        12
    }
}

/// Σ (x²/4)ᵏ / (k! (k + order)!), without the (x/2)^order prefactor.
fn ascending_series(x: f64, order: f64, settings: &SpecFuncSettings) -> f64 {
    let y = 0.25 * x * x;
    let mut term = 1.0;
    let mut sum = 1.0;
    for k in 1..=settings.maximum_iteration {
        let k = k as f64;
        term *= y / (k * (k + order));
        sum += term;
        if term <= settings.precision * sum {
            break;
        }
    }
    sum
}

/// ln Σ cₖ / xᵏ for the truncated Hankel sum.
#[inline]
fn ln_hankel_sum(coeffs: &[f64; 12], ax: f64) -> f64 {
    horner(&coeffs[..asymptotic_terms(ax)], 1.0 / ax).ln()
}

#[inline]
fn hankel_prefix(ax: f64) -> f64 {
    ax - 0.5 * (2.0 * PI * ax).ln()
}

/// ln I₀(x).
pub fn log_bessel_i0(x: f64) -> f64 {
    log_bessel_i0_with(x, &NumericalConfig::DEFAULT.spec_func)
}

pub fn log_bessel_i0_with(x: f64, settings: &SpecFuncSettings) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    let ax = x.abs();
    if ax == f64::INFINITY {
        return f64::INFINITY;
    }
    if ax <= I0_SERIES_LIMIT {
        return ascending_series(ax, 0.0, settings).ln();
    }
    hankel_prefix(ax) + ln_hankel_sum(&I0_ASYMPTOTIC, ax)
}

/// ln I₁(x) for x > 0; returns `-f64::MAX` for x ≤ 0 where I₁ is not positive.
pub fn log_bessel_i1(x: f64) -> f64 {
    log_bessel_i1_with(x, &NumericalConfig::DEFAULT.spec_func)
}

pub fn log_bessel_i1_with(x: f64, settings: &SpecFuncSettings) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x <= 0.0 {
        return -f64::MAX;
    }
    if x == f64::INFINITY {
        return f64::INFINITY;
    }
    if x <= I1_SERIES_LIMIT {
        return (0.5 * x * ascending_series(x, 1.0, settings)).ln();
    }
    hankel_prefix(x) + ln_hankel_sum(&I1_ASYMPTOTIC, x)
}

/// I₀(x), even in x.
pub fn bessel_i0(x: f64) -> f64 {
    let ax = x.abs();
    if ax <= I0_SERIES_LIMIT {
        return ascending_series(ax, 0.0, &NumericalConfig::DEFAULT.spec_func);
    }
    log_bessel_i0(ax).exp()
}

/// I₁(x), odd in x.
pub fn bessel_i1(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    let ax = x.abs();
    let v = if ax <= I1_SERIES_LIMIT {
        0.5 * ax * ascending_series(ax, 1.0, &NumericalConfig::DEFAULT.spec_func)
    } else {
        log_bessel_i1(ax).exp()
    };
    if x < 0.0 { -v } else { v }
}

/// ln I₁(x) - ln I₀(x) for x > 0, i.e. the log of the ratio I₁/I₀.
///
/// In the asymptotic range the common `x - ½ ln(2πx)` prefix cancels
/// analytically instead of numerically.
pub fn delta_log_bessel_i10(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x <= 0.0 {
        return -f64::MAX;
    }
    if x == f64::INFINITY {
        return 0.0;
    }
    if x > I0_SERIES_LIMIT {
        return ln_hankel_sum(&I1_ASYMPTOTIC, x) - ln_hankel_sum(&I0_ASYMPTOTIC, x);
    }
    log_bessel_i1(x) - log_bessel_i0(x)
}
