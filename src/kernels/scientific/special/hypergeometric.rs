// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Hypergeometric Series** - *₁F₁, ₂F₁ and ₂F₂ by Direct Summation*
//!
//! ```text
//! ₚFq(a; b; x) = Σₖ (a₁)ₖ … (aₚ)ₖ / ((b₁)ₖ … (b_q)ₖ) xᵏ / k!
//! ```
//!
//! Each term is obtained from the previous one by the Pochhammer ratio
//! `Π(aᵢ + k) / Π(bⱼ + k) · x / (k + 1)`, and summation stops once
//! `|term / sum|` drops below the configured precision. A non-positive integer
//! numerator parameter terminates the series exactly. ₂F₂ keeps both the
//! running term and the running sum as logarithms so intermediate terms can
//! exceed the double range.
//!
//! Real and complex arguments share [`SeriesValue`]. The ₂F₁ series only
//! converges for |x| < 1; larger arguments return NaN.

use std::ops::{Add, Div, Mul};

use log::warn;
use num_complex::Complex64;

use crate::config::{NumericalConfig, SpecFuncSettings};

/// Scalar field the series are summed over.
pub trait SeriesValue:
    Copy + Add<Output = Self> + Mul<Output = Self> + Div<Output = Self>
{
    fn from_real(v: f64) -> Self;
    fn magnitude(self) -> f64;
}

impl SeriesValue for f64 {
    #[inline(always)]
    fn from_real(v: f64) -> Self {
        v
    }
    #[inline(always)]
    fn magnitude(self) -> f64 {
        self.abs()
    }
}

impl SeriesValue for Complex64 {
    #[inline(always)]
    fn from_real(v: f64) -> Self {
        Complex64::new(v, 0.0)
    }
    #[inline(always)]
    fn magnitude(self) -> f64 {
        self.norm()
    }
}

/// Σ tₖ with t₀ = 1 and tₖ₊₁ = tₖ · ratio(k).
fn pochhammer_series<T: SeriesValue>(
    fname: &str,
    ratio: impl Fn(f64) -> T,
    settings: &SpecFuncSettings,
) -> T {
    let mut term = T::from_real(1.0);
    let mut sum = term;
    for k in 0..settings.maximum_iteration {
        term = term * ratio(k as f64);
        sum = sum + term;
        if term.magnitude() <= settings.precision * sum.magnitude() {
            return sum;
        }
    }
    warn!("{}: series did not converge in {} terms", fname, settings.maximum_iteration);
    sum
}

/// Kummer's function ₁F₁(a; b; x).
pub fn hyper_geom_1_1(a: f64, b: f64, x: f64) -> f64 {
    hyper_geom_1_1_with(a, b, x, &NumericalConfig::DEFAULT.spec_func)
}

pub fn hyper_geom_1_1_with<T: SeriesValue>(a: T, b: T, x: T, settings: &SpecFuncSettings) -> T {
    pochhammer_series(
        "hyper_geom_1_1",
        |k| {
            let k1 = T::from_real(k);
            (a + k1) / ((b + k1) * T::from_real(k + 1.0)) * x
        },
        settings,
    )
}

/// ₁F₁(a; b; z) for complex parameters and argument.
pub fn hyper_geom_1_1_complex(a: Complex64, b: Complex64, z: Complex64) -> Complex64 {
    hyper_geom_1_1_with(a, b, z, &NumericalConfig::DEFAULT.spec_func)
}

/// Gauss's function ₂F₁(a, b; c; x) for |x| < 1.
pub fn hyper_geom_2_1(a: f64, b: f64, c: f64, x: f64) -> f64 {
    if x.abs() > 1.0 {
        return f64::NAN;
    }
    hyper_geom_2_1_with(a, b, c, x, &NumericalConfig::DEFAULT.spec_func)
}

pub fn hyper_geom_2_1_with<T: SeriesValue>(
    a: T,
    b: T,
    c: T,
    x: T,
    settings: &SpecFuncSettings,
) -> T {
    pochhammer_series(
        "hyper_geom_2_1",
        |k| {
            let k1 = T::from_real(k);
            (a + k1) * (b + k1) / ((c + k1) * T::from_real(k + 1.0)) * x
        },
        settings,
    )
}

/// ₂F₁(a, b; c; z) for complex values with |z| < 1.
pub fn hyper_geom_2_1_complex(a: Complex64, b: Complex64, c: Complex64, z: Complex64) -> Complex64 {
    if z.norm() > 1.0 {
        return Complex64::new(f64::NAN, f64::NAN);
    }
    hyper_geom_2_1_with(a, b, c, z, &NumericalConfig::DEFAULT.spec_func)
}

/// ₂F₂(a, b; c, d; x), summed as logarithms with a sign tracker.
pub fn hyper_geom_2_2(a: f64, b: f64, c: f64, d: f64, x: f64) -> f64 {
    hyper_geom_2_2_with(a, b, c, d, x, &NumericalConfig::DEFAULT.spec_func)
}

pub fn hyper_geom_2_2_with(a: f64, b: f64, c: f64, d: f64, x: f64, settings: &SpecFuncSettings) -> f64 {
    if x == 0.0 {
        return 1.0;
    }
    let ln_x = x.abs().ln();
    let ln_eps = settings.precision.ln();
    let sign_of = |v: f64| if v < 0.0 { -1.0 } else { 1.0 };
    // ln|term|, sign of term, ln|sum|, sign of sum
    let (mut ln_t, mut s_t): (f64, f64) = (0.0, 1.0);
    let (mut ln_s, mut s_s): (f64, f64) = (0.0, 1.0);
    for k in 0..settings.maximum_iteration {
        let k = k as f64;
        let (ak, bk) = (a + k, b + k);
        if ak == 0.0 || bk == 0.0 {
            return s_s * ln_s.exp();
        }
        let (ck, dk) = (c + k, d + k);
        ln_t += ak.abs().ln() + bk.abs().ln() - ck.abs().ln() - dk.abs().ln() - (k + 1.0).ln() + ln_x;
        s_t *= sign_of(ak) * sign_of(bk) * sign_of(ck) * sign_of(dk) * sign_of(x);

        let hi = ln_s.max(ln_t);
        let lo = ln_s.min(ln_t);
        if s_s == s_t {
            ln_s = hi + (lo - hi).exp().ln_1p();
        } else {
            s_s = if ln_s >= ln_t { s_s } else { s_t };
            ln_s = hi + (-(lo - hi).exp()).ln_1p();
        }
        if ln_t - ln_s < ln_eps {
            return s_s * ln_s.exp();
        }
    }
    warn!("hyper_geom_2_2: series did not converge in {} terms", settings.maximum_iteration);
    s_s * ln_s.exp()
}

/// ₂F₂(a, b; c, d; z) for complex values, summed as complex logarithms.
pub fn hyper_geom_2_2_complex(
    a: Complex64,
    b: Complex64,
    c: Complex64,
    d: Complex64,
    z: Complex64,
) -> Complex64 {
    let settings = NumericalConfig::DEFAULT.spec_func;
    if z.norm() == 0.0 {
        return Complex64::new(1.0, 0.0);
    }
    let ln_z = z.ln();
    let ln_eps = settings.precision.ln();
    let mut ln_t = Complex64::new(0.0, 0.0);
    let mut ln_s = Complex64::new(0.0, 0.0);
    for k in 0..settings.maximum_iteration {
        let k = k as f64;
        let (ak, bk) = (a + k, b + k);
        if ak.norm() == 0.0 || bk.norm() == 0.0 {
            return ln_s.exp();
        }
        ln_t += ak.ln() + bk.ln() - (c + k).ln() - (d + k).ln() - (k + 1.0).ln() + ln_z;
        // ln(eˢ + eᵗ) pivoted on the larger modulus
        ln_s = if ln_s.re >= ln_t.re {
            ln_s + (1.0 + (ln_t - ln_s).exp()).ln()
        } else {
            ln_t + (1.0 + (ln_s - ln_t).exp()).ln()
        };
        if ln_t.re - ln_s.re < ln_eps {
            return ln_s.exp();
        }
    }
    warn!("hyper_geom_2_2_complex: series did not converge in {} terms", settings.maximum_iteration);
    ln_s.exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn kummer() {
        // mpmath.hyp1f1
        assert!(rel(hyper_geom_1_1(0.5, 1.5, 2.0), 2.3644538928052095) < 1e-14);
        assert!(rel(hyper_geom_1_1(-3.0, 2.0, 1.0), -0.041666666666666664) < 1e-15);
        assert!(rel(hyper_geom_1_1(2.5, 1.5, -3.0), -0.049787068367863944) < 1e-12);
        assert!(rel(hyper_geom_1_1(1.0, 2.0, 30.0), 356215819384.1154) < 1e-14);
        let z = hyper_geom_1_1_complex(0.5.into(), 1.5.into(), Complex64::new(1.0, 2.0));
        assert!((z - Complex64::new(0.7820336700689334, 0.8878700867415467)).norm() < 1e-14);
    }

    #[test]
    fn gauss() {
        // ₂F₁(1, 1; 2; x) = -ln(1 - x) / x
        assert!(rel(hyper_geom_2_1(1.0, 1.0, 2.0, 0.5), 2.0 * 2f64.ln()) < 1e-14);
        assert!(rel(hyper_geom_2_1(0.5, 1.5, 2.5, -0.7), 0.8447658818688253) < 1e-14);
        assert!(rel(hyper_geom_2_1(-2.0, 3.0, 4.0, 0.3), 0.604) < 1e-14);
        assert!(hyper_geom_2_1(1.0, 1.0, 2.0, 1.5).is_nan());
        let z = hyper_geom_2_1_complex(1.0.into(), 1.0.into(), 2.0.into(), Complex64::new(0.3, 0.4));
        assert!((z - Complex64::new(1.0891035324499092, 0.27834900422186415)).norm() < 1e-14);
    }

    #[test]
    fn log_space_2_2() {
        // mpmath.hyp2f2
        assert!(rel(hyper_geom_2_2(1.5, 2.0, 3.0, 4.0, 10.0), 94.64771471587588) < 1e-13);
        assert!(rel(hyper_geom_2_2(1.0, 2.0, 3.0, 4.0, -5.0), 0.5345019439069961) < 1e-13);
        assert!(rel(hyper_geom_2_2(0.5, 0.5, 1.5, 1.5, 200.0), 4.562057876232056e81) < 1e-10);
        assert!(rel(hyper_geom_2_2(-2.0, 1.0, 3.0, 4.0, 2.0), 0.7) < 1e-14);
        let z = hyper_geom_2_2_complex(
            1.5.into(),
            2.0.into(),
            3.0.into(),
            4.0.into(),
            Complex64::new(3.0, -2.0),
        );
        assert!((z - Complex64::new(1.7047171524056555, -1.5079198113016232)).norm() < 1e-12);
    }
}
