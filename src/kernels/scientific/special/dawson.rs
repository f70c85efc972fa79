// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Dawson's Integral** - *F(x) = e^(-x²) ∫₀ˣ e^(t²) dt*
//!
//! Four ranges of y = x², three of them tabulated as Chebyshev series:
//!
//! ```text
//! y < 6.25          F(x) = x S(y)
//! 6.25 ≤ y < 12.25  F(x) = (1 + R(u) / y) / (2x),   u = 1/y, R from the middle table
//! 12.25 ≤ y ≤ 25    same form, outer table
//! y > 25            F(x) = x / (1 + 2y - 4y / (3 + 2y - 8y / (5 + 2y - ...)))
//! ```
//!
//! Guards: `F(x) = x` below |x| = 1e-8, `F(x) = 1/(2x)` from |x| = 1e8, and 0 once
//! the asymptote underflows beyond `0.5 / f64::MIN_POSITIVE`.

const SMALL: f64 = 1e-8;
const LARGE: f64 = 1e8;
const SMALL_LIMIT: f64 = 6.25;
const MIDDLE_LIMIT: f64 = 12.25;
const OUTER_LIMIT: f64 = 25.0;
/// Depth of the backward continued fraction; 60 levels reach full precision for y > 25.
const FRACTION_DEPTH: usize = 60;

/// F(x)/x in y over [0, 6.25].
const SMALL_Y: [f64; 22] = [
    0.7086930188940248,
    -0.3893107642176176,
    0.17089534039047505,
    -0.061191892588124804,
    0.018301985244742625,
    -0.00467192989156846,
    0.0010365819653278773,
    -0.0002029513125205603,
    3.550690195841706e-05,
    -5.609419849387663e-06,
    8.073119603643203e-07,
    -1.0664581659684513e-07,
    1.3014413690935905e-08,
    -1.4753953109525916e-09,
    1.5613944490987474e-10,
    -1.5491747535635642e-11,
    1.446513125857662e-12,
    -1.2754109661612633e-13,
    1.0651315628761883e-14,
    -8.448334457079042e-16,
    6.380150570258236e-17,
    -4.597933915019335e-18,
];
/// (2xF(x) - 1) y in u = 1/y over [1/12.25, 1/6.25].
const MIDDLE_U: [f64; 23] = [
    1.29556890288684,
    0.07160595062220249,
    0.0030356959957733294,
    -0.0009735228598223881,
    -0.00011209321084607901,
    2.5651798323646534e-05,
    8.318251455336221e-07,
    -7.306060863275895e-07,
    7.929235836264401e-08,
    6.147106467265426e-09,
    -3.138549658633211e-09,
    4.3755362721812133e-10,
    -6.119285170532258e-12,
    -1.025664448145164e-11,
    2.431618285855092e-12,
    -2.831960978090293e-13,
    1.7052858136863939e-15,
    7.173058649712341e-15,
    -1.812633669301596e-15,
    2.6189219578700595e-16,
    -1.7953858911269364e-17,
    -2.4226662431272563e-18,
    1.1207804723241416e-18,
];
/// (2xF(x) - 1) y in u = 1/y over [1/25, 1/12.25].
const OUTER_U: [f64; 20] = [
    1.1114508220104864,
    0.023185517467609176,
    0.001055129702955704,
    8.174924730775379e-05,
    4.78385853835556e-06,
    -7.667176651061137e-07,
    -2.2387059755515294e-07,
    3.1572061438733133e-10,
    5.8308509243533295e-09,
    -1.9763235270974008e-11,
    -1.585228447307355e-10,
    1.0265381422880283e-11,
    3.5958106912130718e-12,
    -6.668448169420703e-13,
    -2.231103286049555e-14,
    2.234609241607655e-14,
    -2.6968426960915758e-15,
    -2.1892766546858906e-16,
    1.1706609192225396e-16,
    -1.478354287949313e-17,
];

/// Clenshaw sum of `c[0] / 2 + Σ c[k] Tₖ(t)`.
#[inline]
fn chebyshev(c: &[f64], t: f64) -> f64 {
    let (mut b1, mut b2) = (0.0, 0.0);
    for &ck in c[1..].iter().rev() {
        (b1, b2) = (2.0 * t * b1 - b2 + ck, b1);
    }
    t * b1 - b2 + 0.5 * c[0]
}

/// Maps `u` from `[lo, hi]` onto `[-1, 1]`.
#[inline(always)]
fn to_unit(u: f64, lo: f64, hi: f64) -> f64 {
    (2.0 * u - lo - hi) / (hi - lo)
}

/// Dawson's integral F(x). Odd in x.
pub fn dawson(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    let ax = x.abs();
    if ax < SMALL {
        return x;
    }
    if ax > 0.5 / f64::MIN_POSITIVE {
        return 0.0;
    }
    if ax >= LARGE {
        return 0.5 / x;
    }
    let y = x * x;
    if y < SMALL_LIMIT {
        return x * chebyshev(&SMALL_Y, to_unit(y, 0.0, SMALL_LIMIT));
    }
    if y <= OUTER_LIMIT {
        let u = 1.0 / y;
        let r = if y < MIDDLE_LIMIT {
            chebyshev(&MIDDLE_U, to_unit(u, 1.0 / MIDDLE_LIMIT, 1.0 / SMALL_LIMIT))
        } else {
            chebyshev(&OUTER_U, to_unit(u, 1.0 / OUTER_LIMIT, 1.0 / MIDDLE_LIMIT))
        };
        return (1.0 + u * r) / (2.0 * x);
    }
    let mut t = 0.0;
    for k in (1..=FRACTION_DEPTH).rev() {
        let k = k as f64;
        t = 4.0 * k * y / (2.0 * k + 1.0 + 2.0 * y - t);
    }
    x / (1.0 + 2.0 * y - t)
}
