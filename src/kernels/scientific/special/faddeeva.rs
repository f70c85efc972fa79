// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Faddeeva Function** - *w(z) = e^(-z²) erfc(-iz)*
//!
//! Poppe and Wijers' algorithm (ACM TOMS 680). The first quadrant is computed
//! directly and the other three follow from the symmetries
//!
//! ```text
//! w(-x + iy) = conj(w(x + iy))
//! w(x - iy)  = 2 e^(-z²) - conj(w(x + iy))
//! ```
//!
//! Inside the ellipse (x/6.3)² + (y/4.4)² < 0.085264 a truncated power series
//! of erfc is used; outside it a Laplace continued fraction, combined with a
//! truncated Taylor expansion in the band around the real axis. The truncation
//! orders `n`, `nu` and `kapn` are empirical and tuned for 14 significant digits.

use num_complex::Complex64;

/// 2/√π
const FACTOR: f64 = 1.128_379_167_095_512_573_88;

/// Squared radius of the power-series ellipse.
const SERIES_RADIUS_SQ: f64 = 0.085264;

/// Faddeeva function w(z) for complex z.
///
/// Underflows to zero or overflows to infinity in the lower half-plane where
/// `e^(-z²)` itself leaves the double range.
pub fn faddeeva(z: Complex64) -> Complex64 {
    let xi = z.re;
    let yi = z.im;
    if xi.is_nan() || yi.is_nan() {
        return Complex64::new(f64::NAN, f64::NAN);
    }
    let xabs = xi.abs();
    let yabs = yi.abs();
    let x = xabs / 6.3;
    let y = yabs / 4.4;
    let mut qrho = x * x + y * y;
    let mut xquad = xabs * xabs - yabs * yabs;
    let yquad = 2.0 * xabs * yabs;

    let in_series = qrho < SERIES_RADIUS_SQ;
    let (mut u, mut v);
    // e^(-z²) for the first-quadrant z, needed again by the reflection below
    let (mut u2, mut v2) = (0.0, 0.0);

    if in_series {
        qrho = (1.0 - 0.85 * y) * qrho.sqrt();
        let n = (6.0 + 72.0 * qrho).round() as usize;
        let mut j = 2 * n + 1;
        let mut xsum = 1.0 / j as f64;
        let mut ysum = 0.0;
        for i in (1..=n).rev() {
            j -= 2;
            let i = i as f64;
            let xaux = (xsum * xquad - ysum * yquad) / i;
            ysum = (xsum * yquad + ysum * xquad) / i;
            xsum = xaux + 1.0 / j as f64;
        }
        let u1 = -FACTOR * (xsum * yabs + ysum * xabs) + 1.0;
        let v1 = FACTOR * (xsum * xabs - ysum * yabs);
        let daux = (-xquad).exp();
        u2 = daux * yquad.cos();
        v2 = -daux * yquad.sin();
        u = u1 * u2 - v1 * v2;
        v = u1 * v2 + v1 * u2;
    } else {
        let (h, kapn, nu) = if qrho > 1.0 {
            qrho = qrho.sqrt();
            (0.0, 0usize, (3.0 + 1442.0 / (26.0 * qrho + 77.0)) as usize)
        } else {
            qrho = (1.0 - y) * (1.0 - qrho).sqrt();
            (
                1.88 * qrho,
                (7.0 + 34.0 * qrho).round() as usize,
                (16.0 + 26.0 * qrho).round() as usize,
            )
        };
        let h2 = 2.0 * h;
        let taylor = h > 0.0;
        let mut qlambda = if taylor { h2.powi(kapn as i32) } else { 0.0 };

        let (mut rx, mut ry, mut sx, mut sy) = (0.0, 0.0, 0.0, 0.0);
        for n in (0..=nu).rev() {
            let np1 = (n + 1) as f64;
            let tx = yabs + h + np1 * rx;
            let ty = xabs - np1 * ry;
            let c = 0.5 / (tx * tx + ty * ty);
            rx = c * tx;
            ry = c * ty;
            if taylor && n <= kapn {
                let tx = qlambda + sx;
                sx = rx * tx - ry * sy;
                sy = ry * tx + rx * sy;
                qlambda /= h2;
            }
        }
        if taylor {
            u = FACTOR * sx;
            v = FACTOR * sy;
        } else {
            u = FACTOR * rx;
            v = FACTOR * ry;
        }
        if yabs == 0.0 {
            u = (-xabs * xabs).exp();
        }
    }

    if yi < 0.0 {
        if in_series {
            u2 *= 2.0;
            v2 *= 2.0;
        } else {
            xquad = -xquad;
            let w1 = 2.0 * xquad.exp();
            u2 = w1 * yquad.cos();
            v2 = -w1 * yquad.sin();
        }
        u = u2 - u;
        v = v2 - v;
        if xi > 0.0 {
            v = -v;
        }
    } else if xi < 0.0 {
        v = -v;
    }
    Complex64::new(u, v)
}
