// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Kolmogorov Statistic** - *CDF of the Two-sided One-sample Distance D_n*
//!
//! For `n·x² ≤ 7.24` (and `≤ 3.76` once `n > 99`) the CDF is computed exactly
//! with the Marsaglia-Tsang-Wang method: with `k = ⌊n x⌋ + 1`, `m = 2k - 1`
//! and `h = k - n x`, P(D_n < x) is `n!/nⁿ` times the central entry of `Hⁿ`
//! for an `m × m` matrix `H` built from powers of `h`. The power is taken by
//! repeated squaring with a decimal exponent carried alongside, so neither
//! the matrix nor the `n!/nⁿ` factor leaves the representable range. Cost
//! grows as `O(m³ log n)`, so the exact path is taken only while `n x < 60`.
//! Larger `n x` inside the same `n·x²` limits use the Pelz-Good expansion in
//! `z = x√n`, `K₀(z) + K₁(z)/√n + K₂(z)/n + K₃(z)/n^{3/2}`, whose error there is
//! below 1e-8 and shrinks as `n⁻²`.
//!
//! Beyond those limits the fast approximation
//! `1 - 2 exp(-(2.000071 + 0.331/√n + 1.409/n) n x²)` is used. It carries
//! roughly seven significant digits of the CDF and considerably fewer of the
//! complementary CDF it is built from.

use std::f64::consts::PI;

use super::select_tail;
use crate::errors::KernelError;
use crate::kernels::scientific::linalg::SquareMatrix;

/// √(π/2)
const SQRT_HALF_PI: f64 = 1.253_314_137_315_500_3;
/// Largest n·x taken through the exact matrix power, of dimension 2⌊n x⌋ + 1.
const EXACT_MAX_NX: f64 = 60.0;
const PELZ_GOOD_TERMS: usize = 20;
const EXACT_LIMIT: f64 = 7.24;
const EXACT_LIMIT_LARGE_N: f64 = 3.76;
const LARGE_N: u64 = 99;
const RESCALE_ABOVE: f64 = 1e140;
const RESCALE_BELOW: f64 = 1e-140;
const RESCALE_EXP: i32 = 140;

/// P(D_n ≤ x), or P(D_n > x) when `tail` is set.
pub fn p_kolmogorov(n: u64, x: f64, tail: bool) -> Result<f64, KernelError> {
    if n == 0 {
        return Err(KernelError::InvalidArguments(
            "p_kolmogorov: sample size must be positive".into(),
        ));
    }
    if x.is_nan() {
        return Ok(f64::NAN);
    }
    let nf = n as f64;
    if x <= 0.5 / nf {
        return Ok(select_tail((0.0, 1.0), tail));
    }
    if x >= 1.0 {
        return Ok(select_tail((1.0, 0.0), tail));
    }
    let s = nf * x * x;
    if s > EXACT_LIMIT || (s > EXACT_LIMIT_LARGE_N && n > LARGE_N) {
        let upper = 2.0 * (-(2.000071 + 0.331 / nf.sqrt() + 1.409 / nf) * s).exp();
        return Ok(select_tail((0.5 - upper + 0.5, upper), tail));
    }
    let lower = if nf * x < EXACT_MAX_NX {
        marsaglia_tsang_wang(n, x)
    } else {
        pelz_good(nf, x)
    };
    Ok(select_tail((lower, 0.5 - lower + 0.5), tail))
}

/// Pelz-Good expansion of P(D_n ≤ x) to order n^{-3/2}.
fn pelz_good(n: f64, x: f64) -> f64 {
    let z = x * n.sqrt();
    let (z2, z3) = (z * z, z * z * z);
    let (z4, z6) = (z2 * z2, z3 * z3);
    let (pi2, pi4, pi6) = (PI * PI, PI.powi(4), PI.powi(6));

    let (mut k0, mut k1, mut k2a, mut k2b, mut k3a, mut k3b) = (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    for k in 0..PELZ_GOOD_TERMS {
        let j = k as f64 + 0.5;
        let (j2, j4) = (j * j, j.powi(4));
        let e = (-pi2 * j2 / (2.0 * z2)).exp();
        k0 += e;
        k1 += (pi2 * j2 - z2) * e;
        k2a += (6.0 * z6 + 2.0 * z4 + pi2 * (2.0 * z4 - 5.0 * z2) * j2 + pi4 * (1.0 - 2.0 * z2) * j4) * e;
        k3a += (pi6 * j4 * j2 * (5.0 - 30.0 * z2)
            + pi4 * j4 * (212.0 * z4 - 60.0 * z2)
            + pi2 * j2 * (135.0 * z4 - 96.0 * z6)
            - (30.0 * z6 + 90.0 * z4 * z4))
            * e;

        let i2 = (k + 1) as f64 * (k + 1) as f64;
        let f = (-pi2 * i2 / (2.0 * z2)).exp();
        k2b += pi2 * i2 * f;
        k3b += (3.0 * pi2 * i2 * z2 - pi4 * i2 * i2) * f;
    }
    let k0 = (2.0 * PI).sqrt() / z * k0;
    let k1 = SQRT_HALF_PI / (3.0 * z4) * k1;
    let k2 = SQRT_HALF_PI / (36.0 * z4 * z3) * k2a - SQRT_HALF_PI / (18.0 * z3) * k2b;
    let k3 = SQRT_HALF_PI / (3240.0 * z6 * z4) * k3a + SQRT_HALF_PI / (108.0 * z6) * k3b;
    let rn = n.sqrt();
    (k0 + k1 / rn + k2 / n + k3 / (n * rn)).clamp(0.0, 1.0)
}

fn marsaglia_tsang_wang(n: u64, x: f64) -> f64 {
    let nd = n as f64 * x;
    let k = nd as usize + 1;
    let m = 2 * k - 1;
    let h = k as f64 - nd;

    let mut mat = SquareMatrix::zeros(m);
    for i in 0..m {
        for j in 0..m.min(i + 2) {
            mat.set(i, j, 1.0);
        }
    }
    for i in 0..m {
        mat.set(i, 0, mat.get(i, 0) - h.powi(i as i32 + 1));
        mat.set(m - 1, i, mat.get(m - 1, i) - h.powi((m - i) as i32));
    }
    if 2.0 * h - 1.0 > 0.0 {
        mat.set(m - 1, 0, mat.get(m - 1, 0) + (2.0 * h - 1.0).powi(m as i32));
    }
    // divide the entry on sub-diagonal d by d!
    for i in 0..m {
        for j in 0..=i {
            let mut fact = 1.0;
            for g in 2..=(i - j + 1) {
                fact *= g as f64;
            }
            mat.set(i, j, mat.get(i, j) / fact);
        }
    }

    let (q, mut exp10) = power_scaled(&mat, n);
    let mut s = q.get(k - 1, k - 1);
    let nf = n as f64;
    for i in 1..=n {
        s = s * i as f64 / nf;
        if s < RESCALE_BELOW {
            s *= RESCALE_ABOVE;
            exp10 -= RESCALE_EXP;
        }
    }
    let half = exp10 / 2;
    s * 10f64.powi(half) * 10f64.powi(exp10 - half)
}

/// `(V, e)` with `Aⁿ = V · 10ᵉ`.
fn power_scaled(a: &SquareMatrix, n: u64) -> (SquareMatrix, i32) {
    if n == 1 {
        return (a.clone(), 0);
    }
    let (half, e_half) = power_scaled(a, n / 2);
    let squared = half.mul(&half);
    let mut v = if n % 2 == 0 { squared } else { a.mul(&squared) };
    let mut e = 2 * e_half;
    let mid = a.dim() / 2;
    if v.get(mid, mid) > RESCALE_ABOVE {
        v.scale_in_place(RESCALE_BELOW);
        e += RESCALE_EXP;
    }
    (v, e)
}
