// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Bivariate and Trivariate Orthant Probabilities** - *Normal and Student Closed Forms*
//!
//! - **Bivariate normal**: Genz's `bvnd`, Drezner-Wesolowsky quadrature of the
//!   Plackett derivative for |r| < 0.925 and a Taylor-corrected integral near ±1.
//! - **Bivariate Student**: Dunnett-Sobel's finite series for integral ν (`bvtl`),
//!   exact up to rounding.
//! - **Trivariate**: one dimension is integrated out numerically, conditioning on
//!   the coordinate least correlated with the others; the remaining pair goes
//!   through the bivariate routines above.
//!
//! All entry points take standardised upper limits and correlations and return
//! `P(X₁ ≤ h₁, …)`.

use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::LazyLock;

use crate::kernels::scientific::distributions::dist_func::normal::{d_normal, p_normal};
use crate::kernels::scientific::quadrature::GaussLegendre;
use crate::kernels::scientific::special::gamma::ln_gamma;

const TWO_PI: f64 = 2.0 * PI;

static GL_6: LazyLock<GaussLegendre> = LazyLock::new(|| GaussLegendre::new(6));
static GL_12: LazyLock<GaussLegendre> = LazyLock::new(|| GaussLegendre::new(12));
static GL_20: LazyLock<GaussLegendre> = LazyLock::new(|| GaussLegendre::new(20));

/// Lower end of the conditioning integral of the trivariate normal, below min(h, 0).
const TRIVARIATE_NORMAL_CUTOFF: f64 = 9.0;

/// `Φ(-x)`
#[inline(always)]
fn upper_phi(x: f64) -> f64 {
    p_normal(x, true)
}

/// Upper orthant `P(X > h, Y > k)` of the standard bivariate normal with correlation `r`.
pub fn bvnd(h: f64, k: f64, r: f64) -> f64 {
    let r = r.clamp(-1.0, 1.0);
    let abs_r = r.abs();
    let rule: &GaussLegendre = if abs_r < 0.3 {
        &GL_6
    } else if abs_r < 0.75 {
        &GL_12
    } else {
        &GL_20
    };
    let mut hk = h * k;
    let mut bvn = 0.0;
    if abs_r < 0.925 {
        let hs = 0.5 * (h * h + k * k);
        let asr = r.asin();
        for (&x, &w) in rule.nodes().iter().zip(rule.weights()) {
            let sn = (0.5 * asr * (x + 1.0)).sin();
            bvn += w * ((sn * hk - hs) / (1.0 - sn * sn)).exp();
        }
        return bvn * asr / (2.0 * TWO_PI) + upper_phi(h) * upper_phi(k);
    }

    let mut k = k;
    if r < 0.0 {
        k = -k;
        hk = -hk;
    }
    if abs_r < 1.0 {
        let as_ = (1.0 - r) * (1.0 + r);
        let mut a = as_.sqrt();
        let bs = (h - k) * (h - k);
        let c = (4.0 - hk) / 8.0;
        let d = (12.0 - hk) / 16.0;
        bvn = a
            * (-0.5 * (bs / as_ + hk)).exp()
            * (1.0 - c * (bs - as_) * (1.0 - d * bs / 5.0) / 3.0 + c * d * as_ * as_ / 5.0);
        if hk > -160.0 {
            let b = bs.sqrt();
            bvn -= (-0.5 * hk).exp()
                * TWO_PI.sqrt()
                * upper_phi(b / a)
                * b
                * (1.0 - c * bs * (1.0 - d * bs / 5.0) / 3.0);
        }
        a *= 0.5;
        for (&x, &w) in rule.nodes().iter().zip(rule.weights()) {
            let xs = (a * (x + 1.0)) * (a * (x + 1.0));
            let rs = (1.0 - xs).sqrt();
            bvn += a
                * w
                * ((-bs / (2.0 * xs) - hk / (1.0 + rs)).exp() / rs
                    - (-0.5 * (bs / xs + hk)).exp() * (1.0 + c * xs * (1.0 + d * xs)));
        }
        bvn = -bvn / TWO_PI;
    }
    if r > 0.0 {
        bvn += upper_phi(h.max(k));
    } else {
        bvn = -bvn + (upper_phi(h) - upper_phi(k)).max(0.0);
    }
    bvn
}

/// `P(X ≤ h, Y ≤ k)` of the standard bivariate normal with correlation `r`.
pub fn bivariate_normal_cdf(h: f64, k: f64, r: f64) -> f64 {
    if h == f64::NEG_INFINITY || k == f64::NEG_INFINITY {
        return 0.0;
    }
    if h == f64::INFINITY {
        return p_normal(k, false);
    }
    if k == f64::INFINITY {
        return p_normal(h, false);
    }
    bvnd(-h, -k, r).clamp(0.0, 1.0)
}

/// Lower orthant `P(T₁ < h, T₂ < k)` of the standard bivariate Student with integral
/// `nu` degrees of freedom and correlation `r`.
pub fn bvtl(nu: u32, h: f64, k: f64, r: f64) -> f64 {
    let n = nu as f64;
    let snu = n.sqrt();
    let ors = 1.0 - r * r;
    let hrk = h - r * k;
    let krh = k - r * h;
    let (xnhk, xnkh) = if hrk.abs() + ors > 0.0 {
        (
            hrk * hrk / (hrk * hrk + ors * (n + k * k)),
            krh * krh / (krh * krh + ors * (n + h * h)),
        )
    } else {
        (0.0, 0.0)
    };
    let hs = if hrk >= 0.0 { 1.0 } else { -1.0 };
    let ks = if krh >= 0.0 { 1.0 } else { -1.0 };

    let mut bvt;
    if nu % 2 == 0 {
        bvt = ors.sqrt().atan2(-r) / TWO_PI;
        let mut gmph = h / (16.0 * (n + h * h)).sqrt();
        let mut gmpk = k / (16.0 * (n + k * k)).sqrt();
        let mut btnckh = 2.0 * xnkh.sqrt().atan2((1.0 - xnkh).sqrt()) / PI;
        let mut btpdkh = 2.0 * (xnkh * (1.0 - xnkh)).sqrt() / PI;
        let mut btnchk = 2.0 * xnhk.sqrt().atan2((1.0 - xnhk).sqrt()) / PI;
        let mut btpdhk = 2.0 * (xnhk * (1.0 - xnhk)).sqrt() / PI;
        for j in 1..=nu / 2 {
            let j2 = 2.0 * j as f64;
            bvt += gmph * (1.0 + ks * btnckh);
            bvt += gmpk * (1.0 + hs * btnchk);
            btnckh += btpdkh;
            btpdkh = j2 * btpdkh * (1.0 - xnkh) / (j2 + 1.0);
            btnchk += btpdhk;
            btpdhk = j2 * btpdhk * (1.0 - xnhk) / (j2 + 1.0);
            gmph = gmph * (j2 - 1.0) / (j2 * (1.0 + h * h / n));
            gmpk = gmpk * (j2 - 1.0) / (j2 * (1.0 + k * k / n));
        }
    } else {
        let qhrk = (h * h + k * k - 2.0 * r * h * k + n * ors).sqrt();
        let hkrn = h * k + r * n;
        let hkn = h * k - n;
        let hpk = h + k;
        bvt = (-snu * (hkn * qhrk + hpk * hkrn)).atan2(hkn * hkrn - n * hpk * qhrk) / TWO_PI;
        if bvt < -1e-15 {
            bvt += 1.0;
        }
        let mut gmph = h / (TWO_PI * snu * (1.0 + h * h / n));
        let mut gmpk = k / (TWO_PI * snu * (1.0 + k * k / n));
        let mut btnckh = xnkh.sqrt();
        let mut btpdkh = btnckh;
        let mut btnchk = xnhk.sqrt();
        let mut btpdhk = btnchk;
        for j in 1..=(nu - 1) / 2 {
            let j2 = 2.0 * j as f64;
            bvt += gmph * (1.0 + ks * btnckh);
            bvt += gmpk * (1.0 + hs * btnchk);
            btpdkh = (j2 - 1.0) * btpdkh * (1.0 - xnkh) / j2;
            btnckh += btpdkh;
            btpdhk = (j2 - 1.0) * btpdhk * (1.0 - xnhk) / j2;
            btnchk += btpdhk;
            gmph = j2 * gmph / ((j2 + 1.0) * (1.0 + h * h / n));
            gmpk = j2 * gmpk / ((j2 + 1.0) * (1.0 + k * k / n));
        }
    }
    bvt
}

/// `P(T₁ ≤ h, T₂ ≤ k)` for the standard bivariate Student, integral `nu ≥ 1`.
///
/// `student_cdf` supplies the univariate CDF for the degenerate cases.
pub fn bivariate_student_cdf<F>(nu: u32, h: f64, k: f64, r: f64, student_cdf: F) -> f64
where
    F: Fn(f64) -> f64,
{
    if h == f64::NEG_INFINITY || k == f64::NEG_INFINITY {
        return 0.0;
    }
    if h == f64::INFINITY {
        return student_cdf(k);
    }
    if k == f64::INFINITY {
        return student_cdf(h);
    }
    let r = r.clamp(-1.0, 1.0);
    if r == 1.0 {
        return student_cdf(h.min(k));
    }
    if r == -1.0 {
        return (student_cdf(h) - student_cdf(-k)).max(0.0);
    }
    bvtl(nu, h, k, r).clamp(0.0, 1.0)
}

/// Composite 20-point Gauss-Legendre over panels no wider than `width`.
fn panels<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, width: f64) -> f64 {
    if !(b > a) {
        return 0.0;
    }
    let n = ((b - a) / width).ceil().max(1.0) as usize;
    let h = (b - a) / n as f64;
    let mut s = 0.0;
    for i in 0..n {
        let lo = a + i as f64 * h;
        s += GL_20.integrate(&f, lo, lo + h);
    }
    s
}

/// Conditioning layout of a trivariate problem: the integrated coordinate comes
/// first, followed by the pair handed to the bivariate routine.
struct Trivariate {
    h: [f64; 3],
    r12: f64,
    r13: f64,
    s2: f64,
    s3: f64,
    rho: f64,
}

impl Trivariate {
    /// `r = [r₁₂, r₁₃, r₂₃]`.
    fn new(h: [f64; 3], r: [f64; 3]) -> Self {
        let corr = |i: usize, j: usize| pair(r, i, j);
        let mut best = (f64::INFINITY, 0usize);
        for i in 0..3 {
            let (j, k) = others(i);
            let m = corr(i, j).abs().max(corr(i, k).abs());
            if m < best.0 {
                best = (m, i);
            }
        }
        let i = best.1;
        let (j, k) = others(i);
        let r12 = corr(i, j);
        let r13 = corr(i, k);
        let r23 = corr(j, k);
        let s2 = (1.0 - r12 * r12).sqrt();
        let s3 = (1.0 - r13 * r13).sqrt();
        let rho = ((r23 - r12 * r13) / (s2 * s3)).clamp(-1.0, 1.0);
        Trivariate {
            h: [h[i], h[j], h[k]],
            r12,
            r13,
            s2,
            s3,
            rho,
        }
    }
}

#[inline]
fn pair(r: [f64; 3], i: usize, j: usize) -> f64 {
    match (i.min(j), i.max(j)) {
        (0, 1) => r[0],
        (0, 2) => r[1],
        _ => r[2],
    }
}

/// Index of the first `+∞` limit, with the remaining pair of indices.
#[inline]
fn unbounded_axis(h: &[f64; 3]) -> Option<(usize, usize)> {
    h.iter().position(|&v| v == f64::INFINITY).map(others)
}

#[inline]
fn others(i: usize) -> (usize, usize) {
    match i {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    }
}

/// `P(X₁ ≤ h₁, X₂ ≤ h₂, X₃ ≤ h₃)` of the standard trivariate normal,
/// `r = [r₁₂, r₁₃, r₂₃]`.
pub fn trivariate_normal_cdf(h: [f64; 3], r: [f64; 3]) -> f64 {
    if h.iter().any(|&v| v == f64::NEG_INFINITY) {
        return 0.0;
    }
    if let Some((j, k)) = unbounded_axis(&h) {
        return bivariate_normal_cdf(h[j], h[k], pair(r, j, k));
    }
    let t = Trivariate::new(h, r);
    let [h1, h2, h3] = t.h;
    let lo = h1.min(0.0) - TRIVARIATE_NORMAL_CUTOFF;
    let f = |z: f64| {
        let a2 = (h2 - t.r12 * z) / t.s2;
        let a3 = (h3 - t.r13 * z) / t.s3;
        d_normal(z) * bivariate_normal_cdf(a2, a3, t.rho)
    };
    let width = t.s2.min(t.s3).clamp(0.02, 1.0);
    panels(f, lo, h1, width).clamp(0.0, 1.0)
}

/// `P(T₁ ≤ h₁, T₂ ≤ h₂, T₃ ≤ h₃)` of the standard trivariate Student with integral
/// `nu`, `r = [r₁₂, r₁₃, r₂₃]`.
///
/// With `T₁ = √ν tan θ`, the pair conditional on `θ` is bivariate Student with
/// `ν + 1` degrees of freedom, and `θ` has density proportional to `cos^{ν-1} θ`.
pub fn trivariate_student_cdf<F>(nu: u32, h: [f64; 3], r: [f64; 3], student_cdf: F) -> f64
where
    F: Fn(f64) -> f64,
{
    if h.iter().any(|&v| v == f64::NEG_INFINITY) {
        return 0.0;
    }
    if let Some((j, k)) = unbounded_axis(&h) {
        return bivariate_student_cdf(nu, h[j], h[k], pair(r, j, k), student_cdf);
    }
    let t = Trivariate::new(h, r);
    let [h1, h2, h3] = t.h;
    let n = nu as f64;
    let sn = n.sqrt();
    let c = ((n + 1.0) / n).sqrt();
    let norm = (ln_gamma(0.5 * (n + 1.0)) - ln_gamma(0.5 * n)).exp() / PI.sqrt();
    let f = |theta: f64| {
        let (st, ct) = theta.sin_cos();
        let a2 = c * (h2 * ct - t.r12 * sn * st) / t.s2;
        let a3 = c * (h3 * ct - t.r13 * sn * st) / t.s3;
        ct.powi(nu as i32 - 1) * bvtl(nu + 1, a2, a3, t.rho).clamp(0.0, 1.0)
    };
    let top = (h1 / sn).atan();
    let width = (0.25 * t.s2.min(t.s3)).clamp(0.005, 0.25);
    (norm * panels(f, -FRAC_PI_2, top, width)).clamp(0.0, 1.0)
}
