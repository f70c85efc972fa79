// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Separation-of-Variables Integrators** - *Nested Quadrature and Randomised Lattices*
//!
//! With `R = L Lᵀ` and `X = L Z`, the box probability `P(a ≤ X ≤ b)` becomes a chain
//! of one-dimensional conditional integrals: given `z₁ … z_{i-1}`, the coordinate `zᵢ`
//! ranges over `[(aᵢ - sᵢ)/Lᵢᵢ, (bᵢ - sᵢ)/Lᵢᵢ]` with `sᵢ = Σ_{j<i} Lᵢⱼ zⱼ`.
//!
//! Two ways of evaluating that chain live here:
//!
//! - **Nested Gauss-Legendre** over the conditional coordinates, exact in the last
//!   dimension. Used for small dimensions.
//! - **Genz's randomised Kronecker lattice** on the unit cube after mapping each
//!   conditional range onto [0, 1] with Φ⁻¹. Returns `(value, error, inform)` like
//!   `MVNDST`/`MVTDST`, where `error` is 3.5 standard errors over the random shifts.
//!
//! The Student variants condition on the χ radius: the lattice adds one coordinate
//! for it, the nested rule uses the exact Student conditionals instead.

use rand::Rng;

use crate::errors::KernelError;
use crate::kernels::scientific::distributions::dist_func::gamma::q_gamma;
use crate::kernels::scientific::distributions::dist_func::normal::{d_normal, p_normal};
use crate::kernels::scientific::distributions::distribution::student_cdf;
use crate::kernels::scientific::distributions::shared::scalar::normal_quantile_scalar;
use crate::kernels::scientific::linalg::LowerTriangular;
use crate::kernels::scientific::quadrature::GaussLegendre;
use crate::kernels::scientific::special::gamma::ln_gamma;

/// Largest dimension the lattice integrator accepts.
pub const LATTICE_MAXIMUM_DIMENSION: usize = 500;

/// Random shifts per lattice estimate.
pub const LATTICE_SHIFTS: usize = 12;

/// Multiplier of the standard error reported as the error estimate.
const ERROR_FACTOR: f64 = 3.5;

/// Standard normal coordinates beyond this are dropped by the nested rule.
const NESTED_NORMAL_CUTOFF: f64 = 8.5;

/// Result of a lattice integration.
///
/// `inform` is 0 when `error` met the requested precision, 1 when it did not,
/// and 2 on invalid input (dimension outside `1..=500` or mismatched lengths).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeEstimate {
    pub value: f64,
    pub error: f64,
    pub inform: u8,
}

impl LatticeEstimate {
    fn invalid() -> Self {
        LatticeEstimate {
            value: 0.0,
            error: 1.0,
            inform: 2,
        }
    }
}

#[inline(always)]
fn normal_inverse(p: f64) -> f64 {
    normal_quantile_scalar(p.clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON), 0.0, 1.0)
}

#[inline(always)]
fn partial_sum(l: &LowerTriangular, i: usize, y: &[f64]) -> f64 {
    (0..i).map(|j| l.get(i, j) * y[j]).sum()
}

/// P(a ≤ L Z ≤ b) by nested Gauss-Legendre over `z₁ … z_{d-1}`.
pub fn nested_normal(l: &LowerTriangular, a: &[f64], b: &[f64], rule: &GaussLegendre) -> f64 {
    let d = l.dim();
    if d == 0 {
        return 1.0;
    }
    let mut y = vec![0.0; d];
    nested_normal_level(l, a, b, rule, 0, &mut y).clamp(0.0, 1.0)
}

fn nested_normal_level(
    l: &LowerTriangular,
    a: &[f64],
    b: &[f64],
    rule: &GaussLegendre,
    i: usize,
    y: &mut [f64],
) -> f64 {
    let s = partial_sum(l, i, y);
    let lii = l.get(i, i);
    let lo = (a[i] - s) / lii;
    let hi = (b[i] - s) / lii;
    if i + 1 == l.dim() {
        return (p_normal(hi, false) - p_normal(lo, false)).max(0.0);
    }
    let lo = lo.max(-NESTED_NORMAL_CUTOFF);
    let hi = hi.min(NESTED_NORMAL_CUTOFF);
    if hi <= lo {
        return 0.0;
    }
    let half = 0.5 * (hi - lo);
    let mid = 0.5 * (hi + lo);
    let mut total = 0.0;
    for (&x, &w) in rule.nodes().iter().zip(rule.weights()) {
        let yi = mid + half * x;
        y[i] = yi;
        total += w * d_normal(yi) * nested_normal_level(l, a, b, rule, i + 1, y);
    }
    half * total
}

/// P(a ≤ L T ≤ b) for a standard multivariate Student with `nu` degrees of freedom,
/// by nested Gauss-Legendre over the exact Student conditionals.
///
/// Given `z₁ … z_i` with `δ² = Σ zⱼ²`, the next coordinate is Student with `ν + i`
/// degrees of freedom and scale `√((ν + δ²)/(ν + i))`; it is integrated in
/// `θ = atan(z / (c √(ν + i)))`, where its density is proportional to `cos^{ν+i-1} θ`.
pub fn nested_student(
    nu: f64,
    l: &LowerTriangular,
    a: &[f64],
    b: &[f64],
    rule: &GaussLegendre,
) -> Result<f64, KernelError> {
    let d = l.dim();
    if d == 0 {
        return Ok(1.0);
    }
    let norms: Vec<f64> = (0..d)
        .map(|i| {
            let nui = nu + i as f64;
            (ln_gamma(0.5 * (nui + 1.0)) - ln_gamma(0.5 * nui)).exp() / std::f64::consts::PI.sqrt()
        })
        .collect();
    let mut z = vec![0.0; d];
    let p = nested_student_level(nu, l, a, b, rule, &norms, 0, 0.0, &mut z)?;
    Ok(p.clamp(0.0, 1.0))
}

#[allow(clippy::too_many_arguments)]
fn nested_student_level(
    nu: f64,
    l: &LowerTriangular,
    a: &[f64],
    b: &[f64],
    rule: &GaussLegendre,
    norms: &[f64],
    i: usize,
    delta2: f64,
    z: &mut [f64],
) -> Result<f64, KernelError> {
    let s = partial_sum(l, i, z);
    let lii = l.get(i, i);
    let lo = (a[i] - s) / lii;
    let hi = (b[i] - s) / lii;
    let nui = nu + i as f64;
    let c = ((nu + delta2) / nui).sqrt();
    if i + 1 == l.dim() {
        let upper = student_cdf(nui, hi / c, false)?;
        let lower = student_cdf(nui, lo / c, false)?;
        return Ok((upper - lower).max(0.0));
    }
    if hi <= lo {
        return Ok(0.0);
    }
    let scale = c * nui.sqrt();
    let tlo = (lo / scale).atan();
    let thi = (hi / scale).atan();
    let half = 0.5 * (thi - tlo);
    let mid = 0.5 * (thi + tlo);
    let mut total = 0.0;
    for (&x, &w) in rule.nodes().iter().zip(rule.weights()) {
        let theta = mid + half * x;
        let zi = scale * theta.tan();
        z[i] = zi;
        let inner = nested_student_level(nu, l, a, b, rule, norms, i + 1, delta2 + zi * zi, z)?;
        total += w * theta.cos().powf(nui - 1.0) * inner;
    }
    Ok(norms[i] * half * total)
}

/// Separation-of-variables integrand on the unit cube of dimension `d - 1`,
/// with the limits multiplied by `scale`.
fn sov_normal(l: &LowerTriangular, a: &[f64], b: &[f64], w: &[f64], scale: f64, y: &mut [f64]) -> f64 {
    let d = l.dim();
    let mut f = 1.0;
    for i in 0..d {
        let s = partial_sum(l, i, y);
        let lii = l.get(i, i);
        let lo = if a[i] == f64::NEG_INFINITY {
            0.0
        } else {
            p_normal((a[i] * scale - s) / lii, false)
        };
        let hi = if b[i] == f64::INFINITY {
            1.0
        } else {
            p_normal((b[i] * scale - s) / lii, false)
        };
        let e = hi - lo;
        if e <= 0.0 {
            return 0.0;
        }
        f *= e;
        if i + 1 < d {
            y[i] = normal_inverse(lo + w[i] * e);
        }
    }
    f
}

/// The first `k` primes.
fn primes(k: usize) -> Vec<u64> {
    let mut out: Vec<u64> = Vec::with_capacity(k);
    let mut n = 2u64;
    while out.len() < k {
        if out.iter().take_while(|&&p| p * p <= n).all(|&p| n % p != 0) {
            out.push(n);
        }
        n += 1;
    }
    out
}

/// Randomised Kronecker lattice with antithetic baker's-transformed points.
///
/// `integrand` receives points of the `m`-dimensional unit cube. The budget
/// `max_points` counts integrand evaluations across all shifts.
fn lattice<R, F>(
    m: usize,
    max_points: usize,
    abs_eps: f64,
    rng: &mut R,
    mut integrand: F,
) -> Result<LatticeEstimate, KernelError>
where
    R: Rng + ?Sized,
    F: FnMut(&[f64]) -> Result<f64, KernelError>,
{
    let generators: Vec<f64> = primes(m).iter().map(|&p| (p as f64).sqrt().fract()).collect();
    let per_shift = (max_points / (2 * LATTICE_SHIFTS)).max(1);
    let mut x = vec![0.0; m];
    let mut xa = vec![0.0; m];
    let mut estimates = [0.0; LATTICE_SHIFTS];
    for est in estimates.iter_mut() {
        let shift: Vec<f64> = (0..m).map(|_| rng.random::<f64>()).collect();
        let mut total = 0.0;
        for k in 1..=per_shift {
            for j in 0..m {
                let t = (k as f64 * generators[j] + shift[j]).fract();
                x[j] = (2.0 * t - 1.0).abs();
                xa[j] = 1.0 - x[j];
            }
            total += 0.5 * (integrand(&x)? + integrand(&xa)?);
        }
        *est = total / per_shift as f64;
    }
    let n = LATTICE_SHIFTS as f64;
    let mean = estimates.iter().sum::<f64>() / n;
    let var = estimates.iter().map(|e| (e - mean) * (e - mean)).sum::<f64>() / (n * (n - 1.0));
    let error = ERROR_FACTOR * var.sqrt();
    Ok(LatticeEstimate {
        value: mean.clamp(0.0, 1.0),
        error,
        inform: if error <= abs_eps { 0 } else { 1 },
    })
}

fn lattice_input_valid(l: &LowerTriangular, a: &[f64], b: &[f64]) -> bool {
    let d = l.dim();
    (1..=LATTICE_MAXIMUM_DIMENSION).contains(&d) && a.len() == d && b.len() == d
}

/// P(a ≤ L Z ≤ b) for standard normal `Z` on a lattice of about `max_points`
/// evaluations, requesting absolute error `abs_eps`.
pub fn mvndst<R: Rng + ?Sized>(
    l: &LowerTriangular,
    a: &[f64],
    b: &[f64],
    max_points: usize,
    abs_eps: f64,
    rng: &mut R,
) -> LatticeEstimate {
    if !lattice_input_valid(l, a, b) {
        return LatticeEstimate::invalid();
    }
    let mut y = vec![0.0; l.dim()];
    let r = lattice(l.dim() - 1, max_points, abs_eps, rng, |w| {
        Ok(sov_normal(l, a, b, w, 1.0, &mut y))
    });
    // the normal integrand cannot fail
    r.unwrap_or_else(|_| LatticeEstimate::invalid())
}

/// P(a ≤ L T ≤ b) for a standard multivariate Student with `nu` degrees of freedom.
///
/// The first lattice coordinate picks the radius `S = √(χ²_ν / ν)` by inversion,
/// and the normal integrand is evaluated with the limits scaled by `S`.
pub fn mvtdst<R: Rng + ?Sized>(
    nu: f64,
    l: &LowerTriangular,
    a: &[f64],
    b: &[f64],
    max_points: usize,
    abs_eps: f64,
    rng: &mut R,
) -> Result<LatticeEstimate, KernelError> {
    if !lattice_input_valid(l, a, b) {
        return Ok(LatticeEstimate::invalid());
    }
    let mut y = vec![0.0; l.dim()];
    let half_nu = 0.5 * nu;
    lattice(l.dim(), max_points, abs_eps, rng, |w| {
        let w0 = w[0].clamp(f64::EPSILON, 1.0 - f64::EPSILON);
        let s = (2.0 * q_gamma(half_nu, w0, false)? / nu).sqrt();
        Ok(sov_normal(l, a, b, &w[1..], s, &mut y))
    })
}
