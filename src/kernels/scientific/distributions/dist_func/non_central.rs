// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Non-central Chi-square and Student** - *Poisson Mixture Summation*
//!
//! Both laws are Poisson mixtures of central ones:
//!
//! ```text
//! χ²(ν, λ):  F(x) = Σₖ wₖ P(ν/2 + k, x/2),             wₖ = e^(-λ/2) (λ/2)^k / k!
//! t(ν, δ):   F(t) = Φ(-δ) + ½ Σⱼ [pⱼ I_x(j + ½, ν/2) + qⱼ I_x(j + 1, ν/2)],   x = t² / (t² + ν)
//! ```
//!
//! Summation starts at the mode of the mixing weights, `max(1, ⌊μ⌋)`, and walks
//! forward and backward. Neighbouring incomplete ratios come from the unit-step
//! recurrences `P(a + 1, y) = P(a, y) - yᵃe^(-y)/Γ(a + 1)` and
//! `I_x(a + 1, b) = I_x(a, b) - xᵃ(1-x)ᵇ/(a B(a, b))`, so only the starting ratio
//! is evaluated directly. Each direction stops once a geometric bound on the
//! weight it has not yet visited falls below `precision` times the running sum;
//! exhausting `maximum_iteration` logs a warning and keeps the partial sum.
//!
//! Both tails are summed independently, so upper tail probabilities keep their
//! relative precision instead of being formed as `1 - F`.
//!
//! When `t` and `δ` have opposite signs the Student coefficients `qⱼ` alternate
//! against the `pⱼ` and the sum for the small tail cancels. There the small tail
//! and the density are integrated directly over the scaled chi variable
//! `S = √(χ²_ν / ν)`, `F(t) = E[Φ(tS - δ)]`, with composite Gauss-Legendre
//! panels laid around the mode of the log-integrand in `ln s`.
//!
//! Quantiles widen a bracket around the centre of the law by doubling until it
//! straddles the target, then refine it with the shared CDF solver.

use std::f64::consts::LN_2;

use log::warn;
use num_complex::Complex64;
use rand::Rng;

use super::poisson::r_poisson;
use super::{check_non_negative, check_positive, check_probability, select_tail};
use crate::config::{DistFuncSettings, NumericalConfig};
use crate::errors::KernelError;
use crate::kernels::scientific::distributions::dcdflib::beta_inc::beta_inc;
use crate::kernels::scientific::distributions::dcdflib::cdf::{StudentQuery, cdf_student};
use crate::kernels::scientific::distributions::dcdflib::elementary::stirling_delta;
use crate::kernels::scientific::distributions::dcdflib::solver::{Root, SolverSettings, invert_cdf};
use crate::kernels::scientific::distributions::dcdflib::{CdfError, settle};
use crate::kernels::scientific::distributions::dcdflib::gamma_inc::gamma_inc;
use crate::kernels::scientific::distributions::shared::constants::{
    HALF_LOG_TWO_PI, SQRT_2,
};
use crate::kernels::scientific::distributions::shared::sampler::{
    sample_gamma, sample_standard_normal,
};
use crate::kernels::scientific::distributions::shared::scalar::normal_cdf_scalar;
use crate::kernels::scientific::distributions::dist_func::student::ln_student_norm;
use crate::kernels::scientific::quadrature::GaussLegendre;
use crate::kernels::scientific::special::faddeeva::faddeeva;
use crate::kernels::scientific::special::gamma::ln_gamma;

/// Log-integrand drop below its peak at which the integration range is cut.
const LOG_RANGE_DROP: f64 = 45.0;
/// Cap on the doubling steps used to bracket the peak and the range ends.
const BRACKET_STEPS: usize = 64;
const GOLDEN_STEPS: usize = 80;
/// Largest |t| s (1 + δ) treated as s = 0 inside Φ(ts - δ).
const FLAT_NORMAL_SHIFT: f64 = 1e-15;
const PANELS: usize = 64;
const PANEL_NODES: usize = 20;
/// Largest bracket half-width tried by the quantile search before reporting an infinite quantile.
const QUANTILE_REACH: f64 = 1e300;

// ----------------------------------------------------------------------------
// Shared pieces
// ----------------------------------------------------------------------------

#[inline]
fn poisson_weight(mu: f64, k: f64) -> f64 {
    (k * mu.ln() - mu - ln_gamma(k + 1.0)).exp()
}

/// Upper bound on the mass of the terms beyond `w` when each is at most `r` times its predecessor.
#[inline]
fn geometric_rest(w: f64, r: f64) -> f64 {
    if r < 1.0 { w * r / (1.0 - r) } else { f64::INFINITY }
}

#[inline]
fn report_exhausted(fname: &str, direction: &str, settings: &DistFuncSettings) {
    warn!(
        "{}: {} summation stopped after {} terms, returning partial sum",
        fname, direction, settings.maximum_iteration
    );
}

fn check_non_centrality(fname: &str, name: &str, v: f64) -> Result<(), KernelError> {
    if !v.is_finite() {
        return Err(KernelError::InvalidArguments(format!(
            "{}: {} must be finite, got {}",
            fname, name, v
        )));
    }
    Ok(())
}

/// Solves `cdf(x) = p` (or `ccdf(x) = q`, whichever is smaller) for a continuous law.
///
/// The bracket `[centre - w, centre + w]` doubles `w` from `max(1, |centre|)` until it
/// straddles the target. `floor` pins the lower end for laws supported on `[floor, ∞)`.
/// A target not straddled within [`QUANTILE_REACH`] gives the matching infinity.
fn invert_widening<E>(
    fname: &str,
    mut eval: E,
    p: f64,
    q: f64,
    centre: f64,
    floor: Option<f64>,
) -> Result<f64, KernelError>
where
    E: FnMut(f64) -> Result<(f64, f64), KernelError>,
{
    let lower_tail = p <= q;
    // x lies left of the quantile
    let short = |(cum, ccum): (f64, f64)| if lower_tail { cum < p } else { ccum > q };
    // x lies right of the quantile
    let past = |(cum, ccum): (f64, f64)| if lower_tail { cum > p } else { ccum < q };

    let mut width = centre.abs().max(1.0);
    let mut hi = centre + width;
    while short(eval(hi)?) {
        if hi >= QUANTILE_REACH {
            return Ok(f64::INFINITY);
        }
        width *= 2.0;
        hi = (centre + width).min(QUANTILE_REACH);
    }
    let lo = match floor {
        Some(lo) => lo,
        None => {
            let mut width = centre.abs().max(1.0);
            let mut lo = centre - width;
            while past(eval(lo)?) {
                if lo <= -QUANTILE_REACH {
                    return Ok(f64::NEG_INFINITY);
                }
                width *= 2.0;
                lo = (centre - width).max(-QUANTILE_REACH);
            }
            lo
        }
    };

    let settings = SolverSettings::bounded(lo, hi);
    let root = invert_cdf(
        |x: f64| eval(x).map_err(|e| CdfError::Evaluator(e.to_string())),
        p,
        q,
        centre.clamp(lo, hi),
        &settings,
    );
    settle(fname, root.and_then(Root::into_result))
}

/// P(a, y), Q(a, y) and d(a) = yᵃ e^(-y) / Γ(a + 1) walked in unit steps of `a`.
#[derive(Clone)]
struct GammaLadder {
    a: f64,
    y: f64,
    lower: f64,
    upper: f64,
    step: f64,
}

impl GammaLadder {
    fn new(a: f64, y: f64) -> Result<Self, KernelError> {
        let (lower, upper) = gamma_inc(a, y)?;
        Ok(GammaLadder { a, y, lower, upper, step: Self::fresh_step(a, y) })
    }

    #[inline]
    fn fresh_step(a: f64, y: f64) -> f64 {
        (a * y.ln() - y - ln_gamma(a + 1.0)).exp()
    }

    fn up(&mut self) {
        self.lower = (self.lower - self.step).max(0.0);
        self.upper += self.step;
        self.step *= self.y / (self.a + 1.0);
        self.a += 1.0;
        if !(self.step >= f64::MIN_POSITIVE) {
            self.step = Self::fresh_step(self.a, self.y);
        }
    }

    fn down(&mut self) {
        self.step *= self.a / self.y;
        self.a -= 1.0;
        // restart from the closed form once the recurrence has lost the value
        if !(self.step >= f64::MIN_POSITIVE) {
            self.step = Self::fresh_step(self.a, self.y);
        }
        self.lower += self.step;
        self.upper = (self.upper - self.step).max(0.0);
    }
}

/// I_x(a, b), 1 - I_x(a, b) and g(a) = xᵃ(1-x)ᵇ / (a B(a, b)) walked in unit steps of `a`.
#[derive(Clone)]
struct BetaLadder {
    a: f64,
    b: f64,
    x: f64,
    ln_x: f64,
    ln_y: f64,
    lower: f64,
    upper: f64,
    step: f64,
}

impl BetaLadder {
    fn new(a: f64, b: f64, x: f64, y: f64) -> Result<Self, KernelError> {
        let (lower, upper) = beta_inc(a, b, x, y)?;
        let (ln_x, ln_y) = (x.ln(), y.ln());
        let step = Self::fresh_step(a, b, ln_x, ln_y);
        Ok(BetaLadder { a, b, x, ln_x, ln_y, lower, upper, step })
    }

    #[inline]
    fn fresh_step(a: f64, b: f64, ln_x: f64, ln_y: f64) -> f64 {
        (ln_gamma(a + b) - ln_gamma(a + 1.0) - ln_gamma(b) + a * ln_x + b * ln_y).exp()
    }

    fn up(&mut self) {
        self.lower = (self.lower - self.step).max(0.0);
        self.upper += self.step;
        self.step *= self.x * (self.a + self.b) / (self.a + 1.0);
        self.a += 1.0;
        if !(self.step >= f64::MIN_POSITIVE) {
            self.step = Self::fresh_step(self.a, self.b, self.ln_x, self.ln_y);
        }
    }

    fn down(&mut self) {
        self.step *= self.a / (self.x * (self.a - 1.0 + self.b));
        self.a -= 1.0;
        if !(self.step >= f64::MIN_POSITIVE) {
            self.step = Self::fresh_step(self.a, self.b, self.ln_x, self.ln_y);
        }
        self.lower += self.step;
        self.upper = (self.upper - self.step).max(0.0);
    }
}

// ----------------------------------------------------------------------------
// Non-central chi-square
// ----------------------------------------------------------------------------

fn check_chi_square(fname: &str, nu: f64, lambda: f64) -> Result<(), KernelError> {
    check_positive(fname, "nu", nu)?;
    check_non_negative(fname, "lambda", lambda)
}

/// Density of χ²(ν, λ) at x.
pub fn d_non_central_chi_square(nu: f64, lambda: f64, x: f64) -> Result<f64, KernelError> {
    d_non_central_chi_square_with(nu, lambda, x, &NumericalConfig::DEFAULT.dist_func)
}

pub fn d_non_central_chi_square_with(
    nu: f64,
    lambda: f64,
    x: f64,
    settings: &DistFuncSettings,
) -> Result<f64, KernelError> {
    const FNAME: &str = "d_non_central_chi_square";
    check_chi_square(FNAME, nu, lambda)?;
    if x < 0.0 || x == f64::INFINITY {
        return Ok(0.0);
    }
    if x == 0.0 {
        // only the k = 0 component can be non-zero at the origin
        return Ok(if nu < 2.0 {
            f64::INFINITY
        } else if nu == 2.0 {
            0.5 * (-0.5 * lambda).exp()
        } else {
            0.0
        });
    }
    let y = 0.5 * x;
    // central χ²(ν + 2k) density, a = ν/2 + k
    let central = |a: f64| 0.5 * ((a - 1.0) * y.ln() - y - ln_gamma(a)).exp();
    if lambda == 0.0 {
        return Ok(central(0.5 * nu));
    }

    let mu = 0.5 * lambda;
    let k0 = mu.floor().max(1.0);
    let a0 = 0.5 * nu + k0;
    let w0 = poisson_weight(mu, k0);
    let g0 = central(a0);
    let eps = settings.precision;
    let mut sum = w0 * g0;

    let (mut w, mut g, mut a, mut k, mut prev) = (w0, g0, a0, k0, w0 * g0);
    let mut converged = false;
    for _ in 0..settings.maximum_iteration {
        g *= y / a;
        a += 1.0;
        k += 1.0;
        w *= mu / k;
        let term = w * g;
        sum += term;
        if term <= prev && term <= eps * sum {
            converged = true;
            break;
        }
        prev = term;
    }
    if !converged {
        report_exhausted(FNAME, "forward", settings);
    }

    let (mut w, mut g, mut a, mut k, mut prev) = (w0, g0, a0, k0, w0 * g0);
    let mut steps = 0;
    while k > 0.0 {
        if steps == settings.maximum_iteration {
            report_exhausted(FNAME, "backward", settings);
            break;
        }
        steps += 1;
        a -= 1.0;
        g *= a / y;
        if !(g >= f64::MIN_POSITIVE) {
            g = central(a);
        }
        w *= k / mu;
        k -= 1.0;
        let term = w * g;
        sum += term;
        if term <= prev && term <= eps * sum {
            break;
        }
        prev = term;
    }
    Ok(sum)
}

/// CDF of χ²(ν, λ) at x, or the upper tail when `tail` is set.
///
/// # Errors
/// `InvalidArguments` unless ν > 0 and λ ≥ 0 are finite.
pub fn p_non_central_chi_square(
    nu: f64,
    lambda: f64,
    x: f64,
    tail: bool,
) -> Result<f64, KernelError> {
    p_non_central_chi_square_with(nu, lambda, x, tail, &NumericalConfig::DEFAULT.dist_func)
}

pub fn p_non_central_chi_square_with(
    nu: f64,
    lambda: f64,
    x: f64,
    tail: bool,
    settings: &DistFuncSettings,
) -> Result<f64, KernelError> {
    const FNAME: &str = "p_non_central_chi_square";
    check_chi_square(FNAME, nu, lambda)?;
    if x.is_nan() {
        return Ok(f64::NAN);
    }
    Ok(select_tail(chi_square_pair(FNAME, nu, lambda, x, settings)?, tail))
}

fn chi_square_pair(
    fname: &str,
    nu: f64,
    lambda: f64,
    x: f64,
    settings: &DistFuncSettings,
) -> Result<(f64, f64), KernelError> {
    Ok(if x <= 0.0 {
        (0.0, 1.0)
    } else if x == f64::INFINITY {
        (1.0, 0.0)
    } else if lambda == 0.0 {
        gamma_inc(0.5 * nu, 0.5 * x)?
    } else {
        chi_square_mixture(fname, nu, lambda, x, settings)?
    })
}

fn chi_square_mixture(
    fname: &str,
    nu: f64,
    lambda: f64,
    x: f64,
    settings: &DistFuncSettings,
) -> Result<(f64, f64), KernelError> {
    let mu = 0.5 * lambda;
    let k0 = mu.floor().max(1.0);
    let w0 = poisson_weight(mu, k0);
    let start = GammaLadder::new(0.5 * nu + k0, 0.5 * x)?;
    let eps = settings.precision;
    let mut lower = w0 * start.lower;
    let mut upper = w0 * start.upper;

    // forward: P shrinks towards 0 and Q grows towards 1
    let (mut ladder, mut w, mut k) = (start.clone(), w0, k0);
    let mut converged = false;
    for _ in 0..settings.maximum_iteration {
        ladder.up();
        k += 1.0;
        w *= mu / k;
        lower += w * ladder.lower;
        upper += w * ladder.upper;
        let rest = geometric_rest(w, mu / (k + 1.0));
        if ladder.lower * rest <= eps * lower && rest <= eps * upper {
            converged = true;
            break;
        }
    }
    if !converged {
        report_exhausted(fname, "forward", settings);
    }

    let (mut ladder, mut w, mut k) = (start, w0, k0);
    let mut steps = 0;
    while k > 0.0 {
        if steps == settings.maximum_iteration {
            report_exhausted(fname, "backward", settings);
            break;
        }
        steps += 1;
        ladder.down();
        w *= k / mu;
        k -= 1.0;
        lower += w * ladder.lower;
        upper += w * ladder.upper;
        let rest = geometric_rest(w, k / mu);
        if rest <= eps * lower && ladder.upper * rest <= eps * upper {
            break;
        }
    }
    Ok((lower.min(1.0), upper.min(1.0)))
}

/// The x with χ²(ν, λ) CDF p, or upper tail p when `tail` is set.
///
/// # Errors
/// `InvalidArguments` for a bad ν or λ, or p outside [0, 1].
pub fn q_non_central_chi_square(
    nu: f64,
    lambda: f64,
    p: f64,
    tail: bool,
) -> Result<f64, KernelError> {
    q_non_central_chi_square_with(nu, lambda, p, tail, &NumericalConfig::DEFAULT.dist_func)
}

pub fn q_non_central_chi_square_with(
    nu: f64,
    lambda: f64,
    p: f64,
    tail: bool,
    settings: &DistFuncSettings,
) -> Result<f64, KernelError> {
    const FNAME: &str = "q_non_central_chi_square";
    check_chi_square(FNAME, nu, lambda)?;
    check_probability(FNAME, p)?;
    let (lower, upper) = if tail { (0.5 - p + 0.5, p) } else { (p, 0.5 - p + 0.5) };
    if lower == 0.0 {
        return Ok(0.0);
    }
    if upper == 0.0 {
        return Ok(f64::INFINITY);
    }
    invert_widening(
        FNAME,
        |x| chi_square_pair(FNAME, nu, lambda, x, settings),
        lower,
        upper,
        nu + lambda,
        Some(0.0),
    )
}

/// One χ²(ν, λ) variate as 2 Gamma(ν/2 + N), N ~ Poisson(λ/2).
pub fn r_non_central_chi_square<R: Rng + ?Sized>(
    rng: &mut R,
    nu: f64,
    lambda: f64,
) -> Result<f64, KernelError> {
    check_chi_square("r_non_central_chi_square", nu, lambda)?;
    let n = r_poisson(rng, 0.5 * lambda)?;
    Ok(2.0 * sample_gamma(rng, 0.5 * nu + n as f64, 1.0))
}

// ----------------------------------------------------------------------------
// Non-central Student t
// ----------------------------------------------------------------------------

fn check_student(fname: &str, nu: f64, delta: f64) -> Result<(), KernelError> {
    check_positive(fname, "nu", nu)?;
    check_non_centrality(fname, "delta", delta)
}

/// CDF of t(ν, δ) at t, or the upper tail when `tail` is set.
pub fn p_non_central_student(nu: f64, delta: f64, t: f64, tail: bool) -> Result<f64, KernelError> {
    p_non_central_student_with(nu, delta, t, tail, &NumericalConfig::DEFAULT.dist_func)
}

pub fn p_non_central_student_with(
    nu: f64,
    delta: f64,
    t: f64,
    tail: bool,
    settings: &DistFuncSettings,
) -> Result<f64, KernelError> {
    const FNAME: &str = "p_non_central_student";
    check_student(FNAME, nu, delta)?;
    if t.is_nan() {
        return Ok(f64::NAN);
    }
    Ok(select_tail(student_pair(FNAME, nu, delta, t, settings)?, tail))
}

fn student_pair(
    fname: &str,
    nu: f64,
    delta: f64,
    t: f64,
    settings: &DistFuncSettings,
) -> Result<(f64, f64), KernelError> {
    Ok(if t.is_infinite() {
        if t > 0.0 { (1.0, 0.0) } else { (0.0, 1.0) }
    } else if delta == 0.0 {
        let pt = cdf_student(StudentQuery::Probability { t, df: nu })?;
        (pt.p, pt.q)
    } else if t == 0.0 {
        (normal_cdf_scalar(-delta), normal_cdf_scalar(delta))
    } else if t > 0.0 && delta > 0.0 {
        student_mixture(fname, nu, delta, t, settings)?
    } else if t < 0.0 && delta < 0.0 {
        let (lower, upper) = student_mixture(fname, nu, -delta, -t, settings)?;
        (upper, lower)
    } else if t < 0.0 {
        let lower = student_opposite_sign(nu, delta, t, false)?;
        (lower, 0.5 - lower + 0.5)
    } else {
        // F(t; δ) = 1 - F(-t; -δ)
        let upper = student_opposite_sign(nu, -delta, -t, false)?;
        (0.5 - upper + 0.5, upper)
    })
}

/// The t with t(ν, δ) CDF p, or upper tail p when `tail` is set.
pub fn q_non_central_student(nu: f64, delta: f64, p: f64, tail: bool) -> Result<f64, KernelError> {
    q_non_central_student_with(nu, delta, p, tail, &NumericalConfig::DEFAULT.dist_func)
}

pub fn q_non_central_student_with(
    nu: f64,
    delta: f64,
    p: f64,
    tail: bool,
    settings: &DistFuncSettings,
) -> Result<f64, KernelError> {
    const FNAME: &str = "q_non_central_student";
    check_student(FNAME, nu, delta)?;
    check_probability(FNAME, p)?;
    let (lower, upper) = if tail { (0.5 - p + 0.5, p) } else { (p, 0.5 - p + 0.5) };
    if lower == 0.0 {
        return Ok(f64::NEG_INFINITY);
    }
    if upper == 0.0 {
        return Ok(f64::INFINITY);
    }
    invert_widening(
        FNAME,
        |t| student_pair(FNAME, nu, delta, t, settings),
        lower,
        upper,
        delta,
        None,
    )
}

/// Lower and upper tail at t > 0 for δ > 0, where every mixture term is non-negative.
fn student_mixture(
    fname: &str,
    nu: f64,
    delta: f64,
    t: f64,
    settings: &DistFuncSettings,
) -> Result<(f64, f64), KernelError> {
    let mu = 0.5 * delta * delta;
    let tt = t * t;
    let (x, y) = (1.0 / (1.0 + nu / tt), nu / (tt + nu));
    let b = 0.5 * nu;
    let j0 = mu.floor().max(1.0);
    let p0 = poisson_weight(mu, j0);
    let q0 = delta / SQRT_2 * (j0 * mu.ln() - mu - ln_gamma(j0 + 1.5)).exp();
    let half = BetaLadder::new(j0 + 0.5, b, x, y)?;
    let whole = BetaLadder::new(j0 + 1.0, b, x, y)?;
    let base = normal_cdf_scalar(-delta);
    let eps = settings.precision;

    let mut lower = p0 * half.lower + q0 * whole.lower;
    let mut upper = p0 * half.upper + q0 * whole.upper;

    let mut fwd = (half.clone(), whole.clone());
    let (mut p, mut q, mut j) = (p0, q0, j0);
    let mut converged = false;
    for _ in 0..settings.maximum_iteration {
        fwd.0.up();
        fwd.1.up();
        j += 1.0;
        p *= mu / j;
        q *= mu / (j + 0.5);
        lower += p * fwd.0.lower + q * fwd.1.lower;
        upper += p * fwd.0.upper + q * fwd.1.upper;
        let rest_p = geometric_rest(p, mu / (j + 2.0));
        let rest_q = geometric_rest(q, mu / (j + 2.5));
        if fwd.0.lower * rest_p + fwd.1.lower * rest_q <= eps * (2.0 * base + lower)
            && rest_p + rest_q <= eps * upper
        {
            converged = true;
            break;
        }
    }
    if !converged {
        report_exhausted(fname, "forward", settings);
    }

    let (mut bwd_half, mut bwd_whole) = (half, whole);
    let (mut p, mut q, mut j) = (p0, q0, j0);
    let mut steps = 0;
    while j > 0.0 {
        if steps == settings.maximum_iteration {
            report_exhausted(fname, "backward", settings);
            break;
        }
        steps += 1;
        bwd_half.down();
        bwd_whole.down();
        p *= j / mu;
        q *= (j + 0.5) / mu;
        j -= 1.0;
        lower += p * bwd_half.lower + q * bwd_whole.lower;
        upper += p * bwd_half.upper + q * bwd_whole.upper;
        let rest_p = geometric_rest(p, j / mu);
        let rest_q = geometric_rest(q, (j + 0.5) / mu);
        if rest_p + rest_q <= eps * (2.0 * base + lower)
            && bwd_half.upper * rest_p + bwd_whole.upper * rest_q <= eps * upper
        {
            break;
        }
    }
    Ok(((base + 0.5 * lower).min(1.0), (0.5 * upper).min(1.0)))
}

/// Density of t(ν, δ) at t.
pub fn d_non_central_student(nu: f64, delta: f64, t: f64) -> Result<f64, KernelError> {
    d_non_central_student_with(nu, delta, t, &NumericalConfig::DEFAULT.dist_func)
}

pub fn d_non_central_student_with(
    nu: f64,
    delta: f64,
    t: f64,
    settings: &DistFuncSettings,
) -> Result<f64, KernelError> {
    const FNAME: &str = "d_non_central_student";
    check_student(FNAME, nu, delta)?;
    if !(t * t).is_finite() {
        return Ok(0.0);
    }
    if t == 0.0 || delta == 0.0 {
        let log_kernel = -0.5 * (nu + 1.0) * (t * t / nu).ln_1p();
        return Ok((ln_student_norm(nu) + log_kernel - 0.5 * delta * delta).exp());
    }
    if (t > 0.0) == (delta > 0.0) {
        Ok(student_mixture_density(FNAME, nu, delta.abs(), t.abs(), settings))
    } else {
        student_opposite_sign(nu, delta.abs(), -t.abs(), true)
    }
}

/// Density at t > 0 for δ > 0 as the derivative of the mixture:
/// ½ Σ [pⱼ β(x; j + ½, ν/2) + qⱼ β(x; j + 1, ν/2)] · dx/dt.
fn student_mixture_density(
    fname: &str,
    nu: f64,
    delta: f64,
    t: f64,
    settings: &DistFuncSettings,
) -> f64 {
    let mu = 0.5 * delta * delta;
    let tt = t * t;
    let (x, y) = (1.0 / (1.0 + nu / tt), nu / (tt + nu));
    let (ln_x, ln_y) = (x.ln(), y.ln());
    let b = 0.5 * nu;
    let beta_density =
        |a: f64| ((a - 1.0) * ln_x + (b - 1.0) * ln_y + ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b)).exp();
    let j0 = mu.floor().max(1.0);
    let p0 = poisson_weight(mu, j0);
    let q0 = delta / SQRT_2 * (j0 * mu.ln() - mu - ln_gamma(j0 + 1.5)).exp();
    let (bh0, bw0) = (beta_density(j0 + 0.5), beta_density(j0 + 1.0));
    let eps = settings.precision;
    let mut sum = p0 * bh0 + q0 * bw0;

    let (mut p, mut q, mut bh, mut bw, mut j, mut prev) = (p0, q0, bh0, bw0, j0, sum);
    let mut converged = false;
    for _ in 0..settings.maximum_iteration {
        let (ah, aw) = (j + 0.5, j + 1.0);
        bh *= x * (ah + b) / ah;
        bw *= x * (aw + b) / aw;
        j += 1.0;
        p *= mu / j;
        q *= mu / (j + 0.5);
        let term = p * bh + q * bw;
        sum += term;
        if term <= prev && term <= eps * sum {
            converged = true;
            break;
        }
        prev = term;
    }
    if !converged {
        report_exhausted(fname, "forward", settings);
    }

    let (mut p, mut q, mut bh, mut bw, mut j, mut prev) = (p0, q0, bh0, bw0, j0, p0 * bh0 + q0 * bw0);
    let mut steps = 0;
    while j > 0.0 {
        if steps == settings.maximum_iteration {
            report_exhausted(fname, "backward", settings);
            break;
        }
        steps += 1;
        let (ah, aw) = (j - 0.5, j);
        bh *= ah / (x * (ah + b));
        bw *= aw / (x * (aw + b));
        if !(bh >= f64::MIN_POSITIVE) {
            bh = beta_density(ah);
        }
        if !(bw >= f64::MIN_POSITIVE) {
            bw = beta_density(aw);
        }
        p *= j / mu;
        q *= (j + 0.5) / mu;
        j -= 1.0;
        let term = p * bh + q * bw;
        sum += term;
        if term <= prev && term <= eps * sum {
            break;
        }
        prev = term;
    }
    sum * t * nu / ((tt + nu) * (tt + nu))
}

/// ln Φ(z), keeping relative precision far into the lower tail.
fn ln_normal_cdf(z: f64) -> f64 {
    if z > -5.0 {
        return normal_cdf_scalar(z).ln();
    }
    // Φ(z) = ½ erfcx(-z/√2) e^(-z²/2), erfcx(u) = w(iu)
    let erfcx = faddeeva(Complex64::new(0.0, -z / SQRT_2)).re;
    (0.5 * erfcx).ln() - 0.5 * z * z
}

/// Lower tail (or density) at t < 0 for δ > 0 as an integral over S = √(χ²_ν / ν):
/// F = ∫ Φ(ts - δ) f_S(s) ds and f = ∫ φ(ts - δ) s f_S(s) ds.
///
/// Integrated in u = ln s, where the log-integrand is concave for every ν > 0,
/// so one golden-section search finds its peak and the range is cut where it
/// has dropped by `LOG_RANGE_DROP` on either side. For the CDF the stretch
/// s < s₀ on which Φ(ts - δ) equals Φ(-δ) to working precision is taken in
/// closed form, Φ(-δ) P(ν/2, ν s₀² / 2).
fn student_opposite_sign(
    nu: f64,
    delta: f64,
    t: f64,
    density: bool,
) -> Result<f64, KernelError> {
    let half_nu = 0.5 * nu;
    // ln f_S(e^u) + u = ln_norm - (ν/2)(e^(2u) - 1 - 2u), with ln Γ(ν/2) split by Stirling
    let ln_gamma_rest = if half_nu >= 8.0 {
        stirling_delta(half_nu)
    } else {
        ln_gamma(half_nu) - ((half_nu - 0.5) * half_nu.ln() - half_nu + HALF_LOG_TWO_PI)
    };
    let ln_norm = LN_2 + 0.5 * half_nu.ln() - HALF_LOG_TWO_PI - ln_gamma_rest;
    let g = |u: f64| {
        let s = u.exp();
        let base = ln_norm - half_nu * ((2.0 * u).exp_m1() - 2.0 * u);
        let z = t * s - delta;
        if density {
            -0.5 * z * z - HALF_LOG_TWO_PI + u + base
        } else {
            ln_normal_cdf(z) + base
        }
    };

    let (u_peak, g_peak) = concave_peak(&g);
    if !(g_peak > f64::NEG_INFINITY) {
        return Ok(0.0);
    }
    let edge = |dir: f64| {
        let mut step = 0.125;
        for _ in 0..BRACKET_STEPS {
            let u = u_peak + dir * step;
            if !(g(u) > g_peak - LOG_RANGE_DROP) {
                return u;
            }
            step *= 2.0;
        }
        u_peak + dir * step
    };
    let (mut a, b) = (edge(-1.0), edge(1.0));

    let mut head = 0.0;
    if !density {
        let u_flat = (FLAT_NORMAL_SHIFT / (-t * (delta + 1.0))).ln();
        if a < u_flat {
            let s_flat = u_flat.exp();
            let (p, _) = gamma_inc(half_nu, half_nu * s_flat * s_flat)?;
            head = normal_cdf_scalar(-delta) * p;
            a = u_flat;
        }
    }
    if !(b > a) {
        return Ok(head);
    }

    let rule = GaussLegendre::new(PANEL_NODES);
    let width = (b - a) / PANELS as f64;
    let total: f64 = (0..PANELS)
        .map(|i| {
            let left = a + i as f64 * width;
            rule.integrate(|u| (g(u) - g_peak).exp(), left, left + width)
        })
        .sum();
    Ok(head + total * g_peak.exp())
}

/// Maximum of a concave function: doubling steps uphill from zero until it
/// turns, then golden-section search on the bracket.
fn concave_peak<G: Fn(f64) -> f64>(g: &G) -> (f64, f64) {
    const INV_PHI: f64 = 0.618_033_988_749_894_8;
    let mut step = 0.25;
    let (mut a, mut ga) = (0.0, g(0.0));
    let dir = if g(step) >= ga { 1.0 } else { -1.0 };
    let mut prev = -dir * step;
    let mut b = dir * step;
    let mut gb = g(b);
    for _ in 0..BRACKET_STEPS {
        if !(gb > ga) {
            break;
        }
        prev = a;
        a = b;
        ga = gb;
        step *= 2.0;
        b = a + dir * step;
        gb = g(b);
    }

    let (mut lo, mut hi) = (prev.min(b), prev.max(b));
    let mut c = hi - INV_PHI * (hi - lo);
    let mut d = lo + INV_PHI * (hi - lo);
    let (mut gc, mut gd) = (g(c), g(d));
    for _ in 0..GOLDEN_STEPS {
        if gc > gd {
            hi = d;
            d = c;
            gd = gc;
            c = hi - INV_PHI * (hi - lo);
            gc = g(c);
        } else {
            lo = c;
            c = d;
            gc = gd;
            d = lo + INV_PHI * (hi - lo);
            gd = g(d);
        }
    }
    if gc > gd { (c, gc) } else { (d, gd) }
}

/// One t(ν, δ) variate as (Z + δ) / √(χ²_ν / ν).
pub fn r_non_central_student<R: Rng + ?Sized>(
    rng: &mut R,
    nu: f64,
    delta: f64,
) -> Result<f64, KernelError> {
    check_student("r_non_central_student", nu, delta)?;
    let z = sample_standard_normal(rng);
    let chi2 = 2.0 * sample_gamma(rng, 0.5 * nu, 1.0);
    Ok((z + delta) / (chi2 / nu).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::scientific::distributions::dist_func::gamma::{p_gamma, q_gamma};
    use crate::kernels::scientific::distributions::dist_func::student::{d_student, p_student, q_student};
    use crate::kernels::scientific::distributions::shared::sampler::RandomGenerator;

    fn rel(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn chi_square_reference_values() {
        // mpmath, mixture summed at 40 digits; density from the Bessel form
        assert!(rel(p_non_central_chi_square(3.0, 5.0, 8.0, false).unwrap(), 0.5734922507093002) < 1e-12);
        assert!(rel(p_non_central_chi_square(3.0, 5.0, 8.0, true).unwrap(), 0.42650774929069973) < 1e-12);
        assert!(rel(d_non_central_chi_square(3.0, 5.0, 8.0).unwrap(), 0.07485124312304382) < 1e-12);
        assert!(rel(p_non_central_chi_square(4.0, 1000.0, 600.0, false).unwrap(), 3.443974295092038e-13) < 1e-10);
        assert!(rel(d_non_central_chi_square(4.0, 1000.0, 600.0).unwrap(), 5.1485048309237083e-14) < 1e-10);
        assert!(rel(p_non_central_chi_square(10.0, 20.0, 150.0, true).unwrap(), 3.17858779458006e-13) < 1e-10);
        assert!(rel(d_non_central_chi_square(0.5, 2.0, 0.01).unwrap(), 2.7384996321745545) < 1e-12);
        assert!(rel(p_non_central_chi_square(0.5, 2.0, 0.01, false).unwrap(), 0.10824942176968277) < 1e-12);
    }

    #[test]
    fn chi_square_edges() {
        assert_eq!(p_non_central_chi_square(3.0, 5.0, 0.0, false).unwrap(), 0.0);
        assert_eq!(p_non_central_chi_square(3.0, 5.0, -1.0, true).unwrap(), 1.0);
        assert_eq!(p_non_central_chi_square(3.0, 5.0, f64::INFINITY, false).unwrap(), 1.0);
        assert_eq!(d_non_central_chi_square(3.0, 5.0, -2.0).unwrap(), 0.0);
        assert!(p_non_central_chi_square(0.0, 5.0, 1.0, false).is_err());
        assert!(p_non_central_chi_square(3.0, -5.0, 1.0, false).is_err());
        // zero non-centrality is the central law, P(ν/2, x/2)
        for &x in &[0.3, 2.0, 11.0] {
            let central = p_gamma(1.5, 0.5 * x, false).unwrap();
            assert!(rel(p_non_central_chi_square(3.0, 0.0, x, false).unwrap(), central) < 1e-13);
        }
    }

    #[test]
    fn chi_square_tails_are_complementary() {
        for &(nu, lambda) in &[(1.0, 0.5), (6.0, 30.0), (25.0, 400.0)] {
            for &x in &[0.5, 5.0, 40.0, 500.0] {
                let lo = p_non_central_chi_square(nu, lambda, x, false).unwrap();
                let up = p_non_central_chi_square(nu, lambda, x, true).unwrap();
                assert!((lo + up - 1.0).abs() < 2e-13, "nu={} lambda={} x={}", nu, lambda, x);
            }
        }
    }

    #[test]
    fn student_reference_values() {
        // mpmath, mixture summed at 140 digits
        assert!(rel(p_non_central_student(10.0, 1.5, 2.5, false).unwrap(), 0.7939391090361835) < 1e-12);
        assert!(rel(p_non_central_student(10.0, 1.5, 2.5, true).unwrap(), 0.2060608909638165) < 1e-12);
        assert!(rel(d_non_central_student(10.0, 1.5, 2.5).unwrap(), 0.22278345886917433) < 1e-12);
        assert!(rel(p_non_central_student(4.0, -2.0, -1.0, false).unwrap(), 0.8421264753272995) < 1e-12);
        assert!(rel(d_non_central_student(4.0, -2.0, -1.0).unwrap(), 0.23869350440740036) < 1e-12);
    }

    #[test]
    fn student_opposite_sign_small_tail() {
        // the mixture cancels here; values are far below 1 - F
        assert!(rel(p_non_central_student(3.0, 4.0, -0.5, false).unwrap(), 5.7075327096646125e-6) < 1e-11);
        assert!(rel(d_non_central_student(3.0, 4.0, -0.5).unwrap(), 1.6898428588332935e-5) < 1e-11);
        assert!(rel(p_non_central_student(10.0, 12.0, -3.0, false).unwrap(), 2.1525746121947494e-41) < 1e-11);
        assert!(rel(d_non_central_student(10.0, 12.0, -3.0).unwrap(), 6.715874522056361e-41) < 1e-11);
        assert!(rel(p_non_central_student(0.3, 1.5, -3.0, false).unwrap(), 0.02752345944670433) < 1e-11);
        assert!(rel(d_non_central_student(0.3, 1.5, -3.0).unwrap(), 0.0027335555343210444) < 1e-11);
        assert_eq!(p_non_central_student(10.0, 12.0, -3.0, true).unwrap(), 1.0);
    }

    #[test]
    fn student_mirror_symmetry() {
        for &(nu, delta) in &[(2.0, 0.7), (15.0, 3.0)] {
            for &t in &[-4.0, -0.3, 0.3, 2.0, 9.0] {
                let a = p_non_central_student(nu, delta, t, false).unwrap();
                let b = p_non_central_student(nu, -delta, -t, true).unwrap();
                assert!(rel(a, b) < 1e-13, "nu={} delta={} t={}", nu, delta, t);
                let fa = d_non_central_student(nu, delta, t).unwrap();
                let fb = d_non_central_student(nu, -delta, -t).unwrap();
                assert!(rel(fa, fb) < 1e-13);
            }
        }
    }

    #[test]
    fn student_central_and_origin() {
        for &t in &[-3.0, 0.4, 7.0] {
            assert!(rel(p_non_central_student(5.0, 0.0, t, false).unwrap(), p_student(5.0, t, false).unwrap()) < 1e-14);
            assert!(rel(d_non_central_student(5.0, 0.0, t).unwrap(), d_student(5.0, t).unwrap()) < 1e-13);
        }
        // F(0) = Φ(-δ), and the branches meet continuously there
        let at_zero = p_non_central_student(6.0, 1.2, 0.0, false).unwrap();
        assert!(rel(at_zero, normal_cdf_scalar(-1.2)) < 1e-14);
        let left = p_non_central_student(6.0, 1.2, -1e-7, false).unwrap();
        let right = p_non_central_student(6.0, 1.2, 1e-7, false).unwrap();
        assert!(left < at_zero && at_zero < right);
        assert!(right - left < 1e-7);
        assert!(d_non_central_student(6.0, 1.2, f64::INFINITY).unwrap() == 0.0);
    }

    #[test]
    fn chi_square_quantile_reference_values() {
        assert!(rel(q_non_central_chi_square(3.0, 5.0, 0.5734922507093002, false).unwrap(), 8.0) < 1e-10);
        assert!(rel(q_non_central_chi_square(3.0, 5.0, 0.42650774929069973, true).unwrap(), 8.0) < 1e-10);
        assert!(rel(q_non_central_chi_square(0.5, 2.0, 0.10824942176968277, false).unwrap(), 0.01) < 1e-9);
        assert!(rel(q_non_central_chi_square(10.0, 20.0, 3.17858779458006e-13, true).unwrap(), 150.0) < 1e-9);
    }

    #[test]
    fn chi_square_quantile_round_trip() {
        for &(nu, lambda) in &[(1.0, 0.5), (3.0, 5.0), (6.0, 30.0), (25.0, 400.0)] {
            for &x in &[0.4, 3.0, 12.0, 45.0, 420.0] {
                for &tail in &[false, true] {
                    let p = p_non_central_chi_square(nu, lambda, x, tail).unwrap();
                    if p < 1e-12 || p > 1.0 - 1e-12 {
                        continue;
                    }
                    let back = q_non_central_chi_square(nu, lambda, p, tail).unwrap();
                    assert!(rel(back, x) < 1e-8, "nu={} lambda={} x={} tail={} got {}", nu, lambda, x, tail, back);
                }
            }
        }
    }

    #[test]
    fn chi_square_quantile_is_monotone() {
        let ps = [1e-6, 0.01, 0.2, 0.5, 0.8, 0.99, 1.0 - 1e-6];
        let lower: Vec<f64> = ps.iter().map(|&p| q_non_central_chi_square(4.0, 9.0, p, false).unwrap()).collect();
        assert!(lower.windows(2).all(|w| w[0] < w[1]), "{:?}", lower);
        let upper: Vec<f64> = ps.iter().map(|&p| q_non_central_chi_square(4.0, 9.0, p, true).unwrap()).collect();
        assert!(upper.windows(2).all(|w| w[0] > w[1]), "{:?}", upper);
        for (&p, &x) in ps.iter().zip(&lower) {
            assert!(rel(q_non_central_chi_square(4.0, 9.0, 1.0 - p, true).unwrap(), x) < 1e-8);
        }
    }

    #[test]
    fn chi_square_quantile_edges() {
        assert_eq!(q_non_central_chi_square(3.0, 5.0, 0.0, false).unwrap(), 0.0);
        assert_eq!(q_non_central_chi_square(3.0, 5.0, 1.0, false).unwrap(), f64::INFINITY);
        assert_eq!(q_non_central_chi_square(3.0, 5.0, 0.0, true).unwrap(), f64::INFINITY);
        assert_eq!(q_non_central_chi_square(3.0, 5.0, 1.0, true).unwrap(), 0.0);
        assert!(q_non_central_chi_square(3.0, 5.0, 1.5, false).is_err());
        assert!(q_non_central_chi_square(3.0, -1.0, 0.5, false).is_err());
        // zero non-centrality is twice the Gamma(ν/2) quantile
        for &p in &[0.05, 0.5, 0.97] {
            let central = 2.0 * q_gamma(1.5, p, false).unwrap();
            assert!(rel(q_non_central_chi_square(3.0, 0.0, p, false).unwrap(), central) < 1e-10);
        }
    }

    #[test]
    fn student_quantile_reference_values() {
        assert!(rel(q_non_central_student(10.0, 1.5, 0.7939391090361835, false).unwrap(), 2.5) < 1e-10);
        assert!(rel(q_non_central_student(10.0, 1.5, 0.2060608909638165, true).unwrap(), 2.5) < 1e-10);
        assert!(rel(q_non_central_student(4.0, -2.0, 0.8421264753272995, false).unwrap(), -1.0) < 1e-10);
        // small tails on the opposite side of the non-centrality
        assert!(rel(q_non_central_student(3.0, 4.0, 5.7075327096646125e-6, false).unwrap(), -0.5) < 1e-8);
        assert!(rel(q_non_central_student(10.0, 12.0, 2.1525746121947494e-41, false).unwrap(), -3.0) < 1e-8);
    }

    #[test]
    fn student_quantile_round_trip() {
        for &(nu, delta) in &[(2.0, 0.7), (10.0, 1.5), (15.0, -3.0), (0.8, 2.0)] {
            for &t in &[-6.0, -2.0, -0.4, 0.7, 3.0, 8.0] {
                for &tail in &[false, true] {
                    let p = p_non_central_student(nu, delta, t, tail).unwrap();
                    if p < 1e-12 || p > 1.0 - 1e-12 {
                        continue;
                    }
                    let back = q_non_central_student(nu, delta, p, tail).unwrap();
                    assert!(rel(back, t) < 1e-8, "nu={} delta={} t={} tail={} got {}", nu, delta, t, tail, back);
                }
            }
        }
    }

    #[test]
    fn student_quantile_is_monotone() {
        let ps = [1e-6, 0.01, 0.2, 0.5, 0.8, 0.99, 1.0 - 1e-6];
        let lower: Vec<f64> = ps.iter().map(|&p| q_non_central_student(7.0, 1.2, p, false).unwrap()).collect();
        assert!(lower.windows(2).all(|w| w[0] < w[1]), "{:?}", lower);
        let upper: Vec<f64> = ps.iter().map(|&p| q_non_central_student(7.0, 1.2, p, true).unwrap()).collect();
        assert!(upper.windows(2).all(|w| w[0] > w[1]), "{:?}", upper);
    }

    #[test]
    fn student_quantile_edges() {
        assert_eq!(q_non_central_student(5.0, 1.0, 0.0, false).unwrap(), f64::NEG_INFINITY);
        assert_eq!(q_non_central_student(5.0, 1.0, 1.0, false).unwrap(), f64::INFINITY);
        assert_eq!(q_non_central_student(5.0, 1.0, 0.0, true).unwrap(), f64::INFINITY);
        assert!(q_non_central_student(5.0, 1.0, -0.1, false).is_err());
        assert!(q_non_central_student(0.0, 1.0, 0.5, false).is_err());
        for &p in &[0.05, 0.3, 0.8, 0.99] {
            let central = q_student(5.0, p, false).unwrap();
            assert!(rel(q_non_central_student(5.0, 0.0, p, false).unwrap(), central) < 1e-10);
        }
        // F(0) = Φ(-δ)
        let at_zero = normal_cdf_scalar(-1.3);
        assert!(q_non_central_student(9.0, 1.3, at_zero, false).unwrap().abs() < 1e-9);
    }

    #[test]
    fn sample_moments() {
        let mut rng = RandomGenerator::from_seed(23);
        let n = 100_000;
        let (nu, lambda) = (4.0, 6.0);
        let xs: Vec<f64> = (0..n)
            .map(|_| r_non_central_chi_square(&mut rng, nu, lambda).unwrap())
            .collect();
        let mean = xs.iter().sum::<f64>() / n as f64;
        let var = xs.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n as f64 - 1.0);
        assert!((mean - (nu + lambda)).abs() < 0.1);
        assert!((var / (2.0 * (nu + 2.0 * lambda)) - 1.0).abs() < 0.04);

        // E[T] = δ √(ν/2) Γ((ν-1)/2) / Γ(ν/2)
        let (nu, delta): (f64, f64) = (12.0, 1.5);
        let expected = delta * (0.5 * nu).sqrt() * (ln_gamma(0.5 * (nu - 1.0)) - ln_gamma(0.5 * nu)).exp();
        let mean = (0..n)
            .map(|_| r_non_central_student(&mut rng, nu, delta).unwrap())
            .sum::<f64>()
            / n as f64;
        assert!((mean - expected).abs() < 0.02);
    }
}
