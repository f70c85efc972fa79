// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Monotone Root Finder** - *Bracket-and-Refine Solver for CDF Inversion*
//!
//! One solver shared by every family in [`super::cdf`]. It finds `x` with
//! `f(x) = target` for a monotone `f` over `[lower, upper]`:
//!
//! 1. Both bounds are evaluated. When the target lies outside `[f(lower), f(upper)]`
//!    the search fails with [`CdfError::OutOfBracket`] naming the bound it ran into.
//! 2. From the starting point, steps of geometrically growing length walk towards
//!    the target until the sign of `f - target` changes.
//! 3. The bracket is refined by Newton steps guarded with bisection when `f`
//!    reports a derivative, and by Brent's method otherwise.
//!
//! Exhausting the iteration budget is not an error: the best estimate comes back
//! with `converged = false`.

use log::warn;

use crate::kernels::scientific::distributions::dcdflib::{CdfError, CdfResult, Side, invalid};

/// Function value and, when cheaply available, its derivative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub value: f64,
    pub derivative: Option<f64>,
}

/// A one-dimensional monotone function, increasing or decreasing.
pub trait MonotoneFunction {
    fn evaluate(&mut self, x: f64) -> CdfResult<Evaluation>;
}

impl<F> MonotoneFunction for F
where
    F: FnMut(f64) -> CdfResult<f64>,
{
    #[inline]
    fn evaluate(&mut self, x: f64) -> CdfResult<Evaluation> {
        Ok(Evaluation {
            value: self(x)?,
            derivative: None,
        })
    }
}

/// Adapter for closures returning `(value, derivative)`.
pub struct WithDerivative<F>(pub F);

impl<F> MonotoneFunction for WithDerivative<F>
where
    F: FnMut(f64) -> CdfResult<(f64, f64)>,
{
    #[inline]
    fn evaluate(&mut self, x: f64) -> CdfResult<Evaluation> {
        let (value, d) = (self.0)(x)?;
        Ok(Evaluation {
            value,
            derivative: Some(d),
        })
    }
}

/// Search interval, tolerances and step-out schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    pub lower: f64,
    pub upper: f64,
    pub abs_tol: f64,
    pub rel_tol: f64,
    /// Initial step length, scaled by `max(1, |x|)`.
    pub step: f64,
    /// Growth factor of successive steps while bracketing.
    pub step_multiplier: f64,
    pub max_iter: usize,
}

impl SolverSettings {
    pub const DEFAULT: SolverSettings = SolverSettings {
        lower: 0.0,
        upper: 1e300,
        abs_tol: 1e-100,
        rel_tol: 1e-13,
        step: 0.5,
        step_multiplier: 5.0,
        max_iter: 1000,
    };

    /// Default tolerances over `[lower, upper]`.
    #[inline]
    pub const fn bounded(lower: f64, upper: f64) -> Self {
        SolverSettings {
            lower,
            upper,
            ..Self::DEFAULT
        }
    }

    #[inline(always)]
    fn tolerance(&self, x: f64) -> f64 {
        self.abs_tol.max(self.rel_tol * x.abs())
    }
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Outcome of a search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    pub value: f64,
    pub converged: bool,
}

impl Root {
    #[inline]
    fn exact(value: f64) -> Self {
        Root {
            value,
            converged: true,
        }
    }

    /// The root, or [`CdfError::NoConvergence`] carrying the best estimate.
    #[inline]
    pub fn into_result(self) -> CdfResult<f64> {
        if self.converged {
            Ok(self.value)
        } else {
            Err(CdfError::NoConvergence { best: self.value })
        }
    }
}

/// Oriented view of `f - target` that increases in `x`.
struct Oriented<'a, F: MonotoneFunction + ?Sized> {
    f: &'a mut F,
    target: f64,
    sign: f64,
}

impl<F: MonotoneFunction + ?Sized> Oriented<'_, F> {
    #[inline]
    fn eval(&mut self, x: f64) -> CdfResult<(f64, Option<f64>)> {
        let e = self.f.evaluate(x)?;
        Ok((
            self.sign * (e.value - self.target),
            e.derivative.map(|d| self.sign * d),
        ))
    }
}

/// Solves `f(x) = target` for monotone `f`, starting the bracket search at `start`.
///
/// # Errors
/// - `InvalidArgument` for inconsistent settings.
/// - `OutOfBracket` when the target is not attained on `[lower, upper]`.
/// - Any error raised by `f`.
pub fn solve<F>(f: &mut F, target: f64, start: f64, settings: &SolverSettings) -> CdfResult<Root>
where
    F: MonotoneFunction + ?Sized,
{
    const FNAME: &str = "solve";
    let s = settings;
    if !(s.lower < s.upper) {
        return Err(invalid(FNAME, "lower bound must be below upper bound"));
    }
    if !(s.abs_tol > 0.0 && s.rel_tol > 0.0 && s.step > 0.0 && s.step_multiplier > 1.0) {
        return Err(invalid(FNAME, "tolerances and steps must be positive"));
    }
    if target.is_nan() || start.is_nan() {
        return Err(invalid(FNAME, "NaN target or start"));
    }

    let f_lower = f.evaluate(s.lower)?.value - target;
    if f_lower == 0.0 {
        return Ok(Root::exact(s.lower));
    }
    let f_upper = f.evaluate(s.upper)?.value - target;
    if f_upper == 0.0 {
        return Ok(Root::exact(s.upper));
    }
    if f_lower.signum() == f_upper.signum() {
        let increasing = f_upper >= f_lower;
        // target below the whole range of an increasing function lies left of `lower`
        let below = (f_lower > 0.0) == increasing;
        return Err(if below {
            CdfError::OutOfBracket {
                side: Side::Lower,
                bound: s.lower,
            }
        } else {
            CdfError::OutOfBracket {
                side: Side::Upper,
                bound: s.upper,
            }
        });
    }

    let mut h = Oriented {
        f,
        target,
        sign: if f_lower < 0.0 { 1.0 } else { -1.0 },
    };

    let x0 = start.clamp(s.lower, s.upper);
    let (h0, d0) = h.eval(x0)?;
    if h0 == 0.0 {
        return Ok(Root::exact(x0));
    }

    let (xl, hl, xh, hh) = bracket(&mut h, x0, h0, s)?;

    if d0.is_some() {
        newton_bisect(&mut h, xl, xh, x0, s)
    } else {
        brent(&mut h, xl, hl, xh, hh, s)
    }
}

/// Walks from `x0` until `h` changes sign. Returns `(xl, h(xl), xh, h(xh))` with
/// `h(xl) < 0 < h(xh)`.
fn bracket<F: MonotoneFunction + ?Sized>(
    h: &mut Oriented<'_, F>,
    x0: f64,
    h0: f64,
    s: &SolverSettings,
) -> CdfResult<(f64, f64, f64, f64)> {
    let mut step = s.step * x0.abs().max(1.0);
    let (mut x, mut hx) = (x0, h0);
    if h0 < 0.0 {
        loop {
            let next = (x + step).min(s.upper);
            let h_next = h.eval(next)?.0;
            if h_next >= 0.0 || next == s.upper {
                return Ok((x, hx, next, h_next));
            }
            x = next;
            hx = h_next;
            step *= s.step_multiplier;
        }
    } else {
        loop {
            let next = (x - step).max(s.lower);
            let h_next = h.eval(next)?.0;
            if h_next <= 0.0 || next == s.lower {
                return Ok((next, h_next, x, hx));
            }
            x = next;
            hx = h_next;
            step *= s.step_multiplier;
        }
    }
}

/// Newton iteration kept inside `[xl, xh]`, bisecting whenever the step would leave
/// the bracket or fails to halve the previous one.
fn newton_bisect<F: MonotoneFunction + ?Sized>(
    h: &mut Oriented<'_, F>,
    mut xl: f64,
    mut xh: f64,
    start: f64,
    s: &SolverSettings,
) -> CdfResult<Root> {
    let mut x = if start > xl && start < xh {
        start
    } else {
        0.5 * (xl + xh)
    };
    let mut dx_old = (xh - xl).abs();
    let mut dx = dx_old;
    let (mut fx, mut dfx) = h.eval(x)?;

    for _ in 0..s.max_iter {
        if fx == 0.0 {
            return Ok(Root::exact(x));
        }
        let df = dfx.unwrap_or(0.0);
        let leaves = ((x - xh) * df - fx) * ((x - xl) * df - fx) > 0.0;
        let too_slow = (2.0 * fx).abs() > (dx_old * df).abs();
        if df == 0.0 || !df.is_finite() || leaves || too_slow {
            dx_old = dx;
            dx = 0.5 * (xh - xl);
            let mid = xl + dx;
            if mid == xl || mid == xh {
                return Ok(Root::exact(mid));
            }
            x = mid;
        } else {
            dx_old = dx;
            dx = fx / df;
            let prev = x;
            x -= dx;
            if x == prev {
                return Ok(Root::exact(x));
            }
        }
        if dx.abs() < s.tolerance(x) || (xh - xl) < s.tolerance(x) {
            return Ok(Root::exact(x));
        }
        (fx, dfx) = h.eval(x)?;
        if fx < 0.0 {
            xl = x;
        } else {
            xh = x;
        }
    }

    warn!("solve: Newton refinement exhausted {} iterations near {}", s.max_iter, x);
    Ok(Root {
        value: x,
        converged: false,
    })
}

/// Brent's method on a sign-changing bracket.
fn brent<F: MonotoneFunction + ?Sized>(
    h: &mut Oriented<'_, F>,
    mut a: f64,
    mut fa: f64,
    mut b: f64,
    mut fb: f64,
    s: &SolverSettings,
) -> CdfResult<Root> {
    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for _ in 0..s.max_iter {
        if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }
        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * s.tolerance(b);
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb == 0.0 {
            return Ok(Root::exact(b));
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            // inverse quadratic or secant
            let r_s = fb / fa;
            let (mut p, mut q);
            if a == c {
                p = 2.0 * xm * r_s;
                q = 1.0 - r_s;
            } else {
                let qq = fa / fc;
                let r = fb / fc;
                p = r_s * (2.0 * xm * qq * (qq - r) - (b - a) * (r - 1.0));
                q = (qq - 1.0) * (r - 1.0) * (r_s - 1.0);
            }
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(xm) };
        fb = h.eval(b)?.0;
    }

    warn!("solve: Brent refinement exhausted {} iterations near {}", s.max_iter, b);
    Ok(Root {
        value: b,
        converged: false,
    })
}

/// Solves `cdf(x) = p` (equivalently `ccdf(x) = q`) working on the smaller tail.
///
/// `eval` returns `(cdf, ccdf)` at `x`.
pub fn invert_cdf<E>(mut eval: E, p: f64, q: f64, start: f64, settings: &SolverSettings) -> CdfResult<Root>
where
    E: FnMut(f64) -> CdfResult<(f64, f64)>,
{
    if p <= q {
        solve(&mut |x: f64| eval(x).map(|(cum, _)| cum), p, start, settings)
    } else {
        solve(&mut |x: f64| eval(x).map(|(_, ccum)| ccum), q, start, settings)
    }
}

/// [`invert_cdf`] for a ratio that is not monotone over the whole positive range.
///
/// Steps outward from `start` by factors of two, alternating up and down, and
/// solves inside the first pair of neighbouring trial points that straddles the target.
/// Of several admissible values the one nearest `start` on a log scale comes back.
///
/// # Errors
/// `OutOfBracket` on the side whose end came closest when no trial point straddles the target.
pub fn invert_cdf_near<E>(mut eval: E, p: f64, q: f64, start: f64, settings: &SolverSettings) -> CdfResult<Root>
where
    E: FnMut(f64) -> CdfResult<(f64, f64)>,
{
    const FNAME: &str = "invert_cdf_near";
    if !(settings.lower > 0.0 && settings.lower <= start && start <= settings.upper) {
        return Err(invalid(FNAME, "needs a positive range containing the start"));
    }
    let lower_tail = p <= q;
    let target = if lower_tail { p } else { q };
    let gap = |eval: &mut E, x: f64| -> CdfResult<f64> {
        let (cum, ccum) = eval(x)?;
        Ok(if lower_tail { cum } else { ccum } - target)
    };

    let g0 = gap(&mut eval, start)?;
    if g0 == 0.0 {
        return Ok(Root::exact(start));
    }
    let (mut up, mut g_up) = (start, g0);
    let (mut down, mut g_down) = (start, g0);
    loop {
        let mut moved = false;
        if up < settings.upper {
            let next = (2.0 * up).min(settings.upper);
            let g = gap(&mut eval, next)?;
            if g == 0.0 {
                return Ok(Root::exact(next));
            }
            if g.signum() != g_up.signum() {
                let inner = SolverSettings { lower: up, upper: next, ..*settings };
                return invert_cdf(&mut eval, p, q, up, &inner);
            }
            (up, g_up) = (next, g);
            moved = true;
        }
        if down > settings.lower {
            let next = (0.5 * down).max(settings.lower);
            let g = gap(&mut eval, next)?;
            if g == 0.0 {
                return Ok(Root::exact(next));
            }
            if g.signum() != g_down.signum() {
                let inner = SolverSettings { lower: next, upper: down, ..*settings };
                return invert_cdf(&mut eval, p, q, next, &inner);
            }
            (down, g_down) = (next, g);
            moved = true;
        }
        if !moved {
            return Err(if g_up.abs() <= g_down.abs() {
                CdfError::OutOfBracket { side: Side::Upper, bound: settings.upper }
            } else {
                CdfError::OutOfBracket { side: Side::Lower, bound: settings.lower }
            });
        }
    }
}
