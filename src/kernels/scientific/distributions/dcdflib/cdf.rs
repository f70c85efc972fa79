// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **CDF Families** - *Solve for Any One Unknown of a Distribution*
//!
//! Each family takes a query enum whose variant names the unknown and carries the
//! known quantities as its payload. The result is a fully populated point: the
//! given values echoed back plus the solved one, with both `p` (lower tail) and
//! `q` (upper tail) filled in.
//!
//! Queries that supply probabilities take both `p` and `q`; they must lie in
//! [0, 1] and sum to one within a few ulps. Passing both lets a caller with a tiny
//! upper tail keep it exact.
//!
//! Unknowns with a closed form (normal mean and standard deviation, gamma
//! argument and rate, Poisson mean) are computed directly. All others go through
//! [`invert_cdf`] on the forward ratio, working on whichever tail is smaller.
//!
//! | family | forward ratio |
//! |---|---|
//! | beta | `I_x(a, b)` |
//! | binomial | `I_{1-pr}(n - s, s + 1)` |
//! | chi-square | `P(df/2, x/2)` |
//! | F | `I_{x}(dfn/2, dfd/2)` at `x = dfn f / (dfd + dfn f)` |
//! | gamma | `P(shape, rate · x)` |
//! | negative binomial | `I_pr(n, s + 1)` |
//! | normal | `½ erfc(-z/√2)` |
//! | Poisson | `Q(s + 1, λ)` |
//! | Student t | `½ I_{df/(df+t²)}(df/2, ½)` per tail |
//!
//! The F law is not monotone in either degrees of freedom. Those two unknowns are
//! searched outward from the starting guess, so when two values are admissible
//! the one nearer the guess comes back.

use std::f64::consts::SQRT_2;

use crate::kernels::scientific::distributions::dcdflib::beta_inc::beta_inc;
use crate::kernels::scientific::distributions::dcdflib::gamma_inc::{gamma_inc, gamma_inc_inv};
use crate::kernels::scientific::distributions::dcdflib::solver::{
    SolverSettings, invert_cdf, invert_cdf_near,
};
use crate::kernels::scientific::distributions::dcdflib::{CdfResult, invalid};
use crate::kernels::scientific::distributions::shared::scalar::normal_quantile_scalar;
use crate::kernels::scientific::erf::erfc;

const POSITIVE_RANGE: SolverSettings = SolverSettings::bounded(1e-100, 1e100);
const NON_NEGATIVE_RANGE: SolverSettings = SolverSettings::bounded(0.0, 1e100);
const UNIT_RANGE: SolverSettings = SolverSettings::bounded(0.0, 1.0);
const REAL_RANGE: SolverSettings = SolverSettings::bounded(-1e100, 1e100);

const START: f64 = 5.0;

fn check_pq(fname: &str, p: f64, q: f64) -> CdfResult<()> {
    if !(0.0..=1.0).contains(&p) || !(0.0..=1.0).contains(&q) {
        return Err(invalid(fname, "p and q must lie in [0, 1]"));
    }
    if (p + q - 0.5 - 0.5).abs() > 3.0 * f64::EPSILON {
        return Err(invalid(fname, "p + q must equal 1"));
    }
    Ok(())
}

fn check_complement(fname: &str, name: &str, x: f64, y: f64) -> CdfResult<()> {
    if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
        return Err(invalid(fname, format!("{} and its complement must lie in [0, 1]", name)));
    }
    if (x + y - 0.5 - 0.5).abs() > 3.0 * f64::EPSILON {
        return Err(invalid(fname, format!("{} + complement must equal 1", name)));
    }
    Ok(())
}

fn check_positive(fname: &str, name: &str, v: f64) -> CdfResult<()> {
    if !(v > 0.0) || v.is_infinite() {
        return Err(invalid(fname, format!("{} must be positive and finite", name)));
    }
    Ok(())
}

fn check_non_negative(fname: &str, name: &str, v: f64) -> CdfResult<()> {
    if !(v >= 0.0) || v.is_infinite() {
        return Err(invalid(fname, format!("{} must be non-negative and finite", name)));
    }
    Ok(())
}

/// Standard normal `z` with lower tail `p` and upper tail `q`.
#[inline]
fn std_normal_inverse(p: f64, q: f64) -> f64 {
    if p <= q {
        normal_quantile_scalar(p, 0.0, 1.0)
    } else {
        -normal_quantile_scalar(q, 0.0, 1.0)
    }
}

// ----------------------------------------------------------------------------
// Beta
// ----------------------------------------------------------------------------

/// Unknown of a beta query; `y = 1 - x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BetaQuery {
    Probability { x: f64, y: f64, a: f64, b: f64 },
    Argument { p: f64, q: f64, a: f64, b: f64 },
    ShapeA { p: f64, q: f64, x: f64, y: f64, b: f64 },
    ShapeB { p: f64, q: f64, x: f64, y: f64, a: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetaPoint {
    pub p: f64,
    pub q: f64,
    pub x: f64,
    pub y: f64,
    pub a: f64,
    pub b: f64,
}

/// Beta distribution on [0, 1].
pub fn cdf_beta(query: BetaQuery) -> CdfResult<BetaPoint> {
    const FNAME: &str = "cdf_beta";
    match query {
        BetaQuery::Probability { x, y, a, b } => {
            check_complement(FNAME, "x", x, y)?;
            check_positive(FNAME, "a", a)?;
            check_positive(FNAME, "b", b)?;
            let (p, q) = beta_inc(a, b, x, y)?;
            Ok(BetaPoint { p, q, x, y, a, b })
        }
        BetaQuery::Argument { p, q, a, b } => {
            check_pq(FNAME, p, q)?;
            check_positive(FNAME, "a", a)?;
            check_positive(FNAME, "b", b)?;
            let (x, y) = if p <= q {
                let x = invert_cdf(|x| beta_inc(a, b, x, 1.0 - x), p, q, 0.5, &UNIT_RANGE)?
                    .into_result()?;
                (x, 0.5 - x + 0.5)
            } else {
                // I_y(b, a) = q as a function of y
                let y = invert_cdf(|y| beta_inc(b, a, y, 1.0 - y), q, p, 0.5, &UNIT_RANGE)?
                    .into_result()?;
                (0.5 - y + 0.5, y)
            };
            Ok(BetaPoint { p, q, x, y, a, b })
        }
        BetaQuery::ShapeA { p, q, x, y, b } => {
            check_pq(FNAME, p, q)?;
            check_complement(FNAME, "x", x, y)?;
            check_positive(FNAME, "b", b)?;
            let a = invert_cdf(|a| beta_inc(a, b, x, y), p, q, START, &POSITIVE_RANGE)?
                .into_result()?;
            Ok(BetaPoint { p, q, x, y, a, b })
        }
        BetaQuery::ShapeB { p, q, x, y, a } => {
            check_pq(FNAME, p, q)?;
            check_complement(FNAME, "x", x, y)?;
            check_positive(FNAME, "a", a)?;
            let b = invert_cdf(|b| beta_inc(a, b, x, y), p, q, START, &POSITIVE_RANGE)?
                .into_result()?;
            Ok(BetaPoint { p, q, x, y, a, b })
        }
    }
}

// ----------------------------------------------------------------------------
// Binomial
// ----------------------------------------------------------------------------

/// Unknown of a binomial query: `s` successes in `xn` trials with success
/// probability `pr`, `ompr = 1 - pr`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinomialQuery {
    Probability { s: f64, xn: f64, pr: f64, ompr: f64 },
    Successes { p: f64, q: f64, xn: f64, pr: f64, ompr: f64 },
    Trials { p: f64, q: f64, s: f64, pr: f64, ompr: f64 },
    SuccessProbability { p: f64, q: f64, s: f64, xn: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinomialPoint {
    pub p: f64,
    pub q: f64,
    pub s: f64,
    pub xn: f64,
    pub pr: f64,
    pub ompr: f64,
}

/// `P(S ≤ s)` and its complement, with `s` treated as continuous.
fn binomial_pair(s: f64, xn: f64, pr: f64, ompr: f64) -> CdfResult<(f64, f64)> {
    if s < xn {
        let (ccum, cum) = beta_inc(s + 1.0, xn - s, pr, ompr)?;
        Ok((cum, ccum))
    } else {
        Ok((1.0, 0.0))
    }
}

/// Binomial distribution.
pub fn cdf_binomial(query: BinomialQuery) -> CdfResult<BinomialPoint> {
    const FNAME: &str = "cdf_binomial";
    match query {
        BinomialQuery::Probability { s, xn, pr, ompr } => {
            check_positive(FNAME, "xn", xn)?;
            check_complement(FNAME, "pr", pr, ompr)?;
            if !(0.0..=xn).contains(&s) {
                return Err(invalid(FNAME, "s must lie in [0, xn]"));
            }
            let (p, q) = binomial_pair(s, xn, pr, ompr)?;
            Ok(BinomialPoint { p, q, s, xn, pr, ompr })
        }
        BinomialQuery::Successes { p, q, xn, pr, ompr } => {
            check_pq(FNAME, p, q)?;
            check_positive(FNAME, "xn", xn)?;
            check_complement(FNAME, "pr", pr, ompr)?;
            let range = SolverSettings::bounded(0.0, xn);
            let s = invert_cdf(|s| binomial_pair(s, xn, pr, ompr), p, q, 0.5 * xn, &range)?
                .into_result()?;
            Ok(BinomialPoint { p, q, s, xn, pr, ompr })
        }
        BinomialQuery::Trials { p, q, s, pr, ompr } => {
            check_pq(FNAME, p, q)?;
            check_non_negative(FNAME, "s", s)?;
            check_complement(FNAME, "pr", pr, ompr)?;
            let range = SolverSettings::bounded(s.max(1e-100), 1e100);
            let xn = invert_cdf(|xn| binomial_pair(s, xn, pr, ompr), p, q, s + START, &range)?
                .into_result()?;
            Ok(BinomialPoint { p, q, s, xn, pr, ompr })
        }
        BinomialQuery::SuccessProbability { p, q, s, xn } => {
            check_pq(FNAME, p, q)?;
            check_positive(FNAME, "xn", xn)?;
            if !(0.0..=xn).contains(&s) {
                return Err(invalid(FNAME, "s must lie in [0, xn]"));
            }
            let pr = invert_cdf(|pr| binomial_pair(s, xn, pr, 1.0 - pr), p, q, 0.5, &UNIT_RANGE)?
                .into_result()?;
            Ok(BinomialPoint { p, q, s, xn, pr, ompr: 0.5 - pr + 0.5 })
        }
    }
}

// ----------------------------------------------------------------------------
// Chi-square
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChiSquareQuery {
    Probability { x: f64, df: f64 },
    Argument { p: f64, q: f64, df: f64 },
    DegreesOfFreedom { p: f64, q: f64, x: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquarePoint {
    pub p: f64,
    pub q: f64,
    pub x: f64,
    pub df: f64,
}

#[inline]
fn chi_square_pair(x: f64, df: f64) -> CdfResult<(f64, f64)> {
    gamma_inc(0.5 * df, 0.5 * x)
}

/// Central chi-square distribution.
pub fn cdf_chi_square(query: ChiSquareQuery) -> CdfResult<ChiSquarePoint> {
    const FNAME: &str = "cdf_chi_square";
    match query {
        ChiSquareQuery::Probability { x, df } => {
            check_non_negative(FNAME, "x", x)?;
            check_positive(FNAME, "df", df)?;
            let (p, q) = chi_square_pair(x, df)?;
            Ok(ChiSquarePoint { p, q, x, df })
        }
        ChiSquareQuery::Argument { p, q, df } => {
            check_pq(FNAME, p, q)?;
            check_positive(FNAME, "df", df)?;
            let x = 2.0 * gamma_inc_inv(0.5 * df, p, q)?;
            Ok(ChiSquarePoint { p, q, x, df })
        }
        ChiSquareQuery::DegreesOfFreedom { p, q, x } => {
            check_pq(FNAME, p, q)?;
            check_positive(FNAME, "x", x)?;
            let df = invert_cdf(|df| chi_square_pair(x, df), p, q, START, &POSITIVE_RANGE)?
                .into_result()?;
            Ok(ChiSquarePoint { p, q, x, df })
        }
    }
}

// ----------------------------------------------------------------------------
// F
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FQuery {
    Probability { f: f64, dfn: f64, dfd: f64 },
    Argument { p: f64, q: f64, dfn: f64, dfd: f64 },
    Numerator { p: f64, q: f64, f: f64, dfd: f64 },
    Denominator { p: f64, q: f64, f: f64, dfn: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FPoint {
    pub p: f64,
    pub q: f64,
    pub f: f64,
    pub dfn: f64,
    pub dfd: f64,
}

fn f_pair(f: f64, dfn: f64, dfd: f64) -> CdfResult<(f64, f64)> {
    if f <= 0.0 {
        return Ok((0.0, 1.0));
    }
    let prod = dfn * f;
    let dsum = dfd + prod;
    let mut xx = dfd / dsum;
    let yy = if xx > 0.5 {
        let yy = prod / dsum;
        xx = 0.5 - yy + 0.5;
        yy
    } else {
        0.5 - xx + 0.5
    };
    let (ccum, cum) = beta_inc(0.5 * dfd, 0.5 * dfn, xx, yy)?;
    Ok((cum, ccum))
}

/// Central F distribution.
pub fn cdf_f(query: FQuery) -> CdfResult<FPoint> {
    const FNAME: &str = "cdf_f";
    match query {
        FQuery::Probability { f, dfn, dfd } => {
            check_non_negative(FNAME, "f", f)?;
            check_positive(FNAME, "dfn", dfn)?;
            check_positive(FNAME, "dfd", dfd)?;
            let (p, q) = f_pair(f, dfn, dfd)?;
            Ok(FPoint { p, q, f, dfn, dfd })
        }
        FQuery::Argument { p, q, dfn, dfd } => {
            check_pq(FNAME, p, q)?;
            check_positive(FNAME, "dfn", dfn)?;
            check_positive(FNAME, "dfd", dfd)?;
            let f = invert_cdf(|f| f_pair(f, dfn, dfd), p, q, START, &NON_NEGATIVE_RANGE)?
                .into_result()?;
            Ok(FPoint { p, q, f, dfn, dfd })
        }
        FQuery::Numerator { p, q, f, dfd } => {
            check_pq(FNAME, p, q)?;
            check_non_negative(FNAME, "f", f)?;
            check_positive(FNAME, "dfd", dfd)?;
            let dfn = invert_cdf_near(|dfn| f_pair(f, dfn, dfd), p, q, START, &POSITIVE_RANGE)?
                .into_result()?;
            Ok(FPoint { p, q, f, dfn, dfd })
        }
        FQuery::Denominator { p, q, f, dfn } => {
            check_pq(FNAME, p, q)?;
            check_non_negative(FNAME, "f", f)?;
            check_positive(FNAME, "dfn", dfn)?;
            let dfd = invert_cdf_near(|dfd| f_pair(f, dfn, dfd), p, q, START, &POSITIVE_RANGE)?
                .into_result()?;
            Ok(FPoint { p, q, f, dfn, dfd })
        }
    }
}

// ----------------------------------------------------------------------------
// Gamma
// ----------------------------------------------------------------------------

/// Unknown of a gamma query; the density is proportional to
/// `x^{shape-1} e^{-rate·x}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GammaQuery {
    Probability { x: f64, shape: f64, rate: f64 },
    Argument { p: f64, q: f64, shape: f64, rate: f64 },
    Shape { p: f64, q: f64, x: f64, rate: f64 },
    Rate { p: f64, q: f64, x: f64, shape: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaPoint {
    pub p: f64,
    pub q: f64,
    pub x: f64,
    pub shape: f64,
    pub rate: f64,
}

/// Gamma distribution.
pub fn cdf_gamma(query: GammaQuery) -> CdfResult<GammaPoint> {
    const FNAME: &str = "cdf_gamma";
    match query {
        GammaQuery::Probability { x, shape, rate } => {
            check_non_negative(FNAME, "x", x)?;
            check_positive(FNAME, "shape", shape)?;
            check_positive(FNAME, "rate", rate)?;
            let (p, q) = gamma_inc(shape, x * rate)?;
            Ok(GammaPoint { p, q, x, shape, rate })
        }
        GammaQuery::Argument { p, q, shape, rate } => {
            check_pq(FNAME, p, q)?;
            check_positive(FNAME, "shape", shape)?;
            check_positive(FNAME, "rate", rate)?;
            let x = gamma_inc_inv(shape, p, q)? / rate;
            Ok(GammaPoint { p, q, x, shape, rate })
        }
        GammaQuery::Shape { p, q, x, rate } => {
            check_pq(FNAME, p, q)?;
            check_positive(FNAME, "x", x)?;
            check_positive(FNAME, "rate", rate)?;
            let xs = x * rate;
            let shape = invert_cdf(|a| gamma_inc(a, xs), p, q, START, &POSITIVE_RANGE)?
                .into_result()?;
            Ok(GammaPoint { p, q, x, shape, rate })
        }
        GammaQuery::Rate { p, q, x, shape } => {
            check_pq(FNAME, p, q)?;
            check_positive(FNAME, "x", x)?;
            check_positive(FNAME, "shape", shape)?;
            let xs = gamma_inc_inv(shape, p, q)?;
            Ok(GammaPoint { p, q, x, shape, rate: xs / x })
        }
    }
}

// ----------------------------------------------------------------------------
// Negative binomial
// ----------------------------------------------------------------------------

/// Unknown of a negative binomial query: `s` failures before the `xn`-th success.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NegativeBinomialQuery {
    Probability { s: f64, xn: f64, pr: f64, ompr: f64 },
    Failures { p: f64, q: f64, xn: f64, pr: f64, ompr: f64 },
    Successes { p: f64, q: f64, s: f64, pr: f64, ompr: f64 },
    SuccessProbability { p: f64, q: f64, s: f64, xn: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegativeBinomialPoint {
    pub p: f64,
    pub q: f64,
    pub s: f64,
    pub xn: f64,
    pub pr: f64,
    pub ompr: f64,
}

#[inline]
fn negative_binomial_pair(s: f64, xn: f64, pr: f64, ompr: f64) -> CdfResult<(f64, f64)> {
    beta_inc(xn, s + 1.0, pr, ompr)
}

/// Negative binomial distribution.
pub fn cdf_negative_binomial(query: NegativeBinomialQuery) -> CdfResult<NegativeBinomialPoint> {
    const FNAME: &str = "cdf_negative_binomial";
    match query {
        NegativeBinomialQuery::Probability { s, xn, pr, ompr } => {
            check_non_negative(FNAME, "s", s)?;
            check_positive(FNAME, "xn", xn)?;
            check_complement(FNAME, "pr", pr, ompr)?;
            let (p, q) = negative_binomial_pair(s, xn, pr, ompr)?;
            Ok(NegativeBinomialPoint { p, q, s, xn, pr, ompr })
        }
        NegativeBinomialQuery::Failures { p, q, xn, pr, ompr } => {
            check_pq(FNAME, p, q)?;
            check_positive(FNAME, "xn", xn)?;
            check_complement(FNAME, "pr", pr, ompr)?;
            let s = invert_cdf(
                |s| negative_binomial_pair(s, xn, pr, ompr),
                p,
                q,
                START,
                &NON_NEGATIVE_RANGE,
            )?
            .into_result()?;
            Ok(NegativeBinomialPoint { p, q, s, xn, pr, ompr })
        }
        NegativeBinomialQuery::Successes { p, q, s, pr, ompr } => {
            check_pq(FNAME, p, q)?;
            check_non_negative(FNAME, "s", s)?;
            check_complement(FNAME, "pr", pr, ompr)?;
            let xn = invert_cdf(
                |xn| negative_binomial_pair(s, xn, pr, ompr),
                p,
                q,
                START,
                &POSITIVE_RANGE,
            )?
            .into_result()?;
            Ok(NegativeBinomialPoint { p, q, s, xn, pr, ompr })
        }
        NegativeBinomialQuery::SuccessProbability { p, q, s, xn } => {
            check_pq(FNAME, p, q)?;
            check_non_negative(FNAME, "s", s)?;
            check_positive(FNAME, "xn", xn)?;
            let pr = invert_cdf(
                |pr| negative_binomial_pair(s, xn, pr, 1.0 - pr),
                p,
                q,
                0.5,
                &UNIT_RANGE,
            )?
            .into_result()?;
            Ok(NegativeBinomialPoint { p, q, s, xn, pr, ompr: 0.5 - pr + 0.5 })
        }
    }
}

// ----------------------------------------------------------------------------
// Normal
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalQuery {
    Probability { x: f64, mean: f64, sd: f64 },
    Argument { p: f64, q: f64, mean: f64, sd: f64 },
    Mean { p: f64, q: f64, x: f64, sd: f64 },
    StandardDeviation { p: f64, q: f64, x: f64, mean: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalPoint {
    pub p: f64,
    pub q: f64,
    pub x: f64,
    pub mean: f64,
    pub sd: f64,
}

/// Normal distribution. Every unknown has a closed form.
pub fn cdf_normal(query: NormalQuery) -> CdfResult<NormalPoint> {
    const FNAME: &str = "cdf_normal";
    match query {
        NormalQuery::Probability { x, mean, sd } => {
            check_positive(FNAME, "sd", sd)?;
            if x.is_nan() || !mean.is_finite() {
                return Err(invalid(FNAME, "x and mean must be numbers"));
            }
            let z = (x - mean) / sd;
            let p = 0.5 * erfc(-z / SQRT_2);
            let q = 0.5 * erfc(z / SQRT_2);
            Ok(NormalPoint { p, q, x, mean, sd })
        }
        NormalQuery::Argument { p, q, mean, sd } => {
            check_pq(FNAME, p, q)?;
            check_positive(FNAME, "sd", sd)?;
            let x = mean + sd * std_normal_inverse(p, q);
            Ok(NormalPoint { p, q, x, mean, sd })
        }
        NormalQuery::Mean { p, q, x, sd } => {
            check_pq(FNAME, p, q)?;
            check_positive(FNAME, "sd", sd)?;
            let z = std_normal_inverse(p, q);
            if !z.is_finite() {
                return Err(invalid(FNAME, "p must lie strictly inside (0, 1)"));
            }
            Ok(NormalPoint { p, q, x, mean: x - sd * z, sd })
        }
        NormalQuery::StandardDeviation { p, q, x, mean } => {
            check_pq(FNAME, p, q)?;
            let z = std_normal_inverse(p, q);
            let sd = (x - mean) / z;
            if !(sd > 0.0) || sd.is_infinite() {
                return Err(invalid(FNAME, "no positive standard deviation attains p"));
            }
            Ok(NormalPoint { p, q, x, mean, sd })
        }
    }
}

// ----------------------------------------------------------------------------
// Poisson
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoissonQuery {
    Probability { s: f64, lambda: f64 },
    Count { p: f64, q: f64, lambda: f64 },
    Mean { p: f64, q: f64, s: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoissonPoint {
    pub p: f64,
    pub q: f64,
    pub s: f64,
    pub lambda: f64,
}

#[inline]
fn poisson_pair(s: f64, lambda: f64) -> CdfResult<(f64, f64)> {
    if lambda == 0.0 {
        return Ok((1.0, 0.0));
    }
    let (lower, upper) = gamma_inc(s + 1.0, lambda)?;
    Ok((upper, lower))
}

/// Poisson distribution, `s` treated as continuous.
pub fn cdf_poisson(query: PoissonQuery) -> CdfResult<PoissonPoint> {
    const FNAME: &str = "cdf_poisson";
    match query {
        PoissonQuery::Probability { s, lambda } => {
            check_non_negative(FNAME, "s", s)?;
            check_non_negative(FNAME, "lambda", lambda)?;
            let (p, q) = poisson_pair(s, lambda)?;
            Ok(PoissonPoint { p, q, s, lambda })
        }
        PoissonQuery::Count { p, q, lambda } => {
            check_pq(FNAME, p, q)?;
            check_positive(FNAME, "lambda", lambda)?;
            let s = invert_cdf(|s| poisson_pair(s, lambda), p, q, START, &NON_NEGATIVE_RANGE)?
                .into_result()?;
            Ok(PoissonPoint { p, q, s, lambda })
        }
        PoissonQuery::Mean { p, q, s } => {
            check_pq(FNAME, p, q)?;
            check_non_negative(FNAME, "s", s)?;
            // the lower Poisson tail is the upper gamma tail
            let lambda = gamma_inc_inv(s + 1.0, q, p)?;
            Ok(PoissonPoint { p, q, s, lambda })
        }
    }
}

// ----------------------------------------------------------------------------
// Student t
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StudentQuery {
    Probability { t: f64, df: f64 },
    Argument { p: f64, q: f64, df: f64 },
    DegreesOfFreedom { p: f64, q: f64, t: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudentPoint {
    pub p: f64,
    pub q: f64,
    pub t: f64,
    pub df: f64,
}

fn student_pair(t: f64, df: f64) -> CdfResult<(f64, f64)> {
    if t.is_infinite() {
        return Ok(if t > 0.0 { (1.0, 0.0) } else { (0.0, 1.0) });
    }
    let tt = t * t;
    let dfptt = df + tt;
    let (a, oma) = beta_inc(0.5 * df, 0.5, df / dfptt, tt / dfptt)?;
    if t <= 0.0 {
        let cum = 0.5 * a;
        Ok((cum, oma + cum))
    } else {
        let ccum = 0.5 * a;
        Ok((oma + ccum, ccum))
    }
}

/// Student t distribution.
pub fn cdf_student(query: StudentQuery) -> CdfResult<StudentPoint> {
    const FNAME: &str = "cdf_student";
    match query {
        StudentQuery::Probability { t, df } => {
            if t.is_nan() {
                return Err(invalid(FNAME, "t is NaN"));
            }
            check_positive(FNAME, "df", df)?;
            let (p, q) = student_pair(t, df)?;
            Ok(StudentPoint { p, q, t, df })
        }
        StudentQuery::Argument { p, q, df } => {
            check_pq(FNAME, p, q)?;
            check_positive(FNAME, "df", df)?;
            if p == 0.0 || q == 0.0 {
                let t = if p == 0.0 { f64::NEG_INFINITY } else { f64::INFINITY };
                return Ok(StudentPoint { p, q, t, df });
            }
            let start = std_normal_inverse(p, q);
            let t = invert_cdf(|t| student_pair(t, df), p, q, start, &REAL_RANGE)?
                .into_result()?;
            Ok(StudentPoint { p, q, t, df })
        }
        StudentQuery::DegreesOfFreedom { p, q, t } => {
            check_pq(FNAME, p, q)?;
            if !t.is_finite() {
                return Err(invalid(FNAME, "t must be finite"));
            }
            let range = SolverSettings::bounded(1e-100, 1e10);
            let df = invert_cdf(|df| student_pair(t, df), p, q, START, &range)?.into_result()?;
            Ok(StudentPoint { p, q, t, df })
        }
    }
}
