// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Debye Functions** - *Dₙ(x) = n/xⁿ ∫₀ˣ tⁿ/(eᵗ - 1) dt, n = 1..20*
//!
//! * x < 1e-8: first-order Taylor `1 - n x / (2(n + 1))`.
//! * x < 2: Bernoulli series
//!   `Dₙ(x) = 1 - n x / (2(n+1)) + n Σ B₂ₖ/(2k)! x²ᵏ/(2k + n)`.
//! * otherwise: the full integral n! ζ(n + 1) minus the exponential tail
//!   `Σₖ e^(-kx) Σₘ n!/(n-m)! x^(n-m) / k^(m+1)`. When the tail is more than
//!   half the full integral the difference would cancel, and the integral is
//!   taken by composite Gauss-Legendre over [0, x] instead.

use crate::config::SPEC_FUNC_PRECISION;
use crate::errors::KernelError;
use crate::kernels::scientific::distributions::shared::constants::{
    BERNOULLI_OVER_FACTORIAL, DEBYE_FULL_INTEGRAL,
};
use crate::kernels::scientific::quadrature::GaussLegendre;

const MAX_ORDER: u32 = 20;
const SERIES_LIMIT: f64 = 2.0;
const GAUSS_NODES: usize = 20;
/// Widest panel of the composite rule; the integrand's nearest poles sit at ±2πi.
const PANEL_WIDTH: f64 = 2.0;
const MAX_TAIL_TERMS: usize = 1000;

/// Debye function of order `n` at `x`.
///
/// Negative `x` returns 0.
///
/// # Errors
/// `InvalidArguments` when `n` is outside 1..=20.
pub fn debye(x: f64, n: u32) -> Result<f64, KernelError> {
    if n == 0 || n > MAX_ORDER {
        return Err(KernelError::InvalidArguments(format!(
            "debye: order {} outside 1..={}",
            n, MAX_ORDER
        )));
    }
    if x.is_nan() {
        return Ok(f64::NAN);
    }
    if x < 0.0 {
        return Ok(0.0);
    }
    let nf = n as f64;
    let linear = 1.0 - nf * x / (2.0 * (nf + 1.0));
    if x < 1e-8 {
        return Ok(linear);
    }
    if x < SERIES_LIMIT {
        let y = x * x;
        let mut power = 1.0;
        let mut sum = 0.0;
        for (k, &c) in BERNOULLI_OVER_FACTORIAL.iter().enumerate() {
            power *= y;
            let term = c * power / (2.0 * (k + 1) as f64 + nf);
            sum += term;
            if term.abs() < SPEC_FUNC_PRECISION * sum.abs() {
                break;
            }
        }
        return Ok(linear + nf * sum);
    }
    if x == f64::INFINITY {
        return Ok(0.0);
    }

    let full = DEBYE_FULL_INTEGRAL[(n - 1) as usize];
    let tail = exponential_tail(x, n);
    let integral = if tail <= 0.5 * full {
        full - tail
    } else {
        composite_integral(x, n)
    };
    // n / xⁿ, in logs once xⁿ would overflow
    let ln_scale = nf.ln() - nf * x.ln();
    Ok((integral.ln() + ln_scale).exp())
}

/// ∫ₓ^∞ tⁿ/(eᵗ - 1) dt as a sum over the geometric expansion of 1/(eᵗ - 1).
fn exponential_tail(x: f64, n: u32) -> f64 {
    // e^(-x) underflows
    if x > 745.0 {
        return 0.0;
    }
    let mut tail = 0.0;
    for k in 1..=MAX_TAIL_TERMS {
        let kf = k as f64;
        let kx = kf * x;
        // Σₘ n!/(n-m)! x^(n-m) / k^(m+1), built term by term from m = 0
        let mut term = x.powi(n as i32) / kf;
        let mut inner = term;
        for m in 1..=n {
            term *= (n - m + 1) as f64 / kx;
            inner += term;
        }
        let contribution = (-kx).exp() * inner;
        tail += contribution;
        if contribution <= SPEC_FUNC_PRECISION * tail {
            break;
        }
    }
    tail
}

fn composite_integral(x: f64, n: u32) -> f64 {
    let rule = GaussLegendre::new(GAUSS_NODES);
    let panels = (x / PANEL_WIDTH).ceil().max(1.0);
    let h = x / panels;
    let mut sum = 0.0;
    for p in 0..panels as usize {
        let a = p as f64 * h;
        sum += rule.integrate(|t| t.powi(n as i32) / t.exp_m1(), a, a + h);
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_argument_is_linear() {
        let x = 1e-9;
        assert_eq!(debye(x, 1).unwrap(), 1.0 - x / 4.0);
        assert_eq!(debye(0.0, 7).unwrap(), 1.0);
    }

    #[test]
    fn matches_quadrature_reference() {
        // mpmath: n / x^n * quad(t^n / expm1(t), [0, x])
        let cases = [
            (1, 0.5, 0.8819271567906055),
            (1, 3.0, 0.48043521957304286),
            (3, 1.0, 0.6744155640778147),
            (3, 10.0, 0.01929576569034549),
            (5, 2.5, 0.3034591346725063),
            (20, 15.0, 1.2141090413102951e-05),
            (2, 100.0, 0.0004808227612638377),
        ];
        for (n, x, want) in cases {
            let got = debye(x, n).unwrap();
            assert!(((got - want) / want).abs() < 1e-13, "D{}({}) = {}", n, x, got);
        }
    }

    #[test]
    fn order_and_sign_conventions() {
        assert!(matches!(debye(1.0, 0), Err(KernelError::InvalidArguments(_))));
        assert!(matches!(debye(1.0, 21), Err(KernelError::InvalidArguments(_))));
        assert_eq!(debye(-2.0, 3).unwrap(), 0.0);
    }

    #[test]
    fn decreasing_in_x() {
        let mut prev = debye(0.0, 4).unwrap();
        for i in 1..200 {
            let d = debye(i as f64 * 0.1, 4).unwrap();
            assert!(d < prev);
            prev = d;
        }
    }
}
