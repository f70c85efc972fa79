// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Lambert W** - *Real Branches of w eʷ = x*
//!
//! The principal branch W₀ (w ≥ -1, x ≥ -1/e) and the secondary branch W₋₁
//! (w ≤ -1, -1/e ≤ x < 0). Each starts from a closed-form seed:
//!
//! * near the branch point: `w ≈ -1 + p - p²/3 + 11p³/72`, p = ±√(2(ex + 1))
//! * small x on W₀: Padé `x (1 + 4x/3) / (1 + 7x/3 + 5x²/6)`
//! * large |ln|x||: `L₁ - L₂ + L₂/L₁` with L₁ = ln|x|, L₂ = ln|L₁|
//!
//! then takes at most three Halley steps.

use std::f64::consts::E;

use crate::config::SPEC_FUNC_PRECISION;

const HALLEY_STEPS: usize = 3;

fn seed(x: f64, principal: bool) -> f64 {
    let branch_series = |p: f64| -1.0 + p - p * p / 3.0 + 11.0 / 72.0 * p * p * p;
    if principal {
        if x < -0.32 {
            return branch_series((2.0 * (E * x + 1.0)).sqrt());
        }
        if x <= 3.0 {
            return x * (1.0 + 4.0 / 3.0 * x) / (1.0 + 7.0 / 3.0 * x + 5.0 / 6.0 * x * x);
        }
        let l1 = x.ln();
        let l2 = l1.ln();
        l1 - l2 + l2 / l1
    } else {
        if x < -0.25 {
            return branch_series(-(2.0 * (E * x + 1.0)).sqrt());
        }
        let l1 = (-x).ln();
        let l2 = (-l1).ln();
        l1 - l2 + l2 / l1
    }
}

/// Lambert W on the principal (`principal = true`) or secondary branch.
///
/// Conventions at the edges of the real domain: x ≤ -1/e gives -1 on both
/// branches, x ≥ 0 on the secondary branch gives -∞.
pub fn lambert_w(x: f64, principal: bool) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x <= -1.0 / E {
        return -1.0;
    }
    if !principal && x >= 0.0 {
        return f64::NEG_INFINITY;
    }
    if x == 0.0 {
        return 0.0;
    }
    if x == f64::INFINITY {
        return f64::INFINITY;
    }
    let mut w = seed(x, principal);
    for _ in 0..HALLEY_STEPS {
        let ew = w.exp();
        let f = w * ew - x;
        let dw = f / (ew * (w + 1.0) - (w + 2.0) * f / (2.0 * w + 2.0));
        w -= dw;
        if dw.abs() < SPEC_FUNC_PRECISION * (1.0 + w.abs()) {
            break;
        }
    }
    w
}
