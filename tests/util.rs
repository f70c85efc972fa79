// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

#![allow(unused)]

/// Relative-or-absolute comparison: the tolerance scales with `max(1, |expected|)`.
/// `NaN` only matches `NaN`; infinities must match in sign.
fn close(got: f64, expected: f64, tol: f64) -> Result<(), String> {
    if expected.is_nan() {
        return if got.is_nan() {
            Ok(())
        } else {
            Err(format!("expected NaN, got {got}"))
        };
    }
    if expected.is_infinite() {
        return if got.is_infinite() && got.is_sign_positive() == expected.is_sign_positive() {
            Ok(())
        } else {
            Err(format!("expected {expected}, got {got}"))
        };
    }
    let scale = 1.0_f64.max(expected.abs());
    if (got - expected).abs() <= tol * scale {
        Ok(())
    } else {
        Err(format!("got {got}, expect {expected} (tol={tol})"))
    }
}

pub fn assert_close(got: f64, expected: f64, tol: f64) {
    if let Err(msg) = close(got, expected, tol) {
        panic!("mismatch: {msg}");
    }
}

pub fn assert_slice_close(got: &[f64], expected: &[f64], tol: f64) {
    assert_eq!(got.len(), expected.len(), "len mismatch");
    for (i, (&g, &e)) in got.iter().zip(expected.iter()).enumerate() {
        if let Err(msg) = close(g, e, tol) {
            panic!("idx {i}: {msg}");
        }
    }
}
