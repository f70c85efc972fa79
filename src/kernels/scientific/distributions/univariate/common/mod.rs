// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Common Distribution Utilities** - *Shared Kernel Loops and Test Helpers*
//!
//! The dense and null-aware loops every univariate kernel runs through, plus
//! helpers the family test suites share.

/// Scalar implementations of common distribution utilities.
pub mod std;

#[cfg(test)]
use minarrow::{Bitmask, Buffer, FloatArray};

// Common test helpers

/// Test Helper: unwrap `FloatArray`, assert *no* null mask, return data.
#[cfg(test)]
pub fn dense_data(arr: FloatArray<f64>) -> Buffer<f64> {
    assert!(arr.null_mask.is_none(), "unexpected mask on dense path");
    arr.data
}

/// Create a mask of given length with exactly the lane `idx` null.
#[cfg(test)]
pub fn single_null_mask(len: usize, idx: usize) -> Bitmask {
    let mut m = Bitmask::new_set_all(len, true);
    unsafe { m.set_unchecked(idx, false) };
    m
}

/// Assert relative difference ≤ `tol`, or absolute when `b` is zero.
#[cfg(test)]
pub fn assert_close(a: f64, b: f64, tol: f64) {
    let err = if b == 0.0 { a.abs() } else { ((a - b) / b).abs() };
    assert!(
        err <= tol,
        "assert_close failed: {} vs {} (tol={})",
        a,
        b,
        tol
    );
}
