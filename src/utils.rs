// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Utility Functions** - *Shared Validation and Numerical Helpers*
//!
//! Null-mask checks used by the array kernels and small numerical utilities
//! shared by the special functions and distributions.

use minarrow::Bitmask;

/// Determines whether nulls are present given an optional null count and mask reference.
/// Avoids computing mask cardinality to preserve performance guarantees.
#[inline(always)]
pub fn has_nulls(null_count: Option<usize>, mask: Option<&Bitmask>) -> bool {
    match null_count {
        Some(n) => n > 0,
        None => mask.is_some(),
    }
}

/// Clamps an estimated probability into [0, 1].
///
/// Quadrature and Monte Carlo estimates may overshoot by their error.
#[inline(always)]
pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() { p } else { p.clamp(0.0, 1.0) }
}

/// Horner evaluation of `c[0] + c[1] x + ... + c[n] x^n`.
#[inline(always)]
pub fn horner(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_nulls_prefers_count() {
        let mask = Bitmask::new_set_all(4, true);
        assert!(!has_nulls(Some(0), Some(&mask)));
        assert!(has_nulls(None, Some(&mask)));
        assert!(!has_nulls(None, None));
    }

    #[test]
    fn horner_matches_expanded_form() {
        // 1 + 2x + 3x^2 at x = 2
        assert_eq!(horner(&[1.0, 2.0, 3.0], 2.0), 17.0);
        assert_eq!(horner(&[], 2.0), 0.0);
    }

    #[test]
    fn clamp_keeps_nan() {
        assert!(clamp_probability(f64::NAN).is_nan());
        assert_eq!(clamp_probability(1.0 + 1e-12), 1.0);
        assert_eq!(clamp_probability(-1e-12), 0.0);
    }
}
