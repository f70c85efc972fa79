// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! Asymptotic Dickey-Fuller unit-root statistic, by lookup in the critical-value
//! table at the 1%, 5% and 10% levels.
//!
//! Between tabulated points the CDF and its inverse are linear. Outside the
//! table the nearest tabulated value is returned and a warning is logged; the
//! table only supports decisions at conventional levels and is not a precise
//! distribution.

use log::warn;

use super::check_probability;
use crate::errors::KernelError;

/// Deterministic terms in the test regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DickeyFullerModel {
    /// Constant and linear trend.
    Trend,
    /// Constant only.
    Constant,
    /// Neither.
    NoConstant,
}

const LEVELS: [f64; 3] = [0.01, 0.05, 0.10];

impl DickeyFullerModel {
    /// Critical values at `LEVELS`, increasing.
    pub fn critical_values(self) -> [f64; 3] {
        match self {
            DickeyFullerModel::Trend => [-3.96, -3.41, -3.13],
            DickeyFullerModel::Constant => [-3.43, -2.86, -2.57],
            DickeyFullerModel::NoConstant => [-2.57, -1.94, -1.62],
        }
    }
}

/// P(T ≤ x), or P(T > x) when `tail` is set.
pub fn p_dickey_fuller(model: DickeyFullerModel, x: f64, tail: bool) -> Result<f64, KernelError> {
    if x.is_nan() {
        return Err(KernelError::InvalidArguments(
            "p_dickey_fuller: statistic is NaN".into(),
        ));
    }
    let q = model.critical_values();
    let p = if x < q[0] {
        warn!(
            "p_dickey_fuller: {:?} statistic {} below the tabulated range, returning {}",
            model, x, LEVELS[0]
        );
        LEVELS[0]
    } else if x > q[2] {
        warn!(
            "p_dickey_fuller: {:?} statistic {} above the tabulated range, returning {}",
            model, x, LEVELS[2]
        );
        LEVELS[2]
    } else {
        let i = if x <= q[1] { 0 } else { 1 };
        LEVELS[i] + (x - q[i]) * (LEVELS[i + 1] - LEVELS[i]) / (q[i + 1] - q[i])
    };
    Ok(if tail { 0.5 - p + 0.5 } else { p })
}

/// The x with P(T ≤ x) = p, or P(T > x) = p when `tail` is set.
pub fn q_dickey_fuller(model: DickeyFullerModel, p: f64, tail: bool) -> Result<f64, KernelError> {
    check_probability("q_dickey_fuller", p)?;
    let level = if tail { 0.5 - p + 0.5 } else { p };
    let q = model.critical_values();
    Ok(if level < LEVELS[0] {
        warn!(
            "q_dickey_fuller: {:?} level {} below the tabulated range, returning {}",
            model, level, q[0]
        );
        q[0]
    } else if level > LEVELS[2] {
        warn!(
            "q_dickey_fuller: {:?} level {} above the tabulated range, returning {}",
            model, level, q[2]
        );
        q[2]
    } else {
        let i = if level <= LEVELS[1] { 0 } else { 1 };
        q[i] + (level - LEVELS[i]) * (q[i + 1] - q[i]) / (LEVELS[i + 1] - LEVELS[i])
    })
}

pub fn p_dickey_fuller_trend(x: f64, tail: bool) -> Result<f64, KernelError> {
    p_dickey_fuller(DickeyFullerModel::Trend, x, tail)
}

pub fn p_dickey_fuller_constant(x: f64, tail: bool) -> Result<f64, KernelError> {
    p_dickey_fuller(DickeyFullerModel::Constant, x, tail)
}

pub fn p_dickey_fuller_no_constant(x: f64, tail: bool) -> Result<f64, KernelError> {
    p_dickey_fuller(DickeyFullerModel::NoConstant, x, tail)
}

pub fn q_dickey_fuller_trend(p: f64, tail: bool) -> Result<f64, KernelError> {
    q_dickey_fuller(DickeyFullerModel::Trend, p, tail)
}

pub fn q_dickey_fuller_constant(p: f64, tail: bool) -> Result<f64, KernelError> {
    q_dickey_fuller(DickeyFullerModel::Constant, p, tail)
}

pub fn q_dickey_fuller_no_constant(p: f64, tail: bool) -> Result<f64, KernelError> {
    q_dickey_fuller(DickeyFullerModel::NoConstant, p, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODELS: [DickeyFullerModel; 3] = [
        DickeyFullerModel::Trend,
        DickeyFullerModel::Constant,
        DickeyFullerModel::NoConstant,
    ];

    #[test]
    fn table_points_are_exact() {
        for model in MODELS {
            for (&q, &level) in model.critical_values().iter().zip(&LEVELS) {
                assert!((p_dickey_fuller(model, q, false).unwrap() - level).abs() < 1e-15);
                assert!((q_dickey_fuller(model, level, false).unwrap() - q).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn interpolates_linearly() {
        // halfway between -3.41 and -3.13
        assert!((p_dickey_fuller_trend(-3.27, false).unwrap() - 0.075).abs() < 1e-14);
        assert!((q_dickey_fuller_constant(0.03, false).unwrap() + 3.145).abs() < 1e-14);
        assert!((p_dickey_fuller_no_constant(-1.94, true).unwrap() - 0.95).abs() < 1e-15);
        assert!((q_dickey_fuller_no_constant(0.95, true).unwrap() + 1.94).abs() < 1e-14);
    }

    #[test]
    fn clamps_outside_table() {
        assert_eq!(p_dickey_fuller_trend(-10.0, false).unwrap(), 0.01);
        assert_eq!(p_dickey_fuller_constant(0.5, false).unwrap(), 0.10);
        assert_eq!(q_dickey_fuller_no_constant(0.5, false).unwrap(), -1.62);
        assert_eq!(q_dickey_fuller_trend(0.001, false).unwrap(), -3.96);
        assert!(q_dickey_fuller_trend(1.5, false).is_err());
        assert!(p_dickey_fuller_trend(f64::NAN, false).is_err());
    }

    #[test]
    fn quantile_inverts_cdf() {
        for model in MODELS {
            for i in 0..=18 {
                let level = 0.01 + 0.005 * i as f64;
                let x = q_dickey_fuller(model, level, false).unwrap();
                assert!((p_dickey_fuller(model, x, false).unwrap() - level).abs() < 1e-13);
            }
        }
    }
}
