// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

use minarrow::{Bitmask, FloatArray, Vec64};

use crate::utils::has_nulls;

/// Applies `scalar_body` to every lane of `x`, dispatching on nulls.
///
/// Null lanes come out as `NaN` with their validity bit cleared; a mask supplied
/// with a zero null count takes the dense path and comes back all-valid.
///
/// `NaN` and `inf` produced by `scalar_body` itself are kept verbatim and never
/// nulled in the output mask, as they can carry signal (an infinite quantile at
/// p = 1, say). Treat them downstream if needed.
#[inline(always)]
pub fn univariate_kernel_std<T, FScalar>(
    x: &[T],
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
    scalar_body: FScalar,
) -> FloatArray<f64>
where
    T: Copy,
    FScalar: Fn(T) -> f64,
{
    if x.is_empty() {
        return FloatArray::from_slice(&[]);
    }
    match null_mask {
        Some(mask) if has_nulls(null_count, null_mask) => {
            let (out, out_mask) = masked_kernel(x, mask, &scalar_body);
            FloatArray {
                data: out.into(),
                null_mask: Some(out_mask),
            }
        }
        _ => {
            let out: Vec64<f64> = x.iter().map(|&xi| scalar_body(xi)).collect();
            FloatArray {
                data: out.into(),
                null_mask: null_mask.map(|_| Bitmask::new_set_all(x.len(), true)),
            }
        }
    }
}

/// [`univariate_kernel_std`] over continuous arguments.
#[inline(always)]
pub fn univariate_kernel_f64_std<FScalar>(
    x: &[f64],
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
    scalar_body: FScalar,
) -> FloatArray<f64>
where
    FScalar: Fn(f64) -> f64,
{
    univariate_kernel_std(x, null_mask, null_count, scalar_body)
}

/// [`univariate_kernel_std`] over counts.
#[inline(always)]
pub fn univariate_kernel_u64_std<FScalar>(
    k: &[u64],
    null_mask: Option<&Bitmask>,
    null_count: Option<usize>,
    scalar_body: FScalar,
) -> FloatArray<f64>
where
    FScalar: Fn(u64) -> f64,
{
    univariate_kernel_std(k, null_mask, null_count, scalar_body)
}

/// Masked loop: the output mask starts as a copy of the input and null lanes
/// are written as `NaN` without evaluating `scalar_body`.
#[inline(always)]
fn masked_kernel<T, FScalar>(x: &[T], mask: &Bitmask, scalar_body: &FScalar) -> (Vec64<f64>, Bitmask)
where
    T: Copy,
    FScalar: Fn(T) -> f64,
{
    let len = x.len();
    let mut out = Vec64::with_capacity(len);
    let mut out_mask = mask.clone();
    for (idx, &xi) in x.iter().enumerate() {
        // SAFETY: the mask covers every lane of `x`
        if unsafe { mask.get_unchecked(idx) } {
            out.push(scalar_body(xi));
        } else {
            out.push(f64::NAN);
            unsafe { out_mask.set_unchecked(idx, false) };
        }
    }
    (out, out_mask)
}
