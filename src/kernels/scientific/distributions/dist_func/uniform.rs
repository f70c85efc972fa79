// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! Uniform variates on an interval and on a range of integers.

use rand::Rng;

use crate::errors::KernelError;

/// One variate uniform on `[a, b)`.
pub fn r_uniform<R: Rng + ?Sized>(rng: &mut R, a: f64, b: f64) -> Result<f64, KernelError> {
    if !(a < b) || !(b - a).is_finite() {
        return Err(KernelError::InvalidArguments(format!(
            "r_uniform: need finite a < b, got [{}, {}]",
            a, b
        )));
    }
    loop {
        let x = a + (b - a) * rng.random::<f64>();
        // rounding can land on b
        if x < b {
            return Ok(x);
        }
    }
}

/// One integer uniform on `a..=b`.
pub fn r_discrete_uniform<R: Rng + ?Sized>(rng: &mut R, a: i64, b: i64) -> Result<i64, KernelError> {
    if a > b {
        return Err(KernelError::InvalidArguments(format!(
            "r_discrete_uniform: empty range {}..={}",
            a, b
        )));
    }
    Ok(rng.random_range(a..=b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::scientific::distributions::shared::sampler::RandomGenerator;

    #[test]
    fn continuous_moments_and_support() {
        let mut rng = RandomGenerator::from_seed(31);
        let n = 100_000;
        let xs: Vec<f64> = (0..n).map(|_| r_uniform(&mut rng, -2.0, 6.0).unwrap()).collect();
        assert!(xs.iter().all(|&x| (-2.0..6.0).contains(&x)));
        let mean = xs.iter().sum::<f64>() / n as f64;
        let var = xs.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n as f64 - 1.0);
        assert!((mean - 2.0).abs() < 0.04);
        assert!((var / (64.0 / 12.0) - 1.0).abs() < 0.02);
        assert!(r_uniform(&mut rng, 1.0, 1.0).is_err());
        assert!(r_uniform(&mut rng, 0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn discrete_hits_every_value() {
        let mut rng = RandomGenerator::from_seed(32);
        let mut counts = [0usize; 7];
        let n = 70_000;
        for _ in 0..n {
            let k = r_discrete_uniform(&mut rng, -3, 3).unwrap();
            counts[(k + 3) as usize] += 1;
        }
        for c in counts {
            assert!((c as f64 - 10_000.0).abs() < 500.0);
        }
        assert_eq!(r_discrete_uniform(&mut rng, 5, 5).unwrap(), 5);
        assert!(r_discrete_uniform(&mut rng, 5, 4).is_err());
    }
}
