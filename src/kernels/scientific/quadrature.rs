// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Gauss-Legendre Quadrature** - *Nodes and Weights on Arbitrary Intervals*
//!
//! Nodes are the roots of the Legendre polynomial Pₙ, found by Newton iteration from
//! the Chebyshev-like seed `cos(π (i - ¼) / (n + ½))`; weights follow from Pₙ'.
//! An n-point rule integrates polynomials of degree 2n - 1 exactly.

use std::f64::consts::PI;

use minarrow::Vec64;

/// Gauss-Legendre rule on [-1, 1], nodes ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussLegendre {
    nodes: Vec64<f64>,
    weights: Vec64<f64>,
}

impl GaussLegendre {
    /// `n`-point rule. `n == 0` yields an empty rule that integrates everything to 0.
    pub fn new(n: usize) -> Self {
        let mut nodes = Vec64::with_capacity(n);
        let mut weights = Vec64::with_capacity(n);
        nodes.resize(n, 0.0);
        weights.resize(n, 0.0);
        let nf = n as f64;
        let half = (n + 1) / 2;
        for i in 0..half {
            let mut z = (PI * (i as f64 + 0.75) / (nf + 0.5)).cos();
            let mut dp = 1.0;
            for _ in 0..100 {
                let (p, d) = legendre(n, z);
                dp = d;
                let dz = p / d;
                z -= dz;
                if dz.abs() <= 1e-16 {
                    break;
                }
            }
            let (_, d) = legendre(n, z);
            if d.is_finite() {
                dp = d;
            }
            let w = 2.0 / ((1.0 - z * z) * dp * dp);
            nodes[i] = -z;
            nodes[n - 1 - i] = z;
            weights[i] = w;
            weights[n - 1 - i] = w;
        }
        if n % 2 == 1 {
            nodes[n / 2] = 0.0;
        }
        GaussLegendre { nodes, weights }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes on [-1, 1].
    #[inline(always)]
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Weights on [-1, 1], summing to 2.
    #[inline(always)]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Nodes and weights mapped affinely onto [a, b].
    pub fn on_interval(&self, a: f64, b: f64) -> (Vec64<f64>, Vec64<f64>) {
        let half = 0.5 * (b - a);
        let mid = 0.5 * (b + a);
        let nodes = self.nodes.iter().map(|&x| mid + half * x).collect();
        let weights = self.weights.iter().map(|&w| half * w).collect();
        (nodes, weights)
    }

    /// ∫ₐᵇ f(x) dx.
    pub fn integrate<F: Fn(f64) -> f64>(&self, f: F, a: f64, b: f64) -> f64 {
        let half = 0.5 * (b - a);
        let mid = 0.5 * (b + a);
        let mut s = 0.0;
        for (&x, &w) in self.nodes.iter().zip(self.weights.iter()) {
            s += w * f(mid + half * x);
        }
        half * s
    }
}

/// `(Pₙ(z), Pₙ'(z))` by the three-term recurrence.
#[inline]
fn legendre(n: usize, z: f64) -> (f64, f64) {
    let mut p0 = 1.0;
    let mut p1 = 0.0;
    for j in 1..=n {
        let jf = j as f64;
        let p2 = p1;
        p1 = p0;
        p0 = ((2.0 * jf - 1.0) * z * p1 - (jf - 1.0) * p2) / jf;
    }
    let nf = n as f64;
    let dp = nf * (z * p0 - p1) / (z * z - 1.0);
    (p0, dp)
}
