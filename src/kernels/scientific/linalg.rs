// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Dense Linear Algebra** - *Column-major Square Matrices and Cholesky Factors*
//!
//! The multivariate distributions only need a symmetric positive-definite factorisation,
//! triangular solves and products, and the log-determinant. Storage is column-major
//! so the buffers can be handed to LAPACK unchanged.
//!
//! With the `linear_algebra` feature the factorisation is delegated to LAPACK `dpotrf`;
//! otherwise the built-in Cholesky–Banachiewicz loop is used. Both produce the same
//! lower factor up to rounding.

#[cfg(feature = "linear_algebra")]
use lapack::dpotrf;
use minarrow::Vec64;

use crate::errors::{KernelError, log_length_mismatch};

/// Dense square matrix, column-major.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    n: usize,
    data: Vec64<f64>,
}

impl SquareMatrix {
    /// Zero matrix of dimension `n`.
    pub fn zeros(n: usize) -> Self {
        let mut data = Vec64::with_capacity(n * n);
        data.resize(n * n, 0.0);
        SquareMatrix { n, data }
    }

    /// Identity matrix of dimension `n`.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n);
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        m
    }

    /// Diagonal matrix from its diagonal.
    pub fn from_diagonal(diag: &[f64]) -> Self {
        let mut m = Self::zeros(diag.len());
        for (i, &d) in diag.iter().enumerate() {
            m.set(i, i, d);
        }
        m
    }

    /// Builds a matrix from row slices.
    pub fn from_rows(rows: &[&[f64]]) -> Result<Self, KernelError> {
        let n = rows.len();
        let mut m = Self::zeros(n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(KernelError::LengthMismatch(log_length_mismatch(
                    "SquareMatrix::from_rows".into(),
                    row.len(),
                    n,
                )));
            }
            for (j, &v) in row.iter().enumerate() {
                m.set(i, j, v);
            }
        }
        Ok(m)
    }

    /// Wraps a column-major buffer of length `n * n`.
    pub fn from_column_major(n: usize, data: Vec64<f64>) -> Result<Self, KernelError> {
        if data.len() != n * n {
            return Err(KernelError::LengthMismatch(log_length_mismatch(
                "SquareMatrix::from_column_major".into(),
                data.len(),
                n * n,
            )));
        }
        Ok(SquareMatrix { n, data })
    }

    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.n
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i + j * self.n]
    }

    #[inline(always)]
    pub fn set(&mut self, i: usize, j: usize, v: f64) {
        self.data[i + j * self.n] = v;
    }

    /// Column-major backing buffer.
    #[inline(always)]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// True when every off-diagonal entry is exactly zero.
    pub fn is_diagonal(&self) -> bool {
        for j in 0..self.n {
            for i in 0..self.n {
                if i != j && self.get(i, j) != 0.0 {
                    return false;
                }
            }
        }
        true
    }

    /// True when `|a_ij - a_ji| ≤ tol` for every pair.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for j in 0..self.n {
            for i in (j + 1)..self.n {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Matrix-vector product `A x`.
    pub fn mul_vec(&self, x: &[f64]) -> Vec64<f64> {
        let mut out = Vec64::with_capacity(self.n);
        out.resize(self.n, 0.0);
        for j in 0..self.n {
            let xj = x[j];
            if xj == 0.0 {
                continue;
            }
            let col = &self.data[j * self.n..(j + 1) * self.n];
            for (o, &a) in out.iter_mut().zip(col) {
                *o += a * xj;
            }
        }
        out
    }

    /// Matrix product `A B`.
    pub fn mul(&self, other: &SquareMatrix) -> SquareMatrix {
        let n = self.n;
        let mut out = Self::zeros(n);
        for j in 0..n {
            let dst = j * n;
            for k in 0..n {
                let b = other.data[k + j * n];
                if b == 0.0 {
                    continue;
                }
                let col = &self.data[k * n..(k + 1) * n];
                for (o, &a) in out.data[dst..dst + n].iter_mut().zip(col) {
                    *o += a * b;
                }
            }
        }
        out
    }

    /// Multiplies every entry by `f`.
    pub fn scale_in_place(&mut self, f: f64) {
        for v in self.data.iter_mut() {
            *v *= f;
        }
    }

    /// `D A D` for the diagonal matrix `D = diag(d)`, used to turn a correlation
    /// matrix into a covariance matrix.
    pub fn scaled(&self, d: &[f64]) -> Self {
        let mut m = self.clone();
        for j in 0..self.n {
            for i in 0..self.n {
                m.set(i, j, self.get(i, j) * d[i] * d[j]);
            }
        }
        m
    }

    /// Principal submatrix on the rows and columns listed in `idx`.
    pub fn select(&self, idx: &[usize]) -> Self {
        let mut m = Self::zeros(idx.len());
        for (jj, &j) in idx.iter().enumerate() {
            for (ii, &i) in idx.iter().enumerate() {
                m.set(ii, jj, self.get(i, j));
            }
        }
        m
    }

    /// Lower Cholesky factor `L` with `A = L Lᵀ`.
    ///
    /// Fails with `InvalidArguments` when the matrix is not positive-definite.
    pub fn cholesky(&self) -> Result<LowerTriangular, KernelError> {
        let mut a = self.data.clone();
        cholesky_in_place(&mut a, self.n)?;
        // clear the strictly upper triangle left untouched by the factoriser
        for j in 0..self.n {
            for i in 0..j {
                a[i + j * self.n] = 0.0;
            }
        }
        Ok(LowerTriangular { n: self.n, data: a })
    }
}

/// Lower-triangular factor, column-major with a zero upper triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct LowerTriangular {
    n: usize,
    data: Vec64<f64>,
}

impl LowerTriangular {
    /// Diagonal factor, i.e. the Cholesky factor of `diag(d²)`.
    pub fn from_diagonal(d: &[f64]) -> Self {
        let m = SquareMatrix::from_diagonal(d);
        LowerTriangular { n: m.n, data: m.data }
    }

    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.n
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i + j * self.n]
    }

    /// `L x`.
    pub fn mul_vec(&self, x: &[f64]) -> Vec64<f64> {
        let n = self.n;
        let mut out = Vec64::with_capacity(n);
        out.resize(n, 0.0);
        for j in 0..n {
            let xj = x[j];
            for i in j..n {
                out[i] += self.data[i + j * n] * xj;
            }
        }
        out
    }

    /// Solves `L y = b` by forward substitution.
    pub fn solve(&self, b: &[f64]) -> Vec64<f64> {
        let n = self.n;
        let mut y = Vec64::with_capacity(n);
        for i in 0..n {
            let mut s = b[i];
            for k in 0..i {
                s -= self.data[i + k * n] * y[k];
            }
            y.push(s / self.data[i + i * n]);
        }
        y
    }

    /// Solves `Lᵀ y = b` by back substitution.
    pub fn solve_transpose(&self, b: &[f64]) -> Vec64<f64> {
        let n = self.n;
        let mut y = Vec64::with_capacity(n);
        y.resize(n, 0.0);
        for i in (0..n).rev() {
            let mut s = b[i];
            for k in (i + 1)..n {
                s -= self.data[k + i * n] * y[k];
            }
            y[i] = s / self.data[i + i * n];
        }
        y
    }

    /// Inverse, itself lower triangular.
    pub fn inverse(&self) -> LowerTriangular {
        let n = self.n;
        let mut inv = SquareMatrix::zeros(n);
        let mut e = vec![0.0; n];
        for j in 0..n {
            e.iter_mut().for_each(|v| *v = 0.0);
            e[j] = 1.0;
            let col = self.solve(&e);
            for i in j..n {
                inv.set(i, j, col[i]);
            }
        }
        LowerTriangular {
            n,
            data: inv.data,
        }
    }

    /// `ln det L = Σ ln L_ii`; the log-determinant of `L Lᵀ` is twice this.
    pub fn log_det(&self) -> f64 {
        (0..self.n).map(|i| self.data[i + i * self.n].ln()).sum()
    }

    /// Reconstructs `L Lᵀ`.
    pub fn gram(&self) -> SquareMatrix {
        let n = self.n;
        let mut m = SquareMatrix::zeros(n);
        for i in 0..n {
            for j in 0..=i {
                let mut s = 0.0;
                for k in 0..=j {
                    s += self.get(i, k) * self.get(j, k);
                }
                m.set(i, j, s);
                m.set(j, i, s);
            }
        }
        m
    }
}

/// Overwrites the lower triangle of the column-major `a` with its Cholesky factor.
#[cfg(feature = "linear_algebra")]
pub fn cholesky_in_place(a: &mut [f64], n: usize) -> Result<(), KernelError> {
    if n == 0 {
        return Ok(());
    }
    let mut info = 0;
    unsafe { dpotrf(b'L', n as i32, a, n as i32, &mut info) };
    if info > 0 {
        return Err(KernelError::InvalidArguments(format!(
            "cholesky: matrix not positive-definite (leading minor {})",
            info
        )));
    } else if info < 0 {
        return Err(KernelError::Internal(format!(
            "cholesky: LAPACK dpotrf arg {} was invalid",
            -info
        )));
    }
    Ok(())
}

/// Overwrites the lower triangle of the column-major `a` with its Cholesky factor.
#[cfg(not(feature = "linear_algebra"))]
pub fn cholesky_in_place(a: &mut [f64], n: usize) -> Result<(), KernelError> {
    for j in 0..n {
        let mut diag = a[j + j * n];
        for k in 0..j {
            let l = a[j + k * n];
            diag -= l * l;
        }
        if !(diag > 0.0) {
            return Err(KernelError::InvalidArguments(format!(
                "cholesky: matrix not positive-definite (leading minor {})",
                j + 1
            )));
        }
        let ljj = diag.sqrt();
        a[j + j * n] = ljj;
        for i in (j + 1)..n {
            let mut s = a[i + j * n];
            for k in 0..j {
                s -= a[i + k * n] * a[j + k * n];
            }
            a[i + j * n] = s / ljj;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spd3() -> SquareMatrix {
        SquareMatrix::from_rows(&[&[4.0, 2.0, 0.4], &[2.0, 5.0, 1.0], &[0.4, 1.0, 3.0]]).unwrap()
    }

    #[test]
    fn cholesky_reconstructs() {
        let a = spd3();
        let l = a.cholesky().unwrap();
        let back = l.gram();
        for i in 0..3 {
            for j in 0..3 {
                assert!((back.get(i, j) - a.get(i, j)).abs() < 1e-14);
            }
        }
        assert_eq!(l.get(0, 1), 0.0);
        assert_eq!(l.get(0, 0), 2.0);
    }

    #[test]
    fn solves_and_inverse() {
        let l = spd3().cholesky().unwrap();
        let b = [1.0, -2.0, 0.5];
        let y = l.solve(&b);
        let lb = l.mul_vec(&y);
        for i in 0..3 {
            assert!((lb[i] - b[i]).abs() < 1e-14);
        }
        let z = l.solve_transpose(&b);
        // Lᵀ z = b  ⇔  check through explicit transpose product
        for i in 0..3 {
            let s: f64 = (i..3).map(|k| l.get(k, i) * z[k]).sum();
            assert!((s - b[i]).abs() < 1e-14);
        }
        let inv = l.inverse();
        let e = inv.mul_vec(&l.mul_vec(&b));
        for i in 0..3 {
            assert!((e[i] - b[i]).abs() < 1e-14);
        }
    }

    #[test]
    fn log_det_matches_product() {
        let a = spd3();
        let l = a.cholesky().unwrap();
        // det = 4(15 - 1) - 2(6 - 0.4) + 0.4(2 - 2) = 44.8
        assert!((2.0 * l.log_det() - 44.8f64.ln()).abs() < 1e-13);
    }

    #[test]
    fn rejects_indefinite() {
        let a = SquareMatrix::from_rows(&[&[1.0, 2.0], &[2.0, 1.0]]).unwrap();
        assert!(matches!(a.cholesky(), Err(KernelError::InvalidArguments(_))));
        assert!(SquareMatrix::from_rows(&[&[1.0, 2.0], &[2.0]]).is_err());
    }

    #[test]
    fn structure_checks() {
        assert!(SquareMatrix::identity(4).is_diagonal());
        assert!(!spd3().is_diagonal());
        assert!(spd3().is_symmetric(0.0));
        let s = SquareMatrix::identity(2).scaled(&[2.0, 3.0]);
        assert_eq!(s.get(1, 1), 9.0);
        assert_eq!(s.mul_vec(&[1.0, 1.0]).to_vec(), vec![4.0, 9.0]);
    }

    #[test]
    fn principal_submatrix() {
        let m = spd3().select(&[0, 2]);
        assert_eq!(m.dim(), 2);
        assert_eq!(m.get(0, 1), 0.4);
        assert_eq!(m.get(1, 1), 3.0);
    }
}
