//! Typed dense matrix used by every kernel
//!
//! `Mat<T>` is a plain row-major buffer. It is the working representation of
//! the back-end and of the matrix-function evaluators; the public,
//! dtype-erased [`Matrix`](super::Matrix) wraps it.

use crate::dtype::{Complex128, Element};
use std::ops::{Add, Index, IndexMut, Mul, Range, Sub};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Matrix products with at least this many output rows run row-parallel.
pub(crate) const PARALLEL_MATMUL_THRESHOLD: usize = 64;

/// Row-major dense matrix with elements of type `T`
#[derive(Clone, Debug, PartialEq)]
pub struct Mat<T: Element> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Element> Mat<T> {
    /// Matrix of zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::zero(); rows * cols],
        }
    }

    /// n×n identity
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = T::one();
        }
        m
    }

    /// Matrix filled with NaN
    pub fn nan(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::nan(); rows * cols],
        }
    }

    /// Build from a row-major buffer
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            rows * cols,
            "Mat::from_vec: buffer length does not match shape"
        );
        Self { rows, cols, data }
    }

    /// Build element by element
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    /// Diagonal matrix with the given entries
    pub fn from_diagonal(diag: &[T]) -> Self {
        let n = diag.len();
        let mut m = Self::zeros(n, n);
        for (i, &d) in diag.iter().enumerate() {
            m.data[i * n + i] = d;
        }
        m
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// True for square matrices
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Row-major element buffer
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume into the row-major element buffer
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Row `i` as a slice
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Copy of the main diagonal
    pub fn diagonal(&self) -> Vec<T> {
        (0..self.rows.min(self.cols)).map(|i| self[(i, i)]).collect()
    }

    /// Apply `f` to every element
    pub fn map<U: Element>(&self, f: impl Fn(T) -> U) -> Mat<U> {
        Mat {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    /// Widen to complex
    pub fn to_complex(&self) -> Mat<Complex128> {
        self.map(T::to_complex)
    }

    /// Multiply every element by a real scalar
    pub fn scale(&self, s: f64) -> Self {
        self.map(|x| x.scale(s))
    }

    /// Multiply every element by a scalar of the element type
    pub fn scale_by(&self, s: T) -> Self {
        self.map(|x| x * s)
    }

    /// `self += alpha * other`
    pub fn axpy(&mut self, alpha: T, other: &Self) {
        assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            *a = *a + alpha * b;
        }
    }

    /// `self += alpha * I`
    pub fn add_diagonal(&mut self, alpha: T) {
        for i in 0..self.rows.min(self.cols) {
            let idx = i * self.cols + i;
            self.data[idx] = self.data[idx] + alpha;
        }
    }

    /// Linear combination Σ cₖ·Mₖ of equally shaped matrices
    pub fn linear_combination(terms: &[(f64, &Self)]) -> Self {
        let (rows, cols) = terms
            .first()
            .map_or((0, 0), |(_, m)| (m.rows, m.cols));
        let mut out = Self::zeros(rows, cols);
        for &(c, m) in terms {
            out.axpy(T::from_f64(c), m);
        }
        out
    }

    /// Conjugate transpose
    pub fn conj_transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |i, j| self[(j, i)].conjugate())
    }

    /// Matrix product
    ///
    /// # Panics
    ///
    /// Panics if the inner dimensions disagree.
    pub fn matmul(&self, other: &Self) -> Self {
        assert_eq!(
            self.cols, other.rows,
            "Mat::matmul: inner dimensions do not match"
        );
        let (m, k, n) = (self.rows, self.cols, other.cols);
        let mut out = vec![T::zero(); m * n];

        let row_kernel = |i: usize, out_row: &mut [T]| {
            for p in 0..k {
                let a = self.data[i * k + p];
                if a == T::zero() {
                    continue;
                }
                let b_row = &other.data[p * n..(p + 1) * n];
                for (o, &b) in out_row.iter_mut().zip(b_row) {
                    *o = *o + a * b;
                }
            }
        };

        if n > 0 {
            #[cfg(feature = "rayon")]
            {
                if m >= PARALLEL_MATMUL_THRESHOLD {
                    out.par_chunks_mut(n)
                        .enumerate()
                        .for_each(|(i, row)| row_kernel(i, row));
                } else {
                    out.chunks_mut(n)
                        .enumerate()
                        .for_each(|(i, row)| row_kernel(i, row));
                }
            }

            #[cfg(not(feature = "rayon"))]
            out.chunks_mut(n)
                .enumerate()
                .for_each(|(i, row)| row_kernel(i, row));
        }

        Self::from_vec(m, n, out)
    }

    /// Maximum absolute column sum
    pub fn norm1(&self) -> f64 {
        (0..self.cols)
            .map(|j| (0..self.rows).map(|i| self[(i, j)].magnitude()).sum::<f64>())
            .fold(0.0, f64::max)
    }

    /// Frobenius norm
    pub fn norm_fro(&self) -> f64 {
        self.data
            .iter()
            .map(|x| {
                let m = x.magnitude();
                m * m
            })
            .sum::<f64>()
            .sqrt()
    }

    /// Largest element magnitude
    pub fn max_abs(&self) -> f64 {
        self.data.iter().map(|x| x.magnitude()).fold(0.0, f64::max)
    }

    /// 1-norm of the strictly upper triangular part
    pub fn strict_upper_norm1(&self) -> f64 {
        (0..self.cols)
            .map(|j| {
                (0..j.min(self.rows))
                    .map(|i| self[(i, j)].magnitude())
                    .sum::<f64>()
            })
            .fold(0.0, f64::max)
    }

    /// True when every element is finite
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.finite())
    }

    /// True when every entry below the diagonal is exactly zero
    pub fn is_upper_triangular(&self) -> bool {
        (0..self.rows).all(|i| (0..i.min(self.cols)).all(|j| self[(i, j)] == T::zero()))
    }

    /// True when every off-diagonal entry is exactly zero
    pub fn is_diagonal(&self) -> bool {
        (0..self.rows).all(|i| (0..self.cols).all(|j| i == j || self[(i, j)] == T::zero()))
    }

    /// True when every element is exactly zero
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&x| x == T::zero())
    }

    /// Copy of the sub-block `rows × cols`
    pub fn block(&self, rows: Range<usize>, cols: Range<usize>) -> Self {
        let (r0, c0) = (rows.start, cols.start);
        Self::from_fn(rows.len(), cols.len(), |i, j| self[(r0 + i, c0 + j)])
    }

    /// Overwrite the block whose top-left corner is `(r0, c0)`
    pub fn set_block(&mut self, r0: usize, c0: usize, block: &Self) {
        for i in 0..block.rows {
            let dst = (r0 + i) * self.cols + c0;
            self.data[dst..dst + block.cols].copy_from_slice(block.row(i));
        }
    }

    /// Zero every entry below the diagonal
    pub fn zero_lower(&mut self) {
        for i in 0..self.rows {
            for j in 0..i.min(self.cols) {
                self.data[i * self.cols + j] = T::zero();
            }
        }
    }
}

impl Mat<Complex128> {
    /// Real part of every element
    pub fn real_part(&self) -> Mat<f64> {
        self.map(|z| z.re)
    }

    /// Largest imaginary-part magnitude
    pub fn max_imag(&self) -> f64 {
        self.data.iter().map(|z| z.im.abs()).fold(0.0, f64::max)
    }
}

impl<T: Element> Index<(usize, usize)> for Mat<T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.data[i * self.cols + j]
    }
}

impl<T: Element> IndexMut<(usize, usize)> for Mat<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        &mut self.data[i * self.cols + j]
    }
}

impl<T: Element> Add for &Mat<T> {
    type Output = Mat<T>;

    fn add(self, rhs: &Mat<T>) -> Mat<T> {
        assert_eq!((self.rows, self.cols), (rhs.rows, rhs.cols));
        Mat {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(&rhs.data).map(|(&a, &b)| a + b).collect(),
        }
    }
}

impl<T: Element> Sub for &Mat<T> {
    type Output = Mat<T>;

    fn sub(self, rhs: &Mat<T>) -> Mat<T> {
        assert_eq!((self.rows, self.cols), (rhs.rows, rhs.cols));
        Mat {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(&rhs.data).map(|(&a, &b)| a - b).collect(),
        }
    }
}

impl<T: Element> Mul for &Mat<T> {
    type Output = Mat<T>;

    #[inline]
    fn mul(self, rhs: &Mat<T>) -> Mat<T> {
        self.matmul(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matmul() {
        let a = Mat::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = Mat::from_vec(3, 2, vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let c = &a * &b;
        assert_eq!(c.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn test_matmul_parallel_path_matches_identity() {
        let n = PARALLEL_MATMUL_THRESHOLD + 3;
        let a = Mat::from_fn(n, n, |i, j| (i * n + j) as f64);
        let c = a.matmul(&Mat::identity(n));
        assert_eq!(c, a);
    }

    #[test]
    fn test_norms() {
        let a = Mat::from_vec(2, 2, vec![1.0, -2.0, 3.0, 4.0]);
        assert_eq!(a.norm1(), 6.0);
        assert_eq!(a.max_abs(), 4.0);
        assert!((a.norm_fro() - 30.0f64.sqrt()).abs() < 1e-15);
        assert_eq!(a.strict_upper_norm1(), 2.0);
    }

    #[test]
    fn test_blocks() {
        let mut a = Mat::<f64>::zeros(3, 3);
        a.set_block(1, 1, &Mat::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]));
        assert_eq!(a.block(1..3, 2..3).as_slice(), &[2.0, 4.0]);
        assert!(!a.is_upper_triangular());
        a.zero_lower();
        assert!(a.is_upper_triangular());
    }

    #[test]
    fn test_conj_transpose() {
        let a = Mat::from_vec(
            1,
            2,
            vec![Complex128::new(1.0, 2.0), Complex128::new(3.0, -1.0)],
        );
        let h = a.conj_transpose();
        assert_eq!(h.rows(), 2);
        assert_eq!(h[(0, 0)], Complex128::new(1.0, -2.0));
        assert_eq!(h[(1, 0)], Complex128::new(3.0, 1.0));
    }

    #[test]
    fn test_linear_combination() {
        let i = Mat::<f64>::identity(2);
        let a = Mat::from_vec(2, 2, vec![0.0, 1.0, 1.0, 0.0]);
        let c = Mat::linear_combination(&[(2.0, &i), (3.0, &a)]);
        assert_eq!(c.as_slice(), &[2.0, 3.0, 3.0, 2.0]);
    }
}
