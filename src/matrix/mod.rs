//! Dense matrix types
//!
//! [`Matrix`] is the public, dtype-erased square-or-rectangular matrix that
//! every matrix function consumes and produces. Internally it stores a typed
//! [`Mat<f64>`] or [`Mat<Complex128>`]; kernels dispatch on the variant.

mod dense;

pub use dense::Mat;

use crate::dtype::{Complex128, DType, Element};
use crate::error::{Error, Result};

/// Typed storage behind a [`Matrix`]
#[derive(Clone, Debug, PartialEq)]
pub enum MatrixData {
    /// Real elements
    F64(Mat<f64>),
    /// Complex elements
    Complex128(Mat<Complex128>),
}

/// Dense row-major matrix with a runtime dtype
///
/// # Example
///
/// ```ignore
/// let a = Matrix::from_slice(&[1.0f64, 2.0, 3.0, 4.0], &[2, 2]);
/// assert_eq!(a.shape(), &[2, 2]);
/// let v: Vec<f64> = a.to_vec();
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    shape: [usize; 2],
    data: MatrixData,
}

impl Matrix {
    /// Create a matrix from a row-major slice
    ///
    /// # Panics
    ///
    /// Panics if `shape` is not 2-D or `data.len()` does not equal the product
    /// of the `shape` dimensions. For a fallible alternative, use
    /// [`Self::try_from_slice`].
    pub fn from_slice<T: Element>(data: &[T], shape: &[usize]) -> Self {
        Self::try_from_slice(data, shape).expect("Matrix::from_slice failed")
    }

    /// Create a matrix from a row-major slice (fallible version)
    pub fn try_from_slice<T: Element>(data: &[T], shape: &[usize]) -> Result<Self> {
        let &[rows, cols] = shape else {
            return Err(Error::invalid_argument(
                "shape",
                format!("expected a 2-D shape, got {} dimensions", shape.len()),
            ));
        };
        if data.len() != rows * cols {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
            });
        }
        Ok(match T::DTYPE {
            DType::F64 => Mat::<f64>::from_vec(rows, cols, bytemuck::cast_slice(data).to_vec()).into(),
            DType::Complex128 => {
                Mat::<Complex128>::from_vec(rows, cols, bytemuck::cast_slice(data).to_vec()).into()
            }
        })
    }

    /// Matrix of zeros with the given dtype
    pub fn zeros(rows: usize, cols: usize, dtype: DType) -> Self {
        match dtype {
            DType::F64 => Mat::<f64>::zeros(rows, cols).into(),
            DType::Complex128 => Mat::<Complex128>::zeros(rows, cols).into(),
        }
    }

    /// n×n identity with the given dtype
    pub fn identity(n: usize, dtype: DType) -> Self {
        match dtype {
            DType::F64 => Mat::<f64>::identity(n).into(),
            DType::Complex128 => Mat::<Complex128>::identity(n).into(),
        }
    }

    /// Matrix filled with NaN, used as the "undefined" result
    pub fn nan(rows: usize, cols: usize, dtype: DType) -> Self {
        match dtype {
            DType::F64 => Mat::<f64>::nan(rows, cols).into(),
            DType::Complex128 => Mat::<Complex128>::nan(rows, cols).into(),
        }
    }

    /// Shape as `[rows, cols]`
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.shape[0]
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.shape[1]
    }

    /// Element type
    #[inline]
    pub fn dtype(&self) -> DType {
        match &self.data {
            MatrixData::F64(_) => DType::F64,
            MatrixData::Complex128(_) => DType::Complex128,
        }
    }

    /// Typed storage
    #[inline]
    pub fn data(&self) -> &MatrixData {
        &self.data
    }

    /// Copy the elements out as `T`
    ///
    /// # Panics
    ///
    /// Panics if `T::DTYPE` differs from the matrix dtype.
    pub fn to_vec<T: Element>(&self) -> Vec<T> {
        assert_eq!(
            T::DTYPE,
            self.dtype(),
            "Matrix::to_vec: requested dtype does not match storage"
        );
        match &self.data {
            MatrixData::F64(m) => bytemuck::cast_slice(m.as_slice()).to_vec(),
            MatrixData::Complex128(m) => bytemuck::cast_slice(m.as_slice()).to_vec(),
        }
    }

    /// Copy the elements out as complex values regardless of dtype
    pub fn to_complex_vec(&self) -> Vec<Complex128> {
        self.to_complex_mat().into_vec()
    }

    /// Element `(i, j)` widened to complex
    pub fn get(&self, i: usize, j: usize) -> Complex128 {
        match &self.data {
            MatrixData::F64(m) => m[(i, j)].to_complex(),
            MatrixData::Complex128(m) => m[(i, j)],
        }
    }

    /// Typed view, if the dtype matches
    pub fn as_mat<T: Element>(&self) -> Result<Mat<T>> {
        match (&self.data, T::DTYPE) {
            (MatrixData::F64(m), DType::F64) => Ok(m.map(|x| T::from_f64(x))),
            (MatrixData::Complex128(m), DType::Complex128) => Ok(m.map(T::from_complex)),
            (_, requested) => Err(Error::DTypeMismatch {
                lhs: self.dtype(),
                rhs: requested,
            }),
        }
    }

    /// Complex copy of the storage
    pub fn to_complex_mat(&self) -> Mat<Complex128> {
        match &self.data {
            MatrixData::F64(m) => m.to_complex(),
            MatrixData::Complex128(m) => m.clone(),
        }
    }

    /// Same matrix promoted to `Complex128`
    pub fn to_complex(&self) -> Self {
        self.to_complex_mat().into()
    }

    /// True for square matrices
    #[inline]
    pub fn is_square(&self) -> bool {
        self.shape[0] == self.shape[1]
    }

    /// True when every element is finite
    pub fn is_finite(&self) -> bool {
        match &self.data {
            MatrixData::F64(m) => m.is_finite(),
            MatrixData::Complex128(m) => m.is_finite(),
        }
    }

    /// True when every element is NaN (vacuously true when empty)
    pub fn is_all_nan(&self) -> bool {
        match &self.data {
            MatrixData::F64(m) => m.as_slice().iter().all(|x| x.is_nan()),
            MatrixData::Complex128(m) => m.as_slice().iter().all(|z| z.is_nan()),
        }
    }

    /// Matrix 1-norm (maximum absolute column sum)
    pub fn norm1(&self) -> f64 {
        match &self.data {
            MatrixData::F64(m) => m.norm1(),
            MatrixData::Complex128(m) => m.norm1(),
        }
    }

    /// Matrix product, promoting to complex when either operand is complex
    pub fn matmul(&self, other: &Self) -> Result<Self> {
        if self.cols() != other.rows() {
            return Err(Error::shape_mismatch(
                &[self.cols(), other.cols()],
                other.shape(),
            ));
        }
        Ok(match (&self.data, &other.data) {
            (MatrixData::F64(a), MatrixData::F64(b)) => a.matmul(b).into(),
            _ => self.to_complex_mat().matmul(&other.to_complex_mat()).into(),
        })
    }

    /// Multiply every element by a real scalar
    pub fn scale(&self, s: f64) -> Self {
        match &self.data {
            MatrixData::F64(m) => m.scale(s).into(),
            MatrixData::Complex128(m) => m.scale(s).into(),
        }
    }

    /// Elementwise difference, promoting to complex when needed
    pub fn sub(&self, other: &Self) -> Result<Self> {
        if self.shape != other.shape {
            return Err(Error::shape_mismatch(self.shape(), other.shape()));
        }
        Ok(match (&self.data, &other.data) {
            (MatrixData::F64(a), MatrixData::F64(b)) => (a - b).into(),
            _ => (&self.to_complex_mat() - &other.to_complex_mat()).into(),
        })
    }

    /// Real part, as an `F64` matrix
    pub fn real_part(&self) -> Self {
        match &self.data {
            MatrixData::F64(m) => m.clone().into(),
            MatrixData::Complex128(m) => m.real_part().into(),
        }
    }
}

impl From<Mat<f64>> for Matrix {
    fn from(m: Mat<f64>) -> Self {
        Self {
            shape: [m.rows(), m.cols()],
            data: MatrixData::F64(m),
        }
    }
}

impl From<Mat<Complex128>> for Matrix {
    fn from(m: Mat<Complex128>) -> Self {
        Self {
            shape: [m.rows(), m.cols()],
            data: MatrixData::Complex128(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_shape_checks() {
        let a = Matrix::from_slice(&[1.0f64, 2.0, 3.0, 4.0], &[2, 2]);
        assert_eq!(a.shape(), &[2, 2]);
        assert_eq!(a.dtype(), DType::F64);
        assert_eq!(a.to_vec::<f64>(), vec![1.0, 2.0, 3.0, 4.0]);

        assert!(matches!(
            Matrix::try_from_slice(&[1.0f64, 2.0, 3.0], &[2, 2]),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(matches!(
            Matrix::try_from_slice(&[1.0f64, 2.0], &[2]),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_from_slice_keeps_element_dtype() {
        let values = [Complex128::new(1.0, -2.0), Complex128::I];
        let c = Matrix::from_slice(&values, &[1, 2]);
        assert_eq!(c.dtype(), DType::Complex128);
        assert_eq!(c.to_vec::<Complex128>(), values.to_vec());

        let r = Matrix::try_from_slice(&[0.5f64, -1.5], &[2, 1]).unwrap();
        assert_eq!(r.dtype(), DType::F64);
        assert_eq!(r.shape(), &[2, 1]);
        assert_eq!(r.to_vec::<f64>(), vec![0.5, -1.5]);
    }

    #[test]
    fn test_complex_promotion() {
        let a = Matrix::from_slice(&[1.0f64, 0.0, 0.0, 1.0], &[2, 2]);
        let b = Matrix::from_slice(
            &[
                Complex128::I,
                Complex128::ZERO,
                Complex128::ZERO,
                Complex128::I,
            ],
            &[2, 2],
        );
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.dtype(), DType::Complex128);
        assert_eq!(c.get(1, 1), Complex128::I);
        assert_eq!(c.real_part().to_vec::<f64>(), vec![0.0; 4]);
    }

    #[test]
    fn test_nan_and_empty() {
        let n = Matrix::nan(2, 2, DType::Complex128);
        assert!(n.is_all_nan());
        assert!(!n.is_finite());
        let e = Matrix::zeros(0, 0, DType::F64);
        assert_eq!(e.shape(), &[0, 0]);
        assert!(e.is_finite());
    }

    #[test]
    fn test_as_mat_dtype_mismatch() {
        let a = Matrix::identity(2, DType::F64);
        assert!(a.as_mat::<f64>().is_ok());
        assert!(matches!(
            a.as_mat::<Complex128>(),
            Err(Error::DTypeMismatch { .. })
        ));
    }
}
