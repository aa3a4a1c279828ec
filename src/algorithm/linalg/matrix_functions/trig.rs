//! Trigonometric and hyperbolic matrix functions
//!
//! All are built on the Padé exponential and keep the input dtype:
//! cos A = (e^{iA} + e^{−iA})/2, sin A = (e^{iA} − e^{−iA})/(2i), and the
//! hyperbolic versions from e^{±A}. tan and tanh solve cos·X = sin and
//! cosh·X = sinh.

use super::expm::{expm_i, expm_mat};
use super::spectrum::tolerate_numerical;
use crate::algorithm::linalg::{LinearAlgebraAlgorithms, validate_square_matrix};
use crate::dtype::{Complex128, Element};
use crate::error::Result;
use crate::matrix::{Mat, Matrix, MatrixData};

/// Which function of the exponential pair to form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrigFunction {
    Cos,
    Sin,
    Tan,
    Cosh,
    Sinh,
    Tanh,
}

/// cos and sin of a complex matrix
fn cos_sin<B: LinearAlgebraAlgorithms>(
    backend: &B,
    a: &Mat<Complex128>,
) -> Result<(Mat<Complex128>, Mat<Complex128>)> {
    let plus = expm_i(backend, a, 1.0)?;
    let minus = expm_i(backend, a, -1.0)?;
    let cos = Mat::linear_combination(&[(0.5, &plus), (0.5, &minus)]);
    // (e^{iA} − e^{−iA}) / 2i = −i/2 · (e^{iA} − e^{−iA})
    let sin = (&plus - &minus).scale_by(Complex128::new(0.0, -0.5));
    Ok((cos, sin))
}

/// cosh and sinh of a typed matrix
fn cosh_sinh<T, B>(backend: &B, a: &Mat<T>) -> Result<(Mat<T>, Mat<T>)>
where
    T: Element,
    B: LinearAlgebraAlgorithms,
{
    let plus = expm_mat(backend, a)?;
    let minus = expm_mat(backend, &a.scale(-1.0))?;
    let cosh = Mat::linear_combination(&[(0.5, &plus), (0.5, &minus)]);
    let sinh = Mat::linear_combination(&[(0.5, &plus), (-0.5, &minus)]);
    Ok((cosh, sinh))
}

/// num·den⁻¹ computed as the solve den·X = num (the factors commute)
fn ratio<T, B>(backend: &B, den: &Mat<T>, num: &Mat<T>) -> Result<Mat<T>>
where
    T: Element,
    B: LinearAlgebraAlgorithms,
{
    let n = den.rows();
    Ok(tolerate_numerical(backend.solve(den, num))?.unwrap_or_else(|| Mat::nan(n, n)))
}

fn trig_typed<T, B>(backend: &B, a: &Mat<T>, f: TrigFunction) -> Result<Mat<T>>
where
    T: Element,
    B: LinearAlgebraAlgorithms,
{
    let narrow = |m: Mat<Complex128>| m.map(T::from_complex);
    Ok(match f {
        TrigFunction::Cos | TrigFunction::Sin | TrigFunction::Tan => {
            let (cos, sin) = cos_sin(backend, &a.to_complex())?;
            match f {
                TrigFunction::Cos => narrow(cos),
                TrigFunction::Sin => narrow(sin),
                _ => narrow(ratio(backend, &cos, &sin)?),
            }
        }
        TrigFunction::Cosh | TrigFunction::Sinh | TrigFunction::Tanh => {
            let (cosh, sinh) = cosh_sinh(backend, a)?;
            match f {
                TrigFunction::Cosh => cosh,
                TrigFunction::Sinh => sinh,
                _ => ratio(backend, &cosh, &sinh)?,
            }
        }
    })
}

pub(crate) fn trig_impl<B: LinearAlgebraAlgorithms>(
    backend: &B,
    a: &Matrix,
    f: TrigFunction,
) -> Result<Matrix> {
    validate_square_matrix(a.shape())?;
    let result: Matrix = match a.data() {
        MatrixData::F64(m) => trig_typed(backend, m, f)?.into(),
        MatrixData::Complex128(m) => trig_typed(backend, m, f)?.into(),
    };
    if result.is_finite() {
        Ok(result)
    } else {
        Ok(Matrix::nan(a.rows(), a.cols(), a.dtype()))
    }
}
