//! Integration tests for the CPU linear-algebra back-end

mod common;

use common::{create_cpu_client, random_complex_matrix, random_normal_matrix, seeded_rng};
use matfun::algorithm::linalg::LinearAlgebraAlgorithms;
use matfun::dtype::Complex128;
use matfun::error::Error;
use matfun::matrix::Mat;

fn max_abs_diff(a: &Mat<Complex128>, b: &Mat<Complex128>) -> f64 {
    a.as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(&x, &y)| (x - y).magnitude())
        .fold(0.0, f64::max)
}

#[test]
fn test_schur_reconstructs_input() {
    let client = create_cpu_client();
    let mut rng = seeded_rng(42);
    for n in 1..9 {
        for a in [
            random_normal_matrix(&mut rng, n),
            random_complex_matrix(&mut rng, n),
        ] {
            let a = a.to_complex_mat();
            let schur = client.schur_decompose(&a).unwrap();
            assert_eq!(schur.order(), n);
            assert!(schur.t.is_upper_triangular(), "n={n}: T not triangular");

            let zzh = schur.z.matmul(&schur.z.conj_transpose());
            assert!(max_abs_diff(&zzh, &Mat::identity(n)) < 1e-12, "n={n}: Z not unitary");

            let rebuilt = schur.back_transform(&schur.t);
            let tol = 1e-12 * a.norm1().max(1.0);
            assert!(max_abs_diff(&rebuilt, &a) < tol, "n={n}: A != Z T Z^H");
        }
    }
}

#[test]
fn test_eigenvalues_of_rotation() {
    let client = create_cpu_client();
    let a = Mat::from_vec(2, 2, vec![0.0, 1.0, -1.0, 0.0]).to_complex();
    let mut eigs = client.eigenvalues(&a).unwrap();
    eigs.sort_by(|x, y| x.im.total_cmp(&y.im));
    assert!((eigs[0] - Complex128::new(0.0, -1.0)).magnitude() < 1e-14);
    assert!((eigs[1] - Complex128::new(0.0, 1.0)).magnitude() < 1e-14);
}

#[test]
fn test_schur_rejects_non_square() {
    let client = create_cpu_client();
    let a = Mat::<Complex128>::zeros(2, 3);
    assert!(matches!(
        client.schur_decompose(&a),
        Err(Error::ShapeMismatch { .. })
    ));
}

#[test]
fn test_lu_solve_and_inverse() {
    let client = create_cpu_client();
    let a = Mat::from_vec(3, 3, vec![0.0, 2.0, 1.0, 1.0, 1.0, 0.0, 3.0, 0.0, 4.0]);
    let b = Mat::from_vec(3, 1, vec![5.0, 2.0, 11.0]);
    let x = client.solve(&a, &b).unwrap();
    let residual = a.matmul(&x);
    for (got, want) in residual.as_slice().iter().zip(b.as_slice()) {
        assert!((got - want).abs() < 1e-13);
    }

    let inv = client.inverse(&a).unwrap();
    let product = a.matmul(&inv);
    let identity = Mat::<f64>::identity(3);
    for (got, want) in product.as_slice().iter().zip(identity.as_slice()) {
        assert!((got - want).abs() < 1e-13);
    }
}

#[test]
fn test_lu_singular() {
    let client = create_cpu_client();
    let a = Mat::from_vec(2, 2, vec![1.0, 2.0, 2.0, 4.0]);
    assert!(matches!(
        client.lu_decompose(&a),
        Err(Error::SingularMatrix)
    ));
}

#[test]
fn test_solve_triangular_upper() {
    let client = create_cpu_client();
    let u = Mat::from_vec(2, 2, vec![2.0, 1.0, 0.0, 4.0]);
    let b = Mat::from_vec(2, 2, vec![3.0, 2.0, 4.0, 8.0]);
    let x = client.solve_triangular_upper(&u, &b).unwrap();
    assert_eq!(x.as_slice(), &[1.0, 0.0, 1.0, 2.0]);
}
