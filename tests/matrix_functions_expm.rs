//! Integration tests for matrix exponential (expm, expm_taylor)

mod common;

use common::{
    assert_allclose_f64, assert_matrix_close, complex_matrix, create_cpu_client,
    random_normal_matrix, real_matrix, seeded_rng,
};
use matfun::algorithm::linalg::MatrixFunctionsAlgorithms;
use matfun::algorithm::linalg::matrix_functions::{
    EXPM_PADE_TABLE, Exp, choose_pade, choose_pade_for,
};
use matfun::dtype::DType;
use matfun::error::Error;
use matfun::matrix::{Mat, Matrix};

#[test]
fn test_expm_zero() {
    // exp(0) = I
    let client = create_cpu_client();

    let zeros = Matrix::zeros(2, 2, DType::F64);
    let result = client.expm(&zeros).expect("expm should succeed");

    let result_data: Vec<f64> = result.to_vec();
    assert_eq!(result_data, vec![1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_expm_diagonal() {
    // exp(diag([a, b, c])) = diag([exp(a), exp(b), exp(c)])
    let client = create_cpu_client();

    let diag_matrix = real_matrix(&[1.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 3.0], 3);
    let result = client.expm(&diag_matrix).expect("expm should succeed");

    let result_data: Vec<f64> = result.to_vec();
    let expected = vec![
        1.0_f64.exp(),
        0.0,
        0.0,
        0.0,
        2.0_f64.exp(),
        0.0,
        0.0,
        0.0,
        3.0_f64.exp(),
    ];

    assert_allclose_f64(&result_data, &expected, 1e-13, 1e-14, "expm(diag)");
}

#[test]
fn test_expm_1x1() {
    let client = create_cpu_client();

    let a = real_matrix(&[2.5], 1);
    let result = client.expm(&a).expect("expm should succeed");

    let result_data: Vec<f64> = result.to_vec();
    assert_allclose_f64(&result_data, &[2.5_f64.exp()], 1e-15, 0.0, "expm(1x1)");
}

#[test]
fn test_expm_nilpotent() {
    // For strictly upper triangular matrix [[0, 1], [0, 0]]:
    // exp(A) = I + A = [[1, 1], [0, 1]]
    let client = create_cpu_client();

    let a = real_matrix(&[0.0, 1.0, 0.0, 0.0], 2);
    let result = client.expm(&a).expect("expm should succeed");

    let result_data: Vec<f64> = result.to_vec();
    assert_allclose_f64(&result_data, &[1.0, 1.0, 0.0, 1.0], 1e-14, 1e-14, "expm(nilpotent)");
}

#[test]
fn test_expm_rotation_generator() {
    // exp(t [[0, 1], [-1, 0]]) = [[cos t, sin t], [-sin t, cos t]]
    let client = create_cpu_client();

    for t in [0.5_f64, 1.0, 3.0, 10.0] {
        let a = real_matrix(&[0.0, t, -t, 0.0], 2);
        let result = client.expm(&a).expect("expm should succeed");
        assert_eq!(result.dtype(), DType::F64);

        let result_data: Vec<f64> = result.to_vec();
        let expected = vec![t.cos(), t.sin(), -t.sin(), t.cos()];
        assert_allclose_f64(&result_data, &expected, 1e-12, 1e-13, "expm(rotation)");
    }
}

#[test]
fn test_expm_agrees_with_taylor() {
    let client = create_cpu_client();

    let a = real_matrix(&[0.0, 1.0, -1.0, 0.0], 2);
    let pade = client.expm(&a).unwrap();
    let taylor = client.expm_taylor(&a, 30).unwrap();
    assert_matrix_close(&pade, &taylor, 1e-13, 1e-14, "real rotation");

    let a = complex_matrix(&[(0.0, 1.0), (1.0, 0.0), (-1.0, 0.0), (0.0, -2.0)], 2);
    let pade = client.expm(&a).unwrap();
    let taylor = client.expm_taylor(&a, 40).unwrap();
    assert_eq!(pade.dtype(), DType::Complex128);
    assert_matrix_close(&pade, &taylor, 1e-12, 1e-13, "complex case");
}

#[test]
fn test_expm_inverse_property() {
    // exp(A) exp(-A) = I
    let client = create_cpu_client();
    let mut rng = seeded_rng(1234);

    for n in 1..6 {
        let a = random_normal_matrix(&mut rng, n);
        let e_pos = client.expm(&a).unwrap();
        let e_neg = client.expm(&a.scale(-1.0)).unwrap();
        let product = e_pos.matmul(&e_neg).unwrap();
        assert_matrix_close(
            &product,
            &Matrix::identity(n, DType::F64),
            1e-10,
            1e-10,
            "exp(A) exp(-A)",
        );
    }
}

#[test]
fn test_expm_scaling_regime() {
    // Large norm forces scaling and squaring; the result is still exact on
    // a diagonal matrix
    let client = create_cpu_client();
    let a = real_matrix(&[20.0, 0.0, 0.0, -20.0], 2);
    let result = client.expm(&a).unwrap();
    let expected = vec![20.0_f64.exp(), 0.0, 0.0, (-20.0_f64).exp()];
    assert_allclose_f64(&result.to_vec::<f64>(), &expected, 1e-12, 0.0, "expm(large)");
}

#[test]
fn test_expm_non_finite_input_is_nan() {
    let client = create_cpu_client();
    let a = real_matrix(&[1.0, f64::INFINITY, 0.0, 1.0], 2);
    let result = client.expm(&a).unwrap();
    assert!(result.is_all_nan());
    assert_eq!(result.dtype(), DType::F64);
}

#[test]
fn test_expm_rejects_non_square() {
    let client = create_cpu_client();
    let a = Matrix::from_slice(&[1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    assert!(matches!(client.expm(&a), Err(Error::ShapeMismatch { .. })));
}

#[test]
fn test_pade_selection_table() {
    // Norms at or under ℓ_m pick degree m without scaling
    for entry in EXPM_PADE_TABLE.iter() {
        let choice = choose_pade(entry.ell).unwrap();
        assert_eq!(choice.entry.degree, entry.degree);
        assert_eq!(choice.squarings, 0);
    }

    let choice = choose_pade(100.0).unwrap();
    assert_eq!(choice.entry.degree, 13);
    assert_eq!(choice.squarings, 5);

    assert!(choose_pade(f64::NAN).is_none());
    assert!(choose_pade(f64::INFINITY).is_none());
}

#[test]
fn test_expm_nonnormal_upper_triangular() {
    // exp([[a, t], [0, b]]) has (0, 1) entry t·(e^a − e^b)/(a − b)
    let client = create_cpu_client();
    for (a, b) in [(0.3_f64, -0.2_f64), (10.0, -12.0)] {
        for t in [1e2, 1e4, 1e6] {
            let m = real_matrix(&[a, t, 0.0, b], 2);
            let result = client.expm(&m).unwrap();
            let expected = [a.exp(), t * (a.exp() - b.exp()) / (a - b), 0.0, b.exp()];
            assert_allclose_f64(
                &result.to_vec::<f64>(),
                &expected,
                1e-12,
                0.0,
                "expm(upper triangular)",
            );
        }
    }
}

#[test]
fn test_expm_badly_scaled_triangular_log() {
    // The logarithm of an upper triangular matrix with 3e4 off the diagonal;
    // its exponential must keep the exact diagonal and match Schur-Parlett
    let client = create_cpu_client();
    let a = real_matrix(
        &[
            3.2346e-1, 3e4, 3e4, 3e4, //
            0.0, 3.0089e-1, 3e4, 3e4, //
            0.0, 0.0, 3.2210e-1, 3e4, //
            0.0, 0.0, 0.0, 3.0744e-1,
        ],
        4,
    );
    let log = client.logm(&a).unwrap();
    let exp = client.expm(&log).unwrap();
    let diag: Vec<f64> = (0..4).map(|i| exp.get(i, i).re).collect();
    let expected_diag: Vec<f64> = (0..4).map(|i| a.get(i, i).re).collect();
    assert_allclose_f64(&diag, &expected_diag, 1e-12, 0.0, "diagonal");

    let parlett = client.funm(&log, &Exp).unwrap();
    assert_matrix_close(&exp, &parlett, 1e-5, 1e-14, "expm vs funm");
    assert_matrix_close(&exp, &a, 1e-5, 1e-14, "round trip");
}

#[test]
fn test_pade_selection_ignores_nilpotent_norm() {
    // ‖A‖₁ is large but A² = 0, so no scaling is needed
    let a = Mat::from_vec(2, 2, vec![0.0, 1e8, 0.0, 0.0]);
    let choice = choose_pade_for(&a).unwrap();
    assert_eq!(choice.squarings, 0);
    let client = create_cpu_client();
    let result = client.expm(&real_matrix(&[0.0, 1e8, 0.0, 0.0], 2)).unwrap();
    assert_allclose_f64(&result.to_vec::<f64>(), &[1.0, 1e8, 0.0, 1.0], 1e-15, 0.0, "I + A");
}

#[test]
fn test_expm_eig_zero() {
    let client = create_cpu_client();
    let zeros = Matrix::zeros(2, 2, DType::F64);
    let result = client.expm_eig(&zeros).unwrap();
    assert_eq!(result.dtype(), DType::F64);
    assert_allclose_f64(&result.to_vec::<f64>(), &[1.0, 0.0, 0.0, 1.0], 0.0, 1e-15, "expm_eig(0)");
}

#[test]
fn test_expm_eig_consistency() {
    let client = create_cpu_client();

    let a = real_matrix(&[0.0, 1.0, -1.0, 0.0], 2);
    let eig = client.expm_eig(&a).unwrap();
    assert_eq!(eig.dtype(), DType::F64);
    assert_matrix_close(&client.expm(&a).unwrap(), &eig, 1e-10, 1e-12, "rotation");
    assert_matrix_close(&client.expm_taylor(&a, 30).unwrap(), &eig, 1e-10, 1e-12, "taylor");

    let a = complex_matrix(&[(0.0, 1.0), (1.0, 0.0), (-1.0, 0.0), (0.0, -2.0)], 2);
    let eig = client.expm_eig(&a).unwrap();
    assert_eq!(eig.dtype(), DType::Complex128);
    assert_matrix_close(&client.expm(&a).unwrap(), &eig, 1e-10, 1e-12, "complex");
}

#[test]
fn test_expm_eig_random_diagonalizable() {
    let client = create_cpu_client();
    let mut rng = seeded_rng(7);
    for n in 1..6 {
        let a = random_normal_matrix(&mut rng, n);
        let eig = client.expm_eig(&a).unwrap();
        let pade = client.expm(&a).unwrap();
        assert_matrix_close(&eig, &pade, 1e-8, 1e-10 * pade.norm1(), "random");
    }
}

#[test]
fn test_expm_eig_defective_is_nan() {
    let client = create_cpu_client();
    let jordan = real_matrix(&[2.0, 1.0, 0.0, 2.0], 2);
    assert!(client.expm_eig(&jordan).unwrap().is_all_nan());
}
