//! Tests for least-squares fitting and coefficient p-values

use faer::Mat;
use featsel::pipeline::{OlsTTest, SelectionError, SignificanceTest};

#[path = "common/mod.rs"]
mod common;

/// Two real predictors plus one orthogonal to both and to the noise
fn regression_fixture() -> (Vec<Vec<f64>>, Vec<f64>) {
    let x0: Vec<f64> = [1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0, 5.0, 5.0, 6.0, 6.0].to_vec();
    let x1: Vec<f64> = [2.0, 1.0, 3.0, 1.0, 2.0, 5.0]
        .iter()
        .flat_map(|&v| [v, v])
        .collect();
    let x2: Vec<f64> = (0..12).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
    let noise = [0.1, 0.1, -0.2, -0.2, 0.1, 0.1, 0.0, 0.0, -0.1, -0.1, 0.05, 0.05];

    let y = (0..12)
        .map(|i| 2.0 * x0[i] + 3.0 * x1[i] + noise[i])
        .collect();
    (vec![x0, x1, x2], y)
}

#[test]
fn test_fit_recovers_coefficients() {
    let (columns, y) = regression_fixture();
    let x = common::matrix_from_columns(&columns[..2]);

    let fit = OlsTTest.fit(&x, &y).unwrap();

    assert_eq!(fit.degrees_of_freedom, 10);
    assert!((fit.coefficients[0] - 1.961_920_5).abs() < 1e-6);
    assert!((fit.coefficients[1] - 3.057_284_8).abs() < 1e-6);
    assert!((fit.t_values[0] - 121.373).abs() < 1e-2);
    assert!(fit.p_values.iter().all(|&p| p < 1e-10));
    assert!(fit.residual_sum_of_squares > 0.0);
}

#[test]
fn test_irrelevant_column_has_high_p_value() {
    let (columns, y) = regression_fixture();
    let x = common::matrix_from_columns(&columns);

    let p = OlsTTest.p_values(&x, &y).unwrap();

    assert_eq!(p.len(), 3);
    assert!(p[0] < 1e-10);
    assert!(p[1] < 1e-10);
    assert!(p[2] > 0.99, "orthogonal column p-value was {}", p[2]);
}

#[test]
fn test_p_values_are_probabilities() {
    let (columns, y) = regression_fixture();
    let x = common::matrix_from_columns(&columns);

    let fit = OlsTTest.fit(&x, &y).unwrap();
    for (&p, &se) in fit.p_values.iter().zip(&fit.std_errors) {
        assert!((0.0..=1.0).contains(&p));
        assert!(se > 0.0);
    }
}

#[test]
fn test_exact_fit_gives_vanishing_p_value() {
    let x = common::matrix_from_columns(&[vec![1.0, 2.0, 3.0, 4.0]]);
    let y = vec![2.0, 4.0, 6.0, 8.0];

    let fit = OlsTTest.fit(&x, &y).unwrap();
    assert!((fit.coefficients[0] - 2.0).abs() < 1e-12);
    assert!(fit.p_values[0] < 1e-12);
}

#[test]
fn test_identical_columns_are_singular() {
    let column = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    let x = common::matrix_from_columns(&[column.clone(), column]);
    let y = vec![1.0, 0.0, 1.0, 0.0, 1.0];

    let err = OlsTTest.fit(&x, &y).unwrap_err();
    assert!(matches!(err, SelectionError::SingularDesign));
}

#[test]
fn test_too_few_rows() {
    let x = Mat::<f64>::from_fn(2, 2, |i, j| (i + j) as f64 + 1.0);
    let err = OlsTTest.fit(&x, &[1.0, 0.0]).unwrap_err();
    assert!(matches!(
        err,
        SelectionError::InsufficientDegreesOfFreedom {
            rows: 2,
            columns: 2
        }
    ));
}

#[test]
fn test_response_length_mismatch() {
    let x = Mat::<f64>::from_fn(4, 1, |i, _| i as f64);
    let err = OlsTTest.fit(&x, &[1.0, 2.0]).unwrap_err();
    assert!(matches!(err, SelectionError::LengthMismatch { .. }));
}

#[test]
fn test_no_columns() {
    let x = Mat::<f64>::zeros(4, 0);
    let err = OlsTTest.fit(&x, &[1.0, 2.0, 3.0, 4.0]).unwrap_err();
    assert!(matches!(err, SelectionError::NoFeatures));
}
