//! Algebraic properties of the dense matrix value type.

use approx::assert_abs_diff_eq;
use nalgebra::DMatrix;
use proptest::prelude::*;
use riemgeom_core::{Complex64, DenseMatrix, ManifoldError};

fn arb_shape() -> impl Strategy<Value = (usize, usize)> {
    (1usize..6, 1usize..6)
}

fn arb_real(rows: usize, cols: usize) -> impl Strategy<Value = DenseMatrix> {
    proptest::collection::vec(-100.0f64..100.0, rows * cols)
        .prop_map(move |values| DenseMatrix::from_real(DMatrix::from_vec(rows, cols, values)))
}

fn arb_complex(rows: usize, cols: usize) -> impl Strategy<Value = DenseMatrix> {
    proptest::collection::vec((-100.0f64..100.0, -100.0f64..100.0), rows * cols).prop_map(
        move |values| {
            let entries = values.into_iter().map(|(re, im)| Complex64::new(re, im)).collect();
            DenseMatrix::from_complex(DMatrix::from_vec(rows, cols, entries))
        },
    )
}

fn arb_pair() -> impl Strategy<Value = (DenseMatrix, DenseMatrix)> {
    arb_shape().prop_flat_map(|(rows, cols)| {
        let a = prop_oneof![arb_real(rows, cols), arb_complex(rows, cols)];
        let b = prop_oneof![arb_real(rows, cols), arb_complex(rows, cols)];
        (a, b)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn add_then_subtract_restores_operand((a, b) in arb_pair()) {
        let roundtrip = a.try_add(&b).unwrap().try_sub(&b).unwrap();
        prop_assert_eq!(roundtrip.shape(), a.shape());
        prop_assert_eq!(roundtrip.is_complex(), a.is_complex() || b.is_complex());
        let expected = if b.is_complex() { a.clone().into_complex() } else { a.clone() };
        prop_assert!(roundtrip == expected);
    }

    #[test]
    fn inner_product_is_symmetric((a, b) in arb_pair()) {
        let ab = a.inner(&b).unwrap();
        let ba = b.inner(&a).unwrap();
        prop_assert!((ab - ba).abs() <= 1e-9 * (1.0 + ab.abs()));
    }

    #[test]
    fn self_inner_is_squared_norm((a, _b) in arb_pair()) {
        let aa = a.inner(&a).unwrap();
        prop_assert!((aa - a.norm().powi(2)).abs() <= 1e-9 * (1.0 + aa));
    }

    #[test]
    fn adjoint_is_involutive((a, _b) in arb_pair()) {
        prop_assert!(a.adjoint().adjoint() == a);
    }
}

#[test]
fn mismatched_shapes_name_the_operator() {
    let a = DenseMatrix::zeros(3, 2, false);
    let b = DenseMatrix::zeros(2, 3, true);

    for (result, operator) in [
        (a.try_add(&b), "operator +"),
        (a.try_sub(&b), "operator -"),
        (a.try_div(&b), "operator /"),
    ] {
        match result {
            Err(ManifoldError::DimensionMismatch { context, .. }) => assert_eq!(context, operator),
            other => panic!("expected dimension mismatch for {operator}, got {other:?}"),
        }
    }
}

#[test]
fn real_matrix_product_matches_nalgebra() {
    let a = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let b = DMatrix::from_row_slice(3, 1, &[1.0, 0.0, -1.0]);
    let product = DenseMatrix::from_real(a.clone())
        .try_mul(&DenseMatrix::from_real(b.clone()))
        .unwrap();

    let expected = a * b;
    let actual = product.as_real().unwrap();
    assert_abs_diff_eq!(actual[(0, 0)], expected[(0, 0)], epsilon = 1e-12);
    assert_abs_diff_eq!(actual[(1, 0)], expected[(1, 0)], epsilon = 1e-12);
}
