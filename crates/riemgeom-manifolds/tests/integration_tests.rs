//! Integration tests for riemgeom-manifolds
//!
//! These tests exercise the manifolds through the core `Manifold` trait,
//! including composites built from heterogeneous bases.

use approx::assert_relative_eq;
use riemgeom_core::{
    error::ManifoldError,
    manifold::Manifold,
    matrix::DenseMatrix,
    test_utils::{assert_orthonormal, seeded_rng, ManifoldPropertyTester, PropertyTestConfig},
};
use riemgeom_manifolds::{
    Euclidean, MetricType, ProductManifold, RetractionType, StackedManifold, Stiefel,
    StiefelOptions, VectorTransportType,
};

fn all_stiefel_variants(n: usize, p: usize) -> Vec<Stiefel> {
    let mut variants = Vec::new();
    for complex in [false, true] {
        for retraction in [
            RetractionType::Qr,
            RetractionType::Polar,
            RetractionType::Cayley,
            RetractionType::Exponential,
        ] {
            for metric in [MetricType::Euclidean, MetricType::Canonical] {
                let options = StiefelOptions::default()
                    .with_metric(metric)
                    .with_retraction(retraction);
                variants.push(Stiefel::with_options(n, p, complex, options).unwrap());
            }
        }
    }
    variants
}

#[test]
fn test_euclidean_basic_operations() {
    let euclidean = Euclidean::new(4, 3).unwrap();
    let mut rng = seeded_rng(1);
    let x = euclidean.random_point_with(&mut rng);
    let u = euclidean.random_point_with(&mut rng);
    let v = euclidean.random_point_with(&mut rng);

    assert_eq!(euclidean.retraction(&x, &u).unwrap(), x.try_add(&u).unwrap());
    assert_eq!(euclidean.projection(&x, &v).unwrap(), v);
    let y = euclidean.retraction(&x, &u).unwrap();
    assert_eq!(euclidean.vector_transport(&x, &u, &y, &v).unwrap(), v);
}

#[test]
fn test_stiefel_properties() {
    let config = PropertyTestConfig::default();
    for stiefel in all_stiefel_variants(5, 2) {
        let label = format!("{} {:?} complex={}", stiefel.name(), stiefel.options(), stiefel.is_complex());

        let result = ManifoldPropertyTester::check_retraction_zero(&stiefel, &config);
        assert!(result.passed, "{label}: {:?}", result.errors);

        let result = ManifoldPropertyTester::check_projection_idempotent(&stiefel, &config);
        assert!(result.passed, "{label}: {:?}", result.errors);

        let result = ManifoldPropertyTester::check_metric_symmetric_psd(&stiefel, &config);
        assert!(result.passed, "{label}: {:?}", result.errors);

        let result = ManifoldPropertyTester::check_transport_tangent(&stiefel, &config);
        assert!(result.passed, "{label}: {:?}", result.errors);
    }
}

#[test]
fn test_stiefel_closure_for_large_steps() {
    let mut rng = seeded_rng(4);
    for stiefel in all_stiefel_variants(6, 3) {
        let x = stiefel.random_point_with(&mut rng);
        let u = stiefel.random_tangent(&x).unwrap() * 3.0;
        let y = stiefel.retraction(&x, &u).unwrap();
        assert_orthonormal(&y, 1e-8);
    }
}

#[test]
fn test_stiefel_cayley_transport_properties() {
    let options = StiefelOptions::default()
        .with_retraction(RetractionType::Cayley)
        .with_vector_transport(VectorTransportType::Cayley);
    for complex in [false, true] {
        let stiefel = Stiefel::with_options(6, 2, complex, options).unwrap();
        let result = ManifoldPropertyTester::check_transport_tangent(&stiefel, &PropertyTestConfig::default());
        assert!(result.passed, "{:?}", result.errors);
    }
}

#[test]
fn test_stiefel_invalid_dimensions() {
    assert!(matches!(
        Stiefel::new(5, 7),
        Err(ManifoldError::InvalidParameter { .. })
    ));
}

#[test]
fn test_product_matches_blockwise_computation() {
    let euclidean = Euclidean::new(2, 2).unwrap();
    let stiefel = Stiefel::new(3, 2).unwrap();
    let product = ProductManifold::new(&[&euclidean, &stiefel], &[1, 2]).unwrap();

    assert_eq!(product.dimension(), 2 * 2 + 2 * (3 * 2));
    assert_eq!(product.ambient_shape().0, 2 + 2 * 3);

    let x = product.random_point().unwrap();
    let u = product.random_tangent(&x).unwrap();
    let v = product.random_tangent(&x).unwrap();
    let y = product.retraction(&x, &u).unwrap();

    let slots: [(&dyn Manifold, usize, usize); 3] =
        [(&euclidean, 0, 2), (&stiefel, 2, 3), (&stiefel, 5, 3)];

    let mut metric = 0.0;
    let mut retracted = Vec::new();
    let mut transported = Vec::new();
    for (manifold, start, rows) in slots {
        let xb = x.row_block(start, rows).unwrap();
        let ub = u.row_block(start, rows).unwrap();
        let vb = v.row_block(start, rows).unwrap();
        let yb = manifold.retraction(&xb, &ub).unwrap();

        metric += manifold.metric(&xb, &ub, &vb).unwrap();
        transported.push(manifold.vector_transport(&xb, &ub, &yb, &vb).unwrap());
        retracted.push(yb);
    }

    assert_relative_eq!(product.metric(&x, &u, &v).unwrap(), metric, epsilon = 1e-12);
    assert_eq!(y, DenseMatrix::vstack(&retracted).unwrap());
    assert_eq!(
        product.vector_transport(&x, &u, &y, &v).unwrap(),
        DenseMatrix::vstack(&transported).unwrap()
    );
}

#[test]
fn test_product_configuration_errors() {
    let narrow = Euclidean::new(2, 1).unwrap();
    let stiefel = Stiefel::new(3, 2).unwrap();

    assert!(ProductManifold::new(&[&narrow, &stiefel], &[1, 2]).is_err());
    assert!(ProductManifold::new(&[&narrow], &[1, 2]).is_err());
    assert!(ProductManifold::new(&[&stiefel], &[0]).is_err());
}

#[test]
fn test_product_rejects_wrong_operand_shape() {
    let euclidean = Euclidean::new(2, 2).unwrap();
    let stiefel = Stiefel::new(3, 2).unwrap();
    let product = ProductManifold::new(&[&euclidean, &stiefel], &[1, 2]).unwrap();

    let x = product.random_point().unwrap();
    let short = DenseMatrix::zeros(7, 2, false);
    match product.retraction(&x, &short) {
        Err(ManifoldError::DimensionMismatch { context, expected, actual }) => {
            assert!(context.starts_with("etax"));
            assert_eq!(expected, "8x2");
            assert_eq!(actual, "7x2");
        }
        other => panic!("expected dimension mismatch, got {other:?}"),
    }
}

#[test]
fn test_stacked_euclidean_retraction() {
    let base = Euclidean::new(3, 1).unwrap();
    let stacked = StackedManifold::new(&base, 4).unwrap();
    let mut rng = seeded_rng(12);
    let x = DenseMatrix::random_normal(12, 1, false, &mut rng);
    let u = DenseMatrix::random_normal(12, 1, false, &mut rng);

    let blocks: Vec<DenseMatrix> = (0..4)
        .map(|i| {
            base.retraction(&x.row_block(3 * i, 3).unwrap(), &u.row_block(3 * i, 3).unwrap())
                .unwrap()
        })
        .collect();
    assert_eq!(
        stacked.retraction(&x, &u).unwrap(),
        DenseMatrix::vstack(&blocks).unwrap()
    );
    assert!(StackedManifold::new(&base, 0).is_err());
}

#[test]
fn test_nested_composites() {
    let stiefel = Stiefel::new_complex(4, 2).unwrap();
    let euclidean = Euclidean::new(1, 2).unwrap();
    let stacked = StackedManifold::new(&stiefel, 3).unwrap();
    let product = ProductManifold::new(&[&stacked, &euclidean], &[1, 2]).unwrap();

    assert_eq!(product.ambient_shape(), (12 + 2, 2));
    assert!(product.is_complex());

    let config = PropertyTestConfig::default();
    let result = ManifoldPropertyTester::check_retraction_zero(&product, &config);
    assert!(result.passed, "{:?}", result.errors);
    let result = ManifoldPropertyTester::check_projection_idempotent(&product, &config);
    assert!(result.passed, "{:?}", result.errors);
}

#[test]
fn test_exponential_retraction_stays_feasible_when_iterated() {
    // 2p > n: the normal part of the step is rank deficient.
    for &(n, p) in &[(8, 8), (20, 19), (20, 20)] {
        for complex in [false, true] {
            let options = StiefelOptions::default().with_retraction(RetractionType::Exponential);
            let stiefel = Stiefel::with_options(n, p, complex, options).unwrap();
            let mut rng = seeded_rng(0x5eed + n as u64);
            let mut x = stiefel.random_point_with(&mut rng);

            for step in 0..200 {
                let z = DenseMatrix::random_normal(n, p, complex, &mut rng);
                let u = stiefel.projection(&x, &z).unwrap();
                let u = &u * (1.0 / u.norm());
                x = stiefel.retraction(&x, &u).unwrap_or_else(|err| {
                    panic!("St({n},{p}) complex={complex} failed at step {step}: {err}")
                });
            }
            assert!(
                x.orthonormality_residual() < 1e-12,
                "St({n},{p}) complex={complex} drifted to {}",
                x.orthonormality_residual()
            );
        }
    }
}
