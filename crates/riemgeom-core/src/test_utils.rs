//! Test utilities for checking geometric properties of manifolds.
//!
//! Available under `cfg(test)` and behind the `test-utils` feature so that
//! downstream crates can reuse the same checks in their own test suites.

use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::manifold::{Manifold, Point};
use crate::matrix::DenseMatrix;
use crate::types::Complex64;

/// Deterministic RNG for reproducible tests.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Samples an `n x p` matrix with orthonormal columns (`p <= n`).
///
/// Takes the Q factor of a Gaussian matrix.
pub fn random_orthonormal<R: Rng + ?Sized>(
    n: usize,
    p: usize,
    complex: bool,
    rng: &mut R,
) -> DenseMatrix {
    match DenseMatrix::random_normal(n, p, complex, rng) {
        DenseMatrix::Real(m) => DenseMatrix::from_real(m.qr().q()),
        DenseMatrix::Complex(m) => DenseMatrix::from_complex(m.qr().q()),
    }
}

/// Panics unless `x^H x` equals the identity within `tolerance`.
pub fn assert_orthonormal(x: &DenseMatrix, tolerance: f64) {
    let residual = x.orthonormality_residual();
    assert!(
        residual <= tolerance,
        "columns are not orthonormal: ||X^H X - I||_F = {residual:e} > {tolerance:e}"
    );
}

/// Real matrix from row-major values.
pub fn real_matrix(rows: usize, cols: usize, values: &[f64]) -> DenseMatrix {
    DenseMatrix::from_real(DMatrix::from_row_slice(rows, cols, values))
}

/// Complex matrix from row-major `(re, im)` pairs.
pub fn complex_matrix(rows: usize, cols: usize, values: &[(f64, f64)]) -> DenseMatrix {
    let entries: Vec<Complex64> = values.iter().map(|&(re, im)| Complex64::new(re, im)).collect();
    DenseMatrix::from_complex(DMatrix::from_row_slice(rows, cols, &entries))
}

/// Configuration for property checks.
#[derive(Debug, Clone)]
pub struct PropertyTestConfig {
    /// Tolerance for numerical comparisons
    pub tolerance: f64,
    /// Number of random points to test
    pub num_points: usize,
    /// Number of random tangent vectors per point
    pub num_tangents: usize,
    /// Scale factor for tangent vectors
    pub tangent_scale: f64,
}

impl Default for PropertyTestConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            num_points: 5,
            num_tangents: 3,
            tangent_scale: 0.5,
        }
    }
}

/// Outcome of a property check.
#[derive(Debug)]
pub struct PropertyTestResult {
    /// Whether every sample passed
    pub passed: bool,
    /// Largest error observed
    pub max_error: f64,
    /// Number of samples checked
    pub num_tests: usize,
    /// Failure descriptions
    pub errors: Vec<String>,
}

impl PropertyTestResult {
    fn from_samples(samples: Vec<Result<f64>>, tolerance: f64, property: &str) -> Self {
        let mut max_error = 0.0_f64;
        let mut errors = Vec::new();
        let mut num_tests = 0;

        for sample in samples {
            match sample {
                Ok(error) => {
                    if error.is_nan() || error > tolerance {
                        errors.push(format!("{property}: error = {error:e} > tolerance = {tolerance:e}"));
                    }
                    max_error = max_error.max(error);
                    num_tests += 1;
                }
                Err(e) => errors.push(format!("{property}: {e}")),
            }
        }

        Self {
            passed: errors.is_empty(),
            max_error,
            num_tests,
            errors,
        }
    }
}

/// Property checks that apply to every [`Manifold`].
pub struct ManifoldPropertyTester;

impl ManifoldPropertyTester {
    fn sample<F>(manifold: &dyn Manifold, config: &PropertyTestConfig, mut check: F) -> Vec<Result<f64>>
    where
        F: FnMut(&Point, &DenseMatrix) -> Result<f64>,
    {
        let mut samples = Vec::with_capacity(config.num_points * config.num_tangents);
        for _ in 0..config.num_points {
            let x = match manifold.random_point() {
                Ok(x) => x,
                Err(e) => {
                    samples.push(Err(e));
                    continue;
                }
            };
            for _ in 0..config.num_tangents {
                samples.push(
                    manifold
                        .random_tangent(&x)
                        .and_then(|u| check(&x, &(u * config.tangent_scale))),
                );
            }
        }
        samples
    }

    /// Checks `R(x, 0) = x`.
    pub fn check_retraction_zero(
        manifold: &dyn Manifold,
        config: &PropertyTestConfig,
    ) -> PropertyTestResult {
        let samples = Self::sample(manifold, config, |x, _| {
            let zero = manifold.zero_vector();
            Ok(manifold.retraction(x, zero)?.try_sub(x)?.norm())
        });
        PropertyTestResult::from_samples(samples, config.tolerance, "retraction at zero")
    }

    /// Checks `P_x(P_x(z)) = P_x(z)` for ambient `z`.
    pub fn check_projection_idempotent(
        manifold: &dyn Manifold,
        config: &PropertyTestConfig,
    ) -> PropertyTestResult {
        let (rows, cols) = manifold.ambient_shape();
        let mut rng = rand::thread_rng();
        let samples = Self::sample(manifold, config, |x, _| {
            let z = DenseMatrix::random_normal(rows, cols, manifold.is_complex(), &mut rng);
            let once = manifold.projection(x, &z)?;
            let twice = manifold.projection(x, &once)?;
            Ok(twice.try_sub(&once)?.norm())
        });
        PropertyTestResult::from_samples(samples, config.tolerance, "projection idempotence")
    }

    /// Checks `g_x(u, u) >= 0` and symmetry `g_x(u, v) = g_x(v, u)`.
    pub fn check_metric_symmetric_psd(
        manifold: &dyn Manifold,
        config: &PropertyTestConfig,
    ) -> PropertyTestResult {
        let samples = Self::sample(manifold, config, |x, u| {
            let v = manifold.random_tangent(x)?;
            let uu = manifold.metric(x, u, u)?;
            let asymmetry = (manifold.metric(x, u, &v)? - manifold.metric(x, &v, u)?).abs();
            Ok(asymmetry.max(-uu))
        });
        PropertyTestResult::from_samples(samples, config.tolerance, "metric symmetry/positivity")
    }

    /// Checks that transported vectors are tangent at the retracted point.
    pub fn check_transport_tangent(
        manifold: &dyn Manifold,
        config: &PropertyTestConfig,
    ) -> PropertyTestResult {
        let samples = Self::sample(manifold, config, |x, u| {
            let y = manifold.retraction(x, u)?;
            let v = manifold.random_tangent(x)?;
            let transported = manifold.vector_transport(x, u, &y, &v)?;
            let reprojected = manifold.projection(&y, &transported)?;
            Ok(reprojected.try_sub(&transported)?.norm())
        });
        PropertyTestResult::from_samples(samples, config.tolerance, "transport tangency")
    }
}
