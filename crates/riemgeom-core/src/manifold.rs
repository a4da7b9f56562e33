//! Core manifold trait.
//!
//! A manifold here is an embedded matrix manifold: points and tangent
//! vectors are both [`DenseMatrix`] values of the manifold's ambient shape,
//! and are told apart only by how they are used and by runtime checks.
//!
//! # Mathematical Background
//!
//! - **Metric**: inner product `g_x(u, v)` on the tangent space at `x`
//! - **Projection**: orthogonal projection `P_x: R^{n x p} -> T_x M`
//! - **Retraction**: first-order substitute `R_x: T_x M -> M` for the
//!   exponential map, with `R_x(0) = x`
//! - **Vector transport**: moves a tangent vector at `x` to the tangent
//!   space at `y = R_x(u)`

use std::fmt::Debug;

use crate::error::{ManifoldError, Result};
use crate::matrix::DenseMatrix;

/// A point on a manifold.
pub type Point = DenseMatrix;

/// A tangent vector (or an ambient vector to be projected).
pub type TangentVector = DenseMatrix;

/// Trait for Riemannian matrix manifolds.
///
/// The trait is object safe: composite manifolds hold `&dyn Manifold`
/// references to their components. Implementations are immutable after
/// construction, so a manifold can be shared read-only across threads.
///
/// Every geometry operation validates operand shapes against
/// [`ambient_shape`](Manifold::ambient_shape) before doing any work.
pub trait Manifold: Debug + Send + Sync {
    /// Returns a human-readable name for the manifold.
    fn name(&self) -> &str;

    /// Zero tangent vector of the ambient shape.
    ///
    /// Its shape and complex flag drive operand validation and seed result
    /// containers in composite manifolds.
    fn zero_vector(&self) -> &TangentVector;

    /// Ambient `(rows, cols)` of points and tangent vectors.
    fn ambient_shape(&self) -> (usize, usize) {
        self.zero_vector().shape()
    }

    /// Whether points and tangent vectors are complex-valued.
    fn is_complex(&self) -> bool {
        self.zero_vector().is_complex()
    }

    /// Riemannian inner product `g_x(u, v)`.
    fn metric(&self, x: &Point, u: &TangentVector, v: &TangentVector) -> Result<f64>;

    /// Orthogonal projection of the ambient vector `z` onto `T_x M`.
    fn projection(&self, x: &Point, z: &TangentVector) -> Result<TangentVector>;

    /// Moves from `x` along the tangent vector `u`, returning a manifold point.
    fn retraction(&self, x: &Point, u: &TangentVector) -> Result<Point>;

    /// Transports the tangent vector `v` at `x` into the tangent space at `y`,
    /// where `y` was reached from `x` along `u`.
    fn vector_transport(
        &self,
        x: &Point,
        u: &TangentVector,
        y: &Point,
        v: &TangentVector,
    ) -> Result<TangentVector>;

    /// Number of ambient degrees of freedom.
    fn dimension(&self) -> usize;

    /// Number of true degrees of freedom of the manifold.
    fn intrinsic_dimension(&self) -> usize;

    /// Samples a random point on the manifold.
    fn random_point(&self) -> Result<Point>;

    /// Samples a random tangent vector at `x` by projecting a Gaussian
    /// ambient vector.
    fn random_tangent(&self, x: &Point) -> Result<TangentVector> {
        let (rows, cols) = self.ambient_shape();
        let z = DenseMatrix::random_normal(rows, cols, self.is_complex(), &mut rand::thread_rng());
        self.projection(x, &z)
    }

    /// Norm of `u` induced by the metric at `x`.
    fn norm(&self, x: &Point, u: &TangentVector) -> Result<f64> {
        Ok(self.metric(x, u, u)?.max(0.0).sqrt())
    }

    /// Checks that `value` has the ambient shape, naming `operand` on failure.
    fn check_dimensions(&self, operand: &str, value: &DenseMatrix) -> Result<()> {
        let expected = self.ambient_shape();
        if value.shape() != expected {
            return Err(ManifoldError::shape_mismatch(
                format!("{operand} for {}", self.name()),
                expected,
                value.shape(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat manifold used to exercise the provided methods.
    #[derive(Debug)]
    struct Flat {
        zero: DenseMatrix,
    }

    impl Manifold for Flat {
        fn name(&self) -> &str {
            "Flat"
        }

        fn zero_vector(&self) -> &TangentVector {
            &self.zero
        }

        fn metric(&self, _x: &Point, u: &TangentVector, v: &TangentVector) -> Result<f64> {
            u.inner(v)
        }

        fn projection(&self, x: &Point, z: &TangentVector) -> Result<TangentVector> {
            self.check_dimensions("x", x)?;
            self.check_dimensions("etax", z)?;
            Ok(z.clone())
        }

        fn retraction(&self, x: &Point, u: &TangentVector) -> Result<Point> {
            x.try_add(u)
        }

        fn vector_transport(
            &self,
            _x: &Point,
            _u: &TangentVector,
            _y: &Point,
            v: &TangentVector,
        ) -> Result<TangentVector> {
            Ok(v.clone())
        }

        fn dimension(&self) -> usize {
            self.zero.len()
        }

        fn intrinsic_dimension(&self) -> usize {
            self.zero.len()
        }

        fn random_point(&self) -> Result<Point> {
            Ok(self.zero.clone())
        }
    }

    #[test]
    fn test_provided_methods() {
        let flat = Flat {
            zero: DenseMatrix::zeros(3, 2, false),
        };
        assert_eq!(flat.ambient_shape(), (3, 2));
        assert!(!flat.is_complex());

        let x = flat.random_point().unwrap();
        let u = flat.random_tangent(&x).unwrap();
        assert_eq!(u.shape(), (3, 2));
        assert!((flat.norm(&x, &u).unwrap() - u.norm()).abs() < 1e-12);
    }

    #[test]
    fn test_check_dimensions_names_operand() {
        let flat = Flat {
            zero: DenseMatrix::zeros(3, 2, false),
        };
        let bad = DenseMatrix::zeros(2, 2, false);
        match flat.check_dimensions("xix", &bad) {
            Err(ManifoldError::DimensionMismatch { context, expected, actual }) => {
                assert!(context.starts_with("xix"));
                assert_eq!(expected, "3x2");
                assert_eq!(actual, "2x2");
            }
            other => panic!("expected dimension mismatch, got {other:?}"),
        }
    }
}
