//! Optimization problem interface.
//!
//! A [`Problem`] couples an objective function with the manifold it is
//! defined on. Solvers only ever talk to a problem through this trait; the
//! Euclidean gradient it reports is turned into a Riemannian one by the
//! manifold's projection.

use std::fmt::Debug;

use crate::error::Result;
use crate::manifold::{Manifold, Point, TangentVector};

/// Trait for objective functions defined on a manifold.
pub trait Problem: Debug {
    /// The manifold the objective is defined on.
    fn manifold(&self) -> &dyn Manifold;

    /// Evaluates the objective at `x`.
    fn objective(&self, x: &Point) -> Result<f64>;

    /// Euclidean gradient of the objective at `x`, in the ambient space.
    fn gradient(&self, x: &Point) -> Result<TangentVector>;

    /// Evaluates the objective and its Euclidean gradient together.
    ///
    /// Override when both share intermediate results.
    fn objective_and_gradient(&self, x: &Point) -> Result<(f64, TangentVector)> {
        Ok((self.objective(x)?, self.gradient(x)?))
    }

    /// Riemannian gradient at `x`: the Euclidean gradient projected onto
    /// the tangent space.
    fn riemannian_gradient(&self, x: &Point) -> Result<TangentVector> {
        let egrad = self.gradient(x)?;
        self.manifold().projection(x, &egrad)
    }

    /// Applies a preconditioner to the tangent vector `eta` at `x`.
    ///
    /// The default is the identity.
    fn precondition(&self, _x: &Point, eta: &TangentVector) -> Result<TangentVector> {
        Ok(eta.clone())
    }
}
