//! Core traits and types for manifold geometry.
//!
//! This crate provides the value type and the abstractions every manifold
//! implementation builds on.
//!
//! # Key Concepts
//!
//! - **DenseMatrix**: real or complex dense matrix, used for both points
//!   and tangent vectors
//! - **Manifold**: metric, projection, retraction and vector transport on
//!   an embedded matrix manifold
//! - **Problem**: objective and gradient defined on a manifold
//!
//! # Modules
//!
//! - [`error`]: Error types for manifold operations
//! - [`matrix`]: Tagged real/complex matrix value type
//! - [`manifold`]: Core manifold trait and associated types
//! - [`problem`]: Optimization problem interface
//! - [`types`]: Type aliases and numerical constants

pub mod error;
pub mod manifold;
pub mod matrix;
pub mod problem;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{ManifoldError, Result};
pub use manifold::{Manifold, Point, TangentVector};
pub use matrix::DenseMatrix;
pub use problem::Problem;
pub use types::Complex64;

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use riemgeom_core::prelude::*;
///
/// let x = DenseMatrix::identity(2, false);
/// assert_eq!(x.shape(), (2, 2));
/// ```
pub mod prelude {
    pub use crate::error::{ManifoldError, Result};
    pub use crate::manifold::{Manifold, Point, TangentVector};
    pub use crate::matrix::DenseMatrix;
    pub use crate::problem::Problem;
    pub use crate::types::{constants, Complex64};
}
