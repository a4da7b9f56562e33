//! Riemannian geometry on real and complex matrix manifolds.
//!
//! Facade over [`riemgeom_core`] (value type, traits, errors) and
//! [`riemgeom_manifolds`] (Euclidean, Stiefel, product and stacked
//! manifolds).
//!
//! # Example
//!
//! ```rust
//! use riemgeom::prelude::*;
//!
//! let stiefel = Stiefel::new(5, 2)?;
//! let x = stiefel.random_point()?;
//! let u = stiefel.random_tangent(&x)?;
//! let y = stiefel.retraction(&x, &(u * 0.1))?;
//! assert!(y.orthonormality_residual() < 1e-8);
//! # Ok::<(), ManifoldError>(())
//! ```

pub use nalgebra;
pub use riemgeom_core as core;
pub use riemgeom_manifolds as manifolds;

pub use riemgeom_core::{DenseMatrix, Manifold, ManifoldError, Problem, Result};
pub use riemgeom_manifolds::{
    Euclidean, MetricType, ProductManifold, RetractionType, StackedManifold, Stiefel,
    StiefelOptions, StiefelOptionsBuilder, VectorTransportType,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use riemgeom_core::prelude::*;
    pub use riemgeom_manifolds::{
        Euclidean, MetricType, ProductManifold, RetractionType, StackedManifold, Stiefel,
        StiefelOptions, StiefelOptionsBuilder, VectorTransportType,
    };
}
