//! Concrete manifolds over real and complex dense matrices.
//!
//! This crate provides the atomic manifolds and the two composite
//! constructors that build structured parameter spaces from them:
//!
//! - [`Euclidean`]: flat space of `n x p` matrices
//! - [`Stiefel`]: `n x p` matrices with orthonormal columns, with selectable
//!   metric, retraction and vector transport
//! - [`ProductManifold`]: heterogeneous product of repeated base manifolds
//! - [`StackedManifold`]: `k` copies of a single base manifold
//!
//! Composites borrow their bases, so the bases must outlive them.

pub mod euclidean;
pub mod product;
pub mod stacked;
pub mod stiefel;

pub use euclidean::Euclidean;
pub use product::ProductManifold;
pub use stacked::StackedManifold;
pub use stiefel::{
    MetricType, RetractionType, Stiefel, StiefelOptions, StiefelOptionsBuilder,
    VectorTransportType,
};
