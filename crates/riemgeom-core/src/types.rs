//! Type aliases and numerical constants.

pub use nalgebra::DMatrix;

/// Double-precision complex scalar.
pub type Complex64 = nalgebra::Complex<f64>;

/// Numerical constants shared across the workspace.
pub mod constants {
    /// Absolute tolerance used by matrix equality.
    pub const EQUALITY_TOLERANCE: f64 = 1e-8;

    /// Default Frobenius tolerance for the `X^H X = I` check.
    pub const ORTHOGONALITY_TOLERANCE: f64 = 1e-10;
}
