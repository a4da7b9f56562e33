//! Error types for manifold geometry operations.
//!
//! Every failure in the library is a validation failure that aborts the
//! current geometry call: wrong operand shapes, a base point that violates
//! the manifold constraint, an invalid construction parameter, or a linear
//! system that could not be solved. Nothing is retried internally.

use thiserror::Error;

/// Errors that can occur during manifold and matrix operations.
#[derive(Debug, Clone, Error)]
pub enum ManifoldError {
    /// Dimension mismatch between operands.
    ///
    /// `context` names the operator (`+`, `*`, ...) or the operand
    /// (`x`, `etax`, ...) that failed validation.
    #[error("Dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Operator or operand that failed
        context: String,
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// A point violates the manifold constraint beyond tolerance.
    #[error("{operand} is not on the manifold: residual {residual:e} exceeds tolerance {tolerance:e}")]
    ConstraintViolation {
        /// Name of the offending operand
        operand: String,
        /// Measured constraint residual
        residual: f64,
        /// Tolerance that was exceeded
        tolerance: f64,
    },

    /// Real/complex storage mismatch.
    ///
    /// Raised when a complex value is accessed as real, or when a sub-block
    /// assignment mixes real and complex storage.
    #[error("Complexity mismatch: {reason}")]
    ComplexityMismatch {
        /// Description of the mismatch
        reason: String,
    },

    /// Invalid construction parameter or composite configuration.
    #[error("Invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of why the parameter is invalid
        reason: String,
    },

    /// Unknown or unsupported mode selection.
    #[error("Unsupported {kind}: {value}")]
    UnsupportedMode {
        /// Kind of mode (metric, retraction, vector transport)
        kind: String,
        /// Offending value
        value: String,
    },

    /// Numerical failure inside a factorization or linear solve.
    #[error("Numerical failure: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },
}

impl ManifoldError {
    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<C, S1, S2>(context: C, expected: S1, actual: S2) -> Self
    where
        C: Into<String>,
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            context: context.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a DimensionMismatch error from two `(rows, cols)` shapes.
    pub fn shape_mismatch<C: Into<String>>(
        context: C,
        expected: (usize, usize),
        actual: (usize, usize),
    ) -> Self {
        Self::dimension_mismatch(
            context,
            format!("{}x{}", expected.0, expected.1),
            format!("{}x{}", actual.0, actual.1),
        )
    }

    /// Create a ConstraintViolation error.
    pub fn constraint_violation<S: Into<String>>(operand: S, residual: f64, tolerance: f64) -> Self {
        Self::ConstraintViolation {
            operand: operand.into(),
            residual,
            tolerance,
        }
    }

    /// Create a ComplexityMismatch error.
    pub fn complexity_mismatch<S: Into<String>>(reason: S) -> Self {
        Self::ComplexityMismatch {
            reason: reason.into(),
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter<S: Into<String>>(reason: S) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// Create an UnsupportedMode error.
    pub fn unsupported_mode<S1: Into<String>, S2: Into<String>>(kind: S1, value: S2) -> Self {
        Self::UnsupportedMode {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }
}

/// Result type alias for operations that can produce ManifoldError.
pub type Result<T> = std::result::Result<T, ManifoldError>;
