//! Mode selection and tolerances for the Stiefel manifold.

use std::fmt;
use std::str::FromStr;

use riemgeom_core::{
    error::{ManifoldError, Result},
    types::constants::ORTHOGONALITY_TOLERANCE,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Riemannian metric on the Stiefel manifold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MetricType {
    /// Metric inherited from the ambient space: `Re <Z1, Z2>`.
    Euclidean,
    /// `Re <Z1, Z2> - 1/2 Re <Z1 X^H, Z2 X^H>`.
    #[default]
    Canonical,
}

/// Retraction used to map tangent vectors back onto the manifold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RetractionType {
    /// Q factor of `X + U`, with column phases fixed by the diagonal of R.
    #[default]
    Qr,
    /// Geodesic of the canonical metric via a `2p x 2p` matrix exponential.
    Exponential,
    /// Cayley transform of the skew-Hermitian `W = X U'^H - U' X^H`, with
    /// `U' = (I - 1/2 X X^H) U`.
    ///
    /// Sign and tangent correction differ from the textbook
    /// `W = U X^H - X U^H`, whose velocity at zero is `-U - X X^H U`;
    /// this form has velocity `U`.
    Cayley,
    /// Orthogonal polar factor of `X + U`.
    Polar,
}

/// Vector transport between tangent spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VectorTransportType {
    /// Orthogonal projection onto the tangent space at the target point.
    #[default]
    Projection,
    /// Parallel translation.
    ///
    /// Currently computed as [`Projection`](Self::Projection); true parallel
    /// translation along the geodesic is not implemented.
    ParallelTranslation,
    /// Cayley operator built from the base point and the step direction.
    Cayley,
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Euclidean => "euclidean",
            Self::Canonical => "canonical",
        })
    }
}

impl fmt::Display for RetractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Qr => "qr",
            Self::Exponential => "exponential",
            Self::Cayley => "cayley",
            Self::Polar => "polar",
        })
    }
}

impl fmt::Display for VectorTransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Projection => "projection",
            Self::ParallelTranslation => "parallel_translation",
            Self::Cayley => "cayley",
        })
    }
}

impl FromStr for MetricType {
    type Err = ManifoldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Self::Euclidean),
            "canonical" => Ok(Self::Canonical),
            _ => Err(ManifoldError::unsupported_mode("metric", s)),
        }
    }
}

impl FromStr for RetractionType {
    type Err = ManifoldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qr" => Ok(Self::Qr),
            "exp" | "exponential" => Ok(Self::Exponential),
            "cayley" => Ok(Self::Cayley),
            "polar" => Ok(Self::Polar),
            _ => Err(ManifoldError::unsupported_mode("retraction", s)),
        }
    }
}

impl FromStr for VectorTransportType {
    type Err = ManifoldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "projection" => Ok(Self::Projection),
            "parallel" | "parallel_translation" => Ok(Self::ParallelTranslation),
            "cayley" => Ok(Self::Cayley),
            _ => Err(ManifoldError::unsupported_mode("vector transport", s)),
        }
    }
}

/// Configuration of a [`Stiefel`](super::Stiefel) manifold.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StiefelOptions {
    /// Riemannian metric.
    pub metric: MetricType,
    /// Retraction.
    pub retraction: RetractionType,
    /// Vector transport.
    pub vector_transport: VectorTransportType,
    /// Frobenius tolerance for `||X^H X - I||` on base points.
    pub orthogonality_tolerance: f64,
}

impl Default for StiefelOptions {
    fn default() -> Self {
        Self {
            metric: MetricType::default(),
            retraction: RetractionType::default(),
            vector_transport: VectorTransportType::default(),
            orthogonality_tolerance: ORTHOGONALITY_TOLERANCE,
        }
    }
}

impl StiefelOptions {
    /// Sets the metric.
    pub fn with_metric(mut self, metric: MetricType) -> Self {
        self.metric = metric;
        self
    }

    /// Sets the retraction.
    pub fn with_retraction(mut self, retraction: RetractionType) -> Self {
        self.retraction = retraction;
        self
    }

    /// Sets the vector transport.
    pub fn with_vector_transport(mut self, vector_transport: VectorTransportType) -> Self {
        self.vector_transport = vector_transport;
        self
    }

    /// Sets the orthogonality tolerance.
    pub fn with_orthogonality_tolerance(mut self, tolerance: f64) -> Self {
        self.orthogonality_tolerance = tolerance;
        self
    }

    /// Checks that the tolerance is finite and positive.
    pub fn validate(&self) -> Result<()> {
        if !self.orthogonality_tolerance.is_finite() || self.orthogonality_tolerance <= 0.0 {
            return Err(ManifoldError::invalid_parameter(format!(
                "orthogonality tolerance must be finite and positive, got {}",
                self.orthogonality_tolerance
            )));
        }
        Ok(())
    }
}

/// Builder for [`StiefelOptions`].
#[derive(Debug, Clone, Default)]
pub struct StiefelOptionsBuilder {
    options: StiefelOptions,
}

impl StiefelOptionsBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the metric.
    pub fn metric(mut self, metric: MetricType) -> Self {
        self.options.metric = metric;
        self
    }

    /// Select the retraction.
    pub fn retraction(mut self, retraction: RetractionType) -> Self {
        self.options.retraction = retraction;
        self
    }

    /// Select the vector transport.
    pub fn vector_transport(mut self, vector_transport: VectorTransportType) -> Self {
        self.options.vector_transport = vector_transport;
        self
    }

    /// Set the orthogonality tolerance.
    pub fn orthogonality_tolerance(mut self, tolerance: f64) -> Self {
        self.options.orthogonality_tolerance = tolerance;
        self
    }

    /// Build the options.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if the tolerance is not finite and positive.
    pub fn build(self) -> Result<StiefelOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}
