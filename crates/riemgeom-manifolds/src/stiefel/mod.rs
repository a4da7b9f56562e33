//! Stiefel manifold St(n,p) = {X in F^{n x p} : X^H X = I_p}, F = R or C.
//!
//! The Stiefel manifold represents the space of n x p matrices with
//! orthonormal columns. It naturally appears in:
//! - Principal Component Analysis (PCA)
//! - Independent Component Analysis (ICA)
//! - Orthogonality-constrained weights
//! - Subspace tracking and beamforming (complex case)

mod geometry;
mod options;

pub use options::{
    MetricType, RetractionType, StiefelOptions, StiefelOptionsBuilder, VectorTransportType,
};

use rand::Rng;
use riemgeom_core::{
    error::{ManifoldError, Result},
    manifold::{Manifold, Point, TangentVector},
    matrix::DenseMatrix,
};
use tracing::{debug, trace, warn};

/// The Stiefel manifold St(n,p) of n x p matrices with orthonormal columns.
///
/// The tangent space at X consists of all n x p matrices V such that
/// X^H V + V^H X = 0.
///
/// # Mathematical Properties
///
/// - **Dimension**: np - p(p+1)/2 (intrinsic), np (ambient)
/// - **Tangent space**: T_X St(n,p) = {V : X^H V + V^H X = 0}
/// - **Metrics**: Euclidean or canonical, see [`MetricType`]
/// - **Retractions**: QR, polar, Cayley and exponential, see [`RetractionType`]
///
/// Projection, retraction and vector transport reject base points whose
/// orthogonality residual `||X^H X - I||_F` exceeds the configured tolerance.
/// Computation happens in complex arithmetic when the manifold or any
/// operand is complex, and in real arithmetic otherwise.
#[derive(Debug, Clone)]
pub struct Stiefel {
    n: usize,
    p: usize,
    options: StiefelOptions,
    name: String,
    zero: DenseMatrix,
}

impl Stiefel {
    /// Creates the real Stiefel manifold St(n,p) with default options.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if p > n or either dimension is 0.
    pub fn new(n: usize, p: usize) -> Result<Self> {
        Self::with_options(n, p, false, StiefelOptions::default())
    }

    /// Creates the complex Stiefel manifold with default options.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if p > n or either dimension is 0.
    pub fn new_complex(n: usize, p: usize) -> Result<Self> {
        Self::with_options(n, p, true, StiefelOptions::default())
    }

    /// Creates a Stiefel manifold with explicit options.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if p > n, either dimension is 0, or the
    /// options carry an invalid tolerance.
    pub fn with_options(n: usize, p: usize, complex: bool, options: StiefelOptions) -> Result<Self> {
        if n == 0 || p == 0 {
            return Err(ManifoldError::invalid_parameter(format!(
                "Stiefel manifold requires n > 0 and p > 0, got n = {n}, p = {p}"
            )));
        }
        if p > n {
            return Err(ManifoldError::invalid_parameter(format!(
                "Stiefel manifold requires p <= n, got n = {n}, p = {p}"
            )));
        }
        options.validate()?;

        debug!(
            n,
            p,
            complex,
            metric = %options.metric,
            retraction = %options.retraction,
            vector_transport = %options.vector_transport,
            "constructed Stiefel manifold"
        );
        Ok(Self {
            n,
            p,
            options,
            name: format!("Stiefel({n},{p})"),
            zero: DenseMatrix::zeros(n, p, complex),
        })
    }

    /// Returns the number of rows (n).
    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns the number of columns (p).
    pub fn p(&self) -> usize {
        self.p
    }

    /// Returns the configured modes and tolerance.
    pub fn options(&self) -> &StiefelOptions {
        &self.options
    }

    /// Checks `||X^H X - I||_F <= tolerance` for the operand `x`.
    ///
    /// # Errors
    /// Returns `ConstraintViolation` carrying the measured residual.
    pub fn check_orthogonality(&self, operand: &str, x: &Point) -> Result<()> {
        let residual = x.orthonormality_residual();
        let tolerance = self.options.orthogonality_tolerance;
        if residual.is_nan() || residual > tolerance {
            warn!(operand, residual, tolerance, "point violates the Stiefel constraint");
            return Err(ManifoldError::constraint_violation(operand, residual, tolerance));
        }
        Ok(())
    }

    /// Samples a uniformly distributed point using the given RNG.
    pub fn random_point_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        match DenseMatrix::random_normal(self.n, self.p, self.is_complex(), rng) {
            DenseMatrix::Real(m) => DenseMatrix::from_real(geometry::orthonormalize(m)),
            DenseMatrix::Complex(m) => DenseMatrix::from_complex(geometry::orthonormalize(m)),
        }
    }

    fn use_complex(&self, operands: &[&DenseMatrix]) -> bool {
        self.is_complex() || operands.iter().any(|m| m.is_complex())
    }
}

impl Manifold for Stiefel {
    fn name(&self) -> &str {
        &self.name
    }

    fn zero_vector(&self) -> &TangentVector {
        &self.zero
    }

    fn metric(&self, x: &Point, u: &TangentVector, v: &TangentVector) -> Result<f64> {
        self.check_dimensions("x", x)?;
        self.check_dimensions("etax", u)?;
        self.check_dimensions("xix", v)?;

        let metric = self.options.metric;
        if self.use_complex(&[x, u, v]) {
            Ok(geometry::metric(metric, &*x.as_complex(), &*u.as_complex(), &*v.as_complex()))
        } else {
            Ok(geometry::metric(metric, x.as_real()?, u.as_real()?, v.as_real()?))
        }
    }

    fn projection(&self, x: &Point, z: &TangentVector) -> Result<TangentVector> {
        self.check_dimensions("x", x)?;
        self.check_dimensions("etax", z)?;
        self.check_orthogonality("x", x)?;

        if self.use_complex(&[x, z]) {
            Ok(DenseMatrix::from_complex(geometry::projection(
                &*x.as_complex(),
                &*z.as_complex(),
            )))
        } else {
            Ok(DenseMatrix::from_real(geometry::projection(x.as_real()?, z.as_real()?)))
        }
    }

    fn retraction(&self, x: &Point, u: &TangentVector) -> Result<Point> {
        self.check_dimensions("x", x)?;
        self.check_dimensions("etax", u)?;
        self.check_orthogonality("x", x)?;

        let kind = self.options.retraction;
        trace!(retraction = %kind, "Stiefel retraction");
        if self.use_complex(&[x, u]) {
            geometry::retraction(kind, &*x.as_complex(), &*u.as_complex()).map(DenseMatrix::from_complex)
        } else {
            geometry::retraction(kind, x.as_real()?, u.as_real()?).map(DenseMatrix::from_real)
        }
    }

    fn vector_transport(
        &self,
        x: &Point,
        u: &TangentVector,
        y: &Point,
        v: &TangentVector,
    ) -> Result<TangentVector> {
        self.check_dimensions("x", x)?;
        self.check_dimensions("etax", u)?;
        self.check_dimensions("y", y)?;
        self.check_dimensions("xix", v)?;
        self.check_orthogonality("x", x)?;
        self.check_orthogonality("y", y)?;

        let kind = self.options.vector_transport;
        trace!(vector_transport = %kind, "Stiefel vector transport");
        match kind {
            VectorTransportType::Projection | VectorTransportType::ParallelTranslation => {
                self.projection(y, v)
            }
            VectorTransportType::Cayley => {
                if self.use_complex(&[x, u, v]) {
                    geometry::cayley_apply(&*x.as_complex(), &*u.as_complex(), &*v.as_complex())
                        .map(DenseMatrix::from_complex)
                } else {
                    geometry::cayley_apply(x.as_real()?, u.as_real()?, v.as_real()?)
                        .map(DenseMatrix::from_real)
                }
            }
        }
    }

    fn dimension(&self) -> usize {
        self.n * self.p
    }

    fn intrinsic_dimension(&self) -> usize {
        self.n * self.p - self.p * (self.p + 1) / 2
    }

    fn random_point(&self) -> Result<Point> {
        Ok(self.random_point_with(&mut rand::thread_rng()))
    }
}
