//! Euclidean space R^{n x p} (or C^{n x p}).
//!
//! The flat manifold: every ambient matrix is a point, the tangent space at
//! any point is the whole ambient space, and all geometry is trivial.

use rand::Rng;
use riemgeom_core::{
    error::{ManifoldError, Result},
    manifold::{Manifold, Point, TangentVector},
    matrix::DenseMatrix,
};
use tracing::debug;

/// Euclidean space of `n x p` real or complex matrices.
///
/// # Mathematical Properties
///
/// - **Dimension**: np
/// - **Tangent space**: the ambient space itself
/// - **Riemannian metric**: `Re <U, V>_F`
/// - **Retraction**: `R_x(u) = x + u`
/// - **Vector transport**: identity
#[derive(Debug, Clone)]
pub struct Euclidean {
    n: usize,
    p: usize,
    name: String,
    zero: DenseMatrix,
}

impl Euclidean {
    /// Creates the real Euclidean space R^{n x p}.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if either dimension is 0.
    pub fn new(n: usize, p: usize) -> Result<Self> {
        Self::with_field(n, p, false)
    }

    /// Creates the complex Euclidean space C^{n x p}.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if either dimension is 0.
    pub fn new_complex(n: usize, p: usize) -> Result<Self> {
        Self::with_field(n, p, true)
    }

    fn with_field(n: usize, p: usize, complex: bool) -> Result<Self> {
        if n == 0 || p == 0 {
            return Err(ManifoldError::invalid_parameter(format!(
                "Euclidean manifold requires n > 0 and p > 0, got n = {n}, p = {p}"
            )));
        }
        debug!(n, p, complex, "constructed Euclidean manifold");
        Ok(Self {
            n,
            p,
            name: format!("Euclidean({n},{p})"),
            zero: DenseMatrix::zeros(n, p, complex),
        })
    }

    /// Number of rows (n).
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of columns (p).
    pub fn p(&self) -> usize {
        self.p
    }

    /// Samples a Gaussian point using the given RNG.
    pub fn random_point_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        DenseMatrix::random_normal(self.n, self.p, self.is_complex(), rng)
    }
}

impl Manifold for Euclidean {
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
        u.inner(v)
    }

    fn projection(&self, x: &Point, z: &TangentVector) -> Result<TangentVector> {
        self.check_dimensions("x", x)?;
        self.check_dimensions("etax", z)?;
        Ok(z.clone())
    }

    fn retraction(&self, x: &Point, u: &TangentVector) -> Result<Point> {
        self.check_dimensions("x", x)?;
        self.check_dimensions("etax", u)?;
        x.try_add(u)
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
        Ok(v.clone())
    }

    fn dimension(&self) -> usize {
        self.n * self.p
    }

    fn intrinsic_dimension(&self) -> usize {
        self.n * self.p
    }

    fn random_point(&self) -> Result<Point> {
        Ok(self.random_point_with(&mut rand::thread_rng()))
    }
}
