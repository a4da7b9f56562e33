//! Stacked manifold M^k: k copies of one base manifold.
//!
//! The single-type special case of [`ProductManifold`](crate::ProductManifold).
//! Copy `i` occupies rows `i * r .. (i + 1) * r` where `r` is the base
//! manifold's row count, so block lookup needs no table.

use std::ops::Range;

use riemgeom_core::{
    error::{ManifoldError, Result},
    manifold::{Manifold, Point, TangentVector},
    matrix::DenseMatrix,
};
use tracing::{debug, trace};

/// `copies` vertically stacked copies of a borrowed base manifold.
#[derive(Debug)]
pub struct StackedManifold<'a> {
    base: &'a dyn Manifold,
    copies: usize,
    name: String,
    zero: DenseMatrix,
}

impl<'a> StackedManifold<'a> {
    /// Creates `copies` copies of `base`.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `copies` is 0.
    pub fn new(base: &'a dyn Manifold, copies: usize) -> Result<Self> {
        if copies == 0 {
            return Err(ManifoldError::invalid_parameter(format!(
                "stacked manifold of {} requires at least one copy",
                base.name()
            )));
        }
        let (rows, cols) = base.ambient_shape();
        let name = format!("StackedManifold({} x {copies})", base.name());
        debug!(name = %name, rows = rows * copies, cols, "constructed stacked manifold");

        Ok(Self {
            base,
            copies,
            name,
            zero: DenseMatrix::zeros(rows * copies, cols, base.is_complex()),
        })
    }

    /// The repeated base manifold.
    pub fn base(&self) -> &'a dyn Manifold {
        self.base
    }

    /// Number of copies.
    pub fn copies(&self) -> usize {
        self.copies
    }

    /// Rows occupied by copy `index`.
    pub fn block_rows(&self, index: usize) -> Range<usize> {
        let rows = self.base.ambient_shape().0;
        index * rows..(index + 1) * rows
    }

    fn block(&self, value: &DenseMatrix, index: usize) -> Result<DenseMatrix> {
        let rows = self.base.ambient_shape().0;
        value.row_block(index * rows, rows)
    }

    fn map_blocks<F>(&self, mut f: F) -> Result<DenseMatrix>
    where
        F: FnMut(usize) -> Result<DenseMatrix>,
    {
        let mut result = self.zero.clone();
        for index in 0..self.copies {
            let block = f(index)?;
            result.set_row_block(self.block_rows(index).start, &block)?;
        }
        Ok(result)
    }
}

impl Manifold for StackedManifold<'_> {
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

        (0..self.copies).try_fold(0.0, |sum, i| {
            Ok(sum + self.base.metric(&self.block(x, i)?, &self.block(u, i)?, &self.block(v, i)?)?)
        })
    }

    fn projection(&self, x: &Point, z: &TangentVector) -> Result<TangentVector> {
        self.check_dimensions("x", x)?;
        self.check_dimensions("etax", z)?;

        self.map_blocks(|i| self.base.projection(&self.block(x, i)?, &self.block(z, i)?))
    }

    fn retraction(&self, x: &Point, u: &TangentVector) -> Result<Point> {
        self.check_dimensions("x", x)?;
        self.check_dimensions("etax", u)?;

        trace!(copies = self.copies, "stacked retraction");
        self.map_blocks(|i| self.base.retraction(&self.block(x, i)?, &self.block(u, i)?))
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

        trace!(copies = self.copies, "stacked vector transport");
        self.map_blocks(|i| {
            self.base.vector_transport(
                &self.block(x, i)?,
                &self.block(u, i)?,
                &self.block(y, i)?,
                &self.block(v, i)?,
            )
        })
    }

    fn dimension(&self) -> usize {
        self.base.dimension() * self.copies
    }

    fn intrinsic_dimension(&self) -> usize {
        self.base.intrinsic_dimension() * self.copies
    }

    fn random_point(&self) -> Result<Point> {
        self.map_blocks(|_| self.base.random_point())
    }
}
