//! # Product Manifold M₁^k₁ × M₂^k₂ × ... × Mₙ^kₙ
//!
//! Combines borrowed base manifolds, each repeated a given number of times,
//! into a single manifold. All bases share the ambient column count; a
//! combined value is the vertical concatenation of one row block per copy,
//! in type-major order:
//!
//! ```text
//! [ x(M₁, copy 0) ]
//! [ x(M₁, copy 1) ]
//! [      ...      ]
//! [ x(M₂, copy 0) ]
//! [      ...      ]
//! ```
//!
//! ## Riemannian Metric
//! The product metric is the sum of component metrics:
//! ```text
//! g_x(u, v) = Σ_slots g_i(u_slot, v_slot)
//! ```
//!
//! ## Retractions and Transports
//! Applied block by block with each slot's owning manifold.
//!
//! ## Example Usage
//!
//! ```rust
//! use riemgeom_core::manifold::Manifold;
//! use riemgeom_manifolds::{Euclidean, ProductManifold, Stiefel};
//!
//! let euclidean = Euclidean::new(2, 2)?;
//! let stiefel = Stiefel::new(3, 2)?;
//! let product = ProductManifold::new(&[&euclidean, &stiefel], &[1, 2])?;
//!
//! assert_eq!(product.ambient_shape(), (8, 2));
//! assert_eq!(product.dimension(), 16);
//! # Ok::<(), riemgeom_core::error::ManifoldError>(())
//! ```

use std::ops::Range;

use riemgeom_core::{
    error::{ManifoldError, Result},
    manifold::{Manifold, Point, TangentVector},
    matrix::DenseMatrix,
};
use tracing::{debug, trace};

/// Cartesian product of repeated, borrowed base manifolds.
///
/// # Invariants
///
/// - At least one type, every power at least 1
/// - Every base has the same ambient column count
/// - The combined value is complex if any base is complex
#[derive(Debug)]
pub struct ProductManifold<'a> {
    /// Base manifolds with their repetition counts
    types: Vec<(&'a dyn Manifold, usize)>,
    /// Prefix sums of the powers; `slot_bounds[t]..slot_bounds[t + 1]` are
    /// the slots owned by type `t`
    slot_bounds: Vec<usize>,
    /// First ambient row of each type's run of copies
    type_row_starts: Vec<usize>,
    name: String,
    zero: DenseMatrix,
    dimension: usize,
    intrinsic_dimension: usize,
}

impl<'a> ProductManifold<'a> {
    /// Creates a product from parallel lists of bases and powers.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the lists are empty or differ in
    /// length, a power is 0, or the bases disagree on the column count.
    pub fn new(manifolds: &[&'a dyn Manifold], powers: &[usize]) -> Result<Self> {
        if manifolds.len() != powers.len() {
            return Err(ManifoldError::invalid_parameter(format!(
                "product manifold got {} manifolds but {} powers",
                manifolds.len(),
                powers.len()
            )));
        }
        Self::from_pairs(manifolds.iter().copied().zip(powers.iter().copied()).collect())
    }

    /// Creates a product from `(base, power)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the list is empty, a power is 0, or the
    /// bases disagree on the column count.
    pub fn from_pairs(types: Vec<(&'a dyn Manifold, usize)>) -> Result<Self> {
        let (first, _) = types.first().ok_or_else(|| {
            ManifoldError::invalid_parameter("product manifold requires at least one manifold")
        })?;
        let cols = first.ambient_shape().1;

        let mut slot_bounds = Vec::with_capacity(types.len() + 1);
        let mut type_row_starts = Vec::with_capacity(types.len() + 1);
        let (mut slots, mut rows) = (0, 0);
        let (mut dimension, mut intrinsic_dimension) = (0, 0);
        let mut complex = false;

        for (index, &(manifold, power)) in types.iter().enumerate() {
            if power == 0 {
                return Err(ManifoldError::invalid_parameter(format!(
                    "power of {} (type {index}) must be at least 1",
                    manifold.name()
                )));
            }
            let (type_rows, type_cols) = manifold.ambient_shape();
            if type_cols != cols {
                return Err(ManifoldError::invalid_parameter(format!(
                    "{} has {type_cols} columns but the product requires {cols}",
                    manifold.name()
                )));
            }

            slot_bounds.push(slots);
            type_row_starts.push(rows);
            slots += power;
            rows += type_rows * power;
            dimension += manifold.dimension() * power;
            intrinsic_dimension += manifold.intrinsic_dimension() * power;
            complex |= manifold.is_complex();
        }
        slot_bounds.push(slots);
        type_row_starts.push(rows);

        let name = format!(
            "ProductManifold({})",
            types
                .iter()
                .map(|(m, k)| if *k == 1 {
                    m.name().to_string()
                } else {
                    format!("{}^{k}", m.name())
                })
                .collect::<Vec<_>>()
                .join(" × ")
        );
        debug!(name = %name, rows, cols, slots, complex, "constructed product manifold");

        Ok(Self {
            types,
            slot_bounds,
            type_row_starts,
            name,
            zero: DenseMatrix::zeros(rows, cols, complex),
            dimension,
            intrinsic_dimension,
        })
    }

    /// Number of distinct base manifolds.
    pub fn num_types(&self) -> usize {
        self.types.len()
    }

    /// Total number of copy slots, the sum of all powers.
    pub fn num_slots(&self) -> usize {
        self.slot_bounds[self.types.len()]
    }

    /// Base manifold and power of type `index`.
    pub fn component(&self, index: usize) -> Option<(&'a dyn Manifold, usize)> {
        self.types.get(index).copied()
    }

    /// Index of the type that owns `slot`.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `slot` is out of range.
    pub fn owning_type(&self, slot: usize) -> Result<usize> {
        if slot >= self.num_slots() {
            return Err(ManifoldError::invalid_parameter(format!(
                "slot {slot} is out of range for {} slots",
                self.num_slots()
            )));
        }
        Ok(self.slot_bounds.partition_point(|&bound| bound <= slot) - 1)
    }

    /// Ambient rows occupied by `slot`.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `slot` is out of range.
    pub fn slot_row_range(&self, slot: usize) -> Result<Range<usize>> {
        let t = self.owning_type(slot)?;
        let rows = self.types[t].0.ambient_shape().0;
        let start = self.type_row_starts[t] + (slot - self.slot_bounds[t]) * rows;
        Ok(start..start + rows)
    }

    /// Splits a combined value into one block per slot.
    pub fn split(&self, value: &DenseMatrix) -> Result<Vec<DenseMatrix>> {
        self.check_dimensions("x", value)?;
        (0..self.num_slots())
            .map(|slot| {
                let rows = self.slot_row_range(slot)?;
                value.row_block(rows.start, rows.len())
            })
            .collect()
    }

    /// Joins one block per slot into a combined value.
    pub fn combine(&self, blocks: &[DenseMatrix]) -> Result<DenseMatrix> {
        if blocks.len() != self.num_slots() {
            return Err(ManifoldError::dimension_mismatch(
                "product blocks",
                self.num_slots(),
                blocks.len(),
            ));
        }
        self.map_slots(|slot, manifold, _| {
            let part = &blocks[slot];
            manifold.check_dimensions("block", part)?;
            Ok(part.clone())
        })
    }

    /// Iterates `(slot, base, rows)` over every copy slot.
    fn slots(&self) -> impl Iterator<Item = (usize, &'a dyn Manifold, Range<usize>)> + '_ {
        self.types.iter().enumerate().flat_map(move |(t, &(manifold, power))| {
            let rows = manifold.ambient_shape().0;
            let type_start = self.type_row_starts[t];
            (0..power).map(move |local| {
                let start = type_start + local * rows;
                (self.slot_bounds[t] + local, manifold, start..start + rows)
            })
        })
    }

    fn map_slots<F>(&self, mut f: F) -> Result<DenseMatrix>
    where
        F: FnMut(usize, &dyn Manifold, &Range<usize>) -> Result<DenseMatrix>,
    {
        let mut result = self.zero.clone();
        for (slot, manifold, rows) in self.slots() {
            let block = f(slot, manifold, &rows)?;
            result.set_row_block(rows.start, &block)?;
        }
        Ok(result)
    }
}

fn block(value: &DenseMatrix, rows: &Range<usize>) -> Result<DenseMatrix> {
    value.row_block(rows.start, rows.len())
}

impl Manifold for ProductManifold<'_> {
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

        self.slots().try_fold(0.0, |sum, (_, manifold, rows)| {
            Ok(sum + manifold.metric(&block(x, &rows)?, &block(u, &rows)?, &block(v, &rows)?)?)
        })
    }

    fn projection(&self, x: &Point, z: &TangentVector) -> Result<TangentVector> {
        self.check_dimensions("x", x)?;
        self.check_dimensions("etax", z)?;

        self.map_slots(|_, manifold, rows| manifold.projection(&block(x, rows)?, &block(z, rows)?))
    }

    fn retraction(&self, x: &Point, u: &TangentVector) -> Result<Point> {
        self.check_dimensions("x", x)?;
        self.check_dimensions("etax", u)?;

        trace!(slots = self.num_slots(), "product retraction");
        self.map_slots(|_, manifold, rows| manifold.retraction(&block(x, rows)?, &block(u, rows)?))
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

        trace!(slots = self.num_slots(), "product vector transport");
        self.map_slots(|_, manifold, rows| {
            manifold.vector_transport(
                &block(x, rows)?,
                &block(u, rows)?,
                &block(y, rows)?,
                &block(v, rows)?,
            )
        })
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn intrinsic_dimension(&self) -> usize {
        self.intrinsic_dimension
    }

    fn random_point(&self) -> Result<Point> {
        self.map_slots(|_, manifold, _| manifold.random_point())
    }
}
