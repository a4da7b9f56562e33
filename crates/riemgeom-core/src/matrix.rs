//! Tagged real/complex dense matrix value.
//!
//! [`DenseMatrix`] is the value type every manifold operation consumes and
//! produces. A value is either real or complex and keeps its shape for its
//! whole lifetime. Real values are promoted to complex by any operation that
//! mixes in complex data (a complex operand or a complex scalar); complex
//! values are never demoted.
//!
//! Fallible arithmetic (shape-checked) is exposed through `try_*` methods,
//! while operations that cannot fail (negation, scalar multiplication) are
//! plain operator impls.

use std::borrow::Cow;
use std::fmt;
use std::ops::{Mul, MulAssign, Neg};

use approx::AbsDiffEq;
use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ManifoldError, Result};
use crate::types::{constants::EQUALITY_TOLERANCE, Complex64};

/// Dense two-dimensional matrix with real or complex entries.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DenseMatrix {
    /// Real-valued storage.
    Real(DMatrix<f64>),
    /// Complex-valued storage.
    Complex(DMatrix<Complex64>),
}

impl Default for DenseMatrix {
    fn default() -> Self {
        Self::Real(DMatrix::zeros(0, 0))
    }
}

impl DenseMatrix {
    /// Creates a zero matrix of the given shape.
    pub fn zeros(rows: usize, cols: usize, complex: bool) -> Self {
        if complex {
            Self::Complex(DMatrix::zeros(rows, cols))
        } else {
            Self::Real(DMatrix::zeros(rows, cols))
        }
    }

    /// Creates an `n x n` identity matrix.
    pub fn identity(n: usize, complex: bool) -> Self {
        if complex {
            Self::Complex(DMatrix::identity(n, n))
        } else {
            Self::Real(DMatrix::identity(n, n))
        }
    }

    /// Wraps real storage.
    pub fn from_real(matrix: DMatrix<f64>) -> Self {
        Self::Real(matrix)
    }

    /// Wraps complex storage.
    pub fn from_complex(matrix: DMatrix<Complex64>) -> Self {
        Self::Complex(matrix)
    }

    /// Builds a complex matrix from separate real and imaginary parts.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the two parts differ in shape.
    pub fn from_parts(re: &DMatrix<f64>, im: &DMatrix<f64>) -> Result<Self> {
        if re.shape() != im.shape() {
            return Err(ManifoldError::shape_mismatch(
                "imaginary part",
                re.shape(),
                im.shape(),
            ));
        }
        Ok(Self::Complex(re.zip_map(im, Complex64::new)))
    }

    /// Samples a matrix with independent standard normal entries.
    ///
    /// Complex entries get independent real and imaginary parts.
    pub fn random_normal<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        complex: bool,
        rng: &mut R,
    ) -> Self {
        if complex {
            Self::Complex(DMatrix::from_fn(rows, cols, |_, _| {
                let re: f64 = StandardNormal.sample(rng);
                let im: f64 = StandardNormal.sample(rng);
                Complex64::new(re, im)
            }))
        } else {
            Self::Real(DMatrix::from_fn(rows, cols, |_, _| {
                StandardNormal.sample(rng)
            }))
        }
    }

    /// Concatenates blocks vertically.
    ///
    /// The result is complex if any block is complex.
    pub fn vstack(blocks: &[Self]) -> Result<Self> {
        let first = blocks
            .first()
            .ok_or_else(|| ManifoldError::invalid_parameter("cannot stack an empty list of blocks"))?;
        let cols = first.ncols();
        let rows = blocks.iter().map(Self::nrows).sum();
        let complex = blocks.iter().any(Self::is_complex);

        let mut stacked = Self::zeros(rows, cols, complex);
        let mut row = 0;
        for block in blocks {
            stacked.set_row_block(row, block)?;
            row += block.nrows();
        }
        Ok(stacked)
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        match self {
            Self::Real(m) => m.nrows(),
            Self::Complex(m) => m.nrows(),
        }
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        match self {
            Self::Real(m) => m.ncols(),
            Self::Complex(m) => m.ncols(),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.nrows() * self.ncols()
    }

    /// Returns `true` if the matrix has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    /// Whether the storage is complex.
    pub fn is_complex(&self) -> bool {
        matches!(self, Self::Complex(_))
    }

    /// Real part as an owned matrix.
    pub fn re(&self) -> DMatrix<f64> {
        match self {
            Self::Real(m) => m.clone(),
            Self::Complex(m) => m.map(|z| z.re),
        }
    }

    /// Imaginary part as an owned matrix (zeros for real storage).
    pub fn im(&self) -> DMatrix<f64> {
        match self {
            Self::Real(m) => DMatrix::zeros(m.nrows(), m.ncols()),
            Self::Complex(m) => m.map(|z| z.im),
        }
    }

    /// Borrows the real storage.
    ///
    /// # Errors
    ///
    /// Returns `ComplexityMismatch` if the value is complex.
    pub fn as_real(&self) -> Result<&DMatrix<f64>> {
        match self {
            Self::Real(m) => Ok(m),
            Self::Complex(_) => Err(ManifoldError::complexity_mismatch(
                "cannot access a complex matrix as real",
            )),
        }
    }

    /// Mutably borrows the real storage.
    pub fn as_real_mut(&mut self) -> Result<&mut DMatrix<f64>> {
        match self {
            Self::Real(m) => Ok(m),
            Self::Complex(_) => Err(ManifoldError::complexity_mismatch(
                "cannot access a complex matrix as real",
            )),
        }
    }

    /// Complex view of the value, synthesizing a zero imaginary part when
    /// the storage is real.
    pub fn as_complex(&self) -> Cow<'_, DMatrix<Complex64>> {
        match self {
            Self::Real(m) => Cow::Owned(m.map(|v| Complex64::new(v, 0.0))),
            Self::Complex(m) => Cow::Borrowed(m),
        }
    }

    /// Owned complex copy of the value.
    pub fn to_complex(&self) -> DMatrix<Complex64> {
        self.as_complex().into_owned()
    }

    /// Promotes the value to complex storage.
    #[must_use]
    pub fn into_complex(self) -> Self {
        match self {
            Self::Real(m) => Self::Complex(m.map(|v| Complex64::new(v, 0.0))),
            complex @ Self::Complex(_) => complex,
        }
    }

    /// Conjugate transpose.
    #[must_use]
    pub fn adjoint(&self) -> Self {
        match self {
            Self::Real(m) => Self::Real(m.transpose()),
            Self::Complex(m) => Self::Complex(m.adjoint()),
        }
    }

    /// Plain transpose (no conjugation).
    #[must_use]
    pub fn transpose(&self) -> Self {
        match self {
            Self::Real(m) => Self::Real(m.transpose()),
            Self::Complex(m) => Self::Complex(m.transpose()),
        }
    }

    /// Frobenius norm.
    pub fn norm(&self) -> f64 {
        match self {
            Self::Real(m) => m.norm(),
            Self::Complex(m) => m.norm(),
        }
    }

    /// Real part of the Frobenius inner product `sum(conj(self) .* other)`.
    pub fn inner(&self, other: &Self) -> Result<f64> {
        self.check_same_shape(other, "inner product")?;
        Ok(match (self, other) {
            (Self::Real(a), Self::Real(b)) => a.dot(b),
            _ => {
                let a = self.as_complex();
                let b = other.as_complex();
                a.dotc(&*b).re
            }
        })
    }

    /// Frobenius norm of `X^H X - I`.
    pub fn orthonormality_residual(&self) -> f64 {
        let p = self.ncols();
        match self {
            Self::Real(m) => (m.transpose() * m - DMatrix::<f64>::identity(p, p)).norm(),
            Self::Complex(m) => (m.adjoint() * m - DMatrix::<Complex64>::identity(p, p)).norm(),
        }
    }

    fn check_same_shape(&self, other: &Self, context: &str) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(ManifoldError::shape_mismatch(
                context,
                self.shape(),
                other.shape(),
            ));
        }
        Ok(())
    }

    fn zip_with(
        &self,
        other: &Self,
        real: impl Fn(&DMatrix<f64>, &DMatrix<f64>) -> DMatrix<f64>,
        complex: impl Fn(&DMatrix<Complex64>, &DMatrix<Complex64>) -> DMatrix<Complex64>,
    ) -> Self {
        match (self, other) {
            (Self::Real(a), Self::Real(b)) => Self::Real(real(a, b)),
            _ => Self::Complex(complex(&*self.as_complex(), &*other.as_complex())),
        }
    }

    /// Elementwise sum.
    pub fn try_add(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other, "operator +")?;
        Ok(self.zip_with(other, |a, b| a + b, |a, b| a + b))
    }

    /// Elementwise difference.
    pub fn try_sub(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other, "operator -")?;
        Ok(self.zip_with(other, |a, b| a - b, |a, b| a - b))
    }

    /// Elementwise quotient.
    pub fn try_div(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other, "operator /")?;
        Ok(self.zip_with(other, |a, b| a.component_div(b), |a, b| a.component_div(b)))
    }

    /// Matrix product.
    pub fn try_mul(&self, other: &Self) -> Result<Self> {
        if self.ncols() != other.nrows() {
            return Err(ManifoldError::dimension_mismatch(
                "operator *",
                format!("{} rows in right operand", self.ncols()),
                format!("{} rows", other.nrows()),
            ));
        }
        Ok(self.zip_with(other, |a, b| a * b, |a, b| a * b))
    }

    /// In-place elementwise sum.
    pub fn try_add_assign(&mut self, other: &Self) -> Result<()> {
        *self = self.try_add(other)?;
        Ok(())
    }

    /// In-place elementwise difference.
    pub fn try_sub_assign(&mut self, other: &Self) -> Result<()> {
        *self = self.try_sub(other)?;
        Ok(())
    }

    fn check_block(
        &self,
        first_row: usize,
        first_col: usize,
        last_row: usize,
        last_col: usize,
    ) -> Result<(usize, usize)> {
        if first_row > last_row
            || first_col > last_col
            || last_row >= self.nrows()
            || last_col >= self.ncols()
        {
            return Err(ManifoldError::invalid_parameter(format!(
                "block ({first_row}, {first_col})..=({last_row}, {last_col}) is out of range for a {}x{} matrix",
                self.nrows(),
                self.ncols()
            )));
        }
        Ok((last_row - first_row + 1, last_col - first_col + 1))
    }

    /// Extracts the inclusive block `[first_row..=last_row, first_col..=last_col]`.
    pub fn submatrix(
        &self,
        first_row: usize,
        first_col: usize,
        last_row: usize,
        last_col: usize,
    ) -> Result<Self> {
        let shape = self.check_block(first_row, first_col, last_row, last_col)?;
        let start = (first_row, first_col);
        Ok(match self {
            Self::Real(m) => Self::Real(m.view(start, shape).into_owned()),
            Self::Complex(m) => Self::Complex(m.view(start, shape).into_owned()),
        })
    }

    /// Overwrites the inclusive block `[first_row..=last_row, first_col..=last_col]`.
    ///
    /// # Errors
    ///
    /// Returns `ComplexityMismatch` if `source` and `self` differ in their
    /// complex flag, and `DimensionMismatch` if the block shape differs
    /// from `source`.
    pub fn set_submatrix(
        &mut self,
        first_row: usize,
        first_col: usize,
        last_row: usize,
        last_col: usize,
        source: &Self,
    ) -> Result<()> {
        if self.is_complex() != source.is_complex() {
            return Err(ManifoldError::complexity_mismatch(
                "sub-block assignment requires matching real/complex storage",
            ));
        }
        let shape = self.check_block(first_row, first_col, last_row, last_col)?;
        if source.shape() != shape {
            return Err(ManifoldError::shape_mismatch(
                "sub-block assignment",
                shape,
                source.shape(),
            ));
        }

        let start = (first_row, first_col);
        match (self, source) {
            (Self::Real(dst), Self::Real(src)) => dst.view_mut(start, shape).copy_from(src),
            (Self::Complex(dst), Self::Complex(src)) => dst.view_mut(start, shape).copy_from(src),
            _ => {
                return Err(ManifoldError::complexity_mismatch(
                    "sub-block assignment requires matching real/complex storage",
                ))
            }
        }
        Ok(())
    }

    /// Extracts `rows` full-width rows starting at `start_row`.
    pub fn row_block(&self, start_row: usize, rows: usize) -> Result<Self> {
        if rows == 0 || self.ncols() == 0 {
            return Err(ManifoldError::invalid_parameter(format!(
                "empty row block requested from a {}x{} matrix",
                self.nrows(),
                self.ncols()
            )));
        }
        self.submatrix(start_row, 0, start_row + rows - 1, self.ncols() - 1)
    }

    /// Writes a full-width block starting at `start_row`.
    ///
    /// Unlike [`set_submatrix`](Self::set_submatrix) this promotes whichever
    /// side is real when the complex flags differ.
    pub fn set_row_block(&mut self, start_row: usize, block: &Self) -> Result<()> {
        if block.ncols() != self.ncols() {
            return Err(ManifoldError::dimension_mismatch(
                "row block",
                format!("{} columns", self.ncols()),
                format!("{} columns", block.ncols()),
            ));
        }
        if block.nrows() == 0 || self.ncols() == 0 {
            return Ok(());
        }
        if block.is_complex() && !self.is_complex() {
            *self = std::mem::take(self).into_complex();
        }

        let last_row = start_row + block.nrows() - 1;
        let last_col = self.ncols() - 1;
        if self.is_complex() && !block.is_complex() {
            let promoted = block.clone().into_complex();
            return self.set_submatrix(start_row, 0, last_row, last_col, &promoted);
        }
        self.set_submatrix(start_row, 0, last_row, last_col, block)
    }
}

impl Neg for &DenseMatrix {
    type Output = DenseMatrix;

    fn neg(self) -> DenseMatrix {
        match self {
            DenseMatrix::Real(m) => DenseMatrix::Real(-m),
            DenseMatrix::Complex(m) => DenseMatrix::Complex(-m),
        }
    }
}

impl Neg for DenseMatrix {
    type Output = DenseMatrix;

    fn neg(self) -> DenseMatrix {
        -&self
    }
}

impl Mul<f64> for &DenseMatrix {
    type Output = DenseMatrix;

    fn mul(self, scalar: f64) -> DenseMatrix {
        match self {
            DenseMatrix::Real(m) => DenseMatrix::Real(m * scalar),
            DenseMatrix::Complex(m) => DenseMatrix::Complex(m.map(|z| z * scalar)),
        }
    }
}

impl Mul<f64> for DenseMatrix {
    type Output = DenseMatrix;

    fn mul(self, scalar: f64) -> DenseMatrix {
        &self * scalar
    }
}

impl Mul<&DenseMatrix> for f64 {
    type Output = DenseMatrix;

    fn mul(self, matrix: &DenseMatrix) -> DenseMatrix {
        matrix * self
    }
}

impl Mul<DenseMatrix> for f64 {
    type Output = DenseMatrix;

    fn mul(self, matrix: DenseMatrix) -> DenseMatrix {
        &matrix * self
    }
}

impl Mul<Complex64> for &DenseMatrix {
    type Output = DenseMatrix;

    fn mul(self, scalar: Complex64) -> DenseMatrix {
        DenseMatrix::Complex(self.as_complex().map(|z| z * scalar))
    }
}

impl Mul<Complex64> for DenseMatrix {
    type Output = DenseMatrix;

    fn mul(self, scalar: Complex64) -> DenseMatrix {
        &self * scalar
    }
}

impl Mul<&DenseMatrix> for Complex64 {
    type Output = DenseMatrix;

    fn mul(self, matrix: &DenseMatrix) -> DenseMatrix {
        matrix * self
    }
}

impl Mul<DenseMatrix> for Complex64 {
    type Output = DenseMatrix;

    fn mul(self, matrix: DenseMatrix) -> DenseMatrix {
        &matrix * self
    }
}

impl MulAssign<f64> for DenseMatrix {
    fn mul_assign(&mut self, scalar: f64) {
        match self {
            Self::Real(m) => *m *= scalar,
            Self::Complex(m) => m.iter_mut().for_each(|z| *z *= scalar),
        }
    }
}

impl MulAssign<Complex64> for DenseMatrix {
    fn mul_assign(&mut self, scalar: Complex64) {
        *self = &*self * scalar;
    }
}

impl PartialEq for DenseMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.abs_diff_eq(other, EQUALITY_TOLERANCE)
    }
}

impl AbsDiffEq for DenseMatrix {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        EQUALITY_TOLERANCE
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        match (self, other) {
            (Self::Real(a), Self::Real(b)) => {
                a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= epsilon)
            }
            (Self::Complex(a), Self::Complex(b)) => {
                a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() <= epsilon)
            }
            _ => false,
        }
    }
}

impl fmt::Display for DenseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(m) => write!(f, "{m}"),
            Self::Complex(m) => write!(f, "{m}"),
        }
    }
}
