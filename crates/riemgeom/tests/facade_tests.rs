//! Tests driving the re-exported API through the prelude.

use approx::assert_relative_eq;
use riemgeom::nalgebra::{DMatrix, DVector};
use riemgeom::prelude::*;

/// `-tr(X^T A X)` on a stack of Stiefel frames sharing one `A`.
#[derive(Debug)]
struct Brockett<'a> {
    manifold: &'a StackedManifold<'a>,
    a: DMatrix<f64>,
}

impl Brockett<'_> {
    fn frames(&self, x: &Point) -> Result<Vec<DMatrix<f64>>> {
        let rows = self.a.nrows();
        (0..self.manifold.copies())
            .map(|i| Ok(x.row_block(i * rows, rows)?.as_real()?.clone()))
            .collect()
    }
}

impl Problem for Brockett<'_> {
    fn manifold(&self) -> &dyn Manifold {
        self.manifold
    }

    fn objective(&self, x: &Point) -> Result<f64> {
        Ok(self
            .frames(x)?
            .iter()
            .map(|f| -(f.transpose() * &self.a * f).trace())
            .sum())
    }

    fn gradient(&self, x: &Point) -> Result<TangentVector> {
        let blocks: Vec<DenseMatrix> = self
            .frames(x)?
            .iter()
            .map(|f| DenseMatrix::from_real(&self.a * f * -2.0))
            .collect();
        DenseMatrix::vstack(&blocks)
    }
}

fn diagonal(values: &[f64]) -> DMatrix<f64> {
    DMatrix::from_diagonal(&DVector::from_row_slice(values))
}

#[test]
fn test_gradient_vanishes_at_dominant_subspace() {
    let stiefel = Stiefel::new(4, 2).unwrap();
    let stacked = StackedManifold::new(&stiefel, 3).unwrap();
    let problem = Brockett {
        manifold: &stacked,
        a: diagonal(&[4.0, 3.0, 2.0, 1.0]),
    };

    let frame = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
    let block = DenseMatrix::from_real(frame);
    let x = DenseMatrix::vstack(&[block.clone(), block.clone(), block]).unwrap();

    assert_relative_eq!(problem.objective(&x).unwrap(), -21.0, epsilon = 1e-12);
    let grad = problem.riemannian_gradient(&x).unwrap();
    assert_relative_eq!(stacked.norm(&x, &grad).unwrap(), 0.0, epsilon = 1e-12);
}

#[test]
fn test_gradient_step_decreases_objective() {
    let options = StiefelOptionsBuilder::new()
        .metric(MetricType::Euclidean)
        .retraction(RetractionType::Polar)
        .build()
        .unwrap();
    let stiefel = Stiefel::with_options(4, 2, false, options).unwrap();
    let stacked = StackedManifold::new(&stiefel, 2).unwrap();
    let problem = Brockett {
        manifold: &stacked,
        a: diagonal(&[4.0, 3.0, 2.0, 1.0]),
    };

    let x = stacked.random_point().unwrap();
    let grad = problem.riemannian_gradient(&x).unwrap();
    let slope = stacked.metric(&x, &grad, &grad).unwrap();
    let (f0, _) = problem.objective_and_gradient(&x).unwrap();

    let y = stacked.retraction(&x, &(&grad * -1e-3)).unwrap();
    let f1 = problem.objective(&y).unwrap();

    // First-order decrease, with a second-order allowance.
    assert!(f1 <= f0 + 1e-12);
    assert_relative_eq!(f0 - f1, 1e-3 * slope, epsilon = 1e-4 * (1.0 + slope));
}
