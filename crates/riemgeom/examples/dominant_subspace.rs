//! Riemannian gradient descent on a product manifold.
//!
//! Finds the dominant two-dimensional invariant subspace of a symmetric
//! matrix (a point on Stiefel(6,2)) while fitting a free 3x2 block to a
//! target (a point on Euclidean(3,2)). Both live in a single
//! `ProductManifold`, so every step is one retraction of a stacked 9x2
//! matrix.
//!
//! Run with: cargo run --example dominant_subspace

use nalgebra::DMatrix;
use riemgeom::prelude::*;

#[derive(Debug)]
struct SubspaceFit<'a> {
    manifold: &'a ProductManifold<'a>,
    a: DMatrix<f64>,
    target: DMatrix<f64>,
}

impl SubspaceFit<'_> {
    fn blocks(&self, x: &Point) -> Result<(DMatrix<f64>, DMatrix<f64>)> {
        let parts = self.manifold.split(x)?;
        Ok((parts[0].as_real()?.clone(), parts[1].as_real()?.clone()))
    }
}

impl Problem for SubspaceFit<'_> {
    fn manifold(&self) -> &dyn Manifold {
        self.manifold
    }

    /// f(X, Y) = -tr(XᵀAX) + ½‖Y - B‖²
    fn objective(&self, x: &Point) -> Result<f64> {
        let (frame, free) = self.blocks(x)?;
        let trace = (frame.transpose() * &self.a * &frame).trace();
        Ok(-trace + 0.5 * (free - &self.target).norm_squared())
    }

    fn gradient(&self, x: &Point) -> Result<TangentVector> {
        let (frame, free) = self.blocks(x)?;
        let frame_grad = DenseMatrix::from_real(&self.a * &frame * -2.0);
        let free_grad = DenseMatrix::from_real(free - &self.target);
        self.manifold.combine(&[frame_grad, free_grad])
    }
}

fn main() -> Result<()> {
    let stiefel = Stiefel::new(6, 2)?;
    let euclidean = Euclidean::new(3, 2)?;
    let product = ProductManifold::new(&[&stiefel, &euclidean], &[1, 1])?;

    let a = DMatrix::from_diagonal(&nalgebra::DVector::from_vec(vec![
        6.0, 5.0, 1.0, 0.5, 0.25, 0.1,
    ]));
    let target = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 0.0, 1.0, 2.0, -1.0]);
    let problem = SubspaceFit {
        manifold: &product,
        a,
        target,
    };

    println!("{}", product.name());
    println!("dimension {} (intrinsic {})", product.dimension(), product.intrinsic_dimension());

    let mut x = product.random_point()?;
    let step = 0.05;
    for iteration in 0..400 {
        let grad = problem.riemannian_gradient(&x)?;
        let grad_norm = product.norm(&x, &grad)?;
        if iteration % 50 == 0 {
            println!(
                "iter {iteration:>3}  f = {:>10.6}  |grad| = {grad_norm:.3e}",
                problem.objective(&x)?
            );
        }
        if grad_norm < 1e-8 {
            break;
        }
        let direction = problem.precondition(&x, &grad)? * -step;
        x = product.retraction(&x, &direction)?;
    }

    // Optimum is -(6 + 5) with the free block on its target.
    println!("final f = {:.8} (optimum -11)", problem.objective(&x)?);
    let frame = product.split(&x)?.remove(0);
    println!("frame orthonormality residual {:.2e}", frame.orthonormality_residual());
    Ok(())
}
