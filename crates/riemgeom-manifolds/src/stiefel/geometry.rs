//! Stiefel geometry kernels, generic over real and complex scalars.
//!
//! Every kernel assumes operands already have the ambient shape and that
//! the base point has orthonormal columns; [`Stiefel`](super::Stiefel)
//! performs both checks before dispatching here.

use nalgebra::{ComplexField, DMatrix, DVector};
use riemgeom_core::error::{ManifoldError, Result};
use tracing::warn;

use super::options::{MetricType, RetractionType};

/// `Re <Z1, Z2>` or its canonical correction `- 1/2 Re <Z1 X^H, Z2 X^H>`.
pub(crate) fn metric<T>(metric: MetricType, x: &DMatrix<T>, z1: &DMatrix<T>, z2: &DMatrix<T>) -> f64
where
    T: ComplexField<RealField = f64>,
{
    let euclidean = z1.dotc(z2).real();
    match metric {
        MetricType::Euclidean => euclidean,
        MetricType::Canonical => {
            let xh = x.adjoint();
            euclidean - 0.5 * (z1 * &xh).dotc(&(z2 * &xh)).real()
        }
    }
}

/// `Z - 1/2 X (X^H Z + Z^H X)`.
pub(crate) fn projection<T>(x: &DMatrix<T>, z: &DMatrix<T>) -> DMatrix<T>
where
    T: ComplexField<RealField = f64>,
{
    let xz = x.adjoint() * z;
    let sym = (&xz + xz.adjoint()) * T::from_real(0.5);
    z - x * sym
}

pub(crate) fn retraction<T>(
    kind: RetractionType,
    x: &DMatrix<T>,
    u: &DMatrix<T>,
) -> Result<DMatrix<T>>
where
    T: ComplexField<RealField = f64>,
{
    match kind {
        RetractionType::Qr => Ok(orthonormalize(x + u)),
        RetractionType::Polar => polar(x + u),
        RetractionType::Cayley => cayley_apply(x, u, x),
        RetractionType::Exponential => Ok(exponential(x, u)),
    }
}

/// Q factor of the economy QR of `a`, with column phases chosen so that R
/// has a positive real diagonal. Orthonormal input is returned unchanged.
pub(crate) fn orthonormalize<T>(a: DMatrix<T>) -> DMatrix<T>
where
    T: ComplexField<RealField = f64>,
{
    let qr = a.qr();
    let r = qr.r();
    let phases = DVector::from_fn(r.nrows(), |j, _| {
        let d = r[(j, j)].clone();
        let modulus = d.clone().modulus();
        if modulus > 0.0 {
            d / T::from_real(modulus)
        } else {
            T::one()
        }
    });
    qr.q() * DMatrix::from_diagonal(&phases)
}

/// Orthogonal polar factor `U_s V^H` of `a = U_s S V^H`.
fn polar<T>(a: DMatrix<T>) -> Result<DMatrix<T>>
where
    T: ComplexField<RealField = f64>,
{
    let svd = a.svd(true, true);
    match (svd.u, svd.v_t) {
        (Some(u), Some(v_t)) => Ok(u * v_t),
        _ => {
            warn!("SVD did not produce singular vectors for the polar retraction");
            Err(ManifoldError::numerical_error(
                "SVD failed to compute singular vectors for the polar retraction",
            ))
        }
    }
}

/// Solves `(I + W/2) Y = (I - W/2) B` with the skew-Hermitian
/// `W = X U'^H - U' X^H`, `U' = (I - 1/2 X X^H) U`.
///
/// With `B = X` this is the Cayley retraction, whose velocity at zero is
/// `U` for tangent `U`. With `B` a tangent vector at `X` it is the Cayley
/// transport into the tangent space at the retracted point.
pub(crate) fn cayley_apply<T>(x: &DMatrix<T>, u: &DMatrix<T>, b: &DMatrix<T>) -> Result<DMatrix<T>>
where
    T: ComplexField<RealField = f64>,
{
    let n = x.nrows();
    let half = T::from_real(0.5);
    let u_tilde = u - x * (x.adjoint() * u) * half.clone();
    let w = x * u_tilde.adjoint() - &u_tilde * x.adjoint();
    let w_half = w * half;
    let identity = DMatrix::<T>::identity(n, n);

    let rhs = (&identity - &w_half) * b;
    (identity + w_half).lu().solve(&rhs).ok_or_else(|| {
        warn!(n, "Cayley system is singular");
        ManifoldError::numerical_error("Cayley system I + W/2 is singular")
    })
}

/// `Y = X E11 + Q E21` with `E = exp([[W, -R^H], [R, 0]])`, `W = X^H U` and
/// `QR = U - X W`. Geodesic of the canonical metric.
///
/// When `2p > n` the normal part has rank below `p` and the spare columns
/// of Q are not orthogonal to X, so the sum is re-orthonormalized. The
/// phase-fixed QR leaves feasible output unchanged up to rounding.
fn exponential<T>(x: &DMatrix<T>, u: &DMatrix<T>) -> DMatrix<T>
where
    T: ComplexField<RealField = f64>,
{
    let p = x.ncols();
    let w = x.adjoint() * u;
    let normal = u - x * &w;
    let qr = normal.qr();
    let q = qr.q();
    let r = qr.r();

    let mut m = DMatrix::<T>::zeros(2 * p, 2 * p);
    m.view_mut((0, 0), (p, p)).copy_from(&w);
    m.view_mut((0, p), (p, p)).copy_from(&(-r.adjoint()));
    m.view_mut((p, 0), (p, p)).copy_from(&r);

    let e = m.exp();
    orthonormalize(x * e.view((0, 0), (p, p)) + q * e.view((p, 0), (p, p)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Complex;

    fn e1_e2() -> (DMatrix<f64>, DMatrix<f64>) {
        let mut x = DMatrix::zeros(3, 1);
        x[(0, 0)] = 1.0;
        let mut u = DMatrix::zeros(3, 1);
        u[(1, 0)] = 1.0;
        (x, u)
    }

    #[test]
    fn test_exponential_follows_great_circle() {
        let (x, u) = e1_e2();
        let a: f64 = 0.7;
        let y = exponential(&x, &(&u * a));
        assert_relative_eq!(y[(0, 0)], a.cos(), epsilon = 1e-10);
        assert_relative_eq!(y[(1, 0)], a.sin(), epsilon = 1e-10);
        assert_relative_eq!(y[(2, 0)], 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_cayley_first_order() {
        let (x, u) = e1_e2();
        let t = 1e-6;
        let y = cayley_apply(&x, &(&u * t), &x).unwrap();
        let velocity = (y - &x) / t;
        assert_relative_eq!(velocity, u, epsilon = 1e-5);
    }

    #[test]
    fn test_orthonormalize_fixes_phases() {
        let x = DMatrix::from_row_slice(2, 2, &[
            Complex::new(0.0, 1.0), Complex::new(0.0, 0.0),
            Complex::new(0.0, 0.0), Complex::new(-1.0, 0.0),
        ]);
        let q = orthonormalize(x.clone());
        assert_relative_eq!((q - x).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_projection_kills_normal_component() {
        let (x, _) = e1_e2();
        let z = DMatrix::from_column_slice(3, 1, &[2.0, 3.0, 4.0]);
        let p = projection(&x, &z);
        assert_relative_eq!(p, DMatrix::from_column_slice(3, 1, &[0.0, 3.0, 4.0]), epsilon = 1e-12);
    }

    #[test]
    fn test_canonical_metric_literal_form() {
        let (x, u) = e1_e2();
        let v = &u * 2.0;
        // x has unit norm, so <u x^H, v x^H> = <u, v>
        assert_relative_eq!(metric(MetricType::Euclidean, &x, &u, &v), 2.0, epsilon = 1e-12);
        assert_relative_eq!(metric(MetricType::Canonical, &x, &u, &v), 1.0, epsilon = 1e-12);
    }
}
