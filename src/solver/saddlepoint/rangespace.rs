#![allow(non_snake_case)]

use super::*;
use crate::algebra::*;
use crate::solver::{SaddlePointError, SaddlePointSettings};

/// Factors for the closed form elimination of the free variables.
///
/// With `D = diag(Hff)` the free variables are
///
/// ```text
/// xf = D⁻¹(af - Hfp·p - Afᵀ·y - Jfᵀ·z)
/// ```
///
/// and substituting into the remaining rows leaves the system
///
/// ```text
/// [ Vpp - G·D⁻¹·Hfp   -G·D⁻¹·Eᵀ ] (p, y, z) = (ap, ay, az) - G·D⁻¹·af
/// ```
///
/// with `G = [Vpf; Af; Jf]`, `E = [Af; Jf]` and `Vpp` extended by `Ap`, `Jp`.
/// The free block `Hff` must be diagonal.
#[derive(Debug, Clone)]
pub struct RangespaceFactors<T> {
    dinv: Vec<T>,
    // G·D⁻¹
    GD: Matrix<T>,
    Hfp: Matrix<T>,
    E: Matrix<T>,
    lu: LuFactorization<T>,
}

impl<T> RangespaceFactors<T>
where
    T: FloatT,
{
    pub(crate) fn new(
        matrix: &SaddlePointMatrix<T>,
        settings: &SaddlePointSettings<T>,
    ) -> Result<Self, SaddlePointError> {
        let SaddlePointDims { nx: _, np, ny, nz } = matrix.dims();
        let free = matrix.indices_free_variables();
        let prows: Vec<usize> = (0..np).collect();
        let yrows: Vec<usize> = (0..ny).collect();
        let zrows: Vec<usize> = (0..nz).collect();

        let mut dinv = Vec::with_capacity(free.len());
        for &i in free {
            let d = matrix.Hxx[(i, i)];
            if d == T::zero() || !d.is_finite() {
                return Err(SaddlePointError::SingularDiagonal(i));
            }
            dinv.push(T::recip(d));
        }
        for &j in free {
            for &i in free {
                if i != j && matrix.Hxx[(i, j)] != T::zero() {
                    return Err(SaddlePointError::NonDiagonalHessian(i, j));
                }
            }
        }

        let Vpf = matrix.Vpx.select(&prows, free);
        let Af = matrix.Ax.select(&yrows, free);
        let Jf = matrix.Jx.select(&zrows, free);
        let Hfp = matrix.Hxp.select(free, &prows);

        let E = Matrix::vcat(&Af, &Jf).map_err(|_| SaddlePointError::IncompatibleDimension)?;
        let mut GD =
            Matrix::vcat(&Vpf, &E).map_err(|_| SaddlePointError::IncompatibleDimension)?;
        for (k, &di) in dinv.iter().enumerate() {
            GD.col_slice_mut(k).scale(di);
        }

        // [Vpp; Ap; Jp] - G·D⁻¹·Hfp
        let mut Kp = Matrix::vcat(&matrix.Vpp, &matrix.Ap)
            .and_then(|B| Matrix::vcat(&B, &matrix.Jp))
            .map_err(|_| SaddlePointError::IncompatibleDimension)?;
        Kp.mul(&GD, &Hfp, -T::one(), T::one());

        // -G·D⁻¹·Eᵀ
        let mut Kyz = Matrix::zeros((np + ny + nz, ny + nz));
        Kyz.mul(&GD, &E.t(), -T::one(), T::zero());

        let K = Matrix::hcat(&Kp, &Kyz).map_err(|_| SaddlePointError::IncompatibleDimension)?;
        let lu = settings.factorize(&K)?;

        Ok(Self {
            dinv,
            GD,
            Hfp,
            E,
            lu,
        })
    }
}

impl<T> SaddlePointFactorsT<T> for RangespaceFactors<T>
where
    T: FloatT,
{
    fn solve(
        &self,
        matrix: &SaddlePointMatrix<T>,
        r: &SaddlePointVector<T>,
        s: &mut SaddlePointVector<T>,
    ) -> Result<(), SaddlePointError> {
        let np = matrix.dims().np;
        let [af, ap, ay, az] = matrix.reduced_rhs(r);

        let mut rhs: Vec<T> = ap.into_iter().chain(ay).chain(az).collect();
        self.GD.gemv(&af, &mut rhs, -T::one(), T::one());

        let mut w = vec![T::zero(); rhs.len()];
        self.lu.solve(&rhs, &mut w)?;
        let (p, yz) = w.split_at(np);

        // xf = D⁻¹(af - Hfp·p - Eᵀ·(y,z))
        let mut xf = af;
        self.Hfp.gemv(p, &mut xf, -T::one(), T::one());
        self.E.t().gemv(yz, &mut xf, -T::one(), T::one());
        xf.hadamard(&self.dinv);

        let (sx, sp, sy, sz) = s.blocks_mut();
        let (y, z) = yz.split_at(sy.len());
        sp.copy_from(p);
        sy.copy_from(y);
        sz.copy_from(z);
        sx.copy_from(r.x());
        for (&i, &v) in matrix.indices_free_variables().iter().zip(&xf) {
            sx[i] = v;
        }
        Ok(())
    }

    fn reduced_size(&self) -> usize {
        self.lu.size().0
    }

    fn rank(&self) -> usize {
        self.lu.rank()
    }
}
