#![allow(non_snake_case)]

use super::{SaddlePointDims, SaddlePointVector};
use crate::algebra::*;
use crate::solver::SaddlePointError;

/// Borrowed blocks of the saddle point matrix that change every iteration.
///
/// The constraint blocks `Ax` and `Ap` are given once, when the solver is
/// created.
#[derive(Debug, Clone, Copy)]
pub struct SaddlePointBlocks<'a, T> {
    /// nx × nx
    pub Hxx: &'a Matrix<T>,
    /// nx × np
    pub Hxp: &'a Matrix<T>,
    /// np × nx
    pub Vpx: &'a Matrix<T>,
    /// np × np
    pub Vpp: &'a Matrix<T>,
    /// nz × nx
    pub Jx: &'a Matrix<T>,
    /// nz × np
    pub Jp: &'a Matrix<T>,
}

/// The saddle point matrix of the current iterate, with fixed variables treated.
///
/// ```text
///     | Hxx  Hxp  Axᵀ  Jxᵀ |
/// M = | Vpx  Vpp   0    0  |
///     | Ax   Ap    0    0  |
///     | Jx   Jp    0    0  |
/// ```
///
/// For every fixed variable `i` the row `i` of `M` is the unit row `e_i`, so
/// that the fixed entry of the solution is the corresponding entry of the
/// right hand side.  Row and column `i` of `Hxx` and row `i` of `Hxp` are
/// stored as zero.  The columns of `Ax`, `Jx` and `Vpx` belonging to fixed
/// variables are kept.
#[derive(Debug, Clone)]
pub struct SaddlePointMatrix<T> {
    dims: SaddlePointDims,
    pub(crate) Hxx: Matrix<T>,
    pub(crate) Hxp: Matrix<T>,
    pub(crate) Vpx: Matrix<T>,
    pub(crate) Vpp: Matrix<T>,
    pub(crate) Ax: Matrix<T>,
    pub(crate) Ap: Matrix<T>,
    pub(crate) Jx: Matrix<T>,
    pub(crate) Jp: Matrix<T>,
    ifixed: Vec<usize>,
    ifree: Vec<usize>,
}

fn check_block<T: FloatT>(M: &Matrix<T>, size: (usize, usize)) -> Result<(), SaddlePointError> {
    if M.size() != size {
        return Err(SaddlePointError::IncompatibleDimension);
    }
    if !M.is_finite() {
        return Err(SaddlePointError::NonFiniteEntries);
    }
    Ok(())
}

impl<T> SaddlePointMatrix<T>
where
    T: FloatT,
{
    pub(crate) fn new(
        dims: SaddlePointDims,
        blocks: &SaddlePointBlocks<'_, T>,
        Ax: &Matrix<T>,
        Ap: &Matrix<T>,
        ifixed: &[usize],
    ) -> Result<Self, SaddlePointError> {
        let SaddlePointDims { nx, np, ny, nz } = dims;
        check_block(blocks.Hxx, (nx, nx))?;
        check_block(blocks.Hxp, (nx, np))?;
        check_block(blocks.Vpx, (np, nx))?;
        check_block(blocks.Vpp, (np, np))?;
        check_block(blocks.Jx, (nz, nx))?;
        check_block(blocks.Jp, (nz, np))?;
        check_block(Ax, (ny, nx))?;
        check_block(Ap, (ny, np))?;

        let mut is_fixed = vec![false; nx];
        for &i in ifixed {
            if i >= nx || is_fixed[i] {
                return Err(SaddlePointError::InvalidFixedIndex(i));
            }
            is_fixed[i] = true;
        }
        let mut ifixed = ifixed.to_vec();
        ifixed.sort_unstable();
        let ifree = (0..nx).filter(|&i| !is_fixed[i]).collect();

        let mut Hxx = blocks.Hxx.clone();
        let mut Hxp = blocks.Hxp.clone();
        for &i in &ifixed {
            Hxx.col_slice_mut(i).set(T::zero());
            Hxx.scale_row(i, T::zero());
            Hxp.scale_row(i, T::zero());
        }

        Ok(Self {
            dims,
            Hxx,
            Hxp,
            Vpx: blocks.Vpx.clone(),
            Vpp: blocks.Vpp.clone(),
            Ax: Ax.clone(),
            Ap: Ap.clone(),
            Jx: blocks.Jx.clone(),
            Jp: blocks.Jp.clone(),
            ifixed,
            ifree,
        })
    }

    pub fn dims(&self) -> SaddlePointDims {
        self.dims
    }

    /// Fixed variables, in ascending order.
    pub fn indices_fixed_variables(&self) -> &[usize] {
        &self.ifixed
    }

    /// Free variables, in ascending order.
    pub fn indices_free_variables(&self) -> &[usize] {
        &self.ifree
    }

    /// Computes `out = M·s`
    pub fn multiply(&self, s: &SaddlePointVector<T>, out: &mut SaddlePointVector<T>) {
        let (x, p, y, z) = (s.x(), s.p(), s.y(), s.z());
        let (ox, op, oy, oz) = out.blocks_mut();

        self.Hxx.gemv(x, ox, T::one(), T::zero());
        self.Hxp.gemv(p, ox, T::one(), T::one());
        self.Ax.t().gemv(y, ox, T::one(), T::one());
        self.Jx.t().gemv(z, ox, T::one(), T::one());
        for &i in &self.ifixed {
            ox[i] = x[i];
        }

        self.Vpx.gemv(x, op, T::one(), T::zero());
        self.Vpp.gemv(p, op, T::one(), T::one());

        self.Ax.gemv(x, oy, T::one(), T::zero());
        self.Ap.gemv(p, oy, T::one(), T::one());

        self.Jx.gemv(x, oz, T::one(), T::zero());
        self.Jp.gemv(p, oz, T::one(), T::one());
    }

    /// The complete matrix `M`.
    pub fn assemble(&self) -> Result<Matrix<T>, SaddlePointError> {
        let SaddlePointDims { nx: _, np, ny, nz } = self.dims;

        let mut AxT = self.Ax.transpose();
        let mut JxT = self.Jx.transpose();
        for &i in &self.ifixed {
            AxT.scale_row(i, T::zero());
            JxT.scale_row(i, T::zero());
        }

        let Zpy = Matrix::zeros((np, ny));
        let Zpz = Matrix::zeros((np, nz));
        let Zyy = Matrix::zeros((ny, ny));
        let Zyz = Matrix::zeros((ny, nz));
        let Zzy = Matrix::zeros((nz, ny));
        let Zzz = Matrix::zeros((nz, nz));

        let mut M = Matrix::hvcat(&[
            &[&self.Hxx, &self.Hxp, &AxT, &JxT],
            &[&self.Vpx, &self.Vpp, &Zpy, &Zpz],
            &[&self.Ax, &self.Ap, &Zyy, &Zyz],
            &[&self.Jx, &self.Jp, &Zzy, &Zzz],
        ])
        .map_err(|_| SaddlePointError::IncompatibleDimension)?;

        for &i in &self.ifixed {
            M[(i, i)] = T::one();
        }
        Ok(M)
    }

    // Splits the direct form rhs `r` into its free part `a_f` and the
    // (p,y,z) parts with the fixed variable contributions moved over,
    // i.e. ap - Vpx[:,F]·ax[F], ay - Ax[:,F]·ax[F] and az - Jx[:,F]·ax[F]
    pub(crate) fn reduced_rhs(&self, r: &SaddlePointVector<T>) -> [Vec<T>; 4] {
        let ax = r.x();
        let af = self.ifree.iter().map(|&i| ax[i]).collect();
        let mut ap = r.p().to_vec();
        let mut ay = r.y().to_vec();
        let mut az = r.z().to_vec();

        for &i in &self.ifixed {
            let xi = ax[i];
            if xi == T::zero() {
                continue;
            }
            ap.axpby(-xi, self.Vpx.col_slice(i), T::one());
            ay.axpby(-xi, self.Ax.col_slice(i), T::one());
            az.axpby(-xi, self.Jx.col_slice(i), T::one());
        }
        [af, ap, ay, az]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_rows_and_multiply() {
        let dims = SaddlePointDims::new(3, 1, 1, 1);
        let Hxx = Matrix::from(&[
            [4., 1., 0.], //
            [1., 5., 2.], //
            [0., 2., 6.], //
        ]);
        let Hxp = Matrix::from(&[[1.], [2.], [3.]]);
        let Vpx = Matrix::from(&[[1., 0., 1.]]);
        let Vpp = Matrix::from(&[[2.]]);
        let Jx = Matrix::from(&[[0., 1., 1.]]);
        let Jp = Matrix::from(&[[1.]]);
        let Ax = Matrix::from(&[[1., 1., 1.]]);
        let Ap = Matrix::from(&[[0.5]]);
        let blocks = SaddlePointBlocks {
            Hxx: &Hxx,
            Hxp: &Hxp,
            Vpx: &Vpx,
            Vpp: &Vpp,
            Jx: &Jx,
            Jp: &Jp,
        };

        let M = SaddlePointMatrix::new(dims, &blocks, &Ax, &Ap, &[1]).unwrap();
        let K = M.assemble().unwrap();
        assert_eq!(K.size(), (6, 6));
        assert_eq!(K.row(1), vec![0., 1., 0., 0., 0., 0.]);
        assert_eq!(K.col_slice(1)[0..3], [0., 1., 0.]);
        // fixed columns of the constraint blocks are kept
        assert_eq!(K[(4, 1)], 1.0);
        assert_eq!(K[(5, 1)], 1.0);

        let s = SaddlePointVector::from_blocks(dims, &[1., 2., 3.], &[-1.], &[0.5], &[2.]);
        let mut r = SaddlePointVector::new(dims);
        M.multiply(&s, &mut r);

        let mut rK = vec![0.; 6];
        K.gemv(&s.data, &mut rK, 1., 0.);
        assert!(r.data.norm_inf_diff(&rK) < 1e-14);
        assert_eq!(r.x()[1], 2.0);

        assert_eq!(
            SaddlePointMatrix::new(dims, &blocks, &Ax, &Ap, &[1, 1]).err(),
            Some(SaddlePointError::InvalidFixedIndex(1))
        );
        assert_eq!(
            SaddlePointMatrix::new(dims, &blocks, &Ax, &Ap, &[3]).err(),
            Some(SaddlePointError::InvalidFixedIndex(3))
        );
    }
}
