#![allow(non_snake_case)]

use super::{SaddlePointMatrix, SaddlePointVector};
use crate::algebra::*;
use crate::solver::SaddlePointError;

/// Right hand side of a saddle point solve, in one of three conventions.
///
/// Every convention is converted into the direct form `r = (ax, ap, ay, az)`
/// of `M·s = r` by [`assemble`](SaddlePointRhs::assemble).  The entries of
/// `ax` for fixed variables are the values the solution takes there.
#[derive(Debug, Clone, Copy)]
pub enum SaddlePointRhs<'a, T> {
    /// The four blocks of `r`.  Fixed entries of `x` are taken from `ax`.
    Direct {
        ax: &'a [T],
        ap: &'a [T],
        ay: &'a [T],
        az: &'a [T],
    },
    /// Gradient `g`, point `(x, p)`, multiplier guesses `(y, z)` and the
    /// residual targets `v, h, b`:
    ///
    /// ```text
    /// ax = -(g + Axᵀy + Jxᵀz)    ap = -v
    /// ay = b - Ax·x - Ap·p       az = -h
    /// ```
    ///
    /// Fixed entries of `x` in the solution are zero.
    WithMultipliers {
        g: &'a [T],
        x: &'a [T],
        p: &'a [T],
        y: &'a [T],
        z: &'a [T],
        v: &'a [T],
        h: &'a [T],
        b: &'a [T],
    },
    /// Gradient `g`, offset point `(x, p)` and the residual targets `v, h, b`:
    ///
    /// ```text
    /// ax = Hxx·x + Hxp·p - g     ap = Vpx·x + Vpp·p - v
    /// ay = b                     az = Jx·x + Jp·p - h
    /// ```
    ///
    /// Fixed entries of `x` in the solution equal those of the offset `x`.
    WithOffsets {
        g: &'a [T],
        x: &'a [T],
        p: &'a [T],
        v: &'a [T],
        h: &'a [T],
        b: &'a [T],
    },
}

fn check_vec<T: FloatT>(v: &[T], n: usize) -> Result<(), SaddlePointError> {
    if v.len() != n {
        return Err(SaddlePointError::IncompatibleDimension);
    }
    if !v.is_finite() {
        return Err(SaddlePointError::NonFiniteEntries);
    }
    Ok(())
}

impl<'a, T> SaddlePointRhs<'a, T>
where
    T: FloatT,
{
    /// Convert to the direct form for the saddle point matrix `M`.
    pub fn assemble(
        &self,
        M: &SaddlePointMatrix<T>,
        out: &mut SaddlePointVector<T>,
    ) -> Result<(), SaddlePointError> {
        let dims = M.dims();
        if out.dims() != dims {
            return Err(SaddlePointError::IncompatibleDimension);
        }
        let (nx, np, ny, nz) = (dims.nx, dims.np, dims.ny, dims.nz);
        let (one, zero) = (T::one(), T::zero());
        let (ax, ap, ay, az) = out.blocks_mut();

        match *self {
            SaddlePointRhs::Direct {
                ax: rx,
                ap: rp,
                ay: ry,
                az: rz,
            } => {
                check_vec(rx, nx)?;
                check_vec(rp, np)?;
                check_vec(ry, ny)?;
                check_vec(rz, nz)?;
                ax.copy_from(rx);
                ap.copy_from(rp);
                ay.copy_from(ry);
                az.copy_from(rz);
            }

            SaddlePointRhs::WithMultipliers {
                g,
                x,
                p,
                y,
                z,
                v,
                h,
                b,
            } => {
                check_vec(g, nx)?;
                check_vec(x, nx)?;
                check_vec(p, np)?;
                check_vec(y, ny)?;
                check_vec(z, nz)?;
                check_vec(v, np)?;
                check_vec(h, nz)?;
                check_vec(b, ny)?;

                // ax = -(g + Axᵀy + Jxᵀz)
                ax.copy_from(g);
                M.Ax.t().gemv(y, ax, one, one);
                M.Jx.t().gemv(z, ax, one, one);
                ax.negate();
                for &i in M.indices_fixed_variables() {
                    ax[i] = zero;
                }

                ap.copy_from(v).negate();
                az.copy_from(h).negate();

                // ay = b - Ax·x - Ap·p
                ay.copy_from(b);
                M.Ax.gemv(x, ay, -one, one);
                M.Ap.gemv(p, ay, -one, one);
            }

            SaddlePointRhs::WithOffsets { g, x, p, v, h, b } => {
                check_vec(g, nx)?;
                check_vec(x, nx)?;
                check_vec(p, np)?;
                check_vec(v, np)?;
                check_vec(h, nz)?;
                check_vec(b, ny)?;

                // ax = Hxx·x + Hxp·p - g
                ax.copy_from(g);
                M.Hxx.gemv(x, ax, one, -one);
                M.Hxp.gemv(p, ax, one, one);
                for &i in M.indices_fixed_variables() {
                    ax[i] = x[i];
                }

                // ap = Vpx·x + Vpp·p - v
                ap.copy_from(v);
                M.Vpx.gemv(x, ap, one, -one);
                M.Vpp.gemv(p, ap, one, one);

                ay.copy_from(b);

                // az = Jx·x + Jp·p - h
                az.copy_from(h);
                M.Jx.gemv(x, az, one, -one);
                M.Jp.gemv(p, az, one, one);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::saddlepoint::{SaddlePointBlocks, SaddlePointDims};

    fn matrix(ifixed: &[usize]) -> SaddlePointMatrix<f64> {
        let dims = SaddlePointDims::new(2, 1, 1, 1);
        let Hxx = Matrix::from(&[[2., 1.], [1., 3.]]);
        let Hxp = Matrix::from(&[[1.], [-1.]]);
        let Vpx = Matrix::from(&[[0., 2.]]);
        let Vpp = Matrix::from(&[[4.]]);
        let Jx = Matrix::from(&[[1., -1.]]);
        let Jp = Matrix::from(&[[0.5]]);
        let Ax = Matrix::from(&[[1., 1.]]);
        let Ap = Matrix::from(&[[2.]]);
        let blocks = SaddlePointBlocks {
            Hxx: &Hxx,
            Hxp: &Hxp,
            Vpx: &Vpx,
            Vpp: &Vpp,
            Jx: &Jx,
            Jp: &Jp,
        };
        SaddlePointMatrix::new(dims, &blocks, &Ax, &Ap, ifixed).unwrap()
    }

    #[test]
    fn test_rhs_with_multipliers() {
        let M = matrix(&[]);
        let mut r = SaddlePointVector::new(M.dims());
        let rhs = SaddlePointRhs::WithMultipliers {
            g: &[1., 2.],
            x: &[1., -1.],
            p: &[3.],
            y: &[2.],
            z: &[1.],
            v: &[5.],
            h: &[-2.],
            b: &[4.],
        };
        rhs.assemble(&M, &mut r).unwrap();

        // ax = -(g + Axᵀy + Jxᵀz)
        assert_eq!(r.x(), &[-4., -3.]);
        assert_eq!(r.p(), &[-5.]);
        // ay = b - Ax·x - Ap·p
        assert_eq!(r.y(), &[-2.]);
        assert_eq!(r.z(), &[2.]);

        let M = matrix(&[1]);
        let mut r = SaddlePointVector::new(M.dims());
        rhs.assemble(&M, &mut r).unwrap();
        assert_eq!(r.x(), &[-4., 0.]);
    }

    #[test]
    fn test_rhs_with_offsets() {
        let rhs = SaddlePointRhs::WithOffsets {
            g: &[1., 2.],
            x: &[1., -1.],
            p: &[3.],
            v: &[5.],
            h: &[-2.],
            b: &[4.],
        };

        let M = matrix(&[]);
        let mut r = SaddlePointVector::new(M.dims());
        rhs.assemble(&M, &mut r).unwrap();
        // ax = Hxx·x + Hxp·p - g
        assert_eq!(r.x(), &[3., -7.]);
        // ap = Vpx·x + Vpp·p - v
        assert_eq!(r.p(), &[5.]);
        assert_eq!(r.y(), &[4.]);
        // az = Jx·x + Jp·p - h
        assert_eq!(r.z(), &[5.5]);

        // fixed rows take the offset, and fixed columns of Hxx drop out
        let M = matrix(&[1]);
        let mut r = SaddlePointVector::new(M.dims());
        rhs.assemble(&M, &mut r).unwrap();
        assert_eq!(r.x(), &[4., -1.]);
    }

    #[test]
    fn test_rhs_errors() {
        let M = matrix(&[]);
        let mut r = SaddlePointVector::new(M.dims());
        let rhs = SaddlePointRhs::Direct {
            ax: &[1.],
            ap: &[0.],
            ay: &[0.],
            az: &[0.],
        };
        assert_eq!(
            rhs.assemble(&M, &mut r),
            Err(SaddlePointError::IncompatibleDimension)
        );

        let rhs = SaddlePointRhs::Direct {
            ax: &[1., f64::NAN],
            ap: &[0.],
            ay: &[0.],
            az: &[0.],
        };
        assert_eq!(
            rhs.assemble(&M, &mut r),
            Err(SaddlePointError::NonFiniteEntries)
        );
    }
}
