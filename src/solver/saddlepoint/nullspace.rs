#![allow(non_snake_case)]

use super::*;
use crate::algebra::*;
use crate::solver::{Canonicalizer, SaddlePointError, SaddlePointSettings};

/// Factors for the elimination of the basic variables through the canonical form.
///
/// With the canonical form `R·[Af; Jf]·Q = C`, the top rows `Rtop` of `R`
/// give the basic variables as
///
/// ```text
/// xb = Rtop·ay - S·xn - Pb·p,    Pb = Rtop·Ap
/// ```
///
/// Substituting into the non-basic rows leaves a system over `(xn, p, z)`:
///
/// ```text
/// | Hnn - Sᵀ·Hbn - Gb·S    Hnp - Sᵀ·Hbp - Gb·Pb    JnRᵀ |
/// | Vpn - Vpb·S            Vpp - Vpb·Pb             0   |
/// | JnR                    Jp - Jb·Pb               0   |
/// ```
///
/// with `Gb = Hnb - Sᵀ·Hbb` and `JnR = Jn - Jb·S`, read from the extended
/// rows of `C`.  The multipliers `y` are recovered from the basic rows
/// through `Rtopᵀ`.  Equations of `A` that are linearly dependent are
/// assumed consistent and are not used.
#[derive(Debug, Clone)]
pub struct NullspaceFactors<T> {
    // basic and non-basic positions within the free variables
    jb: Vec<usize>,
    jn: Vec<usize>,
    S: Matrix<T>,
    Pb: Matrix<T>,
    Rtop: Matrix<T>,
    Gb: Matrix<T>,
    Hbb: Matrix<T>,
    Hbn: Matrix<T>,
    Hbp: Matrix<T>,
    Vpb: Matrix<T>,
    Jb: Matrix<T>,
    lu: LuFactorization<T>,
}

impl<T> NullspaceFactors<T>
where
    T: FloatT,
{
    pub(crate) fn new(
        matrix: &SaddlePointMatrix<T>,
        canonicalizer: &Canonicalizer<T>,
        settings: &SaddlePointSettings<T>,
    ) -> Result<Self, SaddlePointError> {
        let SaddlePointDims { nx: _, np, ny, nz } = matrix.dims();
        let free = matrix.indices_free_variables();
        if canonicalizer.num_variables() != free.len()
            || canonicalizer.num_equations() != ny
            || canonicalizer.num_extended_equations() != nz
        {
            return Err(SaddlePointError::IncompatibleDimension);
        }

        let nb = canonicalizer.num_basic_variables();
        let nn = canonicalizer.num_non_basic_variables();
        let jb = canonicalizer.indices_basic_variables().to_vec();
        let jn = canonicalizer.indices_non_basic_variables().to_vec();

        // global indices of the basic and non-basic variables
        let gb: Vec<usize> = jb.iter().map(|&k| free[k]).collect();
        let gn: Vec<usize> = jn.iter().map(|&k| free[k]).collect();
        let prows: Vec<usize> = (0..np).collect();
        let zrows: Vec<usize> = (0..nz).collect();

        let S = canonicalizer.S();
        let Rtop = canonicalizer.R().block((0, 0), (nb, ny));
        let JnR = canonicalizer.C().block((ny, nb), (nz, nn));

        let H = &matrix.Hxx;
        let Hbb = H.select(&gb, &gb);
        let Hbn = H.select(&gb, &gn);
        let Hnb = H.select(&gn, &gb);
        let Hnn = H.select(&gn, &gn);
        let Hbp = matrix.Hxp.select(&gb, &prows);
        let Hnp = matrix.Hxp.select(&gn, &prows);
        let Vpb = matrix.Vpx.select(&prows, &gb);
        let Vpn = matrix.Vpx.select(&prows, &gn);
        let Jb = matrix.Jx.select(&zrows, &gb);

        let Pb = Matrix::product(&Rtop, &matrix.Ap);

        // Gb = Hnb - Sᵀ·Hbb
        let mut Gb = Hnb;
        Gb.mul(&S.t(), &Hbb, -T::one(), T::one());

        let mut K11 = Hnn;
        K11.mul(&S.t(), &Hbn, -T::one(), T::one());
        K11.mul(&Gb, &S, -T::one(), T::one());

        let mut K12 = Hnp;
        K12.mul(&S.t(), &Hbp, -T::one(), T::one());
        K12.mul(&Gb, &Pb, -T::one(), T::one());

        let K13 = JnR.transpose();

        let mut K21 = Vpn;
        K21.mul(&Vpb, &S, -T::one(), T::one());

        let mut K22 = matrix.Vpp.clone();
        K22.mul(&Vpb, &Pb, -T::one(), T::one());

        let K23 = Matrix::zeros((np, nz));

        let mut K32 = matrix.Jp.clone();
        K32.mul(&Jb, &Pb, -T::one(), T::one());

        let K33 = Matrix::zeros((nz, nz));

        let K = Matrix::hvcat(&[
            &[&K11, &K12, &K13],
            &[&K21, &K22, &K23],
            &[&JnR, &K32, &K33],
        ])
        .map_err(|_| SaddlePointError::IncompatibleDimension)?;

        let lu = settings.factorize(&K)?;

        Ok(Self {
            jb,
            jn,
            S,
            Pb,
            Rtop,
            Gb,
            Hbb,
            Hbn,
            Hbp,
            Vpb,
            Jb,
            lu,
        })
    }
}

impl<T> SaddlePointFactorsT<T> for NullspaceFactors<T>
where
    T: FloatT,
{
    fn solve(
        &self,
        matrix: &SaddlePointMatrix<T>,
        r: &SaddlePointVector<T>,
        s: &mut SaddlePointVector<T>,
    ) -> Result<(), SaddlePointError> {
        let (one, zero) = (T::one(), T::zero());
        let SaddlePointDims { nx: _, np, ny: _, nz: _ } = matrix.dims();
        let (nb, nn) = (self.jb.len(), self.jn.len());
        let [af, ap, ay, az] = matrix.reduced_rhs(r);

        let ab: Vec<T> = self.jb.iter().map(|&k| af[k]).collect();
        let an: Vec<T> = self.jn.iter().map(|&k| af[k]).collect();

        // particular basic solution bb = Rtop·ay
        let mut bb = vec![zero; nb];
        self.Rtop.gemv(&ay, &mut bb, one, zero);

        // reduced right hand side
        let mut r1 = an;
        self.S.t().gemv(&ab, &mut r1, -one, one);
        self.Gb.gemv(&bb, &mut r1, -one, one);
        let mut r2 = ap;
        self.Vpb.gemv(&bb, &mut r2, -one, one);
        let mut r3 = az;
        self.Jb.gemv(&bb, &mut r3, -one, one);

        let rhs: Vec<T> = r1.into_iter().chain(r2).chain(r3).collect();
        let mut w = vec![zero; rhs.len()];
        self.lu.solve(&rhs, &mut w)?;
        let (xn, rest) = w.split_at(nn);
        let (p, z) = rest.split_at(np);

        // xb = bb - S·xn - Pb·p
        let mut xb = bb;
        self.S.gemv(xn, &mut xb, -one, one);
        self.Pb.gemv(p, &mut xb, -one, one);

        // wb = ab - Hbb·xb - Hbn·xn - Hbp·p - Jbᵀ·z, then y = Rtopᵀ·wb
        let mut wb = ab;
        self.Hbb.gemv(&xb, &mut wb, -one, one);
        self.Hbn.gemv(xn, &mut wb, -one, one);
        self.Hbp.gemv(p, &mut wb, -one, one);
        self.Jb.t().gemv(z, &mut wb, -one, one);

        let free = matrix.indices_free_variables();
        let (sx, sp, sy, sz) = s.blocks_mut();
        self.Rtop.t().gemv(&wb, sy, one, zero);
        sp.copy_from(p);
        sz.copy_from(z);
        sx.copy_from(r.x());
        for (&k, &v) in self.jb.iter().zip(&xb) {
            sx[free[k]] = v;
        }
        for (&k, &v) in self.jn.iter().zip(xn) {
            sx[free[k]] = v;
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
