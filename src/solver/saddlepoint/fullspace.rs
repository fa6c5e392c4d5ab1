#![allow(non_snake_case)]

use super::*;
use crate::algebra::*;
use crate::solver::{SaddlePointError, SaddlePointSettings};

/// LU factors of the complete saddle point matrix.
#[derive(Debug, Clone)]
pub struct FullspaceFactors<T> {
    lu: LuFactorization<T>,
}

impl<T> FullspaceFactors<T>
where
    T: FloatT,
{
    pub(crate) fn new(
        matrix: &SaddlePointMatrix<T>,
        settings: &SaddlePointSettings<T>,
    ) -> Result<Self, SaddlePointError> {
        let M = matrix.assemble()?;
        let lu = settings.factorize(&M)?;
        Ok(Self { lu })
    }
}

impl<T> SaddlePointFactorsT<T> for FullspaceFactors<T>
where
    T: FloatT,
{
    fn solve(
        &self,
        _matrix: &SaddlePointMatrix<T>,
        r: &SaddlePointVector<T>,
        s: &mut SaddlePointVector<T>,
    ) -> Result<(), SaddlePointError> {
        self.lu.solve(&r.data, &mut s.data)?;
        Ok(())
    }

    fn reduced_size(&self) -> usize {
        self.lu.size().0
    }

    fn rank(&self) -> usize {
        self.lu.rank()
    }
}
