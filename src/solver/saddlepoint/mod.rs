//! Saddle point (KKT) systems and their strategies.

use crate::algebra::FloatT;
use crate::solver::SaddlePointError;
use enum_dispatch::*;

mod dims;
mod fullspace;
mod matrix;
mod nullspace;
mod rangespace;
mod rhs;
mod solver;
mod vector;

pub use dims::*;
pub use fullspace::*;
pub use matrix::*;
pub use nullspace::*;
pub use rangespace::*;
pub use rhs::*;
pub use solver::*;
pub use vector::*;

/// Operations common to the factorizations of all strategies
#[enum_dispatch]
pub trait SaddlePointFactorsT<T>
where
    T: FloatT,
{
    /// Solve `M·s = r` with `r` in direct form.
    fn solve(
        &self,
        matrix: &SaddlePointMatrix<T>,
        r: &SaddlePointVector<T>,
        s: &mut SaddlePointVector<T>,
    ) -> Result<(), SaddlePointError>;

    /// Dimension of the factorized system.
    fn reduced_size(&self) -> usize;

    /// Numerical rank of the factorized system.
    fn rank(&self) -> usize;
}

/// Factorization built by [`SaddlePointSolver::decompose`], one variant per strategy.
#[enum_dispatch(SaddlePointFactorsT<T>)]
#[derive(Debug, Clone)]
pub enum SaddlePointFactors<T>
where
    T: FloatT,
{
    FullspaceFactors(FullspaceFactors<T>),
    NullspaceFactors(NullspaceFactors<T>),
    RangespaceFactors(RangespaceFactors<T>),
}
