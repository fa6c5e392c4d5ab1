use crate::algebra::DenseFactorizationError;
use crate::solver::SettingsError;
use thiserror::Error;

/// Error type returned by the [`Canonicalizer`](crate::solver::Canonicalizer).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalizerError {
    /// Matrix dimensions and/or array lengths are incompatible
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    /// The input contains NaN or infinite values
    #[error("Matrix or weights contain non-finite entries")]
    NonFiniteEntries,
    /// A reordering is not a permutation of its index range
    #[error("Ordering is not a valid permutation")]
    InvalidPermutation,
    /// An index is out of range for the current partition
    #[error("Index {0} is out of range")]
    InvalidIndex(usize),
    /// A basic/non-basic swap was requested on a numerically zero entry
    #[error("Numerically zero pivot in basic variable swap")]
    ZeroPivot,
}

/// Error type returned by the [`SaddlePointSolver`](crate::solver::SaddlePointSolver).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaddlePointError {
    /// Block dimensions and/or vector lengths are incompatible
    #[error("Block dimensions and/or vector lengths are incompatible")]
    IncompatibleDimension,
    /// A block or right hand side contains NaN or infinite values
    #[error("Input contains non-finite entries")]
    NonFiniteEntries,
    /// A fixed variable index is out of range or repeated
    #[error("Invalid fixed variable index {0}")]
    InvalidFixedIndex(usize),
    /// Parameter variables are present while the free part of `Ax` is rank deficient
    #[error("Rank deficient equality constraints are not supported with parameter variables (rank {rank} < {ny})")]
    UnsupportedDegeneracy { rank: usize, ny: usize },
    /// Rows of `Jx` are linearly dependent on each other or on the rows of `Ax`,
    /// restricted to the free variables
    #[error("Rows of Jx are linearly dependent (rank {rank} of {rows} stacked rows)")]
    DependentExtendedRows { rank: usize, rows: usize },
    /// Rangespace elimination requires the free block of `Hxx` to be diagonal
    #[error("Hxx has off-diagonal entries between free variables {0} and {1}")]
    NonDiagonalHessian(usize, usize),
    /// Rangespace elimination hit a zero or non-finite diagonal entry of `Hxx`
    #[error("Zero or non-finite diagonal entry of Hxx at free variable {0}")]
    SingularDiagonal(usize),
    /// Operation requires a successful call to `canonicalize`
    #[error("Solver has not been canonicalized")]
    NotCanonicalized,
    /// Operation requires a successful call to `decompose`
    #[error("Solver has not been decomposed")]
    NotDecomposed,
    /// Operation requires a right hand side from `rhs`
    #[error("No right hand side has been assembled")]
    MissingRhs,
    /// Error from the canonicalizer
    #[error(transparent)]
    Canonicalizer(#[from] CanonicalizerError),
    /// Error from the LU factorization
    #[error(transparent)]
    Factorization(#[from] DenseFactorizationError),
    /// Error from settings validation
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
