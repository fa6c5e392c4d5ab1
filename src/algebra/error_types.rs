use thiserror::Error;

/// Error type returned by matrix concatenation operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixConcatenationError {
    #[error("Incompatible dimensions")]
    /// Indicates inputs have incompatible dimension
    IncompatibleDimension,
}

/// Error type returned by dense factorization routines.
///
/// Numerical rank deficiency is *not* an error.  It is reported through
/// the factorization's rank instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DenseFactorizationError {
    /// Matrix dimensions and/or vector lengths are incompatible
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    /// The input contains NaN or infinite values
    #[error("Matrix or vector contains non-finite entries")]
    NonFiniteEntries,
}
