#![allow(non_snake_case)]

use std::ops::Index;

use crate::algebra::{MatrixConcatenationError, MatrixShape};

/// Size and orientation queries common to all matrix types and views.
pub trait ShapedMatrix {
    fn size(&self) -> (usize, usize);
    fn shape(&self) -> MatrixShape;
    fn nrows(&self) -> usize {
        self.size().0
    }
    fn ncols(&self) -> usize {
        self.size().1
    }
    fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }
    fn is_empty(&self) -> bool {
        self.nrows() == 0 || self.ncols() == 0
    }
}

//NB: the concrete dense type is just called "Matrix".  The "DenseMatrix" trait
//is implemented on Matrix, Adjoint and BorrowedMatrix types to allow for indexing
//of values in any of those formats.
pub trait DenseMatrix<T>: ShapedMatrix + Index<(usize, usize), Output = T> {
    fn index_linear(&self, idx: (usize, usize)) -> usize;
    fn data(&self) -> &[T];
}

pub trait DenseMatrixMut<T>: DenseMatrix<T> {
    fn data_mut(&mut self) -> &mut [T];
}

/// Blockwise matrix concatenation
pub trait BlockConcatenate: Sized {
    /// horizontal matrix concatenation
    ///
    /// ```text
    /// C = [A B]
    /// ```
    fn hcat(A: &Self, B: &Self) -> Result<Self, MatrixConcatenationError>;

    /// vertical matrix concatenation
    ///
    /// ```text
    /// C = [ A ]
    ///     [ B ]
    /// ```
    fn vcat(A: &Self, B: &Self) -> Result<Self, MatrixConcatenationError>;

    /// general block concatenation, given as a slice of block rows
    ///
    /// ```text
    /// C = [ A B ]
    ///     [ C D ]
    /// ```
    fn hvcat(mats: &[&[&Self]]) -> Result<Self, MatrixConcatenationError>;
}

pub(crate) fn hvcat_dim_check<MAT: ShapedMatrix>(
    mats: &[&[&MAT]],
) -> Result<(), MatrixConcatenationError> {
    // error if no blocks
    if mats.is_empty() || mats[0].is_empty() {
        return Err(MatrixConcatenationError::IncompatibleDimension);
    };

    // error unless every block row has the same number of blocks
    let len0 = mats[0].len();
    if mats.iter().any(|blockrow| blockrow.len() != len0) {
        return Err(MatrixConcatenationError::IncompatibleDimension);
    }

    //row checks
    for blockrow in mats {
        let rows = blockrow[0].nrows();
        if blockrow.iter().any(|mat| mat.nrows() != rows) {
            return Err(MatrixConcatenationError::IncompatibleDimension);
        }
    }

    // column checks
    for (blockcol, topblock) in mats[0].iter().enumerate() {
        let cols = topblock.ncols();
        if mats.iter().any(|matrow| matrow[blockcol].ncols() != cols) {
            return Err(MatrixConcatenationError::IncompatibleDimension);
        }
    }

    Ok(())
}
