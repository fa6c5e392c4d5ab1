#![allow(non_snake_case)]

use crate::algebra::{
    hvcat_dim_check, BlockConcatenate, FloatT, Matrix, MatrixConcatenationError, ShapedMatrix,
};

impl<T> BlockConcatenate for Matrix<T>
where
    T: FloatT,
{
    fn hcat(A: &Self, B: &Self) -> Result<Self, MatrixConcatenationError> {
        if A.nrows() != B.nrows() {
            return Err(MatrixConcatenationError::IncompatibleDimension);
        }

        //dimensions for C = [A B];
        let m = A.nrows();
        let n = A.ncols() + B.ncols();
        let mut data = A.data.clone();
        data.extend(&B.data);
        Ok(Self::new((m, n), data))
    }

    fn vcat(A: &Self, B: &Self) -> Result<Self, MatrixConcatenationError> {
        if A.ncols() != B.ncols() {
            return Err(MatrixConcatenationError::IncompatibleDimension);
        }

        //dimensions for C = [A; B];
        let m = A.nrows() + B.nrows();
        let n = A.ncols();
        let mut data = Vec::with_capacity(m * n);

        for col in 0..n {
            data.extend(A.col_slice(col));
            data.extend(B.col_slice(col));
        }
        Ok(Self::new((m, n), data))
    }

    fn hvcat(mats: &[&[&Self]]) -> Result<Self, MatrixConcatenationError> {
        // check for consistent block dimensions
        hvcat_dim_check(mats)?;

        // count total rows and columns along the border
        let nrows = mats.iter().map(|blockrow| blockrow[0].nrows()).sum();
        let ncols = mats[0].iter().map(|topblock| topblock.ncols()).sum();

        let mut data = Vec::with_capacity(nrows * ncols);

        for blockcol in 0..mats[0].len() {
            // every block in a block column has the same width
            for col in 0..mats[0][blockcol].ncols() {
                for blockrow in mats {
                    data.extend(blockrow[blockcol].col_slice(col));
                }
            }
        }
        Ok(Self::new((nrows, ncols), data))
    }
}

#[test]
fn test_dense_concatenate() {
    let A = Matrix::from(&[
        [1., 3.], //
        [2., 4.], //
    ]);
    let B = Matrix::from(&[
        [5., 7.], //
        [6., 8.], //
    ]);

    let C = Matrix::hcat(&A, &B).unwrap();
    let Ctest = Matrix::from(&[
        [1., 3., 5., 7.], //
        [2., 4., 6., 8.], //
    ]);
    assert_eq!(C, Ctest);

    let C = Matrix::vcat(&A, &B).unwrap();
    let Ctest = Matrix::from(&[
        [1., 3.], //
        [2., 4.], //
        [5., 7.], //
        [6., 8.], //
    ]);
    assert_eq!(C, Ctest);

    let Z = Matrix::zeros((2, 1));
    let C = Matrix::hvcat(&[&[&A, &Z], &[&B, &Z]]).unwrap();
    let Ctest = Matrix::from(&[
        [1., 3., 0.], //
        [2., 4., 0.], //
        [5., 7., 0.], //
        [6., 8., 0.], //
    ]);
    assert_eq!(C, Ctest);

    let W = Matrix::zeros((3, 1));
    assert!(Matrix::hcat(&A, &W).is_err());
    assert!(Matrix::hvcat(&[&[&A, &W]]).is_err());
}
