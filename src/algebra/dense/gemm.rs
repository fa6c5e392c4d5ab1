#![allow(non_snake_case)]

use crate::algebra::*;

impl<T> MultiplyGEMM for Matrix<T>
where
    T: FloatT,
{
    type T = T;
    // implements self = C = αA*B + βC
    fn mul<MATA, MATB>(&mut self, A: &MATA, B: &MATB, α: T, β: T) -> &mut Self
    where
        MATA: DenseMatrix<T>,
        MATB: DenseMatrix<T>,
    {
        assert!(A.ncols() == B.nrows() && self.nrows() == A.nrows() && self.ncols() == B.ncols());

        if self.nrows() == 0 || self.ncols() == 0 {
            return self;
        }

        let (m, n) = self.size();
        let k = A.ncols();

        for j in 0..n {
            for i in 0..m {
                let mut acc = T::zero();
                for l in 0..k {
                    acc += A[(i, l)] * B[(l, j)];
                }
                let cij = &mut self[(i, j)];
                *cij = if β == T::zero() {
                    α * acc
                } else {
                    α * acc + β * (*cij)
                };
            }
        }
        self
    }
}

impl<T> Matrix<T>
where
    T: FloatT,
{
    /// Allocating product `A*B`.
    pub fn product<MATA, MATB>(A: &MATA, B: &MATB) -> Self
    where
        MATA: DenseMatrix<T>,
        MATB: DenseMatrix<T>,
    {
        let mut C = Matrix::zeros((A.nrows(), B.ncols()));
        C.mul(A, B, T::one(), T::zero());
        C
    }
}

#[test]
fn test_gemm() {
    let (m, n, k) = (2, 4, 3);
    let a = vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0];
    let b = vec![
        1.0, 5.0, 9.0, 2.0, 6.0, 10.0, 3.0, 7.0, 11.0, 4.0, 8.0, 12.0,
    ];
    let c = vec![2.0, 7.0, 6.0, 2.0, 0.0, 7.0, 4.0, 2.0];

    let A = Matrix::new_from_slice((m, k), &a);
    let B = Matrix::new_from_slice((k, n), &b);
    let mut C = Matrix::<f64>::new_from_slice((m, n), &c);
    C.mul(&A, &B, 1.0, 1.0);

    assert!(C.data() == vec![40.0, 90.0, 50.0, 100.0, 50.0, 120.0, 60.0, 130.0]);

    // transposed multiply
    let mut C = Matrix::<f64>::zeros((n, m));
    C.mul(&B.t(), &A.t(), 1.0, 0.0);

    assert!(C.data() == vec![38.0, 44.0, 50.0, 56.0, 83.0, 98.0, 113.0, 128.0]);
    assert_eq!(C, Matrix::product(&B.t(), &A.t()));
}
