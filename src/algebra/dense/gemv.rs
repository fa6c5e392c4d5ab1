#![allow(non_snake_case)]

use crate::algebra::*;
use itertools::izip;

impl<S, T> MultiplyGEMV for DenseStorageMatrix<S, T>
where
    S: AsRef<[T]>,
    T: FloatT,
{
    type T = T;
    // implements y = αA*x + βy
    fn gemv(&self, x: &[T], y: &mut [T], α: T, β: T) {
        let (m, n) = self.size();
        assert!(x.len() == n && y.len() == m);

        if β == T::zero() {
            y.set(T::zero());
        } else {
            y.scale(β);
        }
        if α == T::zero() || m == 0 {
            return;
        }

        // column oriented sweep over the storage
        for (col, &xj) in izip!(self.data().chunks_exact(m), x) {
            let c = α * xj;
            if c == T::zero() {
                continue;
            }
            for (yi, &aij) in izip!(y.iter_mut(), col) {
                *yi += c * aij;
            }
        }
    }
}

impl<S, T> MultiplyGEMV for Adjoint<'_, DenseStorageMatrix<S, T>>
where
    S: AsRef<[T]>,
    T: FloatT,
{
    type T = T;
    // implements y = αA'*x + βy
    fn gemv(&self, x: &[T], y: &mut [T], α: T, β: T) {
        let (m, n) = self.src.size();
        assert!(x.len() == m && y.len() == n);

        if m == 0 {
            y.scale(β);
            return;
        }

        // each output is a dot product with a column of the source
        for (yj, col) in izip!(y.iter_mut(), self.src.data().chunks_exact(m)) {
            let ax = α * col.dot(x);
            *yj = if β == T::zero() { ax } else { ax + β * (*yj) };
        }
    }
}

#[test]
fn test_gemv() {
    let (m, n) = (2, 3);
    let a = vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0];
    let A = Matrix::new_from_slice((m, n), &a);

    let x = vec![1., 2., 3.];
    let mut y = vec![-1., -2.];
    A.gemv(&x, &mut y, 2.0, 3.0);
    assert!(y == [25.0, 58.0]);

    let x = vec![1., 2.];
    let mut y = vec![-1., -2., -3.];
    A.t().gemv(&x, &mut y, 2.0, 3.0);
    assert!(y == [15.0, 18.0, 21.0]);

    // borrowed storage gives the same product
    let B = BorrowedMatrix::from_slice(&a, m, n);
    let x = vec![1., 2., 3.];
    let mut y = vec![0., 0.];
    B.gemv(&x, &mut y, 1.0, 0.0);
    assert!(y == [14.0, 32.0]);
}
