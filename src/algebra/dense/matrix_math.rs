use crate::algebra::*;

impl<T: FloatT> MatrixMath for Matrix<T> {
    type T = T;

    fn scale(&mut self, c: T) {
        self.data.scale(c);
    }

    fn negate(&mut self) {
        self.data.negate();
    }

    fn norm_inf(&self) -> T {
        self.data.norm_inf()
    }

    fn is_finite(&self) -> bool {
        self.data.is_finite()
    }

    fn lscale(&mut self, l: &[T]) {
        assert_eq!(l.len(), self.nrows());
        let m = self.nrows();
        if m == 0 {
            return;
        }
        for col in self.data.chunks_exact_mut(m) {
            col.hadamard(l);
        }
    }

    fn rscale(&mut self, r: &[T]) {
        assert_eq!(r.len(), self.ncols());
        for (j, &rj) in r.iter().enumerate() {
            self.col_slice_mut(j).scale(rj);
        }
    }

    fn lrscale(&mut self, l: &[T], r: &[T]) {
        self.lscale(l);
        self.rscale(r);
    }

    fn col_norms(&self, norms: &mut [T]) {
        assert_eq!(norms.len(), self.ncols());
        for (j, v) in norms.iter_mut().enumerate() {
            *v = self.col_slice(j).norm_inf();
        }
    }

    fn row_norms(&self, norms: &mut [T]) {
        assert_eq!(norms.len(), self.nrows());
        norms.set(T::zero());
        for j in 0..self.ncols() {
            for (v, a) in norms.iter_mut().zip(self.col_slice(j)) {
                *v = T::max(*v, a.abs());
            }
        }
    }

    fn drop_below(&mut self, threshold: T) -> usize {
        let mut count = 0;
        for v in self.data.iter_mut() {
            if *v != T::zero() && v.abs() < threshold {
                *v = T::zero();
                count += 1;
            }
        }
        count
    }
}

#[test]
fn test_scaling_norms_and_drop() {
    let mut A = Matrix::from(&[
        [1.0, -2.0], //
        [1e-15, 4.0],
    ]);

    assert_eq!(A.norm_inf(), 4.0);
    assert_eq!(A.drop_below(1e-14), 1);
    assert_eq!(A[(1, 0)], 0.0);
    assert_eq!(A.drop_below(1e-14), 0);

    A.lscale(&[2.0, 0.5]);
    assert_eq!(A, Matrix::from(&[[2.0, -4.0], [0.0, 2.0]]));

    let mut norms = [0.0; 2];
    A.col_norms(&mut norms);
    assert_eq!(norms, [2.0, 4.0]);
    A.row_norms(&mut norms);
    assert_eq!(norms, [4.0, 2.0]);

    A.lrscale(&[0.5, 1.0], &[1.0, 0.5]);
    assert_eq!(A, Matrix::from(&[[1.0, -1.0], [0.0, 1.0]]));
    A.rscale(&[-2.0, -1.0]);
    assert_eq!(A, Matrix::from(&[[-2.0, 1.0], [0.0, -1.0]]));
    A.scale(-1.0);
    A.rscale(&[0.5, -1.0]);

    assert_eq!(A, Matrix::from(&[[1.0, 1.0], [0.0, -1.0]]));
    A.negate();
    assert_eq!(A, Matrix::from(&[[-1.0, -1.0], [0.0, 1.0]]));

    A[(0, 0)] = f64::NAN;
    assert!(!A.is_finite());
}
