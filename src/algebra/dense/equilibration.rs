#![allow(non_snake_case)]
use crate::algebra::*;

/// Limits of the Ruiz equilibration applied before a factorization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquilibrationSettings<T> {
    /// number of scaling passes
    pub max_iter: u32,
    /// row and column norms below this are left unscaled
    pub min_scaling: T,
    /// row and column norms above this are treated as this value
    pub max_scaling: T,
}

/// Data from the Ruiz equilibration procedure.
///
/// The equilibrated matrix is `Diagonal(e)*A*Diagonal(d)`, so that
/// `A·x = b` is solved as `x = Diagonal(d)·y` with
/// `(Diagonal(e)*A*Diagonal(d))·y = Diagonal(e)·b`.
#[derive(Debug, Clone, PartialEq)]
pub struct Equilibration<T> {
    /// Vector of column scaling terms
    pub d: Vec<T>,
    /// Vector of row scaling terms
    pub e: Vec<T>,
}

impl<T> Equilibration<T>
where
    T: FloatT,
{
    /// Identity scaling for an `m × n` matrix.
    pub fn new(m: usize, n: usize) -> Self {
        Self {
            d: vec![T::one(); n],
            e: vec![T::one(); m],
        }
    }

    /// Equilibrate `A` in place, returning the accumulated scalings.
    ///
    /// Each pass scales every row and column by the inverse square root
    /// of its infinity norm, so that all norms approach one.
    pub fn ruiz(A: &mut Matrix<T>, settings: &EquilibrationSettings<T>) -> Self {
        let (m, n) = A.size();
        let mut equil = Self::new(m, n);

        let mut dwork = vec![T::one(); n];
        let mut ework = vec![T::one(); m];
        let (scale_min, scale_max) = (settings.min_scaling, settings.max_scaling);

        for _ in 0..settings.max_iter {
            A.col_norms(&mut dwork);
            A.row_norms(&mut ework);

            dwork.scalarop(|x| limit_scaling(x, scale_min, scale_max));
            ework.scalarop(|x| limit_scaling(x, scale_min, scale_max));

            dwork.rsqrt();
            ework.rsqrt();

            A.lrscale(&ework, &dwork);
            equil.d.hadamard(&dwork);
            equil.e.hadamard(&ework);
        }
        equil
    }
}

fn limit_scaling<T: FloatT>(s: T, minval: T, maxval: T) -> T {
    if s < minval {
        T::one()
    } else if s > maxval {
        maxval
    } else {
        s
    }
}

#[test]
fn test_ruiz_balances_norms() {
    let settings = EquilibrationSettings {
        max_iter: 20,
        min_scaling: 1e-8,
        max_scaling: 1e8,
    };
    let A = Matrix::<f64>::from(&[
        [1e6, 2.0, 0.0], //
        [3.0, 1e-3, 0.0],
        [0.0, 1.0, 0.0],
    ]);

    let mut B = A.clone();
    let equil = Equilibration::ruiz(&mut B, &settings);

    // B = E·A·D, and the empty column keeps unit scaling
    for j in 0..3 {
        for i in 0..3 {
            let expected = equil.e[i] * A[(i, j)] * equil.d[j];
            assert!((B[(i, j)] - expected).abs() <= 1e-12 * expected.abs());
        }
    }
    assert_eq!(equil.d[2], 1.0);

    let mut norms: Vec<f64> = vec![0.0; 3];
    B.row_norms(&mut norms);
    assert!(norms.iter().all(|&v| (v - 1.0).abs() < 1e-3));
    B.col_norms(&mut norms);
    assert!(norms[0..2].iter().all(|&v| (v - 1.0).abs() < 1e-3));
}

#[test]
fn test_ruiz_scaling_limits() {
    let settings = EquilibrationSettings {
        max_iter: 1,
        min_scaling: 1e-4,
        max_scaling: 1e4,
    };
    let mut A = Matrix::from(&[
        [1e8, 0.0], //
        [0.0, 1e-6],
    ]);
    let equil = Equilibration::ruiz(&mut A, &settings);

    // norms are clipped to 1e4 from above and reset to one below 1e-4
    assert_eq!(equil.d, vec![1e-2, 1.0]);
    assert_eq!(equil.e, vec![1e-2, 1.0]);
    assert_eq!(A[(0, 0)], 1e4);
    assert_eq!(A[(1, 1)], 1e-6);
}
