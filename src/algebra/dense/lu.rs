#![allow(non_snake_case)]
use crate::algebra::*;

/// Pivoting rule of [`LuFactorization`].
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LuPivoting {
    /// Largest magnitude in the remaining sub-matrix.
    #[default]
    Full,
    /// Largest magnitude in the current column.  Columns without an
    /// acceptable pivot are deferred to the end.
    Partial,
}

/// Rank revealing LU factorization of a dense `m × n` matrix.
///
/// Computes `A[P,Q] = L·U` with `L` unit lower trapezoidal and `U` upper
/// trapezoidal.  Elimination stops at the first pivot whose magnitude is
/// not above `tolerance` times the largest pivot seen so far, where the
/// largest pivot is seeded with `max|A|`.  The number of accepted pivots
/// is the numerical rank, and the first `rank` entries of `Q()` are
/// linearly independent columns of `A`.
///
/// Rank deficiency is not an error.  [`solve`](LuFactorization::solve)
/// returns a basic solution with the non-pivoted directions set to zero.
///
/// When built with [`new_equilibrated`](LuFactorization::new_equilibrated)
/// the factors are those of the Ruiz equilibrated matrix, and the rank
/// tolerance applies to its pivots.  Badly scaled but nonsingular
/// matrices then keep their full rank.
#[derive(Debug, Clone)]
pub struct LuFactorization<T> {
    // L below the diagonal, U on and above it
    lu: Matrix<T>,
    p: Vec<usize>,
    q: Vec<usize>,
    rank: usize,
    pivoting: LuPivoting,
    tolerance: T,
    equilibrate: Option<EquilibrationSettings<T>>,
    scaling: Option<Equilibration<T>>,
}

impl<T> LuFactorization<T>
where
    T: FloatT,
{
    /// Factorize `A` with the given pivoting rule and relative rank tolerance.
    pub fn new<M>(A: &M, pivoting: LuPivoting, tolerance: T) -> Result<Self, DenseFactorizationError>
    where
        M: DenseMatrix<T>,
    {
        Self::build(A, pivoting, tolerance, None)
    }

    /// Factorize `A` after Ruiz equilibration of its rows and columns.
    pub fn new_equilibrated<M>(
        A: &M,
        pivoting: LuPivoting,
        tolerance: T,
        equilibrate: EquilibrationSettings<T>,
    ) -> Result<Self, DenseFactorizationError>
    where
        M: DenseMatrix<T>,
    {
        Self::build(A, pivoting, tolerance, Some(equilibrate))
    }

    fn build<M>(
        A: &M,
        pivoting: LuPivoting,
        tolerance: T,
        equilibrate: Option<EquilibrationSettings<T>>,
    ) -> Result<Self, DenseFactorizationError>
    where
        M: DenseMatrix<T>,
    {
        let mut lu = Self {
            lu: Matrix::zeros((0, 0)),
            p: vec![],
            q: vec![],
            rank: 0,
            pivoting,
            tolerance,
            equilibrate,
            scaling: None,
        };
        lu.factor(A)?;
        Ok(lu)
    }

    /// Refactorize with a new matrix, keeping pivoting, tolerance and equilibration.
    pub fn factor<M>(&mut self, A: &M) -> Result<(), DenseFactorizationError>
    where
        M: DenseMatrix<T>,
    {
        let (m, n) = A.size();
        self.lu = Matrix::from_fn((m, n), |i, j| A[(i, j)]);

        if !self.lu.is_finite() {
            self.rank = 0;
            self.scaling = None;
            return Err(DenseFactorizationError::NonFiniteEntries);
        }
        self.scaling = self
            .equilibrate
            .map(|settings| Equilibration::ruiz(&mut self.lu, &settings));

        self.p = (0..m).collect();
        self.q = (0..n).collect();
        self.rank = match self.pivoting {
            LuPivoting::Full => self.eliminate_full(),
            LuPivoting::Partial => self.eliminate_partial(),
        };
        Ok(())
    }

    fn eliminate_full(&mut self) -> usize {
        let (m, n) = self.lu.size();
        let mut refmag = self.lu.norm_inf();

        for k in 0..usize::min(m, n) {
            let mut best = (k, k);
            let mut amax = T::zero();
            for j in k..n {
                for i in k..m {
                    let a = self.lu[(i, j)].abs();
                    if a > amax {
                        amax = a;
                        best = (i, j);
                    }
                }
            }
            if amax <= self.tolerance * refmag || amax == T::zero() {
                return k;
            }
            refmag = T::max(refmag, amax);

            self.swap_rows(k, best.0);
            self.swap_cols(k, best.1);
            self.eliminate_step(k);
        }
        usize::min(m, n)
    }

    fn eliminate_partial(&mut self) -> usize {
        let (m, n) = self.lu.size();
        let mut refmag = self.lu.norm_inf();

        // columns in k..ncand are still candidates
        let mut ncand = n;
        let mut k = 0;

        while k < usize::min(m, ncand) {
            let mut ibest = k;
            let mut amax = T::zero();
            for i in k..m {
                let a = self.lu[(i, k)].abs();
                if a > amax {
                    amax = a;
                    ibest = i;
                }
            }

            if amax <= self.tolerance * refmag || amax == T::zero() {
                ncand -= 1;
                self.swap_cols(k, ncand);
                continue;
            }
            refmag = T::max(refmag, amax);

            self.swap_rows(k, ibest);
            self.eliminate_step(k);
            k += 1;
        }
        k
    }

    fn swap_rows(&mut self, i: usize, k: usize) {
        self.lu.swap_rows(i, k);
        self.p.swap(i, k);
    }

    fn swap_cols(&mut self, j: usize, k: usize) {
        self.lu.swap_cols(j, k);
        self.q.swap(j, k);
    }

    // one step of right looking elimination on the pivot (k,k)
    fn eliminate_step(&mut self, k: usize) {
        let (m, n) = self.lu.size();
        let piv = self.lu[(k, k)];

        for i in (k + 1)..m {
            self.lu[(i, k)] /= piv;
        }
        for j in (k + 1)..n {
            let ukj = self.lu[(k, j)];
            if ukj == T::zero() {
                continue;
            }
            for i in (k + 1)..m {
                let lik = self.lu[(i, k)];
                self.lu[(i, j)] -= lik * ukj;
            }
        }
    }

    /// Solve `A x = b` for `x`, with `b` of length `m` and `x` of length `n`.
    ///
    /// When the system is rank deficient but consistent, `x` is a particular
    /// solution.  When it is inconsistent, the equations that did not supply
    /// a pivot are not satisfied.
    pub fn solve(&self, b: &[T], x: &mut [T]) -> Result<(), DenseFactorizationError> {
        let (m, n) = self.size();
        if b.len() != m || x.len() != n {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }
        if !b.is_finite() {
            return Err(DenseFactorizationError::NonFiniteEntries);
        }

        let r = self.rank;
        let mut c: Vec<T> = match &self.scaling {
            Some(equil) => self.p.iter().map(|&i| b[i] * equil.e[i]).collect(),
            None => self.p.iter().map(|&i| b[i]).collect(),
        };

        // forward substitution with unit L, pivot rows only
        for i in 0..r {
            let mut ci = c[i];
            for k in 0..i {
                ci -= self.lu[(i, k)] * c[k];
            }
            c[i] = ci;
        }

        // back substitution with the leading r × r block of U
        for i in (0..r).rev() {
            let mut ci = c[i];
            for k in (i + 1)..r {
                ci -= self.lu[(i, k)] * c[k];
            }
            c[i] = ci / self.lu[(i, i)];
        }

        x.set(T::zero());
        for k in 0..r {
            x[self.q[k]] = c[k];
        }
        if let Some(equil) = &self.scaling {
            x.hadamard(&equil.d);
        }
        Ok(())
    }

    /// Solve `A x = b` in place for square `A`.
    pub fn solve_in_place(&self, b: &mut [T]) -> Result<(), DenseFactorizationError> {
        let (m, n) = self.size();
        if m != n {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }
        let rhs = b.to_vec();
        self.solve(&rhs, b)
    }

    /// Numerical rank.
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn is_rank_deficient(&self) -> bool {
        let (m, n) = self.size();
        self.rank < usize::min(m, n)
    }

    /// Row permutation.  Row `k` of the factorization is row `P()[k]` of `A`.
    pub fn P(&self) -> &[usize] {
        &self.p
    }

    /// Column permutation.  The first `rank()` entries are independent columns.
    pub fn Q(&self) -> &[usize] {
        &self.q
    }

    pub fn size(&self) -> (usize, usize) {
        self.lu.size()
    }

    pub fn pivoting(&self) -> LuPivoting {
        self.pivoting
    }

    /// Row and column scalings applied before elimination, if any.
    pub fn equilibration(&self) -> Option<&Equilibration<T>> {
        self.scaling.as_ref()
    }
}

macro_rules! generate_test_lu {
    ($fxx:ty, $test_name:ident, $test_rank:ident) => {
        #[test]
        fn $test_name() {
            let A = Matrix::<$fxx>::from(&[
                [3., 2., 4.], //
                [2., 0., 2.], //
                [4., 2., 3.], //
            ]);
            let b: Vec<$fxx> = vec![-5., -2., -2.];
            let xsol: Vec<$fxx> = vec![1., 0., -2.];

            for pivoting in [LuPivoting::Full, LuPivoting::Partial] {
                let lu = LuFactorization::new(&A, pivoting, (1e-5).as_T()).unwrap();
                assert_eq!(lu.rank(), 3);
                assert!(!lu.is_rank_deficient());

                let mut x = vec![0.; 3];
                lu.solve(&b, &mut x).unwrap();
                assert!(x.norm_inf_diff(&xsol) < (1e-5).as_T());

                let mut x = b.clone();
                lu.solve_in_place(&mut x).unwrap();
                assert!(x.norm_inf_diff(&xsol) < (1e-5).as_T());
            }
        }

        #[test]
        fn $test_rank() {
            // third row is the sum of the first two, middle column is zero
            let A = Matrix::<$fxx>::from(&[
                [1., 0., 2., 1.], //
                [2., 0., 1., 3.], //
                [3., 0., 3., 4.], //
            ]);
            let xtrue: Vec<$fxx> = vec![1., 5., -1., 2.];
            let mut b = vec![0.; 3];
            A.gemv(&xtrue, &mut b, 1., 0.);

            for pivoting in [LuPivoting::Full, LuPivoting::Partial] {
                let lu = LuFactorization::new(&A, pivoting, (1e-5).as_T()).unwrap();
                assert_eq!(lu.rank(), 2);
                assert!(lu.is_rank_deficient());
                assert!(!lu.Q()[0..2].contains(&1));

                let mut x = vec![0.; 4];
                lu.solve(&b, &mut x).unwrap();

                // basic solution: the non pivoted columns get zero
                for &j in &lu.Q()[2..] {
                    assert_eq!(x[j], 0.);
                }
                let mut r = b.clone();
                A.gemv(&x, &mut r, 1., -1.);
                assert!(r.norm_inf() < (1e-4).as_T());
            }
        }
    };
}

generate_test_lu!(f32, test_lu_f32, test_lu_rank_f32);
generate_test_lu!(f64, test_lu_f64, test_lu_rank_f64);

#[test]
fn test_lu_errors() {
    let mut A = Matrix::<f64>::identity(3);
    let lu = LuFactorization::new(&A, LuPivoting::Full, 1e-12).unwrap();

    let mut x = vec![0.; 2];
    assert_eq!(
        lu.solve(&[1., 2., 3.], &mut x),
        Err(DenseFactorizationError::IncompatibleDimension)
    );
    let mut x = vec![0.; 3];
    assert_eq!(
        lu.solve(&[1., f64::NAN, 3.], &mut x),
        Err(DenseFactorizationError::NonFiniteEntries)
    );

    A[(1, 1)] = f64::INFINITY;
    assert!(matches!(
        LuFactorization::new(&A, LuPivoting::Partial, 1e-12),
        Err(DenseFactorizationError::NonFiniteEntries)
    ));

    let Z = Matrix::<f64>::zeros((2, 3));
    let lu = LuFactorization::new(&Z, LuPivoting::Partial, 1e-12).unwrap();
    assert_eq!(lu.rank(), 0);
    assert!(lu.solve_in_place(&mut [0., 0.]).is_err());
}

#[test]
fn test_lu_equilibrated_keeps_rank() {
    // nonsingular, with a Schur complement far below the largest entry
    let A = Matrix::<f64>::from(&[
        [1e10, 1.0, 1.0], //
        [1.0, 1e10, 2.0],
        [1.0, 2.0, 0.0],
    ]);
    let xtrue = vec![1.0, -2.0, 3.0];
    let mut b = vec![0.; 3];
    A.gemv(&xtrue, &mut b, 1., 0.);

    let settings = EquilibrationSettings {
        max_iter: 10,
        min_scaling: 1e-4,
        max_scaling: 1e4,
    };

    for pivoting in [LuPivoting::Full, LuPivoting::Partial] {
        let plain = LuFactorization::new(&A, pivoting, 1e-12).unwrap();
        assert_eq!(plain.rank(), 2);
        assert!(plain.equilibration().is_none());

        let lu = LuFactorization::new_equilibrated(&A, pivoting, 1e-12, settings).unwrap();
        assert_eq!(lu.rank(), 3);
        assert!(lu.equilibration().is_some());

        let mut x = vec![0.; 3];
        lu.solve(&b, &mut x).unwrap();
        assert!(x.norm_inf_diff(&xtrue) < 1e-8);
    }

    // scaling does not hide a dependent row
    let mut D = A.clone();
    for j in 0..3 {
        D[(2, j)] = 1e-6 * A[(0, j)] + 2.0 * A[(1, j)];
    }
    let lu = LuFactorization::new_equilibrated(&D, LuPivoting::Full, 1e-12, settings).unwrap();
    assert_eq!(lu.rank(), 2);
}
