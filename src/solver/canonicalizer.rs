#![allow(non_snake_case)]

use crate::algebra::utils::{is_permutation, sortperm_by};
use crate::algebra::*;
use crate::solver::{CanonicalizerError, CanonicalizerSettings};
use std::cmp::Ordering;

/// Canonical form of a constraint matrix with a weighted basic/non-basic partition.
///
/// For the stacked matrix `M = [A; J]` the canonicalizer maintains a row
/// transform `R`, a column permutation `Q` and the canonical matrix `C` with
///
/// ```text
///   R·M[:,Q] = C,    C = [ I  S ]   (nb rows, the basic equations)
///                        [ 0  * ]   (dependent rows of A, then rows of J)
/// ```
///
/// where `nb` is the numerical rank of `A`.  Rows of `J` never supply pivots
/// and do not influence which variables become basic: the partition depends
/// on `A` and the weights only, so the basic variables are exactly those
/// determined by `A`.  The rows of `J` are carried through the transform,
/// leaving `Jn - Jb·S` in their non-basic columns, and the rank of that
/// block is reported by
/// [`num_independent_extended_equations`](Self::num_independent_extended_equations).
///
/// Basic variables, and separately non-basic variables, are ordered by
/// non-increasing priority weight, with ties kept in ascending index order.
#[derive(Debug, Clone)]
pub struct Canonicalizer<T> {
    settings: CanonicalizerSettings<T>,
    A: Matrix<T>,
    J: Matrix<T>,
    weights: Vec<T>,
    R: Matrix<T>,
    C: Matrix<T>,
    Q: Vec<usize>,
    nb: usize,
    // rows of A that supplied the pivots, in basic order
    ili: Vec<usize>,
    // rank of the rows of J after elimination
    nj: usize,
}

impl<T> Canonicalizer<T>
where
    T: FloatT,
{
    /// Canonical form of `A` alone, with uniform weights.
    pub fn new(A: &Matrix<T>, settings: CanonicalizerSettings<T>) -> Result<Self, CanonicalizerError> {
        let n = A.ncols();
        Self::with_priority_weights(A, &Matrix::zeros((0, n)), &vec![T::one(); n], settings)
    }

    /// Canonical form of `[A; J]` with the given priority weights.
    ///
    /// Equivalent to [`new`](Self::new) followed by
    /// [`update_with_priority_weights`](Self::update_with_priority_weights),
    /// with a single elimination.
    pub fn with_priority_weights(
        A: &Matrix<T>,
        J: &Matrix<T>,
        weights: &[T],
        settings: CanonicalizerSettings<T>,
    ) -> Result<Self, CanonicalizerError> {
        let (m, n) = A.size();
        if J.ncols() != n || weights.len() != n {
            return Err(CanonicalizerError::IncompatibleDimension);
        }
        if !A.is_finite() || !J.is_finite() || !weights.is_finite() {
            return Err(CanonicalizerError::NonFiniteEntries);
        }
        let mut canon = Self {
            settings,
            A: A.clone(),
            J: J.clone(),
            weights: weights.to_vec(),
            R: Matrix::identity(m),
            C: A.clone(),
            Q: (0..n).collect(),
            nb: 0,
            ili: vec![],
            nj: 0,
        };
        canon.compute()?;
        Ok(canon)
    }

    /// Recompute the canonical form of `[A; J]` using the given priority weights.
    ///
    /// Among the numerically acceptable pivots at each elimination step, the
    /// column of the free variable with the highest weight is taken, with ties
    /// going to the lowest index.
    pub fn update_with_priority_weights(
        &mut self,
        J: &Matrix<T>,
        weights: &[T],
    ) -> Result<(), CanonicalizerError> {
        let n = self.num_variables();
        if J.ncols() != n || weights.len() != n {
            return Err(CanonicalizerError::IncompatibleDimension);
        }
        if !J.is_finite() || !weights.is_finite() {
            return Err(CanonicalizerError::NonFiniteEntries);
        }
        self.J = J.clone();
        self.weights.copy_from(weights);
        self.compute()
    }

    fn compute(&mut self) -> Result<(), CanonicalizerError> {
        let (m, n) = self.A.size();
        let mj = self.J.nrows();

        // numerical rank and a set of independent rows of A
        let lu = LuFactorization::new(&self.A, LuPivoting::Full, self.settings.pivot_tolerance)
            .map_err(|_| CanonicalizerError::NonFiniteEntries)?;
        let rank = lu.rank();
        let mut candidate_row = vec![false; m];
        for &i in &lu.P()[0..rank] {
            candidate_row[i] = true;
        }

        let mut W = Matrix::vcat(&self.A, &self.J)
            .map_err(|_| CanonicalizerError::IncompatibleDimension)?;
        let mut R = Matrix::identity(m + mj);

        let tol = self.settings.pivot_tolerance * self.A.norm_inf();
        let mut free_col = vec![true; n];
        let mut pivots: Vec<(usize, usize)> = Vec::with_capacity(rank);

        for _ in 0..rank {
            let Some((i, j)) = self.select_pivot(&W, &candidate_row, &free_col, tol) else {
                break;
            };
            log::trace!("canonical pivot at row {i}, variable {j}");

            gauss_jordan_pivot(&mut W, &mut R, i, j);
            candidate_row[i] = false;
            free_col[j] = false;
            pivots.push((i, j));
        }

        // basic and non-basic columns, each ordered by decreasing weight
        let by_weight = |a: &T, b: &T| b.partial_cmp(a).unwrap_or(Ordering::Equal);

        let mut basic_cols: Vec<usize> = pivots.iter().map(|&(_, j)| j).collect();
        let mut pivot_row_of = vec![usize::MAX; n];
        pivots.iter().for_each(|&(i, j)| pivot_row_of[j] = i);
        basic_cols.sort_unstable();
        let mut perm = vec![0; basic_cols.len()];
        let wb: Vec<T> = basic_cols.iter().map(|&j| self.weights[j]).collect();
        sortperm_by(&mut perm, &wb, by_weight);
        let basic_cols: Vec<usize> = perm.iter().map(|&k| basic_cols[k]).collect();

        let nonbasic_cols: Vec<usize> = (0..n).filter(|&j| free_col[j]).collect();
        let mut perm = vec![0; nonbasic_cols.len()];
        let wn: Vec<T> = nonbasic_cols.iter().map(|&j| self.weights[j]).collect();
        sortperm_by(&mut perm, &wn, by_weight);
        let nonbasic_cols: Vec<usize> = perm.iter().map(|&k| nonbasic_cols[k]).collect();

        // pivot rows in basic order, then unused rows of A, then rows of J
        let ili: Vec<usize> = basic_cols.iter().map(|&j| pivot_row_of[j]).collect();
        let mut used_row = vec![false; m];
        ili.iter().for_each(|&i| used_row[i] = true);
        let rows: Vec<usize> = ili
            .iter()
            .copied()
            .chain((0..m).filter(|&i| !used_row[i]))
            .chain(m..(m + mj))
            .collect();

        self.Q = basic_cols.into_iter().chain(nonbasic_cols).collect();
        self.C = W.select(&rows, &self.Q);
        self.R = R.permute_rows(&rows);
        self.nb = ili.len();
        self.ili = ili;
        self.nj = self.extended_rank()?;

        log::debug!(
            "canonical form: {} basic, {} non-basic variables, {} of {} equations dependent, {} of {} extended equations independent",
            self.nb,
            n - self.nb,
            m - self.nb,
            m,
            self.nj,
            mj
        );
        Ok(())
    }

    // rank of Jn - Jb·S, each row measured against the size of its row of J
    fn extended_rank(&self) -> Result<usize, CanonicalizerError> {
        let (m, n) = self.A.size();
        let mj = self.J.nrows();
        let nb = self.nb;
        if mj == 0 || nb == n {
            return Ok(0);
        }

        let mut scale = vec![T::zero(); mj];
        self.J.row_norms(&mut scale);
        scale.scalarop(|v| if v > T::zero() { T::recip(v) } else { T::one() });
        let mut E = self.C.block((m, nb), (mj, n - nb));
        E.lscale(&scale);

        let tol = self.settings.pivot_tolerance;
        if E.norm_inf() <= tol {
            return Ok(0);
        }
        let lu = LuFactorization::new(&E, LuPivoting::Full, tol)
            .map_err(|_| CanonicalizerError::NonFiniteEntries)?;
        Ok(lu.rank())
    }

    // highest weight column with an acceptable pivot, and its largest entry
    fn select_pivot(
        &self,
        W: &Matrix<T>,
        candidate_row: &[bool],
        free_col: &[bool],
        tol: T,
    ) -> Option<(usize, usize)> {
        let rows: Vec<usize> = (0..candidate_row.len())
            .filter(|&i| candidate_row[i])
            .collect();

        // largest magnitude in each free column over the candidate rows
        let colmax: Vec<(usize, T)> = (0..W.ncols())
            .filter(|&j| free_col[j])
            .map(|j| {
                let amax = rows
                    .iter()
                    .fold(T::zero(), |acc, &i| T::max(acc, W[(i, j)].abs()));
                (j, amax)
            })
            .collect();

        let amax = colmax.iter().fold(T::zero(), |acc, &(_, a)| T::max(acc, a));
        if amax <= tol || amax == T::zero() {
            return None;
        }
        let accept = self.settings.pivot_threshold * amax;

        let mut best: Option<usize> = None;
        for &(j, a) in &colmax {
            if a < accept {
                continue;
            }
            match best {
                Some(b) if self.weights[j] <= self.weights[b] => {}
                _ => best = Some(j),
            }
        }
        let j = best?;

        let mut ibest = rows[0];
        let mut vbest = T::zero();
        for &i in &rows {
            let v = W[(i, j)].abs();
            if v > vbest {
                vbest = v;
                ibest = i;
            }
        }
        Some((ibest, j))
    }

    /// Zero the entries of `R` and `C` that are below `roundoff_tolerance`
    /// times the largest entry of the respective matrix.
    ///
    /// The identity block of `C` is left untouched, so the partition and
    /// rank never change.
    pub fn clean_residual_roundoff_errors(&mut self) {
        let tolR = self.settings.roundoff_tolerance * self.R.norm_inf();
        let nR = self.R.drop_below(tolR);

        let tolC = self.settings.roundoff_tolerance * self.C.norm_inf();
        let mut nC = 0;
        for j in self.nb..self.C.ncols() {
            for v in self.C.col_slice_mut(j) {
                if *v != T::zero() && v.abs() < tolC {
                    *v = T::zero();
                    nC += 1;
                }
            }
        }
        log::trace!("roundoff cleaning zeroed {nR} entries of R and {nC} entries of C");
    }

    /// Reorder the basic variables by `Kb` and the non-basic variables by `Kn`.
    ///
    /// Basic variable `k` after the call is basic variable `Kb[k]` before
    /// it, and likewise for the non-basic variables.  No elimination is
    /// performed.
    pub fn update_ordering(&mut self, Kb: &[usize], Kn: &[usize]) -> Result<(), CanonicalizerError> {
        let nb = self.nb;
        let nn = self.num_non_basic_variables();
        if Kb.len() != nb || Kn.len() != nn {
            return Err(CanonicalizerError::IncompatibleDimension);
        }
        if !is_permutation(Kb) || !is_permutation(Kn) {
            return Err(CanonicalizerError::InvalidPermutation);
        }

        let nrows = self.R.nrows();
        let rows: Vec<usize> = Kb.iter().copied().chain(nb..nrows).collect();
        let cols: Vec<usize> = Kb
            .iter()
            .copied()
            .chain(Kn.iter().map(|&k| nb + k))
            .collect();

        self.R = self.R.permute_rows(&rows);
        self.C = self.C.select(&rows, &cols);
        self.Q = cols.iter().map(|&k| self.Q[k]).collect();
        self.ili = Kb.iter().map(|&k| self.ili[k]).collect();
        Ok(())
    }

    /// Exchange basic variable `ib` with non-basic variable `inb`.
    ///
    /// Performs one Gauss-Jordan pivot on `S[ib, inb]`.  The entering variable
    /// takes position `ib` among the basic variables and the leaving variable
    /// takes position `inb` among the non-basic ones.
    pub fn swap_basic_variable(&mut self, ib: usize, inb: usize) -> Result<(), CanonicalizerError> {
        let nb = self.nb;
        if ib >= nb {
            return Err(CanonicalizerError::InvalidIndex(ib));
        }
        if inb >= self.num_non_basic_variables() {
            return Err(CanonicalizerError::InvalidIndex(inb));
        }

        // S has unit scale relative to the identity block
        let pivot = self.C[(ib, nb + inb)];
        if pivot.abs() <= self.settings.pivot_tolerance {
            return Err(CanonicalizerError::ZeroPivot);
        }

        gauss_jordan_pivot(&mut self.C, &mut self.R, ib, nb + inb);
        self.C.swap_cols(ib, nb + inb);
        self.Q.swap(ib, nb + inb);
        Ok(())
    }

    pub fn num_variables(&self) -> usize {
        self.A.ncols()
    }

    /// Number of rows of `A`.
    pub fn num_equations(&self) -> usize {
        self.A.nrows()
    }

    /// Number of rows of `J`.
    pub fn num_extended_equations(&self) -> usize {
        self.J.nrows()
    }

    /// Numerical rank of the rows of `J` once the rows of `A` are
    /// eliminated.  Equal to `num_extended_equations()` exactly when the
    /// rows of `J` are linearly independent of each other and of `A`.
    pub fn num_independent_extended_equations(&self) -> usize {
        self.nj
    }

    pub fn num_basic_variables(&self) -> usize {
        self.nb
    }

    pub fn num_non_basic_variables(&self) -> usize {
        self.num_variables() - self.nb
    }

    pub fn indices_basic_variables(&self) -> &[usize] {
        &self.Q[0..self.nb]
    }

    pub fn indices_non_basic_variables(&self) -> &[usize] {
        &self.Q[self.nb..]
    }

    /// Rows of `A` that supplied the basic pivots, in basic order.
    pub fn indices_linearly_independent_rows(&self) -> &[usize] {
        &self.ili
    }

    pub fn weights(&self) -> &[T] {
        &self.weights
    }

    pub fn settings(&self) -> &CanonicalizerSettings<T> {
        &self.settings
    }

    /// Row transform, square of size `num_equations() + num_extended_equations()`.
    pub fn R(&self) -> &Matrix<T> {
        &self.R
    }

    /// Copy of the block `C[0..nb, nb..n]`.
    pub fn S(&self) -> Matrix<T> {
        let nb = self.nb;
        self.C.block((0, nb), (nb, self.num_non_basic_variables()))
    }

    /// Column permutation, basic variables first.
    pub fn Q(&self) -> &[usize] {
        &self.Q
    }

    pub fn C(&self) -> &Matrix<T> {
        &self.C
    }
}

// scale row i so that W[i,j] = 1 and eliminate column j from every other
// row, applying the same row operations to R
fn gauss_jordan_pivot<T: FloatT>(W: &mut Matrix<T>, R: &mut Matrix<T>, i: usize, j: usize) {
    let inv = T::recip(W[(i, j)]);
    W.scale_row(i, inv);
    R.scale_row(i, inv);
    W[(i, j)] = T::one();

    for k in 0..W.nrows() {
        if k == i {
            continue;
        }
        let f = W[(k, j)];
        if f == T::zero() {
            continue;
        }
        W.add_scaled_row(k, i, -f);
        R.add_scaled_row(k, i, -f);
        W[(k, j)] = T::zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stacked(A: &Matrix<f64>, J: &Matrix<f64>) -> Matrix<f64> {
        Matrix::vcat(A, J).unwrap()
    }

    // R·M[:,Q] - C
    fn identity_error(canon: &Canonicalizer<f64>, M: &Matrix<f64>) -> f64 {
        let MQ = M.permute_cols(canon.Q());
        let mut RMQ = Matrix::zeros(canon.C().size());
        RMQ.mul(canon.R(), &MQ, 1.0, 0.0);
        RMQ.data.norm_inf_diff(&canon.C().data)
    }

    fn test_matrix() -> Matrix<f64> {
        Matrix::from(&[
            [1., 2., 0., 1., 3.], //
            [0., 1., 1., 2., 1.], //
            [2., 0., 1., 1., 4.], //
        ])
    }

    #[test]
    fn test_canonical_identity() {
        let A = test_matrix();
        let canon = Canonicalizer::new(&A, CanonicalizerSettings::default()).unwrap();

        assert_eq!(canon.num_basic_variables(), 3);
        assert_eq!(canon.num_non_basic_variables(), 2);
        assert_eq!(canon.num_equations(), 3);
        assert!(identity_error(&canon, &A) < 1e-12);

        let C = canon.C();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((C[(i, j)] - expected).abs() < 1e-14);
            }
        }
        assert_eq!(canon.S().size(), (3, 2));
    }

    #[test]
    fn test_rank_deficient_rows() {
        // third row is a combination of the first two
        let A = Matrix::from(&[
            [1., 2., 0., 1.], //
            [0., 1., 1., 2.], //
            [2., 5., 1., 4.], //
        ]);
        let canon = Canonicalizer::new(&A, CanonicalizerSettings::default()).unwrap();
        assert_eq!(canon.num_basic_variables(), 2);
        assert!(identity_error(&canon, &A) < 1e-12);

        // the dependent row is reduced to zero
        let C = canon.C();
        assert!(C.row(2).norm_inf() < 1e-12);
        assert_eq!(canon.indices_linearly_independent_rows().len(), 2);
    }

    #[test]
    fn test_weight_ordering() {
        let A = test_matrix();
        let weights = [0.5, 2.0, 0.1, 3.0, 2.0];
        let mut canon = Canonicalizer::new(&A, CanonicalizerSettings::default()).unwrap();
        canon
            .update_with_priority_weights(&Matrix::zeros((0, 5)), &weights)
            .unwrap();

        let ib = canon.indices_basic_variables();
        let inb = canon.indices_non_basic_variables();
        assert!(ib.windows(2).all(|w| weights[w[0]] >= weights[w[1]]));
        assert!(inb.windows(2).all(|w| weights[w[0]] >= weights[w[1]]));

        // the heaviest variable is basic, ties in ascending order
        assert_eq!(ib[0], 3);
        assert!(ib.contains(&1) && ib.contains(&4));
        assert!(ib.iter().position(|&j| j == 1) < ib.iter().position(|&j| j == 4));
        assert!(identity_error(&canon, &A) < 1e-12);
    }

    #[test]
    fn test_raised_weight_becomes_basic() {
        let A = Matrix::from(&[[1., 1., 1.]]);
        let mut canon = Canonicalizer::new(&A, CanonicalizerSettings::default()).unwrap();
        let J = Matrix::zeros((0, 3));

        canon.update_with_priority_weights(&J, &[3., 2., 1.]).unwrap();
        assert_eq!(canon.indices_basic_variables(), &[0]);

        canon.update_with_priority_weights(&J, &[3., 2., 10.]).unwrap();
        assert_eq!(canon.indices_basic_variables(), &[2]);
        assert_eq!(canon.indices_non_basic_variables(), &[0, 1]);
    }

    #[test]
    fn test_extended_rows() {
        let A = test_matrix();
        let J = Matrix::from(&[[1., 0., 0., 0., 1.]]);
        let M = stacked(&A, &J);

        let mut canon = Canonicalizer::new(&A, CanonicalizerSettings::default()).unwrap();
        canon
            .update_with_priority_weights(&J, &[1., 1., 1., 1., 1.])
            .unwrap();

        // extended rows never count toward the basis
        assert_eq!(canon.num_basic_variables(), 3);
        assert_eq!(canon.num_extended_equations(), 1);
        assert_eq!(canon.R().size(), (4, 4));
        assert!(identity_error(&canon, &M) < 1e-12);

        // basic entries of the extended row are eliminated
        let C = canon.C();
        for j in 0..3 {
            assert!(C[(3, j)].abs() < 1e-14);
        }
    }

    #[test]
    fn test_with_priority_weights() {
        let A = test_matrix();
        let J = Matrix::from(&[[1., 0., 0., 0., 1.]]);
        let weights = [0.5, 2.0, 0.1, 3.0, 2.0];
        let settings = CanonicalizerSettings::default();

        let canon = Canonicalizer::with_priority_weights(&A, &J, &weights, settings).unwrap();
        let mut updated = Canonicalizer::new(&A, settings).unwrap();
        updated.update_with_priority_weights(&J, &weights).unwrap();

        assert_eq!(canon.Q(), updated.Q());
        assert_eq!(canon.indices_linearly_independent_rows(), updated.indices_linearly_independent_rows());
        assert!(canon.C().data.norm_inf_diff(&updated.C().data) < 1e-14);
        assert!(canon.R().data.norm_inf_diff(&updated.R().data) < 1e-14);
        assert_eq!(canon.num_independent_extended_equations(), 1);

        // the partition is the one of A alone
        let plain =
            Canonicalizer::with_priority_weights(&A, &Matrix::zeros((0, 5)), &weights, settings).unwrap();
        assert_eq!(canon.Q(), plain.Q());

        assert_eq!(
            Canonicalizer::with_priority_weights(&A, &J, &weights[0..4], settings).err(),
            Some(CanonicalizerError::IncompatibleDimension)
        );
        assert_eq!(
            Canonicalizer::with_priority_weights(&A, &Matrix::zeros((1, 4)), &weights, settings).err(),
            Some(CanonicalizerError::IncompatibleDimension)
        );
    }

    #[test]
    fn test_independent_extended_equations() {
        let A = test_matrix();
        let weights = [1.; 5];
        let settings = CanonicalizerSettings::default();
        let count = |J: &Matrix<f64>| {
            Canonicalizer::with_priority_weights(&A, J, &weights, settings)
                .unwrap()
                .num_independent_extended_equations()
        };

        assert_eq!(count(&Matrix::zeros((0, 5))), 0);
        assert_eq!(count(&Matrix::from(&[[1., 0., 0., 0., 1.], [0., 0., 1., 0., 0.]])), 2);

        // a multiple of a row of A and an empty row add nothing
        let J = Matrix::from(&[
            [1., 0., 0., 0., 1.], //
            [2., 4., 0., 2., 6.],
            [0., 0., 0., 0., 0.],
        ]);
        assert_eq!(count(&J), 1);

        // three rows in a two dimensional complement
        let J = Matrix::from(&[
            [1., 0., 0., 0., 1.], //
            [0., 0., 1., 0., 0.],
            [1., 0., 1., 0., 1.],
        ]);
        assert_eq!(count(&J), 2);

        // large rows are measured against their own size
        let J = Matrix::from(&[[1e9, 0., 0., 0., 1e9], [2e-9, 4e-9, 0., 2e-9, 6e-9]]);
        assert_eq!(count(&J), 1);
    }

    #[test]
    fn test_update_ordering() {
        let A = test_matrix();
        let mut canon = Canonicalizer::new(&A, CanonicalizerSettings::default()).unwrap();
        let (R0, S0, Q0) = (canon.R().clone(), canon.S(), canon.Q().to_vec());

        // identity reordering changes nothing
        canon.update_ordering(&[0, 1, 2], &[0, 1]).unwrap();
        assert_eq!(canon.R(), &R0);
        assert_eq!(canon.S(), S0);
        assert_eq!(canon.Q(), &Q0[..]);

        // full reversal
        let Kb = [2, 1, 0];
        let Kn = [1, 0];
        canon.update_ordering(&Kb, &Kn).unwrap();
        assert_eq!(canon.R(), &R0.permute_rows(&Kb));
        assert_eq!(canon.S(), S0.select(&Kb, &Kn));
        assert_eq!(canon.Q(), &[Q0[2], Q0[1], Q0[0], Q0[4], Q0[3]]);
        assert!(identity_error(&canon, &A) < 1e-12);

        assert_eq!(
            canon.update_ordering(&[0, 0, 1], &[0, 1]),
            Err(CanonicalizerError::InvalidPermutation)
        );
        assert_eq!(
            canon.update_ordering(&[0, 1], &[0, 1]),
            Err(CanonicalizerError::IncompatibleDimension)
        );
    }

    #[test]
    fn test_swap_basic_variable() {
        let A = test_matrix();
        let mut canon = Canonicalizer::new(&A, CanonicalizerSettings::default()).unwrap();
        let Q0 = canon.Q().to_vec();

        let S = canon.S();
        let (ib, inb) = (0..3)
            .flat_map(|i| (0..2).map(move |j| (i, j)))
            .find(|&(i, j)| S[(i, j)].abs() > 1e-3)
            .unwrap();

        canon.swap_basic_variable(ib, inb).unwrap();
        assert_eq!(canon.Q()[ib], Q0[3 + inb]);
        assert_eq!(canon.Q()[3 + inb], Q0[ib]);
        assert!(identity_error(&canon, &A) < 1e-12);

        assert_eq!(
            canon.swap_basic_variable(3, 0),
            Err(CanonicalizerError::InvalidIndex(3))
        );
    }

    #[test]
    fn test_clean_roundoff() {
        let A = test_matrix();
        let mut canon = Canonicalizer::new(&A, CanonicalizerSettings::default()).unwrap();
        let nb = canon.num_basic_variables();

        canon.clean_residual_roundoff_errors();
        let (R1, C1) = (canon.R().clone(), canon.C().clone());
        canon.clean_residual_roundoff_errors();
        assert_eq!(canon.R(), &R1);
        assert_eq!(canon.C(), &C1);
        assert_eq!(canon.num_basic_variables(), nb);
        assert!(identity_error(&canon, &A) < 1e-12);
    }

    #[test]
    fn test_errors() {
        let mut A = test_matrix();
        let mut canon = Canonicalizer::new(&A, CanonicalizerSettings::default()).unwrap();
        assert_eq!(
            canon.update_with_priority_weights(&Matrix::zeros((0, 5)), &[1.0; 4]),
            Err(CanonicalizerError::IncompatibleDimension)
        );
        assert_eq!(
            canon.update_with_priority_weights(&Matrix::zeros((0, 5)), &[1., 1., f64::NAN, 1., 1.]),
            Err(CanonicalizerError::NonFiniteEntries)
        );

        A[(0, 0)] = f64::INFINITY;
        assert!(matches!(
            Canonicalizer::new(&A, CanonicalizerSettings::default()),
            Err(CanonicalizerError::NonFiniteEntries)
        ));
    }
}
