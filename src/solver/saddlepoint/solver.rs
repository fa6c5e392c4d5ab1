#![allow(non_snake_case)]

use super::*;
use crate::algebra::*;
use crate::solver::{
    Canonicalizer, SaddlePointError, SaddlePointMethod, SaddlePointSettings,
};

/// Lifecycle of a [`SaddlePointSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaddlePointState {
    Uninitialized,
    Canonicalized,
    Decomposed,
    RhsAssembled,
    Solved,
}

/// Outcome of a solve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Relative residual within `residual_tolerance`
    Solved,
    /// Relative residual above `residual_tolerance`
    InaccurateResidual,
}

/// Diagnostics of a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaddlePointSolveInfo<T> {
    pub status: SolveStatus,
    /// `‖M·s - r‖ / ‖r‖`, or the absolute residual norm when `r = 0`
    pub residual: T,
    pub refinement_iterations: u32,
}

/// Solver for saddle point systems `M·s = r` with
///
/// ```text
///     | Hxx  Hxp  Axᵀ  Jxᵀ |       | x |
/// M = | Vpx  Vpp   0    0  |   s = | p |
///     | Ax   Ap    0    0  |       | y |
///     | Jx   Jp    0    0  |       | z |
/// ```
///
/// The constraint blocks `Ax` and `Ap` are fixed on construction.  Each
/// iteration calls [`canonicalize`](Self::canonicalize) with the remaining
/// blocks, then [`decompose`](Self::decompose), then any number of
/// [`rhs`](Self::rhs) and [`solve`](Self::solve) pairs against the same
/// factorization.
///
/// ```
/// use saddlepoint::algebra::*;
/// use saddlepoint::solver::*;
///
/// let dims = SaddlePointDims::new(2, 0, 1, 0);
/// let Ax = Matrix::<f64>::from(&[[1., 1.]]);
/// let Ap = Matrix::zeros((1, 0));
/// let mut solver = SaddlePointSolver::new(dims, &Ax, &Ap, SaddlePointSettings::default()).unwrap();
///
/// let Hxx = Matrix::from(&[[2., 0.], [0., 2.]]);
/// let (Hxp, Vpx, Vpp) = (Matrix::zeros((2, 0)), Matrix::zeros((0, 2)), Matrix::zeros((0, 0)));
/// let (Jx, Jp) = (Matrix::zeros((0, 2)), Matrix::zeros((0, 0)));
/// let blocks = SaddlePointBlocks { Hxx: &Hxx, Hxp: &Hxp, Vpx: &Vpx, Vpp: &Vpp, Jx: &Jx, Jp: &Jp };
///
/// solver.canonicalize(&blocks, &[], &[1., 1.]).unwrap();
/// solver.decompose().unwrap();
/// solver.rhs(&SaddlePointRhs::Direct { ax: &[0., 0.], ap: &[], ay: &[2.], az: &[] }).unwrap();
///
/// let (mut x, mut y) = (vec![0f64; 2], vec![0f64; 1]);
/// let info = solver.solve(&mut x, &mut [], &mut y, &mut []).unwrap();
/// assert_eq!(info.status, SolveStatus::Solved);
/// assert!((x[0] - 1.).abs() < 1e-12 && (y[0] + 2.).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SaddlePointSolver<T: FloatT> {
    dims: SaddlePointDims,
    settings: SaddlePointSettings<T>,
    Ax: Matrix<T>,
    Ap: Matrix<T>,
    state: SaddlePointState,
    matrix: Option<SaddlePointMatrix<T>>,
    canonicalizer: Option<Canonicalizer<T>>,
    factors: Option<SaddlePointFactors<T>>,
    rhs: Option<SaddlePointVector<T>>,
    // solution and refinement workspace
    sol: SaddlePointVector<T>,
    work1: SaddlePointVector<T>,
    work2: SaddlePointVector<T>,
}

impl<T> SaddlePointSolver<T>
where
    T: FloatT,
{
    pub fn new(
        dims: SaddlePointDims,
        Ax: &Matrix<T>,
        Ap: &Matrix<T>,
        settings: SaddlePointSettings<T>,
    ) -> Result<Self, SaddlePointError> {
        settings.validate()?;
        if Ax.size() != (dims.ny, dims.nx) || Ap.size() != (dims.ny, dims.np) {
            return Err(SaddlePointError::IncompatibleDimension);
        }
        if !Ax.is_finite() || !Ap.is_finite() {
            return Err(SaddlePointError::NonFiniteEntries);
        }

        Ok(Self {
            dims,
            settings,
            Ax: Ax.clone(),
            Ap: Ap.clone(),
            state: SaddlePointState::Uninitialized,
            matrix: None,
            canonicalizer: None,
            factors: None,
            rhs: None,
            sol: SaddlePointVector::new(dims),
            work1: SaddlePointVector::new(dims),
            work2: SaddlePointVector::new(dims),
        })
    }

    /// Replace the settings.  Existing factors are discarded when the
    /// strategy or the factorization settings change.
    pub fn set_settings(&mut self, settings: SaddlePointSettings<T>) -> Result<(), SaddlePointError> {
        settings.validate()?;
        let refactor = settings.method != self.settings.method
            || settings.lu_pivoting != self.settings.lu_pivoting
            || settings.lu_rank_tolerance != self.settings.lu_rank_tolerance
            || settings.lu_equilibration() != self.settings.lu_equilibration();
        self.settings = settings;

        if refactor && self.factors.is_some() {
            self.factors = None;
            self.rhs = None;
            self.state = SaddlePointState::Canonicalized;
        }
        Ok(())
    }

    pub fn settings(&self) -> &SaddlePointSettings<T> {
        &self.settings
    }

    pub fn dims(&self) -> SaddlePointDims {
        self.dims
    }

    pub fn state(&self) -> SaddlePointState {
        self.state
    }

    /// Set up the blocks of the current iterate.
    ///
    /// Builds the canonical form of `[Ax; Jx]` restricted to the free
    /// variables using the priority `weights` (one per variable in `x`),
    /// and prepares the treatment of the fixed variables `ifixed`.  Any
    /// previous factorization and right hand side are discarded.
    pub fn canonicalize(
        &mut self,
        blocks: &SaddlePointBlocks<'_, T>,
        ifixed: &[usize],
        weights: &[T],
    ) -> Result<(), SaddlePointError> {
        self.factors = None;
        self.rhs = None;
        self.matrix = None;
        self.canonicalizer = None;
        self.state = SaddlePointState::Uninitialized;

        let SaddlePointDims { nx, np, ny, nz } = self.dims;
        if weights.len() != nx {
            return Err(SaddlePointError::IncompatibleDimension);
        }
        if !weights.is_finite() {
            return Err(SaddlePointError::NonFiniteEntries);
        }

        let matrix = SaddlePointMatrix::new(self.dims, blocks, &self.Ax, &self.Ap, ifixed)?;
        let free = matrix.indices_free_variables();

        let yrows: Vec<usize> = (0..ny).collect();
        let zrows: Vec<usize> = (0..nz).collect();
        let Af = self.Ax.select(&yrows, free);
        let Jf = blocks.Jx.select(&zrows, free);
        let wf: Vec<T> = free.iter().map(|&i| weights[i]).collect();

        let mut canonicalizer = Canonicalizer::with_priority_weights(
            &Af,
            &Jf,
            &wf,
            self.settings.canonicalizer_settings(),
        )?;
        if self.settings.clean_roundoff_enable {
            canonicalizer.clean_residual_roundoff_errors();
        }

        let nb = canonicalizer.num_basic_variables();
        let nj = canonicalizer.num_independent_extended_equations();
        log::debug!(
            "canonicalize: nx = {nx}, fixed = {}, basic = {nb}, non-basic = {}, dependent rows = {}",
            ifixed.len(),
            canonicalizer.num_non_basic_variables(),
            ny - nb
        );

        if np > 0 && nb < ny {
            return Err(SaddlePointError::UnsupportedDegeneracy { rank: nb, ny });
        }
        // J rows must add nz to the rank of A over the free variables
        if nj < nz {
            return Err(SaddlePointError::DependentExtendedRows {
                rank: nb + nj,
                rows: ny + nz,
            });
        }

        self.matrix = Some(matrix);
        self.canonicalizer = Some(canonicalizer);
        self.state = SaddlePointState::Canonicalized;
        Ok(())
    }

    /// Factorize with the strategy selected in the settings.
    pub fn decompose(&mut self) -> Result<(), SaddlePointError> {
        let (Some(matrix), Some(canonicalizer)) = (&self.matrix, &self.canonicalizer) else {
            return Err(SaddlePointError::NotCanonicalized);
        };
        self.factors = None;
        self.rhs = None;
        self.state = SaddlePointState::Canonicalized;

        let settings = &self.settings;
        let factors: SaddlePointFactors<T> = match settings.method {
            SaddlePointMethod::Fullspace => FullspaceFactors::new(matrix, settings)?.into(),
            SaddlePointMethod::Nullspace => {
                NullspaceFactors::new(matrix, canonicalizer, settings)?.into()
            }
            SaddlePointMethod::Rangespace => RangespaceFactors::new(matrix, settings)?.into(),
        };

        log::debug!(
            "decompose: {:?}, reduced size = {}, rank = {}",
            settings.method,
            factors.reduced_size(),
            factors.rank()
        );

        self.factors = Some(factors);
        self.state = SaddlePointState::Decomposed;
        Ok(())
    }

    /// Assemble the right hand side for the next solve.
    pub fn rhs(&mut self, rhs: &SaddlePointRhs<'_, T>) -> Result<(), SaddlePointError> {
        let Some(matrix) = &self.matrix else {
            return Err(SaddlePointError::NotCanonicalized);
        };
        if self.factors.is_none() {
            return Err(SaddlePointError::NotDecomposed);
        }

        // a failed assembly leaves no rhs behind
        let mut r = self.rhs.take().unwrap_or_else(|| SaddlePointVector::new(self.dims));
        if let Err(e) = rhs.assemble(matrix, &mut r) {
            self.state = SaddlePointState::Decomposed;
            return Err(e);
        }
        self.rhs = Some(r);
        self.state = SaddlePointState::RhsAssembled;
        Ok(())
    }

    /// Solve for the last assembled right hand side, writing into `x, p, y, z`.
    pub fn solve(
        &mut self,
        x: &mut [T],
        p: &mut [T],
        y: &mut [T],
        z: &mut [T],
    ) -> Result<SaddlePointSolveInfo<T>, SaddlePointError> {
        let SaddlePointDims { nx, np, ny, nz } = self.dims;
        if x.len() != nx || p.len() != np || y.len() != ny || z.len() != nz {
            return Err(SaddlePointError::IncompatibleDimension);
        }

        let info = self.solve_internal()?;

        x.copy_from(self.sol.x());
        p.copy_from(self.sol.p());
        y.copy_from(self.sol.y());
        z.copy_from(self.sol.z());
        self.state = SaddlePointState::Solved;
        Ok(info)
    }

    // solves into self.sol for the assembled rhs
    fn solve_internal(&mut self) -> Result<SaddlePointSolveInfo<T>, SaddlePointError> {
        let Some(matrix) = &self.matrix else {
            return Err(SaddlePointError::NotCanonicalized);
        };
        let Some(factors) = &self.factors else {
            return Err(SaddlePointError::NotDecomposed);
        };
        let Some(r) = &self.rhs else {
            return Err(SaddlePointError::MissingRhs);
        };

        factors.solve(matrix, r, &mut self.sol)?;
        pin_fixed_variables(matrix, r, &mut self.sol);

        let mut refinement_iterations = 0;
        if self.settings.iterative_refinement_enable {
            refinement_iterations = iterative_refinement(
                &self.settings,
                factors,
                matrix,
                r,
                &mut self.sol,
                &mut self.work1,
                &mut self.work2,
            )?;
        }

        // relative residual ‖M·s - r‖/‖r‖
        let e = &mut self.work1;
        let normr = r.data.norm();
        get_refine_error(e, r, matrix, &self.sol);
        let norme = e.data.norm();
        let residual = if normr > T::zero() { norme / normr } else { norme };

        let status = if residual <= self.settings.residual_tolerance {
            SolveStatus::Solved
        } else {
            log::warn!(
                "saddle point solve with {:?} has relative residual {:e}",
                self.settings.method,
                residual
            );
            SolveStatus::InaccurateResidual
        };

        Ok(SaddlePointSolveInfo {
            status,
            residual,
            refinement_iterations,
        })
    }

    /// Solve against the columns of derivative matrices with the current factorization.
    ///
    /// Column `k` of each of `dax` (nx × nc), `dap` (np × nc), `day` (ny × nc)
    /// and `daz` (nz × nc) forms one right hand side in direct form.  Returns
    /// the solutions as `(dx, dp, dy, dz)` with matching column layout.  The
    /// last assembled right hand side is left unchanged.
    #[allow(clippy::type_complexity)]
    pub fn sensitivities(
        &mut self,
        dax: &Matrix<T>,
        dap: &Matrix<T>,
        day: &Matrix<T>,
        daz: &Matrix<T>,
    ) -> Result<(Matrix<T>, Matrix<T>, Matrix<T>, Matrix<T>), SaddlePointError> {
        let SaddlePointDims { nx, np, ny, nz } = self.dims;
        let nc = dax.ncols();
        if dax.nrows() != nx
            || dap.size() != (np, nc)
            || day.size() != (ny, nc)
            || daz.size() != (nz, nc)
        {
            return Err(SaddlePointError::IncompatibleDimension);
        }

        let mut dx = Matrix::zeros((nx, nc));
        let mut dp = Matrix::zeros((np, nc));
        let mut dy = Matrix::zeros((ny, nc));
        let mut dz = Matrix::zeros((nz, nc));

        let saved = self.rhs.take();
        let state = self.state;

        let mut result = Ok(());
        for k in 0..nc {
            let rhs = SaddlePointRhs::Direct {
                ax: dax.col_slice(k),
                ap: dap.col_slice(k),
                ay: day.col_slice(k),
                az: daz.col_slice(k),
            };
            result = self
                .rhs(&rhs)
                .and_then(|_| self.solve_internal().map(|_| ()));
            if result.is_err() {
                break;
            }
            dx.col_slice_mut(k).copy_from(self.sol.x());
            dp.col_slice_mut(k).copy_from(self.sol.p());
            dy.col_slice_mut(k).copy_from(self.sol.y());
            dz.col_slice_mut(k).copy_from(self.sol.z());
        }

        self.rhs = saved;
        self.state = state;
        result?;
        Ok((dx, dp, dy, dz))
    }

    /// Blocks of the current iterate, once canonicalized.
    pub fn matrix(&self) -> Option<&SaddlePointMatrix<T>> {
        self.matrix.as_ref()
    }

    /// Canonical form over the free variables, once canonicalized.
    pub fn canonicalizer(&self) -> Option<&Canonicalizer<T>> {
        self.canonicalizer.as_ref()
    }

    /// Current factorization, once decomposed.
    pub fn factors(&self) -> Option<&SaddlePointFactors<T>> {
        self.factors.as_ref()
    }

    /// Basic variables as indices into `x`, in canonical order.
    pub fn indices_basic_variables(&self) -> Vec<usize> {
        self.global_indices(|c| c.indices_basic_variables())
    }

    /// Non-basic free variables as indices into `x`, in canonical order.
    pub fn indices_non_basic_variables(&self) -> Vec<usize> {
        self.global_indices(|c| c.indices_non_basic_variables())
    }

    fn global_indices(&self, f: impl Fn(&Canonicalizer<T>) -> &[usize]) -> Vec<usize> {
        match (&self.matrix, &self.canonicalizer) {
            (Some(matrix), Some(canonicalizer)) => {
                let free = matrix.indices_free_variables();
                f(canonicalizer).iter().map(|&k| free[k]).collect()
            }
            _ => vec![],
        }
    }
}

// fixed entries of x are exactly those of the direct form rhs
fn pin_fixed_variables<T: FloatT>(
    matrix: &SaddlePointMatrix<T>,
    r: &SaddlePointVector<T>,
    s: &mut SaddlePointVector<T>,
) {
    let (sx, _, _, _) = s.blocks_mut();
    for &i in matrix.indices_fixed_variables() {
        sx[i] = r.x()[i];
    }
}

fn iterative_refinement<T: FloatT>(
    settings: &SaddlePointSettings<T>,
    factors: &SaddlePointFactors<T>,
    matrix: &SaddlePointMatrix<T>,
    b: &SaddlePointVector<T>,
    x: &mut SaddlePointVector<T>,
    e: &mut SaddlePointVector<T>,
    dx: &mut SaddlePointVector<T>,
) -> Result<u32, SaddlePointError> {
    // iterative refinement params
    let reltol = settings.iterative_refinement_reltol;
    let abstol = settings.iterative_refinement_abstol;
    let maxiter = settings.iterative_refinement_max_iter;
    let stopratio = settings.iterative_refinement_stop_ratio;

    let normb = b.data.norm_inf();

    //compute the initial error
    let mut norme = get_refine_error(e, b, matrix, x);
    let mut iterations = 0;

    for _ in 0..maxiter {
        // bail on numerical error
        if !norme.is_finite() || norme <= (abstol + reltol * normb) {
            break;
        }
        let lastnorme = norme;

        //make a refinement
        factors.solve(matrix, e, dx)?;
        // the fixed rows of M are exact
        pin_zero_fixed(matrix, dx);

        //prospective solution is x + dx
        dx.data.axpby(T::one(), &x.data, T::one());
        norme = get_refine_error(e, b, matrix, dx);
        iterations += 1;

        let improved_ratio = lastnorme / norme;
        if improved_ratio < stopratio {
            //insufficient improvement.  Exit
            if improved_ratio > T::one() {
                std::mem::swap(x, dx);
            }
            break;
        }
        std::mem::swap(x, dx);
    }
    Ok(iterations)
}

fn pin_zero_fixed<T: FloatT>(matrix: &SaddlePointMatrix<T>, dx: &mut SaddlePointVector<T>) {
    let (sx, _, _, _) = dx.blocks_mut();
    for &i in matrix.indices_fixed_variables() {
        sx[i] = T::zero();
    }
}

//  computes e = b - M·ξ, overwriting the first argument
//  and returning its norm
fn get_refine_error<T: FloatT>(
    e: &mut SaddlePointVector<T>,
    b: &SaddlePointVector<T>,
    matrix: &SaddlePointMatrix<T>,
    ξ: &SaddlePointVector<T>,
) -> T {
    matrix.multiply(ξ, e);
    e.data.axpby(T::one(), &b.data, -T::one());
    e.data.norm_inf()
}
