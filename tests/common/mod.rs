#![allow(non_snake_case)]
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use saddlepoint::algebra::*;

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Symmetric Pascal matrix, `P[i,j] = binomial(i+j, i)`.
pub fn pascal(n: usize) -> Matrix<f64> {
    pascal_rect(n, n)
}

/// `m × n` Pascal matrix, ones in the first row and column and
/// `P[i,j] = P[i-1,j] + P[i,j-1]` elsewhere.
pub fn pascal_rect(m: usize, n: usize) -> Matrix<f64> {
    let mut P = Matrix::zeros((m, n));
    for j in 0..n {
        for i in 0..m {
            P[(i, j)] = if i == 0 || j == 0 {
                1.0
            } else {
                P[(i - 1, j)] + P[(i, j - 1)]
            };
        }
    }
    P
}

/// Householder reflection `I - 2vvᵀ/(vᵀv)` with `v[i] = f(i)`.
pub fn householder(n: usize, f: impl Fn(usize) -> f64) -> Matrix<f64> {
    let v: Vec<f64> = (0..n).map(f).collect();
    let vtv = v.sumsq();
    Matrix::from_fn((n, n), |i, j| {
        let delta = if i == j { 1.0 } else { 0.0 };
        delta - 2.0 * v[i] * v[j] / vtv
    })
}

/// Non-singular `n × n` matrix `H1·D·H2` with singular values in `[1, 2]`.
pub fn nonsingular(n: usize) -> Matrix<f64> {
    let H1 = householder(n, |i| (i as f64 + 1.0).cos() + 1.5);
    let H2 = householder(n, |i| (i as f64 * 0.7).sin() - 0.3);
    let d: Vec<f64> = (0..n).map(|i| 1.0 + i as f64 / n as f64).collect();
    let D = Matrix::from_diagonal(&d);
    let HD = Matrix::product(&H1, &D);
    Matrix::product(&HD, &H2)
}

/// `nonsingular(n)` with the last `k` rows replaced by combinations of
/// earlier rows, so that its rank is `n - k`.
pub fn rank_deficient(n: usize, k: usize) -> Matrix<f64> {
    let mut A = nonsingular(n);
    let nind = n - k;
    for row in nind..n {
        let src1 = row % nind;
        let src2 = (3 * row + 1) % nind;
        let a = (row - nind + 1) as f64;
        for j in 0..n {
            A[(row, j)] = a * A[(src1, j)] - 0.5 * A[(src2, j)];
        }
    }
    A
}

pub fn random_vec(rng: &mut StdRng, n: usize) -> Vec<f64> {
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

pub fn random_matrix(rng: &mut StdRng, m: usize, n: usize) -> Matrix<f64> {
    Matrix::from_fn((m, n), |_, _| rng.gen_range(-1.0..1.0))
}

/// Blocks of a well conditioned random saddle point system.
pub struct BlockSystem {
    pub Hxx: Matrix<f64>,
    pub Hxp: Matrix<f64>,
    pub Vpx: Matrix<f64>,
    pub Vpp: Matrix<f64>,
    pub Ax: Matrix<f64>,
    pub Ap: Matrix<f64>,
    pub Jx: Matrix<f64>,
    pub Jp: Matrix<f64>,
}

impl BlockSystem {
    /// `Hxx` is diagonal when `diagonal` is set, else symmetric and
    /// diagonally dominant.
    pub fn random(
        rng: &mut StdRng,
        (nx, np, ny, nz): (usize, usize, usize, usize),
        diagonal: bool,
    ) -> Self {
        let Hxx = if diagonal {
            let d: Vec<f64> = (0..nx).map(|_| rng.gen_range(1.0..3.0)).collect();
            Matrix::from_diagonal(&d)
        } else {
            let B = random_matrix(rng, nx, nx);
            let mut H = Matrix::zeros((nx, nx));
            H.mul(&B, &B.t(), 1.0 / nx as f64, 0.0);
            for i in 0..nx {
                H[(i, i)] += 2.0;
            }
            H
        };

        let mut Hxp = random_matrix(rng, nx, np);
        Hxp.scale(0.5);
        let mut Vpx = random_matrix(rng, np, nx);
        Vpx.scale(0.5);
        let mut Vpp = random_matrix(rng, np, np);
        Vpp.scale(0.5);
        for i in 0..np {
            Vpp[(i, i)] += 4.0;
        }

        Self {
            Hxx,
            Hxp,
            Vpx,
            Vpp,
            Ax: random_matrix(rng, ny, nx),
            Ap: random_matrix(rng, ny, np),
            Jx: random_matrix(rng, nz, nx),
            Jp: random_matrix(rng, nz, np),
        }
    }
}
