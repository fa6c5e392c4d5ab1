#![allow(non_snake_case)]

mod common;
use common::*;
use saddlepoint::algebra::*;
use saddlepoint::solver::*;

const METHODS: [SaddlePointMethod; 3] = [
    SaddlePointMethod::Fullspace,
    SaddlePointMethod::Nullspace,
    SaddlePointMethod::Rangespace,
];

// which diagonal entries of Hxx are scaled up by 1e8, the others
// are scaled down by 1e-8
#[derive(Debug, Clone, Copy, PartialEq)]
enum Conditioning {
    ExplicitAll,
    ExplicitSome,
    ExplicitNone,
}

#[derive(Debug, Clone)]
struct Case {
    nx: usize,
    np: usize,
    ny: usize,
    nz: usize,
    // rows of Ax that vanish on the free variables
    nbu: usize,
    // rows of Ax that repeat earlier rows
    nl: usize,
    ifixed: Vec<usize>,
    conditioning: Conditioning,
    method: SaddlePointMethod,
}

impl Case {
    fn dims(&self) -> SaddlePointDims {
        SaddlePointDims::new(self.nx, self.np, self.ny, self.nz)
    }

    // y is only determined when the constraints keep full rank
    fn unique_multipliers(&self) -> bool {
        self.nbu == 0 && self.nl == 0
    }
}

fn blocks(sys: &BlockSystem) -> SaddlePointBlocks<'_, f64> {
    SaddlePointBlocks {
        Hxx: &sys.Hxx,
        Hxp: &sys.Hxp,
        Vpx: &sys.Vpx,
        Vpp: &sys.Vpp,
        Jx: &sys.Jx,
        Jp: &sys.Jp,
    }
}

fn scaled_system(case: &Case) -> BlockSystem {
    let Case {
        nx, np, ny, nz, nbu, nl, ..
    } = *case;
    let mut rng = rng((1000 * nx + 100 * np + 10 * ny + nz) as u64);

    let mut Ax = random_matrix(&mut rng, ny, nx);
    if !case.ifixed.is_empty() {
        for k in 0..nbu {
            let row = ny / (2 * (k + 1));
            for j in (0..nx).filter(|j| !case.ifixed.contains(j)) {
                Ax[(row, j)] = 0.0;
            }
        }
    }
    for k in 0..nl {
        for j in 0..nx {
            Ax[(ny - k - 1, j)] = Ax[(k, j)];
        }
    }
    let Ap = Matrix::from_fn((ny, np), |i, j| (1 + i * np + j) as f64);

    let J = pascal_rect(nz, nx + np);
    let Jx = J.block((0, 0), (nz, nx));
    let Jp = J.block((0, nx), (nz, np));

    let mut Hxx = if case.method == SaddlePointMethod::Rangespace {
        let d: Vec<f64> = (1..=nx).map(|i| i as f64).collect();
        Matrix::from_diagonal(&d)
    } else {
        nonsingular(nx)
    };
    let nexplicit = match case.conditioning {
        Conditioning::ExplicitAll => nx,
        Conditioning::ExplicitSome => ny,
        Conditioning::ExplicitNone => 0,
    };
    for i in 0..nx {
        Hxx[(i, i)] *= if i < nexplicit { 1e8 } else { 1e-8 };
    }

    let Vpp = if np > 0 {
        nonsingular(np)
    } else {
        Matrix::zeros((0, 0))
    };

    BlockSystem {
        Hxx,
        Hxp: pascal_rect(nx, np),
        Vpx: pascal_rect(np, nx),
        Vpp,
        Ax,
        Ap,
        Jx,
        Jp,
    }
}

fn cases() -> Vec<Case> {
    let fixed_sets = [vec![], vec![0], vec![1, 3, 7, 9]];
    let conditionings = [
        Conditioning::ExplicitAll,
        Conditioning::ExplicitSome,
        Conditioning::ExplicitNone,
    ];

    let mut cases = vec![];
    for nx in [10, 20] {
        for np in [0, 5] {
            for ny in [4, 6, 8] {
                for nz in [0, 5] {
                    for nbu in [0, 1, 2] {
                        for nl in [0, 1, 2] {
                            for ifixed in &fixed_sets {
                                // parameters need full rank constraints
                                if np > 0 && nbu + nl > 0 {
                                    continue;
                                }
                                if nbu > 0 && ifixed.is_empty() {
                                    continue;
                                }
                                if nx - ifixed.len() < ny + nz {
                                    continue;
                                }
                                for conditioning in conditionings {
                                    for method in METHODS {
                                        cases.push(Case {
                                            nx,
                                            np,
                                            ny,
                                            nz,
                                            nbu,
                                            nl,
                                            ifixed: ifixed.clone(),
                                            conditioning,
                                            method,
                                        });
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
    cases
}

// M·s for the matrix as treated by the solver
fn apply(solver: &SaddlePointSolver<f64>, s: &SaddlePointVector<f64>) -> SaddlePointVector<f64> {
    let mut r = SaddlePointVector::new(solver.dims());
    solver.matrix().unwrap().multiply(s, &mut r);
    r
}

fn solve_and_check(
    solver: &mut SaddlePointSolver<f64>,
    case: &Case,
    rhs: &SaddlePointRhs<'_, f64>,
    expected: &SaddlePointVector<f64>,
) {
    let dims = case.dims();
    let mut s = SaddlePointVector::new(dims);
    let (x, p, y, z) = s.blocks_mut();
    solver.rhs(rhs).unwrap();
    let info = solver.solve(x, p, y, z).unwrap();

    assert!(
        info.residual < 1e-10,
        "{case:?}: residual {:e}",
        info.residual
    );

    // with a dominant Hessian diagonal the system is nonsingular
    // apart from the multipliers of dependent rows
    if case.conditioning == Conditioning::ExplicitAll {
        let tol = 1e-6 * expected.data.norm_inf();
        assert!(s.x().norm_inf_diff(expected.x()) < tol, "{case:?}: x");
        assert!(s.p().norm_inf_diff(expected.p()) < tol, "{case:?}: p");
        assert!(s.z().norm_inf_diff(expected.z()) < tol, "{case:?}: z");
        if case.unique_multipliers() {
            assert!(s.y().norm_inf_diff(expected.y()) < tol, "{case:?}: y");
        }
    }
    for &i in &case.ifixed {
        let xi = expected.x()[i];
        assert!(
            (s.x()[i] - xi).abs() <= 1e-10 * (1.0 + xi.abs()),
            "{case:?}: fixed x[{i}]"
        );
    }
}

fn linspace(n: usize, step: f64) -> Vec<f64> {
    (1..=n).map(|i| step * i as f64).collect()
}

#[test]
fn test_badly_scaled_systems() {
    let cases = cases();
    assert!(!cases.is_empty());

    for case in &cases {
        let Case {
            nx, np, ny, nz, ..
        } = *case;
        let dims = case.dims();
        let sys = scaled_system(case);

        let settings = SaddlePointSettingsBuilder::default()
            .method(case.method)
            .build()
            .unwrap();
        let mut solver = SaddlePointSolver::new(dims, &sys.Ax, &sys.Ap, settings).unwrap();
        let weights = linspace(nx, 1.0);
        solver
            .canonicalize(&blocks(&sys), &case.ifixed, &weights)
            .unwrap_or_else(|e| panic!("{case:?}: {e}"));
        solver
            .decompose()
            .unwrap_or_else(|e| panic!("{case:?}: {e}"));

        // direct form, with large values at the fixed variables
        let mut expected = SaddlePointVector::new(dims);
        expected.data = linspace(dims.total(), 1.0);
        {
            let (ex, _, _, _) = expected.blocks_mut();
            for &i in &case.ifixed {
                ex[i] *= 999.9;
            }
        }
        let r = apply(&solver, &expected);
        let rhs = SaddlePointRhs::Direct {
            ax: r.x(),
            ap: r.p(),
            ay: r.y(),
            az: r.z(),
        };
        solve_and_check(&mut solver, case, &rhs, &expected);

        // with multipliers, the fixed variables do not move
        let x0 = linspace(nx, 10.0);
        let p0 = linspace(np, 20.0);
        let y0 = linspace(ny, 30.0);
        let z0 = linspace(nz, 40.0);
        {
            let (ex, _, _, _) = expected.blocks_mut();
            for &i in &case.ifixed {
                ex[i] = 0.0;
            }
        }
        let r = apply(&solver, &expected);

        // g = -(ax + Axᵀy0 + Jxᵀz0), v = -ap, h = -az, b = ay + Ax·x0 + Ap·p0
        let mut g = r.x().to_vec();
        sys.Ax.t().gemv(&y0, &mut g, 1.0, 1.0);
        sys.Jx.t().gemv(&z0, &mut g, 1.0, 1.0);
        g.negate();
        let mut v = r.p().to_vec();
        v.negate();
        let mut h = r.z().to_vec();
        h.negate();
        let mut b = r.y().to_vec();
        sys.Ax.gemv(&x0, &mut b, 1.0, 1.0);
        sys.Ap.gemv(&p0, &mut b, 1.0, 1.0);

        let rhs = SaddlePointRhs::WithMultipliers {
            g: &g,
            x: &x0,
            p: &p0,
            y: &y0,
            z: &z0,
            v: &v,
            h: &h,
            b: &b,
        };
        solve_and_check(&mut solver, case, &rhs, &expected);

        // with offsets, the fixed variables stay at the offset point
        {
            let (ex, _, _, _) = expected.blocks_mut();
            for &i in &case.ifixed {
                ex[i] = x0[i];
            }
        }
        let r = apply(&solver, &expected);
        let offsets = SaddlePointVector::from_blocks(dims, &x0, &p0, &vec![0.0; ny], &vec![0.0; nz]);
        let w = apply(&solver, &offsets);

        // g = Hxx·x0 + Hxp·p0 - ax, v = Vpx·x0 + Vpp·p0 - ap, h = Jx·x0 + Jp·p0 - az
        let mut g = w.x().to_vec();
        g.axpby(-1.0, r.x(), 1.0);
        let mut v = w.p().to_vec();
        v.axpby(-1.0, r.p(), 1.0);
        let mut h = w.z().to_vec();
        h.axpby(-1.0, r.z(), 1.0);

        let rhs = SaddlePointRhs::WithOffsets {
            g: &g,
            x: &x0,
            p: &p0,
            v: &v,
            h: &h,
            b: r.y(),
        };
        solve_and_check(&mut solver, case, &rhs, &expected);
    }
}

#[test]
fn test_large_hessian_diagonal_keeps_full_rank() {
    let (nx, ny) = (10, 4);
    let dims = SaddlePointDims::new(nx, 0, ny, 0);
    let mut rng = rng(21);

    let mut sys = BlockSystem::random(&mut rng, (nx, 0, ny, 0), false);
    sys.Hxx = nonsingular(nx);
    for i in 0..nx {
        sys.Hxx[(i, i)] *= 1e8;
    }
    let mut expected = SaddlePointVector::new(dims);
    expected.data = linspace(nx + ny, 1.0);

    let mut solutions = vec![];
    for method in [SaddlePointMethod::Fullspace, SaddlePointMethod::Nullspace] {
        let settings = SaddlePointSettingsBuilder::default()
            .method(method)
            .build()
            .unwrap();
        let mut solver = SaddlePointSolver::new(dims, &sys.Ax, &sys.Ap, settings).unwrap();
        solver
            .canonicalize(&blocks(&sys), &[], &vec![1.0; nx])
            .unwrap();
        solver.decompose().unwrap();
        let factors = solver.factors().unwrap();
        assert_eq!(factors.rank(), factors.reduced_size(), "{method:?}");

        let r = apply(&solver, &expected);
        let rhs = SaddlePointRhs::Direct {
            ax: r.x(),
            ap: &[],
            ay: r.y(),
            az: &[],
        };
        solver.rhs(&rhs).unwrap();
        let (mut x, mut y) = (vec![0.0; nx], vec![0.0; ny]);
        let info = solver.solve(&mut x, &mut [], &mut y, &mut []).unwrap();

        assert_eq!(info.status, SolveStatus::Solved, "{method:?}");
        assert!(x.norm_inf_diff(expected.x()) < 1e-8, "{method:?}");
        assert!(y.norm_inf_diff(&[11.0, 12.0, 13.0, 14.0]) < 1e-5, "{method:?}: {y:?}");
        solutions.push(y);
    }
    assert!(solutions[0].norm_inf_diff(&solutions[1]) < 1e-5);
}

#[test]
fn test_small_hessian_diagonal_rangespace() {
    // D⁻¹ of order 1e8 gives a reduced system far from unit scale
    let (nx, np, ny) = (8, 2, 3);
    let dims = SaddlePointDims::new(nx, np, ny, 0);
    let mut rng = rng(22);

    let mut sys = BlockSystem::random(&mut rng, (nx, np, ny, 0), true);
    for i in 0..nx {
        sys.Hxx[(i, i)] *= if i % 2 == 0 { 1e-8 } else { 1e8 };
    }
    let mut expected = SaddlePointVector::new(dims);
    expected.data = linspace(dims.total(), 1.0);

    let mut solutions = vec![];
    for method in METHODS {
        let settings = SaddlePointSettingsBuilder::default()
            .method(method)
            .build()
            .unwrap();
        let mut solver = SaddlePointSolver::new(dims, &sys.Ax, &sys.Ap, settings).unwrap();
        solver
            .canonicalize(&blocks(&sys), &[], &vec![1.0; nx])
            .unwrap();
        solver.decompose().unwrap();
        let factors = solver.factors().unwrap();
        assert_eq!(factors.rank(), factors.reduced_size(), "{method:?}");

        let r = apply(&solver, &expected);
        let rhs = SaddlePointRhs::Direct {
            ax: r.x(),
            ap: r.p(),
            ay: r.y(),
            az: &[],
        };
        solver.rhs(&rhs).unwrap();
        let mut s = SaddlePointVector::new(dims);
        let (x, p, y, z) = s.blocks_mut();
        let info = solver.solve(x, p, y, z).unwrap();

        assert!(info.residual < 1e-10, "{method:?}: {:e}", info.residual);
        assert!(
            s.data.norm_inf_diff(&expected.data) < 1e-5,
            "{method:?}: {:?}",
            s.data
        );
        solutions.push(s);
    }
    for s in &solutions[1..] {
        assert!(s.data.norm_inf_diff(&solutions[0].data) < 1e-5);
    }
}
