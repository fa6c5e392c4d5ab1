//! Dense linear algebra for saddle point systems of the form
//!
//! ```text
//! | Hxx  Hxp  Axᵀ  Jxᵀ | | x |   | ax |
//! | Vpx  Vpp   0    0  | | p | = | ap |
//! | Ax   Ap    0    0  | | y |   | ay |
//! | Jx   Jp    0    0  | | z |   | az |
//! ```
//!
//! as they arise in the iterations of optimization and optimal control
//! solvers.  Variables `x` can be fixed to given values, and `p` are
//! parameters with their own equations.
//!
//! The crate provides
//!
//! * a rank revealing [LU factorization](crate::algebra::LuFactorization) with
//!   full or partial pivoting,
//! * a [canonicalizer](crate::solver::Canonicalizer) that chooses basic
//!   variables of a constraint matrix according to priority weights, and
//! * a [saddle point solver](crate::solver::SaddlePointSolver) with full space,
//!   null space and range space strategies.
//!
//! All types are generic over the floating point type through
//! [`FloatT`](crate::algebra::FloatT), and are typically used with `f64`.

//Rust hates greek characters
#![allow(confusable_idents)]

pub mod algebra;
pub mod solver;
