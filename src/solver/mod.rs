//! Canonical forms of constraint matrices and the saddle point solver.
//!
//! The [`Canonicalizer`] splits the variables of a set of linear equations
//! into basic and non-basic variables guided by priority weights.  The
//! [`SaddlePointSolver`] uses it to factorize and solve the saddle point
//! systems of an optimization iteration with one of the strategies in
//! [`SaddlePointMethod`].

mod canonicalizer;
mod error;
mod saddlepoint;
mod settings;

pub use canonicalizer::*;
pub use error::*;
pub use saddlepoint::*;
pub use settings::*;
