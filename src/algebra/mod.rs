//! Dense linear algebra used by the canonicalizer and the saddle point solvers.
//!
//! Matrices are stored in column major format as [`Matrix`], with borrowed
//! variants for caller owned data and an [`Adjoint`] view for transposed
//! products.  Vector operations are provided on slices through
//! [`VectorMath`], and the rank revealing [`LuFactorization`] is the only
//! factorization used by the solvers.
//!
//! All types are generic over [`FloatT`], which is implemented for `f32`
//! and `f64`.

mod adjoint;
mod dense;
mod error_types;
mod floats;
mod math_traits;
mod matrix_traits;
mod matrix_types;
pub(crate) mod utils;
mod vecmath;

pub use dense::*;
pub use error_types::*;
pub use floats::*;
pub use math_traits::*;
pub use matrix_traits::*;
pub use matrix_types::*;
