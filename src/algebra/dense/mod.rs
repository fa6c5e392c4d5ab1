mod block_concatenate;
mod core;
mod equilibration;
pub use self::equilibration::*;
mod gemm;
mod gemv;
mod lu;
pub use self::lu::*;
mod matrix_math;
mod types;
pub use self::types::*;
