#![allow(non_snake_case)]
use num_traits::{Float, FloatConst, FromPrimitive, NumAssign};
use std::fmt::{Debug, Display, LowerExp};

/// Floating point type used throughout the factorizations and solvers.
///
/// Blanket implemented for every type meeting the bounds, which in practice
/// means `f32` and `f64`.  Instances of the solvers own all of their buffers,
/// so `Send + Sync` lets independent instances be moved across threads.
pub trait FloatT:
    'static
    + Send
    + Sync
    + Float
    + FloatConst
    + NumAssign
    + Default
    + FromPrimitive
    + Display
    + LowerExp
    + Debug
{
}

impl<T> FloatT for T where
    T: 'static
        + Send
        + Sync
        + Float
        + FloatConst
        + NumAssign
        + Default
        + FromPrimitive
        + Display
        + LowerExp
        + Debug
{
}

/// Conversion of primitive constants into a [`FloatT`](crate::algebra::FloatT).
///
/// Lets tolerances and literals be written as `(1e-10).as_T()`, which is also
/// how the defaults of [`SaddlePointSettings`](crate::solver::SaddlePointSettings)
/// are expressed.
pub trait AsFloatT<T>: 'static {
    fn as_T(&self) -> T;
}

macro_rules! impl_as_FloatT {
    ($ty:ty, $ident:ident) => {
        impl<T> AsFloatT<T> for $ty
        where
            T: FromPrimitive + 'static,
        {
            #[inline]
            fn as_T(&self) -> T {
                T::$ident(*self).unwrap()
            }
        }
    };
}
impl_as_FloatT!(u32, from_u32);
impl_as_FloatT!(usize, from_usize);
impl_as_FloatT!(f32, from_f32);
impl_as_FloatT!(f64, from_f64);
