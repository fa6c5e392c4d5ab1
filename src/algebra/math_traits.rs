use super::FloatT;

// All internal math for the factorizations and saddle point strategies
// goes through these core traits, which are implemented generically
// for floats of type FloatT.

/// Vector operations on slices of [`FloatT`](crate::algebra::FloatT)
pub trait VectorMath {
    type T;

    /// Copy values from `src` to `self`
    fn copy_from(&mut self, src: &Self) -> &mut Self;

    /// Apply an elementwise operation on a vector.
    fn scalarop(&mut self, op: impl Fn(Self::T) -> Self::T) -> &mut Self;

    /// set all elements to the same value
    fn set(&mut self, c: Self::T) -> &mut Self;

    /// Elementwise scaling.
    fn scale(&mut self, c: Self::T) -> &mut Self;

    /// Elementwise negation of entries.
    fn negate(&mut self) -> &mut Self;

    /// Elementwise reciprocal square root.
    fn rsqrt(&mut self) -> &mut Self;

    /// Elementwise scaling by another vector. Produces `self[i] = self[i] * y[i]`
    fn hadamard(&mut self, y: &Self) -> &mut Self;

    /// Dot product
    fn dot(&self, y: &Self) -> Self::T;

    /// Sum of squares of the elements.
    fn sumsq(&self) -> Self::T;

    /// 2-norm
    fn norm(&self) -> Self::T;

    /// Infinity norm
    fn norm_inf(&self) -> Self::T;

    /// Infinity norm of the difference `self - b`
    fn norm_inf_diff(&self, b: &Self) -> Self::T;

    /// Checks if all elements are finite, i.e. no Infs or NaNs
    fn is_finite(&self) -> bool;

    //blas-like vector ops
    //--------------------

    /// BLAS-like shift and scale in place.  Produces `self = a*x+b*self`
    fn axpby(&mut self, a: Self::T, x: &Self, b: Self::T) -> &mut Self;
}

/// General dense matrix-vector multiply.
pub trait MultiplyGEMV {
    type T: FloatT;

    /// BLAS-like general matrix-vector multiply.  Produces `y = a*self*x + b*y`
    fn gemv(&self, x: &[Self::T], y: &mut [Self::T], a: Self::T, b: Self::T);
}

/// General dense matrix-matrix multiply.
pub trait MultiplyGEMM {
    type T: FloatT;

    /// Produces `self = a*A*B + b*self`
    fn mul<MATA, MATB>(&mut self, A: &MATA, B: &MATB, a: Self::T, b: Self::T) -> &mut Self
    where
        MATA: super::DenseMatrix<Self::T>,
        MATB: super::DenseMatrix<Self::T>;
}

/// Operations on matrices of [`FloatT`](crate::algebra::FloatT)
pub trait MatrixMath {
    type T: FloatT;

    /// Elementwise scaling
    fn scale(&mut self, c: Self::T);

    /// Elementwise negation
    fn negate(&mut self);

    /// Largest absolute entry, or zero for an empty matrix
    fn norm_inf(&self) -> Self::T;

    /// Checks if all entries are finite
    fn is_finite(&self) -> bool;

    /// Left multiply the matrix `self` by `Diagonal(l)`
    fn lscale(&mut self, l: &[Self::T]);

    /// Right multiply the matrix `self` by `Diagonal(r)`
    fn rscale(&mut self, r: &[Self::T]);

    /// Left and right multiply the matrix `self` by diagonal matrices,
    /// producing `A = Diagonal(l)*A*Diagonal(r)`
    fn lrscale(&mut self, l: &[Self::T], r: &[Self::T]);

    /// Infinity norm of each column, overwriting `norms`
    fn col_norms(&self, norms: &mut [Self::T]);

    /// Infinity norm of each row, overwriting `norms`
    fn row_norms(&self, norms: &mut [Self::T]);

    /// Sets every entry with `|a_ij| < threshold` to zero, returning
    /// the number of entries changed
    fn drop_below(&mut self, threshold: Self::T) -> usize;
}
