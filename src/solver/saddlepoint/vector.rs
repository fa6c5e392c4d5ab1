use super::SaddlePointDims;
use crate::algebra::*;

/// A vector stacked by variable group as `(x, p, y, z)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SaddlePointVector<T> {
    dims: SaddlePointDims,
    pub data: Vec<T>,
}

impl<T> SaddlePointVector<T>
where
    T: FloatT,
{
    pub fn new(dims: SaddlePointDims) -> Self {
        Self {
            dims,
            data: vec![T::zero(); dims.total()],
        }
    }

    /// Stack the four blocks into a new vector.
    ///
    /// # Panics
    /// Panics if a block length does not match `dims`.
    pub fn from_blocks(dims: SaddlePointDims, x: &[T], p: &[T], y: &[T], z: &[T]) -> Self {
        let mut v = Self::new(dims);
        let (vx, vp, vy, vz) = v.blocks_mut();
        vx.copy_from(x);
        vp.copy_from(p);
        vy.copy_from(y);
        vz.copy_from(z);
        v
    }

    pub fn dims(&self) -> SaddlePointDims {
        self.dims
    }

    pub fn x(&self) -> &[T] {
        let [ox, op, _, _] = self.dims.offsets();
        &self.data[ox..op]
    }

    pub fn p(&self) -> &[T] {
        let [_, op, oy, _] = self.dims.offsets();
        &self.data[op..oy]
    }

    pub fn y(&self) -> &[T] {
        let [_, _, oy, oz] = self.dims.offsets();
        &self.data[oy..oz]
    }

    pub fn z(&self) -> &[T] {
        let [_, _, _, oz] = self.dims.offsets();
        &self.data[oz..]
    }

    /// Mutable views of the `(x, p, y, z)` blocks.
    pub fn blocks_mut(&mut self) -> (&mut [T], &mut [T], &mut [T], &mut [T]) {
        let SaddlePointDims { nx, np, ny, .. } = self.dims;
        let (x, rest) = self.data.split_at_mut(nx);
        let (p, rest) = rest.split_at_mut(np);
        let (y, z) = rest.split_at_mut(ny);
        (x, p, y, z)
    }
}

#[test]
fn test_saddle_point_vector_blocks() {
    let dims = SaddlePointDims::new(3, 1, 2, 0);
    let v = SaddlePointVector::from_blocks(dims, &[1., 2., 3.], &[4.], &[5., 6.], &[]);

    assert_eq!(v.data, vec![1., 2., 3., 4., 5., 6.]);
    assert_eq!(v.x(), &[1., 2., 3.]);
    assert_eq!(v.p(), &[4.]);
    assert_eq!(v.y(), &[5., 6.]);
    assert!(v.z().is_empty());
}
