use crate::algebra::{Adjoint, MatrixShape, ShapedMatrix};

impl<M> ShapedMatrix for Adjoint<'_, M>
where
    M: ShapedMatrix,
{
    fn size(&self) -> (usize, usize) {
        let (m, n) = self.src.size();
        (n, m)
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::T
    }
}
