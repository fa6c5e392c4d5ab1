/// Sizes of the variable groups of a saddle point system.
///
/// `x` are the primal variables, `p` the parameter variables, and `y`, `z`
/// the multipliers of the primary and extended equality blocks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SaddlePointDims {
    pub nx: usize,
    pub np: usize,
    pub ny: usize,
    pub nz: usize,
}

impl SaddlePointDims {
    pub fn new(nx: usize, np: usize, ny: usize, nz: usize) -> Self {
        Self { nx, np, ny, nz }
    }

    /// Size of the complete block system.
    pub fn total(&self) -> usize {
        self.nx + self.np + self.ny + self.nz
    }

    // block offsets within a stacked (x,p,y,z) vector
    pub(crate) fn offsets(&self) -> [usize; 4] {
        [
            0,
            self.nx,
            self.nx + self.np,
            self.nx + self.np + self.ny,
        ]
    }
}
