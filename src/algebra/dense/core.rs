use crate::algebra::*;

impl<T> Matrix<T>
where
    T: FloatT,
{
    pub fn zeros(size: (usize, usize)) -> Self {
        let (m, n) = size;
        let data = vec![T::zero(); m * n];
        Self::new(size, data)
    }

    pub fn identity(n: usize) -> Self {
        let mut mat = Matrix::zeros((n, n));
        mat.set_identity();
        mat
    }

    /// Make a matrix from column major `data`.
    ///
    /// # Panics
    /// Panics if `data` does not have `m*n` entries.
    pub fn new(size: (usize, usize), data: Vec<T>) -> Self {
        let (m, n) = size;
        assert_eq!(m * n, data.len());
        Self {
            size,
            data,
            phantom: std::marker::PhantomData::<T>,
        }
    }

    pub fn new_from_slice(size: (usize, usize), src: &[T]) -> Self {
        Self::new(size, src.to_vec())
    }

    /// Make an `m × n` matrix with entries `f(i,j)`.
    pub fn from_fn(size: (usize, usize), mut f: impl FnMut(usize, usize) -> T) -> Self {
        let (m, n) = size;
        let mut data = Vec::with_capacity(m * n);
        for j in 0..n {
            for i in 0..m {
                data.push(f(i, j));
            }
        }
        Self::new(size, data)
    }

    /// Make a square diagonal matrix from the entries of `d`.
    pub fn from_diagonal(d: &[T]) -> Self {
        let mut mat = Matrix::zeros((d.len(), d.len()));
        for (i, &v) in d.iter().enumerate() {
            mat[(i, i)] = v;
        }
        mat
    }

    pub fn set_identity(&mut self) {
        assert!(self.is_square());
        self.data.set(T::zero());
        for i in 0..self.ncols() {
            self[(i, i)] = T::one();
        }
    }

    pub fn copy_from_slice(&mut self, src: &[T]) -> &mut Self {
        self.data.copy_from_slice(src);
        self
    }

    /// Owned copy of the transpose.
    pub fn transpose(&self) -> Self {
        let (m, n) = self.size();
        Matrix::from_fn((n, m), |i, j| self[(j, i)])
    }

    /// Owned copy of the entries at the intersection of `rows` and `cols`.
    pub fn select(&self, rows: &[usize], cols: &[usize]) -> Self {
        Matrix::from_fn((rows.len(), cols.len()), |i, j| self[(rows[i], cols[j])])
    }

    /// Owned copy of the contiguous block starting at `(r0, c0)`.
    pub fn block(&self, start: (usize, usize), size: (usize, usize)) -> Self {
        let (r0, c0) = start;
        Matrix::from_fn(size, |i, j| self[(r0 + i, c0 + j)])
    }

    /// Swaps rows `i` and `k` in place.
    pub fn swap_rows(&mut self, i: usize, k: usize) {
        if i == k {
            return;
        }
        let m = self.nrows();
        for col in self.data.chunks_exact_mut(m) {
            col.swap(i, k);
        }
    }

    /// Swaps columns `j` and `k` in place.
    pub fn swap_cols(&mut self, j: usize, k: usize) {
        if j == k {
            return;
        }
        let m = self.nrows();
        for i in 0..m {
            self.data.swap(i + j * m, i + k * m);
        }
    }

    /// Adds `a` times row `src` to row `dst`.
    pub fn add_scaled_row(&mut self, dst: usize, src: usize, a: T) {
        debug_assert!(dst != src);
        let m = self.nrows();
        for col in self.data.chunks_exact_mut(m) {
            col[dst] += a * col[src];
        }
    }

    /// Scales row `i` by `a`.
    pub fn scale_row(&mut self, i: usize, a: T) {
        let m = self.nrows();
        for col in self.data.chunks_exact_mut(m) {
            col[i] *= a;
        }
    }

    /// Owned copy with rows reordered so that row `k` is row `perm[k]` of `self`.
    pub fn permute_rows(&self, perm: &[usize]) -> Self {
        assert_eq!(perm.len(), self.nrows());
        Matrix::from_fn(self.size(), |i, j| self[(perm[i], j)])
    }

    /// Owned copy with columns reordered so that column `k` is column `perm[k]` of `self`.
    pub fn permute_cols(&self, perm: &[usize]) -> Self {
        assert_eq!(perm.len(), self.ncols());
        Matrix::from_fn(self.size(), |i, j| self[(i, perm[j])])
    }
}

impl<S, T> DenseStorageMatrix<S, T>
where
    S: AsRef<[T]>,
    T: FloatT,
{
    pub fn t(&self) -> Adjoint<'_, Self> {
        Adjoint { src: self }
    }

    pub fn col_slice(&self, col: usize) -> &[T] {
        let (m, n) = self.size;
        assert!(col < n);
        &self.data()[(col * m)..(col + 1) * m]
    }

    pub fn row(&self, row: usize) -> Vec<T> {
        let (m, n) = self.size;
        assert!(row < m);
        (0..n).map(|j| self[(row, j)]).collect()
    }
}

impl<S, T> DenseStorageMatrix<S, T>
where
    S: AsMut<[T]> + AsRef<[T]>,
    T: FloatT,
{
    pub fn col_slice_mut(&mut self, col: usize) -> &mut [T] {
        let (m, n) = self.size;
        assert!(col < n);
        &mut self.data_mut()[(col * m)..(col + 1) * m]
    }
}

// ------------------------------------------------
// BorrowedMatrix implementation

impl<'a, T> BorrowedMatrix<'a, T>
where
    T: FloatT,
{
    pub fn from_slice(data: &'a [T], m: usize, n: usize) -> Self {
        assert_eq!(data.len(), m * n);
        Self {
            size: (m, n),
            data,
            phantom: std::marker::PhantomData::<T>,
        }
    }
}

// Construct from row major nested arrays, so that
// small matrices can be written out the way they print

impl<T, const M: usize, const N: usize> From<&[[T; N]; M]> for Matrix<T>
where
    T: FloatT,
{
    fn from(rows: &[[T; N]; M]) -> Matrix<T> {
        Matrix::from_fn((M, N), |i, j| rows[i][j])
    }
}

impl<T> std::fmt::Display for Matrix<T>
where
    T: FloatT,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f)?;
        for i in 0..self.nrows() {
            write!(f, "[ ")?;
            for j in 0..self.ncols() {
                write!(f, " {:?}", self[(i, j)])?;
            }
            writeln!(f, "]")?;
        }
        writeln!(f)?;
        Ok(())
    }
}
