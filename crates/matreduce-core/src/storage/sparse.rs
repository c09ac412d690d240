//! Sparse containers
//!
//! Only non-zero entries and their indices are stored. Indices are kept
//! sorted so lookups are binary searches.

use crate::config;
use crate::numeric::Element;
use crate::storage::DynamicVector;
use crate::traits::{points_into, Matrix, ResultMatrix, StorageOrder, Vector, VectorMut};
use crate::{Error, Result};

/// Compressed sparse row matrix
///
/// # Examples
///
/// ```
/// use matreduce_core::{storage::CompressedMatrix, Matrix};
///
/// let m = CompressedMatrix::from_triplets(2, 3, vec![(0, 1, 2.0), (1, 2, 5.0)]).unwrap();
/// assert_eq!(m.get(0, 1), 2.0);
/// assert_eq!(m.get(1, 0), 0.0); // Not stored
/// assert_eq!(m.nnz(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CompressedMatrix<T: Element> {
    rows: usize,
    columns: usize,
    /// Start of each row in `indices`/`values`, plus one end marker
    row_ptr: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: Element> CompressedMatrix<T> {
    /// Empty `rows x columns` matrix
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            row_ptr: vec![0; rows + 1],
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build from `(row, column, value)` triplets
    ///
    /// Duplicate positions are summed and zero values are dropped.
    pub fn from_triplets(
        rows: usize,
        columns: usize,
        mut triplets: Vec<(usize, usize, T)>,
    ) -> Result<Self> {
        for &(i, j, _) in &triplets {
            if i >= rows {
                return Err(Error::out_of_range(i, rows));
            }
            if j >= columns {
                return Err(Error::out_of_range(j, columns));
            }
        }
        triplets.sort_unstable_by_key(|&(i, j, _)| (i, j));

        let mut merged: Vec<(usize, usize, T)> = Vec::with_capacity(triplets.len());
        for (i, j, v) in triplets {
            match merged.last_mut() {
                Some(last) if last.0 == i && last.1 == j => last.2 = last.2 + v,
                _ => merged.push((i, j, v)),
            }
        }

        let mut m = Self::new(rows, columns);
        for (i, j, v) in merged.into_iter().filter(|&(_, _, v)| v != T::zero()) {
            m.row_ptr[i + 1] += 1;
            m.indices.push(j);
            m.values.push(v);
        }
        for i in 0..rows {
            m.row_ptr[i + 1] += m.row_ptr[i];
        }
        Ok(m)
    }

    /// Compress any matrix operand, dropping zeros
    pub fn from_matrix<M: Matrix<Element = T>>(m: &M) -> Self {
        <Self as ResultMatrix>::from_fn(m.rows(), m.columns(), |i, j| m.get(i, j))
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Column indices and values stored in row `i`
    pub fn row(&self, i: usize) -> (&[usize], &[T]) {
        let range = self.row_ptr[i]..self.row_ptr[i + 1];
        (&self.indices[range.clone()], &self.values[range])
    }

    /// Fraction of entries that are not stored
    pub fn sparsity(&self) -> f64 {
        let total = self.rows * self.columns;
        if total == 0 {
            0.0
        } else {
            1.0 - (self.nnz() as f64 / total as f64)
        }
    }
}

impl<T: Element> Matrix for CompressedMatrix<T> {
    type Element = T;
    type ResultType = Self;

    const STORAGE: StorageOrder = StorageOrder::RowMajor;
    const IS_EXPRESSION: bool = false;
    const IS_SPARSE: bool = true;
    const SMP_ASSIGNABLE: bool = true;

    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.columns
    }

    fn get(&self, i: usize, j: usize) -> T {
        debug_assert!(i < self.rows, "invalid row access index");
        debug_assert!(j < self.columns, "invalid column access index");
        let (indices, values) = self.row(i);
        match indices.binary_search(&j) {
            Ok(pos) => values[pos],
            Err(_) => T::zero(),
        }
    }

    fn is_aliased<P>(&self, alias: *const P) -> bool {
        points_into(self, &self.values, alias)
    }

    /// Stores enough entries to be worth splitting across threads
    fn can_smp_assign(&self) -> bool {
        self.nnz() >= config::current().smp_threshold
    }

    fn evaluate(&self) -> Self {
        self.clone()
    }
}

impl<T: Element> ResultMatrix for CompressedMatrix<T> {
    fn from_fn<F>(rows: usize, columns: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut m = Self::new(rows, columns);
        for i in 0..rows {
            for j in 0..columns {
                let v = f(i, j);
                if v != T::zero() {
                    m.indices.push(j);
                    m.values.push(v);
                }
            }
            m.row_ptr[i + 1] = m.values.len();
        }
        m
    }
}

/// Sparse vector of any element type
///
/// # Examples
///
/// ```
/// use matreduce_core::{storage::CompressedVector, Vector};
///
/// let sparse = CompressedVector::new(vec![7, 1, 3], vec![0.3, 0.2, 0.5], 10).unwrap();
/// assert_eq!(sparse.get(1), 0.2);
/// assert_eq!(sparse.get(2), 0.0); // Not stored
/// assert_eq!(sparse.indices(), &[1, 3, 7]);
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CompressedVector<T: Element> {
    indices: Vec<usize>,
    values: Vec<T>,
    n: usize,
}

impl<T: Element> CompressedVector<T> {
    /// Empty vector of length `n`
    pub fn with_size(n: usize) -> Self {
        Self {
            indices: Vec::new(),
            values: Vec::new(),
            n,
        }
    }

    /// Create from index/value pairs
    ///
    /// Fails if the lengths differ, an index is `>= n`, or an index repeats.
    pub fn new(indices: Vec<usize>, values: Vec<T>, n: usize) -> Result<Self> {
        if indices.len() != values.len() {
            return Err(Error::size_mismatch(
                indices.len(),
                values.len(),
                "sparse vector values",
            ));
        }
        if let Some(&idx) = indices.iter().find(|&&idx| idx >= n) {
            return Err(Error::out_of_range(idx, n));
        }

        let mut sv = Self { indices, values, n };
        sv.sort_by_index();
        if sv.indices.windows(2).any(|w| w[0] == w[1]) {
            return Err(Error::InvalidParameter(
                "duplicate index in sparse vector".to_string(),
            ));
        }
        Ok(sv)
    }

    /// Create from dense values, dropping zeros
    pub fn from_dense(dense: &[T]) -> Self {
        let (indices, values) = dense
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != T::zero())
            .map(|(i, &v)| (i, v))
            .unzip();
        Self {
            indices,
            values,
            n: dense.len(),
        }
    }

    /// Convert to a dense vector
    pub fn to_dense(&self) -> DynamicVector<T> {
        let mut dense = DynamicVector::new(self.n);
        for (&idx, &v) in self.indices.iter().zip(&self.values) {
            dense[idx] = v;
        }
        dense
    }

    fn sort_by_index(&mut self) {
        let mut combined: Vec<_> = self
            .indices
            .iter()
            .copied()
            .zip(self.values.iter().copied())
            .collect();
        combined.sort_unstable_by_key(|(idx, _)| *idx);

        for (i, (idx, v)) in combined.into_iter().enumerate() {
            self.indices[i] = idx;
            self.values[i] = v;
        }
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Logical length
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Checked element access
    pub fn at(&self, i: usize) -> Result<T> {
        if i >= self.n {
            return Err(Error::out_of_range(i, self.n));
        }
        Ok(self.get(i))
    }
}

impl<T: Element> Vector for CompressedVector<T> {
    type Element = T;
    const IS_SPARSE: bool = true;

    fn size(&self) -> usize {
        self.n
    }

    fn get(&self, i: usize) -> T {
        debug_assert!(i < self.n, "invalid vector access index");
        match self.indices.binary_search(&i) {
            Ok(pos) => self.values[pos],
            Err(_) => T::zero(),
        }
    }
}

impl<T: Element> VectorMut for CompressedVector<T> {
    fn reset(&mut self) {
        self.indices.clear();
        self.values.clear();
    }

    fn set(&mut self, i: usize, value: T) {
        debug_assert!(i < self.n, "invalid vector access index");
        match self.indices.binary_search(&i) {
            Ok(pos) if value == T::zero() => {
                self.indices.remove(pos);
                self.values.remove(pos);
            }
            Ok(pos) => self.values[pos] = value,
            Err(_) if value == T::zero() => {}
            Err(pos) => {
                self.indices.insert(pos, i);
                self.values.insert(pos, value);
            }
        }
    }

    fn resize(&mut self, n: usize) {
        let keep = self.indices.partition_point(|&idx| idx < n);
        self.indices.truncate(keep);
        self.values.truncate(keep);
        self.n = n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DynamicMatrix;

    #[test]
    fn test_from_triplets_merges_and_drops_zeros() {
        let m = CompressedMatrix::from_triplets(
            3,
            3,
            vec![(2, 0, 1.0f64), (0, 2, 2.0), (0, 2, 3.0), (1, 1, 0.0)],
        )
        .unwrap();
        assert_eq!(m.nnz(), 2);
        assert_eq!(m.get(0, 2), 5.0);
        assert_eq!(m.get(2, 0), 1.0);
        assert_eq!(m.get(1, 1), 0.0);
        assert_eq!(m.row(1).0.len(), 0);
    }

    #[test]
    fn test_from_triplets_rejects_out_of_range() {
        let err = CompressedMatrix::from_triplets(2, 2, vec![(0, 2, 1i32)]).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { index: 2, size: 2 }));
        let err = CompressedMatrix::from_triplets(2, 2, vec![(3, 0, 1i32)]).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { index: 3, size: 2 }));
    }

    #[test]
    fn test_from_matrix_roundtrips_values() {
        let dense = DynamicMatrix::<i32>::from_vec(2, 3, vec![1, 0, 2, 0, 0, 3]).unwrap();
        let sparse = CompressedMatrix::from_matrix(&dense);
        assert_eq!(sparse.nnz(), 3);
        assert!((sparse.sparsity() - 0.5).abs() < 1e-12);
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(sparse.get(i, j), dense.get(i, j));
            }
        }
    }

    #[test]
    fn test_smp_capability_counts_stored_entries() {
        let threshold = config::current().smp_threshold;
        if threshold > 0 {
            let empty = CompressedMatrix::<f64>::new(threshold + 10, threshold + 10);
            assert!(!empty.can_smp_assign());
        }

        let n = threshold.max(1);
        let diagonal = CompressedMatrix::from_triplets(n, n, (0..n).map(|i| (i, i, 1.0f64)).collect())
            .unwrap();
        assert!(diagonal.can_smp_assign());
    }

    #[test]
    fn test_sparse_vector_construction() {
        let sv = CompressedVector::new(vec![4, 0], vec![1.5f64, 2.5], 5).unwrap();
        assert_eq!(sv.indices(), &[0, 4]);
        assert_eq!(sv.values(), &[2.5, 1.5]);
        assert_eq!(sv.to_dense().as_slice(), &[2.5, 0.0, 0.0, 0.0, 1.5]);

        assert!(CompressedVector::new(vec![5], vec![1.0f64], 5).is_err());
        assert!(CompressedVector::new(vec![1, 1], vec![1.0f64, 2.0], 5).is_err());
        assert!(CompressedVector::new(vec![1], vec![1.0f64, 2.0], 5).is_err());
    }

    #[test]
    fn test_sparse_vector_set_keeps_order() {
        let mut sv = CompressedVector::<i64>::with_size(6);
        sv.set(4, 7);
        sv.set(1, 3);
        sv.set(4, 0);
        sv.update(1, |x| x * 2);
        assert_eq!(sv.indices(), &[1]);
        assert_eq!(sv.get(1), 6);
        assert!(sv.at(6).is_err());

        sv.set(5, 1);
        sv.resize(3);
        assert_eq!(sv.nnz(), 1);
        assert_eq!(sv.size(), 3);

        sv.reset();
        assert_eq!(sv.nnz(), 0);
    }

    #[test]
    fn test_from_dense() {
        let sv = CompressedVector::from_dense(&[0u32, 3, 0, 9]);
        assert_eq!(sv.nnz(), 2);
        assert_eq!(sv.len(), 4);
        assert_eq!(sv.get(3), 9);
    }
}
