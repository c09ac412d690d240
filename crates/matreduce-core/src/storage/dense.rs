//! Dense containers
//!
//! [`DynamicMatrix`] stores every major-axis line (rows for row-major,
//! columns for column-major) zero-padded to a multiple of the element lane
//! count, so vectorized kernels can load full packs up to the end of a line.

use crate::config;
use crate::numeric::Element;
use crate::primitives::LanePack;
use crate::traits::{points_into, Matrix, ResultMatrix, StorageOrder, Vector, VectorMut};
use crate::{Error, Result};
use std::ops::{Index, IndexMut};

/// Storage flag for row-major matrices
pub const ROW_MAJOR: bool = false;

/// Storage flag for column-major matrices
pub const COLUMN_MAJOR: bool = true;

/// Heap-allocated dense matrix with padded major-axis lines
///
/// `SO` selects the storage order: [`ROW_MAJOR`] (default) or
/// [`COLUMN_MAJOR`].
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicMatrix<T: Element, const SO: bool = false> {
    rows: usize,
    columns: usize,
    spacing: usize,
    data: Vec<T>,
}

impl<T: Element, const SO: bool> DynamicMatrix<T, SO> {
    /// Zero-initialized `rows x columns` matrix
    pub fn new(rows: usize, columns: usize) -> Self {
        let (major, minor) = if SO { (columns, rows) } else { (rows, columns) };
        let spacing = padded_len::<T>(minor);
        Self {
            rows,
            columns,
            spacing,
            data: vec![T::zero(); major * spacing],
        }
    }

    /// Build a matrix from an element generator
    pub fn from_fn<F>(rows: usize, columns: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut m = Self::new(rows, columns);
        for i in 0..rows {
            for j in 0..columns {
                let idx = m.offset(i, j);
                m.data[idx] = f(i, j);
            }
        }
        m
    }

    /// Build a matrix from its elements in row-major order
    pub fn from_vec(rows: usize, columns: usize, values: Vec<T>) -> Result<Self> {
        let expected = rows
            .checked_mul(columns)
            .ok_or_else(|| Error::InvalidParameter(format!("{rows}x{columns} matrix overflows")))?;
        if values.len() != expected {
            return Err(Error::size_mismatch(expected, values.len(), "matrix elements"));
        }
        Ok(Self::from_fn(rows, columns, |i, j| values[i * columns + j]))
    }

    /// Build a matrix from a list of equally long rows
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let columns = rows.first().map_or(0, |r| r.as_ref().len());
        if let Some(bad) = rows.iter().find(|r| r.as_ref().len() != columns) {
            return Err(Error::size_mismatch(columns, bad.as_ref().len(), "matrix row"));
        }
        Ok(Self::from_fn(rows.len(), columns, |i, j| rows[i].as_ref()[j]))
    }

    /// Length of a stored major-axis line including padding
    pub fn spacing(&self) -> usize {
        self.spacing
    }

    /// Checked element access
    pub fn at(&self, i: usize, j: usize) -> Result<T> {
        if i >= self.rows {
            return Err(Error::out_of_range(i, self.rows));
        }
        if j >= self.columns {
            return Err(Error::out_of_range(j, self.columns));
        }
        Ok(self.data[self.offset(i, j)])
    }

    /// Overwrite the element at row `i`, column `j`
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        debug_assert!(i < self.rows && j < self.columns, "invalid matrix access index");
        let idx = self.offset(i, j);
        self.data[idx] = value;
    }

    /// Major-axis line `k` without padding (row `k` or column `k`)
    pub fn line(&self, k: usize) -> &[T] {
        let minor = if SO { self.rows } else { self.columns };
        &self.data[k * self.spacing..k * self.spacing + minor]
    }

    /// Copy into a matrix with the other storage order
    pub fn to_storage<const SO2: bool>(&self) -> DynamicMatrix<T, SO2> {
        DynamicMatrix::from_fn(self.rows, self.columns, |i, j| self.get(i, j))
    }

    /// Materialized transpose with the same storage order
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.columns, self.rows, |i, j| self.get(j, i))
    }

    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        if SO {
            j * self.spacing + i
        } else {
            i * self.spacing + j
        }
    }
}

fn padded_len<T: Element>(n: usize) -> usize {
    n.div_ceil(T::LANES) * T::LANES
}

impl<T: Element, const SO: bool> Matrix for DynamicMatrix<T, SO> {
    type Element = T;
    type ResultType = Self;

    const STORAGE: StorageOrder = StorageOrder::from_flag(SO);
    const IS_EXPRESSION: bool = false;
    const SIMD_ENABLED: bool = true;
    const SMP_ASSIGNABLE: bool = true;
    const IS_PADDED: bool = true;

    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> T {
        debug_assert!(i < self.rows, "invalid row access index");
        debug_assert!(j < self.columns, "invalid column access index");
        self.data[self.offset(i, j)]
    }

    #[inline]
    fn load(&self, i: usize, j: usize) -> T::Pack {
        let minor = if SO { i } else { j };
        debug_assert!(minor % T::LANES == 0, "unaligned pack load");
        debug_assert!(minor < self.spacing, "pack load past line end");
        T::Pack::load(&self.data[self.offset(i, j)..])
    }

    fn is_aliased<P>(&self, alias: *const P) -> bool {
        points_into(self, &self.data, alias)
    }

    /// Large enough to be worth splitting across threads
    fn can_smp_assign(&self) -> bool {
        self.rows * self.columns >= config::current().smp_threshold
    }

    fn evaluate(&self) -> Self {
        self.clone()
    }
}

impl<T: Element, const SO: bool> ResultMatrix for DynamicMatrix<T, SO> {
    fn from_fn<F>(rows: usize, columns: usize, f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        DynamicMatrix::from_fn(rows, columns, f)
    }
}

impl<T: Element, const SO: bool> Index<(usize, usize)> for DynamicMatrix<T, SO> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        assert!(i < self.rows && j < self.columns, "invalid matrix access index");
        &self.data[self.offset(i, j)]
    }
}

impl<T: Element, const SO: bool> IndexMut<(usize, usize)> for DynamicMatrix<T, SO> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        assert!(i < self.rows && j < self.columns, "invalid matrix access index");
        let idx = self.offset(i, j);
        &mut self.data[idx]
    }
}

/// Heap-allocated dense vector
#[derive(Clone, Debug, PartialEq, Default)]
pub struct DynamicVector<T: Element> {
    data: Vec<T>,
}

impl<T: Element> DynamicVector<T> {
    /// Zero-initialized vector of length `n`
    pub fn new(n: usize) -> Self {
        Self {
            data: vec![T::zero(); n],
        }
    }

    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Checked element access
    pub fn at(&self, i: usize) -> Result<T> {
        self.data
            .get(i)
            .copied()
            .ok_or_else(|| Error::out_of_range(i, self.data.len()))
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Element> Vector for DynamicVector<T> {
    type Element = T;
    const IS_SPARSE: bool = false;

    fn size(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn get(&self, i: usize) -> T {
        debug_assert!(i < self.data.len(), "invalid vector access index");
        self.data[i]
    }
}

impl<T: Element> VectorMut for DynamicVector<T> {
    fn reset(&mut self) {
        self.data.fill(T::zero());
    }

    #[inline]
    fn set(&mut self, i: usize, value: T) {
        debug_assert!(i < self.data.len(), "invalid vector access index");
        self.data[i] = value;
    }

    fn resize(&mut self, n: usize) {
        self.data.resize(n, T::zero());
    }
}

impl<T: Element> From<Vec<T>> for DynamicVector<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T: Element> FromIterator<T> for DynamicVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<T: Element> Index<usize> for DynamicVector<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T: Element> IndexMut<usize> for DynamicVector<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}
