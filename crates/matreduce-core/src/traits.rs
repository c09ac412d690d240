//! Operand trait layer
//!
//! Every matrix-like operand (concrete container or lazy expression) is
//! classified statically through the associated items of [`Matrix`]:
//! element type, result type, storage order, whether it is an expression,
//! whether repeated element access is expensive, and whether its storage
//! supports SIMD loads. Expression nodes capture operands through
//! [`Composite`], which owns cheap expressions and borrows containers.

use crate::numeric::Element;
use crate::primitives::LanePack;
use bitflags::bitflags;
use std::fmt;
use std::ops::Deref;

/// Storage order of a matrix operand
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageOrder {
    /// Elements of a row are contiguous
    RowMajor,
    /// Elements of a column are contiguous
    ColumnMajor,
}

impl StorageOrder {
    /// Storage order of the transposed operand
    pub const fn flip(self) -> Self {
        match self {
            StorageOrder::RowMajor => StorageOrder::ColumnMajor,
            StorageOrder::ColumnMajor => StorageOrder::RowMajor,
        }
    }

    pub const fn is_row_major(self) -> bool {
        matches!(self, StorageOrder::RowMajor)
    }

    /// Storage order encoded by a const storage flag (`false` = row-major)
    pub const fn from_flag(column_major: bool) -> Self {
        if column_major {
            StorageOrder::ColumnMajor
        } else {
            StorageOrder::RowMajor
        }
    }
}

/// Orientation of a vector result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Row vector (one entry per matrix column)
    Row,
    /// Column vector (one entry per matrix row)
    Column,
}

/// Matrix-like operand consumed by expression nodes and kernels
///
/// The associated constants are the static classification used by the
/// evaluation-strategy dispatcher; they are resolved per instantiation.
pub trait Matrix: Clone + Send + Sync {
    /// Element type
    type Element: Element;

    /// Concrete container produced by full evaluation
    type ResultType: ResultMatrix<Element = Self::Element>;

    /// Storage order
    const STORAGE: StorageOrder;

    /// Whether this operand is a lazy expression (captured by value)
    const IS_EXPRESSION: bool;

    /// Whether the operand is a sparse matrix
    const IS_SPARSE: bool = false;

    /// Whether the operand is an explicit evaluation expression
    const IS_EVAL_EXPR: bool = false;

    /// Whether element access is expensive enough that the operand must be
    /// materialized before repeated use
    const REQUIRES_EVALUATION: bool = false;

    /// Whether [`Matrix::load`] reads contiguous storage
    const SIMD_ENABLED: bool = false;

    /// Whether the operand can be assigned in parallel
    const SMP_ASSIGNABLE: bool = false;

    /// Whether every major-axis line is zero-padded to a multiple of the
    /// element lane count
    const IS_PADDED: bool = false;

    /// Number of rows
    fn rows(&self) -> usize;

    /// Number of columns
    fn columns(&self) -> usize;

    /// Element at row `i`, column `j`
    ///
    /// Bounds are only checked by debug assertions.
    fn get(&self, i: usize, j: usize) -> Self::Element;

    /// Load `LANES` consecutive elements along the storage-major axis
    ///
    /// For row-major operands the lanes are `(i, j..j+LANES)`, for
    /// column-major operands `(i..i+LANES, j)`. Positions past the end of the
    /// line read as zero.
    fn load(&self, i: usize, j: usize) -> <Self::Element as Element>::Pack {
        if Self::STORAGE.is_row_major() {
            let n = self.columns();
            <Self::Element as Element>::Pack::from_fn(|k| {
                if j + k < n {
                    self.get(i, j + k)
                } else {
                    Self::Element::default()
                }
            })
        } else {
            let m = self.rows();
            <Self::Element as Element>::Pack::from_fn(|k| {
                if i + k < m {
                    self.get(i + k, j)
                } else {
                    Self::Element::default()
                }
            })
        }
    }

    /// Whether evaluating this operand reads memory at `alias`
    fn is_aliased<P>(&self, alias: *const P) -> bool;

    /// Whether this particular operand can take part in a parallel assignment
    fn can_smp_assign(&self) -> bool {
        Self::SMP_ASSIGNABLE
    }

    /// Materialize the operand
    fn evaluate(&self) -> Self::ResultType {
        Self::ResultType::from_fn(self.rows(), self.columns(), |i, j| self.get(i, j))
    }
}

/// Concrete container that can be built element by element
pub trait ResultMatrix: Matrix<ResultType = Self> {
    /// Build a `rows x columns` matrix from an element generator
    fn from_fn<F>(rows: usize, columns: usize, f: F) -> Self
    where
        F: FnMut(usize, usize) -> Self::Element;
}

/// Read access to a vector
pub trait Vector {
    /// Element type
    type Element: Element;

    /// Whether the vector stores only non-zero entries
    const IS_SPARSE: bool;

    /// Number of entries
    fn size(&self) -> usize;

    /// Entry `i` (zero for entries a sparse vector does not store)
    fn get(&self, i: usize) -> Self::Element;
}

/// Write access to a vector used as an assignment target
pub trait VectorMut: Vector {
    /// Set every entry to zero (sparse vectors drop all entries)
    fn reset(&mut self);

    /// Overwrite entry `i`
    fn set(&mut self, i: usize, value: Self::Element);

    /// Change the number of entries; new entries are zero
    fn resize(&mut self, n: usize);

    /// Replace entry `i` with `f(entry)`
    fn update<F>(&mut self, i: usize, f: F)
    where
        F: FnOnce(Self::Element) -> Self::Element,
    {
        let current = self.get(i);
        self.set(i, f(current));
    }
}

/// Ownership-tagged operand handle
///
/// Expressions are transient and cheap to copy, so they are owned;
/// containers are borrowed and the handle cannot outlive them.
pub enum Composite<'a, M> {
    /// Operand copied into the expression node
    Owned(M),
    /// Operand borrowed from the caller
    Borrowed(&'a M),
}

impl<'a, M: Matrix> Composite<'a, M> {
    /// Capture an operand by value if it is an expression, by reference otherwise
    pub fn capture(operand: &'a M) -> Self {
        if M::IS_EXPRESSION {
            Composite::Owned(operand.clone())
        } else {
            Composite::Borrowed(operand)
        }
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, Composite::Owned(_))
    }
}

impl<M> Deref for Composite<'_, M> {
    type Target = M;

    fn deref(&self) -> &M {
        match self {
            Composite::Owned(m) => m,
            Composite::Borrowed(m) => m,
        }
    }
}

impl<M: Clone> Clone for Composite<'_, M> {
    fn clone(&self) -> Self {
        match self {
            Composite::Owned(m) => Composite::Owned(m.clone()),
            Composite::Borrowed(m) => Composite::Borrowed(m),
        }
    }
}

impl<M: fmt::Debug> fmt::Debug for Composite<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Composite::Owned(m) => f.debug_tuple("Owned").field(m).finish(),
            Composite::Borrowed(m) => f.debug_tuple("Borrowed").field(m).finish(),
        }
    }
}

bitflags! {
    /// Static classification of a matrix operand
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct OperandFlags: u32 {
        /// Operand is a lazy expression
        const EXPRESSION = 0b0000_0001;
        /// Operand is sparse
        const SPARSE = 0b0000_0010;
        /// Operand must be materialized before repeated access
        const REQUIRES_EVALUATION = 0b0000_0100;
        /// Operand supports SIMD loads
        const SIMD_ENABLED = 0b0000_1000;
        /// Operand can be assigned in parallel
        const SMP_ASSIGNABLE = 0b0001_0000;
        /// Operand storage is padded
        const PADDED = 0b0010_0000;
        /// Operand is stored column-major
        const COLUMN_MAJOR = 0b0100_0000;
        /// Operand is an explicit evaluation expression
        const EVAL_EXPR = 0b1000_0000;
    }
}

/// Classification flags of an operand type
pub fn operand_flags<M: Matrix>() -> OperandFlags {
    let mut flags = OperandFlags::empty();
    flags.set(OperandFlags::EXPRESSION, M::IS_EXPRESSION);
    flags.set(OperandFlags::SPARSE, M::IS_SPARSE);
    flags.set(OperandFlags::REQUIRES_EVALUATION, M::REQUIRES_EVALUATION);
    flags.set(OperandFlags::SIMD_ENABLED, M::SIMD_ENABLED);
    flags.set(OperandFlags::SMP_ASSIGNABLE, M::SMP_ASSIGNABLE);
    flags.set(OperandFlags::PADDED, M::IS_PADDED);
    flags.set(OperandFlags::COLUMN_MAJOR, !M::STORAGE.is_row_major());
    flags.set(OperandFlags::EVAL_EXPR, M::IS_EVAL_EXPR);
    flags
}

/// Whether `M` is a sparse matrix type
pub fn is_sparse_matrix<M: Matrix>() -> bool {
    M::IS_SPARSE
}

/// Whether `M` is an explicit matrix evaluation expression
pub fn is_mat_eval_expr<M: Matrix>() -> bool {
    M::IS_EVAL_EXPR
}

/// Whether `alias` points at `object` or into `buffer`
pub(crate) fn points_into<O, T, P>(object: &O, buffer: &[T], alias: *const P) -> bool {
    let alias = alias as *const u8;
    let object = object as *const O as *const u8;
    let range = buffer.as_ptr_range();
    alias == object || (range.start as *const u8 <= alias && alias < range.end as *const u8)
}
