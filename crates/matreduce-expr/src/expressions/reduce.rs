//! Partial reduction expression
//!
//! [`DMatReduceExpr`] collapses one axis of a dense matrix operand. The
//! axis is a type parameter: [`Flag<0>`] reduces each column into one entry
//! of a row vector, [`Flag<1>`] reduces each row into one entry of a column
//! vector. Entries are computed on demand; bulk evaluation goes through the
//! assignment protocol in [`crate::assign`].

use crate::assign;
use crate::kernels::{reduce_column_with, reduce_row_with};
use crate::ops::ReduceOp;
use matreduce_core::{
    config, Composite, ComputePrimitives, DynamicVector, Element, Error, Matrix, Orientation,
    Result, Vector,
};
use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

/// Reduction axis marker
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Flag<const RF: usize>;

/// Axis collapsed by a partial reduction
pub trait Axis: Copy + Send + Sync + 'static {
    /// Axis index: 0 for column-wise, 1 for row-wise
    const INDEX: usize;

    /// Orientation of the reduced vector
    const ORIENTATION: Orientation;
}

impl Axis for Flag<0> {
    const INDEX: usize = 0;
    const ORIENTATION: Orientation = Orientation::Row;
}

impl Axis for Flag<1> {
    const INDEX: usize = 1;
    const ORIENTATION: Orientation = Orientation::Column;
}

/// Column-wise reduction: one entry per operand column
pub type ColumnwiseReduce<'a, M, OP> = DMatReduceExpr<'a, Flag<0>, M, OP>;

/// Row-wise reduction: one entry per operand row
pub type RowwiseReduce<'a, M, OP> = DMatReduceExpr<'a, Flag<1>, M, OP>;

/// Lazy reduction of a dense matrix along one axis
pub struct DMatReduceExpr<'a, A, M, OP> {
    operand: Composite<'a, M>,
    op: OP,
    _axis: PhantomData<A>,
}

impl<'a, A, M, OP> DMatReduceExpr<'a, A, M, OP>
where
    A: Axis,
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    pub fn new(operand: &'a M, op: OP) -> Self {
        Self {
            operand: Composite::capture(operand),
            op,
            _axis: PhantomData,
        }
    }

    /// Number of entries: the operand's column count for column-wise
    /// reductions, its row count for row-wise reductions
    pub fn size(&self) -> usize {
        if A::INDEX == 0 {
            self.operand.columns()
        } else {
            self.operand.rows()
        }
    }

    /// Entry `i`, computed by reducing one column or row of the operand
    ///
    /// `i` is only checked by a debug assertion; see [`Self::at`].
    #[inline]
    pub fn get(&self, i: usize) -> M::Element {
        self.get_with(i, &M::Element::backend())
    }

    /// Entry `i` with vectorized lines collapsed on `backend`
    #[inline]
    pub fn get_with<P: ComputePrimitives<M::Element>>(&self, i: usize, backend: &P) -> M::Element {
        debug_assert!(i < self.size(), "invalid vector access index {i}");
        if A::INDEX == 0 {
            reduce_column_with(&*self.operand, i, &self.op, backend)
        } else {
            reduce_row_with(&*self.operand, i, &self.op, backend)
        }
    }

    /// Checked access to entry `i`
    pub fn at(&self, i: usize) -> Result<M::Element> {
        let size = self.size();
        if i >= size {
            return Err(Error::out_of_range(i, size));
        }
        Ok(self.get(i))
    }

    /// The reduced matrix operand
    pub fn operand(&self) -> &M {
        &self.operand
    }

    /// A copy of the reduction operation
    pub fn operation(&self) -> OP {
        self.op.clone()
    }

    pub fn orientation(&self) -> Orientation {
        A::ORIENTATION
    }

    /// Whether the expression can alias with `alias`
    pub fn can_alias<P>(&self, alias: *const P) -> bool {
        self.operand.is_aliased(alias)
    }

    /// Whether the expression is aliased with `alias`
    pub fn is_aliased<P>(&self, alias: *const P) -> bool {
        self.operand.is_aliased(alias)
    }

    /// Reductions are computed on demand and never stored aligned
    pub fn is_aligned(&self) -> bool {
        false
    }

    /// Whether the expression can be assigned in parallel
    pub fn can_smp_assign(&self) -> bool {
        self.operand.can_smp_assign() || self.size() > config::current().smp_threshold
    }

    /// Materialize every entry into a dense vector
    pub fn evaluate(&self) -> DynamicVector<M::Element> {
        let mut out = DynamicVector::new(self.size());
        assign::assign(&mut out, self);
        out
    }
}

impl<'a, M, OP> DMatReduceExpr<'a, Flag<1>, M, OP>
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    /// Iterator over the row reductions, front to back
    pub fn iter(&self) -> ReduceIter<'_, 'a, M, OP> {
        ReduceIter {
            expr: self,
            front: 0,
            back: self.size(),
        }
    }
}

impl<'e, 'a, M, OP> IntoIterator for &'e DMatReduceExpr<'a, Flag<1>, M, OP>
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    type Item = M::Element;
    type IntoIter = ReduceIter<'e, 'a, M, OP>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<A, M, OP> Vector for DMatReduceExpr<'_, A, M, OP>
where
    A: Axis,
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    type Element = M::Element;

    const IS_SPARSE: bool = false;

    fn size(&self) -> usize {
        DMatReduceExpr::size(self)
    }

    fn get(&self, i: usize) -> M::Element {
        DMatReduceExpr::get(self, i)
    }
}

impl<A, M: Clone, OP: Clone> Clone for DMatReduceExpr<'_, A, M, OP> {
    fn clone(&self) -> Self {
        Self {
            operand: self.operand.clone(),
            op: self.op.clone(),
            _axis: PhantomData,
        }
    }
}

impl<A: Axis, M: fmt::Debug, OP: fmt::Debug> fmt::Debug for DMatReduceExpr<'_, A, M, OP> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DMatReduceExpr")
            .field("axis", &A::INDEX)
            .field("operand", &self.operand)
            .field("op", &self.op)
            .finish()
    }
}

/// Random-access iterator over the entries of a row-wise reduction
///
/// Each entry is the reduction of one operand row, computed when it is
/// yielded. Iterators over the same expression compare by position.
pub struct ReduceIter<'e, 'a, M, OP> {
    expr: &'e DMatReduceExpr<'a, Flag<1>, M, OP>,
    front: usize,
    back: usize,
}

impl<M, OP> ReduceIter<'_, '_, M, OP>
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    /// Index of the next entry yielded from the front
    pub fn position(&self) -> usize {
        self.front
    }

    /// Entry `k` places after the current front position, without advancing
    pub fn at_offset(&self, k: usize) -> M::Element {
        debug_assert!(self.front + k < self.back, "iterator offset {k} out of range");
        self.expr.get(self.front + k)
    }
}

impl<M, OP> Iterator for ReduceIter<'_, '_, M, OP>
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    type Item = M::Element;

    fn next(&mut self) -> Option<M::Element> {
        if self.front >= self.back {
            return None;
        }
        let value = self.expr.get(self.front);
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<M::Element> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }

    fn count(self) -> usize {
        self.back - self.front
    }
}

impl<M, OP> DoubleEndedIterator for ReduceIter<'_, '_, M, OP>
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    fn next_back(&mut self) -> Option<M::Element> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.expr.get(self.back))
    }

    fn nth_back(&mut self, n: usize) -> Option<M::Element> {
        self.back = self.back.saturating_sub(n).max(self.front);
        self.next_back()
    }
}

impl<M, OP> ExactSizeIterator for ReduceIter<'_, '_, M, OP>
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
}

impl<M, OP> FusedIterator for ReduceIter<'_, '_, M, OP>
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
}

impl<M, OP> Clone for ReduceIter<'_, '_, M, OP> {
    fn clone(&self) -> Self {
        Self {
            expr: self.expr,
            front: self.front,
            back: self.back,
        }
    }
}

impl<M, OP> PartialEq for ReduceIter<'_, '_, M, OP> {
    fn eq(&self, other: &Self) -> bool {
        self.front == other.front
    }
}

impl<M, OP> PartialOrd for ReduceIter<'_, '_, M, OP> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.front.partial_cmp(&other.front)
    }
}

impl<M, OP> fmt::Debug for ReduceIter<'_, '_, M, OP> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReduceIter")
            .field("front", &self.front)
            .field("back", &self.back)
            .finish()
    }
}
