//! Assignment of partial reductions into vector targets
//!
//! Every flavor (assign, add, sub, mult, div) exists in a serial form and in
//! an SMP form that takes an [`ExecutionEngine`]. The target size must match
//! the reduction size; a mismatch is a programmer error caught by a debug
//! assertion.
//!
//! Column-wise reductions of row-major operands fold each operand row into
//! the target, so the operand is traversed along its storage order.
//! Combined assignments fold incrementally when the reduction operation
//! matches the combining operator and otherwise materialize the reduction
//! first. Sparse targets always receive a dense temporary.

use crate::dispatch::use_smp_assign;
use crate::expressions::{Axis, DMatReduceExpr, Trans};
use crate::kernels::reduce_row;
use crate::ops::{OpKind, ReduceOp};
use matreduce_core::{Composite, DynamicVector, Element, ExecutionEngine, Matrix, VectorMut, Zero};

/// Assignment operator applied to each target entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssignFlavor {
    /// `target = value`
    Assign,
    /// `target += value`
    Add,
    /// `target -= value`
    Sub,
    /// `target *= value`
    Mult,
    /// `target /= value`
    Div,
}

impl AssignFlavor {
    /// Combine the current target entry with a reduced value
    #[inline]
    pub fn combine<T: Element>(self, current: T, value: T) -> T {
        match self {
            AssignFlavor::Assign => value,
            AssignFlavor::Add => current + value,
            AssignFlavor::Sub => current - value,
            AssignFlavor::Mult => current * value,
            AssignFlavor::Div => current / value,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AssignFlavor::Assign => "assign",
            AssignFlavor::Add => "add-assign",
            AssignFlavor::Sub => "sub-assign",
            AssignFlavor::Mult => "mult-assign",
            AssignFlavor::Div => "div-assign",
        }
    }
}

/// `target = expr`
pub fn assign<V, A, M, OP>(target: &mut V, expr: &DMatReduceExpr<'_, A, M, OP>)
where
    V: VectorMut<Element = M::Element>,
    A: Axis,
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    assign_with(target, expr, AssignFlavor::Assign);
}

/// `target += expr`
pub fn add_assign<V, A, M, OP>(target: &mut V, expr: &DMatReduceExpr<'_, A, M, OP>)
where
    V: VectorMut<Element = M::Element>,
    A: Axis,
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    assign_with(target, expr, AssignFlavor::Add);
}

/// `target -= expr`
pub fn sub_assign<V, A, M, OP>(target: &mut V, expr: &DMatReduceExpr<'_, A, M, OP>)
where
    V: VectorMut<Element = M::Element>,
    A: Axis,
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    assign_with(target, expr, AssignFlavor::Sub);
}

/// `target *= expr`, entry by entry
pub fn mult_assign<V, A, M, OP>(target: &mut V, expr: &DMatReduceExpr<'_, A, M, OP>)
where
    V: VectorMut<Element = M::Element>,
    A: Axis,
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    assign_with(target, expr, AssignFlavor::Mult);
}

/// `target /= expr`, entry by entry
pub fn div_assign<V, A, M, OP>(target: &mut V, expr: &DMatReduceExpr<'_, A, M, OP>)
where
    V: VectorMut<Element = M::Element>,
    A: Axis,
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    assign_with(target, expr, AssignFlavor::Div);
}

/// Serial assignment with an explicit flavor
pub fn assign_with<V, A, M, OP>(
    target: &mut V,
    expr: &DMatReduceExpr<'_, A, M, OP>,
    flavor: AssignFlavor,
) where
    V: VectorMut<Element = M::Element>,
    A: Axis,
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    debug_assert_eq!(target.size(), expr.size(), "invalid vector sizes");

    if V::IS_SPARSE {
        log::trace!("{} into sparse target through a dense temporary", flavor.name());
        let mut tmp = DynamicVector::new(expr.size());
        assign_dense(&mut tmp, expr, AssignFlavor::Assign);
        combine_sparse(target, &tmp, flavor);
        return;
    }

    assign_dense(target, expr, flavor);
}

/// Dense-target assignment: materialize operands that require it, then
/// route by axis and storage order
fn assign_dense<V, A, M, OP>(target: &mut V, expr: &DMatReduceExpr<'_, A, M, OP>, flavor: AssignFlavor)
where
    V: VectorMut<Element = M::Element>,
    A: Axis,
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    let op = expr.operation();
    if M::REQUIRES_EVALUATION {
        log::trace!("{} materializes the reduced operand", flavor.name());
        let tmp = expr.operand().evaluate();
        assign_operand::<V, A, _, OP>(target, &tmp, &op, flavor);
    } else {
        assign_operand::<V, A, _, OP>(target, expr.operand(), &op, flavor);
    }
}

/// Reduce `m` along axis `A`; column-major operands are seen through their
/// transpose with the axis flipped
fn assign_operand<V, A, M, OP>(target: &mut V, m: &M, op: &OP, flavor: AssignFlavor)
where
    V: VectorMut<Element = M::Element>,
    A: Axis,
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    let columnwise_reduction = A::INDEX == 0;
    if M::STORAGE.is_row_major() {
        if columnwise_reduction {
            columnwise(target, m, op, flavor);
        } else {
            rowwise(target, m, op, flavor);
        }
    } else {
        let view = Trans::from_composite(Composite::Borrowed(m));
        if columnwise_reduction {
            rowwise(target, &view, op, flavor);
        } else {
            columnwise(target, &view, op, flavor);
        }
    }
}

/// Column-wise reduction of a row-major operand, folding row by row
fn columnwise<V, M, OP>(target: &mut V, m: &M, op: &OP, flavor: AssignFlavor)
where
    V: VectorMut<Element = M::Element>,
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    let (rows, n) = (m.rows(), m.columns());
    debug_assert_eq!(target.size(), n, "invalid vector sizes");

    match flavor {
        AssignFlavor::Assign => {
            if rows == 0 {
                target.reset();
                return;
            }
            for j in 0..n {
                target.set(j, m.get(0, j));
            }
            for i in 1..rows {
                for j in 0..n {
                    target.update(j, |acc| op.apply(acc, m.get(i, j)));
                }
            }
        }
        AssignFlavor::Add | AssignFlavor::Sub if rows == 0 => {}
        AssignFlavor::Mult if rows == 0 => target.reset(),
        AssignFlavor::Add | AssignFlavor::Sub if OP::KIND == OpKind::Add => {
            for i in 0..rows {
                for j in 0..n {
                    target.update(j, |acc| flavor.combine(acc, m.get(i, j)));
                }
            }
        }
        AssignFlavor::Mult if OP::KIND == OpKind::Mult => {
            for i in 0..rows {
                for j in 0..n {
                    target.update(j, |acc| acc * m.get(i, j));
                }
            }
        }
        _ => {
            let mut tmp = DynamicVector::new(n);
            columnwise(&mut tmp, m, op, AssignFlavor::Assign);
            for (j, &value) in tmp.iter().enumerate() {
                target.update(j, |acc| flavor.combine(acc, value));
            }
        }
    }
}

/// Row-wise reduction: every entry reduces one row independently
fn rowwise<V, M, OP>(target: &mut V, m: &M, op: &OP, flavor: AssignFlavor)
where
    V: VectorMut<Element = M::Element>,
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    let rows = m.rows();
    debug_assert_eq!(target.size(), rows, "invalid vector sizes");

    for i in 0..rows {
        let value = reduce_row(m, i, op);
        match flavor {
            AssignFlavor::Assign => target.set(i, value),
            _ => target.update(i, |acc| flavor.combine(acc, value)),
        }
    }
}

/// Combine a dense reduction into a sparse target
///
/// Add and sub touch only entries where the reduction is non-zero; mult and
/// div touch only the entries the target stores.
fn combine_sparse<V>(target: &mut V, tmp: &DynamicVector<V::Element>, flavor: AssignFlavor)
where
    V: VectorMut,
{
    let zero = V::Element::zero();
    match flavor {
        AssignFlavor::Assign => {
            target.reset();
            for (i, &value) in tmp.iter().enumerate() {
                if value != zero {
                    target.set(i, value);
                }
            }
        }
        AssignFlavor::Add | AssignFlavor::Sub => {
            for (i, &value) in tmp.iter().enumerate() {
                if value != zero {
                    target.update(i, |acc| flavor.combine(acc, value));
                }
            }
        }
        AssignFlavor::Mult | AssignFlavor::Div => {
            for (i, &value) in tmp.iter().enumerate() {
                let current = target.get(i);
                if current != zero {
                    target.set(i, flavor.combine(current, value));
                }
            }
        }
    }
}

/// Parallel `target = expr`
pub fn smp_assign<V, A, M, OP, E>(target: &mut V, expr: &DMatReduceExpr<'_, A, M, OP>, engine: &E)
where
    V: VectorMut<Element = M::Element>,
    A: Axis,
    M: Matrix,
    OP: ReduceOp<M::Element>,
    E: ExecutionEngine<M::Element>,
{
    smp_assign_with(target, expr, engine, AssignFlavor::Assign);
}

/// Parallel `target += expr`
pub fn smp_add_assign<V, A, M, OP, E>(
    target: &mut V,
    expr: &DMatReduceExpr<'_, A, M, OP>,
    engine: &E,
) where
    V: VectorMut<Element = M::Element>,
    A: Axis,
    M: Matrix,
    OP: ReduceOp<M::Element>,
    E: ExecutionEngine<M::Element>,
{
    smp_assign_with(target, expr, engine, AssignFlavor::Add);
}

/// Parallel `target -= expr`
pub fn smp_sub_assign<V, A, M, OP, E>(
    target: &mut V,
    expr: &DMatReduceExpr<'_, A, M, OP>,
    engine: &E,
) where
    V: VectorMut<Element = M::Element>,
    A: Axis,
    M: Matrix,
    OP: ReduceOp<M::Element>,
    E: ExecutionEngine<M::Element>,
{
    smp_assign_with(target, expr, engine, AssignFlavor::Sub);
}

/// Parallel `target *= expr`
pub fn smp_mult_assign<V, A, M, OP, E>(
    target: &mut V,
    expr: &DMatReduceExpr<'_, A, M, OP>,
    engine: &E,
) where
    V: VectorMut<Element = M::Element>,
    A: Axis,
    M: Matrix,
    OP: ReduceOp<M::Element>,
    E: ExecutionEngine<M::Element>,
{
    smp_assign_with(target, expr, engine, AssignFlavor::Mult);
}

/// Parallel `target /= expr`
pub fn smp_div_assign<V, A, M, OP, E>(
    target: &mut V,
    expr: &DMatReduceExpr<'_, A, M, OP>,
    engine: &E,
) where
    V: VectorMut<Element = M::Element>,
    A: Axis,
    M: Matrix,
    OP: ReduceOp<M::Element>,
    E: ExecutionEngine<M::Element>,
{
    smp_assign_with(target, expr, engine, AssignFlavor::Div);
}

/// Parallel assignment with an explicit flavor
///
/// Operands that must be materialized but cannot be assigned in parallel
/// themselves are evaluated once up front, and the reduction of the result
/// is then assigned with the default strategy.
pub fn smp_assign_with<V, A, M, OP, E>(
    target: &mut V,
    expr: &DMatReduceExpr<'_, A, M, OP>,
    engine: &E,
    flavor: AssignFlavor,
) where
    V: VectorMut<Element = M::Element>,
    A: Axis,
    M: Matrix,
    OP: ReduceOp<M::Element>,
    E: ExecutionEngine<M::Element>,
{
    if use_smp_assign::<M>() {
        log::trace!("{}: reduction-specific parallel assignment", flavor.name());
        let tmp = expr.operand().evaluate();
        let inner = DMatReduceExpr::<A, _, _>::new(&tmp, expr.operation());
        smp_default(target, &inner, engine, flavor);
    } else {
        smp_default(target, expr, engine, flavor);
    }
}

/// Default parallel strategy: split the result across the engine when it is
/// parallel and the expression allows it, assign serially otherwise
fn smp_default<V, A, M, OP, E>(
    target: &mut V,
    expr: &DMatReduceExpr<'_, A, M, OP>,
    engine: &E,
    flavor: AssignFlavor,
) where
    V: VectorMut<Element = M::Element>,
    A: Axis,
    M: Matrix,
    OP: ReduceOp<M::Element>,
    E: ExecutionEngine<M::Element>,
{
    if V::IS_SPARSE || !engine.is_parallel() || !expr.can_smp_assign() {
        log::trace!("{}: serial assignment", flavor.name());
        assign_with(target, expr, flavor);
        return;
    }

    if M::REQUIRES_EVALUATION {
        let tmp = expr.operand().evaluate();
        let inner = DMatReduceExpr::<A, _, _>::new(&tmp, expr.operation());
        parallel_fill(target, &inner, engine, flavor);
    } else {
        parallel_fill(target, expr, engine, flavor);
    }
}

/// Compute result chunks on the engine and write them on the caller's thread
///
/// Vectorized lines are collapsed with the engine's primitives.
fn parallel_fill<V, A, M, OP, E>(
    target: &mut V,
    expr: &DMatReduceExpr<'_, A, M, OP>,
    engine: &E,
    flavor: AssignFlavor,
) where
    V: VectorMut<Element = M::Element>,
    A: Axis,
    M: Matrix,
    OP: ReduceOp<M::Element>,
    E: ExecutionEngine<M::Element>,
{
    let n = expr.size();
    debug_assert_eq!(target.size(), n, "invalid vector sizes");
    if n == 0 {
        return;
    }

    let chunk = E::chunk_size(n, engine.num_threads()).max(1);
    let chunks = n.div_ceil(chunk);
    log::trace!(
        "{}: {} entries in {} chunks of {} on {} threads",
        flavor.name(),
        n,
        chunks,
        chunk,
        engine.num_threads()
    );

    let parts = engine.execute_batch(chunks, |c| {
        let start = c * chunk;
        let end = (start + chunk).min(n);
        let backend = engine.primitives();
        (start..end).map(|i| expr.get_with(i, backend)).collect::<Vec<_>>()
    });

    for (i, value) in parts.into_iter().flatten().enumerate() {
        match flavor {
            AssignFlavor::Assign => target.set(i, value),
            _ => target.update(i, |acc| flavor.combine(acc, value)),
        }
    }
}
