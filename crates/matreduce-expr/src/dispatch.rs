//! Evaluation-strategy dispatcher
//!
//! Picks the kernel for a total reduction from the static classification of
//! the operand and the operation. Predicates are checked in a fixed order:
//! storage order first, then SIMD capability, then the operation identity.

use crate::expressions::Trans;
use crate::kernels::{scalar, simd};
use crate::ops::{OpKind, ReduceOp};
use crate::simd::{remainder_required, simd_enabled};
use matreduce_core::{Composite, Matrix};
use std::fmt;

/// Kernel used for a total reduction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReductionKernel {
    /// Two-way row-unrolled scalar accumulation
    Scalar,
    /// Vectorized kernel for an arbitrary operation
    SimdGeneric,
    /// Vectorized summation
    SimdAdd,
    /// Column-major operand, reduced through its row-major transpose
    TransposeDelegate,
}

impl ReductionKernel {
    pub fn name(self) -> &'static str {
        match self {
            ReductionKernel::Scalar => "scalar",
            ReductionKernel::SimdGeneric => "simd-generic",
            ReductionKernel::SimdAdd => "simd-add",
            ReductionKernel::TransposeDelegate => "transpose-delegate",
        }
    }
}

impl fmt::Display for ReductionKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Select the kernel for reducing `M` with `OP`
///
/// Operands that require evaluation are classified by their result type,
/// since that is what the kernel reads.
pub fn select_kernel<M, OP>() -> ReductionKernel
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    let storage = if M::REQUIRES_EVALUATION {
        <M::ResultType as Matrix>::STORAGE
    } else {
        M::STORAGE
    };

    let kernel = if !storage.is_row_major() {
        ReductionKernel::TransposeDelegate
    } else if !simd_enabled::<M, OP>() {
        ReductionKernel::Scalar
    } else if OP::KIND == OpKind::Add {
        ReductionKernel::SimdAdd
    } else {
        ReductionKernel::SimdGeneric
    };

    log::trace!(
        "reduction of {} with {:?} uses the {} kernel",
        std::any::type_name::<M>(),
        OP::KIND,
        kernel
    );
    kernel
}

/// Whether the reduction-specific parallel assignment applies to `M`
///
/// Only operands that cannot be assigned in parallel themselves but must be
/// materialized anyway take it; everything else uses the default strategy.
pub fn use_smp_assign<M: Matrix>() -> bool {
    !M::SMP_ASSIGNABLE && M::REQUIRES_EVALUATION
}

/// Reduce every element of `m` with `op`
///
/// An empty operand reduces to the default element and a 1x1 operand to its
/// sole element, without applying `op`.
pub fn dmat_reduce<M, OP>(m: &M, op: &OP) -> M::Element
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    let (rows, columns) = (m.rows(), m.columns());
    if rows == 0 || columns == 0 {
        return M::Element::default();
    }
    if rows == 1 && columns == 1 {
        return m.get(0, 0);
    }

    if M::REQUIRES_EVALUATION {
        let tmp = m.evaluate();
        return reduce_operand(&tmp, op);
    }
    reduce_operand(m, op)
}

/// Reduce an operand that no longer requires evaluation
fn reduce_operand<M, OP>(m: &M, op: &OP) -> M::Element
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    if M::STORAGE.is_row_major() {
        run_kernel(m, op)
    } else {
        let view = Trans::from_composite(Composite::Borrowed(m));
        run_kernel(&view, op)
    }
}

/// Run the kernel selected for a row-major operand
fn run_kernel<M, OP>(m: &M, op: &OP) -> M::Element
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    match select_kernel::<M, OP>() {
        ReductionKernel::SimdAdd => simd::reduce_add(m, remainder_required::<M>()),
        ReductionKernel::SimdGeneric => simd::reduce_generic(m, op),
        ReductionKernel::Scalar => scalar::reduce(m, op),
        ReductionKernel::TransposeDelegate => {
            debug_assert!(false, "column-major operand reached the kernel stage");
            scalar::reduce(m, op)
        }
    }
}
