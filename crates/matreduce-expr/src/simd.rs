//! SIMD capability detection
//!
//! Decides whether a reduction of a given operand with a given operation may
//! take a vectorized kernel, and whether that kernel has to run a scalar
//! remainder loop at the end of each row.

use crate::ops::ReduceOp;
use matreduce_core::{config, Element, Matrix};

/// Storage flags of the operand a kernel actually reads
///
/// Operands that require evaluation are materialized first, so the flags of
/// their result type apply.
struct KernelOperand {
    simd_enabled: bool,
    padded: bool,
    row_major: bool,
}

impl KernelOperand {
    fn of<M: Matrix>() -> Self {
        if M::REQUIRES_EVALUATION {
            Self {
                simd_enabled: <M::ResultType as Matrix>::SIMD_ENABLED,
                padded: <M::ResultType as Matrix>::IS_PADDED,
                row_major: <M::ResultType as Matrix>::STORAGE.is_row_major(),
            }
        } else {
            Self {
                simd_enabled: M::SIMD_ENABLED,
                padded: M::IS_PADDED,
                row_major: M::STORAGE.is_row_major(),
            }
        }
    }
}

/// Whether the operation has a usable vectorized path for `T`
///
/// An explicit capability flag wins; a probe is called every time.
/// Operations without a flag are vectorizable iff they expose a pack
/// application.
pub fn op_simd_enabled<T: Element, OP: ReduceOp<T>>() -> bool {
    match OP::simd_enabled() {
        Some(flag) => flag.resolve(),
        None => OP::HAS_PACK_APPLY,
    }
}

/// Whether reducing `M` with `OP` may use a vectorized kernel
pub fn simd_enabled<M, OP>() -> bool
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    if !cfg!(feature = "simd") || config::current().simd.is_disabled() {
        return false;
    }
    let operand = KernelOperand::of::<M>();
    operand.row_major
        && <M::Element as Element>::LANES > 1
        && operand.simd_enabled
        && op_simd_enabled::<M::Element, OP>()
}

/// Whether the addition kernel must finish rows with a scalar remainder loop
///
/// The remainder is skipped only when padding is enabled and the operand
/// storage is padded, since the padding lanes are zero.
pub fn remainder_required<M: Matrix>() -> bool {
    !(config::current().use_padding && KernelOperand::of::<M>().padded)
}
