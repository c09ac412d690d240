//! Lazy expression nodes
//!
//! Expression nodes capture their operands through
//! [`Composite`](matreduce_core::Composite) and are themselves cheap to
//! clone, so they nest freely: `sum_along::<1>(&trans(&scale(&a, 2.0)))`
//! builds three nodes and touches no elements until it is read or assigned.

mod eval;
mod mat_mult;
mod reduce;
mod scalar_mult;
mod trans;

pub use eval::Evaluated;
pub use mat_mult::MatMatMult;
pub use reduce::{Axis, ColumnwiseReduce, DMatReduceExpr, Flag, ReduceIter, RowwiseReduce};
pub use scalar_mult::MatScalarMult;
pub use trans::Trans;
