//! Scalar reduction kernel

use crate::ops::ReduceOp;
use matreduce_core::Matrix;

/// Reduce every element of `m` with `op`, two rows at a time
///
/// Works for any operand and storage order; callers handle empty operands.
pub fn reduce<M, OP>(m: &M, op: &OP) -> M::Element
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    let rows = m.rows();
    let n = m.columns();
    debug_assert!(rows > 0 && n > 0, "empty operand reached the scalar kernel");

    let mut redux0 = (1..n).fold(m.get(0, 0), |acc, j| op.apply(acc, m.get(0, j)));

    let mut i = 1;
    while i + 2 <= rows {
        let mut redux1 = m.get(i, 0);
        let mut redux2 = m.get(i + 1, 0);
        for j in 1..n {
            redux1 = op.apply(redux1, m.get(i, j));
            redux2 = op.apply(redux2, m.get(i + 1, j));
        }
        redux0 = op.apply(redux0, op.apply(redux1, redux2));
        i += 2;
    }

    if i < rows {
        let redux1 = (1..n).fold(m.get(i, 0), |acc, j| op.apply(acc, m.get(i, j)));
        redux0 = op.apply(redux0, redux1);
    }

    redux0
}
