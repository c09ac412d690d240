//! Single-line reductions used by partial reductions

use super::simd::finish_pack;
use crate::expressions::Trans;
use crate::ops::ReduceOp;
use crate::simd::simd_enabled;
use matreduce_core::{Composite, ComputePrimitives, Element, LanePack, Matrix};

/// Reduce row `i` of `m` with `op`
///
/// Row-major SIMD-enabled operands are reduced a pack at a time. An empty
/// row reduces to the default element.
pub fn reduce_row<M, OP>(m: &M, i: usize, op: &OP) -> M::Element
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    reduce_row_with(m, i, op, &M::Element::backend())
}

/// [`reduce_row`] with the final pack collapsed on `backend`
pub fn reduce_row_with<M, OP, P>(m: &M, i: usize, op: &OP, backend: &P) -> M::Element
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
    P: ComputePrimitives<M::Element>,
{
    let n = m.columns();
    debug_assert!(i < m.rows(), "row index {i} out of bounds");
    if n == 0 {
        return M::Element::default();
    }

    let lanes = <M::Element as Element>::LANES;
    if M::SIMD_ENABLED && n >= lanes && simd_enabled::<M, OP>() {
        let jpos = n - n % lanes;
        let mut xmm = m.load(i, 0);
        let mut j = lanes;
        while j < jpos {
            xmm = op.apply_pack(xmm, m.load(i, j));
            j += lanes;
        }
        for j in jpos..n {
            let lane = xmm.lane_mut(0);
            *lane = op.apply(*lane, m.get(i, j));
        }
        return finish_pack(&xmm, op, backend);
    }

    (1..n).fold(m.get(i, 0), |acc, j| op.apply(acc, m.get(i, j)))
}

/// Reduce column `j` of `m` with `op`
///
/// Column-major operands reduce the matching row of their transpose, so
/// contiguous columns take the vectorized path as well.
pub fn reduce_column<M, OP>(m: &M, j: usize, op: &OP) -> M::Element
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    reduce_column_with(m, j, op, &M::Element::backend())
}

/// [`reduce_column`] with the final pack collapsed on `backend`
pub fn reduce_column_with<M, OP, P>(m: &M, j: usize, op: &OP, backend: &P) -> M::Element
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
    P: ComputePrimitives<M::Element>,
{
    if !M::STORAGE.is_row_major() {
        let view = Trans::from_composite(Composite::Borrowed(m));
        return reduce_row_with(&view, j, op, backend);
    }

    let rows = m.rows();
    debug_assert!(j < m.columns(), "column index {j} out of bounds");
    if rows == 0 {
        return M::Element::default();
    }
    (1..rows).fold(m.get(0, j), |acc, i| op.apply(acc, m.get(i, j)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{Add, Max, Mult};
    use matreduce_core::{DynamicMatrix, COLUMN_MAJOR};

    #[test]
    fn test_rows_of_every_width() {
        for cols in 1..=19 {
            let m = DynamicMatrix::<f32>::from_fn(2, cols, |i, j| (i + j) as f32);
            for i in 0..2 {
                let expected: f32 = (0..cols).map(|j| (i + j) as f32).sum();
                assert_eq!(reduce_row(&m, i, &Add), expected, "cols = {cols}");
                assert_eq!(reduce_row(&m, i, &Max), (i + cols - 1) as f32);
            }
        }
    }

    #[test]
    fn test_columns_in_both_storage_orders() {
        let rm = DynamicMatrix::<i64>::from_fn(9, 3, |i, j| (i * 3 + j) as i64 + 1);
        let cm = rm.to_storage::<COLUMN_MAJOR>();
        for j in 0..3 {
            let expected: i64 = (0..9).map(|i| (i * 3 + j) as i64 + 1).sum();
            assert_eq!(reduce_column(&rm, j, &Add), expected);
            assert_eq!(reduce_column(&cm, j, &Add), expected);
            assert_eq!(reduce_column(&rm, j, &Mult), reduce_column(&cm, j, &Mult));
        }
    }

    #[test]
    fn test_empty_lines() {
        let wide = DynamicMatrix::<f64>::new(2, 0);
        assert_eq!(reduce_row(&wide, 1, &Mult), 0.0);
        let tall = DynamicMatrix::<f64>::new(0, 2);
        assert_eq!(reduce_column(&tall, 1, &Mult), 0.0);
    }
}
