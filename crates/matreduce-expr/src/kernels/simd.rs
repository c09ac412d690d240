//! Vectorized reduction kernels
//!
//! Both kernels walk a row-major operand in blocks of four, two and one
//! rows, combining lane packs of `LANES` consecutive columns. They are only
//! selected for row-major operands with SIMD-enabled storage.

use crate::ops::{OpKind, ReduceOp};
use matreduce_core::{ComputePrimitives, Element, LanePack, Matrix, Zero};

/// Collapse an accumulated pack into one scalar on `backend`
///
/// Products and sums use the backend's horizontal steps; any other
/// operation combines lanes one after another.
pub(crate) fn finish_pack<T, OP, P>(pack: &T::Pack, op: &OP, backend: &P) -> T
where
    T: Element,
    OP: ReduceOp<T>,
    P: ComputePrimitives<T>,
{
    match OP::KIND {
        OpKind::Add => backend.horizontal_sum(pack),
        OpKind::Mult => backend.horizontal_product(pack),
        _ => backend.horizontal_combine(pack, |a, b| op.apply(a, b)),
    }
}

/// Reduce `R` consecutive rows starting at `i` into one pack
///
/// Columns past `jpos` are folded into lane 0 of each row's pack.
#[inline]
fn row_block<M, OP, const R: usize>(
    m: &M,
    op: &OP,
    i: usize,
    jpos: usize,
) -> <M::Element as Element>::Pack
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    let lanes = <M::Element as Element>::LANES;
    let n = m.columns();

    let mut xmm: [<M::Element as Element>::Pack; R] = std::array::from_fn(|r| m.load(i + r, 0));

    let mut j = lanes;
    while j < jpos {
        for (r, acc) in xmm.iter_mut().enumerate() {
            *acc = op.apply_pack(*acc, m.load(i + r, j));
        }
        j += lanes;
    }
    for j in jpos..n {
        for (r, acc) in xmm.iter_mut().enumerate() {
            let lane = acc.lane_mut(0);
            *lane = op.apply(*lane, m.get(i + r, j));
        }
    }

    xmm[1..].iter().fold(xmm[0], |a, &b| op.apply_pack(a, b))
}

/// Vectorized reduction with an arbitrary operation
pub fn reduce_generic<M, OP>(m: &M, op: &OP) -> M::Element
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    let rows = m.rows();
    let n = m.columns();
    let lanes = <M::Element as Element>::LANES;
    debug_assert!(rows > 0 && n > 0, "empty operand reached the SIMD kernel");

    if n < lanes {
        let first = (1..n).fold(m.get(0, 0), |acc, j| op.apply(acc, m.get(0, j)));
        return (1..rows)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .fold(first, |acc, (i, j)| op.apply(acc, m.get(i, j)));
    }

    let jpos = n - n % lanes;
    let mut xmm1 = row_block::<M, OP, 1>(m, op, 0, jpos);

    let mut i = 1;
    while i + 4 <= rows {
        xmm1 = op.apply_pack(xmm1, row_block::<M, OP, 4>(m, op, i, jpos));
        i += 4;
    }
    if i + 2 <= rows {
        xmm1 = op.apply_pack(xmm1, row_block::<M, OP, 2>(m, op, i, jpos));
        i += 2;
    }
    if i < rows {
        xmm1 = op.apply_pack(xmm1, row_block::<M, OP, 1>(m, op, i, jpos));
    }

    finish_pack(&xmm1, op, &M::Element::backend())
}

/// Sum `R` consecutive rows starting at `i`
///
/// Returns the lane pack and the scalar sum of the remainder columns.
#[inline]
fn add_block<M, const R: usize>(
    m: &M,
    i: usize,
    jpos: usize,
    remainder: bool,
) -> (<M::Element as Element>::Pack, M::Element)
where
    M: Matrix,
{
    let lanes = <M::Element as Element>::LANES;
    let n = m.columns();
    let add = |a: <M::Element as Element>::Pack, b| a.zip_with(b, |x, y| x + y);

    let mut xmm: [<M::Element as Element>::Pack; R] = std::array::from_fn(|r| m.load(i + r, 0));

    let mut j = lanes;
    while j < jpos {
        for (r, acc) in xmm.iter_mut().enumerate() {
            *acc = add(*acc, m.load(i + r, j));
        }
        j += lanes;
    }

    let mut tail = M::Element::zero();
    if remainder {
        for j in j..n {
            for r in 0..R {
                tail = tail + m.get(i + r, j);
            }
        }
    }

    (xmm[1..].iter().fold(xmm[0], |a, &b| add(a, b)), tail)
}

/// Vectorized summation
///
/// Without `remainder` the operand must be padded: full packs are loaded up
/// to the end of each row and the zero padding lanes add nothing.
pub fn reduce_add<M: Matrix>(m: &M, remainder: bool) -> M::Element {
    let rows = m.rows();
    let n = m.columns();
    let lanes = <M::Element as Element>::LANES;
    debug_assert!(rows > 0 && n > 0, "empty operand reached the SIMD kernel");

    if remainder && n < lanes {
        return (0..rows)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .fold(M::Element::zero(), |acc, (i, j)| acc + m.get(i, j));
    }

    let jpos = if remainder { n - n % lanes } else { n };
    let mut xmm1 = <M::Element as Element>::Pack::splat(M::Element::zero());
    let mut redux = M::Element::zero();
    let mut accumulate = |(pack, tail): (<M::Element as Element>::Pack, M::Element)| {
        xmm1 = xmm1.zip_with(pack, |x, y| x + y);
        redux = redux + tail;
    };

    let mut i = 0;
    while i + 4 <= rows {
        accumulate(add_block::<M, 4>(m, i, jpos, remainder));
        i += 4;
    }
    if i + 2 <= rows {
        accumulate(add_block::<M, 2>(m, i, jpos, remainder));
        i += 2;
    }
    if i < rows {
        accumulate(add_block::<M, 1>(m, i, jpos, remainder));
    }

    redux + M::Element::backend().horizontal_sum(&xmm1)
}
