//! Public reduction and expression-building functions
//!
//! # Examples
//!
//! ```
//! use matreduce_expr::prelude::*;
//!
//! let m = DynamicMatrix::<f64>::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
//! assert_eq!(sum(&m), 10.0);
//! assert_eq!(prod(&m), 24.0);
//!
//! let columns = sum_along::<0, _>(&m);
//! assert_eq!(columns.evaluate().as_slice(), &[4.0, 6.0]);
//! let rows = sum_along::<1, _>(&m);
//! assert_eq!(rows.iter().collect::<Vec<_>>(), vec![3.0, 7.0]);
//! ```

use crate::dispatch::dmat_reduce;
use crate::expressions::{
    Axis, DMatReduceExpr, Evaluated, Flag, MatMatMult, MatScalarMult, Trans,
};
use crate::ops::{Add, Max, Min, Mult, ReduceOp};
use matreduce_core::{Matrix, Result};

/// Reduce every element of `m` with `op`
///
/// The reduction order is unspecified; use associative and commutative
/// operations for deterministic results.
pub fn reduce<M, OP>(m: &M, op: OP) -> M::Element
where
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    dmat_reduce(m, &op)
}

/// Reduce `m` along axis `RF`: 0 reduces each column, 1 reduces each row
pub fn reduce_along<const RF: usize, M, OP>(m: &M, op: OP) -> DMatReduceExpr<'_, Flag<RF>, M, OP>
where
    Flag<RF>: Axis,
    M: Matrix,
    OP: ReduceOp<M::Element>,
{
    DMatReduceExpr::new(m, op)
}

/// Sum of all elements
pub fn sum<M: Matrix>(m: &M) -> M::Element {
    reduce(m, Add)
}

/// Column sums (`RF = 0`) or row sums (`RF = 1`)
pub fn sum_along<const RF: usize, M: Matrix>(m: &M) -> DMatReduceExpr<'_, Flag<RF>, M, Add>
where
    Flag<RF>: Axis,
{
    reduce_along::<RF, _, _>(m, Add)
}

/// Product of all elements
pub fn prod<M: Matrix>(m: &M) -> M::Element {
    reduce(m, Mult)
}

/// Column products (`RF = 0`) or row products (`RF = 1`)
pub fn prod_along<const RF: usize, M: Matrix>(m: &M) -> DMatReduceExpr<'_, Flag<RF>, M, Mult>
where
    Flag<RF>: Axis,
{
    reduce_along::<RF, _, _>(m, Mult)
}

/// Largest element; zero for an empty matrix
pub fn max<M: Matrix>(m: &M) -> M::Element {
    reduce(m, Max)
}

pub fn max_along<const RF: usize, M: Matrix>(m: &M) -> DMatReduceExpr<'_, Flag<RF>, M, Max>
where
    Flag<RF>: Axis,
{
    reduce_along::<RF, _, _>(m, Max)
}

/// Smallest element; zero for an empty matrix
pub fn min<M: Matrix>(m: &M) -> M::Element {
    reduce(m, Min)
}

pub fn min_along<const RF: usize, M: Matrix>(m: &M) -> DMatReduceExpr<'_, Flag<RF>, M, Min>
where
    Flag<RF>: Axis,
{
    reduce_along::<RF, _, _>(m, Min)
}

/// Transpose view of `m`
pub fn trans<M: Matrix>(m: &M) -> Trans<'_, M> {
    Trans::new(m)
}

/// Lazy `m * s`
pub fn scale<M: Matrix>(m: &M, s: M::Element) -> MatScalarMult<'_, M> {
    MatScalarMult::new(m, s)
}

/// Lazy matrix product `a * b`
///
/// Fails with [`matreduce_core::Error::SizeMismatch`] when the column count
/// of `a` differs from the row count of `b`.
pub fn mat_mul<'a, A, B>(a: &'a A, b: &'a B) -> Result<MatMatMult<'a, A, B>>
where
    A: Matrix,
    B: Matrix<Element = A::Element>,
{
    MatMatMult::new(a, b)
}

/// Mark `m` for evaluation before it is reduced or assigned
pub fn eval<M: Matrix>(m: &M) -> Evaluated<'_, M> {
    Evaluated::new(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use matreduce_core::{DynamicMatrix, COLUMN_MAJOR};

    #[test]
    fn test_reference_values() {
        let m = DynamicMatrix::<i32>::from_rows(&[[1, 2], [3, 4]]).unwrap();
        assert_eq!(sum(&m), 10);
        assert_eq!(prod(&m), 24);
        assert_eq!(max(&m), 4);
        assert_eq!(min(&m), 1);
        assert_eq!(sum_along::<0, _>(&m).evaluate().as_slice(), &[4, 6]);
        assert_eq!(sum_along::<1, _>(&m).evaluate().as_slice(), &[3, 7]);

        let m = DynamicMatrix::<i32>::from_rows(&[[1, 0, 2], [1, 3, 4]]).unwrap();
        assert_eq!(prod_along::<0, _>(&m).evaluate().as_slice(), &[1, 0, 8]);
        assert_eq!(prod_along::<1, _>(&m).evaluate().as_slice(), &[0, 12]);
        assert_eq!(max_along::<0, _>(&m).evaluate().as_slice(), &[1, 3, 4]);
        assert_eq!(min_along::<1, _>(&m).evaluate().as_slice(), &[0, 1]);
    }

    #[test]
    fn test_nested_expressions() {
        let a = DynamicMatrix::<f64, COLUMN_MAJOR>::from_fn(3, 4, |i, j| (i * 4 + j) as f64);
        let t = trans(&a);
        let s = scale(&t, 2.0);
        assert_eq!(sum(&s), 2.0 * sum(&a));
        assert_eq!(
            sum_along::<1, _>(&s).evaluate(),
            sum_along::<0, _>(&scale(&a, 2.0)).evaluate()
        );
        assert_eq!(max(&eval(&s)), 22.0);
    }

    #[test]
    fn test_mat_mul_reduction() {
        let a = DynamicMatrix::<i64>::from_fn(2, 3, |i, j| (i + j) as i64);
        let b = DynamicMatrix::<i64>::from_fn(3, 2, |i, j| (i * j) as i64);
        let p = mat_mul(&a, &b).unwrap();
        let r = p.evaluate();
        assert_eq!(sum(&p), sum(&r));
        assert!(mat_mul(&a, &a).is_err());
    }
}
