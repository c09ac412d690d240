//! Equivalence tests comparing dispatched reductions with brute-force
//! double-loop references

mod common;

use common::*;
use matreduce_core::{
    sequential, CompressedMatrix, CompressedVector, DynamicMatrix, DynamicVector, Error, Matrix,
    COLUMN_MAJOR, ROW_MAJOR,
};
use matreduce_expr::{
    add_assign, assign, eval, mat_mul, max, max_along, min, min_along, prod, prod_along, reduce,
    reduce_along, scale, smp_assign, sub_assign, sum, sum_along, trans, Add, FnOp, Max,
};
use proptest::prelude::*;

#[test]
fn test_sum_matches_brute_force_all_shapes() {
    let lengths = edge_case_lengths();
    for &rows in &lengths {
        for &cols in &lengths {
            let seed = (rows * 100 + cols) as u64;
            let rm = random_matrix::<ROW_MAJOR>(rows, cols, seed);
            let cm = rm.to_storage::<COLUMN_MAJOR>();
            let expected = brute_reduce(&rm, 0.0, |a, b| a + b);

            assert_relative_eq!(sum(&rm), expected, epsilon = EPSILON);
            assert_relative_eq!(sum(&cm), expected, epsilon = EPSILON);
        }
    }
}

#[test]
fn test_order_independent_ops_are_exact() {
    let lengths = edge_case_lengths();
    for &rows in &lengths {
        for &cols in &lengths {
            let rm = random_matrix::<ROW_MAJOR>(rows, cols, 7 + (rows * cols) as u64);
            let cm = rm.to_storage::<COLUMN_MAJOR>();
            let expected_max = brute_reduce(&rm, 0.0, f64::max);
            let expected_min = brute_reduce(&rm, 0.0, f64::min);

            assert_eq!(max(&rm), expected_max, "{rows}x{cols} max");
            assert_eq!(max(&cm), expected_max, "{rows}x{cols} max (column-major)");
            assert_eq!(min(&rm), expected_min, "{rows}x{cols} min");
            assert_eq!(min(&cm), expected_min, "{rows}x{cols} min (column-major)");
        }
    }
}

#[test]
fn test_product_matches_brute_force() {
    let lengths = edge_case_lengths();
    for &rows in &lengths {
        for &cols in &lengths {
            let m = DynamicMatrix::<f64>::from_fn(rows, cols, |i, j| {
                1.0 + ((i * 7 + j * 3) % 5) as f64 * 0.01
            });
            let expected = brute_reduce(&m, 0.0, |a, b| a * b);
            assert_relative_eq!(prod(&m), expected, max_relative = 1e-12);
            assert_relative_eq!(
                prod(&m.to_storage::<COLUMN_MAJOR>()),
                expected,
                max_relative = 1e-12
            );
        }
    }
}

#[test]
fn test_partial_reductions_match_lines() {
    let lengths = edge_case_lengths();
    for &rows in &lengths {
        for &cols in &lengths {
            let rm = pattern_matrix::<ROW_MAJOR>(rows, cols);
            let cm = pattern_matrix::<COLUMN_MAJOR>(rows, cols);

            let columns = brute_columns(&rm, |a, b| a + b);
            let row_sums = brute_rows(&rm, |a, b| a + b);
            let column_max = brute_columns(&rm, |a, b| a.max(b));
            let row_max = brute_rows(&rm, |a, b| a.max(b));

            assert_eq!(sum_along::<0, _>(&rm).evaluate().into_vec(), columns);
            assert_eq!(sum_along::<0, _>(&cm).evaluate().into_vec(), columns);
            assert_eq!(sum_along::<1, _>(&rm).evaluate().into_vec(), row_sums);
            assert_eq!(sum_along::<1, _>(&cm).evaluate().into_vec(), row_sums);
            assert_eq!(max_along::<0, _>(&cm).evaluate().into_vec(), column_max);
            assert_eq!(max_along::<1, _>(&rm).evaluate().into_vec(), row_max);

            // element access agrees with bulk assignment
            let lazy = sum_along::<0, _>(&cm);
            for (j, &expected) in columns.iter().enumerate() {
                assert_eq!(lazy.get(j), expected);
            }
        }
    }
}

#[test]
fn test_reference_scenarios() {
    let m = DynamicMatrix::<f64>::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    assert_eq!(sum(&m), 10.0);
    assert_eq!(prod(&m), 24.0);
    assert_eq!(sum_along::<0, _>(&m).evaluate().as_slice(), &[4.0, 6.0]);
    assert_eq!(sum_along::<1, _>(&m).evaluate().as_slice(), &[3.0, 7.0]);

    let m = DynamicMatrix::<f64>::from_rows(&[[1.0, 0.0, 2.0], [1.0, 3.0, 4.0]]).unwrap();
    assert_eq!(prod_along::<0, _>(&m).evaluate().as_slice(), &[1.0, 0.0, 8.0]);
    assert_eq!(prod_along::<1, _>(&m).evaluate().as_slice(), &[0.0, 12.0]);
}

#[test]
fn test_checked_access() {
    let m = pattern_matrix::<ROW_MAJOR>(3, 5);
    let cw = sum_along::<0, _>(&m);
    let rw = sum_along::<1, _>(&m);

    for j in 0..5 {
        assert_eq!(cw.at(j).unwrap(), cw.get(j));
    }
    assert!(matches!(cw.at(5), Err(Error::OutOfRange { index: 5, size: 5 })));
    assert!(rw.at(2).is_ok());
    assert!(matches!(rw.at(3), Err(Error::OutOfRange { index: 3, size: 3 })));
}

#[test]
fn test_degenerate_inputs() {
    assert_eq!(sum(&DynamicMatrix::<f64>::new(0, 0)), 0.0);
    assert_eq!(prod(&DynamicMatrix::<i32>::new(0, 5)), 0);
    assert_eq!(max(&DynamicMatrix::<i64, COLUMN_MAJOR>::new(5, 0)), 0);

    let single = DynamicMatrix::<f64>::from_vec(1, 1, vec![-2.5]).unwrap();
    let never = FnOp::new(|_: f64, _: f64| -> f64 { unreachable!() }, 0.0);
    assert_eq!(reduce(&single, never), -2.5);
}

#[test]
fn test_add_assign_adds_reduction() {
    let m = random_matrix::<COLUMN_MAJOR>(9, 17, 3);
    let old: Vec<f64> = (0..17).map(|j| j as f64 * 0.25).collect();
    let mut target = DynamicVector::from_vec(old.clone());

    let expr = sum_along::<0, _>(&m);
    add_assign(&mut target, &expr);
    let expected: Vec<f64> = old
        .iter()
        .zip(expr.evaluate().iter())
        .map(|(o, r)| o + r)
        .collect();
    assert_vectors_equal(target.as_slice(), &expected, "add-assign");

    sub_assign(&mut target, &expr);
    assert_vectors_equal(target.as_slice(), &old, "sub-assign");
}

#[test]
fn test_expression_operands() {
    let a = random_matrix::<ROW_MAJOR>(6, 9, 11);
    let b = random_matrix::<COLUMN_MAJOR>(9, 5, 12);

    // sum(trans(A) * 3) == 3 * sum(A)
    let t = trans(&a);
    assert_relative_eq!(sum(&scale(&t, 3.0)), 3.0 * sum(&a), epsilon = EPSILON);

    // row sums of trans(A) are the column sums of A
    assert_vectors_equal(
        sum_along::<1, _>(&t).evaluate().as_slice(),
        sum_along::<0, _>(&a).evaluate().as_slice(),
        "trans",
    );

    // reductions of a product go through its evaluated form
    let p = mat_mul(&a, &b).unwrap();
    let evaluated = p.evaluate();
    assert_relative_eq!(sum(&p), sum(&evaluated), epsilon = EPSILON);
    assert_vectors_equal(
        sum_along::<1, _>(&p).evaluate().as_slice(),
        sum_along::<1, _>(&evaluated).evaluate().as_slice(),
        "product rows",
    );
    assert_eq!(max(&eval(&p)), max(&evaluated));
    assert_eq!(
        min_along::<0, _>(&p).evaluate(),
        min_along::<0, _>(&evaluated).evaluate()
    );
}

#[test]
fn test_sparse_operand_and_target() {
    let dense = pattern_matrix::<ROW_MAJOR>(8, 6);
    let sparse = CompressedMatrix::from_matrix(&dense);
    assert_eq!(sum(&sparse), sum(&dense));
    assert_eq!(max(&sparse), max(&dense));
    assert_eq!(
        sum_along::<1, _>(&sparse).evaluate(),
        sum_along::<1, _>(&dense).evaluate()
    );

    let expr = reduce_along::<0, _, _>(&dense, Max);
    let mut target = CompressedVector::with_size(6);
    assign(&mut target, &expr);
    assert_eq!(target.to_dense(), expr.evaluate());
    assert!(target.nnz() <= 6);
}

#[test]
fn test_smp_assign_matches_serial() {
    let m = random_matrix::<ROW_MAJOR>(64, 33, 5);
    let expr = reduce_along::<1, _, _>(&m, Add);
    let engine = sequential::<f64>();

    let mut smp = DynamicVector::new(64);
    smp_assign(&mut smp, &expr, &engine);
    assert_eq!(smp, expr.evaluate());
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_engine_matches_serial() {
    let m = random_matrix::<COLUMN_MAJOR>(1000, 12, 9);
    let engine = matreduce_core::parallel::<f64>().unwrap();
    let expr = sum_along::<1, _>(&m);
    assert!(expr.can_smp_assign());

    let mut smp = DynamicVector::new(1000);
    smp_assign(&mut smp, &expr, &engine);
    assert_eq!(smp, expr.evaluate());
}

fn int_matrix() -> impl Strategy<Value = DynamicMatrix<i64>> {
    (0usize..12, 0usize..12).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(-1000i64..1000, rows * cols)
            .prop_map(move |values| DynamicMatrix::from_vec(rows, cols, values).unwrap())
    })
}

proptest! {
    #[test]
    fn prop_sum_matches_brute_force(m in int_matrix()) {
        let expected = brute_reduce(&m, 0, |a, b| a + b);
        prop_assert_eq!(sum(&m), expected);
        prop_assert_eq!(sum(&m.to_storage::<COLUMN_MAJOR>()), expected);
    }

    #[test]
    fn prop_partial_sums_add_up(m in int_matrix()) {
        let total = sum(&m);
        let by_columns: i64 = sum_along::<0, _>(&m).evaluate().iter().sum();
        let by_rows: i64 = sum_along::<1, _>(&m).iter().sum();
        if m.rows() > 0 {
            prop_assert_eq!(by_columns, total);
        }
        if m.columns() > 0 {
            prop_assert_eq!(by_rows, total);
        }
    }

    #[test]
    fn prop_max_is_an_upper_bound(m in int_matrix()) {
        prop_assume!(m.rows() > 0 && m.columns() > 0);
        let top = max(&m);
        let row_max = max_along::<1, _>(&m).evaluate();
        prop_assert!(row_max.iter().all(|&x| x <= top));
        prop_assert!(row_max.iter().any(|&x| x == top));
    }
}
