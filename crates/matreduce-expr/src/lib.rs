//! Lazy dense-matrix reduction expressions
//!
//! This crate builds on `matreduce-core` to provide reductions of dense
//! matrices: total reductions (`sum`, `prod`, `max`, `min`, or any
//! [`ReduceOp`]) and partial reductions along one axis, represented by the
//! lazy [`DMatReduceExpr`] node.
//!
//! # Architecture
//!
//! - [`ops`]: reduction operation descriptors with static capability flags
//! - [`simd`]: decides whether a vectorized kernel is legal
//! - [`kernels`]: scalar, vectorized and single-line reduction kernels
//! - [`dispatch`]: selects the kernel for a total reduction
//! - [`expressions`]: expression nodes (reduction, transpose, scaling,
//!   product, explicit evaluation)
//! - [`assign`]: serial and parallel assignment of partial reductions into
//!   dense and sparse vectors
//!
//! # Example
//!
//! ```rust
//! use matreduce_expr::prelude::*;
//!
//! let m = DynamicMatrix::<f64>::from_rows(&[[1.0, 0.0, 2.0], [1.0, 3.0, 4.0]]).unwrap();
//!
//! let col_products = prod_along::<0, _>(&m);
//! assert_eq!(col_products.evaluate().as_slice(), &[1.0, 0.0, 8.0]);
//!
//! // Accumulate row sums into an existing vector
//! let mut acc = DynamicVector::from_vec(vec![10.0, 10.0]);
//! add_assign(&mut acc, &sum_along::<1, _>(&m));
//! assert_eq!(acc.as_slice(), &[13.0, 18.0]);
//! ```

pub mod api;
pub mod assign;
pub mod dispatch;
pub mod expressions;
pub mod kernels;
pub mod ops;
pub mod simd;

pub use api::{
    eval, mat_mul, max, max_along, min, min_along, prod, prod_along, reduce, reduce_along, scale,
    sum, sum_along, trans,
};
pub use assign::{
    add_assign, assign, assign_with, div_assign, mult_assign, smp_add_assign, smp_assign,
    smp_assign_with, smp_div_assign, smp_mult_assign, smp_sub_assign, sub_assign, AssignFlavor,
};
pub use dispatch::{dmat_reduce, select_kernel, use_smp_assign, ReductionKernel};
pub use expressions::{
    Axis, ColumnwiseReduce, DMatReduceExpr, Evaluated, Flag, MatMatMult, MatScalarMult,
    ReduceIter, RowwiseReduce, Trans,
};
pub use ops::{Add, FnOp, Max, Min, Mult, OpKind, ReduceOp, SimdFlag};
pub use simd::{op_simd_enabled, remainder_required, simd_enabled};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        // Free functions
        add_assign,
        assign,
        div_assign,
        eval,
        mat_mul,
        max,
        max_along,
        min,
        min_along,
        mult_assign,
        prod,
        prod_along,
        reduce,
        reduce_along,
        scale,
        smp_assign,
        sub_assign,
        sum,
        sum_along,
        trans,
        // Types
        DMatReduceExpr,
        FnOp,
        ReduceOp,
    };

    pub use matreduce_core::prelude::*;
}
