//! Dense-matrix reduction expressions
//!
//! Facade over the workspace crates:
//!
//! - [`core`] (`matreduce-core`): element types, lane packs and backends,
//!   execution engines, configuration, operand traits and containers
//! - [`expr`] (`matreduce-expr`): reduction operations, kernels, the
//!   evaluation-strategy dispatcher, expression nodes and assignment
//!
//! # Example
//!
//! ```rust
//! use matreduce::prelude::*;
//!
//! let m = DynamicMatrix::<f64>::from_rows(&[[1.0, 2.0], [3.0, 4.0]])?;
//! assert_eq!(sum(&m), 10.0);
//!
//! let rows = sum_along::<1, _>(&m);
//! assert_eq!(rows.at(1)?, 7.0);
//! assert!(rows.at(2).is_err());
//! # Ok::<(), matreduce::Error>(())
//! ```

pub use matreduce_core as core;
pub use matreduce_expr as expr;

pub use matreduce_core::{config, Error, ReduceConfig, Result, SimdMode};

pub use matreduce_expr::{
    eval, mat_mul, max, max_along, min, min_along, prod, prod_along, reduce, reduce_along, scale,
    sum, sum_along, trans,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use matreduce_expr::prelude::*;
}
