//! Reduction kernels
//!
//! - [`scalar::reduce`]: any operand, any operation
//! - [`simd::reduce_generic`] and [`simd::reduce_add`]: row-major operands
//!   with SIMD-enabled storage
//! - [`line`]: single row or column reductions backing partial reductions
//!
//! Kernels assume a non-empty operand; the dispatcher handles degenerate
//! shapes before calling them.

pub mod line;
pub mod scalar;
pub mod simd;

pub use line::{reduce_column, reduce_column_with, reduce_row, reduce_row_with};
