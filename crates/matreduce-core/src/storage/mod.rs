//! Containers that expression nodes read from and assign into

pub mod dense;
pub mod sparse;

pub use dense::{DynamicMatrix, DynamicVector, COLUMN_MAJOR, ROW_MAJOR};
pub use sparse::{CompressedMatrix, CompressedVector};
