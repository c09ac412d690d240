//! Computational primitives with compile-time dispatch
//!
//! This module provides the lane packs used by vectorized reduction kernels
//! and the backends that collapse a pack into a scalar.
//!
//! # Architecture
//!
//! - Single unified `ComputePrimitives<T>` trait for all horizontal operations
//! - Concrete backend types: `ScalarBackend`, `Avx2Backend`
//! - Compile-time backend selection per element type with runtime validation
//! - Zero-cost abstractions - no heap allocation or dynamic dispatch
//!
//! # Usage
//!
//! ```rust
//! use matreduce_core::{ComputePrimitives, Element};
//!
//! // Automatic backend selection based on type
//! let backend = f64::backend(); // Uses AVX2 if compiled in and available
//! let pack = [1.0, 2.0, 3.0, 4.0];
//! assert_eq!(ComputePrimitives::<f64>::horizontal_sum(&backend, &pack), 10.0);
//! ```

pub mod backends;
pub mod pack;
pub mod traits;

pub use backends::{float_backend, Avx2Backend, FloatBackend, ScalarBackend};
pub use pack::LanePack;
pub use traits::ComputePrimitives;
