//! Core traits and types for dense-matrix reduction expressions
//!
//! This crate provides the foundation that the expression crate builds on:
//! element types with their SIMD lane packs, horizontal-reduction backends,
//! execution engines for parallel assignment, the operand classification
//! traits, and the containers expressions read from and assign into.
//!
//! # Architecture Overview
//!
//! The library is organized into three layers:
//!
//! 1. **Layer 1: Primitives** - Lane packs and horizontal reductions with
//!    compile-time backend dispatch
//! 2. **Layer 2: Execution Engines** - Sequential and Rayon-backed engines used
//!    by parallel assignment
//! 3. **Layer 3: Operands** - Static operand classification ([`Matrix`]),
//!    assignment targets ([`VectorMut`]) and containers
//!
//! # Example
//!
//! ```rust
//! use matreduce_core::{
//!     execution::{sequential, ExecutionEngine},
//!     storage::DynamicMatrix,
//!     ComputePrimitives, Matrix,
//! };
//!
//! let m = DynamicMatrix::<f64>::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
//! assert_eq!(m.get(1, 0), 3.0);
//!
//! // Horizontal reductions through the engine's primitives
//! let engine = sequential::<f64>();
//! let total = ComputePrimitives::<f64>::horizontal_sum(engine.primitives(), &m.load(0, 0));
//! assert_eq!(total, 3.0);
//! ```

pub mod config;
pub mod error;
pub mod execution;
pub mod numeric;
pub mod primitives;
pub mod storage;
pub mod traits;

// Re-export core types
pub use error::{Error, Result};

pub use config::{ReduceConfig, SimdMode, DEFAULT_SMP_THRESHOLD};

pub use execution::{
    auto_engine, scalar_sequential, sequential, simd_sequential, ExecutionEngine, ExecutionMode,
    SequentialEngine,
};
#[cfg(feature = "parallel")]
pub use execution::{parallel, scalar_parallel, simd_parallel, ParallelEngine};

pub use primitives::{
    float_backend, Avx2Backend, ComputePrimitives, FloatBackend, LanePack, ScalarBackend,
};

pub use storage::{
    CompressedMatrix, CompressedVector, DynamicMatrix, DynamicVector, COLUMN_MAJOR, ROW_MAJOR,
};

pub use traits::{
    is_mat_eval_expr, is_sparse_matrix, operand_flags, Composite, Matrix, OperandFlags,
    Orientation, ResultMatrix, StorageOrder, Vector, VectorMut,
};

// Numeric traits
pub use numeric::Element;
pub use num_traits::{One, Zero};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ComputePrimitives,
        // Containers
        CompressedMatrix,
        CompressedVector,
        DynamicMatrix,
        DynamicVector,
        Element,
        ExecutionEngine,
        // Operand traits
        Matrix,
        One,
        ResultMatrix,
        Result,
        StorageOrder,
        Vector,
        VectorMut,
        Zero,
        COLUMN_MAJOR,
        ROW_MAJOR,
    };

    pub use crate::error::Error;

    // Common engine configurations
    #[cfg(feature = "parallel")]
    pub use crate::execution::{parallel, simd_parallel};
    pub use crate::execution::{scalar_sequential, sequential, simd_sequential, SequentialEngine};
}
