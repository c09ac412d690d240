//! Element type hierarchy for matrix reductions
//!
//! This module provides the type foundation shared by containers, expression
//! nodes and kernels: every scalar stored in a matrix implements [`Element`],
//! which ties the scalar to its SIMD lane pack.
//!
//! # Design Philosophy
//!
//! - **Pure type constraints**: Defines relationships between numeric types
//! - **No computational layer**: All vector computation happens through
//!   `ComputePrimitives` and the lane packs
//! - **Extensible**: Easy to add new numeric types

use crate::primitives::{ComputePrimitives, LanePack, ScalarBackend};
use bytemuck::Pod;
use num_traits::{Bounded, Num};
use std::fmt::Debug;

/// Base trait for scalar types stored in matrices and vectors
///
/// `Default` must produce the additive zero; it is the value returned by a
/// reduction over an empty operand.
pub trait Element:
    Pod + Num + Bounded + Copy + Default + PartialOrd + Debug + Send + Sync + 'static
{
    /// Number of lanes processed together by a 256-bit register
    const LANES: usize;

    /// Lane pack type used by vectorized kernels
    type Pack: LanePack<Self>;

    /// Backend that performs horizontal reductions of packs
    type Backend: ComputePrimitives<Self>;

    /// Get an instance of the backend
    fn backend() -> Self::Backend;

    /// Check if value is finite (always true for integers)
    fn is_finite(&self) -> bool;

    /// Convert from f64 (for creating constants)
    fn from_f64(val: f64) -> Self;

    /// Convert to f64 (for operations that need f64)
    fn to_f64(&self) -> f64;
}

macro_rules! impl_float_element {
    ($type:ty, $lanes:expr) => {
        impl Element for $type {
            const LANES: usize = $lanes;
            type Pack = [$type; $lanes];
            type Backend = crate::primitives::FloatBackend;

            fn backend() -> Self::Backend {
                crate::primitives::float_backend()
            }

            fn is_finite(&self) -> bool {
                <$type>::is_finite(*self)
            }

            fn from_f64(val: f64) -> Self {
                val as $type
            }

            fn to_f64(&self) -> f64 {
                *self as f64
            }
        }
    };
}

macro_rules! impl_int_element {
    ($type:ty, $lanes:expr) => {
        impl Element for $type {
            const LANES: usize = $lanes;
            type Pack = [$type; $lanes];
            type Backend = ScalarBackend;

            fn backend() -> Self::Backend {
                ScalarBackend
            }

            fn is_finite(&self) -> bool {
                true // Integers are always finite
            }

            fn from_f64(val: f64) -> Self {
                val as $type
            }

            fn to_f64(&self) -> f64 {
                *self as f64
            }
        }
    };
}

impl_float_element!(f64, 4);
impl_float_element!(f32, 8);
impl_int_element!(i32, 8);
impl_int_element!(u32, 8);
impl_int_element!(i64, 4);
impl_int_element!(u64, 4);
