//! Compile-time dispatch system for AVX2 type-specific implementations
//!
//! This module provides the trait for zero-overhead type dispatch using
//! stable Rust features.

use super::utils::{horizontal_sum_pd, horizontal_sum_ps};
use crate::primitives::LanePack;
use crate::Element;

/// Trait for type-specific AVX2 dispatch
///
/// This trait is implemented for each supported type, allowing compile-time
/// dispatch to type-specific implementations without runtime overhead.
pub trait Avx2TypeDispatch: Element {
    fn backend_name() -> &'static str;

    /// # Safety
    /// The CPU must support AVX2.
    unsafe fn horizontal_sum_impl(pack: &Self::Pack) -> Self {
        pack.as_slice()
            .iter()
            .fold(Self::zero(), |acc, &x| acc + x)
    }
}

impl Avx2TypeDispatch for f32 {
    fn backend_name() -> &'static str {
        "avx2"
    }

    unsafe fn horizontal_sum_impl(pack: &[f32; 8]) -> f32 {
        horizontal_sum_ps(std::arch::x86_64::_mm256_loadu_ps(pack.as_ptr()))
    }
}

impl Avx2TypeDispatch for f64 {
    fn backend_name() -> &'static str {
        "avx2"
    }

    unsafe fn horizontal_sum_impl(pack: &[f64; 4]) -> f64 {
        horizontal_sum_pd(std::arch::x86_64::_mm256_loadu_pd(pack.as_ptr()))
    }
}

// Integer types use scalar fallback
macro_rules! impl_scalar_fallback {
    ($type:ty) => {
        impl Avx2TypeDispatch for $type {
            fn backend_name() -> &'static str {
                "avx2 (scalar fallback)"
            }
        }
    };
}

impl_scalar_fallback!(i32);
impl_scalar_fallback!(i64);
impl_scalar_fallback!(u32);
impl_scalar_fallback!(u64);
