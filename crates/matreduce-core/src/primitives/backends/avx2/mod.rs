//! AVX2 backend implementation
//!
//! This module provides AVX2-optimized horizontal reductions with
//! compile-time type dispatch to eliminate runtime overhead. Only `f32` and
//! `f64` have dedicated instruction sequences; integer types use the scalar
//! lane loop.

#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
mod dispatch;
#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
mod utils;

use crate::primitives::ComputePrimitives;
use crate::Element;

/// AVX2 backend for x86_64 processors
#[derive(Clone, Copy, Debug)]
pub struct Avx2Backend;

impl Avx2Backend {
    /// Backend whose operations probe the CPU on each call
    #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
    pub(crate) fn detected() -> Self {
        Self
    }

    /// Check if AVX2 is available on this CPU
    pub fn is_available() -> bool {
        #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
        {
            is_x86_feature_detected!("avx2")
        }
        #[cfg(not(all(target_arch = "x86_64", feature = "avx2")))]
        {
            false
        }
    }
}

// AVX2 implementations delegate to type-specific code via compile-time dispatch
#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
impl<T> ComputePrimitives<T> for Avx2Backend
where
    T: Element + self::dispatch::Avx2TypeDispatch,
{
    fn backend_name(&self) -> &'static str {
        T::backend_name()
    }

    fn horizontal_sum(&self, pack: &T::Pack) -> T {
        if Self::is_available() {
            // Safety: CPU support checked above
            unsafe { T::horizontal_sum_impl(pack) }
        } else {
            ScalarLanes::sum::<T>(pack)
        }
    }
}

// Fallback for non-AVX2 builds
#[cfg(not(all(target_arch = "x86_64", feature = "avx2")))]
impl<T: Element> ComputePrimitives<T> for Avx2Backend {
    fn backend_name(&self) -> &'static str {
        "avx2 (unavailable)"
    }
}

#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
struct ScalarLanes;

#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
impl ScalarLanes {
    fn sum<T: Element>(pack: &T::Pack) -> T {
        use crate::primitives::LanePack;
        pack.as_slice().iter().fold(T::zero(), |acc, &x| acc + x)
    }
}
