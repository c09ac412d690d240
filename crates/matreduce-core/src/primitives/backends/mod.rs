//! Backend implementations without delegation
//!
//! This module provides concrete backend types with direct implementations.
//! No Box, no dyn, just simple types with compile-time dispatch.

pub mod avx2;
pub mod scalar;

pub use avx2::Avx2Backend;
pub use scalar::ScalarBackend;

/// Backend used by floating-point element types
#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
pub type FloatBackend = Avx2Backend;

/// Backend used by floating-point element types
#[cfg(not(all(target_arch = "x86_64", feature = "avx2")))]
pub type FloatBackend = ScalarBackend;

/// Create the backend for floating-point element types
///
/// With the `avx2` feature the AVX2 backend is returned unconditionally; it
/// checks CPU support on every horizontal operation and falls back to the
/// scalar lane loop on machines without AVX2.
pub fn float_backend() -> FloatBackend {
    #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
    {
        if !Avx2Backend::is_available() {
            log::debug!("AVX2 compiled in but not detected; horizontal ops use scalar lanes");
        }
        Avx2Backend::detected()
    }
    #[cfg(not(all(target_arch = "x86_64", feature = "avx2")))]
    {
        ScalarBackend
    }
}
