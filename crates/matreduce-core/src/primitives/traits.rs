//! Unified compute primitives trait
//!
//! Backends implement the horizontal steps of a vectorized reduction: once a
//! kernel has folded a matrix into a single lane pack, the backend collapses
//! the pack into one scalar.

use super::LanePack;
use crate::numeric::Element;

/// Trait for computational primitives with generic element support
///
/// This trait provides low-level operations optimized for different backends
/// (scalar, AVX2) with compile-time dispatch. Default methods are the
/// portable lane loops; backends override what their hardware accelerates.
pub trait ComputePrimitives<T: Element>: Clone + Send + Sync {
    /// Get the name of this backend
    fn backend_name(&self) -> &'static str;

    /// Get the SIMD width (number of elements processed in parallel)
    fn simd_width(&self) -> usize {
        T::LANES
    }

    /// Sum of all lanes of a pack
    fn horizontal_sum(&self, pack: &T::Pack) -> T {
        pack.as_slice()
            .iter()
            .fold(T::zero(), |acc, &x| acc + x)
    }

    /// Product of all lanes of a pack
    fn horizontal_product(&self, pack: &T::Pack) -> T {
        pack.as_slice()
            .iter()
            .fold(T::one(), |acc, &x| acc * x)
    }

    /// Fold all lanes of a pack with an arbitrary operation, starting at lane 0
    fn horizontal_combine<F>(&self, pack: &T::Pack, f: F) -> T
    where
        F: Fn(T, T) -> T,
    {
        let lanes = pack.as_slice();
        lanes[1..].iter().fold(lanes[0], |acc, &x| f(acc, x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::ScalarBackend;

    #[test]
    fn test_default_horizontal_ops() {
        let backend = ScalarBackend::new();
        let pack = [1.0f64, 2.0, 3.0, 4.0];
        assert_eq!(ComputePrimitives::<f64>::horizontal_sum(&backend, &pack), 10.0);
        assert_eq!(ComputePrimitives::<f64>::horizontal_product(&backend, &pack), 24.0);
        let max = ComputePrimitives::<f64>::horizontal_combine(&backend, &pack, f64::max);
        assert_eq!(max, 4.0);
    }

    #[test]
    fn test_simd_width_matches_lanes() {
        let backend = ScalarBackend::new();
        assert_eq!(ComputePrimitives::<f32>::simd_width(&backend), 8);
        assert_eq!(ComputePrimitives::<u64>::simd_width(&backend), 4);
    }
}
