//! Lane packs: fixed-width groups of elements processed as one SIMD value
//!
//! Packs are plain arrays so that every backend and every element type shares
//! one representation. The loops below are written so LLVM lowers them to
//! vector instructions; backends only specialize the horizontal reductions.

use std::fmt::Debug;

/// A fixed number of lanes of `T` loaded, combined and reduced together
pub trait LanePack<T: Copy>: Copy + Send + Sync + Debug + 'static {
    /// Number of lanes in the pack
    const LANES: usize;

    /// Broadcast a single value to every lane
    fn splat(value: T) -> Self;

    /// Build a pack lane by lane
    fn from_fn<F: FnMut(usize) -> T>(f: F) -> Self;

    /// Load `LANES` consecutive values from the front of `src`
    ///
    /// # Panics
    /// Panics if `src` is shorter than `LANES`.
    fn load(src: &[T]) -> Self;

    /// Read lane `k`
    fn lane(&self, k: usize) -> T;

    /// Mutable access to lane `k`
    fn lane_mut(&mut self, k: usize) -> &mut T;

    /// View the lanes as a slice
    fn as_slice(&self) -> &[T];

    /// Lane-wise combination of two packs
    #[inline]
    fn zip_with<F: Fn(T, T) -> T>(self, other: Self, f: F) -> Self {
        Self::from_fn(|k| f(self.lane(k), other.lane(k)))
    }

    /// Lane-wise transformation
    #[inline]
    fn map<F: Fn(T) -> T>(self, f: F) -> Self {
        Self::from_fn(|k| f(self.lane(k)))
    }
}

impl<T, const N: usize> LanePack<T> for [T; N]
where
    T: Copy + Send + Sync + Debug + 'static,
{
    const LANES: usize = N;

    #[inline]
    fn splat(value: T) -> Self {
        [value; N]
    }

    #[inline]
    fn from_fn<F: FnMut(usize) -> T>(f: F) -> Self {
        std::array::from_fn(f)
    }

    #[inline]
    fn load(src: &[T]) -> Self {
        let mut out = [src[0]; N];
        out.copy_from_slice(&src[..N]);
        out
    }

    #[inline]
    fn lane(&self, k: usize) -> T {
        self[k]
    }

    #[inline]
    fn lane_mut(&mut self, k: usize) -> &mut T {
        &mut self[k]
    }

    #[inline]
    fn as_slice(&self) -> &[T] {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_and_lanes() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        let pack = <[f64; 4]>::load(&data);
        assert_eq!(pack.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(pack.lane(2), 3.0);
    }

    #[test]
    #[should_panic]
    fn test_load_short_slice_panics() {
        let data = [1.0f32, 2.0, 3.0];
        let _ = <[f32; 8]>::load(&data);
    }

    #[test]
    fn test_zip_with_and_map() {
        let a = [1i32, 2, 3, 4, 5, 6, 7, 8];
        let b = <[i32; 8]>::splat(10);
        let c = a.zip_with(b, |x, y| x + y);
        assert_eq!(c, [11, 12, 13, 14, 15, 16, 17, 18]);
        assert_eq!(c.map(|x| x * 2).lane(0), 22);
    }

    #[test]
    fn test_lane_mut() {
        let mut pack = <[u64; 4]>::splat(0);
        *pack.lane_mut(3) = 9;
        assert_eq!(pack, [0, 0, 0, 9]);
    }
}
