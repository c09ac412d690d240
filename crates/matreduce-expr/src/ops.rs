//! Reduction operation descriptors
//!
//! A reduction operation is a binary function plus static capability
//! information: which well-known operation it is ([`OpKind`]), whether it
//! has a vectorized application, and optionally an explicit SIMD capability
//! flag that may be a runtime probe.

use matreduce_core::{Element, LanePack};
use std::fmt;

/// Identity of a reduction operation, used to pick specialized kernels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// Addition
    Add,
    /// Multiplication
    Mult,
    /// Maximum
    Max,
    /// Minimum
    Min,
    /// Any other operation
    Custom,
}

/// Explicit SIMD capability of an operation
#[derive(Clone, Copy)]
pub enum SimdFlag {
    /// Capability known statically
    Const(bool),
    /// Capability decided by calling the probe (e.g. CPU feature detection)
    Probe(fn() -> bool),
}

impl SimdFlag {
    /// Resolve the flag; probes are always called
    pub fn resolve(self) -> bool {
        match self {
            SimdFlag::Const(enabled) => enabled,
            SimdFlag::Probe(probe) => probe(),
        }
    }
}

impl fmt::Debug for SimdFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimdFlag::Const(enabled) => f.debug_tuple("Const").field(enabled).finish(),
            SimdFlag::Probe(_) => f.write_str("Probe(..)"),
        }
    }
}

/// Binary reduction operation over elements of type `T`
///
/// Reductions do not fix an evaluation order, so results are deterministic
/// only for associative and commutative operations.
pub trait ReduceOp<T: Element>: Clone + Send + Sync {
    /// Identity of the operation
    const KIND: OpKind = OpKind::Custom;

    /// Whether [`ReduceOp::apply_pack`] is a real vectorized application
    const HAS_PACK_APPLY: bool = false;

    /// Combine two elements
    fn apply(&self, a: T, b: T) -> T;

    /// Neutral element of the operation
    fn identity(&self) -> T;

    /// Combine two lane packs lane by lane
    #[inline]
    fn apply_pack(&self, a: T::Pack, b: T::Pack) -> T::Pack {
        a.zip_with(b, |x, y| self.apply(x, y))
    }

    /// Explicit SIMD capability; `None` defers to [`ReduceOp::HAS_PACK_APPLY`]
    fn simd_enabled() -> Option<SimdFlag> {
        None
    }
}

/// Addition
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Add;

impl<T: Element> ReduceOp<T> for Add {
    const KIND: OpKind = OpKind::Add;
    const HAS_PACK_APPLY: bool = true;

    #[inline]
    fn apply(&self, a: T, b: T) -> T {
        a + b
    }

    fn identity(&self) -> T {
        T::zero()
    }

    #[inline]
    fn apply_pack(&self, a: T::Pack, b: T::Pack) -> T::Pack {
        a.zip_with(b, |x, y| x + y)
    }
}

/// Multiplication
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mult;

impl<T: Element> ReduceOp<T> for Mult {
    const KIND: OpKind = OpKind::Mult;
    const HAS_PACK_APPLY: bool = true;

    #[inline]
    fn apply(&self, a: T, b: T) -> T {
        a * b
    }

    fn identity(&self) -> T {
        T::one()
    }

    #[inline]
    fn apply_pack(&self, a: T::Pack, b: T::Pack) -> T::Pack {
        a.zip_with(b, |x, y| x * y)
    }
}

/// Maximum
///
/// A NaN operand in second position is ignored; in first position it
/// propagates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Max;

impl<T: Element> ReduceOp<T> for Max {
    const KIND: OpKind = OpKind::Max;
    const HAS_PACK_APPLY: bool = true;

    #[inline]
    fn apply(&self, a: T, b: T) -> T {
        if b > a {
            b
        } else {
            a
        }
    }

    fn identity(&self) -> T {
        T::min_value()
    }
}

/// Minimum
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Min;

impl<T: Element> ReduceOp<T> for Min {
    const KIND: OpKind = OpKind::Min;
    const HAS_PACK_APPLY: bool = true;

    #[inline]
    fn apply(&self, a: T, b: T) -> T {
        if b < a {
            b
        } else {
            a
        }
    }

    fn identity(&self) -> T {
        T::max_value()
    }
}

/// Custom operation built from a closure
///
/// Closure operations have no vectorized application and always reduce
/// through the scalar kernel.
///
/// # Examples
///
/// ```
/// use matreduce_expr::ops::{FnOp, ReduceOp};
///
/// let op = FnOp::new(|a: i64, b: i64| a.max(b.abs()), 0);
/// assert_eq!(op.apply(3, -5), 5);
/// assert_eq!(op.identity(), 0);
/// ```
#[derive(Clone, Copy)]
pub struct FnOp<F, T> {
    f: F,
    identity: T,
}

impl<F, T> FnOp<F, T> {
    pub fn new(f: F, identity: T) -> Self {
        Self { f, identity }
    }
}

impl<F, T: fmt::Debug> fmt::Debug for FnOp<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOp")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl<F, T> ReduceOp<T> for FnOp<F, T>
where
    T: Element,
    F: Fn(T, T) -> T + Clone + Send + Sync,
{
    #[inline]
    fn apply(&self, a: T, b: T) -> T {
        (self.f)(a, b)
    }

    fn identity(&self) -> T {
        self.identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_kinds() {
        assert_eq!(<Add as ReduceOp<f64>>::KIND, OpKind::Add);
        assert_eq!(<Mult as ReduceOp<i32>>::KIND, OpKind::Mult);
        assert_eq!(<Max as ReduceOp<f32>>::KIND, OpKind::Max);
        assert_eq!(<Min as ReduceOp<u64>>::KIND, OpKind::Min);
        assert!(<Add as ReduceOp<f64>>::HAS_PACK_APPLY);
        assert!(<Add as ReduceOp<f64>>::simd_enabled().is_none());
    }

    #[test]
    fn test_identities() {
        assert_eq!(ReduceOp::<f64>::identity(&Add), 0.0);
        assert_eq!(ReduceOp::<i32>::identity(&Mult), 1);
        assert_eq!(ReduceOp::<i32>::identity(&Max), i32::MIN);
        assert_eq!(ReduceOp::<u32>::identity(&Min), u32::MAX);
    }

    #[test]
    fn test_apply_pack_is_lane_wise() {
        let a = [1.0f64, 5.0, -2.0, 8.0];
        let b = [3.0f64, 4.0, -1.0, 8.0];
        assert_eq!(ReduceOp::<f64>::apply_pack(&Add, a, b), [4.0, 9.0, -3.0, 16.0]);
        assert_eq!(ReduceOp::<f64>::apply_pack(&Mult, a, b), [3.0, 20.0, 2.0, 64.0]);
        assert_eq!(ReduceOp::<f64>::apply_pack(&Max, a, b), [3.0, 5.0, -1.0, 8.0]);
        assert_eq!(ReduceOp::<f64>::apply_pack(&Min, a, b), [1.0, 4.0, -2.0, 8.0]);
    }

    #[test]
    fn test_fn_op() {
        let op = FnOp::new(|a: f64, b: f64| a.hypot(b), 0.0);
        assert_eq!(op.apply(3.0, 4.0), 5.0);
        type Hypot = FnOp<fn(f64, f64) -> f64, f64>;
        assert_eq!(<Hypot as ReduceOp<f64>>::KIND, OpKind::Custom);
        assert!(!<Hypot as ReduceOp<f64>>::HAS_PACK_APPLY);
    }

    #[test]
    fn test_simd_flag_resolve() {
        fn yes() -> bool {
            true
        }
        assert!(SimdFlag::Const(true).resolve());
        assert!(!SimdFlag::Const(false).resolve());
        assert!(SimdFlag::Probe(yes).resolve());
        assert_eq!(format!("{:?}", SimdFlag::Probe(yes)), "Probe(..)");
    }
}
