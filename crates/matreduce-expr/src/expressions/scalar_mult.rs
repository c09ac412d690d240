//! Matrix/scalar multiplication expression

use super::Trans;
use matreduce_core::{Composite, Element, LanePack, Matrix, StorageOrder, Zero};

/// Lazy product `A * s` of a matrix operand and a scalar
pub struct MatScalarMult<'a, M: Matrix> {
    operand: Composite<'a, M>,
    scalar: M::Element,
}

impl<'a, M: Matrix> MatScalarMult<'a, M> {
    pub fn new(operand: &'a M, scalar: M::Element) -> Self {
        Self {
            operand: Composite::capture(operand),
            scalar,
        }
    }

    /// The left-hand side matrix operand
    pub fn left_operand(&self) -> &M {
        &self.operand
    }

    /// The right-hand side scalar
    pub fn right_operand(&self) -> M::Element {
        self.scalar
    }

    /// Transpose of the product, expressed as `trans(A) * s`
    pub fn trans(&self) -> MatScalarMult<'a, Trans<'a, M>> {
        MatScalarMult {
            operand: Composite::Owned(Trans::from_composite(self.operand.clone())),
            scalar: self.scalar,
        }
    }
}

impl<M: Matrix> Clone for MatScalarMult<'_, M> {
    fn clone(&self) -> Self {
        Self {
            operand: self.operand.clone(),
            scalar: self.scalar,
        }
    }
}

impl<M: Matrix + std::fmt::Debug> std::fmt::Debug for MatScalarMult<'_, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatScalarMult")
            .field("operand", &self.operand)
            .field("scalar", &self.scalar)
            .finish()
    }
}

impl<M: Matrix> Matrix for MatScalarMult<'_, M> {
    type Element = M::Element;
    type ResultType = M::ResultType;

    const STORAGE: StorageOrder = M::STORAGE;
    const IS_EXPRESSION: bool = true;
    const IS_SPARSE: bool = M::IS_SPARSE;
    const REQUIRES_EVALUATION: bool = M::REQUIRES_EVALUATION;
    const SIMD_ENABLED: bool = M::SIMD_ENABLED;
    const SMP_ASSIGNABLE: bool = M::SMP_ASSIGNABLE;
    const IS_PADDED: bool = M::IS_PADDED;

    fn rows(&self) -> usize {
        self.operand.rows()
    }

    fn columns(&self) -> usize {
        self.operand.columns()
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> M::Element {
        self.operand.get(i, j) * self.scalar
    }

    /// Lanes past the end of the line stay zero even for non-finite scalars
    #[inline]
    fn load(&self, i: usize, j: usize) -> <M::Element as Element>::Pack {
        let s = self.scalar;
        let pack = self.operand.load(i, j).map(|x| x * s);
        let (start, len) = if M::STORAGE.is_row_major() {
            (j, self.columns())
        } else {
            (i, self.rows())
        };
        if start + <M::Element as Element>::LANES <= len {
            return pack;
        }
        <M::Element as Element>::Pack::from_fn(|k| {
            if start + k < len {
                pack.lane(k)
            } else {
                M::Element::zero()
            }
        })
    }

    fn is_aliased<P>(&self, alias: *const P) -> bool {
        self.operand.is_aliased(alias)
    }

    fn can_smp_assign(&self) -> bool {
        self.operand.can_smp_assign()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matreduce_core::{operand_flags, DynamicMatrix, OperandFlags};

    #[test]
    fn test_scaled_elements() {
        let m = DynamicMatrix::<i32>::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
        let s = MatScalarMult::new(&m, 3);
        assert_eq!(s.get(1, 0), 9);
        assert_eq!(s.right_operand(), 3);
        assert_eq!(s.load(1, 0).as_slice(), &[9, 12, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_padding_stays_zero_for_infinite_scalar() {
        let m = DynamicMatrix::<f64>::from_vec(1, 3, vec![1.0, -1.0, 0.5]).unwrap();
        let s = MatScalarMult::new(&m, f64::INFINITY);
        let pack = s.load(0, 0);
        assert_eq!(pack.lane(0), f64::INFINITY);
        assert_eq!(pack.lane(1), f64::NEG_INFINITY);
        assert_eq!(pack.lane(3), 0.0);
    }

    #[test]
    fn test_flags_follow_operand() {
        let flags = operand_flags::<MatScalarMult<'static, DynamicMatrix<f64>>>();
        assert!(flags.contains(
            OperandFlags::EXPRESSION | OperandFlags::SIMD_ENABLED | OperandFlags::PADDED
        ));
        assert!(!flags.contains(OperandFlags::REQUIRES_EVALUATION));
    }

    #[test]
    fn test_trans_of_product_is_product_of_trans() {
        let m = DynamicMatrix::<f64>::from_fn(2, 3, |i, j| (i + 2 * j) as f64);
        let s = MatScalarMult::new(&m, 0.5);
        let t = s.trans();
        assert_eq!((t.rows(), t.columns()), (3, 2));
        assert_eq!(t.right_operand(), 0.5);
        for i in 0..3 {
            for j in 0..2 {
                assert_eq!(t.get(i, j), s.get(j, i));
            }
        }
    }

    #[test]
    fn test_nested_expression_is_owned() {
        let m = DynamicMatrix::<f64>::new(2, 2);
        let inner = MatScalarMult::new(&m, 2.0);
        let outer = MatScalarMult::new(&inner, 3.0);
        assert!(outer.operand.is_owned());
        assert!(!inner.operand.is_owned());
    }
}
