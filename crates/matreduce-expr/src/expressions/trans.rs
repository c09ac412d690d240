//! Transpose view

use matreduce_core::{Composite, Element, Matrix, StorageOrder};

/// Lazy transpose of a matrix operand
///
/// Element `(i, j)` of the view is element `(j, i)` of the operand and the
/// storage order is flipped, so a column-major operand is seen as a
/// row-major one without copying.
pub struct Trans<'a, M> {
    operand: Composite<'a, M>,
}

impl<'a, M: Matrix> Trans<'a, M> {
    pub fn new(operand: &'a M) -> Self {
        Self {
            operand: Composite::capture(operand),
        }
    }

    pub(crate) fn from_composite(operand: Composite<'a, M>) -> Self {
        Self { operand }
    }

    /// The transposed operand
    pub fn operand(&self) -> &M {
        &self.operand
    }
}

impl<M: Clone> Clone for Trans<'_, M> {
    fn clone(&self) -> Self {
        Self {
            operand: self.operand.clone(),
        }
    }
}

impl<M: std::fmt::Debug> std::fmt::Debug for Trans<'_, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trans").field("operand", &self.operand).finish()
    }
}

impl<M: Matrix> Matrix for Trans<'_, M> {
    type Element = M::Element;
    // Any container holds the transposed values; the storage order of the
    // operand's result type is kept.
    type ResultType = M::ResultType;

    const STORAGE: StorageOrder = M::STORAGE.flip();
    const IS_EXPRESSION: bool = true;
    const IS_SPARSE: bool = M::IS_SPARSE;
    const REQUIRES_EVALUATION: bool = M::REQUIRES_EVALUATION;
    const SIMD_ENABLED: bool = M::SIMD_ENABLED;
    const SMP_ASSIGNABLE: bool = M::SMP_ASSIGNABLE;
    const IS_PADDED: bool = M::IS_PADDED;

    fn rows(&self) -> usize {
        self.operand.columns()
    }

    fn columns(&self) -> usize {
        self.operand.rows()
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> M::Element {
        self.operand.get(j, i)
    }

    #[inline]
    fn load(&self, i: usize, j: usize) -> <M::Element as Element>::Pack {
        self.operand.load(j, i)
    }

    fn is_aliased<P>(&self, alias: *const P) -> bool {
        self.operand.is_aliased(alias)
    }

    fn can_smp_assign(&self) -> bool {
        self.operand.can_smp_assign()
    }
}
