//! Explicit evaluation expression

use matreduce_core::{Composite, Matrix, StorageOrder};

/// Expression that forces evaluation of its operand before use
///
/// Element access still forwards to the operand; kernels and assignments
/// materialize it into the operand's result type first.
pub struct Evaluated<'a, M> {
    operand: Composite<'a, M>,
}

impl<'a, M: Matrix> Evaluated<'a, M> {
    pub fn new(operand: &'a M) -> Self {
        Self {
            operand: Composite::capture(operand),
        }
    }

    pub fn operand(&self) -> &M {
        &self.operand
    }
}

impl<M: Clone> Clone for Evaluated<'_, M> {
    fn clone(&self) -> Self {
        Self {
            operand: self.operand.clone(),
        }
    }
}

impl<M: Matrix> Matrix for Evaluated<'_, M> {
    type Element = M::Element;
    type ResultType = M::ResultType;

    const STORAGE: StorageOrder = M::STORAGE;
    const IS_EXPRESSION: bool = true;
    const IS_SPARSE: bool = M::IS_SPARSE;
    const IS_EVAL_EXPR: bool = true;
    const REQUIRES_EVALUATION: bool = true;
    const SMP_ASSIGNABLE: bool = M::SMP_ASSIGNABLE;

    fn rows(&self) -> usize {
        self.operand.rows()
    }

    fn columns(&self) -> usize {
        self.operand.columns()
    }

    fn get(&self, i: usize, j: usize) -> M::Element {
        self.operand.get(i, j)
    }

    fn is_aliased<P>(&self, alias: *const P) -> bool {
        self.operand.is_aliased(alias)
    }

    fn can_smp_assign(&self) -> bool {
        self.operand.can_smp_assign()
    }

    fn evaluate(&self) -> M::ResultType {
        self.operand.evaluate()
    }
}
