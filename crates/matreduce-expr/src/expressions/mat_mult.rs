//! Dense matrix/matrix multiplication expression

use matreduce_core::{Composite, DynamicMatrix, Error, Matrix, Result, StorageOrder, ROW_MAJOR};

/// Lazy product `A * B` of two matrix operands
///
/// Each element costs a full inner product, so the expression requires
/// evaluation before repeated access and is never assigned in parallel
/// directly.
pub struct MatMatMult<'a, A: Matrix, B> {
    lhs: Composite<'a, A>,
    rhs: Composite<'a, B>,
}

impl<'a, A, B> MatMatMult<'a, A, B>
where
    A: Matrix,
    B: Matrix<Element = A::Element>,
{
    /// Create the product; the inner dimensions must agree
    pub fn new(lhs: &'a A, rhs: &'a B) -> Result<Self> {
        if lhs.columns() != rhs.rows() {
            return Err(Error::size_mismatch(
                lhs.columns(),
                rhs.rows(),
                "matrix product inner dimension",
            ));
        }
        Ok(Self {
            lhs: Composite::capture(lhs),
            rhs: Composite::capture(rhs),
        })
    }

    pub fn left_operand(&self) -> &A {
        &self.lhs
    }

    pub fn right_operand(&self) -> &B {
        &self.rhs
    }
}

impl<A: Matrix, B: Clone> Clone for MatMatMult<'_, A, B> {
    fn clone(&self) -> Self {
        Self {
            lhs: self.lhs.clone(),
            rhs: self.rhs.clone(),
        }
    }
}

impl<A: Matrix + std::fmt::Debug, B: std::fmt::Debug> std::fmt::Debug for MatMatMult<'_, A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatMatMult")
            .field("lhs", &self.lhs)
            .field("rhs", &self.rhs)
            .finish()
    }
}

impl<A, B> Matrix for MatMatMult<'_, A, B>
where
    A: Matrix,
    B: Matrix<Element = A::Element>,
{
    type Element = A::Element;
    type ResultType = DynamicMatrix<A::Element, ROW_MAJOR>;

    const STORAGE: StorageOrder = StorageOrder::RowMajor;
    const IS_EXPRESSION: bool = true;
    const REQUIRES_EVALUATION: bool = true;

    fn rows(&self) -> usize {
        self.lhs.rows()
    }

    fn columns(&self) -> usize {
        self.rhs.columns()
    }

    fn get(&self, i: usize, j: usize) -> A::Element {
        (0..self.lhs.columns()).fold(A::Element::default(), |acc, k| {
            acc + self.lhs.get(i, k) * self.rhs.get(k, j)
        })
    }

    fn is_aliased<P>(&self, alias: *const P) -> bool {
        self.lhs.is_aliased(alias) || self.rhs.is_aliased(alias)
    }

    fn can_smp_assign(&self) -> bool {
        false
    }

    fn evaluate(&self) -> Self::ResultType {
        let (m, n, inner) = (self.rows(), self.columns(), self.lhs.columns());
        let mut out = DynamicMatrix::new(m, n);
        for i in 0..m {
            for k in 0..inner {
                let a = self.lhs.get(i, k);
                for j in 0..n {
                    out[(i, j)] = out[(i, j)] + a * self.rhs.get(k, j);
                }
            }
        }
        out
    }
}
