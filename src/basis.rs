//! Spline bases
mod bspline;
mod nurbs;

pub use bspline::BSplineBasis;
pub use nurbs::NurbsBasis;

use crate::evaluation_points::EvaluationPoints;
use crate::space::SplineSpace;
use crate::types::RealScalar;
use crate::value_table::ValueTable;
use crate::SplineError;
use std::sync::Arc;

/// A B-spline or NURBS basis
#[derive(Debug, Clone)]
pub enum Basis<T: RealScalar> {
    /// Polynomial B-spline basis
    BSpline(BSplineBasis<T>),
    /// Rational basis with per-dof weights
    Nurbs(NurbsBasis<T>),
}

impl<T: RealScalar> Basis<T> {
    /// The underlying B-spline basis
    pub fn bspline(&self) -> &BSplineBasis<T> {
        match self {
            Basis::BSpline(b) => b,
            Basis::Nurbs(n) => n.bspline(),
        }
    }

    /// The space
    pub fn space(&self) -> &Arc<SplineSpace<T>> {
        self.bspline().space()
    }

    /// Dimension
    pub fn dim(&self) -> usize {
        self.space().dim()
    }

    /// Number of components
    pub fn range(&self) -> usize {
        self.space().range()
    }

    /// Number of elements
    pub fn element_count(&self) -> usize {
        self.space().grid().element_count()
    }

    /// Number of basis functions touching each element
    pub fn element_num_basis(&self) -> usize {
        self.space().element_num_basis()
    }

    /// Check if the basis is rational
    pub fn is_rational(&self) -> bool {
        matches!(self, Basis::Nurbs(_))
    }

    /// Evaluate the basis functions touching an element and their derivatives up to
    /// `max_order` at reference points of the element
    ///
    /// `tables[k]` must already have the shape of the `k`th derivative table.
    pub fn evaluate(
        &self,
        element: &[usize],
        points: &EvaluationPoints<T>,
        max_order: usize,
        tables: &mut [ValueTable<T>],
    ) -> Result<(), SplineError> {
        match self {
            Basis::BSpline(b) => {
                b.evaluate(element, points, max_order, tables);
                Ok(())
            }
            Basis::Nurbs(n) => n.evaluate(element, points, max_order, tables),
        }
    }
}

impl<T: RealScalar> From<BSplineBasis<T>> for Basis<T> {
    fn from(b: BSplineBasis<T>) -> Self {
        Basis::BSpline(b)
    }
}

impl<T: RealScalar> From<NurbsBasis<T>> for Basis<T> {
    fn from(n: NurbsBasis<T>) -> Self {
        Basis::Nurbs(n)
    }
}

/// Index of the factor used for direction `e` in a product of 1-D values
///
/// Each occurrence of `e` among the differentiated directions raises the derivative order of
/// its factor by one.
fn factor_order(e: usize, directions: &[usize]) -> usize {
    directions.iter().filter(|d| **d == e).count()
}
