//! Functions in a spline space
use crate::basis::Basis;
use crate::element::BasisElement;
use crate::traits::CoefficientVector;
use crate::types::{RealScalar, ValueKind};
use crate::SplineError;
use std::sync::Arc;

/// Linear combination of the basis functions of a basis that have a property
///
/// Coefficients are indexed by global dof id.
#[derive(Debug, Clone)]
pub struct IgFunction<T: RealScalar, C: CoefficientVector<T>> {
    basis: Arc<Basis<T>>,
    coefficients: C,
    property: String,
}

impl<T: RealScalar, C: CoefficientVector<T>> IgFunction<T, C> {
    /// Create new
    pub fn new(basis: Arc<Basis<T>>, coefficients: C, property: &str) -> Result<Self, SplineError> {
        let space = basis.space();
        let required = space.dof_offset() + space.num_basis();
        if coefficients.len() < required {
            return Err(SplineError::DimensionMismatch {
                what: "number of coefficients",
                expected: required,
                found: coefficients.len(),
            });
        }
        Ok(Self {
            basis,
            coefficients,
            property: property.to_string(),
        })
    }

    /// The basis
    pub fn basis(&self) -> &Arc<Basis<T>> {
        &self.basis
    }

    /// The coefficients
    pub fn coefficients(&self) -> &C {
        &self.coefficients
    }

    /// The property selecting the basis functions
    pub fn property(&self) -> &str {
        &self.property
    }

    /// The coefficients of the basis functions touching an element, in element-local order
    pub fn local_coefficients(&self, element: &BasisElement<T>) -> Vec<T> {
        self.coefficients
            .gather(&element.get_local_to_global(&self.property))
    }

    /// Evaluate on sub-element `(k, sub_id)` of an element whose cache has been filled
    ///
    /// The result holds one entry per point, laid out like an entry of the basis table of
    /// the same kind.
    pub fn evaluate(
        &self,
        element: &BasisElement<T>,
        kind: ValueKind,
        k: usize,
        sub_id: usize,
    ) -> Vec<T> {
        element.evaluate_linear_combination(
            &self.local_coefficients(element),
            kind,
            k,
            sub_id,
            &self.property,
        )
    }

    /// Values at the points of an element
    pub fn element_values(&self, element: &BasisElement<T>) -> Vec<T> {
        self.evaluate(element, ValueKind::Value, self.basis.dim(), 0)
    }

    /// Gradients at the points of an element
    pub fn element_gradients(&self, element: &BasisElement<T>) -> Vec<T> {
        self.evaluate(element, ValueKind::Gradient, self.basis.dim(), 0)
    }

    /// Hessians at the points of an element
    pub fn element_hessians(&self, element: &BasisElement<T>) -> Vec<T> {
        self.evaluate(element, ValueKind::Hessian, self.basis.dim(), 0)
    }
}
