//! Coefficient vectors
use crate::types::RealScalar;

/// Coefficients of a linear combination of basis functions
pub trait CoefficientVector<T: RealScalar> {
    /// Number of coefficients
    fn len(&self) -> usize;

    /// Check if there are no coefficients
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The coefficient with index `index`
    fn coefficient(&self, index: usize) -> T;

    /// The coefficients with the given indices
    fn gather(&self, indices: &[usize]) -> Vec<T> {
        indices.iter().map(|i| self.coefficient(*i)).collect()
    }
}

impl<T: RealScalar> CoefficientVector<T> for [T] {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }
    fn coefficient(&self, index: usize) -> T {
        self[index]
    }
}

impl<T: RealScalar> CoefficientVector<T> for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
    fn coefficient(&self, index: usize) -> T {
        self[index]
    }
}
