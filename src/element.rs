//! Basis elements
mod handler;

pub use handler::ElementHandler;

use crate::basis::Basis;
use crate::cache::{CacheHandle, ValuesCache};
use crate::space::ElementDofs;
use crate::types::{RealScalar, ValueKind};
use crate::value_table::ValueTable;
use std::sync::Arc;

/// An element of a basis, with the cache of its basis function values
///
/// The cache is created by [ElementHandler::init_element_cache] and filled by the
/// `fill_*` methods of [ElementHandler]. Values are read back with [BasisElement::get_basis].
#[derive(Debug)]
pub struct BasisElement<T: RealScalar> {
    basis: Arc<Basis<T>>,
    index: usize,
    tensor_index: Vec<usize>,
    cache: Option<CacheHandle<T>>,
}

impl<T: RealScalar> BasisElement<T> {
    /// Create new
    pub fn new(basis: Arc<Basis<T>>, index: usize) -> Self {
        let tensor_index = basis.space().grid().element_tensor_index(index);
        Self {
            basis,
            index,
            tensor_index,
            cache: None,
        }
    }

    /// The first element of a basis
    pub fn begin(basis: &Arc<Basis<T>>) -> Self {
        Self::new(Arc::clone(basis), 0)
    }

    /// The basis
    pub fn basis(&self) -> &Arc<Basis<T>> {
        &self.basis
    }

    /// The flat index of the element
    pub fn index(&self) -> usize {
        self.index
    }

    /// The tensor index of the element
    pub fn tensor_index(&self) -> &[usize] {
        &self.tensor_index
    }

    /// Move to another element
    ///
    /// The cache keeps its storage but every slot must be filled again.
    pub fn move_to(&mut self, index: usize) {
        self.tensor_index = self.basis.space().grid().element_tensor_index(index);
        self.index = index;
        if let Some(c) = &self.cache {
            c.borrow_mut().invalidate();
        }
    }

    /// Move to the next element, returning `false` if this was the last one
    pub fn advance(&mut self) -> bool {
        if self.index + 1 < self.basis.element_count() {
            self.move_to(self.index + 1);
            true
        } else {
            false
        }
    }

    /// An element at the same position sharing this element's cache
    pub fn alias(&self) -> Self {
        Self {
            basis: Arc::clone(&self.basis),
            index: self.index,
            tensor_index: self.tensor_index.clone(),
            cache: self.cache.as_ref().map(|c| c.alias()),
        }
    }

    /// An element at the same position with an independent copy of this element's cache
    pub fn deep_copy(&self) -> Self {
        Self {
            basis: Arc::clone(&self.basis),
            index: self.index,
            tensor_index: self.tensor_index.clone(),
            cache: self.cache.as_ref().map(|c| c.deep_clone()),
        }
    }

    /// The cache, if it has been initialised
    pub fn cache(&self) -> Option<&CacheHandle<T>> {
        self.cache.as_ref()
    }

    pub(crate) fn cache_or_init(&mut self) -> &CacheHandle<T> {
        let dim = self.basis.dim();
        self.cache.get_or_insert_with(|| CacheHandle::new(dim))
    }

    fn dofs(&self, property: &str) -> ElementDofs {
        self.basis.space().element_dofs(&self.tensor_index, property)
    }

    /// Global ids of the basis functions touching the element that have a property
    pub fn get_local_to_global(&self, property: &str) -> Vec<usize> {
        self.dofs(property).global
    }

    /// Patch-local ids of the basis functions touching the element that have a property
    pub fn get_local_to_patch(&self, property: &str) -> Vec<usize> {
        self.dofs(property).patch
    }

    /// Element-local ids of the basis functions touching the element that have a property
    pub fn get_local_dofs(&self, property: &str) -> Vec<usize> {
        self.dofs(property).local
    }

    /// Number of basis functions touching the element that have a property
    pub fn get_num_basis(&self, property: &str) -> usize {
        self.dofs(property).len()
    }

    fn read_cache<R>(&self, k: usize, sub_id: usize, f: impl FnOnce(&ValuesCache<T>) -> R) -> R {
        let cache = self
            .cache
            .as_ref()
            .unwrap_or_else(|| panic!("Element cache has not been initialised"));
        let c = cache.borrow();
        f(c.value_cache(k, sub_id))
    }

    /// Values, derivatives or divergences on sub-element `(k, sub_id)` of the basis functions
    /// that have a property
    ///
    /// The element itself is the sub-element `(dim, 0)`.
    pub fn get_basis(
        &self,
        kind: ValueKind,
        k: usize,
        sub_id: usize,
        property: &str,
    ) -> ValueTable<T> {
        let dim = self.basis.dim();
        let table = self.read_cache(k, sub_id, |c| c.table(kind, dim));
        let local = self.get_local_dofs(property);
        if local.len() == table.num_functions() {
            table
        } else {
            table.filter_functions(&local)
        }
    }

    /// Values on the element of the basis functions that have a property
    pub fn get_element_values(&self, property: &str) -> ValueTable<T> {
        self.get_basis(ValueKind::Value, self.basis.dim(), 0, property)
    }

    /// Gradients on the element of the basis functions that have a property
    pub fn get_element_gradients(&self, property: &str) -> ValueTable<T> {
        self.get_basis(ValueKind::Gradient, self.basis.dim(), 0, property)
    }

    /// Hessians on the element of the basis functions that have a property
    pub fn get_element_hessians(&self, property: &str) -> ValueTable<T> {
        self.get_basis(ValueKind::Hessian, self.basis.dim(), 0, property)
    }

    /// Divergences on the element of the basis functions that have a property
    pub fn get_element_divergences(&self, property: &str) -> ValueTable<T> {
        self.get_basis(ValueKind::Divergence, self.basis.dim(), 0, property)
    }

    /// Quadrature weights times measure of sub-element `(k, sub_id)`
    pub fn get_w_measures(&self, k: usize, sub_id: usize) -> Vec<T> {
        self.read_cache(k, sub_id, |c| c.w_measures().to_vec())
    }

    /// Quadrature weights times measure of the element
    pub fn get_element_w_measures(&self) -> Vec<T> {
        self.get_w_measures(self.basis.dim(), 0)
    }

    /// Measure of sub-element `(k, sub_id)`
    pub fn get_measure(&self, k: usize, sub_id: usize) -> T {
        self.read_cache(k, sub_id, |c| c.measure())
    }

    /// Parametric coordinates of the points of sub-element `(k, sub_id)`
    pub fn get_points(&self, k: usize, sub_id: usize) -> Vec<Vec<T>> {
        self.read_cache(k, sub_id, |c| c.points().to_vec())
    }

    /// Linear combination on sub-element `(k, sub_id)` of the basis functions that have a
    /// property
    ///
    /// `coefficients` holds one coefficient per selected basis function, in element-local order.
    pub fn evaluate_linear_combination(
        &self,
        coefficients: &[T],
        kind: ValueKind,
        k: usize,
        sub_id: usize,
        property: &str,
    ) -> Vec<T> {
        self.get_basis(kind, k, sub_id, property)
            .linear_combination(coefficients)
    }
}
