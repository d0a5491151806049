//! Element value caches
use crate::evaluation_points::EvaluationPoints;
use crate::types::{RealScalar, ValueFlags, ValueKind};
use crate::unit_element::sub_element_count;
use crate::value_table::ValueTable;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Life cycle of a [ValuesCache]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheState {
    /// No storage allocated
    #[default]
    Uninitialized,
    /// Storage allocated for a set of flags, nothing computed
    Resized,
    /// Every requested quantity has been computed
    Filled,
}

/// Values of the basis functions of an element on one sub-element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValuesCache<T: RealScalar> {
    state: CacheState,
    flags: ValueFlags,
    quadrature: Option<EvaluationPoints<T>>,
    derivatives: [ValueTable<T>; 3],
    filled: [bool; 3],
    points: Vec<Vec<T>>,
    w_measures: Vec<T>,
    measure: Option<T>,
}

impl<T: RealScalar> ValuesCache<T> {
    /// The state
    pub fn state(&self) -> CacheState {
        self.state
    }

    /// The flags the storage was allocated for
    pub fn flags(&self) -> ValueFlags {
        self.flags
    }

    /// Check if every requested quantity has been computed
    pub fn is_filled(&self) -> bool {
        self.state == CacheState::Filled
    }

    /// Allocate storage
    ///
    /// Storage is only reallocated if the sizes differ from the current ones, and is zeroed
    /// whenever the flags or sizes change. Calling again with the same arguments leaves the
    /// cache unchanged.
    pub fn resize(
        &mut self,
        flags: ValueFlags,
        num_functions: usize,
        num_points: usize,
        dim: usize,
        range: usize,
    ) {
        let flags = flags.with_lower_orders();
        let max_order = flags.max_derivative_order();
        let mut changed = self.state == CacheState::Uninitialized || flags != self.flags;
        for (order, table) in self.derivatives.iter_mut().enumerate() {
            if max_order.is_some_and(|m| order <= m) {
                changed |= table.resize(
                    num_functions,
                    num_points,
                    ValueKind::from_order(order).entry_size(dim, range),
                );
            } else if table.num_functions() + table.num_points() > 0 {
                table.clear();
                changed = true;
            }
        }
        if self.w_measures.len() != num_points {
            changed = true;
        }
        if changed {
            for table in self.derivatives.iter_mut() {
                table.zero();
            }
            self.flags = flags;
            self.filled = [false; 3];
            self.points.clear();
            self.w_measures = vec![T::zero(); num_points];
            self.measure = None;
            self.state = CacheState::Resized;
        }
    }

    /// The points on the reference element the values are computed at
    pub fn quadrature(&self) -> Option<&EvaluationPoints<T>> {
        self.quadrature.as_ref()
    }

    /// Allocate storage for the values at a set of reference points
    ///
    /// A slot whose points change goes back to the resized state.
    pub fn resize_for_points(
        &mut self,
        flags: ValueFlags,
        num_functions: usize,
        points: EvaluationPoints<T>,
        dim: usize,
        range: usize,
    ) {
        self.resize(flags, num_functions, points.num_points(), dim, range);
        if self.quadrature.as_ref() != Some(&points) {
            self.quadrature = Some(points);
            if self.state == CacheState::Filled {
                self.begin_fill();
            }
        }
    }

    /// The table of derivatives of order `order`
    pub fn derivative(&self, order: usize) -> &ValueTable<T> {
        assert!(
            order < 3 && self.filled[order],
            "Derivatives of order {order} have not been computed"
        );
        &self.derivatives[order]
    }

    /// The table of a kind of value
    pub fn table(&self, kind: ValueKind, dim: usize) -> ValueTable<T> {
        match kind {
            ValueKind::Divergence => self.derivative(1).divergence(dim),
            _ => self.derivative(kind.derivative_order()).clone(),
        }
    }

    /// Parametric coordinates of the points
    pub fn points(&self) -> &[Vec<T>] {
        assert!(
            self.is_filled() && self.flags.contains(ValueFlags::POINT),
            "Points have not been computed"
        );
        &self.points
    }

    /// Quadrature weights multiplied by the measure of the sub-element
    pub fn w_measures(&self) -> &[T] {
        assert!(
            self.is_filled() && self.flags.contains(ValueFlags::W_MEASURE),
            "Weighted measures have not been computed"
        );
        &self.w_measures
    }

    /// Measure of the sub-element
    pub fn measure(&self) -> T {
        match self.measure {
            Some(m) if self.is_filled() => m,
            _ => panic!("Measure has not been computed"),
        }
    }

    pub(crate) fn derivative_tables_mut(&mut self) -> &mut [ValueTable<T>; 3] {
        &mut self.derivatives
    }

    pub(crate) fn quadrature_and_tables_mut(
        &mut self,
    ) -> (Option<&EvaluationPoints<T>>, &mut [ValueTable<T>; 3]) {
        (self.quadrature.as_ref(), &mut self.derivatives)
    }

    pub(crate) fn set_points(&mut self, points: Vec<Vec<T>>) {
        self.points = points;
    }

    pub(crate) fn set_measures(&mut self, measure: T, w_measures: Vec<T>) {
        self.measure = Some(measure);
        self.w_measures = w_measures;
    }

    pub(crate) fn begin_fill(&mut self) {
        assert!(
            self.state != CacheState::Uninitialized,
            "Cache must be resized before it is filled"
        );
        self.filled = [false; 3];
        self.state = CacheState::Resized;
    }

    pub(crate) fn finish_fill(&mut self) {
        if let Some(m) = self.flags.max_derivative_order() {
            for f in self.filled.iter_mut().take(m + 1) {
                *f = true;
            }
        }
        self.state = CacheState::Filled;
    }
}

/// Value caches of an element and of each of its sub-elements
///
/// Slot `(k, j)` holds the values on the `j`th sub-element of dimension `k`; the element itself
/// is slot `(dim, 0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalCache<T: RealScalar> {
    slots: Vec<Vec<ValuesCache<T>>>,
}

impl<T: RealScalar> LocalCache<T> {
    /// Create new
    pub fn new(dim: usize) -> Self {
        Self {
            slots: (0..=dim)
                .map(|k| vec![ValuesCache::default(); sub_element_count(dim, k)])
                .collect(),
        }
    }

    /// Dimension of the element
    pub fn dim(&self) -> usize {
        self.slots.len() - 1
    }

    /// The cache of a sub-element
    pub fn value_cache(&self, k: usize, sub_id: usize) -> &ValuesCache<T> {
        &self.slots[k][sub_id]
    }

    /// Mutable cache of a sub-element
    pub fn value_cache_mut(&mut self, k: usize, sub_id: usize) -> &mut ValuesCache<T> {
        &mut self.slots[k][sub_id]
    }

    /// Mark every filled slot as needing to be filled again, keeping its storage
    pub fn invalidate(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            if slot.state == CacheState::Filled {
                slot.begin_fill();
            }
        }
    }
}

/// Shared handle to a [LocalCache]
///
/// [CacheHandle::alias] gives a handle to the same storage, so filling through either handle
/// is visible through both. [CacheHandle::deep_clone] copies the storage.
#[derive(Debug)]
pub struct CacheHandle<T: RealScalar>(Rc<RefCell<LocalCache<T>>>);

impl<T: RealScalar> CacheHandle<T> {
    /// Create new
    pub fn new(dim: usize) -> Self {
        Self(Rc::new(RefCell::new(LocalCache::new(dim))))
    }

    /// A handle sharing this handle's storage
    pub fn alias(&self) -> Self {
        Self(Rc::clone(&self.0))
    }

    /// A handle to an independent copy of this handle's storage
    pub fn deep_clone(&self) -> Self {
        Self(Rc::new(RefCell::new(self.0.borrow().clone())))
    }

    /// Check if two handles share storage
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Borrow the cache
    pub fn borrow(&self) -> Ref<'_, LocalCache<T>> {
        self.0.borrow()
    }

    /// Mutably borrow the cache
    pub fn borrow_mut(&self) -> RefMut<'_, LocalCache<T>> {
        self.0.borrow_mut()
    }
}
