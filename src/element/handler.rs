//! Filling element caches
use super::BasisElement;
use crate::basis::Basis;
use crate::evaluation_points::EvaluationPoints;
use crate::types::{RealScalar, ValueFlags};
use crate::unit_element::{sub_element, sub_element_count};
use crate::SplineError;
use log::{debug, trace};
use std::sync::Arc;

/// Computes the values requested by a set of flags into the caches of basis elements
#[derive(Debug)]
pub struct ElementHandler<T: RealScalar> {
    basis: Arc<Basis<T>>,
    flags: Vec<ValueFlags>,
}

impl<T: RealScalar> ElementHandler<T> {
    /// Create new
    pub fn new(basis: Arc<Basis<T>>) -> Self {
        let dim = basis.dim();
        Self {
            basis,
            flags: vec![ValueFlags::NONE; dim + 1],
        }
    }

    /// The basis
    pub fn basis(&self) -> &Arc<Basis<T>> {
        &self.basis
    }

    /// Request values on the sub-elements of dimension `k`
    pub fn set_flags(&mut self, k: usize, flags: ValueFlags) {
        assert!(k <= self.basis.dim(), "Sub-element dimension {k} out of range");
        self.flags[k] = flags;
    }

    /// Request values on the element
    pub fn set_element_flags(&mut self, flags: ValueFlags) {
        self.set_flags(self.basis.dim(), flags);
    }

    /// Request values on the faces
    pub fn set_face_flags(&mut self, flags: ValueFlags) {
        assert!(self.basis.dim() > 0, "A 0-dimensional element has no faces");
        self.set_flags(self.basis.dim() - 1, flags);
    }

    /// Allocate the cache of an element for the requested flags and a quadrature on the
    /// reference element
    ///
    /// The points used on a sub-element are the quadrature restricted to the sub-element, so
    /// the quadrature must have tensor product structure if any sub-element values are requested.
    /// Each element keeps its own points, so elements may be initialised with different
    /// quadratures.
    pub fn init_element_cache(&self, element: &mut BasisElement<T>, quad: &EvaluationPoints<T>) {
        let dim = self.basis.dim();
        assert_eq!(quad.dim(), dim, "Quadrature has the wrong dimension");
        let n_basis = self.basis.element_num_basis();
        let range = self.basis.range();
        let cache = element.cache_or_init();
        let mut c = cache.borrow_mut();
        for (k, flags) in self.flags.iter().enumerate() {
            if flags.is_empty() {
                continue;
            }
            for j in 0..sub_element_count(dim, k) {
                c.value_cache_mut(k, j)
                    .resize_for_points(*flags, n_basis, quad.on_sub_element(k, j), dim, range);
            }
        }
        debug!(
            "Initialised element cache with {} basis functions and {} points",
            n_basis,
            quad.num_points()
        );
    }

    /// Fill the cache of sub-element `(k, sub_id)` of an element
    pub fn fill_cache(
        &self,
        element: &BasisElement<T>,
        k: usize,
        sub_id: usize,
    ) -> Result<(), SplineError> {
        let cache = element
            .cache()
            .unwrap_or_else(|| panic!("Element cache has not been initialised"));
        let mut c = cache.borrow_mut();
        let slot = c.value_cache_mut(k, sub_id);
        slot.begin_fill();
        let flags = slot.flags();
        let tensor_index = element.tensor_index();
        trace!("Filling sub-element ({k}, {sub_id}) of element {tensor_index:?}");

        let (points, tables) = slot.quadrature_and_tables_mut();
        let points = points.unwrap_or_else(|| {
            panic!("No values were requested on sub-element ({k}, {sub_id}) when the cache was initialised")
        });
        if let Some(max_order) = flags.max_derivative_order() {
            self.basis
                .evaluate(tensor_index, points, max_order, &mut tables[..])?;
        }

        let grid = self.basis.space().grid();
        let physical_points = if flags.contains(ValueFlags::POINT) {
            let bbox = grid.element_bounding_box(tensor_index);
            let reference = points.points_table();
            Some(
                (0..points.num_points())
                    .map(|p| {
                        bbox.iter()
                            .enumerate()
                            .map(|(d, b)| b[0] + reference[[d, p]] * (b[1] - b[0]))
                            .collect()
                    })
                    .collect(),
            )
        } else {
            None
        };
        let measures = if flags.contains(ValueFlags::MEASURE) {
            let sub = sub_element(self.basis.dim(), k, sub_id);
            let measure = grid.element_measure(tensor_index, sub.active_directions());
            let w_measures = points.weights().into_iter().map(|w| w * measure).collect();
            Some((measure, w_measures))
        } else {
            None
        };
        if let Some(p) = physical_points {
            slot.set_points(p);
        }
        if let Some((measure, w_measures)) = measures {
            slot.set_measures(measure, w_measures);
        }
        slot.finish_fill();
        Ok(())
    }

    /// Fill the cache of an element
    pub fn fill_element_cache(&self, element: &BasisElement<T>) -> Result<(), SplineError> {
        self.fill_cache(element, self.basis.dim(), 0)
    }

    /// Fill the cache of a face of an element
    pub fn fill_face_cache(&self, element: &BasisElement<T>, face: usize) -> Result<(), SplineError> {
        assert!(self.basis.dim() > 0, "A 0-dimensional element has no faces");
        self.fill_cache(element, self.basis.dim() - 1, face)
    }
}
