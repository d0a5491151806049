//! Tables of basis function values
use crate::traits::CoefficientVector;
use crate::types::RealScalar;
use rlst::{DynArray, rlst_dynamic_array};
use std::fmt::{Debug, Formatter};

/// Values of a set of functions at a set of points
///
/// Each (function, point) pair holds an entry of `entry_size` scalars. For a basis with `range`
/// components in `dim` directions, entry `c` of a value is component `c`, entry `d * range + c`
/// of a gradient is the derivative of component `c` in direction `d`, and entry
/// `(j * dim + k) * range + c` of a hessian is the second derivative of component `c` in
/// directions `j` and `k`.
///
/// The values are held in an array of shape `[entry_size, num_points, num_functions]`.
pub struct ValueTable<T: RealScalar> {
    values: DynArray<T, 3>,
}

impl<T: RealScalar> Debug for ValueTable<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_struct("ValueTable")
            .field("values", &self.values)
            .finish()
    }
}

impl<T: RealScalar> Clone for ValueTable<T> {
    fn clone(&self) -> Self {
        let [entry_size, num_points, num_functions] = self.values.shape();
        let mut result = Self::new(num_functions, num_points, entry_size);
        result.data_mut().copy_from_slice(self.data());
        result
    }
}

impl<T: RealScalar> PartialEq for ValueTable<T> {
    fn eq(&self, other: &Self) -> bool {
        self.values.shape() == other.values.shape() && self.data() == other.data()
    }
}

impl<T: RealScalar> Default for ValueTable<T> {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

impl<T: RealScalar> ValueTable<T> {
    /// Create a table of zeros
    pub fn new(num_functions: usize, num_points: usize, entry_size: usize) -> Self {
        Self {
            values: rlst_dynamic_array!(T, [entry_size, num_points, num_functions]),
        }
    }

    /// Number of functions
    pub fn num_functions(&self) -> usize {
        self.values.shape()[2]
    }

    /// Number of points
    pub fn num_points(&self) -> usize {
        self.values.shape()[1]
    }

    /// Number of scalars per entry
    pub fn entry_size(&self) -> usize {
        self.values.shape()[0]
    }

    /// Check if the table has the given shape
    pub fn has_shape(&self, num_functions: usize, num_points: usize, entry_size: usize) -> bool {
        self.values.shape() == [entry_size, num_points, num_functions]
    }

    /// The array of values, of shape `[entry_size, num_points, num_functions]`
    pub fn values(&self) -> &DynArray<T, 3> {
        &self.values
    }

    /// The raw data, ordered by function, then point, then entry
    pub fn data(&self) -> &[T] {
        if self.values.shape().contains(&0) {
            return &[];
        }
        self.values.data().unwrap()
    }

    /// Mutable raw data
    pub fn data_mut(&mut self) -> &mut [T] {
        if self.values.shape().contains(&0) {
            return &mut [];
        }
        self.values.data_mut().unwrap()
    }

    fn offset(&self, function: usize, point: usize) -> usize {
        assert!(
            function < self.num_functions() && point < self.num_points(),
            "Entry ({function}, {point}) out of range for table of shape ({}, {})",
            self.num_functions(),
            self.num_points()
        );
        (function * self.num_points() + point) * self.entry_size()
    }

    /// The entry of a function at a point
    pub fn get(&self, function: usize, point: usize) -> &[T] {
        let start = self.offset(function, point);
        let size = self.entry_size();
        &self.data()[start..start + size]
    }

    /// Mutable entry of a function at a point
    pub fn get_mut(&mut self, function: usize, point: usize) -> &mut [T] {
        let start = self.offset(function, point);
        let size = self.entry_size();
        &mut self.data_mut()[start..start + size]
    }

    /// Iterate over the entries of a function at every point
    pub fn function_view(&self, function: usize) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.num_points()).map(move |p| self.get(function, p))
    }

    /// Iterate over the entries of every function at a point
    pub fn point_view(&self, point: usize) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.num_functions()).map(move |f| self.get(f, point))
    }

    /// Change the shape, reallocating and zeroing only if it differs
    ///
    /// Returns `true` if the table was reallocated.
    pub fn resize(&mut self, num_functions: usize, num_points: usize, entry_size: usize) -> bool {
        if self.has_shape(num_functions, num_points, entry_size) {
            return false;
        }
        *self = Self::new(num_functions, num_points, entry_size);
        true
    }

    /// Set every value to zero
    pub fn zero(&mut self) {
        self.data_mut().iter_mut().for_each(|v| *v = T::zero());
    }

    /// Release the storage
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// A table holding only the given functions, in the given order
    pub fn filter_functions(&self, functions: &[usize]) -> Self {
        let mut result = Self::new(functions.len(), self.num_points(), self.entry_size());
        for (i, f) in functions.iter().enumerate() {
            assert!(*f < self.num_functions(), "Function {f} out of range");
            for p in 0..self.num_points() {
                for e in 0..self.entry_size() {
                    result.values[[e, p, i]] = self.values[[e, p, *f]];
                }
            }
        }
        result
    }

    /// Sum of the functions weighted by `coefficients`, at every point
    ///
    /// The result holds `num_points` entries of `entry_size` scalars.
    pub fn linear_combination<C: CoefficientVector<T> + ?Sized>(&self, coefficients: &C) -> Vec<T> {
        assert_eq!(
            coefficients.len(),
            self.num_functions(),
            "Wrong number of coefficients"
        );
        let [entry_size, num_points, num_functions] = self.values.shape();
        let mut result = vec![T::zero(); num_points * entry_size];
        for f in 0..num_functions {
            let c = coefficients.coefficient(f);
            for p in 0..num_points {
                for e in 0..entry_size {
                    let r = &mut result[p * entry_size + e];
                    *r = *r + c * self.values[[e, p, f]];
                }
            }
        }
        result
    }

    /// The divergences of a table of gradients of a `dim`-dimensional basis with `dim` components
    pub fn divergence(&self, dim: usize) -> Self {
        assert_eq!(
            self.entry_size(),
            dim * dim,
            "Divergence needs gradients of a basis with as many components as directions"
        );
        let mut result = Self::new(self.num_functions(), self.num_points(), 1);
        for f in 0..self.num_functions() {
            for p in 0..self.num_points() {
                result.values[[0, p, f]] = (0..dim).map(|d| self.values[[d * dim + d, p, f]]).sum();
            }
        }
        result
    }
}
