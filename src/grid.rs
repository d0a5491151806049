//! Cartesian grid of knot lines
use crate::indexing::TensorIndexer;
use crate::types::{to_scalar, RealScalar};
use crate::SplineError;
use log::debug;

/// Tensor product grid defined by strictly increasing knot coordinates in each direction
#[derive(Debug, Clone, PartialEq)]
pub struct CartesianGrid<T: RealScalar> {
    knots: Vec<Vec<T>>,
    elements: TensorIndexer,
}

impl<T: RealScalar> CartesianGrid<T> {
    /// Create new
    pub fn new(knots: Vec<Vec<T>>) -> Result<Self, SplineError> {
        for (direction, k) in knots.iter().enumerate() {
            if k.len() < 2 {
                return Err(SplineError::TooFewKnots {
                    direction,
                    found: k.len(),
                });
            }
            if k.windows(2).any(|w| !(w[0] < w[1])) {
                return Err(SplineError::KnotsNotIncreasing { direction });
            }
        }
        let intervals = knots.iter().map(|k| k.len() - 1).collect::<Vec<_>>();
        debug!("Creating cartesian grid with {intervals:?} intervals");
        Ok(Self {
            elements: TensorIndexer::new(&intervals),
            knots,
        })
    }

    /// Create a grid of equally spaced knots on the unit cube
    pub fn uniform(num_knots: &[usize]) -> Result<Self, SplineError> {
        let bbox = vec![[T::zero(), T::one()]; num_knots.len()];
        Self::uniform_in_box(num_knots, &bbox)
    }

    /// Create a grid of equally spaced knots inside a box
    pub fn uniform_in_box(num_knots: &[usize], bbox: &[[T; 2]]) -> Result<Self, SplineError> {
        assert_eq!(num_knots.len(), bbox.len());
        let knots = num_knots
            .iter()
            .zip(bbox)
            .map(|(n, b)| {
                let denom = to_scalar::<T, _>(n.max(&2) - 1)?;
                (0..*n)
                    .map(|i| Ok(b[0] + (b[1] - b[0]) * to_scalar::<T, _>(i)? / denom))
                    .collect::<Result<Vec<_>, SplineError>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(knots)
    }

    /// Dimension
    pub fn dim(&self) -> usize {
        self.knots.len()
    }

    /// The knot coordinates in a direction
    pub fn knot_coordinates(&self, direction: usize) -> &[T] {
        &self.knots[direction]
    }

    /// The knot coordinates in every direction
    pub fn knots(&self) -> &[Vec<T>] {
        &self.knots
    }

    /// Number of intervals in each direction
    pub fn num_intervals(&self) -> &[usize] {
        self.elements.sizes()
    }

    /// Number of elements
    pub fn element_count(&self) -> usize {
        self.elements.flat_size()
    }

    /// Element flat index to tensor index map
    pub fn element_indexer(&self) -> &TensorIndexer {
        &self.elements
    }

    /// The tensor index of an element
    pub fn element_tensor_index(&self, flat: usize) -> Vec<usize> {
        self.elements.flat_to_tensor(flat)
    }

    /// The flat index of an element
    pub fn element_flat_index(&self, tensor: &[usize]) -> usize {
        self.elements.tensor_to_flat(tensor)
    }

    /// The side lengths of an element
    pub fn element_lengths(&self, tensor: &[usize]) -> Vec<T> {
        tensor
            .iter()
            .zip(&self.knots)
            .map(|(i, k)| k[i + 1] - k[*i])
            .collect()
    }

    /// The bounding box of an element
    pub fn element_bounding_box(&self, tensor: &[usize]) -> Vec<[T; 2]> {
        tensor
            .iter()
            .zip(&self.knots)
            .map(|(i, k)| [k[*i], k[i + 1]])
            .collect()
    }

    /// Product of the element side lengths in the given directions
    pub fn element_measure(&self, tensor: &[usize], directions: &[usize]) -> T {
        let lengths = self.element_lengths(tensor);
        directions.iter().fold(T::one(), |m, d| m * lengths[*d])
    }

    /// Split every interval into `subdivisions[d]` equal parts in direction `d`
    pub fn refine(&self, subdivisions: &[usize]) -> Result<Self, SplineError> {
        assert_eq!(subdivisions.len(), self.dim());
        assert!(
            subdivisions.iter().all(|s| *s > 0),
            "Subdivisions must be positive"
        );
        let knots = self
            .knots
            .iter()
            .zip(subdivisions)
            .map(|(k, s)| {
                let mut new_knots = vec![k[0]];
                for w in k.windows(2) {
                    let h = (w[1] - w[0]) / to_scalar::<T, _>(*s)?;
                    for i in 1..*s {
                        new_knots.push(w[0] + h * to_scalar::<T, _>(i)?);
                    }
                    new_knots.push(w[1]);
                }
                Ok(new_knots)
            })
            .collect::<Result<Vec<_>, SplineError>>()?;
        Self::new(knots)
    }
}
