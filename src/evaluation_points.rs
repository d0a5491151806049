//! Evaluation points with per-direction coordinates
use crate::indexing::TensorIndexer;
use crate::types::RealScalar;
use crate::unit_element::sub_element;
use crate::SplineError;
use rlst::{DynArray, rlst_dynamic_array};
use std::collections::HashSet;
use std::fmt::{Debug, Formatter};

/// A set of points stored as unique coordinates in each direction
///
/// Each point is identified by a tensor of coordinate ids, one per direction, and carries the
/// product of the 1-D weights of its coordinates as its weight. The ids are held in an array of
/// shape `[dim, num_points]`.
pub struct EvaluationPoints<T: RealScalar> {
    bounding_box: Vec<[T; 2]>,
    coordinates: Vec<Vec<T>>,
    weights_1d: Vec<Vec<T>>,
    point_coords_id: DynArray<usize, 2>,
    tensor_product: bool,
}

impl<T: RealScalar> Debug for EvaluationPoints<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_struct("EvaluationPoints")
            .field("bounding_box", &self.bounding_box)
            .field("coordinates", &self.coordinates)
            .field("weights_1d", &self.weights_1d)
            .field("point_coords_id", &self.point_coords_id)
            .finish()
    }
}

impl<T: RealScalar> Clone for EvaluationPoints<T> {
    fn clone(&self) -> Self {
        Self {
            bounding_box: self.bounding_box.clone(),
            coordinates: self.coordinates.clone(),
            weights_1d: self.weights_1d.clone(),
            point_coords_id: copy_ids(&self.point_coords_id),
            tensor_product: self.tensor_product,
        }
    }
}

impl<T: RealScalar> PartialEq for EvaluationPoints<T> {
    fn eq(&self, other: &Self) -> bool {
        self.bounding_box == other.bounding_box
            && self.coordinates == other.coordinates
            && self.weights_1d == other.weights_1d
            && self.tensor_product == other.tensor_product
            && self.point_coords_id.shape() == other.point_coords_id.shape()
            && (0..self.num_points()).all(|p| self.coords_id(p) == other.coords_id(p))
    }
}

fn to_f64<T: RealScalar>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

/// Store the coordinate ids of each point as a column of a `[dim, num_points]` array
fn id_table(dim: usize, ids: impl ExactSizeIterator<Item = Vec<usize>>) -> DynArray<usize, 2> {
    let mut table = rlst_dynamic_array!(usize, [dim, ids.len()]);
    for (p, point_ids) in ids.enumerate() {
        for (d, i) in point_ids.iter().enumerate() {
            table[[d, p]] = *i;
        }
    }
    table
}

fn copy_ids(ids: &DynArray<usize, 2>) -> DynArray<usize, 2> {
    let [dim, npts] = ids.shape();
    let mut table = rlst_dynamic_array!(usize, [dim, npts]);
    for p in 0..npts {
        for d in 0..dim {
            table[[d, p]] = ids[[d, p]];
        }
    }
    table
}

impl<T: RealScalar> EvaluationPoints<T> {
    /// Create the tensor product of 1-D coordinates on the unit box
    pub fn new_tensor_product(
        coordinates: Vec<Vec<T>>,
        weights_1d: Vec<Vec<T>>,
    ) -> Result<Self, SplineError> {
        let bounding_box = vec![[T::zero(), T::one()]; coordinates.len()];
        Self::new_tensor_product_in_box(coordinates, weights_1d, bounding_box)
    }

    /// Create the tensor product of 1-D coordinates inside a bounding box
    pub fn new_tensor_product_in_box(
        coordinates: Vec<Vec<T>>,
        weights_1d: Vec<Vec<T>>,
        bounding_box: Vec<[T; 2]>,
    ) -> Result<Self, SplineError> {
        check_directions(&coordinates, &weights_1d, &bounding_box)?;
        let sizes = coordinates.iter().map(|c| c.len()).collect::<Vec<_>>();
        let indexer = TensorIndexer::new(&sizes);
        let point_coords_id = id_table(sizes.len(), indexer.iter());
        Ok(Self {
            bounding_box,
            coordinates,
            weights_1d,
            point_coords_id,
            tensor_product: true,
        })
    }

    /// Create from a list of points
    ///
    /// The coordinates of the points are sorted and deduplicated in each direction;
    /// `weights_1d[d]` gives the weight of each unique coordinate in direction `d`.
    pub fn from_points(
        points: &[Vec<T>],
        weights_1d: Vec<Vec<T>>,
        bounding_box: Vec<[T; 2]>,
    ) -> Result<Self, SplineError> {
        let dim = bounding_box.len();
        let mut coordinates = vec![vec![]; dim];
        for p in points {
            if p.len() != dim {
                return Err(SplineError::DimensionMismatch {
                    what: "point dimension",
                    expected: dim,
                    found: p.len(),
                });
            }
            for (c, x) in coordinates.iter_mut().zip(p) {
                c.push(*x);
            }
        }
        for c in coordinates.iter_mut() {
            c.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            c.dedup();
        }
        check_directions(&coordinates, &weights_1d, &bounding_box)?;

        let point_coords_id = points
            .iter()
            .map(|p| {
                p.iter()
                    .zip(&coordinates)
                    .map(|(x, c)| c.iter().position(|y| y == x).unwrap_or_default())
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let sizes = coordinates.iter().map(|c| c.len()).collect::<Vec<_>>();
        let indexer = TensorIndexer::new(&sizes);
        let tensor_product = points.len() == indexer.flat_size() && {
            let present = point_coords_id.iter().collect::<HashSet<_>>();
            indexer.iter().all(|t| present.contains(&t))
        };

        Ok(Self {
            bounding_box,
            coordinates,
            weights_1d,
            point_coords_id: id_table(dim, point_coords_id.into_iter()),
            tensor_product,
        })
    }

    /// Create from unique coordinates and the coordinate ids of each point
    ///
    /// `point_coords_id` has one column of ids per point.
    pub fn from_coords_ids(
        coordinates: Vec<Vec<T>>,
        weights_1d: Vec<Vec<T>>,
        bounding_box: Vec<[T; 2]>,
        point_coords_id: DynArray<usize, 2>,
        tensor_product: bool,
    ) -> Result<Self, SplineError> {
        check_directions(&coordinates, &weights_1d, &bounding_box)?;
        let [dim, npts] = point_coords_id.shape();
        if dim != coordinates.len() {
            return Err(SplineError::DimensionMismatch {
                what: "directions of coordinate ids",
                expected: coordinates.len(),
                found: dim,
            });
        }
        for p in 0..npts {
            for (d, c) in coordinates.iter().enumerate() {
                if point_coords_id[[d, p]] >= c.len() {
                    return Err(SplineError::DimensionMismatch {
                        what: "coordinate id bound",
                        expected: c.len(),
                        found: point_coords_id[[d, p]],
                    });
                }
            }
        }
        Ok(Self {
            bounding_box,
            coordinates,
            weights_1d,
            point_coords_id,
            tensor_product,
        })
    }

    /// Dimension
    pub fn dim(&self) -> usize {
        self.bounding_box.len()
    }

    /// Number of points
    pub fn num_points(&self) -> usize {
        self.point_coords_id.shape()[1]
    }

    /// Check if the points are exactly the tensor product of their coordinates
    pub fn has_tensor_product_structure(&self) -> bool {
        self.tensor_product
    }

    /// The bounding box
    pub fn bounding_box(&self) -> &[[T; 2]] {
        &self.bounding_box
    }

    /// Replace the bounding box
    pub fn reset_bounding_box(&mut self, bounding_box: Vec<[T; 2]>) -> Result<(), SplineError> {
        check_directions(&self.coordinates, &self.weights_1d, &bounding_box)?;
        self.bounding_box = bounding_box;
        Ok(())
    }

    /// The unique coordinates in a direction
    pub fn coords_direction(&self, direction: usize) -> &[T] {
        &self.coordinates[direction]
    }

    /// Number of unique coordinates in each direction
    pub fn num_coords_direction(&self) -> Vec<usize> {
        self.coordinates.iter().map(|c| c.len()).collect()
    }

    /// The 1-D weights in each direction
    pub fn weights_1d(&self) -> &[Vec<T>] {
        &self.weights_1d
    }

    /// The array of coordinate ids, with one column per point
    pub fn coords_ids(&self) -> &DynArray<usize, 2> {
        &self.point_coords_id
    }

    /// The coordinate ids of a point
    pub fn coords_id(&self, point: usize) -> &[usize] {
        assert!(point < self.num_points(), "Point {point} out of range");
        let dim = self.dim();
        if dim == 0 {
            return &[];
        }
        &self.point_coords_id.data().unwrap()[point * dim..(point + 1) * dim]
    }

    /// The coordinates of a point
    pub fn point(&self, point: usize) -> Vec<T> {
        self.coords_id(point)
            .iter()
            .zip(&self.coordinates)
            .map(|(i, c)| c[*i])
            .collect()
    }

    /// The coordinates of every point
    pub fn points(&self) -> Vec<Vec<T>> {
        (0..self.num_points()).map(|i| self.point(i)).collect()
    }

    /// The coordinates of every point, as an array with one column per point
    pub fn points_table(&self) -> DynArray<T, 2> {
        let [dim, npts] = self.point_coords_id.shape();
        let mut table = rlst_dynamic_array!(T, [dim, npts]);
        for p in 0..npts {
            for (d, c) in self.coordinates.iter().enumerate() {
                table[[d, p]] = c[self.point_coords_id[[d, p]]];
            }
        }
        table
    }

    /// The weight of a point
    pub fn weight(&self, point: usize) -> T {
        self.coords_id(point)
            .iter()
            .zip(&self.weights_1d)
            .fold(T::one(), |w, (i, wd)| w * wd[*i])
    }

    /// The weight of every point
    pub fn weights(&self) -> Vec<T> {
        (0..self.num_points()).map(|i| self.weight(i)).collect()
    }

    /// Scale coordinates, weights and bounding box in each direction
    pub fn dilate(&mut self, factors: &[T]) -> Result<(), SplineError> {
        assert_eq!(factors.len(), self.dim());
        if let Some((direction, factor)) = factors
            .iter()
            .enumerate()
            .find(|(_, f)| !(**f > T::zero()))
        {
            return Err(SplineError::NonPositiveDilation {
                direction,
                factor: to_f64(*factor),
            });
        }
        for (d, f) in factors.iter().enumerate() {
            for x in self.coordinates[d].iter_mut() {
                *x = *x * *f;
            }
            for w in self.weights_1d[d].iter_mut() {
                *w = *w * *f;
            }
            for b in self.bounding_box[d].iter_mut() {
                *b = *b * *f;
            }
        }
        Ok(())
    }

    /// Shift coordinates and bounding box in each direction
    pub fn translate(&mut self, offset: &[T]) {
        assert_eq!(offset.len(), self.dim());
        for (d, o) in offset.iter().enumerate() {
            for x in self.coordinates[d].iter_mut() {
                *x = *x + *o;
            }
            for b in self.bounding_box[d].iter_mut() {
                *b = *b + *o;
            }
        }
    }

    /// Dilate then translate
    pub fn dilate_translate(&mut self, factors: &[T], offset: &[T]) -> Result<(), SplineError> {
        self.dilate(factors)?;
        self.translate(offset);
        Ok(())
    }

    /// Restrict to the active directions of a `k`-dimensional sub-element
    ///
    /// The result is a `k`-dimensional point set. Panics if the points are not a tensor product.
    pub fn collapse_to_sub_element(&self, k: usize, sub_id: usize) -> Self {
        assert!(
            self.tensor_product,
            "Only tensor product points can be restricted to a sub-element"
        );
        let sub = sub_element(self.dim(), k, sub_id);
        let coordinates = sub
            .active_directions()
            .iter()
            .map(|d| self.coordinates[*d].clone())
            .collect::<Vec<_>>();
        let weights_1d = sub
            .active_directions()
            .iter()
            .map(|d| self.weights_1d[*d].clone())
            .collect::<Vec<_>>();
        let bounding_box = sub
            .active_directions()
            .iter()
            .map(|d| self.bounding_box[*d])
            .collect::<Vec<_>>();
        let sizes = coordinates.iter().map(|c| c.len()).collect::<Vec<_>>();
        Self {
            bounding_box,
            coordinates,
            weights_1d,
            point_coords_id: id_table(sizes.len(), TensorIndexer::new(&sizes).iter()),
            tensor_product: true,
        }
    }

    /// Embed `k`-dimensional points into the sub-element `sub_id` of the `dim`-dimensional
    /// unit cube
    ///
    /// Constant directions get the single coordinate 0 or 1 with weight 1, and a bounding box
    /// that collapses onto that coordinate.
    pub fn extend_sub_elem_quad(points: &Self, dim: usize, sub_id: usize) -> Self {
        let sub = sub_element(dim, points.dim(), sub_id);
        let mut coordinates = vec![vec![]; dim];
        let mut weights_1d = vec![vec![]; dim];
        let mut bounding_box = vec![[T::zero(), T::one()]; dim];
        for (i, d) in sub.active_directions().iter().enumerate() {
            coordinates[*d] = points.coordinates[i].clone();
            weights_1d[*d] = points.weights_1d[i].clone();
            bounding_box[*d] = points.bounding_box[i];
        }
        for (d, v) in sub
            .constant_directions()
            .iter()
            .zip(sub.constant_values())
        {
            let value = if *v == 0 { T::zero() } else { T::one() };
            coordinates[*d] = vec![value];
            weights_1d[*d] = vec![T::one()];
            bounding_box[*d] = [value, value];
        }
        let mut point_coords_id = rlst_dynamic_array!(usize, [dim, points.num_points()]);
        for p in 0..points.num_points() {
            for (i, d) in sub.active_directions().iter().enumerate() {
                point_coords_id[[*d, p]] = points.point_coords_id[[i, p]];
            }
        }
        Self {
            bounding_box,
            coordinates,
            weights_1d,
            point_coords_id,
            tensor_product: points.tensor_product,
        }
    }

    /// The points restricted to a sub-element, embedded back into the full cube
    pub fn on_sub_element(&self, k: usize, sub_id: usize) -> Self {
        if k == self.dim() {
            assert_eq!(sub_id, 0, "The element is the only full dimensional sub-element");
            return self.clone();
        }
        Self::extend_sub_elem_quad(&self.collapse_to_sub_element(k, sub_id), self.dim(), sub_id)
    }
}

fn check_directions<T: RealScalar>(
    coordinates: &[Vec<T>],
    weights_1d: &[Vec<T>],
    bounding_box: &[[T; 2]],
) -> Result<(), SplineError> {
    if coordinates.len() != bounding_box.len() {
        return Err(SplineError::DimensionMismatch {
            what: "directions of coordinates and bounding box",
            expected: bounding_box.len(),
            found: coordinates.len(),
        });
    }
    if weights_1d.len() != coordinates.len() {
        return Err(SplineError::DimensionMismatch {
            what: "directions of weights",
            expected: coordinates.len(),
            found: weights_1d.len(),
        });
    }
    for (direction, ((c, w), b)) in coordinates
        .iter()
        .zip(weights_1d)
        .zip(bounding_box)
        .enumerate()
    {
        if c.len() != w.len() {
            return Err(SplineError::DimensionMismatch {
                what: "number of weights",
                expected: c.len(),
                found: w.len(),
            });
        }
        if let Some(x) = c.iter().find(|x| !(**x >= b[0] && **x <= b[1])) {
            return Err(SplineError::PointOutsideBoundingBox {
                direction,
                coordinate: to_f64(*x),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    fn tensor_2d() -> EvaluationPoints<f64> {
        EvaluationPoints::new_tensor_product(
            vec![vec![0.25, 0.75], vec![0.1, 0.5, 0.9]],
            vec![vec![0.5, 0.5], vec![0.2, 0.6, 0.2]],
        )
        .unwrap()
    }

    #[test]
    fn test_tensor_product_points() {
        let pts = tensor_2d();
        assert_eq!(pts.num_points(), 6);
        assert!(pts.has_tensor_product_structure());
        assert_eq!(pts.point(1), vec![0.75, 0.1]);
        assert_eq!(pts.point(2), vec![0.25, 0.5]);
        assert_relative_eq!(pts.weight(2), 0.3);
        assert_relative_eq!(pts.weights().iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn test_from_points_dedup() {
        let points = vec![vec![0.5, 0.2], vec![0.1, 0.2], vec![0.5, 0.7], vec![0.1, 0.7]];
        let pts = EvaluationPoints::from_points(
            &points,
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            vec![[0.0, 1.0]; 2],
        )
        .unwrap();
        assert_eq!(pts.coords_direction(0), &[0.1, 0.5]);
        assert_eq!(pts.coords_id(0), &[1, 0]);
        assert!(pts.has_tensor_product_structure());
        assert_eq!(pts.point(2), vec![0.5, 0.7]);
        assert_relative_eq!(pts.weight(2), 8.0);
    }

    #[test]
    fn test_from_points_not_tensor() {
        let points = vec![vec![0.5, 0.2], vec![0.1, 0.2], vec![0.5, 0.7]];
        let pts = EvaluationPoints::from_points(
            &points,
            vec![vec![1.0, 1.0], vec![1.0, 1.0]],
            vec![[0.0, 1.0]; 2],
        )
        .unwrap();
        assert!(!pts.has_tensor_product_structure());
    }

    #[test]
    fn test_from_points_wrong_weights() {
        let points = vec![vec![0.5], vec![0.1]];
        assert!(matches!(
            EvaluationPoints::from_points(&points, vec![vec![1.0]], vec![[0.0, 1.0]]),
            Err(SplineError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_outside_box() {
        assert!(matches!(
            EvaluationPoints::new_tensor_product(vec![vec![1.5]], vec![vec![1.0]]),
            Err(SplineError::PointOutsideBoundingBox { direction: 0, .. })
        ));
    }

    #[test]
    fn test_dilate_translate() {
        let mut pts = tensor_2d();
        pts.dilate_translate(&[2.0, 1.0], &[1.0, -1.0]).unwrap();
        assert_relative_eq!(pts.point(3)[0], 2.5);
        assert_relative_eq!(pts.point(3)[1], -0.5);
        assert_relative_eq!(pts.bounding_box()[0][1], 3.0);
        assert_relative_eq!(pts.weights().iter().sum::<f64>(), 2.0);
    }

    #[test]
    fn test_dilate_rejects_zero() {
        let mut pts = tensor_2d();
        let before = pts.clone();
        assert!(matches!(
            pts.dilate(&[1.0, 0.0]),
            Err(SplineError::NonPositiveDilation { direction: 1, .. })
        ));
        assert_eq!(pts, before);
    }

    #[test]
    fn test_collapse_and_extend() {
        let pts = tensor_2d();
        // face 3: direction 1 fixed to 1
        let face = pts.collapse_to_sub_element(1, 3);
        assert_eq!(face.dim(), 1);
        assert_eq!(face.coords_direction(0), &[0.25, 0.75]);

        let embedded = EvaluationPoints::extend_sub_elem_quad(&face, 2, 3);
        assert_eq!(embedded.num_points(), 2);
        assert_eq!(embedded.point(1), vec![0.75, 1.0]);
        assert_relative_eq!(embedded.weight(1), 0.5);
        assert_eq!(embedded.collapse_to_sub_element(1, 3), face);

        // face 0: direction 0 fixed to 0
        let embedded = pts.on_sub_element(1, 0);
        assert_eq!(embedded.num_points(), 3);
        assert_eq!(embedded.point(2), vec![0.0, 0.9]);
    }

    #[test]
    fn test_collapse_and_extend_keep_bounding_box() {
        let pts = EvaluationPoints::new_tensor_product_in_box(
            vec![vec![0.5, 1.0], vec![2.0], vec![-1.0, 0.0, 1.0]],
            vec![vec![0.5, 0.5], vec![1.0], vec![0.25, 0.5, 0.25]],
            vec![[0.0, 2.0], [1.0, 3.0], [-1.0, 1.0]],
        )
        .unwrap();
        for face in 0..6 {
            let sub = pts.collapse_to_sub_element(2, face);
            let embedded = EvaluationPoints::extend_sub_elem_quad(&sub, 3, face);
            let constant = face / 2;
            for d in 0..3 {
                if d == constant {
                    let value = (face % 2) as f64;
                    assert_eq!(embedded.coords_direction(d), &[value]);
                    assert_eq!(embedded.weights_1d()[d], vec![1.0]);
                    assert_eq!(embedded.bounding_box()[d], [value, value]);
                } else {
                    assert_eq!(embedded.bounding_box()[d], pts.bounding_box()[d]);
                    assert_eq!(embedded.coords_direction(d), pts.coords_direction(d));
                }
            }
            assert_eq!(embedded.num_points(), pts.num_points() / pts.num_coords_direction()[constant]);
        }
    }

    #[test]
    fn test_extended_face_box_is_flat() {
        let q = crate::quadrature::gauss::<f64>(2, 2);
        let face = q.collapse_to_sub_element(1, 3);
        let embedded = EvaluationPoints::extend_sub_elem_quad(&face, 2, 3);
        assert_eq!(embedded.bounding_box()[0], [0.0, 1.0]);
        assert_eq!(embedded.bounding_box()[1], [1.0, 1.0]);
        let embedded = q.on_sub_element(1, 0);
        assert_eq!(embedded.bounding_box()[0], [0.0, 0.0]);
    }

    #[test]
    fn test_points_table() {
        let pts = tensor_2d();
        let table = pts.points_table();
        assert_eq!(table.shape(), [2, 6]);
        assert_eq!(pts.coords_ids().shape(), [2, 6]);
        for p in 0..6 {
            let point = pts.point(p);
            assert_eq!(table[[0, p]], point[0]);
            assert_eq!(table[[1, p]], point[1]);
        }
        assert_eq!(pts.coords_ids()[[1, 4]], 2);
    }

    #[test]
    fn test_from_coords_ids() {
        let pts = tensor_2d();
        let copy = pts.clone();
        let rebuilt = EvaluationPoints::from_coords_ids(
            copy.coordinates.clone(),
            copy.weights_1d.clone(),
            copy.bounding_box.clone(),
            copy.point_coords_id,
            true,
        )
        .unwrap();
        assert_eq!(rebuilt, pts);

        let mut ids = rlst_dynamic_array!(usize, [2, 1]);
        ids[[1, 0]] = 3;
        assert!(matches!(
            EvaluationPoints::from_coords_ids(
                pts.coordinates.clone(),
                pts.weights_1d.clone(),
                pts.bounding_box.clone(),
                ids,
                false
            ),
            Err(SplineError::DimensionMismatch { .. })
        ));
    }

    #[test]
    #[should_panic]
    fn test_collapse_requires_tensor_product() {
        let points = vec![vec![0.5, 0.2], vec![0.1, 0.2], vec![0.5, 0.7]];
        let pts = EvaluationPoints::from_points(
            &points,
            vec![vec![1.0, 1.0], vec![1.0, 1.0]],
            vec![[0.0, 1.0]; 2],
        )
        .unwrap();
        pts.collapse_to_sub_element(1, 0);
    }
}
