//! B-spline basis
use super::factor_order;
use crate::bernstein::{apply_extraction, bernstein_derivatives, BernsteinExtraction};
use crate::evaluation_points::EvaluationPoints;
use crate::space::SplineSpace;
use crate::types::{RealScalar, ValueKind};
use crate::value_table::ValueTable;
use rlst::{DynArray, rlst_dynamic_array};
use std::sync::Arc;

/// Tensor product B-spline basis of a spline space
#[derive(Debug, Clone)]
pub struct BSplineBasis<T: RealScalar> {
    space: Arc<SplineSpace<T>>,
    extraction: Arc<BernsteinExtraction<T>>,
}

impl<T: RealScalar> BSplineBasis<T> {
    /// Create new
    pub fn new(space: Arc<SplineSpace<T>>) -> Self {
        let extraction = Arc::new(BernsteinExtraction::new(&space));
        Self { space, extraction }
    }

    /// The space
    pub fn space(&self) -> &Arc<SplineSpace<T>> {
        &self.space
    }

    /// The Bezier extraction operators
    pub fn extraction(&self) -> &BernsteinExtraction<T> {
        &self.extraction
    }

    /// 1-D values of one component in one direction
    ///
    /// Entry `[a, i]` of the `k`th array is the `k`th derivative of the `a`th function at
    /// coordinate `i`.
    fn values_1d(
        &self,
        component: usize,
        direction: usize,
        interval: usize,
        length: T,
        coordinates: &[T],
        max_order: usize,
    ) -> Vec<DynArray<T, 2>> {
        let p = self.extraction.degree(component, direction);
        let n = p + 1;
        let mut bernstein = (0..=max_order)
            .map(|_| rlst_dynamic_array!(T, [n, coordinates.len()]))
            .collect::<Vec<_>>();
        for (i, x) in coordinates.iter().enumerate() {
            let mut scale = T::one();
            for (table, b) in bernstein
                .iter_mut()
                .zip(bernstein_derivatives(p, *x, max_order))
            {
                for (j, v) in b.iter().enumerate() {
                    table[[j, i]] = scale * *v;
                }
                scale = scale / length;
            }
        }
        let op = self.extraction.operator(component, direction, interval);
        bernstein
            .iter()
            .map(|b| apply_extraction(op, b))
            .collect()
    }

    /// Evaluate the basis functions touching an element and their derivatives up to
    /// `max_order` at reference points of the element
    ///
    /// Derivatives are taken with respect to the parametric coordinates of the grid.
    /// `tables[k]` must already have the shape of the `k`th derivative table; it is overwritten.
    pub fn evaluate(
        &self,
        element: &[usize],
        points: &EvaluationPoints<T>,
        max_order: usize,
        tables: &mut [ValueTable<T>],
    ) {
        let dim = self.space.dim();
        let range = self.space.range();
        let n_basis = self.space.element_num_basis();
        let n_points = points.num_points();
        assert!(max_order <= 2, "Derivatives above order 2 are not supported");
        assert!(tables.len() > max_order, "Missing output tables");
        assert_eq!(points.dim(), dim, "Points have the wrong dimension");
        for (order, table) in tables.iter_mut().take(max_order + 1).enumerate() {
            assert!(
                table.has_shape(
                    n_basis,
                    n_points,
                    ValueKind::from_order(order).entry_size(dim, range)
                ),
                "Output table for derivative order {order} has the wrong shape"
            );
            table.zero();
        }

        let lengths = self.space.grid().element_lengths(element);
        let mut first = 0;
        let mut factors = vec![[T::zero(); 3]; dim];
        for component in 0..range {
            let one_d = (0..dim)
                .map(|d| {
                    self.values_1d(
                        component,
                        d,
                        element[d],
                        lengths[d],
                        points.coords_direction(d),
                        max_order,
                    )
                })
                .collect::<Vec<_>>();
            let local = self.space.component(component).local_dofs();
            for l in 0..local.len() {
                let offsets = local.tensor_index(l);
                for point in 0..n_points {
                    let ids = points.coords_id(point);
                    for (d, f) in factors.iter_mut().enumerate() {
                        for (order, v) in f.iter_mut().enumerate().take(max_order + 1) {
                            *v = one_d[d][order][[offsets[d], ids[d]]];
                        }
                    }
                    let product = |directions: &[usize]| {
                        factors
                            .iter()
                            .enumerate()
                            .fold(T::one(), |s, (e, f)| s * f[factor_order(e, directions)])
                    };
                    let function = first + l;
                    tables[0].get_mut(function, point)[component] = product(&[]);
                    if max_order >= 1 {
                        let grad = tables[1].get_mut(function, point);
                        for d in 0..dim {
                            grad[d * range + component] = product(&[d]);
                        }
                    }
                    if max_order >= 2 {
                        let hess = tables[2].get_mut(function, point);
                        for j in 0..dim {
                            for k in 0..dim {
                                hess[(j * dim + k) * range + component] = product(&[j, k]);
                            }
                        }
                    }
                }
            }
            first += local.len();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::grid::CartesianGrid;
    use crate::quadrature::gauss;
    use crate::space::SplineSpaceBuilder;
    use approx::assert_relative_eq;

    fn tables(basis: &BSplineBasis<f64>, n_points: usize) -> Vec<ValueTable<f64>> {
        let dim = basis.space().dim();
        let range = basis.space().range();
        let n = basis.space().element_num_basis();
        (0..3)
            .map(|o| ValueTable::new(n, n_points, ValueKind::from_order(o).entry_size(dim, range)))
            .collect()
    }

    #[test]
    fn test_quadratic_single_element() {
        let grid = Arc::new(CartesianGrid::<f64>::uniform(&[2]).unwrap());
        let basis = BSplineBasis::new(Arc::new(SplineSpace::scalar(grid, 2).unwrap()));
        let points = EvaluationPoints::new_tensor_product(vec![vec![0.5]], vec![vec![1.0]]).unwrap();
        let mut t = tables(&basis, 1);
        basis.evaluate(&[0], &points, 2, &mut t);
        for (f, v) in [0.25, 0.5, 0.25].iter().enumerate() {
            assert_relative_eq!(t[0].get(f, 0)[0], v);
        }
        for (f, v) in [-1.0, 0.0, 1.0].iter().enumerate() {
            assert_relative_eq!(t[1].get(f, 0)[0], v);
        }
        for (f, v) in [2.0, -4.0, 2.0].iter().enumerate() {
            assert_relative_eq!(t[2].get(f, 0)[0], v);
        }
    }

    #[test]
    fn test_derivatives_scale_with_element_length() {
        let grid = Arc::new(CartesianGrid::new(vec![vec![0.0, 0.5, 2.0]]).unwrap());
        let basis = BSplineBasis::new(Arc::new(SplineSpace::scalar(grid, 1).unwrap()));
        let points = EvaluationPoints::new_tensor_product(vec![vec![0.3]], vec![vec![1.0]]).unwrap();
        let mut t = tables(&basis, 1);
        basis.evaluate(&[1], &points, 1, &mut t);
        assert_relative_eq!(t[0].get(0, 0)[0], 0.7);
        assert_relative_eq!(t[1].get(0, 0)[0], -1.0 / 1.5);
        assert_relative_eq!(t[1].get(1, 0)[0], 1.0 / 1.5);
    }

    #[test]
    fn test_partition_of_unity_2d() {
        let grid = Arc::new(CartesianGrid::<f64>::uniform(&[4, 3]).unwrap());
        let mut b = SplineSpaceBuilder::new(grid, 2);
        b.degree(&[2, 3]);
        let basis = BSplineBasis::new(Arc::new(b.create_space().unwrap()));
        let points = gauss::<f64>(2, 3);
        let mut t = tables(&basis, points.num_points());
        for e in 0..6 {
            let element = basis.space().grid().element_tensor_index(e);
            basis.evaluate(&element, &points, 2, &mut t);
            for p in 0..points.num_points() {
                let sum = t[0].point_view(p).map(|v| v[0]).sum::<f64>();
                assert_relative_eq!(sum, 1.0, epsilon = 1e-13);
                for entry in 0..2 {
                    let sum = t[1].point_view(p).map(|v| v[entry]).sum::<f64>();
                    assert_relative_eq!(sum, 0.0, epsilon = 1e-11);
                }
                for entry in 0..4 {
                    let sum = t[2].point_view(p).map(|v| v[entry]).sum::<f64>();
                    assert_relative_eq!(sum, 0.0, epsilon = 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_vector_components_are_separate() {
        let grid = Arc::new(CartesianGrid::<f64>::uniform(&[2, 2]).unwrap());
        let mut b = SplineSpaceBuilder::new(grid, 1);
        b.range(2);
        let basis = BSplineBasis::new(Arc::new(b.create_space().unwrap()));
        let points = gauss::<f64>(2, 2);
        let mut t = tables(&basis, points.num_points());
        basis.evaluate(&[0, 0], &points, 1, &mut t);
        for f in 0..4 {
            for p in 0..points.num_points() {
                assert_eq!(t[0].get(f, p)[1], 0.0);
                assert_eq!(t[0].get(f + 4, p)[0], 0.0);
                assert_relative_eq!(t[0].get(f, p)[0], t[0].get(f + 4, p)[1]);
                assert_relative_eq!(t[1].get(f, p)[2], t[1].get(f + 4, p)[3]);
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_wrong_table_shape() {
        let grid = Arc::new(CartesianGrid::<f64>::uniform(&[2]).unwrap());
        let basis = BSplineBasis::new(Arc::new(SplineSpace::scalar(grid, 2).unwrap()));
        let points = gauss::<f64>(1, 2);
        let mut t = vec![ValueTable::new(3, 1, 1)];
        basis.evaluate(&[0], &points, 0, &mut t);
    }
}
