//! NURBS basis
use super::BSplineBasis;
use crate::evaluation_points::EvaluationPoints;
use crate::types::{RealScalar, ValueKind};
use crate::value_table::ValueTable;
use crate::SplineError;
use log::trace;

/// Rational basis built from a B-spline basis and one positive weight per basis function
#[derive(Debug, Clone)]
pub struct NurbsBasis<T: RealScalar> {
    bspline: BSplineBasis<T>,
    weights: Vec<Vec<T>>,
    shared_weights: bool,
}

impl<T: RealScalar> NurbsBasis<T> {
    /// Create new
    ///
    /// `weights[c]` holds the weights of the basis functions of component `c`, in the
    /// component's own numbering.
    pub fn new(bspline: BSplineBasis<T>, weights: Vec<Vec<T>>) -> Result<Self, SplineError> {
        let space = bspline.space();
        if weights.len() != space.range() {
            return Err(SplineError::DimensionMismatch {
                what: "number of weight components",
                expected: space.range(),
                found: weights.len(),
            });
        }
        for (c, w) in weights.iter().enumerate() {
            if w.len() != space.component_num_basis(c) {
                return Err(SplineError::DimensionMismatch {
                    what: "number of weights",
                    expected: space.component_num_basis(c),
                    found: w.len(),
                });
            }
            if let Some((function, weight)) =
                w.iter().enumerate().find(|(_, x)| !(**x > T::zero() && x.is_finite()))
            {
                return Err(SplineError::NonPositiveWeight {
                    function,
                    weight: weight.to_f64().unwrap_or(f64::NAN),
                });
            }
        }
        let shared_weights = space.is_homogeneous() && weights.windows(2).all(|w| w[0] == w[1]);
        Ok(Self {
            bspline,
            weights,
            shared_weights,
        })
    }

    /// Create a basis whose components all use the same weights
    pub fn with_shared_weights(bspline: BSplineBasis<T>, weights: Vec<T>) -> Result<Self, SplineError> {
        if !bspline.space().is_homogeneous() {
            return Err(SplineError::NotHomogeneous);
        }
        let range = bspline.space().range();
        Self::new(bspline, vec![weights; range])
    }

    /// The underlying B-spline basis
    pub fn bspline(&self) -> &BSplineBasis<T> {
        &self.bspline
    }

    /// The weights of a component
    pub fn weights(&self, component: usize) -> &[T] {
        &self.weights[component]
    }

    /// Check if every component uses the same basis and weights
    pub fn has_shared_weights(&self) -> bool {
        self.shared_weights
    }

    /// The weights of the basis functions touching an element, in element-local order
    pub fn element_weights(&self, element: &[usize]) -> Vec<T> {
        let space = self.bspline.space();
        (0..space.range())
            .flat_map(|c| {
                space
                    .component(c)
                    .element_dofs(element)
                    .into_iter()
                    .map(move |d| self.weights[c][d])
            })
            .collect()
    }

    /// Evaluate the basis functions touching an element and their derivatives up to
    /// `max_order` at reference points of the element
    ///
    /// `tables[k]` must already have the shape of the `k`th derivative table; it is overwritten.
    pub fn evaluate(
        &self,
        element: &[usize],
        points: &EvaluationPoints<T>,
        max_order: usize,
        tables: &mut [ValueTable<T>],
    ) -> Result<(), SplineError> {
        let space = self.bspline.space();
        let dim = space.dim();
        let range = space.range();
        let mut polynomial = (0..=max_order)
            .map(|o| {
                ValueTable::new(
                    space.element_num_basis(),
                    points.num_points(),
                    ValueKind::from_order(o).entry_size(dim, range),
                )
            })
            .collect::<Vec<_>>();
        self.bspline
            .evaluate(element, points, max_order, &mut polynomial);

        let weights = self.element_weights(element);
        let sizes = (0..range)
            .map(|c| space.component(c).element_num_basis())
            .collect::<Vec<_>>();
        trace!(
            "Rational correction on element {element:?} (shared weights: {})",
            self.shared_weights
        );
        if self.shared_weights {
            rational_correction_homogeneous(&polynomial, &weights, &sizes, dim, max_order, tables)
        } else {
            rational_correction_heterogeneous(&polynomial, &weights, &sizes, dim, max_order, tables)
        }
    }
}

/// Rational functions, gradients and hessians of one component, indexed by
/// `function * num_points + point`
struct RationalValues<T> {
    values: Vec<T>,
    gradients: Vec<T>,
    hessians: Vec<T>,
}

/// Apply the quotient rule to the B-splines in rows `first..first + weights.len()` of the
/// polynomial tables, reading entry `component` of each value
fn rational_component<T: RealScalar>(
    polynomial: &[ValueTable<T>],
    first: usize,
    component: usize,
    weights: &[T],
    dim: usize,
    range: usize,
    max_order: usize,
) -> Result<RationalValues<T>, SplineError> {
    let n = weights.len();
    let n_points = polynomial[0].num_points();
    let mut out = RationalValues {
        values: vec![T::zero(); n * n_points],
        gradients: vec![T::zero(); n * n_points * dim],
        hessians: vec![T::zero(); n * n_points * dim * dim],
    };
    let value = |order: usize, f: usize, p: usize, e: usize| polynomial[order].get(first + f, p)[e];
    let grad_entry = |d: usize| d * range + component;
    let hess_entry = |j: usize, k: usize| (j * dim + k) * range + component;

    let two = T::one() + T::one();
    let mut dq = vec![T::zero(); dim];
    let mut d2q = vec![T::zero(); dim * dim];
    let mut dinv = vec![T::zero(); dim];
    let mut d2inv = vec![T::zero(); dim * dim];
    for p in 0..n_points {
        let q = (0..n).fold(T::zero(), |s, f| s + weights[f] * value(0, f, p, component));
        if q == T::zero() || !q.is_finite() {
            return Err(SplineError::DegenerateWeights {
                component,
                point: p,
            });
        }
        let inv = T::one() / q;
        if max_order >= 1 {
            for (d, x) in dq.iter_mut().enumerate() {
                *x = (0..n).fold(T::zero(), |s, f| s + weights[f] * value(1, f, p, grad_entry(d)));
            }
            for (d, x) in dinv.iter_mut().enumerate() {
                *x = -dq[d] * inv * inv;
            }
        }
        if max_order >= 2 {
            for j in 0..dim {
                for k in 0..dim {
                    d2q[j * dim + k] = (0..n).fold(T::zero(), |s, f| {
                        s + weights[f] * value(2, f, p, hess_entry(j, k))
                    });
                    d2inv[j * dim + k] =
                        -d2q[j * dim + k] * inv * inv + two * dq[j] * dq[k] * inv * inv * inv;
                }
            }
        }
        for f in 0..n {
            let w = weights[f];
            let pv = w * value(0, f, p, component);
            let row = f * n_points + p;
            out.values[row] = pv * inv;
            if max_order >= 1 {
                for d in 0..dim {
                    let dp = w * value(1, f, p, grad_entry(d));
                    out.gradients[row * dim + d] = dinv[d] * pv + inv * dp;
                }
            }
            if max_order >= 2 {
                for j in 0..dim {
                    let dpj = w * value(1, f, p, grad_entry(j));
                    for k in 0..dim {
                        let dpk = w * value(1, f, p, grad_entry(k));
                        let d2p = w * value(2, f, p, hess_entry(j, k));
                        out.hessians[(row * dim + j) * dim + k] = d2inv[j * dim + k] * pv
                            + dinv[j] * dpk
                            + dinv[k] * dpj
                            + inv * d2p;
                    }
                }
            }
        }
    }
    Ok(out)
}

/// Write the rational values of one component into rows `first..` of the output tables,
/// as entry `component`
fn write_component<T: RealScalar>(
    values: &RationalValues<T>,
    first: usize,
    component: usize,
    dim: usize,
    range: usize,
    max_order: usize,
    tables: &mut [ValueTable<T>],
) {
    let n_points = tables[0].num_points();
    let n = values.values.len() / n_points.max(1);
    for f in 0..n {
        for p in 0..n_points {
            let row = f * n_points + p;
            tables[0].get_mut(first + f, p)[component] = values.values[row];
            if max_order >= 1 {
                let grad = tables[1].get_mut(first + f, p);
                for d in 0..dim {
                    grad[d * range + component] = values.gradients[row * dim + d];
                }
            }
            if max_order >= 2 {
                let hess = tables[2].get_mut(first + f, p);
                for j in 0..dim {
                    for k in 0..dim {
                        hess[(j * dim + k) * range + component] =
                            values.hessians[(row * dim + j) * dim + k];
                    }
                }
            }
        }
    }
}

fn prepare_tables<T: RealScalar>(
    polynomial: &[ValueTable<T>],
    max_order: usize,
    tables: &mut [ValueTable<T>],
) {
    assert!(tables.len() > max_order, "Missing output tables");
    for (t, p) in tables.iter_mut().zip(polynomial).take(max_order + 1) {
        assert!(
            t.has_shape(p.num_functions(), p.num_points(), p.entry_size()),
            "Output table has the wrong shape"
        );
        t.zero();
    }
}

/// Rational correction where each component has its own B-splines and weights
pub(crate) fn rational_correction_heterogeneous<T: RealScalar>(
    polynomial: &[ValueTable<T>],
    weights: &[T],
    component_sizes: &[usize],
    dim: usize,
    max_order: usize,
    tables: &mut [ValueTable<T>],
) -> Result<(), SplineError> {
    prepare_tables(polynomial, max_order, tables);
    let range = component_sizes.len();
    let mut first = 0;
    for (c, n) in component_sizes.iter().enumerate() {
        let values = rational_component(
            polynomial,
            first,
            c,
            &weights[first..first + n],
            dim,
            range,
            max_order,
        )?;
        write_component(&values, first, c, dim, range, max_order, tables);
        first += n;
    }
    Ok(())
}

/// Rational correction where every component shares the B-splines and weights of the first
///
/// The first component is corrected once and copied to the others.
pub(crate) fn rational_correction_homogeneous<T: RealScalar>(
    polynomial: &[ValueTable<T>],
    weights: &[T],
    component_sizes: &[usize],
    dim: usize,
    max_order: usize,
    tables: &mut [ValueTable<T>],
) -> Result<(), SplineError> {
    prepare_tables(polynomial, max_order, tables);
    let range = component_sizes.len();
    let n = component_sizes[0];
    let values = rational_component(polynomial, 0, 0, &weights[..n], dim, range, max_order)?;
    for c in 0..range {
        write_component(&values, c * n, c, dim, range, max_order, tables);
    }
    Ok(())
}
