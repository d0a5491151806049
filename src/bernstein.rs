//! Bernstein polynomials and Bezier extraction
use crate::space::SplineSpace;
use crate::types::{from_count, RealScalar};
use log::debug;
use rlst::{DynArray, rlst_dynamic_array};

/// Values of the Bernstein polynomials of degree `degree` on [0, 1] at `x`
pub fn bernstein_values<T: RealScalar>(degree: usize, x: T) -> Vec<T> {
    let mut b = vec![T::zero(); degree + 1];
    b[0] = T::one();
    let one_minus_x = T::one() - x;
    for r in 1..=degree {
        let mut saved = T::zero();
        for j in 0..r {
            let tmp = b[j];
            b[j] = saved + one_minus_x * tmp;
            saved = x * tmp;
        }
        b[r] = saved;
    }
    b
}

/// Derivatives of the Bernstein polynomials of degree `degree` on [0, 1] at `x`
///
/// Entry `[k][j]` of the result is the `k`th derivative of the `j`th polynomial, for
/// `k = 0..=max_order`.
pub fn bernstein_derivatives<T: RealScalar>(degree: usize, x: T, max_order: usize) -> Vec<Vec<T>> {
    let mut result = vec![bernstein_values(degree, x)];
    for k in 1..=max_order {
        if k > degree {
            result.push(vec![T::zero(); degree + 1]);
            continue;
        }
        let lower = bernstein_values(degree - k, x);
        let scale = ((degree - k + 1)..=degree).fold(T::one(), |s, i| s * from_count::<T>(i));
        let mut binom = T::one();
        let mut coeffs = vec![];
        for i in 0..=k {
            let sign = if (i + k) % 2 == 0 { T::one() } else { -T::one() };
            coeffs.push(sign * binom);
            binom = binom * from_count::<T>(k - i) / from_count::<T>(i + 1);
        }
        let values = (0..=degree)
            .map(|j| {
                scale
                    * coeffs
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i <= j && j - i <= degree - k)
                        .fold(T::zero(), |s, (i, c)| s + *c * lower[j - i])
            })
            .collect();
        result.push(values);
    }
    result
}

/// Evaluate the blossom of a single B-spline on one knot span
///
/// `local_knots` holds the `2p` knots `u_{s-p+1}, ..., u_{s+p}` around the span `[u_s, u_{s+1})`
/// and the B-spline is the `function`th of the `p + 1` B-splines that are nonzero on it.
fn blossom<T: RealScalar>(degree: usize, local_knots: &[T], function: usize, args: &[T]) -> T {
    let p = degree;
    let mut d = (0..=p)
        .map(|i| if i == function { T::one() } else { T::zero() })
        .collect::<Vec<_>>();
    for (r, t) in args.iter().enumerate() {
        let r = r + 1;
        for l in (r..=p).rev() {
            // knots u_{s-p+l} and u_{s+l+1-r}, shifted so that u_{s-p+1} is at index 0
            let lo = local_knots[l - 1];
            let hi = local_knots[p + l - r];
            let alpha = (*t - lo) / (hi - lo);
            d[l] = (T::one() - alpha) * d[l - 1] + alpha * d[l];
        }
    }
    d[p]
}

/// The Bezier extraction operator of one knot span
///
/// `knots` is a full knot vector with repetitions and `span` the index of the last knot at the
/// start of the interval. Row `a` of the returned `(p + 1) x (p + 1)` matrix holds the
/// coefficients of the `a`th B-spline nonzero on the interval in the Bernstein basis of that
/// interval.
pub fn extraction_operator<T: RealScalar>(degree: usize, knots: &[T], span: usize) -> DynArray<T, 2> {
    let p = degree;
    let n = p + 1;
    let mut op = rlst_dynamic_array!(T, [n, n]);
    if p == 0 {
        op[[0, 0]] = T::one();
        return op;
    }
    let local_knots = &knots[span + 1 - p..=span + p];
    let a = knots[span];
    let b = knots[span + 1];
    for f in 0..n {
        for j in 0..n {
            let args = (0..p)
                .map(|i| if i < p - j { a } else { b })
                .collect::<Vec<_>>();
            op[[f, j]] = blossom(p, local_knots, f, &args);
        }
    }
    op
}

/// Apply an extraction operator to a table of Bernstein values
///
/// `bernstein` has shape `[p + 1, npts]`, and entry `[a, i]` of the result is the value of the
/// `a`th B-spline at point `i`.
pub fn apply_extraction<T: RealScalar>(
    operator: &DynArray<T, 2>,
    bernstein: &DynArray<T, 2>,
) -> DynArray<T, 2> {
    let [n, m] = operator.shape();
    let [rows, npts] = bernstein.shape();
    assert_eq!(m, rows, "Operator and Bernstein table do not match");
    let mut result = rlst_dynamic_array!(T, [n, npts]);
    for i in 0..npts {
        for a in 0..n {
            result[[a, i]] = (0..m).fold(T::zero(), |s, j| s + operator[[a, j]] * bernstein[[j, i]]);
        }
    }
    result
}

/// Bezier extraction operators of every component, direction and interval of a space
#[derive(Debug)]
pub struct BernsteinExtraction<T: RealScalar> {
    degree: Vec<Vec<usize>>,
    operators: Vec<Vec<Vec<DynArray<T, 2>>>>,
}

impl<T: RealScalar> BernsteinExtraction<T> {
    /// Create new
    pub fn new(space: &SplineSpace<T>) -> Self {
        let grid = space.grid();
        let mut degree: Vec<Vec<usize>> = vec![];
        let mut operators: Vec<Vec<Vec<DynArray<T, 2>>>> = vec![];
        for c in 0..space.range() {
            let source = if space.is_homogeneous() { 0 } else { c };
            let mut comp_ops = vec![];
            for (d, p) in space.degree(source).iter().enumerate() {
                let knots = space.knots_with_repetition(source, d);
                comp_ops.push(
                    (0..grid.num_intervals()[d])
                        .map(|e| extraction_operator(*p, &knots, space.knot_span(source, d, e)))
                        .collect::<Vec<_>>(),
                );
            }
            degree.push(space.degree(source).to_vec());
            operators.push(comp_ops);
        }
        debug!("Computed Bezier extraction for {} components", space.range());
        Self { degree, operators }
    }

    /// The degree of a component in a direction
    pub fn degree(&self, component: usize, direction: usize) -> usize {
        self.degree[component][direction]
    }

    /// The extraction operator of an interval
    pub fn operator(&self, component: usize, direction: usize, interval: usize) -> &DynArray<T, 2> {
        &self.operators[component][direction][interval]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::grid::CartesianGrid;
    use crate::space::SplineSpaceBuilder;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    #[test]
    fn test_bernstein_partition_of_unity() {
        for p in 0..5 {
            for x in [0.0, 0.3, 0.5, 1.0] {
                let d = bernstein_derivatives(p, x, 2);
                assert_relative_eq!(d[0].iter().sum::<f64>(), 1.0, epsilon = 1e-14);
                assert_relative_eq!(d[1].iter().sum::<f64>(), 0.0, epsilon = 1e-12);
                assert_relative_eq!(d[2].iter().sum::<f64>(), 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_bernstein_quadratic() {
        let d = bernstein_derivatives(2, 0.25, 2);
        assert_relative_eq!(d[0][0], 0.5625);
        assert_relative_eq!(d[0][1], 0.375);
        assert_relative_eq!(d[0][2], 0.0625);
        // (1-x)^2, 2x(1-x), x^2
        assert_relative_eq!(d[1][0], -1.5);
        assert_relative_eq!(d[1][1], 1.0);
        assert_relative_eq!(d[1][2], 0.5);
        assert_relative_eq!(d[2][0], 2.0);
        assert_relative_eq!(d[2][1], -4.0);
        assert_relative_eq!(d[2][2], 2.0);
    }

    #[test]
    fn test_bernstein_cubic_second_derivative() {
        // B_1 = 3x(1-x)^2, B_1'' = 18x - 12
        let d = bernstein_derivatives(3, 0.5, 2);
        assert_relative_eq!(d[2][1], -3.0, epsilon = 1e-14);
        assert_relative_eq!(d[2][0], 3.0, epsilon = 1e-14);
    }

    #[test]
    fn test_single_element_is_identity() {
        let knots = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let op = extraction_operator(2, &knots, 2);
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(op[[i, j]], if i == j { 1.0 } else { 0.0 }, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_two_element_quadratic() {
        let knots = [0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0];
        let op = extraction_operator(2, &knots, 2);
        let expected = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.5], [0.0, 0.0, 0.5]];
        for (i, row) in expected.iter().enumerate() {
            for (j, e) in row.iter().enumerate() {
                assert_relative_eq!(op[[i, j]], e, epsilon = 1e-14);
            }
        }
        let op = extraction_operator(2, &knots, 3);
        let expected = [[0.5, 0.0, 0.0], [0.5, 1.0, 0.0], [0.0, 0.0, 1.0]];
        for (i, row) in expected.iter().enumerate() {
            for (j, e) in row.iter().enumerate() {
                assert_relative_eq!(op[[i, j]], e, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_columns_sum_to_one() {
        let grid = Arc::new(CartesianGrid::<f64>::new(vec![vec![0.0, 0.2, 0.5, 0.6, 1.0]]).unwrap());
        let mut b = SplineSpaceBuilder::new(grid, 3);
        b.interior_multiplicities(0, 0, vec![1, 2, 3]);
        let space = b.create_space().unwrap();
        let ext = BernsteinExtraction::new(&space);
        for e in 0..4 {
            let op = ext.operator(0, 0, e);
            assert_eq!(op.shape(), [4, 4]);
            for j in 0..4 {
                let s = (0..4).map(|a| op[[a, j]]).sum::<f64>();
                assert_relative_eq!(s, 1.0, epsilon = 1e-13);
            }
        }
    }

    #[test]
    fn test_apply_extraction_gives_bsplines() {
        // two quadratic intervals on [0, 0.5, 1]; at x = 0.5 in the first interval
        let knots = [0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0];
        let op = extraction_operator(2, &knots, 2);
        let mut bernstein = rlst_dynamic_array!(f64, [3, 2]);
        for (i, x) in [0.0, 0.5].iter().enumerate() {
            for (j, b) in bernstein_values(2, *x).iter().enumerate() {
                bernstein[[j, i]] = *b;
            }
        }
        let values = apply_extraction(&op, &bernstein);
        assert_eq!(values.shape(), [3, 2]);
        assert_relative_eq!(values[[0, 0]], 1.0, epsilon = 1e-14);
        assert_relative_eq!(values[[0, 1]], 0.25, epsilon = 1e-14);
        assert_relative_eq!(values[[1, 1]], 0.625, epsilon = 1e-14);
        assert_relative_eq!(values[[2, 1]], 0.125, epsilon = 1e-14);
    }
}
