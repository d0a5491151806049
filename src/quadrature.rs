//! Quadrature rules on the unit cube
use crate::evaluation_points::EvaluationPoints;
use crate::types::{to_scalar, RealScalar};
use crate::SplineError;
use std::f64::consts::PI;

/// Gauss-Legendre points and weights on [0, 1]
pub fn gauss_legendre_1d(npts: usize) -> (Vec<f64>, Vec<f64>) {
    assert!(npts > 0, "A Gauss rule needs at least one point");
    let mut points = vec![0.0; npts];
    let mut weights = vec![0.0; npts];
    let n = npts as f64;
    for i in 0..npts.div_ceil(2) {
        let mut x = (PI * (i as f64 + 0.75) / (n + 0.5)).cos();
        let mut dp = 1.0;
        for _ in 0..100 {
            // Legendre recurrence for P_n(x) and P_{n-1}(x)
            let mut p0 = 1.0;
            let mut p1 = x;
            for j in 2..=npts {
                let j = j as f64;
                let p2 = ((2.0 * j - 1.0) * x * p1 - (j - 1.0) * p0) / j;
                p0 = p1;
                p1 = p2;
            }
            dp = n * (x * p1 - p0) / (x * x - 1.0);
            let dx = p1 / dp;
            x -= dx;
            if dx.abs() < 1e-15 {
                break;
            }
        }
        let w = 2.0 / ((1.0 - x * x) * dp * dp);
        points[i] = 0.5 * (1.0 - x);
        points[npts - 1 - i] = 0.5 * (1.0 + x);
        weights[i] = 0.5 * w;
        weights[npts - 1 - i] = 0.5 * w;
    }
    (points, weights)
}

fn convert<T: RealScalar>(values: &[f64]) -> Result<Vec<T>, SplineError> {
    values.iter().map(|v| to_scalar(*v)).collect()
}

fn tensor_rule<T: RealScalar>(
    rules: &[(Vec<f64>, Vec<f64>)],
) -> Result<EvaluationPoints<T>, SplineError> {
    let coordinates = rules
        .iter()
        .map(|(p, _)| convert(p))
        .collect::<Result<Vec<_>, _>>()?;
    let weights = rules
        .iter()
        .map(|(_, w)| convert(w))
        .collect::<Result<Vec<_>, _>>()?;
    EvaluationPoints::new_tensor_product(coordinates, weights)
}

/// Tensor product Gauss-Legendre rule with a number of points in each direction
pub fn gauss_anisotropic<T: RealScalar>(npts: &[usize]) -> EvaluationPoints<T> {
    let rules = npts.iter().map(|n| gauss_legendre_1d(*n)).collect::<Vec<_>>();
    tensor_rule(&rules).unwrap_or_else(|e| panic!("Invalid Gauss rule: {e}"))
}

/// Tensor product Gauss-Legendre rule with `npts` points in each of `dim` directions
pub fn gauss<T: RealScalar>(dim: usize, npts: usize) -> EvaluationPoints<T> {
    gauss_anisotropic(&vec![npts; dim])
}

/// Tensor product of `npts` equally spaced points, including both ends, in each direction
///
/// Every point gets the same weight, scaled so that the weights sum to 1.
pub fn uniform<T: RealScalar>(dim: usize, npts: usize) -> EvaluationPoints<T> {
    assert!(npts > 0, "A uniform rule needs at least one point");
    let rule = if npts == 1 {
        (vec![0.5], vec![1.0])
    } else {
        (
            (0..npts).map(|i| i as f64 / (npts - 1) as f64).collect(),
            vec![1.0 / npts as f64; npts],
        )
    };
    tensor_rule(&vec![rule; dim]).unwrap_or_else(|e| panic!("Invalid uniform rule: {e}"))
}
