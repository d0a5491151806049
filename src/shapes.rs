//! Geometries described by NURBS
use crate::basis::{BSplineBasis, NurbsBasis};
use crate::grid::CartesianGrid;
use crate::space::SplineSpaceBuilder;
use crate::types::RealScalar;
use crate::SplineError;
use std::sync::Arc;

/// A quarter of the annulus between circles of radius `inner` and `outer`
///
/// Returns a basis that is linear in the radial direction (direction 0) and quadratic in the
/// angular direction (direction 1), and the control points of the map from the unit square
/// onto the annulus, one per basis function.
pub fn quarter_annulus<T: RealScalar>(
    inner: T,
    outer: T,
) -> Result<(NurbsBasis<T>, Vec<[T; 2]>), SplineError> {
    let grid = Arc::new(CartesianGrid::uniform(&[2, 2])?);
    let mut b = SplineSpaceBuilder::new(grid, 1);
    b.degree(&[1, 2]);
    let space = Arc::new(b.create_space()?);

    let zero = T::zero();
    let one = T::one();
    let corners = [[one, zero], [one, one], [zero, one]];
    let radii = [inner, outer];
    let diagonal = one / (one + one).sqrt();

    let mut control_points = vec![];
    let mut weights = vec![];
    for (j, c) in corners.iter().enumerate() {
        for r in radii {
            control_points.push([r * c[0], r * c[1]]);
            weights.push(if j == 1 { diagonal } else { one });
        }
    }
    let basis = NurbsBasis::new(BSplineBasis::new(space), vec![weights])?;
    Ok((basis, control_points))
}
