use approx::assert_relative_eq;
use ndspline::quadrature::gauss;
use ndspline::shapes::quarter_annulus;
use ndspline::types::{DofProperties, ValueFlags};
use ndspline::{
    BSplineBasis, Basis, BasisElement, CartesianGrid, ElementHandler, NurbsBasis, SplineError,
    SplineSpaceBuilder,
};
use std::sync::Arc;

const ACTIVE: &str = DofProperties::ACTIVE;

#[test]
fn test_quarter_annulus_points_lie_on_circles() {
    let (nurbs, control_points) = quarter_annulus(1.0, 2.0).unwrap();
    let basis = Arc::new(Basis::from(nurbs));
    let quad = gauss(2, 4);

    let mut handler = ElementHandler::new(Arc::clone(&basis));
    handler.set_element_flags(ValueFlags::VALUE | ValueFlags::POINT);
    let mut element = BasisElement::begin(&basis);
    handler.init_element_cache(&mut element, &quad);
    handler.fill_element_cache(&element).unwrap();

    let values = element.get_element_values(ACTIVE);
    let dofs = element.get_local_to_global(ACTIVE);
    let points = element.get_points(2, 0);
    for (p, xi) in points.iter().enumerate() {
        let mut x = [0.0f64, 0.0];
        for (f, dof) in dofs.iter().enumerate() {
            for d in 0..2 {
                x[d] += values.get(f, p)[0] * control_points[*dof][d];
            }
        }
        let radius = (x[0] * x[0] + x[1] * x[1]).sqrt();
        assert_relative_eq!(radius, 1.0 + xi[0], epsilon = 1e-13);
        assert!(x[0] > 0.0 && x[1] > 0.0);
    }
}

#[test]
fn test_unit_weights_match_bsplines_through_cache() {
    let grid = Arc::new(CartesianGrid::uniform(&[3, 4]).unwrap());
    let mut b = SplineSpaceBuilder::new(grid, 2);
    b.range(2);
    let space = Arc::new(b.create_space().unwrap());
    let bspline = BSplineBasis::new(Arc::clone(&space));
    let n = space.component_num_basis(0);
    let nurbs = Arc::new(Basis::from(
        NurbsBasis::with_shared_weights(bspline.clone(), vec![1.0; n]).unwrap(),
    ));
    let bspline = Arc::new(Basis::from(bspline));
    let quad = gauss(2, 3);

    let flags = ValueFlags::HESSIAN;
    let mut h1 = ElementHandler::new(Arc::clone(&bspline));
    let mut h2 = ElementHandler::new(Arc::clone(&nurbs));
    h1.set_element_flags(flags);
    h2.set_element_flags(flags);
    let mut e1 = BasisElement::begin(&bspline);
    let mut e2 = BasisElement::begin(&nurbs);
    h1.init_element_cache(&mut e1, &quad);
    h2.init_element_cache(&mut e2, &quad);
    loop {
        h1.fill_element_cache(&e1).unwrap();
        h2.fill_element_cache(&e2).unwrap();
        for (a, b) in [
            (e1.get_element_values(ACTIVE), e2.get_element_values(ACTIVE)),
            (e1.get_element_gradients(ACTIVE), e2.get_element_gradients(ACTIVE)),
            (e1.get_element_hessians(ACTIVE), e2.get_element_hessians(ACTIVE)),
        ] {
            for (x, y) in a.data().iter().zip(b.data()) {
                assert_relative_eq!(x, y, epsilon = 1e-11);
            }
        }
        let more = e1.advance();
        assert_eq!(more, e2.advance());
        if !more {
            break;
        }
    }
}

#[test]
fn test_weights_need_homogeneous_space() {
    let grid = Arc::new(CartesianGrid::<f64>::uniform(&[2]).unwrap());
    let mut b = SplineSpaceBuilder::new(grid, 1);
    b.range(2);
    b.component_degree(1, &[2]);
    let bspline = BSplineBasis::new(Arc::new(b.create_space().unwrap()));
    assert!(matches!(
        NurbsBasis::with_shared_weights(bspline.clone(), vec![1.0; 2]),
        Err(SplineError::NotHomogeneous)
    ));
    let nurbs = NurbsBasis::new(bspline, vec![vec![1.0, 2.0], vec![1.0, 0.5, 1.0]]).unwrap();
    assert!(!nurbs.has_shared_weights());
    assert_eq!(nurbs.element_weights(&[0]), vec![1.0, 2.0, 1.0, 0.5, 1.0]);
}

#[test]
fn test_periodic_nurbs_partition_of_unity() {
    let grid = Arc::new(CartesianGrid::uniform(&[6]).unwrap());
    let mut b = SplineSpaceBuilder::new(grid, 2);
    b.periodic(0, true);
    let space = Arc::new(b.create_space().unwrap());
    assert_eq!(space.num_basis(), 5);
    let weights = vec![1.0, 0.5, 2.0, 1.5, 0.8];
    let basis = Arc::new(Basis::from(
        NurbsBasis::new(BSplineBasis::new(space), vec![weights]).unwrap(),
    ));
    let quad = gauss(1, 3);
    let mut handler = ElementHandler::new(Arc::clone(&basis));
    handler.set_element_flags(ValueFlags::GRADIENT);
    let mut element = BasisElement::new(Arc::clone(&basis), 4);
    handler.init_element_cache(&mut element, &quad);
    handler.fill_element_cache(&element).unwrap();
    assert_eq!(element.get_local_to_global(ACTIVE), vec![4, 0, 1]);
    let values = element.get_element_values(ACTIVE);
    let gradients = element.get_element_gradients(ACTIVE);
    for p in 0..3 {
        assert_relative_eq!(values.point_view(p).map(|v| v[0]).sum::<f64>(), 1.0, epsilon = 1e-13);
        assert_relative_eq!(gradients.point_view(p).map(|v| v[0]).sum::<f64>(), 0.0, epsilon = 1e-11);
    }
}
