use approx::assert_relative_eq;
use ndspline::quadrature::{gauss, uniform};
use ndspline::types::{DofProperties, ValueFlags, ValueKind};
use ndspline::{
    BSplineBasis, Basis, BasisElement, CartesianGrid, ElementHandler, EvaluationPoints, IgFunction,
    SplineSpace, SplineSpaceBuilder,
};
use std::sync::Arc;

const ACTIVE: &str = DofProperties::ACTIVE;

fn bspline_basis(space: SplineSpace<f64>) -> Arc<Basis<f64>> {
    Arc::new(BSplineBasis::new(Arc::new(space)).into())
}

#[test]
fn test_quadratic_values_at_midpoint() {
    let grid = Arc::new(CartesianGrid::uniform(&[2]).unwrap());
    let basis = bspline_basis(SplineSpace::scalar(grid, 2).unwrap());
    let quad = EvaluationPoints::new_tensor_product(vec![vec![0.5]], vec![vec![1.0]]).unwrap();

    let mut handler = ElementHandler::new(Arc::clone(&basis));
    handler.set_element_flags(ValueFlags::VALUE | ValueFlags::GRADIENT);
    let mut element = BasisElement::begin(&basis);
    handler.init_element_cache(&mut element, &quad);
    handler.fill_element_cache(&element).unwrap();

    let values = element.get_element_values(ACTIVE);
    assert_eq!(values.num_functions(), 3);
    for (f, v) in [0.25, 0.5, 0.25].iter().enumerate() {
        assert_relative_eq!(values.get(f, 0)[0], v);
    }
    let gradients = element.get_element_gradients(ACTIVE);
    let sum = gradients.point_view(0).map(|g| g[0]).sum::<f64>();
    assert_relative_eq!(sum, 0.0, epsilon = 1e-14);
}

#[test]
fn test_partition_of_unity_and_measures() {
    let grid = Arc::new(CartesianGrid::new(vec![vec![0.0, 0.5, 1.5, 2.0], vec![1.0, 2.0, 4.0]]).unwrap());
    let mut b = SplineSpaceBuilder::new(grid, 2);
    b.degree(&[3, 2]);
    b.interior_multiplicities(0, 0, vec![1, 2]);
    let basis = bspline_basis(b.create_space().unwrap());
    let quad = gauss(2, 4);

    let mut handler = ElementHandler::new(Arc::clone(&basis));
    handler.set_element_flags(ValueFlags::HESSIAN | ValueFlags::W_MEASURE);
    let mut element = BasisElement::begin(&basis);
    handler.init_element_cache(&mut element, &quad);

    let mut area = 0.0;
    let mut visited = 0;
    loop {
        handler.fill_element_cache(&element).unwrap();
        let values = element.get_element_values(ACTIVE);
        let gradients = element.get_element_gradients(ACTIVE);
        let hessians = element.get_element_hessians(ACTIVE);
        for p in 0..quad.num_points() {
            assert_relative_eq!(values.point_view(p).map(|v| v[0]).sum::<f64>(), 1.0, epsilon = 1e-13);
            for e in 0..2 {
                let s = gradients.point_view(p).map(|v| v[e]).sum::<f64>();
                assert_relative_eq!(s, 0.0, epsilon = 1e-11);
            }
            for e in 0..4 {
                let s = hessians.point_view(p).map(|v| v[e]).sum::<f64>();
                assert_relative_eq!(s, 0.0, epsilon = 1e-9);
            }
        }
        area += element.get_element_w_measures().iter().sum::<f64>();
        visited += 1;
        if !element.advance() {
            break;
        }
    }
    assert_eq!(visited, 6);
    assert_relative_eq!(area, 6.0, epsilon = 1e-12);
}

#[test]
fn test_greville_coefficients_reproduce_identity() {
    let grid = Arc::new(CartesianGrid::new(vec![vec![0.0, 0.25, 0.5, 1.0]]).unwrap());
    let space = SplineSpace::scalar(grid, 2).unwrap();
    let knots = space.knots_with_repetition(0, 0);
    let greville = (0..space.num_basis())
        .map(|i| (knots[i + 1] + knots[i + 2]) / 2.0)
        .collect::<Vec<_>>();
    let basis = bspline_basis(space);
    let function = IgFunction::new(Arc::clone(&basis), greville, ACTIVE).unwrap();

    let quad = uniform(1, 5);
    let mut handler = ElementHandler::new(Arc::clone(&basis));
    handler.set_element_flags(ValueFlags::GRADIENT | ValueFlags::POINT);
    let mut element = BasisElement::begin(&basis);
    handler.init_element_cache(&mut element, &quad);
    loop {
        handler.fill_element_cache(&element).unwrap();
        let points = element.get_points(1, 0);
        let values = function.element_values(&element);
        let gradients = function.element_gradients(&element);
        for (p, x) in points.iter().enumerate() {
            assert_relative_eq!(values[p], x[0], epsilon = 1e-14);
            assert_relative_eq!(gradients[p], 1.0, epsilon = 1e-12);
        }
        if !element.advance() {
            break;
        }
    }
}

#[test]
fn test_face_values() {
    let grid = Arc::new(CartesianGrid::new(vec![vec![0.0, 1.0, 3.0], vec![0.0, 2.0]]).unwrap());
    let basis = bspline_basis(SplineSpace::scalar(grid, 2).unwrap());
    let quad = gauss(2, 3);

    let mut handler = ElementHandler::new(Arc::clone(&basis));
    handler.set_element_flags(ValueFlags::VALUE);
    handler.set_face_flags(ValueFlags::VALUE | ValueFlags::W_MEASURE);
    let mut element = BasisElement::new(Arc::clone(&basis), 1);
    handler.init_element_cache(&mut element, &quad);
    for face in 0..4 {
        handler.fill_face_cache(&element, face).unwrap();
    }

    // face 1 is x = 3: only functions with the last x offset are nonzero
    let values = element.get_basis(ValueKind::Value, 1, 1, ACTIVE);
    assert_eq!(values.num_points(), 3);
    for f in 0..9 {
        for p in 0..3 {
            if f % 3 == 2 {
                assert!(values.get(f, p)[0] > 0.0);
            } else {
                assert_relative_eq!(values.get(f, p)[0], 0.0, epsilon = 1e-14);
            }
        }
    }

    // every face of this element has length 2
    for face in 0..4 {
        let w = element.get_w_measures(1, face).iter().sum::<f64>();
        assert_relative_eq!(w, 2.0, epsilon = 1e-13);
    }
    assert_relative_eq!(element.get_measure(1, 3), 2.0);
}

#[test]
#[should_panic]
fn test_reading_unfilled_cache_panics() {
    let grid = Arc::new(CartesianGrid::uniform(&[2]).unwrap());
    let basis = bspline_basis(SplineSpace::scalar(grid, 1).unwrap());
    let mut handler = ElementHandler::new(Arc::clone(&basis));
    handler.set_element_flags(ValueFlags::VALUE);
    let mut element = BasisElement::begin(&basis);
    handler.init_element_cache(&mut element, &gauss(1, 2));
    element.get_element_values(ACTIVE);
}

#[test]
#[should_panic]
fn test_reading_unrequested_derivative_panics() {
    let grid = Arc::new(CartesianGrid::uniform(&[2]).unwrap());
    let basis = bspline_basis(SplineSpace::scalar(grid, 1).unwrap());
    let mut handler = ElementHandler::new(Arc::clone(&basis));
    handler.set_element_flags(ValueFlags::VALUE);
    let mut element = BasisElement::begin(&basis);
    handler.init_element_cache(&mut element, &gauss(1, 2));
    handler.fill_element_cache(&element).unwrap();
    element.get_element_gradients(ACTIVE);
}

#[test]
fn test_divergence() {
    let grid = Arc::new(CartesianGrid::uniform(&[3, 3]).unwrap());
    let mut b = SplineSpaceBuilder::new(grid, 1);
    b.range(2);
    let space = b.create_space().unwrap();
    let basis = bspline_basis(space);

    // u = (x, y) has divergence 2: coefficients are the knot coordinates
    let mut coefficients = vec![0.0; 18];
    for j in 0..3 {
        for i in 0..3 {
            coefficients[i + 3 * j] = i as f64 / 2.0;
            coefficients[9 + i + 3 * j] = j as f64 / 2.0;
        }
    }
    let function = IgFunction::new(Arc::clone(&basis), coefficients, ACTIVE).unwrap();

    let quad = gauss(2, 2);
    let mut handler = ElementHandler::new(Arc::clone(&basis));
    handler.set_element_flags(ValueFlags::DIVERGENCE);
    let mut element = BasisElement::new(Arc::clone(&basis), 3);
    handler.init_element_cache(&mut element, &quad);
    handler.fill_element_cache(&element).unwrap();

    let divergence = function.evaluate(&element, ValueKind::Divergence, 2, 0);
    for d in divergence {
        assert_relative_eq!(d, 2.0, epsilon = 1e-13);
    }
    assert_eq!(element.get_element_divergences(ACTIVE).entry_size(), 1);
}

#[test]
fn test_quadratic_single_element_with_three_gauss_points_2d() {
    let grid = Arc::new(CartesianGrid::uniform(&[2, 2]).unwrap());
    let basis = bspline_basis(SplineSpace::scalar(grid, 2).unwrap());
    let quad = gauss(2, 3);
    assert_eq!(quad.point(4), vec![0.5, 0.5]);

    let mut handler = ElementHandler::new(Arc::clone(&basis));
    handler.set_element_flags(ValueFlags::HESSIAN);
    let mut element = BasisElement::begin(&basis);
    handler.init_element_cache(&mut element, &quad);
    handler.fill_element_cache(&element).unwrap();

    let values = element.get_element_values(ACTIVE);
    let gradients = element.get_element_gradients(ACTIVE);
    let hessians = element.get_element_hessians(ACTIVE);
    assert_eq!(values.num_functions(), 9);
    assert_eq!(values.num_points(), 9);
    let bernstein = [0.25, 0.5, 0.25];
    for j in 0..3 {
        for i in 0..3 {
            assert_relative_eq!(
                values.get(i + 3 * j, 4)[0],
                bernstein[i] * bernstein[j],
                epsilon = 1e-14
            );
        }
    }
    for p in 0..9 {
        assert_relative_eq!(values.point_view(p).map(|v| v[0]).sum::<f64>(), 1.0, epsilon = 1e-14);
        for e in 0..2 {
            let s = gradients.point_view(p).map(|v| v[e]).sum::<f64>();
            assert_relative_eq!(s, 0.0, epsilon = 1e-12);
        }
        for e in 0..4 {
            let s = hessians.point_view(p).map(|v| v[e]).sum::<f64>();
            assert_relative_eq!(s, 0.0, epsilon = 1e-10);
        }
    }
}
