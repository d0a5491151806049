//! Evaluate a quadratic B-spline basis on every element of a 2D grid

use log::info;
use ndspline::quadrature::gauss;
use ndspline::types::{DofProperties, ValueFlags};
use ndspline::{BSplineBasis, Basis, BasisElement, CartesianGrid, ElementHandler, SplineSpaceBuilder};
use std::sync::Arc;

fn main() {
    env_logger::init();

    let grid = Arc::new(CartesianGrid::<f64>::uniform(&[4, 3]).unwrap());
    let mut b = SplineSpaceBuilder::new(grid, 2);
    b.degree(&[2, 1]);
    let space = Arc::new(b.create_space().unwrap());
    info!("Space has {} basis functions", space.num_basis());

    let basis = Arc::new(Basis::from(BSplineBasis::new(space)));
    let quad = gauss(2, 3);

    let mut handler = ElementHandler::new(Arc::clone(&basis));
    handler.set_element_flags(ValueFlags::GRADIENT | ValueFlags::W_MEASURE);
    let mut element = BasisElement::begin(&basis);
    handler.init_element_cache(&mut element, &quad);

    let mut area = 0.0;
    loop {
        handler.fill_element_cache(&element).unwrap();
        let values = element.get_element_values(DofProperties::ACTIVE);
        let dofs = element.get_local_to_global(DofProperties::ACTIVE);
        println!(
            "Element {:?}: dofs {:?}, first function at first point {}",
            element.tensor_index(),
            dofs,
            values.get(0, 0)[0]
        );
        area += element.get_element_w_measures().iter().sum::<f64>();
        if !element.advance() {
            break;
        }
    }
    println!("Total area: {area}");
}
