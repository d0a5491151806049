//! Map points from the unit square onto a quarter annulus

use log::info;
use ndspline::quadrature::uniform;
use ndspline::shapes::quarter_annulus;
use ndspline::types::{DofProperties, ValueFlags};
use ndspline::{Basis, BasisElement, ElementHandler};
use std::sync::Arc;

fn main() {
    env_logger::init();

    let (nurbs, control_points) = quarter_annulus(1.0, 2.0).unwrap();
    let basis = Arc::new(Basis::from(nurbs));
    info!("Quarter annulus with {} control points", control_points.len());

    let mut handler = ElementHandler::new(Arc::clone(&basis));
    handler.set_element_flags(ValueFlags::VALUE | ValueFlags::POINT);
    let mut element = BasisElement::begin(&basis);
    handler.init_element_cache(&mut element, &uniform(2, 3));
    handler.fill_element_cache(&element).unwrap();

    let values = element.get_element_values(DofProperties::ACTIVE);
    let dofs = element.get_local_to_global(DofProperties::ACTIVE);
    for (p, xi) in element.get_points(2, 0).iter().enumerate() {
        let mut x = [0.0f64; 2];
        for (f, dof) in dofs.iter().enumerate() {
            x[0] += values.get(f, p)[0] * control_points[*dof][0];
            x[1] += values.get(f, p)[0] * control_points[*dof][1];
        }
        println!(
            "{xi:?} -> {x:?} (radius {})",
            (x[0] * x[0] + x[1] * x[1]).sqrt()
        );
    }
}
