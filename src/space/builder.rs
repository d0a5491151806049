//! Spline space builder
use super::{ComponentSpace, SplineSpace};
use crate::grid::CartesianGrid;
use crate::types::{EndBehaviour, RealScalar, Regularity};
use crate::SplineError;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// Builder for a [SplineSpace]
///
/// Every component starts with the same degree in every direction, maximum regularity,
/// open end knots and no periodicity. Individual components and directions can then be
/// changed before calling [SplineSpaceBuilder::create_space].
#[derive(Debug)]
pub struct SplineSpaceBuilder<T: RealScalar> {
    grid: Arc<CartesianGrid<T>>,
    range: usize,
    degree: Vec<usize>,
    component_degree: HashMap<usize, Vec<usize>>,
    regularity: Regularity,
    multiplicities: HashMap<(usize, usize), Vec<usize>>,
    periodic: Vec<bool>,
    end_behaviour: Vec<EndBehaviour>,
    component_periodic: HashMap<(usize, usize), bool>,
    component_end_behaviour: HashMap<(usize, usize), EndBehaviour>,
    dof_offset: usize,
}

impl<T: RealScalar> SplineSpaceBuilder<T> {
    /// Create new
    pub fn new(grid: Arc<CartesianGrid<T>>, degree: usize) -> Self {
        let dim = grid.dim();
        Self {
            grid,
            range: 1,
            degree: vec![degree; dim],
            component_degree: HashMap::new(),
            regularity: Regularity::Maximum,
            multiplicities: HashMap::new(),
            periodic: vec![false; dim],
            end_behaviour: vec![EndBehaviour::Interpolatory; dim],
            component_periodic: HashMap::new(),
            component_end_behaviour: HashMap::new(),
            dof_offset: 0,
        }
    }

    /// Set the number of components
    pub fn range(&mut self, range: usize) -> &mut Self {
        assert!(range > 0, "A space needs at least one component");
        self.range = range;
        self
    }

    /// Set the degree in each direction for every component
    pub fn degree(&mut self, degree: &[usize]) -> &mut Self {
        self.degree = degree.to_vec();
        self
    }

    /// Set the degree in each direction for one component
    pub fn component_degree(&mut self, component: usize, degree: &[usize]) -> &mut Self {
        self.component_degree.insert(component, degree.to_vec());
        self
    }

    /// Set the regularity used to derive interior knot multiplicities
    pub fn regularity(&mut self, regularity: Regularity) -> &mut Self {
        self.regularity = regularity;
        self
    }

    /// Set the interior knot multiplicities of one component in one direction
    pub fn interior_multiplicities(
        &mut self,
        component: usize,
        direction: usize,
        multiplicities: Vec<usize>,
    ) -> &mut Self {
        self.multiplicities
            .insert((component, direction), multiplicities);
        self
    }

    /// Make a direction periodic for every component
    pub fn periodic(&mut self, direction: usize, periodic: bool) -> &mut Self {
        self.periodic[direction] = periodic;
        self
    }

    /// Set the end behaviour of a direction for every component
    pub fn end_behaviour(&mut self, direction: usize, end_behaviour: EndBehaviour) -> &mut Self {
        self.end_behaviour[direction] = end_behaviour;
        self
    }

    /// Make a direction periodic for one component
    pub fn component_periodic(
        &mut self,
        component: usize,
        direction: usize,
        periodic: bool,
    ) -> &mut Self {
        self.component_periodic
            .insert((component, direction), periodic);
        self
    }

    /// Set the end behaviour of a direction for one component
    pub fn component_end_behaviour(
        &mut self,
        component: usize,
        direction: usize,
        end_behaviour: EndBehaviour,
    ) -> &mut Self {
        self.component_end_behaviour
            .insert((component, direction), end_behaviour);
        self
    }

    /// Set the offset between patch-local and global dof ids
    pub fn dof_offset(&mut self, offset: usize) -> &mut Self {
        self.dof_offset = offset;
        self
    }

    /// Create the space
    pub fn create_space(&self) -> Result<SplineSpace<T>, SplineError> {
        let dim = self.grid.dim();
        let mut components = vec![];
        for c in 0..self.range {
            let degree = self
                .component_degree
                .get(&c)
                .unwrap_or(&self.degree)
                .clone();
            if degree.len() != dim {
                return Err(SplineError::DimensionMismatch {
                    what: "number of degrees",
                    expected: dim,
                    found: degree.len(),
                });
            }
            let mut mults = vec![];
            for (d, p) in degree.iter().enumerate() {
                let n_interior = self.grid.knot_coordinates(d).len() - 2;
                let m = match self.multiplicities.get(&(c, d)) {
                    Some(m) => m.clone(),
                    None => vec![self.regularity.multiplicity(*p); n_interior],
                };
                if m.len() != n_interior {
                    return Err(SplineError::DimensionMismatch {
                        what: "number of interior multiplicities",
                        expected: n_interior,
                        found: m.len(),
                    });
                }
                mults.push(m);
            }
            let periodic = (0..dim)
                .map(|d| {
                    *self
                        .component_periodic
                        .get(&(c, d))
                        .unwrap_or(&self.periodic[d])
                })
                .collect();
            let end_behaviour = (0..dim)
                .map(|d| {
                    *self
                        .component_end_behaviour
                        .get(&(c, d))
                        .unwrap_or(&self.end_behaviour[d])
                })
                .collect();
            components.push(ComponentSpace::new(
                c,
                degree,
                mults,
                periodic,
                end_behaviour,
            )?);
        }
        debug!(
            "Creating spline space with {} components on a {}-dimensional grid",
            self.range, dim
        );
        Ok(SplineSpace::new(
            Arc::clone(&self.grid),
            components,
            self.regularity,
            self.dof_offset,
        ))
    }
}
