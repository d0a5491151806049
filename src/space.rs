//! Spline spaces
mod builder;
mod dofs;

pub use builder::SplineSpaceBuilder;
pub use dofs::{DofPropertyMap, ElementDofs};

use crate::grid::CartesianGrid;
use crate::indexing::{CartesianProductIndexer, TensorIndexer};
use crate::types::{from_count, EndBehaviour, RealScalar, Regularity};
use crate::SplineError;
use std::sync::Arc;

/// The scalar spline space of one component
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSpace {
    degree: Vec<usize>,
    interior_multiplicities: Vec<Vec<usize>>,
    periodic: Vec<bool>,
    end_behaviour: Vec<EndBehaviour>,
    num_basis: Vec<usize>,
    origins: Vec<Vec<usize>>,
    local_dofs: CartesianProductIndexer,
    dofs: TensorIndexer,
}

impl ComponentSpace {
    fn new(
        component: usize,
        degree: Vec<usize>,
        interior_multiplicities: Vec<Vec<usize>>,
        periodic: Vec<bool>,
        end_behaviour: Vec<EndBehaviour>,
    ) -> Result<Self, SplineError> {
        let mut num_basis = vec![];
        let mut origins = vec![];
        for (direction, ((p, mults), per)) in degree
            .iter()
            .zip(&interior_multiplicities)
            .zip(&periodic)
            .enumerate()
        {
            for (knot, m) in mults.iter().enumerate() {
                if *m == 0 {
                    return Err(SplineError::ZeroMultiplicity {
                        component,
                        direction,
                        knot,
                    });
                }
                if *m > p + 1 {
                    return Err(SplineError::MultiplicityExceedsDegree {
                        component,
                        direction,
                        knot,
                        multiplicity: *m,
                        degree: *p,
                    });
                }
            }
            let interior = mults.iter().sum::<usize>();
            let n = if *per {
                let n = 1 + interior;
                if n < p + 1 {
                    return Err(SplineError::PeriodicTooFewBasis {
                        component,
                        direction,
                        num_basis: n,
                        required: p + 1,
                    });
                }
                n
            } else {
                p + 1 + interior
            };
            num_basis.push(n);
            let mut o = vec![0];
            for m in mults {
                o.push(o[o.len() - 1] + m);
            }
            origins.push(o);
        }
        Ok(Self {
            local_dofs: CartesianProductIndexer::new(
                &degree.iter().map(|p| p + 1).collect::<Vec<_>>(),
            ),
            dofs: TensorIndexer::new(&num_basis),
            degree,
            interior_multiplicities,
            periodic,
            end_behaviour,
            num_basis,
            origins,
        })
    }

    /// Degree in each direction
    pub fn degree(&self) -> &[usize] {
        &self.degree
    }

    /// Multiplicity of each interior knot in each direction
    pub fn interior_multiplicities(&self) -> &[Vec<usize>] {
        &self.interior_multiplicities
    }

    /// Periodicity of each direction
    pub fn periodic(&self) -> &[bool] {
        &self.periodic
    }

    /// End behaviour of each direction
    pub fn end_behaviour(&self) -> &[EndBehaviour] {
        &self.end_behaviour
    }

    /// Number of basis functions in each direction
    pub fn num_basis_direction(&self) -> &[usize] {
        &self.num_basis
    }

    /// Number of basis functions of this component
    pub fn num_basis(&self) -> usize {
        self.dofs.flat_size()
    }

    /// Number of basis functions of this component on each element
    pub fn element_num_basis(&self) -> usize {
        self.local_dofs.len()
    }

    /// The tensor offsets of the element-local basis functions
    pub fn local_dofs(&self) -> &CartesianProductIndexer {
        &self.local_dofs
    }

    /// Index of the first basis function touching each interval, in each direction
    pub fn origins(&self) -> &[Vec<usize>] {
        &self.origins
    }

    /// The component local index of the basis function with the given tensor index
    pub fn dof_index(&self, tensor: &[usize]) -> usize {
        self.dofs.tensor_to_flat(tensor)
    }

    /// The component local indices of the basis functions touching an element, in local order
    pub fn element_dofs(&self, element: &[usize]) -> Vec<usize> {
        let mut tensor = vec![0; self.degree.len()];
        (0..self.local_dofs.len())
            .map(|l| {
                for (d, (t, o)) in tensor
                    .iter_mut()
                    .zip(self.local_dofs.tensor_index(l))
                    .enumerate()
                {
                    *t = self.origins[d][element[d]] + o;
                    if self.periodic[d] {
                        *t %= self.num_basis[d];
                    }
                }
                self.dofs.tensor_to_flat(&tensor)
            })
            .collect()
    }
}

/// A (possibly vector valued) spline space on a cartesian grid
///
/// Basis functions are numbered component by component. Within a component the first
/// direction varies fastest. The global id of a basis function is its patch-local id plus
/// the dof offset of the space.
#[derive(Debug, Clone)]
pub struct SplineSpace<T: RealScalar> {
    grid: Arc<CartesianGrid<T>>,
    components: Vec<ComponentSpace>,
    regularity: Regularity,
    component_offsets: Vec<usize>,
    dof_offset: usize,
    properties: DofPropertyMap,
}

impl<T: RealScalar> SplineSpace<T> {
    fn new(
        grid: Arc<CartesianGrid<T>>,
        components: Vec<ComponentSpace>,
        regularity: Regularity,
        dof_offset: usize,
    ) -> Self {
        let mut component_offsets = vec![0];
        for c in &components {
            component_offsets.push(component_offsets[component_offsets.len() - 1] + c.num_basis());
        }
        let total = component_offsets.pop().unwrap_or(0);
        let mut properties = DofPropertyMap::default();
        properties.set_property_status(
            crate::types::DofProperties::ACTIVE,
            dof_offset..dof_offset + total,
            true,
        );
        Self {
            grid,
            components,
            regularity,
            component_offsets,
            dof_offset,
            properties,
        }
    }

    /// Create a scalar space of the same degree in every direction with maximum regularity
    pub fn scalar(grid: Arc<CartesianGrid<T>>, degree: usize) -> Result<Self, SplineError> {
        SplineSpaceBuilder::new(grid, degree).create_space()
    }

    /// The grid
    pub fn grid(&self) -> &Arc<CartesianGrid<T>> {
        &self.grid
    }

    /// Dimension
    pub fn dim(&self) -> usize {
        self.grid.dim()
    }

    /// Number of components
    pub fn range(&self) -> usize {
        self.components.len()
    }

    /// The space of a component
    pub fn component(&self, component: usize) -> &ComponentSpace {
        &self.components[component]
    }

    /// The degree of a component in each direction
    pub fn degree(&self, component: usize) -> &[usize] {
        self.components[component].degree()
    }

    /// The regularity given to knots created by refinement
    pub fn regularity(&self) -> Regularity {
        self.regularity
    }

    /// Check if every component has the same degree, knots, periodicity and end behaviour
    pub fn is_homogeneous(&self) -> bool {
        self.components.windows(2).all(|w| w[0] == w[1])
    }

    /// Number of basis functions of the space
    pub fn num_basis(&self) -> usize {
        self.components.iter().map(|c| c.num_basis()).sum()
    }

    /// Number of basis functions of each component
    pub fn component_num_basis(&self, component: usize) -> usize {
        self.components[component].num_basis()
    }

    /// Number of basis functions touching each element
    pub fn element_num_basis(&self) -> usize {
        self.components.iter().map(|c| c.element_num_basis()).sum()
    }

    /// The patch-local id of the first basis function of each component
    pub fn component_offsets(&self) -> &[usize] {
        &self.component_offsets
    }

    /// The offset between patch-local and global ids
    pub fn dof_offset(&self) -> usize {
        self.dof_offset
    }

    /// The dof properties
    pub fn dof_properties(&self) -> &DofPropertyMap {
        &self.properties
    }

    #[cfg(feature = "serde")]
    pub(crate) fn set_dof_properties(&mut self, properties: DofPropertyMap) {
        self.properties = properties;
    }

    /// Add a property with no dofs
    pub fn add_dofs_property(&mut self, property: &str) {
        self.properties.add_property(property);
    }

    /// Give or remove a property to a set of global dofs
    pub fn set_dof_property_status(
        &mut self,
        property: &str,
        dofs: impl IntoIterator<Item = usize>,
        status: bool,
    ) {
        self.properties.set_property_status(property, dofs, status);
    }

    /// Check if a global dof has a property
    pub fn dof_has_property(&self, dof: usize, property: &str) -> bool {
        self.properties.has_property(dof, property)
    }

    /// The global ids of the dofs touching an element, and their patch-local and element-local
    /// ids, keeping only dofs with the given property
    pub fn element_dofs(&self, element: &[usize], property: &str) -> ElementDofs {
        let with_property = self.properties.dofs(property).unwrap_or_else(|| {
            panic!("Unknown dof property: {property}");
        });
        let mut dofs = ElementDofs::default();
        let mut local = 0;
        for (c, offset) in self.components.iter().zip(&self.component_offsets) {
            for dof in c.element_dofs(element) {
                let patch = offset + dof;
                let global = self.dof_offset + patch;
                if with_property.contains(&global) {
                    dofs.global.push(global);
                    dofs.patch.push(patch);
                    dofs.local.push(local);
                }
                local += 1;
            }
        }
        dofs
    }

    /// The knot vector of a component in a direction, with repetitions and end knots
    pub fn knots_with_repetition(&self, component: usize, direction: usize) -> Vec<T> {
        let c = &self.components[component];
        let p = c.degree[direction];
        let knots = self.grid.knot_coordinates(direction);
        let n = knots.len();
        let mults = &c.interior_multiplicities[direction];

        let mut core = vec![knots[0]];
        for (k, m) in knots[1..n - 1].iter().zip(mults) {
            core.extend(std::iter::repeat_n(*k, *m));
        }

        if c.periodic[direction] {
            let length = knots[n - 1] - knots[0];
            let nc = core.len();
            let mut rep = core[nc - p..].iter().map(|k| *k - length).collect::<Vec<_>>();
            rep.extend(&core);
            rep.push(knots[n - 1]);
            rep.extend(core[1..=p].iter().map(|k| *k + length));
            return rep;
        }

        match c.end_behaviour[direction] {
            EndBehaviour::Interpolatory => {
                let mut rep = vec![knots[0]; p];
                rep.extend(&core);
                rep.extend(std::iter::repeat_n(knots[n - 1], p + 1));
                rep
            }
            EndBehaviour::Uniform => {
                let h0 = knots[1] - knots[0];
                let h1 = knots[n - 1] - knots[n - 2];
                let mut rep = (1..=p)
                    .rev()
                    .map(|i| knots[0] - h0 * from_count::<T>(i))
                    .collect::<Vec<_>>();
                rep.extend(&core);
                rep.push(knots[n - 1]);
                rep.extend((1..=p).map(|i| knots[n - 1] + h1 * from_count::<T>(i)));
                rep
            }
        }
    }

    /// The index, in [Self::knots_with_repetition], of the last knot at the start of an interval
    pub fn knot_span(&self, component: usize, direction: usize, interval: usize) -> usize {
        let c = &self.components[component];
        c.degree[direction] + c.origins[direction][interval]
    }

    /// Create the space obtained by splitting every interval of the grid
    ///
    /// Existing interior knots keep their multiplicity, new knots get the multiplicity of the
    /// regularity of the space.
    pub fn refine_h(&self, subdivisions: &[usize]) -> Result<Self, SplineError> {
        let grid = Arc::new(self.grid.refine(subdivisions)?);
        let mut components = vec![];
        for (i, c) in self.components.iter().enumerate() {
            let mults = c
                .interior_multiplicities
                .iter()
                .zip(subdivisions)
                .zip(&c.degree)
                .enumerate()
                .map(|(d, ((old, s), p))| {
                    (1..grid.knot_coordinates(d).len() - 1)
                        .map(|k| {
                            if k % s == 0 {
                                old[k / s - 1]
                            } else {
                                self.regularity.multiplicity(*p)
                            }
                        })
                        .collect()
                })
                .collect();
            components.push(ComponentSpace::new(
                i,
                c.degree.clone(),
                mults,
                c.periodic.clone(),
                c.end_behaviour.clone(),
            )?);
        }
        Ok(Self::new(grid, components, self.regularity, self.dof_offset))
    }
}
