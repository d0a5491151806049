//! RON I/O
use crate::evaluation_points::EvaluationPoints;
use crate::grid::CartesianGrid;
use crate::space::{DofPropertyMap, SplineSpace, SplineSpaceBuilder};
use crate::traits::{ConvertToSerializable, RONExport, RONImport};
use crate::types::{EndBehaviour, RealScalar, Regularity};
use crate::SplineError;
use rlst::DynArray;
use std::sync::Arc;

impl<S: ConvertToSerializable> RONExport for S {
    fn to_ron_string(&self) -> Result<String, SplineError> {
        ron::to_string(&self.to_serializable()).map_err(|e| SplineError::Ron(e.to_string()))
    }
}

impl<S: ConvertToSerializable> RONImport for S
where
    S::SerializableType: serde::de::DeserializeOwned,
{
    fn from_ron_string(s: &str) -> Result<Self, SplineError> {
        let serializable = ron::from_str(s).map_err(|e| SplineError::Ron(e.to_string()))?;
        Self::from_serializable(serializable)
    }
}

/// Serializable description of a [SplineSpace]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SerializableSplineSpace<T> {
    knots: Vec<Vec<T>>,
    degree: Vec<Vec<usize>>,
    interior_multiplicities: Vec<Vec<Vec<usize>>>,
    periodic: Vec<Vec<bool>>,
    end_behaviour: Vec<Vec<EndBehaviour>>,
    regularity: Regularity,
    dof_offset: usize,
    properties: DofPropertyMap,
}

impl<T: RealScalar + serde::Serialize> ConvertToSerializable for SplineSpace<T> {
    type SerializableType = SerializableSplineSpace<T>;
    fn to_serializable(&self) -> SerializableSplineSpace<T> {
        SerializableSplineSpace {
            knots: self.grid().knots().to_vec(),
            degree: (0..self.range())
                .map(|c| self.degree(c).to_vec())
                .collect(),
            interior_multiplicities: (0..self.range())
                .map(|c| self.component(c).interior_multiplicities().to_vec())
                .collect(),
            periodic: (0..self.range())
                .map(|c| self.component(c).periodic().to_vec())
                .collect(),
            end_behaviour: (0..self.range())
                .map(|c| self.component(c).end_behaviour().to_vec())
                .collect(),
            regularity: self.regularity(),
            dof_offset: self.dof_offset(),
            properties: self.dof_properties().clone(),
        }
    }
    fn from_serializable(s: SerializableSplineSpace<T>) -> Result<Self, SplineError> {
        let grid = Arc::new(CartesianGrid::new(s.knots)?);
        let dim = grid.dim();
        let range = s.degree.len();
        for found in [
            s.interior_multiplicities.len(),
            s.periodic.len(),
            s.end_behaviour.len(),
        ] {
            if found != range {
                return Err(SplineError::DimensionMismatch {
                    what: "number of components",
                    expected: range,
                    found,
                });
            }
        }
        for found in s
            .periodic
            .iter()
            .map(|p| p.len())
            .chain(s.end_behaviour.iter().map(|e| e.len()))
        {
            if found != dim {
                return Err(SplineError::DimensionMismatch {
                    what: "number of directions",
                    expected: dim,
                    found,
                });
            }
        }
        let mut b = SplineSpaceBuilder::new(grid, 0);
        b.range(s.degree.len());
        b.regularity(s.regularity);
        b.dof_offset(s.dof_offset);
        for (c, (degree, mults)) in s.degree.iter().zip(s.interior_multiplicities).enumerate() {
            b.component_degree(c, degree);
            for (d, m) in mults.into_iter().enumerate() {
                b.interior_multiplicities(c, d, m);
            }
        }
        for (c, (periodic, end)) in s.periodic.iter().zip(&s.end_behaviour).enumerate() {
            for (d, (p, e)) in periodic.iter().zip(end).enumerate() {
                b.component_periodic(c, d, *p);
                b.component_end_behaviour(c, d, *e);
            }
        }
        let mut space = b.create_space()?;
        space.set_dof_properties(s.properties);
        Ok(space)
    }
}

/// Serializable description of [EvaluationPoints]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SerializableEvaluationPoints<T> {
    bounding_box: Vec<[T; 2]>,
    coordinates: Vec<Vec<T>>,
    weights_1d: Vec<Vec<T>>,
    point_coords_id: (Vec<usize>, [usize; 2]),
    tensor_product: bool,
}

impl<T: RealScalar + serde::Serialize> ConvertToSerializable for EvaluationPoints<T> {
    type SerializableType = SerializableEvaluationPoints<T>;
    fn to_serializable(&self) -> SerializableEvaluationPoints<T> {
        SerializableEvaluationPoints {
            bounding_box: self.bounding_box().to_vec(),
            coordinates: (0..self.dim())
                .map(|d| self.coords_direction(d).to_vec())
                .collect(),
            weights_1d: self.weights_1d().to_vec(),
            point_coords_id: (
                (0..self.num_points())
                    .flat_map(|p| self.coords_id(p).to_vec())
                    .collect(),
                self.coords_ids().shape(),
            ),
            tensor_product: self.has_tensor_product_structure(),
        }
    }
    fn from_serializable(s: SerializableEvaluationPoints<T>) -> Result<Self, SplineError> {
        let (data, shape) = s.point_coords_id;
        if data.len() != shape[0] * shape[1] {
            return Err(SplineError::DimensionMismatch {
                what: "number of coordinate ids",
                expected: shape[0] * shape[1],
                found: data.len(),
            });
        }
        let mut ids = DynArray::<usize, 2>::from_shape(shape);
        for (i, id) in data.iter().enumerate() {
            ids[[i % shape[0], i / shape[0]]] = *id;
        }
        EvaluationPoints::from_coords_ids(
            s.coordinates,
            s.weights_1d,
            s.bounding_box,
            ids,
            s.tensor_product,
        )
    }
}
