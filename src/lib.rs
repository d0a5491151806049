//! n-dimensional B-spline and NURBS bases for isogeometric analysis
//!
//! A [SplineSpace] on a [CartesianGrid] describes the degrees, knot multiplicities and dof
//! numbering of a (possibly vector valued) spline space. A [Basis] evaluates its basis
//! functions on each element: [ElementHandler] fills the cache of a [BasisElement] at a set of
//! [EvaluationPoints], and the values are read back through the element.
#![cfg_attr(feature = "strict", deny(warnings), deny(unused_crate_dependencies))]
#![warn(missing_docs)]

pub mod basis;
pub mod bernstein;
pub mod cache;
pub mod element;
mod error;
pub mod evaluation_points;
pub mod function;
pub mod grid;
pub mod indexing;
pub mod io;
pub mod quadrature;
pub mod shapes;
pub mod space;
pub mod traits;
pub mod types;
pub mod unit_element;
pub mod value_table;

pub use basis::{BSplineBasis, Basis, NurbsBasis};
pub use element::{BasisElement, ElementHandler};
pub use error::SplineError;
pub use evaluation_points::EvaluationPoints;
pub use function::IgFunction;
pub use grid::CartesianGrid;
pub use space::{SplineSpace, SplineSpaceBuilder};
