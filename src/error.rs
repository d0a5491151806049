//! Errors

use thiserror::Error;

/// Errors raised while building spaces and evaluating bases
#[derive(Debug, Error)]
pub enum SplineError {
    /// An interior knot is repeated more often than the degree allows
    #[error(
        "multiplicity {multiplicity} of interior knot {knot} exceeds degree {degree} + 1 \
         (component {component}, direction {direction})"
    )]
    MultiplicityExceedsDegree {
        /// Component
        component: usize,
        /// Direction
        direction: usize,
        /// Interior knot index
        knot: usize,
        /// Requested multiplicity
        multiplicity: usize,
        /// Degree in this direction
        degree: usize,
    },
    /// An interior knot was given multiplicity zero
    #[error("interior knot {knot} has multiplicity zero (component {component}, direction {direction})")]
    ZeroMultiplicity {
        /// Component
        component: usize,
        /// Direction
        direction: usize,
        /// Interior knot index
        knot: usize,
    },
    /// Two sizes that must agree do not
    #[error("{what}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// What was being compared
        what: &'static str,
        /// Expected size
        expected: usize,
        /// Actual size
        found: usize,
    },
    /// Knots in a direction are not strictly increasing
    #[error("knots in direction {direction} are not strictly increasing")]
    KnotsNotIncreasing {
        /// Direction
        direction: usize,
    },
    /// A direction has fewer than two knots
    #[error("direction {direction} needs at least two knots, found {found}")]
    TooFewKnots {
        /// Direction
        direction: usize,
        /// Number of knots given
        found: usize,
    },
    /// A point lies outside the bounding box
    #[error("coordinate {coordinate:?} in direction {direction} lies outside the bounding box")]
    PointOutsideBoundingBox {
        /// Direction
        direction: usize,
        /// Offending coordinate
        coordinate: f64,
    },
    /// A dilation factor is not strictly positive
    #[error("dilation factor {factor:?} in direction {direction} is not positive")]
    NonPositiveDilation {
        /// Direction
        direction: usize,
        /// Offending factor
        factor: f64,
    },
    /// The weighted sum of a rational basis vanishes
    #[error("weighted sum of component {component} vanishes at point {point}")]
    DegenerateWeights {
        /// Component
        component: usize,
        /// Point index
        point: usize,
    },
    /// A NURBS weight is not strictly positive
    #[error("weight {weight:?} of basis function {function} is not positive")]
    NonPositiveWeight {
        /// Component local basis function
        function: usize,
        /// Offending weight
        weight: f64,
    },
    /// A periodic direction has fewer basis functions than an element touches
    #[error("periodic direction {direction} of component {component} has {num_basis} basis functions, needs at least {required}")]
    PeriodicTooFewBasis {
        /// Component
        component: usize,
        /// Direction
        direction: usize,
        /// Number of basis functions in this direction
        num_basis: usize,
        /// Minimum number needed
        required: usize,
    },
    /// A rational basis with shared weights needs components with identical layout
    #[error("space components differ, so weights cannot be shared between them")]
    NotHomogeneous,
    /// A number cannot be converted to the scalar type
    #[error("{0} cannot be represented as a scalar")]
    NotRepresentable(String),
    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// RON (de)serialization failure
    #[cfg(feature = "serde")]
    #[error("RON error: {0}")]
    Ron(String),
}
