//! I/O
#[cfg(feature = "serde")]
mod ron;

#[cfg(feature = "serde")]
pub use ron::{SerializableEvaluationPoints, SerializableSplineSpace};
