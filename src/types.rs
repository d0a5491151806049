//! Types

mod end_behaviour;
mod flags;
mod properties;

pub use end_behaviour::{EndBehaviour, Regularity};
pub use flags::{ValueFlags, ValueKind};
pub use properties::DofProperties;

use crate::SplineError;
use num::{Float, ToPrimitive};
use std::fmt::Debug;
use std::iter::Sum;

/// Scalar type used for knots, coordinates, weights and basis values
pub trait RealScalar: Float + Debug + Default + Sum + Send + Sync + 'static {}

impl<T: Float + Debug + Default + Sum + Send + Sync + 'static> RealScalar for T {}

/// Convert a primitive number to a scalar
pub(crate) fn to_scalar<T: RealScalar, N: ToPrimitive + Copy + Debug>(
    n: N,
) -> Result<T, SplineError> {
    T::from(n).ok_or_else(|| SplineError::NotRepresentable(format!("{n:?}")))
}

/// A small count as a scalar
pub(crate) fn from_count<T: RealScalar>(n: usize) -> T {
    (0..n).fold(T::zero(), |s, _| s + T::one())
}
