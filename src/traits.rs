//! Traits
mod coefficients;
#[cfg(feature = "serde")]
mod io;

pub use coefficients::CoefficientVector;
#[cfg(feature = "serde")]
pub use io::{ConvertToSerializable, RONExport, RONImport};
