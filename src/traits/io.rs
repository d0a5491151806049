//! RON I/O
use crate::SplineError;
use std::fs;

pub trait ConvertToSerializable: Sized {
    //! Convert to/from a serializable type
    type SerializableType: serde::Serialize;
    /// Convert to a serializable type
    fn to_serializable(&self) -> Self::SerializableType;
    /// Convert from a serializable type
    fn from_serializable(s: Self::SerializableType) -> Result<Self, SplineError>;
}

pub trait RONExport {
    //! Export as RON

    /// Generate the RON string
    fn to_ron_string(&self) -> Result<String, SplineError>;

    /// Export as RON
    fn export_as_ron(&self, filename: &str) -> Result<(), SplineError> {
        let ron_s = self.to_ron_string()?;
        fs::write(filename, ron_s)?;
        Ok(())
    }
}

pub trait RONImport: Sized {
    //! Import from RON

    /// Create from a RON string
    fn from_ron_string(s: &str) -> Result<Self, SplineError>;

    /// Import from a RON file
    fn import_from_ron(filename: &str) -> Result<Self, SplineError> {
        let content = fs::read_to_string(filename)?;
        Self::from_ron_string(&content)
    }
}
