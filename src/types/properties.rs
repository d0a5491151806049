//! Dof properties

/// Names of the dof properties known to every space
pub struct DofProperties;

impl DofProperties {
    /// Property assigned to every dof when a space is created
    pub const ACTIVE: &'static str = "active";
}
