//! Dof numbering and properties
use std::collections::{BTreeSet, HashMap};

/// The dofs of an element that have a given property
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementDofs {
    /// Global ids
    pub global: Vec<usize>,
    /// Patch-local ids
    pub patch: Vec<usize>,
    /// Element-local ids
    pub local: Vec<usize>,
}

impl ElementDofs {
    /// Number of dofs
    pub fn len(&self) -> usize {
        self.global.len()
    }

    /// Check if there are no dofs
    pub fn is_empty(&self) -> bool {
        self.global.is_empty()
    }
}

/// Named sets of global dof ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DofPropertyMap {
    properties: HashMap<String, BTreeSet<usize>>,
}

impl DofPropertyMap {
    /// Add a property with no dofs, if it does not exist yet
    pub fn add_property(&mut self, property: &str) {
        self.properties.entry(property.to_string()).or_default();
    }

    /// Give (`status = true`) or remove (`status = false`) a property to a set of dofs
    pub fn set_property_status(
        &mut self,
        property: &str,
        dofs: impl IntoIterator<Item = usize>,
        status: bool,
    ) {
        let set = self.properties.entry(property.to_string()).or_default();
        for dof in dofs {
            if status {
                set.insert(dof);
            } else {
                set.remove(&dof);
            }
        }
    }

    /// Check if a dof has a property
    pub fn has_property(&self, dof: usize, property: &str) -> bool {
        self.properties
            .get(property)
            .is_some_and(|s| s.contains(&dof))
    }

    /// The dofs with a property, or `None` if the property does not exist
    pub fn dofs(&self, property: &str) -> Option<&BTreeSet<usize>> {
        self.properties.get(property)
    }

    /// The names of all properties, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.properties.keys().map(|k| k.as_str()).collect::<Vec<_>>();
        names.sort();
        names
    }
}
