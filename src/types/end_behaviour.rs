//! Knot vector end behaviour and interior regularity

/// How the knot vector is completed outside the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EndBehaviour {
    /// Open knot vector: the end knots are repeated `degree + 1` times
    #[default]
    Interpolatory,
    /// The end knots appear once and the vector is extended by `degree` knots on each side,
    /// spaced like the first/last interval of the grid
    Uniform,
}

/// Continuity class used to derive the interior knot multiplicities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Regularity {
    /// C^(p-1) at every interior knot (multiplicity 1)
    #[default]
    Maximum,
    /// C^0 at every interior knot (multiplicity p)
    Minimum,
}

impl Regularity {
    /// The interior knot multiplicity giving this regularity for a given degree
    pub fn multiplicity(self, degree: usize) -> usize {
        match self {
            Regularity::Maximum => 1,
            Regularity::Minimum => degree.max(1),
        }
    }
}
