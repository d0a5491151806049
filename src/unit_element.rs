//! Topology of the unit hypercube
//!
//! A `k`-dimensional sub-element of the `dim`-dimensional unit cube fixes `dim - k` directions
//! (its constant directions) to 0 or 1. Sub-elements are numbered by first choosing the set of
//! constant directions in lexicographic order, then the values of those directions with the
//! first constant direction varying fastest. For `k = dim - 1` this numbering gives face
//! `f` the constant direction `f / 2` and the side `f % 2`.

use itertools::Itertools;

/// Constant direction of each face, for dimensions 0 to 3
pub const FACE_CONSTANT_DIRECTION: [&[usize]; 4] = [&[], &[0, 0], &[0, 0, 1, 1], &[0, 0, 1, 1, 2, 2]];

/// Side (0 for the lower side, 1 for the upper side) of each face, for dimensions 0 to 3
pub const FACE_SIDE: [&[usize]; 4] = [&[], &[0, 1], &[0, 1, 0, 1], &[0, 1, 0, 1, 0, 1]];

/// Sign of the outward normal of each face, for dimensions 0 to 3
pub const FACE_NORMAL_SIGN: [&[i8]; 4] = [&[], &[-1, 1], &[-1, 1, -1, 1], &[-1, 1, -1, 1, -1, 1]];

/// Active directions of each face, for dimensions 0 to 3
pub const FACE_ACTIVE_DIRECTIONS: [&[&[usize]]; 4] = [
    &[],
    &[&[], &[]],
    &[&[1], &[1], &[0], &[0]],
    &[&[1, 2], &[1, 2], &[0, 2], &[0, 2], &[0, 1], &[0, 1]],
];

/// A sub-element of the unit hypercube
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubElement {
    dim: usize,
    active_directions: Vec<usize>,
    constant_directions: Vec<usize>,
    constant_values: Vec<usize>,
}

impl SubElement {
    /// Dimension of the containing cube
    pub fn cube_dim(&self) -> usize {
        self.dim
    }

    /// Dimension of this sub-element
    pub fn dim(&self) -> usize {
        self.active_directions.len()
    }

    /// Directions along which the sub-element extends
    pub fn active_directions(&self) -> &[usize] {
        &self.active_directions
    }

    /// Directions fixed on this sub-element
    pub fn constant_directions(&self) -> &[usize] {
        &self.constant_directions
    }

    /// The value (0 or 1) of each constant direction
    pub fn constant_values(&self) -> &[usize] {
        &self.constant_values
    }

    /// The fixed coordinate in direction `direction`, if it is constant
    pub fn constant_value(&self, direction: usize) -> Option<usize> {
        self.constant_directions
            .iter()
            .position(|d| *d == direction)
            .map(|i| self.constant_values[i])
    }
}

fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

/// Number of `k`-dimensional sub-elements of the `dim`-dimensional cube
pub fn sub_element_count(dim: usize, k: usize) -> usize {
    assert!(k <= dim, "Sub-element dimension {k} exceeds dimension {dim}");
    binomial(dim, dim - k) << (dim - k)
}

/// Number of faces of the `dim`-dimensional cube
pub fn face_count(dim: usize) -> usize {
    2 * dim
}

/// The sub-element with index `id` among the `k`-dimensional sub-elements of the cube
pub fn sub_element(dim: usize, k: usize, id: usize) -> SubElement {
    let count = sub_element_count(dim, k);
    assert!(
        id < count,
        "Sub-element {id} out of range: the {dim}-cube has {count} sub-elements of dimension {k}"
    );
    let n_constant = dim - k;
    let n_values = 1 << n_constant;
    let constant_directions = (0..dim)
        .combinations(n_constant)
        .nth(id / n_values)
        .unwrap_or_default();
    let bits = id % n_values;
    let constant_values = (0..n_constant).map(|i| (bits >> i) & 1).collect();
    let active_directions = (0..dim)
        .filter(|d| !constant_directions.contains(d))
        .collect();
    SubElement {
        dim,
        active_directions,
        constant_directions,
        constant_values,
    }
}

/// All `k`-dimensional sub-elements of the cube, in index order
pub fn sub_elements(dim: usize, k: usize) -> Vec<SubElement> {
    (0..sub_element_count(dim, k))
        .map(|id| sub_element(dim, k, id))
        .collect()
}

/// The vertices of the unit cube, first direction fastest
pub fn vertices(dim: usize) -> Vec<Vec<usize>> {
    (0..1usize << dim)
        .map(|v| (0..dim).map(|d| (v >> d) & 1).collect())
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_counts() {
        assert_eq!(sub_element_count(3, 3), 1);
        assert_eq!(sub_element_count(3, 2), 6);
        assert_eq!(sub_element_count(3, 1), 12);
        assert_eq!(sub_element_count(3, 0), 8);
        assert_eq!(sub_element_count(2, 1), 4);
        assert_eq!(sub_element_count(0, 0), 1);
        assert_eq!(sub_element_count(4, 2), 24);
    }

    #[test]
    fn test_faces_match_tables() {
        for dim in 0..4 {
            assert_eq!(face_count(dim), FACE_SIDE[dim].len());
            if dim == 0 {
                continue;
            }
            for (f, face) in sub_elements(dim, dim - 1).iter().enumerate() {
                assert_eq!(face.constant_directions(), &[FACE_CONSTANT_DIRECTION[dim][f]]);
                assert_eq!(face.constant_values(), &[FACE_SIDE[dim][f]]);
                assert_eq!(face.active_directions(), FACE_ACTIVE_DIRECTIONS[dim][f]);
                assert_eq!(
                    FACE_NORMAL_SIGN[dim][f],
                    if FACE_SIDE[dim][f] == 0 { -1 } else { 1 }
                );
            }
        }
    }

    #[test]
    fn test_vertices_are_zero_dimensional_sub_elements() {
        for dim in 1..4 {
            let verts = vertices(dim);
            for (v, sub) in sub_elements(dim, 0).iter().enumerate() {
                assert_eq!(sub.constant_directions(), (0..dim).collect::<Vec<_>>());
                assert_eq!(sub.constant_values(), &verts[v][..]);
            }
        }
    }

    #[test]
    fn test_edges_3d() {
        let edges = sub_elements(3, 1);
        assert_eq!(edges[0].active_directions(), &[2]);
        assert_eq!(edges[0].constant_values(), &[0, 0]);
        assert_eq!(edges[3].constant_values(), &[1, 1]);
        assert_eq!(edges[4].active_directions(), &[1]);
        assert_eq!(edges[11].active_directions(), &[0]);
        assert_eq!(edges[11].constant_value(2), Some(1));
        assert_eq!(edges[11].constant_value(0), None);
    }

    #[test]
    fn test_element_is_only_full_sub_element() {
        let elem = sub_element(2, 2, 0);
        assert!(elem.constant_directions().is_empty());
        assert_eq!(elem.active_directions(), &[0, 1]);
    }

    #[test]
    #[should_panic]
    fn test_invalid_face() {
        sub_element(2, 1, 4);
    }
}
