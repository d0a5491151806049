//! Value flags

use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Set of quantities requested from an element cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ValueFlags(u8);

impl ValueFlags {
    /// Nothing requested
    pub const NONE: Self = Self(0);
    /// Basis function values
    pub const VALUE: Self = Self(1);
    /// Basis function gradients
    pub const GRADIENT: Self = Self(1 << 1);
    /// Basis function hessians
    pub const HESSIAN: Self = Self(1 << 2);
    /// Divergence of vector valued basis functions
    pub const DIVERGENCE: Self = Self(1 << 3);
    /// Parametric coordinates of the evaluation points
    pub const POINT: Self = Self(1 << 4);
    /// Quadrature weights multiplied by the sub-element measure
    pub const W_MEASURE: Self = Self(1 << 5);
    /// Measure of the sub-element
    pub const MEASURE: Self = Self(1 << 6);

    /// Check if every flag in `other` is set
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check if any flag in `other` is set
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Check if no flag is set
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Add the flags required to compute the requested ones
    ///
    /// Rational bases need every lower derivative order to form a higher one, so a hessian
    /// request implies gradients and values, and gradients or divergences imply values.
    pub fn with_lower_orders(self) -> Self {
        let mut flags = self;
        if flags.contains(Self::HESSIAN) {
            flags |= Self::GRADIENT;
        }
        if flags.contains(Self::DIVERGENCE) {
            flags |= Self::GRADIENT;
        }
        if flags.contains(Self::GRADIENT) {
            flags |= Self::VALUE;
        }
        if flags.contains(Self::W_MEASURE) {
            flags |= Self::MEASURE;
        }
        flags
    }

    /// The highest derivative order requested, if any
    pub fn max_derivative_order(self) -> Option<usize> {
        if self.contains(Self::HESSIAN) {
            Some(2)
        } else if self.intersects(Self::GRADIENT | Self::DIVERGENCE) {
            Some(1)
        } else if self.contains(Self::VALUE) {
            Some(0)
        } else {
            None
        }
    }
}

impl BitOr for ValueFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ValueFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ValueFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// Kind of basis quantity stored in a cache table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Values (derivative order 0)
    Value,
    /// Gradients (derivative order 1)
    Gradient,
    /// Hessians (derivative order 2)
    Hessian,
    /// Divergences, derived from gradients
    Divergence,
}

impl ValueKind {
    /// The derivative order that must be filled to provide this kind
    pub fn derivative_order(self) -> usize {
        match self {
            ValueKind::Value => 0,
            ValueKind::Gradient | ValueKind::Divergence => 1,
            ValueKind::Hessian => 2,
        }
    }

    /// Number of scalars stored per (function, point) pair
    pub fn entry_size(self, dim: usize, range: usize) -> usize {
        match self {
            ValueKind::Value => range,
            ValueKind::Gradient => dim * range,
            ValueKind::Hessian => dim * dim * range,
            ValueKind::Divergence => 1,
        }
    }

    /// The kind stored for a derivative order
    pub fn from_order(order: usize) -> Self {
        match order {
            0 => ValueKind::Value,
            1 => ValueKind::Gradient,
            2 => ValueKind::Hessian,
            _ => panic!("Unsupported derivative order: {order}"),
        }
    }
}
