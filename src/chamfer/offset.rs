//! Weighted neighbor offsets and the neighborhood classes which chamfer weights attach to.

use crate::na::{Vector2, Vector3};

pub type Vector2I = Vector2<i32>;
pub type Vector3I = Vector3<i32>;

/// The classes of neighbor offsets which share a single chamfer weight. An offset's class is
/// determined by its absolute components sorted in descending order, so every class is closed
/// under reflection and axis permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeighborClass {
    /// A unit step along a single axis: `(1, 0)` or `(1, 0, 0)`
    Orthogonal,

    /// A unit step along two axes: `(1, 1)` or `(1, 1, 0)`
    Diagonal,

    /// A unit step along all three axes: `(1, 1, 1)`, 3D only
    CubeDiagonal,

    /// A chess knight move: `(2, 1)` or `(2, 1, 0)`
    Knight,
}

impl NeighborClass {
    /// Identify the class of a relative shift, or `None` if the shift is the origin or does not
    /// belong to any supported class.
    pub fn classify(shift: &[i32]) -> Option<NeighborClass> {
        let mut a = shift.iter().map(|v| v.abs()).collect::<Vec<_>>();
        a.sort_unstable_by(|x, y| y.cmp(x));
        while a.len() < 3 {
            a.push(0);
        }

        match (a[0], a[1], a[2]) {
            (1, 0, 0) => Some(NeighborClass::Orthogonal),
            (1, 1, 0) => Some(NeighborClass::Diagonal),
            (1, 1, 1) => Some(NeighborClass::CubeDiagonal),
            (2, 1, 0) => Some(NeighborClass::Knight),
            _ => None,
        }
    }
}

/// True if the neighbor at `shift` has already been visited when scanning in increasing raster
/// order, i.e. the highest axis with a non-zero component has a negative component.
pub fn precedes_in_raster(shift: &[i32]) -> bool {
    shift
        .iter()
        .rev()
        .find(|&&v| v != 0)
        .map(|&v| v < 0)
        .unwrap_or(false)
}

/// A neighbor shift in a 2D chamfer mask with its propagation cost, in both a floating point
/// and an integer representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offset2 {
    pub shift: Vector2I,
    pub weight: f64,
    pub int_weight: u32,
}

impl Offset2 {
    pub fn new(dx: i32, dy: i32, weight: f64, int_weight: u32) -> Self {
        Self {
            shift: Vector2I::new(dx, dy),
            weight,
            int_weight,
        }
    }

    pub fn dx(&self) -> i32 {
        self.shift.x
    }

    pub fn dy(&self) -> i32 {
        self.shift.y
    }

    /// The point reflection of this offset through the origin, with the same weights.
    pub fn reflected(&self) -> Self {
        Self {
            shift: -self.shift,
            ..*self
        }
    }
}

/// A neighbor shift in a 3D chamfer mask with its propagation cost, in both a floating point
/// and an integer representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offset3 {
    pub shift: Vector3I,
    pub weight: f64,
    pub int_weight: u32,
}

impl Offset3 {
    pub fn new(dx: i32, dy: i32, dz: i32, weight: f64, int_weight: u32) -> Self {
        Self {
            shift: Vector3I::new(dx, dy, dz),
            weight,
            int_weight,
        }
    }

    pub fn dx(&self) -> i32 {
        self.shift.x
    }

    pub fn dy(&self) -> i32 {
        self.shift.y
    }

    pub fn dz(&self) -> i32 {
        self.shift.z
    }

    /// The point reflection of this offset through the origin, with the same weights.
    pub fn reflected(&self) -> Self {
        Self {
            shift: -self.shift,
            ..*self
        }
    }
}
