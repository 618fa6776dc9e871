//! Integer grid positions and float entity positions.
//!
//! [`BlockPos`] addresses a single cell in the voxel grid and is the map
//! key for all grid state. [`EntityPos`] is the continuous position of a
//! loose entity (dropped item, experience orb) within the same space.
//!
//! Neighbor enumeration order is fixed (-x, +x, -y, +y, -z, +z) so that
//! cluster discovery is deterministic for a given world snapshot.

use serde::{Deserialize, Serialize};

/// A cell address in the voxel grid.
///
/// Identity and equality are by value; the same coordinates always name
/// the same cell. Ordering is lexicographic (x, then y, then z) so the
/// type can key a `BTreeMap`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct BlockPos {
    /// East-west coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
    /// North-south coordinate.
    pub z: i32,
}

impl BlockPos {
    /// Create a position from its three coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Return the 6 face-adjacent positions in the fixed traversal order:
    /// -x, +x, -y, +y, -z, +z.
    ///
    /// Coordinates saturate at the i32 boundary; a saturated neighbor
    /// collapses onto this position and is filtered out by the caller's
    /// visited set.
    pub const fn neighbors6(self) -> [Self; 6] {
        [
            Self::new(self.x.saturating_sub(1), self.y, self.z),
            Self::new(self.x.saturating_add(1), self.y, self.z),
            Self::new(self.x, self.y.saturating_sub(1), self.z),
            Self::new(self.x, self.y.saturating_add(1), self.z),
            Self::new(self.x, self.y, self.z.saturating_sub(1)),
            Self::new(self.x, self.y, self.z.saturating_add(1)),
        ]
    }

    /// The continuous center of this cell (each axis offset by 0.5).
    #[allow(clippy::arithmetic_side_effects)]
    pub fn center(self) -> EntityPos {
        EntityPos {
            x: f64::from(self.x) + 0.5,
            y: f64::from(self.y) + 0.5,
            z: f64::from(self.z) + 0.5,
        }
    }
}

impl core::fmt::Display for BlockPos {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// The continuous position of a loose entity in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EntityPos {
    /// East-west coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// North-south coordinate.
    pub z: f64,
}

impl EntityPos {
    /// Create a position from its three coordinates.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another position.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn distance_to(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dz.mul_add(dz, dx.mul_add(dx, dy * dy)).sqrt()
    }
}
