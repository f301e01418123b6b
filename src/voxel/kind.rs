//! # Voxel Kind Module
//!
//! The material types a voxel cell can hold. The kind drives which texture
//! atlas cell a face samples from.

use num_derive::FromPrimitive;
use serde::{Deserialize, Serialize};

/// Compact storage form of a voxel kind.
pub type VoxelKindSize = u8;

/// Enumerates the voxel materials known to the core.
///
/// The `FromPrimitive` derive allows conversion from the compact integer
/// form used by chunk storage and save data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, Serialize, Deserialize)]
pub enum VoxelKind {
    /// An air cell, non-solid and never meshed.
    AIR,

    /// Plain stone.
    STONE,

    /// A basic dirt block.
    DIRT,

    /// A grass block; the atlas cell carries the top/side/bottom cross.
    GRASS,

    /// A wooden block with bark on all sides.
    WOOD,
}

/// Atlas cell for each kind, indexed by the kind's discriminant. AIR has no
/// cell; its entry is unused.
const KIND_TO_ATLAS_CELL: [usize; 5] = [0, 0, 1, 2, 3];

impl VoxelKind {
    /// Converts the compact storage form back to a kind, if the value is in
    /// range.
    pub fn from_int(kind: VoxelKindSize) -> Option<Self> {
        num::FromPrimitive::from_u8(kind)
    }

    /// Whether this kind occupies space for meshing and collision purposes.
    pub fn is_solid(self) -> bool {
        self != VoxelKind::AIR
    }

    /// The texture atlas cell this kind samples from.
    pub fn atlas_cell(self) -> usize {
        KIND_TO_ATLAS_CELL[self as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_int_round_trips_in_range() {
        assert_eq!(VoxelKind::from_int(0), Some(VoxelKind::AIR));
        assert_eq!(VoxelKind::from_int(3), Some(VoxelKind::GRASS));
        assert_eq!(VoxelKind::from_int(200), None);
    }

    #[test]
    fn only_air_is_hollow() {
        assert!(!VoxelKind::AIR.is_solid());
        assert!(VoxelKind::STONE.is_solid());
        assert!(VoxelKind::WOOD.is_solid());
    }

    #[test]
    fn stone_maps_to_the_first_cell() {
        assert_eq!(VoxelKind::STONE.atlas_cell(), 0);
        assert_eq!(VoxelKind::WOOD.atlas_cell(), 3);
    }
}
