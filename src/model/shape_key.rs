//! Morph targets (shape keys).

use crate::math::Vec3;

/// A named sparse displacement over whichever vertex space is current:
/// sub-model space while collecting, compacted LOD space after compaction.
///
/// The delta arrays are parallel to `indices`. A key may be empty for a
/// given LOD (all its vertices dropped); it is kept, not omitted, so
/// flex-controller wiring stays consistent across LODs.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeKey {
    pub name: String,
    /// True for one half of a mirrored left/right pair sharing a base name.
    pub stereo: bool,
    pub indices: Vec<u32>,
    pub position_deltas: Vec<Vec3>,
    pub normal_deltas: Vec<Vec3>,
    /// Scalar wrinkle channel, present only when some contributor carried
    /// one. When present it is parallel to `indices`.
    pub wrinkle_deltas: Option<Vec<f32>>,
}

impl ShapeKey {
    pub fn new(name: String, stereo: bool) -> Self {
        Self {
            name,
            stereo,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
