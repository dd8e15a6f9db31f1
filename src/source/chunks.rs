//! Sub-model, LOD, and mesh-chunk descriptors.
//!
//! A body part offers selectable sub-models; each sub-model owns a window of
//! the global vertex buffer (`vertex_offset`/`vertex_count`) and a list of
//! LODs; each LOD carries mesh chunks aligned with the sub-model's chunk
//! list. Strip indices are mesh-local (0-based within the chunk's vertex
//! window) and become sub-model-local after adding `vertex_index_start`.

use bon::Builder;

use crate::math::Vec3;

#[derive(Debug, Clone, Builder)]
pub struct BodyPartDescriptor {
    #[builder(into)]
    pub name: String,
    #[builder(default)]
    pub sub_models: Vec<SubModelDescriptor>,
}

#[derive(Debug, Clone, Builder)]
pub struct SubModelDescriptor {
    #[builder(into)]
    pub name: String,
    /// Start of this sub-model's window in the global vertex buffer.
    #[builder(default)]
    pub vertex_offset: u32,
    /// Window length. Zero means a placeholder choice with no geometry.
    #[builder(default)]
    pub vertex_count: u32,
    /// Finest detail first.
    #[builder(default)]
    pub lods: Vec<LodDescriptor>,
}

#[derive(Debug, Clone, Builder)]
pub struct LodDescriptor {
    #[builder(default)]
    pub switch_point: f32,
    #[builder(default)]
    pub chunks: Vec<MeshChunk>,
}

/// One material's worth of geometry within a sub-model LOD.
#[derive(Debug, Clone, Builder)]
pub struct MeshChunk {
    #[builder(default)]
    pub material_index: u32,
    /// Offset of this chunk's vertex window within the sub-model's window.
    #[builder(default)]
    pub vertex_index_start: u32,
    #[builder(default)]
    pub strip_groups: Vec<StripGroup>,
    #[builder(default)]
    pub flex_records: Vec<FlexRecord>,
}

/// A batch of triangle-list indices in mesh-local numbering.
#[derive(Debug, Clone)]
pub struct StripGroup {
    pub indices: Vec<u32>,
}

/// Which delta channels a flex record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexAnimationType {
    #[default]
    Normal,
    /// Adds a scalar wrinkle delta per affected vertex.
    Wrinkle,
}

/// A sparse morph contribution from one mesh chunk.
#[derive(Debug, Clone, Builder)]
pub struct FlexRecord {
    /// Index into the asset's flex-name table.
    pub flex_desc_index: u32,
    /// Non-zero marks this record as one half of a mirrored stereo pair.
    #[builder(default)]
    pub partner_index: u32,
    #[builder(default)]
    pub animation_type: FlexAnimationType,
    #[builder(default)]
    pub animations: Vec<VertexAnimation>,
}

/// A single (vertex, delta) entry. The index is mesh-local, like strip
/// indices, and is rebased by `vertex_index_start` during collection.
#[derive(Debug, Clone, Copy)]
pub struct VertexAnimation {
    pub index: u32,
    pub position_delta: Vec3,
    pub normal_delta: Vec3,
    /// Only meaningful for [`FlexAnimationType::Wrinkle`] records.
    pub wrinkle_delta: f32,
}
