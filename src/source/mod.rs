//! Input-side structures produced by external format parsers.
//!
//! The conversion core never reads files. An external parser (out of scope
//! here) decodes the model header/bone file, the global vertex file, and the
//! per-LOD strip file, then hands this crate one [`SourceAsset`] combining
//! all three. The three files address vertices differently: the vertex file
//! is a single global buffer, strip indices are mesh-local, and flex indices
//! are keyed to the un-trimmed sub-model window. Reconciling those spaces is
//! the whole job of the `convert` module.

pub mod chunks;

use bon::Builder;

use crate::math::Vec3;
use crate::vertex::VertexBuffer;

pub use chunks::{
    BodyPartDescriptor, FlexAnimationType, FlexRecord, LodDescriptor, MeshChunk, StripGroup,
    SubModelDescriptor, VertexAnimation,
};

/// Four-byte magic identifying the source container format.
pub type FormatIdent = [u8; 4];

/// The studio model magic this crate's default converters handle.
pub const STUDIO_IDENT: FormatIdent = *b"IDST";

/// A flat bone record as stored in the source header.
///
/// `parent` is `-1` for roots; the format guarantees parents precede
/// children in index order, but the skeleton builder verifies this rather
/// than assuming it.
#[derive(Debug, Clone, Builder)]
pub struct SourceBone {
    #[builder(into)]
    pub name: String,
    #[builder(default = -1)]
    pub parent: i32,
    #[builder(default = [0.0; 3])]
    pub translation: Vec3,
    #[builder(default = crate::math::QUAT_IDENTITY)]
    pub rotation: crate::math::Quat,
}

/// An attachment point record. The transform arrives as a row-major 3x4
/// matrix relative to the parent bone; the orchestrator decomposes it.
#[derive(Debug, Clone, Builder)]
pub struct SourceAttachment {
    #[builder(into)]
    pub name: String,
    pub parent_bone: i32,
    #[builder(default = [
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
    ])]
    pub matrix: [f32; 12],
}

/// Everything the conversion core needs for one asset, already parsed.
#[derive(Debug, Clone, Builder)]
pub struct SourceAsset {
    #[builder(into)]
    pub name: String,
    #[builder(default = STUDIO_IDENT)]
    pub ident: FormatIdent,
    #[builder(default = 49)]
    pub version: u32,
    /// Static props carry no skeleton; skeleton construction is skipped.
    #[builder(default)]
    pub static_prop: bool,
    #[builder(default)]
    pub bones: Vec<SourceBone>,
    #[builder(default)]
    pub attachments: Vec<SourceAttachment>,
    /// Flex-name string table; flex records reference it by index.
    #[builder(default)]
    pub flex_names: Vec<String>,
    /// Material names in source order. The strip material index resolves
    /// into this list.
    #[builder(default)]
    pub materials: Vec<String>,
    /// Content-relative directories to search when resolving materials.
    #[builder(default)]
    pub material_search_paths: Vec<String>,
    /// The full global per-vertex buffer shared by every sub-model.
    #[builder(default)]
    pub vertices: VertexBuffer,
    #[builder(default)]
    pub body_parts: Vec<BodyPartDescriptor>,
}

impl SourceAsset {
    /// True if any mesh chunk anywhere contributes flex data.
    pub fn has_flex_records(&self) -> bool {
        self.body_parts
            .iter()
            .flat_map(|bp| &bp.sub_models)
            .flat_map(|sm| &sm.lods)
            .flat_map(|lod| &lod.chunks)
            .any(|chunk| !chunk.flex_records.is_empty())
    }
}
