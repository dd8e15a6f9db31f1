//! Engine-agnostic output model graph.
//!
//! A `Model` exclusively owns everything it contains; nothing is shared
//! across two models. Ordering is a correctness requirement throughout:
//! material indices in strips resolve into `materials` by position, and
//! body-group choice indices must match the source's sub-model order.

pub mod shape_key;
pub mod skeleton;

use std::collections::HashMap;

use variantly::Variantly;

use crate::content::MaterialData;
use crate::vertex::VertexBuffer;

pub use shape_key::ShapeKey;
pub use skeleton::{Attachment, AttachmentParent, Bone, Skeleton};

/// Switch points at or above this mean "always visible, no further LOD".
pub const LOD_SWITCH_NEVER: f32 = 1e30;

/// A batch of triangle-list indices sharing one material within a mesh.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Strip {
    /// Position in the model's material list; resolved to a name by the
    /// serializer via [`Model::material_index_map`].
    pub material_index: u32,
    pub indices: Vec<u32>,
}

/// One sub-model at one LOD: strips, the compacted vertex buffer they
/// index, and the shape keys finalized for that buffer.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mesh {
    pub name: String,
    pub strips: Vec<Strip>,
    pub vertices: VertexBuffer,
    pub shape_keys: Vec<ShapeKey>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lod {
    pub switch_point: f32,
    pub mesh: Mesh,
}

impl Lod {
    pub fn is_always_visible(&self) -> bool {
        self.switch_point >= LOD_SWITCH_NEVER
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoddedSubModel {
    pub name: String,
    /// Finest detail first.
    pub lods: Vec<Lod>,
}

/// One selectable choice within a body group.
#[derive(Debug, Clone, Variantly)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SubModel {
    /// Placeholder for an empty choice; carries no geometry but still
    /// occupies its selection slot.
    Null,
    Lodded(LoddedSubModel),
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyGroup {
    pub name: String,
    pub choices: Vec<SubModel>,
}

/// A material binding. `content` is shared with the external content
/// resolver's cache, not copied; `None` when resolution failed (surfaced
/// separately as a warning).
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    /// Resolved source-relative path, or the bare name when unresolved.
    pub path: String,
    pub content: Option<MaterialData>,
}

#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    /// Absent for static props.
    pub skeleton: Option<Skeleton>,
    pub materials: Vec<Material>,
    pub body_groups: Vec<BodyGroup>,
    pub attachments: Vec<Attachment>,
    pub has_morph_targets: bool,
}

impl Model {
    /// Material name -> list position, used by serializers to turn strip
    /// material indices into their own binding syntax.
    pub fn material_index_map(&self) -> HashMap<String, usize> {
        self.materials
            .iter()
            .enumerate()
            .map(|(i, mat)| (mat.name.clone(), i))
            .collect()
    }
}
