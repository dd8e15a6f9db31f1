//! The mesh assembly pipeline.
//!
//! Per body part, per sub-model, per LOD: slice the global vertex buffer,
//! rebase strip indices into sub-model space, collect morph deltas into the
//! same space, then compact everything into a dense per-LOD vertex space.
//! A failure anywhere aborts the whole asset; only material resolution
//! misses are non-fatal.

pub mod compact;
pub mod flexes;
pub mod registry;
pub mod strips;

use tracing::{debug, warn};

use crate::content::ContentResolver;
use crate::error::{ConvertError, ConvertResult, Warning};
use crate::math::decompose_matrix;
use crate::model::{
    Attachment, AttachmentParent, BodyGroup, Lod, LoddedSubModel, Material, Mesh, Model, SubModel,
    skeleton::build_skeleton,
};
use crate::source::{BodyPartDescriptor, SourceAsset, SubModelDescriptor};

pub use compact::compact_lod;
pub use flexes::{StereoNaming, collect_shape_keys, strip_stereo_suffix};
pub use registry::{ConvertFn, ConverterRegistry, ConverterTag};
pub use strips::assemble_strips;

/// A completed whole-asset conversion: the model plus any non-fatal
/// diagnostics accumulated along the way.
#[derive(Debug)]
pub struct Conversion {
    pub model: Model,
    pub warnings: Vec<Warning>,
}

/// Convert a parsed source asset using the default stereo naming
/// convention.
pub fn convert_asset(
    asset: &SourceAsset,
    resolver: &dyn ContentResolver,
) -> ConvertResult<Conversion> {
    convert_asset_with(asset, resolver, strip_stereo_suffix)
}

/// Convert with an explicit stereo naming convention (per-title override
/// point; see [`strip_stereo_suffix`]).
pub fn convert_asset_with(
    asset: &SourceAsset,
    resolver: &dyn ContentResolver,
    stereo_naming: StereoNaming,
) -> ConvertResult<Conversion> {
    asset.vertices.check_consistent()?;

    let skeleton = if asset.static_prop {
        debug!(asset = %asset.name, "static prop, skipping skeleton");
        None
    } else {
        Some(build_skeleton(&asset.bones)?)
    };

    let (materials, warnings) = collect_materials(asset, resolver);
    let attachments = convert_attachments(asset)?;

    let mut body_groups = Vec::with_capacity(asset.body_parts.len());
    for body_part in &asset.body_parts {
        body_groups.push(BodyGroup {
            name: sanitize_name(&body_part.name),
            choices: convert_choices(asset, body_part, stereo_naming)?,
        });
    }

    let model = Model {
        name: sanitize_name(&asset.name),
        skeleton,
        materials,
        body_groups,
        attachments,
        has_morph_targets: asset.has_flex_records(),
    };
    debug!(
        model = %model.name,
        body_groups = model.body_groups.len(),
        materials = model.materials.len(),
        "assembled model"
    );
    Ok(Conversion { model, warnings })
}

/// Convert every sub-model choice of one body part, preserving source
/// order. Each sub-model operates on its own slice copy, so the `rayon`
/// feature fans them out; ordered collect keeps choice indices stable.
fn convert_choices(
    asset: &SourceAsset,
    body_part: &BodyPartDescriptor,
    stereo_naming: StereoNaming,
) -> Result<Vec<SubModel>, ConvertError> {
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        body_part
            .sub_models
            .par_iter()
            .map(|sub| convert_sub_model(asset, sub, stereo_naming))
            .collect()
    }
    #[cfg(not(feature = "rayon"))]
    {
        body_part
            .sub_models
            .iter()
            .map(|sub| convert_sub_model(asset, sub, stereo_naming))
            .collect()
    }
}

fn convert_sub_model(
    asset: &SourceAsset,
    sub: &SubModelDescriptor,
    stereo_naming: StereoNaming,
) -> Result<SubModel, ConvertError> {
    if sub.vertex_count == 0 {
        // Placeholder choice; keeps selection parity with the source.
        return Ok(SubModel::Null);
    }

    let name = sanitize_name(&sub.name);
    debug!(sub_model = %name, lods = sub.lods.len(), "assembling sub-model");

    let mut lods = Vec::with_capacity(sub.lods.len());
    for lod in &sub.lods {
        let vertices = asset
            .vertices
            .slice(sub.vertex_offset as usize, sub.vertex_count as usize)?;
        let strips = assemble_strips(&lod.chunks);
        let shape_keys = collect_shape_keys(&lod.chunks, &asset.flex_names, stereo_naming)?;
        let (strips, vertices, shape_keys) = compact_lod(strips, vertices, shape_keys)?;
        lods.push(Lod {
            switch_point: lod.switch_point,
            mesh: Mesh {
                name: name.clone(),
                strips,
                vertices,
                shape_keys,
            },
        });
    }

    Ok(SubModel::Lodded(LoddedSubModel { name, lods }))
}

/// Resolve every material against the asset's search paths.
///
/// A miss is recorded once per material as a warning; the material entry
/// stays in place with no content so strip material indices keep resolving.
fn collect_materials(
    asset: &SourceAsset,
    resolver: &dyn ContentResolver,
) -> (Vec<Material>, Vec<Warning>) {
    let mut materials = Vec::with_capacity(asset.materials.len());
    let mut warnings = Vec::new();

    for raw_name in &asset.materials {
        let name = sanitize_name(raw_name);
        let mut resolved = None;
        for search_path in &asset.material_search_paths {
            let candidate = normalize_path(&format!("{search_path}/{raw_name}"));
            if let Some(content) = resolver.find_material(&candidate) {
                resolved = Some((normalize_path(&format!("materials/{candidate}")), content));
                break;
            }
        }
        match resolved {
            Some((path, content)) => materials.push(Material {
                name,
                path,
                content: Some(content),
            }),
            None => {
                warn!(material = %name, "could not resolve material");
                warnings.push(Warning::UnresolvedMaterial { name: name.clone() });
                materials.push(Material {
                    name: name.clone(),
                    path: name,
                    content: None,
                });
            }
        }
    }

    (materials, warnings)
}

fn convert_attachments(asset: &SourceAsset) -> Result<Vec<Attachment>, ConvertError> {
    asset
        .attachments
        .iter()
        .map(|att| {
            let bone = usize::try_from(att.parent_bone)
                .ok()
                .and_then(|i| asset.bones.get(i))
                .ok_or_else(|| ConvertError::AttachmentBoneOutOfRange {
                    name: att.name.clone(),
                    bone: att.parent_bone,
                    len: asset.bones.len(),
                })?;
            let (rotation, translation, _scale) = decompose_matrix(&att.matrix);
            Ok(Attachment {
                name: att.name.clone(),
                parent_kind: AttachmentParent::SingleBone,
                parent_bone: bone.name.clone(),
                translation,
                rotation,
            })
        })
        .collect()
}

/// Lower-case the path stem and underscore the separators, the way the
/// destination tooling expects mesh and material names.
pub(crate) fn sanitize_name(name: &str) -> String {
    let leaf = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let stem = match leaf.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => leaf,
    };
    stem.to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' | '-' | '.' => Some('_'),
            '[' | ']' => None,
            c => Some(c),
        })
        .collect()
}

/// Lower-case a content-relative path, underscore spaces/dashes, forward
/// slashes only, no leading or trailing separators.
pub(crate) fn normalize_path(path: &str) -> String {
    path.to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            '\\' => '/',
            c => c,
        })
        .collect::<String>()
        .trim_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{MemoryResolver, NullResolver};
    use crate::source::{
        FlexRecord, LodDescriptor, MeshChunk, SourceAttachment, SourceBone, StripGroup,
        SubModelDescriptor, VertexAnimation,
    };
    use crate::vertex::VertexBuffer;

    fn vertices_of(count: usize) -> VertexBuffer {
        let mut buffer = VertexBuffer::with_capacity(count);
        for i in 0..count {
            let f = i as f32;
            buffer.push([f, f, f], [0.0, 0.0, 1.0], [f, f], [1.0, 0.0, 0.0], [0, 0, 0]);
        }
        buffer
    }

    fn quad_chunk(material_index: u32) -> MeshChunk {
        MeshChunk::builder()
            .material_index(material_index)
            .strip_groups(vec![StripGroup {
                indices: vec![0, 1, 2, 0, 2, 3],
            }])
            .build()
    }

    /// One body part, one 8-vertex sub-model with two LODs, one blank
    /// choice; a flex on LOD 0.
    fn fixture_asset() -> SourceAsset {
        let flex = FlexRecord::builder()
            .flex_desc_index(0)
            .partner_index(1)
            .animations(vec![VertexAnimation {
                index: 1,
                position_delta: [0.0, 0.0, 2.0],
                normal_delta: [0.0, 0.0, 0.0],
                wrinkle_delta: 0.0,
            }])
            .build();

        let lod0 = LodDescriptor::builder()
            .switch_point(20.0)
            .chunks(vec![
                MeshChunk::builder()
                    .material_index(0)
                    .strip_groups(vec![StripGroup {
                        indices: vec![0, 1, 2, 0, 2, 3],
                    }])
                    .flex_records(vec![flex])
                    .build(),
                MeshChunk::builder()
                    .material_index(1)
                    .vertex_index_start(4)
                    .strip_groups(vec![StripGroup {
                        indices: vec![0, 1, 2, 0, 2, 3],
                    }])
                    .build(),
            ])
            .build();
        let lod1 = LodDescriptor::builder()
            .switch_point(crate::model::LOD_SWITCH_NEVER)
            .chunks(vec![quad_chunk(0)])
            .build();

        SourceAsset::builder()
            .name("models/props/Crate Box-01.mdl")
            .bones(vec![
                SourceBone::builder().name("static_prop").build(),
                SourceBone::builder().name("lid").parent(0).build(),
            ])
            .flex_names(vec!["CrateFlexL".to_string()])
            .materials(vec!["crate01".to_string(), "crate02".to_string()])
            .material_search_paths(vec!["models/props".to_string()])
            .vertices(vertices_of(8))
            .body_parts(vec![
                BodyPartDescriptor::builder()
                    .name("Body")
                    .sub_models(vec![
                        SubModelDescriptor::builder()
                            .name("crate_full")
                            .vertex_offset(0)
                            .vertex_count(8)
                            .lods(vec![lod0, lod1])
                            .build(),
                        SubModelDescriptor::builder().name("blank").build(),
                    ])
                    .build(),
            ])
            .build()
    }

    #[test]
    fn test_end_to_end_assembly() {
        let mut resolver = MemoryResolver::new();
        resolver.insert("models/props/crate01", b"shader data");

        let conversion = convert_asset(&fixture_asset(), &resolver).unwrap();
        let model = &conversion.model;

        assert_eq!(model.name, "crate_box_01");
        assert!(model.has_morph_targets);
        assert_eq!(model.skeleton.as_ref().unwrap().bones.len(), 2);

        // crate01 resolved; crate02 missed and warned, once per asset.
        assert!(model.materials[0].content.is_some());
        assert_eq!(model.materials[0].path, "materials/models/props/crate01");
        assert!(model.materials[1].content.is_none());
        assert_eq!(
            conversion.warnings,
            vec![Warning::UnresolvedMaterial {
                name: "crate02".to_string()
            }]
        );

        let group = &model.body_groups[0];
        assert_eq!(group.name, "body");
        assert_eq!(group.choices.len(), 2);
        assert!(group.choices[1].is_null());

        let lods = &group.choices[0].clone().lodded().unwrap().lods;
        assert_eq!(lods.len(), 2);

        // LOD 0 references all 8 vertices across two materials.
        let mesh0 = &lods[0].mesh;
        assert_eq!(mesh0.vertices.len(), 8);
        assert_eq!(mesh0.strips.len(), 2);
        assert_eq!(mesh0.strips[1].material_index, 1);
        assert_eq!(mesh0.strips[1].indices, vec![4, 5, 6, 4, 6, 7]);
        assert_eq!(mesh0.shape_keys.len(), 1);
        assert_eq!(mesh0.shape_keys[0].name, "CrateFlex");
        assert!(mesh0.shape_keys[0].stereo);
        assert_eq!(mesh0.shape_keys[0].indices, vec![1]);

        // LOD 1 drops to the first quad and compacts to 4 vertices; it has
        // no flex contributions.
        let mesh1 = &lods[1].mesh;
        assert_eq!(mesh1.vertices.len(), 4);
        assert_eq!(mesh1.strips[0].indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(mesh1.shape_keys.is_empty());
        assert!(lods[1].is_always_visible());

        // Index soundness: every strip index addresses the compacted buffer.
        for lod in lods {
            for strip in &lod.mesh.strips {
                for &index in &strip.indices {
                    assert!((index as usize) < lod.mesh.vertices.len());
                }
            }
        }
    }

    #[test]
    fn test_static_prop_skips_skeleton() {
        let mut asset = fixture_asset();
        asset.static_prop = true;
        let conversion = convert_asset(&asset, &NullResolver).unwrap();
        assert!(conversion.model.skeleton.is_none());
    }

    #[test]
    fn test_attachment_decomposition() {
        let mut asset = fixture_asset();
        asset.attachments = vec![
            SourceAttachment::builder()
                .name("eyes")
                .parent_bone(1)
                .matrix([
                    1.0, 0.0, 0.0, 4.0, //
                    0.0, 1.0, 0.0, 5.0, //
                    0.0, 0.0, 1.0, 6.0,
                ])
                .build(),
        ];
        let conversion = convert_asset(&asset, &NullResolver).unwrap();
        let attachment = &conversion.model.attachments[0];
        assert_eq!(attachment.parent_bone, "lid");
        assert_eq!(attachment.parent_kind, AttachmentParent::SingleBone);
        assert_eq!(attachment.translation, [4.0, 5.0, 6.0]);
        assert_eq!(attachment.rotation_euler(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_attachment_bad_bone_aborts() {
        let mut asset = fixture_asset();
        asset.attachments = vec![
            SourceAttachment::builder()
                .name("broken")
                .parent_bone(9)
                .build(),
        ];
        assert!(convert_asset(&asset, &NullResolver).is_err());
    }

    #[test]
    fn test_bad_slice_aborts_whole_asset() {
        let mut asset = fixture_asset();
        asset.body_parts[0].sub_models[0].vertex_count = 16;
        assert!(convert_asset(&asset, &NullResolver).is_err());
    }

    #[test]
    fn test_registry_end_to_end() {
        let registry = ConverterRegistry::with_default_converters();
        let asset = fixture_asset();
        let conversion = registry
            .convert(&asset, &NullResolver, None)
            .expect("studio v49 converter registered")
            .unwrap();
        assert_eq!(conversion.model.body_groups.len(), 1);

        let mut unknown = fixture_asset();
        unknown.version = 12;
        assert!(registry.convert(&unknown, &NullResolver, None).is_none());
    }

    #[test]
    fn test_name_sanitation() {
        assert_eq!(sanitize_name("models/props/Crate Box-01.mdl"), "crate_box_01");
        assert_eq!(sanitize_name("Gman.HeadRig"), "gman");
        assert_eq!(sanitize_name("arm[left]"), "armleft");
        assert_eq!(normalize_path("Materials\\Models/Props-c "), "materials/models/props_c_");
    }
}
