//! Bind skeleton and attachment points.

use std::collections::HashMap;

use crate::error::ConvertError;
use crate::math::{self, Quat, Vec3};
use crate::source::SourceBone;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bone {
    pub name: String,
    /// Name-based weak reference; `None` for roots. The builder guarantees
    /// the parent appears earlier in the skeleton's bone list.
    pub parent: Option<String>,
    pub translation: Vec3,
    pub rotation: Quat,
}

/// Ordered bone table, insertion order = definition order from source.
/// Parents always precede children.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skeleton {
    pub bones: Vec<Bone>,
}

impl Skeleton {
    pub fn bone_by_name(&self, name: &str) -> Option<&Bone> {
        self.bones.iter().find(|bone| bone.name == name)
    }

    /// Compose world-space (translation, rotation) for every bone.
    ///
    /// A single forward pass over the definition order; no recursion, so
    /// deep rigs cannot overflow the stack. Relies on the builder's
    /// parents-before-children guarantee.
    pub fn world_transforms(&self) -> Vec<(Vec3, Quat)> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(self.bones.len());
        let mut out: Vec<(Vec3, Quat)> = Vec::with_capacity(self.bones.len());
        for (i, bone) in self.bones.iter().enumerate() {
            let local = (bone.translation, bone.rotation);
            let world = match bone.parent.as_deref().and_then(|p| index.get(p)) {
                Some(&pi) => {
                    let (pt, pr) = out[pi];
                    (
                        math::vec3_add(pt, math::quat_rotate(pr, local.0)),
                        math::quat_mul(pr, local.1),
                    )
                }
                None => local,
            };
            out.push(world);
            index.insert(bone.name.as_str(), i);
        }
        out
    }
}

/// Build a validated skeleton from the flat source bone list.
///
/// Fails with a structural error on any parent index that is out of range
/// or not strictly prior to its child (forward, self, or cyclic reference).
/// Only `-1` means "no parent"; other negatives indicate a corrupt table.
pub fn build_skeleton(bones: &[SourceBone]) -> Result<Skeleton, ConvertError> {
    let mut skeleton = Skeleton {
        bones: Vec::with_capacity(bones.len()),
    };
    for (index, bone) in bones.iter().enumerate() {
        let parent = match bone.parent {
            -1 => None,
            p if p >= 0 && (p as usize) < index => Some(bones[p as usize].name.clone()),
            p => {
                return Err(ConvertError::InvalidBoneParent {
                    index,
                    name: bone.name.clone(),
                    parent: p,
                });
            }
        };
        skeleton.bones.push(Bone {
            name: bone.name.clone(),
            parent,
            translation: bone.translation,
            rotation: bone.rotation,
        });
    }
    Ok(skeleton)
}

/// Reserved for future multi-bone attachments; only single-bone exists in
/// the source format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttachmentParent {
    SingleBone,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attachment {
    pub name: String,
    pub parent_kind: AttachmentParent,
    pub parent_bone: String,
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Attachment {
    /// Rotation as `[yaw, pitch, roll]` radians, for serializers that want
    /// angles instead of a quaternion.
    pub fn rotation_euler(&self) -> Vec3 {
        math::quat_to_euler(self.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::QUAT_IDENTITY;

    fn bone(name: &str, parent: i32) -> SourceBone {
        SourceBone::builder().name(name).parent(parent).build()
    }

    #[test]
    fn test_build_links_parents_by_name() {
        let skeleton =
            build_skeleton(&[bone("pelvis", -1), bone("spine", 0), bone("head", 1)]).unwrap();
        assert_eq!(skeleton.bones.len(), 3);
        assert_eq!(skeleton.bones[0].parent, None);
        assert_eq!(skeleton.bones[1].parent.as_deref(), Some("pelvis"));
        assert_eq!(skeleton.bones[2].parent.as_deref(), Some("spine"));
        assert!(skeleton.bone_by_name("spine").is_some());
    }

    #[test]
    fn test_self_reference_fails() {
        let err = build_skeleton(&[bone("root", 0)]).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::InvalidBoneParent {
                index: 0,
                parent: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_forward_reference_fails() {
        let err = build_skeleton(&[bone("a", 1), bone("b", -1)]).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidBoneParent { .. }));
    }

    #[test]
    fn test_out_of_range_parent_fails() {
        let err = build_skeleton(&[bone("a", -1), bone("b", 5)]).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::InvalidBoneParent { parent: 5, .. }
        ));
        let err = build_skeleton(&[bone("a", -1), bone("b", -2)]).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::InvalidBoneParent { parent: -2, .. }
        ));
    }

    #[test]
    fn test_world_transforms_accumulate() {
        let mut root = bone("root", -1);
        root.translation = [0.0, 0.0, 10.0];
        let mut child = bone("child", 0);
        child.translation = [1.0, 0.0, 0.0];
        let skeleton = build_skeleton(&[root, child]).unwrap();

        let world = skeleton.world_transforms();
        assert_eq!(world[0].0, [0.0, 0.0, 10.0]);
        assert_eq!(world[1].0, [1.0, 0.0, 10.0]);
        assert_eq!(world[1].1, QUAT_IDENTITY);
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let mut bones = vec![bone("b0", -1)];
        for i in 1..100_000 {
            let mut b = bone(&format!("b{i}"), (i - 1) as i32);
            b.translation = [0.0, 0.0, 1.0];
            bones.push(b);
        }
        let skeleton = build_skeleton(&bones).unwrap();
        let world = skeleton.world_transforms();
        assert_eq!(world.last().unwrap().0[2], 99_999.0);
    }
}
