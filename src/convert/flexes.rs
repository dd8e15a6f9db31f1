//! Morph delta collection: per-chunk flex records into named shape keys.

use tracing::debug;

use crate::error::ConvertError;
use crate::model::ShapeKey;
use crate::source::{FlexAnimationType, MeshChunk};

/// Maps a stereo flex name to the logical base name shared by both halves
/// of a mirrored pair.
///
/// Swappable so a per-title override never touches the compaction
/// algorithm.
pub type StereoNaming = fn(&str) -> String;

/// Default convention: stereo pairs share a base name with a one-character
/// suffix, so the base name is the flex name minus its last character.
///
/// This is inferred from observed assets, not guaranteed by the format;
/// names that break the convention merge incorrectly. The debug assert
/// flags unexpected suffixes without aborting release conversions.
pub fn strip_stereo_suffix(name: &str) -> String {
    let mut base = name.to_owned();
    let suffix = base.pop();
    debug_assert!(
        matches!(suffix, Some('L') | Some('R')),
        "unexpected stereo suffix on flex \"{name}\""
    );
    base
}

/// Accumulate every chunk's flex records into shape keys, keyed by logical
/// name and kept in first-contribution order.
///
/// Indices are rebased by the owning chunk's `vertex_index_start` into
/// sub-model space, matching strip assembly. Contributions to an existing
/// name append; nothing is merged or deduplicated. When any contributor
/// carries a wrinkle channel the key grows one, zero-padded across entries
/// from contributors that did not.
pub fn collect_shape_keys(
    chunks: &[MeshChunk],
    flex_names: &[String],
    stereo_naming: StereoNaming,
) -> Result<Vec<ShapeKey>, ConvertError> {
    let mut keys: Vec<ShapeKey> = Vec::new();

    for chunk in chunks {
        for record in &chunk.flex_records {
            let raw_name = flex_names.get(record.flex_desc_index as usize).ok_or(
                ConvertError::FlexNameOutOfRange {
                    index: record.flex_desc_index,
                    len: flex_names.len(),
                },
            )?;
            let stereo = record.partner_index != 0;
            let name = if stereo {
                stereo_naming(raw_name)
            } else {
                raw_name.clone()
            };

            let slot = match keys.iter().position(|key| key.name == name) {
                Some(slot) => slot,
                None => {
                    debug!(flex = %name, stereo, "new shape key");
                    keys.push(ShapeKey::new(name, stereo));
                    keys.len() - 1
                }
            };
            let key = &mut keys[slot];
            key.stereo |= stereo;

            let wrinkle = record.animation_type == FlexAnimationType::Wrinkle;
            if wrinkle && key.wrinkle_deltas.is_none() {
                // Backfill entries appended before the channel appeared.
                key.wrinkle_deltas = Some(vec![0.0; key.indices.len()]);
            }

            for anim in &record.animations {
                key.indices.push(anim.index + chunk.vertex_index_start);
                key.position_deltas.push(anim.position_delta);
                key.normal_deltas.push(anim.normal_delta);
                if let Some(wrinkles) = key.wrinkle_deltas.as_mut() {
                    wrinkles.push(if wrinkle { anim.wrinkle_delta } else { 0.0 });
                }
            }
        }
    }

    Ok(keys)
}
