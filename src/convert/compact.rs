//! LOD compaction: rewrite one LOD's triangles, vertex attributes, and
//! shape keys into a dense local vertex space.
//!
//! A LOD that drops detail references only a subset of the sub-model's
//! vertex window. Exporting the full window per LOD would ship oversized,
//! partially-unused vertex buffers, so the used set is computed from the
//! triangles alone and everything else is remapped through it.

use itertools::Itertools;
use tracing::debug;

use crate::error::ConvertError;
use crate::model::{ShapeKey, Strip};
use crate::vertex::VertexBuffer;

/// Sentinel for vertex-map slots no triangle references.
const UNMAPPED: u32 = u32::MAX;

/// Compact one LOD.
///
/// 1. Collect the distinct vertex indices referenced by any strip.
/// 2. Build an old->new map; new indices are dense, ascending-old order.
/// 3. Rewrite every strip through the map.
/// 4. Gather the attribute rows at the used positions.
/// 5. Filter each shape key to surviving entries and remap them; keys that
///    end up empty are kept, not dropped.
///
/// Shape-key data referencing vertices outside the used set is discarded
/// even if those rows exist in `vertices`; only triangles define the set.
pub fn compact_lod(
    strips: Vec<Strip>,
    vertices: VertexBuffer,
    shape_keys: Vec<ShapeKey>,
) -> Result<(Vec<Strip>, VertexBuffer, Vec<ShapeKey>), ConvertError> {
    let used: Vec<u32> = strips
        .iter()
        .flat_map(|strip| strip.indices.iter().copied())
        .sorted_unstable()
        .dedup()
        .collect();

    if let Some(&max) = used.last()
        && max as usize >= vertices.len()
    {
        return Err(ConvertError::VertexIndexOutOfRange {
            index: max,
            len: vertices.len(),
        });
    }

    let mut map = vec![UNMAPPED; used.last().map_or(0, |&max| max as usize + 1)];
    for (new, &old) in used.iter().enumerate() {
        map[old as usize] = new as u32;
    }

    let strips = remap_strips(strips, &map)?;
    let vertices = vertices.gather(&used)?;
    let shape_keys = shape_keys
        .into_iter()
        .map(|key| remap_shape_key(key, &map))
        .collect();

    debug!(used = used.len(), "compacted lod vertex buffer");
    Ok((strips, vertices, shape_keys))
}

/// Substitute new indices into every strip.
///
/// A reference to an unmapped slot cannot occur when the map was built from
/// these same strips; hitting one means the index bookkeeping broke, and
/// silently patching it would emit corrupt geometry.
fn remap_strips(strips: Vec<Strip>, map: &[u32]) -> Result<Vec<Strip>, ConvertError> {
    strips
        .into_iter()
        .map(|strip| {
            let indices = strip
                .indices
                .into_iter()
                .map(|old| match map.get(old as usize) {
                    Some(&new) if new != UNMAPPED => Ok(new),
                    _ => Err(ConvertError::UnmappedVertex { index: old }),
                })
                .collect::<Result<Vec<u32>, _>>()?;
            Ok(Strip {
                material_index: strip.material_index,
                indices,
            })
        })
        .collect()
}

/// Drop shape-key entries outside the used set and remap the survivors.
fn remap_shape_key(key: ShapeKey, map: &[u32]) -> ShapeKey {
    let keep: Vec<bool> = key
        .indices
        .iter()
        .map(|&old| map.get(old as usize).is_some_and(|&new| new != UNMAPPED))
        .collect();

    let filter = |iter: std::vec::IntoIter<_>| -> Vec<_> {
        iter.zip(&keep)
            .filter_map(|(value, &kept)| kept.then_some(value))
            .collect()
    };

    ShapeKey {
        name: key.name,
        stereo: key.stereo,
        indices: key
            .indices
            .into_iter()
            .zip(&keep)
            .filter_map(|(old, &kept)| kept.then(|| map[old as usize]))
            .collect(),
        position_deltas: filter(key.position_deltas.into_iter()),
        normal_deltas: filter(key.normal_deltas.into_iter()),
        wrinkle_deltas: key
            .wrinkle_deltas
            .map(|wrinkles| {
                wrinkles
                    .into_iter()
                    .zip(&keep)
                    .filter_map(|(value, &kept)| kept.then_some(value))
                    .collect()
            }),
    }
}
