//! Strip/triangle assembly: mesh-local indices to sub-model space.

use crate::model::Strip;
use crate::source::MeshChunk;

/// Rebase each chunk's strip-group indices by its `vertex_index_start` and
/// group the flat index array by the chunk's material index.
///
/// Strip groups concatenate in source order within a chunk; chunks stay
/// separate entries even when they share a material, and triangles are
/// never deduplicated. Chunks contributing no indices emit nothing.
pub fn assemble_strips(chunks: &[MeshChunk]) -> Vec<Strip> {
    let mut strips = Vec::new();
    for chunk in chunks {
        let indices: Vec<u32> = chunk
            .strip_groups
            .iter()
            .flat_map(|group| group.indices.iter().map(|&i| i + chunk.vertex_index_start))
            .collect();
        if indices.is_empty() {
            continue;
        }
        strips.push(Strip {
            material_index: chunk.material_index,
            indices,
        });
    }
    strips
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MeshChunk, StripGroup};

    #[test]
    fn test_offsets_applied_per_chunk() {
        let chunks = vec![
            MeshChunk::builder()
                .material_index(0)
                .vertex_index_start(0)
                .strip_groups(vec![StripGroup {
                    indices: vec![0, 1, 2],
                }])
                .build(),
            MeshChunk::builder()
                .material_index(2)
                .vertex_index_start(10)
                .strip_groups(vec![
                    StripGroup {
                        indices: vec![0, 1, 2],
                    },
                    StripGroup {
                        indices: vec![2, 3, 0],
                    },
                ])
                .build(),
        ];

        let strips = assemble_strips(&chunks);
        assert_eq!(strips.len(), 2);
        assert_eq!(strips[0].material_index, 0);
        assert_eq!(strips[0].indices, vec![0, 1, 2]);
        // Groups concatenate in source order, all rebased by +10.
        assert_eq!(strips[1].material_index, 2);
        assert_eq!(strips[1].indices, vec![10, 11, 12, 12, 13, 10]);
    }

    #[test]
    fn test_empty_chunk_emits_nothing() {
        let chunks = vec![
            MeshChunk::builder().material_index(1).build(),
            MeshChunk::builder()
                .material_index(3)
                .vertex_index_start(4)
                .strip_groups(vec![StripGroup {
                    indices: vec![1, 0, 2],
                }])
                .build(),
        ];
        let strips = assemble_strips(&chunks);
        assert_eq!(strips.len(), 1);
        assert_eq!(strips[0].material_index, 3);
        assert_eq!(strips[0].indices, vec![5, 4, 6]);
    }

    #[test]
    fn test_same_material_chunks_stay_separate() {
        let chunk = |start: u32| {
            MeshChunk::builder()
                .material_index(7)
                .vertex_index_start(start)
                .strip_groups(vec![StripGroup {
                    indices: vec![0, 1, 2],
                }])
                .build()
        };
        let strips = assemble_strips(&[chunk(0), chunk(3)]);
        assert_eq!(strips.len(), 2);
        assert_eq!(strips[1].indices, vec![3, 4, 5]);
    }
}
