//! Parallel per-vertex attribute arrays.
//!
//! One `VertexBuffer` holds the attributes for a single vertex space: the
//! full global buffer, a sub-model slice of it, or a LOD-compacted buffer.
//! All arrays are indexed by the same vertex index; the array length is the
//! authoritative vertex count for that space.

use crate::error::ConvertError;
use crate::math::{Vec2, Vec3};

/// Maximum number of bone influences per vertex in the source format.
pub const MAX_BLEND_BONES: usize = 3;

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexBuffer {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub blend_weights: Vec<[f32; MAX_BLEND_BONES]>,
    pub blend_indices: Vec<[u8; MAX_BLEND_BONES]>,
}

impl VertexBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            normals: Vec::with_capacity(capacity),
            uvs: Vec::with_capacity(capacity),
            blend_weights: Vec::with_capacity(capacity),
            blend_indices: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn push(
        &mut self,
        position: Vec3,
        normal: Vec3,
        uv: Vec2,
        blend_weights: [f32; MAX_BLEND_BONES],
        blend_indices: [u8; MAX_BLEND_BONES],
    ) {
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
        self.blend_weights.push(blend_weights);
        self.blend_indices.push(blend_indices);
    }

    /// Verify the parallel-array invariant.
    pub fn check_consistent(&self) -> Result<(), ConvertError> {
        let n = self.positions.len();
        if self.normals.len() != n
            || self.uvs.len() != n
            || self.blend_weights.len() != n
            || self.blend_indices.len() != n
        {
            return Err(ConvertError::AttributeLengthMismatch {
                detail: format!(
                    "positions={} normals={} uvs={} weights={} bone_ids={}",
                    n,
                    self.normals.len(),
                    self.uvs.len(),
                    self.blend_weights.len(),
                    self.blend_indices.len(),
                ),
            });
        }
        Ok(())
    }

    /// Copy out the contiguous sub-range `[offset, offset + count)`.
    ///
    /// Always a copy, never a view: the LOD compactor rebuilds the slice in
    /// place and must not alias the global buffer.
    pub fn slice(&self, offset: usize, count: usize) -> Result<VertexBuffer, ConvertError> {
        self.check_consistent()?;
        let end = offset
            .checked_add(count)
            .filter(|&end| end <= self.len())
            .ok_or(ConvertError::SliceOutOfRange {
                offset,
                count,
                len: self.len(),
            })?;
        Ok(VertexBuffer {
            positions: self.positions[offset..end].to_vec(),
            normals: self.normals[offset..end].to_vec(),
            uvs: self.uvs[offset..end].to_vec(),
            blend_weights: self.blend_weights[offset..end].to_vec(),
            blend_indices: self.blend_indices[offset..end].to_vec(),
        })
    }

    /// Gather rows at the given indices, in the given order.
    pub fn gather(&self, indices: &[u32]) -> Result<VertexBuffer, ConvertError> {
        let mut out = VertexBuffer::with_capacity(indices.len());
        for &index in indices {
            let i = index as usize;
            if i >= self.len() {
                return Err(ConvertError::VertexIndexOutOfRange {
                    index,
                    len: self.len(),
                });
            }
            out.push(
                self.positions[i],
                self.normals[i],
                self.uvs[i],
                self.blend_weights[i],
                self.blend_indices[i],
            );
        }
        Ok(out)
    }
}
