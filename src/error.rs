use rootcause::Report;
use thiserror::Error;

/// Broad failure class, used by callers that only need to distinguish
/// "the source files disagree with each other" from "an internal index
/// bookkeeping invariant broke".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// A slice or index lookup fell outside a buffer's valid bounds.
    Range,
    /// A structural invariant was violated (bad parent link, unmapped vertex).
    Structural,
}

/// Fatal conversion errors. Any of these aborts the current asset's
/// conversion; no partial model is emitted.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("vertex slice out of range: offset {offset} + count {count} exceeds buffer of {len}")]
    SliceOutOfRange {
        offset: usize,
        count: usize,
        len: usize,
    },
    #[error("vertex attribute arrays have mismatched lengths: {detail}")]
    AttributeLengthMismatch { detail: String },
    #[error("vertex index {index} out of range for buffer of {len}")]
    VertexIndexOutOfRange { index: u32, len: usize },
    #[error("flex name index {index} out of range for name table of {len}")]
    FlexNameOutOfRange { index: u32, len: usize },
    #[error("bone {index} (\"{name}\") has invalid parent index {parent}")]
    InvalidBoneParent {
        index: usize,
        name: String,
        parent: i32,
    },
    #[error("attachment \"{name}\" references bone {bone} but skeleton has {len} bones")]
    AttachmentBoneOutOfRange {
        name: String,
        bone: i32,
        len: usize,
    },
    #[error("compacted triangle references unmapped vertex {index}")]
    UnmappedVertex { index: u32 },
}

impl ConvertError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ConvertError::SliceOutOfRange { .. }
            | ConvertError::AttributeLengthMismatch { .. }
            | ConvertError::VertexIndexOutOfRange { .. }
            | ConvertError::FlexNameOutOfRange { .. } => ErrorClass::Range,
            ConvertError::InvalidBoneParent { .. }
            | ConvertError::AttachmentBoneOutOfRange { .. }
            | ConvertError::UnmappedVertex { .. } => ErrorClass::Structural,
        }
    }
}

/// Non-fatal conditions surfaced alongside a still-valid model, once per
/// asset rather than per triangle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Warning {
    #[error("material \"{name}\" could not be resolved in any search path")]
    UnresolvedMaterial { name: String },
}

pub type ConvertResult<T> = Result<T, Report<ConvertError>>;
