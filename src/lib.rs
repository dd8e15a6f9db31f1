/// External content-resolution collaborator interface (material lookup).
pub mod content;
/// Conversion pipeline: strip assembly, morph collection, LOD compaction, orchestration.
pub mod convert;
/// Error and warning definitions.
pub mod error;
/// Small vector/quaternion helpers over plain `f32` arrays.
pub mod math;
/// Engine-agnostic output model graph (skeleton, body groups, LODs, shape keys).
pub mod model;
/// Input-side structures produced by external format parsers.
pub mod source;
/// Parallel per-vertex attribute arrays and slicing/gathering.
pub mod vertex;

#[cfg(feature = "arc")]
pub type Rc<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub type Rc<T> = std::rc::Rc<T>;
