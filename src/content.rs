//! External content-resolution collaborator interface.
//!
//! Material content lives in the caller's content tree (loose files or
//! archives); the core only needs a read-only lookup that returns a shared
//! handle. Handles use the crate [`Rc`](crate::Rc) alias so the `arc`
//! feature makes them thread-safe for parallel conversion.

use std::collections::HashMap;

/// Shared raw material content, owned by the resolver's cache.
pub type MaterialData = crate::Rc<[u8]>;

pub trait ContentResolver {
    /// Look up raw material content by normalized content-relative path.
    /// Concurrent read-only lookups must be safe when conversion is
    /// parallelized.
    fn find_material(&self, path: &str) -> Option<MaterialData>;
}

/// Resolver that never finds anything; every material becomes a
/// missing-data warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullResolver;

impl ContentResolver for NullResolver {
    fn find_material(&self, _path: &str) -> Option<MaterialData> {
        None
    }
}

/// In-memory resolver for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryResolver {
    files: HashMap<String, MaterialData>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, data: &[u8]) {
        self.files.insert(path.into(), MaterialData::from(data));
    }
}

impl ContentResolver for MemoryResolver {
    fn find_material(&self, path: &str) -> Option<MaterialData> {
        self.files.get(path).cloned()
    }
}
