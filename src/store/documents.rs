//! Document sinks for the published tree.

use crate::error::StorageError;
use crate::store::artifacts::write_atomic;
use crate::store::DocumentSink;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Writes documents under a root directory, atomically.
pub struct FsDocumentSink {
    root: PathBuf,
}

impl FsDocumentSink {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl DocumentSink for FsDocumentSink {
    fn write_document(&self, relative_path: &str, contents: &str) -> Result<(), StorageError> {
        let relative = Path::new(relative_path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if relative_path.is_empty() || escapes {
            return Err(StorageError::InvalidKey(relative_path.to_string()));
        }
        write_atomic(&self.root.join(relative), contents.as_bytes())
    }
}

/// Keeps documents in memory.
#[derive(Default)]
pub struct MemoryDocumentSink {
    documents: RwLock<BTreeMap<String, String>>,
}

impl MemoryDocumentSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, relative_path: &str) -> Option<String> {
        self.documents.read().get(relative_path).cloned()
    }

    pub fn documents(&self) -> BTreeMap<String, String> {
        self.documents.read().clone()
    }
}

impl DocumentSink for MemoryDocumentSink {
    fn write_document(&self, relative_path: &str, contents: &str) -> Result<(), StorageError> {
        self.documents
            .write()
            .insert(relative_path.to_string(), contents.to_string());
        Ok(())
    }
}
