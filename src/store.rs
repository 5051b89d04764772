//! Persisted state between runs: artifacts, fingerprints, and the previous run's
//! style snapshot.
//!
//! Each store is a small put/get/delete interface keyed by sanitized names so the
//! pipeline can run against the filesystem in production and against memory in tests.

pub mod artifacts;
pub mod documents;
pub mod fingerprints;
pub mod memory;
pub mod snapshot;

pub use artifacts::FsArtifactStore;
pub use documents::{FsDocumentSink, MemoryDocumentSink};
pub use fingerprints::SledFingerprintStore;
pub use memory::{MemoryArtifactStore, MemoryFingerprintStore, MemorySnapshotStore};
pub use snapshot::FileSnapshotStore;

use crate::error::StorageError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Style objects from a run, keyed by style name.
pub type StyleSnapshot = BTreeMap<String, Map<String, Value>>;

/// Image artifacts keyed by `{safe_style}_{sample}.webp`.
pub trait ArtifactStore: Send + Sync {
    fn exists(&self, key: &str) -> Result<bool, StorageError>;
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    /// Overwrites atomically
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
    /// Returns whether something was deleted
    fn delete(&self, key: &str) -> Result<bool, StorageError>;
}

/// Fingerprint recorded for a style the last time it was (re)generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintRecord {
    /// Hex-encoded BLAKE3 digest
    pub fingerprint: String,
    pub recorded_at: DateTime<Utc>,
}

impl FingerprintRecord {
    pub fn new(fingerprint: String) -> Self {
        Self {
            fingerprint,
            recorded_at: Utc::now(),
        }
    }
}

/// Fingerprint records keyed by sanitized style name.
pub trait FingerprintStore: Send + Sync {
    fn get(&self, style_key: &str) -> Result<Option<FingerprintRecord>, StorageError>;
    fn put(&self, style_key: &str, record: &FingerprintRecord) -> Result<(), StorageError>;
    fn remove(&self, style_key: &str) -> Result<bool, StorageError>;
}

/// The previous run's full style set, used only to detect removed styles.
pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> Result<Option<StyleSnapshot>, StorageError>;
    fn save(&self, snapshot: &StyleSnapshot) -> Result<(), StorageError>;
}

/// Key validation shared by the filesystem-backed stores.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty()
        || key.contains('/')
        || key.contains('\\')
        || key == "."
        || key == ".."
    {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Destination for published documents, keyed by relative path (`previews.md`,
/// `categories/{name}.md`).
pub trait DocumentSink: Send + Sync {
    fn write_document(&self, relative_path: &str, contents: &str) -> Result<(), StorageError>;
}
