//! Sled-backed fingerprint store.

use crate::error::StorageError;
use crate::store::{FingerprintRecord, FingerprintStore};
use std::path::Path;

/// Database directory under the output root.
pub const FINGERPRINT_DB_DIR: &str = "fingerprints";

const TREE_FINGERPRINTS: &str = "style_fingerprints";

/// Fingerprint records in a sled tree, keyed by sanitized style name.
pub struct SledFingerprintStore {
    db: sled::Db,
    tree: sled::Tree,
}

impl SledFingerprintStore {
    /// Open (or create) the store at the given directory.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    pub fn from_db(db: sled::Db) -> Result<Self, StorageError> {
        let tree = db.open_tree(TREE_FINGERPRINTS)?;
        Ok(Self { db, tree })
    }

    /// Number of recorded styles
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}

impl FingerprintStore for SledFingerprintStore {
    fn get(&self, style_key: &str) -> Result<Option<FingerprintRecord>, StorageError> {
        let Some(value) = self.tree.get(style_key.as_bytes())? else {
            return Ok(None);
        };
        let record = bincode::deserialize(&value).map_err(|e| StorageError::CorruptRecord {
            key: style_key.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(record))
    }

    fn put(&self, style_key: &str, record: &FingerprintRecord) -> Result<(), StorageError> {
        let value = bincode::serialize(record).map_err(|e| StorageError::CorruptRecord {
            key: style_key.to_string(),
            message: format!("Failed to serialize fingerprint record: {}", e),
        })?;
        self.tree.insert(style_key.as_bytes(), value)?;
        // Committed before any generation starts for the style.
        self.tree.flush()?;
        Ok(())
    }

    fn remove(&self, style_key: &str) -> Result<bool, StorageError> {
        let removed = self.tree.remove(style_key.as_bytes())?.is_some();
        self.tree.flush()?;
        Ok(removed)
    }
}
