//! In-memory stores for dry runs and tests.
//!
//! Each store counts the operations it serves so callers can assert that a code path
//! never touched it.

use crate::error::StorageError;
use crate::store::{
    ArtifactStore, FingerprintRecord, FingerprintStore, SnapshotStore, StyleSnapshot,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct MemoryArtifactStore {
    items: RwLock<BTreeMap<String, Vec<u8>>>,
    writes: AtomicUsize,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.items.read().keys().cloned().collect()
    }

    /// Number of put and delete calls served
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.items.read().contains_key(key))
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.items.read().get(key).cloned())
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.items.write().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(self.items.write().remove(key).is_some())
    }
}

#[derive(Default)]
pub struct MemoryFingerprintStore {
    records: RwLock<BTreeMap<String, FingerprintRecord>>,
    accessed: RwLock<Vec<String>>,
}

impl MemoryFingerprintStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.records.read().keys().cloned().collect()
    }

    /// Style keys passed to any operation, in call order
    pub fn accessed_keys(&self) -> Vec<String> {
        self.accessed.read().clone()
    }

    fn touch(&self, style_key: &str) {
        self.accessed.write().push(style_key.to_string());
    }
}

impl FingerprintStore for MemoryFingerprintStore {
    fn get(&self, style_key: &str) -> Result<Option<FingerprintRecord>, StorageError> {
        self.touch(style_key);
        Ok(self.records.read().get(style_key).cloned())
    }

    fn put(&self, style_key: &str, record: &FingerprintRecord) -> Result<(), StorageError> {
        self.touch(style_key);
        self.records
            .write()
            .insert(style_key.to_string(), record.clone());
        Ok(())
    }

    fn remove(&self, style_key: &str) -> Result<bool, StorageError> {
        self.touch(style_key);
        Ok(self.records.write().remove(style_key).is_some())
    }
}

#[derive(Default)]
pub struct MemorySnapshotStore {
    snapshot: RwLock<Option<StyleSnapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<StyleSnapshot> {
        self.snapshot.read().clone()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Option<StyleSnapshot>, StorageError> {
        Ok(self.snapshot.read().clone())
    }

    fn save(&self, snapshot: &StyleSnapshot) -> Result<(), StorageError> {
        *self.snapshot.write() = Some(snapshot.clone());
        Ok(())
    }
}
