//! Previous-run style snapshot, stored as pretty JSON next to the published tree.

use crate::error::StorageError;
use crate::store::artifacts::write_atomic;
use crate::store::{SnapshotStore, StyleSnapshot};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const SNAPSHOT_FILE: &str = "styles.last-run.json";

pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            path: root.as_ref().join(SNAPSHOT_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<StyleSnapshot>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::IoError(e)),
        };
        let snapshot = serde_json::from_slice(&bytes).map_err(|e| StorageError::CorruptRecord {
            key: SNAPSHOT_FILE.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &StyleSnapshot) -> Result<(), StorageError> {
        let mut body = serde_json::to_vec_pretty(snapshot).map_err(|e| {
            StorageError::CorruptRecord {
                key: SNAPSHOT_FILE.to_string(),
                message: e.to_string(),
            }
        })?;
        body.push(b'\n');
        write_atomic(&self.path, &body)
    }
}
