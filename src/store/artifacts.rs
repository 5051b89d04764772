//! Filesystem artifact storage.
//!
//! Artifacts live flat under `{root}/images/{key}`. Writes go to a `.tmp` sibling
//! and are renamed into place so a crash never leaves a truncated image that a later
//! run would mistake for a finished one.

use crate::error::StorageError;
use crate::store::{validate_key, ArtifactStore};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const IMAGES_DIR: &str = "images";

pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    /// Open (and create if needed) the artifact directory under `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StorageError> {
        let dir = root.as_ref().join(IMAGES_DIR);
        fs::create_dir_all(&dir).map_err(|e| {
            StorageError::IoError(io::Error::new(
                e.kind(),
                format!("Failed to create artifact directory at {:?}: {}", dir, e),
            ))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }
}

impl ArtifactStore for FsArtifactStore {
    fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.path_for(key)?.is_file())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        write_atomic(&path, bytes)
    }

    fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }
}

/// Write `bytes` to `path` via a temporary file and rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            StorageError::IoError(io::Error::new(
                e.kind(),
                format!("Failed to create parent directory {:?}: {}", parent, e),
            ))
        })?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, bytes).map_err(|e| {
        StorageError::IoError(io::Error::new(
            e.kind(),
            format!("Failed to write {:?}: {}", temp_path, e),
        ))
    })?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        StorageError::IoError(io::Error::new(
            e.kind(),
            format!("Failed to rename temp file to {:?}: {}", path, e),
        ))
    })
}
