//! Content reader/writer collaborators.
//!
//! The engine never touches the filesystem; the batch layer reads original
//! content and persists results through a [`ContentStore`].

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("file is not valid UTF-8: {}", .0.display())]
    NotUtf8(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StoreError {
    fn from_io(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
            ErrorKind::InvalidData => StoreError::NotUtf8(path.to_path_buf()),
            _ => StoreError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Source of original file content and sink for edited content.
pub trait ContentStore {
    /// Read UTF-8 content. A missing file is [`StoreError::NotFound`], distinct
    /// from an empty one.
    fn read(&self, path: &Path) -> Result<String, StoreError>;

    fn write(&self, path: &Path, content: &str) -> Result<(), StoreError>;
}

/// Filesystem-backed store with atomic writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl ContentStore for FsStore {
    fn read(&self, path: &Path) -> Result<String, StoreError> {
        fs::read_to_string(path).map_err(|e| StoreError::from_io(path, e))
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), StoreError> {
        atomic_write(path, content.as_bytes()).map_err(|e| StoreError::from_io(path, e))
    }
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full write succeeds or the original file is left untouched.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    // Same directory keeps the rename on one filesystem.
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;

    // Keep the permissions of the file being replaced.
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// In-memory store, for embedding hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), content.into());
        }
        self
    }

    /// Current content of `path`, if present.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().ok()?.get(path.as_ref()).cloned()
    }

    fn lock_files(
        &self,
        path: &Path,
    ) -> Result<MutexGuard<'_, HashMap<PathBuf, String>>, StoreError> {
        self.files.lock().map_err(|_| StoreError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::other("memory store lock poisoned"),
        })
    }
}

impl ContentStore for MemoryStore {
    fn read(&self, path: &Path) -> Result<String, StoreError> {
        self.lock_files(path)?
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), StoreError> {
        self.lock_files(path)?
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}
