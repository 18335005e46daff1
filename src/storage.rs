//! Durable storage for the directory document.
//!
//! The whole directory is one JSON document. [`JsonFileStorage`] writes it
//! atomically: the new content goes to `<file>.tmp` in the same directory,
//! is flushed to disk, and is then renamed over the target, so a reader
//! sees either the previous document or the new one, never a partial write.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::StorageError;
use crate::model::Directory;

/// A medium holding one directory document.
///
/// Implementations must make [`save`](DirectoryStorage::save) atomic with
/// respect to [`load`](DirectoryStorage::load): a load never observes a
/// partially written document. Neither method retries on failure.
pub trait DirectoryStorage: Send + Sync + 'static {
    /// Read and validate the current document.
    ///
    /// # Errors
    ///
    /// * [`StorageError::Unavailable`] -- the medium could not be read.
    /// * [`StorageError::Corrupt`] -- the content is not a valid directory.
    fn load(&self) -> Result<Directory, StorageError>;

    /// Replace the document with `directory`.
    ///
    /// # Errors
    ///
    /// * [`StorageError::Unavailable`] -- the write did not complete; the
    ///   previous document is still in place.
    /// * [`StorageError::Corrupt`] -- `directory` breaks a document invariant
    ///   and was not written.
    fn save(&self, directory: &Directory) -> Result<(), StorageError>;

    /// Where the document lives, for log lines and error messages.
    fn location(&self) -> &Path;
}

/// Stores the directory as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Create a storage backed by the file at `path`.
    ///
    /// The file does not need to exist yet; parent directories are created
    /// on the first [`save`](DirectoryStorage::save).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the scratch file used during a save: `<file>.tmp`.
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn unavailable(&self, source: io::Error) -> StorageError {
        StorageError::Unavailable {
            path: self.path.clone(),
            source,
        }
    }
}

impl DirectoryStorage for JsonFileStorage {
    fn load(&self) -> Result<Directory, StorageError> {
        let bytes = fs::read(&self.path).map_err(|e| self.unavailable(e))?;
        let directory = decode(&self.path, &bytes)?;
        tracing::debug!(
            path = %self.path.display(),
            categories = directory.len(),
            "directory loaded"
        );
        Ok(directory)
    }

    fn save(&self, directory: &Directory) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(|e| self.unavailable(e))?;
        }

        let json = encode(&self.path, directory)?;
        let tmp_path = self.temp_path();

        if let Err(e) = write_synced(&tmp_path, &json) {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.unavailable(e));
        }
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.unavailable(e));
        }

        // Rename is done; only durability of the directory entry is at stake.
        if let Err(e) = sync_parent(&self.path) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to sync parent directory after save"
            );
        }

        tracing::debug!(path = %self.path.display(), bytes = json.len(), "directory saved");
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

/// Keeps the encoded document in memory.
///
/// Goes through the same JSON encoding as [`JsonFileStorage`], so it
/// enforces the same invariants on load. Starts out empty: `load` fails
/// with a not-found [`StorageError::Unavailable`] until the first save.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    document: Mutex<Option<Vec<u8>>>,
}

const MEMORY_LOCATION: &str = ":memory:";

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing directory.
    pub fn with_directory(directory: &Directory) -> Result<Self, StorageError> {
        let storage = Self::new();
        storage.save(directory)?;
        Ok(storage)
    }

    /// Start from raw document bytes, which are not validated until `load`.
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            document: Mutex::new(Some(bytes.into())),
        }
    }

    /// The raw document as last saved.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DirectoryStorage for MemoryStorage {
    fn load(&self) -> Result<Directory, StorageError> {
        let guard = self.document.lock().unwrap_or_else(PoisonError::into_inner);
        let bytes = guard.as_deref().ok_or_else(|| StorageError::Unavailable {
            path: PathBuf::from(MEMORY_LOCATION),
            source: io::Error::new(io::ErrorKind::NotFound, "no document saved yet"),
        })?;
        decode(Path::new(MEMORY_LOCATION), bytes)
    }

    fn save(&self, directory: &Directory) -> Result<(), StorageError> {
        let json = encode(Path::new(MEMORY_LOCATION), directory)?;
        *self.document.lock().unwrap_or_else(PoisonError::into_inner) = Some(json);
        Ok(())
    }

    fn location(&self) -> &Path {
        Path::new(MEMORY_LOCATION)
    }
}

/// Fails with [`StorageError::Corrupt`] when the directory would not load
/// back, so nothing unloadable is ever written.
fn encode(path: &Path, directory: &Directory) -> Result<Vec<u8>, StorageError> {
    serde_json::to_vec_pretty(directory).map_err(|source| StorageError::Corrupt {
        path: path.to_owned(),
        source,
    })
}

fn decode(path: &Path, bytes: &[u8]) -> Result<Directory, StorageError> {
    serde_json::from_slice(bytes).map_err(|source| StorageError::Corrupt {
        path: path.to_owned(),
        source,
    })
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(unix)]
fn sync_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => File::open(dir)?.sync_all(),
        _ => Ok(()),
    }
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) -> io::Result<()> {
    Ok(())
}
