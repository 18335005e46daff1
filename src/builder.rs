//! Configuration and startup of the directory gateway.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::StorageError;
use crate::gateway::{DirectoryHandle, GatewayMessage, run_gateway};
use crate::model::Directory;
use crate::storage::{DirectoryStorage, JsonFileStorage};

/// Default gateway mailbox size.
const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// File name used when only a data directory is known.
pub const DEFAULT_FILE_NAME: &str = "suppliers_db.json";

/// Builder for configuring and opening a [`DirectoryHandle`].
///
/// # Examples
///
/// ```no_run
/// use supplier_directory::GatewayBuilder;
///
/// # async fn example() -> Result<(), supplier_directory::CommandError> {
/// let handle = GatewayBuilder::new("/tmp/suppliers_db.json").open()?;
/// let snapshot = handle.add_category("Electronics").await?;
/// assert!(snapshot.contains_category("Electronics"));
/// # Ok(())
/// # }
/// ```
pub struct GatewayBuilder {
    storage: Arc<dyn DirectoryStorage>,
    create_if_missing: bool,
    trim_names: bool,
    channel_capacity: usize,
}

impl GatewayBuilder {
    /// Store the directory as a JSON document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_storage(JsonFileStorage::new(path))
    }

    /// Use any storage backend.
    pub fn with_storage(storage: impl DirectoryStorage) -> Self {
        Self {
            storage: Arc::new(storage),
            create_if_missing: true,
            trim_names: true,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Whether to save an empty directory when no document exists yet.
    ///
    /// Defaults to `true`. When `false`, opening against a missing document
    /// fails with [`StorageError::Unavailable`].
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Whether the handle trims surrounding whitespace from names it
    /// introduces (new categories, suppliers, contacts and renames).
    ///
    /// Defaults to `true`. Lookup names are never trimmed.
    pub fn trim_names(mut self, trim: bool) -> Self {
        self.trim_names = trim;
        self
    }

    /// Number of commands that may wait in the gateway mailbox.
    ///
    /// Defaults to 32. Values below 1 are raised to 1.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Check the document and start the gateway thread.
    ///
    /// # Errors
    ///
    /// * [`StorageError::Unavailable`] -- the document cannot be read, or is
    ///   missing while `create_if_missing` is off, or the initial empty
    ///   document cannot be written.
    /// * [`StorageError::Corrupt`] -- the existing document is invalid.
    pub fn open(self) -> Result<DirectoryHandle, StorageError> {
        match self.storage.load() {
            Ok(directory) => {
                tracing::info!(
                    location = %self.storage.location().display(),
                    categories = directory.len(),
                    "opened directory"
                );
            }
            Err(e) if e.is_missing() && self.create_if_missing => {
                tracing::info!(
                    location = %self.storage.location().display(),
                    "no directory document yet, creating an empty one"
                );
                self.storage.save(&Directory::default())?;
            }
            Err(e) => return Err(e),
        }

        let (tx, rx) = mpsc::channel::<GatewayMessage>(self.channel_capacity);
        let storage = Arc::clone(&self.storage);
        std::thread::spawn(move || run_gateway(storage, rx));

        Ok(DirectoryHandle::new(tx, self.storage, self.trim_names))
    }
}
