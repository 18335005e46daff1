//! Crate-level error types for directory mutations, storage and the gateway.

use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::{Serialize, Serializer, ser::SerializeStruct};

/// Which level of the hierarchy an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Category,
    Supplier,
    Contact,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Category => "category",
            Self::Supplier => "supplier",
            Self::Contact => "contact",
        })
    }
}

/// A mutation rejected by the directory.
///
/// Returned from [`Directory::execute`](crate::Directory::execute) and the
/// named mutation methods. The directory the command was issued against is
/// never modified when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// A referenced category, supplier or contact does not exist.
    #[error("{kind} not found: {name}")]
    NotFound { kind: EntityKind, name: String },

    /// The name is already used within its uniqueness scope.
    #[error("{kind} already exists: {name}")]
    DuplicateKey { kind: EntityKind, name: String },

    /// A required name is empty or whitespace-only.
    #[error("{kind} name must not be blank: {name:?}")]
    InvalidArgument { kind: EntityKind, name: String },
}

impl DirectoryError {
    pub(crate) fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn duplicate(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::DuplicateKey {
            kind,
            name: name.into(),
        }
    }
}

/// Failure reading or writing the durable directory document.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The medium could not be read or written.
    #[error("directory storage unavailable at {}: {source}", path.display())]
    Unavailable { path: PathBuf, source: io::Error },

    /// The document was read but does not describe a valid directory.
    #[error("corrupt directory document at {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl StorageError {
    /// `true` when the document simply does not exist yet.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Unavailable { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Coarse classification callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    NotFound,
    DuplicateKey,
    InvalidArgument,
    StorageUnavailable,
    CorruptData,
    GatewayClosed,
}

/// Error returned by every gateway command.
///
/// Directory and storage errors pass through unchanged. Serializes as
/// `{"kind": "<ErrorKind>", "message": "<display>"}`.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A request line could not be decoded into a command.
    #[error("malformed command request: {0}")]
    MalformedRequest(#[from] serde_json::Error),

    /// The gateway thread has exited, so no further commands can run.
    #[error("directory gateway is no longer running")]
    GatewayClosed,
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Directory(DirectoryError::NotFound { .. }) => ErrorKind::NotFound,
            Self::Directory(DirectoryError::DuplicateKey { .. }) => ErrorKind::DuplicateKey,
            Self::Directory(DirectoryError::InvalidArgument { .. }) => ErrorKind::InvalidArgument,
            Self::Storage(StorageError::Unavailable { .. }) => ErrorKind::StorageUnavailable,
            Self::Storage(StorageError::Corrupt { .. }) => ErrorKind::CorruptData,
            Self::MalformedRequest(_) => ErrorKind::InvalidArgument,
            Self::GatewayClosed => ErrorKind::GatewayClosed,
        }
    }
}

impl Serialize for CommandError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CommandError", 2)?;
        state.serialize_field("kind", &self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}
