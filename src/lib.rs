//! Category / supplier / contact directory backed by a single JSON document.
//!
//! A [`GatewayBuilder`] opens the document and starts a gateway thread; the
//! returned [`DirectoryHandle`] exposes one async method per command, each
//! returning the full [`Directory`] snapshot.

mod builder;
pub use builder::{DEFAULT_FILE_NAME, GatewayBuilder};
mod command;
mod directory;
mod error;
mod gateway;
mod model;
mod storage;

pub use command::{CommandRequest, CommandResponse, DirectoryCommand};
pub use error::{CommandError, DirectoryError, EntityKind, ErrorKind, StorageError};
pub use gateway::DirectoryHandle;
pub use model::{Contact, Directory, DocumentError, Supplier};
pub use storage::{DirectoryStorage, JsonFileStorage, MemoryStorage};
