//! Gateway loop that owns the write path and processes commands.
//!
//! The gateway runs on a dedicated thread and sequentially processes
//! messages from an `mpsc` channel. Each mutating command is one
//! load → validate → apply → save sequence, and no two sequences ever
//! interleave. Reads skip the queue: they call `load` directly on a
//! blocking task, which is safe because saves are atomic.
//!
//! Public API: [`DirectoryHandle`] (cloneable async handle). Handles are
//! created by [`GatewayBuilder::open`](crate::GatewayBuilder::open).

use std::fmt;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::command::{CommandRequest, CommandResponse, DirectoryCommand};
use crate::error::CommandError;
use crate::model::{Contact, Directory, Supplier};
use crate::storage::DirectoryStorage;

/// Result type sent back through the `Execute` reply channel.
type ExecuteResult = Result<Directory, CommandError>;

/// Messages sent from `DirectoryHandle` to the gateway loop.
pub(crate) enum GatewayMessage {
    /// Apply one mutation and persist the result.
    Execute {
        cmd: DirectoryCommand,
        reply: oneshot::Sender<ExecuteResult>,
    },

    /// Stop processing and exit the loop.
    #[allow(dead_code)] // Constructed only in tests.
    Shutdown,
}

/// Runs the gateway loop on the calling thread until every handle is
/// dropped or a `Shutdown` message arrives.
pub(crate) fn run_gateway(
    storage: Arc<dyn DirectoryStorage>,
    mut rx: mpsc::Receiver<GatewayMessage>,
) {
    while let Some(msg) = rx.blocking_recv() {
        match msg {
            GatewayMessage::Execute { cmd, reply } => {
                let _span = tracing::info_span!("execute", command = cmd.name()).entered();
                let result = execute_command(storage.as_ref(), cmd);
                // A dropped receiver means the caller stopped waiting. The
                // command has still been applied (or rejected) atomically.
                let _ = reply.send(result);
            }
            GatewayMessage::Shutdown => break,
        }
    }
    tracing::debug!(location = %storage.location().display(), "gateway stopped");
}

/// One load → mutate → save sequence. Nothing is written unless the
/// command is accepted.
fn execute_command(
    storage: &dyn DirectoryStorage,
    cmd: DirectoryCommand,
) -> Result<Directory, CommandError> {
    let current = storage.load().inspect_err(|e| {
        tracing::warn!(error = %e, "failed to load directory");
    })?;

    let event = current.handle(cmd).inspect_err(|e| {
        tracing::warn!(error = %e, "command rejected");
    })?;

    let next = current.apply(&event);
    storage.save(&next).inspect_err(|e| {
        tracing::warn!(error = %e, "failed to save directory");
    })?;

    tracing::info!(event = event.name(), "directory updated");
    Ok(next)
}

/// Async handle to a running directory gateway.
///
/// Lightweight, cloneable, and `Send + Sync`. Every method returns the full
/// directory snapshot on success.
#[derive(Clone)]
pub struct DirectoryHandle {
    sender: mpsc::Sender<GatewayMessage>,
    storage: Arc<dyn DirectoryStorage>,
    trim_names: bool,
}

// Manual `Debug` because the storage is a trait object.
impl fmt::Debug for DirectoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryHandle")
            .field("location", &self.storage.location())
            .field("trim_names", &self.trim_names)
            .finish()
    }
}

impl DirectoryHandle {
    pub(crate) fn new(
        sender: mpsc::Sender<GatewayMessage>,
        storage: Arc<dyn DirectoryStorage>,
        trim_names: bool,
    ) -> Self {
        Self {
            sender,
            storage,
            trim_names,
        }
    }

    /// Send a mutation to the gateway and wait for the resulting snapshot.
    ///
    /// # Errors
    ///
    /// * [`CommandError::Directory`] -- the directory rejected the command.
    /// * [`CommandError::Storage`] -- loading or saving failed.
    /// * [`CommandError::GatewayClosed`] -- the gateway thread has exited.
    pub async fn execute(&self, cmd: DirectoryCommand) -> Result<Directory, CommandError> {
        let cmd = if self.trim_names {
            cmd.trim_names()
        } else {
            cmd
        };
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(GatewayMessage::Execute { cmd, reply: tx })
            .await
            .map_err(|_| CommandError::GatewayClosed)?;
        rx.await.map_err(|_| CommandError::GatewayClosed)?
    }

    /// Load and return the current directory.
    ///
    /// Does not queue behind pending mutations; it observes the last
    /// completed save.
    pub async fn read_db_file(&self) -> Result<Directory, CommandError> {
        let storage = Arc::clone(&self.storage);
        match tokio::task::spawn_blocking(move || storage.load()).await {
            Ok(result) => Ok(result?),
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => Err(CommandError::GatewayClosed),
        }
    }

    pub async fn add_category(&self, cat_name: impl Into<String>) -> Result<Directory, CommandError> {
        self.execute(DirectoryCommand::AddCategory {
            name: cat_name.into(),
        })
        .await
    }

    /// Remove a category and everything under it.
    pub async fn remove_category(
        &self,
        cat_name: impl Into<String>,
    ) -> Result<Directory, CommandError> {
        self.execute(DirectoryCommand::RemoveCategory {
            name: cat_name.into(),
        })
        .await
    }

    pub async fn add_supplier(
        &self,
        cat_name: impl Into<String>,
        supplier: Supplier,
    ) -> Result<Directory, CommandError> {
        self.execute(DirectoryCommand::AddSupplier {
            category: cat_name.into(),
            supplier,
        })
        .await
    }

    /// Remove a supplier and its contacts.
    pub async fn remove_supplier(
        &self,
        cat_name: impl Into<String>,
        supplier_name: impl Into<String>,
    ) -> Result<Directory, CommandError> {
        self.execute(DirectoryCommand::RemoveSupplier {
            category: cat_name.into(),
            supplier_name: supplier_name.into(),
        })
        .await
    }

    pub async fn update_supplier(
        &self,
        cat_name: impl Into<String>,
        old_name: impl Into<String>,
        new_name: impl Into<String>,
        new_emails: Vec<String>,
        new_telefoane: Vec<String>,
    ) -> Result<Directory, CommandError> {
        self.execute(DirectoryCommand::UpdateSupplier {
            category: cat_name.into(),
            old_name: old_name.into(),
            new_name: new_name.into(),
            new_emails,
            new_phones: new_telefoane,
        })
        .await
    }

    pub async fn add_contact(
        &self,
        cat_name: impl Into<String>,
        supplier_name: impl Into<String>,
        contact: Contact,
    ) -> Result<Directory, CommandError> {
        self.execute(DirectoryCommand::AddContact {
            category: cat_name.into(),
            supplier_name: supplier_name.into(),
            contact,
        })
        .await
    }

    pub async fn remove_contact(
        &self,
        cat_name: impl Into<String>,
        supplier_name: impl Into<String>,
        contact_name: impl Into<String>,
    ) -> Result<Directory, CommandError> {
        self.execute(DirectoryCommand::RemoveContact {
            category: cat_name.into(),
            supplier_name: supplier_name.into(),
            contact_name: contact_name.into(),
        })
        .await
    }

    pub async fn update_contact(
        &self,
        cat_name: impl Into<String>,
        supplier_name: impl Into<String>,
        old_contact_name: impl Into<String>,
        new_contact_name: impl Into<String>,
        new_email: impl Into<String>,
        new_phone: impl Into<String>,
    ) -> Result<Directory, CommandError> {
        self.execute(DirectoryCommand::UpdateContact {
            category: cat_name.into(),
            supplier_name: supplier_name.into(),
            old_contact_name: old_contact_name.into(),
            new_contact_name: new_contact_name.into(),
            new_email: new_email.into(),
            new_phone: new_phone.into(),
        })
        .await
    }

    /// Run a by-name request.
    pub async fn dispatch(&self, request: CommandRequest) -> Result<Directory, CommandError> {
        match request.into_command() {
            Some(cmd) => self.execute(cmd).await,
            None => self.read_db_file().await,
        }
    }

    /// Decode one JSON request and run it, folding every failure
    /// (including a malformed request) into the response.
    pub async fn dispatch_json(&self, request: &str) -> CommandResponse {
        let result = match serde_json::from_str::<CommandRequest>(request) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => Err(CommandError::from(e)),
        };
        CommandResponse::from(result)
    }

    /// Check whether the gateway thread is still running.
    pub fn is_alive(&self) -> bool {
        !self.sender.is_closed()
    }

    #[cfg(test)]
    pub(crate) async fn shutdown(&self) {
        let _ = self.sender.send(GatewayMessage::Shutdown).await;
    }
}
