//! Process store: the application state handed to every interface.
//!
//! The [`ProcessStore`] owns the in-memory collection of processes and the
//! session's selected role. It is an explicitly passed object: interfaces
//! build one with [`ProcessStoreBuilder`], call into it, and drop it when
//! they are done. Nothing is global.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  CLI / MCP      │    │  ProcessStore   │    │    Database     │
//! │  collaborators  │───▶│ (state machine, │───▶│ (one snapshot   │
//! │                 │    │  session, query)│    │  under one key) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: configuration, storage location and startup load
//! - [`process_ops`]: create, save draft, send to next
//! - [`session_ops`]: role selection and "my tasks"
//! - [`query_ops`]: listing, filtering and dashboard counters
//! - [`seed`]: demo processes for an empty store
//!
//! ## Persistence
//!
//! Every mutation rewrites the snapshot synchronously. A failed write is
//! logged, the in-memory state is kept, and the store is marked dirty until
//! [`ProcessStore::flush`] succeeds.
//!
//! # Usage
//!
//! ```rust,no_run
//! use tollgate_core::{params::SendToNext, ProcessStoreBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = ProcessStoreBuilder::new()
//!     .with_database_path(Some("workflow.db"))
//!     .build()
//!     .await?;
//!
//! let process = store.create_process();
//! let transition = store.send_to_next(&SendToNext {
//!     id: process.id.clone(),
//!     notes: None,
//! })?;
//! println!("{transition}");
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    db::Database,
    error::{Result, WorkflowError},
    models::{Process, Role},
};

pub mod builder;
pub mod process_ops;
pub mod query_ops;
pub mod seed;
pub mod session_ops;

#[cfg(test)]
mod tests;

pub use builder::ProcessStoreBuilder;

/// Key under which the snapshot is stored.
pub const STATE_KEY: &str = "tollgate-workflow-v1";

/// Everything that is persisted, serialized as one blob.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkflowSnapshot {
    /// Newest first
    #[serde(default)]
    pub processes: Vec<Process>,
    #[serde(default)]
    pub current_role: Option<Role>,
}

/// In-memory workflow state with write-through persistence.
pub struct ProcessStore {
    pub(crate) db_path: PathBuf,
    pub(crate) id_prefix: String,
    pub(crate) state: WorkflowSnapshot,
    dirty: bool,
}

impl ProcessStore {
    pub(crate) fn new(db_path: PathBuf, id_prefix: String, state: WorkflowSnapshot) -> Self {
        Self {
            db_path,
            id_prefix,
            state,
            dirty: false,
        }
    }

    /// Whether the last write failed and in-memory changes are not yet
    /// stored.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.state.clone()
    }

    /// Retry writing the snapshot if a previous write failed.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::PersistenceWriteFailed` if the write fails
    /// again; the in-memory state is kept either way.
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        self.write_snapshot()
            .map_err(|e| WorkflowError::PersistenceWriteFailed {
                message: e.to_string(),
            })?;
        self.dirty = false;
        Ok(())
    }

    /// Write-through after a mutation. Failures are logged and remembered.
    pub(crate) fn persist(&mut self) {
        match self.write_snapshot() {
            Ok(()) => {
                debug!("Persisted {} processes", self.state.processes.len());
                self.dirty = false;
            }
            Err(e) => {
                warn!("Keeping workflow state in memory, write failed: {e}");
                self.dirty = true;
            }
        }
    }

    fn write_snapshot(&self) -> Result<()> {
        let blob = serde_json::to_string(&self.state)?;
        let mut db = Database::new(&self.db_path)?;
        db.store_value(STATE_KEY, &blob)
    }
}
