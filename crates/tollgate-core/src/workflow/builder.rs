//! Builder for creating and configuring ProcessStore instances.

use std::path::{Path, PathBuf};

use jiff::Timestamp;
use log::{info, warn};
use tokio::task;

use super::{seed, ProcessStore, WorkflowSnapshot, STATE_KEY};
use crate::{
    db::Database,
    error::{Result, WorkflowError},
};

/// Prefix of generated process ids unless configured otherwise.
pub const DEFAULT_ID_PREFIX: &str = "REQ";

/// Builder for creating and configuring ProcessStore instances.
#[derive(Debug, Clone)]
pub struct ProcessStoreBuilder {
    database_path: Option<PathBuf>,
    id_prefix: Option<String>,
    demo_seed: bool,
}

impl ProcessStoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
            id_prefix: None,
            demo_seed: false,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/tollgate/tollgate.db` or
    /// `~/.local/share/tollgate/tollgate.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the prefix of generated process ids.
    pub fn with_id_prefix(mut self, prefix: Option<impl Into<String>>) -> Self {
        if let Some(prefix) = prefix {
            self.id_prefix = Some(prefix.into());
        }
        self
    }

    /// Seed demo processes when storage holds none.
    pub fn with_demo_seed(mut self, enabled: bool) -> Self {
        self.demo_seed = enabled;
        self
    }

    /// Builds the store, loading any previously saved state.
    ///
    /// Missing or unreadable state is not an error: the store starts empty
    /// (or seeded, when requested) and logs a warning. A seed is written
    /// right away. When the database itself cannot be read the store starts
    /// dirty, so [`ProcessStore::flush`] reports the lost writes.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidInput` for an empty or malformed id
    /// prefix and `WorkflowError::FileSystem` if the database directory
    /// cannot be created.
    pub async fn build(self) -> Result<ProcessStore> {
        let id_prefix = self
            .id_prefix
            .unwrap_or_else(|| DEFAULT_ID_PREFIX.to_string());
        if id_prefix.is_empty() || !id_prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(WorkflowError::invalid_input("id_prefix")
                .with_reason("must be non-empty and ASCII alphanumeric"));
        }

        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| WorkflowError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        let loaded = task::spawn_blocking(move || {
            let db = Database::new(&db_path_clone)?;
            db.load_value(STATE_KEY)
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })?;

        let (stored, readable) = match loaded {
            Ok(stored) => (stored, true),
            Err(e @ WorkflowError::Database { .. }) => {
                warn!(
                    "Starting without saved state, cannot read {}: {e}",
                    db_path.display()
                );
                (None, false)
            }
            Err(e) => return Err(e),
        };

        let mut state = Self::decode(stored.as_deref());
        let seeded = state.processes.is_empty() && self.demo_seed;
        if seeded {
            info!("Seeding demo processes");
            state.processes = seed::demo_processes(&id_prefix, Timestamp::now());
        }

        info!(
            "Loaded {} processes from {}",
            state.processes.len(),
            db_path.display()
        );
        let mut store = ProcessStore::new(db_path, id_prefix, state);
        if seeded || !readable {
            store.persist();
        }
        Ok(store)
    }

    /// Parse a stored snapshot, degrading to the empty state.
    fn decode(stored: Option<&str>) -> WorkflowSnapshot {
        match stored {
            None => WorkflowSnapshot::default(),
            Some(blob) => serde_json::from_str(blob).unwrap_or_else(|e| {
                warn!("Ignoring unreadable workflow state: {e}");
                WorkflowSnapshot::default()
            }),
        }
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("tollgate")
            .place_data_file("tollgate.db")
            .map_err(|e| WorkflowError::XdgDirectory(e.to_string()))
    }
}

impl Default for ProcessStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
