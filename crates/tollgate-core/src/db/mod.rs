//! SQLite-backed key-value persistence boundary.
//!
//! The workflow keeps its whole state in memory and writes a single
//! serialized snapshot under one key after every change. This module only
//! knows about keys and text values; [`crate::workflow`] owns the snapshot
//! format.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod kv_queries;
pub mod migrations;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
