//! Database connection manager.
//!
//! Owns one connection behind a mutex. Opening applies pragmas and brings
//! the schema up to date, which includes the orphaned reference repair.

pub mod pragmas;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::Connection;

use refmend_core::errors::{RefmendResult, StorageError};
use refmend_core::{RefmendConfig, RepairReport};

use crate::{migrations, repair, to_storage_err};

pub struct DatabaseManager {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
    config: RefmendConfig,
}

impl DatabaseManager {
    /// Open a file-backed database and run pending migrations.
    pub fn open(path: &Path, config: RefmendConfig) -> RefmendResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| to_storage_err(format!("open {}: {e}", path.display())))?;
        Self::init(conn, Some(path.to_path_buf()), config)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory(config: RefmendConfig) -> RefmendResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| to_storage_err(format!("open in-memory: {e}")))?;
        Self::init(conn, None, config)
    }

    fn init(conn: Connection, path: Option<PathBuf>, config: RefmendConfig) -> RefmendResult<Self> {
        config.validate()?;
        pragmas::apply_pragmas(&conn)?;
        migrations::run_migrations(&conn, &config)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path,
            config,
        })
    }

    /// Run `f` against the connection.
    pub fn with_conn<F, T>(&self, f: F) -> RefmendResult<T>
    where
        F: FnOnce(&Connection) -> RefmendResult<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StorageError::SqliteError {
                message: "connection lock poisoned".to_string(),
            })?;
        f(&conn)
    }

    /// Repair the configured links in a transaction of their own.
    pub fn repair_references(&self) -> RefmendResult<RepairReport> {
        self.with_conn(|conn| repair::repair_in_transaction(conn, &self.config.repair.links))
    }

    /// Report orphans for the configured links without writing.
    pub fn plan_repair(&self) -> RefmendResult<RepairReport> {
        self.with_conn(|conn| repair::plan(conn, &self.config.repair.links))
    }

    pub fn schema_version(&self) -> RefmendResult<u32> {
        self.with_conn(|conn| Ok(migrations::current_version(conn)?))
    }

    /// Database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn config(&self) -> &RefmendConfig {
        &self.config
    }
}
