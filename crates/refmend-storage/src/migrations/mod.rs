//! Migration runner — version tracking, forward-only, transactional per migration.

mod v001_initial_schema;
mod v002_fix_invalid_profile_references;

use std::time::Instant;

use rusqlite::{params, Connection};
use tracing::{debug, info, warn};

use refmend_core::errors::{RefmendResult, StorageError};
use refmend_core::RefmendConfig;

use crate::to_storage_err;

/// Total number of migrations.
pub const LATEST_VERSION: u32 = 2;

type MigrationFn = fn(&Connection, &RefmendConfig) -> RefmendResult<()>;

const MIGRATIONS: [(u32, &str, MigrationFn); 2] = [
    (1, "initial_schema", v001_initial_schema::migrate),
    (2, "fix_invalid_profile_references", v002_fix_invalid_profile_references::migrate),
];

const BOOKKEEPING_SQL: &str = "
    CREATE TABLE IF NOT EXISTS schema_version (
        version    INTEGER PRIMARY KEY,
        applied_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS migration_history (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        from_version INTEGER NOT NULL,
        to_version   INTEGER NOT NULL,
        name         TEXT NOT NULL,
        applied_at   TEXT NOT NULL DEFAULT (datetime('now')),
        duration_ms  INTEGER NOT NULL
    );
";

/// Get the current schema version from the database.
/// Returns 0 if the schema_version table doesn't exist yet.
pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
    let exists: bool = conn
        .prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version'")
        .and_then(|mut stmt| stmt.exists([]))
        .map_err(|e| to_storage_err(e.to_string()))?;

    if !exists {
        return Ok(0);
    }

    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection, config: &RefmendConfig) -> RefmendResult<u32> {
    run_migrations_to(conn, config, LATEST_VERSION)
}

/// Run pending migrations up to and including `target`. Returns how many
/// were applied. Each runs in its own transaction; a failure rolls that
/// migration back and stops the run.
pub fn run_migrations_to(conn: &Connection, config: &RefmendConfig, target: u32) -> RefmendResult<u32> {
    let current = current_version(conn)?;
    let target = target.min(LATEST_VERSION);
    let mut applied = 0;

    if current >= target {
        debug!("database schema is up to date (v{current}, target v{target})");
        return Ok(0);
    }

    conn.execute_batch(BOOKKEEPING_SQL)
        .map_err(|e| to_storage_err(format!("create schema_version: {e}")))?;

    info!("running migrations: v{current} → v{target}");

    let mut from_version = current;
    for &(version, name, migrate_fn) in &MIGRATIONS {
        if version <= current || version > target {
            continue;
        }

        debug!("applying migration v{version:03}: {name}");
        let started = Instant::now();

        conn.execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| to_storage_err(format!("begin transaction for v{version:03}: {e}")))?;

        let result = migrate_fn(conn, config)
            .and_then(|()| record_version(conn, from_version, version, name, started));

        match result {
            Ok(()) => {
                conn.execute_batch("COMMIT")
                    .map_err(|e| to_storage_err(format!("commit v{version:03}: {e}")))?;
                info!("applied migration v{version:03}: {name}");
                from_version = version;
                applied += 1;
            }
            Err(e) => {
                warn!("migration v{version:03} failed: {e}, rolling back");
                let _ = conn.execute_batch("ROLLBACK");
                return Err(StorageError::MigrationFailed {
                    version,
                    message: e.to_string(),
                }
                .into());
            }
        }
    }

    info!("applied {applied} migration(s), now at v{from_version}");
    Ok(applied)
}

fn record_version(
    conn: &Connection,
    from_version: u32,
    version: u32,
    name: &str,
    started: Instant,
) -> RefmendResult<()> {
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])
        .map_err(|e| to_storage_err(format!("record version v{version:03}: {e}")))?;
    conn.execute(
        "INSERT INTO migration_history (from_version, to_version, name, duration_ms)
         VALUES (?1, ?2, ?3, ?4)",
        params![from_version, version, name, started.elapsed().as_millis() as i64],
    )
    .map_err(|e| to_storage_err(format!("record history v{version:03}: {e}")))?;
    Ok(())
}
