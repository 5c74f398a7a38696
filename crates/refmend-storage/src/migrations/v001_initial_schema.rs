//! v001: profiles and the two tables that reference them.
//!
//! `profile_id` carries no FOREIGN KEY constraint; rows can outlive the
//! profile they point at.

use rusqlite::Connection;

use refmend_core::errors::RefmendResult;
use refmend_core::RefmendConfig;

use crate::to_storage_err;

pub fn migrate(conn: &Connection, _config: &RefmendConfig) -> RefmendResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS profiles (
            id     INTEGER PRIMARY KEY,
            name   TEXT NOT NULL,
            cutoff INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS movies (
            id         INTEGER PRIMARY KEY,
            title      TEXT NOT NULL,
            tmdb_id    INTEGER NOT NULL,
            monitored  INTEGER NOT NULL DEFAULT 1,
            profile_id INTEGER
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_movies_tmdb ON movies(tmdb_id);
        CREATE INDEX IF NOT EXISTS idx_movies_profile ON movies(profile_id);

        CREATE TABLE IF NOT EXISTS import_lists (
            id         INTEGER PRIMARY KEY,
            name       TEXT NOT NULL,
            enabled    INTEGER NOT NULL DEFAULT 1,
            profile_id INTEGER
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
