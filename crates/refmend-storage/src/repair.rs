//! Orphaned reference repair against SQLite.

use rusqlite::Connection;
use tracing::warn;

use refmend_core::errors::{RefmendResult, RepairError};
use refmend_core::repair as link_repair;
use refmend_core::{ReferenceLink, RepairReport};

use crate::store::SqliteReferenceStore;
use crate::to_storage_err;

/// Repair `links` on `conn` inside the caller's transaction.
pub fn repair(conn: &Connection, links: &[ReferenceLink]) -> Result<RepairReport, RepairError> {
    link_repair::repair_links(&SqliteReferenceStore::new(conn), links)
}

/// Report orphans and the parent each link would resolve to. Read-only.
pub fn plan(conn: &Connection, links: &[ReferenceLink]) -> RefmendResult<RepairReport> {
    Ok(link_repair::plan_links(&SqliteReferenceStore::new(conn), links)?)
}

/// Repair `links` in a transaction of its own; nothing is kept on failure.
pub fn repair_in_transaction(
    conn: &Connection,
    links: &[ReferenceLink],
) -> RefmendResult<RepairReport> {
    conn.execute_batch("BEGIN IMMEDIATE")
        .map_err(|e| to_storage_err(format!("begin repair transaction: {e}")))?;

    match repair(conn, links) {
        Ok(report) => {
            conn.execute_batch("COMMIT")
                .map_err(|e| to_storage_err(format!("commit repair: {e}")))?;
            Ok(report)
        }
        Err(e) => {
            warn!("reference repair failed: {e}, rolling back");
            let _ = conn.execute_batch("ROLLBACK");
            Err(e.into())
        }
    }
}
