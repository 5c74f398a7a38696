//! v002: point orphaned profile references at the library's most used profile.

use rusqlite::Connection;
use tracing::info;

use refmend_core::errors::RefmendResult;
use refmend_core::RefmendConfig;

use crate::repair;

pub fn migrate(conn: &Connection, config: &RefmendConfig) -> RefmendResult<()> {
    let report = repair::repair(conn, &config.repair.links)?;
    info!(
        links = report.links.len(),
        orphans = report.total_orphans(),
        rows_updated = report.total_rows_updated(),
        "fixed invalid profile references"
    );
    Ok(())
}
