//! Parent id load, child reference scan, orphan count and bulk rewrite.
//!
//! Table and column names come from a validated `ReferenceLink` and are
//! quoted; values are always bound as parameters.

use rusqlite::{params, Connection};

use refmend_core::errors::StorageError;
use refmend_core::{ChildRow, ParentIdSet, ReferenceLink};

use crate::to_storage_err;

fn quote(ident: &str) -> String {
    format!("\"{ident}\"")
}

/// `<child> LEFT OUTER JOIN <parent> ... WHERE <parent>.<pid> IS NULL`
fn orphan_join(link: &ReferenceLink) -> String {
    let child = quote(&link.child_table);
    let parent = quote(&link.parent_table);
    format!(
        "{child} LEFT OUTER JOIN {parent} ON {child}.{reference} = {parent}.{pid} \
         WHERE {parent}.{pid} IS NULL",
        reference = quote(&link.reference_column),
        pid = quote(&link.parent_id_column),
    )
}

pub fn load_parent_ids(conn: &Connection, link: &ReferenceLink) -> Result<ParentIdSet, StorageError> {
    let sql = format!(
        "SELECT {pid} FROM {parent} ORDER BY {pid}",
        pid = quote(&link.parent_id_column),
        parent = quote(&link.parent_table),
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(format!("load parent ids from {}: {e}", link.parent_table)))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, i64>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<ParentIdSet, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn load_child_references(
    conn: &Connection,
    link: &ReferenceLink,
) -> Result<Vec<ChildRow>, StorageError> {
    let sql = format!(
        "SELECT {id}, {reference} FROM {child} ORDER BY {id}",
        id = quote(&link.child_id_column),
        reference = quote(&link.reference_column),
        child = quote(&link.child_table),
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(format!("load references from {}: {e}", link.child_table)))?;
    let rows = stmt
        .query_map([], |row| Ok(ChildRow::new(row.get(0)?, row.get(1)?)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn count_orphans(conn: &Connection, link: &ReferenceLink) -> Result<usize, StorageError> {
    let sql = format!("SELECT COUNT(*) FROM {}", orphan_join(link));
    let count: i64 = conn
        .query_row(&sql, [], |row| row.get(0))
        .map_err(|e| to_storage_err(format!("count orphans in {}: {e}", link.child_table)))?;
    Ok(count as usize)
}

/// Single bulk update of every orphaned row to `parent_id`.
pub fn rewrite_orphans(
    conn: &Connection,
    link: &ReferenceLink,
    parent_id: i64,
) -> Result<usize, StorageError> {
    let child = quote(&link.child_table);
    let id = quote(&link.child_id_column);
    let sql = format!(
        "UPDATE {child} SET {reference} = ?1 WHERE {child}.{id} IN (SELECT {child}.{id} FROM {join})",
        reference = quote(&link.reference_column),
        join = orphan_join(link),
    );
    conn.execute(&sql, params![parent_id])
        .map_err(|e| to_storage_err(format!("rewrite orphans in {}: {e}", link.child_table)))
}
