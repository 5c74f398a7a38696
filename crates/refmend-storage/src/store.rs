//! `IReferenceStore` over a borrowed SQLite connection.

use rusqlite::Connection;

use refmend_core::errors::StorageError;
use refmend_core::{ChildRow, IReferenceStore, ParentIdSet, ReferenceLink};

use crate::queries::references;

/// Borrows the caller's connection, so every call lands in the caller's
/// open transaction.
pub struct SqliteReferenceStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReferenceStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl IReferenceStore for SqliteReferenceStore<'_> {
    fn load_parent_ids(&self, link: &ReferenceLink) -> Result<ParentIdSet, StorageError> {
        references::load_parent_ids(self.conn, link)
    }

    fn load_child_references(&self, link: &ReferenceLink) -> Result<Vec<ChildRow>, StorageError> {
        references::load_child_references(self.conn, link)
    }

    fn rewrite_orphans(&self, link: &ReferenceLink, parent_id: i64) -> Result<usize, StorageError> {
        references::rewrite_orphans(self.conn, link, parent_id)
    }

    fn count_orphans(&self, link: &ReferenceLink) -> Result<usize, StorageError> {
        references::count_orphans(self.conn, link)
    }
}
