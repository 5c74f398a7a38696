//! `InMemoryReferenceStore` — in-memory test double for `IReferenceStore`.
//!
//! Lets the resolver and orchestration be exercised without SQLite.
//! Tables are keyed by name; the link's column names are ignored.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::errors::StorageError;
use crate::models::{ChildRow, ParentIdSet, ReferenceLink};

use super::reference_store::IReferenceStore;

#[derive(Default)]
pub struct InMemoryReferenceStore {
    parents: Mutex<HashMap<String, Vec<i64>>>,
    children: Mutex<HashMap<String, Vec<ChildRow>>>,
    failing_tables: Mutex<HashSet<String>>,
    rewrite_calls: Mutex<usize>,
}

impl InMemoryReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the parent table's ids; order is preserved as load order.
    pub fn set_parents(&self, table: &str, ids: &[i64]) {
        self.parents.lock().unwrap().insert(table.to_string(), ids.to_vec());
    }

    /// Replace the child table with rows numbered 1.. holding `references`.
    pub fn set_children(&self, table: &str, references: &[Option<i64>]) {
        let rows = references
            .iter()
            .enumerate()
            .map(|(i, r)| ChildRow::new(i as i64 + 1, *r))
            .collect();
        self.children.lock().unwrap().insert(table.to_string(), rows);
    }

    /// Every access to this child table fails with a storage error.
    pub fn fail_table(&self, table: &str) {
        self.failing_tables.lock().unwrap().insert(table.to_string());
    }

    pub fn references(&self, table: &str) -> Vec<Option<i64>> {
        self.children
            .lock()
            .unwrap()
            .get(table)
            .map(|rows| rows.iter().map(|r| r.reference).collect())
            .unwrap_or_default()
    }

    /// How many times `rewrite_orphans` was invoked.
    pub fn rewrite_calls(&self) -> usize {
        *self.rewrite_calls.lock().unwrap()
    }

    fn check(&self, table: &str) -> Result<(), StorageError> {
        if self.failing_tables.lock().unwrap().contains(table) {
            return Err(StorageError::SqliteError {
                message: format!("injected failure on {table}"),
            });
        }
        Ok(())
    }

    fn parent_set(&self, table: &str) -> ParentIdSet {
        self.parents
            .lock()
            .unwrap()
            .get(table)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }
}

impl IReferenceStore for InMemoryReferenceStore {
    fn load_parent_ids(&self, link: &ReferenceLink) -> Result<ParentIdSet, StorageError> {
        self.check(&link.child_table)?;
        let mut ids: Vec<i64> = self.parent_set(&link.parent_table).iter().collect();
        ids.sort_unstable();
        Ok(ids.into_iter().collect())
    }

    fn load_child_references(&self, link: &ReferenceLink) -> Result<Vec<ChildRow>, StorageError> {
        self.check(&link.child_table)?;
        Ok(self
            .children
            .lock()
            .unwrap()
            .get(&link.child_table)
            .cloned()
            .unwrap_or_default())
    }

    fn rewrite_orphans(&self, link: &ReferenceLink, parent_id: i64) -> Result<usize, StorageError> {
        self.check(&link.child_table)?;
        *self.rewrite_calls.lock().unwrap() += 1;
        let parents = self.parent_set(&link.parent_table);
        let mut children = self.children.lock().unwrap();
        let mut updated = 0;
        if let Some(rows) = children.get_mut(&link.child_table) {
            for row in rows.iter_mut().filter(|r| !parents.is_valid_reference(r.reference)) {
                row.reference = Some(parent_id);
                updated += 1;
            }
        }
        Ok(updated)
    }

    fn count_orphans(&self, link: &ReferenceLink) -> Result<usize, StorageError> {
        self.check(&link.child_table)?;
        let parents = self.parent_set(&link.parent_table);
        Ok(self
            .children
            .lock()
            .unwrap()
            .get(&link.child_table)
            .map(|rows| {
                rows.iter()
                    .filter(|r| !parents.is_valid_reference(r.reference))
                    .count()
            })
            .unwrap_or(0))
    }
}
