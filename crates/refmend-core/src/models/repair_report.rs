//! Outcome of a repair (or planning) pass.

use serde::Serialize;

use super::ReferenceLink;
use crate::resolve::Resolution;

/// What happened to one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRepairReport {
    pub link: ReferenceLink,
    pub parent_count: usize,
    pub child_count: usize,
    pub orphan_count: usize,
    /// `None` when the link had no orphans and nothing was resolved.
    pub resolution: Option<Resolution>,
    /// Always 0 for a planning pass.
    pub rows_updated: usize,
    /// Orphans counted by the store after the rewrite; equals
    /// `orphan_count` for a planning pass.
    pub remaining_orphans: usize,
}

impl LinkRepairReport {
    pub fn is_clean(&self) -> bool {
        self.orphan_count == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    pub applied: bool,
    pub links: Vec<LinkRepairReport>,
}

impl RepairReport {
    pub fn total_orphans(&self) -> usize {
        self.links.iter().map(|l| l.orphan_count).sum()
    }

    pub fn total_rows_updated(&self) -> usize {
        self.links.iter().map(|l| l.rows_updated).sum()
    }

    /// Report for a given child table, if that link was processed.
    pub fn for_child_table(&self, child_table: &str) -> Option<&LinkRepairReport> {
        self.links.iter().find(|l| l.link.child_table == child_table)
    }
}
