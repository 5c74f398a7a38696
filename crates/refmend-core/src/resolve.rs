//! Majority reference resolver.
//!
//! Picks the parent that orphaned child rows are reassigned to: the valid
//! parent referenced by the most child rows, or the first loaded parent when
//! no child row holds a valid reference. Pure; no store access.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::errors::RepairError;
use crate::models::ParentIdSet;

/// How the resolved parent was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionBasis {
    /// Most-referenced valid parent; `votes` child rows already point at it.
    Majority { votes: usize },
    /// No valid reference existed; first parent in load order.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub parent_id: i64,
    pub basis: ResolutionBasis,
}

/// Counts of valid references, kept in first-seen order.
///
/// Ties in `leader()` go to the group seen first, so the order of insertion
/// is significant and the tally is never re-sorted.
#[derive(Debug, Default)]
pub struct ReferenceTally {
    groups: Vec<(i64, usize)>,
    index: FxHashMap<i64, usize>,
}

impl ReferenceTally {
    /// Tally `references`, ignoring NULLs and ids outside `parents`.
    pub fn build<I>(parents: &ParentIdSet, references: I) -> Self
    where
        I: IntoIterator<Item = Option<i64>>,
    {
        let mut tally = Self::default();
        for id in references.into_iter().flatten() {
            if parents.contains(id) {
                tally.record(id);
            }
        }
        tally
    }

    fn record(&mut self, id: i64) {
        match self.index.get(&id) {
            Some(&slot) => self.groups[slot].1 += 1,
            None => {
                self.index.insert(id, self.groups.len());
                self.groups.push((id, 1));
            }
        }
    }

    pub fn count(&self, id: i64) -> usize {
        self.index.get(&id).map_or(0, |&slot| self.groups[slot].1)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Highest count; earliest group wins ties.
    pub fn leader(&self) -> Option<(i64, usize)> {
        let mut best: Option<(i64, usize)> = None;
        for &(id, count) in &self.groups {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((id, count));
            }
        }
        best
    }
}

/// Resolve the replacement parent for orphaned references.
///
/// `references` is every child row's current reference in row order,
/// duplicates included. Fails with `EmptyParentSet` when `parents` is empty.
/// The result is always a member of `parents`.
pub fn resolve_parent(
    parent_table: &str,
    parents: &ParentIdSet,
    references: &[Option<i64>],
) -> Result<Resolution, RepairError> {
    if parents.is_empty() {
        return Err(RepairError::EmptyParentSet {
            parent_table: parent_table.to_string(),
        });
    }

    let tally = ReferenceTally::build(parents, references.iter().copied());
    if let Some((parent_id, votes)) = tally.leader() {
        return Ok(Resolution {
            parent_id,
            basis: ResolutionBasis::Majority { votes },
        });
    }

    // Non-empty was checked above.
    let parent_id = parents.first().ok_or_else(|| RepairError::EmptyParentSet {
        parent_table: parent_table.to_string(),
    })?;
    Ok(Resolution {
        parent_id,
        basis: ResolutionBasis::Fallback,
    })
}
