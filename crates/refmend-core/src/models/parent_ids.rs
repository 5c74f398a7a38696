//! The set of parent identifiers that are valid for one repair pass.

use rustc_hash::FxHashSet;

/// Parent identifiers in load order, with O(1) membership checks.
///
/// Load order is kept because the fallback target is the first loaded id.
/// Duplicate ids are dropped on construction (first occurrence wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentIdSet {
    ordered: Vec<i64>,
    members: FxHashSet<i64>,
}

impl ParentIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.members.contains(&id)
    }

    /// Whether an optional reference points at a member. NULL never does.
    pub fn is_valid_reference(&self, reference: Option<i64>) -> bool {
        reference.is_some_and(|id| self.contains(id))
    }

    /// First id in load order.
    pub fn first(&self) -> Option<i64> {
        self.ordered.first().copied()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.ordered.iter().copied()
    }
}

impl FromIterator<i64> for ParentIdSet {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            if set.members.insert(id) {
                set.ordered.push(id);
            }
        }
        set
    }
}
