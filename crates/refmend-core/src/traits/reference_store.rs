//! `IReferenceStore` trait — the reads and the single write a repair pass needs.
//!
//! The SQLite implementation lives in `refmend-storage`. Implementations
//! operate inside whatever transaction the caller already holds; they never
//! begin, commit or roll back on their own.

use crate::errors::StorageError;
use crate::models::{ChildRow, ParentIdSet, ReferenceLink};

pub trait IReferenceStore {
    /// Every id in the link's parent table, in ascending id order.
    fn load_parent_ids(&self, link: &ReferenceLink) -> Result<ParentIdSet, StorageError>;

    /// Every child row's id and current reference, in ascending child id order.
    fn load_child_references(&self, link: &ReferenceLink) -> Result<Vec<ChildRow>, StorageError>;

    /// Point every child row whose reference has no matching parent at
    /// `parent_id`. Returns the number of rows updated.
    fn rewrite_orphans(&self, link: &ReferenceLink, parent_id: i64) -> Result<usize, StorageError>;

    /// Number of child rows whose reference has no matching parent.
    fn count_orphans(&self, link: &ReferenceLink) -> Result<usize, StorageError>;
}

impl<T: IReferenceStore + ?Sized> IReferenceStore for &T {
    fn load_parent_ids(&self, link: &ReferenceLink) -> Result<ParentIdSet, StorageError> {
        (**self).load_parent_ids(link)
    }

    fn load_child_references(&self, link: &ReferenceLink) -> Result<Vec<ChildRow>, StorageError> {
        (**self).load_child_references(link)
    }

    fn rewrite_orphans(&self, link: &ReferenceLink, parent_id: i64) -> Result<usize, StorageError> {
        (**self).rewrite_orphans(link, parent_id)
    }

    fn count_orphans(&self, link: &ReferenceLink) -> Result<usize, StorageError> {
        (**self).count_orphans(link)
    }
}
