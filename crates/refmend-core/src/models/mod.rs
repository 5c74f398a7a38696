//! Data model for reference repair.

pub mod child_row;
pub mod parent_ids;
pub mod reference_link;
pub mod repair_report;

pub use child_row::ChildRow;
pub use parent_ids::ParentIdSet;
pub use reference_link::ReferenceLink;
pub use repair_report::{LinkRepairReport, RepairReport};
