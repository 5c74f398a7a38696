//! # refmend-core
//!
//! Foundation crate for orphaned-reference repair.
//! Defines the link configuration, errors, the pure majority resolver,
//! the `IReferenceStore` seam and the per-link repair orchestration.
//! The SQLite implementation of the store lives in `refmend-storage`.

pub mod config;
pub mod errors;
pub mod models;
pub mod repair;
pub mod resolve;
pub mod logging;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::RefmendConfig;
pub use errors::error_code::RefmendErrorCode;
pub use errors::{RefmendError, RefmendResult, RepairError, StorageError};
pub use models::{ChildRow, LinkRepairReport, ParentIdSet, ReferenceLink, RepairReport};
pub use resolve::{resolve_parent, Resolution, ResolutionBasis};
pub use traits::IReferenceStore;
