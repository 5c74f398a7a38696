//! Errors raised while repairing orphaned references.

use super::error_code::{self, RefmendErrorCode};
use super::{ConfigError, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum RepairError {
    /// The parent table has no rows, so no valid assignment target exists.
    #[error("Parent table '{parent_table}' is empty; orphaned references have no valid target")]
    EmptyParentSet { parent_table: String },

    #[error("Repair failed for {} link(s): {}", .failures.len(), .failures.join("; "))]
    LinksFailed { failures: Vec<String> },

    #[error("Invalid link: {0}")]
    InvalidLink(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl RefmendErrorCode for RepairError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyParentSet { .. } => error_code::EMPTY_PARENT_SET,
            Self::LinksFailed { .. } => error_code::LINKS_FAILED,
            Self::InvalidLink(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
        }
    }
}
