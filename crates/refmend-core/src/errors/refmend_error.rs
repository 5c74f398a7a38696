use super::error_code::RefmendErrorCode;
use super::{ConfigError, RepairError, StorageError};

/// Top-level error type for refmend.
/// All subsystem errors convert into this via `From` impls.
#[derive(Debug, thiserror::Error)]
pub enum RefmendError {
    #[error("repair error: {0}")]
    Repair(#[from] RepairError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl RefmendErrorCode for RefmendError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Repair(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}

/// Convenience type alias.
pub type RefmendResult<T> = Result<T, RefmendError>;
