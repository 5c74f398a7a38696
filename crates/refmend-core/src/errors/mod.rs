pub mod error_code;

mod config_error;
mod refmend_error;
mod repair_error;
mod storage_error;

pub use config_error::ConfigError;
pub use refmend_error::{RefmendError, RefmendResult};
pub use repair_error::RepairError;
pub use storage_error::StorageError;
