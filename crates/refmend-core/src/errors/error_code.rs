//! Stable error codes for every refmend error type.

/// Maps an error to a stable, machine-readable code.
pub trait RefmendErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const EMPTY_PARENT_SET: &str = "EMPTY_PARENT_SET";
pub const LINKS_FAILED: &str = "LINKS_FAILED";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CONFIG_PARSE_ERROR: &str = "CONFIG_PARSE_ERROR";
pub const INVALID_IDENTIFIER: &str = "INVALID_IDENTIFIER";
pub const IO_ERROR: &str = "IO_ERROR";
