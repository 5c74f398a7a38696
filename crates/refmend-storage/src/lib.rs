//! # refmend-storage
//!
//! SQLite persistence layer for orphaned reference repair.
//! Pragmas, a single-connection manager, forward-only migrations,
//! and the `IReferenceStore` implementation over `rusqlite`.

pub mod connection;
pub mod migrations;
pub mod queries;
pub mod repair;
pub mod store;

pub use connection::DatabaseManager;
pub use store::SqliteReferenceStore;

/// Helper to convert a string message into a `StorageError::SqliteError`.
pub fn to_storage_err(msg: String) -> refmend_core::StorageError {
    refmend_core::StorageError::SqliteError { message: msg }
}
