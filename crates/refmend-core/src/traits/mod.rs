//! Store seam between the repair logic and the backing database.

pub mod reference_store;
pub mod test_helpers;

pub use reference_store::IReferenceStore;
pub use test_helpers::InMemoryReferenceStore;
