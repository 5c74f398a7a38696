//! SQL for the reference repair pass.

pub mod references;
