//! Library-level scenarios.

pub mod common;
pub mod process_test;
pub mod registry_test;
