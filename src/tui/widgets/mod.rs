//! Viewer widgets.

pub mod header;
pub mod input;
pub mod log;
