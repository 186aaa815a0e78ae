//! Headless runs of the console binary.

pub mod common;
pub mod headless_test;
