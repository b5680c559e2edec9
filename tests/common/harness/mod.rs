//! Test harness for integration tests.
//!
//! Provides isolated repository directories with helpers for writing files
//! and forcing modification times, plus CLI assertion helpers using
//! `assert_cmd`.

mod command;
mod env;

// Re-export main types for external use
#[allow(unused_imports)]
pub use command::GeodexCommand;
#[allow(unused_imports)]
pub use env::{BASE_MTIME, TestEnv};
