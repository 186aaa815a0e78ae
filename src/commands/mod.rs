//! Command registry, built-in commands and help introspection.
//!
//! The registry is plain synchronous data owned by the console process.
//! Handlers receive the split input line and report through
//! [`crate::output::ConsoleOutput`].

pub mod definitions;
pub mod handlers;
pub mod help;
pub mod registry;

pub use definitions::{BuiltinDef, BUILTINS};
pub use help::{CommandDescription, CommandSummary, SourceListing};
pub use registry::{
    handler_running, split_input, BareBinding, Command, CommandContext, CommandEnv, CommandFn,
    CommandId, CommandRegistry, DispatchOutcome, Documentation, Resolution,
};
