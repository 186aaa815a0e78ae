//! Shared fixtures for library scenarios.

use debug_console::commands::{
    Command, CommandEnv, CommandRegistry, DispatchOutcome, Documentation,
};
use debug_console::host::{LocalHost, ModuleId};
use debug_console::output::{drain, messages, ConsoleEvent, ConsoleOutput, LogLevel};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

pub const CONSOLE_ID: &str = "aarontburn.Debug_Console";

/// Calls recorded by [`recording`] handlers as `(qualified name, args)`.
pub type CallLog = Arc<Mutex<Vec<(String, Vec<String>)>>>;

/// A registry with an output channel and a handler environment.
pub struct Fixture {
    pub registry: CommandRegistry,
    pub env: CommandEnv,
    pub output: ConsoleOutput,
    pub events: mpsc::UnboundedReceiver<ConsoleEvent>,
}

impl Fixture {
    pub fn empty() -> Self {
        Self::with_registry(CommandRegistry::new())
    }

    pub fn with_builtins() -> Self {
        Self::with_registry(CommandRegistry::with_builtins(&ModuleId::new(CONSOLE_ID)).unwrap())
    }

    fn with_registry(registry: CommandRegistry) -> Self {
        let (output, events) = ConsoleOutput::channel();
        let env = CommandEnv::new(
            ModuleId::new(CONSOLE_ID),
            std::env::temp_dir(),
            ModuleId::new("nexus.Main"),
            Arc::new(LocalHost::new()),
        );
        Self {
            registry,
            env,
            output,
            events,
        }
    }

    /// Dispatches `line` and returns the outcome with the lines it printed.
    pub fn run(&mut self, line: &str) -> (DispatchOutcome, Vec<(LogLevel, String)>) {
        let outcome = self.registry.dispatch(line, &self.env, &self.output);
        (outcome, messages(&drain(&mut self.events)))
    }
}

/// A command that records every call into `calls`.
pub fn recording(source: &str, name: &str, calls: &CallLog) -> Command {
    let calls = Arc::clone(calls);
    let qualified = format!("{source}.{name}");
    Command::new(source, name, move |_ctx, args| {
        calls
            .lock()
            .unwrap()
            .push((qualified.clone(), args.to_vec()));
        Ok(())
    })
    .unwrap()
}

/// A documented command that does nothing.
pub fn documented(source: &str, name: &str, short: &str) -> Command {
    Command::new(source, name, |_ctx, _args| Ok(()))
        .unwrap()
        .with_documentation(Documentation::short(short))
}

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}
