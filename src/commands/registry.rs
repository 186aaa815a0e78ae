//! Command registry and dispatch.
//!
//! Commands are registered per source. Every command stays reachable as
//! `source.name`; the bare `name` resolves only while a single source owns
//! it. Once a second source claims the same bare name, the binding becomes
//! [`BareBinding::Conflicted`] for good and invoking it lists the contenders
//! instead of picking one.

use crate::error::{RegistrationError, ValidationError};
use crate::host::{HostClient, ModuleId};
use crate::output::ConsoleOutput;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Signature of a command body. `args[0]` is the token the user typed.
pub type CommandFn =
    Arc<dyn Fn(&CommandContext<'_>, &[String]) -> anyhow::Result<()> + Send + Sync>;

/// Two-space indent unit used by all console listings.
pub(crate) fn indent(count: usize) -> String {
    "  ".repeat(count)
}

thread_local! {
    static IN_HANDLER: Cell<bool> = const { Cell::new(false) };
}

/// Returns true while a command handler runs on the current thread.
///
/// Panic hooks use this to tell a caught handler panic from a real crash.
pub fn handler_running() -> bool {
    IN_HANDLER.with(Cell::get)
}

/// Optional help text attached to a command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Documentation {
    pub short_description: Option<String>,
    pub long_description: Option<String>,
}

impl Documentation {
    /// Documentation with only a one-line summary.
    pub fn short(text: impl Into<String>) -> Self {
        Self {
            short_description: Some(text.into()),
            long_description: None,
        }
    }

    /// Documentation with a summary and a usage block.
    pub fn new(short: impl Into<String>, long: impl Into<String>) -> Self {
        Self {
            short_description: Some(short.into()),
            long_description: Some(long.into()),
        }
    }

    /// Returns true when neither field carries text.
    pub fn is_empty(&self) -> bool {
        self.short_description.is_none() && self.long_description.is_none()
    }
}

/// A registered command.
#[derive(Clone)]
pub struct Command {
    source: String,
    name: String,
    handler: CommandFn,
    documentation: Option<Documentation>,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("source", &self.source)
            .field("name", &self.name)
            .field("documentation", &self.documentation)
            .finish_non_exhaustive()
    }
}

impl Command {
    /// Creates a command from a closure.
    pub fn new<F>(
        source: impl Into<String>,
        name: impl Into<String>,
        handler: F,
    ) -> Result<Self, ValidationError>
    where
        F: Fn(&CommandContext<'_>, &[String]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::from_handler(source, name, Arc::new(handler))
    }

    /// Creates a command from a shared handler.
    ///
    /// The name is trimmed; it must be a single non-empty token without `.`,
    /// so a bare name never collides with a qualified one.
    pub fn from_handler(
        source: impl Into<String>,
        name: impl Into<String>,
        handler: CommandFn,
    ) -> Result<Self, ValidationError> {
        let source = source.into();
        if source.trim().is_empty() {
            return Err(ValidationError::EmptySource);
        }

        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if name.contains(char::is_whitespace) {
            return Err(ValidationError::NameContainsWhitespace(name.to_string()));
        }
        if name.contains('.') {
            return Err(ValidationError::NameContainsSeparator(name.to_string()));
        }

        Ok(Self {
            source,
            name: name.to_string(),
            handler,
            documentation: None,
        })
    }

    /// Attaches documentation. Empty documentation is dropped.
    pub fn with_documentation(mut self, documentation: Documentation) -> Self {
        self.documentation = (!documentation.is_empty()).then_some(documentation);
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `source.name`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.source, self.name)
    }

    pub fn documentation(&self) -> Option<&Documentation> {
        self.documentation.as_ref()
    }

    pub fn short_description(&self) -> Option<&str> {
        self.documentation
            .as_ref()
            .and_then(|d| d.short_description.as_deref())
    }

    pub fn long_description(&self) -> Option<&str> {
        self.documentation
            .as_ref()
            .and_then(|d| d.long_description.as_deref())
    }
}

/// Services a handler may use beyond its arguments.
pub struct CommandEnv {
    /// Id the console registers its built-ins under.
    pub module_id: ModuleId,
    /// Directory `dir` opens when called without a path.
    pub storage_dir: PathBuf,
    /// Host module that answers dev tools and reload requests.
    pub host_main_module: ModuleId,
    /// Connection to the host runtime.
    pub host: Arc<dyn HostClient>,
}

impl CommandEnv {
    pub fn new(
        module_id: ModuleId,
        storage_dir: impl Into<PathBuf>,
        host_main_module: ModuleId,
        host: Arc<dyn HostClient>,
    ) -> Self {
        Self {
            module_id,
            storage_dir: storage_dir.into(),
            host_main_module,
            host,
        }
    }
}

/// Context passed to a running handler.
pub struct CommandContext<'a> {
    /// The registry dispatching this command (read-only).
    pub registry: &'a CommandRegistry,
    /// Where results and diagnostics go.
    pub output: &'a ConsoleOutput,
    pub env: &'a CommandEnv,
}

/// Index of a command in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(usize);

/// What a bare name currently resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BareBinding {
    /// Exactly one source registered this name.
    Owned(CommandId),
    /// Two or more sources registered this name. Terminal.
    Conflicted,
}

/// Result of looking up a typed key.
#[derive(Debug)]
pub enum Resolution<'a> {
    Command(&'a Command),
    Conflict {
        name: String,
        contenders: Vec<&'a Command>,
    },
}

/// What happened to a dispatched line. Diagnostics have already been emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler ran to completion.
    Executed { qualified_name: String },
    /// The key is a conflicted bare name; contenders were listed.
    Conflicted { name: String },
    /// Nothing is registered under the key.
    Unknown { name: String },
    /// The handler returned an error or panicked.
    Failed {
        qualified_name: String,
        error: String,
    },
}

/// Owns every registered command and the name bindings derived from them.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    by_qualified_name: HashMap<String, CommandId>,
    by_bare_name: HashMap<String, BareBinding>,
    /// Sources in first-registration order, each with its commands in order.
    by_source: Vec<(String, Vec<CommandId>)>,
    source_index: HashMap<String, usize>,
    /// Contenders per conflicted bare name, first-seen order.
    conflicts: HashMap<String, Vec<CommandId>>,
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.commands.len())
            .field("sources", &self.by_source.len())
            .field("conflicts", &self.conflicts.len())
            .finish()
    }
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command.
    ///
    /// Fails without touching the registry when `(source, name)` is taken.
    pub fn register(&mut self, command: Command) -> Result<(), RegistrationError> {
        let qualified = command.qualified_name();
        if self.by_qualified_name.contains_key(&qualified) {
            return Err(RegistrationError::DuplicateQualifiedName {
                source_id: command.source,
                name: command.name,
            });
        }

        let id = CommandId(self.commands.len());
        let source = command.source.clone();
        let name = command.name.clone();
        self.commands.push(command);

        match self.source_index.get(&source) {
            Some(&index) => self.by_source[index].1.push(id),
            None => {
                self.source_index.insert(source.clone(), self.by_source.len());
                self.by_source.push((source.clone(), vec![id]));
            }
        }

        self.by_qualified_name.insert(qualified.clone(), id);

        match self.by_bare_name.get(&name).copied() {
            None => {
                self.by_bare_name.insert(name, BareBinding::Owned(id));
            }
            Some(binding) => {
                let contenders = self.conflicts.entry(name.clone()).or_default();
                if let BareBinding::Owned(previous) = binding {
                    contenders.push(previous);
                }
                contenders.push(id);
                warn!(
                    "Command prefix '{}' is now conflicted ({} contenders, latest {})",
                    name,
                    contenders.len(),
                    qualified
                );
                self.by_bare_name.insert(name, BareBinding::Conflicted);
            }
        }

        debug!("Registered command {}", qualified);
        Ok(())
    }

    /// Looks up a typed key: bare names first, then qualified names.
    pub fn resolve(&self, key: &str) -> Option<Resolution<'_>> {
        match self.by_bare_name.get(key) {
            Some(BareBinding::Owned(id)) => Some(Resolution::Command(self.get(*id))),
            Some(BareBinding::Conflicted) => Some(Resolution::Conflict {
                name: key.to_string(),
                contenders: self.conflicts_for(key).unwrap_or_default(),
            }),
            None => self
                .by_qualified_name
                .get(key)
                .map(|id| Resolution::Command(self.get(*id))),
        }
    }

    /// Returns the command registered under `source.name`.
    pub fn get_qualified(&self, qualified_name: &str) -> Option<&Command> {
        self.by_qualified_name
            .get(qualified_name)
            .map(|id| self.get(*id))
    }

    /// Returns the current binding of a bare name.
    pub fn bare_binding(&self, name: &str) -> Option<BareBinding> {
        self.by_bare_name.get(name).copied()
    }

    /// Returns true if two or more sources registered `name`.
    pub fn is_conflicted(&self, name: &str) -> bool {
        self.conflicts.contains_key(name)
    }

    /// Returns the contenders for a conflicted bare name, in first-seen order.
    pub fn conflicts_for(&self, name: &str) -> Option<Vec<&Command>> {
        self.conflicts
            .get(name)
            .map(|ids| ids.iter().map(|id| self.get(*id)).collect())
    }

    /// Returns the commands a source registered, in registration order.
    pub fn commands_for(&self, source: &str) -> Option<Vec<&Command>> {
        self.source_index
            .get(source)
            .map(|&index| self.commands_at(index))
    }

    /// Iterates sources in first-registration order.
    pub fn sources(&self) -> impl Iterator<Item = (&str, Vec<&Command>)> + '_ {
        self.by_source
            .iter()
            .enumerate()
            .map(|(index, (source, _))| (source.as_str(), self.commands_at(index)))
    }

    /// Returns true if `source` registered at least one command.
    pub fn has_source(&self, source: &str) -> bool {
        self.source_index.contains_key(source)
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Runs one input line.
    ///
    /// Unknown names and conflicted bare names are reported on `output`.
    /// Handler errors and panics are caught and reported there too.
    pub fn dispatch(
        &self,
        input_line: &str,
        env: &CommandEnv,
        output: &ConsoleOutput,
    ) -> DispatchOutcome {
        let args = split_input(input_line);
        let key = args[0].as_str();

        match self.resolve(key) {
            Some(Resolution::Command(command)) => self.invoke(command, &args, env, output),
            Some(Resolution::Conflict { name, contenders }) => {
                output.warn(format!(
                    "Could not execute command '{}' due to conflicting command prefixes found.\n{}",
                    name,
                    contender_lines(&contenders, 3)
                ));
                DispatchOutcome::Conflicted { name }
            }
            None => {
                output.error(format!("'{key}' is not recognized as a command."));
                DispatchOutcome::Unknown {
                    name: key.to_string(),
                }
            }
        }
    }

    fn invoke(
        &self,
        command: &Command,
        args: &[String],
        env: &CommandEnv,
        output: &ConsoleOutput,
    ) -> DispatchOutcome {
        let qualified_name = command.qualified_name();
        let ctx = CommandContext {
            registry: self,
            output,
            env,
        };

        let was_running = IN_HANDLER.with(|flag| flag.replace(true));
        let result = panic::catch_unwind(AssertUnwindSafe(|| (command.handler)(&ctx, args)));
        IN_HANDLER.with(|flag| flag.set(was_running));

        let error = match result {
            Ok(Ok(())) => return DispatchOutcome::Executed { qualified_name },
            Ok(Err(e)) => format!("{e:#}"),
            Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
        };

        warn!("Command {} failed: {}", qualified_name, error);
        output.error(format!("Command '{}' failed: {}", args[0], error));
        DispatchOutcome::Failed {
            qualified_name,
            error,
        }
    }

    fn get(&self, id: CommandId) -> &Command {
        &self.commands[id.0]
    }

    fn commands_at(&self, source_index: usize) -> Vec<&Command> {
        self.by_source[source_index]
            .1
            .iter()
            .map(|id| self.get(*id))
            .collect()
    }
}

/// Splits a line on whitespace. An empty line yields `[""]`.
pub fn split_input(input_line: &str) -> Vec<String> {
    let tokens: Vec<String> = input_line.split_whitespace().map(String::from).collect();
    if tokens.is_empty() {
        vec![String::new()]
    } else {
        tokens
    }
}

/// Formats contenders as indented `name -> source.name` lines.
pub(crate) fn contender_lines(contenders: &[&Command], depth: usize) -> String {
    contenders
        .iter()
        .map(|c| format!("{}{} -> {}", indent(depth), c.name(), c.qualified_name()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
