//! Built-in command table.
//!
//! Every console ships these commands under its own module id. The table
//! carries the help text so `help` and the registry never drift apart.

use super::handlers::{module, storage, system};
use super::{Command, CommandContext, CommandRegistry, Documentation};
use crate::error::Result;
use crate::host::ModuleId;

/// Body of a built-in command.
pub type BuiltinFn = fn(&CommandContext<'_>, &[String]) -> anyhow::Result<()>;

/// Static description of a built-in command.
pub struct BuiltinDef {
    /// Prefix the user types.
    pub name: &'static str,
    /// One-line summary shown in listings.
    pub description: &'static str,
    /// Usage block shown by `help <name>`.
    pub usage: Option<&'static str>,
    pub run: BuiltinFn,
}

impl BuiltinDef {
    pub fn documentation(&self) -> Documentation {
        Documentation {
            short_description: Some(self.description.to_string()),
            long_description: self.usage.map(str::to_string),
        }
    }
}

/// All built-in commands, in listing order.
pub static BUILTINS: &[BuiltinDef] = &[
    BuiltinDef {
        name: "help",
        description: "Displays all commands, or information about a single command.",
        usage: Some(
            r#"
Usage: help [moduleID / command]

    - Synonymous for '?'
    - When used without any arguments, this command will display all registered commands
    - To get information about a specific command, type (without brackets) 'help [command]'
    - To get all commands from a specific module, type (without brackets) 'help [moduleID]'

    Example: Get information about the 'clear' command.
    >> help clear"#,
        ),
        run: system::help,
    },
    BuiltinDef {
        name: "?",
        description: "Displays all commands, or information about a single command.",
        usage: Some(
            r#"
Usage: ? [moduleID / command]

    - Synonymous for 'help'
    - When used without any arguments, this command will display all registered commands
    - To get information about a specific command, type (without brackets) '? [command]'
    - To get all commands from a specific module, type (without brackets) '? [moduleID]'

    Example: Get information about the 'clear' command.
    >> ? clear"#,
        ),
        run: system::help,
    },
    BuiltinDef {
        name: "clear",
        description: "Clears the console. Not reversible.",
        usage: Some(
            r#"
Usage: clear

    - Clears the terminal. This action is not reversible."#,
        ),
        run: system::clear,
    },
    BuiltinDef {
        name: "dir",
        description: "Opens a directory.",
        usage: Some(
            r#"
Usage: dir [path]

    - Opens a directory. If 'path' isn't provided, opens the storage for the application.

    Example: Navigating to the '/var/log' directory
    >> dir /var/log"#,
        ),
        run: storage::dir,
    },
    BuiltinDef {
        name: "devtools",
        description: "Opens the web inspector for a specific module.",
        usage: Some(
            r#"
Usage: devtools <moduleID> [--detach | --left | --right | --bottom | --undocked]

    - Opens the developer tools for a specified module.
    - This module has direct permission to open the devtools of any module.
    - If a dock mode isn't provided, this will default to the right.
    - If the devtools are already open for the specified module, this will close it first.

    Example: Opening the devtools of the Settings module as its own window.
    >> devtools nexus.Settings --undocked"#,
        ),
        run: module::devtools,
    },
    BuiltinDef {
        name: "argv",
        description: "Lists all command-line arguments.",
        usage: None,
        run: system::argv,
    },
    BuiltinDef {
        name: "reload",
        description: "Reloads a specific module.",
        usage: Some(
            r#"
Usage: reload <moduleID> [--force]

    - Reloads a specific module.
    - This module has direct permission to refresh any module.
    - This will only work on non-internal modules.
    - If the '--force' flag is provided, this will bypass the cache and reload.

    Example: Reloading the Settings module.
    >> reload nexus.Settings --force"#,
        ),
        run: module::reload,
    },
];

impl CommandRegistry {
    /// Creates a registry holding the built-in commands under `module_id`.
    pub fn with_builtins(module_id: &ModuleId) -> Result<Self> {
        let mut registry = Self::new();
        for def in BUILTINS {
            let command = Command::new(module_id.as_str(), def.name, def.run)?
                .with_documentation(def.documentation());
            registry.register(command)?;
        }
        Ok(registry)
    }
}
