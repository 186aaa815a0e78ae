//! Help introspection and rendering.
//!
//! The registry answers structured queries ([`SourceListing`],
//! [`CommandDescription`]); the `render_*` functions turn them into the text
//! the `help` command prints.

use super::registry::{indent, CommandRegistry, Resolution};
use super::Command;

/// One line of a source listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSummary {
    pub name: String,
    /// The bare name is shared with another source.
    pub conflicted: bool,
    pub short_description: Option<String>,
}

/// Commands registered by one source, in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceListing {
    pub source: String,
    pub commands: Vec<CommandSummary>,
}

/// Detailed answer for a single key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandDescription {
    /// The key resolves to one command.
    Command {
        name: String,
        source: String,
        short_description: Option<String>,
        long_description: Option<String>,
    },
    /// The key is a conflicted bare name.
    Conflicted {
        name: String,
        /// Qualified names of the contenders, first-seen order.
        contenders: Vec<String>,
    },
}

impl CommandRegistry {
    /// Lists every source with its commands.
    pub fn describe_all(&self) -> Vec<SourceListing> {
        self.sources()
            .map(|(source, commands)| self.listing(source, &commands))
            .collect()
    }

    /// Lists the commands of one source.
    pub fn describe_source(&self, source: &str) -> Option<SourceListing> {
        self.commands_for(source)
            .map(|commands| self.listing(source, &commands))
    }

    /// Describes the command a key resolves to.
    pub fn describe_command(&self, key: &str) -> Option<CommandDescription> {
        Some(match self.resolve(key)? {
            Resolution::Command(command) => CommandDescription::Command {
                name: command.name().to_string(),
                source: command.source().to_string(),
                short_description: command.short_description().map(str::to_string),
                long_description: command.long_description().map(str::to_string),
            },
            Resolution::Conflict { name, contenders } => CommandDescription::Conflicted {
                name,
                contenders: contenders.iter().map(|c| c.qualified_name()).collect(),
            },
        })
    }

    fn listing(&self, source: &str, commands: &[&Command]) -> SourceListing {
        SourceListing {
            source: source.to_string(),
            commands: commands
                .iter()
                .map(|c| CommandSummary {
                    name: c.name().to_string(),
                    conflicted: self.is_conflicted(c.name()),
                    short_description: c.short_description().map(str::to_string),
                })
                .collect(),
        }
    }
}

fn summary_line(summary: &CommandSummary) -> String {
    let mut line = format!("{}'{}'", indent(3), summary.name);
    if summary.conflicted {
        line.push_str(" [CONFLICTED]");
    }
    if let Some(short) = &summary.short_description {
        line.push_str(": ");
        line.push_str(short);
    }
    line
}

/// Renders the full command overview.
///
/// `module_id` is the console's own id, used in the qualified-name example.
pub fn render_overview(listings: &[SourceListing], module_id: &str) -> String {
    let mut out = vec![
        "\nTo learn more about a command, type 'help <command>' or '? <command>'".to_string(),
        format!(
            "\nYou can access all commands as '<moduleID>.<command>' (e.g. '{module_id}.help')\n"
        ),
    ];
    for listing in listings {
        out.push(format!("{}{}:", indent(2), listing.source));
        out.extend(listing.commands.iter().map(summary_line));
        out.push(String::new());
    }
    out.join("\n")
}

/// Renders the commands of a single source.
pub fn render_source(listing: &SourceListing) -> String {
    let mut out = vec![format!(
        "\n{}Module '{}' has the following commands:",
        indent(2),
        listing.source
    )];
    out.extend(listing.commands.iter().map(summary_line));
    out.join("\n") + "\n"
}

/// Renders a single command description.
pub fn render_command(description: &CommandDescription) -> String {
    let mut out = Vec::new();
    match description {
        CommandDescription::Command {
            name,
            source,
            short_description,
            long_description,
        } => {
            match short_description {
                Some(short) => out.push(short.trim().to_string()),
                None => out.push(format!("No documentation found for '{name}'")),
            }
            out.push(format!("{}Source: {}", indent(2), source));
            if let Some(long) = long_description {
                out.push(String::new());
                out.push(format!("{}{}", indent(2), long.trim()));
            }
        }
        CommandDescription::Conflicted { name, contenders } => {
            out.push(format!("'{name}' has multiple conflicts."));
            out.push(format!(
                "\n{}For more information about each command, type <moduleID>.{}",
                indent(2),
                name
            ));
            out.extend(
                contenders
                    .iter()
                    .map(|qualified| format!("{}{} -> {}", indent(3), name, qualified)),
            );
        }
    }
    out.join("\n") + "\n"
}
