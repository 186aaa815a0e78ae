//! Validation of external command registrations.
//!
//! Other modules hand the console a loosely-shaped [`CommandPayload`]. It is
//! checked here and turned into a [`Command`] before the registry sees it.

use crate::commands::{Command, CommandContext, CommandFn, Documentation};
use crate::error::ValidationError;
use crate::host::ModuleId;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// A registration request as received from another module.
#[derive(Clone, Default)]
pub struct CommandPayload {
    pub prefix: Option<String>,
    pub name: Option<String>,
    pub execute_command: Option<CommandFn>,
    pub documentation: Option<Documentation>,
}

impl fmt::Debug for CommandPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandPayload")
            .field("prefix", &self.prefix)
            .field("name", &self.name)
            .field("has_handler", &self.execute_command.is_some())
            .field("documentation", &self.documentation)
            .finish()
    }
}

/// Serializable part of a payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayloadMetadata {
    prefix: Option<String>,
    name: Option<String>,
    documentation: Option<Documentation>,
}

impl CommandPayload {
    /// Payload with a prefix and a handler.
    pub fn new<F>(prefix: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&CommandContext<'_>, &[String]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            prefix: Some(prefix.into()),
            execute_command: Some(Arc::new(handler)),
            ..Self::default()
        }
    }

    /// Reads prefix, name and documentation from JSON metadata.
    ///
    /// The handler never travels as JSON; attach it with [`Self::with_handler`].
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ValidationError> {
        if !value.is_object() {
            return Err(ValidationError::Malformed(format!(
                "expected an object, got {value}"
            )));
        }
        let metadata: PayloadMetadata = serde_json::from_value(value.clone())
            .map_err(|e| ValidationError::Malformed(e.to_string()))?;

        Ok(Self {
            prefix: metadata.prefix,
            name: metadata.name,
            execute_command: None,
            documentation: metadata.documentation,
        })
    }

    pub fn with_handler(mut self, handler: CommandFn) -> Self {
        self.execute_command = Some(handler);
        self
    }

    pub fn with_documentation(mut self, documentation: Documentation) -> Self {
        self.documentation = Some(documentation);
        self
    }
}

/// Checks a payload and builds the command `source` registers.
pub fn validate_payload(
    source: &ModuleId,
    payload: CommandPayload,
) -> Result<Command, ValidationError> {
    if source.as_str().trim().is_empty() {
        return Err(ValidationError::EmptySource);
    }

    let handler = payload
        .execute_command
        .ok_or(ValidationError::MissingHandler)?;

    let name = match (payload.prefix, payload.name) {
        (Some(prefix), Some(name)) if prefix.trim() != name.trim() => {
            return Err(ValidationError::AmbiguousName { prefix, name });
        }
        (Some(prefix), _) => prefix,
        (None, Some(name)) => name,
        (None, None) => return Err(ValidationError::MissingName),
    };

    let command = Command::from_handler(source.as_str(), name, handler)?;
    Ok(match payload.documentation {
        Some(documentation) => command.with_documentation(documentation),
        None => command,
    })
}
