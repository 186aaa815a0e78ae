//! Error types for the debug console.
//!
//! Defines the main error enum plus the narrower errors produced by command
//! registration and by validation of external registration payloads.

use thiserror::Error;

/// Main error type for debug console operations.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// A command could not be added to the registry.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// An external registration payload was malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Configuration errors (invalid config file, bad CLI values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failures talking to the host runtime or the operating system.
    #[error("Host error: {0}")]
    Host(String),

    /// Internal application errors (unexpected states, terminal failures, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConsoleError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a host error with the given message.
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Registration(_) => "Registration Error",
            Self::Validation(_) => "Validation Error",
            Self::Config(_) => "Configuration Error",
            Self::Host(_) => "Host Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Rejection of a `register` call. The registry is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The `(source, name)` pair is already registered.
    #[error(
        "Unable to add duplicate prefixes from the same source. Source: {source_id} | Prefix: {name}"
    )]
    DuplicateQualifiedName { source_id: String, name: String },
}

/// Reasons an external registration payload is refused at the boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No handler was attached to the payload.
    #[error("missing 'executeCommand' handler")]
    MissingHandler,

    /// Neither `prefix` nor `name` was provided.
    #[error("missing command prefix")]
    MissingName,

    /// The prefix was empty after trimming.
    #[error("command prefix must not be empty")]
    EmptyName,

    /// The prefix contains whitespace and could never be typed as one token.
    #[error("command prefix '{0}' must not contain whitespace")]
    NameContainsWhitespace(String),

    /// The prefix contains `.`, which separates a source from a name.
    #[error("command prefix '{0}' must not contain '.'")]
    NameContainsSeparator(String),

    /// Both `prefix` and `name` were given and disagree.
    #[error("'prefix' ({prefix}) and 'name' ({name}) disagree")]
    AmbiguousName { prefix: String, name: String },

    /// The transport supplied an empty source identity.
    #[error("registering source must not be empty")]
    EmptySource,

    /// Payload metadata could not be decoded.
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Result type alias using ConsoleError.
pub type Result<T> = std::result::Result<T, ConsoleError>;
