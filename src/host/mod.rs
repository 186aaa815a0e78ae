//! Boundary with the host runtime.
//!
//! The host delivers [`HostEvent`]s to the console process one at a time and
//! answers outbound [`HostRequest`]s through a [`HostClient`]. Source
//! identities arrive as [`ModuleId`]s asserted by the transport; nothing in
//! a payload can claim a different source.

pub mod local;
pub mod validation;

pub use local::LocalHost;
pub use validation::{validate_payload, CommandPayload};

use crate::config::ConsoleSettings;
use crate::error::Result;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tokio::sync::oneshot;

/// Identifier of a module known to the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// HTTP-style status carried by a [`DataResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    BadRequest,
    NotFound,
    Conflict,
    InternalServerError,
    NotImplemented,
}

impl StatusCode {
    pub fn as_u16(&self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::InternalServerError => 500,
            Self::NotImplemented => 501,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Structured reply exchanged with the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataResponse {
    pub code: StatusCode,
    pub body: String,
}

impl DataResponse {
    pub fn new(code: StatusCode, body: impl Into<String>) -> Self {
        Self {
            code,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(StatusCode::Ok, body)
    }
}

/// Docking position for a module's dev tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevToolsMode {
    Left,
    Right,
    Bottom,
    Detach,
    Undocked,
}

impl DevToolsMode {
    /// Flags accepted on the command line.
    pub const FLAGS: [&'static str; 5] = ["--left", "--right", "--bottom", "--detach", "--undocked"];

    /// Mode name as the host expects it (flag without dashes).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Detach => "detach",
            Self::Undocked => "undocked",
        }
    }
}

impl FromStr for DevToolsMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "--left" => Ok(Self::Left),
            "--right" => Ok(Self::Right),
            "--bottom" => Ok(Self::Bottom),
            "--detach" => Ok(Self::Detach),
            "--undocked" => Ok(Self::Undocked),
            _ => Err(format!(
                "Invalid devtool mode passed ('{s}'); Possible values are: {:?}",
                Self::FLAGS
            )),
        }
    }
}

/// Requests the console sends to the host's main module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    /// Open (or toggle) the web inspector of a module.
    OpenDevTools {
        module_id: ModuleId,
        mode: Option<DevToolsMode>,
    },
    /// Reload a module, optionally bypassing its cache.
    Reload { module_id: ModuleId, force: bool },
}

impl HostRequest {
    /// Event name on the host side.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::OpenDevTools { .. } => "open-dev-tools",
            Self::Reload { .. } => "reload",
        }
    }

    /// Module the request is about.
    pub fn module_id(&self) -> &ModuleId {
        match self {
            Self::OpenDevTools { module_id, .. } | Self::Reload { module_id, .. } => module_id,
        }
    }
}

/// Outbound connection to the host runtime.
#[async_trait]
pub trait HostClient: Send + Sync {
    /// Sends a request to `target` and waits for its response.
    async fn request(&self, target: &ModuleId, request: HostRequest) -> DataResponse;

    /// Opens `path` in the platform file browser.
    async fn open_directory(&self, path: &Path) -> Result<()>;
}

/// Requests other modules make of the console.
#[derive(Debug)]
pub enum ExternalRequest {
    /// Register a command under the requesting module's id.
    AddCommandPrefix {
        payload: CommandPayload,
        reply: Option<oneshot::Sender<DataResponse>>,
    },
}

/// Everything the host delivers to the console process.
#[derive(Debug)]
pub enum HostEvent {
    /// The viewer finished loading.
    Init,
    /// One line typed by the user.
    Input(String),
    /// The console window became visible.
    GuiShown,
    /// The user changed display settings.
    SettingsChanged(ConsoleSettings),
    /// A request from another module.
    External {
        source: ModuleId,
        request: ExternalRequest,
    },
}
