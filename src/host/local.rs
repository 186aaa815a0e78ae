//! Standalone host used when the console runs as its own binary.
//!
//! Opens directories with the platform opener. Requests that only a real
//! host runtime can serve are answered with `501 Not Implemented`.

use super::{DataResponse, HostClient, HostRequest, ModuleId, StatusCode};
use crate::error::{ConsoleError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tracing::{info, warn};

/// Host stand-in for running outside a host runtime.
#[derive(Debug, Clone)]
pub struct LocalHost {
    opener: String,
}

impl LocalHost {
    /// Creates a host that opens directories with the platform default.
    pub fn new() -> Self {
        Self::with_opener(default_opener())
    }

    /// Creates a host that opens directories with `opener <path>`.
    pub fn with_opener(opener: impl Into<String>) -> Self {
        Self {
            opener: opener.into(),
        }
    }
}

impl Default for LocalHost {
    fn default() -> Self {
        Self::new()
    }
}

fn default_opener() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

#[async_trait]
impl HostClient for LocalHost {
    async fn request(&self, target: &ModuleId, request: HostRequest) -> DataResponse {
        warn!(
            "No host runtime attached; dropping '{}' for {}",
            request.event_name(),
            request.module_id()
        );
        DataResponse::new(
            StatusCode::NotImplemented,
            format!(
                "No host runtime is attached: '{}' for '{}' cannot be sent to '{}'.",
                request.event_name(),
                request.module_id(),
                target
            ),
        )
    }

    async fn open_directory(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(ConsoleError::host(format!(
                "'{}' does not exist",
                path.display()
            )));
        }

        info!("Opening {} with {}", path.display(), self.opener);
        let status = tokio::process::Command::new(&self.opener)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| ConsoleError::host(format!("Failed to run {}: {e}", self.opener)))?;

        // explorer.exe reports 1 even when the window opened.
        if status.success() || cfg!(target_os = "windows") {
            Ok(())
        } else {
            Err(ConsoleError::host(format!(
                "{} exited with {}",
                self.opener, status
            )))
        }
    }
}
