//! Built-in command handlers.
//!
//! Each handler reports through the context's output and returns `Ok(())`
//! once the user has been told what happened. Work that needs the host runs
//! on a detached task and reports when it finishes.

pub mod module;
pub mod storage;
pub mod system;

use crate::host::DataResponse;
use crate::output::ConsoleOutput;
use anyhow::Context;
use std::future::Future;

/// Runs `future` on the current tokio runtime without waiting for it.
pub(crate) fn spawn_detached<F>(future: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = tokio::runtime::Handle::try_current()
        .context("No async runtime available to reach the host")?;
    handle.spawn(future);
    Ok(())
}

/// Shows a host response: `200` as info, anything else as error.
pub(crate) fn report_response(output: &ConsoleOutput, response: DataResponse) {
    if response.code.is_success() {
        output.info(format!("{}\n", response.body));
    } else {
        output.error(format!("{}\n", response.body));
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::commands::{CommandEnv, CommandRegistry};
    use crate::error::{ConsoleError, Result};
    use crate::host::{DataResponse, HostClient, HostRequest, ModuleId};
    use crate::output::{ConsoleEvent, LogLevel};
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::mpsc;

    pub const MODULE_ID: &str = "aarontburn.Debug_Console";

    /// Host that records what it was asked and answers with a fixed response.
    pub struct RecordingHost {
        pub requests: Mutex<Vec<(ModuleId, HostRequest)>>,
        pub opened: Mutex<Vec<PathBuf>>,
        pub response: DataResponse,
        pub open_error: Option<String>,
    }

    impl RecordingHost {
        pub fn answering(response: DataResponse) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                opened: Mutex::new(Vec::new()),
                response,
                open_error: None,
            })
        }

        pub fn failing_open(message: &str) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                opened: Mutex::new(Vec::new()),
                response: DataResponse::ok(""),
                open_error: Some(message.to_string()),
            })
        }
    }

    #[async_trait]
    impl HostClient for RecordingHost {
        async fn request(&self, target: &ModuleId, request: HostRequest) -> DataResponse {
            self.requests.lock().unwrap().push((target.clone(), request));
            self.response.clone()
        }

        async fn open_directory(&self, path: &Path) -> Result<()> {
            self.opened.lock().unwrap().push(path.to_path_buf());
            match &self.open_error {
                Some(message) => Err(ConsoleError::host(message.clone())),
                None => Ok(()),
            }
        }
    }

    pub fn env(host: Arc<dyn HostClient>) -> CommandEnv {
        CommandEnv::new(
            ModuleId::new(MODULE_ID),
            "/tmp/debug-console/storage",
            ModuleId::new("nexus.Main"),
            host,
        )
    }

    pub fn builtins() -> CommandRegistry {
        CommandRegistry::with_builtins(&ModuleId::new(MODULE_ID)).unwrap()
    }

    /// Waits for the next message event, skipping viewer signals.
    pub async fn next_message(rx: &mut mpsc::UnboundedReceiver<ConsoleEvent>) -> (LogLevel, String) {
        loop {
            let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("timed out waiting for console output")
                .expect("output channel closed");
            if let ConsoleEvent::Message(m) = event {
                return (m.level, m.text);
            }
        }
    }
}
