//! The console process: owns the registry and reacts to host events.
//!
//! [`ConsoleProcess`] is the synchronous core used directly by the headless
//! runner and tests. [`ConsoleProcess::spawn`] wraps it in an actor that
//! receives [`HostEvent`]s over a channel, one at a time, so registration and
//! dispatch never interleave.

use crate::commands::{CommandEnv, CommandRegistry, DispatchOutcome};
use crate::config::{Config, ConsoleSettings};
use crate::error::{ConsoleError, Result};
use crate::host::{
    validate_payload, CommandPayload, DataResponse, ExternalRequest, HostClient, HostEvent,
    ModuleId, StatusCode,
};
use crate::output::ConsoleOutput;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Capacity of the host event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Registry, settings and host connection of one console.
pub struct ConsoleProcess {
    registry: CommandRegistry,
    env: CommandEnv,
    output: ConsoleOutput,
    settings: ConsoleSettings,
}

impl ConsoleProcess {
    /// Builds a console with the built-in commands registered.
    ///
    /// Output is tagged with the console's own module id.
    pub fn new(config: &Config, host: Arc<dyn HostClient>, output: ConsoleOutput) -> Result<Self> {
        let module_id = ModuleId::new(config.module.id.as_str());
        let registry = CommandRegistry::with_builtins(&module_id)?;
        let env = CommandEnv::new(
            module_id.clone(),
            config.module.storage_path(),
            ModuleId::new(config.host.main_module.as_str()),
            host,
        );

        info!(
            "Console {} ready with {} built-in commands",
            module_id,
            registry.len()
        );

        Ok(Self {
            registry,
            env,
            output: output.for_module(module_id.as_str()),
            settings: config.console.settings(),
        })
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn settings(&self) -> ConsoleSettings {
        self.settings
    }

    pub fn module_id(&self) -> &ModuleId {
        &self.env.module_id
    }

    /// Handles one host event.
    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::Init => self.output.settings(self.settings),
            HostEvent::Input(line) => {
                self.handle_input(&line);
            }
            HostEvent::GuiShown => self.output.focus(),
            HostEvent::SettingsChanged(settings) => {
                self.settings = settings;
                self.output.settings(settings);
            }
            HostEvent::External { source, request } => self.handle_external(&source, request),
        }
    }

    /// Dispatches one input line, trimmed.
    pub fn handle_input(&mut self, line: &str) -> DispatchOutcome {
        let outcome = self
            .registry
            .dispatch(line.trim(), &self.env, &self.output);
        debug!("Dispatched {:?}: {:?}", line, outcome);
        outcome
    }

    fn handle_external(&mut self, source: &ModuleId, request: ExternalRequest) {
        match request {
            ExternalRequest::AddCommandPrefix { payload, reply } => {
                let response = self.add_command(source, payload);
                if let Some(reply) = reply {
                    if reply.send(response).is_err() {
                        debug!("{} stopped waiting for its registration reply", source);
                    }
                }
            }
        }
    }

    /// Validates and registers a command on behalf of `source`.
    ///
    /// Answers `200` on success, `400` for a malformed payload and `409` when
    /// `source` already registered the name.
    pub fn add_command(&mut self, source: &ModuleId, payload: CommandPayload) -> DataResponse {
        let command = match validate_payload(source, payload) {
            Ok(command) => command,
            Err(e) => {
                let message = format!("Could not register command from {source}: {e}");
                self.output.error(message.as_str());
                return DataResponse::new(StatusCode::BadRequest, message);
            }
        };

        let qualified_name = command.qualified_name();
        match self.registry.register(command) {
            Ok(()) => {
                info!("{} registered {}", source, qualified_name);
                DataResponse::ok(format!("Registered '{qualified_name}'"))
            }
            Err(e) => {
                warn!("Rejected registration from {}: {}", source, e);
                DataResponse::new(StatusCode::Conflict, e.to_string())
            }
        }
    }

    /// Moves the process into an actor and returns a handle to it.
    pub fn spawn(self) -> (ConsoleHandle, ConsoleActor) {
        let (sender, receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();

        let actor = ConsoleActor {
            process: self,
            receiver,
            cancel: cancel.clone(),
        };
        (ConsoleHandle { sender, cancel }, actor)
    }
}

/// Event loop around a [`ConsoleProcess`].
pub struct ConsoleActor {
    process: ConsoleProcess,
    receiver: mpsc::Receiver<HostEvent>,
    cancel: CancellationToken,
}

impl ConsoleActor {
    /// Handles events until shutdown or until every handle is dropped.
    ///
    /// Returns the process so its final state can be inspected.
    pub async fn run(mut self) -> ConsoleProcess {
        info!("Console process started");
        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => break,

                event = self.receiver.recv() => match event {
                    Some(event) => self.process.handle_event(event),
                    None => break,
                },
            }
        }
        info!("Console process stopped");
        self.process
    }
}

/// Cloneable handle for sending events to the console actor.
#[derive(Clone)]
pub struct ConsoleHandle {
    sender: mpsc::Sender<HostEvent>,
    cancel: CancellationToken,
}

impl ConsoleHandle {
    /// Delivers a raw host event.
    pub async fn send(&self, event: HostEvent) -> Result<()> {
        self.sender
            .send(event)
            .await
            .map_err(|_| ConsoleError::internal("Console process closed"))
    }

    /// Signals that the viewer finished loading.
    pub async fn init(&self) -> Result<()> {
        self.send(HostEvent::Init).await
    }

    /// Submits one line of user input.
    pub async fn input(&self, line: impl Into<String>) -> Result<()> {
        self.send(HostEvent::Input(line.into())).await
    }

    /// Registers a command for `source` and waits for the response.
    pub async fn add_command(
        &self,
        source: ModuleId,
        payload: CommandPayload,
    ) -> Result<DataResponse> {
        let (reply, response) = oneshot::channel();
        self.send(HostEvent::External {
            source,
            request: ExternalRequest::AddCommandPrefix {
                payload,
                reply: Some(reply),
            },
        })
        .await?;
        response
            .await
            .map_err(|_| ConsoleError::internal("Console process dropped the registration"))
    }

    pub async fn update_settings(&self, settings: ConsoleSettings) -> Result<()> {
        self.send(HostEvent::SettingsChanged(settings)).await
    }

    pub async fn gui_shown(&self) -> Result<()> {
        self.send(HostEvent::GuiShown).await
    }

    /// Stops the actor. Events still queued are dropped.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}
