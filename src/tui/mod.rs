//! Terminal viewer for the debug console.
//!
//! Runs the console process as an actor and renders its output with ratatui.
//! Key presses are handled by [`App`]; submitted lines go to the process and
//! come back as [`ConsoleEvent`]s.

pub mod app;
mod events;
pub mod headless;
mod history;
mod ui;
pub mod widgets;

pub use app::{App, AppAction};
pub use events::{Event, EventHandler};
pub use history::InputHistory;

use crate::commands::handler_running;
use crate::config::Config;
use crate::error::{ConsoleError, Result};
use crate::host::HostClient;
use crate::output::{ConsoleEvent, ConsoleOutput};
use crate::process::{ConsoleHandle, ConsoleProcess};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// The terminal viewer.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    events: EventHandler,
}

impl Tui {
    /// Switches the terminal to raw mode on the alternate screen.
    pub fn new() -> Result<Self> {
        let terminal = Self::setup_terminal()?;
        Ok(Self {
            terminal,
            events: EventHandler::new(),
        })
    }

    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| ConsoleError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|e| {
            ConsoleError::internal(format!("Failed to enter alternate screen: {e}"))
        })?;

        Terminal::new(CrosstermBackend::new(stdout))
            .map_err(|e| ConsoleError::internal(format!("Failed to create terminal: {e}")))
    }

    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| ConsoleError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(self.terminal.backend_mut(), LeaveAlternateScreen).map_err(|e| {
            ConsoleError::internal(format!("Failed to leave alternate screen: {e}"))
        })?;

        self.terminal
            .show_cursor()
            .map_err(|e| ConsoleError::internal(format!("Failed to show cursor: {e}")))
    }

    /// Restores the terminal before a panic report is printed.
    ///
    /// Panics inside command handlers are caught by the registry and reported
    /// in the console, so they are only logged here.
    fn install_panic_hook() {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            if handler_running() {
                error!("Command handler panicked: {}", panic_info);
                return;
            }
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));
    }

    /// Draws and handles events until the user quits.
    pub async fn run(
        &mut self,
        app: &mut App,
        handle: &ConsoleHandle,
        output: &mut mpsc::UnboundedReceiver<ConsoleEvent>,
    ) -> Result<()> {
        // A poll left running when output arrives is picked up next iteration.
        let mut pending: Option<JoinHandle<Result<Event>>> = None;

        loop {
            self.terminal
                .draw(|frame| ui::render(frame, app))
                .map_err(|e| ConsoleError::internal(format!("Failed to draw: {e}")))?;

            if !app.running {
                break;
            }

            let events = self.events;
            let poll = pending.get_or_insert_with(|| {
                tokio::task::spawn_blocking(move || events.next())
            });

            tokio::select! {
                polled = poll => {
                    pending = None;
                    let event = polled
                        .map_err(|e| ConsoleError::internal(format!("Event poll failed: {e}")))??;
                    self.handle_event(event, app, handle).await?;
                }

                Some(event) = output.recv() => {
                    app.apply(event);
                    while let Ok(event) = output.try_recv() {
                        app.apply(event);
                    }
                }
            }
        }

        Ok(())
    }

    async fn handle_event(
        &mut self,
        event: Event,
        app: &mut App,
        handle: &ConsoleHandle,
    ) -> Result<()> {
        match event {
            Event::Key(key) => match app.handle_key(key) {
                AppAction::Submit(line) => handle.input(line).await?,
                AppAction::Quit => info!("Quit requested"),
                AppAction::None => {}
            },
            // The next draw picks up the new size.
            Event::Resize(_, _) | Event::Tick => {}
        }
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the console with the terminal viewer until the user quits.
pub async fn run(config: &Config, host: Arc<dyn HostClient>) -> Result<()> {
    let (output, mut receiver) = ConsoleOutput::channel();
    let process = ConsoleProcess::new(config, host, output)?;
    let (handle, actor) = process.spawn();
    let task = tokio::spawn(actor.run());

    handle.init().await?;
    handle.gui_shown().await?;

    let mut app = App::new(config);
    let result = {
        let mut tui = Tui::new()?;
        Tui::install_panic_hook();
        tui.run(&mut app, &handle, &mut receiver).await
    };
    let _ = panic::take_hook();

    handle.shutdown();
    if let Err(e) = task.await {
        warn!("Console process ended abnormally: {}", e);
    }
    result
}
