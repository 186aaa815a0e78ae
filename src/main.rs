//! Debug Console: an interactive console with prefix-routed commands.

use debug_console::cli::Cli;
use debug_console::config::Config;
use debug_console::error::Result;
use debug_console::host::{HostClient, LocalHost};
use debug_console::logging;
use debug_console::tui;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    if cli.headless {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }

    match run(&cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: &Cli) -> Result<i32> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let host: Arc<dyn HostClient> = Arc::new(LocalHost::new());

    if cli.headless {
        return tui::headless::run_headless(cli, &config, host).await;
    }

    tui::run(&config, host).await?;
    Ok(0)
}
