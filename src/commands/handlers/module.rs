//! Module control handlers (devtools, reload).
//!
//! Both forward a request to the host's main module and report its response.

use super::{report_response, spawn_detached};
use crate::commands::CommandContext;
use crate::host::{DevToolsMode, HostRequest, ModuleId};
use std::sync::Arc;
use tracing::debug;

const FORCE_FLAG: &str = "--force";

/// Handle `devtools <moduleID> [mode]`.
pub fn devtools(ctx: &CommandContext<'_>, args: &[String]) -> anyhow::Result<()> {
    let mode = match args.get(2).map(|flag| flag.parse::<DevToolsMode>()) {
        Some(Err(message)) => {
            ctx.output.error(message);
            return Ok(());
        }
        Some(Ok(mode)) => Some(mode),
        None => None,
    };

    let Some(module_id) = args.get(1) else {
        ctx.output.error(
            "Missing argument in position 1: <moduleID>; Usage: 'devtools <moduleID> [--detach | --left | --right | --bottom | --undocked]'\n",
        );
        return Ok(());
    };

    send(
        ctx,
        HostRequest::OpenDevTools {
            module_id: ModuleId::new(module_id.as_str()),
            mode,
        },
    )
}

/// Handle `reload <moduleID> [--force]`.
pub fn reload(ctx: &CommandContext<'_>, args: &[String]) -> anyhow::Result<()> {
    let Some(module_id) = args.get(1) else {
        ctx.output.error(
            "Missing argument in position 1: <moduleID>; Usage: 'reload <moduleID> [--force]'\n",
        );
        return Ok(());
    };

    let force = match args.get(2).map(String::as_str) {
        None => false,
        Some(FORCE_FLAG) => true,
        Some(other) => {
            ctx.output.error(format!(
                "Invalid reload flag passed ('{other}'); Possible values are: [\"{FORCE_FLAG}\"]"
            ));
            return Ok(());
        }
    };

    send(
        ctx,
        HostRequest::Reload {
            module_id: ModuleId::new(module_id.as_str()),
            force,
        },
    )
}

fn send(ctx: &CommandContext<'_>, request: HostRequest) -> anyhow::Result<()> {
    let host = Arc::clone(&ctx.env.host);
    let target = ctx.env.host_main_module.clone();
    let output = ctx.output.clone();

    debug!("Sending '{}' to {}", request.event_name(), target);
    spawn_detached(async move {
        let response = host.request(&target, request).await;
        report_response(&output, response);
    })
}
