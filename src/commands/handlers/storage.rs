//! Handle `dir [path]`.

use super::spawn_detached;
use crate::commands::CommandContext;
use std::path::PathBuf;
use std::sync::Arc;

/// Opens `path` (the remaining tokens joined by spaces) or the storage directory.
pub fn dir(ctx: &CommandContext<'_>, args: &[String]) -> anyhow::Result<()> {
    let joined = args.get(1..).unwrap_or_default().join(" ");
    let path = if joined.is_empty() {
        ctx.env.storage_dir.clone()
    } else {
        PathBuf::from(joined)
    };

    ctx.output
        .info(format!("Opening directory '{}'", path.display()));

    let host = Arc::clone(&ctx.env.host);
    let output = ctx.output.clone();
    spawn_detached(async move {
        if let Err(e) = host.open_directory(&path).await {
            output.error(format!("Could not open directory: {e}"));
        }
    })
}
