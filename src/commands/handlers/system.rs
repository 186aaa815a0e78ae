//! Console handlers (help, ?, clear, argv).

use crate::commands::help::{render_command, render_overview, render_source, CommandDescription};
use crate::commands::CommandContext;
use serde::Serialize;

/// Handle `help` and `?`.
pub fn help(ctx: &CommandContext<'_>, args: &[String]) -> anyhow::Result<()> {
    let Some(query) = args.get(1) else {
        let listings = ctx.registry.describe_all();
        ctx.output
            .info(render_overview(&listings, ctx.env.module_id.as_str()));
        return Ok(());
    };

    // Module ids win over command names.
    if let Some(listing) = ctx.registry.describe_source(query) {
        ctx.output.info(render_source(&listing));
        return Ok(());
    }

    match ctx.registry.describe_command(query) {
        Some(description @ CommandDescription::Conflicted { .. }) => {
            ctx.output.warn(render_command(&description));
        }
        Some(description) => ctx.output.info(render_command(&description)),
        None => ctx
            .output
            .error("No matching moduleID or command prefixes found."),
    }
    Ok(())
}

/// Handle `clear`.
pub fn clear(ctx: &CommandContext<'_>, _args: &[String]) -> anyhow::Result<()> {
    ctx.output.clear();
    Ok(())
}

/// Handle `argv`.
pub fn argv(ctx: &CommandContext<'_>, _args: &[String]) -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    ctx.output.info(format!("{}\n", pretty_json(&args)?));
    Ok(())
}

/// Serializes `value` as JSON indented by four spaces.
fn pretty_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::handlers::testing::{builtins, env, MODULE_ID};
    use crate::commands::{Command, Documentation};
    use crate::host::LocalHost;
    use crate::output::{drain, messages, ConsoleEvent, ConsoleOutput, LogLevel};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn run(registry: &crate::commands::CommandRegistry, line: &str) -> Vec<ConsoleEvent> {
        let (output, mut rx) = ConsoleOutput::channel();
        registry.dispatch(line, &env(Arc::new(LocalHost::new())), &output);
        drain(&mut rx)
    }

    #[test]
    fn test_help_lists_builtins() {
        let lines = messages(&run(&builtins(), "help"));

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, LogLevel::Info);
        let text = &lines[0].1;
        assert!(text.contains(&format!("    {MODULE_ID}:")));
        assert!(text.contains("      'clear': Clears the console. Not reversible."));
        assert!(text.contains(&format!("(e.g. '{MODULE_ID}.help')")));
    }

    #[test]
    fn test_question_mark_is_help() {
        let registry = builtins();
        assert_eq!(
            messages(&run(&registry, "?")),
            messages(&run(&registry, "help"))
        );
    }

    #[test]
    fn test_help_clear_describes_command() {
        let lines = messages(&run(&builtins(), "help clear"));

        assert_eq!(
            lines,
            vec![(
                LogLevel::Info,
                format!(
                    "Clears the console. Not reversible.\n    Source: {MODULE_ID}\n\n    Usage: clear\n\n    - Clears the terminal. This action is not reversible.\n"
                )
            )]
        );
    }

    #[test]
    fn test_help_module_lists_source() {
        let lines = messages(&run(&builtins(), &format!("help {MODULE_ID}")));

        assert_eq!(lines[0].0, LogLevel::Info);
        assert!(lines[0]
            .1
            .starts_with(&format!("\n    Module '{MODULE_ID}' has the following commands:")));
        assert!(lines[0].1.contains("      'argv': Lists all command-line arguments."));
    }

    #[test]
    fn test_help_conflicted_prefix_warns() {
        let mut registry = builtins();
        registry
            .register(
                Command::new("nexus.Settings", "clear", |_ctx, _args| Ok(()))
                    .unwrap()
                    .with_documentation(Documentation::short("Resets settings.")),
            )
            .unwrap();

        let lines = messages(&run(&registry, "help clear"));
        assert_eq!(lines[0].0, LogLevel::Warn);
        assert!(lines[0].1.starts_with("'clear' has multiple conflicts."));
        assert!(lines[0]
            .1
            .contains(&format!("      clear -> {MODULE_ID}.clear")));
        assert!(lines[0].1.contains("      clear -> nexus.Settings.clear"));

        let qualified = messages(&run(&registry, "help nexus.Settings.clear"));
        assert_eq!(qualified[0].0, LogLevel::Info);
        assert!(qualified[0].1.starts_with("Resets settings."));
    }

    #[test]
    fn test_help_unknown_is_error() {
        assert_eq!(
            messages(&run(&builtins(), "help nothing")),
            vec![(
                LogLevel::Error,
                "No matching moduleID or command prefixes found.".to_string()
            )]
        );
    }

    #[test]
    fn test_clear_emits_signal_only() {
        assert_eq!(run(&builtins(), "clear"), vec![ConsoleEvent::Clear]);
    }

    #[test]
    fn test_argv_prints_indented_json() {
        let lines = messages(&run(&builtins(), "argv"));

        assert_eq!(lines[0].0, LogLevel::Info);
        let text = &lines[0].1;
        assert!(text.starts_with("[\n    \""));
        assert!(text.ends_with("]\n"));
        let parsed: Vec<String> = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed, std::env::args().collect::<Vec<_>>());
    }
}
