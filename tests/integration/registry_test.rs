//! Registry routing, conflict handling and help scenarios.

use super::common::{call_log, documented, recording, Fixture, CONSOLE_ID};
use debug_console::commands::{BareBinding, CommandDescription, DispatchOutcome};
use debug_console::error::RegistrationError;
use debug_console::output::LogLevel;
use pretty_assertions::assert_eq;

#[test]
fn test_duplicate_registration_leaves_registry_unchanged() {
    let mut fixture = Fixture::empty();
    let calls = call_log();
    fixture
        .registry
        .register(recording("sourceA", "run", &calls))
        .unwrap();
    let before = fixture.registry.describe_all();

    let err = fixture
        .registry
        .register(documented("sourceA", "run", "replacement"))
        .unwrap_err();

    assert!(matches!(
        err,
        RegistrationError::DuplicateQualifiedName { ref source_id, ref name }
            if source_id == "sourceA" && name == "run"
    ));
    assert_eq!(fixture.registry.describe_all(), before);
    assert_eq!(fixture.registry.len(), 1);

    fixture.run("run");
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[test]
fn test_run_conflict_scenario() {
    let mut fixture = Fixture::empty();
    let calls = call_log();
    fixture
        .registry
        .register(recording("sourceA", "run", &calls))
        .unwrap();
    fixture
        .registry
        .register(recording("sourceB", "run", &calls))
        .unwrap();

    assert_eq!(
        fixture.registry.bare_binding("run"),
        Some(BareBinding::Conflicted)
    );

    let (outcome, lines) = fixture.run("run");
    assert_eq!(
        outcome,
        DispatchOutcome::Conflicted {
            name: "run".to_string()
        }
    );
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(
        lines,
        vec![(
            LogLevel::Warn,
            "Could not execute command 'run' due to conflicting command prefixes found.\n      run -> sourceA.run\n      run -> sourceB.run"
                .to_string()
        )]
    );

    let (outcome, lines) = fixture.run("sourceA.run");
    assert_eq!(
        outcome,
        DispatchOutcome::Executed {
            qualified_name: "sourceA.run".to_string()
        }
    );
    assert!(lines.is_empty());
    assert_eq!(
        *calls.lock().unwrap(),
        vec![("sourceA.run".to_string(), vec!["sourceA.run".to_string()])]
    );
}

#[test]
fn test_conflict_is_permanent_and_ordered() {
    let mut fixture = Fixture::empty();
    for source in ["a", "b", "c"] {
        fixture
            .registry
            .register(documented(source, "sync", source))
            .unwrap();
    }

    let contenders: Vec<String> = fixture
        .registry
        .conflicts_for("sync")
        .unwrap()
        .iter()
        .map(|c| c.qualified_name())
        .collect();
    assert_eq!(contenders, vec!["a.sync", "b.sync", "c.sync"]);

    for qualified in ["a.sync", "b.sync", "c.sync"] {
        let (outcome, _) = fixture.run(qualified);
        assert!(matches!(outcome, DispatchOutcome::Executed { .. }));
    }
    assert!(fixture.registry.is_conflicted("sync"));
}

#[test]
fn test_unique_bare_name_passes_arguments() {
    let mut fixture = Fixture::empty();
    let calls = call_log();
    fixture
        .registry
        .register(recording("nexus.Settings", "theme", &calls))
        .unwrap();

    fixture.run("theme   dark  --save");

    assert_eq!(
        *calls.lock().unwrap(),
        vec![(
            "nexus.Settings.theme".to_string(),
            vec!["theme".to_string(), "dark".to_string(), "--save".to_string()]
        )]
    );
}

#[test]
fn test_empty_input_is_unknown() {
    let mut fixture = Fixture::with_builtins();

    let (outcome, lines) = fixture.run("");

    assert_eq!(
        outcome,
        DispatchOutcome::Unknown {
            name: String::new()
        }
    );
    assert_eq!(
        lines,
        vec![(
            LogLevel::Error,
            "'' is not recognized as a command.".to_string()
        )]
    );
}

#[test]
fn test_help_clear_prints_documentation() {
    let mut fixture = Fixture::with_builtins();

    let (_, lines) = fixture.run("help clear");

    assert_eq!(
        lines,
        vec![(
            LogLevel::Info,
            format!(
                "Clears the console. Not reversible.\n    Source: {CONSOLE_ID}\n\n    Usage: clear\n\n    - Clears the terminal. This action is not reversible.\n"
            )
        )]
    );
}

#[test]
fn test_describe_all_keeps_registration_order() {
    let mut fixture = Fixture::empty();
    fixture
        .registry
        .register(documented("zeta", "one", "first"))
        .unwrap();
    fixture
        .registry
        .register(documented("alpha", "two", "second"))
        .unwrap();
    fixture
        .registry
        .register(documented("zeta", "three", "third"))
        .unwrap();

    let listings = fixture.registry.describe_all();
    let shape: Vec<(String, Vec<String>)> = listings
        .iter()
        .map(|l| {
            (
                l.source.clone(),
                l.commands.iter().map(|c| c.name.clone()).collect(),
            )
        })
        .collect();

    assert_eq!(
        shape,
        vec![
            ("zeta".to_string(), vec!["one".to_string(), "three".to_string()]),
            ("alpha".to_string(), vec!["two".to_string()]),
        ]
    );
}

#[test]
fn test_describe_command() {
    let mut fixture = Fixture::with_builtins();

    match fixture.registry.describe_command("help") {
        Some(CommandDescription::Command {
            short_description, ..
        }) => assert_eq!(
            short_description.as_deref(),
            Some("Displays all commands, or information about a single command.")
        ),
        other => panic!("Expected a command description, got {other:?}"),
    }
    assert_eq!(fixture.registry.describe_command("nonexistent"), None);

    let (_, lines) = fixture.run("help nonexistent");
    assert_eq!(
        lines,
        vec![(
            LogLevel::Error,
            "No matching moduleID or command prefixes found.".to_string()
        )]
    );
}

#[test]
fn test_help_for_conflicted_name_lists_contenders() {
    let mut fixture = Fixture::with_builtins();
    fixture
        .registry
        .register(documented("acme.Tools", "clear", "Clears the tool cache."))
        .unwrap();

    let (_, lines) = fixture.run("? clear");

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].0, LogLevel::Warn);
    assert_eq!(
        lines[0].1,
        format!(
            "'clear' has multiple conflicts.\n\n    For more information about each command, type <moduleID>.clear\n      clear -> {CONSOLE_ID}.clear\n      clear -> acme.Tools.clear\n"
        )
    );
}

#[test]
fn test_help_for_module_lists_its_commands() {
    let mut fixture = Fixture::with_builtins();
    fixture
        .registry
        .register(documented("acme.Tools", "ping", "Pings the tools."))
        .unwrap();

    let (_, lines) = fixture.run("help acme.Tools");

    assert_eq!(
        lines,
        vec![(
            LogLevel::Info,
            "\n    Module 'acme.Tools' has the following commands:\n      'ping': Pings the tools.\n"
                .to_string()
        )]
    );
}

#[test]
fn test_failing_and_panicking_handlers_are_contained() {
    let mut fixture = Fixture::with_builtins();
    fixture
        .registry
        .register(
            debug_console::commands::Command::new("acme.Tools", "fail", |_ctx, _args| {
                anyhow::bail!("disk full")
            })
            .unwrap(),
        )
        .unwrap();
    fixture
        .registry
        .register(
            debug_console::commands::Command::new("acme.Tools", "boom", |_ctx, _args| {
                panic!("kaboom")
            })
            .unwrap(),
        )
        .unwrap();

    let (outcome, lines) = fixture.run("fail");
    assert!(matches!(outcome, DispatchOutcome::Failed { .. }));
    assert_eq!(
        lines,
        vec![(LogLevel::Error, "Command 'fail' failed: disk full".to_string())]
    );

    let (outcome, lines) = fixture.run("acme.Tools.boom");
    assert!(matches!(outcome, DispatchOutcome::Failed { .. }));
    assert_eq!(
        lines[0].1,
        "Command 'acme.Tools.boom' failed: panicked: kaboom"
    );

    let (outcome, _) = fixture.run("clear");
    assert!(matches!(outcome, DispatchOutcome::Executed { .. }));
}
