//! External registration and input through a running console process.

use debug_console::commands::{CommandContext, Documentation};
use debug_console::config::Config;
use debug_console::host::{CommandPayload, LocalHost, ModuleId, StatusCode};
use debug_console::output::{messages, ConsoleEvent, ConsoleOutput, LogLevel};
use debug_console::process::ConsoleProcess;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

async fn next_line(events: &mut mpsc::UnboundedReceiver<ConsoleEvent>) -> (LogLevel, String) {
    loop {
        let event = timeout(Duration::from_secs(2), events.recv())
            .await
            .expect("Timed out waiting for console output")
            .expect("Console output closed");
        if let Some(line) = messages(&[event]).pop() {
            return line;
        }
    }
}

#[tokio::test]
async fn test_external_registration_round_trip() {
    let (output, mut events) = ConsoleOutput::channel();
    let process =
        ConsoleProcess::new(&Config::default(), Arc::new(LocalHost::new()), output).unwrap();
    let (handle, actor) = process.spawn();
    let task = tokio::spawn(actor.run());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let payload = CommandPayload::from_json(&json!({
        "prefix": "ping",
        "documentation": { "shortDescription": "Replies with pong." }
    }))
    .unwrap()
    .with_handler(Arc::new(
        move |ctx: &CommandContext<'_>, args: &[String]| -> anyhow::Result<()> {
            recorder.lock().unwrap().push(args.to_vec());
            ctx.output.info("pong");
            Ok(())
        },
    ));

    let source = ModuleId::new("acme.Tools");
    let response = handle.add_command(source.clone(), payload).await.unwrap();
    assert_eq!(response.code, StatusCode::Ok);
    assert_eq!(response.body, "Registered 'acme.Tools.ping'");

    let duplicate = handle
        .add_command(
            source.clone(),
            CommandPayload::new("ping", |_ctx, _args| Ok(())),
        )
        .await
        .unwrap();
    assert_eq!(duplicate.code, StatusCode::Conflict);
    assert_eq!(
        duplicate.body,
        "Unable to add duplicate prefixes from the same source. Source: acme.Tools | Prefix: ping"
    );

    let malformed = handle
        .add_command(
            source.clone(),
            CommandPayload::new("two words", |_ctx, _args| Ok(())),
        )
        .await
        .unwrap();
    assert_eq!(malformed.code, StatusCode::BadRequest);
    let (level, text) = next_line(&mut events).await;
    assert_eq!(level, LogLevel::Error);
    assert!(text.starts_with("Could not register command from acme.Tools"));

    handle.input("  ping hello  ").await.unwrap();
    assert_eq!(next_line(&mut events).await, (LogLevel::Info, "pong".to_string()));

    handle.input("help acme.Tools").await.unwrap();
    let (_, listing) = next_line(&mut events).await;
    assert!(listing.contains("'ping': Replies with pong."));

    handle.shutdown();
    let process = timeout(Duration::from_secs(2), task).await.unwrap().unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![vec!["ping".to_string(), "hello".to_string()]]
    );
    assert!(process.registry().get_qualified("acme.Tools.ping").is_some());
}

#[tokio::test]
async fn test_registration_conflicts_with_builtin() {
    let (output, mut events) = ConsoleOutput::channel();
    let mut process =
        ConsoleProcess::new(&Config::default(), Arc::new(LocalHost::new()), output).unwrap();

    let response = process.add_command(
        &ModuleId::new("acme.Tools"),
        CommandPayload::new("clear", |_ctx, _args| Ok(()))
            .with_documentation(Documentation::short("Clears tool caches.")),
    );
    assert_eq!(response.code, StatusCode::Ok);

    process.handle_input("clear");
    let (level, text) = next_line(&mut events).await;
    assert_eq!(level, LogLevel::Warn);
    assert!(text.contains("clear -> aarontburn.Debug_Console.clear"));
    assert!(text.contains("clear -> acme.Tools.clear"));

    process.handle_input("aarontburn.Debug_Console.clear");
    let event = timeout(Duration::from_secs(2), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event, ConsoleEvent::Clear);
}
