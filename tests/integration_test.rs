// file: tests/integration_test.rs
// version: 2.0.0
// guid: z6a7b8c9-d0e1-2345-6789-012345zabcde

//! Integration tests for the Skyforge CLI
//!
//! Commands run end to end through [`CliApp`] with buffered stream handles
//! and a recording tracer; a few checks exercise the compiled binary through
//! `assert_cmd`.

use assert_cmd::Command as BinCommand;
use async_trait::async_trait;
use predicates::prelude::*;
use skyforge::commands::{default_app, CliApp, Invocation};
use skyforge::console::ConsoleHandles;
use skyforge::context::ExecutionContext;
use skyforge::identity::{AccessToken, TokenCredential};
use skyforge::options::GlobalOptions;
use skyforge::telemetry::RecordingTracer;
use skyforge::workspace::PROJECT_FILE;
use skyforge::Result;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

struct FakeCredential;

#[async_trait]
impl TokenCredential for FakeCredential {
    async fn get_token(&self, scopes: &[String]) -> Result<AccessToken> {
        Ok(AccessToken {
            token: format!("tok-{}", scopes.join("+")),
            expires_on: None,
        })
    }
}

fn invocation(
    handles: &ConsoleHandles,
    tracer: &RecordingTracer,
    cwd: Option<&Path>,
) -> Invocation {
    Invocation {
        options: GlobalOptions {
            cwd: cwd.map(Path::to_path_buf),
            ..GlobalOptions::default()
        },
        handles: handles.clone(),
        tracer: Arc::new(tracer.clone()),
        seed: ExecutionContext::new().with_credential(Arc::new(FakeCredential)),
    }
}

async fn run(app: &CliApp, argv: &[&str], invocation: &Invocation) -> Result<()> {
    let matches = app.parse_from(argv.iter().copied()).unwrap();
    app.dispatch(&matches, invocation).await
}

#[tokio::test]
async fn test_version_prints_without_a_usage_span() {
    let app = default_app();
    let handles = ConsoleHandles::piped("");
    let tracer = RecordingTracer::new();

    run(&app, &["sky", "version"], &invocation(&handles, &tracer, None))
        .await
        .unwrap();

    let out = handles.stdout.captured().unwrap();
    assert!(out.contains("sky version"));
    assert!(out.contains(skyforge::VERSION));
    // The version command opts out of usage telemetry.
    assert!(tracer.spans().is_empty());
}

#[tokio::test]
async fn test_version_json_through_the_full_pipeline() {
    let app = default_app();
    let handles = ConsoleHandles::piped("");
    let tracer = RecordingTracer::new();

    run(
        &app,
        &["sky", "version", "--output", "json"],
        &invocation(&handles, &tracer, None),
    )
    .await
    .unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&handles.stdout.captured().unwrap()).unwrap();
    assert_eq!(value["version"], skyforge::VERSION);
}

#[tokio::test]
async fn test_init_creates_the_project_file_in_the_cwd_directory() {
    let dir = TempDir::new().unwrap();
    let app = default_app();
    let handles = ConsoleHandles::piped("atlas\n");
    let tracer = RecordingTracer::new();

    run(
        &app,
        &["sky", "init"],
        &invocation(&handles, &tracer, Some(dir.path())),
    )
    .await
    .unwrap();

    let raw = std::fs::read_to_string(dir.path().join(PROJECT_FILE)).unwrap();
    assert!(raw.contains("name = \"atlas\""));
    assert_eq!(tracer.spans()[0].event_name, "cmd.sky.init");
}

#[tokio::test]
async fn test_init_with_no_prompt_defaults_to_the_directory_name() {
    let dir = TempDir::new().unwrap();
    let app = default_app();
    let handles = ConsoleHandles::piped("typed-anyway\n");
    let tracer = RecordingTracer::new();
    let mut invocation = invocation(&handles, &tracer, Some(dir.path()));
    invocation.options.no_prompt = true;

    run(&app, &["sky", "init"], &invocation).await.unwrap();

    let raw = std::fs::read_to_string(dir.path().join(PROJECT_FILE)).unwrap();
    let dir_name = dir.path().file_name().unwrap().to_string_lossy();
    assert!(raw.contains(&format!("name = \"{}\"", dir_name)));
    // Nothing was asked on a suppressed console; only the result was announced.
    let out = handles.stdout.captured().unwrap();
    assert!(!out.contains("Project name"));
    assert!(out.contains("Created"));
}

#[tokio::test]
async fn test_init_with_no_prompt_never_replaces_an_existing_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(PROJECT_FILE), "name = \"keep-me\"\n").unwrap();
    let app = default_app();
    let handles = ConsoleHandles::piped("");
    let tracer = RecordingTracer::new();
    let mut invocation = invocation(&handles, &tracer, Some(dir.path()));
    invocation.options.no_prompt = true;

    run(&app, &["sky", "init"], &invocation).await.unwrap();

    let raw = std::fs::read_to_string(dir.path().join(PROJECT_FILE)).unwrap();
    assert!(raw.contains("keep-me"));
}

#[tokio::test]
async fn test_auth_token_uses_the_seeded_credential() {
    let app = default_app();
    let handles = ConsoleHandles::piped("");
    let tracer = RecordingTracer::new();

    run(
        &app,
        &["sky", "auth", "token", "--scope", "deploy.write", "-o", "json"],
        &invocation(&handles, &tracer, None),
    )
    .await
    .unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&handles.stdout.captured().unwrap()).unwrap();
    assert_eq!(value["token"], "tok-deploy.write");
    let spans = tracer.spans();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].event_name, "cmd.sky.auth.token");
    assert!(spans[0].closed);
}

#[tokio::test]
async fn test_span_names_do_not_depend_on_argument_values() {
    let app = default_app();
    let tracer = RecordingTracer::new();

    for scope in ["deploy.write", "logs.read"] {
        let handles = ConsoleHandles::piped("");
        run(
            &app,
            &["sky", "auth", "token", "--scope", scope],
            &invocation(&handles, &tracer, None),
        )
        .await
        .unwrap();
    }

    let spans = tracer.spans();
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].event_name, spans[1].event_name);
}

#[tokio::test]
async fn test_bad_output_selector_fails_before_the_action_runs() {
    let dir = TempDir::new().unwrap();
    let app = default_app();
    let handles = ConsoleHandles::piped("");
    let tracer = RecordingTracer::new();

    let result = run(
        &app,
        &["sky", "auth", "token", "-o", "yaml"],
        &invocation(&handles, &tracer, Some(dir.path())),
    )
    .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("yaml"));
    assert!(!err.is_fatal());
    assert!(handles.stdout.captured().unwrap().is_empty());
    assert!(tracer.spans().is_empty());
}

#[test]
fn test_binary_help_lists_the_shipped_commands() {
    BinCommand::cargo_bin("sky")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("version")
                .and(predicate::str::contains("init"))
                .and(predicate::str::contains("doctor"))
                .and(predicate::str::contains("auth")),
        );
}

#[test]
fn test_binary_version_command_exits_zero() {
    BinCommand::cargo_bin("sky")
        .unwrap()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_binary_rejects_unknown_commands() {
    BinCommand::cargo_bin("sky")
        .unwrap()
        .arg("conjure")
        .assert()
        .failure();
}

#[test]
fn test_binary_help_flag_text_is_per_command() {
    BinCommand::cargo_bin("sky")
        .unwrap()
        .args(["init", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gets help for init."));
}
