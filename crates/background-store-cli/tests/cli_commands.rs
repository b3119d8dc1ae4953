// crates/background-store-cli/tests/cli_commands.rs
// ============================================================================
// Module: CLI Command Tests
// Description: Integration tests for the inspect and room commands.
// Purpose: Ensure the CLI reports durable data and never writes it.
// Dependencies: background-store binary, background-store-sqlite, tempfile
// ============================================================================

//! ## Overview
//! Seeds a `SQLite` durable store, runs the `background-store` binary against
//! it, and checks the JSON reports and exit codes.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use background_store_core::AccountData;
use background_store_core::DurableStore;
use background_store_core::RoomId;
use background_store_core::RoomSummary;
use background_store_core::SessionIdentity;
use background_store_core::SessionUser;
use background_store_core::StateEvent;
use background_store_core::SyncCursor;
use background_store_core::UserId;
use background_store_sqlite::SqliteDurableStore;
use background_store_sqlite::SqliteStoreConfig;
use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn background_store_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_background-store"))
}

fn seed_store(db_path: &Path) {
    let store = SqliteDurableStore::for_identity(
        SqliteStoreConfig::new(db_path),
        &SessionIdentity::for_user("u1"),
    )
    .expect("open store");
    store.save_sync_cursor(Some(&SyncCursor::new("s0"))).expect("cursor");
    store
        .save_account_data(Some(&AccountData::new().with_event("m.push_rules", json!({}))))
        .expect("account data");
    store
        .save_user(&SessionUser::placeholder(UserId::new("u1")).with_display_name("One"))
        .expect("user");
    store
        .save_room_summary(&RoomSummary::new(RoomId::new("r1")).with_name("Foo"))
        .expect("summary");
    store
        .save_room_state(
            &RoomId::new("r1"),
            &[StateEvent {
                event_id: "$create".to_string(),
                event_type: "m.room.create".to_string(),
                state_key: String::new(),
                sender: UserId::new("u1"),
                origin_server_ts: 1,
                content: json!({}),
            }],
        )
        .expect("state");
}

fn write_config(dir: &TempDir, db_path: &Path) -> PathBuf {
    let config_path = dir.path().join("background-store.toml");
    let content = format!("[durable]\npath = \"{}\"\n", db_path.display());
    std::fs::write(&config_path, content).expect("write config");
    config_path
}

fn run(args: &[&str]) -> Output {
    Command::new(background_store_bin()).args(args).output().expect("run background-store")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout json")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Verifies `inspect` reports durable metadata and the resolved user.
#[test]
fn inspect_reports_session_metadata() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("session.db");
    seed_store(&db_path);
    let config_path = write_config(&dir, &db_path);

    let output = run(&["inspect", "--user", "u1", "--config", config_path.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let report = stdout_json(&output);
    assert_eq!(report["user_id"], "u1");
    assert_eq!(report["phase"], "ready");
    assert_eq!(report["is_permanent"], true);
    assert_eq!(report["sync_cursor"], "s0");
    assert!(report["sync_filter_id"].is_null());
    assert_eq!(report["session_user_resolved"], true);
    assert_eq!(report["session_user"]["display_name"], "One");
    assert_eq!(report["account_data_types"], json!(["m.push_rules"]));
}

/// Verifies an unknown user opens with a placeholder session user.
#[test]
fn inspect_unknown_user_reports_placeholder() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("session.db");
    seed_store(&db_path);
    let config_path = write_config(&dir, &db_path);

    let output = run(&["inspect", "--user", "u2", "--config", config_path.to_str().unwrap()]);
    assert!(output.status.success());
    let report = stdout_json(&output);
    assert_eq!(report["session_user_resolved"], false);
    assert_eq!(report["session_user"]["user_id"], "u2");
    assert!(report["session_user"]["display_name"].is_null());
    assert!(report["sync_cursor"].is_null());
}

/// Verifies `room` reports a seeded room and absent data for unknown rooms.
#[test]
fn room_reports_durable_records() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("session.db");
    seed_store(&db_path);
    let config_path = write_config(&dir, &db_path);
    let config = config_path.to_str().unwrap();

    let output = run(&["room", "--user", "u1", "--room", "r1", "--config", config]);
    assert!(output.status.success());
    let report = stdout_json(&output);
    assert_eq!(report["room_id"], "r1");
    assert_eq!(report["summary"]["name"], "Foo");
    assert!(report["account_data"].is_null());
    assert_eq!(report["state_event_count"], 1);

    let output = run(&["room", "--user", "u1", "--room", "r9", "--config", config]);
    assert!(output.status.success());
    let report = stdout_json(&output);
    assert!(report["summary"].is_null());
    assert_eq!(report["state_event_count"], 0);
}

/// Verifies running the CLI leaves the durable cursor untouched.
#[test]
fn inspect_does_not_write_durable_store() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("session.db");
    seed_store(&db_path);
    let config_path = write_config(&dir, &db_path);

    let output = run(&["inspect", "--user", "u1", "--config", config_path.to_str().unwrap()]);
    assert!(output.status.success());

    let mut store = SqliteDurableStore::for_identity(
        SqliteStoreConfig::new(&db_path),
        &SessionIdentity::for_user("u1"),
    )
    .unwrap();
    store.load_metadata().unwrap();
    assert_eq!(store.sync_cursor(), Some(SyncCursor::new("s0")));
    assert_eq!(store.sync_filter_id(), None);
}

/// Verifies a missing config fails with a single-line error.
#[test]
fn missing_config_fails_closed() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");
    let output = run(&["inspect", "--user", "u1", "--config", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load config"));
    assert_eq!(stderr.trim_end().lines().count(), 1);
}

/// Verifies an empty user identifier is rejected before any read.
#[test]
fn empty_user_is_rejected() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("session.db");
    let config_path = write_config(&dir, &db_path);
    let output = run(&["inspect", "--user", "", "--config", config_path.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to open durable store"));
}

/// Verifies facade construction and room reads report through the file audit sink.
#[test]
fn room_command_records_audit_events() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("session.db");
    seed_store(&db_path);
    let audit_path = dir.path().join("audit.jsonl");
    let config_path = dir.path().join("background-store.toml");
    let content = format!(
        "[durable]\npath = \"{}\"\n[audit]\nsink = \"file\"\npath = \"{}\"\n",
        db_path.display(),
        audit_path.display()
    );
    std::fs::write(&config_path, content).unwrap();

    let output =
        run(&["room", "--user", "u1", "--room", "r1", "--config", config_path.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout_json(&output)["summary"]["name"], "Foo");

    let actions: Vec<String> = std::fs::read_to_string(&audit_path)
        .unwrap()
        .lines()
        .map(|line| {
            let value: Value = serde_json::from_str(line).unwrap();
            value["action"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(
        actions,
        vec!["metadata_loaded", "open_started", "session_user_resolved", "open_completed"]
    );
}
