// crates/background-store-config/tests/load_validation.rs
// ============================================================================
// Module: Config Load Validation Tests
// Description: Loading, limits, and section validation for background-store.toml.
// Purpose: Ensure configuration fails closed on malformed or unsafe input.
// ============================================================================

//! ## Overview
//! Writes configuration files into temp directories and loads them through
//! [`BackgroundStoreConfig::load`].

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::path::PathBuf;

use background_store_config::AuditSinkKind;
use background_store_config::BackgroundStoreConfig;
use background_store_config::ConfigError;
use background_store_core::StoreAuditAction;
use background_store_core::StoreAuditEvent;
use background_store_sqlite::SqliteStoreMode;
use background_store_sqlite::SqliteSyncMode;
use serde_json::Value;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("background-store.toml");
    std::fs::write(&path, content).unwrap();
    path
}

fn load_str(content: &str) -> Result<BackgroundStoreConfig, ConfigError> {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, content);
    BackgroundStoreConfig::load(Some(&path))
}

// ============================================================================
// SECTION: Loading
// ============================================================================

#[test]
fn minimal_config_uses_defaults() {
    let config = load_str("[durable]\npath = \"session.db\"\n").unwrap();
    assert_eq!(config.durable.path, PathBuf::from("session.db"));
    assert_eq!(config.durable.busy_timeout_ms, 5_000);
    assert_eq!(config.durable.journal_mode, SqliteStoreMode::Wal);
    assert_eq!(config.durable.sync_mode, SqliteSyncMode::Full);
    assert_eq!(config.audit.sink, AuditSinkKind::None);
}

#[test]
fn full_config_maps_to_store_config() {
    let config = load_str(
        r#"
[durable]
path = "/tmp/store/session.db"
busy_timeout_ms = 250
journal_mode = "delete"
sync_mode = "normal"

[audit]
sink = "stderr"
"#,
    )
    .unwrap();
    let store = config.durable.to_store_config();
    assert_eq!(store.path, PathBuf::from("/tmp/store/session.db"));
    assert_eq!(store.busy_timeout_ms, 250);
    assert_eq!(store.journal_mode, SqliteStoreMode::Delete);
    assert_eq!(store.sync_mode, SqliteSyncMode::Normal);
    assert_eq!(config.audit.sink, AuditSinkKind::Stderr);
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = BackgroundStoreConfig::load(Some(&dir.path().join("absent.toml")));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn missing_durable_section_is_parse_error() {
    let result = load_str("[audit]\nsink = \"none\"\n");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn unknown_journal_mode_is_parse_error() {
    let result = load_str("[durable]\npath = \"s.db\"\njournal_mode = \"memory\"\n");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn oversized_file_is_rejected() {
    let mut content = String::from("[durable]\npath = \"s.db\"\n");
    content.push_str(&format!("# {}\n", "x".repeat(1024 * 1024)));
    let result = load_str(&content);
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn non_utf8_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("background-store.toml");
    std::fs::write(&path, [0x5b, 0xff, 0xfe, 0x5d]).unwrap();
    let result = BackgroundStoreConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn overlong_config_path_component_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(format!("{}.toml", "c".repeat(300)));
    let result = BackgroundStoreConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

// ============================================================================
// SECTION: Validation
// ============================================================================

#[test]
fn empty_durable_path_is_rejected() {
    let result = load_str("[durable]\npath = \"  \"\n");
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn zero_busy_timeout_is_rejected() {
    let result = load_str("[durable]\npath = \"s.db\"\nbusy_timeout_ms = 0\n");
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn file_sink_requires_path() {
    let result = load_str("[durable]\npath = \"s.db\"\n[audit]\nsink = \"file\"\n");
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn path_without_file_sink_is_rejected() {
    let result =
        load_str("[durable]\npath = \"s.db\"\n[audit]\nsink = \"stderr\"\npath = \"a.log\"\n");
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

// ============================================================================
// SECTION: Audit Sinks
// ============================================================================

#[test]
fn file_sink_writes_json_lines() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("audit.jsonl");
    let content = format!(
        "[durable]\npath = \"s.db\"\n[audit]\nsink = \"file\"\npath = \"{}\"\n",
        log_path.display()
    );
    let config_path = write_config(&dir, &content);
    let config = BackgroundStoreConfig::load(Some(&config_path)).unwrap();

    let sink = config.audit.build_sink().unwrap();
    sink.record(&StoreAuditEvent::new(StoreAuditAction::OpenCompleted, None));

    let line = std::fs::read_to_string(&log_path).unwrap();
    let value: Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(value["action"], "open_completed");
}

#[test]
fn default_sinks_build() {
    let config = load_str("[durable]\npath = \"s.db\"\n").unwrap();
    assert!(config.audit.build_sink().is_ok());
    let config = load_str("[durable]\npath = \"s.db\"\n[audit]\nsink = \"stderr\"\n").unwrap();
    assert!(config.audit.build_sink().is_ok());
}
