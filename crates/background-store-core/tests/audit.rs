// crates/background-store-core/tests/audit.rs
// ============================================================================
// Module: Store Audit Tests
// Description: JSON-line audit sink output.
// Purpose: Ensure audit events serialize with stable labels.
// Dependencies: background-store-core, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Writes audit events through the file sink and reads them back.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

use background_store_core::FileAuditSink;
use background_store_core::NoopAuditSink;
use background_store_core::RoomId;
use background_store_core::StoreAuditAction;
use background_store_core::StoreAuditEvent;
use background_store_core::StoreAuditSink;
use background_store_core::UserId;
use serde_json::Value;

#[test]
fn file_sink_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    let sink = FileAuditSink::new(&path).unwrap();

    let user = UserId::new("u1");
    sink.record(&StoreAuditEvent::new(StoreAuditAction::OpenStarted, Some(&user)));
    sink.record(
        &StoreAuditEvent::new(StoreAuditAction::WriteSuppressed, Some(&user))
            .with_field("room_state")
            .with_room(&RoomId::new("r1")),
    );

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<Value> =
        contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["event"], "background_store");
    assert_eq!(lines[0]["action"], "open_started");
    assert_eq!(lines[0]["user_id"], "u1");
    assert_eq!(lines[1]["action"], "write_suppressed");
    assert_eq!(lines[1]["field"], "room_state");
    assert_eq!(lines[1]["room_id"], "r1");
    assert!(lines[1]["detail"].is_null());
}

#[test]
fn file_sink_appends_to_existing_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    std::fs::write(&path, "{\"existing\":true}\n").unwrap();

    let sink = FileAuditSink::new(&path).unwrap();
    sink.record(&StoreAuditEvent::new(StoreAuditAction::MetadataLoaded, None));

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 2);
    assert!(contents.starts_with("{\"existing\":true}"));
}

#[test]
fn action_labels_match_serialized_form() {
    let actions = [
        StoreAuditAction::MetadataLoaded,
        StoreAuditAction::MetadataLoadFailed,
        StoreAuditAction::OpenStarted,
        StoreAuditAction::OpenCompleted,
        StoreAuditAction::OpenFailed,
        StoreAuditAction::SessionUserResolved,
        StoreAuditAction::SessionUserMissing,
        StoreAuditAction::CursorOverridden,
        StoreAuditAction::WriteSuppressed,
        StoreAuditAction::DurableReadFailed,
    ];
    for action in actions {
        let serialized = serde_json::to_value(action).unwrap();
        assert_eq!(serialized, Value::String(action.as_str().to_string()));
    }
}

#[test]
fn noop_sink_accepts_events() {
    let event = StoreAuditEvent::new(StoreAuditAction::OpenFailed, None).with_detail("x");
    NoopAuditSink.record(&event);
}
