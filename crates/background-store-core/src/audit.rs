// crates/background-store-core/src/audit.rs
// ============================================================================
// Module: Store Audit Logging
// Description: Structured audit events for facade decisions.
// Purpose: Emit JSON-line logs without hard logging dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The hybrid facade reports its lifecycle and every suppressed or degraded
//! operation as a [`StoreAuditEvent`]. Sinks decide where events go; the
//! default sink drops them. Events carry identifiers, field names, and error
//! strings only, never account data or state payloads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::RoomId;
use crate::core::UserId;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Facade action classification.
///
/// # Invariants
/// - Variants are stable for log labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreAuditAction {
    /// Durable metadata was loaded during construction.
    MetadataLoaded,
    /// Durable metadata failed to load; reads degrade to absent.
    MetadataLoadFailed,
    /// The open sequence started.
    OpenStarted,
    /// The open sequence completed.
    OpenCompleted,
    /// The open sequence failed.
    OpenFailed,
    /// The session user record was resolved from the durable store.
    SessionUserResolved,
    /// The durable store has no record for the session user.
    SessionUserMissing,
    /// The sync cursor override was written.
    CursorOverridden,
    /// A write was discarded instead of reaching any store.
    WriteSuppressed,
    /// A synchronous durable read failed and was reported as absent.
    DurableReadFailed,
}

impl StoreAuditAction {
    /// Returns a stable label for the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MetadataLoaded => "metadata_loaded",
            Self::MetadataLoadFailed => "metadata_load_failed",
            Self::OpenStarted => "open_started",
            Self::OpenCompleted => "open_completed",
            Self::OpenFailed => "open_failed",
            Self::SessionUserResolved => "session_user_resolved",
            Self::SessionUserMissing => "session_user_missing",
            Self::CursorOverridden => "cursor_overridden",
            Self::WriteSuppressed => "write_suppressed",
            Self::DurableReadFailed => "durable_read_failed",
        }
    }
}

/// Store audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Facade action.
    pub action: StoreAuditAction,
    /// Session user identifier when known.
    pub user_id: Option<String>,
    /// Store field the action applies to.
    pub field: Option<&'static str>,
    /// Room identifier when the action is room-scoped.
    pub room_id: Option<String>,
    /// Error or detail message.
    pub detail: Option<String>,
}

impl StoreAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(action: StoreAuditAction, user_id: Option<&UserId>) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "background_store",
            timestamp_ms,
            action,
            user_id: user_id.map(ToString::to_string),
            field: None,
            room_id: None,
            detail: None,
        }
    }

    /// Attaches the store field name.
    #[must_use]
    pub fn with_field(mut self, field: &'static str) -> Self {
        self.field = Some(field);
        self
    }

    /// Attaches the room identifier.
    #[must_use]
    pub fn with_room(mut self, room_id: &RoomId) -> Self {
        self.room_id = Some(room_id.to_string());
        self
    }

    /// Attaches a detail message.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for store events.
pub trait StoreAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &StoreAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl StoreAuditSink for StderrAuditSink {
    fn record(&self, event: &StoreAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl StoreAuditSink for FileAuditSink {
    fn record(&self, event: &StoreAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl StoreAuditSink for NoopAuditSink {
    fn record(&self, _event: &StoreAuditEvent) {}
}
