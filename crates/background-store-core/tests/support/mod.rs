// crates/background-store-core/tests/support/mod.rs
// ============================================================================
// Module: Hybrid Store Test Support
// Description: Instrumented store doubles shared by facade tests.
// Purpose: Observe call ordering and inject backend failures.
// Dependencies: background-store-core, async-trait
// ============================================================================

//! ## Overview
//! Wrappers around the in-memory stores that journal every call the facade
//! makes and can be told to fail specific operations.

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Shared helpers are not used by every test binary."
)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use background_store_core::AccountData;
use background_store_core::DurableStore;
use background_store_core::FilterId;
use background_store_core::InMemoryDurableStore;
use background_store_core::InMemoryStore;
use background_store_core::RoomAccountData;
use background_store_core::RoomId;
use background_store_core::RoomSummary;
use background_store_core::SessionIdentity;
use background_store_core::SessionStore;
use background_store_core::SessionUser;
use background_store_core::StateEvent;
use background_store_core::StoreAuditAction;
use background_store_core::StoreAuditEvent;
use background_store_core::StoreAuditSink;
use background_store_core::StoreError;
use background_store_core::SyncCursor;
use background_store_core::UserId;

// ============================================================================
// SECTION: Journal
// ============================================================================

/// Ordered record of backend calls.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<&'static str>>>,
}

impl Journal {
    pub fn push(&self, entry: &'static str) {
        self.entries.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<&'static str> {
        self.entries.lock().unwrap().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.entries.lock().unwrap().iter().filter(|item| **item == entry).count()
    }
}

// ============================================================================
// SECTION: Durable Double
// ============================================================================

/// Durable store wrapper that journals calls and injects failures.
#[derive(Debug, Clone, Default)]
pub struct InstrumentedDurable {
    pub inner: InMemoryDurableStore,
    pub journal: Journal,
    pub fail_metadata: Option<StoreError>,
    pub fail_lookup: Option<StoreError>,
    pub fail_state: Option<StoreError>,
    pub fail_reads: Option<StoreError>,
}

impl InstrumentedDurable {
    pub fn new(inner: InMemoryDurableStore, journal: Journal) -> Self {
        Self {
            inner,
            journal,
            ..Self::default()
        }
    }
}

#[async_trait]
impl DurableStore for InstrumentedDurable {
    fn load_metadata(&mut self) -> Result<(), StoreError> {
        self.journal.push("durable.load_metadata");
        if let Some(err) = &self.fail_metadata {
            return Err(err.clone());
        }
        self.inner.load_metadata()
    }

    async fn lookup_users(&self, user_ids: &[UserId]) -> Result<Vec<SessionUser>, StoreError> {
        self.journal.push("durable.lookup_users");
        if let Some(err) = &self.fail_lookup {
            return Err(err.clone());
        }
        self.inner.lookup_users(user_ids).await
    }

    async fn room_state(&self, room_id: &RoomId) -> Result<Vec<StateEvent>, StoreError> {
        self.journal.push("durable.room_state");
        if let Some(err) = &self.fail_state {
            return Err(err.clone());
        }
        self.inner.room_state(room_id).await
    }

    fn summary(&self, room_id: &RoomId) -> Result<Option<RoomSummary>, StoreError> {
        if let Some(err) = &self.fail_reads {
            return Err(err.clone());
        }
        self.inner.summary(room_id)
    }

    fn room_account_data(&self, room_id: &RoomId) -> Result<Option<RoomAccountData>, StoreError> {
        if let Some(err) = &self.fail_reads {
            return Err(err.clone());
        }
        self.inner.room_account_data(room_id)
    }

    fn sync_cursor(&self) -> Option<SyncCursor> {
        self.inner.sync_cursor()
    }

    fn account_data(&self) -> Option<AccountData> {
        self.inner.account_data()
    }

    fn sync_filter_id(&self) -> Option<FilterId> {
        self.inner.sync_filter_id()
    }
}

// ============================================================================
// SECTION: Base Double
// ============================================================================

/// Base store wrapper that journals `open` and can fail it.
#[derive(Debug, Clone, Default)]
pub struct InstrumentedBase {
    pub inner: InMemoryStore,
    pub journal: Journal,
    pub fail_open: Option<StoreError>,
}

impl InstrumentedBase {
    pub fn new(journal: Journal) -> Self {
        Self {
            inner: InMemoryStore::new(),
            journal,
            fail_open: None,
        }
    }
}

#[async_trait]
impl SessionStore for InstrumentedBase {
    async fn open(&mut self, identity: &SessionIdentity) -> Result<(), StoreError> {
        self.journal.push("base.open");
        if let Some(err) = &self.fail_open {
            return Err(err.clone());
        }
        self.inner.open(identity).await
    }

    fn sync_cursor(&self) -> Option<SyncCursor> {
        self.inner.sync_cursor()
    }

    fn set_sync_cursor(&mut self, cursor: Option<SyncCursor>) {
        self.inner.set_sync_cursor(cursor);
    }

    fn account_data(&self) -> Option<AccountData> {
        self.inner.account_data()
    }

    fn set_account_data(&mut self, account_data: Option<AccountData>) {
        self.inner.set_account_data(account_data);
    }

    fn is_permanent(&self) -> bool {
        self.inner.is_permanent()
    }

    fn store_state(&mut self, room_id: &RoomId, events: Vec<StateEvent>) {
        self.journal.push("base.store_state");
        self.inner.store_state(room_id, events);
    }

    async fn state(&self, room_id: &RoomId) -> Result<Vec<StateEvent>, StoreError> {
        self.inner.state(room_id).await
    }

    fn summary(&self, room_id: &RoomId) -> Option<RoomSummary> {
        self.inner.summary(room_id)
    }

    fn store_summary(&mut self, summary: RoomSummary) {
        self.journal.push("base.store_summary");
        self.inner.store_summary(summary);
    }

    fn room_account_data(&self, room_id: &RoomId) -> Option<RoomAccountData> {
        self.inner.room_account_data(room_id)
    }

    fn store_room_account_data(&mut self, room_id: &RoomId, account_data: RoomAccountData) {
        self.journal.push("base.store_room_account_data");
        self.inner.store_room_account_data(room_id, account_data);
    }

    fn user(&self, user_id: &UserId) -> Option<SessionUser> {
        self.inner.user(user_id)
    }

    fn store_user(&mut self, user: SessionUser) {
        self.journal.push("base.store_user");
        self.inner.store_user(user);
    }

    fn sync_filter_id(&self) -> Option<FilterId> {
        self.inner.sync_filter_id()
    }

    fn set_sync_filter_id(&mut self, filter_id: Option<FilterId>) {
        self.inner.set_sync_filter_id(filter_id);
    }

    fn room_ids(&self) -> Vec<RoomId> {
        self.inner.room_ids()
    }
}

// ============================================================================
// SECTION: Audit Double
// ============================================================================

/// Audit sink that keeps every event in memory.
#[derive(Default)]
pub struct RecordingAuditSink {
    events: Mutex<Vec<StoreAuditEvent>>,
}

impl RecordingAuditSink {
    pub fn actions(&self) -> Vec<StoreAuditAction> {
        self.events.lock().unwrap().iter().map(|event| event.action).collect()
    }

    pub fn events(&self) -> Vec<StoreAuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl StoreAuditSink for RecordingAuditSink {
    fn record(&self, event: &StoreAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
