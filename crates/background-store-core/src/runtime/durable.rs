// crates/background-store-core/src/runtime/durable.rs
// ============================================================================
// Module: In-Memory Durable Store
// Description: Durable store stand-in backed by shared process memory.
// Purpose: Provide a deterministic durable store for tests and local demos.
// Dependencies: crate::core, crate::interfaces, async-trait
// ============================================================================

//! ## Overview
//! [`InMemoryDurableStore`] mimics a durable store without touching disk.
//! Records live behind an `Arc<Mutex<_>>` so clones observe the same data,
//! which lets a test keep a handle on what was "persisted" after handing the
//! store to a facade. Metadata follows the durable contract: it is invisible
//! until [`DurableStore::load_metadata`] copies it into the instance.
//! It is not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use async_trait::async_trait;

use crate::core::AccountData;
use crate::core::FilterId;
use crate::core::RoomAccountData;
use crate::core::RoomId;
use crate::core::RoomSummary;
use crate::core::SessionUser;
use crate::core::StateEvent;
use crate::core::SyncCursor;
use crate::core::UserId;
use crate::interfaces::DurableStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Records
// ============================================================================

/// Session metadata as persisted or as loaded.
#[derive(Debug, Clone, Default, PartialEq)]
struct Metadata {
    /// Sync cursor.
    sync_cursor: Option<SyncCursor>,
    /// Session account data.
    account_data: Option<AccountData>,
    /// Sync filter identifier.
    sync_filter_id: Option<FilterId>,
}

/// Persisted records shared between clones.
#[derive(Debug, Default)]
struct DurableRecords {
    /// Persisted session metadata.
    metadata: Metadata,
    /// User records keyed by user.
    users: BTreeMap<UserId, SessionUser>,
    /// Room state keyed by room.
    room_state: BTreeMap<RoomId, Vec<StateEvent>>,
    /// Room summaries keyed by room.
    summaries: BTreeMap<RoomId, RoomSummary>,
    /// Room account data keyed by room.
    room_account_data: BTreeMap<RoomId, RoomAccountData>,
}

// ============================================================================
// SECTION: In-Memory Durable Store
// ============================================================================

/// In-memory durable store for tests and examples.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDurableStore {
    /// Persisted records protected by a mutex.
    records: Arc<Mutex<DurableRecords>>,
    /// Metadata snapshot taken by `load_metadata`.
    loaded: Option<Metadata>,
}

impl InMemoryDurableStore {
    /// Creates an empty in-memory durable store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Persists the sync cursor.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record mutex is poisoned.
    pub fn save_sync_cursor(&self, cursor: Option<SyncCursor>) -> Result<(), StoreError> {
        self.lock()?.metadata.sync_cursor = cursor;
        Ok(())
    }

    /// Persists the session account data.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record mutex is poisoned.
    pub fn save_account_data(&self, account_data: Option<AccountData>) -> Result<(), StoreError> {
        self.lock()?.metadata.account_data = account_data;
        Ok(())
    }

    /// Persists the sync filter identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record mutex is poisoned.
    pub fn save_sync_filter_id(&self, filter_id: Option<FilterId>) -> Result<(), StoreError> {
        self.lock()?.metadata.sync_filter_id = filter_id;
        Ok(())
    }

    /// Persists a user record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record mutex is poisoned.
    pub fn save_user(&self, user: SessionUser) -> Result<(), StoreError> {
        self.lock()?.users.insert(user.user_id.clone(), user);
        Ok(())
    }

    /// Persists the state events of a room.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record mutex is poisoned.
    pub fn save_room_state(
        &self,
        room_id: &RoomId,
        events: Vec<StateEvent>,
    ) -> Result<(), StoreError> {
        self.lock()?.room_state.insert(room_id.clone(), events);
        Ok(())
    }

    /// Persists a room summary.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record mutex is poisoned.
    pub fn save_room_summary(&self, summary: RoomSummary) -> Result<(), StoreError> {
        self.lock()?.summaries.insert(summary.room_id.clone(), summary);
        Ok(())
    }

    /// Persists the account data of a room.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record mutex is poisoned.
    pub fn save_room_account_data(
        &self,
        room_id: &RoomId,
        account_data: RoomAccountData,
    ) -> Result<(), StoreError> {
        self.lock()?.room_account_data.insert(room_id.clone(), account_data);
        Ok(())
    }

    /// Returns the persisted sync cursor, regardless of what was loaded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record mutex is poisoned.
    pub fn persisted_sync_cursor(&self) -> Result<Option<SyncCursor>, StoreError> {
        Ok(self.lock()?.metadata.sync_cursor.clone())
    }

    /// Returns true once `load_metadata` has run on this instance.
    #[must_use]
    pub const fn is_metadata_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Locks the shared records.
    fn lock(&self) -> Result<MutexGuard<'_, DurableRecords>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Store("durable store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl DurableStore for InMemoryDurableStore {
    fn load_metadata(&mut self) -> Result<(), StoreError> {
        let metadata = self.lock()?.metadata.clone();
        self.loaded = Some(metadata);
        Ok(())
    }

    async fn lookup_users(&self, user_ids: &[UserId]) -> Result<Vec<SessionUser>, StoreError> {
        let guard = self.lock()?;
        Ok(user_ids.iter().filter_map(|user_id| guard.users.get(user_id).cloned()).collect())
    }

    async fn room_state(&self, room_id: &RoomId) -> Result<Vec<StateEvent>, StoreError> {
        Ok(self.lock()?.room_state.get(room_id).cloned().unwrap_or_default())
    }

    fn summary(&self, room_id: &RoomId) -> Result<Option<RoomSummary>, StoreError> {
        Ok(self.lock()?.summaries.get(room_id).cloned())
    }

    fn room_account_data(&self, room_id: &RoomId) -> Result<Option<RoomAccountData>, StoreError> {
        Ok(self.lock()?.room_account_data.get(room_id).cloned())
    }

    fn sync_cursor(&self) -> Option<SyncCursor> {
        self.loaded.as_ref().and_then(|metadata| metadata.sync_cursor.clone())
    }

    fn account_data(&self) -> Option<AccountData> {
        self.loaded.as_ref().and_then(|metadata| metadata.account_data.clone())
    }

    fn sync_filter_id(&self) -> Option<FilterId> {
        self.loaded.as_ref().and_then(|metadata| metadata.sync_filter_id.clone())
    }
}
