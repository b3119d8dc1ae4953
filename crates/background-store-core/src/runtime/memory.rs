// crates/background-store-core/src/runtime/memory.rs
// ============================================================================
// Module: In-Memory Session Store
// Description: Ephemeral session store with plain read/write semantics.
// Purpose: Serve as the base store the hybrid facade delegates to.
// Dependencies: crate::core, crate::interfaces, async-trait
// ============================================================================

//! ## Overview
//! [`InMemoryStore`] keeps everything in process memory. Every write is
//! visible to the next read and nothing survives the process, so it reports
//! itself as non-permanent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::core::AccountData;
use crate::core::FilterId;
use crate::core::RoomAccountData;
use crate::core::RoomId;
use crate::core::RoomSummary;
use crate::core::SessionIdentity;
use crate::core::SessionUser;
use crate::core::StateEvent;
use crate::core::SyncCursor;
use crate::core::UserId;
use crate::interfaces::SessionStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Ephemeral session store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    /// Identity of the last successful `open`.
    identity: Option<SessionIdentity>,
    /// Sync cursor.
    sync_cursor: Option<SyncCursor>,
    /// Session account data.
    account_data: Option<AccountData>,
    /// Sync filter identifier.
    sync_filter_id: Option<FilterId>,
    /// Room state keyed by room.
    room_state: BTreeMap<RoomId, Vec<StateEvent>>,
    /// Room summaries keyed by room.
    summaries: BTreeMap<RoomId, RoomSummary>,
    /// Room account data keyed by room.
    room_account_data: BTreeMap<RoomId, RoomAccountData>,
    /// User records keyed by user.
    users: BTreeMap<UserId, SessionUser>,
}

impl InMemoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the identity of the last successful `open`.
    #[must_use]
    pub const fn identity(&self) -> Option<&SessionIdentity> {
        self.identity.as_ref()
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn open(&mut self, identity: &SessionIdentity) -> Result<(), StoreError> {
        self.identity = Some(identity.clone());
        Ok(())
    }

    fn sync_cursor(&self) -> Option<SyncCursor> {
        self.sync_cursor.clone()
    }

    fn set_sync_cursor(&mut self, cursor: Option<SyncCursor>) {
        self.sync_cursor = cursor;
    }

    fn account_data(&self) -> Option<AccountData> {
        self.account_data.clone()
    }

    fn set_account_data(&mut self, account_data: Option<AccountData>) {
        self.account_data = account_data;
    }

    fn is_permanent(&self) -> bool {
        false
    }

    fn store_state(&mut self, room_id: &RoomId, events: Vec<StateEvent>) {
        self.room_state.insert(room_id.clone(), events);
    }

    async fn state(&self, room_id: &RoomId) -> Result<Vec<StateEvent>, StoreError> {
        Ok(self.room_state.get(room_id).cloned().unwrap_or_default())
    }

    fn summary(&self, room_id: &RoomId) -> Option<RoomSummary> {
        self.summaries.get(room_id).cloned()
    }

    fn store_summary(&mut self, summary: RoomSummary) {
        self.summaries.insert(summary.room_id.clone(), summary);
    }

    fn room_account_data(&self, room_id: &RoomId) -> Option<RoomAccountData> {
        self.room_account_data.get(room_id).cloned()
    }

    fn store_room_account_data(&mut self, room_id: &RoomId, account_data: RoomAccountData) {
        self.room_account_data.insert(room_id.clone(), account_data);
    }

    fn user(&self, user_id: &UserId) -> Option<SessionUser> {
        self.users.get(user_id).cloned()
    }

    fn store_user(&mut self, user: SessionUser) {
        self.users.insert(user.user_id.clone(), user);
    }

    fn sync_filter_id(&self) -> Option<FilterId> {
        self.sync_filter_id.clone()
    }

    fn set_sync_filter_id(&mut self, filter_id: Option<FilterId>) {
        self.sync_filter_id = filter_id;
    }

    fn room_ids(&self) -> Vec<RoomId> {
        let mut room_ids: Vec<RoomId> = self
            .room_state
            .keys()
            .chain(self.summaries.keys())
            .chain(self.room_account_data.keys())
            .cloned()
            .collect();
        room_ids.sort();
        room_ids.dedup();
        room_ids
    }
}
