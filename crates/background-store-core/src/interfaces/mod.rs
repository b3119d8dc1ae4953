// crates/background-store-core/src/interfaces/mod.rs
// ============================================================================
// Module: Background Store Interfaces
// Description: Store contracts consumed by the sync layer and the hybrid facade.
// Purpose: Define the durable and session store surfaces without backend details.
// Dependencies: crate::core, async-trait, thiserror
// ============================================================================

//! ## Overview
//! Two interfaces meet in the hybrid facade:
//! - [`DurableStore`] is the persistent store written by the full-session
//!   context. Its metadata is loaded eagerly; everything else is queried.
//! - [`SessionStore`] is the capability set the sync layer drives. The
//!   in-memory base store and the hybrid facade both implement it.
//!
//! Errors are a single [`StoreError`] enum. `IdentityMissing` is the only kind
//! raised by the facade itself; every other kind is passed through verbatim
//! from a backend.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use thiserror::Error;

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

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Store errors.
///
/// # Invariants
/// - Variants are stable for error classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The session identity has no user identifier.
    #[error("session identity is missing a user identifier")]
    IdentityMissing,
    /// Store I/O error.
    #[error("store io error: {0}")]
    Io(String),
    /// Store backend error.
    #[error("store error: {0}")]
    Store(String),
    /// Store data is corrupt.
    #[error("store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data or request.
    #[error("store invalid data: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Durable Store
// ============================================================================

/// Persistent store keyed by a session identity.
///
/// # Invariants
/// - [`DurableStore::load_metadata`] is local and cheap; it never touches the
///   network and never loads room data.
/// - Metadata accessors return `None` until metadata has been loaded.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Loads the session metadata (sync cursor, filter, account data).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the metadata cannot be read.
    fn load_metadata(&mut self) -> Result<(), StoreError>;

    /// Looks up user records for the provided identifiers.
    ///
    /// Unknown identifiers are omitted from the result.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    async fn lookup_users(&self, user_ids: &[UserId]) -> Result<Vec<SessionUser>, StoreError>;

    /// Fetches the persisted state events of a room.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the state cannot be read.
    async fn room_state(&self, room_id: &RoomId) -> Result<Vec<StateEvent>, StoreError>;

    /// Returns the persisted summary of a room.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the summary cannot be read.
    fn summary(&self, room_id: &RoomId) -> Result<Option<RoomSummary>, StoreError>;

    /// Returns the persisted account data of a room.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the account data cannot be read.
    fn room_account_data(&self, room_id: &RoomId) -> Result<Option<RoomAccountData>, StoreError>;

    /// Returns the sync cursor recorded in the loaded metadata.
    fn sync_cursor(&self) -> Option<SyncCursor>;

    /// Returns the session account data recorded in the loaded metadata.
    fn account_data(&self) -> Option<AccountData>;

    /// Returns the sync filter identifier recorded in the loaded metadata.
    fn sync_filter_id(&self) -> Option<FilterId>;
}

// ============================================================================
// SECTION: Session Store
// ============================================================================

/// Store surface driven by the sync layer for one session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Prepares the store for the session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot be opened for the identity.
    async fn open(&mut self, identity: &SessionIdentity) -> Result<(), StoreError>;

    /// Returns the sync cursor to resume from.
    fn sync_cursor(&self) -> Option<SyncCursor>;

    /// Records the sync cursor returned by the latest sync response.
    fn set_sync_cursor(&mut self, cursor: Option<SyncCursor>);

    /// Returns the session account data.
    fn account_data(&self) -> Option<AccountData>;

    /// Records the session account data.
    fn set_account_data(&mut self, account_data: Option<AccountData>);

    /// Returns true when data written to the store survives process restarts.
    fn is_permanent(&self) -> bool;

    /// Records the state events of a room.
    fn store_state(&mut self, room_id: &RoomId, events: Vec<StateEvent>);

    /// Fetches the state events of a room.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the state cannot be read.
    async fn state(&self, room_id: &RoomId) -> Result<Vec<StateEvent>, StoreError>;

    /// Returns the summary of a room.
    fn summary(&self, room_id: &RoomId) -> Option<RoomSummary>;

    /// Records the summary of a room.
    fn store_summary(&mut self, summary: RoomSummary);

    /// Returns the account data of a room.
    fn room_account_data(&self, room_id: &RoomId) -> Option<RoomAccountData>;

    /// Records the account data of a room.
    fn store_room_account_data(&mut self, room_id: &RoomId, account_data: RoomAccountData);

    /// Returns the user record for an identifier.
    fn user(&self, user_id: &UserId) -> Option<SessionUser>;

    /// Records a user record.
    fn store_user(&mut self, user: SessionUser);

    /// Returns the sync filter identifier.
    fn sync_filter_id(&self) -> Option<FilterId>;

    /// Records the sync filter identifier.
    fn set_sync_filter_id(&mut self, filter_id: Option<FilterId>);

    /// Returns the identifiers of rooms known to the store, sorted.
    fn room_ids(&self) -> Vec<RoomId>;
}
