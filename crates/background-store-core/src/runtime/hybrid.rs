// crates/background-store-core/src/runtime/hybrid.rs
// ============================================================================
// Module: Hybrid Store Facade
// Description: Session store that routes reads between an ephemeral base and a durable store.
// Purpose: Let a restricted execution context sync from durable data without writing it.
// Dependencies: crate::{audit, core, interfaces, runtime::memory}, async-trait
// ============================================================================

//! ## Overview
//! [`HybridStore`] is handed to the sync layer in place of a full durable
//! store when the process only has a brief window to run (for example after a
//! push wake-up). It composes two backends and picks one per member:
//!
//! | Member | Read | Write |
//! | --- | --- | --- |
//! | sync cursor | in-process override, else durable | override only |
//! | account data | durable | discarded |
//! | room state | durable (async) | discarded |
//! | room summary | durable | base |
//! | room account data | durable | base |
//! | user | resolved session user, else placeholder | base |
//! | sync filter id | durable | discarded |
//!
//! The durable store is written only by the full-session context; this facade
//! never writes to it. The facade reports itself as permanent so the sync
//! layer treats its (durable-backed) reads as authoritative.
//!
//! ## Open sequence
//! [`SessionStore::open`] advances through [`OpenPhase`]: the base store is
//! opened first, the identity is validated only after the base is ready, and
//! the session user is resolved from the durable store last. Reads are not
//! meaningful until the phase is [`OpenPhase::Ready`].
//!
//! ## Ownership
//! Mutating members take `&mut self`, so the cursor override and resolved
//! session user have exactly one writer: the flow that owns the facade.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;

use crate::audit::NoopAuditSink;
use crate::audit::StoreAuditAction;
use crate::audit::StoreAuditEvent;
use crate::audit::StoreAuditSink;
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
use crate::interfaces::DurableStore;
use crate::interfaces::SessionStore;
use crate::interfaces::StoreError;
use crate::runtime::memory::InMemoryStore;

// ============================================================================
// SECTION: Field Labels
// ============================================================================

/// Audit label for the session account data.
const FIELD_ACCOUNT_DATA: &str = "account_data";
/// Audit label for room state.
const FIELD_ROOM_STATE: &str = "room_state";
/// Audit label for room summaries.
const FIELD_ROOM_SUMMARY: &str = "room_summary";
/// Audit label for room account data.
const FIELD_ROOM_ACCOUNT_DATA: &str = "room_account_data";
/// Audit label for the sync cursor.
const FIELD_SYNC_CURSOR: &str = "sync_cursor";
/// Audit label for the sync filter identifier.
const FIELD_SYNC_FILTER_ID: &str = "sync_filter_id";
/// Audit label for the session user.
const FIELD_SESSION_USER: &str = "session_user";

// ============================================================================
// SECTION: Open Phase
// ============================================================================

/// Progress of the facade's open sequence.
///
/// # Invariants
/// - `ValidatingIdentity` is only entered after the base store opened.
/// - `ResolvingUser` is only entered with a validated user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenPhase {
    /// `open` has not been called.
    NotOpened,
    /// Waiting for the base store to open.
    BaseOpening,
    /// Checking the identity for a user identifier.
    ValidatingIdentity,
    /// Looking up the session user in the durable store.
    ResolvingUser,
    /// The facade is usable.
    Ready,
    /// The last open attempt failed.
    Failed,
}

impl OpenPhase {
    /// Returns a stable label for the phase.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotOpened => "not_opened",
            Self::BaseOpening => "base_opening",
            Self::ValidatingIdentity => "validating_identity",
            Self::ResolvingUser => "resolving_user",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

// ============================================================================
// SECTION: Hybrid Store
// ============================================================================

/// Session store facade over an ephemeral base and a durable store.
pub struct HybridStore<D, B = InMemoryStore> {
    /// Identity the facade was constructed for.
    identity: Arc<SessionIdentity>,
    /// Durable store, exclusively owned.
    durable: D,
    /// Ephemeral base store.
    base: B,
    /// Cursor written during this lifetime; cleared by writing `None`.
    cursor_override: Option<SyncCursor>,
    /// Session user resolved during `open`.
    session_user: Option<SessionUser>,
    /// Open sequence progress.
    phase: OpenPhase,
    /// Audit sink for facade decisions.
    audit: Arc<dyn StoreAuditSink>,
}

impl<D: DurableStore> HybridStore<D> {
    /// Builds a facade over an in-memory base store.
    ///
    /// The durable store must already be bound to `identity`. Its metadata is
    /// loaded before this returns; construction never fails.
    #[must_use]
    pub fn new(identity: Arc<SessionIdentity>, durable: D) -> Self {
        Self::with_base(identity, durable, InMemoryStore::new())
    }
}

impl<D: DurableStore, B: SessionStore> HybridStore<D, B> {
    /// Builds a facade over an explicit base store.
    #[must_use]
    pub fn with_base(identity: Arc<SessionIdentity>, durable: D, base: B) -> Self {
        Self::with_audit_sink(identity, durable, base, Arc::new(NoopAuditSink))
    }

    /// Builds a facade that reports decisions to an audit sink.
    #[must_use]
    pub fn with_audit_sink(
        identity: Arc<SessionIdentity>,
        mut durable: D,
        base: B,
        audit: Arc<dyn StoreAuditSink>,
    ) -> Self {
        let load_result = durable.load_metadata();
        let store = Self {
            identity,
            durable,
            base,
            cursor_override: None,
            session_user: None,
            phase: OpenPhase::NotOpened,
            audit,
        };
        match load_result {
            Ok(()) => store.record(StoreAuditAction::MetadataLoaded),
            Err(err) => store.record_event(
                store.event(StoreAuditAction::MetadataLoadFailed).with_detail(err.to_string()),
            ),
        }
        store
    }

    /// Returns the identity the facade was constructed for.
    #[must_use]
    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    /// Returns the open sequence progress.
    #[must_use]
    pub const fn phase(&self) -> OpenPhase {
        self.phase
    }

    /// Returns true once `open` has completed successfully.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.phase == OpenPhase::Ready
    }

    /// Returns the session user resolved during `open`, if any.
    #[must_use]
    pub const fn session_user(&self) -> Option<&SessionUser> {
        self.session_user.as_ref()
    }

    /// Returns the durable store.
    #[must_use]
    pub const fn durable(&self) -> &D {
        &self.durable
    }

    /// Returns the base store.
    #[must_use]
    pub const fn base(&self) -> &B {
        &self.base
    }

    /// Consumes the facade, returning the durable and base stores.
    pub fn into_parts(self) -> (D, B) {
        (self.durable, self.base)
    }

    /// Runs the base-open, identity-validation, and user-resolution stages.
    async fn run_open(&mut self, identity: &SessionIdentity) -> Result<(), StoreError> {
        self.phase = OpenPhase::BaseOpening;
        self.base.open(identity).await?;

        self.phase = OpenPhase::ValidatingIdentity;
        let user_id = identity.user_id().cloned().ok_or(StoreError::IdentityMissing)?;

        self.phase = OpenPhase::ResolvingUser;
        let users = self.durable.lookup_users(std::slice::from_ref(&user_id)).await?;
        match users.into_iter().next() {
            Some(user) => {
                self.session_user = Some(user);
                self.record(StoreAuditAction::SessionUserResolved);
            }
            None => self.record_event(
                self.event(StoreAuditAction::SessionUserMissing).with_field(FIELD_SESSION_USER),
            ),
        }
        Ok(())
    }

    /// Builds an audit event tagged with the constructed identity.
    fn event(&self, action: StoreAuditAction) -> StoreAuditEvent {
        StoreAuditEvent::new(action, self.identity.user_id())
    }

    /// Records a bare audit event.
    fn record(&self, action: StoreAuditAction) {
        self.record_event(self.event(action));
    }

    /// Records a prepared audit event.
    fn record_event(&self, event: StoreAuditEvent) {
        self.audit.record(&event);
    }

    /// Records a discarded write.
    fn suppressed(&self, field: &'static str, room_id: Option<&RoomId>) {
        let event = self.event(StoreAuditAction::WriteSuppressed).with_field(field);
        self.record_event(match room_id {
            Some(room_id) => event.with_room(room_id),
            None => event,
        });
    }

    /// Reports a synchronous durable read as absent when it fails.
    fn degrade<T>(
        &self,
        field: &'static str,
        room_id: &RoomId,
        result: Result<Option<T>, StoreError>,
    ) -> Option<T> {
        result.unwrap_or_else(|err| {
            self.record_event(
                self.event(StoreAuditAction::DurableReadFailed)
                    .with_field(field)
                    .with_room(room_id)
                    .with_detail(err.to_string()),
            );
            None
        })
    }
}

#[async_trait]
impl<D: DurableStore, B: SessionStore> SessionStore for HybridStore<D, B> {
    async fn open(&mut self, identity: &SessionIdentity) -> Result<(), StoreError> {
        self.record(StoreAuditAction::OpenStarted);
        match self.run_open(identity).await {
            Ok(()) => {
                self.phase = OpenPhase::Ready;
                self.record(StoreAuditAction::OpenCompleted);
                Ok(())
            }
            Err(err) => {
                self.phase = OpenPhase::Failed;
                self.record_event(
                    self.event(StoreAuditAction::OpenFailed).with_detail(err.to_string()),
                );
                Err(err)
            }
        }
    }

    fn sync_cursor(&self) -> Option<SyncCursor> {
        self.cursor_override.clone().or_else(|| self.durable.sync_cursor())
    }

    fn set_sync_cursor(&mut self, cursor: Option<SyncCursor>) {
        self.cursor_override = cursor;
        self.record_event(
            self.event(StoreAuditAction::CursorOverridden).with_field(FIELD_SYNC_CURSOR),
        );
    }

    fn account_data(&self) -> Option<AccountData> {
        self.durable.account_data()
    }

    fn set_account_data(&mut self, _account_data: Option<AccountData>) {
        self.suppressed(FIELD_ACCOUNT_DATA, None);
    }

    fn is_permanent(&self) -> bool {
        true
    }

    fn store_state(&mut self, room_id: &RoomId, _events: Vec<StateEvent>) {
        self.suppressed(FIELD_ROOM_STATE, Some(room_id));
    }

    async fn state(&self, room_id: &RoomId) -> Result<Vec<StateEvent>, StoreError> {
        self.durable.room_state(room_id).await
    }

    fn summary(&self, room_id: &RoomId) -> Option<RoomSummary> {
        self.degrade(FIELD_ROOM_SUMMARY, room_id, self.durable.summary(room_id))
    }

    fn store_summary(&mut self, summary: RoomSummary) {
        self.base.store_summary(summary);
    }

    fn room_account_data(&self, room_id: &RoomId) -> Option<RoomAccountData> {
        self.degrade(FIELD_ROOM_ACCOUNT_DATA, room_id, self.durable.room_account_data(room_id))
    }

    fn store_room_account_data(&mut self, room_id: &RoomId, account_data: RoomAccountData) {
        self.base.store_room_account_data(room_id, account_data);
    }

    fn user(&self, user_id: &UserId) -> Option<SessionUser> {
        if self.identity.user_id() == Some(user_id)
            && let Some(session_user) = &self.session_user
        {
            return Some(session_user.clone());
        }
        Some(SessionUser::placeholder(user_id.clone()))
    }

    fn store_user(&mut self, user: SessionUser) {
        self.base.store_user(user);
    }

    fn sync_filter_id(&self) -> Option<FilterId> {
        self.durable.sync_filter_id()
    }

    fn set_sync_filter_id(&mut self, _filter_id: Option<FilterId>) {
        self.suppressed(FIELD_SYNC_FILTER_ID, None);
    }

    fn room_ids(&self) -> Vec<RoomId> {
        self.base.room_ids()
    }
}
