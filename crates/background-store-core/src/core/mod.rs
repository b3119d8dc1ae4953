// crates/background-store-core/src/core/mod.rs
// ============================================================================
// Module: Background Store Core Types
// Description: Session identity, user, room, and account data structures.
// Purpose: Provide stable, serializable types shared by every store backend.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Core types describe what a sync session reads and writes: the session
//! identity, the sync cursor and filter, user records, room summaries, room
//! state, and account data. Stores treat these values as opaque payloads and
//! never normalize them.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod account;
pub mod identifiers;
pub mod identity;
pub mod room;
pub mod user;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use account::AccountData;
pub use account::RoomAccountData;
pub use identifiers::DeviceId;
pub use identifiers::FilterId;
pub use identifiers::RoomId;
pub use identifiers::SyncCursor;
pub use identifiers::UserId;
pub use identity::SessionIdentity;
pub use room::EventRelation;
pub use room::Membership;
pub use room::RoomSummary;
pub use room::StateEvent;
pub use user::Presence;
pub use user::SessionUser;
