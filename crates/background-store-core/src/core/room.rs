// crates/background-store-core/src/core/room.rs
// ============================================================================
// Module: Room Types
// Description: Room summaries and room state events.
// Purpose: Model the per-room projections a durable store persists.
// Dependencies: crate::core::identifiers, serde, serde_json
// ============================================================================

//! ## Overview
//! Room summaries carry the denormalized fields a client needs to render a
//! room list. State events are kept verbatim; the only interpretation offered
//! here is extraction of the `m.relates_to` relation block.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::RoomId;
use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Content key holding an event relation.
const RELATES_TO_KEY: &str = "m.relates_to";
/// Relation key holding a reply target.
const IN_REPLY_TO_KEY: &str = "m.in_reply_to";

// ============================================================================
// SECTION: Room Summary
// ============================================================================

/// Membership of the session user in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Membership {
    /// Joined.
    Join,
    /// Invited.
    Invite,
    /// Left or kicked.
    Leave,
    /// Banned.
    Ban,
    /// Requested to join.
    Knock,
}

/// Denormalized room summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    /// Room identifier.
    pub room_id: RoomId,
    /// Room name.
    #[serde(default)]
    pub name: Option<String>,
    /// Room topic.
    #[serde(default)]
    pub topic: Option<String>,
    /// Room avatar URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Membership of the session user.
    #[serde(default)]
    pub membership: Option<Membership>,
    /// Joined member count.
    #[serde(default)]
    pub joined_member_count: u64,
    /// Invited member count.
    #[serde(default)]
    pub invited_member_count: u64,
    /// Whether the room is end-to-end encrypted.
    #[serde(default)]
    pub is_encrypted: bool,
    /// Origin server timestamp of the latest event, in milliseconds.
    #[serde(default)]
    pub last_activity_ts: Option<u64>,
}

impl RoomSummary {
    /// Creates an empty summary for a room.
    #[must_use]
    pub const fn new(room_id: RoomId) -> Self {
        Self {
            room_id,
            name: None,
            topic: None,
            avatar_url: None,
            membership: None,
            joined_member_count: 0,
            invited_member_count: 0,
            is_encrypted: false,
            last_activity_ts: None,
        }
    }

    /// Sets the room name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the membership.
    #[must_use]
    pub fn with_membership(mut self, membership: Membership) -> Self {
        self.membership = Some(membership);
        self
    }
}

// ============================================================================
// SECTION: State Events
// ============================================================================

/// Room state event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEvent {
    /// Event identifier.
    pub event_id: String,
    /// Event type (for example `m.room.member`).
    pub event_type: String,
    /// State key.
    pub state_key: String,
    /// Sender of the event.
    pub sender: UserId,
    /// Origin server timestamp in milliseconds.
    pub origin_server_ts: u64,
    /// Raw event content.
    pub content: Value,
}

impl StateEvent {
    /// Returns the relation declared in the event content, if any.
    #[must_use]
    pub fn relation(&self) -> Option<EventRelation> {
        EventRelation::from_content(&self.content)
    }
}

/// Relation between an event and another event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRelation {
    /// Relation type (for example `m.annotation` or `m.replace`).
    pub relation_type: Option<String>,
    /// Target event identifier.
    pub event_id: Option<String>,
    /// Annotation key.
    pub key: Option<String>,
    /// Event replied to.
    pub in_reply_to: Option<String>,
}

impl EventRelation {
    /// Parses the relation block from event content.
    ///
    /// Returns `None` when the block is absent or is not a JSON object.
    #[must_use]
    pub fn from_content(content: &Value) -> Option<Self> {
        let block = content.get(RELATES_TO_KEY)?.as_object()?;
        let text = |key: &str| block.get(key).and_then(Value::as_str).map(str::to_string);
        let in_reply_to = block
            .get(IN_REPLY_TO_KEY)
            .and_then(|reply| reply.get("event_id"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Some(Self {
            relation_type: text("rel_type"),
            event_id: text("event_id"),
            key: text("key"),
            in_reply_to,
        })
    }
}
