// crates/background-store-core/src/core/account.rs
// ============================================================================
// Module: Account Data
// Description: Session-level and per-room account data containers.
// Purpose: Hold account data events keyed by event type.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Account data is stored as raw JSON content keyed by event type (for example
//! `m.push_rules` or `m.direct`). Content is opaque to stores.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Account Data
// ============================================================================

/// Session-level account data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountData {
    /// Event content keyed by event type.
    events: BTreeMap<String, Value>,
}

impl AccountData {
    /// Creates empty account data.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            events: BTreeMap::new(),
        }
    }

    /// Adds or replaces the content for an event type.
    #[must_use]
    pub fn with_event(mut self, event_type: impl Into<String>, content: Value) -> Self {
        self.insert(event_type, content);
        self
    }

    /// Adds or replaces the content for an event type.
    pub fn insert(&mut self, event_type: impl Into<String>, content: Value) {
        self.events.insert(event_type.into(), content);
    }

    /// Returns the content for an event type.
    #[must_use]
    pub fn get(&self, event_type: &str) -> Option<&Value> {
        self.events.get(event_type)
    }

    /// Returns the stored event types in sorted order.
    pub fn event_types(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }

    /// Returns the number of stored events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true when no events are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// ============================================================================
// SECTION: Room Account Data
// ============================================================================

/// Account data scoped to a single room.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomAccountData {
    /// Event content keyed by event type.
    #[serde(default)]
    pub events: BTreeMap<String, Value>,
    /// Room tags keyed by tag name (content of `m.tag`).
    #[serde(default)]
    pub tags: BTreeMap<String, Value>,
}

impl RoomAccountData {
    /// Returns the content for an event type.
    #[must_use]
    pub fn get(&self, event_type: &str) -> Option<&Value> {
        self.events.get(event_type)
    }

    /// Returns the tag names in sorted order.
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }
}
