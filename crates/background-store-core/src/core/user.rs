// crates/background-store-core/src/core/user.rs
// ============================================================================
// Module: Session Users
// Description: User records resolved from stores.
// Purpose: Model both durable user records and identifier-only placeholders.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! A [`SessionUser`] is either a record a durable store persisted (profile and
//! presence populated as far as the store knows them) or a placeholder that
//! carries nothing beyond the identifier.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: Presence
// ============================================================================

/// Last known presence of a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// User is online.
    Online,
    /// User is offline.
    Offline,
    /// User is idle or away.
    Unavailable,
    /// No presence information.
    #[default]
    Unknown,
}

// ============================================================================
// SECTION: Session User
// ============================================================================

/// User record exposed by stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// User identifier.
    pub user_id: UserId,
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Avatar content URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Last known presence.
    #[serde(default)]
    pub presence: Presence,
    /// Presence status message.
    #[serde(default)]
    pub status_message: Option<String>,
    /// Milliseconds since the user was last active, as reported by the server.
    #[serde(default)]
    pub last_active_ago_ms: Option<u64>,
}

impl SessionUser {
    /// Creates an identifier-only placeholder record.
    #[must_use]
    pub const fn placeholder(user_id: UserId) -> Self {
        Self {
            user_id,
            display_name: None,
            avatar_url: None,
            presence: Presence::Unknown,
            status_message: None,
            last_active_ago_ms: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets the avatar URL.
    #[must_use]
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Sets the presence.
    #[must_use]
    pub fn with_presence(mut self, presence: Presence) -> Self {
        self.presence = presence;
        self
    }

    /// Returns true when the record carries only the identifier.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder(self.user_id.clone())
    }
}
