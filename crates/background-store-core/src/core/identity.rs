// crates/background-store-core/src/core/identity.rs
// ============================================================================
// Module: Session Identity
// Description: Credential bundle identifying the session that owns a store.
// Purpose: Carry the user identifier stores are keyed by.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! A session identity is owned by the caller and shared read-only with stores.
//! Only the user identifier is validated; an absent or empty identifier is
//! treated identically.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::DeviceId;
use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: Session Identity
// ============================================================================

/// Session identity for a logged-in account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// User identifier of the account (required for `open`).
    pub user_id: Option<UserId>,
    /// Device identifier of the session.
    #[serde(default)]
    pub device_id: Option<DeviceId>,
    /// Homeserver base URL.
    #[serde(default)]
    pub homeserver: Option<String>,
}

impl SessionIdentity {
    /// Creates an identity for the provided user.
    #[must_use]
    pub fn for_user(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            device_id: None,
            homeserver: None,
        }
    }

    /// Creates an identity without a user identifier.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Sets the device identifier.
    #[must_use]
    pub fn with_device(mut self, device_id: impl Into<DeviceId>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Sets the homeserver URL.
    #[must_use]
    pub fn with_homeserver(mut self, homeserver: impl Into<String>) -> Self {
        self.homeserver = Some(homeserver.into());
        self
    }

    /// Returns the user identifier when present and non-empty.
    #[must_use]
    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref().filter(|user_id| !user_id.is_empty())
    }
}
