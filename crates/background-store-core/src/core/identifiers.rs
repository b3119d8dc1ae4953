// crates/background-store-core/src/core/identifiers.rs
// ============================================================================
// Module: Background Store Identifiers
// Description: Opaque string identifiers for users, rooms, devices, and sync tokens.
// Purpose: Provide strongly typed, serializable IDs with stable string forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Identifiers are opaque and serialize as plain strings. Stores compare them
//! byte-for-byte; no case folding or server-name normalization is applied.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Macro
// ============================================================================

/// Declares an opaque string identifier with the shared accessor surface.
macro_rules! opaque_identifier {
    ($(#[$meta:meta])* $name:ident, $noun:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new ", $noun, ".")]
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[doc = concat!("Returns the ", $noun, " as a string slice.")]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[doc = concat!("Returns true when the ", $noun, " is empty.")]
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }
    };
}

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

opaque_identifier!(
    /// User identifier (for example `@alice:example.org`).
    UserId,
    "user identifier"
);

opaque_identifier!(
    /// Room identifier (for example `!abc:example.org`).
    RoomId,
    "room identifier"
);

opaque_identifier!(
    /// Device identifier of the session.
    DeviceId,
    "device identifier"
);

opaque_identifier!(
    /// Sync cursor returned by the remote service after each sync response.
    ///
    /// # Invariants
    /// - Opaque; ordering between two cursors is only known to the server.
    SyncCursor,
    "sync cursor"
);

opaque_identifier!(
    /// Server-side sync filter identifier.
    FilterId,
    "filter identifier"
);
