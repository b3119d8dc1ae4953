// crates/background-store-sqlite/src/lib.rs
// ============================================================================
// Module: Background Store SQLite Library
// Description: SQLite implementation of the durable session store.
// Purpose: Persist session metadata, users, and room records across processes.
// Dependencies: crate::store
// ============================================================================

//! ## Overview
//! [`SqliteDurableStore`] is the durable store the full-session context writes
//! and a restricted background context reads through the hybrid facade. Each
//! store instance is bound to one session user; records of other sessions in
//! the same database file are invisible to it.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_RECORD_BYTES;
pub use store::SqliteDurableStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
