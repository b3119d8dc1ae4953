// crates/background-store-core/src/lib.rs
// ============================================================================
// Module: Background Store Core Library
// Description: Public API surface for the background store facade.
// Purpose: Expose session data types, store interfaces, and the hybrid facade.
// Dependencies: crate::{audit, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Background store core lets a short-lived, resource-constrained execution
//! context run an incremental sync against a remote service. The
//! [`HybridStore`] facade answers reads from an in-memory base store or from a
//! durable store that was persisted by the full-session context, and
//! suppresses the writes a restricted context must never make durable.
//!
//! Initialization order matters: reads on the facade are only meaningful after
//! [`SessionStore::open`] has returned `Ok(())`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::StoreAuditAction;
pub use audit::StoreAuditEvent;
pub use audit::StoreAuditSink;
pub use interfaces::DurableStore;
pub use interfaces::SessionStore;
pub use interfaces::StoreError;
pub use runtime::HybridStore;
pub use runtime::InMemoryDurableStore;
pub use runtime::InMemoryStore;
pub use runtime::OpenPhase;
