// crates/background-store-core/src/runtime/mod.rs
// ============================================================================
// Module: Background Store Runtime
// Description: In-memory stores and the hybrid facade.
// Purpose: Provide the concrete stores a background sync runs against.
// Dependencies: crate::{audit, core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the store interfaces: an in-memory session store
//! used as the facade's base, an in-memory durable store for tests and local
//! demos, and the [`HybridStore`] facade that routes between them.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod durable;
pub mod hybrid;
pub mod memory;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use durable::InMemoryDurableStore;
pub use hybrid::HybridStore;
pub use hybrid::OpenPhase;
pub use memory::InMemoryStore;
