// crates/background-store-config/src/lib.rs
// ============================================================================
// Module: Background Store Config Library
// Description: Configuration model and validation for the background store.
// Purpose: Single source of truth for background-store.toml semantics.
// Dependencies: background-store-core, background-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `background-store-config` loads the TOML file that tells a restricted
//! background context where the durable session store lives and where audit
//! events go. Validation is strict and fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
