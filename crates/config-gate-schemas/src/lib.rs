// crates/config-gate-schemas/src/lib.rs
// ============================================================================
// Module: Config Gate Schemas Library
// Description: Declared schemas for the supervisor's persisted config files.
// Purpose: Single source of truth for each config document's shape and defaults.
// Dependencies: config-gate, serde_json, uuid
// ============================================================================

//! ## Overview
//! `config-gate-schemas` declares the stock config documents (home assistant
//! core, updater, supervisor, auth, ingress) as [`config_gate::Schema`] trees
//! built only from the engine's public construction primitives. Every mapping
//! drops unknown keys so files written by newer releases still load.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod ids;
pub mod schemas;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use ids::random_hex_id;
pub use schemas::*;
