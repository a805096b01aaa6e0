// crates/config-gate-schemas/src/ids.rs
// ============================================================================
// Module: Identifier Generation
// Description: Random identifiers used as computed schema defaults.
// Purpose: Produce fresh instance identifiers on every validation call.
// Dependencies: uuid
// ============================================================================

//! Random instance identifiers for computed defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use uuid::Uuid;

// ============================================================================
// SECTION: Generation
// ============================================================================

/// Returns a random version 4 UUID rendered as 32 lowercase hex characters.
#[must_use]
pub fn random_hex_id() -> String {
    Uuid::new_v4().simple().to_string()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
