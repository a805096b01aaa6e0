// crates/config-gate/src/validators/mod.rs
// ============================================================================
// Module: Validator Library
// Description: Primitive and composite validators.
// Purpose: Group the reusable building blocks for schema declarations.
// Dependencies: crate::validators::{composite, primitive}
// ============================================================================

//! ## Overview
//! [`primitive`] holds single-purpose coercions and constraints; [`composite`]
//! builds the named semantic validators (ports, hex tokens, DNS URLs,
//! repositories, timezones) out of those primitives.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod composite;
pub mod primitive;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use composite::*;
pub use primitive::*;
