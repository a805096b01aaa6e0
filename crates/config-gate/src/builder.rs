// crates/config-gate/src/builder.rs
// ============================================================================
// Module: Schema Builders
// Description: Free functions for declaring schema trees.
// Purpose: Keep schema declarations short and read like data.
// Dependencies: crate::{error, schema, validator}
// ============================================================================

//! ## Overview
//! Thin constructors over the [`Schema`] node types. A typical declaration:
//!
//! ```
//! use config_gate::builder::{mapping, optional, required};
//! use config_gate::validators::{log_level, network_port};
//! use config_gate::ExtraPolicy;
//!
//! let schema = mapping(
//!     [
//!         required("port", network_port()),
//!         optional("logging", log_level()).with_default("info"),
//!     ],
//!     ExtraPolicy::RemoveSilently,
//! )?;
//! # Ok::<(), config_gate::SchemaError>(())
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::error::SchemaError;
use crate::schema::DynamicMappingSchema;
use crate::schema::ExtraPolicy;
use crate::schema::Field;
use crate::schema::MappingSchema;
use crate::schema::Schema;
use crate::schema::SequenceSchema;
use crate::validator::Validator;

// ============================================================================
// SECTION: Node Builders
// ============================================================================

/// Scalar node running `validator`.
#[must_use]
pub fn scalar(validator: Validator) -> Schema {
    Schema::Scalar(validator)
}

/// Required field; absence is `MissingRequired` unless a default is added.
pub fn required(key: impl Into<String>, schema: impl Into<Schema>) -> Field {
    Field::new(key, true, schema)
}

/// Optional field; absence omits the key unless a default is added.
pub fn optional(key: impl Into<String>, schema: impl Into<Schema>) -> Field {
    Field::new(key, false, schema)
}

/// Fixed-field mapping node.
///
/// # Errors
///
/// Returns [`SchemaError::DuplicateField`] when two fields share a key.
pub fn mapping<I>(fields: I, extra: ExtraPolicy) -> Result<Schema, SchemaError>
where
    I: IntoIterator<Item = Field>,
{
    MappingSchema::new(fields.into_iter().collect(), extra).map(Schema::Mapping)
}

/// Open-ended mapping node: every key runs through `key`, every value through `value`.
pub fn dynamic_mapping(key: Validator, value: impl Into<Schema>) -> Schema {
    Schema::DynamicMapping(DynamicMappingSchema::new(key, value))
}

/// Sequence node with an optional maximum length.
pub fn sequence(element: impl Into<Schema>, max_length: Option<usize>) -> Schema {
    Schema::Sequence(SequenceSchema::new(element, max_length))
}

/// Sequence node followed by whole-sequence validators such as `unique()`.
pub fn sequence_with_checks(
    element: impl Into<Schema>,
    max_length: Option<usize>,
    checks: Vec<Validator>,
) -> Schema {
    let sequence = checks
        .into_iter()
        .fold(SequenceSchema::new(element, max_length), SequenceSchema::with_check);
    Schema::Sequence(sequence)
}
