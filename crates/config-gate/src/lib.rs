// crates/config-gate/src/lib.rs
// ============================================================================
// Module: Config Gate Library
// Description: Declarative validation and normalization of config documents.
// Purpose: Turn untrusted JSON-shaped input into normalized values or path-qualified errors.
// Dependencies: chrono-tz, regex, serde, serde_json, thiserror, toml, url
// ============================================================================

//! ## Overview
//! `config-gate` validates loosely typed configuration documents against
//! declarative [`Schema`] trees. Scalars run through composable
//! [`Validator`] pipelines (coercion first, constraints after); mappings fill
//! defaults, reject or drop undeclared keys, and keep declaration order;
//! sequences bound their length and can require unique entries.
//!
//! Validation is a pure function of `(schema, input, mode)`: either the whole
//! document validates and a normalized copy is returned, or an [`ErrorList`]
//! names every failing field by path. Input is never mutated.
//!
//! Security posture: inputs are untrusted. Engine limits bound nesting depth
//! and error volume, and audit events never carry input values.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod builder;
pub mod config;
pub mod docs;
pub mod engine;
pub mod error;
pub mod schema;
pub mod validator;
pub mod validators;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::ValidationAuditEvent;
pub use audit::ValidationAuditSink;
pub use audit::ValidationOutcome;
pub use config::ConfigError;
pub use config::EngineConfig;
pub use config::ValidationSettings;
pub use docs::schema_docs_markdown;
pub use engine::ValidationEngine;
pub use engine::ValidationMode;
pub use engine::validate;
pub use error::ErrorKind;
pub use error::ErrorList;
pub use error::FieldPath;
pub use error::PathSegment;
pub use error::SchemaError;
pub use error::ValidationError;
pub use error::ValidationResult;
pub use schema::DefaultValue;
pub use schema::DynamicMappingSchema;
pub use schema::ExtraPolicy;
pub use schema::Field;
pub use schema::MappingSchema;
pub use schema::Schema;
pub use schema::SequenceSchema;
pub use validator::Validator;
pub use validator::type_name;
