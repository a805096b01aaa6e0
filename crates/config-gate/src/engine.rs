// crates/config-gate/src/engine.rs
// ============================================================================
// Module: Validation Engine
// Description: Recursive schema walker producing normalized values or errors.
// Purpose: Apply coercion before constraints and aggregate path-qualified failures.
// Dependencies: crate::{audit, config, error, schema, validator}, serde, serde_json
// ============================================================================

//! ## Overview
//! The engine walks a [`Schema`] against an input value:
//! - Scalars run their validator pipeline.
//! - Mappings visit declared fields in declaration order, resolve defaults
//!   (lazy ones fresh per call), report missing required keys, and then apply
//!   the [`ExtraPolicy`](crate::ExtraPolicy) to undeclared keys.
//! - Dynamic mappings validate every key and every value. Key failures are
//!   prefixed `invalid key:` and input keys become entry path segments.
//! - Sequences check `max_length`, then each element, then whole-sequence
//!   validators once all elements passed.
//!
//! In [`ValidationMode::FailFast`] the walk stops at the first error; in
//! [`ValidationMode::CollectAll`] it continues through siblings (up to
//! `max_errors`). Either the whole input validates and a normalized value is
//! returned, or only errors are returned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::audit::NoopAuditSink;
use crate::audit::ValidationAuditEvent;
use crate::audit::ValidationAuditSink;
use crate::config::EngineConfig;
use crate::config::ValidationSettings;
use crate::error::ErrorList;
use crate::error::FieldPath;
use crate::error::PathSegment;
use crate::error::ValidationError;
use crate::schema::DynamicMappingSchema;
use crate::schema::ExtraPolicy;
use crate::schema::MappingSchema;
use crate::schema::Schema;
use crate::schema::SequenceSchema;
use crate::validator::Validator;
use crate::validator::type_name;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Error reporting mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Stop at the first error in declaration order.
    #[default]
    FailFast,
    /// Walk the whole structure and return every error.
    CollectAll,
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Validates `input` against `schema` with default limits and no audit sink.
///
/// # Errors
///
/// Returns every error found (one in fail-fast mode) when `input` is invalid.
pub fn validate(schema: &Schema, input: &Value, mode: ValidationMode) -> Result<Value, ErrorList> {
    ValidationEngine::new(ValidationSettings::with_mode(mode)).validate(schema, input)
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Reusable validation engine holding settings and an audit sink.
///
/// The engine keeps no per-run state, so one instance may serve many threads.
#[derive(Clone)]
pub struct ValidationEngine {
    /// Mode and limits.
    settings: ValidationSettings,
    /// Destination for one audit event per run.
    audit: Arc<dyn ValidationAuditSink>,
}

impl std::fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationEngine").field("settings", &self.settings).finish_non_exhaustive()
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(ValidationSettings::default())
    }
}

impl ValidationEngine {
    /// Creates an engine with the given settings and a no-op audit sink.
    #[must_use]
    pub fn new(settings: ValidationSettings) -> Self {
        Self {
            settings,
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Creates an engine from a validated [`EngineConfig`].
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.validation)
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn ValidationAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the active settings.
    #[must_use]
    pub const fn settings(&self) -> &ValidationSettings {
        &self.settings
    }

    /// Validates `input` against `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorList`] when `input` is invalid.
    pub fn validate(&self, schema: &Schema, input: &Value) -> Result<Value, ErrorList> {
        self.run(None, schema, input)
    }

    /// Validates `input` and tags the audit event with `label`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorList`] when `input` is invalid.
    pub fn validate_labeled(
        &self,
        label: &str,
        schema: &Schema,
        input: &Value,
    ) -> Result<Value, ErrorList> {
        self.run(Some(label), schema, input)
    }

    /// Runs one walk and records its audit event.
    fn run(&self, label: Option<&str>, schema: &Schema, input: &Value) -> Result<Value, ErrorList> {
        let mut walker = Walker::new(&self.settings);
        let output = walker.walk(schema, input);
        let result = match output {
            Some(normalized) if walker.errors.is_empty() => Ok(normalized),
            _ => Err(walker.finish()),
        };
        let event = ValidationAuditEvent::new(label, self.settings.mode, result.as_ref().err());
        self.audit.record(&event);
        result
    }
}

// ============================================================================
// SECTION: Walker
// ============================================================================

/// Per-call traversal state.
struct Walker<'a> {
    /// Mode and limits.
    settings: &'a ValidationSettings,
    /// Path of the value currently being visited.
    path: FieldPath,
    /// Errors in discovery order.
    errors: ErrorList,
    /// Current nesting depth.
    depth: usize,
}

impl<'a> Walker<'a> {
    /// Creates a walker at the root.
    const fn new(settings: &'a ValidationSettings) -> Self {
        Self {
            settings,
            path: FieldPath::root(),
            errors: ErrorList::new(),
            depth: 0,
        }
    }

    /// Returns the collected errors, never empty.
    fn finish(mut self) -> ErrorList {
        if self.errors.is_empty() {
            self.errors.push(ValidationError::structural("validation produced no output"));
        }
        self.errors
    }

    /// Returns true once no further errors may be recorded.
    fn halted(&self) -> bool {
        match self.settings.mode {
            ValidationMode::FailFast => !self.errors.is_empty(),
            ValidationMode::CollectAll => self.errors.len() >= self.settings.max_errors,
        }
    }

    /// Records an error relative to the current path.
    fn report(&mut self, error: ValidationError) {
        if !self.halted() {
            self.errors.push(error.within(&self.path));
        }
    }

    /// Records an error at a child of the current path.
    fn report_at(&mut self, segment: PathSegment, error: ValidationError) {
        self.path.push(segment);
        self.report(error);
        self.path.pop();
    }

    /// Validates `value` against `schema`; `None` means errors were recorded.
    fn walk(&mut self, schema: &Schema, value: &Value) -> Option<Value> {
        if self.depth >= self.settings.max_depth {
            self.report(ValidationError::structural(format!(
                "nesting exceeds maximum depth {}",
                self.settings.max_depth
            )));
            return None;
        }
        self.depth += 1;
        let output = match schema {
            Schema::Scalar(validator) => self.walk_scalar(validator, value),
            Schema::Mapping(mapping) => self.walk_mapping(mapping, value),
            Schema::DynamicMapping(dynamic) => self.walk_dynamic(dynamic, value),
            Schema::Sequence(sequence) => self.walk_sequence(sequence, value),
        };
        self.depth -= 1;
        output
    }

    /// Validates a child value under `segment`.
    fn walk_child(&mut self, segment: PathSegment, schema: &Schema, value: &Value) -> Option<Value> {
        self.path.push(segment);
        let output = self.walk(schema, value);
        self.path.pop();
        output
    }

    /// Runs a scalar validator pipeline.
    fn walk_scalar(&mut self, validator: &Validator, value: &Value) -> Option<Value> {
        match validator.validate(value.clone()) {
            Ok(normalized) => Some(normalized),
            Err(error) => {
                self.report(error);
                None
            }
        }
    }

    /// Reports a shape mismatch for a container node.
    fn mismatch(&mut self, expected: &str, value: &Value) {
        let message = format!("expected a {expected}, got {}", type_name(value));
        self.report(ValidationError::structural(message).with_value(value.clone()));
    }

    /// Validates a fixed-field mapping.
    fn walk_mapping(&mut self, mapping: &MappingSchema, value: &Value) -> Option<Value> {
        let Value::Object(input) = value else {
            self.mismatch("mapping", value);
            return None;
        };
        let mut output = Map::new();
        let mut failed = false;
        for field in mapping.fields() {
            if self.halted() {
                return None;
            }
            let raw = match input.get(field.key()) {
                Some(present) => Some(Cow::Borrowed(present)),
                None => field.default_value().resolve().map(Cow::Owned),
            };
            match raw {
                Some(raw) => match self.walk_child(PathSegment::key(field.key()), field.schema(), &raw)
                {
                    Some(normalized) => {
                        output.insert(field.key().to_string(), normalized);
                    }
                    None => failed = true,
                },
                None if field.is_required() => {
                    self.report_at(PathSegment::key(field.key()), ValidationError::missing_required());
                    failed = true;
                }
                None => {}
            }
        }
        for (key, raw) in input {
            if mapping.declares(key) {
                continue;
            }
            if self.halted() {
                return None;
            }
            match mapping.extra_policy() {
                ExtraPolicy::Reject => {
                    self.report_at(PathSegment::key(key.as_str()), ValidationError::unexpected_key(key));
                    failed = true;
                }
                ExtraPolicy::RemoveSilently => {}
                ExtraPolicy::Preserve => {
                    output.insert(key.clone(), raw.clone());
                }
            }
        }
        if failed { None } else { Some(Value::Object(output)) }
    }

    /// Validates an open-ended mapping.
    fn walk_dynamic(&mut self, dynamic: &DynamicMappingSchema, value: &Value) -> Option<Value> {
        let Value::Object(input) = value else {
            self.mismatch("mapping", value);
            return None;
        };
        let mut output = Map::new();
        let mut failed = false;
        for (raw_key, raw_value) in input {
            if self.halted() {
                return None;
            }
            let segment = PathSegment::entry(raw_key.as_str());
            let key = match dynamic
                .key_validator()
                .validate(Value::String(raw_key.clone()))
                .and_then(key_string)
            {
                Ok(key) => Some(key),
                Err(error) => {
                    self.report_at(segment.clone(), as_key_error(error));
                    None
                }
            };
            if self.halted() {
                return None;
            }
            let normalized = self.walk_child(segment.clone(), dynamic.value_schema(), raw_value);
            match (key, normalized) {
                (Some(key), Some(_)) if output.contains_key(&key) => {
                    let error = ValidationError::constraint(format!(
                        "key `{raw_key}` duplicates normalized key `{key}`"
                    ));
                    self.report_at(segment, error);
                    failed = true;
                }
                (Some(key), Some(normalized)) => {
                    output.insert(key, normalized);
                }
                _ => failed = true,
            }
        }
        if failed { None } else { Some(Value::Object(output)) }
    }

    /// Validates a sequence.
    fn walk_sequence(&mut self, sequence: &SequenceSchema, value: &Value) -> Option<Value> {
        let Value::Array(items) = value else {
            self.mismatch("sequence", value);
            return None;
        };
        let mut failed = false;
        if let Some(max) = sequence.max_length()
            && items.len() > max
        {
            self.report(ValidationError::constraint(format!(
                "sequence has {} entries, maximum is {max}",
                items.len()
            )));
            failed = true;
        }
        let mut output = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            if self.halted() {
                return None;
            }
            match self.walk_child(PathSegment::Index(index), sequence.element(), item) {
                Some(normalized) => output.push(normalized),
                None => failed = true,
            }
        }
        if failed {
            return None;
        }
        let mut normalized = Value::Array(output);
        for check in sequence.checks() {
            match check.validate(normalized) {
                Ok(next) => normalized = next,
                Err(error) => {
                    self.report(error);
                    return None;
                }
            }
        }
        Some(normalized)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Renders a normalized dynamic-mapping key back to a string.
fn key_string(key: Value) -> Result<String, ValidationError> {
    match key {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => {
            let message = format!("key normalized to a {}, expected a scalar", type_name(&other));
            Err(ValidationError::structural(message).with_value(other))
        }
    }
}

/// Marks a key validator failure so it reads apart from a value failure at the same path.
fn as_key_error(mut error: ValidationError) -> ValidationError {
    error.message = format!("invalid key: {}", error.message);
    error
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn key_string_renders_scalars() {
        assert_eq!(key_string(json!("80/tcp")).unwrap(), "80/tcp");
        assert_eq!(key_string(json!(80)).unwrap(), "80");
        assert_eq!(key_string(json!(true)).unwrap(), "true");
        assert_eq!(key_string(json!([1])).unwrap_err().kind, ErrorKind::StructuralMismatch);
    }

    #[test]
    fn key_errors_are_marked_and_entry_paths_redact() {
        let error = as_key_error(ValidationError::constraint("bad port key"));
        assert_eq!(error.message, "invalid key: bad port key");
        let path: FieldPath =
            [PathSegment::key("session"), PathSegment::entry("secret"), PathSegment::Index(0)]
                .into_iter()
                .collect();
        assert_eq!(path.to_string(), "session.secret[0]");
        assert_eq!(path.redacted(), "session.*[0]");
    }

    #[test]
    fn walker_halts_after_first_error_in_fail_fast() {
        let settings = ValidationSettings::with_mode(ValidationMode::FailFast);
        let mut walker = Walker::new(&settings);
        assert!(!walker.halted());
        walker.report(ValidationError::constraint("first"));
        walker.report(ValidationError::constraint("second"));
        assert!(walker.halted());
        assert_eq!(walker.errors.len(), 1);
    }

    #[test]
    fn walker_respects_max_errors_in_collect_all() {
        let settings = ValidationSettings {
            mode: ValidationMode::CollectAll,
            max_errors: 2,
            ..ValidationSettings::default()
        };
        let mut walker = Walker::new(&settings);
        for _ in 0..5 {
            walker.report(ValidationError::constraint("boom"));
        }
        assert_eq!(walker.errors.len(), 2);
    }

    #[test]
    fn walker_finish_never_returns_empty_list() {
        let settings = ValidationSettings::default();
        let walker = Walker::new(&settings);
        assert_eq!(walker.finish().len(), 1);
    }
}
