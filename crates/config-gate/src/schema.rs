// crates/config-gate/src/schema.rs
// ============================================================================
// Module: Schema Nodes
// Description: Immutable declarations of expected value shapes.
// Purpose: Describe scalars, fixed-field mappings, dynamic-key mappings, and sequences.
// Dependencies: crate::{error, validator}, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Schema`] tree is declared once and never mutated. Fixed-field
//! [`MappingSchema`]s keep their fields in declaration order, which is also
//! the order of the normalized output. Open-ended maps use the separate
//! [`DynamicMappingSchema`] variant so required/extra-key rules never apply to
//! them. Defaults are either eager values or closures evaluated fresh on every
//! validation call.
//!
//! Invariants:
//! - Field keys within one mapping are unique (enforced at construction).
//! - Schemas are `Send + Sync`; lazy defaults must be safe to call concurrently.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::error::SchemaError;
use crate::validator::Validator;

// ============================================================================
// SECTION: Extra Key Policy
// ============================================================================

/// Handling of input keys a mapping does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraPolicy {
    /// Each undeclared key is an `UnexpectedKey` error.
    Reject,
    /// Undeclared keys are dropped from the output without error.
    #[default]
    RemoveSilently,
    /// Undeclared keys are copied to the output unchanged.
    Preserve,
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Zero-argument default generator.
pub type DefaultFn = dyn Fn() -> Value + Send + Sync;

/// Default applied when an optional field is absent.
#[derive(Clone, Default)]
pub enum DefaultValue {
    /// No default; the key is omitted from the output.
    #[default]
    None,
    /// Fixed value.
    Eager(Value),
    /// Value computed on every validation call, never cached.
    Lazy(Arc<DefaultFn>),
}

impl DefaultValue {
    /// Produces the default, invoking a lazy generator once per call.
    #[must_use]
    pub fn resolve(&self) -> Option<Value> {
        match self {
            Self::None => None,
            Self::Eager(value) => Some(value.clone()),
            Self::Lazy(generate) => Some(generate()),
        }
    }

    /// Returns true when a default is declared.
    #[must_use]
    pub const fn is_declared(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Eager(value) => f.debug_tuple("Eager").field(value).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

// ============================================================================
// SECTION: Fields
// ============================================================================

/// One declared key of a [`MappingSchema`].
#[derive(Debug, Clone)]
pub struct Field {
    /// Mapping key.
    key: String,
    /// Whether absence without a default is an error.
    required: bool,
    /// Default used when the key is absent.
    default: DefaultValue,
    /// Schema applied to the value.
    schema: Schema,
}

impl Field {
    /// Creates a field.
    pub fn new(key: impl Into<String>, required: bool, schema: impl Into<Schema>) -> Self {
        Self {
            key: key.into(),
            required,
            default: DefaultValue::None,
            schema: schema.into(),
        }
    }

    /// Sets a fixed default.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = DefaultValue::Eager(value.into());
        self
    }

    /// Sets a default computed fresh on every validation call.
    #[must_use]
    pub fn with_default_fn<F>(mut self, generate: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = DefaultValue::Lazy(Arc::new(generate));
        self
    }

    /// Returns the mapping key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns true when the field is required.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the declared default.
    #[must_use]
    pub const fn default_value(&self) -> &DefaultValue {
        &self.default
    }

    /// Returns the value schema.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }
}

// ============================================================================
// SECTION: Node Variants
// ============================================================================

/// Mapping with a fixed, ordered field set.
#[derive(Debug, Clone)]
pub struct MappingSchema {
    /// Fields in declaration order.
    fields: Vec<Field>,
    /// Handling of undeclared keys.
    extra: ExtraPolicy,
}

impl MappingSchema {
    /// Creates a mapping schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateField`] when two fields share a key.
    pub fn new(fields: Vec<Field>, extra: ExtraPolicy) -> Result<Self, SchemaError> {
        let mut seen = BTreeSet::new();
        for field in &fields {
            if !seen.insert(field.key()) {
                return Err(SchemaError::DuplicateField(field.key().to_string()));
            }
        }
        Ok(Self {
            fields,
            extra,
        })
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the extra key policy.
    #[must_use]
    pub const fn extra_policy(&self) -> ExtraPolicy {
        self.extra
    }

    /// Looks up a field by key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.key() == key)
    }

    /// Returns true when `key` is declared.
    #[must_use]
    pub fn declares(&self, key: &str) -> bool {
        self.field(key).is_some()
    }
}

/// Mapping with open-ended keys sharing one key shape and one value shape.
#[derive(Debug, Clone)]
pub struct DynamicMappingSchema {
    /// Validator applied to every key (as a string value).
    key: Validator,
    /// Schema applied to every value.
    value: Box<Schema>,
}

impl DynamicMappingSchema {
    /// Creates a dynamic mapping schema.
    pub fn new(key: Validator, value: impl Into<Schema>) -> Self {
        Self {
            key,
            value: Box::new(value.into()),
        }
    }

    /// Returns the key validator.
    #[must_use]
    pub const fn key_validator(&self) -> &Validator {
        &self.key
    }

    /// Returns the value schema.
    #[must_use]
    pub fn value_schema(&self) -> &Schema {
        &self.value
    }
}

/// Sequence of elements sharing one schema.
#[derive(Debug, Clone)]
pub struct SequenceSchema {
    /// Schema applied to each element.
    element: Box<Schema>,
    /// Maximum number of elements, checked before element validation.
    max_length: Option<usize>,
    /// Whole-sequence validators run after every element succeeds.
    checks: Vec<Validator>,
}

impl SequenceSchema {
    /// Creates a sequence schema.
    pub fn new(element: impl Into<Schema>, max_length: Option<usize>) -> Self {
        Self {
            element: Box::new(element.into()),
            max_length,
            checks: Vec::new(),
        }
    }

    /// Adds a whole-sequence validator (for example `unique()`).
    #[must_use]
    pub fn with_check(mut self, check: Validator) -> Self {
        self.checks.push(check);
        self
    }

    /// Returns the element schema.
    #[must_use]
    pub fn element(&self) -> &Schema {
        &self.element
    }

    /// Returns the maximum length.
    #[must_use]
    pub const fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Returns the whole-sequence validators.
    #[must_use]
    pub fn checks(&self) -> &[Validator] {
        &self.checks
    }
}

// ============================================================================
// SECTION: Schema
// ============================================================================

/// Recursive description of one expected value.
#[derive(Debug, Clone)]
pub enum Schema {
    /// Single value run through a validator pipeline.
    Scalar(Validator),
    /// Fixed-field mapping.
    Mapping(MappingSchema),
    /// Open-ended mapping.
    DynamicMapping(DynamicMappingSchema),
    /// Sequence.
    Sequence(SequenceSchema),
}

impl Schema {
    /// Returns a short human-readable description of the node.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Scalar(validator) => validator.name().to_string(),
            Self::Mapping(_) => "mapping".to_string(),
            Self::DynamicMapping(dynamic) => format!(
                "mapping<{}, {}>",
                dynamic.key_validator().name(),
                dynamic.value_schema().describe()
            ),
            Self::Sequence(sequence) => match sequence.max_length() {
                Some(max) => format!("sequence<{}> (max {max})", sequence.element().describe()),
                None => format!("sequence<{}>", sequence.element().describe()),
            },
        }
    }
}

impl From<Validator> for Schema {
    fn from(validator: Validator) -> Self {
        Self::Scalar(validator)
    }
}

impl From<MappingSchema> for Schema {
    fn from(mapping: MappingSchema) -> Self {
        Self::Mapping(mapping)
    }
}

impl From<DynamicMappingSchema> for Schema {
    fn from(dynamic: DynamicMappingSchema) -> Self {
        Self::DynamicMapping(dynamic)
    }
}

impl From<SequenceSchema> for Schema {
    fn from(sequence: SequenceSchema) -> Self {
        Self::Sequence(sequence)
    }
}
