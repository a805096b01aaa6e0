// crates/config-gate/src/validator.rs
// ============================================================================
// Module: Validator Pipelines
// Description: Named, composable value validators.
// Purpose: Run coercion and constraint stages left-to-right over one value.
// Dependencies: crate::error, serde_json
// ============================================================================

//! ## Overview
//! A [`Validator`] is an ordered pipeline of pure stages
//! `Value -> Result<Value, ValidationError>`. Each stage receives the previous
//! stage's output, so coercions placed first shape the value seen by later
//! range or pattern checks. The first failing stage short-circuits the
//! pipeline; sibling fields are unaffected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ValidationError;
use crate::error::ValidationResult;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Signature shared by every validation stage.
pub type ValidateFn = dyn Fn(Value) -> ValidationResult + Send + Sync;

/// Named validation pipeline.
///
/// Cloning is cheap: stages are reference counted and immutable, so one
/// validator can be shared across schemas and threads.
#[derive(Clone)]
pub struct Validator {
    /// Display name used in docs and diagnostics.
    name: Cow<'static, str>,
    /// Stages applied in order.
    stages: Vec<Arc<ValidateFn>>,
}

impl Validator {
    /// Creates a single-stage validator.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, stage: F) -> Self
    where
        F: Fn(Value) -> ValidationResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            stages: vec![Arc::new(stage)],
        }
    }

    /// Concatenates validators into one named pipeline.
    pub fn all<I>(name: impl Into<Cow<'static, str>>, validators: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        Self {
            name: name.into(),
            stages: validators.into_iter().flat_map(|validator| validator.stages).collect(),
        }
    }

    /// Appends `next` after this validator's stages.
    #[must_use]
    pub fn then(mut self, next: Self) -> Self {
        self.name = Cow::Owned(format!("{} -> {}", self.name, next.name));
        self.stages.extend(next.stages);
        self
    }

    /// Replaces the display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the pipeline over `value`.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure.
    pub fn validate(&self, value: Value) -> ValidationResult {
        self.stages.iter().try_fold(value, |current, stage| stage(current))
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("name", &self.name)
            .field("stages", &self.stages.len())
            .finish()
    }
}

// ============================================================================
// SECTION: Value Helpers
// ============================================================================

/// Returns a short type label for diagnostics.
#[must_use]
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Borrows the string payload or fails with a coercion error.
pub(crate) fn expect_str(value: &Value) -> ValidationResult<&str> {
    value.as_str().ok_or_else(|| {
        ValidationError::type_coercion(format!("expected a string, got {}", type_name(value)))
            .with_value(value.clone())
    })
}
