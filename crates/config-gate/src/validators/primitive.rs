// crates/config-gate/src/validators/primitive.rs
// ============================================================================
// Module: Primitive Validators
// Description: Coercions and single-constraint checks over one value.
// Purpose: Provide the building blocks every composite validator is made of.
// Dependencies: crate::{error, validator}, regex, serde, serde_json
// ============================================================================

//! ## Overview
//! Each primitive either returns a normalized value of a definite type or
//! fails with [`ErrorKind::TypeCoercion`](crate::ErrorKind::TypeCoercion) (the
//! value has the wrong type) or
//! [`ErrorKind::ConstraintViolation`](crate::ErrorKind::ConstraintViolation)
//! (right type, out of bounds). Coercions are lossless: `"8080"` becomes
//! `8080`, `5.0` becomes `5`, but `5.5` is rejected as an integer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Number;
use serde_json::Value;

use crate::error::SchemaError;
use crate::error::ValidationError;
use crate::error::ValidationResult;
use crate::validator::Validator;
use crate::validator::expect_str;
use crate::validator::type_name;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Smallest f64 that converts to i64 without overflow.
const I64_LOWER_BOUND: f64 = -9_223_372_036_854_775_808.0;
/// First f64 above the i64 range.
const I64_UPPER_BOUND_EXCLUSIVE: f64 = 9_223_372_036_854_775_808.0;
/// Strings accepted as boolean true.
const TRUTHY: [&str; 5] = ["1", "true", "yes", "on", "enable"];
/// Strings accepted as boolean false.
const FALSY: [&str; 5] = ["0", "false", "no", "off", "disable"];

// ============================================================================
// SECTION: Coercion
// ============================================================================

/// Target type for [`coerce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoerceKind {
    /// Whole number; integral floats and numeric strings are converted.
    Integer,
    /// Finite floating point number.
    Float,
    /// String; numbers and booleans are rendered.
    String,
    /// Boolean; accepts common on/off spellings and numbers.
    Boolean,
}

impl CoerceKind {
    /// Returns the stable label for this kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Boolean => "boolean",
        }
    }
}

/// Converts a value to `kind`, failing when no lossless conversion exists.
#[must_use]
pub fn coerce(kind: CoerceKind) -> Validator {
    Validator::new(format!("coerce({})", kind.label()), move |value| match kind {
        CoerceKind::Integer => coerce_integer(value),
        CoerceKind::Float => coerce_float(value),
        CoerceKind::String => coerce_string(value),
        CoerceKind::Boolean => coerce_boolean(value),
    })
}

/// Builds the standard coercion failure.
fn coercion_failed(value: Value, kind: CoerceKind) -> ValidationError {
    ValidationError::type_coercion(format!(
        "cannot coerce {} {} to {}",
        type_name(&value),
        render_value(&value),
        kind.label()
    ))
    .with_value(value)
}

/// Coerces to an integer.
fn coerce_integer(value: Value) -> ValidationResult {
    if value.is_i64() || value.is_u64() {
        return Ok(value);
    }
    let converted = match &value {
        Value::Number(number) => number.as_f64().and_then(integral_from_f64).map(Value::from),
        Value::String(text) => parse_integer(text.trim()),
        _ => None,
    };
    converted.ok_or_else(|| coercion_failed(value, CoerceKind::Integer))
}

/// Converts an integral, in-range float to i64.
fn integral_from_f64(number: f64) -> Option<i64> {
    if !number.is_finite()
        || number.fract() != 0.0
        || !(I64_LOWER_BOUND..I64_UPPER_BOUND_EXCLUSIVE).contains(&number)
    {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, reason = "number is integral and inside i64 range")]
    let integral = number as i64;
    Some(integral)
}

/// Parses a decimal integer literal, signed or unsigned.
fn parse_integer(text: &str) -> Option<Value> {
    text.parse::<i64>()
        .map(Value::from)
        .or_else(|_| text.parse::<u64>().map(Value::from))
        .ok()
}

/// Coerces to a finite float.
fn coerce_float(value: Value) -> ValidationResult {
    let converted = match &value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    converted
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| coercion_failed(value, CoerceKind::Float))
}

/// Coerces scalars to their string rendering.
fn coerce_string(value: Value) -> ValidationResult {
    match value {
        Value::String(_) => Ok(value),
        Value::Number(number) => Ok(Value::String(number.to_string())),
        Value::Bool(flag) => Ok(Value::String(flag.to_string())),
        other => Err(coercion_failed(other, CoerceKind::String)),
    }
}

/// Coerces to a boolean.
fn coerce_boolean(value: Value) -> ValidationResult {
    if value.is_boolean() {
        return Ok(value);
    }
    let converted = match &value {
        Value::Number(number) => number.as_f64().map(|number| number != 0.0),
        Value::String(text) => {
            let lowered = text.trim().to_ascii_lowercase();
            if TRUTHY.contains(&lowered.as_str()) {
                Some(true)
            } else if FALSY.contains(&lowered.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    };
    converted.map(Value::Bool).ok_or_else(|| coercion_failed(value, CoerceKind::Boolean))
}

// ============================================================================
// SECTION: Range and Length
// ============================================================================

/// Checks `min <= value <= max`; either bound may be omitted.
///
/// Non-numeric input fails with a coercion error, so place a
/// [`coerce`] stage first when strings are expected.
#[must_use]
pub fn range(min: Option<f64>, max: Option<f64>) -> Validator {
    let name = format!("range({}, {})", render_bound(min), render_bound(max));
    Validator::new(name, move |value| {
        let Some(number) = value.as_f64() else {
            let message = format!("expected a number, got {}", type_name(&value));
            return Err(ValidationError::type_coercion(message).with_value(value));
        };
        if let Some(min) = min
            && number < min
        {
            let message = format!("value {} must be at least {min}", render_value(&value));
            return Err(ValidationError::constraint(message).with_value(value));
        }
        if let Some(max) = max
            && number > max
        {
            let message = format!("value {} must be at most {max}", render_value(&value));
            return Err(ValidationError::constraint(message).with_value(value));
        }
        Ok(value)
    })
}

/// Renders an optional bound for validator names.
fn render_bound(bound: Option<f64>) -> String {
    bound.map_or_else(|| "-".to_string(), |bound| bound.to_string())
}

/// Checks the length of a string (characters), sequence, or mapping.
#[must_use]
pub fn length(min: Option<usize>, max: Option<usize>) -> Validator {
    let name = format!(
        "length({}, {})",
        min.map_or_else(|| "-".to_string(), |min| min.to_string()),
        max.map_or_else(|| "-".to_string(), |max| max.to_string())
    );
    Validator::new(name, move |value| {
        let measured = match &value {
            Value::String(text) => Some(text.chars().count()),
            Value::Array(items) => Some(items.len()),
            Value::Object(entries) => Some(entries.len()),
            _ => None,
        };
        let Some(size) = measured else {
            let message =
                format!("expected a string, sequence, or mapping, got {}", type_name(&value));
            return Err(ValidationError::type_coercion(message).with_value(value));
        };
        if let Some(min) = min
            && size < min
        {
            let message = format!("length {size} is below minimum {min}");
            return Err(ValidationError::constraint(message).with_value(value));
        }
        if let Some(max) = max
            && size > max
        {
            let message = format!("length {size} exceeds maximum {max}");
            return Err(ValidationError::constraint(message).with_value(value));
        }
        Ok(value)
    })
}

// ============================================================================
// SECTION: Pattern Match
// ============================================================================

/// Full-string regex match; partial matches fail.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidPattern`] when `source` does not compile.
pub fn pattern(source: &str) -> Result<Validator, SchemaError> {
    let regex = Regex::new(&format!("^(?:{source})$")).map_err(|err| {
        SchemaError::InvalidPattern {
            pattern: source.to_string(),
            reason: err.to_string(),
        }
    })?;
    let display = source.to_string();
    Ok(Validator::new(format!("pattern({source})"), move |value| {
        match_pattern(&regex, &display, value)
    }))
}

/// Matches a string value against a compiled, anchored regex.
pub(crate) fn match_pattern(regex: &Regex, source: &str, value: Value) -> ValidationResult {
    let text = expect_str(&value)?;
    if regex.is_match(text) {
        return Ok(value);
    }
    let message = format!("value `{text}` does not match pattern `{source}`");
    Err(ValidationError::constraint(message).with_value(value))
}

/// Built-in anchored pattern compiled on first use.
pub(crate) struct StaticPattern {
    /// Anchored regex source.
    source: &'static str,
    /// Compiled regex; `None` when compilation failed.
    compiled: OnceLock<Option<Regex>>,
}

impl StaticPattern {
    /// Declares a pattern without compiling it.
    pub(crate) const fn new(source: &'static str) -> Self {
        Self {
            source,
            compiled: OnceLock::new(),
        }
    }

    /// Returns the compiled regex.
    pub(crate) fn regex(&self) -> Option<&Regex> {
        self.compiled.get_or_init(|| Regex::new(self.source).ok()).as_ref()
    }

    /// Validates `value` against the pattern, failing closed if it never compiled.
    pub(crate) fn check(&self, value: Value) -> ValidationResult {
        match self.regex() {
            Some(regex) => match_pattern(regex, self.source, value),
            None => Err(ValidationError::constraint(format!(
                "built-in pattern `{}` failed to compile",
                self.source
            ))),
        }
    }
}

// ============================================================================
// SECTION: Set Membership and Uniqueness
// ============================================================================

/// Fails unless the value equals one of `candidates`.
///
/// # Errors
///
/// Returns [`SchemaError::EmptyCandidates`] when no candidates are given.
pub fn one_of<I, V>(candidates: I) -> Result<Validator, SchemaError>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let candidates: Vec<Value> = candidates.into_iter().map(Into::into).collect();
    if candidates.is_empty() {
        return Err(SchemaError::EmptyCandidates);
    }
    Ok(membership(candidates))
}

/// Builds a membership check over a non-empty candidate list.
pub(crate) fn membership(candidates: Vec<Value>) -> Validator {
    let rendered = candidates.iter().map(render_value).collect::<Vec<_>>().join(", ");
    Validator::new(format!("one_of({rendered})"), move |value| {
        if candidates.contains(&value) {
            return Ok(value);
        }
        let message = format!("value {} is not one of: {rendered}", render_value(&value));
        Err(ValidationError::constraint(message).with_value(value))
    })
}

/// Fails when any two elements of a sequence are equal.
///
/// The error path points at the index of the second occurrence.
#[must_use]
pub fn unique() -> Validator {
    Validator::new("unique", |value| {
        let Value::Array(items) = &value else {
            let message = format!("expected a sequence, got {}", type_name(&value));
            return Err(ValidationError::type_coercion(message).with_value(value.clone()));
        };
        for (index, item) in items.iter().enumerate() {
            if items.iter().take(index).any(|earlier| earlier == item) {
                let mut error = ValidationError::constraint(format!(
                    "duplicate entry {}",
                    render_value(item)
                ))
                .with_value(item.clone());
                error.path.push(index);
                return Err(error);
            }
        }
        Ok(value)
    })
}

/// Lets `null` through unchanged and validates anything else with `inner`.
#[must_use]
pub fn maybe(inner: Validator) -> Validator {
    let name = format!("maybe({})", inner.name());
    Validator::new(name, move |value| if value.is_null() { Ok(value) } else { inner.validate(value) })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Renders a value for messages; strings are shown without JSON quotes.
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
