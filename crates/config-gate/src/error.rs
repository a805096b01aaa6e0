// crates/config-gate/src/error.rs
// ============================================================================
// Module: Validation Error Definitions
// Description: Path-qualified validation failures and schema construction errors.
// Purpose: Report exactly which field failed and why, in discovery order.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Validators and the engine report failures as values, never as panics. Each
//! [`ValidationError`] carries an [`ErrorKind`], a [`FieldPath`] pointing at the
//! offending field, a human-readable message, and (when available) the raw
//! value that was rejected. An [`ErrorList`] preserves discovery order so a
//! caller can render every problem in one pass.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Error Kinds
// ============================================================================

/// Classification of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The value cannot be converted to the type a downstream validator requires.
    TypeCoercion,
    /// The value has the right shape but fails a range/length/pattern/membership check.
    ConstraintViolation,
    /// A required field is absent and has no default.
    MissingRequired,
    /// An undeclared key is present and the mapping rejects extra keys.
    UnexpectedKey,
    /// The value is not the shape the schema node expects.
    StructuralMismatch,
}

impl ErrorKind {
    /// Returns the stable snake-case label for this kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TypeCoercion => "type_coercion",
            Self::ConstraintViolation => "constraint_violation",
            Self::MissingRequired => "missing_required",
            Self::UnexpectedKey => "unexpected_key",
            Self::StructuralMismatch => "structural_mismatch",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Field Paths
// ============================================================================

/// One step in a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Declared mapping key.
    Key(String),
    /// Key of an open-ended mapping, taken verbatim from the input.
    Entry(String),
    /// Sequence index.
    Index(usize),
}

impl PathSegment {
    /// Creates a key segment.
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// Creates an open-ended mapping entry segment.
    pub fn entry(key: impl Into<String>) -> Self {
        Self::Entry(key.into())
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Ordered location of a value inside the validated structure.
///
/// Renders keys dotted and indices bracketed (`image.dns`, `addons[2]`). The
/// empty path is the root and renders as `<root>`. [`FieldPath::redacted`]
/// masks entry keys, which may be secrets such as session tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath {
    /// Segments from the root to the value.
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Returns the root path.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Returns the path segments from the root.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns true when this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Appends a segment.
    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.segments.push(segment.into());
    }

    /// Removes the last segment.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Renders the path with every [`PathSegment::Entry`] masked as `*`.
    #[must_use]
    pub fn redacted(&self) -> String {
        RenderedPath {
            path: self,
            redact: true,
        }
        .to_string()
    }

    /// Returns a new path with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }
}

impl FromIterator<PathSegment> for FieldPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        RenderedPath {
            path: self,
            redact: false,
        }
        .fmt(f)
    }
}

/// Display adapter for a [`FieldPath`], optionally masking entry keys.
struct RenderedPath<'a> {
    /// Path to render.
    path: &'a FieldPath,
    /// Replace entry keys with `*`.
    redact: bool,
}

impl fmt::Display for RenderedPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (position, segment) in self.path.segments.iter().enumerate() {
            let key = match segment {
                PathSegment::Index(index) => {
                    write!(f, "[{index}]")?;
                    continue;
                }
                PathSegment::Entry(_) if self.redact => "*",
                PathSegment::Key(key) | PathSegment::Entry(key) => key.as_str(),
            };
            if position > 0 {
                f.write_str(".")?;
            }
            f.write_str(key)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Validation Error
// ============================================================================

/// A single path-qualified validation failure.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{path}: {message}")]
pub struct ValidationError {
    /// Failure classification.
    pub kind: ErrorKind,
    /// Location of the offending value.
    pub path: FieldPath,
    /// Human-readable cause.
    pub message: String,
    /// Offending raw value, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ValidationError {
    /// Creates an error at the root path.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: FieldPath::root(),
            message: message.into(),
            value: None,
        }
    }

    /// Creates a [`ErrorKind::TypeCoercion`] error.
    pub fn type_coercion(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeCoercion, message)
    }

    /// Creates a [`ErrorKind::ConstraintViolation`] error.
    pub fn constraint(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConstraintViolation, message)
    }

    /// Creates a [`ErrorKind::StructuralMismatch`] error.
    pub fn structural(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StructuralMismatch, message)
    }

    /// Creates a [`ErrorKind::MissingRequired`] error.
    #[must_use]
    pub fn missing_required() -> Self {
        Self::new(ErrorKind::MissingRequired, "required key not provided")
    }

    /// Creates a [`ErrorKind::UnexpectedKey`] error for `key`.
    #[must_use]
    pub fn unexpected_key(key: &str) -> Self {
        Self::new(ErrorKind::UnexpectedKey, format!("extra key `{key}` not allowed"))
    }

    /// Attaches the offending raw value.
    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Prefixes this error's path with `parent`.
    #[must_use]
    pub fn within(mut self, parent: &FieldPath) -> Self {
        if !parent.is_root() {
            let mut segments = parent.segments.clone();
            segments.append(&mut self.path.segments);
            self.path.segments = segments;
        }
        self
    }
}

/// Result alias for single validators.
pub type ValidationResult<T = Value> = Result<T, ValidationError>;

// ============================================================================
// SECTION: Error List
// ============================================================================

/// Every failure from one validation run, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorList {
    /// Collected errors.
    errors: Vec<ValidationError>,
}

impl ErrorList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            errors: Vec::new(),
        }
    }

    /// Appends an error.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Returns the number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true when no errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the first error discovered.
    #[must_use]
    pub fn first(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    /// Iterates errors in discovery order.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Returns the rendered path of every error, in discovery order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.errors.iter().map(|error| error.path.to_string()).collect()
    }

    /// Returns the errors as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[ValidationError] {
        &self.errors
    }
}

impl From<ValidationError> for ErrorList {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl IntoIterator for ErrorList {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, error) in self.errors.iter().enumerate() {
            if position > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorList {}

// ============================================================================
// SECTION: Schema Construction Errors
// ============================================================================

/// Errors raised while declaring a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two fields of one mapping share a key.
    #[error("duplicate field `{0}` in mapping schema")]
    DuplicateField(String),
    /// A pattern failed to compile.
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// Pattern source as declared.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },
    /// A set-membership validator was declared without candidates.
    #[error("one_of requires at least one candidate")]
    EmptyCandidates,
}
