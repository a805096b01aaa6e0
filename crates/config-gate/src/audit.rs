// crates/config-gate/src/audit.rs
// ============================================================================
// Module: Validation Audit Logging
// Description: Structured audit events for validation runs.
// Purpose: Emit redacted validation outcomes without hard logging dependencies.
// Dependencies: crate::{engine, error}, serde, serde_json
// ============================================================================

//! ## Overview
//! Every engine run emits one [`ValidationAuditEvent`] to the configured
//! [`ValidationAuditSink`]. Events carry counts, error kinds, and the first
//! failing path, never input values. Keys of open-ended mappings are input
//! too (session tokens, credential digests), so the path is rendered with
//! those keys masked. The default sink discards events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::engine::ValidationMode;
use crate::error::ErrorKind;
use crate::error::ErrorList;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Overall result of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// Input validated and a normalized value was produced.
    Passed,
    /// Validation failed; no output was produced.
    Failed,
}

/// Validation audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Caller-supplied schema label, when provided.
    pub schema: Option<String>,
    /// Reporting mode used for the run.
    pub mode: ValidationMode,
    /// Run outcome.
    pub outcome: ValidationOutcome,
    /// Number of errors reported.
    pub error_count: usize,
    /// Distinct error kinds in discovery order.
    pub error_kinds: Vec<ErrorKind>,
    /// Path of the first error, with open-ended mapping keys masked.
    pub first_error_path: Option<String>,
}

impl ValidationAuditEvent {
    /// Creates an event for a finished run.
    #[must_use]
    pub fn new(schema: Option<&str>, mode: ValidationMode, errors: Option<&ErrorList>) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        let mut error_kinds = Vec::new();
        for error in errors.into_iter().flatten() {
            if !error_kinds.contains(&error.kind) {
                error_kinds.push(error.kind);
            }
        }
        Self {
            event: "schema_validation",
            timestamp_ms,
            schema: schema.map(str::to_string),
            mode,
            outcome: if errors.is_some() {
                ValidationOutcome::Failed
            } else {
                ValidationOutcome::Passed
            },
            error_count: errors.map_or(0, ErrorList::len),
            error_kinds,
            first_error_path: errors.and_then(ErrorList::first).map(|error| error.path.redacted()),
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for validation events.
pub trait ValidationAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &ValidationAuditEvent);
}

/// Audit sink that discards events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl ValidationAuditSink for NoopAuditSink {
    fn record(&self, _event: &ValidationAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrAuditSink;

impl ValidationAuditSink for StderrAuditSink {
    fn record(&self, event: &ValidationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}
