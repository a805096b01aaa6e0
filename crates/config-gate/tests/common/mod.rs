// crates/config-gate/tests/common/mod.rs
// =============================================================================
// Module: Validation Test Helpers
// Description: Shared helpers for config-gate integration tests.
// Purpose: Reduce duplication when asserting on validation outcomes.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use config_gate::ErrorKind;
use config_gate::ErrorList;
use config_gate::Validator;
use serde_json::Value;

/// Result type shared by integration tests.
pub type TestResult = Result<(), String>;

/// Fails with `message` unless `condition` holds.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition { Ok(()) } else { Err(message.into()) }
}

/// Asserts that `validator` accepts `input` and normalizes it to `expected`.
pub fn assert_accepts(validator: &Validator, input: Value, expected: &Value) -> TestResult {
    let rendered = input.to_string();
    let output = validator
        .validate(input)
        .map_err(|err| format!("{} rejected {rendered}: {err}", validator.name()))?;
    ensure(
        &output == expected,
        format!("{} normalized {rendered} to {output}, expected {expected}", validator.name()),
    )
}

/// Asserts that `validator` rejects `input` with `kind`.
pub fn assert_rejects(validator: &Validator, input: Value, kind: ErrorKind) -> TestResult {
    let rendered = input.to_string();
    match validator.validate(input) {
        Ok(output) => Err(format!("{} accepted {rendered} as {output}", validator.name())),
        Err(error) => ensure(
            error.kind == kind,
            format!("{} rejected {rendered} with {}, expected {kind}", validator.name(), error.kind),
        ),
    }
}

/// Returns `(kind, path)` pairs for compact comparisons.
pub fn summarize(errors: &ErrorList) -> Vec<(ErrorKind, String)> {
    errors.iter().map(|error| (error.kind, error.path.to_string())).collect()
}
