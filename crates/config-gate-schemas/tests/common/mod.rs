// crates/config-gate-schemas/tests/common/mod.rs
// =============================================================================
// Module: Schema Test Helpers
// Description: Shared helpers for stock schema tests.
// Purpose: Validate documents and compare failure paths with little ceremony.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use config_gate::ErrorList;
use config_gate::Schema;
use config_gate::SchemaError;
use config_gate::ValidationMode;
use config_gate::validate;
use serde_json::Value;

/// Result type shared by integration tests.
pub type TestResult = Result<(), String>;

/// Fails with `message` unless `condition` holds.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition { Ok(()) } else { Err(message.into()) }
}

/// Builds `schema` and validates `input`, expecting success.
pub fn normalize(schema: Result<Schema, SchemaError>, input: &Value) -> Result<Value, String> {
    let schema = schema.map_err(|err| err.to_string())?;
    validate(&schema, input, ValidationMode::CollectAll).map_err(|errors| errors.to_string())
}

/// Builds `schema` and validates `input`, expecting failure.
pub fn reject(schema: Result<Schema, SchemaError>, input: &Value) -> Result<ErrorList, String> {
    let schema = schema.map_err(|err| err.to_string())?;
    match validate(&schema, input, ValidationMode::CollectAll) {
        Ok(output) => Err(format!("accepted {input} as {output}")),
        Err(errors) => Ok(errors),
    }
}
