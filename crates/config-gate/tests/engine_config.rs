//! Engine configuration, audit, and concurrency tests for config-gate.
// crates/config-gate/tests/engine_config.rs
// =============================================================================
// Module: Engine Configuration Tests
// Description: TOML settings, audit events, and shared-engine use across threads.
// Purpose: Ensure limits fail closed and every run emits one redacted event.
// =============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use config_gate::ConfigError;
use config_gate::EngineConfig;
use config_gate::ErrorKind;
use config_gate::ExtraPolicy;
use config_gate::Schema;
use config_gate::ValidationAuditEvent;
use config_gate::ValidationAuditSink;
use config_gate::ValidationEngine;
use config_gate::ValidationMode;
use config_gate::ValidationOutcome;
use config_gate::builder::dynamic_mapping;
use config_gate::builder::mapping;
use config_gate::builder::optional;
use config_gate::builder::required;
use config_gate::validators::CoerceKind;
use config_gate::validators::coerce;
use config_gate::validators::network_port;
use config_gate::validators::token;
use serde_json::json;

mod common;

use common::TestResult;
use common::ensure;

/// Audit sink that keeps every event in memory.
#[derive(Default)]
struct RecordingSink {
    /// Recorded events in order.
    events: Mutex<Vec<ValidationAuditEvent>>,
}

impl RecordingSink {
    fn events(&self) -> Vec<ValidationAuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl ValidationAuditSink for RecordingSink {
    fn record(&self, event: &ValidationAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

fn auth_schema() -> Result<Schema, String> {
    mapping(
        [required("port", network_port()), optional("access_token", token())],
        ExtraPolicy::Reject,
    )
    .map_err(|err| err.to_string())
}

// ============================================================================
// SECTION: TOML Settings
// ============================================================================

#[test]
fn empty_document_yields_defaults() -> TestResult {
    let config = EngineConfig::from_toml_str("").map_err(|err| err.to_string())?;
    ensure(config == EngineConfig::default(), "defaults differ")?;
    ensure(config.validation.mode == ValidationMode::FailFast, "default mode must be fail-fast")?;
    ensure(config.validation.max_errors == 256, "default max_errors")?;
    ensure(config.validation.max_depth == 64, "default max_depth")
}

#[test]
fn validation_section_is_parsed() -> TestResult {
    let config = EngineConfig::from_toml_str(
        r#"
[validation]
mode = "collect_all"
max_errors = 10
max_depth = 8
"#,
    )
    .map_err(|err| err.to_string())?;
    ensure(config.validation.mode == ValidationMode::CollectAll, "mode not parsed")?;
    ensure(config.validation.max_errors == 10, "max_errors not parsed")?;
    ensure(config.validation.max_depth == 8, "max_depth not parsed")?;
    let engine = ValidationEngine::from_config(&config);
    ensure(engine.settings() == &config.validation, "engine must adopt settings")
}

#[test]
fn unknown_fields_and_modes_are_parse_errors() -> TestResult {
    for document in ["[validation]\nstrict = true\n", "[validation]\nmode = \"lenient\"\n", "[server]\n"] {
        match EngineConfig::from_toml_str(document) {
            Err(ConfigError::Parse(_)) => {}
            Err(other) => return Err(format!("unexpected error for {document}: {other}")),
            Ok(_) => return Err(format!("accepted {document}")),
        }
    }
    Ok(())
}

#[test]
fn out_of_bounds_limits_are_invalid() -> TestResult {
    for (document, needle) in [
        ("[validation]\nmax_errors = 0\n", "validation.max_errors"),
        ("[validation]\nmax_errors = 10001\n", "validation.max_errors"),
        ("[validation]\nmax_depth = 0\n", "validation.max_depth"),
        ("[validation]\nmax_depth = 1025\n", "validation.max_depth"),
    ] {
        match EngineConfig::from_toml_str(document) {
            Err(ConfigError::Invalid(message)) => {
                ensure(message.contains(needle), format!("'{message}' lacks '{needle}'"))?;
            }
            Err(other) => return Err(format!("unexpected error: {other}")),
            Ok(_) => return Err(format!("accepted {document}")),
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Audit Events
// ============================================================================

#[test]
fn passing_run_records_one_event() -> TestResult {
    let sink = Arc::new(RecordingSink::default());
    let engine = ValidationEngine::default().with_audit_sink(sink.clone());
    let schema = auth_schema()?;
    engine.validate_labeled("auth", &schema, &json!({"port": 80})).map_err(|e| e.to_string())?;
    let events = sink.events();
    ensure(events.len() == 1, "expected one event")?;
    let event = &events[0];
    ensure(event.event == "schema_validation", "event name")?;
    ensure(event.schema.as_deref() == Some("auth"), "label missing")?;
    ensure(event.outcome == ValidationOutcome::Passed, "outcome")?;
    ensure(event.error_count == 0 && event.first_error_path.is_none(), "no errors expected")
}

#[test]
fn failing_run_records_kinds_and_first_path_without_values() -> TestResult {
    let sink = Arc::new(RecordingSink::default());
    let engine = ValidationEngine::new(config_gate::ValidationSettings::with_mode(
        ValidationMode::CollectAll,
    ))
    .with_audit_sink(sink.clone());
    let schema = auth_schema()?;
    let secret = "SECRET-not-hex";
    let input = json!({"port": 0, "access_token": secret, "extra": 1});
    let errors = engine.validate(&schema, &input).err().ok_or_else(|| "accepted".to_string())?;
    ensure(errors.len() == 3, format!("unexpected errors: {errors}"))?;

    let events = sink.events();
    ensure(events.len() == 1, "expected one event")?;
    let event = &events[0];
    ensure(event.outcome == ValidationOutcome::Failed, "outcome")?;
    ensure(event.schema.is_none(), "unlabeled run must not carry a label")?;
    ensure(event.error_count == 3, "error count")?;
    ensure(
        event.error_kinds == vec![ErrorKind::ConstraintViolation, ErrorKind::UnexpectedKey],
        "distinct kinds in discovery order",
    )?;
    ensure(event.first_error_path.as_deref() == Some("port"), "first path")?;
    let serialized = serde_json::to_string(event).map_err(|err| err.to_string())?;
    ensure(!serialized.contains(secret), "audit payload leaked an input value")?;
    ensure(serialized.contains("\"mode\":\"collect_all\""), format!("mode missing: {serialized}"))
}

#[test]
fn open_mapping_keys_are_masked_in_audit_paths() -> TestResult {
    let sink = Arc::new(RecordingSink::default());
    let engine = ValidationEngine::default().with_audit_sink(sink.clone());
    let schema = mapping(
        [required("session", dynamic_mapping(token(), coerce(CoerceKind::Float)))],
        ExtraPolicy::RemoveSilently,
    )
    .map_err(|err| err.to_string())?;
    let session = "deadbeef".repeat(8);
    let input = json!({"session": { session.clone(): "soon" }});
    let errors = engine.validate(&schema, &input).err().ok_or_else(|| "accepted".to_string())?;
    ensure(
        errors.paths() == vec![format!("session.{session}")],
        format!("returned errors must keep the real key: {errors}"),
    )?;

    let events = sink.events();
    ensure(events.len() == 1, "expected one event")?;
    let event = &events[0];
    ensure(event.first_error_path.as_deref() == Some("session.*"), "entry key must be masked")?;
    let serialized = serde_json::to_string(event).map_err(|err| err.to_string())?;
    ensure(!serialized.contains(&session), "session token leaked into audit event")
}

// ============================================================================
// SECTION: Concurrency
// ============================================================================

#[test]
fn one_engine_serves_many_threads() -> TestResult {
    let sink = Arc::new(RecordingSink::default());
    let engine = ValidationEngine::default().with_audit_sink(sink.clone());
    let schema = auth_schema()?;
    let outcomes: Vec<bool> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0 .. 8_u16)
            .map(|index| {
                let engine = &engine;
                let schema = &schema;
                scope.spawn(move || {
                    let port = if index % 2 == 0 { json!(8000 + index) } else { json!("zero") };
                    engine.validate(schema, &json!({"port": port})).is_ok()
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap_or(false)).collect()
    });
    ensure(
        outcomes == [true, false, true, false, true, false, true, false],
        "each thread must see its own result",
    )?;
    ensure(sink.events().len() == 8, "every run must be audited")
}
