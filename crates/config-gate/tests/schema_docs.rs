//! Schema documentation tests for config-gate.
// crates/config-gate/tests/schema_docs.rs
// =============================================================================
// Module: Schema Docs Tests
// Description: Markdown rendering of schema declarations.
// Purpose: Ensure generated reference tables track the declared fields.
// =============================================================================

use config_gate::ExtraPolicy;
use config_gate::builder::mapping;
use config_gate::builder::optional;
use config_gate::builder::required;
use config_gate::schema_docs_markdown;
use config_gate::validators::dns_server_list;
use config_gate::validators::docker_image;
use config_gate::validators::log_level;
use config_gate::validators::network_port;
use config_gate::validators::uuid_hex;
use serde_json::json;

mod common;

use common::TestResult;
use common::ensure;

#[test]
fn markdown_lists_fields_with_defaults() -> TestResult {
    let schema = mapping(
        [
            optional("uuid", uuid_hex()).with_default_fn(|| json!("0".repeat(32))),
            required("port", network_port()).with_default(8123),
            required("image", docker_image()),
            optional("logging", log_level()).with_default("info"),
            optional("servers", dns_server_list()),
            required(
                "nested",
                mapping([optional("level", log_level())], ExtraPolicy::RemoveSilently)
                    .map_err(|err| err.to_string())?,
            ),
        ],
        ExtraPolicy::RemoveSilently,
    )
    .map_err(|err| err.to_string())?;
    let docs = schema_docs_markdown("Core", &schema);
    for expected in [
        "## Core",
        "| Field | Type | Required | Default |",
        "| `uuid` | uuid_hex | no | (computed) |",
        "| `port` | network_port | no | `8123` |",
        "| `image` | docker_image | yes | - |",
        "| `logging` | log_level | no | `\"info\"` |",
        "| `servers` | sequence<dns_url> (max 8) | no | - |",
        "| `nested` | mapping | yes | - |",
        "| `nested.level` | log_level | no | - |",
    ] {
        ensure(docs.contains(expected), format!("missing `{expected}` in:\n{docs}"))?;
    }
    Ok(())
}

#[test]
fn scalar_schema_renders_its_type() -> TestResult {
    let docs = schema_docs_markdown("Port", &network_port().into());
    ensure(docs.contains("Value: `network_port`"), format!("unexpected docs:\n{docs}"))
}
