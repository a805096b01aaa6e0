// crates/config-gate/tests/proptest_validators.rs
// ============================================================================
// Module: Validator Property-Based Tests
// Description: Property tests for ports, hex identifiers, and engine modes.
// Purpose: Detect panics and boundary drift across wide input ranges.
// ============================================================================

//! Property-based tests for validator and engine invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use config_gate::ExtraPolicy;
use config_gate::ValidationMode;
use config_gate::builder::mapping;
use config_gate::builder::required;
use config_gate::validate;
use config_gate::validators::network_port;
use config_gate::validators::sha256_hex;
use config_gate::validators::token;
use config_gate::validators::uuid_hex;
use proptest::prelude::*;
use serde_json::Value;
use serde_json::json;

fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|v| Value::Number(v.into())),
        any::<f64>()
            .prop_filter("finite", |v| v.is_finite())
            .prop_map(|v| serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number)),
        ".*".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0 .. 4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0 .. 4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn network_port_accepts_every_valid_port_string(port in 1_u32 ..= 65_535) {
        let output = network_port().validate(json!(port.to_string())).unwrap();
        prop_assert_eq!(output, json!(port));
    }

    #[test]
    fn network_port_rejects_everything_outside_range(port in prop_oneof![i64::MIN .. 1, 65_536_i64 .. i64::MAX]) {
        prop_assert!(network_port().validate(json!(port)).is_err());
        prop_assert!(network_port().validate(json!(port.to_string())).is_err());
    }

    #[test]
    fn hex_identifiers_accept_lowercase_at_exact_length(digest in "[0-9a-f]{64}") {
        prop_assert!(sha256_hex().validate(json!(digest.clone())).is_ok());
        prop_assert!(token().validate(json!(digest.clone())).is_ok());
        prop_assert!(uuid_hex().validate(json!(digest[.. 32].to_string())).is_ok());
        prop_assert!(uuid_hex().validate(json!(digest)).is_err());
    }

    #[test]
    fn hex_identifiers_reject_uppercase(digest in "[0-9a-f]{63}[A-F]") {
        prop_assert!(sha256_hex().validate(json!(digest.clone())).is_err());
        prop_assert!(token().validate(json!(digest)).is_err());
    }

    #[test]
    fn fail_fast_error_is_first_of_collect_all(input in json_value_strategy()) {
        let schema = mapping(
            [required("a", network_port()), required("b", network_port())],
            ExtraPolicy::Reject,
        )
        .unwrap();
        let fast = validate(&schema, &input, ValidationMode::FailFast);
        let all = validate(&schema, &input, ValidationMode::CollectAll);
        match (fast, all) {
            (Ok(left), Ok(right)) => prop_assert_eq!(left, right),
            (Err(fast), Err(all)) => {
                prop_assert_eq!(fast.len(), 1);
                prop_assert!(!all.is_empty());
                prop_assert_eq!(fast.first(), all.first());
            }
            (fast, all) => prop_assert!(false, "modes disagree: {:?} vs {:?}", fast, all),
        }
    }
}
