// crates/config-gate-schemas/src/schemas.rs
// ============================================================================
// Module: Stock Config Schemas
// Description: Home assistant core, updater, supervisor, auth, and ingress schemas.
// Purpose: Declare each persisted config document with its defaults.
// Dependencies: config-gate, serde_json
// ============================================================================

//! ## Overview
//! Each function builds a fresh [`Schema`]. Building is fallible only when a
//! declaration is malformed (for example a duplicated key), which surfaces as
//! a [`SchemaError`] instead of a panic.
//!
//! Conventions shared by all documents:
//! - Unknown keys are removed silently.
//! - Defaults pass through the field schema, so `image = {}` comes back as a
//!   normalized (possibly empty) image table.
//! - The core `uuid` default is computed per validation call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use config_gate::ExtraPolicy;
use config_gate::Schema;
use config_gate::SchemaError;
use config_gate::builder::dynamic_mapping;
use config_gate::builder::mapping;
use config_gate::builder::optional;
use config_gate::builder::required;
use config_gate::validators::CoerceKind;
use config_gate::validators::coerce;
use config_gate::validators::docker_image;
use config_gate::validators::homeassistant_wait_boot;
use config_gate::validators::log_level;
use config_gate::validators::maybe;
use config_gate::validators::network_port;
use config_gate::validators::repositories;
use config_gate::validators::sha256_hex;
use config_gate::validators::timezone;
use config_gate::validators::token;
use config_gate::validators::update_channel;
use config_gate::validators::uuid_hex;
use config_gate::validators::wait_boot;
use serde_json::Value;
use serde_json::json;

use crate::ids::random_hex_id;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default home assistant core API port.
pub const DEFAULT_HOMEASSISTANT_PORT: u16 = 8123;
/// Default seconds to wait for home assistant core to boot.
pub const DEFAULT_HOMEASSISTANT_WAIT_BOOT: u64 = 600;
/// Default seconds the supervisor waits during boot.
pub const DEFAULT_SUPERVISOR_WAIT_BOOT: u64 = 5;
/// Default supervisor time zone.
pub const DEFAULT_TIMEZONE: &str = "UTC";
/// Default supervisor log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Default update channel.
pub const DEFAULT_CHANNEL: &str = "stable";
/// Community add-on repository enabled on fresh installs.
pub const DEFAULT_ADDON_REPOSITORY: &str = "https://github.com/hassio-addons/repository";

/// Components with a tracked version and image in the updater config.
const UPDATER_IMAGE_COMPONENTS: [&str; 6] =
    ["homeassistant", "supervisor", "cli", "dns", "audio", "multicast"];

// ============================================================================
// SECTION: Home Assistant Core
// ============================================================================

/// Home assistant core instance settings.
///
/// # Errors
///
/// Returns [`SchemaError`] when the declaration is malformed.
pub fn homeassistant_config() -> Result<Schema, SchemaError> {
    let nullable_string = || maybe(coerce(CoerceKind::String));
    mapping(
        [
            optional("uuid", uuid_hex()).with_default_fn(|| Value::String(random_hex_id())),
            optional("version", nullable_string()),
            optional("image", docker_image()),
            optional("access_token", token()),
            optional("boot", coerce(CoerceKind::Boolean)).with_default(true),
            optional("port", network_port()).with_default(DEFAULT_HOMEASSISTANT_PORT),
            optional("refresh_token", nullable_string()),
            optional("ssl", coerce(CoerceKind::Boolean)).with_default(false),
            optional("watchdog", coerce(CoerceKind::Boolean)).with_default(true),
            optional("wait_boot", homeassistant_wait_boot())
                .with_default(DEFAULT_HOMEASSISTANT_WAIT_BOOT),
            optional("audio_output", nullable_string()).with_default(Value::Null),
            optional("audio_input", nullable_string()).with_default(Value::Null),
        ],
        ExtraPolicy::RemoveSilently,
    )
}

// ============================================================================
// SECTION: Updater
// ============================================================================

/// Update channel, latest known component versions, and image overrides.
///
/// # Errors
///
/// Returns [`SchemaError`] when the declaration is malformed.
pub fn updater_config() -> Result<Schema, SchemaError> {
    let images = mapping(
        UPDATER_IMAGE_COMPONENTS.iter().map(|component| optional(*component, docker_image())),
        ExtraPolicy::RemoveSilently,
    )?;
    let mut fields = vec![optional("channel", update_channel()).with_default(DEFAULT_CHANNEL)];
    fields.extend(
        ["homeassistant", "supervisor", "hassos", "cli", "dns", "audio", "multicast"]
            .into_iter()
            .map(|component| optional(component, coerce(CoerceKind::String))),
    );
    fields.push(optional("image", images).with_default(json!({})));
    mapping(fields, ExtraPolicy::RemoveSilently)
}

// ============================================================================
// SECTION: Supervisor
// ============================================================================

/// Supervisor runtime settings.
///
/// # Errors
///
/// Returns [`SchemaError`] when the declaration is malformed.
pub fn supervisor_config() -> Result<Schema, SchemaError> {
    mapping(
        [
            optional("timezone", timezone()).with_default(DEFAULT_TIMEZONE),
            optional("last_boot", coerce(CoerceKind::String)),
            optional("addons_custom_list", repositories())
                .with_default(json!([DEFAULT_ADDON_REPOSITORY])),
            optional("wait_boot", wait_boot()).with_default(DEFAULT_SUPERVISOR_WAIT_BOOT),
            optional("logging", log_level()).with_default(DEFAULT_LOG_LEVEL),
            optional("debug", coerce(CoerceKind::Boolean)).with_default(false),
            optional("debug_block", coerce(CoerceKind::Boolean)).with_default(false),
        ],
        ExtraPolicy::RemoveSilently,
    )
}

// ============================================================================
// SECTION: Auth
// ============================================================================

/// Cached credential digests: SHA-256 keys to SHA-256 values.
#[must_use]
pub fn auth_config() -> Schema {
    dynamic_mapping(sha256_hex(), sha256_hex())
}

// ============================================================================
// SECTION: Ingress
// ============================================================================

/// Ingress sessions (token to expiry timestamp) and add-on ingress ports.
///
/// # Errors
///
/// Returns [`SchemaError`] when the declaration is malformed.
pub fn ingress_config() -> Result<Schema, SchemaError> {
    mapping(
        [
            required("session", dynamic_mapping(token(), coerce(CoerceKind::Float)))
                .with_default(json!({})),
            required("ports", dynamic_mapping(coerce(CoerceKind::String), network_port()))
                .with_default(json!({})),
        ],
        ExtraPolicy::RemoveSilently,
    )
}
