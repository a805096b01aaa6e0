// crates/config-gate/src/validators/composite.rs
// ============================================================================
// Module: Composite Validators
// Description: Named semantic validators built from primitives.
// Purpose: Validate ports, hex tokens, image names, DNS URLs, repositories, and timezones.
// Dependencies: crate::{builder, error, schema, validator, validators::primitive}, chrono-tz, url
// ============================================================================

//! ## Overview
//! Each composite is a named pipeline of primitives plus, where a regex alone
//! cannot decide validity, explicit structural logic. Repository references
//! are checked in two stages: the `<url>[#<branch>]` shape first, then the URL
//! itself. Sequence-shaped composites (`dns_server_list`, `repositories`) are
//! returned as [`Schema`] nodes so element errors carry their index.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::builder::dynamic_mapping;
use crate::builder::sequence;
use crate::builder::sequence_with_checks;
use crate::error::ValidationError;
use crate::error::ValidationResult;
use crate::schema::Schema;
use crate::validator::Validator;
use crate::validator::expect_str;
use crate::validators::primitive::CoerceKind;
use crate::validators::primitive::StaticPattern;
use crate::validators::primitive::coerce;
use crate::validators::primitive::maybe;
use crate::validators::primitive::membership;
use crate::validators::primitive::range;
use crate::validators::primitive::unique;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Lowest valid network port.
const MIN_NETWORK_PORT: f64 = 1.0;
/// Highest valid network port.
const MAX_NETWORK_PORT: f64 = 65_535.0;
/// Bounds for the supervisor boot wait in seconds.
const WAIT_BOOT_BOUNDS: (f64, f64) = (1.0, 60.0);
/// Floor for the home assistant core boot wait in seconds.
const HOMEASSISTANT_WAIT_BOOT_MIN: f64 = 60.0;
/// Maximum number of configured DNS servers.
pub const MAX_DNS_SERVERS: usize = 8;
/// Scheme prefix required by [`dns_url`].
const DNS_SCHEME: &str = "dns://";
/// Accepted log levels.
pub const LOG_LEVELS: [&str; 5] = ["debug", "info", "warning", "error", "critical"];
/// Accepted update channels.
pub const UPDATE_CHANNELS: [&str; 3] = ["stable", "beta", "dev"];

/// Hex token of 32 to 256 lowercase characters.
static TOKEN: StaticPattern = StaticPattern::new(r"^[0-9a-f]{32,256}$");
/// Exactly 32 lowercase hex characters.
static UUID_HEX: StaticPattern = StaticPattern::new(r"^[0-9a-f]{32}$");
/// Exactly 64 lowercase hex characters.
static SHA256_HEX: StaticPattern = StaticPattern::new(r"^[0-9a-f]{64}$");
/// `namespace/name`, each segment word characters, hyphens, or `{placeholder}` braces.
static DOCKER_IMAGE: StaticPattern =
    StaticPattern::new(r"^[A-Za-z0-9_\-{}]+/[A-Za-z0-9_\-{}]+$");
/// Container port with optional protocol suffix.
static DOCKER_PORT_KEY: StaticPattern = StaticPattern::new(r"^\d+(?:/tcp|/udp)?$");
/// `<url>[#<branch>]`.
static REPOSITORY: StaticPattern =
    StaticPattern::new(r"^(?P<url>[^#]+)(?:#(?P<branch>[\w\-]+))?$");

// ============================================================================
// SECTION: Numeric Composites
// ============================================================================

/// Integer port in `1..=65535`; numeric strings are coerced.
#[must_use]
pub fn network_port() -> Validator {
    Validator::all(
        "network_port",
        [coerce(CoerceKind::Integer), range(Some(MIN_NETWORK_PORT), Some(MAX_NETWORK_PORT))],
    )
}

/// Supervisor boot wait: integer seconds in `1..=60`.
#[must_use]
pub fn wait_boot() -> Validator {
    let (min, max) = WAIT_BOOT_BOUNDS;
    Validator::all("wait_boot", [coerce(CoerceKind::Integer), range(Some(min), Some(max))])
}

/// Home assistant core boot wait: integer seconds, at least 60, no ceiling.
///
/// Kept separate from [`wait_boot`]; the two configs bound the same field
/// name differently.
#[must_use]
pub fn homeassistant_wait_boot() -> Validator {
    Validator::all(
        "homeassistant_wait_boot",
        [coerce(CoerceKind::Integer), range(Some(HOMEASSISTANT_WAIT_BOOT_MIN), None)],
    )
}

// ============================================================================
// SECTION: Pattern Composites
// ============================================================================

/// Lowercase hex token, 32 to 256 characters.
#[must_use]
pub fn token() -> Validator {
    Validator::new("token", |value| TOKEN.check(value))
}

/// Lowercase hex UUID without dashes (32 characters).
#[must_use]
pub fn uuid_hex() -> Validator {
    Validator::new("uuid_hex", |value| UUID_HEX.check(value))
}

/// Lowercase hex SHA-256 digest (64 characters).
#[must_use]
pub fn sha256_hex() -> Validator {
    Validator::new("sha256_hex", |value| SHA256_HEX.check(value))
}

/// Docker-style `namespace/name` image reference; `{arch}`-style placeholders allowed.
#[must_use]
pub fn docker_image() -> Validator {
    Validator::new("docker_image", |value| DOCKER_IMAGE.check(value))
}

/// Port-map key: coerced to a string, then `^\d+(/tcp|/udp)?$`.
#[must_use]
pub fn docker_port_key() -> Validator {
    Validator::all(
        "docker_port_key",
        [coerce(CoerceKind::String), Validator::new("port_key", |value| DOCKER_PORT_KEY.check(value))],
    )
}

// ============================================================================
// SECTION: Membership Composites
// ============================================================================

/// One of `debug`, `info`, `warning`, `error`, `critical`.
#[must_use]
pub fn log_level() -> Validator {
    membership(LOG_LEVELS.iter().map(|level| Value::from(*level)).collect()).named("log_level")
}

/// One of `stable`, `beta`, `dev`.
#[must_use]
pub fn update_channel() -> Validator {
    membership(UPDATE_CHANNELS.iter().map(|channel| Value::from(*channel)).collect())
        .named("update_channel")
}

// ============================================================================
// SECTION: DNS
// ============================================================================

/// `dns://` followed by a literal IPv4 or IPv6 address; hostnames are rejected.
///
/// The scheme check is case-insensitive. The input is returned unchanged.
#[must_use]
pub fn dns_url() -> Validator {
    Validator::new("dns_url", |value| {
        let text = expect_str(&value)?;
        let Some(address) = strip_dns_scheme(text) else {
            let message = format!("DNS URL `{text}` does not start with {DNS_SCHEME}");
            return Err(ValidationError::constraint(message).with_value(value));
        };
        if address.parse::<IpAddr>().is_err() {
            let message = format!("invalid DNS URL: {text}");
            return Err(ValidationError::constraint(message).with_value(value));
        }
        Ok(value)
    })
}

/// Returns the text after a case-insensitive `dns://` prefix.
fn strip_dns_scheme(text: &str) -> Option<&str> {
    let prefix = text.get(..DNS_SCHEME.len())?;
    if prefix.eq_ignore_ascii_case(DNS_SCHEME) { text.get(DNS_SCHEME.len()..) } else { None }
}

/// Up to [`MAX_DNS_SERVERS`] [`dns_url`] entries.
#[must_use]
pub fn dns_server_list() -> Schema {
    sequence(dns_url(), Some(MAX_DNS_SERVERS))
}

// ============================================================================
// SECTION: Repositories
// ============================================================================

/// Parsed `<url>[#<branch>]` repository reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    /// Repository URL (scheme and host present).
    pub url: String,
    /// Branch suffix, when given.
    pub branch: Option<String>,
}

impl RepositoryRef {
    /// Parses and validates a repository reference.
    ///
    /// The shape is checked first; the URL portion is then validated on its own.
    ///
    /// # Errors
    ///
    /// Returns a constraint violation when the shape or the URL is invalid.
    pub fn parse(text: &str) -> ValidationResult<Self> {
        let Some(regex) = REPOSITORY.regex() else {
            return Err(ValidationError::constraint("built-in repository pattern failed to compile"));
        };
        let Some(captures) = regex.captures(text) else {
            return Err(ValidationError::constraint(format!(
                "no valid repository format: {text}"
            )));
        };
        let url = captures.name("url").map_or("", |found| found.as_str());
        validate_url(url)?;
        Ok(Self {
            url: url.to_string(),
            branch: captures.name("branch").map(|found| found.as_str().to_string()),
        })
    }
}

impl FromStr for RepositoryRef {
    type Err = ValidationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.branch {
            Some(branch) => write!(f, "{}#{branch}", self.url),
            None => f.write_str(&self.url),
        }
    }
}

/// Requires an absolute URL with a scheme and a host.
fn validate_url(text: &str) -> ValidationResult<()> {
    match Url::parse(text) {
        Ok(parsed) if parsed.has_host() => Ok(()),
        Ok(_) => Err(ValidationError::constraint(format!("url `{text}` has no host"))),
        Err(err) => Err(ValidationError::constraint(format!("invalid url `{text}`: {err}"))),
    }
}

/// Repository reference string; returned unchanged when valid.
#[must_use]
pub fn repository() -> Validator {
    Validator::new("repository", |value| {
        let parsed = RepositoryRef::parse(expect_str(&value)?);
        match parsed {
            Ok(_) => Ok(value),
            Err(error) => Err(error.with_value(value)),
        }
    })
}

/// List of unique [`repository`] entries, input order preserved.
#[must_use]
pub fn repositories() -> Schema {
    sequence_with_checks(repository(), None, vec![unique()])
}

// ============================================================================
// SECTION: Port Maps
// ============================================================================

/// Port map: [`docker_port_key`] keys to nullable [`network_port`] values.
#[must_use]
pub fn docker_ports() -> Schema {
    dynamic_mapping(docker_port_key(), maybe(network_port()))
}

/// Port description map: [`docker_port_key`] keys to string values.
#[must_use]
pub fn docker_ports_description() -> Schema {
    dynamic_mapping(docker_port_key(), coerce(CoerceKind::String))
}

// ============================================================================
// SECTION: Timezones
// ============================================================================

/// Source of truth for time zone names.
pub trait TimezoneCatalog: Send + Sync {
    /// Returns true when `name` is a recognized zone.
    fn is_known(&self, name: &str) -> bool;
}

/// IANA zone database compiled into `chrono-tz`, matched without regard to case.
#[derive(Debug, Clone, Copy, Default)]
pub struct IanaTimezones;

impl TimezoneCatalog for IanaTimezones {
    fn is_known(&self, name: &str) -> bool {
        chrono_tz::Tz::from_str_insensitive(name).is_ok()
    }
}

/// IANA time zone name, returned unchanged (case included) when recognized.
#[must_use]
pub fn timezone() -> Validator {
    timezone_with(Arc::new(IanaTimezones))
}

/// Time zone name checked against a caller-supplied catalog.
#[must_use]
pub fn timezone_with(catalog: Arc<dyn TimezoneCatalog>) -> Validator {
    Validator::new("timezone", move |value| {
        let text = expect_str(&value)?;
        if catalog.is_known(text) {
            return Ok(value);
        }
        let message = format!("invalid time zone: {text}");
        Err(ValidationError::constraint(message).with_value(value))
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
