// crates/config-gate/src/config.rs
// ============================================================================
// Module: Engine Configuration
// Description: Validation mode and limits for the engine.
// Purpose: Parse and bound engine settings, failing closed on bad input.
// Dependencies: crate::engine, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Engine settings are read from an in-memory TOML document (no file access)
//! with a hard size cap and strict unknown-field rejection:
//!
//! ```toml
//! [validation]
//! mode = "collect_all"
//! max_errors = 100
//! max_depth = 64
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::engine::ValidationMode;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted config document size in bytes.
pub(crate) const MAX_CONFIG_SIZE: usize = 64 * 1024;
/// Default cap on collected errors.
pub(crate) const DEFAULT_MAX_ERRORS: usize = 256;
/// Largest allowed cap on collected errors.
pub(crate) const MAX_MAX_ERRORS: usize = 10_000;
/// Default nesting limit.
pub(crate) const DEFAULT_MAX_DEPTH: usize = 64;
/// Largest allowed nesting limit.
pub(crate) const MAX_MAX_DEPTH: usize = 1_024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Validation behavior.
    #[serde(default)]
    pub validation: ValidationSettings,
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document is too large, malformed, or
    /// out of bounds.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        if content.len() > MAX_CONFIG_SIZE {
            return Err(ConfigError::Invalid("config document exceeds size limit".to_string()));
        }
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a setting is out of bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validation.validate()
    }
}

/// Validation mode and limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationSettings {
    /// Fail-fast or collect-all reporting.
    #[serde(default)]
    pub mode: ValidationMode,
    /// Collect-all stops after this many errors.
    #[serde(default = "default_max_errors")]
    pub max_errors: usize,
    /// Maximum schema nesting walked before failing.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            mode: ValidationMode::default(),
            max_errors: DEFAULT_MAX_ERRORS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ValidationSettings {
    /// Default settings with the given mode.
    #[must_use]
    pub fn with_mode(mode: ValidationMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Validates limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a limit is out of bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_limit("validation.max_errors", self.max_errors, 1, MAX_MAX_ERRORS)?;
        validate_limit("validation.max_depth", self.max_depth, 1, MAX_MAX_DEPTH)
    }
}

/// Default cap on collected errors.
const fn default_max_errors() -> usize {
    DEFAULT_MAX_ERRORS
}

/// Default nesting limit.
const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Engine configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates a limit against inclusive bounds.
fn validate_limit(field: &str, value: usize, min: usize, max: usize) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::Invalid(format!("{field} must be between {min} and {max}")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
