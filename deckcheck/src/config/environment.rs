//! Environment variable handling for validator options.
//!
//! `DECKCHECK_UNKNOWN_KEYS` and `DECKCHECK_REQUIRE_DOCSTRINGS` override the
//! corresponding [`ValidatorConfig`] fields.

use crate::config::{UnknownKeyPolicy, ValidatorConfig};
use crate::error::{Error, Result};
use std::env;

/// Handles environment variable overrides for validator options.
///
/// # Examples
///
/// ```no_run
/// use deckcheck::config::{EnvironmentConfig, ValidatorConfig};
///
/// let mut config = ValidatorConfig::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unrecognized value.
    pub fn apply_overrides(config: &mut ValidatorConfig) -> Result<()> {
        if let Ok(val) = env::var("DECKCHECK_UNKNOWN_KEYS") {
            config.unknown_keys = val
                .parse::<UnknownKeyPolicy>()
                .map_err(|_| Error::Configuration {
                    field: "DECKCHECK_UNKNOWN_KEYS".into(),
                    message: format!("Invalid policy: '{val}' (expected warn/error/ignore)"),
                })?;
        }

        if let Ok(val) = env::var("DECKCHECK_REQUIRE_DOCSTRINGS") {
            config.require_docstrings = Self::parse_bool("DECKCHECK_REQUIRE_DOCSTRINGS", &val)?;
        }

        Ok(())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Configuration {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}
