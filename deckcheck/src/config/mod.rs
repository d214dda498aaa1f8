//! Validator options.
//!
//! The options are small and have sensible defaults, so most callers never
//! touch them. They can be built in code, deserialized from YAML, or read from
//! `DECKCHECK_*` environment variables.
//!
//! # Examples
//!
//! ```
//! use deckcheck::config::{UnknownKeyPolicy, ValidatorConfig};
//!
//! let config = ValidatorConfig {
//!     unknown_keys: UnknownKeyPolicy::Error,
//!     ..ValidatorConfig::default()
//! };
//! assert!(!config.require_docstrings);
//! ```

mod environment;

pub use environment::EnvironmentConfig;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What to do with input keys the schema does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeyPolicy {
    /// Record a warning in the report and carry on.
    #[default]
    Warn,
    /// Record an [`IssueKind::UnknownKeyword`](crate::IssueKind::UnknownKeyword) error.
    Error,
    /// Drop the key silently.
    Ignore,
}

impl UnknownKeyPolicy {
    /// The lowercase name used in YAML and environment variables.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for UnknownKeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnknownKeyPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "ignore" => Ok(Self::Ignore),
            _ => Err(Error::Configuration {
                field: "unknown_keys".into(),
                message: format!("Invalid policy: '{s}' (expected warn/error/ignore)"),
            }),
        }
    }
}

/// Options shared by schema parsing and validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Handling of undeclared input keys.
    pub unknown_keys: UnknownKeyPolicy,
    /// Reject schemas whose keywords or sections lack a docstring.
    ///
    /// Off by default, so undocumented templates are accepted. Template
    /// checkers commonly require docstrings unconditionally; set this to get
    /// that behavior.
    pub require_docstrings: bool,
}

impl ValidatorConfig {
    /// Defaults with `DECKCHECK_*` environment overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if a variable holds an invalid value.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        EnvironmentConfig::apply_overrides(&mut config)?;
        Ok(config)
    }

    /// Parses options from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on unknown fields or bad values.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| Error::Configuration {
            field: "validator".into(),
            message: e.to_string(),
        })
    }
}
