//! Error types for the deckcheck library.
//!
//! Two layers of failure exist. Problems with the schema itself, bad options
//! and bad predicate text are [`Error`] values and stop the operation. Problems
//! with a user's input are collected as data in a
//! [`ValidationReport`](crate::validate::ValidationReport) so that one
//! validation run surfaces every defect.

use std::fmt;

use thiserror::Error;

use crate::predicate::ParseError;
use crate::types::TypeMismatch;
use crate::validate::{KeyPath, ValidationReport};

/// Result type alias for operations that may fail with a deckcheck error.
///
/// # Examples
///
/// ```
/// use deckcheck::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(20)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the deckcheck library.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema document is malformed. Every problem found is listed.
    #[error("{}", render_schema_issues(.issues))]
    Schema {
        /// The problems found, in document order.
        issues: Vec<SchemaIssue>,
    },

    /// Input validation failed.
    #[error("{0}")]
    Validation(Box<ValidationReport>),

    /// Predicate text could not be parsed or evaluated.
    #[error("invalid predicate `{expression}`: {message}")]
    Expression {
        /// The predicate text.
        expression: String,
        /// What went wrong.
        message: String,
    },

    /// A raw value did not match its declared type.
    #[error("type mismatch: {0}")]
    TypeMismatch(#[from] TypeMismatch),

    /// A validator option or its environment override was invalid.
    #[error("configuration error for '{field}': {message}")]
    Configuration {
        /// The option or environment variable.
        field: String,
        /// A description of the problem.
        message: String,
    },
}

impl Error {
    /// Returns the schema issues if this is a schema error.
    #[must_use]
    pub fn schema_issues(&self) -> Option<&[SchemaIssue]> {
        match self {
            Self::Schema { issues } => Some(issues),
            _ => None,
        }
    }

    /// Returns the report if this is a validation error.
    #[must_use]
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Validation(report) => Some(report),
            _ => None,
        }
    }
}

impl From<ValidationReport> for Error {
    fn from(report: ValidationReport) -> Self {
        Self::Validation(Box::new(report))
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Expression {
            expression: err.expression,
            message: err.message,
        }
    }
}

/// A single problem found while parsing a schema document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    /// Where in the schema the problem is.
    pub path: KeyPath,
    /// What is wrong.
    pub message: String,
}

impl SchemaIssue {
    /// Creates a schema issue.
    pub fn new(path: KeyPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- At {}:\n  {}", self.path.user_index(), self.message)
    }
}

fn render_schema_issues(issues: &[SchemaIssue]) -> String {
    let mut out = String::from(if issues.len() == 1 {
        "Error occurred when checking the template:"
    } else {
        "Error(s) occurred when checking the template:"
    });
    for issue in issues {
        out.push('\n');
        out.push_str(&issue.to_string());
    }
    out
}
