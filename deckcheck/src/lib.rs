#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # deckcheck
//!
//! Schema-driven validation and normalization of hierarchical input decks.
//!
//! A schema declares typed keywords, grouped into nested sections, with
//! optional defaults and predicates. Validating an input document against it
//! coerces every value to its declared type, fills in defaults, checks the
//! predicates, and either returns a fully resolved configuration or a report
//! listing every problem found.
//!
//! ## Core Types
//!
//! - [`SchemaTree`]: the parsed schema, immutable and shareable
//! - [`Validator`] and [`ResolvedConfig`]: the validation walk and its result
//! - [`ValidationReport`]: every error and warning of one run
//! - [`Value`] and [`DeclaredType`]: typed keyword values
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: printing reports to stderr
//!
//! ## Examples
//!
//! ```
//! use deckcheck::{SchemaTree, Validator, Value};
//!
//! let schema: serde_yaml::Value = serde_yaml::from_str(r"
//! keywords:
//!   - name: title
//!     type: str
//! sections:
//!   - name: scf
//!     keywords:
//!       - name: another_number
//!         type: int
//!         default: 10
//!         predicates:
//!           - 0 <= value <= 40
//! ").unwrap();
//! let tree = SchemaTree::parse(&schema).unwrap();
//!
//! let input: serde_yaml::Value = serde_yaml::from_str("title: Test").unwrap();
//! let validated = Validator::new(&tree).validate(&input).unwrap();
//! assert_eq!(validated.config.get("scf.another_number"), Some(&Value::Int(10)));
//!
//! let bad: serde_yaml::Value = serde_yaml::from_str("scf: {another_number: 42}").unwrap();
//! let err = Validator::new(&tree).validate(&bad).unwrap_err();
//! assert_eq!(err.report().unwrap().errors.len(), 2);
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod predicate;
pub mod schema;
pub mod types;
pub mod validate;

// Re-export key types at crate root for convenience
pub use config::{UnknownKeyPolicy, ValidatorConfig};
pub use error::{Error, Result, SchemaIssue};
pub use logging::{init_logger, LogLevel, Logger};
pub use predicate::Predicate;
pub use schema::{Keyword, SchemaNode, SchemaTree, Section};
pub use types::{Complex, DeclaredType, ScalarType, Value};
pub use validate::{
    validate, IssueKind, KeyPath, ResolvedConfig, Validated, ValidationIssue, ValidationReport,
    Validator,
};
