//! Validation of input documents against a [`SchemaTree`](crate::SchemaTree).
//!
//! [`Validator::validate`] walks the whole tree and either returns a
//! [`ResolvedConfig`] holding every keyword's value, or a
//! [`ValidationReport`] listing every problem found. Unknown input keys are
//! warnings unless [`ValidatorConfig`](crate::config::ValidatorConfig) says
//! otherwise.

mod engine;
mod path;
mod report;
mod resolved;

pub use engine::{validate, Validated, Validator};
pub use path::KeyPath;
pub use report::{IssueKind, ValidationIssue, ValidationReport};
pub use resolved::{ResolvedConfig, ResolvedSection};
