//! Restricted predicate language for keyword constraints.
//!
//! A predicate is a boolean expression attached to a keyword. Two names are
//! bound while it runs:
//!
//! - `value`: the keyword's own coerced value
//! - `user`: the resolved input so far, indexed by literal string keys,
//!   e.g. `user['scf']['max_num_iterations']`
//!
//! Predicates are parsed into a typed syntax tree by a closed grammar (see
//! [`parser`]) and evaluated over it. Nothing outside that grammar runs.
//!
//! # Examples
//!
//! ```
//! use deckcheck::predicate::{Predicate, Lookup};
//! use deckcheck::types::Value;
//!
//! struct Empty;
//! impl Lookup for Empty {
//!     fn lookup(&self, _path: &[String]) -> Option<&Value> {
//!         None
//!     }
//! }
//!
//! let predicate = Predicate::parse("0 <= value <= 40").unwrap();
//! assert!(predicate.evaluate(&Value::Int(20), &Empty).unwrap());
//! assert!(!predicate.evaluate(&Value::Int(42), &Empty).unwrap());
//! ```

pub mod ast;
pub mod eval;
pub mod parser;

use std::fmt;

pub use ast::Expr;
pub use eval::{render_user_path, EvalError, Lookup};
pub use parser::{parse, ParseError};

use crate::error::{Error, Result};
use crate::types::Value;

/// A parsed predicate together with its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    source: String,
    expr: Expr,
}

impl Predicate {
    /// Parses predicate text.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the text is outside the predicate grammar.
    pub fn parse(source: &str) -> std::result::Result<Self, ParseError> {
        Ok(Self {
            source: source.trim().to_string(),
            expr: parse(source)?,
        })
    }

    /// The predicate text as written in the schema.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed expression.
    #[must_use]
    pub const fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Every `user[...]` path this predicate reads.
    #[must_use]
    pub fn user_paths(&self) -> Vec<&[String]> {
        self.expr.user_paths()
    }

    /// Evaluates the predicate for a keyword value.
    ///
    /// # Errors
    ///
    /// See [`eval::evaluate`].
    pub fn evaluate<L: Lookup + ?Sized>(
        &self,
        value: &Value,
        user: &L,
    ) -> std::result::Result<bool, EvalError> {
        eval::evaluate(&self.expr, value, user)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parses and evaluates predicate text in one step.
///
/// # Errors
///
/// Returns [`Error::Expression`] if the text cannot be parsed or evaluated.
pub fn evaluate<L: Lookup + ?Sized>(expression: &str, value: &Value, user: &L) -> Result<bool> {
    let predicate = Predicate::parse(expression)?;
    predicate
        .evaluate(value, user)
        .map_err(|err| Error::Expression {
            expression: predicate.source,
            message: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Empty;

    impl Lookup for Empty {
        fn lookup(&self, _path: &[String]) -> Option<&Value> {
            None
        }
    }

    #[test]
    fn test_predicate_keeps_source() {
        let predicate = Predicate::parse("  value > 0 ").unwrap();
        assert_eq!(predicate.source(), "value > 0");
        assert_eq!(predicate.to_string(), "value > 0");
        assert!(predicate.user_paths().is_empty());
    }

    #[test]
    fn test_evaluate_text() {
        assert!(evaluate("value % 2 == 0", &Value::Int(4), &Empty).unwrap());
        assert!(!evaluate("value % 2 == 0", &Value::Int(3), &Empty).unwrap());
    }

    #[test]
    fn test_evaluate_text_errors() {
        let err = evaluate("value >>> 1", &Value::Int(4), &Empty).unwrap_err();
        assert!(matches!(err, Error::Expression { .. }));

        let err = evaluate("len(value) > 1", &Value::Int(4), &Empty).unwrap_err();
        let Error::Expression { expression, message } = err else {
            panic!("expected expression error");
        };
        assert_eq!(expression, "len(value) > 1");
        assert!(message.contains("len()"));
    }
}
