//! Declared keyword types, resolved values, and coercion between them.
//!
//! Input documents arrive as untyped [`serde_yaml::Value`] trees. Every
//! keyword in a schema carries a [`DeclaredType`]; [`coerce`] checks a raw
//! value against that type and produces a typed [`Value`].
//!
//! # Examples
//!
//! ```
//! use deckcheck::types::{coerce, DeclaredType, Value};
//!
//! let declared: DeclaredType = "float".parse().unwrap();
//! let raw = serde_yaml::Value::from(3);
//!
//! // Integers are widened when a float is declared.
//! assert_eq!(coerce(&raw, declared).unwrap(), Value::Float(3.0));
//! ```

pub mod coerce;
mod complex;
mod declared;
mod value;

#[cfg(test)]
mod proptests;

pub use coerce::{coerce, TypeMismatch};
pub use complex::{Complex, ParseComplexError};
pub use declared::{DeclaredType, ScalarType, UnknownTypeError};
pub use value::Value;
