//! Coercion of raw document values to declared types.
//!
//! The rules are deliberately narrow: only widening from `int` to `float`
//! (and to `complex`) is performed. Strings are never reinterpreted as numbers
//! or booleans, with the one exception of the textual complex form.

use std::fmt;

use serde_yaml::Value as RawValue;

use super::complex::Complex;
use super::declared::{DeclaredType, ScalarType};
use super::value::Value;

/// A raw value did not match the declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    /// The type the keyword declares.
    pub expected: DeclaredType,
    /// A rendering of the offending raw value.
    pub actual: String,
    /// For list types, the index of the first offending element.
    pub element: Option<usize>,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.element {
            Some(index) => write!(
                f,
                "element {index} of the list ({}) does not match declared type '{}'",
                self.actual, self.expected
            ),
            None => write!(
                f,
                "actual value {} does not match declared type '{}'",
                self.actual, self.expected
            ),
        }
    }
}

impl std::error::Error for TypeMismatch {}

/// Coerces a raw value to the declared type.
///
/// # Errors
///
/// Returns [`TypeMismatch`] if the raw value is not acceptable for the type.
///
/// # Examples
///
/// ```
/// use deckcheck::types::{coerce, Complex, DeclaredType, ScalarType, Value};
///
/// let complex = DeclaredType::Scalar(ScalarType::Complex);
/// let raw = serde_yaml::Value::from("1+2j");
/// assert_eq!(coerce(&raw, complex).unwrap(), Value::Complex(Complex::new(1.0, 2.0)));
///
/// // No string-to-bool coercion.
/// let boolean = DeclaredType::Scalar(ScalarType::Bool);
/// assert!(coerce(&serde_yaml::Value::from("true"), boolean).is_err());
/// ```
pub fn coerce(raw: &RawValue, declared: DeclaredType) -> Result<Value, TypeMismatch> {
    match declared {
        DeclaredType::Scalar(ty) => coerce_scalar(raw, ty).ok_or_else(|| TypeMismatch {
            expected: declared,
            actual: describe(raw),
            element: None,
        }),
        DeclaredType::List(ty) => {
            let RawValue::Sequence(items) = raw else {
                return Err(TypeMismatch {
                    expected: declared,
                    actual: describe(raw),
                    element: None,
                });
            };

            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    coerce_scalar(item, ty).ok_or_else(|| TypeMismatch {
                        expected: declared,
                        actual: describe(item),
                        element: Some(index),
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List)
        }
    }
}

fn coerce_scalar(raw: &RawValue, ty: ScalarType) -> Option<Value> {
    match (ty, raw) {
        (ScalarType::Str, RawValue::String(s)) => Some(Value::Str(s.clone())),
        // `as_i64` is `None` for float literals, so `3.0` is not an int.
        (ScalarType::Int, RawValue::Number(n)) => n.as_i64().map(Value::Int),
        (ScalarType::Float, RawValue::Number(n)) => n.as_f64().map(Value::Float),
        (ScalarType::Bool, RawValue::Bool(b)) => Some(Value::Bool(*b)),
        (ScalarType::Complex, RawValue::Number(n)) => {
            n.as_f64().map(|re| Value::Complex(Complex::from_real(re)))
        }
        (ScalarType::Complex, RawValue::String(s)) => s.parse().ok().map(Value::Complex),
        _ => None,
    }
}

/// Renders a raw value with its kind for error messages, e.g. `'abc' (str)`.
#[must_use]
pub fn describe(raw: &RawValue) -> String {
    match raw {
        RawValue::Null => "null".to_string(),
        RawValue::Bool(b) => format!("{b} (bool)"),
        RawValue::Number(n) if n.is_f64() => format!("{n} (float)"),
        RawValue::Number(n) => format!("{n} (int)"),
        RawValue::String(s) => format!("'{s}' (str)"),
        RawValue::Sequence(items) => format!("a list of {} element(s)", items.len()),
        RawValue::Mapping(_) => "a mapping".to_string(),
        RawValue::Tagged(tagged) => format!("a value tagged {}", tagged.tag),
    }
}

/// Infers a declared type from a default literal, when the schema omits `type`.
///
/// Strings infer `str`; the textual complex form is not inferred.
#[must_use]
pub fn infer(raw: &RawValue) -> Option<DeclaredType> {
    fn scalar(raw: &RawValue) -> Option<ScalarType> {
        match raw {
            RawValue::Bool(_) => Some(ScalarType::Bool),
            RawValue::Number(n) if n.is_f64() => Some(ScalarType::Float),
            RawValue::Number(_) => Some(ScalarType::Int),
            RawValue::String(_) => Some(ScalarType::Str),
            _ => None,
        }
    }

    match raw {
        RawValue::Sequence(items) => items.first().and_then(scalar).map(DeclaredType::List),
        other => scalar(other).map(DeclaredType::Scalar),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> RawValue {
        serde_yaml::from_str(text).unwrap()
    }

    fn scalar(ty: ScalarType) -> DeclaredType {
        DeclaredType::Scalar(ty)
    }

    #[test]
    fn test_str_is_not_converted() {
        assert_eq!(
            coerce(&yaml("hello"), scalar(ScalarType::Str)).unwrap(),
            Value::from("hello")
        );
        assert!(coerce(&yaml("42"), scalar(ScalarType::Str)).is_err());
        assert!(coerce(&yaml("true"), scalar(ScalarType::Str)).is_err());
    }

    #[test]
    fn test_int_accepts_integer_literals_only() {
        assert_eq!(
            coerce(&yaml("-7"), scalar(ScalarType::Int)).unwrap(),
            Value::Int(-7)
        );
        let err = coerce(&yaml("3.0"), scalar(ScalarType::Int)).unwrap_err();
        assert_eq!(err.expected, scalar(ScalarType::Int));
        assert_eq!(err.actual, "3.0 (float)");
        assert!(coerce(&yaml("'3'"), scalar(ScalarType::Int)).is_err());
        assert!(coerce(&yaml("18446744073709551615"), scalar(ScalarType::Int)).is_err());
    }

    #[test]
    fn test_float_widens_integers() {
        assert_eq!(
            coerce(&yaml("3"), scalar(ScalarType::Float)).unwrap(),
            Value::Float(3.0)
        );
        assert_eq!(
            coerce(&yaml("0.0001"), scalar(ScalarType::Float)).unwrap(),
            Value::Float(0.0001)
        );
        assert!(coerce(&yaml("'0.1'"), scalar(ScalarType::Float)).is_err());
    }

    #[test]
    fn test_bool_requires_boolean_literal() {
        assert_eq!(
            coerce(&yaml("false"), scalar(ScalarType::Bool)).unwrap(),
            Value::Bool(false)
        );
        assert!(coerce(&yaml("'true'"), scalar(ScalarType::Bool)).is_err());
        assert!(coerce(&yaml("1"), scalar(ScalarType::Bool)).is_err());
    }

    #[test]
    fn test_complex_forms() {
        let ty = scalar(ScalarType::Complex);
        assert_eq!(
            coerce(&yaml("0.0+0.0j"), ty).unwrap(),
            Value::Complex(Complex::new(0.0, 0.0))
        );
        assert_eq!(
            coerce(&yaml("2"), ty).unwrap(),
            Value::Complex(Complex::from_real(2.0))
        );
        assert_eq!(
            coerce(&yaml("-1.5"), ty).unwrap(),
            Value::Complex(Complex::from_real(-1.5))
        );
        assert!(coerce(&yaml("1+2i"), ty).is_err());
        assert!(coerce(&yaml("true"), ty).is_err());
    }

    #[test]
    fn test_list_types() {
        let ty = DeclaredType::List(ScalarType::Float);
        assert_eq!(
            coerce(&yaml("[1, 2.5]"), ty).unwrap(),
            Value::List(vec![Value::Float(1.0), Value::Float(2.5)])
        );
        assert_eq!(coerce(&yaml("[]"), ty).unwrap(), Value::List(vec![]));

        let err = coerce(&yaml("[1.0, 'x', 3]"), ty).unwrap_err();
        assert_eq!(err.element, Some(1));
        assert!(err.to_string().contains("element 1"));

        assert!(coerce(&yaml("1.0"), ty).is_err());
    }

    #[test]
    fn test_mapping_never_coerces() {
        for ty in ScalarType::ALL {
            assert!(coerce(&yaml("{a: 1}"), scalar(ty)).is_err());
        }
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(&yaml("~")), "null");
        assert_eq!(describe(&yaml("abc")), "'abc' (str)");
        assert_eq!(describe(&yaml("12")), "12 (int)");
        assert_eq!(describe(&yaml("[1, 2]")), "a list of 2 element(s)");
    }

    #[test]
    fn test_infer() {
        assert_eq!(infer(&yaml("false")), Some(scalar(ScalarType::Bool)));
        assert_eq!(infer(&yaml("20")), Some(scalar(ScalarType::Int)));
        assert_eq!(infer(&yaml("0.001")), Some(scalar(ScalarType::Float)));
        assert_eq!(infer(&yaml("B3LYP")), Some(scalar(ScalarType::Str)));
        assert_eq!(
            infer(&yaml("[1, 2]")),
            Some(DeclaredType::List(ScalarType::Int))
        );
        assert_eq!(infer(&yaml("[]")), None);
        assert_eq!(infer(&yaml("~")), None);
    }
}
