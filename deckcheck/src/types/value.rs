//! Typed values produced by coercion.

use std::fmt;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use super::complex::Complex;

/// A coerced keyword value.
///
/// Values own their data; a resolved configuration never borrows from the
/// input document it was built from.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string.
    Str(String),
    /// An integer.
    Int(i64),
    /// A float.
    Float(f64),
    /// A boolean.
    Bool(bool),
    /// A complex number.
    Complex(Complex),
    /// A list of values of one scalar type.
    List(Vec<Value>),
}

impl Value {
    /// Short name of the value's kind, as used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Str(_) => "str",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Complex(_) => "complex",
            Self::List(_) => "list",
        }
    }

    /// Returns the string if this is a `Str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int`.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float if this is a `Float`.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `Bool`.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the complex number if this is a `Complex`.
    #[must_use]
    pub const fn as_complex(&self) -> Option<Complex> {
        match self {
            Self::Complex(z) => Some(*z),
            _ => None,
        }
    }

    /// Returns the elements if this is a `List`.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Re-expresses the value as a raw document value.
    ///
    /// Coercing the result against the value's declared type gives back an
    /// equal value. Complex numbers become strings in `a+bj` form.
    #[must_use]
    pub fn to_raw(&self) -> serde_yaml::Value {
        match self {
            Self::Str(s) => serde_yaml::Value::String(s.clone()),
            Self::Int(i) => serde_yaml::Value::Number((*i).into()),
            Self::Float(x) => serde_yaml::Value::Number((*x).into()),
            Self::Bool(b) => serde_yaml::Value::Bool(*b),
            Self::Complex(z) => serde_yaml::Value::String(z.to_string()),
            Self::List(items) => {
                serde_yaml::Value::Sequence(items.iter().map(Self::to_raw).collect())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "'{s}'"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Complex(z) => write!(f, "{z}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Str(s) => serializer.serialize_str(s),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(x) => serializer.serialize_f64(*x),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Complex(z) => serializer.collect_str(z),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Complex> for Value {
    fn from(z: Complex) -> Self {
        Self::Complex(z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::from("B3LYP").to_string(), "'B3LYP'");
        assert_eq!(Value::Int(20).to_string(), "20");
        assert_eq!(Value::Float(0.001).to_string(), "0.001");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Int(2)]).to_string(),
            "[1, 2]"
        );
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Int(3).as_int(), Some(3));
        assert_eq!(Value::Int(3).as_float(), None);
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(
            Value::Complex(Complex::new(1.0, 1.0)).as_complex(),
            Some(Complex::new(1.0, 1.0))
        );
        assert_eq!(Value::List(vec![]).as_list().map(<[Value]>::len), Some(0));
    }

    #[test]
    fn test_to_raw() {
        assert_eq!(Value::Int(7).to_raw(), serde_yaml::Value::from(7));
        assert_eq!(
            Value::Complex(Complex::new(0.0, 0.0)).to_raw(),
            serde_yaml::Value::from("0.0+0.0j")
        );
        assert_eq!(
            Value::List(vec![Value::Bool(true)]).to_raw(),
            serde_yaml::Value::Sequence(vec![serde_yaml::Value::Bool(true)])
        );
    }

    #[test]
    fn test_serialize_json() {
        let list = Value::List(vec![Value::Float(1.5), Value::Float(-2.0)]);
        assert_eq!(serde_json::to_string(&list).unwrap(), "[1.5,-2.0]");
        let z = Value::Complex(Complex::new(1.0, -1.0));
        assert_eq!(serde_json::to_string(&z).unwrap(), "\"1.0-1.0j\"");
    }
}
