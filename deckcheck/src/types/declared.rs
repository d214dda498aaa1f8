//! Declared keyword types.

use std::fmt;
use std::str::FromStr;

/// One of the scalar types a keyword may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// A string, taken verbatim.
    Str,
    /// A signed 64-bit integer.
    Int,
    /// A 64-bit float. Integers are widened.
    Float,
    /// A boolean literal.
    Bool,
    /// A complex number, written as `a+bj` or as a bare real.
    Complex,
}

impl ScalarType {
    /// Every scalar type, in the order they are documented.
    pub const ALL: [ScalarType; 5] = [
        ScalarType::Str,
        ScalarType::Int,
        ScalarType::Float,
        ScalarType::Bool,
        ScalarType::Complex,
    ];

    /// The name used for this type in schema documents.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Complex => "complex",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.name() == name)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The type a keyword declares: a scalar or a homogeneous list of scalars.
///
/// # Examples
///
/// ```
/// use deckcheck::types::{DeclaredType, ScalarType};
///
/// let ty: DeclaredType = "List[int]".parse().unwrap();
/// assert_eq!(ty, DeclaredType::List(ScalarType::Int));
/// assert_eq!(ty.to_string(), "List[int]");
///
/// assert!("double".parse::<DeclaredType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    /// A single scalar value.
    Scalar(ScalarType),
    /// A list whose elements all have the given scalar type.
    List(ScalarType),
}

impl DeclaredType {
    /// Returns the scalar type of the value, or of each list element.
    #[must_use]
    pub const fn scalar(self) -> ScalarType {
        match self {
            Self::Scalar(ty) | Self::List(ty) => ty,
        }
    }

    /// Returns `true` for `List[T]` types.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::List(_))
    }
}

impl From<ScalarType> for DeclaredType {
    fn from(ty: ScalarType) -> Self {
        Self::Scalar(ty)
    }
}

impl FromStr for DeclaredType {
    type Err = UnknownTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed
            .strip_prefix("List[")
            .and_then(|rest| rest.strip_suffix(']'))
        {
            Some(inner) => ScalarType::from_name(inner.trim()).map(Self::List),
            None => ScalarType::from_name(trimmed).map(Self::Scalar),
        };

        parsed.ok_or_else(|| UnknownTypeError {
            name: s.to_string(),
        })
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(ty) => write!(f, "{ty}"),
            Self::List(ty) => write!(f, "List[{ty}]"),
        }
    }
}

/// Error returned when a type name is not one of the allowed types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTypeError {
    /// The unrecognized type name.
    pub name: String,
}

impl fmt::Display for UnknownTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not recognize type '{}'", self.name)
    }
}

impl std::error::Error for UnknownTypeError {}
