//! A minimal complex number type for `complex` keywords.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

/// A complex number with `f64` components.
///
/// The textual form matches what input decks use: `1.5+2j`, `-3j`, `4`,
/// optionally wrapped in parentheses. `J` is accepted as well as `j`.
///
/// # Examples
///
/// ```
/// use deckcheck::types::Complex;
///
/// let z: Complex = "1.5-2j".parse().unwrap();
/// assert_eq!(z, Complex::new(1.5, -2.0));
/// assert_eq!(z.to_string(), "1.5-2.0j");
///
/// let real: Complex = "4".parse().unwrap();
/// assert_eq!(real, Complex::from_real(4.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl Complex {
    /// Creates a complex number from its parts.
    #[must_use]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Creates a complex number with a zero imaginary part.
    #[must_use]
    pub const fn from_real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }

    /// Returns the modulus `|z|`.
    #[must_use]
    pub fn norm(self) -> f64 {
        self.re.hypot(self.im)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `{:?}` keeps the trailing `.0` so the output parses back to the same value.
        write!(f, "{:?}", self.re)?;
        if self.im.is_sign_negative() {
            write!(f, "-{:?}j", -self.im)
        } else {
            write!(f, "+{:?}j", self.im)
        }
    }
}

impl FromStr for Complex {
    type Err = ParseComplexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseComplexError {
            input: s.to_string(),
        };

        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);

        if body.is_empty() {
            return Err(err());
        }

        let Some(imaginary) = body.strip_suffix(['j', 'J']) else {
            return body.parse().map(Self::from_real).map_err(|_| err());
        };

        // The real/imaginary boundary is the last sign that is not part of an exponent.
        let split = imaginary.char_indices().rev().find(|&(i, c)| {
            i > 0 && (c == '+' || c == '-') && !imaginary[..i].ends_with(['e', 'E'])
        });

        match split {
            Some((i, _)) => {
                let re = imaginary[..i].parse().map_err(|_| err())?;
                let im = parse_imaginary(&imaginary[i..]).ok_or_else(err)?;
                Ok(Self::new(re, im))
            }
            None => {
                let im = parse_imaginary(imaginary).ok_or_else(err)?;
                Ok(Self::new(0.0, im))
            }
        }
    }
}

/// Parses the coefficient in front of `j`; a bare sign means a unit coefficient.
fn parse_imaginary(text: &str) -> Option<f64> {
    match text {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        _ => text.parse().ok(),
    }
}

impl Add for Complex {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Div for Complex {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        let denom = rhs.re * rhs.re + rhs.im * rhs.im;
        Self::new(
            (self.re * rhs.re + self.im * rhs.im) / denom,
            (self.im * rhs.re - self.re * rhs.im) / denom,
        )
    }
}

impl Neg for Complex {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.re, -self.im)
    }
}

/// Error returned when text is not a valid complex literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseComplexError {
    /// The text that failed to parse.
    pub input: String,
}

impl fmt::Display for ParseComplexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid complex literal '{}'", self.input)
    }
}

impl std::error::Error for ParseComplexError {}
