//! Addresses of keywords and sections within a schema or input tree.

use std::fmt;

/// The path from the root to a section or keyword.
///
/// Displays in dotted form (`scf.thresholds.energy`); the root displays as
/// `<root>`. [`KeyPath::user_index`] gives the form predicates use.
///
/// # Examples
///
/// ```
/// use deckcheck::validate::KeyPath;
///
/// let path = KeyPath::root().child("scf").child("energy");
/// assert_eq!(path.to_string(), "scf.energy");
/// assert_eq!(path.user_index(), "user['scf']['energy']");
/// assert_eq!(path.name(), Some("energy"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// The empty path, addressing the root section.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Builds a path from its segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Parses a dotted path such as `scf.thresholds.energy`.
    #[must_use]
    pub fn parse_dotted(dotted: &str) -> Self {
        if dotted.is_empty() {
            Self::root()
        } else {
            Self::from_segments(dotted.split('.'))
        }
    }

    /// Returns a new path one level below this one.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    /// The path segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The last segment, or `None` for the root.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Returns `true` for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the path as a predicate would read it: `user['a']['b']`.
    #[must_use]
    pub fn user_index(&self) -> String {
        crate::predicate::render_user_path(&self.0)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0.join("."))
        }
    }
}

impl From<&[String]> for KeyPath {
    fn from(segments: &[String]) -> Self {
        Self(segments.to_vec())
    }
}
