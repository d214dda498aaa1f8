//! Aggregated validation results.

use std::fmt;

use super::path::KeyPath;

/// The kind of a validation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// A keyword without a default is absent from the input.
    MissingRequiredKeyword,
    /// A value does not match its declared type.
    TypeMismatch,
    /// A predicate evaluated to false.
    PredicateViolation,
    /// A predicate could not be evaluated safely.
    UnsupportedExpression,
    /// A predicate reads a keyword declared after its owner, and that keyword
    /// did not resolve.
    PredicateOrderingError,
    /// The input contains a key the schema does not declare.
    UnknownKeyword,
}

impl IssueKind {
    /// The stable name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MissingRequiredKeyword => "MissingRequiredKeyword",
            Self::TypeMismatch => "TypeMismatch",
            Self::PredicateViolation => "PredicateViolation",
            Self::UnsupportedExpression => "UnsupportedExpression",
            Self::PredicateOrderingError => "PredicateOrderingError",
            Self::UnknownKeyword => "UnknownKeyword",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One problem found in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// The keyword or section the problem concerns.
    pub path: KeyPath,
    /// What kind of problem it is.
    pub kind: IssueKind,
    /// A human-readable description.
    pub detail: String,
}

impl ValidationIssue {
    /// Creates an issue.
    pub fn new(path: KeyPath, kind: IssueKind, detail: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- At {} [{}]:\n  {}",
            self.path.user_index(),
            self.kind,
            self.detail
        )
    }
}

/// Every error and warning produced by one validation run, in walk order.
///
/// # Examples
///
/// ```
/// use deckcheck::validate::{IssueKind, KeyPath, ValidationIssue, ValidationReport};
///
/// let mut report = ValidationReport::default();
/// assert!(report.is_ok());
///
/// report.errors.push(ValidationIssue::new(
///     KeyPath::parse_dotted("scf.functional"),
///     IssueKind::MissingRequiredKeyword,
///     "keyword 'functional' is required but has no value",
/// ));
/// assert!(!report.is_ok());
/// assert_eq!(report.errors_of(IssueKind::MissingRequiredKeyword).count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Fatal problems. Validation succeeds only when this is empty.
    pub errors: Vec<ValidationIssue>,
    /// Non-fatal problems, such as unknown keys.
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Returns `true` if there are no errors. Warnings do not count.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterates over the errors of one kind.
    pub fn errors_of(&self, kind: IssueKind) -> impl Iterator<Item = &ValidationIssue> {
        self.errors.iter().filter(move |issue| issue.kind == kind)
    }

    /// Returns the first error recorded for `path`, if any.
    #[must_use]
    pub fn error_at(&self, path: &KeyPath) -> Option<&ValidationIssue> {
        self.errors.iter().find(|issue| &issue.path == path)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error(s) occurred when validating the input:",
            self.errors.len()
        )?;
        for issue in &self.errors {
            write!(f, "\n{issue}")?;
        }
        if !self.warnings.is_empty() {
            write!(f, "\n{} warning(s):", self.warnings.len())?;
            for issue in &self.warnings {
                write!(f, "\n{issue}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(path: &str, kind: IssueKind) -> ValidationIssue {
        ValidationIssue::new(KeyPath::parse_dotted(path), kind, "detail")
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let report = ValidationReport {
            errors: vec![],
            warnings: vec![issue("scf.unknown_field", IssueKind::UnknownKeyword)],
        };
        assert!(report.is_ok());
    }

    #[test]
    fn test_display_lists_errors_then_warnings() {
        let report = ValidationReport {
            errors: vec![
                issue("title", IssueKind::MissingRequiredKeyword),
                issue("scf.another_number", IssueKind::PredicateViolation),
            ],
            warnings: vec![issue("scf.unknown_field", IssueKind::UnknownKeyword)],
        };
        let display = report.to_string();
        assert!(display.starts_with("2 error(s) occurred when validating the input:"));
        assert!(display.contains("- At user['title'] [MissingRequiredKeyword]:"));
        assert!(display.contains("- At user['scf']['another_number'] [PredicateViolation]:"));
        assert!(display.contains("1 warning(s):"));
        let errors_at = display.find("another_number").unwrap();
        let warnings_at = display.find("unknown_field").unwrap();
        assert!(errors_at < warnings_at);
    }

    #[test]
    fn test_error_lookup() {
        let report = ValidationReport {
            errors: vec![
                issue("a", IssueKind::TypeMismatch),
                issue("b", IssueKind::PredicateViolation),
                issue("c", IssueKind::TypeMismatch),
            ],
            warnings: vec![],
        };
        assert_eq!(report.errors_of(IssueKind::TypeMismatch).count(), 2);
        assert_eq!(
            report.error_at(&KeyPath::parse_dotted("b")).map(|i| i.kind),
            Some(IssueKind::PredicateViolation)
        );
        assert!(report.error_at(&KeyPath::parse_dotted("z")).is_none());
    }
}
