//! The parsed, immutable schema tree.

use crate::predicate::Predicate;
use crate::types::{DeclaredType, Value};
use crate::validate::KeyPath;

/// A typed leaf of the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    /// Name, unique among the keywords of the parent section.
    pub name: String,
    /// Declared type.
    pub ty: DeclaredType,
    /// Default value, already coerced to `ty`. `None` means required.
    pub default: Option<Value>,
    /// Constraints checked against the resolved value, in order.
    pub predicates: Vec<Predicate>,
    /// Free-form documentation.
    pub docstring: String,
}

impl Keyword {
    /// A keyword without a default must be supplied by the input.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// A named group of keywords and nested sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    /// Name, unique among the sections of the parent. Empty for the root.
    pub name: String,
    /// Free-form documentation.
    pub docstring: String,
    /// Keywords in declaration order.
    pub keywords: Vec<Keyword>,
    /// Subsections in declaration order.
    pub sections: Vec<Section>,
}

impl Section {
    /// Returns the keyword named `name`.
    #[must_use]
    pub fn keyword(&self, name: &str) -> Option<&Keyword> {
        self.keywords.iter().find(|k| k.name == name)
    }

    /// Returns the subsection named `name`.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Returns `true` if the section declares a keyword or section `name`.
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.keyword(name).is_some() || self.section(name).is_some()
    }

    /// Returns `true` if every keyword in this subtree has a default, so the
    /// section may be left out of the input entirely.
    #[must_use]
    pub fn is_omittable(&self) -> bool {
        self.keywords.iter().all(|k| !k.is_required())
            && self.sections.iter().all(Section::is_omittable)
    }
}

/// A borrowed view of one node of the schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaNode<'a> {
    /// A keyword.
    Keyword(&'a Keyword),
    /// A section.
    Section(&'a Section),
}

/// The schema: a root section parsed once and shared read-only afterwards.
///
/// `SchemaTree` holds no interior mutability, so one tree can back any number
/// of concurrent validations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaTree {
    pub(crate) root: Section,
}

impl SchemaTree {
    /// Wraps an already-built root section.
    ///
    /// No checks are performed; use [`SchemaTree::parse`] for documents.
    #[must_use]
    pub const fn from_root(root: Section) -> Self {
        Self { root }
    }

    /// The root section.
    #[must_use]
    pub const fn root(&self) -> &Section {
        &self.root
    }

    /// Finds the node at `path`. The empty path is the root section.
    #[must_use]
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<SchemaNode<'_>> {
        let Some((last, parents)) = path.split_last() else {
            return Some(SchemaNode::Section(&self.root));
        };
        let parent = parents
            .iter()
            .try_fold(&self.root, |section, name| section.section(name.as_ref()))?;
        parent
            .keyword(last.as_ref())
            .map(SchemaNode::Keyword)
            .or_else(|| parent.section(last.as_ref()).map(SchemaNode::Section))
    }

    /// Every keyword path in resolution order: a section's keywords first,
    /// then each subsection depth-first.
    #[must_use]
    pub fn resolution_order(&self) -> Vec<KeyPath> {
        fn walk(section: &Section, path: &KeyPath, out: &mut Vec<KeyPath>) {
            out.extend(section.keywords.iter().map(|k| path.child(&k.name)));
            for child in &section.sections {
                walk(child, &path.child(&child.name), out);
            }
        }

        let mut out = Vec::new();
        walk(&self.root, &KeyPath::root(), &mut out);
        out
    }
}
