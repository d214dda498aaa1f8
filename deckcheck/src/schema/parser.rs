//! Parsing of schema documents into a [`SchemaTree`].
//!
//! A schema document is a mapping with optional `keywords`, `sections` and
//! `docstring` fields. Every problem is collected before returning, so a
//! single call lists every defect in the template.

use std::collections::HashSet;

use serde_yaml::{Mapping, Value as RawValue};

use super::tree::{Keyword, SchemaNode, SchemaTree, Section};
use crate::config::ValidatorConfig;
use crate::error::{Error, Result, SchemaIssue};
use crate::predicate::{render_user_path, Predicate};
use crate::types::{coerce, DeclaredType};
use crate::types::coerce::{describe, infer};
use crate::validate::KeyPath;

const ROOT_FIELDS: &[&str] = &["docstring", "keywords", "sections"];
const SECTION_FIELDS: &[&str] = &["name", "docstring", "keywords", "sections"];
// `keywords` and `sections` are reported separately for keywords.
const KEYWORD_FIELDS: &[&str] = &[
    "name",
    "type",
    "default",
    "docstring",
    "predicates",
    "keywords",
    "sections",
];

impl SchemaTree {
    /// Parses a schema document with default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] listing every problem found.
    ///
    /// # Examples
    ///
    /// ```
    /// use deckcheck::SchemaTree;
    ///
    /// let doc: serde_yaml::Value = serde_yaml::from_str(r#"
    /// keywords:
    ///   - name: title
    ///     type: str
    ///     docstring: Title of the calculation.
    /// "#).unwrap();
    ///
    /// let tree = SchemaTree::parse(&doc).unwrap();
    /// assert!(tree.root().keyword("title").unwrap().is_required());
    /// ```
    pub fn parse(document: &RawValue) -> Result<Self> {
        Self::parse_with(document, &ValidatorConfig::default())
    }

    /// Parses a schema document, honoring `config.require_docstrings`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] listing every problem found.
    pub fn parse_with(document: &RawValue, config: &ValidatorConfig) -> Result<Self> {
        let mut parser = SchemaParser {
            config,
            issues: Vec::new(),
        };
        let tree = Self::from_root(parser.root(document));
        parser.check_references(&tree, tree.root(), &KeyPath::root());

        if parser.issues.is_empty() {
            log::debug!(
                "parsed schema with {} keyword(s)",
                tree.resolution_order().len()
            );
            Ok(tree)
        } else {
            log::debug!("schema rejected with {} issue(s)", parser.issues.len());
            Err(Error::Schema {
                issues: parser.issues,
            })
        }
    }
}

struct SchemaParser<'c> {
    config: &'c ValidatorConfig,
    issues: Vec<SchemaIssue>,
}

impl SchemaParser<'_> {
    fn issue(&mut self, path: &KeyPath, message: impl Into<String>) {
        self.issues.push(SchemaIssue::new(path.clone(), message));
    }

    fn root(&mut self, document: &RawValue) -> Section {
        let root = KeyPath::root();
        let Some(mapping) = document.as_mapping() else {
            self.issue(
                &root,
                format!("The template must be a mapping, found {}.", describe(document)),
            );
            return Section::default();
        };

        self.unknown_fields(mapping, &root, ROOT_FIELDS);
        let docstring = self.docstring(mapping, &root, None);
        let (keywords, sections) = self.children(mapping, &root);
        Section {
            name: String::new(),
            docstring,
            keywords,
            sections,
        }
    }

    fn section(&mut self, mapping: &Mapping, path: &KeyPath, name: String) -> Section {
        self.unknown_fields(mapping, path, SECTION_FIELDS);
        let docstring = self.docstring(mapping, path, Some("Sections"));
        let (keywords, sections) = self.children(mapping, path);
        Section {
            name,
            docstring,
            keywords,
            sections,
        }
    }

    fn children(&mut self, mapping: &Mapping, path: &KeyPath) -> (Vec<Keyword>, Vec<Section>) {
        let mut keywords = Vec::new();
        for node in self.list(mapping, "keywords", path) {
            if let Some(keyword) = self.keyword(node, path) {
                keywords.push(keyword);
            }
        }

        let mut sections = Vec::new();
        for node in self.list(mapping, "sections", path) {
            let Some(child) = node.as_mapping() else {
                self.issue(path, format!("Sections must be mappings, found {}.", describe(node)));
                continue;
            };
            if let Some(name) = self.name(child, path) {
                let child_path = path.child(&name);
                sections.push(self.section(child, &child_path, name));
            }
        }

        self.check_duplicates(path, &keywords, &sections);
        (keywords, sections)
    }

    fn keyword(&mut self, node: &RawValue, parent: &KeyPath) -> Option<Keyword> {
        let Some(mapping) = node.as_mapping() else {
            self.issue(parent, format!("Keywords must be mappings, found {}.", describe(node)));
            return None;
        };
        let name = self.name(mapping, parent)?;
        let path = parent.child(&name);

        if mapping.contains_key("keywords") || mapping.contains_key("sections") {
            self.issue(&path, "Sections cannot be nested under keywords.");
        }
        self.unknown_fields(mapping, &path, KEYWORD_FIELDS);

        let raw_default = mapping.get("default");
        let ty = match mapping.get("type") {
            Some(RawValue::String(text)) => text.parse::<DeclaredType>().ok(),
            Some(_) => None,
            None => raw_default.and_then(infer),
        };
        if ty.is_none() {
            self.issue(&path, "Keywords must have a valid type.");
        }
        let docstring = self.docstring(mapping, &path, Some("Keywords"));
        let predicates = self.predicates(mapping, &path);

        let ty = ty?;
        let default = match raw_default {
            None => None,
            Some(RawValue::Null) => {
                self.issue(
                    &path,
                    "Default values must not be null; omit the field to make the keyword required.",
                );
                return None;
            }
            Some(raw) => match coerce(raw, ty) {
                Ok(value) => Some(value),
                Err(err) => {
                    self.issue(&path, format!("Invalid default value: {err}."));
                    return None;
                }
            },
        };

        Some(Keyword {
            name,
            ty,
            default,
            predicates,
            docstring,
        })
    }

    fn name(&mut self, mapping: &Mapping, parent: &KeyPath) -> Option<String> {
        let name = match mapping.get("name") {
            Some(RawValue::String(name)) => name.trim(),
            Some(other) => {
                self.issue(parent, format!("Names must be strings, found {}.", describe(other)));
                return None;
            }
            None => {
                self.issue(parent, "Keywords and sections must have a name.");
                return None;
            }
        };

        if name.is_empty() {
            self.issue(parent, "Names must not be empty.");
            None
        } else if name.contains('.') {
            self.issue(parent, format!("Name '{name}' must not contain '.'."));
            None
        } else {
            Some(name.to_string())
        }
    }

    fn docstring(&mut self, mapping: &Mapping, path: &KeyPath, what: Option<&str>) -> String {
        match mapping.get("docstring") {
            Some(RawValue::String(text)) if !text.trim().is_empty() => text.trim().to_string(),
            Some(RawValue::String(_)) | None => {
                if let Some(what) = what.filter(|_| self.config.require_docstrings) {
                    self.issue(path, format!("{what} must have a non-empty docstring."));
                }
                String::new()
            }
            Some(other) => {
                self.issue(path, format!("Docstrings must be strings, found {}.", describe(other)));
                String::new()
            }
        }
    }

    fn predicates(&mut self, mapping: &Mapping, path: &KeyPath) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        for item in self.list(mapping, "predicates", path) {
            match item {
                RawValue::String(text) => match Predicate::parse(text) {
                    Ok(predicate) => predicates.push(predicate),
                    Err(err) => self.issue(path, err.to_string()),
                },
                other => {
                    self.issue(path, format!("Predicates must be strings, found {}.", describe(other)));
                }
            }
        }
        predicates
    }

    fn list<'a>(&mut self, mapping: &'a Mapping, field: &str, path: &KeyPath) -> &'a [RawValue] {
        match mapping.get(field) {
            None | Some(RawValue::Null) => &[],
            Some(RawValue::Sequence(items)) => items,
            Some(other) => {
                self.issue(path, format!("Field '{field}' must be a list, found {}.", describe(other)));
                &[]
            }
        }
    }

    fn unknown_fields(&mut self, mapping: &Mapping, path: &KeyPath, allowed: &[&str]) {
        for key in mapping.keys() {
            match key.as_str() {
                Some(field) if allowed.contains(&field) => {}
                Some(field) => self.issue(path, format!("Unknown field '{field}'.")),
                None => {
                    self.issue(path, format!("Field names must be strings, found {}.", describe(key)));
                }
            }
        }
    }

    fn check_duplicates(&mut self, path: &KeyPath, keywords: &[Keyword], sections: &[Section]) {
        let mut keyword_names = HashSet::new();
        for keyword in keywords {
            if !keyword_names.insert(keyword.name.as_str()) {
                self.issue(&path.child(&keyword.name), "Duplicate keyword name.");
            }
        }

        let mut section_names = HashSet::new();
        for section in sections {
            let child = path.child(&section.name);
            if !section_names.insert(section.name.as_str()) {
                self.issue(&child, "Duplicate section name.");
            }
            if keyword_names.contains(section.name.as_str()) {
                self.issue(&child, "Section name clashes with a keyword of the same section.");
            }
        }
    }

    /// Every `user[...]` reference must name a declared keyword.
    fn check_references(&mut self, tree: &SchemaTree, section: &Section, path: &KeyPath) {
        for keyword in &section.keywords {
            let keyword_path = path.child(&keyword.name);
            for predicate in &keyword.predicates {
                for target in predicate.user_paths() {
                    let problem = match tree.find(target) {
                        Some(SchemaNode::Keyword(_)) => continue,
                        Some(SchemaNode::Section(_)) => "is a section, not a keyword",
                        None => "is not declared in the template",
                    };
                    self.issue(
                        &keyword_path,
                        format!(
                            "Predicate `{predicate}` reads {}, which {problem}.",
                            render_user_path(target)
                        ),
                    );
                }
            }
        }
        for child in &section.sections {
            self.check_references(tree, child, &path.child(&child.name));
        }
    }
}
