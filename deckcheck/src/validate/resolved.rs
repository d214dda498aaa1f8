//! The fully typed output of validation.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::path::KeyPath;
use crate::predicate::Lookup;
use crate::types::Value;

/// A resolved section: keyword values, then subsections, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSection {
    values: Vec<(String, Value)>,
    sections: Vec<(String, ResolvedSection)>,
}

impl ResolvedSection {
    /// Returns the keyword value named `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Returns the subsection named `name`.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&ResolvedSection> {
        self.sections
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, section)| section)
    }

    /// Iterates over keyword values in declaration order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Iterates over subsections in declaration order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &ResolvedSection)> {
        self.sections
            .iter()
            .map(|(key, section)| (key.as_str(), section))
    }

    /// Number of direct entries (values and subsections).
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len() + self.sections.len()
    }

    /// Returns `true` if the section has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the subsection `name`, creating it if absent.
    fn section_mut(&mut self, name: &str) -> &mut ResolvedSection {
        let index = match self.sections.iter().position(|(key, _)| key == name) {
            Some(index) => index,
            None => {
                self.sections
                    .push((name.to_string(), ResolvedSection::default()));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index].1
    }

    fn insert(&mut self, name: &str, value: Value) {
        match self.values.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name.to_string(), value)),
        }
    }

    fn flatten_into<'a>(&'a self, prefix: &KeyPath, out: &mut Vec<(String, &'a Value)>) {
        for (key, value) in &self.values {
            out.push((prefix.child(key).to_string(), value));
        }
        for (key, section) in &self.sections {
            section.flatten_into(&prefix.child(key), out);
        }
    }

    fn to_raw(&self) -> serde_yaml::Value {
        let mut mapping = serde_yaml::Mapping::new();
        for (key, value) in &self.values {
            mapping.insert(serde_yaml::Value::String(key.clone()), value.to_raw());
        }
        for (key, section) in &self.sections {
            mapping.insert(serde_yaml::Value::String(key.clone()), section.to_raw());
        }
        serde_yaml::Value::Mapping(mapping)
    }
}

impl Serialize for ResolvedSection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in &self.values {
            map.serialize_entry(key, value)?;
        }
        for (key, section) in &self.sections {
            map.serialize_entry(key, section)?;
        }
        map.end()
    }
}

/// A validated input: every declared keyword holds a coerced, checked value.
///
/// The tree mirrors the schema. It owns its values and shares nothing with
/// the input document it came from.
///
/// # Examples
///
/// ```
/// use deckcheck::validate::ResolvedConfig;
///
/// let config = ResolvedConfig::default();
/// assert!(config.get("scf.functional").is_none());
/// assert!(config.flatten().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedConfig {
    root: ResolvedSection,
}

impl ResolvedConfig {
    /// Looks up a keyword value by dotted path, e.g. `scf.thresholds.energy`.
    #[must_use]
    pub fn get(&self, dotted: &str) -> Option<&Value> {
        self.value_at(KeyPath::parse_dotted(dotted).segments())
    }

    /// Looks up a keyword value by path segments.
    #[must_use]
    pub fn value_at<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Value> {
        let (last, parents) = segments.split_last()?;
        self.section_at(parents)?.value(last.as_ref())
    }

    /// Looks up a section by path segments; the empty path is the root.
    #[must_use]
    pub fn section_at<S: AsRef<str>>(&self, segments: &[S]) -> Option<&ResolvedSection> {
        segments
            .iter()
            .try_fold(&self.root, |section, name| section.section(name.as_ref()))
    }

    /// The root section.
    #[must_use]
    pub const fn root(&self) -> &ResolvedSection {
        &self.root
    }

    /// Every keyword value with its dotted path, in declaration order.
    #[must_use]
    pub fn flatten(&self) -> Vec<(String, &Value)> {
        let mut out = Vec::new();
        self.root.flatten_into(&KeyPath::root(), &mut out);
        out
    }

    /// Number of keyword values in the whole tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flatten().len()
    }

    /// Returns `true` if no keyword values were resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-expresses the configuration as an input document.
    ///
    /// Validating the result against the same schema reproduces this
    /// configuration exactly.
    #[must_use]
    pub fn to_input_tree(&self) -> serde_yaml::Value {
        self.root.to_raw()
    }

    /// Ensures the section at `path` exists, creating empty sections as needed.
    pub(crate) fn ensure_section(&mut self, path: &KeyPath) -> &mut ResolvedSection {
        path.segments()
            .iter()
            .fold(&mut self.root, |section, name| section.section_mut(name))
    }

    /// Stores a keyword value at `path`.
    pub(crate) fn insert(&mut self, path: &KeyPath, value: Value) {
        if let Some((name, parents)) = path.segments().split_last() {
            parents
                .iter()
                .fold(&mut self.root, |section, parent| section.section_mut(parent))
                .insert(name, value);
        }
    }
}

impl Lookup for ResolvedConfig {
    fn lookup(&self, path: &[String]) -> Option<&Value> {
        self.value_at(path)
    }
}

impl Serialize for ResolvedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}
