//! The validation walk.
//!
//! Keywords are resolved in declaration order within a section, and a
//! section's keywords before any of its subsections. Each resolved value is
//! stored immediately, so predicates see every keyword resolved before their
//! own plus their own value.
//!
//! A predicate that reads a keyword declared later is held back until that
//! keyword has been visited. Whether a predicate waits depends only on the
//! paths it names, never on the input.

use std::collections::HashMap;

use serde_yaml::{Mapping, Value as RawValue};

use super::path::KeyPath;
use super::report::{IssueKind, ValidationIssue, ValidationReport};
use super::resolved::ResolvedConfig;
use crate::config::{UnknownKeyPolicy, ValidatorConfig};
use crate::error::{Error, Result};
use crate::predicate::{render_user_path, EvalError, Predicate};
use crate::schema::{Keyword, SchemaTree, Section};
use crate::types::coerce;
use crate::types::coerce::describe;
use crate::types::Value;

/// A successful validation: the resolved configuration plus any warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    /// Every declared keyword with its coerced, checked value.
    pub config: ResolvedConfig,
    /// Non-fatal problems, such as unknown keys.
    pub warnings: Vec<ValidationIssue>,
}

impl Validated {
    /// Drops the warnings and returns the configuration.
    #[must_use]
    pub fn into_config(self) -> ResolvedConfig {
        self.config
    }
}

/// Validates input documents against one schema.
///
/// A `Validator` borrows its schema and holds no mutable state, so it can be
/// shared across threads and reused for any number of inputs.
///
/// # Examples
///
/// ```
/// use deckcheck::{SchemaTree, Validator};
///
/// let schema: serde_yaml::Value = serde_yaml::from_str(r"
/// keywords:
///   - name: title
///     type: str
///   - name: max_num_iterations
///     type: int
///     default: 20
///     predicates:
///       - value > 0
/// ").unwrap();
/// let tree = SchemaTree::parse(&schema).unwrap();
///
/// let input: serde_yaml::Value = serde_yaml::from_str("title: Test").unwrap();
/// let validated = Validator::new(&tree).validate(&input).unwrap();
/// assert_eq!(validated.config.get("max_num_iterations").unwrap().as_int(), Some(20));
/// ```
#[derive(Debug, Clone)]
pub struct Validator<'s> {
    schema: &'s SchemaTree,
    config: ValidatorConfig,
    order: HashMap<KeyPath, usize>,
}

impl<'s> Validator<'s> {
    /// Creates a validator with default options.
    #[must_use]
    pub fn new(schema: &'s SchemaTree) -> Self {
        Self::with_config(schema, ValidatorConfig::default())
    }

    /// Creates a validator with the given options.
    #[must_use]
    pub fn with_config(schema: &'s SchemaTree, config: ValidatorConfig) -> Self {
        let order = schema
            .resolution_order()
            .into_iter()
            .enumerate()
            .map(|(position, path)| (path, position))
            .collect();
        Self {
            schema,
            config,
            order,
        }
    }

    /// The schema this validator checks against.
    #[must_use]
    pub const fn schema(&self) -> &'s SchemaTree {
        self.schema
    }

    /// The options in effect.
    #[must_use]
    pub const fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validates `input`, returning the resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] carrying the full report if any error
    /// was found. The walk never stops early.
    pub fn validate(&self, input: &RawValue) -> Result<Validated> {
        let (config, report) = self.check(input);
        if report.is_ok() {
            Ok(Validated {
                config,
                warnings: report.warnings,
            })
        } else {
            Err(Error::from(report))
        }
    }

    /// Runs the full walk and returns the partial configuration together with
    /// the report, whether or not it contains errors.
    #[must_use]
    pub fn check(&self, input: &RawValue) -> (ResolvedConfig, ValidationReport) {
        let mut run = Run {
            validator: self,
            resolved: ResolvedConfig::default(),
            report: ValidationReport::default(),
            deferred: Vec::new(),
        };
        let root = KeyPath::root();

        match input {
            RawValue::Null => run.section(self.schema.root(), &root, None),
            RawValue::Mapping(mapping) => run.section(self.schema.root(), &root, Some(mapping)),
            other => run.error(
                &root,
                IssueKind::TypeMismatch,
                format!("the input must be a mapping, found {}", describe(other)),
            ),
        }
        run.run_deferred(None);

        log::debug!(
            "validation finished with {} error(s) and {} warning(s)",
            run.report.errors.len(),
            run.report.warnings.len()
        );
        (run.resolved, run.report)
    }

    fn position(&self, path: &KeyPath) -> Option<usize> {
        self.order.get(path).copied()
    }

    /// The keywords `predicate` reads that resolve after `own`.
    fn forward_targets(&self, predicate: &Predicate, own: Option<usize>) -> Vec<(KeyPath, usize)> {
        let Some(own) = own else {
            return Vec::new();
        };
        predicate
            .user_paths()
            .into_iter()
            .map(KeyPath::from)
            .filter_map(|target| {
                let at = self.position(&target)?;
                (at > own).then_some((target, at))
            })
            .collect()
    }
}

/// Validates `input` against `schema` with default options.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the input has any error.
pub fn validate(schema: &SchemaTree, input: &RawValue) -> Result<Validated> {
    Validator::new(schema).validate(input)
}

struct Run<'v, 's> {
    validator: &'v Validator<'s>,
    resolved: ResolvedConfig,
    report: ValidationReport,
    deferred: Vec<Deferred<'s>>,
}

/// A predicate waiting for keywords declared after its own.
struct Deferred<'s> {
    predicate: &'s Predicate,
    path: KeyPath,
    value: Value,
    targets: Vec<KeyPath>,
    ready_at: usize,
}

impl<'s> Run<'_, 's> {
    fn error(&mut self, path: &KeyPath, kind: IssueKind, detail: impl Into<String>) {
        let issue = ValidationIssue::new(path.clone(), kind, detail);
        log::debug!("{}: {}", issue.kind, issue.detail);
        self.report.errors.push(issue);
    }

    fn section(&mut self, section: &'s Section, path: &KeyPath, input: Option<&Mapping>) {
        self.resolved.ensure_section(path);

        for keyword in &section.keywords {
            // Explicit null means "not given".
            let raw = input
                .and_then(|mapping| mapping.get(keyword.name.as_str()))
                .filter(|raw| !raw.is_null());
            let keyword_path = path.child(&keyword.name);
            self.keyword(keyword, &keyword_path, raw);
            if let Some(position) = self.validator.position(&keyword_path) {
                self.run_deferred(Some(position));
            }
        }

        if let Some(mapping) = input {
            self.unknown_keys(section, path, mapping);
        }

        for child in &section.sections {
            let child_path = path.child(&child.name);
            let child_input = match input.and_then(|mapping| mapping.get(child.name.as_str())) {
                None | Some(RawValue::Null) => None,
                Some(RawValue::Mapping(mapping)) => Some(mapping),
                Some(other) => {
                    self.error(
                        &child_path,
                        IssueKind::TypeMismatch,
                        format!(
                            "section '{}' must be a mapping, found {}",
                            child.name,
                            describe(other)
                        ),
                    );
                    continue;
                }
            };
            self.section(child, &child_path, child_input);
        }
    }

    fn keyword(&mut self, keyword: &'s Keyword, path: &KeyPath, raw: Option<&RawValue>) {
        let value = match (raw, &keyword.default) {
            (Some(raw), _) => match coerce(raw, keyword.ty) {
                Ok(value) => {
                    log::debug!("{path}: using input value {value}");
                    value
                }
                Err(mismatch) => {
                    self.error(path, IssueKind::TypeMismatch, mismatch.to_string());
                    return;
                }
            },
            (None, Some(default)) => {
                log::debug!("{path}: using default {default}");
                default.clone()
            }
            (None, None) => {
                self.error(
                    path,
                    IssueKind::MissingRequiredKeyword,
                    format!("keyword '{}' is required but has no value", keyword.name),
                );
                return;
            }
        };

        self.resolved.insert(path, value.clone());
        let own = self.validator.position(path);
        for predicate in &keyword.predicates {
            let forward = self.validator.forward_targets(predicate, own);
            let Some(ready_at) = forward.iter().map(|(_, at)| *at).max() else {
                self.predicate(predicate, path, &value);
                continue;
            };
            let targets: Vec<KeyPath> = forward.into_iter().map(|(target, _)| target).collect();
            log::debug!(
                "{path}: deferring `{predicate}` until {} resolved",
                targets.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
            );
            self.deferred.push(Deferred {
                predicate,
                path: path.clone(),
                value: value.clone(),
                targets,
                ready_at,
            });
        }
    }

    /// Runs deferred predicates whose targets have all been visited, or every
    /// remaining one when `reached` is `None`.
    fn run_deferred(&mut self, reached: Option<usize>) {
        if self.deferred.is_empty() {
            return;
        }
        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.deferred)
            .into_iter()
            .partition(|deferred| match reached {
                Some(reached) => deferred.ready_at <= reached,
                None => true,
            });
        self.deferred = waiting;

        for deferred in ready {
            let missing = deferred
                .targets
                .iter()
                .find(|target| self.resolved.value_at(target.segments()).is_none());
            if let Some(target) = missing {
                let detail = format!(
                    "predicate `{}` reads {}, which is declared after {} and did not resolve",
                    deferred.predicate,
                    target.user_index(),
                    deferred.path.user_index()
                );
                self.error(&deferred.path, IssueKind::PredicateOrderingError, detail);
                continue;
            }
            self.predicate(deferred.predicate, &deferred.path, &deferred.value);
        }
    }

    fn predicate(&mut self, predicate: &Predicate, path: &KeyPath, value: &Value) {
        log::trace!("{path}: checking `{predicate}` with value {value}");
        let target = match predicate.evaluate(value, &self.resolved) {
            Ok(true) => return,
            Ok(false) => {
                self.error(
                    path,
                    IssueKind::PredicateViolation,
                    format!("predicate `{predicate}` is not satisfied by value {value}"),
                );
                return;
            }
            Err(EvalError::Unsupported(message)) => {
                self.error(
                    path,
                    IssueKind::UnsupportedExpression,
                    format!("predicate `{predicate}` cannot be evaluated: {message}"),
                );
                return;
            }
            Err(EvalError::Unresolved { path: target }) => target,
        };

        let own = self.validator.position(path);
        match self.validator.position(&KeyPath::from(target.as_slice())) {
            Some(read) if own.is_some_and(|own| read <= own) => {
                // The earlier keyword failed and has its own error.
                log::debug!(
                    "{path}: skipping `{predicate}`, {} did not resolve",
                    render_user_path(&target)
                );
            }
            Some(_) => self.error(
                path,
                IssueKind::PredicateOrderingError,
                format!(
                    "predicate `{predicate}` reads {}, which is resolved after {}",
                    render_user_path(&target),
                    path.user_index()
                ),
            ),
            None => self.error(
                path,
                IssueKind::UnsupportedExpression,
                format!(
                    "predicate `{predicate}` reads {}, which is not a declared keyword",
                    render_user_path(&target)
                ),
            ),
        }
    }

    fn unknown_keys(&mut self, section: &Section, path: &KeyPath, input: &Mapping) {
        let policy = self.validator.config.unknown_keys;
        for key in input.keys() {
            let name = match key.as_str() {
                Some(name) if section.declares(name) => continue,
                Some(name) => name.to_string(),
                None => describe(key),
            };
            let key_path = path.child(&name);
            let detail = format!("'{name}' is not declared in the template");

            match policy {
                UnknownKeyPolicy::Warn => {
                    log::warn!("unknown key {key_path} in input");
                    self.report.warnings.push(ValidationIssue::new(
                        key_path,
                        IssueKind::UnknownKeyword,
                        detail,
                    ));
                }
                UnknownKeyPolicy::Error => self.error(&key_path, IssueKind::UnknownKeyword, detail),
                UnknownKeyPolicy::Ignore => log::debug!("ignoring unknown key {key_path}"),
            }
        }
    }
}
