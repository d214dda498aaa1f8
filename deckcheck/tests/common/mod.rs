//! Common test utilities for integration tests.
//!
//! This module provides the SCF fixture template and small helpers for
//! building schemas and inputs from YAML text.

use deckcheck::SchemaTree;

/// The SCF fixture template: a required title, an `scf` section with a
/// required functional and defaulted options, and a nested `thresholds`
/// section.
#[allow(dead_code)]
pub const SCF_TEMPLATE: &str = include_str!("../fixtures/scf_template.yml");

/// Parses YAML text into an untyped document.
#[allow(dead_code)]
pub fn yaml(text: &str) -> serde_yaml::Value {
    serde_yaml::from_str(text).expect("test YAML should parse")
}

/// Parses a schema from YAML text.
#[allow(dead_code)]
pub fn schema(text: &str) -> SchemaTree {
    SchemaTree::parse(&yaml(text)).expect("test schema should be valid")
}

/// The parsed SCF fixture schema.
#[allow(dead_code)]
pub fn scf_schema() -> SchemaTree {
    schema(SCF_TEMPLATE)
}

/// The SCF fixture with a cross-field predicate on `another_number`, which
/// is only allowed when acceleration is on.
///
/// `another_number` is declared before `some_acceleration`, so the predicate
/// reads a keyword resolved after its own.
#[allow(dead_code)]
pub fn cross_field_schema() -> SchemaTree {
    let mut document = yaml(SCF_TEMPLATE);
    let another_number = &mut document["sections"][0]["keywords"][2];
    assert_eq!(another_number["name"].as_str(), Some("another_number"));
    another_number["predicates"]
        .as_sequence_mut()
        .expect("another_number should declare predicates")
        .push("user['scf']['some_acceleration'] == True".into());
    SchemaTree::parse(&document).expect("cross-field fixture should be valid")
}

/// The minimal valid input for the SCF fixture.
#[allow(dead_code)]
pub const MINIMAL_INPUT: &str = "title: Test\nscf:\n  functional: B3LYP\n";
