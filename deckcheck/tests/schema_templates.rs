//! Integration tests for template checking and documentation generation.

mod common;

use common::{scf_schema, yaml, SCF_TEMPLATE};
use deckcheck::schema::docs;
use deckcheck::{Error, SchemaNode, SchemaTree, ValidatorConfig};

#[test]
fn test_fixture_template_is_valid_with_docstrings_required() {
    let config = ValidatorConfig {
        require_docstrings: true,
        ..ValidatorConfig::default()
    };
    let tree = SchemaTree::parse_with(&yaml(SCF_TEMPLATE), &config).unwrap();

    let order: Vec<String> = tree
        .resolution_order()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(order.len(), 8);
    assert_eq!(order[0], "title");
    assert_eq!(order[7], "scf.thresholds.energy");
}

#[test]
fn test_find_nodes_in_fixture() {
    let tree = scf_schema();
    assert!(matches!(
        tree.find(&["scf", "thresholds"]),
        Some(SchemaNode::Section(section)) if section.is_omittable()
    ));
    assert!(matches!(
        tree.find(&["scf", "functional"]),
        Some(SchemaNode::Keyword(keyword)) if keyword.is_required()
    ));
    assert!(!tree.root().section("scf").unwrap().is_omittable());
}

#[test]
fn test_template_errors_are_collated() {
    let err = SchemaTree::parse(&yaml(
        r"
keywords:
  - name: title
sections:
  - name: scf
    keywords:
      - name: max_num_iterations
        type: int
        default: twenty
      - name: another_number
        type: int
        default: 10
        predicates:
          - value < user['scf']['max_iterations']
          - import os
      - name: another_number
        type: int
        default: 10
",
    ))
    .unwrap_err();

    let Error::Schema { issues } = &err else {
        panic!("expected a schema error, got {err:?}");
    };
    let paths: Vec<String> = issues.iter().map(|issue| issue.path.to_string()).collect();
    assert_eq!(
        paths,
        [
            "title",
            "scf.max_num_iterations",
            "scf.another_number",
            "scf.another_number",
            "scf.another_number",
        ]
    );

    let text = err.to_string();
    assert!(text.starts_with("Error(s) occurred when checking the template:"));
    assert!(text.contains("- At user['title']:\n  Keywords must have a valid type."));
    assert!(text.contains("Duplicate keyword name."));
}

#[test]
fn test_undeclared_reference_is_reported() {
    let err = SchemaTree::parse(&yaml(
        r"
sections:
  - name: scf
    keywords:
      - name: another_number
        type: int
        default: 10
        predicates:
          - value < user['scf']['max_iterations']
",
    ))
    .unwrap_err();
    let issues = err.schema_issues().unwrap();
    assert_eq!(issues.len(), 1);
    assert!(issues[0]
        .message
        .contains("user['scf']['max_iterations'], which is not declared"));
}

#[test]
fn test_documentation_for_fixture() {
    let rst = docs::generate(&scf_schema(), None);

    assert!(rst.starts_with(".. This documentation was autogenerated"));
    assert!(rst.contains("Input parameters"));
    assert!(rst.contains(" :title: Title of the calculation."));
    assert!(rst.contains(" :scf: Hartree-Fock or Kohn-Sham SCF."));
    assert!(rst.contains("   :max_num_iterations: Maximum number of SCF iterations."));
    assert!(rst.contains("    **Default** ``20``"));
    assert!(rst.contains("    **Type** ``complex``"));
    assert!(rst.contains("    **Default** ``0.0+0.0j``"));
    assert!(rst.contains("     :energy: Energy convergence threshold."));
    assert!(rst.contains("      **Default** ``0.001``"));
}
