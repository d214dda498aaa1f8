//! reStructuredText documentation for a schema.
//!
//! The output is a field list per section: keywords first, each with its
//! type and default, then subsections, indented two spaces per level.

use std::fmt;

use super::tree::{Keyword, SchemaTree, Section};

const NOTICE: &str =
    ".. This documentation was autogenerated using deckcheck. Editing by hand is not recommended.";

const DEFAULT_HEADER: &str = "================\nInput parameters\n================";

/// Renders documentation for every keyword and section of `tree`.
///
/// `header` replaces the default "Input parameters" title and is written
/// verbatim.
///
/// # Examples
///
/// ```
/// use deckcheck::schema::{docs, SchemaTree};
///
/// let doc: serde_yaml::Value = serde_yaml::from_str(r"
/// keywords:
///   - name: title
///     type: str
///     docstring: Title of the calculation.
/// ").unwrap();
/// let tree = SchemaTree::parse(&doc).unwrap();
///
/// let rst = docs::generate(&tree, None);
/// assert!(rst.contains(" :title: Title of the calculation."));
/// assert!(rst.contains("**Type** ``str``"));
/// ```
#[must_use]
pub fn generate(tree: &SchemaTree, header: Option<&str>) -> String {
    Document {
        tree,
        header: header.unwrap_or(DEFAULT_HEADER),
    }
    .to_string()
}

struct Document<'a> {
    tree: &'a SchemaTree,
    header: &'a str,
}

impl fmt::Display for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{NOTICE}")?;
        writeln!(f)?;
        writeln!(f, "{}", self.header.trim_end())?;
        writeln!(f)?;
        writeln!(f, "Keywords without a default value are **required**.")?;
        writeln!(f, "Sections where all keywords have a default value can be omitted.")?;
        write_section(f, self.tree.root(), 0)
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, section: &Section, level: usize) -> fmt::Result {
    let pad = "  ".repeat(level);

    if !section.keywords.is_empty() {
        writeln!(f)?;
        writeln!(f, "{pad}**Keywords**")?;
        for keyword in &section.keywords {
            write_keyword(f, keyword, &pad)?;
        }
    }

    if !section.sections.is_empty() {
        writeln!(f)?;
        writeln!(f, "{pad}**Sections**")?;
        for child in &section.sections {
            writeln!(f, "{pad} :{}: {}", child.name, child.docstring)?;
            write_section(f, child, level + 1)?;
        }
    }

    Ok(())
}

fn write_keyword(f: &mut fmt::Formatter<'_>, keyword: &Keyword, pad: &str) -> fmt::Result {
    writeln!(f, "{pad} :{}: {}", keyword.name, keyword.docstring)?;
    writeln!(f)?;
    writeln!(f, "{pad}  **Type** ``{}``", keyword.ty)?;
    if let Some(default) = &keyword.default {
        writeln!(f)?;
        writeln!(f, "{pad}  **Default** ``{default}``")?;
    }
    writeln!(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(text: &str) -> SchemaTree {
        SchemaTree::parse(&serde_yaml::from_str(text).unwrap()).unwrap()
    }

    #[test]
    fn test_generate_default_header() {
        let rst = generate(&SchemaTree::default(), None);
        assert!(rst.starts_with(NOTICE));
        assert!(rst.contains("\n================\nInput parameters\n================\n"));
        assert!(rst.contains("Keywords without a default value are **required**."));
        assert!(!rst.contains("**Keywords**"));
        assert!(!rst.contains("**Sections**"));
    }

    #[test]
    fn test_generate_custom_header() {
        let rst = generate(&SchemaTree::default(), Some("Options\n=======\n"));
        assert!(rst.contains("\nOptions\n=======\n\nKeywords without"));
        assert!(!rst.contains("Input parameters"));
    }

    #[test]
    fn test_generate_keywords_and_sections() {
        let rst = generate(
            &tree(
                r"
keywords:
  - name: title
    type: str
    docstring: Title of the calculation.
sections:
  - name: scf
    docstring: SCF options.
    keywords:
      - name: max_num_iterations
        type: int
        default: 20
        docstring: Maximum number of iterations.
    sections:
      - name: thresholds
        docstring: Convergence thresholds.
        keywords:
          - name: energy
            type: float
            default: 0.001
            docstring: Energy threshold.
",
            ),
            None,
        );

        let expected = "\
**Keywords**
 :title: Title of the calculation.

  **Type** ``str``


**Sections**
 :scf: SCF options.

  **Keywords**
   :max_num_iterations: Maximum number of iterations.

    **Type** ``int``

    **Default** ``20``


  **Sections**
   :thresholds: Convergence thresholds.

    **Keywords**
     :energy: Energy threshold.

      **Type** ``float``

      **Default** ``0.001``

";
        assert!(rst.ends_with(expected), "{rst}");
    }

    #[test]
    fn test_list_and_string_defaults() {
        let rst = generate(
            &tree(
                r"
keywords:
  - {name: sizes, type: 'List[int]', default: [1, 2]}
  - {name: method, type: str, default: HF}
",
            ),
            None,
        );
        assert!(rst.contains("**Type** ``List[int]``"));
        assert!(rst.contains("**Default** ``[1, 2]``"));
        assert!(rst.contains("**Default** ``'HF'``"));
    }
}
