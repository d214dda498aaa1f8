//! Schema trees: typed keywords grouped into nested sections.
//!
//! A [`SchemaTree`] is built once from a schema document with
//! [`SchemaTree::parse`] and is read-only afterwards. Declaration order is
//! significant: it is the order in which keywords are resolved, so a
//! predicate may only read keywords declared before its own.
//!
//! # Examples
//!
//! ```
//! use deckcheck::schema::{SchemaNode, SchemaTree};
//!
//! let doc: serde_yaml::Value = serde_yaml::from_str(r"
//! sections:
//!   - name: scf
//!     docstring: SCF options.
//!     keywords:
//!       - name: max_num_iterations
//!         type: int
//!         default: 20
//!         docstring: Maximum number of iterations.
//!         predicates:
//!           - value > 0
//! ").unwrap();
//!
//! let tree = SchemaTree::parse(&doc).unwrap();
//! assert!(matches!(
//!     tree.find(&["scf", "max_num_iterations"]),
//!     Some(SchemaNode::Keyword(k)) if !k.is_required()
//! ));
//! ```

pub mod docs;
mod parser;
mod tree;

pub use tree::{Keyword, SchemaNode, SchemaTree, Section};
