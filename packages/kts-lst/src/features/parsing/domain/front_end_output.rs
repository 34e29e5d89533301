//! Front end output

use std::fmt;

use ::tree_sitter::{Node, Tree};

use super::script_definition::BoundScript;
use crate::shared::models::Diagnostic;

/// Parser-internal concrete syntax tree.
///
/// Opaque outside the crate; only the tree builder looks inside.
pub struct ConcreteTree(pub(crate) Tree);

impl ConcreteTree {
    pub(crate) fn root_node(&self) -> Node<'_> {
        self.0.root_node()
    }

    /// Whether the grammar had to recover anywhere
    pub fn has_error(&self) -> bool {
        self.0.root_node().has_error()
    }
}

impl fmt::Debug for ConcreteTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.0.root_node();
        f.debug_struct("ConcreteTree")
            .field("root", &root.kind())
            .field("bytes", &root.byte_range())
            .field("has_error", &root.has_error())
            .finish()
    }
}

#[derive(Debug)]
pub struct FrontEndOutput {
    /// `None` when the parser gave up (timeout)
    pub tree: Option<ConcreteTree>,
    /// Syntax errors, in source order
    pub diagnostics: Vec<Diagnostic>,
    pub script: BoundScript,
    /// The tree is too broken to be worth building; wrap the text instead
    pub unparsable: bool,
}
