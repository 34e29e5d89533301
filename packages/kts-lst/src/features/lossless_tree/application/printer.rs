//! Tree printer
//!
//! Writes every node's prefix followed by its token text or its children.
//! On an unedited tree this reproduces the parsed source byte for byte.

use std::fmt;

use crate::features::lossless_tree::domain::TreeNode;

/// Serialize a (possibly edited) tree
pub fn print(tree: &TreeNode) -> String {
    let mut out = String::with_capacity(tree.printed_len());
    // writing into a String cannot fail
    let _ = print_to(tree, &mut out);
    out
}

pub fn print_to<W: fmt::Write>(tree: &TreeNode, out: &mut W) -> fmt::Result {
    tree.write_to(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::lossless_tree::domain::LstKind;
    use crate::shared::models::Span;
    use crate::shared::utils::NodeId;

    #[test]
    fn test_print_includes_root_prefix() {
        let leaf = TreeNode::token(NodeId(1), LstKind::Identifier, "\n", "x", Span::new(2, 3));
        let root = TreeNode::parent(NodeId(0), LstKind::SourceFile, " ", vec![leaf], Span::new(1, 3));
        assert_eq!(print(&root), " \nx");
        assert_eq!(root.text(), "\nx");
    }

    #[test]
    fn test_print_after_edit() {
        let leaf = TreeNode::token(NodeId(1), LstKind::Identifier, "", "java", Span::new(0, 4));
        let mut root = TreeNode::parent(NodeId(0), LstKind::SourceFile, "", vec![leaf], Span::new(0, 4));
        root.children_mut()[0].set_token_text("kotlin");

        let mut out = String::new();
        print_to(&root, &mut out).unwrap();
        assert_eq!(out, "kotlin");
    }
}
