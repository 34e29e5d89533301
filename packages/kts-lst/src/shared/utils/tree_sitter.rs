//! Tree-sitter Utility Functions
//!
//! Helpers for working with tree-sitter nodes. Only the parsing adapter and
//! the tree builder may use these; tree-sitter types stay out of the public API.

use ::tree_sitter::Node;

use crate::shared::models::Span;

/// Byte span of a node
#[inline]
pub fn node_span(node: &Node) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

/// Start of the first non-extra leaf below `node` (its "real" content).
///
/// Leading comments attached inside a node are extras; they belong to the
/// whitespace prefix, not to the node content. Returns `None` when the node
/// has no such leaf (empty or comment-only).
pub fn content_start(node: &Node) -> Option<usize> {
    if node.is_extra() {
        return None;
    }
    if node.child_count() == 0 {
        return Some(node.start_byte());
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(start) = content_start(&child) {
            return Some(start);
        }
    }
    None
}

/// Find a direct child node by kind
#[inline]
pub fn find_child_by_kind<'a>(node: &Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

/// Depth-first visit of every node (including extras)
pub fn for_each_descendant<'a, F>(node: &Node<'a>, f: &mut F)
where
    F: FnMut(&Node<'a>) -> bool,
{
    if !f(node) {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        for_each_descendant(&child, f);
    }
}
