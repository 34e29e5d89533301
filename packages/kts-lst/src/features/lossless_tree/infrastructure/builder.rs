//! Concrete syntax tree → lossless tree
//!
//! A single cursor walks the source from left to right. Each node first
//! takes everything between the cursor and the start of its first real
//! token as its prefix, so whitespace and comments always attach to the
//! node that follows them. Comments are grammar "extras" and never become
//! nodes of their own.

use ::tree_sitter::Node;

use super::kind_map::map_kind;
use crate::features::lossless_tree::domain::{LstKind, TreeNode};
use crate::features::parsing::domain::ConcreteTree;
use crate::shared::models::Span;
use crate::shared::utils::text::{floor_char_boundary, slice};
use crate::shared::utils::tree_sitter::content_start;
use crate::shared::utils::{ensure_sufficient_stack, IdGenerator};

pub struct TreeBuilder<'s> {
    source: &'s str,
    cursor: usize,
    ids: IdGenerator,
}

impl<'s> TreeBuilder<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            cursor: 0,
            ids: IdGenerator::new(),
        }
    }

    /// Build the lossless tree for a parsed file
    pub fn build(mut self, tree: &ConcreteTree) -> TreeNode {
        let root = tree.root_node();
        let id = self.ids.next_node();
        // leading trivia belongs to the first statement, the root starts at 0
        let mut children = self.children(&root, false);

        let trailing = self.advance_to(self.source.len());
        if !trailing.is_empty() {
            let eof_id = self.ids.next_node();
            let end = self.source.len();
            children.push(TreeNode::token(eof_id, LstKind::Eof, trailing, "", Span::empty_at(end)));
        }

        let kind = map_kind(&root, self.source);
        TreeNode::parent(id, kind, "", children, Span::new(0, self.cursor))
    }

    /// The whole source as one opaque node
    pub fn unparsed(mut self) -> TreeNode {
        let id = self.ids.next_node();
        let text = self.advance_to(self.source.len());
        TreeNode::token(id, LstKind::Unparsed, "", text, Span::new(0, self.cursor))
    }

    fn node(&mut self, node: &Node) -> TreeNode {
        ensure_sufficient_stack(|| self.build_node(node))
    }

    fn build_node(&mut self, node: &Node) -> TreeNode {
        let kind = map_kind(node, self.source);
        let id = self.ids.next_node();

        if node.is_missing() {
            return TreeNode::token(id, LstKind::Missing, "", "", Span::empty_at(self.cursor));
        }

        let prefix = content_start(node)
            .map(|start| self.advance_to(start))
            .unwrap_or_default();
        let start = self.cursor;

        if node.child_count() == 0 {
            let text = self.advance_to(node.end_byte());
            return TreeNode::token(id, kind, prefix, text, Span::new(start, self.cursor));
        }

        let verbatim = kind == LstKind::StringLiteral;
        let children = self.children(node, verbatim);
        TreeNode::parent(id, kind, prefix, children, Span::new(start, self.cursor))
    }

    fn children(&mut self, node: &Node, verbatim: bool) -> Vec<TreeNode> {
        let mut children = Vec::with_capacity(node.child_count());
        let mut last_end = node.start_byte();
        let mut walker = node.walk();
        for child in node.children(&mut walker) {
            self.hidden_text(last_end, child.start_byte(), verbatim, &mut children);
            last_end = last_end.max(child.end_byte());
            // extras stay unconsumed and end up in the next node's prefix
            if child.is_extra() {
                continue;
            }
            children.push(self.node(&child));
        }
        self.hidden_text(last_end, node.end_byte(), verbatim, &mut children);
        children
    }

    /// Text the grammar consumed without exposing a node (string content
    /// in some grammar versions) becomes an anonymous token
    fn hidden_text(&mut self, from: usize, to: usize, verbatim: bool, out: &mut Vec<TreeNode>) {
        let from = from.max(self.cursor);
        if from >= to {
            return;
        }
        let gap = slice(self.source, from, to);
        if gap.trim().is_empty() {
            return;
        }
        let (start, end) = if verbatim {
            (from, to)
        } else {
            let leading = gap.len() - gap.trim_start().len();
            let trailing = gap.len() - gap.trim_end().len();
            (from + leading, to - trailing)
        };
        let id = self.ids.next_node();
        let prefix = self.advance_to(start);
        let token_start = self.cursor;
        let text = self.advance_to(end);
        out.push(TreeNode::token(id, LstKind::Token, prefix, text, Span::new(token_start, self.cursor)));
    }

    /// Consume the source up to `offset`, never moving backwards
    fn advance_to(&mut self, offset: usize) -> String {
        let offset = floor_char_boundary(self.source, offset.max(self.cursor));
        let taken = slice(self.source, self.cursor, offset).to_string();
        self.cursor = offset;
        taken
    }
}
