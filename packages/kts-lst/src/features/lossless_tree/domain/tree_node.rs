//! Lossless tree nodes
//!
//! Every node owns the exact source text that precedes it (whitespace and
//! comments, its *prefix*) and either a token text or an ordered list of
//! children. Writing prefix and payload of every node in tree order yields
//! the original source.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::kind::LstKind;
use crate::features::type_resolution::domain::TypeRef;
use crate::shared::models::Span;
use crate::shared::utils::id_generator::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    Token(String),
    Children(Vec<TreeNode>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    id: NodeId,
    kind: LstKind,
    prefix: String,
    payload: Payload,
    type_ref: Option<TypeRef>,
    range: Span,
}

impl TreeNode {
    pub fn token(
        id: NodeId,
        kind: LstKind,
        prefix: impl Into<String>,
        text: impl Into<String>,
        range: Span,
    ) -> Self {
        Self {
            id,
            kind,
            prefix: prefix.into(),
            payload: Payload::Token(text.into()),
            type_ref: None,
            range,
        }
    }

    pub fn parent(
        id: NodeId,
        kind: LstKind,
        prefix: impl Into<String>,
        children: Vec<TreeNode>,
        range: Span,
    ) -> Self {
        Self {
            id,
            kind,
            prefix: prefix.into(),
            payload: Payload::Children(children),
            type_ref: None,
            range,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &LstKind {
        &self.kind
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Source byte range of the payload (prefix excluded)
    pub fn range(&self) -> Span {
        self.range
    }

    pub fn type_ref(&self) -> Option<&TypeRef> {
        self.type_ref.as_ref()
    }

    pub fn set_type_ref(&mut self, type_ref: Option<TypeRef>) {
        self.type_ref = type_ref;
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    pub fn is_token(&self) -> bool {
        matches!(self.payload, Payload::Token(_))
    }

    pub fn token_text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Token(text) => Some(text),
            Payload::Children(_) => None,
        }
    }

    /// Replace a token's text; no-op on parents
    pub fn set_token_text(&mut self, text: impl Into<String>) {
        if let Payload::Token(current) = &mut self.payload {
            *current = text.into();
        }
    }

    pub fn children(&self) -> &[TreeNode] {
        match &self.payload {
            Payload::Children(children) => children,
            Payload::Token(_) => &[],
        }
    }

    pub fn children_mut(&mut self) -> &mut [TreeNode] {
        match &mut self.payload {
            Payload::Children(children) => children,
            Payload::Token(_) => &mut [],
        }
    }

    /// Child list of a parent, for structural edits
    pub fn child_list_mut(&mut self) -> Option<&mut Vec<TreeNode>> {
        match &mut self.payload {
            Payload::Children(children) => Some(children),
            Payload::Token(_) => None,
        }
    }

    /// First direct child of `kind`
    pub fn child(&self, kind: &LstKind) -> Option<&TreeNode> {
        self.children().iter().find(|c| &c.kind == kind)
    }

    /// Direct children that are not anonymous tokens
    pub fn named_children(&self) -> impl Iterator<Item = &TreeNode> {
        self.children()
            .iter()
            .filter(|c| !matches!(c.kind, LstKind::Token | LstKind::Eof))
    }

    /// Preorder traversal starting at this node
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Node with the given id in this subtree
    pub fn find(&self, id: NodeId) -> Option<&TreeNode> {
        self.walk().find(|n| n.id == id)
    }

    /// All nodes of `kind` in this subtree, preorder
    pub fn descendants<'a>(&'a self, kind: &'a LstKind) -> impl Iterator<Item = &'a TreeNode> + 'a {
        self.walk().filter(move |n| &n.kind == kind)
    }

    /// Name of the called function for `Call` nodes: `f` in `f(x)`,
    /// `a.b.f(x)` and `f { }`
    pub fn callee_name(&self) -> Option<String> {
        if self.kind != LstKind::Call {
            return None;
        }
        let callee = self.named_children().next()?;
        match callee.kind {
            LstKind::Identifier => Some(callee.text()),
            LstKind::Navigation => callee
                .child(&LstKind::NavigationSuffix)?
                .child(&LstKind::Identifier)
                .map(TreeNode::text),
            _ => None,
        }
    }

    /// Subtree text without this node's own prefix
    pub fn text(&self) -> String {
        let mut out = String::new();
        let _ = self.write_payload_to(&mut out);
        out
    }

    /// Prefix followed by payload
    pub fn write_to<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str(&self.prefix)?;
        self.write_payload_to(out)
    }

    pub fn write_payload_to<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        match &self.payload {
            Payload::Token(text) => out.write_str(text),
            Payload::Children(children) => {
                for child in children {
                    child.write_to(out)?;
                }
                Ok(())
            }
        }
    }

    /// Total printed length (prefix included)
    pub fn printed_len(&self) -> usize {
        self.prefix.len()
            + match &self.payload {
                Payload::Token(text) => text.len(),
                Payload::Children(children) => children.iter().map(TreeNode::printed_len).sum(),
            }
    }
}

/// Preorder iterator over a subtree
pub struct Walk<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}
