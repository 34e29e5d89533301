//! Custom assertions for parse results

use kts_lst::{ClasspathResolver, DiagnosticKind, LstKind, ParseResult, SymbolResolver, TreeNode, TypeRef};
use pretty_assertions::assert_eq;

/// Printing the tree gives back exactly `source`
pub fn assert_round_trip(result: &ParseResult, source: &str) {
    assert_eq!(result.print(), source);
    assert_eq!(result.source_len, source.len());
}

/// Names reported as unresolved, in report order
pub fn unresolved_names(result: &ParseResult) -> Vec<String> {
    result
        .diagnostics_of(DiagnosticKind::SymbolUnresolved)
        .filter_map(|d| d.node)
        .filter_map(|id| result.root.find(id))
        .filter_map(|node| match node.type_ref() {
            Some(TypeRef::Unresolved { name }) => Some(name.clone()),
            _ => None,
        })
        .collect()
}

/// `Resolved` refs in `root` that `resolver` does not back with a
/// descriptor of the same kind
pub fn dangling_resolved_refs(root: &TreeNode, resolver: &ClasspathResolver) -> Vec<String> {
    root.walk()
        .filter_map(|node| match node.type_ref() {
            Some(TypeRef::Resolved { qualified_name, kind }) => Some((qualified_name, *kind)),
            _ => None,
        })
        .filter(|(name, kind)| {
            let resolution = resolver.resolve(name).unwrap();
            resolution.descriptor().map(|d| d.kind) != Some(*kind)
        })
        .map(|(name, _)| name.clone())
        .collect()
}

/// First call to `name` in preorder
pub fn find_call<'a>(root: &'a TreeNode, name: &str) -> &'a TreeNode {
    root.descendants(&LstKind::Call)
        .find(|call| call.callee_name().as_deref() == Some(name))
        .unwrap_or_else(|| panic!("no call to `{}`", name))
}

/// Qualified name of a node's resolved type
pub fn resolved_name(node: &TreeNode) -> Option<&str> {
    node.type_ref().and_then(TypeRef::qualified_name)
}
