mod kind;
mod tree_node;

pub use kind::{LiteralKind, LstKind};
pub use tree_node::{Payload, TreeNode, Walk};
