//! Node identity
//!
//! Ids come from the build traversal order (preorder, root = 0). The same
//! source always yields the same ids, which lets a rewrite engine correlate
//! nodes between an original tree and an edited copy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Sequential id generator, one per tree build
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: u32,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn next_node(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u32 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut gen = IdGenerator::new();
        assert_eq!(gen.next_node(), NodeId(0));
        assert_eq!(gen.next_node(), NodeId(1));
        assert_eq!(gen.issued(), 2);
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(42).to_string(), "#42");
    }
}
