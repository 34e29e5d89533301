//! Shared utilities

pub mod id_generator;
pub mod scope_stack;
pub mod stack;
pub mod text;
pub(crate) mod tree_sitter;

pub use id_generator::{IdGenerator, NodeId};
pub use scope_stack::ScopeStack;
pub use stack::ensure_sufficient_stack;
