//! Shared module - Common types and utilities
//!
//! Types shared across all features: spans, diagnostics, the unified error
//! type, node ids and the lexical scope stack.

pub mod models;
pub mod utils;

// Re-exports for convenience
pub use models::*;
pub use utils::id_generator::{IdGenerator, NodeId};
pub use utils::scope_stack::ScopeStack;
