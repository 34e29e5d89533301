//! Lossless tree feature
//!
//! Format-preserving syntax tree: every node owns its leading trivia, so
//! printing an unedited tree yields the original bytes.
//!
//! ```text
//! tree_sitter::Tree ──TreeBuilder──▶ TreeNode ──print──▶ String
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{print, print_to};
pub use domain::{LiteralKind, LstKind, Payload, TreeNode, Walk};
pub use infrastructure::TreeBuilder;
