//! Parsing infrastructure

pub mod tree_sitter;

pub(crate) use self::tree_sitter::parse_kotlin;
pub use self::tree_sitter::KotlinScriptFrontEnd;
