//! Parsing feature
//!
//! Source front end: feeds script text to tree-sitter-kotlin, collects
//! syntax diagnostics and binds the script definition against the
//! classpath.
//!
//! ## Structure
//! - `domain/` - ScriptDefinition, BoundScript, FrontEndOutput
//! - `ports/` - FrontEnd trait
//! - `infrastructure/` - KotlinScriptFrontEnd

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{BoundScript, ConcreteTree, FrontEndOutput, ScriptDefinition, ScriptKind};
pub use infrastructure::KotlinScriptFrontEnd;
pub use ports::FrontEnd;
