//! Parsing domain models

mod front_end_output;
mod script_definition;

pub use front_end_output::{ConcreteTree, FrontEndOutput};
pub use script_definition::{BoundScript, ScriptDefinition, ScriptKind};
