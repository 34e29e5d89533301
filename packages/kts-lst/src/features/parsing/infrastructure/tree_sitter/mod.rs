//! Tree-sitter based front end

mod parser;

pub(crate) use parser::parse_kotlin;
pub use parser::KotlinScriptFrontEnd;
