//! Pipeline orchestration
//!
//! ```text
//! source ──FrontEnd──▶ ConcreteTree ──TreeBuilder──▶ TreeNode ──attribute──▶ ParseResult
//! ```

pub mod gradle_kts_parser;
pub mod parse_file;
pub mod parse_result;

pub use gradle_kts_parser::{GradleKtsParser, GradleKtsParserBuilder, SourceInput};
pub use parse_file::{parse_and_attribute, parse_with};
pub use parse_result::ParseResult;
