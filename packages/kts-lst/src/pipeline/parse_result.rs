//! Per-file pipeline result
//!
//! ```text
//! ParseResult
//! ├── source_path   path label the file was parsed under
//! ├── script_kind   build or settings script
//! ├── root          lossless, attributed tree
//! ├── diagnostics   classpath warnings, syntax errors, unresolved symbols
//! └── source_len    original byte length
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::features::lossless_tree::{print, LstKind, TreeNode};
use crate::features::parsing::ScriptKind;
use crate::shared::models::{Diagnostic, DiagnosticKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub source_path: PathBuf,
    pub script_kind: ScriptKind,
    pub root: TreeNode,
    pub diagnostics: Vec<Diagnostic>,
    /// Byte length of the parsed source
    pub source_len: usize,
}

impl ParseResult {
    /// Print the (possibly edited) tree back to source text
    pub fn print(&self) -> String {
        print(&self.root)
    }

    /// Whether the whole file was wrapped in a single `Unparsed` node
    pub fn is_unparsed(&self) -> bool {
        self.root.kind() == &LstKind::Unparsed
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    /// Snapshot of the attributed tree for out-of-process tooling
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
