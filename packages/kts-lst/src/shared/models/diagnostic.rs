//! Diagnostics produced by a parse
//!
//! Diagnostics are immutable once a parse has finished. They never abort the
//! pipeline; callers inspect them after the fact.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Span;
use crate::shared::utils::id_generator::NodeId;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// What went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A declared classpath path does not exist
    ClasspathEntryMissing,
    /// A name could not be found on the classpath or in scope
    SymbolUnresolved,
    /// Localized grammar error; a best-effort subtree was still built
    SyntaxError,
    /// The whole file was wrapped in a single opaque node
    UnparsableFile,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::ClasspathEntryMissing => "classpath-entry-missing",
            DiagnosticKind::SymbolUnresolved => "symbol-unresolved",
            DiagnosticKind::SyntaxError => "syntax-error",
            DiagnosticKind::UnparsableFile => "unparsable-file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    /// Byte range in the source; absent for classpath-level diagnostics
    pub span: Option<Span>,
    /// Tree node the diagnostic is attached to, if any
    pub node: Option<NodeId>,
}

impl Diagnostic {
    pub fn new(severity: Severity, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
            span: None,
            node: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_node(mut self, node: NodeId) -> Self {
        self.node = Some(node);
        self
    }

    pub fn classpath_entry_missing(path: &std::path::Path) -> Self {
        Self::new(
            Severity::Warning,
            DiagnosticKind::ClasspathEntryMissing,
            format!("classpath entry does not exist: {}", path.display()),
        )
    }

    /// An existing archive that cannot be opened is skipped like a missing
    /// entry
    pub fn classpath_entry_unreadable(path: &std::path::Path, reason: &str) -> Self {
        Self::new(
            Severity::Warning,
            DiagnosticKind::ClasspathEntryMissing,
            format!("classpath entry cannot be opened: {}: {}", path.display(), reason),
        )
    }

    pub fn syntax_error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Error, DiagnosticKind::SyntaxError, message).with_span(span)
    }

    pub fn unparsable_file(message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Error, DiagnosticKind::UnparsableFile, message).with_span(span)
    }

    pub fn symbol_unresolved(severity: Severity, name: &str, span: Span, node: NodeId) -> Self {
        Self::new(
            severity,
            DiagnosticKind::SymbolUnresolved,
            format!("unresolved symbol `{}`", name),
        )
        .with_span(span)
        .with_node(node)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.kind.as_str(), self.message)?;
        if let Some(span) = self.span {
            write!(f, " at {}..{}", span.start, span.end)?;
        }
        Ok(())
    }
}
