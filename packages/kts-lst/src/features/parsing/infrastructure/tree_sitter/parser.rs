//! Tree-sitter front end for Gradle Kotlin scripts
//!
//! This is where the tree-sitter dependency lives.

use ::tree_sitter::{Node, Parser as TSParser};
use tracing::{debug, warn};

use crate::config::ParserConfig;
use crate::features::classpath::ports::SymbolResolver;
use crate::features::parsing::domain::{ConcreteTree, FrontEndOutput, ScriptDefinition};
use crate::features::parsing::ports::FrontEnd;
use crate::shared::models::{Diagnostic, LstError, Result};
use crate::shared::utils::text::slice;
use crate::shared::utils::tree_sitter::{for_each_descendant, node_span};

const SNIPPET_LEN: usize = 24;

/// Parse Kotlin source. `None` means the parser gave up (timeout).
pub(crate) fn parse_kotlin(source: &str, timeout_micros: Option<u64>) -> Result<Option<ConcreteTree>> {
    let mut parser = TSParser::new();
    parser
        .set_language(&tree_sitter_kotlin::language())
        .map_err(|e| LstError::parse(format!("Failed to set Kotlin language: {}", e)))?;
    if let Some(micros) = timeout_micros {
        parser.set_timeout_micros(micros);
    }
    Ok(parser.parse(source, None).map(ConcreteTree))
}

/// Front end backed by tree-sitter-kotlin. A fresh parser per call, so one
/// instance can serve many threads.
#[derive(Debug, Clone)]
pub struct KotlinScriptFrontEnd {
    timeout_micros: Option<u64>,
    max_error_ratio: f64,
}

impl KotlinScriptFrontEnd {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            timeout_micros: config.parse_timeout_micros,
            max_error_ratio: config.max_error_ratio,
        }
    }
}

impl Default for KotlinScriptFrontEnd {
    fn default() -> Self {
        Self::new(&ParserConfig::default())
    }
}

impl FrontEnd for KotlinScriptFrontEnd {
    fn parse(
        &self,
        source: &str,
        definition: &ScriptDefinition,
        resolver: &dyn SymbolResolver,
    ) -> Result<FrontEndOutput> {
        let script = definition.bind(resolver)?;

        let tree = match parse_kotlin(source, self.timeout_micros)? {
            Some(tree) => tree,
            None => {
                warn!(bytes = source.len(), timeout_micros = ?self.timeout_micros, "Parser gave up");
                return Ok(FrontEndOutput {
                    tree: None,
                    diagnostics: Vec::new(),
                    script,
                    unparsable: true,
                });
            }
        };

        let root = tree.root_node();
        let mut syntax = SyntaxErrors::default();
        syntax.collect(&root, source);

        let ratio = if source.is_empty() {
            0.0
        } else {
            syntax.error_bytes as f64 / source.len() as f64
        };
        let unparsable =
            root.is_error() || (syntax.error_bytes > 0 && ratio >= self.max_error_ratio);

        debug!(
            bytes = source.len(),
            syntax_errors = syntax.diagnostics.len(),
            error_ratio = ratio,
            unparsable,
            "Parsed script"
        );

        Ok(FrontEndOutput {
            tree: Some(tree),
            diagnostics: syntax.diagnostics,
            script,
            unparsable,
        })
    }
}

#[derive(Default)]
struct SyntaxErrors {
    diagnostics: Vec<Diagnostic>,
    /// Bytes covered by outermost error nodes
    error_bytes: usize,
}

impl SyntaxErrors {
    fn collect(&mut self, root: &Node, source: &str) {
        for_each_descendant(root, &mut |node| {
            if node.is_error() {
                let span = node_span(node);
                let snippet: String = slice(source, span.start, span.end)
                    .chars()
                    .take(SNIPPET_LEN)
                    .collect();
                self.diagnostics.push(Diagnostic::syntax_error(
                    format!("unexpected input `{}`", snippet.trim()),
                    span,
                ));
                self.error_bytes += span.len();
                return false;
            }
            if node.is_missing() {
                self.diagnostics.push(Diagnostic::syntax_error(
                    format!("missing `{}`", node.kind()),
                    node_span(node),
                ));
                return false;
            }
            node.has_error()
        });
    }
}
