//! Single-file pipeline: front end → tree builder → attribution

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::ParserConfig;
use crate::features::classpath::SymbolResolver;
use crate::features::lossless_tree::TreeBuilder;
use crate::features::parsing::{FrontEnd, KotlinScriptFrontEnd, ScriptDefinition};
use crate::features::type_resolution::attribute;
use crate::shared::models::{Diagnostic, Result, Span};

use super::parse_result::ParseResult;

/// Parse one script and attribute it against `resolver`.
///
/// Syntax errors, unresolved symbols and missing classpath entries are
/// reported as diagnostics on the result. Only I/O failures while reading
/// the classpath come back as `Err`.
pub fn parse_and_attribute(
    source: &str,
    path: impl AsRef<Path>,
    resolver: &dyn SymbolResolver,
    definition: &ScriptDefinition,
    config: &ParserConfig,
) -> Result<ParseResult> {
    let front_end = KotlinScriptFrontEnd::new(config);
    parse_with(&front_end, source, path.as_ref(), resolver, definition, config)
}

/// Same as [`parse_and_attribute`] with an explicit front end
pub fn parse_with(
    front_end: &dyn FrontEnd,
    source: &str,
    path: &Path,
    resolver: &dyn SymbolResolver,
    definition: &ScriptDefinition,
    config: &ParserConfig,
) -> Result<ParseResult> {
    let start = Instant::now();
    let label = path.display().to_string();
    let definition = definition.clone().with_default_imports(config.default_imports.clone());

    let output = front_end
        .parse(source, &definition, resolver)
        .map_err(|e| e.with_file(label.clone()))?;

    let mut diagnostics: Vec<Diagnostic> = output.diagnostics;

    let root = match output.tree {
        Some(tree) if !output.unparsable => {
            let mut root = TreeBuilder::new(source).build(&tree);
            let unresolved = attribute(&mut root, resolver, &output.script, config.unresolved_severity)
                .map_err(|e| e.with_file(label.clone()))?;
            diagnostics.extend(unresolved);
            root
        }
        _ => {
            warn!(file = %label, bytes = source.len(), "Unparsable script, keeping text verbatim");
            diagnostics.push(Diagnostic::unparsable_file(
                format!("{} could not be parsed", label),
                Span::new(0, source.len()),
            ));
            TreeBuilder::new(source).unparsed()
        }
    };

    // archives are opened during lookups, so skipped entries are known only now
    let mut warnings = resolver.warnings();
    warnings.append(&mut diagnostics);
    let diagnostics = warnings;

    debug!(
        file = %label,
        nodes = root.walk().count(),
        diagnostics = diagnostics.len(),
        "Built lossless tree"
    );
    info!(
        file = %label,
        kind = definition.kind.as_str(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Parsed script"
    );

    Ok(ParseResult {
        source_path: path.to_path_buf(),
        script_kind: definition.kind,
        root,
        diagnostics,
        source_len: source.len(),
    })
}
