//! Front end port

use crate::features::classpath::ports::SymbolResolver;
use crate::features::parsing::domain::{FrontEndOutput, ScriptDefinition};
use crate::shared::models::Result;

/// Source front end: script text in, concrete tree and diagnostics out.
///
/// Recoverable problems are reported as diagnostics; `Err` is reserved for
/// a parser that cannot be set up or a resolver failure while binding the
/// script definition.
pub trait FrontEnd: Send + Sync {
    fn parse(
        &self,
        source: &str,
        definition: &ScriptDefinition,
        resolver: &dyn SymbolResolver,
    ) -> Result<FrontEndOutput>;
}
