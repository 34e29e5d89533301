use crate::features::classpath::domain::Resolution;
use crate::shared::models::{Diagnostic, Result};

/// Name lookup used by the front end and the attribution pass
pub trait SymbolResolver: Send + Sync {
    /// Resolve a fully qualified type name
    fn resolve(&self, qualified_name: &str) -> Result<Resolution>;

    /// Resolve `member` on `owner` or its supertypes. A hit is a
    /// `Function`-kind descriptor whose members are the matching overloads.
    fn resolve_member(&self, owner: &str, member: &str) -> Result<Resolution>;

    /// Entries skipped so far: missing at construction, or archives that
    /// could not be opened on first use
    fn warnings(&self) -> Vec<Diagnostic>;
}
