//! Shared models

mod diagnostic;
mod error;
mod span;

pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use error::{ErrorKind, LstError, Result};
pub use span::{location_of, Location, Span};
