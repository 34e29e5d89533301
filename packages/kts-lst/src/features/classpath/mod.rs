//! Classpath feature
//!
//! Resolves qualified JVM names against an ordered list of class
//! directories and archives.
//!
//! ```text
//! ClasspathEntry* ──▶ ClasspathResolver ──▶ SymbolIndex ──▶ TypeDescriptor
//!                        │ miss
//!                        ▼
//!                  builtins / script templates
//! ```

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{
    ClasspathEntry, EntryKind, JvmType, MemberKind, MemberSignature, Origin, Resolution,
    TypeDescriptor, TypeKind,
};
pub use infrastructure::{find_artifacts, ClassParseError, ClasspathResolver};
pub use ports::SymbolResolver;
