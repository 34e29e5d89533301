//! Type Resolution Feature
//!
//! Attaches a [`TypeRef`] to identifiers, calls, member accesses,
//! declarations and type references of a lossless tree.
//!
//! ## Structure
//! - `domain/` - TypeRef
//! - `infrastructure/` - attribution pass, type name lookup

pub mod domain;
pub mod infrastructure;

pub use domain::TypeRef;
pub use infrastructure::attribute;
