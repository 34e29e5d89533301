//! Classpath domain models

pub mod builtins;
mod classpath_entry;
mod type_descriptor;

pub use classpath_entry::{ClasspathEntry, EntryKind};
pub use type_descriptor::{
    accessor_names, JvmType, MemberKind, MemberSignature, Origin, Resolution, TypeDescriptor, TypeKind,
};
