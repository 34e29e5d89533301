//! Type attribution attached to tree nodes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::features::classpath::domain::{TypeDescriptor, TypeKind};

/// Resolved or explicitly unresolved type of a node.
///
/// Refers to types by qualified name only; the descriptor itself lives in
/// the resolver's index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    Resolved { qualified_name: String, kind: TypeKind },
    Unresolved { name: String },
}

impl TypeRef {
    pub fn resolved(qualified_name: impl Into<String>, kind: TypeKind) -> Self {
        TypeRef::Resolved {
            qualified_name: qualified_name.into(),
            kind,
        }
    }

    pub fn unresolved(name: impl Into<String>) -> Self {
        TypeRef::Unresolved { name: name.into() }
    }

    pub fn of(descriptor: &TypeDescriptor) -> Self {
        Self::resolved(descriptor.qualified_name.clone(), descriptor.kind)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, TypeRef::Resolved { .. })
    }

    /// Qualified name when resolved
    pub fn qualified_name(&self) -> Option<&str> {
        match self {
            TypeRef::Resolved { qualified_name, .. } => Some(qualified_name),
            TypeRef::Unresolved { .. } => None,
        }
    }

    pub fn kind(&self) -> Option<TypeKind> {
        match self {
            TypeRef::Resolved { kind, .. } => Some(*kind),
            TypeRef::Unresolved { .. } => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Resolved {
                qualified_name,
                kind,
            } => write!(f, "{} ({})", qualified_name, kind.as_str()),
            TypeRef::Unresolved { name } => write!(f, "<unresolved {}>", name),
        }
    }
}
