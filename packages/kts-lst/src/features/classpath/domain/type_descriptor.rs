//! Type descriptors
//!
//! The minimal structural view of a JVM type needed for matching: what kind
//! of type it is, which types it extends (by name only), and the signatures
//! of its members. Method bodies are never decoded.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Function,
    Primitive,
    Unknown,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Annotation => "annotation",
            TypeKind::Function => "function",
            TypeKind::Primitive => "primitive",
            TypeKind::Unknown => "unknown",
        }
    }

    /// Kinds that can own members and act as receivers
    pub fn is_classifier(&self) -> bool {
        matches!(
            self,
            TypeKind::Class | TypeKind::Interface | TypeKind::Enum | TypeKind::Annotation
        )
    }
}

/// JVM type as it appears in member signatures.
///
/// Class names are dotted and fully qualified (`java.lang.String`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JvmType {
    Primitive(String),
    Void,
    Class { name: String, args: Vec<JvmType> },
    Array(Box<JvmType>),
    TypeVar(String),
    /// `?`, `? extends T` (`upper`) or `? super T` (`lower`)
    Wildcard {
        upper: Option<Box<JvmType>>,
        lower: Option<Box<JvmType>>,
    },
}

impl JvmType {
    pub fn class(name: impl Into<String>) -> Self {
        JvmType::Class {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<JvmType>) -> Self {
        JvmType::Class {
            name: name.into(),
            args,
        }
    }

    /// Qualified name usable as a SymbolIndex key, if this type has one
    pub fn qualified_name(&self) -> Option<&str> {
        match self {
            JvmType::Primitive(name) => Some(name),
            JvmType::Void => Some("void"),
            JvmType::Class { name, .. } => Some(name),
            JvmType::Wildcard { upper: Some(t), .. } | JvmType::Wildcard { lower: Some(t), .. } => {
                t.qualified_name()
            }
            _ => None,
        }
    }

    /// Type arguments of a class type (empty otherwise)
    pub fn args(&self) -> &[JvmType] {
        match self {
            JvmType::Class { args, .. } => args,
            _ => &[],
        }
    }

    /// Strip use-site variance: `? super T` and `? extends T` become `T`
    pub fn without_variance(&self) -> &JvmType {
        match self {
            JvmType::Wildcard { upper: Some(t), .. } => t.without_variance(),
            JvmType::Wildcard { lower: Some(t), .. } => t.without_variance(),
            other => other,
        }
    }
}

impl fmt::Display for JvmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JvmType::Primitive(name) => write!(f, "{}", name),
            JvmType::Void => write!(f, "void"),
            JvmType::Class { name, args } => {
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            JvmType::Array(elem) => write!(f, "{}[]", elem),
            JvmType::TypeVar(name) => write!(f, "{}", name),
            JvmType::Wildcard { upper: Some(t), .. } => write!(f, "? extends {}", t),
            JvmType::Wildcard { lower: Some(t), .. } => write!(f, "? super {}", t),
            JvmType::Wildcard { .. } => write!(f, "?"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Method,
    Field,
    Constructor,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberSignature {
    pub name: String,
    pub kind: MemberKind,
    pub parameters: Vec<JvmType>,
    pub return_type: JvmType,
    pub is_static: bool,
}

impl MemberSignature {
    pub fn method(name: impl Into<String>, parameters: Vec<JvmType>, return_type: JvmType) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Method,
            parameters,
            return_type,
            is_static: false,
        }
    }

    pub fn field(name: impl Into<String>, ty: JvmType) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Field,
            parameters: Vec::new(),
            return_type: ty,
            is_static: false,
        }
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

/// JVM accessor names for a Kotlin property: `getX`, `isX`, `setX`
pub fn accessor_names(property: &str) -> Vec<String> {
    let mut chars = property.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => return Vec::new(),
    };
    vec![
        format!("get{}", capitalized),
        format!("is{}", capitalized),
        format!("set{}", capitalized),
    ]
}

/// Where a descriptor came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// Decoded from the classpath entry at this index
    Classpath { entry: usize },
    /// Kotlin builtin or JVM primitive
    Builtin,
    /// Synthesized from a script definition's template
    ScriptTemplate,
    /// Member view assembled from an owner type's descriptor
    Member,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub kind: TypeKind,
    pub qualified_name: String,
    /// Direct supertypes (superclass first, then interfaces), by name only
    pub supertypes: Vec<String>,
    pub members: Vec<MemberSignature>,
    pub origin: Origin,
}

impl TypeDescriptor {
    pub fn new(kind: TypeKind, qualified_name: impl Into<String>, origin: Origin) -> Self {
        Self {
            kind,
            qualified_name: qualified_name.into(),
            supertypes: Vec::new(),
            members: Vec::new(),
            origin,
        }
    }

    pub fn with_supertypes<I, S>(mut self, supertypes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supertypes = supertypes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_member(mut self, member: MemberSignature) -> Self {
        self.members.push(member);
        self
    }

    /// Simple (unqualified) name
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }

    /// Package part of the qualified name
    pub fn package(&self) -> &str {
        self.qualified_name
            .rsplit_once('.')
            .map(|(pkg, _)| pkg)
            .unwrap_or("")
    }

    /// Members declared directly on this type with the given name
    pub fn members_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MemberSignature> + 'a {
        self.members.iter().filter(move |m| m.name == name)
    }
}

/// Outcome of a SymbolIndex query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(Arc<TypeDescriptor>),
    Unresolved,
}

impl Resolution {
    pub fn descriptor(&self) -> Option<&Arc<TypeDescriptor>> {
        match self {
            Resolution::Resolved(d) => Some(d),
            Resolution::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessor_names() {
        assert_eq!(
            accessor_names("version"),
            vec!["getVersion", "isVersion", "setVersion"]
        );
        assert!(accessor_names("").is_empty());
    }

    #[test]
    fn test_simple_name_and_package() {
        let d = TypeDescriptor::new(
            TypeKind::Interface,
            "org.gradle.plugin.use.PluginDependenciesSpec",
            Origin::Classpath { entry: 0 },
        );
        assert_eq!(d.simple_name(), "PluginDependenciesSpec");
        assert_eq!(d.package(), "org.gradle.plugin.use");
    }

    #[test]
    fn test_jvm_type_display_and_variance() {
        let action = JvmType::generic(
            "org.gradle.api.Action",
            vec![JvmType::Wildcard {
                upper: None,
                lower: Some(Box::new(JvmType::class("org.gradle.api.Project"))),
            }],
        );
        assert_eq!(action.to_string(), "org.gradle.api.Action<? super org.gradle.api.Project>");
        assert_eq!(
            action.args()[0].without_variance().qualified_name(),
            Some("org.gradle.api.Project")
        );
    }

    #[test]
    fn test_members_named_filters_overloads() {
        let d = TypeDescriptor::new(TypeKind::Class, "a.B", Origin::Builtin)
            .with_member(MemberSignature::method("id", vec![JvmType::class("java.lang.String")], JvmType::Void))
            .with_member(MemberSignature::method("id", vec![], JvmType::Void))
            .with_member(MemberSignature::method("kotlin", vec![], JvmType::Void));
        assert_eq!(d.members_named("id").count(), 2);
    }
}
