//! Type name resolution
//!
//! Turns a name as written in a script (`Copy`, `tasks.Copy`, `JavaVersion`)
//! into a descriptor, using the file's package, its imports and the script's
//! default imports. Results are cached for the rest of the pass.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::features::classpath::domain::builtins::{builtin_descriptor, jvm_to_kotlin, KOTLIN_ANY, KOTLIN_UNIT};
use crate::features::classpath::domain::{JvmType, Resolution, TypeDescriptor};
use crate::features::classpath::ports::SymbolResolver;
use crate::shared::models::Result;

pub(crate) struct TypeNames<'a> {
    resolver: &'a dyn SymbolResolver,
    package: Option<String>,
    /// Simple name or alias → qualified name
    explicit: FxHashMap<String, String>,
    wildcards: Vec<String>,
    defaults: Vec<String>,
    cache: FxHashMap<String, Option<Arc<TypeDescriptor>>>,
}

impl<'a> TypeNames<'a> {
    pub(crate) fn new(resolver: &'a dyn SymbolResolver, defaults: &[String]) -> Self {
        Self {
            resolver,
            package: None,
            explicit: FxHashMap::default(),
            wildcards: Vec::new(),
            defaults: defaults.to_vec(),
            cache: FxHashMap::default(),
        }
    }

    pub(crate) fn set_package(&mut self, package: impl Into<String>) {
        self.package = Some(package.into());
        self.cache.clear();
    }

    pub(crate) fn add_import(&mut self, visible_as: impl Into<String>, qualified: impl Into<String>) {
        self.explicit.insert(visible_as.into(), qualified.into());
        self.cache.clear();
    }

    pub(crate) fn add_wildcard(&mut self, package: impl Into<String>) {
        self.wildcards.push(package.into());
        self.cache.clear();
    }

    /// Descriptor for a type name as written in source
    pub(crate) fn resolve(&mut self, name: &str) -> Result<Option<Arc<TypeDescriptor>>> {
        if name.is_empty() {
            return Ok(None);
        }
        if let Some(cached) = self.cache.get(name) {
            return Ok(cached.clone());
        }

        let mut found = None;
        for candidate in self.candidates(name) {
            if let Resolution::Resolved(descriptor) = self.resolver.resolve(&candidate)? {
                found = Some(descriptor);
                break;
            }
        }
        self.cache.insert(name.to_string(), found.clone());
        Ok(found)
    }

    /// Qualified names to try, in order: as written, explicit imports, own
    /// package, wildcard imports, Kotlin builtins, default imports
    fn candidates(&self, name: &str) -> Vec<String> {
        let (head, rest) = match name.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (name, None),
        };
        let mut candidates = Vec::new();

        if rest.is_some() {
            candidates.push(name.to_string());
        }
        if let Some(qualified) = self.explicit.get(head) {
            candidates.push(match rest {
                Some(rest) => format!("{}.{}", qualified, rest),
                None => qualified.clone(),
            });
        }
        for package in self.package.iter().chain(&self.wildcards) {
            candidates.push(format!("{}.{}", package, name));
        }
        // kotlin.String shadows java.lang.String
        if rest.is_none() {
            let builtin = format!("kotlin.{}", name);
            if builtin_descriptor(&builtin).is_some() {
                candidates.push(builtin);
            }
        }
        for package in &self.defaults {
            candidates.push(format!("{}.{}", package, name));
        }
        candidates
    }
}

/// Kotlin-facing name of a JVM member type
pub(crate) fn kotlin_type_name(ty: &JvmType) -> String {
    match ty.without_variance() {
        JvmType::Void => KOTLIN_UNIT.to_string(),
        JvmType::Primitive(name) => jvm_to_kotlin(name).unwrap_or(name.as_str()).to_string(),
        JvmType::Class { name, .. } => jvm_to_kotlin(name).unwrap_or(name.as_str()).to_string(),
        JvmType::Array(_) => "kotlin.Array".to_string(),
        JvmType::TypeVar(_) | JvmType::Wildcard { .. } => KOTLIN_ANY.to_string(),
    }
}
