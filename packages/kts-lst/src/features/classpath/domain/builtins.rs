//! Fallback descriptors
//!
//! Consulted only after every classpath entry misses: Kotlin builtins, JVM
//! primitives, the two `java.lang` types scripts touch implicitly, and the
//! script templates that declare the top-level `plugins`, `buildscript` and
//! `pluginManagement` blocks.

use std::sync::Arc;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use super::type_descriptor::{JvmType, MemberSignature, Origin, TypeDescriptor, TypeKind};

pub const KOTLIN_BUILD_SCRIPT: &str = "org.gradle.kotlin.dsl.KotlinBuildScript";
pub const KOTLIN_SETTINGS_SCRIPT: &str = "org.gradle.kotlin.dsl.KotlinSettingsScript";
pub const PROJECT: &str = "org.gradle.api.Project";
pub const SETTINGS: &str = "org.gradle.api.initialization.Settings";

pub const PLUGIN_DEPENDENCIES_SPEC: &str = "org.gradle.plugin.use.PluginDependenciesSpec";
pub const SCRIPT_HANDLER_SCOPE: &str = "org.gradle.kotlin.dsl.ScriptHandlerScope";
pub const PLUGIN_MANAGEMENT_SPEC: &str = "org.gradle.plugin.management.PluginManagementSpec";

pub const FUNCTION1: &str = "kotlin.jvm.functions.Function1";
pub const ACTION: &str = "org.gradle.api.Action";

pub const KOTLIN_STRING: &str = "kotlin.String";
pub const KOTLIN_INT: &str = "kotlin.Int";
pub const KOTLIN_LONG: &str = "kotlin.Long";
pub const KOTLIN_DOUBLE: &str = "kotlin.Double";
pub const KOTLIN_FLOAT: &str = "kotlin.Float";
pub const KOTLIN_BOOLEAN: &str = "kotlin.Boolean";
pub const KOTLIN_CHAR: &str = "kotlin.Char";
pub const KOTLIN_UNIT: &str = "kotlin.Unit";
pub const KOTLIN_ANY: &str = "kotlin.Any";
pub const KOTLIN_NOTHING: &str = "kotlin.Nothing";

const JVM_PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// Kotlin view of a JVM type name
pub fn jvm_to_kotlin(name: &str) -> Option<&'static str> {
    Some(match name {
        "java.lang.String" => KOTLIN_STRING,
        "java.lang.Object" => KOTLIN_ANY,
        "int" | "java.lang.Integer" => KOTLIN_INT,
        "long" | "java.lang.Long" => KOTLIN_LONG,
        "double" | "java.lang.Double" => KOTLIN_DOUBLE,
        "float" | "java.lang.Float" => KOTLIN_FLOAT,
        "boolean" | "java.lang.Boolean" => KOTLIN_BOOLEAN,
        "char" | "java.lang.Character" => KOTLIN_CHAR,
        "void" => KOTLIN_UNIT,
        _ => return None,
    })
}

fn any_members() -> Vec<MemberSignature> {
    vec![
        MemberSignature::method("toString", vec![], JvmType::class(KOTLIN_STRING)),
        MemberSignature::method("hashCode", vec![], JvmType::class(KOTLIN_INT)),
        MemberSignature::method("equals", vec![JvmType::class(KOTLIN_ANY)], JvmType::class(KOTLIN_BOOLEAN)),
    ]
}

fn builtin(kind: TypeKind, name: &str) -> TypeDescriptor {
    TypeDescriptor::new(kind, name, Origin::Builtin)
}

/// `Function1<Receiver, Unit>` block parameter
fn block_of(receiver: &str) -> JvmType {
    JvmType::generic(
        FUNCTION1,
        vec![JvmType::class(receiver), JvmType::class(KOTLIN_UNIT)],
    )
}

fn template_block(name: &str, receiver: &str) -> MemberSignature {
    MemberSignature::method(name, vec![block_of(receiver)], JvmType::class(KOTLIN_UNIT))
}

static BUILTINS: Lazy<FxHashMap<String, Arc<TypeDescriptor>>> = Lazy::new(|| {
    let mut descriptors = vec![
        builtin(TypeKind::Class, KOTLIN_ANY),
        builtin(TypeKind::Class, KOTLIN_STRING)
            .with_supertypes([KOTLIN_ANY, "kotlin.CharSequence", "kotlin.Comparable"])
            .with_member(MemberSignature::field("length", JvmType::class(KOTLIN_INT)))
            .with_member(MemberSignature::method(
                "plus",
                vec![JvmType::class(KOTLIN_ANY)],
                JvmType::class(KOTLIN_STRING),
            )),
        builtin(TypeKind::Class, KOTLIN_INT).with_supertypes([KOTLIN_ANY, "kotlin.Number"]),
        builtin(TypeKind::Class, KOTLIN_LONG).with_supertypes([KOTLIN_ANY, "kotlin.Number"]),
        builtin(TypeKind::Class, KOTLIN_DOUBLE).with_supertypes([KOTLIN_ANY, "kotlin.Number"]),
        builtin(TypeKind::Class, KOTLIN_FLOAT).with_supertypes([KOTLIN_ANY, "kotlin.Number"]),
        builtin(TypeKind::Class, KOTLIN_BOOLEAN).with_supertypes([KOTLIN_ANY]),
        builtin(TypeKind::Class, KOTLIN_CHAR).with_supertypes([KOTLIN_ANY]),
        builtin(TypeKind::Class, KOTLIN_UNIT).with_supertypes([KOTLIN_ANY]),
        builtin(TypeKind::Class, KOTLIN_NOTHING),
        builtin(TypeKind::Class, "kotlin.UInt").with_supertypes([KOTLIN_ANY]),
        builtin(TypeKind::Class, "kotlin.ULong").with_supertypes([KOTLIN_ANY]),
        builtin(TypeKind::Class, "kotlin.Array").with_supertypes([KOTLIN_ANY]),
        builtin(TypeKind::Class, "java.lang.Object"),
        builtin(TypeKind::Class, "java.lang.String").with_supertypes(["java.lang.Object"]),
    ];
    for descriptor in descriptors.iter_mut() {
        if descriptor.qualified_name == KOTLIN_ANY || descriptor.qualified_name == "java.lang.Object" {
            descriptor.members = any_members();
        }
    }
    descriptors.extend(JVM_PRIMITIVES.iter().map(|p| builtin(TypeKind::Primitive, p)));

    descriptors
        .into_iter()
        .map(|d| (d.qualified_name.clone(), Arc::new(d)))
        .collect()
});

static SCRIPT_TEMPLATES: Lazy<FxHashMap<String, Arc<TypeDescriptor>>> = Lazy::new(|| {
    let build = TypeDescriptor::new(TypeKind::Class, KOTLIN_BUILD_SCRIPT, Origin::ScriptTemplate)
        .with_supertypes([KOTLIN_ANY])
        .with_member(template_block("plugins", PLUGIN_DEPENDENCIES_SPEC))
        .with_member(template_block("buildscript", SCRIPT_HANDLER_SCOPE));
    let settings = TypeDescriptor::new(TypeKind::Class, KOTLIN_SETTINGS_SCRIPT, Origin::ScriptTemplate)
        .with_supertypes([KOTLIN_ANY])
        .with_member(template_block("plugins", PLUGIN_DEPENDENCIES_SPEC))
        .with_member(template_block("buildscript", SCRIPT_HANDLER_SCOPE))
        .with_member(template_block("pluginManagement", PLUGIN_MANAGEMENT_SPEC));

    [build, settings]
        .into_iter()
        .map(|d| (d.qualified_name.clone(), Arc::new(d)))
        .collect()
});

/// Builtin descriptor by qualified name.
///
/// `kotlin.jvm.functions.FunctionN` types are synthesized on demand.
pub fn builtin_descriptor(name: &str) -> Option<Arc<TypeDescriptor>> {
    if let Some(descriptor) = BUILTINS.get(name) {
        return Some(Arc::clone(descriptor));
    }
    function_arity(name).map(|_| Arc::new(builtin(TypeKind::Function, name)))
}

/// `N` of `kotlin.jvm.functions.FunctionN`
pub fn function_arity(name: &str) -> Option<usize> {
    name.strip_prefix("kotlin.jvm.functions.Function")
        .filter(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
        .and_then(|n| n.parse().ok())
}

/// Script template descriptor by qualified name
pub fn script_template_descriptor(name: &str) -> Option<Arc<TypeDescriptor>> {
    SCRIPT_TEMPLATES.get(name).cloned()
}
