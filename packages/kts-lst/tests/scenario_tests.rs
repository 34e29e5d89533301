//! End-to-end scenarios: empty input, unresolved and resolved plugin DSL,
//! missing classpath entries, syntax errors

mod common;

use common::*;
use kts_lst::{DiagnosticKind, LstKind, Severity, TypeKind, TypeRef};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn test_empty_source_gives_empty_root() {
    let result = parse_build_script("", &[]);

    assert_eq!(result.root.kind(), &LstKind::SourceFile);
    assert!(result.root.children().is_empty());
    assert_eq!(result.root.prefix(), "");
    assert!(result.diagnostics.is_empty());
    assert_round_trip(&result, "");
}

#[test]
fn test_plugin_id_unresolved_without_classpath() {
    let result = parse_build_script(PLUGINS_BLOCK, &[]);

    assert_round_trip(&result, PLUGINS_BLOCK);
    assert_eq!(unresolved_names(&result), vec!["id".to_string()]);

    let id = find_call(&result.root, "id");
    assert_eq!(id.type_ref(), Some(&TypeRef::unresolved("id")));

    // the template still knows `plugins`
    let plugins = find_call(&result.root, "plugins");
    assert_eq!(resolved_name(plugins), Some("kotlin.Unit"));

    let literal = result.root.descendants(&LstKind::StringLiteral).next().unwrap();
    assert_eq!(resolved_name(literal), Some("kotlin.String"));

    let warning = result.diagnostics_of(DiagnosticKind::SymbolUnresolved).next().unwrap();
    assert_eq!(warning.severity, Severity::Warning);
    assert_eq!(warning.node, Some(id.id()));
}

#[test]
fn test_plugin_id_resolves_with_plugin_dsl_on_classpath() {
    let dir = TempDir::new().unwrap();
    write_class_dir(dir.path(), &plugin_dsl_classes());

    let result = parse_build_script(PLUGINS_BLOCK, &[dir.path()]);

    assert_round_trip(&result, PLUGINS_BLOCK);
    assert_eq!(result.diagnostics_of(DiagnosticKind::SymbolUnresolved).count(), 0);

    let id = find_call(&result.root, "id");
    assert_eq!(
        id.type_ref(),
        Some(&TypeRef::resolved(PLUGIN_DEPENDENCY_SPEC, TypeKind::Interface))
    );
}

#[test]
fn test_plugin_id_resolves_with_kotlin_compiled_plugin_dsl() {
    let dir = TempDir::new().unwrap();
    write_class_dir(dir.path(), &kotlin_compiled_plugin_dsl_classes());

    let result = parse_build_script(PLUGINS_BLOCK, &[dir.path()]);

    assert_eq!(result.diagnostics_of(DiagnosticKind::SymbolUnresolved).count(), 0);
    assert_eq!(
        find_call(&result.root, "id").type_ref(),
        Some(&TypeRef::resolved(PLUGIN_DEPENDENCY_SPEC, TypeKind::Interface))
    );
}

#[test]
fn test_missing_classpath_entry_is_a_warning() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist");

    let result = parse_build_script("val x = 1\n", &[missing.as_path()]);

    let missing: Vec<_> = result.diagnostics_of(DiagnosticKind::ClasspathEntryMissing).collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].severity, Severity::Warning);
    assert!(!result.has_errors());
    assert_round_trip(&result, "val x = 1\n");
}

#[test]
fn test_unbalanced_brace_round_trips_with_syntax_error() {
    let source = "plugins {\n  id(\"java\")\n";
    let result = parse_build_script(source, &[]);

    assert_round_trip(&result, source);
    assert!(result.diagnostics_of(DiagnosticKind::SyntaxError).count() >= 1);
    assert!(result.has_errors());
}

#[test]
fn test_full_build_script() {
    let dir = TempDir::new().unwrap();
    gradle_api_dir(dir.path());
    let source = fixture_full_build_script();

    let result = parse_build_script(&source, &[dir.path()]);
    assert_round_trip(&result, &source);
    assert_eq!(result.diagnostics_of(DiagnosticKind::SyntaxError).count(), 0);

    let unresolved = unresolved_names(&result);
    assert!(unresolved.contains(&"println".to_string()));
    for name in [
        "id", "version", "apply", "group", "mavenCentral", "tasks", "register", "doLast",
        "describe", "JavaVersion", "plugins", "repositories",
    ] {
        assert!(!unresolved.contains(&name.to_string()), "{} unresolved", name);
    }

    assert_eq!(resolved_name(find_call(&result.root, "mavenCentral")), Some(MAVEN_REPOSITORY));
    assert_eq!(resolved_name(find_call(&result.root, "doLast")), Some(TASK));
    assert_eq!(resolved_name(find_call(&result.root, "describe")), Some("kotlin.String"));

    let declarations: Vec<_> = result.root.descendants(&LstKind::PropertyDeclaration).collect();
    assert_eq!(resolved_name(declarations[0]), Some("org.gradle.api.JavaVersion"));
    assert_eq!(resolved_name(declarations[1]), Some("kotlin.Int"));
}

#[test]
fn test_comments_are_kept_in_prefixes() {
    let source = "// header\nplugins { } /* trailing */\n";
    let result = parse_build_script(source, &[]);

    assert_round_trip(&result, source);
    let plugins = find_call(&result.root, "plugins");
    assert_eq!(plugins.prefix(), "// header\n");
    let eof = result.root.children().last().unwrap();
    assert_eq!(eof.kind(), &LstKind::Eof);
    assert_eq!(eof.prefix(), " /* trailing */\n");
}
