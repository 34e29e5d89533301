//! Attribution: scoping, receivers, fault isolation, idempotence, and
//! resolved types always naming an index entry

mod common;

use common::*;
use kts_lst::features::type_resolution::attribute;
use kts_lst::{
    ClasspathEntry, ClasspathResolver, DiagnosticKind, LstKind, ParserConfig, ScriptDefinition, Severity,
    TypeRef,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tempfile::TempDir;

fn with_gradle_api(source: &str) -> (TempDir, kts_lst::ParseResult) {
    let dir = TempDir::new().unwrap();
    gradle_api_dir(dir.path());
    let result = parse_build_script(source, &[dir.path()]);
    (dir, result)
}

fn declaration_types(result: &kts_lst::ParseResult) -> Vec<Option<String>> {
    result
        .root
        .descendants(&LstKind::PropertyDeclaration)
        .map(|d| resolved_name(d).map(str::to_string))
        .collect()
}

#[test]
fn test_attribution_is_idempotent() {
    let dir = TempDir::new().unwrap();
    gradle_api_dir(dir.path());
    let source = fixture_full_build_script();
    let resolver = ClasspathResolver::new(vec![ClasspathEntry::from_path(dir.path())]);
    let result = parse_build_script(&source, &[dir.path()]);

    let config = ParserConfig::default();
    let script = ScriptDefinition::build_script()
        .with_default_imports(config.default_imports.clone())
        .bind(&resolver)
        .unwrap();
    let mut again = result.root.clone();
    let diagnostics = attribute(&mut again, &resolver, &script, config.unresolved_severity).unwrap();

    assert_eq!(again, result.root);
    let first: Vec<_> = result
        .diagnostics_of(DiagnosticKind::SymbolUnresolved)
        .cloned()
        .collect();
    assert_eq!(diagnostics, first);
}

#[test]
fn test_unknown_receiver_reported_once() {
    let source = "val a = missing.foo.bar\nval b = 1\n";
    let result = parse_build_script(source, &[]);

    assert_eq!(unresolved_names(&result), vec!["missing".to_string()]);
    let types = declaration_types(&result);
    assert_eq!(types[1].as_deref(), Some("kotlin.Int"));

    let navigation = result.root.descendants(&LstKind::Navigation).next().unwrap();
    assert_eq!(navigation.type_ref(), Some(&TypeRef::unresolved("bar")));
}

#[test]
fn test_error_in_one_statement_leaves_others_typed() {
    let source = "val a = nope()\nval b = \"text\"\nval c = 2.5\n";
    let result = parse_build_script(source, &[]);

    assert_eq!(unresolved_names(&result), vec!["nope".to_string()]);
    assert_eq!(
        declaration_types(&result),
        vec![None, Some("kotlin.String".to_string()), Some("kotlin.Double".to_string())]
    );
}

#[test]
fn test_local_shadows_receiver_property() {
    let (_dir, result) = with_gradle_api("val version = 3\nval v = version\n");
    assert_eq!(
        declaration_types(&result),
        vec![Some("kotlin.Int".to_string()), Some("kotlin.Int".to_string())]
    );
}

#[test]
fn test_receiver_property_without_local() {
    let (_dir, result) = with_gradle_api("val v = version\nval n = name\n");
    assert!(unresolved_names(&result).is_empty());
    assert_eq!(
        declaration_types(&result),
        vec![Some("kotlin.Any".to_string()), Some("kotlin.String".to_string())]
    );
}

#[test]
fn test_action_lambda_receiver() {
    let (_dir, result) = with_gradle_api("repositories {\n    mavenCentral()\n}\n");
    assert!(unresolved_names(&result).is_empty());
    assert_eq!(resolved_name(find_call(&result.root, "repositories")), Some("kotlin.Unit"));
    assert_eq!(resolved_name(find_call(&result.root, "mavenCentral")), Some(MAVEN_REPOSITORY));
}

#[test]
fn test_receiver_not_visible_outside_lambda() {
    let (_dir, result) = with_gradle_api("repositories { }\nmavenCentral()\n");
    assert_eq!(unresolved_names(&result), vec!["mavenCentral".to_string()]);
}

#[test]
fn test_import_alias() {
    let source = "import java.io.File as JFile\nval f: JFile = file(\"x\")\n";
    let (_dir, result) = with_gradle_api(source);

    assert!(unresolved_names(&result).is_empty());
    let import = result.root.descendants(&LstKind::Import).next().unwrap();
    assert_eq!(resolved_name(import), Some("java.io.File"));
    assert_eq!(declaration_types(&result), vec![Some("java.io.File".to_string())]);
}

#[test]
fn test_unresolved_import_is_reported() {
    let result = parse_build_script("import org.nowhere.Thing\n", &[]);
    assert_eq!(unresolved_names(&result), vec!["org.nowhere.Thing".to_string()]);
}

#[test]
fn test_script_function_visible_before_declaration() {
    let source = "val greeting = greet()\nfun greet(): String = \"hi\"\n";
    let result = parse_build_script(source, &[]);

    assert!(unresolved_names(&result).is_empty());
    assert_eq!(resolved_name(find_call(&result.root, "greet")), Some("kotlin.String"));
}

#[test]
fn test_function_parameters_are_scoped() {
    let source = "fun twice(n: Int) = n * 2\nval leaked = n\n";
    let result = parse_build_script(source, &[]);
    assert_eq!(unresolved_names(&result), vec!["n".to_string()]);
}

#[test]
fn test_strict_severity_promotes_unresolved() {
    let resolver = ClasspathResolver::new(Vec::new());
    let config = ParserConfig::default().with_unresolved_severity(Severity::Error);
    let result = kts_lst::parse_and_attribute(
        PLUGINS_BLOCK,
        "build.gradle.kts",
        &resolver,
        &ScriptDefinition::build_script(),
        &config,
    )
    .unwrap();

    let unresolved: Vec<_> = result.diagnostics_of(DiagnosticKind::SymbolUnresolved).collect();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].severity, Severity::Error);
    assert!(result.has_errors());
}

#[test]
fn test_missing_return_type_is_unresolved_and_reported() {
    let dir = TempDir::new().unwrap();
    write_class_dir(dir.path(), &partial_plugin_dsl_classes());
    let source = "plugins {\n  id(\"java\") version \"1.0\"\n}\n";

    let result = parse_build_script(source, &[dir.path()]);

    // `id` exists but returns a type the classpath lacks; `version` on it
    // is a cascade
    assert_eq!(unresolved_names(&result), vec![PLUGIN_DEPENDENCY_SPEC.to_string()]);
    let id = find_call(&result.root, "id");
    assert_eq!(id.type_ref(), Some(&TypeRef::unresolved(PLUGIN_DEPENDENCY_SPEC)));
    let infix = result.root.descendants(&LstKind::Infix).next().unwrap();
    assert!(!infix.type_ref().unwrap().is_resolved());

    let resolver = ClasspathResolver::new(vec![ClasspathEntry::from_path(dir.path())]);
    assert!(dangling_resolved_refs(&result.root, &resolver).is_empty());
}

#[test]
fn test_full_script_refs_name_index_entries() {
    let dir = TempDir::new().unwrap();
    gradle_api_dir(dir.path());
    let result = parse_build_script(&fixture_full_build_script(), &[dir.path()]);

    let resolver = ClasspathResolver::new(vec![ClasspathEntry::from_path(dir.path())]);
    assert_eq!(dangling_resolved_refs(&result.root, &resolver), Vec::<String>::new());
}

#[test]
fn test_deeply_nested_expression() {
    let depth = 1000;
    let source = format!("val x = {}1{}\nval y = \"after\"\n", "(".repeat(depth), ")".repeat(depth));

    let result = parse_build_script(&source, &[]);

    assert_round_trip(&result, &source);
    let declarations: Vec<_> = result.root.descendants(&LstKind::PropertyDeclaration).collect();
    assert_eq!(resolved_name(declarations[0]), Some("kotlin.Int"));
    assert_eq!(resolved_name(declarations[1]), Some("kotlin.String"));
}

/// Statements over the fixture API, some of which cannot resolve
fn statement() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("plugins { id(\"java\") version \"1.0\" apply false }\n"),
        Just("repositories { mavenCentral().name }\n"),
        Just("tasks.register(\"t\") { doLast { println(name) } }\n"),
        Just("val v = version\n"),
        Just("val f = file(\"x\").name\n"),
        Just("val j = JavaVersion.VERSION_17.majorVersion\n"),
        Just("import org.gradle.api.JavaVersion\n"),
        Just("fun g(n: Int): Missing = n\nval r = g(1)\n"),
        Just("val m = missing.call().chain\n"),
        Just("val s = \"a\" + 1\n"),
        Just("for (i in 1..2) { val k = i }\n"),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_resolved_refs_name_index_entries(
        parts in prop::collection::vec(statement(), 1..8),
        full_api in any::<bool>(),
    ) {
        let dir = TempDir::new().unwrap();
        if full_api {
            gradle_api_dir(dir.path());
        } else {
            write_class_dir(dir.path(), &partial_plugin_dsl_classes());
        }
        let source = parts.concat();

        let result = parse_build_script(&source, &[dir.path()]);

        let resolver = ClasspathResolver::new(vec![ClasspathEntry::from_path(dir.path())]);
        prop_assert_eq!(dangling_resolved_refs(&result.root, &resolver), Vec::<String>::new());
        prop_assert_eq!(result.print(), source);
    }
}
