//! Test fixtures: script sources and a miniature Gradle API

use std::path::Path;

use kts_lst::{ClasspathEntry, ClasspathResolver, ParseResult, ParserConfig, ScriptDefinition};

use super::builders::{write_class_dir, ClassFileBuilder};

pub const PLUGINS_BLOCK: &str = "plugins {\n  id(\"java\")\n}\n";

pub const PLUGIN_DEPENDENCIES_SPEC: &str = "org.gradle.plugin.use.PluginDependenciesSpec";
pub const PLUGIN_DEPENDENCY_SPEC: &str = "org.gradle.plugin.use.PluginDependencySpec";
pub const REPOSITORY_HANDLER: &str = "org.gradle.api.artifacts.dsl.RepositoryHandler";
pub const MAVEN_REPOSITORY: &str = "org.gradle.api.artifacts.repositories.MavenArtifactRepository";
pub const TASK_CONTAINER: &str = "org.gradle.api.tasks.TaskContainer";
pub const TASK: &str = "org.gradle.api.Task";
pub const PROJECT_DESCRIPTOR: &str = "org.gradle.api.initialization.ProjectDescriptor";

/// Plugin DSL: `id(String)`, `version(String)`, `apply(Boolean)`
pub fn plugin_dsl_classes() -> Vec<ClassFileBuilder> {
    vec![
        ClassFileBuilder::interface(PLUGIN_DEPENDENCIES_SPEC).method(
            "id",
            "(Ljava/lang/String;)Lorg/gradle/plugin/use/PluginDependencySpec;",
        ),
        ClassFileBuilder::interface(PLUGIN_DEPENDENCY_SPEC)
            .method(
                "version",
                "(Ljava/lang/String;)Lorg/gradle/plugin/use/PluginDependencySpec;",
            )
            .method("apply", "(Z)Lorg/gradle/plugin/use/PluginDependencySpec;"),
    ]
}

/// Plugin DSL as the Kotlin compiler emits it, with `@Metadata` constants
pub fn kotlin_compiled_plugin_dsl_classes() -> Vec<ClassFileBuilder> {
    plugin_dsl_classes()
        .into_iter()
        .map(ClassFileBuilder::kotlin_metadata)
        .collect()
}

/// `PluginDependenciesSpec` without the `PluginDependencySpec` it returns
pub fn partial_plugin_dsl_classes() -> Vec<ClassFileBuilder> {
    plugin_dsl_classes().into_iter().take(1).collect()
}

/// `Project` with an `Action`-taking `repositories` block and a few properties
pub fn project_classes() -> Vec<ClassFileBuilder> {
    vec![
        ClassFileBuilder::interface("org.gradle.api.Project")
            .generic_method(
                "repositories",
                "(Lorg/gradle/api/Action;)V",
                "(Lorg/gradle/api/Action<-Lorg/gradle/api/artifacts/dsl/RepositoryHandler;>;)V",
            )
            .method("getVersion", "()Ljava/lang/Object;")
            .method("setVersion", "(Ljava/lang/Object;)V")
            .method("getGroup", "()Ljava/lang/Object;")
            .method("setGroup", "(Ljava/lang/Object;)V")
            .method("getName", "()Ljava/lang/String;")
            .method("getTasks", "()Lorg/gradle/api/tasks/TaskContainer;")
            .method("file", "(Ljava/lang/Object;)Ljava/io/File;"),
        ClassFileBuilder::interface(TASK_CONTAINER).generic_method(
            "register",
            "(Ljava/lang/String;Lorg/gradle/api/Action;)Lorg/gradle/api/tasks/TaskProvider;",
            "(Ljava/lang/String;Lorg/gradle/api/Action<-Lorg/gradle/api/Task;>;)Lorg/gradle/api/tasks/TaskProvider<Lorg/gradle/api/Task;>;",
        ),
        ClassFileBuilder::interface(TASK).generic_method(
            "doLast",
            "(Lorg/gradle/api/Action;)Lorg/gradle/api/Task;",
            "(Lorg/gradle/api/Action<-Lorg/gradle/api/Task;>;)Lorg/gradle/api/Task;",
        ),
        ClassFileBuilder::interface("org.gradle.api.tasks.TaskProvider").method("getName", "()Ljava/lang/String;"),
        ClassFileBuilder::interface("org.gradle.api.Action").method("execute", "(Ljava/lang/Object;)V"),
        ClassFileBuilder::interface(REPOSITORY_HANDLER).method(
            "mavenCentral",
            "()Lorg/gradle/api/artifacts/repositories/MavenArtifactRepository;",
        ),
        ClassFileBuilder::interface(MAVEN_REPOSITORY).method("getName", "()Ljava/lang/String;"),
        ClassFileBuilder::class("java.io.File").method("getName", "()Ljava/lang/String;"),
        ClassFileBuilder::class("org.gradle.api.JavaVersion")
            .field("VERSION_17", "Lorg/gradle/api/JavaVersion;")
            .method("getMajorVersion", "()Ljava/lang/String;"),
    ]
}

/// `Settings` with `include(String...)` and `rootProject`
pub fn settings_classes() -> Vec<ClassFileBuilder> {
    vec![
        ClassFileBuilder::interface("org.gradle.api.initialization.Settings")
            .method("include", "([Ljava/lang/String;)V")
            .method("getRootProject", "()Lorg/gradle/api/initialization/ProjectDescriptor;"),
        ClassFileBuilder::interface(PROJECT_DESCRIPTOR)
            .method("getName", "()Ljava/lang/String;")
            .method("setName", "(Ljava/lang/String;)V"),
    ]
}

/// Class directory holding every fixture class
pub fn gradle_api_dir(root: &Path) {
    write_class_dir(root, &plugin_dsl_classes());
    write_class_dir(root, &project_classes());
    write_class_dir(root, &settings_classes());
}

/// Parse a build script against the given classpath
pub fn parse_build_script(source: &str, classpath: &[&Path]) -> ParseResult {
    let resolver = ClasspathResolver::new(classpath.iter().map(|p| ClasspathEntry::from_path(*p)));
    kts_lst::parse_and_attribute(
        source,
        "build.gradle.kts",
        &resolver,
        &ScriptDefinition::build_script(),
        &ParserConfig::default(),
    )
    .unwrap()
}

/// A build script exercising most of the grammar
pub fn fixture_full_build_script() -> String {
    r#"import org.gradle.api.JavaVersion
import java.io.File as JFile

plugins {
    id("java") // the java plugin
    id("org.example.tool") version "1.2.3" apply false
}

/* project coordinates */
group = "org.example"
version = "1.0.0-SNAPSHOT"

val javaTarget = JavaVersion.VERSION_17
val answer: Int = 6 * 7

fun describe(name: String): String = "Project $name ($answer)"

repositories {
    mavenCentral()
}

tasks.register("hello") {
    doLast { println(describe("demo")) }
}

for (i in 1..3) {
    println("${'$'}i: ${i * 2}")
}
"#
    .to_string()
}

/// A script with `n` independent statements
pub fn fixture_n_statements(n: usize) -> String {
    (0..n).map(|i| format!("val value{i} = \"v{i}\"\n")).collect()
}
