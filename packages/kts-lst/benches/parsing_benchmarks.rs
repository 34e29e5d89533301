//! Benchmarks for parsing performance
//!
//! Run with: cargo bench --bench parsing_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kts_lst::{
    parse_and_attribute, print, ClasspathResolver, GradleKtsParser, ParserConfig, ScriptDefinition, SourceInput,
};

/// Generate a build script with N property declarations
fn generate_properties(count: usize) -> String {
    (0..count)
        .map(|i| format!("val value{i}: String = \"v{i}\"\n"))
        .collect()
}

/// Generate a build script with N task registrations
fn generate_tasks(count: usize) -> String {
    (0..count)
        .map(|i| {
            format!(
                r#"tasks.register("task{i}") {{
    group = "custom"
    doLast {{
        println("running {i}")
    }}
}}

"#
            )
        })
        .collect()
}

fn parse(source: &str, resolver: &ClasspathResolver) {
    let result = parse_and_attribute(
        source,
        "build.gradle.kts",
        resolver,
        &ScriptDefinition::build_script(),
        &ParserConfig::default(),
    );
    black_box(result.ok());
}

/// Benchmark flat declarations
fn bench_parse_properties(c: &mut Criterion) {
    let resolver = ClasspathResolver::new(Vec::new());
    let mut group = c.benchmark_group("parse_properties");

    for size in [10, 100, 1000].iter() {
        let source = generate_properties(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, src| {
            b.iter(|| parse(black_box(src), &resolver));
        });
    }

    group.finish();
}

/// Benchmark nested lambda blocks
fn bench_parse_tasks(c: &mut Criterion) {
    let resolver = ClasspathResolver::new(Vec::new());
    let mut group = c.benchmark_group("parse_tasks");

    for size in [10, 50, 200].iter() {
        let source = generate_tasks(*size);

        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, src| {
            b.iter(|| parse(black_box(src), &resolver));
        });
    }

    group.finish();
}

/// Benchmark printing an already built tree
fn bench_print(c: &mut Criterion) {
    let resolver = ClasspathResolver::new(Vec::new());
    let source = generate_tasks(100);
    let result = match parse_and_attribute(
        &source,
        "build.gradle.kts",
        &resolver,
        &ScriptDefinition::build_script(),
        &ParserConfig::default(),
    ) {
        Ok(result) => result,
        Err(e) => panic!("benchmark input failed to parse: {}", e),
    };

    c.bench_function("print_tasks_100", |b| {
        b.iter(|| print(black_box(&result.root)));
    });
}

/// Benchmark batch parsing on the worker pool
fn bench_parse_inputs(c: &mut Criterion) {
    let parser = match GradleKtsParser::builder().build() {
        Ok(parser) => parser,
        Err(e) => panic!("cannot build parser: {}", e),
    };
    let inputs: Vec<SourceInput> = (0..32)
        .map(|i| SourceInput::new(format!("module{i}/build.gradle.kts"), generate_tasks(20)))
        .collect();

    c.bench_function("parse_inputs_32_files", |b| {
        b.iter(|| black_box(parser.parse_inputs(black_box(&inputs))));
    });
}

criterion_group!(
    benches,
    bench_parse_properties,
    bench_parse_tasks,
    bench_print,
    bench_parse_inputs,
);

criterion_main!(benches);
