use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::Deserialize;
use serde_isc::{from_str, parse_str, MergeOptions, Scanner};

#[derive(Deserialize)]
#[allow(dead_code)]
struct Server {
    port: u16,
    host: String,
    clients: Vec<String>,
}

fn config_with_sections(count: usize) -> String {
    let mut text = String::new();
    for i in 0..count {
        text.push_str(&format!(
            "server{i} {{\n\tport {port};\n\thost \"host{i}.example.com\";\n\tclients {{ \"nas1\"; \"nas2\"; {i}; }};\n}};\n",
            i = i,
            port = 1812 + i
        ));
    }
    text
}

fn benchmark_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    for size in [10, 100, 1000].iter() {
        let text = config_with_sections(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| Scanner::new(black_box(text.as_bytes())).count())
        });
    }

    group.finish();
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in [10, 100, 1000].iter() {
        let text = config_with_sections(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| parse_str(black_box(text)))
        });
    }

    group.finish();
}

fn benchmark_deserialize(c: &mut Criterion) {
    let text = "port 1812;\nhost \"radius.example.com\";\nclients { \"nas1\"; \"nas2\"; };";

    c.bench_function("deserialize_server", |b| {
        b.iter(|| from_str::<Server>(black_box(text)))
    });
}

fn benchmark_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for size in [10, 100, 1000].iter() {
        let defaults = parse_str(&config_with_sections(*size)).unwrap();
        let config = parse_str(&config_with_sections(size / 2)).unwrap();

        group.bench_with_input(BenchmarkId::new("fill_defaults", size), &defaults, |b, d| {
            b.iter(|| config.merged_with(black_box(d), &MergeOptions::fill_defaults()))
        });
        group.bench_with_input(BenchmarkId::new("overlay", size), &defaults, |b, d| {
            b.iter(|| config.merged_with(black_box(d), &MergeOptions::overlay()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_scan,
    benchmark_parse,
    benchmark_deserialize,
    benchmark_merge
);
criterion_main!(benches);
