//! Parser Performance Benchmarks
//!
//! - Lexer throughput (bytes/second)
//! - Parser throughput for the whole pipeline
//! - Call disambiguation on call-heavy input

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use egram_parser::{Parser, ParserConfig};

const SITE_PROGRAM: &str = include_str!("../fixtures/site.egram");

/// The fixture repeated `times` times
fn repeated(times: usize) -> String {
    let mut source = String::with_capacity(SITE_PROGRAM.len() * times);
    for _ in 0..times {
        source.push_str(SITE_PROGRAM);
        source.push('\n');
    }
    source
}

fn programs() -> Vec<(&'static str, String)> {
    vec![
        ("small", repeated(1)),
        ("medium", repeated(20)),
        ("large", repeated(200)),
    ]
}

// ============================================================================
// Lexer Benchmarks
// ============================================================================

fn bench_lexer_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_throughput");

    for (name, source) in programs() {
        group.throughput(Throughput::Bytes(source.len() as u64));

        group.bench_with_input(BenchmarkId::new("tokenize", name), &source, |b, source| {
            b.iter(|| {
                let lexer = egram_lexer::Lexer::new(black_box(source));
                let (tokens, _errors) = lexer.tokenize();
                black_box(tokens)
            })
        });
    }

    group.finish();
}

// ============================================================================
// Parser Benchmarks
// ============================================================================

fn bench_parser_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_throughput");

    for (name, source) in programs() {
        group.throughput(Throughput::Bytes(source.len() as u64));

        group.bench_with_input(BenchmarkId::new("parse", name), &source, |b, source| {
            b.iter(|| black_box(egram_parser::parse(black_box(source))))
        });
    }

    group.finish();
}

fn bench_call_disambiguation(c: &mut Criterion) {
    let mut group = c.benchmark_group("call_disambiguation");

    let statement_calls: String = (0..500)
        .map(|i| format!("notice fqdn_rand({}), 'x'\nfoo($a, [1, 2]) |$x| {{ bar $x }}\n", i))
        .collect();
    let method_chains: String = (0..500)
        .map(|i| format!("$v = $list.map |$x| {{ $x + {} }}.filter |$y| {{ $y > 1 }}.size\n", i))
        .collect();

    for (name, source) in [("statement_calls", statement_calls), ("method_chains", method_chains)] {
        group.throughput(Throughput::Bytes(source.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(name), &source, |b, source| {
            b.iter(|| {
                let mut parser = Parser::with_config(black_box(source), ParserConfig::default());
                black_box(parser.parse_program())
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_lexer_throughput,
    bench_parser_throughput,
    bench_call_disambiguation,
);
criterion_main!(benches);
