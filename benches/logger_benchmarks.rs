//! Criterion benchmarks for kvlog

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use kvlog::prelude::*;
use kvlog::sinks::DiscardSink;
use kvlog::{Entry, KeyValueEncoder};
use std::time::Duration;

fn discard_logger(level: Level) -> Logger {
    Logger::builder()
        .min_level(level)
        .sink(DiscardSink)
        .disable_stacktrace()
        .build()
}

// ============================================================================
// Encoding Benchmarks
// ============================================================================

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");
    group.throughput(Throughput::Elements(1));

    let encoder = KeyValueEncoder::new(EncoderConfig::default());
    let entry = Entry::new(Level::Info, "request handled");
    let fields = [
        Field::string("path", "/users/42"),
        Field::int("status", 200),
        Field::duration("elapsed", Duration::from_micros(1530)),
    ];

    group.bench_function("no_fields", |b| {
        b.iter(|| black_box(encoder.encode_entry(black_box(&entry), &[])));
    });

    group.bench_function("three_fields", |b| {
        b.iter(|| black_box(encoder.encode_entry(black_box(&entry), black_box(&fields))));
    });

    let mut with_context = encoder.clone();
    with_context.add_fields(&[Field::string("request_id", "9f1c"), Field::string("service", "api")]);
    group.bench_function("context_plus_fields", |b| {
        b.iter(|| black_box(with_context.encode_entry(black_box(&entry), black_box(&fields))));
    });

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let logger = discard_logger(Level::Debug);
    group.bench_function("info_enabled", |b| {
        b.iter(|| logger.info(black_box("Info message"), &[Field::int("n", 1)]));
    });

    let child = logger.named("bench").with(&[Field::string("request_id", "9f1c")]);
    group.bench_function("info_derived", |b| {
        b.iter(|| child.info(black_box("Info message"), &[]));
    });

    let cx = context::attach(&Context::background(), logger.clone());
    group.bench_function("info_via_context", |b| {
        b.iter(|| context::info(&cx, black_box("Info message"), &[]));
    });

    let sugar = logger.sugar();
    group.bench_function("infow_sugared", |b| {
        b.iter(|| sugar.infow(black_box("Info message"), [("n", 1)]));
    });

    group.finish();
}

// ============================================================================
// Suppressed Call Benchmarks
// ============================================================================

fn bench_suppressed(c: &mut Criterion) {
    let mut group = c.benchmark_group("suppressed");
    group.throughput(Throughput::Elements(1));

    let logger = discard_logger(Level::Error);
    group.bench_function("check", |b| {
        b.iter(|| black_box(logger.check(Level::Debug, black_box("dropped")).is_none()));
    });

    group.bench_function("debug_with_fields", |b| {
        b.iter(|| logger.debug(black_box("dropped"), &[Field::string("k", "v")]));
    });

    let cx = context::attach(&Context::background(), logger.clone());
    group.bench_function("context_debug", |b| {
        b.iter(|| context::debug(&cx, black_box("dropped"), &[]));
    });

    group.finish();
}

criterion_group!(benches, bench_encoding, bench_logging, bench_suppressed);
criterion_main!(benches);
