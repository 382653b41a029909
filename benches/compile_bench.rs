use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use parseo::{AttributeVariable, BindMode, Context, Engine, ExpressionCache, PatternVariable, Value};
use polars::prelude::*;
use std::hint::black_box;

fn engine() -> Engine {
    Engine::builder()
        .variable(PatternVariable::new("M*", r"M(\d+)", "source", BindMode::Index).unwrap())
        .variable(PatternVariable::new("C*", r"C(\d+)", "config", BindMode::Index).unwrap())
        .variable(AttributeVariable::new("config", "config_map"))
        .standard_library()
        .build()
        .unwrap()
}

// Sum of `terms` metrics, wrapped in a conditional
fn formula(terms: usize) -> String {
    let sum = (0..terms)
        .map(|i| format!("M{i}"))
        .collect::<Vec<_>>()
        .join(" + ");
    format!("IF(C0 >= 1, round({sum}, 2), 0.0)")
}

fn frame(rows: usize, columns: usize) -> DataFrame {
    let series: Vec<Column> = (0..columns)
        .map(|c| {
            let values: Vec<f64> = (0..rows).map(|r| (r * (c + 1)) as f64 * 0.5).collect();
            Column::new(format!("m{c}").into(), values)
        })
        .collect();
    DataFrame::new(series).unwrap()
}

fn bench_compile(c: &mut Criterion) {
    let engine = engine();
    let mut group = c.benchmark_group("compile");

    for terms in [1, 10, 100] {
        let text = formula(terms);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(terms), &text, |b, text| {
            b.iter(|| engine.compile(black_box(text)).unwrap());
        });
    }

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let engine = engine();
    let evaluator = engine.compile(&formula(4)).unwrap();
    let mut group = c.benchmark_group("evaluate");

    let scalars = Context::new()
        .with("source", Value::array((0..4).map(|i| Value::Float(i as f64)).collect()))
        .with("config", Value::array(vec![Value::Int(1)]));
    group.bench_function("scalars", |b| {
        b.iter(|| evaluator.call(black_box(&scalars)).unwrap());
    });

    for rows in [100, 10_000] {
        let ctx = Context::new()
            .with("source", Value::DataFrame(frame(rows, 4)))
            .with("config", Value::array(vec![Value::Int(1)]));
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("frame", rows), &ctx, |b, ctx| {
            b.iter(|| evaluator.call(black_box(ctx)).unwrap());
        });
    }

    group.finish();
}

fn bench_cache(c: &mut Criterion) {
    let texts: Vec<String> = (1..=16).map(formula).collect();
    let mut cache = ExpressionCache::new(engine(), 32);

    c.bench_function("cache_warm", |b| {
        b.iter(|| {
            for text in &texts {
                black_box(cache.get_or_compile(text).unwrap());
            }
        });
    });
}

criterion_group!(benches, bench_compile, bench_evaluate, bench_cache);
criterion_main!(benches);
