//! Benchmarks for cairn_errors codec and renderer throughput.
//!
//! Covers the boundary-crossing hot paths: encoding, decoding, rendering,
//! and code-set membership, over both shallow and deeply nested values.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cairn_errors::{codec, render, CodeSet, Fault};

fn shallow_fault() -> Fault {
    Fault::new("app-error-config")
        .unwrap()
        .with_message("configuration could not be loaded")
        .with_detail("path", "/etc/app.toml")
        .with_detail("line", "42")
}

fn chain_fault(depth: usize) -> Fault {
    let mut fault = Fault::new("app-error-leaf").unwrap();
    for level in 1..depth {
        fault = Fault::new(format!("app-error-level{level}"))
            .unwrap()
            .with_message("wrapped")
            .caused_by(fault)
            .unwrap();
    }
    fault
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.bench_function("shallow", |b| {
        let fault = shallow_fault();
        b.iter(|| codec::encode_string(black_box(&fault)));
    });
    for depth in [8, 32, 64] {
        group.bench_with_input(BenchmarkId::new("chain", depth), &depth, |b, &depth| {
            let fault = chain_fault(depth);
            b.iter(|| codec::encode_string(black_box(&fault)));
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    group.bench_function("shallow", |b| {
        let text = codec::encode_string(&shallow_fault());
        b.iter(|| codec::decode_str(black_box(&text)).unwrap());
    });
    for depth in [8, 32, 64] {
        group.bench_with_input(BenchmarkId::new("chain", depth), &depth, |b, &depth| {
            let text = codec::encode_string(&chain_fault(depth));
            b.iter(|| codec::decode_str(black_box(&text)).unwrap());
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.bench_function("shallow", |b| {
        let fault = shallow_fault();
        b.iter(|| render::render(black_box(&fault)));
    });
    group.bench_function("chain_64", |b| {
        let fault = chain_fault(64);
        b.iter(|| render::render(black_box(&fault)));
    });
    group.finish();
}

fn bench_code_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("code_set");
    group.bench_function("from_tree_64", |b| {
        let fault = chain_fault(64);
        b.iter(|| CodeSet::from_tree(black_box(&fault)));
    });
    group.bench_function("difference", |b| {
        let produced: CodeSet = (0..64).map(|n| format!("app-error-{n}")).collect();
        let handled: CodeSet = (0..48).map(|n| format!("app-error-{n}")).collect();
        b.iter(|| black_box(&produced).difference(black_box(&handled)));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_encode,
    bench_decode,
    bench_render,
    bench_code_set
);
criterion_main!(benches);
