//! # Value Codec Benchmarks
//!
//! | Path                 | What is measured                          |
//! |----------------------|-------------------------------------------|
//! | Boxed validation     | `validate` on nested `(bsv)` lists        |
//! | Boxed round trip     | `encode_bsv` then `decode_bsv`            |
//! | Native encoding      | `encode_native_as` against `a{sv}`        |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nsb_01_value_codec::{decode_bsv, encode_bsv, encode_native_as, validate};
use shared_types::{DynValue, ValueKind};
use std::time::Duration;

fn sample_list(size: usize) -> DynValue {
    DynValue::List(
        (0..size)
            .map(|i| match i % 3 {
                0 => DynValue::int(i as i64),
                1 => DynValue::string(format!("item-{}", i)),
                _ => DynValue::List(vec![DynValue::Bool(i % 2 == 0), DynValue::Float(0.5)]),
            })
            .collect(),
    )
}

fn sample_map(size: usize) -> DynValue {
    DynValue::map((0..size).map(|i| {
        (
            DynValue::string(format!("key-{}", i)),
            DynValue::int(i as i64),
        )
    }))
}

fn bench_boxed_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("bsv-validation");
    group.measurement_time(Duration::from_secs(5));

    for size in [10, 100, 1000] {
        let wire = match encode_bsv(&sample_list(size)) {
            Ok(triple) => triple.into_wire(),
            Err(fault) => panic!("sample does not box: {}", fault),
        };
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("validate_list", size), &wire, |b, wire| {
            b.iter(|| black_box(validate(wire).is_ok()))
        });
        group.bench_with_input(BenchmarkId::new("decode_list", size), &wire, |b, wire| {
            b.iter(|| black_box(decode_bsv(wire).is_ok()))
        });
    }

    group.finish();
}

fn bench_boxed_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("bsv-round-trip");

    for size in [10, 100] {
        let value = sample_map(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("map", size), &value, |b, value| {
            b.iter(|| {
                let wire = encode_bsv(value).map(|t| t.into_wire());
                black_box(wire.and_then(|w| decode_bsv(&w)).is_ok())
            })
        });
    }

    group.finish();
}

fn bench_native_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("native-encoding");
    let target = ValueKind::Map.native_wire_type();

    for size in [10, 100, 1000] {
        let value = sample_map(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("map_as_a{sv}", size), &value, |b, value| {
            b.iter(|| black_box(encode_native_as(value, &target).is_ok()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_boxed_validation,
    bench_boxed_round_trip,
    bench_native_encoding
);
criterion_main!(benches);
