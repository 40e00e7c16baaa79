//! gamma 性能基准测试.
//!
//! 覆盖查找表合成与 blob 序列化的常见长度.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use gamma::core::{CurveParams, synthesize};

const SIZES: [usize; 3] = [256, 1024, 4096];

fn warm_curve() -> CurveParams {
    CurveParams {
        gamma: 2.2,
        lift: -0.05,
        gain: 1.1,
        red: 1.1,
        green: 1.0,
        blue: 0.85,
    }
}

fn bench_synthesize(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesize");
    let params = warm_curve();
    for size in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| synthesize(black_box(&params), black_box(size)).unwrap());
        });
    }
    group.finish();
}

fn bench_color_lut_bytes(c: &mut Criterion) {
    let mut group = c.benchmark_group("color_lut_bytes");
    for size in SIZES {
        let lut = synthesize(&warm_curve(), size).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &lut, |b, lut| {
            b.iter(|| black_box(lut).to_color_lut_bytes());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_synthesize, bench_color_lut_bytes);
criterion_main!(benches);
