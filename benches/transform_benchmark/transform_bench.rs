use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sacio_core::{PolesZeros, ReadOptions, Record, WriteOptions};

/// Синусоида 1 Гц при 100 Гц дискретизации.
fn tone(npts: usize) -> Record {
    let data = (0..npts)
        .map(|i| (2.0 * std::f32::consts::PI * i as f32 / 100.0).sin())
        .collect();
    let mut r = Record::from_samples(data, 0.01, 0.0);
    r.edit_header(|h| h.o = Some(0.0));
    r
}

fn bench_codec(c: &mut Criterion) {
    let record = tone(360_000);
    let bytes = record.encode(&WriteOptions::default()).unwrap();

    c.bench_function("encode_1h_100hz", |b| {
        b.iter(|| black_box(record.encode(black_box(&WriteOptions::default())).unwrap()))
    });

    c.bench_function("decode_1h_100hz", |b| {
        b.iter(|| black_box(Record::decode(black_box(&bytes), &ReadOptions::default()).unwrap()))
    });
}

fn bench_interpolate(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpolate");

    for npts in [256usize, 1024] {
        let record = tone(npts);
        group.bench_with_input(BenchmarkId::from_parameter(npts), &record, |b, r| {
            b.iter(|| {
                let mut r = r.clone();
                r.interpolate(black_box(0.004)).unwrap();
                black_box(r)
            })
        });
    }

    group.finish();
}

fn bench_spectral(c: &mut Criterion) {
    let record = tone(65_536);

    c.bench_function("fft_65536", |b| {
        b.iter(|| black_box(record.fft().unwrap()))
    });

    let spectrum = record.fft().unwrap();
    c.bench_function("ifft_65536", |b| {
        b.iter(|| black_box(spectrum.ifft().unwrap()))
    });
}

fn bench_convolve_response(c: &mut Criterion) {
    // STS-1 (360 с), упрощённый
    let pz = PolesZeros::from_pairs(
        2.8e3,
        &[[0.0, 0.0], [0.0, 0.0]],
        &[[-0.01234, 0.01234], [-0.01234, -0.01234], [-39.18, 49.12], [-39.18, -49.12]],
    );
    let record = tone(30_000);

    c.bench_function("convolve_response_30000", |b| {
        b.iter(|| {
            let mut r = record.clone();
            r.convolve_response(black_box(&pz)).unwrap();
            black_box(r)
        })
    });
}

criterion_group!(
    benches,
    bench_codec,
    bench_interpolate,
    bench_spectral,
    bench_convolve_response
);
criterion_main!(benches);
