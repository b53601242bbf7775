//! Benchmarks for the state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use duotone_dsp::domain::fixed;
use duotone_dsp::{Fixed16, Float32, SVFilter, SampleRate};

use crate::CHUNK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let rate = SampleRate::Hz48000;

    for &size in CHUNK_SIZES {
        let input_f: Vec<f32> = (0..size).map(|n| (n as f32 * 0.13).sin()).collect();
        let cutoff_f = vec![80.0f32; size];
        let gentle_f = vec![0.2f32; size];
        let ringing_f = vec![0.93f32; size];
        let mut filt = SVFilter::<Float32>::new();

        group.bench_with_input(BenchmarkId::new("float", size), &size, |b, _| {
            b.iter(|| {
                let out = filt.process(rate, black_box(&input_f), &cutoff_f, &gentle_f, 0);
                black_box(out.len());
            })
        });

        group.bench_with_input(BenchmarkId::new("float_resonant", size), &size, |b, _| {
            b.iter(|| {
                let out = filt.process(rate, black_box(&input_f), &cutoff_f, &ringing_f, 0);
                black_box(out.len());
            })
        });

        let input_x: Vec<fixed::Sample> = input_f
            .iter()
            .map(|&s| fixed::Sample::from_num(s))
            .collect();
        let cutoff_x = vec![fixed::Note::from_num(80); size];
        let gentle_x = vec![fixed::Scalar::from_num(0.2); size];
        let ringing_x = vec![fixed::Scalar::from_num(0.93); size];
        let mut filt = SVFilter::<Fixed16>::new();

        group.bench_with_input(BenchmarkId::new("fixed", size), &size, |b, _| {
            b.iter(|| {
                let out = filt.process(rate, black_box(&input_x), &cutoff_x, &gentle_x, 0);
                black_box(out.len());
            })
        });

        group.bench_with_input(BenchmarkId::new("fixed_resonant", size), &size, |b, _| {
            b.iter(|| {
                let out = filt.process(rate, black_box(&input_x), &cutoff_x, &ringing_x, 0);
                black_box(out.len());
            })
        });
    }

    group.finish();
}
