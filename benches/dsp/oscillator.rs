//! Benchmarks for the four-waveform oscillator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use duotone_dsp::domain::fixed;
use duotone_dsp::{Fixed16, Float32, Oscillator, SampleRate};

use crate::CHUNK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let rate = SampleRate::Hz48000;

    for &size in CHUNK_SIZES {
        let note_f = vec![69.0f32; size];
        let plain_f = vec![0.0f32; size];
        let shaped_f = vec![0.75f32; size];
        let mut osc = Oscillator::<Float32>::new();

        group.bench_with_input(BenchmarkId::new("float", size), &size, |b, _| {
            b.iter(|| {
                let out = osc.process(rate, black_box(&note_f), black_box(&plain_f), 0);
                black_box(out.len());
            })
        });

        group.bench_with_input(BenchmarkId::new("float_distorted", size), &size, |b, _| {
            b.iter(|| {
                let out = osc.process(rate, black_box(&note_f), black_box(&shaped_f), 0);
                black_box(out.len());
            })
        });

        let note_x = vec![fixed::Note::from_num(69); size];
        let tune_x = vec![fixed::Tune::from_num(0.5); size];
        let plain_x = vec![fixed::Scalar::ZERO; size];
        let shaped_x = vec![fixed::Scalar::from_num(0.75); size];
        let mut osc = Oscillator::<Fixed16>::new();

        group.bench_with_input(BenchmarkId::new("fixed", size), &size, |b, _| {
            b.iter(|| {
                let out = osc.process(rate, black_box(&note_x), black_box(&plain_x), 0);
                black_box(out.len());
            })
        });

        group.bench_with_input(BenchmarkId::new("fixed_distorted", size), &size, |b, _| {
            b.iter(|| {
                let out = osc.process(rate, black_box(&note_x), black_box(&shaped_x), 0);
                black_box(out.len());
            })
        });

        group.bench_with_input(BenchmarkId::new("fixed_tuned", size), &size, |b, _| {
            b.iter(|| {
                let out = osc.process_tuned(
                    rate,
                    black_box(&note_x),
                    black_box(&tune_x),
                    black_box(&plain_x),
                    0,
                );
                black_box(out.len());
            })
        });
    }

    group.finish();
}
