//! Benchmarks for the ADSR envelope generator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use duotone_dsp::domain::fixed;
use duotone_dsp::{EnvParams, Envelope, Fixed16, Float32, SampleRate};

use crate::CHUNK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let rate = SampleRate::Hz48000;

    for &size in CHUNK_SIZES {
        let gate_f = vec![1.0f32; size];
        let attack = vec![0.1f32; size];
        let decay = vec![0.1f32; size];
        let sustain = vec![0.7f32; size];
        let release = vec![0.3f32; size];
        let mut env = Envelope::<Float32>::new();

        group.bench_with_input(BenchmarkId::new("float", size), &size, |b, _| {
            b.iter(|| {
                let out = env.process(
                    rate,
                    black_box(&gate_f),
                    EnvParams {
                        attack: &attack,
                        decay: &decay,
                        sustain: &sustain,
                        release: &release,
                    },
                    0,
                );
                black_box(out.len());
            })
        });

        let gate_x = vec![fixed::Sample::ONE; size];
        let attack_x = vec![fixed::EnvTime::from_num(0.1); size];
        let decay_x = vec![fixed::EnvTime::from_num(0.1); size];
        let sustain_x = vec![fixed::Scalar::from_num(0.7); size];
        let release_x = vec![fixed::EnvTime::from_num(0.3); size];
        let mut env = Envelope::<Fixed16>::new();

        group.bench_with_input(BenchmarkId::new("fixed", size), &size, |b, _| {
            b.iter(|| {
                let out = env.process(
                    rate,
                    black_box(&gate_x),
                    EnvParams {
                        attack: &attack_x,
                        decay: &decay_x,
                        sustain: &sustain_x,
                        release: &release_x,
                    },
                    0,
                );
                black_box(out.len());
            })
        });
    }

    group.finish();
}
