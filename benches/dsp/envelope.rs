//! Benchmarks for the attack / hold / release envelope.

use std::hint::black_box;

use ambience::{dsp::EnvelopeShape, synth::voice};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let env = EnvelopeShape::new(voice::ATTACK, 3.0, voice::RELEASE, voice::FUNDAMENTAL_PEAK);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Linear ramp
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(0.2), SAMPLE_RATE);
            })
        });

        // Constant
        group.bench_with_input(BenchmarkId::new("hold", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(1.5), SAMPLE_RATE);
            })
        });

        // powf() per sample
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(4.0), SAMPLE_RATE);
            })
        });
    }

    group.finish();
}
