//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use ambience::dsp::{Oscillator, Waveform};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    let waveforms = [
        // sin() per sample
        ("sine", Waveform::Sine),
        // Folded ramp, no band-limiting needed
        ("triangle", Waveform::Triangle),
        // PolyBLEP correction near each wrap
        ("sawtooth", Waveform::Sawtooth),
        // Two PolyBLEP corrections per cycle
        ("square", Waveform::Square),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, waveform) in waveforms {
            let mut osc = Oscillator::new(waveform, 261.63, SAMPLE_RATE);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    osc.render(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
