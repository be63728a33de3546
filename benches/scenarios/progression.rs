//! Benchmarks for rendering the chord progression.

use std::hint::black_box;

use ambience::{
    graph::{AudioGraph, Mixer, OfflineHost},
    sequencing::PROGRESSION,
    synth::Voice,
    AmbientEngine, EngineConfig,
};
use criterion::{BatchSize, BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

/// Mixer with two full chords sounding at once, the load while one chord
/// rings out under the next. Sixteen tones.
fn overlapping_chords() -> Mixer {
    let mut mixer = Mixer::new(SAMPLE_RATE);
    for chord in &PROGRESSION[..2] {
        for (i, &frequency) in chord.notes.iter().enumerate() {
            for tone in Voice::new(frequency, i as f64 * 0.15, 3.0).tones() {
                mixer.connect(tone);
            }
        }
    }
    mixer
}

pub fn bench_progression(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/progression");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === MIXER ===
        // Fresh mixer per batch so tones never expire mid-measurement
        group.bench_with_input(BenchmarkId::new("two_chords", size), &size, |b, _| {
            b.iter_batched_ref(
                overlapping_chords,
                |mixer| mixer.render(black_box(&mut buffer)),
                BatchSize::SmallInput,
            )
        });
    }

    // === ENGINE ===
    // One second of audio at 60 frames per second, control side included
    group.bench_function("engine_one_second", |b| {
        b.iter_batched_ref(
            || {
                let mut engine =
                    AmbientEngine::new(OfflineHost::new(SAMPLE_RATE), EngineConfig::default());
                engine.toggle_mute();
                engine
            },
            |engine| {
                for _ in 0..60 {
                    let Some(device) = engine.device_mut() else {
                        return;
                    };
                    black_box(device.render_seconds(1.0 / 60.0));
                    let now = device.current_time();
                    engine.run_frame(now);
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}
