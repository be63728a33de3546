use crate::{
    dsp::{EnvelopeShape, Waveform},
    graph::{AudioGraph, Tone},
};

/// Ratio applied to the second partial. A tenth of a percent sharp beats
/// slowly against the first and reads as a gentle chorus.
pub const DETUNE_RATIO: f32 = 1.001;
/// Seconds to fade in.
pub const ATTACK: f64 = 0.8;
/// Seconds to fade out once the hold ends.
pub const RELEASE: f64 = 4.0;
/// Peak gain of the sine fundamental.
pub const FUNDAMENTAL_PEAK: f32 = 0.05;
/// Peak gain of the detuned triangle, quieter harmonic colouring.
pub const HARMONIC_PEAK: f32 = 0.02;

/// One sounding note: a sine fundamental plus a slightly sharp triangle, each
/// with its own envelope.
///
/// A voice is a plain value. Once its tones are connected the graph owns them,
/// and they disappear on their own after `hold + RELEASE` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    fundamental: Tone,
    harmonic: Tone,
}

impl Voice {
    pub fn new(frequency: f32, start: f64, hold: f64) -> Self {
        Self {
            fundamental: Tone::new(
                Waveform::Sine,
                frequency,
                start,
                EnvelopeShape::new(ATTACK, hold, RELEASE, FUNDAMENTAL_PEAK),
            ),
            harmonic: Tone::new(
                Waveform::Triangle,
                frequency * DETUNE_RATIO,
                start,
                EnvelopeShape::new(ATTACK, hold, RELEASE, HARMONIC_PEAK),
            ),
        }
    }

    pub fn tones(&self) -> [Tone; 2] {
        [self.fundamental, self.harmonic]
    }

    pub fn start(&self) -> f64 {
        self.fundamental.start
    }

    /// When the last partial falls silent.
    pub fn end(&self) -> f64 {
        self.fundamental.end().max(self.harmonic.end())
    }

    /// Combined envelope gain at absolute time `time`.
    pub fn gain_at(&self, time: f64) -> f32 {
        self.fundamental.gain_at(time) + self.harmonic.gain_at(time)
    }

    pub fn connect<G: AudioGraph + ?Sized>(self, graph: &mut G) {
        graph.connect(self.fundamental);
        graph.connect(self.harmonic);
    }
}

/// Schedule one note of `hold` seconds at absolute device time `start_time`.
///
/// Without a graph this does nothing.
pub fn play_note<G: AudioGraph + ?Sized>(
    graph: Option<&mut G>,
    frequency: f32,
    start_time: f64,
    hold: f64,
) {
    if let Some(graph) = graph {
        Voice::new(frequency, start_time, hold).connect(graph);
    }
}
