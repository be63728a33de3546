//! One-shot interface sounds.
//!
//! These bypass the chord scheduler entirely: a single oscillator, a short
//! fade in, an exponential tail, starting right now. The player holds no state
//! (including mute); callers decide whether a sound should happen at all.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{EnvelopeShape, Waveform},
    graph::{AudioGraph, Tone},
    sequencing::notes::{C5, E5, G5},
};

/// Longest fade-in applied to an effect, so onsets do not click.
const MAX_EFFECT_ATTACK: f64 = 0.005;

/// Description of a one-shot tone.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectTone {
    pub frequency: f32,
    pub waveform: Waveform,
    /// Seconds from onset until the tail reaches the floor.
    pub duration: f64,
    /// Peak linear gain.
    pub volume: f32,
}

/// Pointer hover tick.
pub const HOVER: EffectTone = EffectTone {
    frequency: 800.0,
    waveform: Waveform::Sine,
    duration: 0.05,
    volume: 0.03,
};

/// Click thud.
pub const CLICK: EffectTone = EffectTone {
    frequency: 300.0,
    waveform: Waveform::Triangle,
    duration: 0.1,
    volume: 0.08,
};

/// Ascending C major arpeggio, as `(delay_seconds, tone)` pairs.
pub const SUCCESS_ARPEGGIO: [(f64, EffectTone); 3] = [
    (0.0, success_note(C5, 0.6)),
    (0.1, success_note(E5, 0.6)),
    (0.2, success_note(G5, 1.0)),
];

const fn success_note(frequency: f32, duration: f64) -> EffectTone {
    EffectTone {
        frequency,
        waveform: Waveform::Sine,
        duration,
        volume: 0.05,
    }
}

impl EffectTone {
    pub fn envelope(&self) -> EnvelopeShape {
        let duration = self.duration.max(0.0);
        let attack = MAX_EFFECT_ATTACK.min(duration / 10.0);
        EnvelopeShape::new(attack, attack, duration - attack, self.volume)
    }

    /// The concrete tone for an onset at `start`.
    pub fn tone(&self, start: f64) -> Tone {
        Tone::new(self.waveform, self.frequency, start, self.envelope())
    }
}

/// Play `effect` starting at the graph's current time. No graph, no sound.
pub fn play_tone<G: AudioGraph + ?Sized>(graph: Option<&mut G>, effect: &EffectTone) {
    if let Some(graph) = graph {
        let now = graph.current_time();
        graph.connect(effect.tone(now));
    }
}
