#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const MIN_BPM: f64 = 1.0;
const MAX_BPM: f64 = 960.0;

/// Tempo and meter, enough to turn beats into seconds.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempo {
    /// Beats per minute
    bpm: f64,
    /// Beats in one measure (numerator of a x/4 time signature)
    beats_per_measure: u32,
}

impl Tempo {
    /// 30 BPM in 4/4: one measure every eight seconds.
    pub const AMBIENT: Tempo = Tempo {
        bpm: 30.0,
        beats_per_measure: 4,
    };

    /// BPM is clamped to 1..=960, beats to at least one.
    pub fn new(bpm: f64, beats_per_measure: u32) -> Self {
        Self {
            bpm: bpm.clamp(MIN_BPM, MAX_BPM),
            beats_per_measure: beats_per_measure.max(1),
        }
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn beats_per_measure(&self) -> u32 {
        self.beats_per_measure
    }

    pub fn seconds_per_beat(&self) -> f64 {
        // Clamp again: deserialized values skip `new`
        60.0 / self.bpm.clamp(MIN_BPM, MAX_BPM)
    }

    /// Formula: (60 / bpm) * beats_per_measure
    pub fn measure_duration(&self) -> f64 {
        self.seconds_per_beat() * self.beats_per_measure.max(1) as f64
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::AMBIENT
    }
}
