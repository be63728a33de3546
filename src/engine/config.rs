#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sequencing::{ScheduleConfig, Tempo};

/// Engine settings.
///
/// Defaults match the shipped sound: muted on start, 30 BPM in 4/4, 100 ms
/// lookahead, 150 ms strum, 3 s hold.
///
/// ```
/// use ambience::EngineConfig;
///
/// let config = EngineConfig::default().muted(false).tempo(40.0).hold(2.0);
/// assert!(!config.start_muted);
/// assert_eq!(config.schedule.tempo.measure_duration(), 6.0);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Audio stays off until the user opts in
    pub start_muted: bool,
    pub schedule: ScheduleConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            start_muted: true,
            schedule: ScheduleConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn muted(mut self, muted: bool) -> Self {
        self.start_muted = muted;
        self
    }

    /// Set the tempo in BPM, keeping the meter.
    pub fn tempo(mut self, bpm: f64) -> Self {
        let beats = self.schedule.tempo.beats_per_measure();
        self.schedule.tempo = Tempo::new(bpm, beats);
        self
    }

    pub fn beats_per_measure(mut self, beats: u32) -> Self {
        let bpm = self.schedule.tempo.bpm();
        self.schedule.tempo = Tempo::new(bpm, beats);
        self
    }

    pub fn lookahead(mut self, seconds: f64) -> Self {
        self.schedule.lookahead = seconds.max(0.0);
        self
    }

    pub fn strum_offset(mut self, seconds: f64) -> Self {
        self.schedule.strum_offset = seconds.max(0.0);
        self
    }

    pub fn hold(mut self, seconds: f64) -> Self {
        self.schedule.hold = seconds.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert!(config.start_muted);
        assert_eq!(config.schedule.tempo, Tempo::AMBIENT);
        assert_eq!(config.schedule.lookahead, 0.1);
        assert_eq!(config.schedule.strum_offset, 0.15);
        assert_eq!(config.schedule.hold, 3.0);
    }

    #[test]
    fn builder_keeps_meter_when_changing_tempo() {
        let config = EngineConfig::default().beats_per_measure(3).tempo(60.0);
        assert_eq!(config.schedule.tempo.beats_per_measure(), 3);
        assert_eq!(config.schedule.tempo.measure_duration(), 3.0);
    }

    #[test]
    fn negative_durations_are_clamped() {
        let config = EngineConfig::default().lookahead(-1.0).strum_offset(-0.1).hold(-3.0);
        assert_eq!(config.schedule.lookahead, 0.0);
        assert_eq!(config.schedule.strum_offset, 0.0);
        assert_eq!(config.schedule.hold, 0.0);
    }
}
