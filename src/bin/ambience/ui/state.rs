//! Per-frame snapshot of what the UI shows
//!
//! Built on the control thread from the engine after every `run_frame`, so
//! widgets never touch the engine directly.

use ambience::{
    graph::GraphState,
    sequencing::{chord_at, SchedulerState, PROGRESSION},
    EngineStatus,
};

#[derive(Clone, Copy, Debug)]
pub struct UiState {
    pub status: EngineStatus,
    pub bpm: f64,
    pub measure: f64,
    pub sample_rate: Option<f32>,
    /// Label of the last trigger, shown in the help bar
    pub last_action: Option<&'static str>,
}

impl UiState {
    /// Index of the chord that is sounding, if the progression has started.
    pub fn current_chord(&self) -> Option<usize> {
        if self.status.chords_played == 0 {
            return None;
        }
        Some((self.status.chord_index + PROGRESSION.len() - 1) % PROGRESSION.len())
    }

    /// Fraction of the current measure elapsed, 0..=1.
    pub fn measure_progress(&self) -> f64 {
        let Some(clock) = self.status.clock else {
            return 0.0;
        };
        if self.measure <= 0.0 {
            return 0.0;
        }
        let remaining = (self.status.next_chord_time - clock).clamp(0.0, self.measure);
        1.0 - remaining / self.measure
    }

    pub fn is_playing(&self) -> bool {
        self.status.scheduler == SchedulerState::Running
            && self.status.graph == Some(GraphState::Running)
    }

    pub fn next_chord_name(&self) -> &'static str {
        chord_at(self.status.chord_index).name
    }
}
