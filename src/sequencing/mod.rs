pub mod chords;
pub mod notes;
pub mod scheduler;
pub mod tempo;

pub use chords::{chord_at, Chord, PROGRESSION};
pub use scheduler::{ChordScheduler, ScheduleConfig, ScheduleState, SchedulerState};
pub use tempo::Tempo;
