/*
Lookahead Chord Scheduling
==========================

The control loop and the audio clock run at different rates and with
different reliability. Frames arrive roughly every 16 ms but can stall for
seconds (a background tab, a busy host). The audio clock never stalls while
the device runs.

So chords are never played "now". Each frame looks a short window ahead of
the device clock and stamps every chord that starts inside the window with
its exact start time:

    device clock ─────────●────────────────────────────────────────▶
                         now   now + lookahead
                          │◀──────▶│
                          │        │   next_chord_time
                          │        │         ▼
                                   .         ● chord N+1 (not yet)

    frame at 7.95 s:   [7.95, 8.05) contains 8.0  → play chord, next = 16.0

Within a chord the four notes are strummed, each `strum_offset` later than
the previous one, and every note holds for `hold` seconds before its
release tail.

Late frames:
- Less than one measure behind: the chord plays right away (onset clamped to
  the clock, never in the past) and the grid stays where it was.
- One or more whole measures behind: those chords are skipped. The index
  still advances once per missed measure, so the progression stays aligned
  with wall-clock time instead of bursting out everything it missed.

Stopping cancels the pending frame and clears the running flag. A frame that
was already dispatched when stop happened sees the flag (or a stale handle)
and returns without scheduling, so at most one tick loop exists at a time.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    chords::{advance_index, chord_at, next_index},
    tempo::Tempo,
};
use crate::{
    graph::AudioGraph,
    runtime::{EventLoop, FrameHandle},
    synth::play_note,
};

/// Timing parameters for the progression.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleConfig {
    pub tempo: Tempo,
    /// How far past the device clock each tick schedules, in seconds
    pub lookahead: f64,
    /// Delay between consecutive notes of a chord, in seconds
    pub strum_offset: f64,
    /// Time each note holds before its release tail, in seconds
    pub hold: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            tempo: Tempo::AMBIENT,
            lookahead: 0.1,
            strum_offset: 0.15,
            hold: 3.0,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

/// Position of the scheduler in the progression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleState {
    /// Device time of the next chord onset
    pub next_chord_time: f64,
    /// Progression index of the next chord, always in 0..4
    pub chord_index: usize,
    pub is_running: bool,
}

impl Default for ScheduleState {
    fn default() -> Self {
        Self {
            next_chord_time: 0.0,
            chord_index: 0,
            is_running: false,
        }
    }
}

#[derive(Debug)]
pub struct ChordScheduler {
    config: ScheduleConfig,
    schedule: ScheduleState,
    /// Frame request of the live tick loop
    pending_tick: Option<FrameHandle>,
    chords_played: u64,
    measures_skipped: u64,
}

impl ChordScheduler {
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            config,
            schedule: ScheduleState::default(),
            pending_tick: None,
            chords_played: 0,
            measures_skipped: 0,
        }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    pub fn state(&self) -> SchedulerState {
        if self.schedule.is_running {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    pub fn schedule(&self) -> &ScheduleState {
        &self.schedule
    }

    pub fn pending_tick(&self) -> Option<FrameHandle> {
        self.pending_tick
    }

    /// Chords stamped onto the graph since creation.
    pub fn chords_played(&self) -> u64 {
        self.chords_played
    }

    /// Measures dropped after stalls since creation.
    pub fn measures_skipped(&self) -> u64 {
        self.measures_skipped
    }

    /// Start the progression from the tonic at the graph's current time.
    ///
    /// Returns false, changing nothing, when there is no graph or the
    /// scheduler is already running. Otherwise the first tick runs before
    /// this returns, so the tonic is scheduled immediately.
    pub fn start<G: AudioGraph + ?Sized>(
        &mut self,
        graph: Option<&mut G>,
        events: &mut EventLoop,
    ) -> bool {
        let Some(graph) = graph else {
            debug!("No audio graph, scheduler not started.");
            return false;
        };
        if self.schedule.is_running {
            return false;
        }

        self.schedule = ScheduleState {
            next_chord_time: graph.current_time(),
            chord_index: 0,
            is_running: true,
        };
        debug!(at = self.schedule.next_chord_time, "Chord scheduler started.");

        self.tick(graph, events);
        true
    }

    /// Stop scheduling. Already scheduled notes keep sounding.
    pub fn stop(&mut self, events: &mut EventLoop) {
        if let Some(handle) = self.pending_tick.take() {
            events.cancel_frame(handle);
        }
        if self.schedule.is_running {
            self.schedule.is_running = false;
            debug!(
                chord_index = self.schedule.chord_index,
                "Chord scheduler stopped."
            );
        }
    }

    /// Handle a dispatched frame.
    ///
    /// Frames other than the one this scheduler is waiting for are stale
    /// (requested by a loop that has since been stopped) and are ignored.
    pub fn on_frame<G: AudioGraph + ?Sized>(
        &mut self,
        handle: FrameHandle,
        graph: Option<&mut G>,
        events: &mut EventLoop,
    ) {
        if self.pending_tick != Some(handle) {
            return;
        }
        self.pending_tick = None;

        match graph {
            Some(graph) => self.tick(graph, events),
            // Graph went away underneath a running loop; nothing to play on
            None => self.schedule.is_running = false,
        }
    }

    fn tick<G: AudioGraph + ?Sized>(&mut self, graph: &mut G, events: &mut EventLoop) {
        if !self.schedule.is_running {
            return;
        }

        let now = graph.current_time();
        let measure = self.config.tempo.measure_duration();
        let lookahead = self.config.lookahead.max(0.0);

        let behind = now - self.schedule.next_chord_time;
        if behind >= measure {
            let missed = (behind / measure).floor() as u64;
            self.schedule.next_chord_time += missed as f64 * measure;
            self.schedule.chord_index = advance_index(self.schedule.chord_index, missed);
            self.measures_skipped += missed;
            debug!(missed, now, "Tick stalled, skipped measures.");
        }

        while self.schedule.next_chord_time < now + lookahead {
            let onset = self.schedule.next_chord_time.max(now);
            self.play_chord(graph, onset);

            self.schedule.next_chord_time += measure;
            self.schedule.chord_index = next_index(self.schedule.chord_index);
        }

        self.pending_tick = Some(events.request_frame());
    }

    fn play_chord<G: AudioGraph + ?Sized>(&mut self, graph: &mut G, onset: f64) {
        let chord = chord_at(self.schedule.chord_index);
        let strum = self.config.strum_offset.max(0.0);
        for (i, &frequency) in chord.notes.iter().enumerate() {
            let start = onset + i as f64 * strum;
            play_note(Some(&mut *graph), frequency, start, self.config.hold);
        }
        self.chords_played += 1;
        debug!(chord = chord.name, onset, "Scheduled chord.");
    }
}

impl Default for ChordScheduler {
    fn default() -> Self {
        Self::new(ScheduleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{graph::testing::ManualGraph, runtime::Dispatch, sequencing::chords::PROGRESSION};
    use approx::assert_relative_eq;

    /// Dispatch every due frame to the scheduler.
    fn pump(scheduler: &mut ChordScheduler, graph: &mut ManualGraph, events: &mut EventLoop) {
        for dispatch in events.advance(graph.now) {
            if let Dispatch::Frame(handle) = dispatch {
                scheduler.on_frame(handle, Some(&mut *graph), events);
            }
        }
    }

    /// Fundamental onsets, one per note.
    fn onsets(graph: &ManualGraph) -> Vec<f64> {
        graph.tones.iter().step_by(2).map(|tone| tone.start).collect()
    }

    #[test]
    fn start_plays_tonic_immediately() {
        let mut graph = ManualGraph::at(0.0);
        let mut events = EventLoop::new();
        let mut scheduler = ChordScheduler::default();

        assert!(scheduler.start(Some(&mut graph), &mut events));

        // Four notes, two oscillators each
        assert_eq!(graph.tones.len(), 8);
        let starts = onsets(&graph);
        for (start, expected) in starts.iter().zip([0.0, 0.15, 0.30, 0.45]) {
            assert_relative_eq!(*start, expected, epsilon = 1e-9);
        }
        assert_eq!(graph.tones[0].frequency, PROGRESSION[0].notes[0]);

        assert_eq!(scheduler.schedule().chord_index, 1);
        assert_relative_eq!(scheduler.schedule().next_chord_time, 8.0);
        assert_eq!(events.pending_frames(), 1);
    }

    #[test]
    fn start_without_graph_does_nothing() {
        let mut events = EventLoop::new();
        let mut scheduler = ChordScheduler::default();

        assert!(!scheduler.start::<ManualGraph>(None, &mut events));
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert_eq!(events.pending_frames(), 0);
    }

    #[test]
    fn second_start_is_ignored() {
        let mut graph = ManualGraph::at(0.0);
        let mut events = EventLoop::new();
        let mut scheduler = ChordScheduler::default();

        scheduler.start(Some(&mut graph), &mut events);
        graph.now = 1.0;
        assert!(!scheduler.start(Some(&mut graph), &mut events));

        assert_eq!(graph.tones.len(), 8);
        assert_eq!(events.pending_frames(), 1);
        assert_relative_eq!(scheduler.schedule().next_chord_time, 8.0);
    }

    #[test]
    fn waits_until_chord_enters_lookahead() {
        let mut graph = ManualGraph::at(0.0);
        let mut events = EventLoop::new();
        let mut scheduler = ChordScheduler::default();
        scheduler.start(Some(&mut graph), &mut events);

        graph.now = 7.85;
        pump(&mut scheduler, &mut graph, &mut events);
        assert_eq!(graph.tones.len(), 8);

        graph.now = 7.95;
        pump(&mut scheduler, &mut graph, &mut events);
        assert_eq!(graph.tones.len(), 16);
        assert_eq!(graph.tones[8].frequency, PROGRESSION[1].notes[0]);
        assert_relative_eq!(graph.tones[8].start, 8.0);
    }

    #[test]
    fn stop_cancels_the_tick() {
        let mut graph = ManualGraph::at(0.0);
        let mut events = EventLoop::new();
        let mut scheduler = ChordScheduler::default();
        scheduler.start(Some(&mut graph), &mut events);

        scheduler.stop(&mut events);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert_eq!(events.pending_frames(), 0);

        graph.now = 20.0;
        pump(&mut scheduler, &mut graph, &mut events);
        assert_eq!(graph.tones.len(), 8);
    }

    #[test]
    fn frame_dispatched_before_stop_is_a_no_op() {
        let mut graph = ManualGraph::at(0.0);
        let mut events = EventLoop::new();
        let mut scheduler = ChordScheduler::default();
        scheduler.start(Some(&mut graph), &mut events);

        graph.now = 8.0;
        let in_flight = events.advance(graph.now);
        scheduler.stop(&mut events);
        for dispatch in in_flight {
            if let Dispatch::Frame(handle) = dispatch {
                scheduler.on_frame(handle, Some(&mut graph), &mut events);
            }
        }

        assert_eq!(graph.tones.len(), 8);
        assert_eq!(events.pending_frames(), 0);
    }

    #[test]
    fn stale_frame_after_restart_does_not_fork_the_loop() {
        let mut graph = ManualGraph::at(0.0);
        let mut events = EventLoop::new();
        let mut scheduler = ChordScheduler::default();
        scheduler.start(Some(&mut graph), &mut events);

        graph.now = 1.0;
        let in_flight = events.advance(graph.now);
        scheduler.stop(&mut events);
        scheduler.start(Some(&mut graph), &mut events);
        for dispatch in in_flight {
            if let Dispatch::Frame(handle) = dispatch {
                scheduler.on_frame(handle, Some(&mut graph), &mut events);
            }
        }

        // Only the restarted loop is alive
        assert_eq!(graph.tones.len(), 16);
        assert_eq!(events.pending_frames(), 1);
        assert!(scheduler.pending_tick().is_some());
    }

    #[test]
    fn restart_begins_at_tonic() {
        let mut graph = ManualGraph::at(0.0);
        let mut events = EventLoop::new();
        let mut scheduler = ChordScheduler::default();
        scheduler.start(Some(&mut graph), &mut events);

        graph.now = 7.95;
        pump(&mut scheduler, &mut graph, &mut events);
        scheduler.stop(&mut events);

        graph.now = 12.0;
        graph.tones.clear();
        scheduler.start(Some(&mut graph), &mut events);

        assert_eq!(graph.tones[0].frequency, PROGRESSION[0].notes[0]);
        assert_relative_eq!(graph.tones[0].start, 12.0);
        assert_relative_eq!(scheduler.schedule().next_chord_time, 20.0);
    }

    #[test]
    fn late_chord_plays_now_without_shifting_grid() {
        let mut graph = ManualGraph::at(0.0);
        let mut events = EventLoop::new();
        let mut scheduler = ChordScheduler::default();
        scheduler.start(Some(&mut graph), &mut events);

        graph.now = 10.0;
        pump(&mut scheduler, &mut graph, &mut events);

        assert_eq!(graph.tones.len(), 16);
        assert_relative_eq!(graph.tones[8].start, 10.0);
        assert_relative_eq!(scheduler.schedule().next_chord_time, 16.0);
        assert_eq!(scheduler.schedule().chord_index, 2);
    }

    #[test]
    fn long_stall_skips_missed_measures() {
        let mut graph = ManualGraph::at(0.0);
        let mut events = EventLoop::new();
        let mut scheduler = ChordScheduler::default();
        scheduler.start(Some(&mut graph), &mut events);

        // Chords at 8 and 16 are dropped, the one due at 24 plays late
        graph.now = 30.0;
        pump(&mut scheduler, &mut graph, &mut events);

        assert_eq!(scheduler.measures_skipped(), 2);
        assert_eq!(graph.tones.len(), 16);
        assert_eq!(graph.tones[8].frequency, PROGRESSION[3].notes[0]);
        assert_relative_eq!(graph.tones[8].start, 30.0);
        assert_relative_eq!(scheduler.schedule().next_chord_time, 32.0);
        assert_eq!(scheduler.schedule().chord_index, 0);
    }

    #[test]
    fn negative_strum_never_starts_notes_before_the_clock() {
        let mut graph = ManualGraph::at(5.0);
        let mut events = EventLoop::new();
        let mut scheduler = ChordScheduler::new(ScheduleConfig {
            strum_offset: -0.15,
            ..ScheduleConfig::default()
        });

        scheduler.start(Some(&mut graph), &mut events);

        assert_eq!(graph.tones.len(), 8);
        assert!(graph.tones.iter().all(|tone| tone.start >= 5.0));
    }

    #[test]
    fn chord_index_stays_in_range() {
        let mut graph = ManualGraph::at(0.0);
        let mut events = EventLoop::new();
        let mut scheduler = ChordScheduler::default();
        scheduler.start(Some(&mut graph), &mut events);

        for step in 1..200 {
            graph.now = step as f64 * 0.75;
            pump(&mut scheduler, &mut graph, &mut events);
            assert!(scheduler.schedule().chord_index < PROGRESSION.len());
            assert!(scheduler.schedule().next_chord_time >= graph.now);
        }
    }
}
