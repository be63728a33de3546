//! The ambient engine: mute state, graph lifecycle, and the triggers a host
//! wires to its UI.
//!
//! # Example
//!
//! ```
//! use ambience::{graph::OfflineHost, AmbientEngine, EngineConfig};
//!
//! let mut engine = AmbientEngine::new(OfflineHost::default(), EngineConfig::default());
//! assert!(engine.is_muted());
//!
//! engine.toggle_mute(); // opens the graph and starts the progression
//! engine.play_click();
//! engine.run_frame(0.016);
//! ```

pub mod config;

pub use config::EngineConfig;

use tracing::debug;

use crate::{
    graph::{AudioGraph, AudioHost, GraphManager, GraphState},
    runtime::{Deferred, Dispatch, EventLoop},
    sequencing::{ChordScheduler, SchedulerState},
    synth::{play_tone, EffectTone, CLICK, HOVER, SUCCESS_ARPEGGIO},
};

/// Snapshot of the engine for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineStatus {
    pub muted: bool,
    /// `None` until the graph is first opened, and after release
    pub graph: Option<GraphState>,
    pub scheduler: SchedulerState,
    /// Index of the next chord in the progression
    pub chord_index: usize,
    pub next_chord_time: f64,
    /// Device clock in seconds, if a device is open
    pub clock: Option<f64>,
    pub chords_played: u64,
    pub measures_skipped: u64,
}

/// One session of ambient audio.
///
/// All operations are infallible. A host without sound produces an engine
/// that tracks mute state and does nothing audible.
pub struct AmbientEngine<H: AudioHost> {
    config: EngineConfig,
    graph: GraphManager<H>,
    scheduler: ChordScheduler,
    events: EventLoop,
    muted: bool,
}

impl<H: AudioHost> AmbientEngine<H> {
    /// Nothing is opened while muted. An engine configured to start unmuted
    /// opens the graph and starts the progression right away.
    pub fn new(host: H, config: EngineConfig) -> Self {
        let mut engine = Self {
            config,
            graph: GraphManager::new(host),
            scheduler: ChordScheduler::new(config.schedule),
            events: EventLoop::new(),
            muted: config.start_muted,
        };
        engine.apply_mute();
        engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Flip mute and return the new value.
    pub fn toggle_mute(&mut self) -> bool {
        self.set_muted(!self.muted);
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        if self.muted != muted {
            debug!(muted, "Mute changed.");
        }
        self.muted = muted;
        self.apply_mute();
    }

    /// Start the progression if sound is allowed. Idempotent.
    pub fn play_ambient(&mut self) {
        if !self.muted {
            self.start_ambient();
        }
    }

    pub fn play_hover(&mut self) {
        self.play_effect(&HOVER);
    }

    pub fn play_click(&mut self) {
        self.play_effect(&CLICK);
    }

    /// Queue the three-note arpeggio. Each note checks mute when it is due, so
    /// muting mid-arpeggio cuts the remaining notes.
    pub fn play_success(&mut self) {
        if self.muted {
            return;
        }
        for (delay, tone) in SUCCESS_ARPEGGIO {
            self.events.set_timeout(delay, Deferred::Effect(tone));
        }
    }

    /// Host tick. Call once per UI frame with a monotonic time in seconds.
    pub fn run_frame(&mut self, now: f64) {
        for dispatch in self.events.advance(now) {
            match dispatch {
                Dispatch::Frame(handle) => {
                    self.scheduler
                        .on_frame(handle, self.graph.device_mut(), &mut self.events);
                }
                Dispatch::Timer(_, Deferred::Effect(tone)) => self.play_effect(&tone),
            }
        }
    }

    pub fn status(&self) -> EngineStatus {
        let schedule = self.scheduler.schedule();
        EngineStatus {
            muted: self.muted,
            graph: self.graph.state(),
            scheduler: self.scheduler.state(),
            chord_index: schedule.chord_index,
            next_chord_time: schedule.next_chord_time,
            clock: self.graph.device().map(|device| device.current_time()),
            chords_played: self.scheduler.chords_played(),
            measures_skipped: self.scheduler.measures_skipped(),
        }
    }

    pub fn scheduler(&self) -> &ChordScheduler {
        &self.scheduler
    }

    pub fn events(&self) -> &EventLoop {
        &self.events
    }

    /// The open device, if any. Never opens one.
    pub fn device_mut(&mut self) -> Option<&mut H::Device> {
        self.graph.device_mut()
    }

    pub fn device(&self) -> Option<&H::Device> {
        self.graph.device()
    }

    /// Stop the progression and release the graph for good.
    pub fn shutdown(&mut self) {
        self.scheduler.stop(&mut self.events);
        self.graph.release();
    }

    /// The single place mute state turns into scheduler state.
    fn apply_mute(&mut self) {
        if self.muted {
            self.scheduler.stop(&mut self.events);
        } else {
            self.start_ambient();
        }
    }

    fn start_ambient(&mut self) {
        if self.graph.acquire().is_none() {
            return;
        }
        self.graph.resume_if_suspended();
        self.scheduler
            .start(self.graph.device_mut(), &mut self.events);
    }

    fn play_effect(&mut self, effect: &EffectTone) {
        if self.muted {
            return;
        }
        if self.graph.acquire().is_none() {
            return;
        }
        self.graph.resume_if_suspended();
        play_tone(self.graph.device_mut(), effect);
    }
}

impl<H: AudioHost> Drop for AmbientEngine<H> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
