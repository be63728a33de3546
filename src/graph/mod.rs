//! The shared audio processing graph.
//!
//! Voices, effects and the chord scheduler never own audio hardware. They see
//! the graph through [`AudioGraph`]: a clock to read and an output to attach
//! [`Tone`]s to. Lifecycle (resume, close) lives on [`AudioDevice`] and is only
//! driven by the [`manager::GraphManager`]. Back-ends are chosen through
//! [`AudioHost`], so the same engine runs against a sound card, an offline
//! renderer or a test double.

/// Lazily-opened, session-wide device handle.
pub mod manager;
/// Sample-rendering core shared by every back-end.
pub mod mixer;
/// Deterministic device rendered on demand.
pub mod offline;
/// cpal output stream fed through a lock-free ring.
#[cfg(feature = "rtrb")]
pub mod realtime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{EnvelopeShape, Waveform},
    error::DeviceError,
};

pub use manager::GraphManager;
pub use mixer::{GraphCommand, Mixer, MAX_TONES};
pub use offline::{OfflineDevice, OfflineHost};
#[cfg(feature = "rtrb")]
pub use realtime::{CpalDevice, CpalHost};

/// Running state of an output device.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphState {
    /// Output is halted and the device clock is frozen.
    Suspended,
    Running,
    Closed,
}

/// One oscillator and its envelope, scheduled against the device clock.
///
/// This is the unit attached to the output. A tone disposes of itself once the
/// clock passes [`Tone::end`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub frequency: f32,
    /// Absolute device time in seconds.
    pub start: f64,
    pub envelope: EnvelopeShape,
}

impl Tone {
    pub fn new(waveform: Waveform, frequency: f32, start: f64, envelope: EnvelopeShape) -> Self {
        Self {
            waveform,
            frequency,
            start,
            envelope,
        }
    }

    /// Absolute time at which the tone stops producing sound.
    pub fn end(&self) -> f64 {
        self.start + self.envelope.duration()
    }

    /// Envelope gain at absolute device time `time`.
    pub fn gain_at(&self, time: f64) -> f32 {
        self.envelope.gain_at(time - self.start)
    }
}

/// Read-and-attach view of the graph.
pub trait AudioGraph {
    /// Device clock in seconds. Monotonic; frozen while suspended.
    fn current_time(&self) -> f64;

    /// Attach a tone to the output.
    fn connect(&mut self, tone: Tone);
}

/// Lifecycle view of the graph.
pub trait AudioDevice: AudioGraph {
    fn state(&self) -> GraphState;

    /// Ask a suspended device to start running. Fire-and-forget: the state may
    /// change later, or not at all if the host refuses.
    fn resume(&mut self);

    /// Stop output for good.
    fn close(&mut self);
}

/// Something that can open an output device.
pub trait AudioHost {
    type Device: AudioDevice;

    fn open(&mut self) -> Result<Self::Device, DeviceError>;
}

impl<G: AudioGraph + ?Sized> AudioGraph for Box<G> {
    fn current_time(&self) -> f64 {
        (**self).current_time()
    }

    fn connect(&mut self, tone: Tone) {
        (**self).connect(tone)
    }
}
