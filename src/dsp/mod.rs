//! Low-level DSP primitives used by the processing graph.
//!
//! These components are allocation-free and realtime-safe, so the mixer can
//! run them directly inside the audio callback. They stay focused on the
//! signal-processing math; scheduling and lifetime live a layer up.

/// Attack/hold/release envelope evaluated from absolute time.
pub mod envelope;
/// Band-limited periodic waveforms.
pub mod oscillator;

pub use envelope::{EnvelopeShape, EnvelopeStage};
pub use oscillator::{Oscillator, Waveform};
