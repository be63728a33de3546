//! Procedural ambient audio.
//!
//! A slow seventh-chord progression strummed onto a shared audio graph, plus
//! short interface sounds, behind a single mute switch. Everything is
//! synthesized from oscillators; there are no samples.
//!
//! The [`AmbientEngine`] is the entry point. It is generic over an
//! [`graph::AudioHost`], so the same engine drives a sound card
//! ([`graph::CpalHost`]), an offline renderer ([`graph::OfflineHost`]) or a
//! test double.

pub mod dsp; // Oscillators and envelopes
pub mod engine;
pub mod error;
pub mod graph; // Output device, clock and tone mixing
pub mod runtime;
pub mod sequencing; // Chords, tempo and the lookahead scheduler
pub mod synth; // Voices and one-shot effects

pub use engine::{AmbientEngine, EngineConfig, EngineStatus};
pub use error::DeviceError;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f64 = 1.0 / 48_000.0;

/// Level an exponential release decays to before the tone is cut.
pub const ENVELOPE_FLOOR: f32 = 0.001;
