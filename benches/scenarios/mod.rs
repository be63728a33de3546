//! Real-world scenario benchmarks.
//!
//! These model the engine's steady state: one chord ringing out while the next
//! fades in, and the full engine driven frame by frame.

mod progression;

pub use progression::bench_progression;
