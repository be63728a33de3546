//! Host-driven scheduling primitives.
//!
//! The engine is single-threaded on its control side. Frame callbacks and
//! timers are queued in an [`EventLoop`] and dispatched when the host calls
//! [`EventLoop::advance`], typically once per UI frame.

pub mod event_loop;

pub use event_loop::{Deferred, Dispatch, EventLoop, FrameHandle, TimerHandle};
