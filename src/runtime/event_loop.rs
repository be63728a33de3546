//! Cooperative frame and timer queue.
//!
//! Nothing here runs on its own. The host (a UI loop, a test) calls
//! [`EventLoop::advance`] with its own wall-clock time and gets back every
//! callback that became due. Frame requests are one-shot, like display
//! refresh callbacks: each dispatch consumes the request and the receiver
//! must ask again to be called on the next frame.

use crate::synth::EffectTone;

/// Ticket for a pending frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Ticket for a pending one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Work parked on a timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deferred {
    Effect(EffectTone),
}

/// A callback that became due during [`EventLoop::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dispatch {
    Frame(FrameHandle),
    Timer(TimerHandle, Deferred),
}

#[derive(Debug)]
struct Timer {
    handle: TimerHandle,
    due: f64,
    task: Deferred,
}

#[derive(Debug, Default)]
pub struct EventLoop {
    now: f64,
    next_id: u64,
    frames: Vec<FrameHandle>,
    timers: Vec<Timer>,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host time of the last [`advance`](Self::advance).
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.frames.push(handle);
        handle
    }

    /// Returns false if the frame already ran or was cancelled.
    pub fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        let before = self.frames.len();
        self.frames.retain(|pending| *pending != handle);
        self.frames.len() != before
    }

    /// Run `task` once `delay` seconds of host time have passed.
    pub fn set_timeout(&mut self, delay: f64, task: Deferred) -> TimerHandle {
        let handle = TimerHandle(self.next_id());
        self.timers.push(Timer {
            handle,
            due: self.now + delay.max(0.0),
            task,
        });
        handle
    }

    pub fn clear_timeout(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.handle != handle);
        self.timers.len() != before
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Move host time forward and collect everything that is due.
    ///
    /// All pending frames come first, in request order, then timers with
    /// `due <= now` ordered by due time. Time never runs backwards: an older
    /// `now` is treated as the current one.
    pub fn advance(&mut self, now: f64) -> Vec<Dispatch> {
        self.now = self.now.max(now);

        let mut due: Vec<Dispatch> = self.frames.drain(..).map(Dispatch::Frame).collect();

        let (mut ready, waiting): (Vec<Timer>, Vec<Timer>) = std::mem::take(&mut self.timers)
            .into_iter()
            .partition(|timer| timer.due <= self.now);
        self.timers = waiting;

        // Stable sort keeps insertion order for timers due at the same instant
        ready.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.extend(
            ready
                .into_iter()
                .map(|timer| Dispatch::Timer(timer.handle, timer.task)),
        );

        due
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{CLICK, HOVER};

    #[test]
    fn frames_are_one_shot() {
        let mut events = EventLoop::new();
        let handle = events.request_frame();

        assert_eq!(events.advance(0.016), vec![Dispatch::Frame(handle)]);
        assert!(events.advance(0.032).is_empty());
    }

    #[test]
    fn cancelled_frame_never_dispatches() {
        let mut events = EventLoop::new();
        let handle = events.request_frame();

        assert!(events.cancel_frame(handle));
        assert!(!events.cancel_frame(handle));
        assert!(events.advance(1.0).is_empty());
    }

    #[test]
    fn timers_wait_for_their_delay() {
        let mut events = EventLoop::new();
        let handle = events.set_timeout(0.1, Deferred::Effect(HOVER));

        assert!(events.advance(0.05).is_empty());
        assert_eq!(events.pending_timers(), 1);
        assert_eq!(
            events.advance(0.1),
            vec![Dispatch::Timer(handle, Deferred::Effect(HOVER))]
        );
        assert_eq!(events.pending_timers(), 0);
    }

    #[test]
    fn timers_fire_in_due_order() {
        let mut events = EventLoop::new();
        let late = events.set_timeout(0.2, Deferred::Effect(CLICK));
        let early = events.set_timeout(0.0, Deferred::Effect(HOVER));

        let handles: Vec<_> = events
            .advance(1.0)
            .into_iter()
            .map(|dispatch| match dispatch {
                Dispatch::Timer(handle, _) => handle,
                Dispatch::Frame(_) => panic!("no frame was requested"),
            })
            .collect();
        assert_eq!(handles, vec![early, late]);
    }

    #[test]
    fn delay_is_relative_to_last_advance() {
        let mut events = EventLoop::new();
        events.advance(5.0);
        events.set_timeout(0.1, Deferred::Effect(HOVER));

        assert!(events.advance(5.05).is_empty());
        assert_eq!(events.advance(5.1).len(), 1);
    }

    #[test]
    fn time_does_not_run_backwards() {
        let mut events = EventLoop::new();
        events.advance(2.0);
        events.advance(1.0);
        assert_eq!(events.now(), 2.0);
    }

    #[test]
    fn cleared_timer_never_dispatches() {
        let mut events = EventLoop::new();
        let handle = events.set_timeout(0.0, Deferred::Effect(HOVER));
        assert!(events.clear_timeout(handle));
        assert!(events.advance(1.0).is_empty());
    }
}
