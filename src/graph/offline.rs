//! Offline device: renders on demand instead of on a sound card's schedule.
//!
//! Used for tests, benches and bouncing audio without hardware. The clock only
//! moves when [`OfflineDevice::render`] is called while the device is running.

use crate::{
    error::DeviceError,
    graph::{AudioDevice, AudioGraph, AudioHost, GraphState, Mixer, Tone},
    MAX_BLOCK_SIZE,
};

/// Opens [`OfflineDevice`]s.
pub struct OfflineHost {
    sample_rate: f32,
    available: bool,
}

impl OfflineHost {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            available: true,
        }
    }

    /// A host with no audio capability; every `open` fails.
    pub fn unavailable() -> Self {
        Self {
            sample_rate: 48_000.0,
            available: false,
        }
    }
}

impl Default for OfflineHost {
    fn default() -> Self {
        Self::new(48_000.0)
    }
}

impl AudioHost for OfflineHost {
    type Device = OfflineDevice;

    fn open(&mut self) -> Result<OfflineDevice, DeviceError> {
        if !self.available {
            return Err(DeviceError::NoOutputDevice);
        }
        Ok(OfflineDevice::new(self.sample_rate))
    }
}

pub struct OfflineDevice {
    mixer: Mixer,
    state: GraphState,
}

impl OfflineDevice {
    /// A new device starts suspended, like a browser audio context before the
    /// first user gesture.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            mixer: Mixer::new(sample_rate),
            state: GraphState::Suspended,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.mixer.sample_rate()
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }

    /// Render one block. Silence, with the clock frozen, unless running.
    pub fn render(&mut self, out: &mut [f32]) {
        match self.state {
            GraphState::Running => self.mixer.render(out),
            GraphState::Suspended | GraphState::Closed => out.fill(0.0),
        }
    }

    /// Render `seconds` of audio in blocks of at most `MAX_BLOCK_SIZE`.
    pub fn render_seconds(&mut self, seconds: f64) -> Vec<f32> {
        let frames = (seconds.max(0.0) * self.sample_rate() as f64).round() as usize;
        let mut out = vec![0.0f32; frames];
        for block in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render(block);
        }
        out
    }
}

impl AudioGraph for OfflineDevice {
    fn current_time(&self) -> f64 {
        self.mixer.current_time()
    }

    fn connect(&mut self, tone: Tone) {
        if self.state != GraphState::Closed {
            self.mixer.connect(tone);
        }
    }
}

impl AudioDevice for OfflineDevice {
    fn state(&self) -> GraphState {
        self.state
    }

    fn resume(&mut self) {
        if self.state == GraphState::Suspended {
            self.state = GraphState::Running;
        }
    }

    fn close(&mut self) {
        self.mixer.clear();
        self.state = GraphState::Closed;
    }
}
