#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use ambience::{
    graph::{AudioDevice, AudioGraph, AudioHost, GraphState, Tone},
    DeviceError,
};

/// Everything the engine did to the device, with a clock the test moves.
#[derive(Debug)]
pub struct Recording {
    pub clock: f64,
    pub state: GraphState,
    pub tones: Vec<Tone>,
    pub opened: usize,
    pub resumes: usize,
    pub closes: usize,
    /// When set, `resume` is accepted but the device stays suspended
    pub stuck_suspended: bool,
}

#[derive(Clone)]
pub struct Recorder(Rc<RefCell<Recording>>);

impl Recorder {
    pub fn set_clock(&self, seconds: f64) {
        self.0.borrow_mut().clock = seconds;
    }

    pub fn tones(&self) -> Vec<Tone> {
        self.0.borrow().tones.clone()
    }

    pub fn tone_count(&self) -> usize {
        self.0.borrow().tones.len()
    }

    pub fn opened(&self) -> usize {
        self.0.borrow().opened
    }

    pub fn resumes(&self) -> usize {
        self.0.borrow().resumes
    }

    pub fn closes(&self) -> usize {
        self.0.borrow().closes
    }

    pub fn state(&self) -> GraphState {
        self.0.borrow().state
    }

    pub fn stick_suspended(&self) {
        self.0.borrow_mut().stuck_suspended = true;
    }

    /// Onset of every chord, taken from its first fundamental.
    ///
    /// Assumes only chord voices were recorded: eight tones per chord.
    pub fn chord_onsets(&self) -> Vec<f64> {
        self.0
            .borrow()
            .tones
            .chunks(8)
            .map(|chord| chord[0].start)
            .collect()
    }
}

pub struct RecordingHost {
    recording: Rc<RefCell<Recording>>,
}

impl RecordingHost {
    pub fn new() -> (Self, Recorder) {
        let recording = Rc::new(RefCell::new(Recording {
            clock: 0.0,
            state: GraphState::Suspended,
            tones: Vec::new(),
            opened: 0,
            resumes: 0,
            closes: 0,
            stuck_suspended: false,
        }));
        (
            Self {
                recording: Rc::clone(&recording),
            },
            Recorder(recording),
        )
    }
}

impl AudioHost for RecordingHost {
    type Device = RecordingDevice;

    fn open(&mut self) -> Result<RecordingDevice, DeviceError> {
        self.recording.borrow_mut().opened += 1;
        Ok(RecordingDevice {
            recording: Rc::clone(&self.recording),
        })
    }
}

pub struct RecordingDevice {
    recording: Rc<RefCell<Recording>>,
}

impl AudioGraph for RecordingDevice {
    fn current_time(&self) -> f64 {
        self.recording.borrow().clock
    }

    fn connect(&mut self, tone: Tone) {
        self.recording.borrow_mut().tones.push(tone);
    }
}

impl AudioDevice for RecordingDevice {
    fn state(&self) -> GraphState {
        self.recording.borrow().state
    }

    fn resume(&mut self) {
        let mut recording = self.recording.borrow_mut();
        recording.resumes += 1;
        if !recording.stuck_suspended && recording.state == GraphState::Suspended {
            recording.state = GraphState::Running;
        }
    }

    fn close(&mut self) {
        let mut recording = self.recording.borrow_mut();
        recording.closes += 1;
        recording.state = GraphState::Closed;
    }
}

/// A host that never has audio.
pub struct SilentHost;

impl AudioHost for SilentHost {
    type Device = RecordingDevice;

    fn open(&mut self) -> Result<RecordingDevice, DeviceError> {
        Err(DeviceError::NoOutputDevice)
    }
}
