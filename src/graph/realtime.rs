//! Real-time output through cpal.
//!
//! The mixer lives inside the audio callback. The control side talks to it
//! through a lock-free `rtrb` ring of [`GraphCommand`]s and reads the device
//! clock from an atomic frame counter the callback publishes after every
//! buffer. Nothing in the callback allocates, locks or logs.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, PushError, RingBuffer};
use tracing::{error, info, warn};

use crate::{
    error::DeviceError,
    graph::{AudioDevice, AudioGraph, AudioHost, GraphCommand, GraphState, Mixer, Tone},
    MAX_BLOCK_SIZE,
};

const COMMAND_QUEUE_SIZE: usize = 512;

/// Opens the system's default output device.
#[derive(Default)]
pub struct CpalHost {
    scope: Option<Producer<f32>>,
}

impl CpalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also copy the mono mix into a ring of `capacity` samples for
    /// visualisation. Samples are dropped when the reader falls behind.
    pub fn with_scope(capacity: usize) -> (Self, Consumer<f32>) {
        let (tx, rx) = RingBuffer::<f32>::new(capacity.max(1));
        (Self { scope: Some(tx) }, rx)
    }
}

impl AudioHost for CpalHost {
    type Device = CpalDevice;

    fn open(&mut self) -> Result<CpalDevice, DeviceError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(DeviceError::NoOutputDevice)?;
        let config = device.default_output_config()?;
        if config.sample_format() != cpal::SampleFormat::F32 {
            return Err(DeviceError::UnsupportedFormat(format!(
                "{:?}",
                config.sample_format()
            )));
        }

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let (commands, mut command_rx) = RingBuffer::<GraphCommand>::new(COMMAND_QUEUE_SIZE);
        let frames = Arc::new(AtomicU64::new(0));

        let stream = device.build_output_stream(
            &config.into(),
            {
                let mut mixer = Mixer::new(sample_rate);
                let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
                let mut scope = self.scope.take();
                let clock = Arc::clone(&frames);
                move |data: &mut [f32], _| {
                    while let Ok(command) = command_rx.pop() {
                        mixer.handle(command);
                    }

                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;
                    while frames_written < total_frames {
                        let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                        let block = &mut render_buf[..frames_to_render];
                        mixer.render(block);

                        // Duplicate mono to all channels
                        let out_off = frames_written * channels;
                        for (i, &s) in block.iter().enumerate() {
                            for ch in 0..channels {
                                data[out_off + i * channels + ch] = s;
                            }
                        }

                        if let Some(tap) = scope.as_mut() {
                            for &s in block.iter() {
                                if let Err(PushError::Full(_)) = tap.push(s) {
                                    break;
                                }
                            }
                        }

                        frames_written += frames_to_render;
                    }

                    clock.store(mixer.frames(), Ordering::Release);
                }
            },
            |err| error!(%err, "Audio stream error."),
            None,
        )?;

        // Streams may start playing as soon as they are built; hold output
        // until the first resume.
        let state = match stream.pause() {
            Ok(()) => GraphState::Suspended,
            Err(err) => {
                warn!(%err, "Could not pause new output stream, treating it as running.");
                GraphState::Running
            }
        };

        info!(sample_rate, channels, "Opened audio output device.");

        Ok(CpalDevice {
            stream,
            commands,
            frames,
            sample_rate,
            state,
        })
    }
}

pub struct CpalDevice {
    stream: cpal::Stream,
    commands: Producer<GraphCommand>,
    frames: Arc<AtomicU64>,
    sample_rate: f32,
    state: GraphState,
}

impl CpalDevice {
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

impl AudioGraph for CpalDevice {
    fn current_time(&self) -> f64 {
        self.frames.load(Ordering::Acquire) as f64 / self.sample_rate as f64
    }

    fn connect(&mut self, tone: Tone) {
        if self.state == GraphState::Closed {
            return;
        }
        if let Err(PushError::Full(_)) = self.commands.push(GraphCommand::Connect(tone)) {
            warn!(frequency = tone.frequency, "Tone queue full, dropping tone.");
        }
    }
}

impl AudioDevice for CpalDevice {
    fn state(&self) -> GraphState {
        self.state
    }

    fn resume(&mut self) {
        if self.state != GraphState::Suspended {
            return;
        }
        match self.stream.play() {
            Ok(()) => self.state = GraphState::Running,
            Err(err) => warn!(%err, "Failed to resume audio output."),
        }
    }

    fn close(&mut self) {
        if self.state == GraphState::Closed {
            return;
        }
        let _ = self.commands.push(GraphCommand::Clear);
        if let Err(err) = self.stream.pause() {
            warn!(%err, "Failed to pause audio output while closing.");
        }
        self.state = GraphState::Closed;
    }
}
