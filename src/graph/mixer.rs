use crate::{dsp::Oscillator, graph::Tone};

/*
Tone Mixer
==========

The mixer is the end of every signal path. It owns the device clock (frames
rendered so far) and the set of tones attached to the output.

Each block:

  1. For every tone, find the slice of the block it overlaps:

         block      |<──────────── out.len() ────────────>|
         tone A          |<───── start … end ─────>|
         tone B   ...────────────>|                        (started earlier)
         tone C                                        |<──…  (not due yet)

  2. For each overlapping sample, add oscillator × envelope gain. The gain is
     evaluated at the sample's absolute time, so a tone scheduled between two
     blocks still starts on the right sample.

  3. Advance the clock and drop every tone whose end has passed. Tones clean
     themselves up; nobody has to remember to disconnect them.

Tone storage is allocated once with room for MAX_TONES, so the render path
never allocates. When the pool is full, new tones are dropped and counted.
*/

/// Maximum number of tones attached at the same time.
pub const MAX_TONES: usize = 256;

/// Messages from the control side to whoever owns the mixer.
#[derive(Debug, Clone, Copy)]
pub enum GraphCommand {
    Connect(Tone),
    /// Silence everything immediately.
    Clear,
}

struct ActiveTone {
    tone: Tone,
    osc: Oscillator,
    start_frame: u64,
    end_frame: u64,
}

pub struct Mixer {
    sample_rate: f32,
    frames: u64,
    tones: Vec<ActiveTone>,
    dropped: u64,
}

impl Mixer {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate: sample_rate.max(1.0),
            frames: 0,
            tones: Vec::with_capacity(MAX_TONES),
            dropped: 0,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Frames rendered since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn current_time(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    pub fn handle(&mut self, command: GraphCommand) {
        match command {
            GraphCommand::Connect(tone) => {
                self.connect(tone);
            }
            GraphCommand::Clear => self.clear(),
        }
    }

    /// Attach a tone. Returns false if it was dropped.
    pub fn connect(&mut self, tone: Tone) -> bool {
        let rate = self.sample_rate as f64;
        let end_frame = (tone.end() * rate).round().max(0.0) as u64;
        if end_frame <= self.frames {
            // Already over
            return false;
        }

        if self.tones.len() >= MAX_TONES {
            self.dropped += 1;
            return false;
        }

        self.tones.push(ActiveTone {
            osc: Oscillator::new(tone.waveform, tone.frequency, self.sample_rate),
            start_frame: (tone.start * rate).round().max(0.0) as u64,
            end_frame,
            tone,
        });
        true
    }

    pub fn clear(&mut self) {
        self.tones.clear();
    }

    /// Render one block, replacing the contents of `out`.
    pub fn render(&mut self, out: &mut [f32]) {
        out.fill(0.0);

        let block_start = self.frames;
        let block_end = block_start + out.len() as u64;
        let rate = self.sample_rate as f64;

        for active in &mut self.tones {
            if active.start_frame >= block_end || active.end_frame <= block_start {
                continue;
            }

            let first = active.start_frame.saturating_sub(block_start) as usize;
            let last = (active.end_frame.min(block_end) - block_start) as usize;

            for (i, sample) in out[first..last].iter_mut().enumerate() {
                let time = (block_start + (first + i) as u64) as f64 / rate;
                *sample += active.osc.next_sample() * active.tone.gain_at(time);
            }
        }

        self.frames = block_end;
        let now = self.frames;
        self.tones.retain(|active| active.end_frame > now);
    }

    /// Tones attached and already sounding.
    pub fn active_tones(&self) -> usize {
        self.tones
            .iter()
            .filter(|active| active.start_frame <= self.frames)
            .count()
    }

    /// Tones attached, sounding or waiting for their start time.
    pub fn scheduled_tones(&self) -> usize {
        self.tones.len()
    }

    /// Tones rejected because the pool was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
