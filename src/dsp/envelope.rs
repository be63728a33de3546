use crate::{ENVELOPE_FLOOR, MIN_TIME};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Attack / Hold / Release Envelope
================================

This module implements the amplitude curve every tone in the engine wears.
Unlike a gated ADSR there is no note-off: the whole shape is known the moment
a note is scheduled, so the envelope is a pure function of elapsed time. That
is what lets notes be scheduled seconds ahead of the device clock.

Vocabulary
----------

  elapsed       Seconds since the tone's start time. Negative while the tone
                is still waiting to begin.

  peak          Linear gain reached at the end of the attack (e.g. 0.05).

  hold          How long after the start the tone is "held". The tone
                always ends at hold + release. The decay begins at
                max(attack, hold), so a hold shorter than the attack squeezes
                the decay into whatever is left after the attack.

  floor         Terminal value of the exponential release. It must be
                strictly greater than zero: an exponential curve can never
                reach zero, and aiming at it divides by zero.


The Shape
---------

  gain
   peak ┤      ╭────────────╮
        │     ╱              ╲
        │    ╱                 ╲_
        │   ╱                    ‾‾──__
  floor ┤  ╱                           ‾‾──┐
      0 └─╱────────────────────────────────┴──→ elapsed
          0   attack      release_start      hold + release
          │←─ linear ─→│←── held ──→│←──── exponential ────→│


The Math
--------

Attack is a straight line:

    gain = peak · elapsed / attack

Release is an exponential glide from peak to floor, ending at `hold + release`:

    end    = max(hold + release, attack + MIN_TIME)
    window = end - release_start
    x      = (elapsed - release_start) / window          (0 → 1)
    gain   = peak · (floor / peak)^x

When hold >= attack the window is exactly `release`. A hold shorter than the
attack shortens the window instead of pushing the end out, so the tone still
reaches the floor at hold + release. A hold of zero with an attack longer
than the release degenerates to a MIN_TIME drop straight after the attack.

At x = 0 this is `peak`, at x = 1 it is exactly `floor`. Exponential decay
sounds natural because loudness is perceived logarithmically: every equal
slice of time drops the level by the same number of decibels.

If `peak` is at or below the floor there is nothing to decay towards, so the
release falls back to a linear ramp to zero.

Past the end of the release the tone is finished and the gain is zero.
*/

/// Which part of the curve a given elapsed time falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Pending, // not started yet
    Attack,  // linear ramp towards peak
    Hold,    // sitting at peak
    Release, // exponential decay towards the floor
    Finished,
}

/// A fully-determined amplitude envelope.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeShape {
    attack: f64,
    hold: f64,
    release: f64,
    peak: f32,
}

impl EnvelopeShape {
    pub fn new(attack: f64, hold: f64, release: f64, peak: f32) -> Self {
        Self {
            attack: attack.max(MIN_TIME),
            hold: hold.max(0.0),
            release: release.max(MIN_TIME),
            peak: peak.max(0.0),
        }
    }

    // Accessors clamp again: deserialized values skip `new`

    pub fn attack(&self) -> f64 {
        self.attack.max(MIN_TIME)
    }

    pub fn hold(&self) -> f64 {
        self.hold.max(0.0)
    }

    pub fn release(&self) -> f64 {
        self.release.max(MIN_TIME)
    }

    pub fn peak(&self) -> f32 {
        self.peak.max(0.0)
    }

    /// Elapsed time at which the decay begins.
    pub fn release_start(&self) -> f64 {
        self.attack().max(self.hold())
    }

    /// Total lifetime of the tone: `hold + release`, but never inside the attack.
    pub fn duration(&self) -> f64 {
        (self.hold() + self.release()).max(self.attack() + MIN_TIME)
    }

    /// Length of the exponential decay. Equals `release` unless the hold is
    /// shorter than the attack.
    pub fn release_window(&self) -> f64 {
        self.duration() - self.release_start()
    }

    pub fn stage_at(&self, elapsed: f64) -> EnvelopeStage {
        if elapsed < 0.0 {
            EnvelopeStage::Pending
        } else if elapsed < self.attack() {
            EnvelopeStage::Attack
        } else if elapsed < self.release_start() {
            EnvelopeStage::Hold
        } else if elapsed < self.duration() {
            EnvelopeStage::Release
        } else {
            EnvelopeStage::Finished
        }
    }

    /// Linear gain at `elapsed` seconds after the tone's start.
    pub fn gain_at(&self, elapsed: f64) -> f32 {
        let peak = self.peak();
        let gain = match self.stage_at(elapsed) {
            EnvelopeStage::Pending | EnvelopeStage::Finished => 0.0,
            EnvelopeStage::Attack => peak * (elapsed / self.attack()) as f32,
            EnvelopeStage::Hold => peak,
            EnvelopeStage::Release => {
                let progress = ((elapsed - self.release_start()) / self.release_window()) as f32;
                if peak > ENVELOPE_FLOOR {
                    peak * (ENVELOPE_FLOOR / peak).powf(progress)
                } else {
                    peak * (1.0 - progress)
                }
            }
        };

        gain.clamp(0.0, peak)
    }

    /// Render gains for consecutive samples starting at `elapsed`.
    pub fn render(&self, buffer: &mut [f32], elapsed: f64, sample_rate: f32) {
        let step = 1.0 / sample_rate as f64;
        for (i, sample) in buffer.iter_mut().enumerate() {
            *sample = self.gain_at(elapsed + i as f64 * step);
        }
    }
}
