#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/*
Phase-Accumulator Oscillators
=============================

Every tone in the engine is synthesized from one of these generators. There is
no sample playback anywhere: a voice is nothing more than a couple of
oscillators multiplied by envelopes.

Vocabulary
----------

  phase       Position inside one cycle, normalised to [0.0, 1.0).
              0.0 is the start of the cycle, 0.5 the half-way point.

  increment   How far the phase moves per sample:
                  increment = frequency / sample_rate
              At 440 Hz and 48 kHz: 440 / 48000 ≈ 0.00917

  aliasing    Harmonics above Nyquist (sample_rate / 2) fold back down into
              the audible range as inharmonic junk. Waveforms with hard edges
              (saw, square) have infinite harmonics, so they alias badly when
              generated naively.


Waveforms
---------

  Sine        sin(2π · phase). Fundamental only, nothing to alias.

  Triangle    Odd harmonics falling as 1/n². The overtones are so quiet that
              the naive shape is already effectively band-limited.
              Shifted by a quarter cycle so it starts at 0.0 and rises, like
              the sine.

                  1 ┤   ╱╲
                  0 ┼──╱──╲──╱
                 -1 ┤       ╲╱

  Sawtooth    2 · phase - 1, with a PolyBLEP correction at the wrap.
  Square      ±1, with PolyBLEP corrections at both edges.


PolyBLEP
--------

A band-limited step (BLEP) is what an ideal low-passed discontinuity looks
like. PolyBLEP approximates its residual with a two-sample polynomial and
subtracts it around each edge:

    t < dt          (just after the edge)   2t - t² - 1       with t = t / dt
    t > 1 - dt      (just before the edge)  t² + 2t + 1       with t = (t - 1) / dt

It costs a couple of multiplies per sample and removes most of the audible
aliasing from saw and square waves.
*/

/// Periodic waveform produced by an [`Oscillator`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
    Square,
}

pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
    increment: f32,
    sample_rate: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f32, sample_rate: f32) -> Self {
        let mut osc = Self {
            waveform,
            phase: 0.0,
            increment: 0.0,
            sample_rate: sample_rate.max(1.0),
        };
        osc.set_frequency(frequency);
        osc
    }

    pub fn sine(frequency: f32, sample_rate: f32) -> Self {
        Self::new(Waveform::Sine, frequency, sample_rate)
    }

    pub fn triangle(frequency: f32, sample_rate: f32) -> Self {
        Self::new(Waveform::Triangle, frequency, sample_rate)
    }

    /// Change pitch without resetting phase (no click on retune).
    pub fn set_frequency(&mut self, frequency: f32) {
        // Above Nyquist the waveform is meaningless; clamp just below it.
        let nyquist = self.sample_rate * 0.5;
        self.increment = (frequency.clamp(0.0, nyquist * 0.999)) / self.sample_rate;
    }

    pub fn frequency(&self) -> f32 {
        self.increment * self.sample_rate
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Produce one sample and advance the phase.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let phase = self.phase;
        let dt = self.increment;

        let sample = match self.waveform {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Triangle => {
                let shifted = (phase + 0.25).fract();
                1.0 - 4.0 * (shifted - 0.5).abs()
            }
            Waveform::Sawtooth => (2.0 * phase - 1.0) - poly_blep(phase, dt),
            Waveform::Square => {
                let naive = if phase < 0.5 { 1.0 } else { -1.0 };
                naive + poly_blep(phase, dt) - poly_blep((phase + 0.5).fract(), dt)
            }
        };

        self.phase += dt;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        sample.clamp(-1.0, 1.0)
    }

    /// Fill `out` with consecutive samples.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }
}

#[inline]
fn poly_blep(t: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    if t < dt {
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}
