/*
Note Frequencies
================

Readable names for the pitches the engine plays, in Hz. The engine works in
frequencies rather than MIDI numbers because every tone is synthesized
directly from an oscillator.

Values are twelve-tone equal temperament with A4 = 440 Hz, rounded to two
decimals as in the usual reference tables:

    frequency = 440 · 2^((n - 69) / 12)        n = MIDI note number

Naming Convention:
- Natural notes only: C4, D4, E4, ... (the progression needs no accidentals)
- Middle C is C4 ≈ 261.63 Hz

Example usage:
  [C4, E4, G4, B4]   // Cmaj7
  [A3, C4, E4, G4]   // Am7
*/

// Octave 3
pub const C3: f32 = 130.81;
pub const D3: f32 = 146.83;
pub const E3: f32 = 164.81;
pub const F3: f32 = 174.61;
pub const G3: f32 = 196.00;
pub const A3: f32 = 220.00;
pub const B3: f32 = 246.94;

// Octave 4 (Middle C octave)
pub const C4: f32 = 261.63;
pub const D4: f32 = 293.66;
pub const E4: f32 = 329.63;
pub const F4: f32 = 349.23;
pub const G4: f32 = 392.00;
pub const A4: f32 = 440.00; // A440 tuning reference
pub const B4: f32 = 493.88;

// Octave 5
pub const C5: f32 = 523.25;
pub const D5: f32 = 587.33;
pub const E5: f32 = 659.25;
pub const F5: f32 = 698.46;
pub const G5: f32 = 783.99;
pub const A5: f32 = 880.00;
pub const B5: f32 = 987.77;
