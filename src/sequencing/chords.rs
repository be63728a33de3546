/*
The Progression
===============

Four seventh chords in C major, cycling I → IV → V → vi and back to I:

    I     Cmaj7   C4  E4  G4  B4     hopeful, open
    IV    Fmaj7   F3  A3  C4  E4     longing
    V     G7      G3  B3  D4  F4     tension, wants to resolve
    vi    Am7     A3  C4  E4  G4     melancholy, lands softly back on I

Voicings keep common tones in place (C4 and E4 appear in three of the four
chords) so the strummed pad drifts rather than jumps between changes.
*/

use super::notes::{A3, B3, B4, C4, D4, E4, F3, F4, G3, G4};

/// A four-note chord.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chord {
    pub name: &'static str,
    /// Roman numeral of the chord's degree in the key
    pub numeral: &'static str,
    /// Frequencies in Hz, lowest first, in strum order
    pub notes: [f32; 4],
}

pub const PROGRESSION: [Chord; 4] = [
    Chord {
        name: "Cmaj7",
        numeral: "I",
        notes: [C4, E4, G4, B4],
    },
    Chord {
        name: "Fmaj7",
        numeral: "IV",
        notes: [F3, A3, C4, E4],
    },
    Chord {
        name: "G7",
        numeral: "V",
        notes: [G3, B3, D4, F4],
    },
    Chord {
        name: "Am7",
        numeral: "vi",
        notes: [A3, C4, E4, G4],
    },
];

/// Chord at `index` in the progression.
///
/// Indices are always kept in range by [`next_index`]; anything else is a
/// bug, caught in debug builds and wrapped in release builds.
pub fn chord_at(index: usize) -> &'static Chord {
    debug_assert!(index < PROGRESSION.len(), "chord index {index} out of range");
    &PROGRESSION[index % PROGRESSION.len()]
}

/// Index after `index`, wrapping back to the tonic.
pub fn next_index(index: usize) -> usize {
    (index + 1) % PROGRESSION.len()
}

/// Index `steps` chords after `index`.
pub fn advance_index(index: usize, steps: u64) -> usize {
    let len = PROGRESSION.len();
    (index % len + (steps % len as u64) as usize) % len
}
