// Purpose: turning musical intent into tones on the graph
// Voices for the ambient progression, one-shot effects for the interface

pub mod effects;
pub mod voice;

pub use effects::{play_tone, EffectTone, CLICK, HOVER, SUCCESS_ARPEGGIO};
pub use voice::{play_note, Voice};
