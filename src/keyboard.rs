//! One-octave piano keyboard layout, labelled for the active card's key signature.
//!
//! Only the seven keys in the key's scale carry a label, spelled the way the key
//! spells them (F major labels the black key between A and B as `Bb`). The key
//! whose label matches the active card is marked active.

use serde::Serialize;

use crate::note::Note;
use crate::theory::{PitchName, TheoryTable, NOTES_PER_OCTAVE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyColor {
    White,
    Black,
}

/// A key on the keyboard, C first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PianoKey {
    pub tone: u8,
    pub color: KeyColor,
    /// White key drawn tucked under the preceding black key
    pub offset: bool,
    pub label: Option<PitchName>,
    pub active: bool,
}

const OCTAVE_LAYOUT: [(KeyColor, bool); NOTES_PER_OCTAVE as usize] = [
    (KeyColor::White, false), // C
    (KeyColor::Black, false),
    (KeyColor::White, true), // D
    (KeyColor::Black, false),
    (KeyColor::White, true), // E
    (KeyColor::White, false), // F
    (KeyColor::Black, false),
    (KeyColor::White, true), // G
    (KeyColor::Black, false),
    (KeyColor::White, true), // A
    (KeyColor::Black, false),
    (KeyColor::White, true), // B
];

pub fn keyboard_for(note: &Note, theory: &TheoryTable) -> Vec<PianoKey> {
    OCTAVE_LAYOUT
        .iter()
        .enumerate()
        .map(|(tone, &(color, offset))| {
            let tone = tone as u8;
            let label = theory.name_for_tone(note.key_signature, tone);
            PianoKey {
                tone,
                color,
                offset,
                label,
                active: label == Some(note.name),
            }
        })
        .collect()
}
