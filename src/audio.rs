//! # Tone Voicing
//!
//! The host plays notes by pitch-shifting recorded piano samples of C2 through C7.
//! This module decides which sample to use and how far to shift it; the host
//! owns the actual playback.
//!
//! ## Sample Choice
//! Shifting a sample far from its recorded pitch sounds artificial, so a tone
//! in the upper half of an octave (above F#) is voiced by shifting the next C
//! down instead of this octave's C up:
//!
//! | Note | Sample | Shift |
//! |------|--------|-------|
//! | C4 | C4 | 0 |
//! | F#4 | C4 | +6 |
//! | B4 | C5 | -1 |
//! | G6 | C7 | -5 |
//!
//! ## Chords
//! - Power chord: root, perfect fifth (+7), root an octave up
//! - Diminished triad: root, minor third (+3), diminished fifth (+6)

use serde::Serialize;

use crate::error::FlashcardError;
use crate::note::Note;
use crate::theory::NOTES_PER_OCTAVE;

pub const LOWEST_SAMPLE_OCTAVE: u8 = 2;
pub const HIGHEST_SAMPLE_OCTAVE: u8 = 7;

const PERFECT_FIFTH: u8 = 7;
const MINOR_THIRD: u8 = 3;
const DIMINISHED_FIFTH: u8 = 6;

/// A sample and the pitch shift that voices a tone with it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleTone {
    /// Octave of the C sample to play
    pub sample_octave: u8,
    /// Semitones relative to the sample
    pub shift: i8,
}

impl SampleTone {
    /// Sample file stem, e.g. `"C4"`
    pub fn sample_name(&self) -> String {
        format!("C{}", self.sample_octave)
    }

    /// Shift as a detune value in cents
    pub fn cents(&self) -> i32 {
        self.shift as i32 * 100
    }

    /// Shift as a playback-rate multiplier, for players without detune
    pub fn playback_rate(&self) -> f64 {
        2f64.powf(self.shift as f64 / NOTES_PER_OCTAVE as f64)
    }
}

/// Pick the sample closest to a tone.
///
/// ```
/// use flashcards::audio::best_sample_for;
///
/// let b4 = best_sample_for(11, 4)?;
/// assert_eq!((b4.sample_octave, b4.shift), (5, -1));
/// # Ok::<(), flashcards::FlashcardError>(())
/// ```
pub fn best_sample_for(tone: u8, octave: u8) -> Result<SampleTone, FlashcardError> {
    if tone >= NOTES_PER_OCTAVE || !(LOWEST_SAMPLE_OCTAVE..=HIGHEST_SAMPLE_OCTAVE).contains(&octave) {
        return Err(FlashcardError::ToneOutOfRange { tone, octave });
    }

    if tone > 6 && octave < HIGHEST_SAMPLE_OCTAVE {
        Ok(SampleTone {
            sample_octave: octave + 1,
            shift: tone as i8 - NOTES_PER_OCTAVE as i8,
        })
    } else {
        Ok(SampleTone {
            sample_octave: octave,
            shift: tone as i8,
        })
    }
}

/// Add an interval to a tone, carrying into the next octave
fn above(tone: u8, octave: u8, interval: u8) -> (u8, u8) {
    let raised = tone + interval;
    if raised >= NOTES_PER_OCTAVE {
        (raised - NOTES_PER_OCTAVE, octave + 1)
    } else {
        (raised, octave)
    }
}

/// Root, fifth, and octave.
///
/// When the octave above the root would need a sample above C7, the octave
/// below is used instead.
pub fn power_chord(tone: u8, octave: u8) -> Result<[SampleTone; 3], FlashcardError> {
    let root = best_sample_for(tone, octave)?;
    let (fifth, fifth_octave) = above(tone, octave, PERFECT_FIFTH);

    let mut doubled_octave = octave + 1;
    if doubled_octave == HIGHEST_SAMPLE_OCTAVE && tone > 6 {
        doubled_octave = octave - 1;
    }

    Ok([
        root,
        best_sample_for(fifth, fifth_octave)?,
        best_sample_for(tone, doubled_octave)?,
    ])
}

/// Root, minor third, and diminished fifth
pub fn diminished_chord(tone: u8, octave: u8) -> Result<[SampleTone; 3], FlashcardError> {
    let root = best_sample_for(tone, octave)?;
    let (third, third_octave) = above(tone, octave, MINOR_THIRD);
    let (fifth, fifth_octave) = above(tone, octave, DIMINISHED_FIFTH);

    Ok([
        root,
        best_sample_for(third, third_octave)?,
        best_sample_for(fifth, fifth_octave)?,
    ])
}

/// Plays voiced tones
///
/// Implementors only provide `play_tone`. Chords are fully voiced before the
/// first tone plays, so an out-of-range chord plays nothing.
pub trait TonePlayer {
    fn play_tone(&mut self, tone: SampleTone);

    fn play_note(&mut self, tone: u8, octave: u8) -> Result<(), FlashcardError> {
        self.play_tone(best_sample_for(tone, octave)?);
        Ok(())
    }

    /// Play a flash card at the pitch it sounds
    fn play_card(&mut self, note: &Note) -> Result<(), FlashcardError> {
        self.play_note(note.tone, note.sounding_octave())
    }

    fn play_power_chord(&mut self, tone: u8, octave: u8) -> Result<(), FlashcardError> {
        for sample_tone in power_chord(tone, octave)? {
            self.play_tone(sample_tone);
        }
        Ok(())
    }

    fn play_diminished_chord(&mut self, tone: u8, octave: u8) -> Result<(), FlashcardError> {
        for sample_tone in diminished_chord(tone, octave)? {
            self.play_tone(sample_tone);
        }
        Ok(())
    }
}
