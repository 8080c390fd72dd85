//! Quizzable notes: a spelled pitch placed in an octave on a clef, read in a key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FlashcardError;
use crate::theory::{KeySignature, PitchName, ScaleNote, SCALE_SIZE};

/// Staff clef
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clef {
    Treble,
    Bass,
}

impl Clef {
    pub fn as_str(self) -> &'static str {
        match self {
            Clef::Treble => "treble",
            Clef::Bass => "bass",
        }
    }
}

impl fmt::Display for Clef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Clef {
    type Err = FlashcardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "treble" => Ok(Clef::Treble),
            "bass" => Ok(Clef::Bass),
            other => Err(FlashcardError::UnknownClef(other.to_string())),
        }
    }
}

/// Scientific-pitch octave on an 88-key piano (1 to 7, C4 = middle C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Octave(u8);

impl Octave {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 7;

    pub fn new(value: u8) -> Result<Self, FlashcardError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(FlashcardError::OctaveOutOfRange(value))
        }
    }

    /// Octave for fixed tables; out-of-range values fail const evaluation
    pub(crate) const fn of(value: u8) -> Self {
        assert!(value >= Self::MIN && value <= Self::MAX);
        Self(value)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Octave {
    type Error = FlashcardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Octave::new(value)
    }
}

impl From<Octave> for u8 {
    fn from(octave: Octave) -> u8 {
        octave.0
    }
}

impl fmt::Display for Octave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single flash card
///
/// `tone` is always `name.tone()`; build notes with [`Note::new`] or
/// [`Note::from_scale`] to keep the two in step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub name: PitchName,
    pub tone: u8,
    pub octave: Octave,
    pub clef: Clef,
    pub key_signature: KeySignature,
}

impl Note {
    pub fn new(name: PitchName, octave: Octave, clef: Clef, key_signature: KeySignature) -> Self {
        Self {
            name,
            tone: name.tone(),
            octave,
            clef,
            key_signature,
        }
    }

    pub fn from_scale(scale_note: ScaleNote, octave: Octave, clef: Clef, key_signature: KeySignature) -> Self {
        Self {
            name: scale_note.name,
            tone: scale_note.tone,
            octave,
            clef,
            key_signature,
        }
    }

    /// The note shown before the first draw of every game: C4, treble clef, C major
    pub fn default_note() -> Self {
        Self::new(PitchName::C, Octave::of(4), Clef::Treble, KeySignature::C)
    }

    /// Physical identity used for deduplication; the key signature is ignored
    pub fn identity(&self) -> (PitchName, Octave, Clef) {
        (self.name, self.octave, self.clef)
    }

    /// Diatonic staff position: letters counted upward from C1 = 7
    ///
    /// The octave is the written octave, so `Cb4` and `B#3` sit on the C4 and B3
    /// positions respectively.
    pub fn staff_step(&self) -> i16 {
        self.octave.value() as i16 * SCALE_SIZE as i16 + self.name.letter().index() as i16
    }

    /// Octave the note actually sounds in. `Cb` sounds in the octave below its
    /// written octave and `B#` in the octave above.
    pub fn sounding_octave(&self) -> u8 {
        match self.name {
            PitchName::Cb => self.octave.value() - 1,
            PitchName::BSharp => self.octave.value() + 1,
            _ => self.octave.value(),
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}
