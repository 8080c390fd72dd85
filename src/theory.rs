//! # Music Theory Tables
//!
//! Pitch spellings, key signatures, and the diatonic scale of every key.
//!
//! ## Spelling
//! A scale always uses seven consecutive letters starting at the tonic letter.
//! Each letter takes the accidental the key signature assigns to it, so F major
//! spells its fourth degree `Bb` (never `A#`) and F# major spells its seventh
//! degree `E#` (never `F`).
//!
//! Sharps are added in the order F C G D A E B, flats in the order B E A D G C F.
//! A minor key uses the signature of its relative major (A minor = C major,
//! B minor = D major, ...), which yields the natural minor scale.
//!
//! ## Memoization
//! [`TheoryTable`] computes every key's scale once at construction. The pool
//! generator, the keyboard layout, and the session share one table through an
//! `Arc` instead of a global.
//!
//! ## Example
//! ```rust
//! use flashcards::{KeySignature, PitchName, TheoryTable};
//!
//! let table = TheoryTable::new();
//! let f_major: Vec<PitchName> = table.scale(KeySignature::F).iter().map(|n| n.name).collect();
//! assert_eq!(f_major[3], PitchName::Bb);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FlashcardError;

pub const NOTES_PER_OCTAVE: u8 = 12;
pub const SCALE_SIZE: usize = 7;

/// Natural note letters, in ascending order from C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const ALL: [Letter; SCALE_SIZE] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Position within the octave (C = 0, B = 6)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Semitones above C for the natural note
    pub fn tone(self) -> u8 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    /// The letter `steps` scale degrees above this one, wrapping after B
    pub fn up(self, steps: usize) -> Letter {
        Letter::ALL[(self.index() + steps) % SCALE_SIZE]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Letter::C => "C",
            Letter::D => "D",
            Letter::E => "E",
            Letter::F => "F",
            Letter::G => "G",
            Letter::A => "A",
            Letter::B => "B",
        }
    }
}

/// Accidental attached to a letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accidental {
    Flat,
    Natural,
    Sharp,
}

impl Accidental {
    /// Semitone adjustment (-1, 0, +1)
    pub fn offset(self) -> i8 {
        match self {
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
        }
    }
}

/// One of the 21 pitch spellings a player can guess
///
/// Declaration order is the order shown in the guess selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchName {
    Ab,
    A,
    #[serde(rename = "A#")]
    ASharp,
    Bb,
    B,
    #[serde(rename = "B#")]
    BSharp,
    Cb,
    C,
    #[serde(rename = "C#")]
    CSharp,
    Db,
    D,
    #[serde(rename = "D#")]
    DSharp,
    Eb,
    E,
    #[serde(rename = "E#")]
    ESharp,
    Fb,
    F,
    #[serde(rename = "F#")]
    FSharp,
    Gb,
    G,
    #[serde(rename = "G#")]
    GSharp,
}

impl PitchName {
    pub const ALL: [PitchName; 21] = [
        PitchName::Ab,
        PitchName::A,
        PitchName::ASharp,
        PitchName::Bb,
        PitchName::B,
        PitchName::BSharp,
        PitchName::Cb,
        PitchName::C,
        PitchName::CSharp,
        PitchName::Db,
        PitchName::D,
        PitchName::DSharp,
        PitchName::Eb,
        PitchName::E,
        PitchName::ESharp,
        PitchName::Fb,
        PitchName::F,
        PitchName::FSharp,
        PitchName::Gb,
        PitchName::G,
        PitchName::GSharp,
    ];

    /// Spell a letter with an accidental
    pub fn from_parts(letter: Letter, accidental: Accidental) -> PitchName {
        use Accidental::*;
        match (letter, accidental) {
            (Letter::A, Flat) => PitchName::Ab,
            (Letter::A, Natural) => PitchName::A,
            (Letter::A, Sharp) => PitchName::ASharp,
            (Letter::B, Flat) => PitchName::Bb,
            (Letter::B, Natural) => PitchName::B,
            (Letter::B, Sharp) => PitchName::BSharp,
            (Letter::C, Flat) => PitchName::Cb,
            (Letter::C, Natural) => PitchName::C,
            (Letter::C, Sharp) => PitchName::CSharp,
            (Letter::D, Flat) => PitchName::Db,
            (Letter::D, Natural) => PitchName::D,
            (Letter::D, Sharp) => PitchName::DSharp,
            (Letter::E, Flat) => PitchName::Eb,
            (Letter::E, Natural) => PitchName::E,
            (Letter::E, Sharp) => PitchName::ESharp,
            (Letter::F, Flat) => PitchName::Fb,
            (Letter::F, Natural) => PitchName::F,
            (Letter::F, Sharp) => PitchName::FSharp,
            (Letter::G, Flat) => PitchName::Gb,
            (Letter::G, Natural) => PitchName::G,
            (Letter::G, Sharp) => PitchName::GSharp,
        }
    }

    pub fn letter(self) -> Letter {
        use PitchName::*;
        match self {
            Ab | A | ASharp => Letter::A,
            Bb | B | BSharp => Letter::B,
            Cb | C | CSharp => Letter::C,
            Db | D | DSharp => Letter::D,
            Eb | E | ESharp => Letter::E,
            Fb | F | FSharp => Letter::F,
            Gb | G | GSharp => Letter::G,
        }
    }

    pub fn accidental(self) -> Accidental {
        use PitchName::*;
        match self {
            Ab | Bb | Cb | Db | Eb | Fb | Gb => Accidental::Flat,
            A | B | C | D | E | F | G => Accidental::Natural,
            ASharp | BSharp | CSharp | DSharp | ESharp | FSharp | GSharp => Accidental::Sharp,
        }
    }

    pub fn is_natural(self) -> bool {
        self.accidental() == Accidental::Natural
    }

    /// Chromatic tone value 0-11 (C = 0). Wraps, so `B#` is 0 and `Cb` is 11.
    pub fn tone(self) -> u8 {
        let tone = self.letter().tone() as i8 + self.accidental().offset();
        tone.rem_euclid(NOTES_PER_OCTAVE as i8) as u8
    }

    pub fn as_str(self) -> &'static str {
        use PitchName::*;
        match self {
            Ab => "Ab",
            A => "A",
            ASharp => "A#",
            Bb => "Bb",
            B => "B",
            BSharp => "B#",
            Cb => "Cb",
            C => "C",
            CSharp => "C#",
            Db => "Db",
            D => "D",
            DSharp => "D#",
            Eb => "Eb",
            E => "E",
            ESharp => "E#",
            Fb => "Fb",
            F => "F",
            FSharp => "F#",
            Gb => "Gb",
            G => "G",
            GSharp => "G#",
        }
    }
}

impl fmt::Display for PitchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PitchName {
    type Err = FlashcardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        PitchName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == trimmed)
            .ok_or_else(|| FlashcardError::UnknownPitch(trimmed.to_string()))
    }
}

/// Major or (natural) minor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    /// Semitones from the tonic to each scale degree
    pub fn intervals(self) -> [u8; SCALE_SIZE] {
        match self {
            Mode::Major => [0, 2, 4, 5, 7, 9, 11],
            Mode::Minor => [0, 2, 3, 5, 7, 8, 10],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::Minor => "minor",
        }
    }
}

const SHARP_ORDER: [Letter; SCALE_SIZE] = [
    Letter::F,
    Letter::C,
    Letter::G,
    Letter::D,
    Letter::A,
    Letter::E,
    Letter::B,
];

const FLAT_ORDER: [Letter; SCALE_SIZE] = [
    Letter::B,
    Letter::E,
    Letter::A,
    Letter::D,
    Letter::G,
    Letter::C,
    Letter::F,
];

/// The 15 major and 15 minor key signatures
///
/// Declaration order matches [`KeySignature::ALL`], which [`TheoryTable`] relies on
/// for indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeySignature {
    C,
    F,
    #[serde(rename = "Bb")]
    BFlat,
    #[serde(rename = "Eb")]
    EFlat,
    #[serde(rename = "Ab")]
    AFlat,
    #[serde(rename = "Db")]
    DFlat,
    #[serde(rename = "Gb")]
    GFlat,
    #[serde(rename = "Cb")]
    CFlat,
    G,
    D,
    A,
    E,
    B,
    #[serde(rename = "F#")]
    FSharp,
    #[serde(rename = "C#")]
    CSharp,
    #[serde(rename = "Am")]
    AMinor,
    #[serde(rename = "Dm")]
    DMinor,
    #[serde(rename = "Gm")]
    GMinor,
    #[serde(rename = "Cm")]
    CMinor,
    #[serde(rename = "Fm")]
    FMinor,
    #[serde(rename = "Bbm")]
    BFlatMinor,
    #[serde(rename = "Ebm")]
    EFlatMinor,
    #[serde(rename = "Abm")]
    AFlatMinor,
    #[serde(rename = "Em")]
    EMinor,
    #[serde(rename = "Bm")]
    BMinor,
    #[serde(rename = "F#m")]
    FSharpMinor,
    #[serde(rename = "C#m")]
    CSharpMinor,
    #[serde(rename = "G#m")]
    GSharpMinor,
    #[serde(rename = "D#m")]
    DSharpMinor,
    #[serde(rename = "A#m")]
    ASharpMinor,
}

impl KeySignature {
    pub const COUNT: usize = 30;

    pub const ALL: [KeySignature; KeySignature::COUNT] = [
        KeySignature::C,
        KeySignature::F,
        KeySignature::BFlat,
        KeySignature::EFlat,
        KeySignature::AFlat,
        KeySignature::DFlat,
        KeySignature::GFlat,
        KeySignature::CFlat,
        KeySignature::G,
        KeySignature::D,
        KeySignature::A,
        KeySignature::E,
        KeySignature::B,
        KeySignature::FSharp,
        KeySignature::CSharp,
        KeySignature::AMinor,
        KeySignature::DMinor,
        KeySignature::GMinor,
        KeySignature::CMinor,
        KeySignature::FMinor,
        KeySignature::BFlatMinor,
        KeySignature::EFlatMinor,
        KeySignature::AFlatMinor,
        KeySignature::EMinor,
        KeySignature::BMinor,
        KeySignature::FSharpMinor,
        KeySignature::CSharpMinor,
        KeySignature::GSharpMinor,
        KeySignature::DSharpMinor,
        KeySignature::ASharpMinor,
    ];

    /// Position in [`KeySignature::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn tonic(self) -> PitchName {
        use KeySignature::*;
        match self {
            C => PitchName::C,
            F => PitchName::F,
            BFlat => PitchName::Bb,
            EFlat => PitchName::Eb,
            AFlat => PitchName::Ab,
            DFlat => PitchName::Db,
            GFlat => PitchName::Gb,
            CFlat => PitchName::Cb,
            G => PitchName::G,
            D => PitchName::D,
            A => PitchName::A,
            E => PitchName::E,
            B => PitchName::B,
            FSharp => PitchName::FSharp,
            CSharp => PitchName::CSharp,
            AMinor => PitchName::A,
            DMinor => PitchName::D,
            GMinor => PitchName::G,
            CMinor => PitchName::C,
            FMinor => PitchName::F,
            BFlatMinor => PitchName::Bb,
            EFlatMinor => PitchName::Eb,
            AFlatMinor => PitchName::Ab,
            EMinor => PitchName::E,
            BMinor => PitchName::B,
            FSharpMinor => PitchName::FSharp,
            CSharpMinor => PitchName::CSharp,
            GSharpMinor => PitchName::GSharp,
            DSharpMinor => PitchName::DSharp,
            ASharpMinor => PitchName::ASharp,
        }
    }

    pub fn mode(self) -> Mode {
        if self.index() < 15 {
            Mode::Major
        } else {
            Mode::Minor
        }
    }

    /// Number of sharps (positive) or flats (negative) in the signature
    pub fn fifths(self) -> i8 {
        use KeySignature::*;
        match self {
            C | AMinor => 0,
            G | EMinor => 1,
            D | BMinor => 2,
            A | FSharpMinor => 3,
            E | CSharpMinor => 4,
            B | GSharpMinor => 5,
            FSharp | DSharpMinor => 6,
            CSharp | ASharpMinor => 7,
            F | DMinor => -1,
            BFlat | GMinor => -2,
            EFlat | CMinor => -3,
            AFlat | FMinor => -4,
            DFlat | BFlatMinor => -5,
            GFlat | EFlatMinor => -6,
            CFlat | AFlatMinor => -7,
        }
    }

    /// The accidental this signature applies to a letter
    pub fn accidental_for(self, letter: Letter) -> Accidental {
        let fifths = self.fifths();
        let count = fifths.unsigned_abs() as usize;
        if fifths > 0 && SHARP_ORDER[..count].contains(&letter) {
            Accidental::Sharp
        } else if fifths < 0 && FLAT_ORDER[..count].contains(&letter) {
            Accidental::Flat
        } else {
            Accidental::Natural
        }
    }

    pub fn as_str(self) -> &'static str {
        use KeySignature::*;
        match self {
            C => "C",
            F => "F",
            BFlat => "Bb",
            EFlat => "Eb",
            AFlat => "Ab",
            DFlat => "Db",
            GFlat => "Gb",
            CFlat => "Cb",
            G => "G",
            D => "D",
            A => "A",
            E => "E",
            B => "B",
            FSharp => "F#",
            CSharp => "C#",
            AMinor => "Am",
            DMinor => "Dm",
            GMinor => "Gm",
            CMinor => "Cm",
            FMinor => "Fm",
            BFlatMinor => "Bbm",
            EFlatMinor => "Ebm",
            AFlatMinor => "Abm",
            EMinor => "Em",
            BMinor => "Bm",
            FSharpMinor => "F#m",
            CSharpMinor => "C#m",
            GSharpMinor => "G#m",
            DSharpMinor => "D#m",
            ASharpMinor => "A#m",
        }
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeySignature {
    type Err = FlashcardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        KeySignature::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == trimmed)
            .ok_or_else(|| FlashcardError::UnknownKey(trimmed.to_string()))
    }
}

/// One degree of a scale: its spelling and chromatic tone value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ScaleNote {
    pub name: PitchName,
    pub tone: u8,
}

/// Compute the diatonic scale of a key, starting at the tonic.
///
/// ```
/// use flashcards::{scale_notes_for, KeySignature, PitchName};
///
/// let g_major = scale_notes_for(KeySignature::G);
/// assert_eq!(g_major[6].name, PitchName::FSharp);
/// assert_eq!(g_major[6].tone, 6);
/// ```
pub fn scale_notes_for(key: KeySignature) -> [ScaleNote; SCALE_SIZE] {
    let tonic_letter = key.tonic().letter();
    let mut notes = [ScaleNote {
        name: key.tonic(),
        tone: key.tonic().tone(),
    }; SCALE_SIZE];

    for (degree, note) in notes.iter_mut().enumerate() {
        let letter = tonic_letter.up(degree);
        let name = PitchName::from_parts(letter, key.accidental_for(letter));
        *note = ScaleNote {
            name,
            tone: name.tone(),
        };
    }
    notes
}

/// Scale of every key signature, computed once
#[derive(Debug, Clone)]
pub struct TheoryTable {
    scales: [[ScaleNote; SCALE_SIZE]; KeySignature::COUNT],
}

impl TheoryTable {
    pub fn new() -> Self {
        Self {
            scales: KeySignature::ALL.map(scale_notes_for),
        }
    }

    /// Ordered scale notes for a key, tonic first
    pub fn scale(&self, key: KeySignature) -> &[ScaleNote] {
        &self.scales[key.index()]
    }

    /// The spelling a key uses for a chromatic tone, if the tone is in its scale
    pub fn name_for_tone(&self, key: KeySignature, tone: u8) -> Option<PitchName> {
        self.scale(key)
            .iter()
            .find(|note| note.tone == tone)
            .map(|note| note.name)
    }
}

impl Default for TheoryTable {
    fn default() -> Self {
        Self::new()
    }
}
