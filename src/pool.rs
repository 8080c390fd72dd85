//! # Note Pool Generator
//!
//! Builds the quizzable notes for each difficulty level from the theory tables.
//!
//! ## Levels
//! | Level | Keys | Placements | Notes |
//! |-------|------|------------|-------|
//! | Beginner | C | C4-B4 treble | naturals only, minus the default C4 (6 notes) |
//! | Intermediate | C, F, G | octaves 2-3 bass, 4-5 treble | 36 notes |
//! | Advanced | D, A, E, B, Bb, Eb, Ab, Db | octave 3 bass, 4-5 treble | 51 notes |
//!
//! A pool never holds two notes with the same (name, octave, clef). When keys
//! share a note, the first key in the plan keeps it, so D4 in the intermediate
//! pool is read in C major rather than in F or G.
//!
//! Pools are rebuilt from scratch on every call; nothing drawn in a previous
//! game can leak into the next one.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::note::{Clef, Note, Octave};
use crate::sampler::sample;
use crate::theory::{KeySignature, PitchName, TheoryTable};

/// Difficulty tiers, in the order a game visits them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [
        DifficultyLevel::Beginner,
        DifficultyLevel::Intermediate,
        DifficultyLevel::Advanced,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The level after this one, or `None` after Advanced
    pub fn next(self) -> Option<DifficultyLevel> {
        match self {
            DifficultyLevel::Beginner => Some(DifficultyLevel::Intermediate),
            DifficultyLevel::Intermediate => Some(DifficultyLevel::Advanced),
            DifficultyLevel::Advanced => None,
        }
    }

    pub fn plan(self) -> &'static LevelPlan {
        match self {
            DifficultyLevel::Beginner => &BEGINNER_PLAN,
            DifficultyLevel::Intermediate => &INTERMEDIATE_PLAN,
            DifficultyLevel::Advanced => &ADVANCED_PLAN,
        }
    }
}

/// Recipe for one level's pool
#[derive(Debug)]
pub struct LevelPlan {
    pub keys: &'static [KeySignature],
    pub placements: &'static [(Octave, Clef)],
    /// Keep only unaltered spellings (no sharps or flats)
    pub naturals_only: bool,
    /// Leave out the default note, which opens every game
    pub excludes_default: bool,
}

const BEGINNER_PLAN: LevelPlan = LevelPlan {
    keys: &[KeySignature::C],
    placements: &[(Octave::of(4), Clef::Treble)],
    naturals_only: true,
    excludes_default: true,
};

const INTERMEDIATE_PLAN: LevelPlan = LevelPlan {
    // F major adds one flat, G major one sharp
    keys: &[KeySignature::C, KeySignature::F, KeySignature::G],
    placements: &[
        (Octave::of(2), Clef::Bass),
        (Octave::of(3), Clef::Bass),
        (Octave::of(4), Clef::Treble),
        (Octave::of(5), Clef::Treble),
    ],
    naturals_only: false,
    excludes_default: false,
};

const ADVANCED_PLAN: LevelPlan = LevelPlan {
    keys: &[
        KeySignature::D,
        KeySignature::A,
        KeySignature::E,
        KeySignature::B,
        KeySignature::BFlat,
        KeySignature::EFlat,
        KeySignature::AFlat,
        KeySignature::DFlat,
    ],
    placements: &[
        (Octave::of(3), Clef::Bass),
        (Octave::of(4), Clef::Treble),
        (Octave::of(5), Clef::Treble),
    ],
    naturals_only: false,
    excludes_default: false,
};

/// Result of drawing from a pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Draw {
    Drawn(Note),
    Exhausted,
}

/// Remaining notes for one difficulty level
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotePool {
    notes: Vec<Note>,
}

impl NotePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pool, dropping notes whose identity is already present
    pub fn from_notes<I: IntoIterator<Item = Note>>(notes: I) -> Self {
        let mut pool = Self::new();
        for note in notes {
            pool.insert(note);
        }
        pool
    }

    /// Add a note unless one with the same (name, octave, clef) is present.
    /// Returns whether the note was added.
    pub fn insert(&mut self, note: Note) -> bool {
        if self.contains(&note) {
            return false;
        }
        self.notes.push(note);
        true
    }

    /// Remove the note with this note's identity, if present
    pub fn remove(&mut self, note: &Note) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.identity() != note.identity());
        self.notes.len() != before
    }

    pub fn contains(&self, note: &Note) -> bool {
        self.notes.iter().any(|n| n.identity() == note.identity())
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Take one random note out of the pool
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Draw {
        if self.notes.is_empty() {
            return Draw::Exhausted;
        }
        let (note, rest) = sample(std::mem::take(&mut self.notes), rng);
        self.notes = rest;
        Draw::Drawn(note)
    }
}

/// One pool per difficulty level
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pools {
    pools: [NotePool; 3],
}

impl Pools {
    pub fn get(&self, level: DifficultyLevel) -> &NotePool {
        &self.pools[level.index()]
    }

    pub fn get_mut(&mut self, level: DifficultyLevel) -> &mut NotePool {
        &mut self.pools[level.index()]
    }
}

/// Builds fresh pools from a shared theory table
#[derive(Debug, Clone)]
pub struct PoolGenerator {
    theory: Arc<TheoryTable>,
}

impl PoolGenerator {
    pub fn new(theory: Arc<TheoryTable>) -> Self {
        Self { theory }
    }

    pub fn theory(&self) -> &Arc<TheoryTable> {
        &self.theory
    }

    /// Build the pool for one level, following its [`LevelPlan`]
    ///
    /// ```
    /// use std::sync::Arc;
    /// use flashcards::{DifficultyLevel, PoolGenerator, TheoryTable};
    ///
    /// let generator = PoolGenerator::new(Arc::new(TheoryTable::new()));
    /// assert_eq!(generator.pool_for(DifficultyLevel::Beginner).len(), 6);
    /// ```
    pub fn pool_for(&self, level: DifficultyLevel) -> NotePool {
        let plan = level.plan();
        let mut pool = NotePool::new();

        for &key in plan.keys {
            for &(octave, clef) in plan.placements {
                for &scale_note in self.theory.scale(key) {
                    if plan.naturals_only && !scale_note.name.is_natural() {
                        continue;
                    }
                    pool.insert(Note::from_scale(scale_note, octave, clef, key));
                }
            }
        }

        if plan.excludes_default {
            pool.remove(&Note::default_note());
        }
        pool
    }

    pub fn all_pools(&self) -> Pools {
        Pools {
            pools: DifficultyLevel::ALL.map(|level| self.pool_for(level)),
        }
    }

    /// Every distinct spelling a level can ask for
    pub fn names_in(&self, level: DifficultyLevel) -> Vec<PitchName> {
        let mut names: Vec<PitchName> = Vec::new();
        for note in self.pool_for(level).notes() {
            if !names.contains(&note.name) {
                names.push(note.name);
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::mock::StepRng;
    use std::collections::HashSet;

    fn generator() -> PoolGenerator {
        PoolGenerator::new(Arc::new(TheoryTable::new()))
    }

    fn assert_no_duplicates(pool: &NotePool) {
        let identities: HashSet<_> = pool.notes().iter().map(Note::identity).collect();
        assert_eq!(identities.len(), pool.len());
    }

    #[test]
    fn test_beginner_pool() {
        let pool = generator().pool_for(DifficultyLevel::Beginner);
        let names: Vec<&str> = pool.notes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["D", "E", "F", "G", "A", "B"]);
        assert!(!pool.contains(&Note::default_note()));
        for note in pool.notes() {
            assert_eq!(note.octave.value(), 4);
            assert_eq!(note.clef, Clef::Treble);
            assert_eq!(note.key_signature, KeySignature::C);
        }
    }

    #[test]
    fn test_intermediate_pool() {
        let generator = generator();
        let pool = generator.pool_for(DifficultyLevel::Intermediate);
        assert_eq!(pool.len(), 36);
        assert_no_duplicates(&pool);

        let names = generator.names_in(DifficultyLevel::Intermediate);
        assert_eq!(names.len(), 9);
        assert!(names.contains(&PitchName::Bb));
        assert!(names.contains(&PitchName::FSharp));

        for note in pool.notes() {
            let expected = if note.octave.value() <= 3 { Clef::Bass } else { Clef::Treble };
            assert_eq!(note.clef, expected, "{}", note);
        }
    }

    #[test]
    fn test_shared_notes_keep_first_key() {
        let pool = generator().pool_for(DifficultyLevel::Intermediate);
        let d2: Vec<&Note> = pool
            .notes()
            .iter()
            .filter(|n| n.name == PitchName::D && n.octave.value() == 2)
            .collect();
        assert_eq!(d2.len(), 1);
        assert_eq!(d2[0].key_signature, KeySignature::C);

        let b_flat = pool.notes().iter().find(|n| n.name == PitchName::Bb).unwrap();
        assert_eq!(b_flat.key_signature, KeySignature::F);
    }

    #[test]
    fn test_advanced_pool() {
        let pool = generator().pool_for(DifficultyLevel::Advanced);
        assert_eq!(pool.len(), 51);
        assert_no_duplicates(&pool);
        for note in pool.notes() {
            let expected = if note.octave.value() == 3 { Clef::Bass } else { Clef::Treble };
            assert_eq!(note.clef, expected);
            assert_eq!(note.tone, note.name.tone());
        }
    }

    #[test]
    fn test_generation_is_idempotent() {
        let generator = generator();
        assert_eq!(generator.all_pools(), generator.all_pools());
        for level in DifficultyLevel::ALL {
            assert!(!generator.pool_for(level).is_empty());
        }
    }

    #[test]
    fn test_draw_until_exhausted() {
        let mut pool = generator().pool_for(DifficultyLevel::Beginner);
        let mut rng = StepRng::new(0, 0);
        let mut drawn = Vec::new();
        while let Draw::Drawn(note) = pool.draw(&mut rng) {
            drawn.push(note.name);
        }
        assert_eq!(
            drawn,
            vec![PitchName::D, PitchName::E, PitchName::F, PitchName::G, PitchName::A, PitchName::B]
        );
        assert!(pool.is_empty());
        assert_eq!(pool.draw(&mut rng), Draw::Exhausted);
    }

    #[test]
    fn test_insert_rejects_same_identity() {
        let octave = Octave::new(4).unwrap();
        let mut pool = NotePool::new();
        assert!(pool.insert(Note::new(PitchName::E, octave, Clef::Treble, KeySignature::C)));
        assert!(!pool.insert(Note::new(PitchName::E, octave, Clef::Treble, KeySignature::G)));
        assert!(pool.insert(Note::new(PitchName::E, octave, Clef::Bass, KeySignature::C)));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_default_pools_are_empty() {
        let pools = Pools::default();
        for level in DifficultyLevel::ALL {
            assert!(pools.get(level).is_empty());
        }
    }

    #[test]
    fn test_level_order() {
        assert!(DifficultyLevel::Beginner < DifficultyLevel::Intermediate);
        assert_eq!(DifficultyLevel::Beginner.next(), Some(DifficultyLevel::Intermediate));
        assert_eq!(DifficultyLevel::Advanced.next(), None);
    }
}
