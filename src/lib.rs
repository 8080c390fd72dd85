//! # Flashcards
//!
//! Engine for a note-reading flash card game. Players see a note on a staff and
//! name it; correct answers work through Beginner, Intermediate, and Advanced
//! card pools until every card has been seen.
//!
//! The crate is split the way data flows through a game:
//! - [`theory`]: key signatures and their spelled scales
//! - [`pool`]: the card pools for each difficulty level
//! - [`sampler`]: random draws without replacement
//! - [`session`]: the game state machine
//!
//! Hosts plug in around the session through [`render::NotationRenderer`],
//! [`audio::TonePlayer`], and [`analytics::AnalyticsSink`].
//!
//! ```rust
//! use std::sync::Arc;
//! use flashcards::{PitchName, QuizConfig, Session, TheoryTable};
//!
//! let theory = Arc::new(TheoryTable::new());
//! let mut session = Session::seeded(theory, 1, QuizConfig::default());
//! session.guess(PitchName::C)?;
//! assert_eq!(session.score(), 1);
//! # Ok::<(), flashcards::FlashcardError>(())
//! ```

pub mod analytics;
pub mod audio;
pub mod config;
pub mod error;
pub mod keyboard;
pub mod note;
pub mod pool;
pub mod render;
pub mod sampler;
pub mod session;
pub mod theory;

pub use analytics::{AnalyticsSink, EventLog, GameEvent, NullSink};
pub use config::{QuizConfig, StartMode};
pub use error::FlashcardError;
pub use note::{Clef, Note, Octave};
pub use pool::{DifficultyLevel, Draw, NotePool, PoolGenerator};
pub use session::{Advance, GameState, GuessOutcome, Session, SessionSnapshot};
pub use theory::{scale_notes_for, KeySignature, PitchName, ScaleNote, TheoryTable};
