//! # Game Progression
//!
//! [`Session`] owns one playthrough: the three note pools, the current
//! difficulty, the active card, the score, and the [`GameState`].
//!
//! ## States
//! ```text
//! NotStarted ──guess──▶ CorrectGuess ──advance──▶ WaitingForGuess ──guess──▶ CorrectGuess
//!     │                      │                          │
//!     │                      └─ last card of Advanced ─▶ Finished
//!     └──────guess (wrong)───────────────────────────────┴──▶ IncorrectGuess
//!
//! any state ──fail / render error──▶ Error
//! any state ──reset──▶ NotStarted
//! ```
//!
//! A correct guess that empties the current pool promotes the difficulty right
//! away (or finishes the game after Advanced), so the next `advance` already
//! draws from the new level. A wrong guess rebuilds every pool and drops back to
//! Beginner; the score is kept until `reset`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use flashcards::{GameState, GuessOutcome, PitchName, QuizConfig, Session, TheoryTable};
//!
//! let mut session = Session::seeded(Arc::new(TheoryTable::new()), 7, QuizConfig::default());
//! assert_eq!(session.state(), GameState::NotStarted);
//!
//! // Every game opens on C4
//! assert_eq!(session.guess(PitchName::C)?, GuessOutcome::Correct);
//! assert_eq!(session.score(), 1);
//!
//! session.advance()?;
//! assert_eq!(session.state(), GameState::WaitingForGuess);
//! # Ok::<(), flashcards::FlashcardError>(())
//! ```

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::analytics::{AnalyticsSink, EventLog, GameEvent};
use crate::config::{QuizConfig, StartMode};
use crate::error::FlashcardError;
use crate::keyboard::{keyboard_for, PianoKey};
use crate::note::Note;
use crate::pool::{DifficultyLevel, Draw, PoolGenerator, Pools};
use crate::render::NotationRenderer;
use crate::theory::{PitchName, TheoryTable};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GameState {
    NotStarted,
    WaitingForGuess,
    CorrectGuess,
    IncorrectGuess,
    Finished,
    Error,
}

/// Result of asking for the next card
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum Advance {
    Drawn(Note),
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum GuessOutcome {
    Correct,
    /// Correct, and it emptied the level's pool
    LevelComplete { next: DifficultyLevel },
    /// Correct, and it was the last Advanced card
    Finished { score: u32 },
    Incorrect { answer: PitchName },
}

/// Read-only view of a session for hosts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub state: GameState,
    pub difficulty: DifficultyLevel,
    pub score: u32,
    pub active_note: Note,
    /// Cards left in the current level
    pub remaining: usize,
    pub accepts_guesses: bool,
    pub error_message: Option<String>,
}

/// One game playthrough
pub struct Session<R = Pcg32, S = EventLog> {
    generator: PoolGenerator,
    rng: R,
    sink: S,
    config: QuizConfig,
    pools: Pools,
    difficulty: DifficultyLevel,
    active_note: Note,
    score: u32,
    state: GameState,
    error_message: Option<String>,
}

impl Session<Pcg32, EventLog> {
    /// Session with a seeded PCG sampler and a buffering event log
    pub fn seeded(theory: Arc<TheoryTable>, seed: u64, config: QuizConfig) -> Self {
        Self::new(theory, Pcg32::seed_from_u64(seed), EventLog::new(), config)
    }
}

impl<R: Rng, S: AnalyticsSink> Session<R, S> {
    pub fn new(theory: Arc<TheoryTable>, rng: R, sink: S, config: QuizConfig) -> Self {
        let mut session = Self {
            generator: PoolGenerator::new(theory),
            rng,
            sink,
            config,
            pools: Pools::default(),
            difficulty: DifficultyLevel::Beginner,
            active_note: Note::default_note(),
            score: 0,
            state: GameState::NotStarted,
            error_message: None,
        };
        session.reset();
        session
    }

    /// Start over: fresh pools, Beginner, score zero, default card.
    ///
    /// This is the only way out of `Error`.
    pub fn reset(&mut self) {
        self.pools = self.generator.all_pools();
        self.difficulty = DifficultyLevel::Beginner;
        self.score = 0;
        self.active_note = Note::default_note();
        self.error_message = None;
        self.state = GameState::NotStarted;
        self.sink.report(GameEvent::LevelStart {
            level: self.difficulty,
        });

        if self.config.start_mode == StartMode::DrawImmediately {
            self.draw_next();
        }
    }

    /// Draw the next card from the current level.
    ///
    /// Allowed after a correct guess, and in `NotStarted` to skip the default
    /// card. A card waiting for an answer cannot be skipped.
    pub fn advance(&mut self) -> Result<Advance, FlashcardError> {
        match self.state {
            GameState::NotStarted | GameState::CorrectGuess => Ok(self.draw_next()),
            GameState::Finished => Ok(Advance::Finished),
            state => Err(FlashcardError::InvalidTransition {
                state,
                action: "advance",
            }),
        }
    }

    /// Check a guess against the active card
    pub fn guess(&mut self, pick: PitchName) -> Result<GuessOutcome, FlashcardError> {
        if !self.accepts_guesses() {
            return Err(FlashcardError::InvalidTransition {
                state: self.state,
                action: "guess",
            });
        }

        let correct = pick == self.active_note.name;
        self.sink.report(GameEvent::SelectContent { guess: pick, correct });

        if !correct {
            self.state = GameState::IncorrectGuess;
            self.pools = self.generator.all_pools();
            self.difficulty = DifficultyLevel::Beginner;
            if self.config.report_score_on_miss {
                self.sink.report(GameEvent::PostScore { score: self.score });
            }
            return Ok(GuessOutcome::Incorrect {
                answer: self.active_note.name,
            });
        }

        self.score += 1;
        self.state = GameState::CorrectGuess;

        if !self.pools.get(self.difficulty).is_empty() {
            return Ok(GuessOutcome::Correct);
        }
        Ok(match self.complete_level() {
            Some(next) => GuessOutcome::LevelComplete { next },
            None => GuessOutcome::Finished { score: self.score },
        })
    }

    /// Record an unrecoverable fault from the host
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.sink.report(GameEvent::Exception {
            description: message.clone(),
        });
        self.error_message = Some(message);
        self.state = GameState::Error;
    }

    /// Render the active card; a renderer error moves the session to `Error`
    pub fn render_with<N: NotationRenderer>(&mut self, renderer: &mut N) -> Result<N::Output, FlashcardError> {
        if self.state == GameState::Error {
            return Err(FlashcardError::InvalidTransition {
                state: self.state,
                action: "render",
            });
        }
        renderer.render(&self.active_note).map_err(|e| {
            self.fail(e.to_string());
            e
        })
    }

    fn draw_next(&mut self) -> Advance {
        loop {
            match self.pools.get_mut(self.difficulty).draw(&mut self.rng) {
                Draw::Drawn(note) => {
                    self.active_note = note;
                    self.state = GameState::WaitingForGuess;
                    return Advance::Drawn(note);
                }
                Draw::Exhausted => {
                    if self.complete_level().is_none() {
                        return Advance::Finished;
                    }
                }
            }
        }
    }

    /// Close out the current level, returning the level promoted to
    fn complete_level(&mut self) -> Option<DifficultyLevel> {
        self.sink.report(GameEvent::LevelEnd {
            level: self.difficulty,
        });
        match self.difficulty.next() {
            Some(next) => {
                self.difficulty = next;
                self.sink.report(GameEvent::LevelStart { level: next });
                Some(next)
            }
            None => {
                self.state = GameState::Finished;
                self.sink.report(GameEvent::PostScore { score: self.score });
                None
            }
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn difficulty(&self) -> DifficultyLevel {
        self.difficulty
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn active_note(&self) -> &Note {
        &self.active_note
    }

    /// Cards left to draw in a level
    pub fn remaining(&self, level: DifficultyLevel) -> usize {
        self.pools.get(level).len()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn accepts_guesses(&self) -> bool {
        matches!(self.state, GameState::NotStarted | GameState::WaitingForGuess)
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn theory(&self) -> &Arc<TheoryTable> {
        self.generator.theory()
    }

    /// Keyboard labelled for the active card's key
    pub fn keyboard(&self) -> Vec<PianoKey> {
        keyboard_for(&self.active_note, self.generator.theory())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            difficulty: self.difficulty,
            score: self.score,
            active_note: self.active_note,
            remaining: self.remaining(self.difficulty),
            accepts_guesses: self.accepts_guesses(),
            error_message: self.error_message.clone(),
        }
    }
}
