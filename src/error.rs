//! # Error Types
//!
//! This module defines all error types for the flash card engine.
//!
//! Pool exhaustion is not an error: it is reported through
//! [`Draw::Exhausted`](crate::pool::Draw) and [`Advance::Finished`](crate::session::Advance).
//! The variants here cover bad input from a host (unknown spellings, octaves outside
//! the piano), transitions the game does not allow, configuration problems, and
//! rendering faults.
//!
//! ## Usage
//! ```rust
//! use flashcards::{FlashcardError, PitchName};
//!
//! match "H#".parse::<PitchName>() {
//!     Ok(name) => println!("Guessed {}", name),
//!     Err(FlashcardError::UnknownPitch(text)) => eprintln!("Not a note name: {}", text),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

use crate::session::GameState;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlashcardError {
    /// A pitch spelling outside the 21 supported names.
    ///
    /// # Example
    /// ```
    /// # use flashcards::FlashcardError;
    /// let err = FlashcardError::UnknownPitch("H".to_string());
    /// assert_eq!(err.to_string(), "Unknown pitch name: H");
    /// ```
    #[error("Unknown pitch name: {0}")]
    UnknownPitch(String),

    /// A key signature name outside the 30 supported keys.
    #[error("Unknown key signature: {0}")]
    UnknownKey(String),

    /// A clef name other than `treble` or `bass`.
    #[error("Unknown clef: {0}")]
    UnknownClef(String),

    /// An octave outside the 88-key piano range (1 to 7).
    #[error("Octave {0} is outside the piano range (1-7)")]
    OctaveOutOfRange(u8),

    /// A tone that no loaded sample can voice.
    #[error("No sample can play tone {tone} in octave {octave}")]
    ToneOutOfRange { tone: u8, octave: u8 },

    /// An action the game does not allow in its current state.
    ///
    /// # Example
    /// ```
    /// # use flashcards::{FlashcardError, GameState};
    /// let err = FlashcardError::InvalidTransition {
    ///     state: GameState::Finished,
    ///     action: "guess",
    /// };
    /// assert_eq!(err.to_string(), "Cannot guess while the game is Finished");
    /// ```
    #[error("Cannot {action} while the game is {state:?}")]
    InvalidTransition { state: GameState, action: &'static str },

    /// Invalid quiz configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The notation renderer could not draw a note.
    #[error("Rendering failed: {0}")]
    Render(String),
}
