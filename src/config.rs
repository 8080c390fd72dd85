//! # Quiz Configuration
//!
//! Hosts can tune a session with a small YAML document:
//!
//! ```yaml
//! seed: 42
//! start-mode: show-default      # or draw-immediately
//! report-score-on-miss: true
//! ```
//!
//! Every key is optional. An empty document gives [`QuizConfig::default`].
//!
//! ```rust
//! use flashcards::{QuizConfig, StartMode};
//!
//! let config = QuizConfig::from_yaml("start-mode: draw-immediately")?;
//! assert_eq!(config.start_mode, StartMode::DrawImmediately);
//! assert_eq!(config.seed, None);
//! # Ok::<(), flashcards::FlashcardError>(())
//! ```

use serde::Deserialize;

use crate::error::FlashcardError;

/// What a fresh game shows first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartMode {
    /// Show the default C4 card and wait in `NotStarted`
    #[default]
    ShowDefault,
    /// Draw the first beginner card immediately
    DrawImmediately,
}

impl StartMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "show-default" => Some(StartMode::ShowDefault),
            "draw-immediately" => Some(StartMode::DrawImmediately),
            _ => None,
        }
    }
}

/// Session settings
#[derive(Debug, Clone, PartialEq)]
pub struct QuizConfig {
    /// Seed for the note sampler; hosts pick one when absent
    pub seed: Option<u64>,
    pub start_mode: StartMode,
    /// Report the score to analytics when a wrong guess ends the run
    pub report_score_on_miss: bool,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            seed: None,
            start_mode: StartMode::default(),
            report_score_on_miss: true,
        }
    }
}

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawQuizConfig {
    pub seed: Option<u64>,
    pub start_mode: Option<String>,
    pub report_score_on_miss: Option<bool>,
}

impl QuizConfig {
    pub fn from_yaml(source: &str) -> Result<Self, FlashcardError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawQuizConfig =
            serde_yaml::from_str(source).map_err(|e| FlashcardError::Config(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Seed a host should use: its own explicit seed first, then the configured one
    pub fn seed_or(&self, explicit: Option<u64>) -> Option<u64> {
        explicit.or(self.seed)
    }

    pub fn from_raw(raw: RawQuizConfig) -> Result<Self, FlashcardError> {
        let defaults = Self::default();
        let start_mode = match raw.start_mode {
            Some(mode) => StartMode::from_str(&mode).ok_or_else(|| {
                FlashcardError::Config(format!(
                    "start-mode must be show-default or draw-immediately, got '{}'",
                    mode
                ))
            })?,
            None => defaults.start_mode,
        };

        Ok(Self {
            seed: raw.seed,
            start_mode,
            report_score_on_miss: raw.report_score_on_miss.unwrap_or(defaults.report_score_on_miss),
        })
    }
}
