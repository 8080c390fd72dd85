//! Analytics events
//!
//! Events are observational: a session reports them and never reads anything
//! back, so a sink can drop, buffer, or forward them freely.

use serde::Serialize;

use crate::pool::DifficultyLevel;
use crate::theory::PitchName;

/// Named game events
///
/// Serialized as `{"event": "level_start", "level": "Beginner"}` and so on, which
/// maps directly onto a web analytics call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    LevelStart { level: DifficultyLevel },
    LevelEnd { level: DifficultyLevel },
    SelectContent { guess: PitchName, correct: bool },
    PostScore { score: u32 },
    Exception { description: String },
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::LevelStart { .. } => "level_start",
            GameEvent::LevelEnd { .. } => "level_end",
            GameEvent::SelectContent { .. } => "select_content",
            GameEvent::PostScore { .. } => "post_score",
            GameEvent::Exception { .. } => "exception",
        }
    }
}

/// Receiver for game events
pub trait AnalyticsSink {
    fn report(&mut self, event: GameEvent);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
    fn report(&mut self, _event: GameEvent) {}
}

/// Buffers events until a host drains them
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all buffered events, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl AnalyticsSink for EventLog {
    fn report(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
