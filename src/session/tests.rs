use super::*;
use crate::analytics::NullSink;
use crate::note::{Clef, Octave};
use crate::theory::KeySignature;
use pretty_assertions::assert_eq;
use rand::rngs::mock::StepRng;

fn theory() -> Arc<TheoryTable> {
    Arc::new(TheoryTable::new())
}

/// Session that always draws the first note left in the pool
fn first_pick_session(config: QuizConfig) -> Session<StepRng, EventLog> {
    Session::new(theory(), StepRng::new(0, 0), EventLog::new(), config)
}

fn wrong_guess_for(note: &Note) -> PitchName {
    if note.name == PitchName::Ab {
        PitchName::A
    } else {
        PitchName::Ab
    }
}

/// Guess every card correctly until the game ends, returning the outcomes
fn play_perfectly<R: Rng, S: AnalyticsSink>(session: &mut Session<R, S>) -> Vec<GuessOutcome> {
    let mut outcomes = Vec::new();
    loop {
        let outcome = session.guess(session.active_note().name).unwrap();
        outcomes.push(outcome);
        if let GuessOutcome::Finished { .. } = outcome {
            return outcomes;
        }
        assert!(matches!(session.advance().unwrap(), Advance::Drawn(_)));
    }
}

#[test]
fn test_new_session_shows_default_note() {
    let session = first_pick_session(QuizConfig::default());
    assert_eq!(session.state(), GameState::NotStarted);
    assert_eq!(session.difficulty(), DifficultyLevel::Beginner);
    assert_eq!(session.score(), 0);
    assert_eq!(*session.active_note(), Note::default_note());
    assert_eq!(session.remaining(DifficultyLevel::Beginner), 6);
    assert_eq!(session.remaining(DifficultyLevel::Intermediate), 36);
    assert_eq!(session.remaining(DifficultyLevel::Advanced), 51);
    assert!(session.accepts_guesses());
    assert_eq!(
        session.sink().events(),
        &[GameEvent::LevelStart {
            level: DifficultyLevel::Beginner
        }]
    );
}

#[test]
fn test_draw_immediately_start_mode() {
    let config = QuizConfig {
        start_mode: StartMode::DrawImmediately,
        ..QuizConfig::default()
    };
    let session = first_pick_session(config);
    assert_eq!(session.state(), GameState::WaitingForGuess);
    assert_eq!(session.active_note().name, PitchName::D);
    assert_eq!(session.remaining(DifficultyLevel::Beginner), 5);
}

#[test]
fn test_correct_guess_increments_score() {
    let mut session = first_pick_session(QuizConfig::default());
    assert_eq!(session.guess(PitchName::C).unwrap(), GuessOutcome::Correct);
    assert_eq!(session.score(), 1);
    assert_eq!(session.state(), GameState::CorrectGuess);
    assert!(!session.accepts_guesses());

    // the default note was never in the pool
    assert_eq!(session.remaining(DifficultyLevel::Beginner), 6);
}

#[test]
fn test_advance_draws_from_current_level() {
    let mut session = first_pick_session(QuizConfig::default());
    session.guess(PitchName::C).unwrap();

    let drawn = session.advance().unwrap();
    let expected = Note::new(PitchName::D, Octave::new(4).unwrap(), Clef::Treble, KeySignature::C);
    assert_eq!(drawn, Advance::Drawn(expected));
    assert_eq!(*session.active_note(), expected);
    assert_eq!(session.state(), GameState::WaitingForGuess);
    assert_eq!(session.remaining(DifficultyLevel::Beginner), 5);
}

#[test]
fn test_incorrect_guess_resets_difficulty_but_keeps_score() {
    let mut session = first_pick_session(QuizConfig::default());
    let outcomes: Vec<GuessOutcome> = (0..7)
        .map(|_| {
            let outcome = session.guess(session.active_note().name).unwrap();
            session.advance().unwrap();
            outcome
        })
        .collect();
    assert_eq!(
        outcomes.last(),
        Some(&GuessOutcome::LevelComplete {
            next: DifficultyLevel::Intermediate
        })
    );
    assert_eq!(session.difficulty(), DifficultyLevel::Intermediate);
    assert_eq!(session.score(), 7);

    let answer = session.active_note().name;
    let outcome = session.guess(wrong_guess_for(session.active_note())).unwrap();
    assert_eq!(outcome, GuessOutcome::Incorrect { answer });
    assert_eq!(session.state(), GameState::IncorrectGuess);
    assert_eq!(session.difficulty(), DifficultyLevel::Beginner);
    assert_eq!(session.score(), 7);
    assert_eq!(session.remaining(DifficultyLevel::Beginner), 6);
    assert_eq!(session.remaining(DifficultyLevel::Intermediate), 36);
}

#[test]
fn test_incorrect_guess_reports_score_by_default() {
    let mut session = first_pick_session(QuizConfig::default());
    session.sink_mut().drain();
    session.guess(PitchName::D).unwrap();
    assert_eq!(
        session.sink_mut().drain(),
        vec![
            GameEvent::SelectContent {
                guess: PitchName::D,
                correct: false
            },
            GameEvent::PostScore { score: 0 },
        ]
    );

    let config = QuizConfig {
        report_score_on_miss: false,
        ..QuizConfig::default()
    };
    let mut quiet = first_pick_session(config);
    quiet.sink_mut().drain();
    quiet.guess(PitchName::D).unwrap();
    assert_eq!(quiet.sink().events().len(), 1);
}

#[test]
fn test_full_game_finishes_after_advanced() {
    let mut session = first_pick_session(QuizConfig::default());
    let outcomes = play_perfectly(&mut session);

    // default note + 6 beginner + 36 intermediate + 51 advanced
    assert_eq!(outcomes.len(), 94);
    assert_eq!(outcomes.last(), Some(&GuessOutcome::Finished { score: 94 }));
    assert_eq!(session.state(), GameState::Finished);
    assert_eq!(session.difficulty(), DifficultyLevel::Advanced);

    let level_changes: Vec<&GuessOutcome> = outcomes
        .iter()
        .filter(|o| matches!(o, GuessOutcome::LevelComplete { .. }))
        .collect();
    assert_eq!(
        level_changes,
        vec![
            &GuessOutcome::LevelComplete {
                next: DifficultyLevel::Intermediate
            },
            &GuessOutcome::LevelComplete {
                next: DifficultyLevel::Advanced
            },
        ]
    );
}

#[test]
fn test_finished_is_frozen() {
    let mut session = Session::seeded(theory(), 11, QuizConfig::default());
    play_perfectly(&mut session);
    let before = session.snapshot();

    assert_eq!(session.advance().unwrap(), Advance::Finished);
    assert_eq!(
        session.guess(PitchName::C),
        Err(FlashcardError::InvalidTransition {
            state: GameState::Finished,
            action: "guess"
        })
    );
    assert_eq!(session.snapshot(), before);
    assert_eq!(before.score, 94);
    assert_eq!(before.remaining, 0);
}

#[test]
fn test_full_game_events() {
    let mut session = Session::new(theory(), StepRng::new(0, 0), EventLog::new(), QuizConfig::default());
    play_perfectly(&mut session);

    let milestones: Vec<GameEvent> = session
        .sink_mut()
        .drain()
        .into_iter()
        .filter(|e| e.name() != "select_content")
        .collect();
    assert_eq!(
        milestones,
        vec![
            GameEvent::LevelStart {
                level: DifficultyLevel::Beginner
            },
            GameEvent::LevelEnd {
                level: DifficultyLevel::Beginner
            },
            GameEvent::LevelStart {
                level: DifficultyLevel::Intermediate
            },
            GameEvent::LevelEnd {
                level: DifficultyLevel::Intermediate
            },
            GameEvent::LevelStart {
                level: DifficultyLevel::Advanced
            },
            GameEvent::LevelEnd {
                level: DifficultyLevel::Advanced
            },
            GameEvent::PostScore { score: 94 },
        ]
    );
}

#[test]
fn test_seeded_sessions_are_reproducible() {
    let mut first = Session::seeded(theory(), 2024, QuizConfig::default());
    let mut second = Session::seeded(theory(), 2024, QuizConfig::default());
    first.guess(PitchName::C).unwrap();
    second.guess(PitchName::C).unwrap();
    for _ in 0..5 {
        assert_eq!(first.advance().unwrap(), second.advance().unwrap());
        let name = first.active_note().name;
        first.guess(name).unwrap();
        second.guess(name).unwrap();
    }
}

#[test]
fn test_invalid_transitions_leave_session_untouched() {
    let mut session = first_pick_session(QuizConfig::default());
    session.guess(PitchName::C).unwrap();
    let before = session.snapshot();

    // CorrectGuess waits for advance
    assert_eq!(
        session.guess(PitchName::D),
        Err(FlashcardError::InvalidTransition {
            state: GameState::CorrectGuess,
            action: "guess"
        })
    );
    assert_eq!(session.snapshot(), before);

    session.advance().unwrap();
    session.guess(PitchName::Ab).unwrap();
    let missed = session.snapshot();
    assert_eq!(
        session.advance(),
        Err(FlashcardError::InvalidTransition {
            state: GameState::IncorrectGuess,
            action: "advance"
        })
    );
    assert_eq!(session.snapshot(), missed);
}

#[test]
fn test_waiting_card_cannot_be_skipped() {
    let mut session = first_pick_session(QuizConfig::default());
    session.guess(PitchName::C).unwrap();
    session.advance().unwrap();
    let waiting = session.snapshot();

    assert_eq!(
        session.advance(),
        Err(FlashcardError::InvalidTransition {
            state: GameState::WaitingForGuess,
            action: "advance"
        })
    );
    assert_eq!(session.snapshot(), waiting);
    assert_eq!(session.remaining(DifficultyLevel::Beginner), 5);
}

#[test]
fn test_only_correct_guesses_promote() {
    let mut session = first_pick_session(QuizConfig::default());
    session.guess(PitchName::C).unwrap();
    for _ in 0..100 {
        if session.advance().is_err() {
            break;
        }
    }
    assert_eq!(session.state(), GameState::WaitingForGuess);
    assert_eq!(session.difficulty(), DifficultyLevel::Beginner);
    assert_eq!(session.score(), 1);
}

#[test]
fn test_advance_skips_default_card() {
    let mut session = first_pick_session(QuizConfig::default());
    assert!(matches!(session.advance().unwrap(), Advance::Drawn(_)));
    assert_eq!(session.state(), GameState::WaitingForGuess);
    assert_eq!(session.score(), 0);
}

#[test]
fn test_reset_restores_initial_state() {
    let mut session = first_pick_session(QuizConfig::default());
    session.guess(PitchName::C).unwrap();
    session.advance().unwrap();
    session.guess(PitchName::Ab).unwrap();

    session.reset();
    assert_eq!(session.state(), GameState::NotStarted);
    assert_eq!(session.score(), 0);
    assert_eq!(session.difficulty(), DifficultyLevel::Beginner);
    assert_eq!(*session.active_note(), Note::default_note());
    assert_eq!(session.remaining(DifficultyLevel::Beginner), 6);
}

#[test]
fn test_fail_enters_error_until_reset() {
    let mut session = first_pick_session(QuizConfig::default());
    session.fail("engraver crashed");

    assert_eq!(session.state(), GameState::Error);
    assert_eq!(session.error_message(), Some("engraver crashed"));
    assert!(session.guess(PitchName::C).is_err());
    assert!(session.advance().is_err());
    assert_eq!(
        session.sink().events().last(),
        Some(&GameEvent::Exception {
            description: "engraver crashed".to_string()
        })
    );

    session.reset();
    assert_eq!(session.state(), GameState::NotStarted);
    assert_eq!(session.error_message(), None);
}

struct BrokenRenderer;

impl NotationRenderer for BrokenRenderer {
    type Output = ();

    fn render(&mut self, _note: &Note) -> Result<(), FlashcardError> {
        Err(FlashcardError::Render("no staff".to_string()))
    }
}

#[test]
fn test_render_failure_moves_to_error() {
    let mut session = first_pick_session(QuizConfig::default());
    let err = session.render_with(&mut BrokenRenderer).unwrap_err();
    assert_eq!(err, FlashcardError::Render("no staff".to_string()));
    assert_eq!(session.state(), GameState::Error);
    assert_eq!(session.error_message(), Some("Rendering failed: no staff"));
}

#[test]
fn test_render_with_text_renderer() {
    let mut session = first_pick_session(QuizConfig::default());
    let text = session
        .render_with(&mut crate::render::StaffTextRenderer)
        .unwrap();
    assert!(text.starts_with("C4 | treble clef"));
    assert_eq!(session.state(), GameState::NotStarted);
}

#[test]
fn test_keyboard_follows_active_note() {
    let mut session = first_pick_session(QuizConfig::default());
    let keys = session.keyboard();
    assert!(keys[0].active);

    session.guess(PitchName::C).unwrap();
    session.advance().unwrap();
    let active: Vec<u8> = session.keyboard().iter().filter(|k| k.active).map(|k| k.tone).collect();
    assert_eq!(active, vec![2]);
}

#[test]
fn test_null_sink_session() {
    let mut session = Session::new(theory(), StepRng::new(0, 0), NullSink, QuizConfig::default());
    assert_eq!(session.guess(PitchName::C).unwrap(), GuessOutcome::Correct);
}

#[test]
fn test_snapshot_serialization() {
    let session = first_pick_session(QuizConfig::default());
    let json = serde_json::to_value(session.snapshot()).unwrap();
    assert_eq!(json["state"], "NotStarted");
    assert_eq!(json["difficulty"], "Beginner");
    assert_eq!(json["activeNote"]["name"], "C");
    assert_eq!(json["remaining"], 6);
    assert_eq!(json["acceptsGuesses"], true);
    assert!(json["errorMessage"].is_null());
}
