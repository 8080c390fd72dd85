use std::sync::Arc;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use flashcards::audio::{best_sample_for, diminished_chord, power_chord};
use flashcards::render::{MusicXmlRenderer, NotationRenderer};
use flashcards::{FlashcardError, GameState, PitchName, QuizConfig, Session, TheoryTable};

#[derive(Serialize)]
struct GameError {
    kind: &'static str,
    message: String,
}

fn error_to_game_error(e: &FlashcardError) -> GameError {
    let kind = match e {
        FlashcardError::UnknownPitch(_) => "unknown-pitch",
        FlashcardError::UnknownKey(_) => "unknown-key",
        FlashcardError::UnknownClef(_) => "unknown-clef",
        FlashcardError::OctaveOutOfRange(_) => "octave-out-of-range",
        FlashcardError::ToneOutOfRange { .. } => "tone-out-of-range",
        FlashcardError::InvalidTransition { .. } => "invalid-transition",
        FlashcardError::Config(_) => "config",
        FlashcardError::Render(_) => "render",
    };
    GameError {
        kind,
        message: e.to_string(),
    }
}

fn to_js_error(e: FlashcardError) -> JsValue {
    let json = serde_json::to_string(&error_to_game_error(&e)).unwrap_or_else(|_| e.to_string());
    JsValue::from_str(&json)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn build_session(seed: Option<u32>, config_yaml: Option<&str>) -> Result<Session, FlashcardError> {
    let config = match config_yaml {
        Some(source) => QuizConfig::from_yaml(source)?,
        None => QuizConfig::default(),
    };
    let seed = config.seed_or(seed.map(u64::from)).ok_or_else(|| {
        FlashcardError::Config("no seed given; pass one or set `seed` in the config".to_string())
    })?;
    Ok(Session::seeded(Arc::new(TheoryTable::new()), seed, config))
}

/// A flash card game driven from JavaScript.
///
/// The page seeds the game (e.g. from `crypto.getRandomValues`), renders the
/// MusicXML from `musicxml()` with its engraver, and forwards `drainEvents()`
/// to its analytics.
#[wasm_bindgen]
pub struct FlashcardGame {
    session: Session,
}

#[wasm_bindgen]
impl FlashcardGame {
    /// An explicit `seed` takes precedence over `seed:` in the YAML
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u32>, config_yaml: Option<String>) -> Result<FlashcardGame, JsValue> {
        let session = build_session(seed, config_yaml.as_deref()).map_err(to_js_error)?;
        Ok(FlashcardGame { session })
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Returns `{ result: "drawn", ...note }` or `{ result: "finished" }`
    pub fn advance(&mut self) -> Result<JsValue, JsValue> {
        let advance = self.session.advance().map_err(to_js_error)?;
        to_js(&advance)
    }

    /// Returns `{ outcome: "correct" | "levelComplete" | "finished" | "incorrect", ... }`
    pub fn guess(&mut self, name: &str) -> Result<JsValue, JsValue> {
        let pick: PitchName = name.parse().map_err(to_js_error)?;
        let outcome = self.session.guess(pick).map_err(to_js_error)?;
        to_js(&outcome)
    }

    /// Report an engraver failure; the game stays in its error state until `reset`
    pub fn fail(&mut self, message: &str) {
        self.session.fail(message);
    }

    pub fn musicxml(&mut self) -> Result<String, JsValue> {
        self.session
            .render_with(&mut MusicXmlRenderer)
            .map_err(to_js_error)
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.snapshot())
    }

    pub fn keyboard(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.keyboard())
    }

    #[wasm_bindgen(js_name = acceptsGuesses)]
    pub fn accepts_guesses(&self) -> bool {
        self.session.accepts_guesses()
    }

    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.session.state() == GameState::Finished
    }

    /// Analytics events since the last call, oldest first
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.session.sink_mut().drain())
    }

    /// Sample and shift for the active card
    #[wasm_bindgen(js_name = activeTone)]
    pub fn active_tone(&self) -> Result<JsValue, JsValue> {
        let note = self.session.active_note();
        let tone = best_sample_for(note.tone, note.sounding_octave()).map_err(to_js_error)?;
        to_js(&tone)
    }
}

/// The 21 spellings in selector order
#[wasm_bindgen(js_name = pitchNames)]
pub fn pitch_names() -> Vec<String> {
    PitchName::ALL.iter().map(|name| name.to_string()).collect()
}

#[wasm_bindgen(js_name = voiceNote)]
pub fn voice_note(tone: u8, octave: u8) -> Result<JsValue, JsValue> {
    to_js(&best_sample_for(tone, octave).map_err(to_js_error)?)
}

#[wasm_bindgen(js_name = voicePowerChord)]
pub fn voice_power_chord(tone: u8, octave: u8) -> Result<JsValue, JsValue> {
    to_js(&power_chord(tone, octave).map_err(to_js_error)?)
}

#[wasm_bindgen(js_name = voiceDiminishedChord)]
pub fn voice_diminished_chord(tone: u8, octave: u8) -> Result<JsValue, JsValue> {
    to_js(&diminished_chord(tone, octave).map_err(to_js_error)?)
}

/// Render any note as MusicXML, e.g. for a note picker preview
#[wasm_bindgen(js_name = noteToMusicxml)]
pub fn note_to_musicxml(name: &str, octave: u8, clef: &str, key: &str) -> Result<String, JsValue> {
    let name: PitchName = name.parse().map_err(to_js_error)?;
    let octave = flashcards::Octave::new(octave).map_err(to_js_error)?;
    let clef: flashcards::Clef = clef.parse().map_err(to_js_error)?;
    let key: flashcards::KeySignature = key.parse().map_err(to_js_error)?;
    MusicXmlRenderer
        .render(&flashcards::Note::new(name, octave, clef, key))
        .map_err(to_js_error)
}
