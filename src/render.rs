//! # Notation Rendering
//!
//! A session hands its active card to a [`NotationRenderer`]; a renderer error
//! moves the session into its `Error` state.
//!
//! Two renderers ship with the crate:
//! - [`MusicXmlRenderer`] writes a one-measure MusicXML 4.0 document for a
//!   browser engraver
//! - [`StaffTextRenderer`] describes where the note sits on the staff, for the
//!   terminal host
//!
//! ## Example
//! ```rust
//! use flashcards::note::Note;
//! use flashcards::render::{NotationRenderer, StaffTextRenderer};
//!
//! let text = StaffTextRenderer.render(&Note::default_note())?;
//! assert_eq!(text, "C4 | treble clef | key of C, no sharps or flats | ledger line 1 below the staff");
//! # Ok::<(), flashcards::FlashcardError>(())
//! ```

use std::fmt;
use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::FlashcardError;
use crate::note::{Clef, Note};
use crate::theory::{Accidental, KeySignature, Letter, SCALE_SIZE};

/// Draws a single flash card
pub trait NotationRenderer {
    type Output;

    fn render(&mut self, note: &Note) -> Result<Self::Output, FlashcardError>;
}

const MUSICXML_DOCTYPE: &str = r#"score-partwise PUBLIC "-//Recordare//DTD MusicXML 4.0 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd""#;

/// Renders a card as a MusicXML `score-partwise` document
#[derive(Debug, Clone, Copy, Default)]
pub struct MusicXmlRenderer;

impl MusicXmlRenderer {
    pub fn to_musicxml(note: &Note) -> Result<String, FlashcardError> {
        let mut xml = XmlOut::new();

        xml.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;
        xml.event(Event::DocType(BytesText::from_escaped(MUSICXML_DOCTYPE)))?;
        xml.open_with("score-partwise", &[("version", "4.0")])?;

        xml.open("part-list")?;
        xml.open_with("score-part", &[("id", "P1")])?;
        xml.text_element("part-name", "Flash card")?;
        xml.close("score-part")?;
        xml.close("part-list")?;

        xml.open_with("part", &[("id", "P1")])?;
        xml.open_with("measure", &[("number", "1")])?;

        xml.open("attributes")?;
        xml.text_element("divisions", "1")?;
        xml.open("key")?;
        xml.text_element("fifths", &note.key_signature.fifths().to_string())?;
        xml.text_element("mode", note.key_signature.mode().as_str())?;
        xml.close("key")?;
        xml.open_with("time", &[("print-object", "no")])?;
        xml.text_element("beats", "4")?;
        xml.text_element("beat-type", "4")?;
        xml.close("time")?;
        let (sign, line) = clef_sign(note.clef);
        xml.open("clef")?;
        xml.text_element("sign", sign)?;
        xml.text_element("line", line)?;
        xml.close("clef")?;
        xml.close("attributes")?;

        xml.open("note")?;
        xml.open("pitch")?;
        xml.text_element("step", note.name.letter().as_str())?;
        let alter = note.name.accidental().offset();
        if alter != 0 {
            xml.text_element("alter", &alter.to_string())?;
        }
        xml.text_element("octave", &note.octave.to_string())?;
        xml.close("pitch")?;
        xml.text_element("duration", "4")?;
        xml.text_element("type", "whole")?;
        xml.close("note")?;

        xml.close("measure")?;
        xml.close("part")?;
        xml.close("score-partwise")?;

        xml.finish()
    }
}

impl NotationRenderer for MusicXmlRenderer {
    type Output = String;

    fn render(&mut self, note: &Note) -> Result<String, FlashcardError> {
        Self::to_musicxml(note)
    }
}

fn clef_sign(clef: Clef) -> (&'static str, &'static str) {
    match clef {
        Clef::Treble => ("G", "2"),
        Clef::Bass => ("F", "4"),
    }
}

/// Indented XML writer that reports failures as render errors
struct XmlOut {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), FlashcardError> {
        self.writer
            .write_event(event)
            .map_err(|e| FlashcardError::Render(e.to_string()))
    }

    fn open(&mut self, name: &str) -> Result<(), FlashcardError> {
        self.event(Event::Start(BytesStart::new(name)))
    }

    fn open_with(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), FlashcardError> {
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.event(Event::Start(start))
    }

    fn close(&mut self, name: &str) -> Result<(), FlashcardError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<(), FlashcardError> {
        self.open(name)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    fn finish(self) -> Result<String, FlashcardError> {
        let bytes = self.writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| FlashcardError::Render(e.to_string()))
    }
}

/// Where a note head sits relative to the five staff lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffPlacement {
    /// Staff line, 1 = bottom
    Line(u8),
    /// Staff space, 1 = bottom
    Space(u8),
    /// Below the staff; `on_line` means the head sits on the lowest ledger line
    Below { ledger_lines: u8, on_line: bool },
    Above { ledger_lines: u8, on_line: bool },
}

/// Steps above the bottom staff line; negative below it
pub fn staff_offset(note: &Note) -> i16 {
    note.staff_step() - bottom_line_step(note.clef)
}

fn bottom_line_step(clef: Clef) -> i16 {
    // E4 for treble, G2 for bass
    let (octave, letter) = match clef {
        Clef::Treble => (4, Letter::E),
        Clef::Bass => (2, Letter::G),
    };
    octave * SCALE_SIZE as i16 + letter.index() as i16
}

const TOP_LINE_OFFSET: i16 = 8;

impl StaffPlacement {
    pub fn of(note: &Note) -> Self {
        Self::from_offset(staff_offset(note))
    }

    pub fn from_offset(offset: i16) -> Self {
        let on_line = offset % 2 == 0;
        if offset < 0 {
            StaffPlacement::Below {
                ledger_lines: (-offset / 2) as u8,
                on_line,
            }
        } else if offset > TOP_LINE_OFFSET {
            StaffPlacement::Above {
                ledger_lines: ((offset - TOP_LINE_OFFSET) / 2) as u8,
                on_line,
            }
        } else if on_line {
            StaffPlacement::Line((offset / 2 + 1) as u8)
        } else {
            StaffPlacement::Space((offset / 2 + 1) as u8)
        }
    }

    pub fn ledger_lines(self) -> u8 {
        match self {
            StaffPlacement::Below { ledger_lines, .. } | StaffPlacement::Above { ledger_lines, .. } => ledger_lines,
            _ => 0,
        }
    }
}

impl fmt::Display for StaffPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            StaffPlacement::Line(n) => write!(f, "line {}", n),
            StaffPlacement::Space(n) => write!(f, "space {}", n),
            StaffPlacement::Below { ledger_lines: 0, .. } => f.write_str("just below the staff"),
            StaffPlacement::Above { ledger_lines: 0, .. } => f.write_str("just above the staff"),
            StaffPlacement::Below { ledger_lines, on_line: true } => {
                write!(f, "ledger line {} below the staff", ledger_lines)
            }
            StaffPlacement::Below { ledger_lines, on_line: false } => {
                write!(f, "under ledger line {} below the staff", ledger_lines)
            }
            StaffPlacement::Above { ledger_lines, on_line: true } => {
                write!(f, "ledger line {} above the staff", ledger_lines)
            }
            StaffPlacement::Above { ledger_lines, on_line: false } => {
                write!(f, "over ledger line {} above the staff", ledger_lines)
            }
        }
    }
}

fn describe_key(key: KeySignature) -> String {
    let fifths = key.fifths();
    let count = fifths.unsigned_abs();
    let accidental = match fifths.signum() {
        0 => return format!("key of {}, no sharps or flats", key),
        1 => Accidental::Sharp,
        _ => Accidental::Flat,
    };
    let word = match (accidental, count) {
        (Accidental::Sharp, 1) => "sharp",
        (Accidental::Sharp, _) => "sharps",
        (_, 1) => "flat",
        _ => "flats",
    };
    format!("key of {}, {} {}", key, count, word)
}

/// Plain-text card description for terminals
#[derive(Debug, Clone, Copy, Default)]
pub struct StaffTextRenderer;

impl NotationRenderer for StaffTextRenderer {
    type Output = String;

    fn render(&mut self, note: &Note) -> Result<String, FlashcardError> {
        Ok(format!(
            "{} | {} clef | {} | {}",
            note,
            note.clef,
            describe_key(note.key_signature),
            StaffPlacement::of(note)
        ))
    }
}
