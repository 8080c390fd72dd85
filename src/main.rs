use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

use flashcards::render::{MusicXmlRenderer, StaffTextRenderer};
use flashcards::{
    keyboard::KeyColor, Advance, FlashcardError, GameState, GuessOutcome, PitchName, QuizConfig,
    Session, TheoryTable,
};

#[derive(Parser, Debug)]
#[command(name = "flashcards", about = "Practice reading notes on the staff")]
struct Args {
    /// Seed for the card order (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// YAML quiz configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print analytics events to stderr as they happen
    #[arg(long)]
    show_events: bool,
}

fn main() {
    let args = Args::parse();

    let config = match load_config(args.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let seed = config.seed_or(args.seed).unwrap_or_else(clock_seed);
    let mut session = Session::seeded(Arc::new(TheoryTable::new()), seed, config);

    println!("Name each note. Commands: next, keys, xml, reset, quit");
    show_card(&mut session);
    prompt();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                process::exit(1);
            }
        };

        let keep_going = handle_command(&mut session, line.trim());
        if args.show_events {
            for event in session.sink_mut().drain() {
                eprintln!("[event] {}", serde_event(&event));
            }
        } else {
            session.sink_mut().drain();
        }
        if !keep_going {
            break;
        }
        prompt();
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<QuizConfig, FlashcardError> {
    match path {
        Some(path) => {
            let source = fs::read_to_string(path)
                .map_err(|e| FlashcardError::Config(format!("reading '{}': {}", path.display(), e)))?;
            QuizConfig::from_yaml(&source)
        }
        None => Ok(QuizConfig::default()),
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0)
}

fn serde_event(event: &flashcards::GameEvent) -> String {
    match serde_yaml::to_string(event) {
        Ok(text) => text.trim_end().replace('\n', ", "),
        Err(_) => event.name().to_string(),
    }
}

/// Returns false when the player quits
fn handle_command(session: &mut Session, input: &str) -> bool {
    match input {
        "" => {}
        "quit" | "q" => return false,
        "reset" => {
            session.reset();
            show_card(session);
        }
        "next" | "n" => match session.advance() {
            Ok(Advance::Drawn(_)) => show_card(session),
            Ok(Advance::Finished) => println!("No cards left. Final score: {}", session.score()),
            Err(e) => eprintln!("{}", e),
        },
        "keys" => print_keyboard(session),
        "xml" => match session.render_with(&mut MusicXmlRenderer) {
            Ok(xml) => println!("{}", xml),
            Err(e) => eprintln!("Error: {}", e),
        },
        guess => match guess.parse::<PitchName>() {
            Ok(pick) => report_guess(session, pick),
            Err(e) => eprintln!("{}", e),
        },
    }
    true
}

fn report_guess(session: &mut Session, pick: PitchName) {
    match session.guess(pick) {
        Ok(GuessOutcome::Correct) => println!("Correct! Score: {}", session.score()),
        Ok(GuessOutcome::LevelComplete { next }) => {
            println!("Correct! Level complete, moving on to {:?}", next)
        }
        Ok(GuessOutcome::Finished { score }) => println!("Correct! You finished with {} points", score),
        Ok(GuessOutcome::Incorrect { answer }) => {
            println!("Not quite, that was {}. Type 'reset' to start over.", answer)
        }
        Err(e) => eprintln!("{}", e),
    }
}

fn show_card(session: &mut Session) {
    match session.render_with(&mut StaffTextRenderer) {
        Ok(text) => println!("[{:?}] {}", session.difficulty(), text),
        Err(e) => eprintln!("Error: {}", e),
    }
    if session.state() == GameState::Error {
        eprintln!("The card could not be shown. Type 'reset' to start over.");
    }
}

fn print_keyboard(session: &Session) {
    let row: Vec<String> = session
        .keyboard()
        .iter()
        .map(|key| {
            let label = key.label.map(|name| name.to_string()).unwrap_or_default();
            let shown = match key.color {
                KeyColor::White => format!("[{:^3}]", label),
                KeyColor::Black => format!("({:^3})", label),
            };
            if key.active {
                format!("*{}", shown)
            } else {
                shown
            }
        })
        .collect();
    println!("{}", row.join(" "));
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}
