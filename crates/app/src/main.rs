use std::fmt;
use std::io::{self, BufRead, Write as _};
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{Deck, QuizSettings};
use services::{HistoryService, QuizLoopService};
use storage::csv::read_deck_file;
use storage::repository::Storage;
use ui::Shell;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidOptionCount { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidOptionCount { raw } => {
                write!(f, "invalid --options value: {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct Args {
    deck_path: String,
    history_path: String,
    user: Option<String>,
    option_count: Option<u32>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--deck <csv>] [--history <csv>] [--user <name>] [--options <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --deck deck.csv");
    eprintln!("  --history quiz_history.csv");
    eprintln!("  --options 5");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DECK_FILE, QUIZ_HISTORY_FILE, QUIZ_USER");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut deck_path = std::env::var("QUIZ_DECK_FILE").unwrap_or_else(|_| "deck.csv".into());
        let mut history_path =
            std::env::var("QUIZ_HISTORY_FILE").unwrap_or_else(|_| "quiz_history.csv".into());
        let mut user = std::env::var("QUIZ_USER").ok().filter(|u| !u.trim().is_empty());
        let mut option_count = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--deck" => deck_path = require_value(args, "--deck")?,
                "--history" => history_path = require_value(args, "--history")?,
                "--user" => user = Some(require_value(args, "--user")?),
                "--options" => {
                    let value = require_value(args, "--options")?;
                    let parsed: u32 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidOptionCount { raw: value.clone() })?;
                    option_count = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            deck_path,
            history_path,
            user,
            option_count,
        })
    }
}

fn prompt_user_name() -> io::Result<String> {
    let stdin = io::stdin();
    loop {
        print!("Your name: ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no user name provided",
            ));
        }
        let name = line.trim();
        if !name.is_empty() {
            return Ok(name.to_owned());
        }
        println!("a name is required to record results");
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let settings = match parsed.option_count {
        Some(count) => QuizSettings::new(count)?,
        None => QuizSettings::default(),
    };

    // A bad or empty deck file aborts here; no session is ever created.
    let cards = read_deck_file(&parsed.deck_path)?;
    let deck = Deck::new(cards, settings)?;
    tracing::debug!(path = %parsed.deck_path, cards = deck.len(), "loaded deck");

    let user = match parsed.user {
        Some(user) => user,
        None => prompt_user_name()?,
    };

    let clock = Clock::default_clock();
    let storage = Storage::csv_file(&parsed.history_path);
    let quiz = Arc::new(QuizLoopService::new(clock, Arc::clone(&storage.history)));
    let history = Arc::new(HistoryService::new(storage.history));

    Shell::new(quiz, history, user).run(deck).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
