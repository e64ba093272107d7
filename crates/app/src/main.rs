use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use services::{AnalyticsService, Clock, FlashcardService, ProgressStore, StudyContext};
use storage::{JsonContentDir, Storage};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidContentDir { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidContentDir { raw } => write!(f, "invalid --content value: {raw}"),
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
    db_url: String,
    content_dir: PathBuf,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  study [stats|due|reset] [--db <sqlite_url>] [--content <dir>]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  stats   progress overview, per subject, per year, weak points (default)");
    eprintln!("  due     flashcards in review order with their due state");
    eprintln!("  reset   clear all stored progress");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://study.sqlite3");
    eprintln!("  --content data");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDY_DB_URL, STUDY_CONTENT_DIR, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Stats,
    Due,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "stats" => Some(Self::Stats),
            "due" => Some(Self::Due),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("STUDY_DB_URL").ok().map_or_else(
            || normalize_sqlite_url("sqlite://study.sqlite3".into()),
            normalize_sqlite_url,
        );
        let mut content_dir = std::env::var("STUDY_CONTENT_DIR")
            .ok()
            .map_or_else(|| PathBuf::from("data"), PathBuf::from);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--content" => {
                    let value = require_value(args, "--content")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidContentDir { raw: value });
                    }
                    content_dir = PathBuf::from(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            content_dir,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" {
        return raw;
    }

    let trimmed = raw.trim();
    let path_str = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Stats,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Stats,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;
    let store = ProgressStore::new(storage.progress.clone());
    let content = JsonContentDir::new(parsed.content_dir.clone());
    let mut ctx = StudyContext::bootstrap(&content, store, Clock::system()).await?;

    match cmd {
        Command::Stats => print_stats(&ctx),
        Command::Due => print_due(&ctx),
        Command::Reset => {
            ctx.reset_progress().await;
            println!("progress cleared");
        }
    }
    Ok(())
}

fn print_stats(ctx: &StudyContext) {
    let dashboard = AnalyticsService::dashboard(ctx);
    let o = &dashboard.overview;
    println!(
        "questions {}  solved {}  correct {}  wrong {}  accuracy {}%  completion {}%",
        o.total_questions, o.solved, o.correct, o.wrong, o.accuracy, o.completion
    );
    println!(
        "flashcards {}  mastered {}  bookmarks {}",
        o.total_flashcards, o.known_flashcards, o.bookmarks
    );

    if !dashboard.subjects.is_empty() {
        println!();
        println!("By subject:");
        for s in &dashboard.subjects {
            println!(
                "  {:<24} {:>4}/{:<4} solved  {:>3}% correct",
                s.subject, s.solved, s.total, s.accuracy
            );
        }
    }

    if !dashboard.years.is_empty() {
        println!();
        println!("By year:");
        for y in &dashboard.years {
            println!(
                "  {}  solved {:>4}  wrong {:>4}  {:>3}% correct",
                y.exam_year, y.solved, y.wrong, y.accuracy
            );
        }
    }

    if !dashboard.weak_points.is_empty() {
        println!();
        println!("Weak points:");
        for w in &dashboard.weak_points {
            println!("  {:>3}%  {} ({}/{})", w.wrong_rate, w.tip, w.wrong, w.total);
        }
    }

    if !dashboard.recent_wrong.is_empty() {
        println!();
        println!("Recently missed:");
        for r in &dashboard.recent_wrong {
            println!(
                "  {} {} #{}  picked {}, answer {}",
                r.question.exam_year,
                r.question.subject,
                r.question.number,
                r.entry.selected_answer,
                r.question.answer
            );
        }
    }
}

fn print_due(ctx: &StudyContext) {
    let subjects: BTreeSet<String> = FlashcardService::subjects(ctx).into_iter().collect();
    let deck = FlashcardService::build_deck(ctx, &subjects);
    if deck.is_empty() {
        println!("no flashcards loaded");
        return;
    }

    let now = ctx.clock().now();
    let mut due = 0;
    for card in deck.cards() {
        let state = ctx.progress().card_progress(&card.id);
        let marker = if state.is_due(now) {
            due += 1;
            "due"
        } else {
            "   "
        };
        println!(
            "  {marker}  {:<9} {:<16} {}",
            state.level.label().to_string(),
            card.subject,
            card.front
        );
    }
    println!();
    println!("{due} of {} cards due", deck.len());
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_logging();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_url_is_kept() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
    }

    #[test]
    fn relative_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:study.sqlite3".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("study.sqlite3"));
    }

    #[test]
    fn parses_flags() {
        let mut args = ["--db", "sqlite::memory:", "--content", "fixtures"]
            .into_iter()
            .map(String::from);
        let parsed = Args::parse(&mut args).unwrap();
        assert_eq!(parsed.db_url, "sqlite::memory:");
        assert_eq!(parsed.content_dir, PathBuf::from("fixtures"));
    }

    #[test]
    fn missing_flag_value_is_an_error() {
        let mut args = ["--content"].into_iter().map(String::from);
        assert!(matches!(
            Args::parse(&mut args),
            Err(ArgsError::MissingValue { flag: "--content" })
        ));
    }

    #[test]
    fn subcommands() {
        assert_eq!(Command::from_arg("due"), Some(Command::Due));
        assert_eq!(Command::from_arg("ui"), None);
    }
}
