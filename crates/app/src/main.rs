use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use tracing_subscriber::EnvFilter;

use lingo_core::model::{LanguagePair, Profile, UnitId, UserId};
use services::{
    AppSettingsService, AttemptRecorder, Clock, HttpProfileSync, LessonRunner, NoopPlayer,
    ProfileSync, SessionConfig, SyncConfig,
};
use storage::repository::Storage;
use storage::seed::seed_starter_unit;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidUserId { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidUserId { raw } => write!(f, "invalid --user value: {raw}"),
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

struct DesktopApp {
    user_id: UserId,
    languages: LanguagePair,
    current_unit: UnitId,
    runner: Arc<LessonRunner>,
    settings: Arc<AppSettingsService>,
}

impl UiApp for DesktopApp {
    fn user_id(&self) -> UserId {
        self.user_id.clone()
    }

    fn languages(&self) -> LanguagePair {
        self.languages.clone()
    }

    fn current_unit(&self) -> UnitId {
        self.current_unit.clone()
    }

    fn initial_profile(&self) -> Profile {
        Profile::new(self.user_id.clone())
    }

    fn runner(&self) -> Arc<LessonRunner> {
        Arc::clone(&self.runner)
    }

    fn settings(&self) -> Arc<AppSettingsService> {
        Arc::clone(&self.settings)
    }
}

struct Args {
    db_url: String,
    user_id: UserId,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui   [--db <sqlite_url>] [--user <id>]");
    eprintln!("  cargo run -p app -- seed [--db <sqlite_url>] [--user <id>]");
    eprintln!();
    eprintln!("Defaults for ui:");
    eprintln!("  --db sqlite:dev.sqlite3");
    eprintln!("  --user learner");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LINGO_DB_URL, LINGO_USER_ID, LINGO_SYNC_URL, LINGO_SYNC_TOKEN");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("LINGO_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://dev.sqlite3".into(), normalize_sqlite_url);
        let mut user_id = std::env::var("LINGO_USER_ID")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| UserId::new("learner"), UserId::new);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--user" => {
                    let value = require_value(args, "--user")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidUserId { raw: value });
                    }
                    user_id = UserId::new(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, user_id })
    }
}

/// Turns a bare path or `sqlite:` shorthand into an absolute `sqlite://` URL.
fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path = Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launch the UI when no subcommand is given.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
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

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;
    let languages = LanguagePair::new("en", "am");

    match cmd {
        Command::Ui => {
            let clock = Clock::default_clock();
            let settings = Arc::new(AppSettingsService::new(Arc::clone(&storage.settings)));

            let sync: Option<Arc<dyn ProfileSync>> =
                match HttpProfileSync::from_config(&SyncConfig::from_env()) {
                    Ok(sync) => Some(Arc::new(sync)),
                    Err(err) => {
                        tracing::info!(reason = %err, "profile sync disabled");
                        None
                    }
                };
            let recorder = Arc::new(AttemptRecorder::new(
                sync.clone(),
                Arc::clone(&storage.attempts),
            ));
            let runner = Arc::new(LessonRunner::new(
                Arc::clone(&storage.lessons),
                recorder,
                sync,
                Arc::new(NoopPlayer),
                clock,
                SessionConfig::default(),
            ));

            let app = DesktopApp {
                user_id: parsed.user_id,
                languages,
                current_unit: UnitId::new("greetings"),
                runner,
                settings,
            };
            let app: Arc<dyn UiApp> = Arc::new(app);
            let context = build_app_context(&app);

            // Dioxus/tao can default to an always-on-top window in some dev
            // setups; disable it so the app doesn't behave like a modal.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Lingo")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Seed => {
            let count = seed_starter_unit(&storage, &languages).await?;
            eprintln!("seeded {count} lessons into {}", parsed.db_url);
            Ok(())
        }
    }
}

/// Creates the database file (and its parent directories) ahead of the
/// sqlx connect, which refuses to create missing files on its own.
fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let invalid = || ArgsError::InvalidDbUrl {
        raw: db_url.to_string(),
    };
    let raw_path = db_url.strip_prefix("sqlite://").ok_or_else(invalid)?;
    let raw_path = raw_path.split('?').next().unwrap_or(raw_path);
    if raw_path.is_empty() {
        return Err(invalid().into());
    }

    let path = Path::new(raw_path);
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
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
