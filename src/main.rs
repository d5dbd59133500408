// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use wortwirbel::api;
use wortwirbel::app_config::{Config, LogLevel};
use wortwirbel::database::{DatabaseConnection, SqliteWordRepository};
use wortwirbel::info::{SERVICE_NAME, SERVICE_VERSION};
use wortwirbel::words::WordService;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API (default command)
    Serve,

    /// Create or migrate the database, then print its statistics
    InitDb,

    /// Generate shell completions for wortwirbel
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// wortwirbel - vocabulary word service
///
/// Stores vocabulary words for language learning in SQLite and serves them
/// over a JSON REST API.
#[derive(Parser, Debug)]
#[command(name = "wortwirbel")]
#[command(version)]
#[command(about = "Vocabulary word service for language learning")]
#[command(long_about = "wortwirbel stores vocabulary words in SQLite and serves them over HTTP.

EXAMPLES:
    wortwirbel                                   # Serve with defaults on 127.0.0.1:8000
    wortwirbel serve --port 9000                 # Serve on another port
    wortwirbel --db-path ./words.db init-db      # Create the database and show stats
    wortwirbel --config conf.json serve          # Load settings from a JSON file
    wortwirbel completions bash > wortwirbel.bash

CONFIGURATION:
    Settings are layered: built-in defaults, then the JSON file given with
    --config, then the SERVER_HOST, SERVER_PORT, DB_PATH and LOG_LEVEL
    environment variables, then command line flags.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path (JSON)
    #[arg(short, long, global = true, env = "WORTWIRBEL_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind the HTTP server to
    #[arg(long, global = true)]
    host: Option<String>,

    /// Port to bind the HTTP server to
    #[arg(short, long, global = true)]
    port: Option<u16>,

    /// SQLite database file
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

impl CommandLineOptions {
    /// Build the effective configuration: defaults, file, environment, flags
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(db_path) = &self.db_path {
            config.database.path = db_path.clone();
        }
        if let Some(level) = self.log_level {
            config.log_level = level.into();
        }

        config
            .validate()
            .context("Configuration validation failed")?;

        Ok(config)
    }
}

// @struct: Console logger with timestamps and per-level colours
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} [{}] {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Accept everything at the logger; the max level is narrowed once the
    // configuration is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "wortwirbel", &mut std::io::stdout());
        return Ok(());
    }

    let config = cli.resolve_config()?;
    log::set_max_level(config.log_level.to_level_filter());

    match cli.command {
        Some(Commands::InitDb) => run_init_db(&config),
        Some(Commands::Serve) | None => run_serve(config).await,
        Some(Commands::Completions { .. }) => Ok(()),
    }
}

fn run_init_db(config: &Config) -> Result<()> {
    let db = DatabaseConnection::new(&config.database.path)
        .with_context(|| format!("Failed to open {}", config.database.connection_string()))?;

    let stats = db.stats()?;
    info!("Database ready at {}", config.database.connection_string());
    println!("{}", stats);
    Ok(())
}

async fn run_serve(config: Config) -> Result<()> {
    info!("Starting {} v{}", SERVICE_NAME, SERVICE_VERSION);
    info!("Using database {}", config.database.connection_string());

    let db = DatabaseConnection::new(&config.database.path)
        .with_context(|| format!("Failed to open {}", config.database.connection_string()))?;
    let service = Arc::new(WordService::new(SqliteWordRepository::new(db)));

    let router = api::create_router(service);
    api::serve(&config.server, router).await?;

    Ok(())
}
