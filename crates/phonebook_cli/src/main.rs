//! `phonebook` console entry point.
//!
//! # Responsibility
//! - Resolve configuration from file, flags and environment.
//! - Own the single database connection for the whole session.
//! - Treat connection failure as fatal and schema setup failure as a warning.

mod menu;
mod render;

use clap::Parser;
use log::{error, info, warn};
use phonebook_core::config::DEFAULT_CONFIG_FILE_NAME;
use phonebook_core::db::{apply_migrations, close_db, connect_db, install_routines, DbError};
use phonebook_core::{
    core_version, init_logging, ConfigError, ContactService, PhonebookConfig,
    SqliteContactRepository,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "phonebook",
    version,
    about = "Console address book backed by SQLite"
)]
struct Cli {
    /// Config file (TOML). Defaults to ./phonebook.toml when present.
    #[arg(long, env = "PHONEBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database file, overriding `[database].path`.
    #[arg(long, env = "PHONEBOOK_DB")]
    db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long, env = "PHONEBOOK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log directory, overriding `[logging].dir`.
    #[arg(long, env = "PHONEBOOK_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

/// Failures that end the process with a non-zero status.
#[derive(Debug)]
enum FatalError {
    Config(ConfigError),
    Connect { path: PathBuf, source: DbError },
    Io(io::Error),
}

impl Display for FatalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Connect { path, source } => write!(
                f,
                "Failed to connect to database `{}`: {source}\nCheck `[database].path` in {DEFAULT_CONFIG_FILE_NAME} or pass --db.",
                path.display()
            ),
            Self::Io(err) => write!(f, "console I/O failed: {err}"),
        }
    }
}

impl Error for FatalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Connect { source, .. } => Some(source),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for FatalError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<io::Error> for FatalError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), FatalError> {
    let cwd = std::env::current_dir()?;
    let config = resolve_config(&cli, &cwd)?;

    let log_dir = config.logging.resolved_dir(&cwd);
    if let Err(err) = init_logging(&config.logging.level, &log_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }
    info!(
        "event=cli_start module=cli status=ok version={}",
        core_version()
    );

    let mut conn = connect_db(&config.database.path, config.database.busy_timeout()).map_err(
        |source| FatalError::Connect {
            path: config.database.path.clone(),
            source,
        },
    )?;

    if let Err(err) = apply_migrations(&mut conn) {
        error!("event=db_bootstrap module=cli status=error step=migrations error_code=schema_setup_failed");
        eprintln!("Error creating contacts table: {err}");
    }
    if let Err(err) = install_routines(&conn) {
        error!("event=db_bootstrap module=cli status=error step=routines error_code=routine_install_failed");
        eprintln!("Error installing SQL routines: {err}");
    }

    let session = {
        let mut service = ContactService::new(SqliteContactRepository::new(&mut conn));
        menu::run_menu(&mut service, io::stdin().lock(), io::stdout().lock())
    };

    if let Err(err) = close_db(conn) {
        warn!("event=cli_exit module=cli status=error error_code=db_close_failed");
        eprintln!("warning: database did not close cleanly: {err}");
    }
    session?;

    info!("event=cli_exit module=cli status=ok");
    Ok(())
}

/// Defaults, then the config file, then flags and environment.
fn resolve_config(cli: &Cli, cwd: &Path) -> Result<PhonebookConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => PhonebookConfig::load(path)?,
        None => PhonebookConfig::load_or_default(&cwd.join(DEFAULT_CONFIG_FILE_NAME))?,
    };

    if let Some(db) = &cli.db {
        config.database.path = db.clone();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.logging.dir = Some(dir.clone());
    }

    Ok(config)
}
