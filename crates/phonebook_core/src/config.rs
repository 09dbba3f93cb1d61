//! Phone book configuration file model and loader.
//!
//! # Responsibility
//! - Describe the TOML configuration (`[database]`, `[logging]`).
//! - Load it from disk with defaults for every omitted key.
//!
//! # Invariants
//! - Unknown keys are rejected so typos surface at startup.
//! - A missing optional config file yields the defaults.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "phonebook.toml";
/// Database file used when the config does not name one.
pub const DEFAULT_DB_FILE_NAME: &str = "phonebook.sqlite3";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_LOG_DIR_NAME: &str = "logs";

/// Errors raised while reading or parsing the config file.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhonebookConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SQLite database file; created on first run.
    pub path: PathBuf,
    /// How long a statement waits on a locked database.
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl DatabaseConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`.
    pub level: String,
    /// Log directory. Relative paths resolve against the working directory.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

impl LoggingConfig {
    /// Absolute log directory, defaulting to `<base>/logs`.
    pub fn resolved_dir(&self, base: &Path) -> PathBuf {
        match &self.dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => base.join(dir),
            None => base.join(DEFAULT_LOG_DIR_NAME),
        }
    }
}

impl PhonebookConfig {
    /// Parses configuration from TOML text.
    ///
    /// `origin` is only used for error messages.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Loads configuration from `path`; the file must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Loads configuration from `path`, falling back to defaults when absent.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text, path),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, PhonebookConfig, DEFAULT_DB_FILE_NAME};
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    #[test]
    fn empty_document_yields_defaults() {
        let config = PhonebookConfig::from_toml_str("", Path::new("inline")).unwrap();
        assert_eq!(config, PhonebookConfig::default());
        assert_eq!(config.database.path, PathBuf::from(DEFAULT_DB_FILE_NAME));
        assert_eq!(config.database.busy_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = PhonebookConfig::from_toml_str(
            "[database]\npath = \"/var/lib/phonebook/book.db\"\n\n[logging]\nlevel = \"warn\"\n",
            Path::new("inline"),
        )
        .unwrap();

        assert_eq!(
            config.database.path,
            PathBuf::from("/var/lib/phonebook/book.db")
        );
        assert_eq!(config.database.busy_timeout_ms, 5_000);
        assert_eq!(config.logging.level, "warn");
        assert!(config.logging.dir.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err =
            PhonebookConfig::from_toml_str("[database]\nhost = \"db\"\n", Path::new("x.toml"))
                .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("x.toml"));
    }

    #[test]
    fn log_dir_resolves_against_base() {
        let base = Path::new("/srv/phonebook");
        let mut config = PhonebookConfig::default();
        assert_eq!(
            config.logging.resolved_dir(base),
            PathBuf::from("/srv/phonebook/logs")
        );

        config.logging.dir = Some(PathBuf::from("diag"));
        assert_eq!(
            config.logging.resolved_dir(base),
            PathBuf::from("/srv/phonebook/diag")
        );

        config.logging.dir = Some(PathBuf::from("/tmp/pb"));
        assert_eq!(config.logging.resolved_dir(base), PathBuf::from("/tmp/pb"));
    }

    #[test]
    fn load_or_default_tolerates_missing_file_but_load_does_not() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        assert_eq!(
            PhonebookConfig::load_or_default(&missing).unwrap(),
            PhonebookConfig::default()
        );
        assert!(matches!(
            PhonebookConfig::load(&missing).unwrap_err(),
            ConfigError::Read { .. }
        ));
    }
}
