//! SQLite storage bootstrap, schema migrations and SQL routines.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the phone book.
//! - Apply schema migrations in deterministic order.
//! - Register application-defined SQL functions used by contact queries.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Contact queries must not run before migrations and routines are installed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
pub mod routines;

pub use migrations::apply_migrations;
pub use open::{close_db, connect_db, open_db, open_db_in_memory};
pub use routines::install_routines;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
