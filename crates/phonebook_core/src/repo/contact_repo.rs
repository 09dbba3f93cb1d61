//! Contact repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own the parameterized statements for upsert, search, paging and delete.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate input before SQL mutations.
//! - Upsert and delete commit atomically or not at all.
//! - Search and list results are ordered by `id ASC`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::routines::CONTAINS_CI;
use crate::db::DbError;
use crate::model::contact::{
    validate_required, Contact, ContactField, ContactId, ContactValidationError, NewContact,
    FIRST_NAME_MAX_CHARS, PHONE_MAX_CHARS,
};
use crate::model::query::{DeleteTarget, PageRequest, UpsertOutcome};
use rusqlite::{params, Connection, ErrorCode, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    phone
FROM contacts";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ContactValidationError),
    Db(DbError),
    /// Another contact already uses this first name.
    DuplicateFirstName(String),
    InvalidData(String),
}

impl RepoError {
    /// Stable, value-free identifier for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::Db(_) => "db_error",
            Self::DuplicateFirstName(_) => "duplicate_first_name",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateFirstName(name) => {
                write!(f, "a contact named `{name}` already exists")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::DuplicateFirstName(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ContactValidationError> for RepoError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for contact operations.
pub trait ContactRepository {
    /// Replaces the phone of the contact with `first_name`, or inserts one.
    fn upsert_contact(&mut self, first_name: &str, phone: &str) -> RepoResult<UpsertOutcome>;
    /// Inserts a full contact and returns its new id.
    fn create_contact(&self, contact: &NewContact) -> RepoResult<ContactId>;
    /// Gets one contact by id.
    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    /// Case-insensitive substring match over first name, last name and phone.
    fn search_contacts(&self, pattern: &str) -> RepoResult<Vec<Contact>>;
    /// Returns one id-ordered page of contacts.
    fn list_contacts(&self, page: PageRequest) -> RepoResult<Vec<Contact>>;
    /// Deletes every contact matching `target` and returns how many went away.
    fn delete_contacts(&mut self, target: &DeleteTarget) -> RepoResult<usize>;
}

/// SQLite-backed contact repository.
///
/// Expects a connection with routines installed and migrations applied
/// (see [`crate::db::open_db`]).
pub struct SqliteContactRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn upsert_contact(&mut self, first_name: &str, phone: &str) -> RepoResult<UpsertOutcome> {
        validate_required(ContactField::FirstName, first_name, FIRST_NAME_MAX_CHARS)?;
        validate_required(ContactField::Phone, phone, PHONE_MAX_CHARS)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let changed = tx.execute(
            "UPDATE contacts
             SET phone = ?2
             WHERE first_name = ?1;",
            params![first_name, phone],
        )?;

        let outcome = if changed > 0 {
            UpsertOutcome::Updated
        } else {
            tx.execute(
                "INSERT INTO contacts (first_name, phone) VALUES (?1, ?2);",
                params![first_name, phone],
            )?;
            UpsertOutcome::Inserted(tx.last_insert_rowid())
        };

        tx.commit()?;
        Ok(outcome)
    }

    fn create_contact(&self, contact: &NewContact) -> RepoResult<ContactId> {
        contact.validate()?;

        self.conn
            .execute(
                "INSERT INTO contacts (first_name, last_name, phone) VALUES (?1, ?2, ?3);",
                params![
                    contact.first_name.as_str(),
                    contact.last_name.as_deref(),
                    contact.phone.as_str(),
                ],
            )
            .map_err(|err| map_insert_error(err, &contact.first_name))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }

        Ok(None)
    }

    fn search_contacts(&self, pattern: &str) -> RepoResult<Vec<Contact>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CONTACT_SELECT_SQL}
             WHERE {CONTAINS_CI}(first_name, ?1)
                OR {CONTAINS_CI}(last_name, ?1)
                OR {CONTAINS_CI}(phone, ?1)
             ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query([pattern])?;
        collect_contacts(&mut rows)
    }

    fn list_contacts(&self, page: PageRequest) -> RepoResult<Vec<Contact>> {
        if page.limit() == 0 {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(&format!(
            "{CONTACT_SELECT_SQL}
             ORDER BY id ASC
             LIMIT ?1 OFFSET ?2;"
        ))?;

        let mut rows = stmt.query(params![page.limit(), page.offset()])?;
        collect_contacts(&mut rows)
    }

    fn delete_contacts(&mut self, target: &DeleteTarget) -> RepoResult<usize> {
        target.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let deleted = match target {
            DeleteTarget::Name(name) => {
                tx.execute("DELETE FROM contacts WHERE first_name = ?1;", [name])?
            }
            DeleteTarget::Phone(phone) => {
                tx.execute("DELETE FROM contacts WHERE phone = ?1;", [phone])?
            }
        };

        tx.commit()?;
        Ok(deleted)
    }
}

fn collect_contacts(rows: &mut rusqlite::Rows<'_>) -> RepoResult<Vec<Contact>> {
    let mut contacts = Vec::new();
    while let Some(row) = rows.next()? {
        contacts.push(parse_contact_row(row)?);
    }
    Ok(contacts)
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let id: ContactId = row.get("id")?;
    let first_name: String = row.get("first_name")?;
    let phone: String = row.get("phone")?;

    if first_name.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty first_name in contacts row {id}"
        )));
    }
    if phone.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty phone in contacts row {id}"
        )));
    }

    Ok(Contact {
        id,
        first_name,
        last_name: row.get("last_name")?,
        phone,
    })
}

fn map_insert_error(err: rusqlite::Error, first_name: &str) -> RepoError {
    if is_unique_violation(&err) {
        return RepoError::DuplicateFirstName(first_name.to_string());
    }
    RepoError::Db(DbError::Sqlite(err))
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
