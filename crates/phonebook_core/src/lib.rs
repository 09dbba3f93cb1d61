//! Core domain logic for the PhoneBook address book.
//! This crate is the single source of truth for contact storage rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, PhonebookConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{Contact, ContactField, ContactId, ContactValidationError, NewContact};
pub use model::query::{DeleteTarget, PageRequest, UpsertOutcome};
pub use repo::contact_repo::{ContactRepository, RepoError, RepoResult, SqliteContactRepository};
pub use service::contact_service::ContactService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
