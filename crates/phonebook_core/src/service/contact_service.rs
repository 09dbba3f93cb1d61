//! Contact use-case service.
//!
//! # Responsibility
//! - Provide the add/update, search, page and delete entry points used by
//!   the console front end.
//! - Emit one metadata-only log event per operation.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Names and phone numbers never appear in log events.

use crate::model::contact::{Contact, ContactId, NewContact};
use crate::model::query::{DeleteTarget, PageRequest, UpsertOutcome};
use crate::repo::contact_repo::{ContactRepository, RepoResult};
use log::{info, warn};
use std::time::Instant;

/// Use-case service wrapper for contact operations.
pub struct ContactService<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> ContactService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Inserts a contact by first name, or replaces the phone of the existing one.
    pub fn upsert_contact(&mut self, first_name: &str, phone: &str) -> RepoResult<UpsertOutcome> {
        let started_at = Instant::now();
        let result = self.repo.upsert_contact(first_name, phone);
        match &result {
            Ok(UpsertOutcome::Inserted(id)) => info!(
                "event=contact_upsert module=service status=ok outcome=inserted contact_id={} duration_ms={}",
                id,
                started_at.elapsed().as_millis()
            ),
            Ok(UpsertOutcome::Updated) => info!(
                "event=contact_upsert module=service status=ok outcome=updated duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=contact_upsert module=service status=error duration_ms={} error_code={}",
                started_at.elapsed().as_millis(),
                err.code()
            ),
        }
        result
    }

    /// Inserts a full contact, including the optional last name.
    pub fn add_contact(&self, contact: &NewContact) -> RepoResult<ContactId> {
        let result = self.repo.create_contact(contact);
        match &result {
            Ok(id) => info!("event=contact_create module=service status=ok contact_id={id}"),
            Err(err) => warn!(
                "event=contact_create module=service status=error error_code={}",
                err.code()
            ),
        }
        result
    }

    /// Gets one contact by id.
    pub fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        self.repo.get_contact(id)
    }

    /// Finds contacts whose name or phone contains `pattern`, ignoring case.
    ///
    /// An empty pattern matches every contact.
    pub fn search(&self, pattern: &str) -> RepoResult<Vec<Contact>> {
        let started_at = Instant::now();
        let result = self.repo.search_contacts(pattern);
        match &result {
            Ok(contacts) => info!(
                "event=contact_search module=service status=ok hits={} duration_ms={}",
                contacts.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=contact_search module=service status=error duration_ms={} error_code={}",
                started_at.elapsed().as_millis(),
                err.code()
            ),
        }
        result
    }

    /// Returns one page of contacts ordered by id.
    pub fn list_page(&self, page: PageRequest) -> RepoResult<Vec<Contact>> {
        let result = self.repo.list_contacts(page);
        match &result {
            Ok(contacts) => info!(
                "event=contact_list module=service status=ok limit={} offset={} rows={}",
                page.limit(),
                page.offset(),
                contacts.len()
            ),
            Err(err) => warn!(
                "event=contact_list module=service status=error limit={} offset={} error_code={}",
                page.limit(),
                page.offset(),
                err.code()
            ),
        }
        result
    }

    /// Deletes all contacts matching `target`, returning the removed count.
    pub fn delete(&mut self, target: &DeleteTarget) -> RepoResult<usize> {
        let result = self.repo.delete_contacts(target);
        match &result {
            Ok(deleted) => info!(
                "event=contact_delete module=service status=ok mode={} deleted={}",
                target.mode(),
                deleted
            ),
            Err(err) => warn!(
                "event=contact_delete module=service status=error mode={} error_code={}",
                target.mode(),
                err.code()
            ),
        }
        result
    }
}
