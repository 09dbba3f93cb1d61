//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes validate input before any SQL mutation.
//! - Multi-statement writes run inside one transaction.

pub mod contact_repo;
