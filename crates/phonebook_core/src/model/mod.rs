//! Domain model for address book entries and the queries over them.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own field validation rules shared by repository and service layers.
//!
//! # Invariants
//! - Every stored contact has a non-blank first name and phone.
//! - Contacts are identified by a store-assigned integer id.

pub mod contact;
pub mod query;
