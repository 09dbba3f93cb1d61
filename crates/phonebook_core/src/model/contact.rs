//! Contact domain model.
//!
//! # Responsibility
//! - Define the stored contact record and its insert shape.
//! - Validate field presence and length before persistence.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused.
//! - `first_name` and `phone` are non-blank; `last_name` is optional.
//! - Field lengths stay within the column limits below.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned surrogate key.
pub type ContactId = i64;

/// Maximum length (in characters) of `first_name`.
pub const FIRST_NAME_MAX_CHARS: usize = 50;
/// Maximum length (in characters) of `last_name`.
pub const LAST_NAME_MAX_CHARS: usize = 50;
/// Maximum length (in characters) of `phone`.
pub const PHONE_MAX_CHARS: usize = 15;

/// Contact field identifiers used in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    FirstName,
    LastName,
    Phone,
}

impl ContactField {
    /// Column name of this field in `contacts`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Phone => "phone",
        }
    }
}

/// Validation failures for contact fields and query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    /// Required field is empty or whitespace only.
    EmptyField(ContactField),
    /// Field exceeds its column limit.
    FieldTooLong { field: ContactField, max_chars: usize },
    /// Page size must not be negative.
    NegativeLimit(i64),
    /// Page offset must not be negative.
    NegativeOffset(i64),
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{} must not be empty", field.as_str()),
            Self::FieldTooLong { field, max_chars } => write!(
                f,
                "{} must be at most {max_chars} characters",
                field.as_str()
            ),
            Self::NegativeLimit(value) => write!(f, "limit must not be negative, got {value}"),
            Self::NegativeOffset(value) => write!(f, "offset must not be negative, got {value}"),
        }
    }
}

impl Error for ContactValidationError {}

/// Stored address book entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: String,
}

impl Contact {
    /// First name followed by last name when present.
    pub fn full_name(&self) -> String {
        match self.last_name.as_deref() {
            Some(last_name) if !last_name.is_empty() => {
                format!("{} {}", self.first_name, last_name)
            }
            _ => self.first_name.clone(),
        }
    }
}

/// Insert shape for a contact that has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: String,
}

impl NewContact {
    /// Creates a contact without a last name.
    pub fn new(first_name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: None,
            phone: phone.into(),
        }
    }

    /// Sets the optional last name.
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Checks presence and length rules for every field.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        validate_required(ContactField::FirstName, &self.first_name, FIRST_NAME_MAX_CHARS)?;
        if let Some(last_name) = self.last_name.as_deref() {
            validate_length(ContactField::LastName, last_name, LAST_NAME_MAX_CHARS)?;
        }
        validate_required(ContactField::Phone, &self.phone, PHONE_MAX_CHARS)?;
        Ok(())
    }
}

/// Rejects blank values and values longer than `max_chars`.
pub fn validate_required(
    field: ContactField,
    value: &str,
    max_chars: usize,
) -> Result<(), ContactValidationError> {
    if value.trim().is_empty() {
        return Err(ContactValidationError::EmptyField(field));
    }
    validate_length(field, value, max_chars)
}

fn validate_length(
    field: ContactField,
    value: &str,
    max_chars: usize,
) -> Result<(), ContactValidationError> {
    if value.chars().count() > max_chars {
        return Err(ContactValidationError::FieldTooLong { field, max_chars });
    }
    Ok(())
}
