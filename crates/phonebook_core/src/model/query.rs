//! Query and command parameters for contact operations.

use crate::model::contact::{
    validate_required, ContactField, ContactId, ContactValidationError, FIRST_NAME_MAX_CHARS,
    PHONE_MAX_CHARS,
};

/// Validated pagination window over contacts ordered by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: i64,
    offset: i64,
}

impl PageRequest {
    /// Builds a page window, rejecting negative values.
    ///
    /// A zero `limit` is accepted and yields an empty page.
    pub fn new(limit: i64, offset: i64) -> Result<Self, ContactValidationError> {
        if limit < 0 {
            return Err(ContactValidationError::NegativeLimit(limit));
        }
        if offset < 0 {
            return Err(ContactValidationError::NegativeOffset(offset));
        }
        Ok(Self { limit, offset })
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

/// Selects which rows a delete removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    /// Every contact whose `first_name` equals the value exactly.
    Name(String),
    /// Every contact whose `phone` equals the value exactly.
    Phone(String),
}

impl DeleteTarget {
    /// Rejects blank match values.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        match self {
            Self::Name(name) => {
                validate_required(ContactField::FirstName, name, FIRST_NAME_MAX_CHARS)
            }
            Self::Phone(phone) => validate_required(ContactField::Phone, phone, PHONE_MAX_CHARS),
        }
    }

    /// Short label used in log events.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Phone(_) => "phone",
        }
    }
}

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No contact had that first name; a new row was created.
    Inserted(ContactId),
    /// The existing contact's phone was replaced.
    Updated,
}

#[cfg(test)]
mod tests {
    use super::{DeleteTarget, PageRequest};
    use crate::model::contact::ContactValidationError;

    #[test]
    fn page_request_rejects_negative_values() {
        assert_eq!(
            PageRequest::new(-1, 0).unwrap_err(),
            ContactValidationError::NegativeLimit(-1)
        );
        assert_eq!(
            PageRequest::new(5, -3).unwrap_err(),
            ContactValidationError::NegativeOffset(-3)
        );

        let page = PageRequest::new(0, 0).unwrap();
        assert_eq!((page.limit(), page.offset()), (0, 0));
    }

    #[test]
    fn delete_target_rejects_blank_values() {
        assert!(DeleteTarget::Name(" ".to_string()).validate().is_err());
        assert!(DeleteTarget::Phone("555".to_string()).validate().is_ok());
    }
}
