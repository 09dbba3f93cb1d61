//! Text rendering of contact rows for the console.

use phonebook_core::Contact;

/// Printed when a search or page comes back empty.
pub const NO_RESULTS: &str = "No contacts found.";

/// One display line: `ID: 1, Name: Ann Lee, Phone: 555-1`.
pub fn format_contact(contact: &Contact) -> String {
    format!(
        "ID: {}, Name: {}, Phone: {}",
        contact.id,
        contact.full_name(),
        contact.phone
    )
}

/// All display lines for a result set, or the no-results line.
pub fn format_rows(contacts: &[Contact]) -> Vec<String> {
    if contacts.is_empty() {
        return vec![NO_RESULTS.to_string()];
    }
    contacts.iter().map(format_contact).collect()
}
