//! Interactive console menu.
//!
//! # Responsibility
//! - Show the five-option menu, read choices and dispatch to the service.
//! - Turn every operation failure into a console message and keep looping.
//!
//! # Invariants
//! - Malformed input never reaches the database.
//! - Only the line terminator is stripped from free-text answers.
//! - Input that is not UTF-8 aborts the current operation, not the session.
//! - End of input ends the session the same way as choosing Exit.

use crate::render::format_rows;
use phonebook_core::{
    ContactRepository, ContactService, DeleteTarget, PageRequest, UpsertOutcome,
};
use std::io::{self, BufRead, Write};

const MENU_LINES: &[&str] = &[
    "",
    "PhoneBook menu:",
    "1. Add or update contact",
    "2. Search by pattern",
    "3. Show contacts (paginated)",
    "4. Delete contact",
    "5. Exit",
];
const INVALID_CHOICE: &str = "Invalid choice";
const INVALID_ENCODING: &str = "Input error: text is not valid UTF-8";

/// Top-level menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Upsert,
    Search,
    List,
    Delete,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Upsert),
            "2" => Some(Self::Search),
            "3" => Some(Self::List),
            "4" => Some(Self::Delete),
            "5" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// What the session does after an operation ends early or completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    EndOfInput,
}

/// Line-oriented prompt/response wrapper over any reader and writer.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `label` and reads one line without its terminator.
    ///
    /// Returns `Err(Step::EndOfInput)` at end of input and
    /// `Err(Step::Continue)` after reporting a line that is not UTF-8.
    /// Only reader/writer failures surface as `io::Error`.
    pub fn prompt(&mut self, label: &str) -> io::Result<Result<String, Step>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut bytes = Vec::new();
        if self.input.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(Err(Step::EndOfInput));
        }
        strip_line_terminator(&mut bytes);

        match String::from_utf8(bytes) {
            Ok(line) => Ok(Ok(line)),
            Err(_) => {
                self.say(INVALID_ENCODING)?;
                Ok(Err(Step::Continue))
            }
        }
    }

    pub fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }
}

fn strip_line_terminator(bytes: &mut Vec<u8>) {
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
    }
}

/// Runs the menu loop until Exit or end of input.
pub fn run_menu<Repo, R, W>(
    service: &mut ContactService<Repo>,
    input: R,
    output: W,
) -> io::Result<()>
where
    Repo: ContactRepository,
    R: BufRead,
    W: Write,
{
    let mut console = Console::new(input, output);

    loop {
        for line in MENU_LINES {
            console.say(line)?;
        }

        let raw_choice = match console.prompt("Enter your choice (1-5): ")? {
            Ok(line) => line,
            Err(Step::Continue) => continue,
            Err(Step::EndOfInput) => break,
        };

        let step = match MenuChoice::parse(&raw_choice) {
            Some(MenuChoice::Upsert) => upsert_contact(service, &mut console)?,
            Some(MenuChoice::Search) => search_contacts(service, &mut console)?,
            Some(MenuChoice::List) => list_contacts(service, &mut console)?,
            Some(MenuChoice::Delete) => delete_contact(service, &mut console)?,
            Some(MenuChoice::Exit) => break,
            None => {
                console.say(INVALID_CHOICE)?;
                Step::Continue
            }
        };

        if step == Step::EndOfInput {
            break;
        }
    }

    Ok(())
}

fn upsert_contact<Repo, R, W>(
    service: &mut ContactService<Repo>,
    console: &mut Console<R, W>,
) -> io::Result<Step>
where
    Repo: ContactRepository,
    R: BufRead,
    W: Write,
{
    let first_name = match console.prompt("Enter first name: ")? {
        Ok(line) => line,
        Err(step) => return Ok(step),
    };
    let phone = match console.prompt("Enter phone number: ")? {
        Ok(line) => line,
        Err(step) => return Ok(step),
    };

    match service.upsert_contact(&first_name, &phone) {
        Ok(UpsertOutcome::Inserted(id)) => console.say(&format!("Contact added (ID: {id})"))?,
        Ok(UpsertOutcome::Updated) => console.say("Contact updated")?,
        Err(err) => console.say(&format!("Error adding or updating contact: {err}"))?,
    }
    Ok(Step::Continue)
}

fn search_contacts<Repo, R, W>(
    service: &ContactService<Repo>,
    console: &mut Console<R, W>,
) -> io::Result<Step>
where
    Repo: ContactRepository,
    R: BufRead,
    W: Write,
{
    let pattern = match console.prompt("Enter search pattern: ")? {
        Ok(line) => line,
        Err(step) => return Ok(step),
    };

    match service.search(&pattern) {
        Ok(contacts) => {
            for line in format_rows(&contacts) {
                console.say(&line)?;
            }
        }
        Err(err) => console.say(&format!("Search error: {err}"))?,
    }
    Ok(Step::Continue)
}

fn list_contacts<Repo, R, W>(
    service: &ContactService<Repo>,
    console: &mut Console<R, W>,
) -> io::Result<Step>
where
    Repo: ContactRepository,
    R: BufRead,
    W: Write,
{
    let raw_limit = match console.prompt("Enter page size: ")? {
        Ok(line) => line,
        Err(step) => return Ok(step),
    };
    let Some(limit) = parse_number(console, &raw_limit)? else {
        return Ok(Step::Continue);
    };

    let raw_offset = match console.prompt("Enter offset: ")? {
        Ok(line) => line,
        Err(step) => return Ok(step),
    };
    let Some(offset) = parse_number(console, &raw_offset)? else {
        return Ok(Step::Continue);
    };

    let page = match PageRequest::new(limit, offset) {
        Ok(page) => page,
        Err(err) => {
            console.say(&format!("Pagination error: {err}"))?;
            return Ok(Step::Continue);
        }
    };

    match service.list_page(page) {
        Ok(contacts) => {
            for line in format_rows(&contacts) {
                console.say(&line)?;
            }
        }
        Err(err) => console.say(&format!("Pagination error: {err}"))?,
    }
    Ok(Step::Continue)
}

fn delete_contact<Repo, R, W>(
    service: &mut ContactService<Repo>,
    console: &mut Console<R, W>,
) -> io::Result<Step>
where
    Repo: ContactRepository,
    R: BufRead,
    W: Write,
{
    console.say("1. Delete by name")?;
    console.say("2. Delete by phone")?;
    let mode = match console.prompt("Choose delete mode (1-2): ")? {
        Ok(line) => line,
        Err(step) => return Ok(step),
    };

    let target = match mode.trim() {
        "1" => match console.prompt("Enter name to delete: ")? {
            Ok(name) => DeleteTarget::Name(name),
            Err(step) => return Ok(step),
        },
        "2" => match console.prompt("Enter phone to delete: ")? {
            Ok(phone) => DeleteTarget::Phone(phone),
            Err(step) => return Ok(step),
        },
        _ => {
            console.say(INVALID_CHOICE)?;
            return Ok(Step::Continue);
        }
    };

    match service.delete(&target) {
        Ok(_) => console.say("Contact deleted")?,
        Err(err) => console.say(&format!("Error deleting contact: {err}"))?,
    }
    Ok(Step::Continue)
}

/// Parses a whole number, printing the problem and returning `None` on failure.
fn parse_number<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    raw: &str,
) -> io::Result<Option<i64>> {
    match raw.trim().parse::<i64>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            console.say(&format!("Pagination error: `{raw}` is not a whole number"))?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{run_menu, MenuChoice};
    use phonebook_core::db::open_db_in_memory;
    use phonebook_core::{ContactService, SqliteContactRepository};
    use std::io::Cursor;

    fn run_script(conn: &mut rusqlite::Connection, script: &str) -> String {
        run_bytes(conn, script.as_bytes())
    }

    fn run_bytes(conn: &mut rusqlite::Connection, script: &[u8]) -> String {
        let mut service = ContactService::new(SqliteContactRepository::new(conn));
        let mut output = Vec::new();
        run_menu(&mut service, Cursor::new(script.to_vec()), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn menu_choice_parses_known_options_only() {
        assert_eq!(MenuChoice::parse(" 1 "), Some(MenuChoice::Upsert));
        assert_eq!(MenuChoice::parse("5"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("6"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[test]
    fn full_session_adds_finds_lists_and_deletes() {
        let mut conn = open_db_in_memory().unwrap();
        let output = run_script(
            &mut conn,
            "1\nIvan\n79991234567\n2\nivan\n3\n10\n0\n4\n1\nIvan\n2\nivan\n5\n",
        );

        assert!(output.contains("Contact added (ID: 1)"));
        assert_eq!(
            output
                .matches("ID: 1, Name: Ivan, Phone: 79991234567")
                .count(),
            2
        );
        assert!(output.contains("Contact deleted"));
        assert!(output.trim_end().ends_with("Enter your choice (1-5):"));
        assert_eq!(output.matches("No contacts found.").count(), 1);
    }

    #[test]
    fn second_upsert_reports_update() {
        let mut conn = open_db_in_memory().unwrap();
        let output = run_script(&mut conn, "1\nAnn\n555\n1\nAnn\n556\n2\nann\n5\n");

        assert!(output.contains("Contact updated"));
        assert!(output.contains("ID: 1, Name: Ann, Phone: 556"));
    }

    #[test]
    fn invalid_menu_choice_redisplays_menu() {
        let mut conn = open_db_in_memory().unwrap();
        let output = run_script(&mut conn, "9\n5\n");

        assert!(output.contains("Invalid choice"));
        assert_eq!(output.matches("PhoneBook menu:").count(), 2);
    }

    #[test]
    fn malformed_pagination_input_aborts_without_query() {
        let mut conn = open_db_in_memory().unwrap();
        let output = run_script(&mut conn, "3\nten\n3\n2\n-1\n5\n");

        assert!(output.contains("Pagination error: `ten` is not a whole number"));
        assert!(output.contains("Pagination error: offset must not be negative, got -1"));
        assert!(!output.contains("No contacts found."));
        // First attempt stops before asking for the offset.
        assert_eq!(output.matches("Enter offset: ").count(), 1);
    }

    #[test]
    fn invalid_delete_mode_is_rejected_locally() {
        let mut conn = open_db_in_memory().unwrap();
        let output = run_script(&mut conn, "1\nAnn\n555\n4\n3\n2\nann\n5\n");

        assert!(output.contains("Invalid choice"));
        assert!(!output.contains("Contact deleted"));
        assert!(output.contains("ID: 1, Name: Ann, Phone: 555"));
    }

    #[test]
    fn store_errors_are_reported_and_loop_continues() {
        let mut conn = rusqlite::Connection::open_in_memory().unwrap();
        let output = run_script(&mut conn, "1\nAnn\n555\n2\nann\n5\n");

        assert!(output.contains("Error adding or updating contact:"));
        assert!(output.contains("Search error:"));
        assert_eq!(output.matches("PhoneBook menu:").count(), 3);
    }

    #[test]
    fn blank_name_is_rejected_by_validation() {
        let mut conn = open_db_in_memory().unwrap();
        let output = run_script(&mut conn, "1\n\n555\n5\n");

        assert!(output.contains("Error adding or updating contact: first_name must not be empty"));
    }

    #[test]
    fn end_of_input_mid_operation_ends_session() {
        let mut conn = open_db_in_memory().unwrap();
        let output = run_script(&mut conn, "1\nAnn\n");

        assert!(output.ends_with("Enter phone number: "));
        assert!(!output.contains("Contact added"));
    }

    #[test]
    fn non_utf8_answer_aborts_only_the_current_operation() {
        let mut conn = open_db_in_memory().unwrap();
        let output = run_bytes(&mut conn, b"2\n\xff\xfe\n1\nAnn\n555\n5\n");

        assert!(output.contains("Input error: text is not valid UTF-8"));
        assert!(!output.contains("No contacts found."));
        assert!(output.contains("Contact added (ID: 1)"));
    }

    #[test]
    fn non_utf8_menu_choice_redisplays_menu() {
        let mut conn = open_db_in_memory().unwrap();
        let output = run_bytes(&mut conn, b"\xc0\n5\n");

        assert!(output.contains("Input error: text is not valid UTF-8"));
        assert_eq!(output.matches("PhoneBook menu:").count(), 2);
    }

    #[test]
    fn search_pattern_keeps_surrounding_spaces() {
        let mut conn = open_db_in_memory().unwrap();
        let output = run_script(&mut conn, "1\nAnn\n555\n2\n \n2\nann\r\n5\n");

        assert_eq!(output.matches("No contacts found.").count(), 1);
        assert_eq!(output.matches("ID: 1, Name: Ann, Phone: 555").count(), 1);
    }

    #[test]
    fn selectors_and_numbers_tolerate_padding() {
        let mut conn = open_db_in_memory().unwrap();
        let output = run_script(&mut conn, "1\nAnn\n555\n 3 \n 10 \n0\r\n 4\n1 \nAnn\n5\n");

        assert!(output.contains("ID: 1, Name: Ann, Phone: 555"));
        assert!(output.contains("Contact deleted"));
    }
}
