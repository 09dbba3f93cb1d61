//! Application-defined SQL functions registered on every connection.
//!
//! # Responsibility
//! - Provide the case-insensitive substring test used by contact search.
//!
//! # Invariants
//! - Registration is idempotent: re-installing replaces the previous
//!   definition with the same name and arity.
//! - Functions are deterministic and never fail on NULL input.

use super::DbResult;
use log::debug;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// SQL name of the case-insensitive substring function.
///
/// `contains_ci(haystack, needle)` returns 1 when `needle` occurs in
/// `haystack` ignoring case, 0 otherwise (including when either is NULL).
pub const CONTAINS_CI: &str = "contains_ci";

/// Registers (or re-registers) all phone book SQL functions on `conn`.
pub fn install_routines(conn: &Connection) -> DbResult<()> {
    conn.create_scalar_function(
        CONTAINS_CI,
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let haystack = ctx.get::<Option<String>>(0)?;
            let needle = ctx.get::<Option<String>>(1)?;
            Ok(match (haystack, needle) {
                (Some(haystack), Some(needle)) => contains_ignore_case(&haystack, &needle),
                _ => false,
            })
        },
    )?;

    debug!("event=routines_install module=db status=ok functions={CONTAINS_CI}");
    Ok(())
}

/// Unicode-aware case-insensitive substring test.
///
/// SQLite's built-in `LIKE` only folds ASCII, so Cyrillic and other scripts
/// go through full lowercase mapping here.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
