use phonebook_core::db::migrations::{current_user_version, latest_version};
use phonebook_core::db::{
    apply_migrations, close_db, connect_db, install_routines, open_db, open_db_in_memory, DbError,
};
use rusqlite::Connection;
use std::time::Duration;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "contacts");
    assert_index_exists(&conn, "idx_contacts_first_name");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phonebook.sqlite3");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO contacts (first_name, phone) VALUES ('Ivan', '79991234567');",
            [],
        )
        .unwrap();
    close_db(conn_first).unwrap();

    let conn_second = open_db(&path).unwrap();
    assert_eq!(current_user_version(&conn_second).unwrap(), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM contacts;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn migrations_adopt_existing_contacts_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE contacts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT,
            phone TEXT NOT NULL
        );
        INSERT INTO contacts (first_name, phone) VALUES ('Ann', '555-1');",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    let phone: String = conn
        .query_row(
            "SELECT phone FROM contacts WHERE first_name = 'Ann';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(phone, "555-1");
}

#[test]
fn connect_db_leaves_schema_to_caller() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bare.db");

    let mut conn = connect_db(&path, Duration::from_millis(250)).unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), 0);

    apply_migrations(&mut conn).unwrap();
    install_routines(&conn).unwrap();
    assert_table_exists(&conn, "contacts");

    let hit: bool = conn
        .query_row("SELECT contains_ci('Ivan', 'IV');", [], |row| row.get(0))
        .unwrap();
    assert!(hit);
}

#[test]
fn connect_db_fails_for_unreachable_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("nested").join("book.db");

    let err = connect_db(&path, Duration::from_secs(1)).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
}

#[test]
fn schema_rejects_blank_names_and_phones() {
    let conn = open_db_in_memory().unwrap();

    let blank_name = conn.execute(
        "INSERT INTO contacts (first_name, phone) VALUES ('  ', '555');",
        [],
    );
    assert!(blank_name.is_err());

    let null_phone = conn.execute(
        "INSERT INTO contacts (first_name, phone) VALUES ('Ann', NULL);",
        [],
    );
    assert!(null_phone.is_err());
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert_schema_object_exists(conn, "table", table_name);
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    assert_schema_object_exists(conn, "index", index_name);
}

fn assert_schema_object_exists(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
