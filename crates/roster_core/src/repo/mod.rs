//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define table-oriented data access contracts for students and addresses.
//! - Isolate SQL details from the roster store orchestration.
//!
//! # Invariants
//! - Repositories never open transactions themselves; callers pass a
//!   connection or transaction and own the atomicity boundary.
//! - Read paths reject invalid persisted rows instead of masking them.

pub mod address_repo;
pub mod error;
pub mod student_repo;

use crate::repo::error::{RepoError, RepoResult};
use rusqlite::Connection;

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("addresses", &["id", "city", "street", "street_number"]),
    (
        "students",
        &["id", "first_name", "last_name", "age", "address_id"],
    ),
];

/// Verifies that the connection carries the roster schema.
///
/// Used once when a store is built from a caller-supplied connection.
pub fn ensure_roster_schema(conn: &Connection) -> RepoResult<()> {
    for (table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for column in *columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
