//! Address repository contract and SQLite implementation.
//!
//! # Invariants
//! - `find_address` matches `(city, street, street_number)` exactly, using
//!   SQLite's default BINARY collation.
//! - `insert_address` relies on the table's unique constraint; a duplicate
//!   insert surfaces as `RepoError::ConflictRace`, never as a second row.

use crate::model::address::{Address, AddressId, NewAddress};
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ADDRESS_SELECT_SQL: &str = "SELECT id, city, street, street_number FROM addresses";

/// Repository interface for shared address rows.
pub trait AddressRepository {
    /// Finds the address whose values match the draft exactly.
    fn find_address(&self, draft: &NewAddress) -> RepoResult<Option<Address>>;
    fn insert_address(&self, draft: &NewAddress) -> RepoResult<Address>;
    /// Deletes one address row and returns the number of rows removed.
    fn delete_address(&self, id: AddressId) -> RepoResult<usize>;
    fn count_addresses(&self) -> RepoResult<u64>;
}

/// SQLite-backed address repository.
pub struct SqliteAddressRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAddressRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AddressRepository for SqliteAddressRepository<'_> {
    fn find_address(&self, draft: &NewAddress) -> RepoResult<Option<Address>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{ADDRESS_SELECT_SQL}
             WHERE city = ?1
               AND street = ?2
               AND street_number = ?3;"
        ))?;
        let row = stmt
            .query_row(
                params![draft.city, draft.street, draft.street_number],
                address_from_row,
            )
            .optional()?;
        row.map(checked_address).transpose()
    }

    fn insert_address(&self, draft: &NewAddress) -> RepoResult<Address> {
        self.conn.execute(
            "INSERT INTO addresses (city, street, street_number) VALUES (?1, ?2, ?3);",
            params![draft.city, draft.street, draft.street_number],
        )?;

        Ok(Address {
            id: self.conn.last_insert_rowid(),
            city: draft.city.clone(),
            street: draft.street.clone(),
            street_number: draft.street_number,
        })
    }

    fn delete_address(&self, id: AddressId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM addresses WHERE id = ?1;", [id])?;
        Ok(removed)
    }

    fn count_addresses(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM addresses;", [], |row| row.get(0))?;
        Ok(count.unsigned_abs())
    }
}

fn address_from_row(row: &Row<'_>) -> rusqlite::Result<Address> {
    Ok(Address {
        id: row.get("id")?,
        city: row.get("city")?,
        street: row.get("street")?,
        street_number: row.get("street_number")?,
    })
}

/// Parses the address columns of a joined row; `None` when the student
/// row carries no address.
pub(crate) fn joined_address_from_row(row: &Row<'_>) -> RepoResult<Option<Address>> {
    let id: Option<AddressId> = row.get("address_ref")?;
    let Some(id) = id else {
        return Ok(None);
    };
    let address = Address {
        id,
        city: row.get("city")?,
        street: row.get("street")?,
        street_number: row.get("street_number")?,
    };
    checked_address(address).map(Some)
}

fn checked_address(address: Address) -> RepoResult<Address> {
    if address.street_number <= 0 {
        return Err(RepoError::InvalidData(format!(
            "invalid street_number `{}` in addresses.street_number (id={})",
            address.street_number, address.id
        )));
    }
    Ok(address)
}
