//! SQLite persistence for hub records.
//!
//! Repositories are free functions over a [`rusqlite::Connection`] grouped
//! per table family. Reads go through [`Store::conn`]; anything that writes
//! more than one row should run inside [`Store::write`].

mod error;
mod row;
mod schema;

pub mod cards;
pub mod decks;
pub mod loyalty;
pub mod news;
pub mod prices;
pub mod rules;
pub mod tournaments;
pub mod users;

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::debug;

pub use cards::{CardFacets, CardFilter, DEFAULT_SEARCH_LIMIT};
pub use error::{Result, StoreError};
pub use rusqlite;

#[derive(Debug)]
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        schema::apply(&conn)?;
        debug!(path = %path.display(), "opened database");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::apply(&conn)?;
        Ok(Self { conn, path: None })
    }

    /// `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside a transaction. Committed when `f` returns `Ok`,
    /// rolled back otherwise.
    pub fn write<T, E>(
        &mut self,
        f: impl FnOnce(&Connection) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: From<StoreError>,
    {
        let tx = self.conn.transaction().map_err(StoreError::from)?;
        let value = f(&tx)?;
        tx.commit().map_err(StoreError::from)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_idempotent() {
        let store = Store::open_in_memory().unwrap();
        schema::apply(store.conn()).unwrap();
        let tables: i64 = store
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 16);
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let store = Store::open_in_memory().unwrap();
        let enabled: bool = store
            .conn()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert!(enabled);
    }

    #[test]
    fn failed_write_rolls_back() {
        let mut store = Store::open_in_memory().unwrap();
        let outcome: Result<()> = store.write(|conn| {
            users::create(conn, "ana", false)?;
            Err(StoreError::not_found("deck", 1))
        });
        assert!(outcome.is_err());
        assert!(users::find_by_username(store.conn(), "ana").unwrap().is_none());
    }
}
