//! SQLite persistence for scores and the cached ranking averages.
//!
//! Queries are parameterized exclusively and serialized through a single
//! connection; typed records are built right at this boundary so row tuples
//! never leak into the rest of the crate.

mod models;
mod ranking;
mod scores;

pub use models::{RankingRecord, ScoreRecord};

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use thiserror::Error;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised by the SQLite store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite failure.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored date string does not parse as `YYYY-MM-DD`.
    #[error("malformed date in store: `{0}`")]
    MalformedDate(String),
    /// The connection mutex was poisoned by a panicking holder.
    #[error("database handle poisoned")]
    Poisoned,
}

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Handle over the bot's SQLite database.
#[derive(Debug)]
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (creating if needed) the database at `path` and apply the schema.
    pub fn open(path: &Path) -> StoreResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open a private in-memory database. Used by tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}
