//! SQLite persistence for collections and bookings.
//!
//! Record bodies are stored as JSON text; `position` keeps the collection order.

mod bookings;
mod records;
mod schema;

pub use schema::*;

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, Transaction};
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Record body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// One SQLite file holding every collection and the booking log.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
        tracing::debug!(path = %path.display(), "Opened melinh database");
        Self::with_connection(conn)
    }

    /// Volatile database, mostly for tests.
    pub fn open_in_memory() -> DbResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> DbResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside a transaction; commit on `Ok`, roll back on `Err`.
    pub fn in_transaction<T>(
        &mut self,
        f: impl FnOnce(&Transaction<'_>) -> DbResult<T>,
    ) -> DbResult<T> {
        let tx = self.conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}
