//! Collection repositories.
//!
//! UI-facing components depend only on [`RecordRepository`]. The in-memory
//! implementation is the default; the SQLite one persists across restarts.

mod memory;
mod sqlite;

pub use memory::*;
pub use sqlite::*;

use thiserror::Error;

use crate::db::DbError;
use crate::models::{CollectionError, CollectionKind, Record};

/// Repository errors.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Invalid collection: {0}")]
    Collection(#[from] CollectionError),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl<T> From<std::sync::PoisonError<T>> for RepositoryError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        RepositoryError::LockPoisoned(e.to_string())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage for the named collections.
///
/// Every mutation is all-or-nothing: on error the collection is unchanged.
pub trait RecordRepository: Send + Sync {
    /// All records of a collection, in stored order.
    fn all(&self, kind: CollectionKind) -> RepositoryResult<Vec<Record>>;

    /// One record by id.
    fn get(&self, kind: CollectionKind, id: i64) -> RepositoryResult<Option<Record>>;

    /// Replace the record with the same id in place, or append it.
    fn upsert(&self, kind: CollectionKind, record: Record) -> RepositoryResult<()>;

    /// Remove a record. Returns whether it existed.
    fn delete(&self, kind: CollectionKind, id: i64) -> RepositoryResult<bool>;

    /// Replace the whole collection.
    fn replace_all(&self, kind: CollectionKind, records: Vec<Record>) -> RepositoryResult<()>;

    /// Record count.
    fn count(&self, kind: CollectionKind) -> RepositoryResult<usize> {
        Ok(self.all(kind)?.len())
    }
}
