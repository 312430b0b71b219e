//! SQLite-backed repository.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{RecordRepository, RepositoryResult};
use crate::db::Database;
use crate::models::{ensure_unique_ids, CollectionKind, Record};

/// Persistent repository over the melinh database.
pub struct SqliteRepository {
    db: Mutex<Database>,
}

impl SqliteRepository {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    pub fn open_in_memory() -> RepositoryResult<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Run `f` against the locked database (shared with the booking store).
    pub(crate) fn with_db<T>(
        &self,
        f: impl FnOnce(&Database) -> T,
    ) -> Result<T, PoisonError<MutexGuard<'_, Database>>> {
        let db = self.db.lock()?;
        Ok(f(&db))
    }
}

impl RecordRepository for SqliteRepository {
    fn all(&self, kind: CollectionKind) -> RepositoryResult<Vec<Record>> {
        let db = self.db.lock()?;
        Ok(db.list_records(kind)?)
    }

    fn get(&self, kind: CollectionKind, id: i64) -> RepositoryResult<Option<Record>> {
        let db = self.db.lock()?;
        Ok(db.get_record(kind, id)?)
    }

    fn upsert(&self, kind: CollectionKind, record: Record) -> RepositoryResult<()> {
        let db = self.db.lock()?;
        db.upsert_record(kind, &record)?;
        Ok(())
    }

    fn delete(&self, kind: CollectionKind, id: i64) -> RepositoryResult<bool> {
        let db = self.db.lock()?;
        Ok(db.delete_record(kind, id)?)
    }

    fn replace_all(&self, kind: CollectionKind, records: Vec<Record>) -> RepositoryResult<()> {
        ensure_unique_ids(&records)?;
        let mut db = self.db.lock()?;
        db.replace_records(kind, &records)?;
        Ok(())
    }

    fn count(&self, kind: CollectionKind) -> RepositoryResult<usize> {
        let db = self.db.lock()?;
        Ok(db.count_records(kind)?)
    }
}
