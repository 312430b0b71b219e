//! In-memory repository.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{RecordRepository, RepositoryResult};
use crate::models::{ensure_unique_ids, Collection, CollectionKind, Record};

/// Default repository keeping every collection in process memory.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    collections: Mutex<HashMap<CollectionKind, Vec<Record>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with validated collections.
    pub fn with_collections(collections: impl IntoIterator<Item = Collection>) -> Self {
        let map = collections
            .into_iter()
            .map(Collection::into_parts)
            .collect();
        Self {
            collections: Mutex::new(map),
        }
    }
}

impl RecordRepository for InMemoryRepository {
    fn all(&self, kind: CollectionKind) -> RepositoryResult<Vec<Record>> {
        let collections = self.collections.lock()?;
        Ok(collections.get(&kind).cloned().unwrap_or_default())
    }

    fn get(&self, kind: CollectionKind, id: i64) -> RepositoryResult<Option<Record>> {
        let collections = self.collections.lock()?;
        Ok(collections
            .get(&kind)
            .and_then(|records| records.iter().find(|r| r.id() == id))
            .cloned())
    }

    fn upsert(&self, kind: CollectionKind, record: Record) -> RepositoryResult<()> {
        let mut collections = self.collections.lock()?;
        let records = collections.entry(kind).or_default();
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        Ok(())
    }

    fn delete(&self, kind: CollectionKind, id: i64) -> RepositoryResult<bool> {
        let mut collections = self.collections.lock()?;
        let Some(records) = collections.get_mut(&kind) else {
            return Ok(false);
        };
        let before = records.len();
        records.retain(|r| r.id() != id);
        Ok(records.len() != before)
    }

    fn replace_all(&self, kind: CollectionKind, records: Vec<Record>) -> RepositoryResult<()> {
        ensure_unique_ids(&records)?;
        let mut collections = self.collections.lock()?;
        collections.insert(kind, records);
        Ok(())
    }
}
