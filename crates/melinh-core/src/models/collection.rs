//! Named record collections.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::record::Record;

/// Collection errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectionError {
    #[error("Duplicate record id {0}")]
    DuplicateId(i64),

    #[error("Unknown collection: {0}")]
    UnknownKind(String),
}

/// The entity collections managed by the admin browser, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Doctors,
    Services,
    Departments,
    Articles,
    Schedules,
    Invoices,
}

impl CollectionKind {
    /// All collections in tab order.
    pub const ALL: [CollectionKind; 6] = [
        CollectionKind::Doctors,
        CollectionKind::Services,
        CollectionKind::Departments,
        CollectionKind::Articles,
        CollectionKind::Schedules,
        CollectionKind::Invoices,
    ];

    /// Stable identifier (tab id, storage key).
    pub fn id(&self) -> &'static str {
        match self {
            CollectionKind::Doctors => "doctors",
            CollectionKind::Services => "services",
            CollectionKind::Departments => "departments",
            CollectionKind::Articles => "articles",
            CollectionKind::Schedules => "schedules",
            CollectionKind::Invoices => "invoices",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            CollectionKind::Doctors => "Doctors",
            CollectionKind::Services => "Services",
            CollectionKind::Departments => "Departments",
            CollectionKind::Articles => "Articles",
            CollectionKind::Schedules => "Schedules",
            CollectionKind::Invoices => "Invoices",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CollectionKind {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollectionKind::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| CollectionError::UnknownKind(s.to_string()))
    }
}

/// Check the unique-id invariant.
pub fn ensure_unique_ids(records: &[Record]) -> Result<(), CollectionError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id()) {
            return Err(CollectionError::DuplicateId(record.id()));
        }
    }
    Ok(())
}

/// An ordered sequence of uniquely identified records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection {
    kind: CollectionKind,
    records: Vec<Record>,
}

impl Collection {
    /// Create a collection, rejecting duplicate ids.
    pub fn new(kind: CollectionKind, records: Vec<Record>) -> Result<Self, CollectionError> {
        ensure_unique_ids(&records)?;
        Ok(Self { kind, records })
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_parts(self) -> (CollectionKind, Vec<Record>) {
        (self.kind, self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in CollectionKind::ALL {
            assert_eq!(kind.id().parse::<CollectionKind>().unwrap(), kind);
        }
        assert!("patients".parse::<CollectionKind>().is_err());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let records = vec![Record::new(1), Record::new(2), Record::new(1)];
        assert_eq!(
            Collection::new(CollectionKind::Doctors, records),
            Err(CollectionError::DuplicateId(1))
        );
    }

    #[test]
    fn test_get_by_id() {
        let collection = Collection::new(
            CollectionKind::Services,
            vec![Record::new(1), Record::new(5).with("name", "X-ray")],
        )
        .unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(
            collection.get(5).and_then(|r| r.get("name")),
            Some(&serde_json::json!("X-ray"))
        );
        assert!(collection.get(9).is_none());
    }
}
