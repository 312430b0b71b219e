//! Collection record database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{ensure_unique_ids, CollectionKind, Record};

impl Database {
    /// List a collection's records in display order.
    pub fn list_records(&self, kind: CollectionKind) -> DbResult<Vec<Record>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT body
            FROM collection_records
            WHERE collection = ?
            ORDER BY position
            "#,
        )?;

        let rows = stmt.query_map([kind.id()], |row| row.get::<_, String>(0))?;

        let mut records = Vec::new();
        for body in rows {
            records.push(parse_body(&body?)?);
        }
        Ok(records)
    }

    /// Get a record by id.
    pub fn get_record(&self, kind: CollectionKind, id: i64) -> DbResult<Option<Record>> {
        self.conn
            .query_row(
                "SELECT body FROM collection_records WHERE collection = ? AND id = ?",
                params![kind.id(), id],
                |row| row.get::<_, String>(0),
            )
            .optional()?
            .map(|body| parse_body(&body))
            .transpose()
    }

    /// Insert or replace a record. Updates keep their position; inserts go last.
    pub fn upsert_record(&self, kind: CollectionKind, record: &Record) -> DbResult<()> {
        let body = serde_json::to_string(record)?;

        self.conn.execute(
            r#"
            INSERT INTO collection_records (collection, id, position, body, updated_at)
            VALUES (
                ?1, ?2,
                (SELECT COALESCE(MAX(position), -1) + 1 FROM collection_records WHERE collection = ?1),
                ?3, datetime('now')
            )
            ON CONFLICT(collection, id) DO UPDATE SET
                body = excluded.body,
                updated_at = datetime('now')
            "#,
            params![kind.id(), record.id(), body],
        )?;
        Ok(())
    }

    /// Delete a record.
    pub fn delete_record(&self, kind: CollectionKind, id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM collection_records WHERE collection = ? AND id = ?",
            params![kind.id(), id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Replace a whole collection in one transaction.
    pub fn replace_records(&mut self, kind: CollectionKind, records: &[Record]) -> DbResult<()> {
        ensure_unique_ids(records).map_err(|e| DbError::Constraint(e.to_string()))?;

        self.in_transaction(|tx| {
            tx.execute(
                "DELETE FROM collection_records WHERE collection = ?",
                [kind.id()],
            )?;
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO collection_records (collection, id, position, body)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )?;
            for (position, record) in records.iter().enumerate() {
                let body = serde_json::to_string(record)?;
                stmt.execute(params![kind.id(), record.id(), position as i64, body])?;
            }
            Ok(())
        })
    }

    /// Count records in a collection.
    pub fn count_records(&self, kind: CollectionKind) -> DbResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM collection_records WHERE collection = ?",
            [kind.id()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn parse_body(body: &str) -> DbResult<Record> {
    serde_json::from_str(body).map_err(Into::into)
}
