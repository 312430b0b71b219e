//! SQLite schema definition.

/// Complete database schema for melinh.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Admin collections (schemaless records, one row per record)
-- ============================================================================

CREATE TABLE IF NOT EXISTS collection_records (
    collection TEXT NOT NULL,                     -- doctors, services, ...
    id INTEGER NOT NULL,                          -- record id, unique per collection
    position INTEGER NOT NULL,                    -- display order
    body TEXT NOT NULL,                           -- JSON object, includes id
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (collection, id)
);

CREATE INDEX IF NOT EXISTS idx_records_position ON collection_records(collection, position);

-- ============================================================================
-- Bookings (append-only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS bookings (
    booking_id TEXT PRIMARY KEY,
    status TEXT NOT NULL DEFAULT 'pending_confirmation'
        CHECK (status IN ('pending_confirmation', 'confirmed', 'cancelled')),
    patient_name TEXT NOT NULL,
    schedule TEXT NOT NULL,                       -- JSON {date, time: {hour}}
    doctor TEXT NOT NULL,                         -- JSON copy of the doctor
    department TEXT NOT NULL,                     -- JSON copy of the department
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_bookings_created ON bookings(created_at);
"#;
