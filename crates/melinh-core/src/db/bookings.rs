//! Booking database operations.

use rusqlite::params;

use super::{Database, DbError, DbResult};
use crate::models::{BookingRecord, BookingStatus};

impl Database {
    /// Append a booking.
    pub fn insert_booking(&self, booking: &BookingRecord) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO bookings (
                booking_id, status, patient_name, schedule, doctor, department, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                booking.booking_id,
                booking.status.as_str(),
                booking.patient_name,
                serde_json::to_string(&booking.schedule)?,
                serde_json::to_string(&booking.doctor)?,
                serde_json::to_string(&booking.department)?,
                booking.created_at,
            ],
        )?;
        Ok(())
    }

    /// List bookings, oldest first.
    pub fn list_bookings(&self) -> DbResult<Vec<BookingRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT booking_id, status, patient_name, schedule, doctor, department, created_at
            FROM bookings
            ORDER BY created_at, rowid
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(BookingRow {
                booking_id: row.get(0)?,
                status: row.get(1)?,
                patient_name: row.get(2)?,
                schedule: row.get(3)?,
                doctor: row.get(4)?,
                department: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;

        let mut bookings = Vec::new();
        for row in rows {
            bookings.push(row?.try_into()?);
        }
        Ok(bookings)
    }
}

/// Internal row representation.
struct BookingRow {
    booking_id: String,
    status: String,
    patient_name: String,
    schedule: String,
    doctor: String,
    department: String,
    created_at: String,
}

impl TryFrom<BookingRow> for BookingRecord {
    type Error = DbError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status = BookingStatus::parse(&row.status)
            .ok_or_else(|| DbError::Constraint(format!("Unknown booking status: {}", row.status)))?;

        Ok(BookingRecord {
            booking_id: row.booking_id,
            status,
            patient_name: row.patient_name,
            schedule: serde_json::from_str(&row.schedule)?,
            doctor: serde_json::from_str(&row.doctor)?,
            department: serde_json::from_str(&row.department)?,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Department, Doctor, TimeSlot};
    use chrono::NaiveDate;

    fn make_booking(patient: &str) -> BookingRecord {
        BookingRecord::new(
            patient.to_string(),
            TimeSlot::new(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(), 10),
            Doctor {
                id: 1,
                name: "Dr. Hoa".into(),
                title: Some("MD".into()),
                image: None,
            },
            Department {
                id: 3,
                name: "Pediatrics".into(),
            },
        )
    }

    #[test]
    fn test_insert_and_list() {
        let db = Database::open_in_memory().unwrap();
        let first = make_booking("An");
        let second = make_booking("Binh");

        db.insert_booking(&first).unwrap();
        db.insert_booking(&second).unwrap();

        let bookings = db.list_bookings().unwrap();
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0], first);
        assert_eq!(bookings[1].patient_name, "Binh");
    }

    #[test]
    fn test_duplicate_booking_id_rejected() {
        let db = Database::open_in_memory().unwrap();
        let booking = make_booking("An");
        db.insert_booking(&booking).unwrap();
        assert!(db.insert_booking(&booking).is_err());
    }
}
