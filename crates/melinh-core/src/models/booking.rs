//! Booking draft and booking records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Doctor chosen for a booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    /// Professional title (e.g., "MD, PhD")
    pub title: Option<String>,
    /// Portrait image reference
    pub image: Option<String>,
}

/// Hospital department.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

/// Hour of a slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotTime {
    pub hour: u32,
}

/// A time slot: day plus hour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSlot {
    pub date: NaiveDate,
    pub time: SlotTime,
}

impl TimeSlot {
    pub fn new(date: NaiveDate, hour: u32) -> Self {
        Self {
            date,
            time: SlotTime { hour },
        }
    }
}

/// Partially filled booking request, shared across the wizard steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookingDraft {
    pub symptoms: Vec<String>,
    /// Free-text description of the complaint
    pub description: String,
    pub doctor: Option<Doctor>,
    pub department: Option<Department>,
    pub slot: Option<TimeSlot>,
}

impl BookingDraft {
    /// Names of the selections still missing.
    pub fn missing_selections(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.doctor.is_none() {
            missing.push("doctor");
        }
        if self.department.is_none() {
            missing.push("department");
        }
        if self.slot.is_none() {
            missing.push("slot");
        }
        missing
    }
}

/// Booking status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    PendingConfirmation,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::PendingConfirmation => "pending confirmation",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::PendingConfirmation => "pending_confirmation",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending_confirmation" => Some(BookingStatus::PendingConfirmation),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

/// A submitted booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingRecord {
    pub booking_id: String,
    pub status: BookingStatus,
    pub patient_name: String,
    pub schedule: TimeSlot,
    pub doctor: Doctor,
    pub department: Department,
    pub created_at: String,
}

impl BookingRecord {
    /// Create a booking awaiting confirmation.
    pub fn new(patient_name: String, schedule: TimeSlot, doctor: Doctor, department: Department) -> Self {
        Self {
            booking_id: uuid::Uuid::new_v4().to_string(),
            status: BookingStatus::PendingConfirmation,
            patient_name,
            schedule,
            doctor,
            department,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
