//! Booking draft submission.
//!
//! Submission is gated on a minimally complete draft (symptoms plus a
//! description). Success feedback, the appended record and navigation are all
//! conditional on the same full check, so the user is never told a booking
//! was placed when nothing was stored.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use melinh_host::UserProfile;

use crate::db::DbError;
use crate::models::{BookingDraft, BookingRecord, Notice};
use crate::repository::SqliteRepository;
use crate::state::Atom;

/// Route of the wizard step after the symptom form.
pub const NEXT_STEP_ROUTE: &str = "/booking/3";

/// Stand-in for the booking service round trip.
pub const DEFAULT_SUBMISSION_LATENCY: Duration = Duration::from_millis(1500);

pub const INCOMPLETE_DRAFT_MESSAGE: &str = "Please fill in all required information!";
pub const BOOKING_PLACED_MESSAGE: &str = "Booking placed successfully!";

/// Booking errors.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Booking draft is missing: {}", .0.join(", "))]
    MissingSelection(Vec<&'static str>),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl<T> From<std::sync::PoisonError<T>> for BookingError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        BookingError::LockPoisoned(e.to_string())
    }
}

pub type BookingResult<T> = Result<T, BookingError>;

/// Shared, append-only booking list.
pub trait BookingStore: Send + Sync {
    fn append(&self, booking: BookingRecord) -> BookingResult<()>;

    fn list(&self) -> BookingResult<Vec<BookingRecord>>;
}

/// In-memory booking list; observers can subscribe to changes.
#[derive(Clone, Default)]
pub struct SharedBookings {
    bookings: Atom<Vec<BookingRecord>>,
}

impl SharedBookings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atom(&self) -> &Atom<Vec<BookingRecord>> {
        &self.bookings
    }
}

impl BookingStore for SharedBookings {
    fn append(&self, booking: BookingRecord) -> BookingResult<()> {
        self.bookings.update(|list| list.push(booking));
        Ok(())
    }

    fn list(&self) -> BookingResult<Vec<BookingRecord>> {
        Ok(self.bookings.get())
    }
}

impl BookingStore for SqliteRepository {
    fn append(&self, booking: BookingRecord) -> BookingResult<()> {
        Ok(self.with_db(|db| db.insert_booking(&booking))??)
    }

    fn list(&self) -> BookingResult<Vec<BookingRecord>> {
        Ok(self.with_db(|db| db.list_bookings())??)
    }
}

impl<S: BookingStore + ?Sized> BookingStore for Arc<S> {
    fn append(&self, booking: BookingRecord) -> BookingResult<()> {
        (**self).append(booking)
    }

    fn list(&self) -> BookingResult<Vec<BookingRecord>> {
        (**self).list()
    }
}

/// Moves the wizard to another step.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, route: &str) {
        self(route)
    }
}

/// Whether the submit button is enabled.
pub fn can_submit(draft: &BookingDraft) -> bool {
    !draft.symptoms.is_empty() && !draft.description.trim().is_empty()
}

/// Result of a submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Button disabled: warning shown, nothing else happened
    Rejected(Notice),
    /// Booking appended and the wizard advanced
    Submitted {
        booking: BookingRecord,
        notice: Notice,
        next_route: String,
    },
}

/// Symptom-step submission handler.
pub struct BookingSubmission<'a> {
    store: &'a dyn BookingStore,
    navigator: &'a dyn Navigator,
    latency: Duration,
}

impl<'a> BookingSubmission<'a> {
    pub fn new(store: &'a dyn BookingStore, navigator: &'a dyn Navigator) -> Self {
        Self {
            store,
            navigator,
            latency: DEFAULT_SUBMISSION_LATENCY,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Submit the draft on behalf of `profile`.
    pub async fn submit(
        &self,
        draft: &BookingDraft,
        profile: &UserProfile,
    ) -> BookingResult<SubmitOutcome> {
        if !can_submit(draft) {
            tracing::debug!("Booking submit attempted with incomplete draft");
            return Ok(SubmitOutcome::Rejected(Notice::warning(INCOMPLETE_DRAFT_MESSAGE)));
        }

        let (Some(doctor), Some(department), Some(slot)) =
            (draft.doctor.clone(), draft.department.clone(), draft.slot.clone())
        else {
            let missing = draft.missing_selections();
            tracing::error!(?missing, "Booking draft reached symptom step without selections");
            return Err(BookingError::MissingSelection(missing));
        };

        tokio::time::sleep(self.latency).await;

        let booking = BookingRecord::new(profile.name.clone(), slot, doctor, department);
        self.store.append(booking.clone())?;
        tracing::info!(booking_id = %booking.booking_id, "Booking appended");

        self.navigator.navigate(NEXT_STEP_ROUTE);

        Ok(SubmitOutcome::Submitted {
            booking,
            notice: Notice::success(BOOKING_PLACED_MESSAGE),
            next_route: NEXT_STEP_ROUTE.to_string(),
        })
    }
}
