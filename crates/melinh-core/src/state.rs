//! Shared state containers.
//!
//! An [`Atom`] is a single observable value: readers take a snapshot with
//! `get`, writers `set` or `update` it, and observers `subscribe` to be woken
//! on every change.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use melinh_host::{mock_profile, UserProfile};

use crate::booking::{
    BookingResult, BookingStore, BookingSubmission, Navigator, SharedBookings, SubmitOutcome,
};
use crate::models::BookingDraft;
use crate::repository::{InMemoryRepository, RecordRepository, RepositoryResult, SqliteRepository};

/// Observable shared value.
pub struct Atom<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for Atom<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Default> Default for Atom<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Atom<T> {
    pub fn new(value: T) -> Self {
        let (tx, _rx) = watch::channel(value);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Modify the value in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Receiver that observes every subsequent change.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Atom<T> {
    /// Snapshot of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}

/// Everything the pages share.
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordRepository>,
    pub bookings: Arc<dyn BookingStore>,
    pub booking_draft: Atom<BookingDraft>,
    pub profile: Atom<UserProfile>,
}

impl AppState {
    /// Volatile state with the mock profile.
    pub fn in_memory(records: InMemoryRepository) -> Self {
        Self {
            records: Arc::new(records),
            bookings: Arc::new(SharedBookings::new()),
            booking_draft: Atom::default(),
            profile: Atom::new(mock_profile()),
        }
    }

    /// Collections and bookings persisted in one SQLite file.
    pub fn open(path: &str) -> RepositoryResult<Self> {
        let repo = Arc::new(SqliteRepository::open(path)?);
        Ok(Self {
            records: repo.clone(),
            bookings: repo,
            booking_draft: Atom::default(),
            profile: Atom::new(mock_profile()),
        })
    }

    /// Submit the shared booking draft as the current user.
    pub async fn submit_booking(
        &self,
        navigator: &dyn Navigator,
        latency: Duration,
    ) -> BookingResult<SubmitOutcome> {
        let draft = self.booking_draft.get();
        let profile = self.profile.get();
        BookingSubmission::new(self.bookings.as_ref(), navigator)
            .with_latency(latency)
            .submit(&draft, &profile)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_get_set_update() {
        let atom = Atom::new(1);
        atom.set(2);
        atom.update(|v| *v += 3);
        assert_eq!(atom.get(), 5);
    }

    #[test]
    fn test_clones_share_value() {
        let atom: Atom<Vec<u8>> = Atom::default();
        let other = atom.clone();
        other.update(|v| v.push(7));
        assert_eq!(atom.get(), vec![7]);
    }

    #[tokio::test]
    async fn test_subscribe_sees_changes() {
        let draft = Atom::new(BookingDraft::default());
        let mut rx = draft.subscribe();

        draft.update(|d| d.description = "cough".into());

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().description, "cough");
    }

    #[test]
    fn test_app_state_shares_sqlite_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.db");
        let state = AppState::open(path.to_str().unwrap()).unwrap();

        assert!(state.bookings.list().unwrap().is_empty());
        assert_eq!(state.records.count(crate::models::CollectionKind::Doctors).unwrap(), 0);
        assert_eq!(state.profile.get(), mock_profile());
    }
}
