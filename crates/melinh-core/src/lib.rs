//! MeLinh Core Library
//!
//! Patient-facing hospital mini-app core: admin data browser and booking flow,
//! runnable inside the mini-app host or a plain browser shell.
//!
//! # Architecture
//!
//! ```text
//!        Host environment probe (melinh-host)
//!                     │
//!                     ▼
//!          ┌──────────────────────┐
//!          │   Shared state       │  Atom<BookingDraft>, Atom<UserProfile>
//!          │   (AppState)         │  RecordRepository, BookingStore
//!          └──────────┬───────────┘
//!                     │
//!          ┌──────────┴───────────┐
//!          ▼                      ▼
//!    Booking step           Admin browser ── access policy gate
//!    (symptom form)               │
//!          │              ┌───────┼──────────────┐
//!          ▼              ▼       ▼              ▼
//!     BookingStore   RecordTable  Edit modal   Export / Import
//!                    (search,     (draft →     (JSON file per
//!                     paging)      upsert)      collection)
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (Record, Collection, BookingDraft, ...)
//! - [`db`]: SQLite persistence for collections and bookings
//! - [`repository`]: Collection repositories (in-memory, SQLite)
//! - [`table`]: Generic searchable, paginated record table
//! - [`admin`]: Admin page state (tabs, edit modal, delete, export/import)
//! - [`booking`]: Booking draft submission
//! - [`export`]: Collection export and import
//! - [`state`]: Shared observable state
//! - [`config`]: Configuration loading
//! - [`telemetry`]: Logging setup

pub mod admin;
pub mod booking;
pub mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod repository;
pub mod seed;
pub mod state;
pub mod table;
pub mod telemetry;

// Re-export commonly used types
pub use admin::{AccessPolicy, AdminBrowser, AdminError, AdminView, AllowList, EditSession};
pub use booking::{BookingStore, BookingSubmission, Navigator, SharedBookings, SubmitOutcome};
pub use config::AppConfig;
pub use db::Database;
pub use models::{
    BookingDraft, BookingRecord, BookingStatus, Collection, CollectionKind, Notice, Record,
};
pub use repository::{InMemoryRepository, RecordRepository, SqliteRepository};
pub use state::{AppState, Atom};
pub use table::{Cell, RecordTable, TablePage};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use melinh_host::{mock_profile, AvatarKind, GlobalScope, HostBridge, UserProfile};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MelinhError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Booking error: {0}")]
    BookingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<AdminError> for MelinhError {
    fn from(e: AdminError) -> Self {
        match e {
            AdminError::Repository(inner) => MelinhError::DatabaseError(inner.to_string()),
            AdminError::NotFound { .. } => MelinhError::NotFound(e.to_string()),
            other => MelinhError::InvalidInput(other.notice().message),
        }
    }
}

impl From<repository::RepositoryError> for MelinhError {
    fn from(e: repository::RepositoryError) -> Self {
        MelinhError::DatabaseError(e.to_string())
    }
}

impl From<booking::BookingError> for MelinhError {
    fn from(e: booking::BookingError) -> Self {
        MelinhError::BookingError(e.to_string())
    }
}

impl From<models::CollectionError> for MelinhError {
    fn from(e: models::CollectionError) -> Self {
        MelinhError::InvalidInput(e.to_string())
    }
}

impl From<serde_json::Error> for MelinhError {
    fn from(e: serde_json::Error) -> Self {
        MelinhError::SerializationError(e.to_string())
    }
}

impl From<anyhow::Error> for MelinhError {
    fn from(e: anyhow::Error) -> Self {
        MelinhError::ConfigError(e.to_string())
    }
}

impl From<std::io::Error> for MelinhError {
    fn from(e: std::io::Error) -> Self {
        MelinhError::ConfigError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for MelinhError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MelinhError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Install the log subscriber.
#[uniffi::export]
pub fn init_logging(filter: String) {
    telemetry::init_logging(&filter);
}

/// Open the core. `profile` is the host-provided identity, if any; the mock
/// profile is used otherwise. `admin_ids` lists profile ids allowed into the
/// admin page.
#[uniffi::export]
pub fn open_core(
    config_path: Option<String>,
    profile: Option<FfiUserProfile>,
    admin_ids: Vec<String>,
) -> Result<Arc<MelinhCore>, MelinhError> {
    let config = config::load_config(config_path.as_deref())?;
    telemetry::init_logging(&config.log_filter);

    let scope = GlobalScope::from_process_env().with_marker(config.host_marker.clone());
    let bridge = HostBridge::resolve(Some(&scope));

    let state = match &config.database_path {
        Some(path) => AppState::open(path)?,
        None => AppState::in_memory(seed::demo_repository()?),
    };
    if let Some(profile) = profile {
        state.profile.set(profile.into());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    tracing::info!(environment = ?bridge.environment(), "MeLinh core opened");

    Ok(Arc::new(MelinhCore {
        config,
        bridge,
        state,
        policy: AllowList::new(admin_ids),
        admin: Mutex::new(None),
        runtime,
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe core handle for the embedding host.
#[derive(uniffi::Object)]
pub struct MelinhCore {
    config: AppConfig,
    bridge: HostBridge,
    state: AppState,
    policy: AllowList,
    admin: Mutex<Option<AdminBrowser>>,
    runtime: tokio::runtime::Runtime,
}

impl MelinhCore {
    fn with_admin<T>(
        &self,
        f: impl FnOnce(&mut AdminBrowser) -> Result<T, MelinhError>,
    ) -> Result<T, MelinhError> {
        let mut admin = self.admin.lock()?;
        let browser = admin
            .as_mut()
            .ok_or_else(|| MelinhError::AccessDenied("Admin page not entered".into()))?;
        f(browser)
    }
}

#[uniffi::export]
impl MelinhCore {
    /// "embedded" inside the mini-app host, "web" otherwise.
    pub fn environment(&self) -> String {
        match self.bridge.environment() {
            melinh_host::HostEnvironment::Embedded => "embedded".to_string(),
            melinh_host::HostEnvironment::Web => "web".to_string(),
        }
    }

    // =========================================================================
    // Admin Operations
    // =========================================================================

    /// Enter the admin page as the current profile. Returns false when denied.
    pub fn enter_admin(&self) -> Result<bool, MelinhError> {
        let caller = self.state.profile.get();
        let view = AdminBrowser::enter(&self.policy, &caller, self.state.records.clone())?;

        let mut admin = self.admin.lock()?;
        match view {
            AdminView::Page(browser) => {
                *admin = Some(browser.with_page_size(self.config.page_size));
                Ok(true)
            }
            AdminView::Denied { .. } => {
                *admin = None;
                Ok(false)
            }
        }
    }

    pub fn tabs(&self) -> Result<Vec<FfiTab>, MelinhError> {
        self.with_admin(|admin| Ok(admin.tabs()?.into_iter().map(Into::into).collect()))
    }

    pub fn select_tab(&self, tab_id: String) -> Result<(), MelinhError> {
        let kind: CollectionKind = tab_id.parse()?;
        self.with_admin(|admin| Ok(admin.select_tab(kind)?))
    }

    pub fn set_search(&self, query: String) -> Result<(), MelinhError> {
        self.with_admin(|admin| {
            admin.table_mut().set_search(query);
            Ok(())
        })
    }

    pub fn next_page(&self) -> Result<bool, MelinhError> {
        self.with_admin(|admin| Ok(admin.table_mut().next_page()))
    }

    pub fn prev_page(&self) -> Result<bool, MelinhError> {
        self.with_admin(|admin| Ok(admin.table_mut().prev_page()))
    }

    /// Current table view.
    pub fn table_page(&self) -> Result<FfiTablePage, MelinhError> {
        self.with_admin(|admin| Ok(admin.table().snapshot().into()))
    }

    pub fn begin_edit(&self, id: i64) -> Result<Vec<FfiFieldView>, MelinhError> {
        self.with_admin(|admin| Ok(admin.begin_edit(id)?.into_iter().map(Into::into).collect()))
    }

    pub fn edit_field(&self, name: String, input: String) -> Result<(), MelinhError> {
        self.with_admin(|admin| Ok(admin.edit_field(&name, &input)?))
    }

    /// Current edit form.
    pub fn edit_fields(&self) -> Result<Vec<FfiFieldView>, MelinhError> {
        self.with_admin(|admin| {
            Ok(admin.edit_session().fields().into_iter().map(Into::into).collect())
        })
    }

    pub fn save_edit(&self) -> Result<FfiNotice, MelinhError> {
        self.with_admin(|admin| Ok(admin.save_edit()?.into()))
    }

    pub fn cancel_edit(&self) -> Result<(), MelinhError> {
        self.with_admin(|admin| {
            admin.cancel_edit();
            Ok(())
        })
    }

    /// Delete a record; the host prompts first and passes the answer.
    pub fn delete_record(&self, id: i64, confirmed: bool) -> Result<Option<FfiNotice>, MelinhError> {
        self.with_admin(|admin| Ok(admin.delete(id, &confirmed)?.map(Into::into)))
    }

    pub fn export_active(&self) -> Result<FfiExportArtifact, MelinhError> {
        self.with_admin(|admin| Ok(admin.export_active()?.into()))
    }

    pub fn export_active_csv(&self) -> Result<FfiExportArtifact, MelinhError> {
        self.with_admin(|admin| Ok(admin.export_active_csv()?.into()))
    }

    pub fn import_active(&self, contents: String) -> Result<FfiNotice, MelinhError> {
        self.with_admin(|admin| Ok(admin.import_active(&contents)?.into()))
    }

    // =========================================================================
    // Booking Operations
    // =========================================================================

    /// Replace the shared booking draft (JSON).
    pub fn set_booking_draft(&self, draft_json: String) -> Result<(), MelinhError> {
        let draft: BookingDraft = serde_json::from_str(&draft_json)?;
        self.state.booking_draft.set(draft);
        Ok(())
    }

    /// Whether the symptom step's submit button is enabled.
    pub fn can_submit_booking(&self) -> bool {
        booking::can_submit(&self.state.booking_draft.get())
    }

    /// Submit the shared draft. Blocks for the simulated latency.
    pub fn submit_booking(&self) -> Result<FfiSubmitResult, MelinhError> {
        let navigate = |route: &str| tracing::debug!(route, "Navigation requested");
        let outcome = self
            .runtime
            .block_on(self.state.submit_booking(&navigate, self.config.submission_latency()))?;
        Ok(outcome.into())
    }

    /// All bookings as JSON.
    pub fn list_bookings_json(&self) -> Result<String, MelinhError> {
        let bookings = self.state.bookings.list()?;
        Ok(serde_json::to_string(&bookings)?)
    }

    /// Current user, as used for bookings and admin access.
    pub fn user_profile(&self) -> FfiUserProfile {
        self.state.profile.get().into()
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe user profile.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiUserProfile {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub avatar_is_placeholder: bool,
}

impl From<UserProfile> for FfiUserProfile {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            avatar: profile.avatar,
            avatar_is_placeholder: profile.avatar_type == AvatarKind::Placeholder,
        }
    }
}

impl From<FfiUserProfile> for UserProfile {
    fn from(profile: FfiUserProfile) -> Self {
        UserProfile {
            id: profile.id,
            name: profile.name,
            avatar: profile.avatar,
            avatar_type: if profile.avatar_is_placeholder {
                AvatarKind::Placeholder
            } else {
                AvatarKind::Normal
            },
        }
    }
}

impl Default for FfiUserProfile {
    fn default() -> Self {
        mock_profile().into()
    }
}

/// FFI-safe notice.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNotice {
    pub level: String,
    pub message: String,
}

impl From<Notice> for FfiNotice {
    fn from(notice: Notice) -> Self {
        let level = match notice.level {
            models::NoticeLevel::Success => "success",
            models::NoticeLevel::Warning => "warning",
            models::NoticeLevel::Error => "error",
        };
        Self {
            level: level.to_string(),
            message: notice.message,
        }
    }
}

/// FFI-safe tab.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTab {
    pub id: String,
    pub label: String,
    pub count: u32,
    pub active: bool,
}

impl From<admin::Tab> for FfiTab {
    fn from(tab: admin::Tab) -> Self {
        Self {
            id: tab.kind.id().to_string(),
            label: tab.label,
            count: tab.count as u32,
            active: tab.active,
        }
    }
}

/// FFI-safe table cell.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCell {
    /// "thumbnail", "schedule", "text" or "missing"
    pub kind: String,
    pub text: String,
}

impl From<Cell> for FfiCell {
    fn from(cell: Cell) -> Self {
        let kind = match &cell {
            Cell::Thumbnail(_) => "thumbnail",
            Cell::Schedule(_) => "schedule",
            Cell::Text(_) => "text",
            Cell::Missing => "missing",
        };
        Self {
            kind: kind.to_string(),
            text: cell.display().to_string(),
        }
    }
}

/// FFI-safe table row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTableRow {
    pub id: i64,
    pub cells: Vec<FfiCell>,
}

/// FFI-safe table page.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTablePage {
    pub title: String,
    pub search: String,
    pub columns: Vec<String>,
    pub rows: Vec<FfiTableRow>,
    pub matched: u32,
    pub page: u32,
    pub total_pages: u32,
    pub has_prev: bool,
    pub has_next: bool,
}

impl From<TablePage> for FfiTablePage {
    fn from(page: TablePage) -> Self {
        Self {
            title: page.title,
            search: page.search,
            columns: page.columns,
            rows: page
                .rows
                .into_iter()
                .map(|row| FfiTableRow {
                    id: row.id,
                    cells: row.cells.into_iter().map(Into::into).collect(),
                })
                .collect(),
            matched: page.matched as u32,
            page: page.page as u32,
            total_pages: page.total_pages as u32,
            has_prev: page.has_prev,
            has_next: page.has_next,
        }
    }
}

/// FFI-safe edit form row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFieldView {
    pub name: String,
    /// "read_only", "url", "structured" or "text"
    pub editor: String,
    pub text: String,
}

impl From<admin::FieldView> for FfiFieldView {
    fn from(view: admin::FieldView) -> Self {
        let editor = match view.editor {
            admin::FieldEditor::ReadOnly => "read_only",
            admin::FieldEditor::Url => "url",
            admin::FieldEditor::Structured => "structured",
            admin::FieldEditor::Text => "text",
        };
        Self {
            name: view.name,
            editor: editor.to_string(),
            text: view.text,
        }
    }
}

/// FFI-safe export artifact.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiExportArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub contents: String,
}

impl From<export::ExportArtifact> for FfiExportArtifact {
    fn from(artifact: export::ExportArtifact) -> Self {
        Self {
            file_name: artifact.file_name,
            mime_type: artifact.mime_type,
            contents: artifact.contents,
        }
    }
}

/// FFI-safe submission result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSubmitResult {
    pub submitted: bool,
    pub notice: FfiNotice,
    pub booking_id: Option<String>,
    pub next_route: Option<String>,
}

impl From<SubmitOutcome> for FfiSubmitResult {
    fn from(outcome: SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::Rejected(notice) => Self {
                submitted: false,
                notice: notice.into(),
                booking_id: None,
                next_route: None,
            },
            SubmitOutcome::Submitted {
                booking,
                notice,
                next_route,
            } => Self {
                submitted: true,
                notice: notice.into(),
                booking_id: Some(booking.booking_id),
                next_route: Some(next_route),
            },
        }
    }
}
