//! Admin data browser.
//!
//! Hosts the six collections behind a tab selector, one [`RecordTable`] for
//! the active tab, the edit modal, delete confirmation, and JSON export and
//! import. All writes go through the [`RecordRepository`].

mod access;
mod edit;

pub use access::*;
pub use edit::*;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use melinh_host::UserProfile;

use crate::export::{self, ExportArtifact, ExportError};
use crate::models::{CollectionKind, Notice, Record};
use crate::repository::{RecordRepository, RepositoryError};
use crate::table::{RecordTable, RowAction, PAGE_SIZE};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this item?";
pub const ACCESS_DENIED_TITLE: &str = "Access denied";
pub const ACCESS_DENIED_MESSAGE: &str = "You do not have permission to access this page.";

/// Admin errors.
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Invalid import file: {0}")]
    InvalidImport(#[from] ExportError),

    #[error("Record {id} not found in {kind}")]
    NotFound { kind: CollectionKind, id: i64 },

    #[error("No record is being edited")]
    NotEditing,

    #[error("Field {0} cannot be edited")]
    ReadOnlyField(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid JSON for field {field}: {reason}")]
    InvalidStructuredInput { field: String, reason: String },
}

impl AdminError {
    /// Alert to show the user for this error.
    pub fn notice(&self) -> Notice {
        match self {
            AdminError::InvalidImport(_) => Notice::error("Error: invalid JSON file!"),
            AdminError::InvalidStructuredInput { field, .. } => {
                Notice::error(format!("Invalid JSON in field \"{}\"", field))
            }
            other => Notice::error(other.to_string()),
        }
    }
}

pub type AdminResult<T> = Result<T, AdminError>;

/// Asks the user to confirm a destructive action.
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirmation for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Pre-answered confirmation (hosts that prompt before calling in).
impl Confirmation for bool {
    fn confirm(&self, _prompt: &str) -> bool {
        *self
    }
}

/// A tab button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub kind: CollectionKind,
    pub label: String,
    pub count: usize,
    pub active: bool,
}

/// Result of entering the admin page.
pub enum AdminView {
    Denied { title: String, message: String },
    Page(AdminBrowser),
}

impl AdminView {
    pub fn is_denied(&self) -> bool {
        matches!(self, AdminView::Denied { .. })
    }

    pub fn into_page(self) -> Option<AdminBrowser> {
        match self {
            AdminView::Page(browser) => Some(browser),
            AdminView::Denied { .. } => None,
        }
    }
}

/// Admin page state.
pub struct AdminBrowser {
    repo: Arc<dyn RecordRepository>,
    active: CollectionKind,
    table: RecordTable,
    edit: EditSession,
    page_size: usize,
}

impl AdminBrowser {
    /// Enter the page as `caller`. Unauthorized callers get the denial screen.
    pub fn enter(
        policy: &dyn AccessPolicy,
        caller: &UserProfile,
        repo: Arc<dyn RecordRepository>,
    ) -> AdminResult<AdminView> {
        if !policy.is_permitted(caller) {
            tracing::warn!(caller = %caller.id, "Admin access denied");
            return Ok(AdminView::Denied {
                title: ACCESS_DENIED_TITLE.to_string(),
                message: ACCESS_DENIED_MESSAGE.to_string(),
            });
        }

        Ok(AdminView::Page(Self::open(repo, PAGE_SIZE)?))
    }

    fn open(repo: Arc<dyn RecordRepository>, page_size: usize) -> AdminResult<Self> {
        let active = CollectionKind::Doctors;
        let table = Self::build_table(repo.as_ref(), active, page_size)?;
        Ok(Self {
            repo,
            active,
            table,
            edit: EditSession::Idle,
            page_size,
        })
    }

    fn build_table(
        repo: &dyn RecordRepository,
        kind: CollectionKind,
        page_size: usize,
    ) -> AdminResult<RecordTable> {
        Ok(RecordTable::new(kind.label(), repo.all(kind)?).with_page_size(page_size))
    }

    /// Use a non-default page size (resets the table).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self.table = self.table.with_page_size(self.page_size);
        self
    }

    /// Tabs in fixed order with record counts.
    pub fn tabs(&self) -> AdminResult<Vec<Tab>> {
        CollectionKind::ALL
            .into_iter()
            .map(|kind| {
                Ok(Tab {
                    kind,
                    label: kind.label().to_string(),
                    count: self.repo.count(kind)?,
                    active: kind == self.active,
                })
            })
            .collect()
    }

    pub fn active(&self) -> CollectionKind {
        self.active
    }

    /// Switch tabs. The table is recreated, so search and page reset.
    pub fn select_tab(&mut self, kind: CollectionKind) -> AdminResult<()> {
        self.table = Self::build_table(self.repo.as_ref(), kind, self.page_size)?;
        self.active = kind;
        tracing::debug!(tab = %kind, "Admin tab selected");
        Ok(())
    }

    pub fn table(&self) -> &RecordTable {
        &self.table
    }

    /// Search and paging controls.
    pub fn table_mut(&mut self) -> &mut RecordTable {
        &mut self.table
    }

    fn reload(&mut self) -> AdminResult<()> {
        let records = self.repo.all(self.active)?;
        self.table.set_records(records);
        Ok(())
    }

    // =========================================================================
    // Edit modal
    // =========================================================================

    pub fn edit_session(&self) -> &EditSession {
        &self.edit
    }

    /// Open the edit modal on a copy of a row on the current page.
    pub fn begin_edit(&mut self, id: i64) -> AdminResult<Vec<FieldView>> {
        let kind = self.active;
        let Some(RowAction::Edit(record)) = self.table.request_edit(id) else {
            return Err(AdminError::NotFound { kind, id });
        };
        self.edit = EditSession::begin(kind, record);
        Ok(self.edit.fields())
    }

    /// Apply one field input to the draft.
    pub fn edit_field(&mut self, name: &str, input: &str) -> AdminResult<()> {
        if !self.edit.is_editing() {
            return Err(AdminError::NotEditing);
        }
        self.edit.apply(name, input).map_err(|e| match e {
            FieldInputError::ReadOnly => AdminError::ReadOnlyField(name.to_string()),
            FieldInputError::UnknownField => AdminError::UnknownField(name.to_string()),
            FieldInputError::InvalidStructured(reason) => AdminError::InvalidStructuredInput {
                field: name.to_string(),
                reason,
            },
        })
    }

    /// Discard the draft.
    pub fn cancel_edit(&mut self) {
        self.edit = EditSession::Idle;
    }

    /// Close the modal if it edits a record of `kind` (with `id`, when given)
    /// that was just removed or replaced.
    fn discard_edit_of(&mut self, kind: CollectionKind, id: Option<i64>) {
        if let EditSession::Editing { kind: editing, draft } = &self.edit {
            if *editing == kind && id.map_or(true, |id| draft.id() == id) {
                tracing::debug!(collection = %kind, id = draft.id(), "Open edit discarded");
                self.edit = EditSession::Idle;
            }
        }
    }

    /// Write the draft back over the existing record. On failure the modal
    /// stays open with the draft; a record removed meanwhile is not recreated.
    pub fn save_edit(&mut self) -> AdminResult<Notice> {
        let EditSession::Editing { kind, draft } = &self.edit else {
            return Err(AdminError::NotEditing);
        };
        let (kind, draft) = (*kind, draft.clone());
        let id = draft.id();

        if self.repo.get(kind, id)?.is_none() {
            return Err(AdminError::NotFound { kind, id });
        }

        self.repo.upsert(kind, draft)?;
        tracing::info!(collection = %kind, id, "Admin record saved");

        self.edit = EditSession::Idle;
        if kind == self.active {
            self.reload()?;
        }
        Ok(Notice::success("Saved"))
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Delete a row on the current page after confirmation.
    /// Returns `None` when the user declined.
    pub fn delete(&mut self, id: i64, confirmation: &dyn Confirmation) -> AdminResult<Option<Notice>> {
        let kind = self.active;
        let Some(RowAction::Delete(id)) = self.table.request_delete(id) else {
            return Err(AdminError::NotFound { kind, id });
        };
        if !confirmation.confirm(DELETE_PROMPT) {
            return Ok(None);
        }

        if !self.repo.delete(kind, id)? {
            return Err(AdminError::NotFound { kind, id });
        }
        tracing::info!(collection = %kind, id, "Admin record deleted");
        self.discard_edit_of(kind, Some(id));

        self.reload()?;
        Ok(Some(Notice::success("Deleted")))
    }

    // =========================================================================
    // Export / import
    // =========================================================================

    /// The whole active collection as `<label>.json`.
    pub fn export_active(&self) -> AdminResult<ExportArtifact> {
        let records = self.repo.all(self.active)?;
        Ok(export::export_json(self.active, &records)?)
    }

    /// The whole active collection as `<label>.csv`.
    pub fn export_active_csv(&self) -> AdminResult<ExportArtifact> {
        let records = self.repo.all(self.active)?;
        Ok(export::export_csv(self.active, &records))
    }

    /// Replace the active collection with the contents of an import file.
    /// Nothing changes unless the whole file is valid.
    pub fn import_active(&mut self, contents: &str) -> AdminResult<Notice> {
        let records: Vec<Record> = export::parse_import(contents)?;
        let count = records.len();

        self.repo.replace_all(self.active, records)?;
        tracing::info!(collection = %self.active, count, "Admin collection imported");
        self.discard_edit_of(self.active, None);

        self.reload()?;
        Ok(Notice::success("Data imported successfully!"))
    }
}
