//! Generic record table: search, pagination, column derivation and row actions.
//!
//! The table owns only disposable view state (search term, current page). It
//! never mutates records; edits and deletes leave as [`RowAction`]s for the
//! caller to apply.

mod render;

pub use render::*;

use serde::{Deserialize, Serialize};

use crate::models::Record;

/// Rows per page.
pub const PAGE_SIZE: usize = 10;

/// How the header row is derived from the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnPolicy {
    /// Field names of the first record only
    FirstRecord,
    /// Union of all field names, in first-seen order
    #[default]
    Union,
}

/// A user intent surfaced by a row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowAction {
    Edit(Record),
    Delete(i64),
}

/// Whether `record` matches the search query (case-insensitive substring of
/// any field's textual rendering). The empty query matches everything.
pub fn matches(record: &Record, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    record
        .fields()
        .any(|(_, value)| text_of(value).to_lowercase().contains(&needle))
}

/// Records matching `query`, in original order.
pub fn filter_records<'a>(records: &'a [Record], query: &str) -> Vec<&'a Record> {
    records.iter().filter(|r| matches(r, query)).collect()
}

/// Page count for `matched` items, never less than one.
pub fn total_pages(matched: usize, page_size: usize) -> usize {
    matched.div_ceil(page_size.max(1)).max(1)
}

/// The items shown on a 1-based `page`; empty outside the valid range.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page > total_pages(items.len(), page_size) {
        return &[];
    }
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    &items[start.min(end)..end]
}

/// Header row for a set of records.
pub fn derive_columns(records: &[Record], policy: ColumnPolicy) -> Vec<String> {
    match policy {
        ColumnPolicy::FirstRecord => records
            .first()
            .map(|r| r.field_names().map(str::to_string).collect())
            .unwrap_or_default(),
        ColumnPolicy::Union => {
            let mut columns: Vec<String> = Vec::new();
            for record in records {
                for name in record.field_names() {
                    if !columns.iter().any(|c| c == name) {
                        columns.push(name.to_string());
                    }
                }
            }
            columns
        }
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub id: i64,
    pub cells: Vec<Cell>,
}

/// Everything a host needs to draw the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePage {
    pub title: String,
    pub search: String,
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
    /// Matched-record badge
    pub matched: usize,
    pub page: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Searchable, paginated view over one collection.
#[derive(Debug, Clone)]
pub struct RecordTable {
    title: String,
    records: Vec<Record>,
    columns: Vec<String>,
    policy: ColumnPolicy,
    page_size: usize,
    search: String,
    // indices into `records`
    matched: Vec<usize>,
    page: usize,
}

impl RecordTable {
    /// Create a table with default page size and union columns.
    pub fn new(title: impl Into<String>, records: Vec<Record>) -> Self {
        let mut table = Self {
            title: title.into(),
            records: Vec::new(),
            columns: Vec::new(),
            policy: ColumnPolicy::default(),
            page_size: PAGE_SIZE,
            search: String::new(),
            matched: Vec::new(),
            page: 1,
        };
        table.set_records(records);
        table
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self.page = 1;
        self
    }

    pub fn with_column_policy(mut self, policy: ColumnPolicy) -> Self {
        self.policy = policy;
        self.columns = derive_columns(&self.records, policy);
        self
    }

    /// Swap in fresh records (after a save, delete or import). The search term
    /// is kept; the page is clamped to the new range.
    pub fn set_records(&mut self, records: Vec<Record>) {
        self.columns = derive_columns(&records, self.policy);
        self.records = records;
        self.refilter();
        self.page = self.page.clamp(1, self.total_pages());
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Change the search term. A changed term resets the view to page 1.
    pub fn set_search(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.search {
            return;
        }
        self.search = query;
        self.refilter();
        self.page = 1;
    }

    fn refilter(&mut self) {
        self.matched = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| matches(r, &self.search))
            .map(|(i, _)| i)
            .collect();
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of records matching the search.
    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    /// Matching records, original order.
    pub fn filtered(&self) -> Vec<&Record> {
        self.matched.iter().map(|&i| &self.records[i]).collect()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.matched.len(), self.page_size)
    }

    /// Current 1-based page.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Advance one page. No-op (returns false) on the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page += 1;
        true
    }

    /// Go back one page. No-op (returns false) on the first page.
    pub fn prev_page(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Jump to a page. Out-of-range pages are ignored.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page == 0 || page > self.total_pages() {
            return false;
        }
        self.page = page;
        true
    }

    /// Records of an arbitrary page; empty outside `[1, total_pages]`.
    pub fn slice_for(&self, page: usize) -> Vec<&Record> {
        page_slice(&self.matched, page, self.page_size)
            .iter()
            .map(|&i| &self.records[i])
            .collect()
    }

    /// Records on the current page.
    pub fn visible(&self) -> Vec<&Record> {
        self.slice_for(self.page)
    }

    /// Rendered rows of the current page.
    pub fn rows(&self) -> Vec<TableRow> {
        self.visible()
            .into_iter()
            .map(|record| TableRow {
                id: record.id(),
                cells: self
                    .columns
                    .iter()
                    .map(|column| render_cell(column, record.get(column)))
                    .collect(),
            })
            .collect()
    }

    /// Full snapshot of the current view.
    pub fn snapshot(&self) -> TablePage {
        TablePage {
            title: self.title.clone(),
            search: self.search.clone(),
            columns: self.columns.clone(),
            rows: self.rows(),
            matched: self.matched_count(),
            page: self.page,
            total_pages: self.total_pages(),
            has_prev: self.has_prev(),
            has_next: self.has_next(),
        }
    }

    /// Edit intent for a row on the current page.
    pub fn request_edit(&self, id: i64) -> Option<RowAction> {
        self.visible()
            .into_iter()
            .find(|r| r.id() == id)
            .map(|r| RowAction::Edit(r.clone()))
    }

    /// Delete intent for a row on the current page.
    pub fn request_delete(&self, id: i64) -> Option<RowAction> {
        self.visible()
            .into_iter()
            .find(|r| r.id() == id)
            .map(|r| RowAction::Delete(r.id()))
    }
}
