//! The generic list controller behind every master-data screen.
//!
//! A [`TableController`] owns pagination, the search query and the row
//! actions of one screen. It never performs I/O: page changes hand back a
//! [`FetchRequest`] for the caller to run against its data source, and the
//! outcome is fed back through [`TableController::on_adapter_success`] or
//! [`TableController::on_adapter_failure`]. Renderers read a [`ViewModel`].

use tracing::warn;

use crate::source::{FetchError, PageResult};
use crate::table::action::{RowActionKind, RowActions, RowHandler};
use crate::table::column::{CellValue, ColumnDescriptor, ColumnRegistry};
use crate::table::error::{ConfigError, TableError};
use crate::table::filter::{SearchFields, matching_indices};
use crate::table::pagination::{Applied, FetchRequest, FetchToken, LoadState, Pagination};
use crate::table::row::Row;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Assembles a [`TableController`], checking its configuration up front.
pub struct TableBuilder {
    columns: Vec<ColumnDescriptor>,
    search: Option<SearchFields>,
    offered: Vec<RowActionKind>,
    handlers: Vec<(RowActionKind, RowHandler)>,
    page_size: u32,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            search: None,
            offered: Vec::new(),
            handlers: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl TableBuilder {
    #[must_use]
    pub fn column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    #[must_use]
    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnDescriptor>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// Fields the search query is matched against. Defaults to the column keys.
    #[must_use]
    pub fn search_fields(mut self, fields: SearchFields) -> Self {
        self.search = Some(fields);
        self
    }

    /// Declare an action the screen offers. Each one needs a handler.
    #[must_use]
    pub fn offer(mut self, kind: RowActionKind) -> Self {
        if !self.offered.contains(&kind) {
            self.offered.push(kind);
        }
        self
    }

    /// Attach the handler for `kind`. Registering a handler offers the action.
    #[must_use]
    pub fn on_action<F>(mut self, kind: RowActionKind, handler: F) -> Self
    where
        F: FnMut(&Row) + Send + 'static,
    {
        self.handlers.push((kind, Box::new(handler)));
        self.offer(kind)
    }

    #[must_use]
    pub const fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// # Errors
    /// Returns a [`ConfigError`] for duplicate or missing columns, offered
    /// actions without a handler, repeated handlers or a zero page size.
    pub fn build(self) -> Result<TableController, ConfigError> {
        let columns = ColumnRegistry::new(self.columns)?;
        let search = self
            .search
            .unwrap_or_else(|| SearchFields::new(columns.keys()));

        let mut actions = RowActions::new();
        for (kind, handler) in self.handlers {
            actions.register(kind, handler)?;
        }
        if let Some(kind) = self.offered.iter().find(|kind| !actions.offers(**kind)) {
            return Err(ConfigError::MissingHandler(*kind));
        }
        // Offer order follows the declaration order, not handler order.
        let offered = self.offered;

        let pagination =
            Pagination::new(self.page_size).map_err(|_| ConfigError::InvalidPageSize)?;

        Ok(TableController {
            columns,
            search,
            actions,
            offered,
            pagination,
            query: String::new(),
            visible: Vec::new(),
        })
    }
}

/// Overall state of the table as a renderer should present it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    Idle,
    Loading,
    Ready,
    /// A successful response with no rows at all.
    Empty,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationView {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub page_size: u32,
    pub controls_enabled: bool,
}

/// One visible row paired with its cells, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView<'a> {
    /// Position of the row within the loaded page.
    pub index: usize,
    pub row: &'a Row,
    pub cells: Vec<CellValue>,
}

/// Read-only snapshot for renderers.
#[derive(Debug, Clone)]
pub struct ViewModel<'a> {
    pub columns: &'a ColumnRegistry,
    pub rows: Vec<RowView<'a>>,
    pub pagination: PaginationView,
    pub actions: &'a [RowActionKind],
    pub status: ViewStatus,
    pub query: &'a str,
    /// Rows on the loaded page before filtering.
    pub loaded: usize,
}

impl ViewModel<'_> {
    pub fn is_filtered(&self) -> bool {
        !self.query.trim().is_empty()
    }
}

#[derive(Debug)]
pub struct TableController {
    columns: ColumnRegistry,
    search: SearchFields,
    actions: RowActions,
    offered: Vec<RowActionKind>,
    pagination: Pagination,
    query: String,
    visible: Vec<usize>,
}

impl TableController {
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    /// Request the first page.
    pub fn start(&mut self) -> FetchRequest {
        self.pagination.restart()
    }

    /// # Errors
    /// Fails when `page` is zero.
    pub fn set_page(&mut self, page: u32) -> Result<FetchRequest, TableError> {
        self.pagination.set_page(page)
    }

    /// # Errors
    /// Fails when `page_size` is zero.
    pub fn set_page_size(&mut self, page_size: u32) -> Result<FetchRequest, TableError> {
        self.pagination.set_page_size(page_size)
    }

    pub fn reload(&mut self) -> FetchRequest {
        self.pagination.reload()
    }

    /// Step forward from the page being loaded, so repeated presses advance
    /// before the previous response lands.
    pub fn next_page(&mut self) -> Option<FetchRequest> {
        let target = self.pagination.target_page();
        (self.pagination.controls_enabled() && target < self.pagination.total_pages())
            .then(|| self.pagination.set_page(target + 1).ok())
            .flatten()
    }

    pub fn previous_page(&mut self) -> Option<FetchRequest> {
        let target = self.pagination.target_page();
        (self.pagination.controls_enabled() && target > 1)
            .then(|| self.pagination.set_page(target - 1).ok())
            .flatten()
    }

    pub fn first_page(&mut self) -> Option<FetchRequest> {
        (self.pagination.controls_enabled() && self.pagination.target_page() != 1)
            .then(|| self.pagination.set_page(1).ok())
            .flatten()
    }

    pub fn last_page(&mut self) -> Option<FetchRequest> {
        let last = self.pagination.total_pages();
        (self.pagination.controls_enabled() && self.pagination.target_page() != last)
            .then(|| self.pagination.set_page(last).ok())
            .flatten()
    }

    /// Narrow the loaded page to rows matching `query`. Never fetches.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refilter();
    }

    pub fn on_adapter_success(&mut self, token: FetchToken, result: PageResult) -> Applied {
        let applied = self.pagination.on_success(token, result);
        if applied.is_applied() {
            self.refilter();
        }
        applied
    }

    pub fn on_adapter_failure(&mut self, token: FetchToken, error: &FetchError) -> Applied {
        let applied = self.pagination.on_failure(token, error);
        if applied.is_applied() {
            warn!(%token, %error, "Page fetch failed");
        }
        applied
    }

    fn refilter(&mut self) {
        self.visible = matching_indices(self.pagination.items(), &self.query, &self.search);
    }

    /// Run action `kind` against the row shown at `position`.
    ///
    /// # Errors
    /// Fails when the action is not offered or nothing is shown at `position`.
    pub fn invoke(&mut self, kind: RowActionKind, position: usize) -> Result<(), TableError> {
        if !self.offered.contains(&kind) {
            return Err(TableError::ActionNotOffered(kind));
        }
        let index = *self
            .visible
            .get(position)
            .ok_or(TableError::RowOutOfRange(position))?;
        let row = &self.pagination.items()[index];
        self.actions.dispatch(kind, row)
    }

    pub fn visible_row(&self, position: usize) -> Option<&Row> {
        self.visible
            .get(position)
            .and_then(|&i| self.pagination.items().get(i))
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub const fn columns(&self) -> &ColumnRegistry {
        &self.columns
    }

    pub fn offered_actions(&self) -> &[RowActionKind] {
        &self.offered
    }

    pub const fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn status(&self) -> ViewStatus {
        match self.pagination.state() {
            LoadState::Idle => ViewStatus::Idle,
            LoadState::Loading => ViewStatus::Loading,
            LoadState::Error(message) => ViewStatus::Error(message.clone()),
            LoadState::Loaded if self.pagination.total_items() == 0 => ViewStatus::Empty,
            LoadState::Loaded => ViewStatus::Ready,
        }
    }

    pub fn view_model(&self) -> ViewModel<'_> {
        let items = self.pagination.items();
        let rows = self
            .visible
            .iter()
            .map(|&index| RowView {
                index,
                row: &items[index],
                cells: self.columns.render_row(&items[index]),
            })
            .collect();

        ViewModel {
            columns: &self.columns,
            rows,
            pagination: PaginationView {
                current_page: self.pagination.current_page(),
                total_pages: self.pagination.total_pages(),
                total_items: self.pagination.total_items(),
                page_size: self.pagination.page_size(),
                controls_enabled: self.pagination.controls_enabled(),
            },
            actions: &self.offered,
            status: self.status(),
            query: &self.query,
            loaded: items.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::PageRequest;
    use crate::table::column::Tone;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const DEPARTMENTS: [&str; 5] = [
        "Cardiology",
        "Hematology",
        "Microbiology",
        "Cardiology",
        "Biochemistry",
    ];

    fn instrument(i: u32) -> Row {
        Row::try_from(json!({
            "id": i,
            "name": format!("Instrument {i}"),
            "isactive": i % 2 == 0,
            "department": { "name": DEPARTMENTS[i as usize % DEPARTMENTS.len()] },
        }))
        .unwrap()
    }

    /// Fake server that computes its own totals.
    fn serve(total: u32, request: PageRequest) -> PageResult {
        let start = ((request.page - 1) * request.page_size).min(total);
        let end = (start + request.page_size).min(total);
        PageResult::new(
            (start..end).map(instrument).collect(),
            u64::from(total),
            total.div_ceil(request.page_size).max(1),
        )
    }

    fn controller() -> TableController {
        TableController::builder()
            .column(ColumnDescriptor::new("name", "Name"))
            .column(ColumnDescriptor::new("department.name", "Department"))
            .column(ColumnDescriptor::status("isactive", "Status"))
            .search_fields(SearchFields::new(["name", "department.name"]))
            .on_action(RowActionKind::Update, |_| {})
            .build()
            .unwrap()
    }

    #[test]
    fn test_first_page_view_model() {
        let mut table = controller();
        assert_eq!(table.status(), ViewStatus::Idle);
        assert!(!table.view_model().pagination.controls_enabled);

        let fetch = table.start();
        assert_eq!(fetch.request, PageRequest::new(1, DEFAULT_PAGE_SIZE));
        assert_eq!(table.status(), ViewStatus::Loading);

        table.on_adapter_success(fetch.token, serve(95, fetch.request));
        let view = table.view_model();
        assert_eq!(view.status, ViewStatus::Ready);
        assert_eq!(view.rows.len(), 10);
        assert_eq!(view.pagination.current_page, 1);
        assert_eq!(view.pagination.total_pages, 10);
        assert_eq!(view.pagination.total_items, 95);
        assert!(view.pagination.controls_enabled);
        assert_eq!(view.rows[0].cells.len(), 3);
        assert_eq!(
            view.rows[0].cells[2],
            CellValue::badge("Active", Tone::Positive)
        );
    }

    #[test]
    fn test_search_filters_loaded_page_only() {
        let mut table = controller();
        let fetch = table.start();
        table.on_adapter_success(fetch.token, serve(95, fetch.request));

        table.set_search_query("cardio");
        let view = table.view_model();
        assert!(view.is_filtered());
        assert_eq!(view.loaded, 10);
        // Ids 0, 3, 5, 8 on page one map to Cardiology.
        let ids: Vec<_> = view.rows.iter().map(|r| r.row.get("id").cloned()).collect();
        assert_eq!(
            ids,
            vec![Some(json!(0)), Some(json!(3)), Some(json!(5)), Some(json!(8))]
        );
        assert_eq!(table.pagination().pending(), None);

        table.set_search_query("");
        assert_eq!(table.view_model().rows.len(), 10);
    }

    #[test]
    fn test_search_survives_page_change() {
        let mut table = controller();
        let fetch = table.start();
        table.on_adapter_success(fetch.token, serve(95, fetch.request));
        table.set_search_query("hema");

        let fetch = table.next_page().unwrap();
        table.on_adapter_success(fetch.token, serve(95, fetch.request));
        let view = table.view_model();
        assert_eq!(view.pagination.current_page, 2);
        assert!(view
            .rows
            .iter()
            .all(|r| r.row.text("department.name").as_deref() == Some("Hematology")));
    }

    #[test]
    fn test_out_of_order_responses() {
        let mut table = controller();
        let first = table.start();
        table.on_adapter_success(first.token, serve(95, first.request));

        let page2 = table.set_page(2).unwrap();
        let page3 = table.set_page(3).unwrap();
        table.on_adapter_success(page3.token, serve(95, page3.request));
        let stale = table.on_adapter_success(page2.token, serve(95, page2.request));

        assert_eq!(stale, Applied::Stale);
        let view = table.view_model();
        assert_eq!(view.pagination.current_page, 3);
        assert_eq!(view.rows[0].row.get("id"), Some(&json!(20)));
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut table = controller();
        let fetch = table.start();
        table.on_adapter_success(fetch.token, serve(95, fetch.request));
        let fetch = table.set_page(5).unwrap();
        table.on_adapter_success(fetch.token, serve(95, fetch.request));
        assert_eq!(table.pagination().current_page(), 5);

        let fetch = table.set_page_size(25).unwrap();
        assert_eq!(table.pagination().current_page(), 1);
        assert_eq!(fetch.request, PageRequest::new(1, 25));
    }

    #[test]
    fn test_empty_result_is_not_error() {
        let mut table = controller();
        let fetch = table.start();
        table.on_adapter_success(fetch.token, PageResult::new(vec![], 0, 1));

        let view = table.view_model();
        assert_eq!(view.status, ViewStatus::Empty);
        assert!(view.rows.is_empty());
        assert!(!view.pagination.controls_enabled);
    }

    #[test]
    fn test_timeout_then_recovery() {
        let mut table = controller();
        let fetch = table.start();
        table.on_adapter_failure(fetch.token, &FetchError::Timeout(Duration::from_secs(120)));

        let view = table.view_model();
        assert_eq!(
            view.status,
            ViewStatus::Error("request timed out after 120s".to_string())
        );
        assert!(!view.pagination.controls_enabled);

        let fetch = table.set_page(1).unwrap();
        table.on_adapter_success(fetch.token, serve(12, fetch.request));
        assert_eq!(table.status(), ViewStatus::Ready);
    }

    #[test]
    fn test_navigation_helpers_respect_bounds() {
        let mut table = controller();
        assert!(table.next_page().is_none());

        let fetch = table.start();
        table.on_adapter_success(fetch.token, serve(25, fetch.request));
        assert!(table.previous_page().is_none());
        assert!(table.first_page().is_none());

        let last = table.last_page().unwrap();
        assert_eq!(last.request.page, 3);
        table.on_adapter_success(last.token, serve(25, last.request));
        assert!(table.next_page().is_none());
        assert!(table.last_page().is_none());
        assert_eq!(table.previous_page().unwrap().request.page, 2);
        assert_eq!(table.first_page().unwrap().request.page, 1);
    }

    #[test]
    fn test_repeated_next_advances_while_loading() {
        let mut table = controller();
        let fetch = table.start();
        table.on_adapter_success(fetch.token, serve(95, fetch.request));

        assert_eq!(table.next_page().unwrap().request.page, 2);
        let third = table.next_page().unwrap();
        assert_eq!(third.request.page, 3);
        assert_eq!(table.view_model().pagination.current_page, 1);

        table.on_adapter_failure(third.token, &FetchError::Network("down".into()));
        let view = table.view_model();
        assert_eq!(view.status, ViewStatus::Error("network error: down".to_string()));
        assert_eq!(view.pagination.current_page, 1);
        assert_eq!(view.rows[0].row.get("id"), Some(&json!(0)));
    }

    #[test]
    fn test_invoke_passes_visible_row() {
        let seen: Arc<Mutex<Vec<Row>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let mut table = TableController::builder()
            .column(ColumnDescriptor::new("name", "Name"))
            .search_fields(SearchFields::new(["department.name"]))
            .on_action(RowActionKind::Details, move |row| {
                sink.lock().unwrap().push(row.clone());
            })
            .build()
            .unwrap();
        let fetch = table.start();
        table.on_adapter_success(fetch.token, serve(10, fetch.request));
        table.set_search_query("micro");

        table.invoke(RowActionKind::Details, 0).unwrap();
        assert_eq!(seen.lock().unwrap().as_slice(), &[instrument(2)]);

        assert_eq!(
            table.invoke(RowActionKind::Update, 0),
            Err(TableError::ActionNotOffered(RowActionKind::Update))
        );
        assert_eq!(
            table.invoke(RowActionKind::Details, 9),
            Err(TableError::RowOutOfRange(9))
        );
    }

    #[test]
    fn test_offered_action_without_handler_rejected() {
        let result = TableController::builder()
            .column(ColumnDescriptor::new("name", "Name"))
            .offer(RowActionKind::Update)
            .offer(RowActionKind::Details)
            .on_action(RowActionKind::Update, |_| {})
            .build();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingHandler(RowActionKind::Details)
        );
    }

    #[test]
    fn test_duplicate_columns_rejected_at_build() {
        let result = TableController::builder()
            .column(ColumnDescriptor::new("name", "Name"))
            .column(ColumnDescriptor::new("name", "Again"))
            .build();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::DuplicateColumn("name".to_string())
        );
    }

    #[test]
    fn test_zero_page_size_rejected_at_build() {
        let result = TableController::builder()
            .column(ColumnDescriptor::new("name", "Name"))
            .page_size(0)
            .build();
        assert_eq!(result.unwrap_err(), ConfigError::InvalidPageSize);
    }

    #[test]
    fn test_search_defaults_to_column_keys() {
        let mut table = TableController::builder()
            .column(ColumnDescriptor::new("name", "Name"))
            .build()
            .unwrap();
        let fetch = table.start();
        table.on_adapter_success(fetch.token, serve(30, fetch.request));

        table.set_search_query("instrument 7");
        assert_eq!(table.visible_len(), 1);
        table.set_search_query("cardiology");
        assert_eq!(table.visible_len(), 0);
        assert!(table.offered_actions().is_empty());
    }
}
