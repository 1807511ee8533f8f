//! Server-driven pagination with stale response protection.
//!
//! Every request is tagged with a fresh [`FetchToken`]. Responses arrive in
//! any order; only the one carrying the most recently issued token is
//! applied, everything older is dropped.

use std::fmt;

use tracing::debug;

use crate::source::{FetchError, PageRequest, PageResult};
use crate::table::Row;
use crate::table::error::TableError;

/// Monotonically increasing tag of an issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchToken(u64);

impl fmt::Display for FetchToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A fetch the caller must hand to the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub token: FetchToken,
    pub request: PageRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Error(String),
}

/// What happened to a response handed back to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Stale,
}

impl Applied {
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

#[derive(Debug, Clone)]
pub struct Pagination {
    state: LoadState,
    current_page: u32,
    page_size: u32,
    total_items: u64,
    total_pages: u32,
    items: Vec<Row>,
    issued: u64,
    pending: Option<FetchRequest>,
    has_result: bool,
}

impl Pagination {
    /// # Errors
    /// Fails when `page_size` is zero.
    pub fn new(page_size: u32) -> Result<Self, TableError> {
        if page_size == 0 {
            return Err(TableError::InvalidPageSize(page_size));
        }
        Ok(Self {
            state: LoadState::Idle,
            current_page: 1,
            page_size,
            total_items: 0,
            total_pages: 1,
            items: Vec::new(),
            issued: 0,
            pending: None,
            has_result: false,
        })
    }

    /// Request page `page` at the current size.
    ///
    /// Pages past the last known `total_pages` are still requested; the
    /// server decides what they contain. `current_page` keeps describing the
    /// loaded items until the response lands.
    ///
    /// # Errors
    /// Fails when `page` is zero.
    pub fn set_page(&mut self, page: u32) -> Result<FetchRequest, TableError> {
        if page == 0 {
            return Err(TableError::InvalidPage(page));
        }
        Ok(self.issue(PageRequest::new(page, self.page_size)))
    }

    /// Change the page size and go back to page 1.
    ///
    /// # Errors
    /// Fails when `page_size` is zero.
    pub fn set_page_size(&mut self, page_size: u32) -> Result<FetchRequest, TableError> {
        if page_size == 0 {
            return Err(TableError::InvalidPageSize(page_size));
        }
        self.page_size = page_size;
        Ok(self.restart())
    }

    /// Request page 1 at the current size.
    pub fn restart(&mut self) -> FetchRequest {
        self.current_page = 1;
        self.issue(PageRequest::new(1, self.page_size))
    }

    /// Re-request whatever page is currently shown.
    pub fn reload(&mut self) -> FetchRequest {
        self.issue(PageRequest::new(self.current_page, self.page_size))
    }

    fn issue(&mut self, request: PageRequest) -> FetchRequest {
        self.issued += 1;
        let fetch = FetchRequest {
            token: FetchToken(self.issued),
            request,
        };
        self.pending = Some(fetch);
        self.state = LoadState::Loading;
        debug!(token = %fetch.token, page = request.page, page_size = request.page_size, "Issued fetch");
        fetch
    }

    fn is_latest(&self, token: FetchToken) -> bool {
        token.0 == self.issued
    }

    /// Apply a successful response if it answers the latest request.
    pub fn on_success(&mut self, token: FetchToken, result: PageResult) -> Applied {
        if !self.is_latest(token) {
            debug!(%token, latest = self.issued, "Discarded stale page");
            return Applied::Stale;
        }
        let requested = self.pending.take().map_or(self.current_page, |p| p.request.page);

        self.total_pages = result.total_pages.max(1);
        self.total_items = result.total_items;
        self.items = result.items;
        self.current_page = requested.clamp(1, self.total_pages);
        self.has_result = true;
        self.state = LoadState::Loaded;
        debug!(
            %token,
            page = self.current_page,
            total_pages = self.total_pages,
            rows = self.items.len(),
            "Applied page"
        );
        Applied::Applied
    }

    /// Record a failure if it answers the latest request. Loaded rows stay.
    pub fn on_failure(&mut self, token: FetchToken, error: &FetchError) -> Applied {
        if !self.is_latest(token) {
            debug!(%token, latest = self.issued, "Discarded stale failure");
            return Applied::Stale;
        }
        self.pending = None;
        self.state = LoadState::Error(error.to_string());
        Applied::Applied
    }

    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn items(&self) -> &[Row] {
        &self.items
    }

    pub const fn has_result(&self) -> bool {
        self.has_result
    }

    /// The page being loaded, or the shown one when nothing is in flight.
    pub fn target_page(&self) -> u32 {
        self.pending.map_or(self.current_page, |p| p.request.page)
    }

    /// The fetch still awaiting its response, if any.
    pub const fn pending(&self) -> Option<FetchRequest> {
        self.pending
    }

    /// Whether page controls should accept input.
    pub fn controls_enabled(&self) -> bool {
        self.has_result && !matches!(self.state, LoadState::Error(_)) && self.total_items > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn rows(range: std::ops::Range<u32>) -> Vec<Row> {
        range
            .map(|i| Row::try_from(json!({ "id": i })).unwrap())
            .collect()
    }

    /// Fake server: computes totals the way a real API would.
    fn page_of(total: u32, request: PageRequest) -> PageResult {
        let start = (request.page - 1) * request.page_size;
        let end = (start + request.page_size).min(total);
        let total_pages = total.div_ceil(request.page_size).max(1);
        PageResult::new(rows(start.min(end)..end), u64::from(total), total_pages)
    }

    #[test]
    fn test_initial_state() {
        let p = Pagination::new(10).unwrap();
        assert_eq!(p.state(), &LoadState::Idle);
        assert_eq!(p.current_page(), 1);
        assert!(!p.controls_enabled());
        assert!(Pagination::new(0).is_err());
    }

    #[test]
    fn test_first_page_of_95() {
        let mut p = Pagination::new(10).unwrap();
        let fetch = p.set_page(1).unwrap();
        assert_eq!(p.state(), &LoadState::Loading);

        p.on_success(fetch.token, page_of(95, fetch.request));
        assert_eq!(p.state(), &LoadState::Loaded);
        assert_eq!(p.items().len(), 10);
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.total_pages(), 10);
        assert_eq!(p.total_items(), 95);
        assert!(p.controls_enabled());
    }

    #[test]
    fn test_total_pages_taken_from_response() {
        let mut p = Pagination::new(10).unwrap();
        let fetch = p.set_page(1).unwrap();
        // Deliberately inconsistent with ceil(95 / 10).
        p.on_success(fetch.token, PageResult::new(rows(0..10), 95, 42));
        assert_eq!(p.total_pages(), 42);
    }

    #[test]
    fn test_page_size_change_resets_to_first_page() {
        let mut p = Pagination::new(10).unwrap();
        let fetch = p.set_page(5).unwrap();
        p.on_success(fetch.token, page_of(95, fetch.request));
        assert_eq!(p.current_page(), 5);

        let fetch = p.set_page_size(25).unwrap();
        assert_eq!(p.current_page(), 1);
        assert_eq!(fetch.request, PageRequest::new(1, 25));

        p.on_success(fetch.token, page_of(95, fetch.request));
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.total_pages(), 4);
        assert!(p.set_page_size(0).is_err());
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut p = Pagination::new(10).unwrap();
        let page2 = p.set_page(2).unwrap();
        let page3 = p.set_page(3).unwrap();
        assert!(page3.token > page2.token);

        let newer = page_of(95, page3.request);
        assert!(p.on_success(page3.token, newer.clone()).is_applied());
        assert_eq!(
            p.on_success(page2.token, page_of(95, page2.request)),
            Applied::Stale
        );

        assert_eq!(p.current_page(), 3);
        assert_eq!(p.items(), newer.items.as_slice());
    }

    #[test]
    fn test_stale_failure_discarded() {
        let mut p = Pagination::new(10).unwrap();
        let old = p.set_page(1).unwrap();
        let new = p.set_page(2).unwrap();
        p.on_success(new.token, page_of(30, new.request));

        let applied = p.on_failure(old.token, &FetchError::Network("reset".into()));
        assert_eq!(applied, Applied::Stale);
        assert_eq!(p.state(), &LoadState::Loaded);
    }

    #[test]
    fn test_failure_keeps_rows_and_recovers() {
        let mut p = Pagination::new(10).unwrap();
        let fetch = p.set_page(1).unwrap();
        p.on_success(fetch.token, page_of(95, fetch.request));
        let shown = p.items().to_vec();

        let fetch = p.set_page(2).unwrap();
        p.on_failure(fetch.token, &FetchError::Timeout(Duration::from_secs(120)));
        assert_eq!(
            p.state(),
            &LoadState::Error("request timed out after 120s".to_string())
        );
        assert_eq!(p.items(), shown.as_slice());
        assert!(!p.controls_enabled());

        let fetch = p.set_page(1).unwrap();
        p.on_success(fetch.token, page_of(95, fetch.request));
        assert_eq!(p.state(), &LoadState::Loaded);
        assert!(p.controls_enabled());
    }

    #[test]
    fn test_page_beyond_known_total_still_requested() {
        let mut p = Pagination::new(10).unwrap();
        let fetch = p.set_page(1).unwrap();
        p.on_success(fetch.token, page_of(25, fetch.request));

        let fetch = p.set_page(9).unwrap();
        assert_eq!(fetch.request.page, 9);
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.target_page(), 9);

        p.on_success(fetch.token, page_of(25, fetch.request));
        assert_eq!(p.current_page(), 3);
        assert!(p.items().is_empty());
    }

    #[test]
    fn test_page_moves_only_when_response_applied() {
        let mut p = Pagination::new(10).unwrap();
        let fetch = p.set_page(1).unwrap();
        p.on_success(fetch.token, page_of(95, fetch.request));
        let shown = p.items().to_vec();

        let fetch = p.set_page(2).unwrap();
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.items(), shown.as_slice());

        p.on_failure(fetch.token, &FetchError::Network("down".into()));
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.target_page(), 1);
        assert_eq!(p.items(), shown.as_slice());
        assert_eq!(p.reload().request, PageRequest::new(1, 10));
    }

    #[test]
    fn test_current_page_stays_one_before_first_response() {
        let mut p = Pagination::new(10).unwrap();
        p.set_page(4).unwrap();
        assert_eq!(p.current_page(), 1);
        assert!(p.set_page(0).is_err());
    }

    #[test]
    fn test_empty_result_disables_controls() {
        let mut p = Pagination::new(10).unwrap();
        let fetch = p.set_page(1).unwrap();
        p.on_success(fetch.token, PageResult::new(vec![], 0, 1));
        assert_eq!(p.state(), &LoadState::Loaded);
        assert!(!p.controls_enabled());
    }

    #[test]
    fn test_reload_requests_current_page() {
        let mut p = Pagination::new(10).unwrap();
        let fetch = p.set_page(2).unwrap();
        p.on_success(fetch.token, page_of(95, fetch.request));

        let reload = p.reload();
        assert_eq!(reload.request, PageRequest::new(2, 10));
        assert_eq!(p.pending(), Some(reload));
    }
}
