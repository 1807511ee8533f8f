//! Data sources feeding a table.
//!
//! Every source answers the same question, "give me this page", whether it
//! pages on a server or already holds the full dataset in memory. The table
//! only ever consumes a [`PageResult`].

mod local;
mod paged;
mod timeout;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::table::Row;

pub use local::LocalSource;
pub use paged::PagedSource;
pub use timeout::Timeout;

/// How long a fetch may take before it is reported as failed.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(120);

/// A one-based page of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub const fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Zero-based index of the first item on this page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) as usize * self.page_size as usize
    }
}

/// One page of rows plus the server's view of the whole collection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageResult {
    pub items: Vec<Row>,
    pub total_items: u64,
    pub total_pages: u32,
}

impl PageResult {
    pub const fn new(items: Vec<Row>, total_items: u64, total_pages: u32) -> Self {
        Self {
            items,
            total_items,
            total_pages,
        }
    }

    /// A complete dataset served as a single page.
    pub fn single_page(items: Vec<Row>) -> Self {
        let total_items = items.len() as u64;
        Self::new(items, total_items, 1)
    }
}

/// Whether a source pages remotely or holds everything at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    Server,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// A provider of table pages.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch one page.
    ///
    /// # Errors
    /// Returns a [`FetchError`] when the page cannot be produced.
    async fn fetch_page(&self, request: PageRequest) -> Result<PageResult, FetchError>;

    fn mode(&self) -> SourceMode {
        SourceMode::Server
    }
}
