use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::source::{DataSource, FetchError, PageRequest, PageResult};
use crate::table::Row;

/// Pages an in-memory dataset the way the master-data API does.
///
/// Used for collections the console treats as server-paginated. Each call
/// slices the requested window and reports totals, optionally after a fixed
/// delay so responses behave like network round trips.
#[derive(Debug, Clone, Default)]
pub struct PagedSource {
    rows: Arc<Vec<Row>>,
    latency: Duration,
}

impl PagedSource {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: Arc::new(rows),
            latency: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn page(&self, request: PageRequest) -> Result<PageResult, FetchError> {
        if request.page == 0 || request.page_size == 0 {
            return Err(FetchError::Server {
                status: 400,
                message: format!(
                    "invalid page request (page {}, size {})",
                    request.page, request.page_size
                ),
            });
        }

        let total = self.rows.len();
        let size = request.page_size as usize;
        let total_pages = u32::try_from(total.div_ceil(size).max(1)).unwrap_or(u32::MAX);
        let start = request.offset().min(total);
        let end = start.saturating_add(size).min(total);

        Ok(PageResult::new(
            self.rows[start..end].to_vec(),
            total as u64,
            total_pages,
        ))
    }
}

#[async_trait]
impl DataSource for PagedSource {
    async fn fetch_page(&self, request: PageRequest) -> Result<PageResult, FetchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let result = self.page(request);
        debug!(
            page = request.page,
            page_size = request.page_size,
            ok = result.is_ok(),
            "Served page"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(n: usize) -> PagedSource {
        PagedSource::new(
            (0..n)
                .map(|i| Row::try_from(json!({ "id": i })).unwrap())
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_pages_are_sliced() {
        let source = source(95);

        let first = source.fetch_page(PageRequest::new(1, 10)).await.unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total_items, 95);
        assert_eq!(first.total_pages, 10);

        let last = source.fetch_page(PageRequest::new(10, 10)).await.unwrap();
        assert_eq!(last.items.len(), 5);
        assert_eq!(last.items[0].get("id"), Some(&json!(90)));
    }

    #[tokio::test]
    async fn test_page_past_end_is_empty() {
        let result = source(5).fetch_page(PageRequest::new(4, 10)).await.unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.total_pages, 1);
    }

    #[tokio::test]
    async fn test_empty_collection_has_one_page() {
        let result = source(0).fetch_page(PageRequest::new(1, 10)).await.unwrap();
        assert_eq!(result, PageResult::new(vec![], 0, 1));
    }

    #[tokio::test]
    async fn test_zero_page_rejected() {
        let err = source(3)
            .fetch_page(PageRequest::new(0, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Server { status: 400, .. }));
    }
}
