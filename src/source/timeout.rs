use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::source::{DataSource, FetchError, PageRequest, PageResult, SourceMode};

/// Bounds every fetch of the wrapped source by a deadline.
#[derive(Debug, Clone)]
pub struct Timeout<S> {
    inner: S,
    limit: Duration,
}

impl<S> Timeout<S> {
    pub const fn new(inner: S, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl<S: DataSource> DataSource for Timeout<S> {
    async fn fetch_page(&self, request: PageRequest) -> Result<PageResult, FetchError> {
        match tokio::time::timeout(self.limit, self.inner.fetch_page(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(page = request.page, limit = ?self.limit, "Fetch timed out");
                Err(FetchError::Timeout(self.limit))
            }
        }
    }

    fn mode(&self) -> SourceMode {
        self.inner.mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{LocalSource, PagedSource};

    #[tokio::test]
    async fn test_slow_source_times_out() {
        let slow = PagedSource::new(vec![]).with_latency(Duration::from_millis(200));
        let source = Timeout::new(slow, Duration::from_millis(10));

        let err = source
            .fetch_page(PageRequest::new(1, 10))
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::Timeout(Duration::from_millis(10)));
    }

    #[tokio::test]
    async fn test_fast_source_passes_through() {
        let source = Timeout::new(LocalSource::new(vec![]), Duration::from_secs(1));
        let result = source.fetch_page(PageRequest::new(1, 10)).await.unwrap();
        assert_eq!(result.total_pages, 1);
        assert_eq!(source.mode(), SourceMode::Local);
    }
}
