use std::sync::Arc;

use async_trait::async_trait;

use crate::source::{DataSource, FetchError, PageRequest, PageResult, SourceMode};
use crate::table::Row;

/// Serves a complete, static dataset as one page.
///
/// The requested page and size are ignored: the whole set is always
/// returned with `total_pages = 1`, so filtering on top of it covers every
/// record.
#[derive(Debug, Clone, Default)]
pub struct LocalSource {
    rows: Arc<Vec<Row>>,
}

impl LocalSource {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: Arc::new(rows),
        }
    }
}

#[async_trait]
impl DataSource for LocalSource {
    async fn fetch_page(&self, _request: PageRequest) -> Result<PageResult, FetchError> {
        Ok(PageResult::single_page(self.rows.as_ref().clone()))
    }

    fn mode(&self) -> SourceMode {
        SourceMode::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_local_source_returns_everything() {
        let rows: Vec<Row> = (0..30)
            .map(|i| Row::try_from(json!({ "id": i })).unwrap())
            .collect();
        let source = LocalSource::new(rows.clone());

        let result = source.fetch_page(PageRequest::new(2, 10)).await.unwrap();
        assert_eq!(result.items, rows);
        assert_eq!(result.total_items, 30);
        assert_eq!(result.total_pages, 1);
        assert_eq!(source.mode(), SourceMode::Local);
    }
}
