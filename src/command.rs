//! Async command pattern for side effects.
//!
//! Commands represent async operations that run outside the main event loop.
//! Screens return commands, and the App spawns them. Results travel back to
//! the screen through its message channel.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::source::{DataSource, FetchError, PageResult};
use crate::table::{Applied, FetchRequest, FetchToken, TableController};

/// Async command that performs side effects.
#[async_trait]
pub trait Command: Send + 'static {
    /// Human-readable name for logs and status display.
    fn name(&self) -> String;

    /// Execute the command.
    async fn execute(self: Box<Self>) -> color_eyre::Result<()>;
}

/// Result of one page fetch, tagged with the token it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Loaded { token: FetchToken, result: PageResult },
    Failed { token: FetchToken, error: FetchError },
}

impl FetchOutcome {
    pub const fn token(&self) -> FetchToken {
        match self {
            Self::Loaded { token, .. } | Self::Failed { token, .. } => *token,
        }
    }

    /// Feed this outcome into `table`.
    pub fn apply(self, table: &mut TableController) -> Applied {
        match self {
            Self::Loaded { token, result } => table.on_adapter_success(token, result),
            Self::Failed { token, error } => table.on_adapter_failure(token, &error),
        }
    }
}

/// Fetch one page from a data source and report back.
///
/// Cancelling the token drops the fetch without reporting. That is only an
/// optimisation: a late report would be discarded as stale anyway.
pub struct FetchPageCmd<M> {
    source: Arc<dyn DataSource>,
    fetch: FetchRequest,
    cancel: CancellationToken,
    tx: UnboundedSender<M>,
}

impl<M> FetchPageCmd<M> {
    pub fn new(
        source: Arc<dyn DataSource>,
        fetch: FetchRequest,
        cancel: CancellationToken,
        tx: UnboundedSender<M>,
    ) -> Self {
        Self {
            source,
            fetch,
            cancel,
            tx,
        }
    }
}

#[async_trait]
impl<M> Command for FetchPageCmd<M>
where
    M: From<FetchOutcome> + Send + 'static,
{
    fn name(&self) -> String {
        format!(
            "Loading page {} ({} per page)",
            self.fetch.request.page, self.fetch.request.page_size
        )
    }

    async fn execute(self: Box<Self>) -> color_eyre::Result<()> {
        let FetchRequest { token, request } = self.fetch;
        let outcome = tokio::select! {
            () = self.cancel.cancelled() => {
                debug!(%token, "Fetch superseded before completion");
                return Ok(());
            }
            result = self.source.fetch_page(request) => match result {
                Ok(result) => FetchOutcome::Loaded { token, result },
                Err(error) => FetchOutcome::Failed { token, error },
            },
        };
        // The screen may already be gone; nothing left to update then.
        let _ = self.tx.send(outcome.into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{PagedSource, Timeout};
    use crate::table::{ColumnDescriptor, Row, ViewStatus};
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn rows(n: u32) -> Vec<Row> {
        (0..n)
            .map(|i| Row::try_from(json!({ "id": i, "name": format!("Color {i}") })).unwrap())
            .collect()
    }

    fn table() -> TableController {
        TableController::builder()
            .column(ColumnDescriptor::new("name", "Name"))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_reports_outcome() {
        let source: Arc<dyn DataSource> = Arc::new(PagedSource::new(rows(95)));
        let (tx, mut rx) = mpsc::unbounded_channel::<FetchOutcome>();
        let mut table = table();
        let fetch = table.start();

        let cmd = FetchPageCmd::new(source, fetch, CancellationToken::new(), tx);
        assert_eq!(cmd.name(), "Loading page 1 (10 per page)");
        Box::new(cmd).execute().await.unwrap();

        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.token(), fetch.token);
        assert!(outcome.apply(&mut table).is_applied());
        assert_eq!(table.view_model().pagination.total_pages, 10);
    }

    #[tokio::test]
    async fn test_slow_response_arriving_last_is_ignored() {
        let slow: Arc<dyn DataSource> =
            Arc::new(PagedSource::new(rows(95)).with_latency(Duration::from_millis(80)));
        let fast: Arc<dyn DataSource> = Arc::new(PagedSource::new(rows(95)));
        let (tx, mut rx) = mpsc::unbounded_channel::<FetchOutcome>();
        let mut table = table();

        let page2 = table.set_page(2).unwrap();
        let page3 = table.set_page(3).unwrap();
        let slow_task = tokio::spawn(
            Box::new(FetchPageCmd::new(slow, page2, CancellationToken::new(), tx.clone())).execute(),
        );
        let fast_task = tokio::spawn(
            Box::new(FetchPageCmd::new(fast, page3, CancellationToken::new(), tx)).execute(),
        );
        fast_task.await.unwrap().unwrap();
        slow_task.await.unwrap().unwrap();

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.token(), page3.token);
        assert!(first.apply(&mut table).is_applied());
        assert_eq!(second.apply(&mut table), Applied::Stale);

        let view = table.view_model();
        assert_eq!(view.pagination.current_page, 3);
        assert_eq!(view.rows[0].row.get("id"), Some(&json!(20)));
    }

    #[tokio::test]
    async fn test_cancelled_fetch_reports_nothing() {
        let slow: Arc<dyn DataSource> =
            Arc::new(PagedSource::new(rows(5)).with_latency(Duration::from_secs(5)));
        let (tx, mut rx) = mpsc::unbounded_channel::<FetchOutcome>();
        let mut table = table();
        let cancel = CancellationToken::new();

        let task = tokio::spawn(
            Box::new(FetchPageCmd::new(slow, table.start(), cancel.clone(), tx)).execute(),
        );
        cancel.cancel();
        task.await.unwrap().unwrap();

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_timeout_surfaces_as_error_state() {
        let source: Arc<dyn DataSource> = Arc::new(Timeout::new(
            PagedSource::new(rows(5)).with_latency(Duration::from_millis(200)),
            Duration::from_millis(10),
        ));
        let (tx, mut rx) = mpsc::unbounded_channel::<FetchOutcome>();
        let mut table = table();

        Box::new(FetchPageCmd::new(source, table.start(), CancellationToken::new(), tx))
            .execute()
            .await
            .unwrap();
        rx.recv().await.unwrap().apply(&mut table);

        assert!(matches!(table.status(), ViewStatus::Error(_)));
    }
}
