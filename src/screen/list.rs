use std::sync::Arc;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::Theme;
use crate::app::AppMessage;
use crate::command::{Command, FetchOutcome, FetchPageCmd};
use crate::config::{
    GlobalAction, KeyResolver, PageAction, RowKeyAction, SearchAction, TableConfig,
};
use crate::screen::{Screen, ScreenDef, ScreenEnv, ScreenMsg};
use crate::source::{DataSource, LocalSource, PagedSource, SourceMode, Timeout};
use crate::table::{ConfigError, FetchRequest, Row, RowActionKind, TableController};
use crate::ui::{EventResult, Keybinding, TableEvent, TableView};

pub enum ListMsg {
    Fetch(FetchRequest),
    Fetched(FetchOutcome),
    Close,
}

impl From<FetchOutcome> for ListMsg {
    fn from(outcome: FetchOutcome) -> Self {
        Self::Fetched(outcome)
    }
}

/// A paginated, searchable list over one dataset collection.
pub struct ListScreen {
    title: String,
    table: TableController,
    view: TableView,
    source: Arc<dyn DataSource>,
    /// Cancels the fetch most recently spawned.
    in_flight: Option<CancellationToken>,
    page_sizes: TableConfig,
    resolver: Arc<KeyResolver>,
    msg_tx: UnboundedSender<ListMsg>,
    msg_rx: UnboundedReceiver<ListMsg>,
}

fn data_source(mode: SourceMode, rows: Vec<Row>, config: &TableConfig) -> Arc<dyn DataSource> {
    let limit = Duration::from_secs(config.fetch_timeout_secs);
    match mode {
        SourceMode::Local => Arc::new(Timeout::new(LocalSource::new(rows), limit)),
        SourceMode::Server => {
            let latency = Duration::from_millis(config.simulated_latency_ms);
            Arc::new(Timeout::new(
                PagedSource::new(rows).with_latency(latency),
                limit,
            ))
        }
    }
}

/// Row label for notices: the first of name, username or id that is set.
fn row_label(row: &Row) -> String {
    ["name", "username", "id"]
        .iter()
        .find_map(|key| row.text(key))
        .unwrap_or_default()
}

impl ListScreen {
    /// # Errors
    /// Fails if the screen's columns or actions are inconsistent.
    pub fn new(def: &ScreenDef, rows: Vec<Row>, env: &ScreenEnv) -> Result<Self, ConfigError> {
        let mut builder = TableController::builder()
            .columns((def.columns)())
            .page_size(env.table.default_page_size);
        if let Some(fields) = def.search() {
            builder = builder.search_fields(fields);
        }
        for &kind in def.actions {
            let app_tx = env.app_tx.clone();
            let title = def.title.to_string();
            builder = builder.on_action(kind, move |row: &Row| {
                let msg = match kind {
                    RowActionKind::Details => AppMessage::ShowDetails {
                        title: format!("{title}: {}", row_label(row)),
                        row: row.clone(),
                    },
                    RowActionKind::Update => AppMessage::EditRequested {
                        title: title.clone(),
                        label: row_label(row),
                    },
                };
                let _ = app_tx.send(msg);
            });
        }

        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        Ok(Self {
            title: def.title.to_string(),
            table: builder.build()?,
            view: TableView::new(def.title, Arc::clone(&env.resolver)),
            source: data_source(def.mode, rows, &env.table),
            in_flight: None,
            page_sizes: env.table.clone(),
            resolver: Arc::clone(&env.resolver),
            msg_tx,
            msg_rx,
        })
    }

    pub const fn table(&self) -> &TableController {
        &self.table
    }

    fn queue(&self, msg: ListMsg) {
        let _ = self.msg_tx.send(msg);
    }

    fn queue_fetch(&self, fetch: Option<FetchRequest>) {
        if let Some(fetch) = fetch {
            self.queue(ListMsg::Fetch(fetch));
        }
    }

    fn fetch(&mut self, fetch: FetchRequest) -> Box<dyn Command> {
        let cancel = CancellationToken::new();
        if let Some(previous) = self.in_flight.replace(cancel.clone()) {
            previous.cancel();
        }
        Box::new(FetchPageCmd::new(
            Arc::clone(&self.source),
            fetch,
            cancel,
            self.msg_tx.clone(),
        ))
    }

    fn handle_page_key(&mut self, key: &KeyEvent) -> bool {
        let r = &self.resolver;
        let fetch = if r.matches_page(key, PageAction::Next) {
            self.table.next_page()
        } else if r.matches_page(key, PageAction::Previous) {
            self.table.previous_page()
        } else if r.matches_page(key, PageAction::First) {
            self.table.first_page()
        } else if r.matches_page(key, PageAction::Last) {
            self.table.last_page()
        } else if r.matches_page(key, PageAction::Reload) {
            Some(self.table.reload())
        } else if r.matches_page(key, PageAction::Grow) {
            self.resize_page(self.page_sizes.grow(self.table.pagination().page_size()))
        } else if r.matches_page(key, PageAction::Shrink) {
            self.resize_page(self.page_sizes.shrink(self.table.pagination().page_size()))
        } else {
            return false;
        };
        self.queue_fetch(fetch);
        true
    }

    fn resize_page(&mut self, size: Option<u32>) -> Option<FetchRequest> {
        let size = size?;
        debug!(size, screen = %self.title, "Changing page size");
        self.table.set_page_size(size).ok()
    }

    fn handle_row_key(&mut self, key: &KeyEvent) -> bool {
        let kind = if self.resolver.matches_row(key, RowKeyAction::Details) {
            RowActionKind::Details
        } else if self.resolver.matches_row(key, RowKeyAction::Update) {
            RowActionKind::Update
        } else {
            return false;
        };
        if !self.table.offered_actions().contains(&kind) {
            return false;
        }
        if let Some(position) = self.view.selected()
            && let Err(e) = self.table.invoke(kind, position)
        {
            warn!(screen = %self.title, "Row action failed: {e}");
        }
        true
    }

    fn apply_search(&mut self, query: String) {
        self.table.set_search_query(query);
        self.view.sync(self.table.visible_len());
    }
}

impl Screen for ListScreen {
    fn init(&mut self) {
        let fetch = self.table.start();
        self.queue(ListMsg::Fetch(fetch));
    }

    fn destroy(&mut self) {
        if let Some(cancel) = self.in_flight.take() {
            cancel.cancel();
        }
    }

    fn handle_tick(&mut self) {
        self.view.handle_tick();
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult<()> {
        if !self.view.is_searching() && (self.handle_page_key(&key) || self.handle_row_key(&key)) {
            return EventResult::Consumed;
        }

        match self.view.handle_key(key) {
            EventResult::Event(TableEvent::SearchChanged(query)) => {
                self.apply_search(query);
                EventResult::Consumed
            }
            EventResult::Event(TableEvent::Activated(_)) | EventResult::Consumed => {
                EventResult::Consumed
            }
            EventResult::Ignored if self.resolver.matches_global(&key, GlobalAction::Back) => {
                self.queue(ListMsg::Close);
                EventResult::Consumed
            }
            EventResult::Ignored => EventResult::Ignored,
        }
    }

    fn update(&mut self) -> Result<ScreenMsg> {
        let mut commands: Vec<Box<dyn Command>> = Vec::new();

        while let Ok(msg) = self.msg_rx.try_recv() {
            match msg {
                ListMsg::Fetch(fetch) => commands.push(self.fetch(fetch)),
                ListMsg::Fetched(outcome) => {
                    if outcome.apply(&mut self.table).is_applied() {
                        self.view.sync(self.table.visible_len());
                        self.view.reset_selection();
                    }
                }
                ListMsg::Close => return Ok(ScreenMsg::Close),
            }
        }

        Ok(if commands.is_empty() {
            ScreenMsg::Idle
        } else {
            ScreenMsg::Run(commands)
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.view.render(frame, area, theme, &self.table.view_model());
    }

    fn breadcrumbs(&self) -> Vec<String> {
        vec![self.title.clone()]
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        let mut keys = vec![
            Keybinding::hint(r.display_page(PageAction::Next), "Next page"),
            Keybinding::hint(r.display_page(PageAction::Previous), "Previous page"),
            Keybinding::new(r.display_page(PageAction::First), "First page"),
            Keybinding::new(r.display_page(PageAction::Last), "Last page"),
            Keybinding::hint(
                format!(
                    "{}/{}",
                    r.display_page(PageAction::Grow),
                    r.display_page(PageAction::Shrink)
                ),
                "Page size",
            ),
            Keybinding::hint(r.display_page(PageAction::Reload), "Reload"),
            Keybinding::hint(r.display_search(SearchAction::Toggle), "Search"),
        ];
        for &kind in self.table.offered_actions() {
            let key = match kind {
                RowActionKind::Update => r.display_row(RowKeyAction::Update),
                RowActionKind::Details => r.display_row(RowKeyAction::Details),
            };
            keys.push(Keybinding::hint(key, kind.label()));
        }
        keys
    }
}
