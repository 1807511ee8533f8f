use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use serde_json::json;
use tracing::warn;

use crate::Theme;
use crate::config::KeyResolver;
use crate::screen::ScreenRegistry;
use crate::source::{PageResult, SourceMode};
use crate::table::{ColumnDescriptor, Row, SearchFields, TableController};
use crate::ui::{Component, EventResult, Result, TableEvent, TableView};

/// Lists the registered screens; emits the key of the one picked.
///
/// The list is itself a local-mode table: every entry is loaded up front
/// and search narrows it in place.
pub struct ScreenSelector {
    table: TableController,
    view: TableView,
}

impl ScreenSelector {
    /// # Errors
    /// Fails only if the selector's own column set is invalid.
    pub fn new(registry: &ScreenRegistry, resolver: Arc<KeyResolver>) -> Result<Self> {
        let mut table = TableController::builder()
            .column(ColumnDescriptor::new("title", "Screen").with_width(18))
            .column(ColumnDescriptor::new("description", "Description"))
            .column(ColumnDescriptor::new("mode", "Paging").with_width(8))
            .search_fields(SearchFields::new(["title", "description", "key"]))
            .build()?;

        let rows: Vec<Row> = registry
            .all()
            .iter()
            .filter_map(|def| {
                let mode = match def.mode {
                    SourceMode::Server => "server",
                    SourceMode::Local => "local",
                };
                Row::try_from(json!({
                    "key": def.key,
                    "title": def.title,
                    "description": def.description,
                    "mode": mode,
                }))
                .ok()
            })
            .collect();

        let fetch = table.start();
        table.on_adapter_success(fetch.token, PageResult::single_page(rows));

        let mut view = TableView::new("Master data", resolver);
        view.sync(table.visible_len());
        Ok(Self { table, view })
    }
}

impl Component for ScreenSelector {
    type Output = String;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(match self.view.handle_key(key) {
            EventResult::Event(TableEvent::SearchChanged(query)) => {
                self.table.set_search_query(query);
                self.view.sync(self.table.visible_len());
                EventResult::Consumed
            }
            EventResult::Event(TableEvent::Activated(position)) => {
                match self.table.visible_row(position).and_then(|row| row.text("key")) {
                    Some(key) => key.into(),
                    None => {
                        warn!(position, "Selected entry has no screen key");
                        EventResult::Consumed
                    }
                }
            }
            EventResult::Consumed => EventResult::Consumed,
            EventResult::Ignored => EventResult::Ignored,
        })
    }

    fn handle_tick(&mut self) {
        self.view.handle_tick();
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.view.render(frame, area, theme, &self.table.view_model());
    }
}
