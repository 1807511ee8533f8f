use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

use crate::Theme;
use crate::config::{KeyResolver, NavAction, SearchAction};
use crate::table::{CellValue, ViewModel, ViewStatus};
use crate::ui::{Component, EventResult, Spinner};

const PAGE_STEP: usize = 10;

pub enum TableEvent {
    /// Select pressed on the row shown at this position.
    Activated(usize),
    SearchChanged(String),
}

/// Draws a table [`ViewModel`] and tracks selection and the search prompt.
///
/// The view model is owned by the caller; call [`TableView::sync`] after
/// anything that changes the number of visible rows.
pub struct TableView {
    title: String,
    state: TableState,
    rows: usize,
    searching: bool,
    query: String,
    spinner: Spinner,
    resolver: Arc<KeyResolver>,
}

impl TableView {
    pub fn new(title: impl Into<String>, resolver: Arc<KeyResolver>) -> Self {
        let mut spinner = Spinner::new();
        spinner.set_label("Loading...");
        Self {
            title: title.into(),
            state: TableState::default(),
            rows: 0,
            searching: false,
            query: String::new(),
            spinner,
            resolver,
        }
    }

    /// Position of the selected row among the visible rows.
    pub fn selected(&self) -> Option<usize> {
        self.state.selected().filter(|&i| i < self.rows)
    }

    pub const fn is_searching(&self) -> bool {
        self.searching
    }

    /// Clamp the selection to `rows` visible rows.
    pub fn sync(&mut self, rows: usize) {
        self.rows = rows;
        match self.state.selected() {
            _ if rows == 0 => self.state.select(None),
            Some(i) if i >= rows => self.state.select(Some(rows - 1)),
            None => self.state.select(Some(0)),
            Some(_) => {}
        }
    }

    /// Move the selection back to the top, e.g. after a new page arrives.
    pub fn reset_selection(&mut self) {
        self.state.select(if self.rows == 0 { None } else { Some(0) });
        *self.state.offset_mut() = 0;
    }

    pub fn handle_tick(&mut self) {
        self.spinner.handle_tick();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EventResult<TableEvent> {
        if self.searching {
            self.handle_search_key(key)
        } else {
            self.handle_navigation_key(key)
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> EventResult<TableEvent> {
        if self.resolver.matches_search(&key, SearchAction::Exit) {
            self.searching = false;
            if self.query.is_empty() {
                return EventResult::Consumed;
            }
            self.query.clear();
            return TableEvent::SearchChanged(String::new()).into();
        }
        // Enter leaves the prompt but keeps the filter.
        if self.resolver.matches_nav(&key, NavAction::Select) {
            self.searching = false;
            return EventResult::Consumed;
        }

        match key.code {
            KeyCode::Backspace => {
                self.query.pop();
                TableEvent::SearchChanged(self.query.clone()).into()
            }
            KeyCode::Char(c) => {
                self.query.push(c);
                TableEvent::SearchChanged(self.query.clone()).into()
            }
            _ => EventResult::Consumed,
        }
    }

    fn handle_navigation_key(&mut self, key: KeyEvent) -> EventResult<TableEvent> {
        let last = self.rows.saturating_sub(1);
        let selected = self.state.selected().unwrap_or(0);

        let target = if self.resolver.matches_nav(&key, NavAction::Down) {
            Some((selected + 1).min(last))
        } else if self.resolver.matches_nav(&key, NavAction::Up) {
            Some(selected.saturating_sub(1))
        } else if self.resolver.matches_nav(&key, NavAction::Home) {
            Some(0)
        } else if self.resolver.matches_nav(&key, NavAction::End) {
            Some(last)
        } else if self.resolver.matches_nav(&key, NavAction::PageDown) {
            Some((selected + PAGE_STEP).min(last))
        } else if self.resolver.matches_nav(&key, NavAction::PageUp) {
            Some(selected.saturating_sub(PAGE_STEP))
        } else {
            None
        };
        if let Some(target) = target {
            if self.rows > 0 {
                self.state.select(Some(target));
            }
            return EventResult::Consumed;
        }

        if self.resolver.matches_nav(&key, NavAction::Select) {
            return self
                .selected()
                .map_or(EventResult::Ignored, |i| TableEvent::Activated(i).into());
        }
        if self.resolver.matches_search(&key, SearchAction::Toggle) {
            self.searching = true;
            return EventResult::Consumed;
        }
        if self.resolver.matches_search(&key, SearchAction::Exit) && !self.query.is_empty() {
            self.query.clear();
            return TableEvent::SearchChanged(String::new()).into();
        }

        EventResult::Ignored
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, view: &ViewModel<'_>) {
        let show_search = self.searching || view.is_filtered();
        let [table_area, search_area, footer_area] = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(u16::from(show_search)),
            Constraint::Length(1),
        ])
        .areas(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border()))
            .title(format!(" {} ", self.title))
            .title_style(Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD));

        match &view.status {
            ViewStatus::Idle => frame.render_widget(block, table_area),
            ViewStatus::Loading if view.loaded == 0 => {
                let inner = block.inner(table_area);
                frame.render_widget(block, table_area);
                self.spinner.render(frame, inner, theme);
            }
            ViewStatus::Error(message) => {
                let text = vec![
                    Line::from(Span::styled(
                        "Could not load records",
                        Style::default().fg(theme.error()).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(message.clone(), Style::default().fg(theme.text))),
                    Line::from(""),
                    Line::from(Span::styled(
                        "Reload to try again",
                        Style::default().fg(theme.muted()),
                    )),
                ];
                frame.render_widget(
                    Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
                    table_area,
                );
            }
            ViewStatus::Empty => {
                frame.render_widget(
                    Paragraph::new("No records found")
                        .style(Style::default().fg(theme.muted()))
                        .block(block),
                    table_area,
                );
            }
            ViewStatus::Loading | ViewStatus::Ready => {
                if view.rows.is_empty() {
                    let message = if view.is_filtered() {
                        format!("No rows on this page match \"{}\"", view.query.trim())
                    } else {
                        "No rows on this page".to_string()
                    };
                    frame.render_widget(
                        Paragraph::new(message)
                            .style(Style::default().fg(theme.muted()))
                            .block(block),
                        table_area,
                    );
                } else {
                    self.render_rows(frame, table_area, theme, view, block);
                }
            }
        }

        if show_search {
            let (text, style) = if self.searching {
                (format!("/{}_", self.query), Style::default().fg(theme.warning()))
            } else {
                (
                    format!("/{} ({} of {} shown)", view.query, view.rows.len(), view.loaded),
                    Style::default().fg(theme.subtext0),
                )
            };
            frame.render_widget(Paragraph::new(text).style(style), search_area);
        }

        render_footer(frame, footer_area, theme, view);
    }

    fn render_rows(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        view: &ViewModel<'_>,
        block: Block<'_>,
    ) {
        let header = Row::new(view.columns.labels().map(|label| {
            Cell::from(label.to_string())
                .style(Style::default().fg(theme.header()).add_modifier(Modifier::BOLD))
        }))
        .style(Style::default().bg(theme.surface0));

        let rows = view.rows.iter().map(|row| {
            Row::new(row.cells.iter().map(|cell| cell_widget(cell, theme)))
                .style(Style::default().fg(theme.text))
        });

        let widths = view
            .columns
            .iter()
            .map(|c| c.width().map_or(Constraint::Fill(1), Constraint::Length));

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .fg(theme.lavender)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(table, area, &mut self.state);
    }
}

fn cell_widget(cell: &CellValue, theme: &Theme) -> Cell<'static> {
    match cell {
        CellValue::Text(text) => Cell::from(text.clone()),
        CellValue::Badge { label, tone } => Cell::from(Span::styled(
            format!("● {label}"),
            Style::default().fg(theme.tone(*tone)),
        )),
        CellValue::Empty => Cell::from(Span::styled("-", Style::default().fg(theme.muted()))),
    }
}

fn render_footer(frame: &mut Frame, area: Rect, theme: &Theme, view: &ViewModel<'_>) {
    let p = &view.pagination;
    let style = if p.controls_enabled {
        Style::default().fg(theme.subtext0)
    } else {
        Style::default().fg(theme.muted()).add_modifier(Modifier::DIM)
    };

    let mut spans = vec![Span::styled(
        format!(
            "Page {} of {} · {} items · size {}",
            p.current_page, p.total_pages, p.total_items, p.page_size
        ),
        style,
    )];
    if matches!(view.status, ViewStatus::Loading) && view.loaded > 0 {
        spans.push(Span::styled("  refreshing...", Style::default().fg(theme.info())));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
