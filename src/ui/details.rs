use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use serde_json::Value;

use crate::Theme;
use crate::table::Row;
use crate::table::row::value_text;
use crate::ui::{Component, EventResult, Result};

pub enum DetailsEvent {
    Close,
}

/// Read-only overlay listing every field of one row.
///
/// Nested objects are flattened into dotted keys, e.g. `department.name`.
pub struct DetailsView {
    title: String,
    fields: Vec<(String, String)>,
    scroll: u16,
}

impl DetailsView {
    pub fn new(title: impl Into<String>, row: &Row) -> Self {
        let mut fields = Vec::new();
        for (key, value) in row.fields() {
            flatten(key, value, &mut fields);
        }
        Self {
            title: title.into(),
            fields,
            scroll: 0,
        }
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten(&format!("{prefix}.{key}"), nested, out);
            }
        }
        other => out.push((prefix.to_string(), value_text(other).unwrap_or_default())),
    }
}

impl Component for DetailsView {
    type Output = DetailsEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => DetailsEvent::Close.into(),
            KeyCode::Down | KeyCode::Char('j') => {
                let max = u16::try_from(self.fields.len().saturating_sub(1)).unwrap_or(u16::MAX);
                self.scroll = (self.scroll + 1).min(max);
                EventResult::Consumed
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                EventResult::Consumed
            }
            _ => EventResult::Consumed,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup_area = area.centered(Constraint::Percentage(60), Constraint::Percentage(60));
        frame.render_widget(Clear, popup_area);

        let key_width = self.fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        let lines: Vec<Line> = self
            .fields
            .iter()
            .map(|(key, value)| {
                Line::from(vec![
                    Span::styled(
                        format!("{key:>key_width$}"),
                        Style::default().fg(theme.peach),
                    ),
                    Span::styled(" │ ", Style::default().fg(theme.border())),
                    Span::styled(value.clone(), Style::default().fg(theme.text)),
                ])
            })
            .collect();

        let block = Block::default()
            .title(format!(" {} (Esc to close) ", self.title))
            .title_style(Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border_focused()))
            .style(Style::default().bg(theme.base));

        frame.render_widget(
            Paragraph::new(lines).block(block).scroll((self.scroll, 0)),
            popup_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_fields_are_flattened() {
        let row = Row::try_from(json!({
            "name": "Analyzer",
            "department": { "name": "Hematology", "code": "HEM" },
            "serial": null,
            "isactive": true,
        }))
        .unwrap();

        let view = DetailsView::new("Instrument", &row);
        let fields = view.fields();
        assert!(fields.contains(&("department.name".to_string(), "Hematology".to_string())));
        assert!(fields.contains(&("department.code".to_string(), "HEM".to_string())));
        assert!(fields.contains(&("serial".to_string(), String::new())));
        assert!(fields.contains(&("isactive".to_string(), "true".to_string())));
    }

    #[test]
    fn test_escape_closes() {
        let row = Row::default();
        let mut view = DetailsView::new("Empty", &row);
        let result = view.handle_key(KeyEvent::from(KeyCode::Esc)).unwrap();
        assert!(matches!(result, EventResult::Event(DetailsEvent::Close)));
    }
}
