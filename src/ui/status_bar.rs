use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Theme;
use crate::ui::Keybinding;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A one-line message shown until the next notice replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Bottom bar: where you are on the left, what you can press on the right.
pub struct StatusBar;

impl StatusBar {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        breadcrumbs: &[String],
        hints: &[Keybinding],
        notice: Option<&Notice>,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [left, right] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Min(20)]).areas(inner);

        let mut crumbs = vec![Span::styled(
            "labconsole",
            Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD),
        )];
        for crumb in breadcrumbs {
            crumbs.push(Span::styled(" › ", Style::default().fg(theme.muted())));
            crumbs.push(Span::styled(crumb.clone(), Style::default().fg(theme.lavender)));
        }
        let mut lines = vec![Line::from(crumbs)];
        if let Some(notice) = notice {
            let color = match notice.level {
                NoticeLevel::Info => theme.info(),
                NoticeLevel::Error => theme.error(),
            };
            lines.push(Line::from(Span::styled(
                truncate_str(&notice.text, left.width as usize),
                Style::default().fg(color),
            )));
        }
        frame.render_widget(Paragraph::new(lines), left);

        Self::render_hints(frame, right, theme, hints);
    }

    fn render_hints(frame: &mut Frame, area: Rect, theme: &Theme, hints: &[Keybinding]) {
        let hints: Vec<&Keybinding> = hints.iter().filter(|kb| kb.hint).collect();
        if hints.is_empty() || area.height == 0 {
            return;
        }

        // Right-align keys so the separators line up.
        let max_key_w = hints.iter().map(|kb| kb.key.len()).max().unwrap_or(1);
        let max_desc_w = hints.iter().map(|kb| kb.description.len()).max().unwrap_or(1);
        let col_width = u16::try_from(max_key_w + 3 + max_desc_w + 2).unwrap_or(u16::MAX);
        let num_cols = (area.width / col_width).max(1) as usize;
        let num_rows = area.height as usize;

        let mut columns: Vec<Vec<Line>> = vec![Vec::new(); num_cols];
        for (i, kb) in hints.iter().enumerate() {
            let col = i / num_rows;
            if col >= num_cols {
                break;
            }
            columns[col].push(Line::from(vec![
                Span::styled(
                    format!("{:>max_key_w$}", kb.key),
                    Style::default().fg(theme.peach),
                ),
                Span::styled(" │ ", Style::default().fg(theme.border())),
                Span::styled(kb.description.clone(), Style::default().fg(theme.subtext0)),
            ]));
        }

        let areas = Layout::horizontal(vec![Constraint::Length(col_width); num_cols]).split(area);
        for (lines, col_area) in columns.into_iter().zip(areas.iter()) {
            frame.render_widget(Paragraph::new(lines), *col_area);
        }
    }
}

/// Truncate to `max_width` characters, marking the cut with "...".
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width > 3 {
        let kept: String = s.chars().take(max_width - 3).collect();
        format!("{kept}...")
    } else {
        s.chars().take(max_width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::testing::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("Hematology", 20), "Hematology");
        assert_eq!(truncate_str("Hematology", 7), "Hema...");
        assert_eq!(truncate_str("Hematology", 2), "He");
    }

    #[test]
    fn test_renders_breadcrumbs_notice_and_hints() {
        let mut terminal = Terminal::new(TestBackend::new(100, 5)).unwrap();
        let hints = [
            Keybinding::hint("]", "Next page"),
            Keybinding::new("?", "Help"),
        ];
        terminal
            .draw(|frame| {
                let area = frame.area();
                StatusBar::render(
                    frame,
                    area,
                    &Theme::default(),
                    &["Users".to_string()],
                    &hints,
                    Some(&Notice::info("Saved")),
                );
            })
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("labconsole › Users"));
        assert!(text.contains("Saved"));
        assert!(text.contains("Next page"));
        assert!(!text.contains("Help"));
    }
}
