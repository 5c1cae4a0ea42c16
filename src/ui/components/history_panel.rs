use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::session::history::History;
use crate::ui::theme::Theme;

/// Intermediate expressions, newest at the bottom. Older entries scroll off
/// the top when the panel is full.
pub struct HistoryPanel<'a> {
    pub history: &'a History,
    pub theme: &'a Theme,
}

impl Widget for HistoryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(" {} ", t!("history.title")))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let visible = inner.height as usize;
        let entries = self.history.entries();
        let skip = entries.len().saturating_sub(visible);
        let last = entries.len().saturating_sub(1);

        let lines: Vec<Line> = entries
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(i, entry)| {
                let style = if i == last {
                    Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.muted())
                };
                Line::from(Span::styled(entry.plain_text.clone(), style))
            })
            .collect();

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
