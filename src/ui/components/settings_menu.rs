use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::ui::theme::Theme;

pub struct SettingsRow {
    pub label: String,
    pub enabled: bool,
}

pub struct SettingsMenu<'a> {
    pub rows: Vec<SettingsRow>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl Widget for &SettingsMenu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("settings.title")))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let on = t!("settings.enabled");
        let off = t!("settings.disabled");
        let lines: Vec<Line> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let is_selected = i == self.selected;
                let indicator = if is_selected { ">" } else { " " };
                let label_style = Style::default()
                    .fg(if is_selected {
                        colors.accent()
                    } else {
                        colors.fg()
                    })
                    .add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    });
                let (value, value_color) = if row.enabled {
                    (&on, colors.success())
                } else {
                    (&off, colors.muted())
                };
                Line::from(vec![
                    Span::styled(format!(" {indicator} {}  ", row.label), label_style),
                    Span::styled(format!("[{value}]"), Style::default().fg(value_color)),
                ])
            })
            .collect();
        Paragraph::new(lines).render(layout[1], buf);

        let muted = Style::default().fg(colors.muted());
        Paragraph::new(vec![
            Line::from(Span::styled(t!("settings.applies_next").to_string(), muted)),
            Line::from(Span::styled(t!("footer.settings_nav").to_string(), muted)),
        ])
        .alignment(Alignment::Center)
        .render(layout[2], buf);
    }
}
