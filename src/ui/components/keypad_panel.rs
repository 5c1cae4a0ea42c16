use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::engine::stage::Stage;
use crate::session::input::KeypadField;
use crate::session::round::Round;
use crate::ui::theme::Theme;

fn field_label(field: KeypadField) -> String {
    match field {
        KeypadField::Coefficient => t!("keypad.coefficient"),
        KeypadField::Constant => t!("keypad.constant"),
        KeypadField::Division => t!("keypad.division"),
        KeypadField::Solution => t!("keypad.solution"),
    }
    .to_string()
}

/// Fields reached so far. The division field never appears when the
/// coefficient is 1, since that stage is skipped.
pub fn visible_fields(round: &Round) -> Vec<KeypadField> {
    let stage = round.stage();
    let mut fields = Vec::with_capacity(4);
    if stage >= Stage::Totals {
        fields.push(KeypadField::Coefficient);
        fields.push(KeypadField::Constant);
    }
    let division_used = stage == Stage::Division
        || (stage == Stage::Solution && !round.keypad().buffer(KeypadField::Division).is_empty());
    if division_used {
        fields.push(KeypadField::Division);
    }
    if stage >= Stage::Solution {
        fields.push(KeypadField::Solution);
    }
    fields
}

pub struct KeypadPanel<'a> {
    pub round: &'a Round,
    pub theme: &'a Theme,
}

impl KeypadPanel<'_> {
    fn render_field(&self, field: KeypadField, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let view = self.round.field(field);

        let border = if view.matches_expected_value {
            colors.field_match()
        } else if view.is_active_field {
            colors.field_active()
        } else {
            colors.border()
        };
        let block = Block::bordered()
            .title(format!(" {} ", field_label(field)))
            .border_style(Style::default().fg(border));

        let value_line = if view.buffer_text.is_empty() && view.is_active_field {
            Line::from(Span::styled(
                t!("keypad.prompt").to_string(),
                Style::default().fg(colors.muted()),
            ))
        } else {
            let mut text = view.buffer_text.to_string();
            if view.is_active_field {
                text.push('_');
            }
            Line::from(Span::styled(
                text,
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            ))
        };
        let status_line = if view.matches_expected_value {
            Line::from(Span::styled(
                t!("keypad.matches").to_string(),
                Style::default().fg(colors.success()),
            ))
        } else {
            Line::from("")
        };

        Paragraph::new(vec![value_line, status_line])
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}

impl Widget for KeypadPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let fields = visible_fields(self.round);
        if fields.is_empty() {
            let block = Block::bordered().border_style(Style::default().fg(colors.border()));
            Paragraph::new(Line::from(Span::styled(
                t!("keypad.locked").to_string(),
                Style::default().fg(colors.muted()),
            )))
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
            return;
        }

        let constraints: Vec<Constraint> = fields
            .iter()
            .map(|_| Constraint::Ratio(1, fields.len() as u32))
            .collect();
        let boxes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);
        for (field, rect) in fields.iter().zip(boxes.iter()) {
            self.render_field(*field, *rect, buf);
        }
    }
}
