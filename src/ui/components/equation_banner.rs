use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::engine::equation::Equation;
use crate::engine::format::equation_text;
use crate::engine::stage::Stage;
use crate::ui::theme::Theme;

pub fn stage_label(stage: Stage) -> String {
    match stage {
        Stage::Placing => t!("stage.placing"),
        Stage::Totals => t!("stage.totals"),
        Stage::Division => t!("stage.division"),
        Stage::Solution => t!("stage.solution"),
    }
    .to_string()
}

/// The equation being solved, with the current stage in the title.
pub struct EquationBanner<'a> {
    pub equation: &'a Equation,
    pub stage: Stage,
    pub highlighted: bool,
    pub theme: &'a Theme,
}

impl Widget for EquationBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let border = if self.highlighted {
            colors.banner_highlight()
        } else {
            colors.border()
        };
        let title = format!(
            " {}/4 {} ",
            self.stage.number(),
            stage_label(self.stage)
        );
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(border));

        let mut style = Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD);
        if self.highlighted {
            style = style.fg(colors.banner_highlight());
        }
        Paragraph::new(Line::from(Span::styled(equation_text(self.equation), style)))
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}
