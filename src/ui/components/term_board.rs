use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::engine::format::card_text;
use crate::engine::term::{CardStatus, Side};
use crate::session::drag::{DragPayload, DropZone};
use crate::session::round::Round;
use crate::ui::theme::Theme;

struct Card {
    payload: DragPayload,
    text: String,
    status: CardStatus,
}

/// Two source shelves around the two solving columns.
pub struct TermBoard<'a> {
    pub round: &'a Round,
    pub selected: Option<DragPayload>,
    /// Highlighted column while a card is being carried.
    pub drop_target: Option<DropZone>,
    pub color_by_status: bool,
    pub theme: &'a Theme,
}

impl TermBoard<'_> {
    fn cards(&self, zone: DropZone) -> Vec<Card> {
        let side = zone.side();
        if zone.is_shelf() {
            return self
                .round
                .unplaced_sources(side)
                .map(|s| Card {
                    payload: DragPayload::Source(s.id),
                    text: card_text(s.value()),
                    status: CardStatus::Source,
                })
                .collect();
        }
        self.round
            .ledger()
            .on_side(side)
            .map(|t| Card {
                payload: DragPayload::Placed(t.instance_id),
                text: card_text(t.value()),
                status: t.status(),
            })
            .collect()
    }

    fn title(zone: DropZone) -> String {
        match zone {
            DropZone::ShelfLeft => t!("board.shelf_left"),
            DropZone::ShelfRight => t!("board.shelf_right"),
            DropZone::SolvingLeft => t!("board.solving_left"),
            DropZone::SolvingRight => t!("board.solving_right"),
        }
        .to_string()
    }

    fn render_column(&self, zone: DropZone, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let is_target = self.drop_target == Some(zone);
        let border = if is_target {
            colors.border_focused()
        } else {
            colors.border()
        };
        let mut block = Block::bordered()
            .title(format!(" {} ", Self::title(zone)))
            .border_style(Style::default().fg(border));
        if is_target {
            block = block.title_style(Style::default().add_modifier(Modifier::BOLD));
        }

        let dragging = self.round.active_drag();
        let cards = self.cards(zone);
        let lines: Vec<Line> = if cards.is_empty() {
            vec![Line::from(Span::styled(
                t!("board.empty").to_string(),
                Style::default().fg(colors.muted()),
            ))]
        } else {
            cards
                .into_iter()
                .map(|card| {
                    let is_selected = self.selected == Some(card.payload);
                    let fg = if self.color_by_status {
                        colors.card(card.status)
                    } else {
                        colors.card_source()
                    };
                    let mut style = Style::default().fg(fg);
                    if is_selected {
                        style = style.bg(colors.card_cursor_bg()).add_modifier(Modifier::BOLD);
                    }
                    if dragging == Some(card.payload) {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    let marker = if is_selected { "> " } else { "  " };
                    Line::from(Span::styled(format!("{marker}{}", card.text), style))
                })
                .collect()
        };

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

impl Widget for TermBoard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(area);

        let zones = [
            DropZone::shelf(Side::Left),
            DropZone::solving(Side::Left),
            DropZone::solving(Side::Right),
            DropZone::shelf(Side::Right),
        ];
        for (zone, column) in zones.into_iter().zip(columns.iter()) {
            self.render_column(zone, *column, buf);
        }
    }
}
