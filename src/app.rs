use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rust_i18n::t;
use tracing::warn;

use crate::config::Config;
use crate::engine::hint::TermLabels;
use crate::engine::stage::Stage;
use crate::engine::term::Side;
use crate::generator::linear::LinearGenerator;
use crate::session::drag::{DragEvent, DragPayload, DropZone};
use crate::session::input::InputOp;
use crate::session::practice::PracticeSession;
use crate::store::json_store::JsonStore;
use crate::store::schema::Preferences;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Practice,
    Settings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsItem {
    ShowHelper,
    HighlightSignHint,
    ForceLeftConstantZero,
    ForceRightVariableZero,
    ForceRightConstantZero,
    KeepPracticing,
}

impl SettingsItem {
    pub const ALL: [SettingsItem; 6] = [
        SettingsItem::ShowHelper,
        SettingsItem::HighlightSignHint,
        SettingsItem::ForceLeftConstantZero,
        SettingsItem::ForceRightVariableZero,
        SettingsItem::ForceRightConstantZero,
        SettingsItem::KeepPracticing,
    ];

    pub fn label(self) -> String {
        match self {
            SettingsItem::ShowHelper => t!("settings.show_helper"),
            SettingsItem::HighlightSignHint => t!("settings.highlight_sign_hint"),
            SettingsItem::ForceLeftConstantZero => t!("settings.force_left_constant_zero"),
            SettingsItem::ForceRightVariableZero => t!("settings.force_right_variable_zero"),
            SettingsItem::ForceRightConstantZero => t!("settings.force_right_constant_zero"),
            SettingsItem::KeepPracticing => t!("settings.keep_practicing"),
        }
        .to_string()
    }
}

/// Drop targets in on-screen order, left to right.
const ZONE_ORDER: [DropZone; 4] = [
    DropZone::ShelfLeft,
    DropZone::SolvingLeft,
    DropZone::SolvingRight,
    DropZone::ShelfRight,
];

pub struct App {
    pub screen: AppScreen,
    pub session: PracticeSession,
    pub theme: &'static Theme,
    pub config: Config,
    pub preferences: Preferences,
    pub labels: TermLabels,
    pub store: Option<JsonStore>,
    pub should_quit: bool,
    pub settings_selected: usize,
    pub card_cursor: usize,
    pub drop_target: DropZone,
}

impl App {
    pub fn new(config: Config, seed: Option<u64>, now: Instant) -> Self {
        let store = JsonStore::new().ok();
        Self::with_store(config, seed, store, now)
    }

    pub fn with_store(
        config: Config,
        seed: Option<u64>,
        store: Option<JsonStore>,
        now: Instant,
    ) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        let preferences = store
            .as_ref()
            .map(JsonStore::load_preferences)
            .unwrap_or_default();

        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let generator = LinearGenerator::new(rng)
            .with_ranges(config.ranges())
            .with_max_attempts(config.max_attempts);
        let session = PracticeSession::new(
            generator,
            preferences.constraints(),
            config.practice_settings(),
            now,
        );

        Self {
            screen: AppScreen::Practice,
            session,
            theme,
            labels: preferences.term_labels(),
            preferences,
            config,
            store,
            should_quit: false,
            settings_selected: 0,
            card_cursor: 0,
            drop_target: DropZone::SolvingLeft,
        }
    }

    /// Every card the cursor can land on, in on-screen column order.
    pub fn selectable_cards(&self) -> Vec<DragPayload> {
        let round = self.session.round();
        let shelf = |side: Side| {
            round
                .unplaced_sources(side)
                .map(|s| DragPayload::Source(s.id))
                .collect::<Vec<_>>()
        };
        let column = |side: Side| {
            round
                .ledger()
                .on_side(side)
                .map(|t| DragPayload::Placed(t.instance_id))
                .collect::<Vec<_>>()
        };
        let mut cards = shelf(Side::Left);
        cards.extend(column(Side::Left));
        cards.extend(column(Side::Right));
        cards.extend(shelf(Side::Right));
        cards
    }

    pub fn selected_card(&self) -> Option<DragPayload> {
        let cards = self.selectable_cards();
        cards.get(self.card_cursor.min(cards.len().saturating_sub(1))).copied()
    }

    pub fn select_next(&mut self) {
        let len = self.selectable_cards().len();
        if len > 0 {
            self.card_cursor = (self.card_cursor.min(len - 1) + 1) % len;
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.selectable_cards().len();
        if len == 0 {
            return;
        }
        let current = self.card_cursor.min(len - 1);
        self.card_cursor = if current == 0 { len - 1 } else { current - 1 };
    }

    fn clamp_cursor(&mut self) {
        let len = self.selectable_cards().len();
        self.card_cursor = self.card_cursor.min(len.saturating_sub(1));
    }

    /// Enter/Space: pick up the selected card, or drop the one being carried.
    pub fn pick_or_drop(&mut self, now: Instant) {
        if self.session.round().active_drag().is_some() {
            self.session.handle_drag(
                DragEvent::Ended {
                    payload: None,
                    target: Some(self.drop_target),
                },
                now,
            );
            self.clamp_cursor();
            return;
        }
        let Some(payload) = self.selected_card() else {
            return;
        };
        self.drop_target = self.default_target(payload);
        self.session.handle_drag(DragEvent::Started(payload), now);
    }

    /// Sources head for their own column, placed cards for the other side.
    fn default_target(&self, payload: DragPayload) -> DropZone {
        let round = self.session.round();
        match payload {
            DragPayload::Source(id) => round
                .source(id)
                .map_or(DropZone::SolvingLeft, |s| DropZone::solving(s.origin_side)),
            DragPayload::Placed(id) => round
                .ledger()
                .get(id)
                .map_or(DropZone::SolvingLeft, |t| DropZone::solving(t.current_side.opposite())),
        }
    }

    pub fn cycle_target(&mut self, forward: bool) {
        let idx = ZONE_ORDER
            .iter()
            .position(|z| *z == self.drop_target)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % ZONE_ORDER.len()
        } else {
            (idx + ZONE_ORDER.len() - 1) % ZONE_ORDER.len()
        };
        self.drop_target = ZONE_ORDER[next];
    }

    pub fn cancel_drag(&mut self, now: Instant) {
        self.session.handle_drag(DragEvent::Cancelled, now);
    }

    pub fn toggle_selected_sign(&mut self, now: Instant) {
        if let Some(DragPayload::Placed(id)) = self.selected_card() {
            self.session.toggle_sign(id, now);
        }
    }

    pub fn keypad(&mut self, op: &InputOp, now: Instant) {
        self.session.keypad_input(op, now);
    }

    /// Bracketed paste replaces the active field's whole buffer.
    pub fn paste(&mut self, text: &str, now: Instant) {
        if let Some(field) = self.session.round().keypad().active() {
            self.session.replace_text(field, text, now);
        }
    }

    pub fn next_equation(&mut self, now: Instant) {
        self.session.load_next(now);
        self.card_cursor = 0;
    }

    pub fn reset_round(&mut self) {
        self.session.reset();
        self.card_cursor = 0;
    }

    pub fn toggle_keep_practicing(&mut self) {
        let enabled = !self.session.keep_practicing();
        self.session.set_keep_practicing(enabled);
    }

    pub fn tick(&mut self, now: Instant) {
        if self.session.tick(now) {
            self.card_cursor = 0;
        }
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn go_to_practice(&mut self) {
        self.screen = AppScreen::Practice;
    }

    pub fn settings_next(&mut self) {
        self.settings_selected = (self.settings_selected + 1) % SettingsItem::ALL.len();
    }

    pub fn settings_prev(&mut self) {
        self.settings_selected = self
            .settings_selected
            .checked_sub(1)
            .unwrap_or(SettingsItem::ALL.len() - 1);
    }

    pub fn setting_value(&self, item: SettingsItem) -> bool {
        match item {
            SettingsItem::ShowHelper => self.preferences.show_helper,
            SettingsItem::HighlightSignHint => self.preferences.highlight_sign_hint,
            SettingsItem::ForceLeftConstantZero => self.preferences.force_left_constant_zero,
            SettingsItem::ForceRightVariableZero => self.preferences.force_right_variable_zero,
            SettingsItem::ForceRightConstantZero => self.preferences.force_right_constant_zero,
            SettingsItem::KeepPracticing => self.session.keep_practicing(),
        }
    }

    pub fn toggle_selected_setting(&mut self) {
        let item = SettingsItem::ALL[self.settings_selected % SettingsItem::ALL.len()];
        let prefs = &mut self.preferences;
        let slot = match item {
            SettingsItem::ShowHelper => &mut prefs.show_helper,
            SettingsItem::HighlightSignHint => &mut prefs.highlight_sign_hint,
            SettingsItem::ForceLeftConstantZero => &mut prefs.force_left_constant_zero,
            SettingsItem::ForceRightVariableZero => &mut prefs.force_right_variable_zero,
            SettingsItem::ForceRightConstantZero => &mut prefs.force_right_constant_zero,
            // runtime only, not a stored preference
            SettingsItem::KeepPracticing => {
                self.toggle_keep_practicing();
                return;
            }
        };
        *slot = !*slot;
        self.session.set_constraints(self.preferences.constraints());
        self.labels = self.preferences.term_labels();
        self.save_preferences();
    }

    fn save_preferences(&self) {
        if let Some(ref store) = self.store
            && let Err(err) = store.save_preferences(&self.preferences)
        {
            warn!(%err, "could not save preferences");
        }
    }

    pub fn header_info(&self) -> String {
        let keep = if self.session.keep_practicing() {
            t!("header.keep_practicing_on")
        } else {
            t!("header.keep_practicing_off")
        };
        format!(
            " {} | {keep}",
            t!("header.solved_count", count = self.session.solved_count())
        )
    }

    pub fn footer_hints(&self) -> Vec<String> {
        [
            t!("footer.select"),
            t!("footer.pick"),
            t!("footer.target"),
            t!("footer.cancel"),
            t!("footer.sign"),
            t!("footer.keypad"),
            t!("footer.next"),
            t!("footer.reset"),
            t!("footer.keep"),
            t!("footer.settings"),
            t!("footer.quit"),
        ]
        .into_iter()
        .map(|hint| hint.to_string())
        .collect()
    }

    /// Placing-stage guidance, shown only when the helper is enabled.
    pub fn hint_text(&self) -> Option<String> {
        let round = self.session.round();
        (self.preferences.show_helper && round.stage() == Stage::Placing)
            .then(|| round.hint().message(&self.labels))
    }

    /// Status message for the current round, if it is solved.
    pub fn status_text(&self) -> Option<String> {
        let round = self.session.round();
        if !round.is_solved() {
            return None;
        }
        let solved = t!("status.solved", solution = round.equation().solution);
        let follow_up = if self.session.pending_advance().is_some() {
            t!("status.next_soon")
        } else {
            t!("status.take_a_break")
        };
        Some(format!("{solved} {follow_up}"))
    }
}
