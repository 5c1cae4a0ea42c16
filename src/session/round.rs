use tracing::{debug, warn};

use crate::engine::equation::Equation;
use crate::engine::format::{equation_markup, equation_text, expression_markup, expression_text};
use crate::engine::hint::Hint;
use crate::engine::ledger::{LedgerError, PlacementLedger};
use crate::engine::stage::{FieldMatches, Stage, StageInputs, StageMachine};
use crate::engine::term::{InstanceId, Side, SourceTerm, SourceTermId, source_terms};
use crate::session::drag::{DragEvent, DragPayload, DropAction, DropZone, resolve_drop};
use crate::session::history::History;
use crate::session::input::{InputOp, KeypadField};
use crate::session::keypad::{FieldView, Keypad};

/// Everything that belongs to a single equation: cards, stage, keypad and
/// the history of intermediate expressions.
#[derive(Clone, Debug)]
pub struct Round {
    equation: Equation,
    sources: Vec<SourceTerm>,
    ledger: PlacementLedger,
    stage: StageMachine,
    keypad: Keypad,
    history: History,
    active_drag: Option<DragPayload>,
    moves: u32,
}

impl Round {
    pub fn new(equation: Equation) -> Self {
        let mut history = History::new();
        history.seed(equation_text(&equation), equation_markup(&equation));
        Self {
            sources: source_terms(&equation),
            equation,
            ledger: PlacementLedger::new(),
            stage: StageMachine::new(),
            keypad: Keypad::new(),
            history,
            active_drag: None,
            moves: 0,
        }
    }

    /// Clear the learner's work but keep the equation and its history.
    pub fn reset(&mut self) {
        self.ledger.clear();
        self.stage.reset();
        self.keypad.clear();
        self.active_drag = None;
        self.moves = 0;
        debug!(id = %self.equation.id, "round reset");
    }

    pub fn equation(&self) -> &Equation {
        &self.equation
    }

    pub fn sources(&self) -> &[SourceTerm] {
        &self.sources
    }

    pub fn source(&self, id: SourceTermId) -> Option<&SourceTerm> {
        self.sources.iter().find(|s| s.id == id)
    }

    /// Source terms of `side` that have no instance in the columns yet.
    pub fn unplaced_sources(&self, side: Side) -> impl Iterator<Item = &SourceTerm> {
        self.sources
            .iter()
            .filter(move |s| s.origin_side == side && !self.ledger.is_source_placed(s.id))
    }

    pub fn ledger(&self) -> &PlacementLedger {
        &self.ledger
    }

    pub fn stage(&self) -> Stage {
        self.stage.stage()
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn active_drag(&self) -> Option<DragPayload> {
        self.active_drag
    }

    /// Ledger mutations since the round started or was last reset.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    // --- drag boundary ---

    pub fn handle_drag(&mut self, event: DragEvent) -> bool {
        match event {
            DragEvent::Started(payload) => {
                self.drag_started(payload);
                false
            }
            DragEvent::Ended { payload, target } => self.drag_ended(payload, target),
            DragEvent::Cancelled => {
                self.drag_cancelled();
                false
            }
        }
    }

    pub fn drag_started(&mut self, payload: DragPayload) {
        self.active_drag = Some(payload);
    }

    pub fn drag_cancelled(&mut self) {
        self.active_drag = None;
    }

    /// Finish a drag. Without an explicit payload the one recorded by
    /// `drag_started` is used. Returns whether the ledger changed.
    pub fn drag_ended(&mut self, payload: Option<DragPayload>, target: Option<DropZone>) -> bool {
        let started = self.active_drag.take();
        let Some(payload) = payload.or(started) else {
            debug!("drag ended without payload");
            return false;
        };
        match resolve_drop(payload, target) {
            DropAction::Place { source, side } => self.place(source, side).is_some(),
            DropAction::Move { instance, side } => self.move_term(instance, side),
            DropAction::Remove(instance) => self.remove(instance),
            DropAction::Ignore => false,
        }
    }

    // --- ledger mutations ---

    pub fn place(&mut self, source: SourceTermId, side: Side) -> Option<InstanceId> {
        let Some(term) = self.source(source).copied() else {
            warn!(source = source.0, "unknown source term");
            return None;
        };
        let placed = self.ledger.place(&term, side);
        self.after_ledger_change();
        Some(placed.instance_id)
    }

    pub fn move_term(&mut self, id: InstanceId, side: Side) -> bool {
        let result = self.ledger.move_term(id, side);
        self.finish_mutation(result)
    }

    pub fn remove(&mut self, id: InstanceId) -> bool {
        let result = self.ledger.remove(id).map(|_| true);
        self.finish_mutation(result)
    }

    pub fn toggle_sign(&mut self, id: InstanceId) -> bool {
        let result = self.ledger.toggle_sign(id).map(|_| true);
        self.finish_mutation(result)
    }

    fn finish_mutation(&mut self, result: Result<bool, LedgerError>) -> bool {
        match result {
            Ok(changed) => {
                if changed {
                    self.after_ledger_change();
                }
                changed
            }
            Err(err) => {
                warn!(%err, "ignored ledger operation");
                false
            }
        }
    }

    fn after_ledger_change(&mut self) {
        self.moves += 1;
        self.record_history_if_changed();
        self.sync();
    }

    fn record_history_if_changed(&mut self) {
        if self.ledger.is_empty() {
            return;
        }
        let plain = self.current_text();
        let markup = self.current_markup();
        if self.history.record_if_changed(plain, markup) {
            debug!(entries = self.history.len(), "history entry recorded");
        }
    }

    // --- keypad ---

    /// Apply a keypad press to the active field.
    pub fn keypad_input(&mut self, op: &InputOp) -> bool {
        if !self.keypad.apply(op) {
            return false;
        }
        self.sync();
        true
    }

    /// Whole-buffer replacement from a text box. Ignored unless `field` is
    /// the active one.
    pub fn replace_text(&mut self, field: KeypadField, raw: &str) -> bool {
        if self.keypad.active() != Some(field) {
            return false;
        }
        if !self.keypad.apply_to(field, &InputOp::Replace(raw.to_string())) {
            return false;
        }
        self.sync();
        true
    }

    // --- derived state ---

    fn inputs(&self) -> StageInputs {
        StageInputs {
            fully_solved: self.ledger.is_fully_solved(&self.equation),
            left_coefficient: self.left_coefficient(),
            right_constant: self.right_constant(),
            solution: self.equation.solution,
            coefficient_entry: self.keypad.value(KeypadField::Coefficient),
            constant_entry: self.keypad.value(KeypadField::Constant),
            division_entry: self.keypad.value(KeypadField::Division),
            solution_entry: self.keypad.value(KeypadField::Solution),
        }
    }

    fn sync(&mut self) {
        let inputs = self.inputs();
        self.stage.sync(&inputs);
        let matches = self.stage.matches(&inputs);
        self.keypad.set_active(self.stage.active_field(&matches));
    }

    pub fn matches(&self) -> FieldMatches {
        self.stage.matches(&self.inputs())
    }

    pub fn field(&self, field: KeypadField) -> FieldView<'_> {
        FieldView {
            field,
            buffer_text: self.keypad.buffer(field),
            is_active_field: self.keypad.active() == Some(field),
            matches_expected_value: self.matches().get(field),
        }
    }

    pub fn left_coefficient(&self) -> i32 {
        self.ledger.sum_coefficients(Side::Left)
    }

    pub fn right_constant(&self) -> i32 {
        self.ledger.sum_coefficients(Side::Right)
    }

    pub fn is_fully_solved(&self) -> bool {
        self.ledger.is_fully_solved(&self.equation)
    }

    /// Stage 4 with the value of `x` entered correctly.
    pub fn is_solved(&self) -> bool {
        self.stage() == Stage::Solution && self.matches().solution
    }

    pub fn hint(&self) -> Hint {
        Hint::derive(&self.ledger, &self.equation)
    }

    /// Plain text of the working expression `left = right`.
    pub fn current_text(&self) -> String {
        format!(
            "{} = {}",
            expression_text(&self.ledger.expression(Side::Left)),
            expression_text(&self.ledger.expression(Side::Right))
        )
    }

    pub fn current_markup(&self) -> String {
        format!(
            "{} = {}",
            expression_markup(&self.ledger.expression(Side::Left)),
            expression_markup(&self.ledger.expression(Side::Right))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::equation::EquationId;

    // 2x + 3 = 0x + 7: sources 2x, +3, 0x, +7
    fn round() -> Round {
        Round::new(Equation::from_coefficients(EquationId(1), 2, 3, 0, 7).unwrap())
    }

    fn solve_layout(round: &mut Round) {
        round.place(SourceTermId(0), Side::Left);
        let three = round.place(SourceTermId(1), Side::Right).unwrap();
        round.toggle_sign(three);
        round.place(SourceTermId(3), Side::Right);
    }

    fn type_number(round: &mut Round, text: &str) {
        for ch in text.chars() {
            round.keypad_input(&InputOp::Key(ch));
        }
    }

    #[test]
    fn test_new_round_seeds_history_with_equation() {
        let round = round();
        assert_eq!(round.history().len(), 1);
        assert_eq!(round.history().last().unwrap().plain_text, "2x + 3 = 0x + 7");
        assert_eq!(round.stage(), Stage::Placing);
        assert_eq!(round.keypad().active(), None);
    }

    #[test]
    fn test_layout_advances_to_totals() {
        let mut round = round();
        solve_layout(&mut round);
        assert!(round.is_fully_solved());
        assert_eq!(round.stage(), Stage::Totals);
        assert_eq!(round.keypad().active(), Some(KeypadField::Coefficient));
        assert_eq!(round.current_text(), "2x = - 3 + 7");
    }

    #[test]
    fn test_full_pipeline() {
        let mut round = round();
        solve_layout(&mut round);
        type_number(&mut round, "2x");
        assert!(round.field(KeypadField::Coefficient).matches_expected_value);
        type_number(&mut round, "4");
        assert_eq!(round.stage(), Stage::Division);
        type_number(&mut round, "2");
        assert_eq!(round.stage(), Stage::Solution);
        assert!(!round.is_solved());
        type_number(&mut round, "2");
        assert!(round.is_solved());
        assert_eq!(round.keypad().active(), None);
    }

    #[test]
    fn test_input_ignored_while_placing() {
        let mut round = round();
        assert!(!round.keypad_input(&InputOp::Key('2')));
        assert!(!round.replace_text(KeypadField::Solution, "2"));
        assert_eq!(round.keypad().buffer(KeypadField::Solution), "");
    }

    #[test]
    fn test_replace_text_only_for_active_field() {
        let mut round = round();
        solve_layout(&mut round);
        assert!(!round.replace_text(KeypadField::Constant, "4"));
        assert!(round.replace_text(KeypadField::Coefficient, "２ｘ"));
        assert_eq!(round.keypad().buffer(KeypadField::Coefficient), "2x");
        assert_eq!(round.keypad().active(), Some(KeypadField::Constant));
    }

    #[test]
    fn test_drag_flow() {
        let mut round = round();
        round.drag_started(DragPayload::Source(SourceTermId(0)));
        assert_eq!(round.active_drag(), Some(DragPayload::Source(SourceTermId(0))));
        assert!(round.drag_ended(None, Some(DropZone::SolvingLeft)));
        assert_eq!(round.active_drag(), None);
        assert_eq!(round.ledger().len(), 1);

        let id = round.ledger().terms()[0].instance_id;
        round.drag_started(DragPayload::Placed(id));
        round.drag_cancelled();
        assert_eq!(round.active_drag(), None);
        assert_eq!(round.ledger().len(), 1);

        assert!(round.handle_drag(DragEvent::Ended {
            payload: Some(DragPayload::Placed(id)),
            target: Some(DropZone::ShelfLeft),
        }));
        assert!(round.ledger().is_empty());
    }

    #[test]
    fn test_drop_outside_zones_is_noop() {
        let mut round = round();
        assert!(!round.drag_ended(Some(DragPayload::Source(SourceTermId(0))), None));
        assert!(!round.drag_ended(None, Some(DropZone::SolvingLeft)));
        assert!(round.ledger().is_empty());
        assert_eq!(round.moves(), 0);
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut round = round();
        assert_eq!(round.place(SourceTermId(42), Side::Left), None);
        assert!(!round.toggle_sign(InstanceId(7)));
        assert!(!round.remove(InstanceId(7)));
        assert_eq!(round.history().len(), 1);
    }

    #[test]
    fn test_noop_move_keeps_history() {
        let mut round = round();
        let id = round.place(SourceTermId(0), Side::Left).unwrap();
        assert_eq!(round.history().len(), 2);
        assert!(!round.move_term(id, Side::Left));
        assert_eq!(round.history().len(), 2);
    }

    #[test]
    fn test_noop_move_is_not_counted() {
        let mut round = round();
        let id = round.place(SourceTermId(0), Side::Left).unwrap();
        assert_eq!(round.moves(), 1);
        round.move_term(id, Side::Left);
        assert_eq!(round.moves(), 1);
        round.move_term(id, Side::Right);
        round.toggle_sign(id);
        assert_eq!(round.moves(), 3);
    }

    #[test]
    fn test_unplaced_sources_hide_placed_cards() {
        let mut round = round();
        assert_eq!(round.unplaced_sources(Side::Left).count(), 2);
        round.place(SourceTermId(1), Side::Right);
        let left: Vec<_> = round.unplaced_sources(Side::Left).map(|s| s.id).collect();
        assert_eq!(left, vec![SourceTermId(0)]);
        assert_eq!(round.unplaced_sources(Side::Right).count(), 2);
    }

    #[test]
    fn test_reset_keeps_equation_and_history() {
        let mut round = round();
        solve_layout(&mut round);
        type_number(&mut round, "2");
        let history = round.history().len();
        round.reset();
        assert!(round.ledger().is_empty());
        assert_eq!(round.stage(), Stage::Placing);
        assert_eq!(round.keypad().buffer(KeypadField::Coefficient), "");
        assert_eq!(round.history().len(), history);
        assert_eq!(round.equation().solution, 2);
    }
}
