use thiserror::Error;
use tracing::debug;

use crate::engine::equation::Equation;
use crate::engine::term::{InstanceId, PlacedTerm, Sign, Side, SourceTerm, SourceTermId, TermValue};

const SOLUTION_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("no placed term with id {0}")]
    UnknownInstance(InstanceId),
}

/// Term instances currently sitting in the solving columns, in placement order.
///
/// The ledger does not cap how many instances of one source term exist;
/// hiding already-placed cards is left to the view.
#[derive(Clone, Debug, Default)]
pub struct PlacementLedger {
    terms: Vec<PlacedTerm>,
    next_instance: u64,
}

impl PlacementLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&mut self, source: &SourceTerm, target: Side) -> PlacedTerm {
        self.next_instance += 1;
        let term = PlacedTerm {
            instance_id: InstanceId(self.next_instance),
            source_id: source.id,
            base_coefficient: source.coefficient,
            is_variable: source.is_variable,
            origin_side: source.origin_side,
            current_side: target,
            sign: Sign::Positive,
        };
        debug!(instance = %term.instance_id, side = target.as_str(), "placed term");
        self.terms.push(term);
        term
    }

    /// Returns whether the term actually changed sides.
    pub fn move_term(&mut self, id: InstanceId, target: Side) -> Result<bool, LedgerError> {
        let term = self.get_mut(id)?;
        if term.current_side == target {
            return Ok(false);
        }
        term.current_side = target;
        debug!(instance = %id, side = target.as_str(), "moved term");
        Ok(true)
    }

    pub fn remove(&mut self, id: InstanceId) -> Result<PlacedTerm, LedgerError> {
        let idx = self
            .terms
            .iter()
            .position(|t| t.instance_id == id)
            .ok_or(LedgerError::UnknownInstance(id))?;
        debug!(instance = %id, "removed term");
        Ok(self.terms.remove(idx))
    }

    pub fn toggle_sign(&mut self, id: InstanceId) -> Result<Sign, LedgerError> {
        let term = self.get_mut(id)?;
        term.sign = term.sign.flipped();
        Ok(term.sign)
    }

    pub fn clear(&mut self) {
        self.terms.clear();
    }

    pub fn get(&self, id: InstanceId) -> Option<&PlacedTerm> {
        self.terms.iter().find(|t| t.instance_id == id)
    }

    fn get_mut(&mut self, id: InstanceId) -> Result<&mut PlacedTerm, LedgerError> {
        self.terms
            .iter_mut()
            .find(|t| t.instance_id == id)
            .ok_or(LedgerError::UnknownInstance(id))
    }

    pub fn terms(&self) -> &[PlacedTerm] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn on_side(&self, side: Side) -> impl Iterator<Item = &PlacedTerm> {
        self.terms.iter().filter(move |t| t.current_side == side)
    }

    pub fn is_source_placed(&self, source: SourceTermId) -> bool {
        self.terms.iter().any(|t| t.source_id == source)
    }

    pub fn expression(&self, side: Side) -> Vec<TermValue> {
        self.on_side(side).map(PlacedTerm::value).collect()
    }

    pub fn sum_coefficients(&self, side: Side) -> i32 {
        self.on_side(side).map(PlacedTerm::effective_coefficient).sum()
    }

    pub fn constants_on_left(&self) -> bool {
        self.on_side(Side::Left).any(|t| !t.is_variable)
    }

    pub fn variables_on_right(&self) -> bool {
        self.on_side(Side::Right).any(|t| t.is_variable)
    }

    /// True only when both sides are populated, every sign is the expected
    /// one, variables sit alone on the left and constants alone on the right,
    /// and the resulting quotient equals the equation's solution.
    pub fn is_fully_solved(&self, equation: &Equation) -> bool {
        if self.on_side(Side::Left).next().is_none() || self.on_side(Side::Right).next().is_none() {
            return false;
        }
        if !self.terms.iter().all(PlacedTerm::is_sign_correct) {
            return false;
        }
        if self.constants_on_left() || self.variables_on_right() {
            return false;
        }

        let left_coefficient = self.sum_coefficients(Side::Left);
        if left_coefficient == 0 {
            return false;
        }
        let right_constant = self.sum_coefficients(Side::Right);
        let computed = f64::from(right_constant) / f64::from(left_coefficient);
        computed.is_finite() && (computed - f64::from(equation.solution)).abs() < SOLUTION_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::equation::EquationId;
    use crate::engine::term::source_terms;

    // 3x - 4 = x + 6, x = 5
    fn setup() -> (Equation, Vec<SourceTerm>, PlacementLedger) {
        let eq = Equation::from_coefficients(EquationId(1), 3, -4, 1, 6).unwrap();
        let sources = source_terms(&eq);
        (eq, sources, PlacementLedger::new())
    }

    #[test]
    fn test_place_starts_positive_on_target() {
        let (_, sources, mut ledger) = setup();
        let term = ledger.place(&sources[3], Side::Left);
        assert_eq!(term.sign, Sign::Positive);
        assert_eq!(term.current_side, Side::Left);
        assert_eq!(term.origin_side, Side::Right);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_instance_ids_are_unique() {
        let (_, sources, mut ledger) = setup();
        let a = ledger.place(&sources[0], Side::Left);
        let b = ledger.place(&sources[0], Side::Left);
        assert_ne!(a.instance_id, b.instance_id);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_move_same_side_is_noop() {
        let (_, sources, mut ledger) = setup();
        let term = ledger.place(&sources[0], Side::Left);
        assert_eq!(ledger.move_term(term.instance_id, Side::Left), Ok(false));
        assert_eq!(ledger.move_term(term.instance_id, Side::Right), Ok(true));
        assert_eq!(ledger.get(term.instance_id).unwrap().current_side, Side::Right);
    }

    #[test]
    fn test_unknown_instance_errors() {
        let (_, _, mut ledger) = setup();
        let missing = InstanceId(99);
        assert_eq!(
            ledger.toggle_sign(missing),
            Err(LedgerError::UnknownInstance(missing))
        );
        assert!(ledger.remove(missing).is_err());
        assert!(ledger.move_term(missing, Side::Left).is_err());
    }

    #[test]
    fn test_sign_correctness_survives_even_crossings() {
        let (_, sources, mut ledger) = setup();
        let id = ledger.place(&sources[1], Side::Left).instance_id;
        assert!(ledger.get(id).unwrap().is_sign_correct());

        ledger.move_term(id, Side::Right).unwrap();
        assert!(!ledger.get(id).unwrap().is_sign_correct());

        ledger.move_term(id, Side::Left).unwrap();
        assert!(ledger.get(id).unwrap().is_sign_correct());

        ledger.move_term(id, Side::Right).unwrap();
        ledger.toggle_sign(id).unwrap();
        assert!(ledger.get(id).unwrap().is_sign_correct());
    }

    #[test]
    fn test_sum_coefficients_uses_signs() {
        let (_, sources, mut ledger) = setup();
        ledger.place(&sources[0], Side::Left);
        let x = ledger.place(&sources[2], Side::Left).instance_id;
        ledger.toggle_sign(x).unwrap();
        assert_eq!(ledger.sum_coefficients(Side::Left), 2);
        assert_eq!(ledger.sum_coefficients(Side::Right), 0);
    }

    #[test]
    fn test_fully_solved_layout() {
        let (eq, sources, mut ledger) = setup();
        ledger.place(&sources[0], Side::Left);
        let x = ledger.place(&sources[2], Side::Left).instance_id;
        let four = ledger.place(&sources[1], Side::Right).instance_id;
        ledger.place(&sources[3], Side::Right);
        assert!(!ledger.is_fully_solved(&eq));

        ledger.toggle_sign(x).unwrap();
        assert!(!ledger.is_fully_solved(&eq));
        ledger.toggle_sign(four).unwrap();
        assert!(ledger.is_fully_solved(&eq));
        // pure query
        assert!(ledger.is_fully_solved(&eq));
        assert!(ledger.is_fully_solved(&eq));
    }

    #[test]
    fn test_not_solved_with_empty_side() {
        let (eq, sources, mut ledger) = setup();
        assert!(!ledger.is_fully_solved(&eq));
        ledger.place(&sources[0], Side::Left);
        assert!(!ledger.is_fully_solved(&eq));
    }

    #[test]
    fn test_not_solved_when_terms_missing() {
        let (eq, sources, mut ledger) = setup();
        // 3x = 6 gives 2, not 5
        ledger.place(&sources[0], Side::Left);
        ledger.place(&sources[3], Side::Right);
        assert!(!ledger.is_fully_solved(&eq));
    }

    #[test]
    fn test_not_solved_when_left_sum_zero() {
        let eq = Equation::from_coefficients(EquationId(2), 2, 4, -2, 0).unwrap();
        let sources = source_terms(&eq);
        let mut ledger = PlacementLedger::new();
        // 2x - 2x on the left
        ledger.place(&sources[0], Side::Left);
        let a = ledger.place(&sources[0], Side::Left).instance_id;
        ledger.toggle_sign(a).unwrap();
        let c = ledger.place(&sources[1], Side::Right).instance_id;
        ledger.toggle_sign(c).unwrap();
        assert_eq!(ledger.sum_coefficients(Side::Left), 0);
        assert!(!ledger.is_fully_solved(&eq));
    }

    #[test]
    fn test_remove_and_clear() {
        let (_, sources, mut ledger) = setup();
        let a = ledger.place(&sources[0], Side::Left).instance_id;
        ledger.place(&sources[1], Side::Right);
        let removed = ledger.remove(a).unwrap();
        assert_eq!(removed.source_id, sources[0].id);
        assert!(!ledger.is_source_placed(sources[0].id));
        assert!(ledger.is_source_placed(sources[1].id));
        ledger.clear();
        assert!(ledger.is_empty());
    }
}
