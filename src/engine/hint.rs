use rust_i18n::t;

use crate::engine::equation::Equation;
use crate::engine::ledger::PlacementLedger;

/// Display names for the two kinds of term card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermLabels {
    pub variable: String,
    pub constant: String,
}

impl TermLabels {
    /// Localized defaults, used wherever a custom label is blank.
    pub fn localized() -> Self {
        Self {
            variable: t!("labels.variable").to_string(),
            constant: t!("labels.constant").to_string(),
        }
    }

    pub fn with_overrides(variable: &str, constant: &str) -> Self {
        let defaults = Self::localized();
        let pick = |custom: &str, fallback: String| {
            let custom = custom.trim();
            if custom.is_empty() {
                fallback
            } else {
                custom.to_string()
            }
        };
        Self {
            variable: pick(variable, defaults.variable),
            constant: pick(constant, defaults.constant),
        }
    }
}

/// Guidance for the placing stage, derived from the card layout alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hint {
    Start,
    Solved { solution: i32 },
    MoveBoth,
    MoveConstantsRight,
    MoveVariablesLeft,
    FixSigns,
}

impl Hint {
    pub fn derive(ledger: &PlacementLedger, equation: &Equation) -> Self {
        if ledger.is_empty() {
            return Hint::Start;
        }
        if ledger.is_fully_solved(equation) {
            return Hint::Solved {
                solution: equation.solution,
            };
        }
        match (ledger.constants_on_left(), ledger.variables_on_right()) {
            (true, true) => Hint::MoveBoth,
            (true, false) => Hint::MoveConstantsRight,
            (false, true) => Hint::MoveVariablesLeft,
            (false, false) => Hint::FixSigns,
        }
    }

    pub fn message(&self, labels: &TermLabels) -> String {
        let variable = labels.variable.as_str();
        let constant = labels.constant.as_str();
        match self {
            Hint::Start => t!("hint.start").to_string(),
            Hint::Solved { solution } => t!("hint.solved", solution = solution).to_string(),
            Hint::MoveBoth => t!("hint.move_both", variable = variable, constant = constant).to_string(),
            Hint::MoveConstantsRight => t!("hint.move_constants_right", constant = constant).to_string(),
            Hint::MoveVariablesLeft => t!("hint.move_variables_left", variable = variable).to_string(),
            Hint::FixSigns => t!("hint.fix_signs").to_string(),
        }
    }
}
