//! Four-stage solving pipeline.
//!
//! 1. place and sign the term cards,
//! 2. enter the left coefficient sum and right constant sum,
//! 3. enter the divisor (skipped when the coefficient is exactly 1),
//! 4. enter the value of `x`.
//!
//! Transitions only move forward within a round.

use tracing::info;

use crate::session::input::KeypadField;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Placing = 1,
    Totals = 2,
    Division = 3,
    Solution = 4,
}

impl Stage {
    pub fn number(self) -> u8 {
        self as u8
    }
}

/// Expected values and parsed entries observed after an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageInputs {
    pub fully_solved: bool,
    pub left_coefficient: i32,
    pub right_constant: i32,
    pub solution: i32,
    pub coefficient_entry: Option<i32>,
    pub constant_entry: Option<i32>,
    pub division_entry: Option<i32>,
    pub solution_entry: Option<i32>,
}

/// Per-field "turned green" flags. A field never matches before its stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldMatches {
    pub coefficient: bool,
    pub constant: bool,
    pub division: bool,
    pub solution: bool,
}

impl FieldMatches {
    pub fn evaluate(stage: Stage, inputs: &StageInputs) -> Self {
        let matches = |reached: Stage, entry: Option<i32>, expected: i32| {
            stage >= reached && entry == Some(expected)
        };
        Self {
            coefficient: matches(Stage::Totals, inputs.coefficient_entry, inputs.left_coefficient),
            constant: matches(Stage::Totals, inputs.constant_entry, inputs.right_constant),
            division: matches(Stage::Division, inputs.division_entry, inputs.left_coefficient),
            solution: matches(Stage::Solution, inputs.solution_entry, inputs.solution),
        }
    }

    pub fn get(&self, field: KeypadField) -> bool {
        match field {
            KeypadField::Coefficient => self.coefficient,
            KeypadField::Constant => self.constant,
            KeypadField::Division => self.division,
            KeypadField::Solution => self.solution,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageMachine {
    stage: Stage,
}

impl Default for StageMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StageMachine {
    pub fn new() -> Self {
        Self {
            stage: Stage::Placing,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn reset(&mut self) {
        self.stage = Stage::Placing;
    }

    /// Where a single transition from `stage` would lead, if anywhere.
    fn next(stage: Stage, inputs: &StageInputs) -> Option<Stage> {
        let matches = FieldMatches::evaluate(stage, inputs);
        match stage {
            Stage::Placing if inputs.fully_solved => Some(Stage::Totals),
            Stage::Totals if matches.coefficient && matches.constant => {
                if inputs.left_coefficient == 1 {
                    Some(Stage::Solution)
                } else {
                    Some(Stage::Division)
                }
            }
            Stage::Division if matches.division => Some(Stage::Solution),
            _ => None,
        }
    }

    /// Apply every transition the inputs allow. Returns the stage before the
    /// call when it changed.
    pub fn sync(&mut self, inputs: &StageInputs) -> Option<Stage> {
        let before = self.stage;
        while let Some(next) = Self::next(self.stage, inputs) {
            if next <= self.stage {
                break;
            }
            info!(from = self.stage.number(), to = next.number(), "stage advanced");
            self.stage = next;
        }
        (self.stage != before).then_some(before)
    }

    pub fn matches(&self, inputs: &StageInputs) -> FieldMatches {
        FieldMatches::evaluate(self.stage, inputs)
    }

    /// Single-focus policy: the first unsatisfied field of the current stage.
    pub fn active_field(&self, matches: &FieldMatches) -> Option<KeypadField> {
        match self.stage {
            Stage::Placing => None,
            Stage::Totals if !matches.coefficient => Some(KeypadField::Coefficient),
            Stage::Totals if !matches.constant => Some(KeypadField::Constant),
            Stage::Division if !matches.division => Some(KeypadField::Division),
            Stage::Solution if !matches.solution => Some(KeypadField::Solution),
            _ => None,
        }
    }
}
