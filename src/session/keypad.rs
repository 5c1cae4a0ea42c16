use tracing::debug;

use crate::session::input::{self, InputOp, KeypadField};

/// What the view needs to draw one entry box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldView<'a> {
    pub field: KeypadField,
    pub buffer_text: &'a str,
    pub is_active_field: bool,
    pub matches_expected_value: bool,
}

/// Text buffers for the four entry fields plus the single active field.
#[derive(Clone, Debug, Default)]
pub struct Keypad {
    coefficient: String,
    constant: String,
    division: String,
    solution: String,
    active: Option<KeypadField>,
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self, field: KeypadField) -> &str {
        match field {
            KeypadField::Coefficient => &self.coefficient,
            KeypadField::Constant => &self.constant,
            KeypadField::Division => &self.division,
            KeypadField::Solution => &self.solution,
        }
    }

    fn buffer_mut(&mut self, field: KeypadField) -> &mut String {
        match field {
            KeypadField::Coefficient => &mut self.coefficient,
            KeypadField::Constant => &mut self.constant,
            KeypadField::Division => &mut self.division,
            KeypadField::Solution => &mut self.solution,
        }
    }

    pub fn value(&self, field: KeypadField) -> Option<i32> {
        input::parse(field, self.buffer(field))
    }

    pub fn active(&self) -> Option<KeypadField> {
        self.active
    }

    pub fn set_active(&mut self, field: Option<KeypadField>) {
        if self.active != field {
            debug!(field = field.map(KeypadField::as_str), "active keypad field");
            self.active = field;
        }
    }

    /// Apply `op` to the active field. Returns false when no field is active
    /// or the buffer did not change.
    pub fn apply(&mut self, op: &InputOp) -> bool {
        let Some(field) = self.active else {
            return false;
        };
        self.apply_to(field, op)
    }

    pub fn apply_to(&mut self, field: KeypadField, op: &InputOp) -> bool {
        let next = op.apply(field, self.buffer(field));
        let buffer = self.buffer_mut(field);
        if *buffer == next {
            return false;
        }
        *buffer = next;
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
