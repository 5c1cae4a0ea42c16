use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::hint::TermLabels;
use crate::generator::linear::GeneratorConstraints;

/// Display preferences the learner toggles in the settings screen.
///
/// None of these affect whether an answer is correct; they only pick labels,
/// which helpers to show and which structural constraints the generator gets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_true")]
    pub show_helper: bool,
    #[serde(default = "default_true")]
    pub highlight_sign_hint: bool,
    #[serde(default)]
    pub force_left_constant_zero: bool,
    #[serde(default)]
    pub force_right_variable_zero: bool,
    #[serde(default)]
    pub force_right_constant_zero: bool,
    #[serde(default)]
    pub variable_label: String,
    #[serde(default)]
    pub constant_label: String,
}

fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            show_helper: true,
            highlight_sign_hint: true,
            force_left_constant_zero: false,
            force_right_variable_zero: false,
            force_right_constant_zero: false,
            variable_label: String::new(),
            constant_label: String::new(),
        }
    }
}

impl Preferences {
    /// Take each field from `value` only when it has the right JSON type.
    /// Anything else keeps the default, so one bad field never discards the
    /// rest. Returns how many fields were rejected.
    pub fn merge_from_value(&mut self, value: &Value) -> usize {
        let Some(object) = value.as_object() else {
            return 1;
        };
        let mut rejected = 0;
        let mut take_bool = |key: &str, slot: &mut bool| match object.get(key) {
            None => {}
            Some(Value::Bool(b)) => *slot = *b,
            Some(_) => rejected += 1,
        };
        take_bool("show_helper", &mut self.show_helper);
        take_bool("highlight_sign_hint", &mut self.highlight_sign_hint);
        take_bool("force_left_constant_zero", &mut self.force_left_constant_zero);
        take_bool("force_right_variable_zero", &mut self.force_right_variable_zero);
        take_bool("force_right_constant_zero", &mut self.force_right_constant_zero);

        let mut take_string = |key: &str, slot: &mut String| match object.get(key) {
            None => {}
            Some(Value::String(s)) => *slot = s.clone(),
            Some(_) => rejected += 1,
        };
        take_string("variable_label", &mut self.variable_label);
        take_string("constant_label", &mut self.constant_label);
        rejected
    }

    pub fn constraints(&self) -> GeneratorConstraints {
        GeneratorConstraints {
            force_left_constant_zero: self.force_left_constant_zero,
            force_right_variable_zero: self.force_right_variable_zero,
            force_right_constant_zero: self.force_right_constant_zero,
        }
    }

    pub fn term_labels(&self) -> TermLabels {
        TermLabels::with_overrides(&self.variable_label, &self.constant_label)
    }
}
