use std::fmt;

use crate::engine::equation::Equation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub fn value(self) -> i32 {
        match self {
            Sign::Positive => 1,
            Sign::Negative => -1,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceTermId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card-{}", self.0)
    }
}

/// Coefficient plus kind, the only data the formatter needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TermValue {
    pub coefficient: i32,
    pub is_variable: bool,
}

impl TermValue {
    pub fn variable(coefficient: i32) -> Self {
        Self {
            coefficient,
            is_variable: true,
        }
    }

    pub fn constant(coefficient: i32) -> Self {
        Self {
            coefficient,
            is_variable: false,
        }
    }
}

/// A term as written in the original equation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceTerm {
    pub id: SourceTermId,
    pub coefficient: i32,
    pub is_variable: bool,
    pub origin_side: Side,
}

impl SourceTerm {
    pub fn value(&self) -> TermValue {
        TermValue {
            coefficient: self.coefficient,
            is_variable: self.is_variable,
        }
    }
}

/// Terms written on one side of `equation`, in display order.
///
/// The variable term is always present, as `0x` when its coefficient is
/// zero. A zero constant is left out.
pub fn side_terms(equation: &Equation, side: Side) -> Vec<TermValue> {
    let mut terms = Vec::with_capacity(2);
    terms.push(TermValue::variable(equation.variable_coefficient(side)));
    let constant = equation.constant(side);
    if constant != 0 {
        terms.push(TermValue::constant(constant));
    }
    terms
}

/// Derive the draggable source terms: left side first, variable before constant.
pub fn source_terms(equation: &Equation) -> Vec<SourceTerm> {
    Side::BOTH
        .into_iter()
        .flat_map(|side| {
            side_terms(equation, side)
                .into_iter()
                .map(move |value| (side, value))
        })
        .enumerate()
        .map(|(idx, (side, value))| SourceTerm {
            id: SourceTermId(idx),
            coefficient: value.coefficient,
            is_variable: value.is_variable,
            origin_side: side,
        })
        .collect()
}

/// Rendering state of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardStatus {
    Source,
    Misplaced,
    SignPending,
    Correct,
}

/// A term instance the learner has dropped into a solving column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedTerm {
    pub instance_id: InstanceId,
    pub source_id: SourceTermId,
    pub base_coefficient: i32,
    pub is_variable: bool,
    pub origin_side: Side,
    pub current_side: Side,
    pub sign: Sign,
}

impl PlacedTerm {
    pub fn effective_coefficient(&self) -> i32 {
        self.base_coefficient * self.sign.value()
    }

    pub fn value(&self) -> TermValue {
        TermValue {
            coefficient: self.effective_coefficient(),
            is_variable: self.is_variable,
        }
    }

    /// Crossing the equals sign flips the sign.
    pub fn expected_sign(&self) -> Sign {
        if self.current_side == self.origin_side {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }

    pub fn is_sign_correct(&self) -> bool {
        self.sign == self.expected_sign()
    }

    /// Variables belong on the left, constants on the right.
    pub fn is_position_correct(&self) -> bool {
        (self.current_side == Side::Left) == self.is_variable
    }

    pub fn status(&self) -> CardStatus {
        if !self.is_position_correct() {
            CardStatus::Misplaced
        } else if self.is_sign_correct() {
            CardStatus::Correct
        } else {
            CardStatus::SignPending
        }
    }
}
