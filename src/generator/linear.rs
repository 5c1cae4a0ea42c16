use std::ops::RangeInclusive;

use rand::Rng;
use rand::rngs::SmallRng;
use thiserror::Error;
use tracing::{debug, warn};

use crate::engine::equation::{Equation, EquationId};
use crate::generator::EquationGenerator;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;
/// Upper bound for `max_attempts`; keeps a failing draw loop short.
pub const MAX_ATTEMPTS_LIMIT: u32 = 1_000_000;

/// Structural constraints; each one pins a draw to exactly zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeneratorConstraints {
    pub force_left_constant_zero: bool,
    pub force_right_variable_zero: bool,
    pub force_right_constant_zero: bool,
}

impl GeneratorConstraints {
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }

    /// Both constants forced to zero leaves nothing to move to the right.
    pub fn is_satisfiable(&self) -> bool {
        !(self.force_left_constant_zero && self.force_right_constant_zero)
    }

    /// The closest satisfiable set: a conflict between the two constant
    /// constraints gives way on the right-hand side.
    #[must_use]
    pub fn relaxed(self) -> Self {
        if self.is_satisfiable() {
            self
        } else {
            Self {
                force_right_constant_zero: false,
                ..self
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorRanges {
    pub variable: RangeInclusive<i32>,
    pub constant: RangeInclusive<i32>,
    pub solution: RangeInclusive<i32>,
}

impl Default for GeneratorRanges {
    fn default() -> Self {
        Self {
            variable: -9..=9,
            constant: -12..=12,
            solution: -9..=9,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("no equation satisfied the constraints after {attempts} attempts")]
    Exhausted { attempts: u32 },
    #[error("both constants are forced to zero")]
    Unsatisfiable,
}

/// Rejection sampler for `ax + b = cx + d` with an integer solution.
#[derive(Debug)]
pub struct LinearGenerator<R: Rng = SmallRng> {
    rng: R,
    ranges: GeneratorRanges,
    max_attempts: u32,
    next_id: u64,
}

impl<R: Rng> LinearGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            ranges: GeneratorRanges::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            next_id: 0,
        }
    }

    #[must_use]
    pub fn with_ranges(mut self, ranges: GeneratorRanges) -> Self {
        self.ranges = ranges;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.clamp(1, MAX_ATTEMPTS_LIMIT);
        self
    }

    pub fn ranges(&self) -> &GeneratorRanges {
        &self.ranges
    }

    /// Draw until an equation fits the ranges and constraints, giving up
    /// after the configured number of attempts.
    pub fn try_generate(
        &mut self,
        constraints: &GeneratorConstraints,
    ) -> Result<Equation, GeneratorError> {
        if !constraints.is_satisfiable() {
            return Err(GeneratorError::Unsatisfiable);
        }
        for attempt in 1..=self.max_attempts {
            if let Some(equation) = self.draw(constraints) {
                debug!(attempt, id = %equation.id, "generated equation");
                return Ok(equation);
            }
        }
        Err(GeneratorError::Exhausted {
            attempts: self.max_attempts,
        })
    }

    fn draw_in(&mut self, range: &RangeInclusive<i32>) -> Option<i32> {
        if range.is_empty() {
            return None;
        }
        Some(self.rng.gen_range(range.clone()))
    }

    fn draw_non_zero(&mut self, range: &RangeInclusive<i32>) -> Option<i32> {
        self.draw_in(range).filter(|&v| v != 0)
    }

    /// One sampling attempt. Rejects equal variable coefficients, equations
    /// without any constant term (nothing could be moved to the right), and
    /// non-integer or out-of-range solutions. Arithmetic that would overflow
    /// rejects the draw.
    fn draw(&mut self, constraints: &GeneratorConstraints) -> Option<Equation> {
        let variable = self.ranges.variable.clone();
        let constant = self.ranges.constant.clone();

        let left_variable = self.draw_non_zero(&variable)?;
        let right_variable = if constraints.force_right_variable_zero {
            0
        } else {
            self.draw_non_zero(&variable)?
        };
        if left_variable == right_variable {
            return None;
        }

        let left_constant = if constraints.force_left_constant_zero {
            0
        } else {
            self.draw_non_zero(&constant)?
        };
        let right_constant = if constraints.force_right_constant_zero {
            0
        } else {
            self.draw_in(&constant)?
        };
        if left_constant == 0 && right_constant == 0 {
            return None;
        }

        let numerator = right_constant.checked_sub(left_constant)?;
        let denominator = left_variable.checked_sub(right_variable)?;
        if numerator.checked_rem(denominator)? != 0 {
            return None;
        }
        let solution = numerator.checked_div(denominator)?;
        if !self.ranges.solution.contains(&solution) {
            return None;
        }

        Some(Equation {
            id: self.allocate_id(),
            left_variable,
            left_constant,
            right_variable,
            right_constant,
            solution,
        })
    }

    fn allocate_id(&mut self) -> EquationId {
        self.next_id += 1;
        EquationId(self.next_id)
    }

    /// `2x + 1 = x + (1 + s)` for the in-range solution `s` closest to zero,
    /// or `2x - 1 = x + (s - 1)` when `1 + s` does not fit.
    fn fallback_equation(&mut self) -> Equation {
        let solution = if self.ranges.solution.is_empty() {
            0
        } else {
            0_i32.clamp(*self.ranges.solution.start(), *self.ranges.solution.end())
        };
        let (left_constant, right_constant) = match solution.checked_add(1) {
            Some(right_constant) => (1, right_constant),
            None => (-1, solution - 1),
        };
        Equation {
            id: self.allocate_id(),
            left_variable: 2,
            left_constant,
            right_variable: 1,
            right_constant,
            solution,
        }
    }
}

impl<R: Rng> EquationGenerator for LinearGenerator<R> {
    fn generate(&mut self, constraints: &GeneratorConstraints) -> Equation {
        let relaxed = constraints.relaxed();
        if relaxed != *constraints {
            debug!(?constraints, "constant constraints conflict, allowing a right-hand constant");
        }
        let constraints = &relaxed;
        match self.try_generate(constraints) {
            Ok(equation) => return equation,
            Err(err) if constraints.is_unconstrained() => {
                warn!(%err, "unconstrained generation exhausted");
                return self.fallback_equation();
            }
            Err(err) => warn!(%err, ?constraints, "retrying without structural constraints"),
        }
        self.try_generate(&GeneratorConstraints::default())
            .unwrap_or_else(|err| {
                warn!(%err, "unconstrained generation exhausted");
                self.fallback_equation()
            })
    }
}
