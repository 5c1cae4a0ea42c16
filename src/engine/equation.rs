use std::fmt;

use crate::engine::term::Side;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EquationId(pub u64);

impl fmt::Display for EquationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "eq-{}", self.0)
    }
}

/// A first-degree equation `ax + b = cx + d` with a unique integer solution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Equation {
    pub id: EquationId,
    pub left_variable: i32,
    pub left_constant: i32,
    pub right_variable: i32,
    pub right_constant: i32,
    pub solution: i32,
}

impl Equation {
    /// Build an equation from its four coefficients, computing the solution.
    /// Returns `None` when the solution is not unique or not an integer.
    pub fn from_coefficients(
        id: EquationId,
        left_variable: i32,
        left_constant: i32,
        right_variable: i32,
        right_constant: i32,
    ) -> Option<Self> {
        let denominator = left_variable.checked_sub(right_variable)?;
        if denominator == 0 {
            return None;
        }
        let numerator = right_constant.checked_sub(left_constant)?;
        if numerator % denominator != 0 {
            return None;
        }
        Some(Self {
            id,
            left_variable,
            left_constant,
            right_variable,
            right_constant,
            solution: numerator / denominator,
        })
    }

    pub fn variable_coefficient(&self, side: Side) -> i32 {
        match side {
            Side::Left => self.left_variable,
            Side::Right => self.right_variable,
        }
    }

    pub fn constant(&self, side: Side) -> i32 {
        match side {
            Side::Left => self.left_constant,
            Side::Right => self.right_constant,
        }
    }

    /// Value of one side with `x` substituted.
    pub fn evaluate(&self, side: Side, x: i32) -> i64 {
        i64::from(self.variable_coefficient(side)) * i64::from(x) + i64::from(self.constant(side))
    }

    pub fn is_consistent(&self) -> bool {
        self.left_variable != self.right_variable
            && self.evaluate(Side::Left, self.solution) == self.evaluate(Side::Right, self.solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_coefficients_computes_solution() {
        let eq = Equation::from_coefficients(EquationId(1), 3, -4, 1, 6).unwrap();
        assert_eq!(eq.solution, 5);
        assert!(eq.is_consistent());
    }

    #[test]
    fn test_from_coefficients_rejects_equal_variables() {
        assert!(Equation::from_coefficients(EquationId(1), 2, 1, 2, 5).is_none());
    }

    #[test]
    fn test_from_coefficients_rejects_fractional_solution() {
        // 2x + 1 = 4 -> x = 1.5
        assert!(Equation::from_coefficients(EquationId(1), 2, 1, 0, 4).is_none());
    }

    #[test]
    fn test_evaluate_sides_agree_at_solution() {
        let eq = Equation::from_coefficients(EquationId(7), -2, 5, 3, -10).unwrap();
        assert_eq!(eq.solution, 3);
        assert_eq!(eq.evaluate(Side::Left, 3), -1);
        assert_eq!(eq.evaluate(Side::Right, 3), -1);
    }
}
