//! Plain-text and TeX-style rendering of terms, expressions and equations.
//!
//! The first term of an expression keeps only a minus sign; every later term
//! carries an explicit `+` or `-`. A variable with magnitude 1 renders as `x`.

use crate::engine::equation::Equation;
use crate::engine::term::{Side, TermValue, side_terms};

const MARKUP_TERM_SEPARATOR: &str = " \\; ";

fn magnitude(term: TermValue) -> String {
    let abs = term.coefficient.unsigned_abs();
    if term.is_variable {
        if abs == 1 {
            "x".to_string()
        } else {
            format!("{abs}x")
        }
    } else {
        abs.to_string()
    }
}

fn sign_char(coefficient: i32) -> char {
    if coefficient >= 0 { '+' } else { '-' }
}

/// Card label: always signed, e.g. `+3x`, `-5`.
pub fn card_text(term: TermValue) -> String {
    format!("{}{}", sign_char(term.coefficient), magnitude(term))
}

pub fn card_markup(term: TermValue) -> String {
    format!("{}\\,{}", sign_char(term.coefficient), magnitude(term))
}

fn expression_term_text(term: TermValue, is_first: bool) -> String {
    let body = magnitude(term);
    if is_first && term.coefficient >= 0 {
        body
    } else {
        format!("{} {body}", sign_char(term.coefficient))
    }
}

fn expression_term_markup(term: TermValue, is_first: bool) -> String {
    let body = magnitude(term);
    match (is_first, term.coefficient >= 0) {
        (true, true) => body,
        (true, false) => format!("-{body}"),
        (false, _) => format!("{}\\,{body}", sign_char(term.coefficient)),
    }
}

/// Plain text for an additive expression; an empty expression is `0`.
pub fn expression_text(terms: &[TermValue]) -> String {
    if terms.is_empty() {
        return "0".to_string();
    }
    terms
        .iter()
        .enumerate()
        .map(|(i, &term)| expression_term_text(term, i == 0))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn expression_markup(terms: &[TermValue]) -> String {
    if terms.is_empty() {
        return "0".to_string();
    }
    terms
        .iter()
        .enumerate()
        .map(|(i, &term)| expression_term_markup(term, i == 0))
        .collect::<Vec<_>>()
        .join(MARKUP_TERM_SEPARATOR)
}

pub fn equation_text(equation: &Equation) -> String {
    format!(
        "{} = {}",
        expression_text(&side_terms(equation, Side::Left)),
        expression_text(&side_terms(equation, Side::Right))
    )
}

pub fn equation_markup(equation: &Equation) -> String {
    format!(
        "{} = {}",
        expression_markup(&side_terms(equation, Side::Left)),
        expression_markup(&side_terms(equation, Side::Right))
    )
}

/// Inline math delimiters around an equation's markup.
pub fn equation_inline(equation: &Equation) -> String {
    format!("\\({}\\)", equation_markup(equation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::equation::EquationId;

    fn eq(lv: i32, lc: i32, rv: i32, rc: i32) -> Equation {
        Equation::from_coefficients(EquationId(1), lv, lc, rv, rc).unwrap()
    }

    #[test]
    fn test_unit_variable_has_no_one() {
        assert_eq!(card_text(TermValue::variable(1)), "+x");
        assert_eq!(card_text(TermValue::variable(-1)), "-x");
        assert_eq!(expression_text(&[TermValue::variable(-1)]), "- x");
        assert_eq!(expression_markup(&[TermValue::variable(-1)]), "-x");
    }

    #[test]
    fn test_card_labels() {
        assert_eq!(card_text(TermValue::constant(0)), "+0");
        assert_eq!(card_text(TermValue::variable(0)), "+0x");
        assert_eq!(card_text(TermValue::constant(-7)), "-7");
        assert_eq!(card_markup(TermValue::variable(12)), "+\\,12x");
    }

    #[test]
    fn test_expression_text_signs() {
        let terms = [
            TermValue::variable(3),
            TermValue::variable(-1),
            TermValue::constant(4),
        ];
        assert_eq!(expression_text(&terms), "3x - x + 4");
        assert_eq!(expression_markup(&terms), "3x \\; -\\,x \\; +\\,4");
    }

    #[test]
    fn test_empty_expression_is_zero() {
        assert_eq!(expression_text(&[]), "0");
        assert_eq!(expression_markup(&[]), "0");
    }

    #[test]
    fn test_equation_text() {
        assert_eq!(equation_text(&eq(2, 3, 0, 7)), "2x + 3 = 0x + 7");
        assert_eq!(equation_text(&eq(-3, 5, 1, -7)), "- 3x + 5 = x - 7");
        assert_eq!(equation_markup(&eq(-3, 5, 1, -7)), "-3x \\; +\\,5 = x \\; -\\,7");
    }

    #[test]
    fn test_equation_without_constants_on_right() {
        // 4x - 8 = 2x
        assert_eq!(equation_text(&eq(4, -8, 2, 0)), "4x - 8 = 2x");
        assert_eq!(equation_inline(&eq(4, -8, 2, 0)), "\\(4x \\; -\\,8 = 2x\\)");
    }
}
