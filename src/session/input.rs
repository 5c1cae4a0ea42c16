//! Keypad buffer sanitizing and parsing.
//!
//! Every edit (keypad press, physical key, pasted text) produces a raw
//! buffer which is then run through [`sanitize`]; the result is always a
//! fixed point of `sanitize`, so the origin of the edit never matters.

use std::borrow::Cow;

use icu_normalizer::ComposingNormalizerBorrowed;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeypadField {
    Coefficient,
    Constant,
    Division,
    Solution,
}

impl KeypadField {
    pub const ALL: [KeypadField; 4] = [
        KeypadField::Coefficient,
        KeypadField::Constant,
        KeypadField::Division,
        KeypadField::Solution,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            KeypadField::Coefficient => "coefficient",
            KeypadField::Constant => "constant",
            KeypadField::Division => "division",
            KeypadField::Solution => "solution",
        }
    }

    /// Only the coefficient field expresses a multiple of `x`.
    pub fn accepts_variable(self) -> bool {
        self == KeypadField::Coefficient
    }
}

/// A single edit applied to a field buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputOp {
    /// A digit `0-9`, or `x` for the coefficient field.
    Key(char),
    Backspace,
    Clear,
    ToggleSign,
    /// The whole buffer was replaced by typing into a text box.
    Replace(String),
}

impl InputOp {
    /// Apply the edit to `prev` and return the sanitized buffer.
    pub fn apply(&self, field: KeypadField, prev: &str) -> String {
        let raw: Cow<'_, str> = match self {
            InputOp::Key(ch) => Cow::Owned(push_key(field, prev, *ch)),
            InputOp::Backspace => Cow::Owned(backspace(prev)),
            InputOp::Clear => Cow::Borrowed(""),
            InputOp::ToggleSign => Cow::Owned(toggle_sign(prev)),
            InputOp::Replace(text) => normalize_width(text),
        };
        sanitize(field, &raw)
    }
}

/// Fold full-width digits, signs and letters (IME input) to ASCII.
pub fn normalize_width(raw: &str) -> Cow<'_, str> {
    if raw.is_ascii() {
        return Cow::Borrowed(raw);
    }
    ComposingNormalizerBorrowed::new_nfkc().normalize(raw)
}

pub fn sanitize(field: KeypadField, raw: &str) -> String {
    if field.accepts_variable() {
        sanitize_coefficient(raw)
    } else {
        sanitize_integer(raw)
    }
}

pub fn parse(field: KeypadField, cleaned: &str) -> Option<i32> {
    if field.accepts_variable() {
        parse_coefficient(cleaned)
    } else {
        parse_integer(cleaned)
    }
}

fn strip_leading_zeros(digits: &str) -> &str {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() && !digits.is_empty() {
        "0"
    } else {
        trimmed
    }
}

/// Digits with at most one leading `-`; a lone `-` is kept as an
/// in-progress value.
pub fn sanitize_integer(raw: &str) -> String {
    let raw = raw.trim_start();
    let negative = raw.starts_with('-');
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let digits = strip_leading_zeros(&digits);
    match (negative, digits.is_empty()) {
        (true, true) => "-".to_string(),
        (false, true) => String::new(),
        (true, false) => format!("-{digits}"),
        (false, false) => digits.to_string(),
    }
}

/// Like [`sanitize_integer`] plus one trailing `x`; anything typed after
/// the `x` is dropped.
pub fn sanitize_coefficient(raw: &str) -> String {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let negative = compact.starts_with('-');
    let rest = compact
        .strip_prefix('-')
        .or_else(|| compact.strip_prefix('+'))
        .unwrap_or(&compact);

    let mut digits = String::new();
    let mut has_x = false;
    for ch in rest.chars() {
        if ch == 'x' || ch == 'X' {
            has_x = true;
        } else if ch.is_ascii_digit() && !has_x {
            digits.push(ch);
        }
    }

    let digits = strip_leading_zeros(&digits);
    if digits.is_empty() && !has_x {
        return if negative { "-".to_string() } else { String::new() };
    }

    let prefix = if negative { "-" } else { "" };
    let suffix = if has_x { "x" } else { "" };
    format!("{prefix}{digits}{suffix}")
}

pub fn parse_integer(cleaned: &str) -> Option<i32> {
    let trimmed = cleaned.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }
    trimmed.parse().ok()
}

/// `x` is 1 and `-x` is -1; a buffer without the `x` suffix is incomplete.
pub fn parse_coefficient(cleaned: &str) -> Option<i32> {
    let trimmed = cleaned.trim().to_ascii_lowercase();
    let numeric = trimmed.strip_suffix('x')?;
    match numeric {
        "" | "+" => Some(1),
        "-" => Some(-1),
        n => n.parse().ok(),
    }
}

/// Raw buffer after pressing `key`. Callers sanitize the result.
pub fn push_key(field: KeypadField, prev: &str, key: char) -> String {
    if key == 'x' || key == 'X' {
        if !field.accepts_variable() || prev.contains('x') {
            return prev.to_string();
        }
        return match prev {
            "" | "+" => "x".to_string(),
            "-" => "-x".to_string(),
            _ => format!("{prev}x"),
        };
    }
    if !key.is_ascii_digit() || (field.accepts_variable() && prev.contains('x')) {
        return prev.to_string();
    }
    match prev {
        "0" => key.to_string(),
        "-0" => format!("-{key}"),
        _ => format!("{prev}{key}"),
    }
}

pub fn backspace(prev: &str) -> String {
    let mut out = prev.to_string();
    out.pop();
    out
}

pub fn toggle_sign(prev: &str) -> String {
    match prev {
        "" => "-".to_string(),
        "-" => String::new(),
        _ => match prev.strip_prefix('-') {
            Some(rest) => rest.to_string(),
            None => format!("-{prev}"),
        },
    }
}
