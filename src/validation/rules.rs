// Declarative field rules: an ordered list of predicate+message checks per
// field plus a transform that only runs when every check passed.

use super::errors::{FieldErrorSet, FieldPath};
use regex::Regex;
use std::sync::LazyLock;

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type Transform<T, O> = Box<dyn Fn(&T) -> O + Send + Sync>;

pub struct Check<T: ?Sized> {
    predicate: Predicate<T>,
    message: String,
}

impl<T: ?Sized> Check<T> {
    pub fn passes(&self, value: &T) -> bool {
        (self.predicate)(value)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub struct FieldRule<T: ?Sized, O> {
    checks: Vec<Check<T>>,
    transform: Transform<T, O>,
}

impl<T: ?Sized, O> FieldRule<T, O> {
    pub fn new(transform: impl Fn(&T) -> O + Send + Sync + 'static) -> Self {
        Self {
            checks: Vec::new(),
            transform: Box::new(transform),
        }
    }

    /// Append a check; checks run in the order they were added
    pub fn check(
        mut self,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
        message: impl Into<String>,
    ) -> Self {
        self.checks.push(Check {
            predicate: Box::new(predicate),
            message: message.into(),
        });
        self
    }

    /// Run every check against `value`, recording each failure under `path`.
    /// Returns the transformed value only when nothing failed.
    pub fn apply(&self, path: FieldPath, value: &T, errors: &mut FieldErrorSet) -> Option<O> {
        let mut failed = false;
        for check in &self.checks {
            if !check.passes(value) {
                errors.push(path, check.message());
                failed = true;
            }
        }
        if failed {
            None
        } else {
            Some((self.transform)(value))
        }
    }

    pub fn checks(&self) -> &[Check<T>] {
        &self.checks
    }
}

impl<T: ?Sized, O> std::fmt::Debug for FieldRule<T, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRule")
            .field(
                "checks",
                &self.checks.iter().map(Check::message).collect::<Vec<_>>(),
            )
            .finish()
    }
}

static EMAIL_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email grammar regex is valid")
});

/// Standard email grammar: dotted local part without leading or doubled dots,
/// and a domain with at least one label plus an alphabetic TLD.
pub fn is_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL_GRAMMAR.is_match(value)
}

/// Upper-case the first character of every space-separated word.
///
/// Expects words already checked by [`has_only_single_spaces`]; an empty
/// word passes through unchanged.
pub fn capitalize_words(value: &str) -> String {
    value
        .trim()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// True when the trimmed value splits on single spaces into non-empty words.
pub fn has_only_single_spaces(value: &str) -> bool {
    value.trim().split(' ').all(|word| !word.is_empty())
}

/// Numeric coercion of raw input text. Empty text coerces to zero,
/// unsigned `0x`/`0o`/`0b` literals are read in their radix, and anything
/// unparseable is `None`.
pub fn coerce_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    if let Some(value) = parse_radix_literal(trimmed) {
        return value;
    }
    trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// `Some(parsed)` when `text` carries a radix prefix, `None` otherwise.
fn parse_radix_literal(text: &str) -> Option<Option<f64>> {
    let (prefix, digits) = text.split_at_checked(2)?;
    let radix = match prefix.to_ascii_lowercase().as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };
    if digits.is_empty() {
        return Some(None);
    }
    Some(digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    }))
}
