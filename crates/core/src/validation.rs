//! Field rule tables and their evaluation.
//!
//! A type exposes its rules as an explicit list of [`FieldCheck`]s: the
//! field's display name, its current value, and the rules that apply to it.
//! [`validate`] walks every field and collects one violation per failing
//! field (the first rule that fails for that field).

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("valid email regex")
});

/// Constraint on a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRule {
    /// Must be non-empty.
    Required,
    /// Must be an email address.
    Email,
}

/// Constraint on an integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntRule {
    Gte(i64),
    Lte(i64),
}

/// The rule that a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    Email,
    Gte(i64),
    Lte(i64),
}

impl From<TextRule> for Rule {
    fn from(rule: TextRule) -> Self {
        match rule {
            TextRule::Required => Rule::Required,
            TextRule::Email => Rule::Email,
        }
    }
}

impl From<IntRule> for Rule {
    fn from(rule: IntRule) -> Self {
        match rule {
            IntRule::Gte(n) => Rule::Gte(n),
            IntRule::Lte(n) => Rule::Lte(n),
        }
    }
}

/// A field's value together with the rules of its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str, &'static [TextRule]),
    Int(i64, &'static [IntRule]),
}

impl FieldValue<'_> {
    fn first_failure(&self) -> Option<Rule> {
        match *self {
            FieldValue::Text(s, rules) => rules
                .iter()
                .find(|rule| !text_passes(**rule, s))
                .map(|rule| Rule::from(*rule)),
            FieldValue::Int(n, rules) => rules
                .iter()
                .find(|rule| !int_passes(**rule, n))
                .map(|rule| Rule::from(*rule)),
        }
    }
}

/// One row of a rule table.
#[derive(Debug, Clone, Copy)]
pub struct FieldCheck<'a> {
    pub field: &'static str,
    pub value: FieldValue<'a>,
}

impl<'a> FieldCheck<'a> {
    pub fn text(field: &'static str, value: &'a str, rules: &'static [TextRule]) -> Self {
        Self {
            field,
            value: FieldValue::Text(value, rules),
        }
    }

    pub fn int(field: &'static str, value: i64, rules: &'static [IntRule]) -> Self {
        Self {
            field,
            value: FieldValue::Int(value, rules),
        }
    }
}

/// A failed rule on a named field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub rule: Rule,
}

impl Violation {
    pub fn message(&self) -> String {
        let field = self.field;
        match self.rule {
            Rule::Required => format!("Field {field} is required"),
            Rule::Email => format!("Field {field} must be a valid email address"),
            Rule::Gte(n) => format!("Field {field} must be greater than or equal to {n}"),
            Rule::Lte(n) => format!("Field {field} must be less than or equal to {n}"),
        }
    }
}

/// Every violation found in one validation pass. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.joined())]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// All messages joined with `", "`.
    pub fn joined(&self) -> String {
        self.violations
            .iter()
            .map(Violation::message)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Evaluate a rule table.
pub fn validate(checks: &[FieldCheck<'_>]) -> Result<(), ValidationErrors> {
    let violations: Vec<Violation> = checks
        .iter()
        .filter_map(|check| {
            check.value.first_failure().map(|rule| Violation {
                field: check.field,
                rule,
            })
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { violations })
    }
}

fn text_passes(rule: TextRule, s: &str) -> bool {
    match rule {
        TextRule::Required => !s.is_empty(),
        TextRule::Email => EMAIL_RE.is_match(s),
    }
}

fn int_passes(rule: IntRule, n: i64) -> bool {
    match rule {
        IntRule::Gte(min) => n >= min,
        IntRule::Lte(max) => n <= max,
    }
}
