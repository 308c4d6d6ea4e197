//! Field-level request validation.
//!
//! Validators collect every violation instead of stopping at the first one,
//! so a client gets the full list of problems in one response.

use std::fmt;

use lazy_regex::regex_is_match;
use serde::Serialize;

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Ordered list of violations, in field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether `field` has at least one violation.
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&joined)
    }
}

/// Implemented by decoded request bodies.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Records a violation when `value` is blank. Returns whether the value was present,
/// so callers can skip format checks on missing fields.
pub fn required(errors: &mut ValidationErrors, field: &'static str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(field, format!("{field} is required"));
        false
    } else {
        true
    }
}

/// Length is counted in characters, not bytes.
pub fn length_between(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len < min || len > max {
        errors.push(
            field,
            format!("{field} must be between {min} and {max} characters"),
        );
    }
}

pub fn min_length(errors: &mut ValidationErrors, field: &'static str, value: &str, min: usize) {
    if value.chars().count() < min {
        errors.push(field, format!("{field} must be at least {min} characters"));
    }
}

/// Checked as given; surrounding whitespace fails.
pub fn email_format(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if !is_valid_email(value) {
        errors.push(field, format!("{field} must be a valid email address"));
    }
}

pub fn is_valid_email(value: &str) -> bool {
    value.len() <= 254
        && regex_is_match!(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
            value
        )
}
