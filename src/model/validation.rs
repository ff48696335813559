//! Field-level validation for quotes.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Loose email shape check: one '@', no whitespace, a dotted domain.
    pub(crate) static ref EMAIL_RE: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid");
}

/// Maximum accepted length for a line item label.
pub const MAX_LABEL_LEN: usize = 255;

/// A single validation failure, tied to the field that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted path of the offending field, e.g. `items[2].label`
    pub field: String,
    /// Human-readable message in French, ready for display
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a value against the email shape, ignoring empty input.
pub(crate) fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}
