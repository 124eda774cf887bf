//! Field rules shared by the contact and feedback forms.
//!
//! Every rule is a pure function of the raw input: the value is trimmed,
//! checked for presence, then checked for shape. The first failing check
//! decides the message.

use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use regex::Regex;

use crate::form::ValidationError;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("email pattern must compile")
});

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10}$").expect("phone pattern must compile"));

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct FieldError {
    message: &'static str,
}

impl FieldError {
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

impl ValidationError for FieldError {
    fn message(&self) -> &str {
        self.message
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message)
    }
}

impl std::error::Error for FieldError {}

pub type RuleResult = Result<(), FieldError>;

/// Non-empty after trimming, otherwise `message`.
pub fn required(raw: &str, message: &'static str) -> RuleResult {
    if raw.trim().is_empty() {
        Err(FieldError::new(message))
    } else {
        Ok(())
    }
}

/// At least `min` characters after trimming, otherwise `message`.
pub fn min_chars(raw: &str, min: usize, message: &'static str) -> RuleResult {
    if raw.trim().chars().count() < min {
        Err(FieldError::new(message))
    } else {
        Ok(())
    }
}

pub fn email_shape(raw: &str, message: &'static str) -> RuleResult {
    if EMAIL_PATTERN.is_match(raw.trim()) {
        Ok(())
    } else {
        Err(FieldError::new(message))
    }
}

/// Keeps ASCII digits and `+`, drops everything else.
pub fn phone_digits(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// An optional leading `+` followed by exactly ten digits, once separators
/// are stripped.
pub fn phone_shape(raw: &str, message: &'static str) -> RuleResult {
    if PHONE_PATTERN.is_match(&phone_digits(raw)) {
        Ok(())
    } else {
        Err(FieldError::new(message))
    }
}
