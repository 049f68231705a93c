//! Email address validation and normalization.
//!
//! The normalized form (trimmed, lower-cased) is the dedup key for leads, so
//! `" Foo@Bar.COM "` and `"foo@bar.com"` refer to the same lead.

use regex::Regex;
use std::sync::OnceLock;

/// Local part, `@`, and a domain containing at least one dot. No whitespace
/// anywhere and exactly one `@`.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    #[error("Email address is missing.")]
    Missing,

    #[error("Email address must be a string.")]
    NotAString,

    #[error("Email address is empty.")]
    Empty,

    #[error("Email address is not well formed.")]
    Malformed,
}

/// Check that `email` looks like a deliverable address.
///
/// Surrounding whitespace is ignored; whitespace inside the address is not.
pub fn validate_email(email: &str) -> Result<(), EmailValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(EmailValidationError::Empty);
    }
    if !email_regex().is_match(trimmed) {
        return Err(EmailValidationError::Malformed);
    }
    Ok(())
}

/// Trim and lower-case. Idempotent.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate a raw JSON `email` field and return its normalized form.
pub fn parse_email_field(
    value: Option<&serde_json::Value>,
) -> Result<String, EmailValidationError> {
    let value = value.ok_or(EmailValidationError::Missing)?;
    let email = value.as_str().ok_or(EmailValidationError::NotAString)?;
    validate_email(email)?;
    Ok(normalize_email(email))
}
