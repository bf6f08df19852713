//! Field checks shared by the resource payloads. Each returns a
//! `BadRequest` naming the offending field.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email regex is valid")
});

/// Reject values that are empty or whitespace only.
pub fn not_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} may not be blank.")));
    }
    Ok(())
}

/// Reject values longer than `max` characters.
pub fn max_chars(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::BadRequest(format!(
            "{field} must have no more than {max} characters."
        )));
    }
    Ok(())
}

/// Required short text: non-blank and at most `max` characters.
pub fn short_text(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    not_blank(field, value)?;
    max_chars(field, value, max)
}

pub fn email(value: &str) -> Result<(), AppError> {
    max_chars("email", value, 254)?;
    if !EMAIL_RE.is_match(value) {
        return Err(AppError::BadRequest(
            "Enter a valid email address.".to_string(),
        ));
    }
    Ok(())
}

/// Usernames follow the usual `letters, digits and @/./+/-/_` rule.
pub fn username(value: &str) -> Result<(), AppError> {
    short_text("username", value, 150)?;
    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(AppError::BadRequest(
            "username may contain only letters, numbers, and @/./+/-/_ characters.".to_string(),
        ));
    }
    Ok(())
}
