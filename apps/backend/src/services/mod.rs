//! Business rules. Every function takes a connection (or transaction) and
//! returns `AppError`, so handlers can `?` straight through.

pub mod access;
pub mod assignments;
pub mod classes;
pub mod courses;
pub mod grades;
pub mod seed;
pub mod users;

use crate::error::AppError;

pub const MAX_NAME_LEN: usize = 100;

/// Trimmed value, rejecting blank or over-long input.
pub(crate) fn require_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Blank optional text collapses to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
