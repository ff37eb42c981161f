//! Error types for name derivation.

use thiserror::Error;

/// Errors returned by derivation functions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamesError {
    /// A required name was empty or only whitespace.
    #[error("{field} name is required")]
    EmptyName { field: &'static str },
}

/// Trim a required name, rejecting empty input.
pub(crate) fn require_name<'a>(
    value: &'a str,
    field: &'static str,
) -> Result<&'a str, NamesError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(NamesError::EmptyName { field });
    }
    Ok(trimmed)
}
