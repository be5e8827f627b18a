use thiserror::Error;

use crate::models::RuleEntry;

/// Reasons a contributed rule is refused before it reaches the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
  /// The handle key was empty.
  #[error("rule handle must not be empty")]
  EmptyHandle,
  /// A required field was empty.
  #[error("rule `{handle}` has an empty `{field}`")]
  EmptyField {
    /// Handle of the offending rule.
    handle: String,
    /// Name of the empty field.
    field: &'static str,
  },
  /// A field contained whitespace or control characters.
  #[error("rule `{handle}` has whitespace or control characters in `{field}`: {value:?}")]
  InvalidCharacters {
    /// Handle of the offending rule.
    handle: String,
    /// Name of the offending field.
    field: &'static str,
    /// Raw field value.
    value: String,
  },
  /// The library name contained a path separator.
  #[error("rule `{handle}` library `{library}` must be a single path segment")]
  NestedLibrary {
    /// Handle of the offending rule.
    handle: String,
    /// Raw library value.
    library: String,
  },
}

/// Check that a rule can produce a well-formed cdnjs URL.
pub fn validate_rule(handle: &str, rule: &RuleEntry) -> Result<(), RuleError> {
  if handle.is_empty() {
    return Err(RuleError::EmptyHandle);
  }

  check_characters(handle, "handle", handle)?;

  for (field, value) in [("library", &rule.library), ("file", &rule.file)] {
    if value.is_empty() {
      return Err(RuleError::EmptyField {
        handle: handle.to_string(),
        field,
      });
    }
    check_characters(handle, field, value)?;
  }
  check_characters(handle, "minified", &rule.minified)?;

  if rule.library.contains('/') {
    return Err(RuleError::NestedLibrary {
      handle: handle.to_string(),
      library: rule.library.clone(),
    });
  }

  Ok(())
}

fn check_characters(handle: &str, field: &'static str, value: &str) -> Result<(), RuleError> {
  if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
    return Err(RuleError::InvalidCharacters {
      handle: handle.to_string(),
      field,
      value: value.to_string(),
    });
  }
  Ok(())
}
