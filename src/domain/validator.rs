//! Input word validation

use crate::error::{Result, SweepError};
use regex::Regex;

/// Accepted shape of the word being swept: one or more lowercase ASCII letters.
pub const WORD_PATTERN: &str = r"^[a-z]+$";

/// Validate the word before any lookup work begins
pub fn validate_word(word: &str) -> Result<&str> {
    let pattern = Regex::new(WORD_PATTERN).map_err(|e| SweepError::internal(e.to_string()))?;

    if pattern.is_match(word) {
        Ok(word)
    } else {
        Err(crate::validation_error!(
            "The word can only contain lowercase alphabetical characters (got '{}')",
            word
        ))
    }
}
