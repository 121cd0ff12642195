//! Quality gate: decides whether extracted text is worth sending to the LLM.

use thiserror::Error;

/// Reference threshold for analysable text.
pub const DEFAULT_MIN_TEXT_CHARS: usize = 50;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QualityError {
    #[error("no text extracted")]
    Empty,

    #[error("extracted text has {chars} characters, minimum is {min}")]
    TooShort { chars: usize, min: usize },
}

/// Rejects text too short to be worth an LLM call.
#[derive(Debug, Clone, Copy)]
pub struct QualityGate {
    min_chars: usize,
}

impl QualityGate {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    /// Returns the character count of the trimmed text on pass.
    pub fn check(&self, text: &str) -> Result<usize, QualityError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(QualityError::Empty);
        }
        let chars = text.chars().count();
        if chars < self.min_chars {
            return Err(QualityError::TooShort {
                chars,
                min: self.min_chars,
            });
        }
        Ok(chars)
    }
}

impl Default for QualityGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TEXT_CHARS)
    }
}
