//! Error types shared across Lumen crates.

use thiserror::Error;

/// Errors raised while parsing a hex colour string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// The string did not contain 3 or 6 hex digits.
    #[error("invalid hex colour length: expected 3 or 6 digits, got {0}")]
    InvalidLength(usize),

    /// The string contained a non-hex character.
    #[error("invalid hex digit in colour: {0}")]
    InvalidDigit(String),
}

/// Result type alias for colour parsing.
pub type ColorResult<T> = Result<T, ColorParseError>;
