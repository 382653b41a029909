//! Syntax errors reported by the formula parser

use thiserror::Error;

/// Reasons a formula fails to parse
///
/// Positions are byte offsets into the trimmed input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Nothing but whitespace
    #[error("Empty input")]
    EmptyInput,

    /// Text left over after a complete expression
    #[error("Unexpected token '{found}' at position {position}")]
    UnexpectedToken {
        /// Leading token of the remainder
        found: String,
        /// Offset of the remainder
        position: usize,
    },

    /// String literal without a closing quote
    #[error("Unterminated string literal starting at position {position}")]
    UnterminatedString {
        /// Offset of the opening quote
        position: usize,
    },

    /// Groups, calls or unary operators nested past the parser's limit
    #[error("Nesting deeper than {limit} levels at position {position}")]
    NestingTooDeep {
        /// Deepest nesting accepted
        limit: usize,
        /// Offset of the opening token that crossed the limit
        position: usize,
    },

    /// Anything else the grammar rejects
    #[error("Invalid syntax at position {position}: {message}")]
    InvalidSyntax {
        /// What the parser expected
        message: String,
        /// Offset where parsing stopped
        position: usize,
    },
}

impl ParseError {
    /// Offset of the failure, absent for empty input
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::EmptyInput => None,
            Self::UnexpectedToken { position, .. }
            | Self::UnterminatedString { position }
            | Self::NestingTooDeep { position, .. }
            | Self::InvalidSyntax { position, .. } => Some(*position),
        }
    }
}

/// Parser result
pub type Result<T> = std::result::Result<T, ParseError>;
