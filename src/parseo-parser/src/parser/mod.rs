//! Parser implementation for the parseo formula language
//!
//! This module contains the main parser that converts formula strings
//! into AST representations using nom parser combinators.

use nom::error::ErrorKind;

use crate::ast::Expression;
use crate::error::{ParseError, Result};

mod expressions;
mod identifiers;
mod literals;
mod operators;
mod utils;

use expressions::parse_expr;
use utils::is_ident_char;
pub use utils::MAX_NESTING;

/// Main parser for formula expressions
pub struct ExpressionParser {
    // future parser configuration could go here
}

impl ExpressionParser {
    /// Create a new parser instance
    pub fn new() -> Self {
        Self {}
    }

    /// Parse a formula string into an AST
    pub fn parse(&self, input: &str) -> Result<Expression> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let offset = |rest: &str| input.len() - rest.len();

        match parse_expr(input, 0) {
            Ok((rest, expr)) => {
                let rest = rest.trim_start();
                if rest.is_empty() {
                    Ok(Expression { expr })
                } else {
                    Err(ParseError::UnexpectedToken {
                        found: next_token(rest).to_string(),
                        position: offset(rest),
                    })
                }
            }
            Err(nom::Err::Failure(e)) if e.code == ErrorKind::Eof => {
                Err(ParseError::UnterminatedString {
                    position: offset(e.input),
                })
            }
            Err(nom::Err::Failure(e)) if e.code == ErrorKind::TooLarge => {
                Err(ParseError::NestingTooDeep {
                    limit: MAX_NESTING,
                    position: offset(e.input.trim_start()),
                })
            }
            Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
                let rest = e.input.trim_start();
                let message = if rest.is_empty() {
                    "unexpected end of input".to_string()
                } else {
                    format!("expected an expression before '{}'", next_token(rest))
                };
                Err(ParseError::InvalidSyntax {
                    message,
                    position: offset(rest),
                })
            }
            Err(nom::Err::Incomplete(_)) => Err(ParseError::InvalidSyntax {
                message: "incomplete input".to_string(),
                position: input.len(),
            }),
        }
    }
}

impl Default for ExpressionParser {
    fn default() -> Self {
        Self::new()
    }
}

/// The word or single symbol at the start of `rest`
fn next_token(rest: &str) -> &str {
    let word_len = rest
        .char_indices()
        .find(|&(_, c)| !is_ident_char(c))
        .map_or(rest.len(), |(i, _)| i);
    if word_len > 0 {
        &rest[..word_len]
    } else {
        rest.chars().next().map_or("", |c| &rest[..c.len_utf8()])
    }
}
