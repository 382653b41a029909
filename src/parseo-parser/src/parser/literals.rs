//! Strings, numbers, booleans and null

use nom::{
    branch::alt,
    character::complete::{char, digit1},
    combinator::{map, map_res, opt, recognize, value},
    error::{Error, ErrorKind},
    IResult, Parser,
};

use super::utils::keyword;
use crate::ast::{Expr, Literal};

pub(crate) fn parse_literal(input: &str) -> IResult<&str, Expr> {
    map(
        alt((string_literal, number_literal, boolean_literal, null_literal)),
        Expr::Literal,
    )
    .parse(input)
}

/// Scan a double-quoted body, returning the closing quote offset and the
/// unescaped text
fn scan_escaped(body: &str) -> Option<(usize, String)> {
    let mut text = String::with_capacity(body.len());
    let mut iter = body.char_indices();
    while let Some((offset, c)) = iter.next() {
        match c {
            '"' => return Some((offset, text)),
            '\\' => {
                let (_, escaped) = iter.next()?;
                text.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    // quotes, backslashes and unknown escapes stand for themselves
                    other => other,
                });
            }
            _ => text.push(c),
        }
    }
    None
}

/// Single or double quoted text
///
/// A missing closing quote is a hard failure pointing at the opening quote.
fn string_literal(input: &str) -> IResult<&str, Literal> {
    let quote = match input.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
    };
    let body = &input[1..];

    let scanned = if quote == '"' {
        scan_escaped(body)
    } else {
        // Single-quoted strings are taken verbatim
        body.find('\'').map(|end| (end, body[..end].to_string()))
    };

    match scanned {
        Some((end, text)) => Ok((&body[end + 1..], Literal::String(text))),
        None => Err(nom::Err::Failure(Error::new(input, ErrorKind::Eof))),
    }
}

/// Unsigned integer or float
///
/// Integers that do not fit in `i64` fall back to floats. Signs are handled
/// by unary minus.
fn number_literal(input: &str) -> IResult<&str, Literal> {
    let exponent = (
        alt((char('e'), char('E'))),
        opt(alt((char('+'), char('-')))),
        digit1,
    );
    map_res(
        recognize((digit1, opt((char('.'), digit1)), opt(exponent))),
        |digits: &str| {
            digits
                .parse::<i64>()
                .map(Literal::Int)
                .or_else(|_| digits.parse::<f64>().map(Literal::Float))
        },
    )
    .parse(input)
}

/// `true`/`True` and `false`/`False`
fn boolean_literal(input: &str) -> IResult<&str, Literal> {
    alt((
        value(Literal::Bool(true), alt((keyword("true"), keyword("True")))),
        value(Literal::Bool(false), alt((keyword("false"), keyword("False")))),
    ))
    .parse(input)
}

fn null_literal(input: &str) -> IResult<&str, Literal> {
    value(Literal::Null, alt((keyword("null"), keyword("None")))).parse(input)
}
