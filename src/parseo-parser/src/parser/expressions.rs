//! Expression parsing
//!
//! Entry point of the precedence chain and the primary expressions:
//! parenthesised groups, literals, calls, attribute access and bare names.
//! Every parser takes the current nesting depth.

use nom::{
    branch::alt,
    character::complete::char,
    combinator::map,
    multi::separated_list0,
    sequence::{delimited, preceded, terminated},
    IResult, Parser,
};

use crate::ast::Expr;

use super::identifiers::{parse_attribute, parse_name};
use super::literals::parse_literal;
use super::operators::parse_or_expr;
use super::utils::{nested, ws};

/// Parse an expression (main expression parser with precedence)
#[inline]
pub(crate) fn parse_expr(input: &str, depth: usize) -> IResult<&str, Expr> {
    parse_or_expr(input, depth)
}

/// Parse function call with parentheses (func(arg, ...))
pub(crate) fn parse_function_call<'a>(input: &'a str, depth: usize) -> IResult<&'a str, Expr> {
    let (rest, name) = terminated(parse_name, (ws, char('('))).parse(input)?;
    let inner = nested(input, depth)?;
    let (rest, args) = terminated(
        separated_list0(delimited(ws, char(','), ws), move |i: &'a str| {
            parse_expr(i, inner)
        }),
        (ws, char(')')),
    )
    .parse(rest)?;
    Ok((rest, Expr::FunctionCall { name, args }))
}

/// Parse parenthesized expression
pub(crate) fn parse_paren_expr<'a>(input: &'a str, depth: usize) -> IResult<&'a str, Expr> {
    let (rest, _) = char('(').parse(input)?;
    let inner = nested(input, depth)?;
    terminated(move |i: &'a str| parse_expr(i, inner), (ws, char(')'))).parse(rest)
}

/// Parse primary expressions
pub(crate) fn parse_primary_expr<'a>(input: &'a str, depth: usize) -> IResult<&'a str, Expr> {
    preceded(
        ws,
        alt((
            move |i: &'a str| parse_paren_expr(i, depth),
            parse_literal,
            move |i: &'a str| parse_function_call(i, depth),
            parse_attribute,
            map(parse_name, Expr::Name),
        )),
    )
    .parse(input)
}
