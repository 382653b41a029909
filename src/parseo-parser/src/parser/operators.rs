//! Operator expression parsing
//!
//! Precedence climbs from `or` (loosest) through `and`, `not`, comparisons,
//! additive and multiplicative operators down to unary minus.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::{map, opt},
    multi::many0,
    sequence::{delimited, preceded},
    IResult, Parser,
};

use crate::ast::{BinaryOperator, BoolOperator, CompareOperator, Expr, Literal, UnaryOperator};

use super::expressions::parse_primary_expr;
use super::utils::{keyword, nested, ws};

fn bool_chain(op: BoolOperator, first: Expr, rest: Vec<Expr>) -> Expr {
    if rest.is_empty() {
        return first;
    }
    let mut operands = Vec::with_capacity(rest.len() + 1);
    operands.push(first);
    operands.extend(rest);
    Expr::BoolOp { op, operands }
}

/// Parse logical OR expressions
pub(crate) fn parse_or_expr<'a>(input: &'a str, depth: usize) -> IResult<&'a str, Expr> {
    let operand = move |i: &'a str| parse_and_expr(i, depth);
    map(
        (
            operand,
            many0(preceded(delimited(ws, keyword("or"), ws), operand)),
        ),
        |(first, rest)| bool_chain(BoolOperator::Or, first, rest),
    )
    .parse(input)
}

/// Parse logical AND expressions
pub(crate) fn parse_and_expr<'a>(input: &'a str, depth: usize) -> IResult<&'a str, Expr> {
    let operand = move |i: &'a str| parse_not_expr(i, depth);
    map(
        (
            operand,
            many0(preceded(delimited(ws, keyword("and"), ws), operand)),
        ),
        |(first, rest)| bool_chain(BoolOperator::And, first, rest),
    )
    .parse(input)
}

/// Parse logical NOT expressions
pub(crate) fn parse_not_expr<'a>(input: &'a str, depth: usize) -> IResult<&'a str, Expr> {
    let negated = move |i: &'a str| -> IResult<&'a str, Expr> {
        let (rest, _) = (ws, keyword("not"), ws).parse(i)?;
        let inner = nested(i, depth)?;
        let (rest, expr) = parse_not_expr(rest, inner)?;
        let expr = Expr::UnaryOp {
            op: UnaryOperator::Not,
            expr: Box::new(expr),
        };
        Ok((rest, expr))
    };
    alt((negated, move |i: &'a str| parse_comparison_expr(i, depth))).parse(input)
}

/// Parse comparison expressions
///
/// Comparisons do not chain: `a < b < c` leaves `< c` unconsumed.
pub(crate) fn parse_comparison_expr<'a>(input: &'a str, depth: usize) -> IResult<&'a str, Expr> {
    let operand = move |i: &'a str| parse_additive_expr(i, depth);
    map(
        (
            operand,
            opt((
                delimited(
                    ws,
                    alt((
                        tag(">="),
                        tag("<="),
                        tag("!="),
                        tag("=="),
                        tag(">"),
                        tag("<"),
                    )),
                    ws,
                ),
                operand,
            )),
        ),
        |(left, rest)| match rest {
            None => left,
            Some((op, right)) => {
                let op = match op {
                    ">=" => CompareOperator::Ge,
                    "<=" => CompareOperator::Le,
                    "!=" => CompareOperator::Ne,
                    "==" => CompareOperator::Eq,
                    ">" => CompareOperator::Gt,
                    _ => CompareOperator::Lt,
                };
                Expr::Compare {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                }
            }
        },
    )
    .parse(input)
}

/// Parse additive expressions (+, -)
pub(crate) fn parse_additive_expr<'a>(input: &'a str, depth: usize) -> IResult<&'a str, Expr> {
    let operand = move |i: &'a str| parse_multiplicative_expr(i, depth);
    map(
        (
            operand,
            many0((delimited(ws, alt((char('+'), char('-'))), ws), operand)),
        ),
        |(first, rest)| {
            rest.into_iter().fold(first, |left, (op, right)| {
                let op = if op == '+' {
                    BinaryOperator::Add
                } else {
                    BinaryOperator::Sub
                };
                Expr::BinaryOp {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                }
            })
        },
    )
    .parse(input)
}

/// Parse multiplicative expressions (*, /)
pub(crate) fn parse_multiplicative_expr<'a>(
    input: &'a str,
    depth: usize,
) -> IResult<&'a str, Expr> {
    let operand = move |i: &'a str| parse_unary_expr(i, depth);
    map(
        (
            operand,
            many0((delimited(ws, alt((char('*'), char('/'))), ws), operand)),
        ),
        |(first, rest)| {
            rest.into_iter().fold(first, |left, (op, right)| {
                let op = if op == '*' {
                    BinaryOperator::Mul
                } else {
                    BinaryOperator::Div
                };
                Expr::BinaryOp {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                }
            })
        },
    )
    .parse(input)
}

/// Negate an operand, folding numeric literals
fn negate(expr: Expr) -> Expr {
    match expr {
        Expr::Literal(Literal::Int(i)) => match i.checked_neg() {
            Some(negated) => Expr::Literal(Literal::Int(negated)),
            #[allow(clippy::cast_precision_loss)]
            None => Expr::Literal(Literal::Float(-(i as f64))),
        },
        Expr::Literal(Literal::Float(f)) => Expr::Literal(Literal::Float(-f)),
        other => Expr::UnaryOp {
            op: UnaryOperator::Neg,
            expr: Box::new(other),
        },
    }
}

/// Parse unary minus
pub(crate) fn parse_unary_expr<'a>(input: &'a str, depth: usize) -> IResult<&'a str, Expr> {
    let minus = move |i: &'a str| -> IResult<&'a str, Expr> {
        let (rest, _) = (ws, char('-'), ws).parse(i)?;
        let inner = nested(i, depth)?;
        let (rest, operand) = parse_unary_expr(rest, inner)?;
        Ok((rest, negate(operand)))
    };
    alt((minus, move |i: &'a str| parse_primary_expr(i, depth))).parse(input)
}
