//! Identifier and attribute parsing

use nom::{
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::{map, recognize, verify},
    sequence::separated_pair,
    IResult, Parser,
};

use crate::ast::Expr;

use super::utils::{is_ident_char, KEYWORDS};

/// Parse any identifier, reserved words included
pub(crate) fn parse_identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize((
            take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
            take_while(is_ident_char),
        )),
        |s: &str| s.to_string(),
    )
    .parse(input)
}

/// Parse an identifier that is not a reserved word
pub(crate) fn parse_name(input: &str) -> IResult<&str, String> {
    verify(parse_identifier, |name: &String| {
        !KEYWORDS.contains(&name.as_str())
    })
    .parse(input)
}

/// Parse `base.attr`
pub(crate) fn parse_attribute(input: &str) -> IResult<&str, Expr> {
    map(
        separated_pair(parse_name, char('.'), parse_identifier),
        |(base, attr)| Expr::Attribute { base, attr },
    )
    .parse(input)
}
