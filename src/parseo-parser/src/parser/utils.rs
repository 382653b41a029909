//! Shared combinators for the parser modules

use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, satisfy},
    combinator::not,
    error::{Error, ErrorKind},
    sequence::terminated,
    IResult, Parser,
};

/// Deepest nesting of groups, calls, `not` and unary minus the parser accepts
///
/// The grammar is recursive descent, so each level costs stack. The limit
/// stays well inside a 2 MiB thread stack in unoptimised builds.
pub const MAX_NESTING: usize = 32;

/// Words that can never be used as names
pub(crate) const KEYWORDS: &[&str] = &[
    "and", "or", "not", "true", "false", "null", "True", "False", "None",
];

pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Optional whitespace
pub(crate) fn ws(input: &str) -> IResult<&str, &str> {
    multispace0(input)
}

/// Match `kw` as a whole word
pub(crate) fn keyword<'a>(
    kw: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    terminated(tag(kw), not(satisfy(is_ident_char)))
}

/// Descend one nesting level from `depth`
///
/// `at` is the input at the opening token. Passing [`MAX_NESTING`] is a hard
/// failure so no alternative branch retries the same text.
pub(crate) fn nested(at: &str, depth: usize) -> Result<usize, nom::Err<Error<&str>>> {
    if depth < MAX_NESTING {
        Ok(depth + 1)
    } else {
        Err(nom::Err::Failure(Error::new(at, ErrorKind::TooLarge)))
    }
}
