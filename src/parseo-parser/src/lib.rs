//! parseo-parser: Parser for the parseo formula language
//!
//! This crate turns formula text into an Abstract Syntax Tree (AST) using
//! the nom parser combinator library. The AST is deliberately small: it
//! covers literals, bare names, one-level attribute access, calls,
//! arithmetic, comparisons, boolean combinators and conditionals, plus the
//! `Binding` node that later compilation stages substitute for names.
//!
//! # Quick Start
//!
//! ```rust
//! use parseo_parser::{Expr, Expression, ExpressionParser};
//!
//! let parser = ExpressionParser::new();
//! let expression: Expression = parser.parse("IF(C0 == 0, 'ok', 'fail')")?;
//!
//! match &expression.expr {
//!     Expr::FunctionCall { name, args } => {
//!         assert_eq!(name, "IF");
//!         assert_eq!(args.len(), 3);
//!     }
//!     _ => unreachable!(),
//! }
//! # Ok::<(), parseo_parser::ParseError>(())
//! ```
//!
//! # Supported Syntax
//!
//! - **Literals**: `42`, `1.5`, `2e3`, `'text'`, `"text\n"`, `true`, `False`, `null`, `None`
//! - **Names**: `M0`, `revenue`
//! - **Attribute access**: `config.rate` (exactly one level)
//! - **Function calls**: `IF(a > b, a, b)`, `max(M0, M1)`
//! - **Arithmetic**: `+`, `-`, `*`, `/`, unary `-`
//! - **Comparisons**: `==`, `!=`, `<`, `<=`, `>`, `>=` (non-chaining)
//! - **Logical operations**: `and`, `or`, `not`
//!
//! # Error Handling
//!
//! ```rust
//! use parseo_parser::{ExpressionParser, ParseError};
//!
//! let parser = ExpressionParser::new();
//! match parser.parse("M0 +* M1") {
//!     Err(ParseError::UnexpectedToken { found, position }) => {
//!         assert_eq!(found, "+");
//!         assert_eq!(position, 3);
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_lines
)]

pub mod ast;
pub mod error;
mod parser;
#[cfg(test)]
mod tests;

// Re-export main types
pub use ast::*;
pub use error::*;
pub use parser::*;

// Re-export shared types
pub use parseo_shared::VERSION;
