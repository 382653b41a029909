//! The built-in `IF` rewrite
//!
//! `IF(condition, then, else)` never survives to evaluation: it is replaced
//! by a [`Expr::Conditional`] node whose branches are rewritten afterwards
//! like any other subtree.

use parseo_parser::Expr;

use crate::{Arity, CallRewrite, FunctionDescriptor, ValidationError};

/// Name of the built-in conditional function
pub const CONDITIONAL_FUNCTION: &str = "IF";

/// Rewrites a three-argument call into a conditional node
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionalRewrite;

impl CallRewrite for ConditionalRewrite {
    fn validate(&self, name: &str, args: &[Expr]) -> Result<(), ValidationError> {
        match args.first() {
            Some(condition) if !condition.is_boolean_kind() => {
                Err(ValidationError::ConditionKind {
                    name: name.to_string(),
                    found: condition.kind(),
                })
            }
            _ => Ok(()),
        }
    }

    fn rewrite(&self, name: &str, args: Vec<Expr>) -> Result<Expr, ValidationError> {
        let found = args.len();
        let [condition, then_branch, else_branch]: [Expr; 3] =
            args.try_into().map_err(|_| ValidationError::Arity {
                name: name.to_string(),
                expected: Arity::Exact(3),
                found,
            })?;

        Ok(Expr::Conditional {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }
}

/// Descriptor for the built-in `IF`
pub fn conditional_descriptor() -> FunctionDescriptor {
    FunctionDescriptor::rewriting(CONDITIONAL_FUNCTION, Arity::Exact(3), ConditionalRewrite)
}
