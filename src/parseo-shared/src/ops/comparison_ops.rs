//! Comparison operations
//!
//! Scalars compare to a boolean; a column compared with a scalar or another
//! column yields a boolean column.

use std::cmp::Ordering;

use polars::prelude::*;

use super::utils::{compare_values, polars_error, series_operands};
use crate::value::Value;
use crate::Result;

/// The six comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl Comparison {
    /// Operator symbol as written in expressions
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }

    /// Apply the comparison to two values
    pub fn apply(self, a: &Value, b: &Value) -> Result<Value> {
        if let Some(operands) = series_operands(a, b) {
            let (left, right) = operands?;
            let mask = match self {
                Comparison::Eq => left.equal(&right),
                Comparison::Ne => left.not_equal(&right),
                Comparison::Lt => left.lt(&right),
                Comparison::Le => left.lt_eq(&right),
                Comparison::Gt => left.gt(&right),
                Comparison::Ge => left.gt_eq(&right),
            }
            .map_err(polars_error)?;
            return Ok(Value::Series(mask.into_series()));
        }

        let result = match self {
            Comparison::Eq => a == b,
            Comparison::Ne => a != b,
            Comparison::Lt => compare_values(a, b)? == Ordering::Less,
            Comparison::Le => compare_values(a, b)? != Ordering::Greater,
            Comparison::Gt => compare_values(a, b)? == Ordering::Greater,
            Comparison::Ge => compare_values(a, b)? != Ordering::Less,
        };
        Ok(Value::Bool(result))
    }
}

/// `a == b`
pub fn eq_values(a: &Value, b: &Value) -> Result<Value> {
    Comparison::Eq.apply(a, b)
}

/// `a != b`
pub fn ne_values(a: &Value, b: &Value) -> Result<Value> {
    Comparison::Ne.apply(a, b)
}

/// `a < b`
pub fn lt_values(a: &Value, b: &Value) -> Result<Value> {
    Comparison::Lt.apply(a, b)
}

/// `a <= b`
pub fn le_values(a: &Value, b: &Value) -> Result<Value> {
    Comparison::Le.apply(a, b)
}

/// `a > b`
pub fn gt_values(a: &Value, b: &Value) -> Result<Value> {
    Comparison::Gt.apply(a, b)
}

/// `a >= b`
pub fn ge_values(a: &Value, b: &Value) -> Result<Value> {
    Comparison::Ge.apply(a, b)
}
