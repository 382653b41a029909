//! Arithmetic operations
//!
//! This module contains mathematical operations on numeric values and columns.

#![allow(clippy::cast_precision_loss)]

use polars::prelude::*;

use super::utils::{polars_error, series_operands};
use crate::value::Value;
use crate::Result;

/// Add two values
///
/// Numbers add, strings and lists concatenate, columns add element-wise.
pub fn add_values(a: &Value, b: &Value) -> Result<Value> {
    if let Some(operands) = series_operands(a, b) {
        let (left, right) = operands?;
        return (&left + &right).map(Value::Series).map_err(polars_error);
    }

    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x
            .checked_add(*y)
            .map(Value::Int)
            .ok_or_else(|| crate::error::operation_error("Integer overflow in addition")),
        (Value::Float(x), Value::Float(y)) => Ok(Value::Float(x + y)),
        (Value::Int(x), Value::Float(y)) => Ok(Value::Float(*x as f64 + *y)),
        (Value::Float(x), Value::Int(y)) => Ok(Value::Float(*x + *y as f64)),
        (Value::String(x), Value::String(y)) => Ok(Value::String(format!("{x}{y}"))),
        (Value::Array(x), Value::Array(y)) => {
            let mut joined = x.clone();
            joined.extend(y.iter().cloned());
            Ok(Value::Array(joined))
        }
        _ => Err(crate::error::type_error("+", a.type_name(), b.type_name())),
    }
}

/// Subtract two values
pub fn sub_values(a: &Value, b: &Value) -> Result<Value> {
    if let Some(operands) = series_operands(a, b) {
        let (left, right) = operands?;
        return (&left - &right).map(Value::Series).map_err(polars_error);
    }

    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x
            .checked_sub(*y)
            .map(Value::Int)
            .ok_or_else(|| crate::error::operation_error("Integer overflow in subtraction")),
        (Value::Float(x), Value::Float(y)) => Ok(Value::Float(x - y)),
        (Value::Int(x), Value::Float(y)) => Ok(Value::Float(*x as f64 - *y)),
        (Value::Float(x), Value::Int(y)) => Ok(Value::Float(*x - *y as f64)),
        _ => Err(crate::error::type_error("-", a.type_name(), b.type_name())),
    }
}

/// Multiply two values
pub fn mul_values(a: &Value, b: &Value) -> Result<Value> {
    if let Some(operands) = series_operands(a, b) {
        let (left, right) = operands?;
        return (&left * &right).map(Value::Series).map_err(polars_error);
    }

    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x
            .checked_mul(*y)
            .map(Value::Int)
            .ok_or_else(|| crate::error::operation_error("Integer overflow in multiplication")),
        (Value::Float(x), Value::Float(y)) => Ok(Value::Float(x * y)),
        (Value::Int(x), Value::Float(y)) => Ok(Value::Float(*x as f64 * *y)),
        (Value::Float(x), Value::Int(y)) => Ok(Value::Float(*x * *y as f64)),
        _ => Err(crate::error::type_error("*", a.type_name(), b.type_name())),
    }
}

/// Divide two values
///
/// Division always produces floats. A scalar zero divisor is an error;
/// zero elements inside a column follow IEEE semantics (`inf`/`NaN`).
pub fn div_values(a: &Value, b: &Value) -> Result<Value> {
    if let Some(operands) = series_operands(a, b) {
        let (left, right) = operands?;
        let left = left.cast(&DataType::Float64).map_err(polars_error)?;
        let right = right.cast(&DataType::Float64).map_err(polars_error)?;
        return (&left / &right).map(Value::Series).map_err(polars_error);
    }

    let divisor = match b {
        Value::Int(y) if *y == 0 => return Err(crate::error::operation_error("Division by zero")),
        Value::Float(y) if *y == 0.0 => {
            return Err(crate::error::operation_error("Division by zero"))
        }
        Value::Int(y) => *y as f64,
        Value::Float(y) => *y,
        _ => return Err(crate::error::type_error("/", a.type_name(), b.type_name())),
    };

    match a {
        Value::Int(x) => Ok(Value::Float(*x as f64 / divisor)),
        Value::Float(x) => Ok(Value::Float(*x / divisor)),
        _ => Err(crate::error::type_error("/", a.type_name(), b.type_name())),
    }
}

/// Arithmetic negation
pub fn neg_value(v: &Value) -> Result<Value> {
    match v {
        Value::Int(i) => i
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| crate::error::operation_error("Integer overflow in negation")),
        Value::Float(f) => Ok(Value::Float(-f)),
        Value::Series(_) => sub_values(&Value::Int(0), v),
        _ => Err(crate::error::operation_error(format!(
            "Cannot negate {}",
            v.type_name()
        ))),
    }
}
