//! Logical and conditional operations
//!
//! Scalars follow truthiness rules and produce booleans. Boolean columns
//! combine element-wise.

use polars::prelude::*;

use super::utils::{broadcast, polars_error, series_operands};
use crate::value::{is_truthy, Value};
use crate::Result;

fn to_mask(series: &Series) -> Result<BooleanChunked> {
    let cast = series.cast(&DataType::Boolean).map_err(polars_error)?;
    Ok(cast.bool().map_err(polars_error)?.clone())
}

/// Logical AND of two already evaluated operands
pub fn and_values(a: &Value, b: &Value) -> Result<Value> {
    if let Some(operands) = series_operands(a, b) {
        let (left, right) = operands?;
        let mask = &to_mask(&left)? & &to_mask(&right)?;
        return Ok(Value::Series(mask.into_series()));
    }
    Ok(Value::Bool(is_truthy(a) && is_truthy(b)))
}

/// Logical OR of two already evaluated operands
pub fn or_values(a: &Value, b: &Value) -> Result<Value> {
    if let Some(operands) = series_operands(a, b) {
        let (left, right) = operands?;
        let mask = &to_mask(&left)? | &to_mask(&right)?;
        return Ok(Value::Series(mask.into_series()));
    }
    Ok(Value::Bool(is_truthy(a) || is_truthy(b)))
}

/// Logical negation
pub fn not_value(v: &Value) -> Result<Value> {
    match v {
        Value::Series(s) => {
            let mask = !&to_mask(s)?;
            Ok(Value::Series(mask.into_series()))
        }
        _ => Ok(Value::Bool(!is_truthy(v))),
    }
}

/// Pick between two branch values
///
/// A scalar condition selects one branch by truthiness. A column condition
/// selects element-wise; scalar branches are broadcast to its length and
/// null conditions select the else branch.
pub fn select_values(condition: &Value, then_value: &Value, else_value: &Value) -> Result<Value> {
    let Value::Series(cond) = condition else {
        return Ok(if is_truthy(condition) {
            then_value.clone()
        } else {
            else_value.clone()
        });
    };

    let mask = to_mask(cond)?.fill_null_with_values(false).map_err(polars_error)?;
    let name = cond.name().clone();
    let then_series = broadcast(then_value, name.clone(), cond.len())?;
    let else_series = broadcast(else_value, name, cond.len())?;

    then_series
        .zip_with(&mask, &else_series)
        .map(Value::Series)
        .map_err(polars_error)
}
