//! Operation utilities
//!
//! This module contains helper functions used by multiple operation types.

#![allow(clippy::cast_precision_loss)]

use polars::prelude::*;

use crate::value::Value;
use crate::Result;

/// Compare two scalar values for ordering
pub fn compare_values(a: &Value, b: &Value) -> Result<std::cmp::Ordering> {
    use std::cmp::Ordering;

    match (a, b) {
        (Value::Null, Value::Null) => Ok(Ordering::Equal),
        (Value::Null, _) => Ok(Ordering::Less),
        (_, Value::Null) => Ok(Ordering::Greater),

        (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a
            .partial_cmp(b)
            .ok_or_else(|| crate::error::operation_error("Cannot compare NaN values")),
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),

        // Cross-type numeric comparisons
        (Value::Int(a), Value::Float(b)) => (*a as f64)
            .partial_cmp(b)
            .ok_or_else(|| crate::error::operation_error("Cannot compare NaN values")),
        (Value::Float(a), Value::Int(b)) => a
            .partial_cmp(&(*b as f64))
            .ok_or_else(|| crate::error::operation_error("Cannot compare NaN values")),

        _ => Err(crate::error::operation_error(format!(
            "Cannot compare values of types {} and {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

/// Repeat a scalar value into a column of `len` elements
///
/// A `Series` is returned unchanged. Lists, maps and data frames cannot be
/// broadcast.
pub fn broadcast(value: &Value, name: PlSmallStr, len: usize) -> Result<Series> {
    let series = match value {
        Value::Series(s) => s.clone(),
        Value::Null => Series::full_null(name, len, &DataType::Null),
        Value::Bool(b) => Series::new(name, vec![*b; len]),
        Value::Int(i) => Series::new(name, vec![*i; len]),
        Value::Float(f) => Series::new(name, vec![*f; len]),
        Value::String(s) => Series::new(name, vec![s.as_str(); len]),
        _ => {
            return Err(crate::error::operation_error(format!(
                "Cannot combine {} with a column",
                value.type_name()
            )))
        }
    };
    Ok(series)
}

/// Align a pair of operands as columns when either side is a column
///
/// Returns `None` when neither operand is a `Series`, so callers can fall
/// back to scalar semantics.
pub fn series_operands(a: &Value, b: &Value) -> Option<Result<(Series, Series)>> {
    let (name, len) = match (a, b) {
        (Value::Series(s), _) | (_, Value::Series(s)) => (s.name().clone(), s.len()),
        _ => return None,
    };

    Some(broadcast(a, name.clone(), len).and_then(|left| {
        let right = broadcast(b, name, len)?;
        Ok((left, right))
    }))
}

/// Convert a polars error into the shared error type
pub(crate) fn polars_error(err: PolarsError) -> anyhow::Error {
    crate::error::operation_error(format!("Column operation failed: {err}"))
}
