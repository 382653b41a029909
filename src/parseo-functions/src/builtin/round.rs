use crate::{Arity, FunctionRegistration};
use parseo_shared::value::Value;
use parseo_shared::{series_to_values, values_to_series, Result};

inventory::submit! {
    FunctionRegistration {
        name: "round",
        arity: Arity::Range(1, 2),
        func: builtin_round,
    }
}

/// Round half to even, optionally to `digits` decimal places
///
/// Without `digits` the result is an integer; with `digits` it stays a float.
pub fn builtin_round(args: &[Value]) -> Result<Value> {
    super::expect_args("round", Arity::Range(1, 2), args)?;

    let digits = match args.get(1) {
        None => None,
        Some(Value::Int(d)) => Some(i32::try_from(*d).map_err(|_| {
            parseo_shared::error::operation_error("round() digits out of range")
        })?),
        Some(other) => {
            return Err(parseo_shared::error::operation_error(format!(
                "round() digits must be an integer, got {}",
                other.type_name()
            )))
        }
    };

    match &args[0] {
        Value::Series(series) => {
            let rounded: Result<Vec<Value>> = series_to_values(series)?
                .iter()
                .map(|v| round_scalar(v, digits))
                .collect();
            Ok(Value::Series(values_to_series(series.name().clone(), &rounded?)?))
        }
        scalar => round_scalar(scalar, digits),
    }
}

fn round_scalar(value: &Value, digits: Option<i32>) -> Result<Value> {
    match (value, digits) {
        (Value::Null, _) => Ok(Value::Null),
        (Value::Int(i), None) => Ok(Value::Int(*i)),
        (Value::Int(i), Some(d)) if d >= 0 => Ok(Value::Int(*i)),
        (Value::Int(i), Some(d)) => round_scalar(&Value::Float(*i as f64), Some(d)),
        (Value::Float(f), None) => {
            let rounded = f.round_ties_even();
            if rounded.is_finite() && rounded.abs() < 9.2e18 {
                Ok(Value::Int(rounded as i64))
            } else {
                Err(parseo_shared::error::operation_error(format!(
                    "round() cannot convert {} to an integer",
                    f
                )))
            }
        }
        (Value::Float(f), Some(d)) if d >= 0 => {
            let scale = 10f64.powi(d);
            Ok(Value::Float((f * scale).round_ties_even() / scale))
        }
        (Value::Float(f), Some(d)) => {
            let scale = 10f64.powi(-d);
            Ok(Value::Float((f / scale).round_ties_even() * scale))
        }
        (other, _) => Err(parseo_shared::error::operation_error(format!(
            "round() requires numeric argument, got {}",
            other.type_name()
        ))),
    }
}
