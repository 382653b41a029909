use crate::{Arity, FunctionRegistration};
use parseo_shared::value::Value;
use parseo_shared::Result;

inventory::submit! {
    FunctionRegistration {
        name: "mean",
        arity: Arity::Exact(1),
        func: builtin_mean,
    }
}

pub fn builtin_mean(args: &[Value]) -> Result<Value> {
    super::expect_args("mean", Arity::Exact(1), args)?;

    match &args[0] {
        Value::Series(series) => {
            if series.dtype().is_numeric() {
                Ok(series.mean().map(Value::Float).unwrap_or(Value::Null))
            } else {
                Err(parseo_shared::error::operation_error(format!(
                    "mean() requires a numeric column, got {}",
                    series.dtype()
                )))
            }
        }
        Value::Array(arr) => {
            let mut sum = 0.0;
            let mut count = 0;
            for val in arr {
                match val {
                    Value::Int(i) => {
                        sum += *i as f64;
                        count += 1;
                    }
                    Value::Float(f) => {
                        sum += *f;
                        count += 1;
                    }
                    Value::Null => {}
                    other => {
                        return Err(parseo_shared::error::operation_error(format!(
                            "mean() requires numeric elements, got {}",
                            other.type_name()
                        )))
                    }
                }
            }
            if count == 0 {
                Ok(Value::Null)
            } else {
                Ok(Value::Float(sum / f64::from(count)))
            }
        }
        other => Err(parseo_shared::error::operation_error(format!(
            "mean() requires a list or column, got {}",
            other.type_name()
        ))),
    }
}
