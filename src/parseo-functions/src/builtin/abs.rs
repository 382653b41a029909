use crate::{Arity, FunctionRegistration};
use parseo_shared::ops::{lt_values, neg_value, select_values};
use parseo_shared::value::Value;
use parseo_shared::Result;

inventory::submit! {
    FunctionRegistration {
        name: "abs",
        arity: Arity::Exact(1),
        func: builtin_abs,
    }
}

pub fn builtin_abs(args: &[Value]) -> Result<Value> {
    super::expect_args("abs", Arity::Exact(1), args)?;

    match &args[0] {
        Value::Null => Ok(Value::Null),
        Value::Int(i) => i
            .checked_abs()
            .map(Value::Int)
            .ok_or_else(|| parseo_shared::error::operation_error("abs() integer overflow")),
        Value::Float(f) => Ok(Value::Float(f.abs())),
        Value::Series(_) => {
            let column = &args[0];
            let negative = lt_values(column, &Value::Int(0))?;
            select_values(&negative, &neg_value(column)?, column)
        }
        other => Err(parseo_shared::error::operation_error(format!(
            "abs() requires numeric argument, got {}",
            other.type_name()
        ))),
    }
}
