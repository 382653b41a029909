use crate::{Arity, FunctionRegistration};
use parseo_shared::value::Value;
use parseo_shared::Result;

inventory::submit! {
    FunctionRegistration {
        name: "coalesce",
        arity: Arity::Any,
        func: builtin_coalesce,
    }
}

pub fn builtin_coalesce(args: &[Value]) -> Result<Value> {
    for arg in args {
        if !matches!(arg, Value::Null) {
            return Ok(arg.clone());
        }
    }
    Ok(Value::Null)
}
