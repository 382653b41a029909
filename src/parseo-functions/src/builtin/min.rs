use crate::{Arity, FunctionRegistration};
use parseo_shared::ops::compare_values;
use parseo_shared::value::Value;
use parseo_shared::Result;
use std::cmp::Ordering;

inventory::submit! {
    FunctionRegistration {
        name: "min",
        arity: Arity::AtLeast(1),
        func: builtin_min,
    }
}

/// Pick the extreme non-null value
///
/// A single list or column argument is searched element-wise; several
/// arguments are compared with each other.
pub(crate) fn extreme(name: &str, args: &[Value], keep: Ordering) -> Result<Value> {
    super::expect_args(name, Arity::AtLeast(1), args)?;

    let candidates = match args {
        [single @ (Value::Array(_) | Value::Series(_))] => super::elements(name, single)?,
        _ => args.to_vec(),
    };

    let mut best: Option<Value> = None;
    for candidate in candidates.into_iter().filter(|v| !v.is_null()) {
        best = match best {
            Some(current) if compare_values(&candidate, &current)? != keep => Some(current),
            _ => Some(candidate),
        };
    }
    Ok(best.unwrap_or(Value::Null))
}

pub fn builtin_min(args: &[Value]) -> Result<Value> {
    extreme("min", args, Ordering::Less)
}
