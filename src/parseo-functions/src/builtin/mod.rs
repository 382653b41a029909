//! Standard functions
//!
//! Each function lives in its own module and submits a
//! [`FunctionRegistration`](crate::FunctionRegistration) through `inventory`.
//! None of them is whitelisted until a registry opts in by name.

pub mod abs;
pub mod coalesce;
pub mod len;
pub mod max;
pub mod mean;
pub mod min;
pub mod round;
pub mod sum;

use parseo_shared::value::Value;
use parseo_shared::Result;

use crate::{Arity, FunctionDescriptor, FunctionRegistration};

/// Names of every standard function, sorted
pub fn standard_function_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = inventory::iter::<FunctionRegistration>
        .into_iter()
        .map(|registration| registration.name)
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}

/// Descriptor for the standard function `name`
pub fn standard_function(name: &str) -> Option<FunctionDescriptor> {
    inventory::iter::<FunctionRegistration>
        .into_iter()
        .find(|registration| registration.name == name)
        .map(|registration| {
            FunctionDescriptor::new(registration.name, registration.arity, registration.func)
        })
}

/// Check the argument count inside an implementation
pub(crate) fn expect_args(name: &str, arity: Arity, args: &[Value]) -> Result<()> {
    if arity.accepts(args.len()) {
        Ok(())
    } else {
        Err(parseo_shared::error::operation_error(format!(
            "{}() expects {}, got {}",
            name,
            arity,
            args.len()
        )))
    }
}

/// Elements of a list or column argument
pub(crate) fn elements(name: &str, value: &Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items.clone()),
        Value::Series(series) => parseo_shared::series_to_values(series),
        other => Err(parseo_shared::error::operation_error(format!(
            "{}() requires a list or column, got {}",
            name,
            other.type_name()
        ))),
    }
}
