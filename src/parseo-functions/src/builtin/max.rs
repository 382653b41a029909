use crate::{Arity, FunctionRegistration};
use parseo_shared::value::Value;
use parseo_shared::Result;
use std::cmp::Ordering;

inventory::submit! {
    FunctionRegistration {
        name: "max",
        arity: Arity::AtLeast(1),
        func: builtin_max,
    }
}

pub fn builtin_max(args: &[Value]) -> Result<Value> {
    super::min::extreme("max", args, Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_max_of_arguments() {
        assert_eq!(
            builtin_max(&[Value::Int(3), Value::Float(1.5), Value::Null]).unwrap(),
            Value::Int(3)
        );
    }

    #[test]
    fn test_max_of_column() {
        let column = Value::Series(Series::new("a".into(), [1.5f64, 7.25, 3.0]));
        assert_eq!(builtin_max(&[column]).unwrap(), Value::Float(7.25));
    }
}
