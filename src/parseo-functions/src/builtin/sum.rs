use crate::{Arity, FunctionRegistration};
use parseo_shared::ops::add_values;
use parseo_shared::value::Value;
use parseo_shared::Result;

inventory::submit! {
    FunctionRegistration {
        name: "sum",
        arity: Arity::AtLeast(1),
        func: builtin_sum,
    }
}

/// Sum a list or column, or several numeric arguments
pub fn builtin_sum(args: &[Value]) -> Result<Value> {
    super::expect_args("sum", Arity::AtLeast(1), args)?;

    let items = match args {
        [single @ (Value::Array(_) | Value::Series(_))] => super::elements("sum", single)?,
        _ => args.to_vec(),
    };

    items
        .iter()
        .filter(|v| !v.is_null())
        .try_fold(Value::Int(0), |total, item| add_values(&total, item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_sum_of_list() {
        assert_eq!(
            builtin_sum(&[Value::from(vec![1i64, 2, 3])]).unwrap(),
            Value::Int(6)
        );
        assert_eq!(builtin_sum(&[Value::array(vec![])]).unwrap(), Value::Int(0));
    }

    #[test]
    fn test_sum_of_column_skips_nulls() {
        let column = Value::Series(Series::new("a".into(), [Some(1.5f64), None, Some(2.0)]));
        assert_eq!(builtin_sum(&[column]).unwrap(), Value::Float(3.5));
    }

    #[test]
    fn test_sum_of_arguments() {
        assert_eq!(
            builtin_sum(&[Value::Int(1), Value::Float(0.5)]).unwrap(),
            Value::Float(1.5)
        );
        assert!(builtin_sum(&[Value::from(vec![Value::string("a")])]).is_err());
    }
}
