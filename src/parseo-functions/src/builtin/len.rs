use crate::{Arity, FunctionRegistration};
use parseo_shared::value::Value;
use parseo_shared::Result;

inventory::submit! {
    FunctionRegistration {
        name: "len",
        arity: Arity::Exact(1),
        func: builtin_len,
    }
}

pub fn builtin_len(args: &[Value]) -> Result<Value> {
    super::expect_args("len", Arity::Exact(1), args)?;

    match args[0].element_count() {
        Some(n) => Ok(Value::Int(n as i64)),
        None => Err(parseo_shared::error::operation_error(format!(
            "len() is not defined for {}",
            args[0].type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_len() {
        assert_eq!(
            builtin_len(&[Value::from(vec![1i64, 2, 3])]).unwrap(),
            Value::Int(3)
        );
        assert_eq!(builtin_len(&[Value::string("Успех")]).unwrap(), Value::Int(5));

        let df = df! { "a" => [1i64, 2] }.unwrap();
        assert_eq!(builtin_len(&[Value::DataFrame(df)]).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_len_of_scalar_fails() {
        assert!(builtin_len(&[Value::Int(3)]).is_err());
    }
}
