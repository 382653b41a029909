//! Runtime values
//!
//! Everything a formula reads from its context or produces is a [`Value`]:
//! JSON-like scalars, lists and maps, or a Polars data frame or column.
//! Bindings subscript values through [`Value::index`] and [`Value::field`].

use polars::prelude::*;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;

use crate::error::operation_error;
use crate::Result;

/// A context value or evaluation result
#[derive(Clone)]
pub enum Value {
    /// Absent value
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Text
    String(String),
    /// Ordered list
    Array(Vec<Value>),
    /// String-keyed map
    Object(HashMap<String, Value>),
    /// Tabular source; subscripts select columns
    DataFrame(DataFrame),
    /// Single column; operations apply element-wise
    Series(Series),
}

impl Value {
    /// String value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// List value
    #[must_use]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(items)
    }

    /// Map value
    #[must_use]
    pub fn object(entries: HashMap<String, Value>) -> Self {
        Value::Object(entries)
    }

    /// Whether this is `Null`
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this is a column
    #[must_use]
    pub fn is_series(&self) -> bool {
        matches!(self, Value::Series(_))
    }

    /// Name of the value's type, as used in error messages
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::DataFrame(_) => "dataframe",
            Value::Series(_) => "series",
        }
    }

    /// Number of elements: characters, list items, map entries or rows
    #[must_use]
    pub fn element_count(&self) -> Option<usize> {
        Some(match self {
            Value::String(s) => s.chars().count(),
            Value::Array(items) => items.len(),
            Value::Object(entries) => entries.len(),
            Value::DataFrame(df) => df.height(),
            Value::Series(s) => s.len(),
            Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) => return None,
        })
    }

    /// Subscript by position
    ///
    /// Lists and columns yield the element at `idx`, counting from the end
    /// when negative. Data frames yield the column at that position. Maps
    /// are looked up by the decimal text of `idx`. Anything out of range is
    /// `Null`.
    pub fn index(&self, idx: i64) -> Result<Value> {
        match self {
            Value::Null => Ok(Value::Null),
            Value::Array(items) => Ok(position(idx, items.len())
                .and_then(|i| items.get(i).cloned())
                .unwrap_or(Value::Null)),
            Value::Series(s) => position(idx, s.len()).map_or(Ok(Value::Null), |i| element(s, i)),
            Value::DataFrame(df) => Ok(position(idx, df.width())
                .and_then(|i| df.select_at_idx(i))
                .map_or(Value::Null, |column| {
                    Value::Series(column.as_materialized_series().clone())
                })),
            Value::Object(entries) => Ok(entries
                .get(&idx.to_string())
                .cloned()
                .unwrap_or(Value::Null)),
            other => Err(operation_error(format!(
                "Cannot index into {}",
                other.type_name()
            ))),
        }
    }

    /// Subscript by key
    ///
    /// Maps yield the entry, data frames the column of that name. Missing
    /// keys are `Null`.
    pub fn field(&self, key: &str) -> Result<Value> {
        match self {
            Value::Null => Ok(Value::Null),
            Value::Object(entries) => Ok(entries.get(key).cloned().unwrap_or(Value::Null)),
            Value::DataFrame(df) => Ok(df.column(key).map_or(Value::Null, |column| {
                Value::Series(column.as_materialized_series().clone())
            })),
            other => Err(operation_error(format!(
                "Cannot access field '{}' on {}",
                key,
                other.type_name()
            ))),
        }
    }

    /// JSON rendering; frames become a list of row objects
    pub fn to_json(&self) -> Result<JsonValue> {
        Ok(match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::from(*b),
            Value::Int(i) => JsonValue::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .ok_or_else(|| operation_error(format!("{f} has no JSON representation")))?,
            Value::String(s) => JsonValue::from(s.as_str()),
            Value::Array(items) => JsonValue::Array(
                items.iter().map(Value::to_json).collect::<Result<_>>()?,
            ),
            Value::Object(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(k, v)| -> Result<(String, JsonValue)> { Ok((k.clone(), v.to_json()?)) })
                    .collect::<Result<_>>()?,
            ),
            Value::Series(s) => JsonValue::Array(
                series_to_values(s)?
                    .iter()
                    .map(Value::to_json)
                    .collect::<Result<_>>()?,
            ),
            Value::DataFrame(df) => JsonValue::Array(frame_rows(df)?),
        })
    }

    /// Value from parsed JSON; numbers prefer integers
    #[must_use]
    pub fn from_json(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_f64().map(Value::Float))
                .unwrap_or(Value::Null),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            JsonValue::Object(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

fn frame_rows(df: &DataFrame) -> Result<Vec<JsonValue>> {
    let columns: Vec<&Series> = df
        .get_columns()
        .iter()
        .map(Column::as_materialized_series)
        .collect();

    (0..df.height())
        .map(|row| {
            columns
                .iter()
                .map(|s| -> Result<(String, JsonValue)> {
                    Ok((s.name().to_string(), element(s, row)?.to_json()?))
                })
                .collect::<Result<serde_json::Map<_, _>>>()
                .map(JsonValue::Object)
        })
        .collect()
}

fn position(idx: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let resolved = if idx < 0 { len + idx } else { idx };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

/// Element `idx` of a column
///
/// Element types without a scalar counterpart are rendered as text.
fn element(series: &Series, idx: usize) -> Result<Value> {
    let any = series
        .get(idx)
        .map_err(|e| operation_error(format!("Series access error: {e}")))?;

    Ok(match any {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::Int8(i) => Value::Int(i.into()),
        AnyValue::Int16(i) => Value::Int(i.into()),
        AnyValue::Int32(i) => Value::Int(i.into()),
        AnyValue::Int64(i) => Value::Int(i),
        AnyValue::UInt8(i) => Value::Int(i.into()),
        AnyValue::UInt16(i) => Value::Int(i.into()),
        AnyValue::UInt32(i) => Value::Int(i.into()),
        AnyValue::UInt64(i) => i64::try_from(i).map_or(Value::Float(i as f64), Value::Int),
        AnyValue::Float32(f) => Value::Float(f.into()),
        AnyValue::Float64(f) => Value::Float(f),
        AnyValue::String(s) => Value::string(s),
        AnyValue::StringOwned(s) => Value::string(s.as_str()),
        other => Value::String(other.to_string()),
    })
}

/// Every element of a column
pub fn series_to_values(series: &Series) -> Result<Vec<Value>> {
    (0..series.len()).map(|idx| element(series, idx)).collect()
}

/// Build a column from scalars
///
/// The element type follows the first non-null value. Integers mixed with
/// floats widen to floats; any other mix is an error.
pub fn values_to_series(name: PlSmallStr, values: &[Value]) -> Result<Series> {
    let Some(first) = values.iter().find(|v| !v.is_null()) else {
        return Ok(Series::full_null(name, values.len(), &DataType::Null));
    };
    let widen = values.iter().any(|v| matches!(v, Value::Float(_)));

    let mismatch = |v: &Value| {
        operation_error(format!(
            "Cannot build a column from mixed {} and {} values",
            first.type_name(),
            v.type_name()
        ))
    };

    macro_rules! collect_as {
        ($ty:ty, $($pat:pat => $out:expr),+) => {{
            let items = values
                .iter()
                .map(|v| match v {
                    Value::Null => Ok(None),
                    $($pat => Ok(Some($out)),)+
                    other => Err(mismatch(other)),
                })
                .collect::<Result<Vec<Option<$ty>>>>()?;
            Series::new(name, items)
        }};
    }

    Ok(match first {
        Value::Int(_) | Value::Float(_) if widen => collect_as!(f64,
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f
        ),
        Value::Int(_) => collect_as!(i64, Value::Int(i) => *i),
        Value::Bool(_) => collect_as!(bool, Value::Bool(b) => *b),
        Value::String(_) => collect_as!(&str, Value::String(s) => s.as_str()),
        other => {
            return Err(operation_error(format!(
                "Cannot build a column from {} values",
                other.type_name()
            )))
        }
    })
}

/// Truthiness: null, false, zero, NaN and empty containers are false
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Float(f) => *f != 0.0 && !f.is_nan(),
        other => other.element_count().is_some_and(|n| n > 0),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::{Array, Bool, DataFrame, Float, Int, Null, Object, Series, String};
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Int(i), Float(f)) | (Float(f), Int(i)) => *i as f64 == *f,
            (String(a), String(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            (Object(a), Object(b)) => a == b,
            (DataFrame(a), DataFrame(b)) => a.equals_missing(b),
            (Series(a), Series(b)) => a.equals_missing(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::DataFrame(df) => write!(f, "DataFrame({}x{})", df.height(), df.width()),
            Value::Series(s) => write!(f, "Series({}, {}, len {})", s.name(), s.dtype(), s.len()),
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(i) => write!(f, "Int({i})"),
            Value::Float(x) => write!(f, "Float({x:?})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Array(items) => f.debug_list().entries(items).finish(),
            Value::Object(entries) => f.debug_map().entries(entries).finish(),
        }
    }
}

/// Compact text: strings are quoted, maps list keys in sorted order, columns
/// print as lists
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{item}")?;
            }
            f.write_str("]")
        }

        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "\"{s}\""),
            Value::Array(items) => list(f, items),
            Value::Object(entries) => {
                let mut keys: Vec<&String> = entries.keys().collect();
                keys.sort();
                f.write_str("{")?;
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "\"{key}\": {}", entries[key])?;
                }
                f.write_str("}")
            }
            Value::DataFrame(df) => write!(f, "{df}"),
            Value::Series(s) => match series_to_values(s) {
                Ok(items) => list(f, &items),
                Err(_) => write!(f, "Series[{}]({} values)", s.dtype(), s.len()),
            },
        }
    }
}

impl Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v.into())
            }
        })+
    };
}

value_from! {
    bool => Bool,
    i64 => Int,
    f64 => Float,
    &str => String,
    String => String,
    DataFrame => DataFrame,
    Series => Series,
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn frame() -> DataFrame {
        df! {
            "0" => [1i64, 2, 3],
            "1" => [4i64, 5, 6],
            "2" => ["Builder", "Baker", "Candle Stick Maker"],
        }
        .unwrap()
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Int(1).type_name(), "integer");
        assert_eq!(Value::DataFrame(frame()).type_name(), "dataframe");
        assert_eq!(
            Value::Series(Series::new("a".into(), [1i64])).type_name(),
            "series"
        );
    }

    #[test]
    fn test_index_list() {
        let list = Value::from(vec![10i64, 20, 30]);
        assert_eq!(list.index(0).unwrap(), Value::Int(10));
        assert_eq!(list.index(-1).unwrap(), Value::Int(30));
        assert_eq!(list.index(3).unwrap(), Value::Null);
        assert_eq!(list.index(-4).unwrap(), Value::Null);
        assert_eq!(Value::Null.index(0).unwrap(), Value::Null);
        assert!(Value::Int(1).index(0).is_err());
    }

    #[test]
    fn test_index_frame_selects_column() {
        let frame = Value::DataFrame(frame());
        match frame.index(1).unwrap() {
            Value::Series(s) => {
                assert_eq!(s.len(), 3);
                assert_eq!(Value::Series(s).index(0).unwrap(), Value::Int(4));
            }
            other => panic!("expected series, got {:?}", other),
        }
        assert_eq!(frame.index(5).unwrap(), Value::Null);
    }

    #[test]
    fn test_index_map_by_decimal_key() {
        let map = Value::object(HashMap::from([("0".to_string(), Value::string("zero"))]));
        assert_eq!(map.index(0).unwrap(), Value::string("zero"));
        assert_eq!(map.index(1).unwrap(), Value::Null);
    }

    #[test]
    fn test_field_access() {
        let map = Value::object(HashMap::from([("x".to_string(), Value::Int(5))]));
        assert_eq!(map.field("x").unwrap(), Value::Int(5));
        assert_eq!(map.field("missing").unwrap(), Value::Null);

        let frame = Value::DataFrame(frame());
        assert!(frame.field("2").unwrap().is_series());
        assert_eq!(frame.field("nope").unwrap(), Value::Null);
        assert!(Value::string("s").field("x").is_err());
    }

    #[test]
    fn test_json_conversion() {
        let json = json!({"a": [1, 2.5, "x", null, true]});
        assert_eq!(Value::from_json(json.clone()).to_json().unwrap(), json);

        let s = Value::Series(Series::new("a".into(), [1i64, 2, 3]));
        assert_eq!(s.to_json().unwrap(), json!([1, 2, 3]));

        let df = df! { "a" => [1i64, 2] }.unwrap();
        assert_eq!(
            Value::DataFrame(df).to_json().unwrap(),
            json!([{"a": 1}, {"a": 2}])
        );

        assert!(Value::Float(f64::NAN).to_json().is_err());
    }

    #[test]
    fn test_serialize_matches_json() {
        let value = Value::from(vec![Value::Int(1), Value::string("b")]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"[1,"b"]"#);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(vec![1i64, 2]).to_string(), "[1, 2]");
        assert_eq!(Value::string("A").to_string(), "\"A\"");
        let s = Value::Series(Series::new("a".into(), [1.5f64, 2.0]));
        assert_eq!(s.to_string(), "[1.5, 2]");
        let map = Value::object(HashMap::from([
            ("b".to_string(), Value::Int(2)),
            ("a".to_string(), Value::Null),
        ]));
        assert_eq!(map.to_string(), r#"{"a": null, "b": 2}"#);
    }

    #[test]
    fn test_values_to_series() {
        let s = values_to_series("a".into(), &[Value::Int(1), Value::Null, Value::Float(2.5)])
            .unwrap();
        assert_eq!(s.dtype(), &DataType::Float64);
        assert_eq!(
            series_to_values(&s).unwrap(),
            vec![Value::Float(1.0), Value::Null, Value::Float(2.5)]
        );

        let s = values_to_series("b".into(), &[Value::string("x"), Value::Null]).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(values_to_series("n".into(), &[Value::Null]).unwrap().len(), 1);

        assert!(values_to_series("c".into(), &[Value::Int(1), Value::string("x")]).is_err());
        assert!(values_to_series("d".into(), &[Value::from(vec![1i64])]).is_err());
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&Value::Int(0)));
        assert!(is_truthy(&Value::Float(0.5)));
        assert!(!is_truthy(&Value::string("")));
        assert!(!is_truthy(&Value::Float(f64::NAN)));
        assert!(is_truthy(&Value::from(vec![1i64])));
        assert!(!is_truthy(&Value::array(vec![])));
    }

    #[test]
    fn test_cross_type_numeric_equality() {
        assert_eq!(Value::Int(2), Value::Float(2.0));
        assert_ne!(Value::Int(2), Value::string("2"));
    }
}
