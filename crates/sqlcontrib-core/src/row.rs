//! Result rows and typed value extraction.

use crate::Result;
use crate::error::{Error, TypeError};
use crate::value::Value;
use std::sync::Arc;

/// A single row handed back by an [`Executor`](crate::Executor).
///
/// Insert adapters only ever read generated keys out of rows, so lookup is
/// by column name, with an ASCII case-insensitive fallback: backends fold
/// unquoted aliases differently (Postgres lower-cases, Firebird upper-cases).
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Create a row from parallel column names and values.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self {
            columns: columns.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a value by column index.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Column names in result order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Get a value by column name. An exact match wins; otherwise the first
    /// column equal to `name` ignoring ASCII case.
    pub fn get_ignore_case(&self, name: &str) -> Option<&Value> {
        let index = self
            .columns
            .iter()
            .position(|c| c == name)
            .or_else(|| self.columns.iter().position(|c| c.eq_ignore_ascii_case(name)))?;
        self.values.get(index)
    }
}

/// Trait for converting from a `Value` to a typed value.
///
/// Generated property setters use this to turn the dynamic value they are
/// handed into the field's concrete type.
pub trait FromValue: Sized {
    /// Convert from a Value, returning an error if the conversion fails.
    #[allow(clippy::result_large_err)]
    fn from_value(value: &Value) -> Result<Self>;
}

fn mismatch(expected: &'static str, value: &Value) -> Error {
    Error::Type(TypeError {
        expected,
        actual: value.type_name().to_string(),
        column: None,
        rust_type: None,
    })
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_bool().ok_or_else(|| mismatch("bool", value))
    }
}

// Integer targets accept any integral source value that fits, so a BIGINT
// identity can be written back into an `i32` key field.
macro_rules! impl_from_value_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self> {
                    let v = value
                        .as_i64()
                        .ok_or_else(|| mismatch(stringify!($ty), value))?;
                    <$ty>::try_from(v).map_err(|_| {
                        Error::Type(TypeError {
                            expected: stringify!($ty),
                            actual: format!("value {} out of range", v),
                            column: None,
                            rust_type: None,
                        })
                    })
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, u8, u16, u32, u64);

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_i64().ok_or_else(|| mismatch("i64", value))
    }
}

#[allow(clippy::cast_possible_truncation)]
impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Float(v) => Ok(*v),
            other => other
                .as_f64()
                .map(|v| v as f32)
                .ok_or_else(|| mismatch("f32", other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_f64().ok_or_else(|| mismatch("f64", value))
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("String", value))
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_bytes()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| mismatch("Vec<u8>", value))
    }
}

impl FromValue for [u8; 16] {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Uuid(v) => Ok(*v),
            Value::Bytes(v) if v.len() == 16 => {
                let mut arr = [0u8; 16];
                arr.copy_from_slice(v);
                Ok(arr)
            }
            _ => Err(mismatch("UUID (16 bytes)", value)),
        }
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Json(v) => Ok(v.clone()),
            Value::Text(s) => serde_json::from_str(s).map_err(|e| {
                Error::Type(TypeError {
                    expected: "valid JSON",
                    actual: format!("invalid JSON: {}", e),
                    column: None,
                    rust_type: None,
                })
            }),
            _ => Err(mismatch("JSON", value)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_index_access() {
        let row = Row::new(
            vec!["id".to_string(), "name".to_string()],
            vec![Value::Int(1), Value::Text("Alice".to_string())],
        );

        assert_eq!(row.len(), 2);
        assert!(!row.is_empty());
        assert_eq!(row.columns(), ["id", "name"]);
        assert_eq!(row.get(0), Some(&Value::Int(1)));
        assert_eq!(row.get(2), None);
    }

    #[test]
    fn test_row_case_insensitive_lookup() {
        let row = Row::new(
            vec!["ID".to_string(), "tenant_id".to_string()],
            vec![Value::BigInt(7), Value::BigInt(3)],
        );

        assert_eq!(row.get_ignore_case("id"), Some(&Value::BigInt(7)));
        assert_eq!(row.get_ignore_case("TENANT_ID"), Some(&Value::BigInt(3)));
        assert_eq!(row.get_ignore_case("nope"), None);
    }

    #[test]
    fn test_exact_match_wins_over_case_fold() {
        let row = Row::new(
            vec!["Id".to_string(), "id".to_string()],
            vec![Value::Int(1), Value::Int(2)],
        );
        assert_eq!(row.get_ignore_case("id"), Some(&Value::Int(2)));
        assert_eq!(row.get_ignore_case("ID"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_integer_narrowing() {
        assert_eq!(i32::from_value(&Value::BigInt(9)).unwrap(), 9);
        assert!(i32::from_value(&Value::BigInt(i64::MAX)).is_err());
        assert!(u8::from_value(&Value::Int(-1)).is_err());
        assert_eq!(u64::from_value(&Value::Int(5)).unwrap(), 5);
    }

    #[test]
    fn test_type_mismatch_names_both_sides() {
        match i32::from_value(&Value::Text("x".to_string())) {
            Err(Error::Type(te)) => {
                assert_eq!(te.expected, "i32");
                assert_eq!(te.actual, "TEXT");
            }
            other => panic!("expected type error, got {other:?}"),
        }
    }

    #[test]
    fn test_option_from_null() {
        assert_eq!(Option::<i64>::from_value(&Value::Null).unwrap(), None);
        assert_eq!(
            Option::<i64>::from_value(&Value::Int(4)).unwrap(),
            Some(4)
        );
        assert!(Option::<i64>::from_value(&Value::Text("a".into())).is_err());
    }
}
