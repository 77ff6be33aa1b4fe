// lits-embed - Type conversion traits
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Conversion between Rust types and Lits [`Value`]s.
//!
//! | Rust Type | Lits Type |
//! |-----------|-----------|
//! | `()` | `nil` |
//! | `bool` | boolean |
//! | `i64`, `usize`, `f64` | number |
//! | `String`, `&str` | string |
//! | `Vec<T>` | array |
//! | `HashMap<String, T>`, `BTreeMap<String, T>` | object |
//! | `Option<T>` | `T` or `nil` |
//!
//! Lits numbers are `f64`; converting to an integer type fails unless the
//! number is integral and in range.
//!
//! ```rust
//! use lits_embed::{FromLitsValue, IntoLitsValue, Value};
//!
//! let value = vec![1i64, 2, 3].into_lits_value();
//! assert_eq!(value.to_string(), "[1 2 3]");
//! assert_eq!(Vec::<i64>::from_lits_value(&value).unwrap(), vec![1, 2, 3]);
//! ```

use std::collections::{BTreeMap, HashMap};

use lits_core::{Error, Result, Value};

/// Convert a Rust type into a Lits value.
pub trait IntoLitsValue {
    fn into_lits_value(self) -> Value;
}

/// Convert a Lits value into a Rust type.
pub trait FromLitsValue: Sized {
    fn from_lits_value(value: &Value) -> Result<Self>;
}

pub fn to_lits<T: IntoLitsValue>(value: T) -> Value {
    value.into_lits_value()
}

pub fn from_lits<T: FromLitsValue>(value: &Value) -> Result<T> {
    T::from_lits_value(value)
}

// ============================================================================
// IntoLitsValue implementations
// ============================================================================

impl IntoLitsValue for Value {
    fn into_lits_value(self) -> Value {
        self
    }
}

impl IntoLitsValue for () {
    fn into_lits_value(self) -> Value {
        Value::Nil
    }
}

impl IntoLitsValue for bool {
    fn into_lits_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoLitsValue for f64 {
    fn into_lits_value(self) -> Value {
        Value::Number(self)
    }
}

impl IntoLitsValue for i64 {
    fn into_lits_value(self) -> Value {
        Value::Number(self as f64)
    }
}

impl IntoLitsValue for usize {
    fn into_lits_value(self) -> Value {
        Value::Number(self as f64)
    }
}

impl IntoLitsValue for String {
    fn into_lits_value(self) -> Value {
        Value::string(self)
    }
}

impl IntoLitsValue for &str {
    fn into_lits_value(self) -> Value {
        Value::string(self)
    }
}

impl<T: IntoLitsValue> IntoLitsValue for Vec<T> {
    fn into_lits_value(self) -> Value {
        Value::array(self.into_iter().map(IntoLitsValue::into_lits_value))
    }
}

impl<T: IntoLitsValue> IntoLitsValue for Option<T> {
    fn into_lits_value(self) -> Value {
        match self {
            Some(v) => v.into_lits_value(),
            None => Value::Nil,
        }
    }
}

impl<T: IntoLitsValue> IntoLitsValue for HashMap<String, T> {
    fn into_lits_value(self) -> Value {
        Value::object(self.into_iter().map(|(k, v)| (k, v.into_lits_value())))
    }
}

impl<T: IntoLitsValue> IntoLitsValue for BTreeMap<String, T> {
    fn into_lits_value(self) -> Value {
        Value::object(self.into_iter().map(|(k, v)| (k, v.into_lits_value())))
    }
}

// ============================================================================
// FromLitsValue implementations
// ============================================================================

impl FromLitsValue for Value {
    fn from_lits_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromLitsValue for () {
    fn from_lits_value(value: &Value) -> Result<Self> {
        match value {
            Value::Nil => Ok(()),
            other => Err(Error::type_error("nil", other.type_name())),
        }
    }
}

impl FromLitsValue for bool {
    fn from_lits_value(value: &Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(Error::type_error("boolean", other.type_name())),
        }
    }
}

impl FromLitsValue for f64 {
    fn from_lits_value(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) => Ok(*n),
            other => Err(Error::type_error("number", other.type_name())),
        }
    }
}

impl FromLitsValue for i64 {
    fn from_lits_value(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n < i64::MAX as f64 => {
                Ok(*n as i64)
            }
            Value::Number(n) => Err(Error::Internal(format!(
                "number {} is not representable as i64",
                n
            ))),
            other => Err(Error::type_error("integer", other.type_name())),
        }
    }
}

impl FromLitsValue for usize {
    fn from_lits_value(value: &Value) -> Result<Self> {
        match value {
            Value::Number(_) => value
                .as_index()
                .ok_or_else(|| Error::type_error("non-negative integer", "number")),
            other => Err(Error::type_error("non-negative integer", other.type_name())),
        }
    }
}

impl FromLitsValue for String {
    fn from_lits_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s.to_string()),
            other => Err(Error::type_error("string", other.type_name())),
        }
    }
}

impl<T: FromLitsValue> FromLitsValue for Vec<T> {
    fn from_lits_value(value: &Value) -> Result<Self> {
        match value {
            Value::Array(items) => items.iter().map(T::from_lits_value).collect(),
            other => Err(Error::type_error("array", other.type_name())),
        }
    }
}

impl<T: FromLitsValue> FromLitsValue for Option<T> {
    fn from_lits_value(value: &Value) -> Result<Self> {
        match value {
            Value::Nil => Ok(None),
            other => T::from_lits_value(other).map(Some),
        }
    }
}

impl<T: FromLitsValue> FromLitsValue for HashMap<String, T> {
    fn from_lits_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| Ok((k.to_string(), T::from_lits_value(v)?)))
                .collect(),
            other => Err(Error::type_error("object", other.type_name())),
        }
    }
}

impl<T: FromLitsValue> FromLitsValue for BTreeMap<String, T> {
    fn from_lits_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| Ok((k.to_string(), T::from_lits_value(v)?)))
                .collect(),
            other => Err(Error::type_error("object", other.type_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        assert_eq!(to_lits(()), Value::Nil);
        assert_eq!(to_lits(true), Value::Bool(true));
        assert_eq!(to_lits(3i64), Value::Number(3.0));
        assert_eq!(to_lits("hi"), Value::string("hi"));
        assert_eq!(from_lits::<f64>(&Value::Number(1.5)), Ok(1.5));
        assert_eq!(from_lits::<String>(&Value::string("x")), Ok("x".to_string()));
    }

    #[test]
    fn test_integers_must_be_integral() {
        assert_eq!(from_lits::<i64>(&Value::Number(-4.0)), Ok(-4));
        assert!(from_lits::<i64>(&Value::Number(1.5)).is_err());
        assert_eq!(from_lits::<usize>(&Value::Number(2.0)), Ok(2));
        assert!(from_lits::<usize>(&Value::Number(-1.0)).is_err());
    }

    #[test]
    fn test_option() {
        assert_eq!(to_lits(None::<bool>), Value::Nil);
        assert_eq!(from_lits::<Option<bool>>(&Value::Nil), Ok(None));
        assert_eq!(from_lits::<Option<bool>>(&Value::Bool(false)), Ok(Some(false)));
    }

    #[test]
    fn test_collections() {
        let mut map = HashMap::new();
        map.insert("a".to_string(), vec![1i64, 2]);
        let value = to_lits(map.clone());
        assert_eq!(from_lits::<HashMap<String, Vec<i64>>>(&value), Ok(map));
        assert!(from_lits::<Vec<i64>>(&Value::string("a")).is_err());
    }
}
