//! Typed access to a decoded payload and the path variables of a request.
//!
//! A payload is always wrapped in a synthetic root object, `{"_data": payload}`,
//! so the same navigation API works for objects, arrays and bare scalars. Path
//! variables captured by the router are injected into that root as siblings of
//! `"_data"`:
//!
//! ```
//! use segtrie::{Params, Value};
//!
//! let mut params = Params::new(Value::from_iter([("state", Value::from("open"))]));
//! params.inject_field("id", "42");
//!
//! assert_eq!(params.get("id")?.as_integer()?, 42);
//! assert_eq!(params.data().get("state")?.as_str()?, "open");
//! # Ok::<(), segtrie::Error>(())
//! ```
//!
//! Getters come in two flavours. Strict getters (`as_str`, `integer`, `long`,
//! `float`, `double`) demand the exact variant. Coercing getters (`as_integer`,
//! `as_long`, `as_float`, `as_double`) accept any numeric variant or a numeric
//! string, truncating toward zero when a float becomes an integer.

use crate::error::{Error, Result};
use crate::value::{Object, Value};

/// Key under which the decoded payload sits in the synthetic root.
pub const DATA_KEY: &str = "_data";

static NULL: Value = Value::Null;

/// Per-request params: the synthetic root object that owns the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    root: Value,
}

impl Params {
    /// Wrap a decoded payload as `{"_data": payload}`.
    #[must_use]
    pub fn new(payload: Value) -> Self {
        let mut root = Object::new();
        root.insert(DATA_KEY.to_string(), payload);
        Self {
            root: Value::Object(root),
        }
    }

    /// Accessor positioned at the synthetic root.
    #[must_use]
    pub fn root(&self) -> ParamRef<'_> {
        ParamRef::new(&self.root)
    }

    /// Shorthand for `root().get(key)`.
    pub fn get(&self, key: &str) -> Result<ParamRef<'_>> {
        self.root().get(key)
    }

    /// Accessor positioned at the decoded payload.
    #[must_use]
    pub fn data(&self) -> ParamRef<'_> {
        let payload = self
            .root
            .as_object()
            .and_then(|root| root.get(DATA_KEY))
            .unwrap_or(&NULL);
        ParamRef::new(payload)
    }

    /// Set `root[key] = String(value)`.
    ///
    /// A no-op when the root is not an object, which cannot happen for params
    /// built through [`Params::new`].
    pub fn inject_field(&mut self, key: &str, value: &str) {
        if let Some(root) = self.root.as_object_mut() {
            root.insert(key.to_string(), Value::String(value.to_string()));
        }
    }

    /// Give back the synthetic root, injected fields included.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.root
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::new(Value::Null)
    }
}

/// Borrowed cursor into a [`Params`] tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRef<'a> {
    value: &'a Value,
}

impl<'a> ParamRef<'a> {
    #[must_use]
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// The wrapped value.
    #[must_use]
    pub fn value(self) -> &'a Value {
        self.value
    }

    #[must_use]
    pub fn is_null(self) -> bool {
        self.value.is_null()
    }

    /// Navigate into an object field. A missing key yields a null accessor.
    pub fn get(self, key: &str) -> Result<ParamRef<'a>> {
        match self.value {
            Value::Object(map) => Ok(ParamRef::new(map.get(key).unwrap_or(&NULL))),
            other => Err(mismatch("object", other)),
        }
    }

    /// Navigate into an array element.
    pub fn index(self, index: usize) -> Result<ParamRef<'a>> {
        let items = self
            .value
            .as_array()
            .ok_or_else(|| mismatch("array", self.value))?;
        items
            .get(index)
            .map(ParamRef::new)
            .ok_or(Error::IndexOutOfRange {
                index,
                len: items.len(),
            })
    }

    /// Strict string getter.
    pub fn as_str(self) -> Result<&'a str> {
        match self.value {
            Value::String(s) => Ok(s),
            other => Err(mismatch("string", other)),
        }
    }

    /// Render any value as text. Never fails.
    #[must_use]
    pub fn to_string_lossy(self) -> String {
        self.value.to_string()
    }

    /// Strict 32-bit integer getter.
    pub fn integer(self) -> Result<i32> {
        match self.value {
            Value::Int(i) => Ok(*i),
            other => Err(mismatch("int", other)),
        }
    }

    /// Strict 64-bit integer getter.
    pub fn long(self) -> Result<i64> {
        match self.value {
            Value::Long(i) => Ok(*i),
            other => Err(mismatch("long", other)),
        }
    }

    /// Strict 32-bit float getter.
    pub fn float(self) -> Result<f32> {
        match self.value {
            Value::Float(x) => Ok(*x),
            other => Err(mismatch("float", other)),
        }
    }

    /// Strict 64-bit float getter.
    pub fn double(self) -> Result<f64> {
        match self.value {
            Value::Double(x) => Ok(*x),
            other => Err(mismatch("double", other)),
        }
    }

    /// Coerce to `i32`. Floats truncate toward zero; out-of-range values saturate.
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_integer(self) -> Result<i32> {
        match self.value {
            Value::Int(i) => Ok(*i),
            Value::Long(i) => Ok(saturate_i32(*i)),
            Value::Float(x) => Ok(*x as i32),
            Value::Double(x) => Ok(*x as i32),
            Value::String(s) => parse_numeric(s, "int"),
            other @ (Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_)) => {
                Err(mismatch("number", other))
            }
        }
    }

    /// Coerce to `i64`. Floats truncate toward zero; out-of-range values saturate.
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_long(self) -> Result<i64> {
        match self.value {
            Value::Int(i) => Ok(i64::from(*i)),
            Value::Long(i) => Ok(*i),
            Value::Float(x) => Ok(*x as i64),
            Value::Double(x) => Ok(*x as i64),
            Value::String(s) => parse_numeric(s, "long"),
            other @ (Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_)) => {
                Err(mismatch("number", other))
            }
        }
    }

    /// Coerce to `f32`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn as_float(self) -> Result<f32> {
        match self.value {
            Value::Int(i) => Ok(*i as f32),
            Value::Long(i) => Ok(*i as f32),
            Value::Float(x) => Ok(*x),
            Value::Double(x) => Ok(*x as f32),
            // Parsed at double precision first, then narrowed
            Value::String(s) => parse_numeric::<f64>(s, "float").map(|x| x as f32),
            other @ (Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_)) => {
                Err(mismatch("number", other))
            }
        }
    }

    /// Coerce to `f64`.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_double(self) -> Result<f64> {
        match self.value {
            Value::Int(i) => Ok(f64::from(*i)),
            Value::Long(i) => Ok(*i as f64),
            Value::Float(x) => Ok(f64::from(*x)),
            Value::Double(x) => Ok(*x),
            Value::String(s) => parse_numeric(s, "double"),
            other @ (Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_)) => {
                Err(mismatch("number", other))
            }
        }
    }
}

fn mismatch(expected: &'static str, found: &Value) -> Error {
    Error::InvalidType {
        expected,
        found: found.kind(),
    }
}

fn saturate_i32(i: i64) -> i32 {
    i32::try_from(i).unwrap_or(if i < 0 { i32::MIN } else { i32::MAX })
}

fn parse_numeric<T: std::str::FromStr>(s: &str, target: &'static str) -> Result<T> {
    s.parse().map_err(|_| Error::InvalidNumericString {
        value: s.to_string(),
        target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wrap(v: Value) -> Params {
        Params::new(v)
    }

    #[test]
    fn test_new_wraps_payload_under_data_key() {
        let p = wrap(Value::from(json!({"a": "b"})));
        let root = p.root().value().as_object().unwrap();
        assert_eq!(root.len(), 1);
        assert!(root.contains_key(DATA_KEY));
        assert_eq!(p.get("_data").unwrap().get("a").unwrap().as_str().unwrap(), "b");
    }

    #[test]
    fn test_missing_key_is_null_not_error() {
        let p = wrap(Value::from(json!({"a": 1})));
        assert!(p.data().get("missing").unwrap().is_null());
    }

    #[test]
    fn test_get_on_bare_string_is_invalid_type() {
        let p = wrap(Value::from("abc"));
        assert_eq!(
            p.data().get("x"),
            Err(Error::InvalidType {
                expected: "object",
                found: "string"
            })
        );
    }

    #[test]
    fn test_get_on_array_is_invalid_type() {
        let p = wrap(Value::from(json!(["a", "b"])));
        assert_eq!(
            p.data().get("a"),
            Err(Error::InvalidType {
                expected: "object",
                found: "array"
            })
        );
    }

    #[test]
    fn test_index_on_object_is_invalid_type() {
        let p = wrap(Value::from(json!({"a": "b"})));
        assert!(matches!(p.data().index(0), Err(Error::InvalidType { .. })));
    }

    #[test]
    fn test_strict_getters_reject_other_kinds() {
        assert!(ParamRef::new(&Value::Int(5)).as_str().is_err());
        assert!(ParamRef::new(&Value::from("abc")).integer().is_err());
        assert!(ParamRef::new(&Value::Int(5)).long().is_err());
        assert!(ParamRef::new(&Value::Double(5.0)).float().is_err());
        assert!(ParamRef::new(&Value::Float(5.0)).double().is_err());
        assert_eq!(ParamRef::new(&Value::Long(5)).long(), Ok(5));
        assert_eq!(ParamRef::new(&Value::Float(5.0)).float(), Ok(5.0));
    }

    #[test]
    fn test_long_to_int_saturates() {
        assert_eq!(ParamRef::new(&Value::Long(i64::MAX)).as_integer(), Ok(i32::MAX));
        assert_eq!(ParamRef::new(&Value::Long(i64::MIN)).as_integer(), Ok(i32::MIN));
        assert_eq!(ParamRef::new(&Value::Long(-12)).as_integer(), Ok(-12));
    }

    #[test]
    fn test_integer_string_must_fit_i32() {
        let big = Value::from("4294967296");
        assert!(matches!(
            ParamRef::new(&big).as_integer(),
            Err(Error::InvalidNumericString { target: "int", .. })
        ));
        assert_eq!(ParamRef::new(&big).as_long(), Ok(4_294_967_296));
    }

    #[test]
    fn test_float_string_does_not_coerce_to_integer() {
        let v = Value::from("5.5");
        assert!(ParamRef::new(&v).as_integer().is_err());
        assert_eq!(ParamRef::new(&v).as_double(), Ok(5.5));
        assert_eq!(ParamRef::new(&v).as_float(), Ok(5.5));
    }

    #[test]
    fn test_bool_and_null_do_not_coerce() {
        assert!(matches!(
            ParamRef::new(&Value::Bool(true)).as_long(),
            Err(Error::InvalidType { found: "bool", .. })
        ));
        assert!(matches!(
            ParamRef::new(&Value::Null).as_double(),
            Err(Error::InvalidType { found: "null", .. })
        ));
    }

    #[test]
    fn test_inject_field_sits_beside_data() {
        let mut p = wrap(Value::from(json!([1, 2])));
        p.inject_field("id", "7");
        assert_eq!(p.get("id").unwrap().as_str().unwrap(), "7");
        assert_eq!(p.data().index(1).unwrap().as_long().unwrap(), 2);
    }
}
