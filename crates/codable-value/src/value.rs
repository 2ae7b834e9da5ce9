//! The in-memory value tree.

use std::fmt;

use codable_core::{AnyKey, CodingPath, EncodingError, EncodingResult};
use indexmap::IndexMap;

/// An insertion-ordered object.
pub type Object = IndexMap<String, Value>;

/// A structured value produced by [`ValueEncoder`](crate::ValueEncoder) and
/// consumed by [`ValueDecoder`](crate::ValueDecoder).
///
/// Signed integers are stored as [`Int`](Value::Int), unsigned integers as
/// [`UInt`](Value::UInt), and both float widths as [`Float`](Value::Float).
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    /// Short name of the runtime kind, used in error descriptions.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::String(_) => "string",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Field lookup on an object; `None` for absent keys and non-objects.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|entries| entries.get(key))
    }

    /// Turn this slot into an object, keeping an existing one.
    pub(crate) fn object_entries(&mut self) -> &mut Object {
        if !matches!(self, Self::Object(_)) {
            *self = Self::Object(Object::new());
        }
        match self {
            Self::Object(entries) => entries,
            _ => unreachable!(),
        }
    }

    /// Turn this slot into an array, keeping an existing one.
    pub(crate) fn array_elements(&mut self) -> &mut Vec<Value> {
        if !matches!(self, Self::Array(_)) {
            *self = Self::Array(Vec::new());
        }
        match self {
            Self::Array(elements) => elements,
            _ => unreachable!(),
        }
    }

    /// Sort every object in the tree by key.
    pub fn sort_keys(&mut self) {
        match self {
            Self::Object(entries) => {
                entries.sort_keys();
                entries.values_mut().for_each(Value::sort_keys);
            }
            Self::Array(elements) => elements.iter_mut().for_each(Value::sort_keys),
            _ => {}
        }
    }

    /// Convert to a JSON tree.
    ///
    /// Fails with an invalid-value error, carrying the path of the offending
    /// element, if the tree holds a NaN or infinite float.
    pub fn to_json(&self) -> EncodingResult<serde_json::Value> {
        self.to_json_at(&CodingPath::root())
    }

    fn to_json_at(&self, path: &CodingPath) -> EncodingResult<serde_json::Value> {
        Ok(match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(v) => serde_json::Value::Bool(*v),
            Self::String(v) => serde_json::Value::String(v.clone()),
            Self::Int(v) => serde_json::Value::from(*v),
            Self::UInt(v) => serde_json::Value::from(*v),
            Self::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .ok_or_else(|| {
                    EncodingError::invalid_value(v.to_string(), path, "non-finite float cannot be represented in JSON")
                })?,
            Self::Array(elements) => serde_json::Value::Array(
                elements
                    .iter()
                    .enumerate()
                    .map(|(i, element)| element.to_json_at(&path.appending(&AnyKey::index(i))))
                    .collect::<EncodingResult<_>>()?,
            ),
            Self::Object(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| {
                        let json = value.to_json_at(&path.appending(&AnyKey::string(key.as_str())))?;
                        Ok((key.clone(), json))
                    })
                    .collect::<EncodingResult<_>>()?,
            ),
        })
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(v) => Self::Bool(v),
            serde_json::Value::String(v) => Self::String(v),
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Self::Int(v)
                } else if let Some(v) = n.as_u64() {
                    Self::UInt(v)
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::Array(elements) => {
                Self::Array(elements.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(entries) => Self::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )+
    };
}

value_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => UInt,
    u16 => UInt,
    u32 => UInt,
    u64 => UInt,
    f32 => Float,
    f64 => Float,
    String => String,
    &str => String,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Array(elements) => write!(f, "array({})", elements.len()),
            Self::Object(entries) => write!(f, "object({})", entries.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_numbers_pick_narrowest_kind() {
        assert_eq!(Value::from(json!(-3)), Value::Int(-3));
        assert_eq!(Value::from(json!(u64::MAX)), Value::UInt(u64::MAX));
        assert_eq!(Value::from(json!(1.5)), Value::Float(1.5));
    }

    #[test]
    fn json_object_keeps_field_order() {
        let value = Value::from(json!({"b": 1, "a": 2}));
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn sort_keys_is_recursive() {
        let mut value = Value::from(json!({"b": {"z": 1, "y": 2}, "a": [{"d": 0, "c": 0}]}));
        value.sort_keys();
        assert_eq!(
            serde_json::to_string(&value.to_json().unwrap()).unwrap(),
            r#"{"a":[{"c":0,"d":0}],"b":{"y":2,"z":1}}"#
        );
    }

    #[test]
    fn non_finite_float_reports_its_path() {
        let mut value = Value::from(json!({"points": [1.0, 2.0]}));
        value.object_entries()["points"].array_elements()[1] = Value::Float(f64::NAN);

        let err = value.to_json().unwrap_err();
        assert!(matches!(err, EncodingError::InvalidValue { .. }));
        assert_eq!(err.path().to_string(), "points.Index 1");
    }

    #[test]
    fn slot_conversion_keeps_existing_container() {
        let mut value = Value::from(json!({"a": 1}));
        value.object_entries().insert("b".into(), Value::from(2u8));
        assert_eq!(value.to_json().unwrap(), json!({"a": 1, "b": 2}));

        let mut scalar = Value::from(true);
        scalar.array_elements().push(Value::Null);
        assert_eq!(scalar, Value::Array(vec![Value::Null]));
    }

    #[test]
    fn display_and_kind() {
        assert_eq!(Value::from("hi").to_string(), "\"hi\"");
        assert_eq!(Value::Array(vec![]).to_string(), "array(0)");
        assert_eq!(Value::UInt(3).kind_name(), "uint");
        assert_eq!(Value::default(), Value::Null);
        assert!(Value::from(json!({"k": null})).get("k").unwrap().is_null());
    }
}
