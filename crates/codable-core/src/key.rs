//! Coding keys: the identifiers used for object fields and path segments.
//!
//! A [`CodingKey`] names one field by its string value and, optionally, an
//! integer value. Typed containers are parameterised over a caller-defined
//! key type (usually an enum declared with [`coding_keys!`]); the backend and
//! the [`CodingPath`](crate::CodingPath) only ever see the erased [`AnyKey`].

use std::fmt;

/// A field identifier with a string value and an optional integer value.
pub trait CodingKey {
    /// The string form of the key. Used as the object field name.
    fn string_value(&self) -> &str;

    /// The integer form of the key, if it has one.
    fn int_value(&self) -> Option<i64> {
        None
    }

    /// Reconstruct a key from its string form.
    ///
    /// Returns `None` if the string does not name a key of this type.
    fn from_string_value(value: &str) -> Option<Self>
    where
        Self: Sized;

    /// Reconstruct a key from its integer form.
    fn from_int_value(_value: i64) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}

/// Type-erased coding key.
///
/// Equality and hashing cover both the string and the integer value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnyKey {
    string_value: String,
    int_value: Option<i64>,
}

impl AnyKey {
    /// Key with only a string value.
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            string_value: value.into(),
            int_value: None,
        }
    }

    /// Key with an integer value; the string value is its decimal form.
    pub fn int(value: i64) -> Self {
        Self {
            string_value: value.to_string(),
            int_value: Some(value),
        }
    }

    /// Path segment for position `index` of an unkeyed container.
    pub fn index(index: usize) -> Self {
        Self {
            string_value: format!("Index {index}"),
            int_value: Some(index as i64),
        }
    }

    /// The synthetic key used by `super_encoder()` / `super_decoder()`.
    pub fn super_key() -> Self {
        Self::string("super")
    }

    /// Erase any coding key.
    pub fn of<K: CodingKey + ?Sized>(key: &K) -> Self {
        Self {
            string_value: key.string_value().to_owned(),
            int_value: key.int_value(),
        }
    }

    /// Recover a typed key, preferring the integer form when present.
    pub fn to_typed<K: CodingKey>(&self) -> Option<K> {
        self.int_value
            .and_then(K::from_int_value)
            .or_else(|| K::from_string_value(&self.string_value))
    }
}

impl CodingKey for AnyKey {
    fn string_value(&self) -> &str {
        &self.string_value
    }

    fn int_value(&self) -> Option<i64> {
        self.int_value
    }

    fn from_string_value(value: &str) -> Option<Self> {
        Some(Self::string(value))
    }

    fn from_int_value(value: i64) -> Option<Self> {
        Some(Self::int(value))
    }
}

impl fmt::Display for AnyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.string_value)
    }
}

impl From<DictionaryKey> for AnyKey {
    fn from(key: DictionaryKey) -> Self {
        Self::string(key.0)
    }
}

/// Synthetic key for mappings encoded as keyed objects.
///
/// Built purely from the stringified map key; it never carries an integer
/// value, so integer map keys round-trip through their decimal string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DictionaryKey(String);

impl DictionaryKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl CodingKey for DictionaryKey {
    fn string_value(&self) -> &str {
        &self.0
    }

    fn from_string_value(value: &str) -> Option<Self> {
        Some(Self::new(value))
    }

    fn from_int_value(value: i64) -> Option<Self> {
        Some(Self::new(value.to_string()))
    }
}

/// Declare a field-key enum and its [`CodingKey`] conformance.
///
/// ```
/// codable_core::coding_keys! {
///     pub enum PointKey {
///         X = "x",
///         Y = "y",
///     }
/// }
///
/// use codable_core::CodingKey;
/// assert_eq!(PointKey::X.string_value(), "x");
/// assert_eq!(PointKey::from_string_value("y"), Some(PointKey::Y));
/// ```
#[macro_export]
macro_rules! coding_keys {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident = $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::CodingKey for $name {
            fn string_value(&self) -> &str {
                match self {
                    $(Self::$variant => $value),+
                }
            }

            fn from_string_value(value: &str) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}
