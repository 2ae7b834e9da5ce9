//! Decoding from a [`Value`] tree.

use codable_core::{
    AnyKey, CodingKey, CodingPath, Decodable, Decoder, DecodingError, DecodingResult,
    KeyedDecodingContainerProtocol, SingleValueDecodingContainer,
    UnkeyedDecodingContainerProtocol, UserInfo,
};
use tracing::debug;

use crate::config::CodingConfig;
use crate::error::ValueResult;
use crate::value::{Object, Value};

static NULL: Value = Value::Null;

/// Decoder and single-value container over one node of the tree.
#[derive(Clone)]
pub(crate) struct NodeDecoder<'a> {
    node: &'a Value,
    path: CodingPath,
    user_info: &'a UserInfo,
    config: &'a CodingConfig,
}

impl<'a> NodeDecoder<'a> {
    pub(crate) fn new(
        node: &'a Value,
        path: CodingPath,
        user_info: &'a UserInfo,
        config: &'a CodingConfig,
    ) -> Self {
        Self {
            node,
            path,
            user_info,
            config,
        }
    }

    fn null_error(&self, expected: &str) -> DecodingError {
        DecodingError::value_not_found(expected, &self.path, format!("expected {expected} but found null"))
    }

    fn mismatch(&self, expected: &str) -> DecodingError {
        match self.node {
            Value::Null => self.null_error(expected),
            other => DecodingError::type_mismatch(
                expected,
                &self.path,
                format!("expected {expected} but found {}", other.kind_name()),
            ),
        }
    }

    fn out_of_range(&self, expected: &str) -> DecodingError {
        DecodingError::data_corrupted(&self.path, format!("number {} does not fit in {expected}", self.node))
    }

    fn into_keyed(self) -> DecodingResult<KeyedValueDecoder<'a>> {
        match self.node {
            Value::Object(entries) => Ok(KeyedValueDecoder {
                entries,
                path: self.path,
                user_info: self.user_info,
                config: self.config,
            }),
            _ => Err(self.mismatch("object")),
        }
    }

    fn into_unkeyed(self) -> DecodingResult<UnkeyedValueDecoder<'a>> {
        match self.node {
            Value::Array(elements) => Ok(UnkeyedValueDecoder {
                elements,
                index: 0,
                path: self.path,
                user_info: self.user_info,
                config: self.config,
            }),
            _ => Err(self.mismatch("array")),
        }
    }

    /// Integer conversion shared by every width.
    ///
    /// Out-of-range numbers and fractional floats are data-corrupted.
    /// Integral floats are accepted only when the config allows it.
    fn decode_integer<N>(&self, expected: &str) -> DecodingResult<N>
    where
        N: TryFrom<i64> + TryFrom<u64>,
    {
        match *self.node {
            Value::Int(v) => N::try_from(v).map_err(|_| self.out_of_range(expected)),
            Value::UInt(v) => N::try_from(v).map_err(|_| self.out_of_range(expected)),
            Value::Float(v) => {
                if !v.is_finite() || v.fract() != 0.0 {
                    return Err(DecodingError::data_corrupted(
                        &self.path,
                        format!("number {v} is not an integral {expected}"),
                    ));
                }
                if !self.config.accept_integral_floats {
                    return Err(self.mismatch(expected));
                }
                if v < 0.0 {
                    if v < i64::MIN as f64 {
                        return Err(self.out_of_range(expected));
                    }
                    N::try_from(v as i64).map_err(|_| self.out_of_range(expected))
                } else {
                    if v >= u64::MAX as f64 {
                        return Err(self.out_of_range(expected));
                    }
                    N::try_from(v as u64).map_err(|_| self.out_of_range(expected))
                }
            }
            _ => Err(self.mismatch(expected)),
        }
    }
}

impl Decoder for NodeDecoder<'_> {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn user_info(&self) -> &UserInfo {
        self.user_info
    }

    fn keyed(&self) -> DecodingResult<Box<dyn KeyedDecodingContainerProtocol + '_>> {
        Ok(Box::new(self.clone().into_keyed()?))
    }

    fn unkeyed(&self) -> DecodingResult<Box<dyn UnkeyedDecodingContainerProtocol + '_>> {
        Ok(Box::new(self.clone().into_unkeyed()?))
    }

    fn single_value_container(&self) -> DecodingResult<Box<dyn SingleValueDecodingContainer + '_>> {
        Ok(Box::new(self.clone()))
    }
}

macro_rules! integer_leaves {
    ($($method:ident -> $ty:ty),+ $(,)?) => {
        $(
            fn $method(&self) -> DecodingResult<$ty> {
                self.decode_integer(stringify!($ty))
            }
        )+
    };
}

impl SingleValueDecodingContainer for NodeDecoder<'_> {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn decode_nil(&self) -> bool {
        self.node.is_null()
    }

    fn decode_bool(&self) -> DecodingResult<bool> {
        match self.node {
            Value::Bool(v) => Ok(*v),
            _ => Err(self.mismatch("bool")),
        }
    }

    fn decode_string(&self) -> DecodingResult<String> {
        match self.node {
            Value::String(v) => Ok(v.clone()),
            _ => Err(self.mismatch("string")),
        }
    }

    integer_leaves! {
        decode_i8 -> i8,
        decode_i16 -> i16,
        decode_i32 -> i32,
        decode_i64 -> i64,
        decode_u8 -> u8,
        decode_u16 -> u16,
        decode_u32 -> u32,
        decode_u64 -> u64,
    }

    fn decode_f32(&self) -> DecodingResult<f32> {
        let wide = self.decode_f64().map_err(|err| match err {
            DecodingError::TypeMismatch { .. } | DecodingError::ValueNotFound { .. } => self.mismatch("f32"),
            other => other,
        })?;
        let narrow = wide as f32;
        if wide.is_finite() && narrow.is_infinite() {
            return Err(self.out_of_range("f32"));
        }
        Ok(narrow)
    }

    fn decode_f64(&self) -> DecodingResult<f64> {
        match *self.node {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            Value::UInt(v) => Ok(v as f64),
            _ => Err(self.mismatch("f64")),
        }
    }

    fn value_decoder(&self) -> Box<dyn Decoder + '_> {
        Box::new(self.clone())
    }
}

// ---------------------------------------------------------------------------
// Keyed
// ---------------------------------------------------------------------------

struct KeyedValueDecoder<'a> {
    entries: &'a Object,
    path: CodingPath,
    user_info: &'a UserInfo,
    config: &'a CodingConfig,
}

impl<'a> KeyedValueDecoder<'a> {
    fn node_for(&self, node: &'a Value, key: &AnyKey) -> NodeDecoder<'a> {
        NodeDecoder::new(node, self.path.appending(key), self.user_info, self.config)
    }

    fn child(&self, key: &AnyKey) -> DecodingResult<NodeDecoder<'a>> {
        let node = self
            .entries
            .get(key.string_value())
            .ok_or_else(|| DecodingError::key_not_found(key.clone(), &self.path))?;
        Ok(self.node_for(node, key))
    }
}

macro_rules! keyed_leaves {
    ($($method:ident -> $ty:ty),+ $(,)?) => {
        $(
            fn $method(&self, key: &AnyKey) -> DecodingResult<$ty> {
                self.child(key)?.$method()
            }
        )+
    };
}

impl KeyedDecodingContainerProtocol for KeyedValueDecoder<'_> {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn all_keys(&self) -> Vec<AnyKey> {
        self.entries.keys().map(|key| AnyKey::string(key.as_str())).collect()
    }

    fn contains(&self, key: &AnyKey) -> bool {
        self.entries.contains_key(key.string_value())
    }

    fn decode_nil(&self, key: &AnyKey) -> DecodingResult<bool> {
        Ok(self.child(key)?.node.is_null())
    }

    keyed_leaves! {
        decode_bool -> bool,
        decode_string -> String,
        decode_i8 -> i8,
        decode_i16 -> i16,
        decode_i32 -> i32,
        decode_i64 -> i64,
        decode_u8 -> u8,
        decode_u16 -> u16,
        decode_u32 -> u32,
        decode_u64 -> u64,
        decode_f32 -> f32,
        decode_f64 -> f64,
    }

    fn decoder_for_key(&self, key: &AnyKey) -> DecodingResult<Box<dyn Decoder + '_>> {
        Ok(Box::new(self.child(key)?))
    }

    fn nested_keyed(&self, key: &AnyKey) -> DecodingResult<Box<dyn KeyedDecodingContainerProtocol + '_>> {
        Ok(Box::new(self.child(key)?.into_keyed()?))
    }

    fn nested_unkeyed(&self, key: &AnyKey) -> DecodingResult<Box<dyn UnkeyedDecodingContainerProtocol + '_>> {
        Ok(Box::new(self.child(key)?.into_unkeyed()?))
    }

    fn super_decoder(&self) -> DecodingResult<Box<dyn Decoder + '_>> {
        self.super_decoder_for_key(&AnyKey::super_key())
    }

    fn super_decoder_for_key(&self, key: &AnyKey) -> DecodingResult<Box<dyn Decoder + '_>> {
        let node = self.entries.get(key.string_value()).unwrap_or(&NULL);
        Ok(Box::new(self.node_for(node, key)))
    }
}

// ---------------------------------------------------------------------------
// Unkeyed
// ---------------------------------------------------------------------------

struct UnkeyedValueDecoder<'a> {
    elements: &'a [Value],
    index: usize,
    path: CodingPath,
    user_info: &'a UserInfo,
    config: &'a CodingConfig,
}

impl<'a> UnkeyedValueDecoder<'a> {
    /// Decoder over the element under the cursor. Does not advance.
    fn current(&self, expected: &str) -> DecodingResult<NodeDecoder<'a>> {
        let key = AnyKey::index(self.index);
        match self.elements.get(self.index) {
            Some(node) => Ok(NodeDecoder::new(node, self.path.appending(&key), self.user_info, self.config)),
            None => Err(DecodingError::data_corrupted(
                &self.path.appending(&key),
                format!("unkeyed container is at end, cannot decode {expected}"),
            )),
        }
    }
}

macro_rules! unkeyed_leaves {
    ($($method:ident -> $ty:ty),+ $(,)?) => {
        $(
            fn $method(&mut self) -> DecodingResult<$ty> {
                let value = self.current(stringify!($ty))?.$method()?;
                self.index += 1;
                Ok(value)
            }
        )+
    };
}

impl UnkeyedDecodingContainerProtocol for UnkeyedValueDecoder<'_> {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn count(&self) -> Option<usize> {
        Some(self.elements.len())
    }

    fn is_at_end(&self) -> bool {
        self.index >= self.elements.len()
    }

    fn current_index(&self) -> usize {
        self.index
    }

    fn decode_nil(&mut self) -> DecodingResult<bool> {
        if self.current("null")?.node.is_null() {
            self.index += 1;
            return Ok(true);
        }
        Ok(false)
    }

    unkeyed_leaves! {
        decode_bool -> bool,
        decode_string -> String,
        decode_i8 -> i8,
        decode_i16 -> i16,
        decode_i32 -> i32,
        decode_i64 -> i64,
        decode_u8 -> u8,
        decode_u16 -> u16,
        decode_u32 -> u32,
        decode_u64 -> u64,
        decode_f32 -> f32,
        decode_f64 -> f64,
    }

    fn nested_keyed(&mut self) -> DecodingResult<Box<dyn KeyedDecodingContainerProtocol + '_>> {
        let container = self.current("object")?.into_keyed()?;
        self.index += 1;
        Ok(Box::new(container))
    }

    fn nested_unkeyed(&mut self) -> DecodingResult<Box<dyn UnkeyedDecodingContainerProtocol + '_>> {
        let container = self.current("array")?.into_unkeyed()?;
        self.index += 1;
        Ok(Box::new(container))
    }

    fn super_decoder(&mut self) -> DecodingResult<Box<dyn Decoder + '_>> {
        let decoder = self.current("value")?;
        self.index += 1;
        Ok(Box::new(decoder))
    }
}

// ---------------------------------------------------------------------------
// Top level
// ---------------------------------------------------------------------------

/// Decodes values from a [`Value`] tree or JSON text.
#[derive(Clone, Debug, Default)]
pub struct ValueDecoder {
    config: CodingConfig,
    user_info: UserInfo,
}

impl ValueDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodingConfig) -> Self {
        Self {
            config,
            user_info: UserInfo::new(),
        }
    }

    pub fn config(&self) -> &CodingConfig {
        &self.config
    }

    /// Context handed to every [`Decoder`] during traversal.
    pub fn user_info(&self) -> &UserInfo {
        &self.user_info
    }

    pub fn user_info_mut(&mut self) -> &mut UserInfo {
        &mut self.user_info
    }

    pub fn decode<T: Decodable>(&self, value: &Value) -> DecodingResult<T> {
        debug!(kind = value.kind_name(), "decoding value");
        T::decode(&NodeDecoder::new(value, CodingPath::root(), &self.user_info, &self.config))
    }

    /// Parse JSON text and decode it.
    pub fn decode_json<T: Decodable>(&self, text: &str) -> ValueResult<T> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        debug!(bytes = text.len(), "parsed json");
        Ok(self.decode(&Value::from(json))?)
    }
}
