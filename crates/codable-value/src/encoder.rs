//! Encoding into a [`Value`] tree.
//!
//! Every encoder and container writes through a mutable borrow of the slot
//! it owns: the root value, an object entry, or an array element. Nested
//! containers reborrow a child slot of their parent.

use codable_core::{
    AnyKey, CodingKey, CodingPath, Encodable, Encoder, EncodingResult,
    KeyedEncodingContainerProtocol, SingleValueEncodingContainer,
    UnkeyedEncodingContainerProtocol, UserInfo,
};
use tracing::debug;

use crate::config::CodingConfig;
use crate::error::ValueResult;
use crate::value::{Object, Value};

/// Encoder and single-value container over one slot.
pub(crate) struct SlotEncoder<'a> {
    slot: &'a mut Value,
    path: CodingPath,
    user_info: &'a UserInfo,
}

impl<'a> SlotEncoder<'a> {
    pub(crate) fn new(slot: &'a mut Value, path: CodingPath, user_info: &'a UserInfo) -> Self {
        Self {
            slot,
            path,
            user_info,
        }
    }
}

impl Encoder for SlotEncoder<'_> {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn user_info(&self) -> &UserInfo {
        self.user_info
    }

    fn keyed(&mut self) -> Box<dyn KeyedEncodingContainerProtocol + '_> {
        Box::new(KeyedValueEncoder {
            entries: self.slot.object_entries(),
            path: self.path.clone(),
            user_info: self.user_info,
        })
    }

    fn unkeyed(&mut self) -> Box<dyn UnkeyedEncodingContainerProtocol + '_> {
        Box::new(UnkeyedValueEncoder {
            elements: self.slot.array_elements(),
            path: self.path.clone(),
            user_info: self.user_info,
        })
    }

    fn single_value_container(&mut self) -> Box<dyn SingleValueEncodingContainer + '_> {
        Box::new(SlotEncoder::new(&mut *self.slot, self.path.clone(), self.user_info))
    }
}

macro_rules! single_leaves {
    ($($method:ident($ty:ty)),+ $(,)?) => {
        $(
            fn $method(&mut self, value: $ty) -> EncodingResult<()> {
                *self.slot = Value::from(value);
                Ok(())
            }
        )+
    };
}

impl SingleValueEncodingContainer for SlotEncoder<'_> {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn encode_nil(&mut self) -> EncodingResult<()> {
        *self.slot = Value::Null;
        Ok(())
    }

    single_leaves! {
        encode_bool(bool),
        encode_str(&str),
        encode_i8(i8),
        encode_i16(i16),
        encode_i32(i32),
        encode_i64(i64),
        encode_u8(u8),
        encode_u16(u16),
        encode_u32(u32),
        encode_u64(u64),
        encode_f32(f32),
        encode_f64(f64),
    }

    fn value_encoder(&mut self) -> Box<dyn Encoder + '_> {
        Box::new(SlotEncoder::new(&mut *self.slot, self.path.clone(), self.user_info))
    }
}

// ---------------------------------------------------------------------------
// Keyed
// ---------------------------------------------------------------------------

/// Writes object entries. A repeated key overwrites the earlier value and
/// keeps its original position.
struct KeyedValueEncoder<'a> {
    entries: &'a mut Object,
    path: CodingPath,
    user_info: &'a UserInfo,
}

impl KeyedValueEncoder<'_> {
    fn put(&mut self, key: &AnyKey, value: Value) -> EncodingResult<()> {
        self.entries.insert(key.string_value().to_owned(), value);
        Ok(())
    }

    fn slot(&mut self, key: &AnyKey) -> &mut Value {
        self.entries
            .entry(key.string_value().to_owned())
            .or_insert(Value::Null)
    }
}

macro_rules! keyed_leaves {
    ($($method:ident($ty:ty)),+ $(,)?) => {
        $(
            fn $method(&mut self, value: $ty, key: &AnyKey) -> EncodingResult<()> {
                self.put(key, Value::from(value))
            }
        )+
    };
}

impl KeyedEncodingContainerProtocol for KeyedValueEncoder<'_> {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn encode_nil(&mut self, key: &AnyKey) -> EncodingResult<()> {
        self.put(key, Value::Null)
    }

    keyed_leaves! {
        encode_bool(bool),
        encode_str(&str),
        encode_i8(i8),
        encode_i16(i16),
        encode_i32(i32),
        encode_i64(i64),
        encode_u8(u8),
        encode_u16(u16),
        encode_u32(u32),
        encode_u64(u64),
        encode_f32(f32),
        encode_f64(f64),
    }

    fn nested_keyed(&mut self, key: &AnyKey) -> Box<dyn KeyedEncodingContainerProtocol + '_> {
        let path = self.path.appending(key);
        let user_info = self.user_info;
        Box::new(KeyedValueEncoder {
            entries: self.slot(key).object_entries(),
            path,
            user_info,
        })
    }

    fn nested_unkeyed(&mut self, key: &AnyKey) -> Box<dyn UnkeyedEncodingContainerProtocol + '_> {
        let path = self.path.appending(key);
        let user_info = self.user_info;
        Box::new(UnkeyedValueEncoder {
            elements: self.slot(key).array_elements(),
            path,
            user_info,
        })
    }

    fn super_encoder(&mut self) -> Box<dyn Encoder + '_> {
        self.super_encoder_for_key(&AnyKey::super_key())
    }

    fn super_encoder_for_key(&mut self, key: &AnyKey) -> Box<dyn Encoder + '_> {
        let path = self.path.appending(key);
        let user_info = self.user_info;
        Box::new(SlotEncoder::new(self.slot(key), path, user_info))
    }
}

// ---------------------------------------------------------------------------
// Unkeyed
// ---------------------------------------------------------------------------

struct UnkeyedValueEncoder<'a> {
    elements: &'a mut Vec<Value>,
    path: CodingPath,
    user_info: &'a UserInfo,
}

impl UnkeyedValueEncoder<'_> {
    fn push(&mut self, value: Value) -> EncodingResult<()> {
        self.elements.push(value);
        Ok(())
    }

    /// Append a null element and return it with its index path.
    fn push_slot(&mut self) -> (&mut Value, CodingPath) {
        let index = self.elements.len();
        let path = self.path.appending(&AnyKey::index(index));
        self.elements.push(Value::Null);
        (&mut self.elements[index], path)
    }
}

macro_rules! unkeyed_leaves {
    ($($method:ident($ty:ty)),+ $(,)?) => {
        $(
            fn $method(&mut self, value: $ty) -> EncodingResult<()> {
                self.push(Value::from(value))
            }
        )+
    };
}

impl UnkeyedEncodingContainerProtocol for UnkeyedValueEncoder<'_> {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn count(&self) -> usize {
        self.elements.len()
    }

    fn encode_nil(&mut self) -> EncodingResult<()> {
        self.push(Value::Null)
    }

    unkeyed_leaves! {
        encode_bool(bool),
        encode_str(&str),
        encode_i8(i8),
        encode_i16(i16),
        encode_i32(i32),
        encode_i64(i64),
        encode_u8(u8),
        encode_u16(u16),
        encode_u32(u32),
        encode_u64(u64),
        encode_f32(f32),
        encode_f64(f64),
    }

    fn nested_keyed(&mut self) -> Box<dyn KeyedEncodingContainerProtocol + '_> {
        let user_info = self.user_info;
        let (slot, path) = self.push_slot();
        Box::new(KeyedValueEncoder {
            entries: slot.object_entries(),
            path,
            user_info,
        })
    }

    fn nested_unkeyed(&mut self) -> Box<dyn UnkeyedEncodingContainerProtocol + '_> {
        let user_info = self.user_info;
        let (slot, path) = self.push_slot();
        Box::new(UnkeyedValueEncoder {
            elements: slot.array_elements(),
            path,
            user_info,
        })
    }

    fn super_encoder(&mut self) -> Box<dyn Encoder + '_> {
        let user_info = self.user_info;
        let (slot, path) = self.push_slot();
        Box::new(SlotEncoder::new(slot, path, user_info))
    }
}

// ---------------------------------------------------------------------------
// Top level
// ---------------------------------------------------------------------------

/// Encodes values into a [`Value`] tree or JSON text.
#[derive(Clone, Debug, Default)]
pub struct ValueEncoder {
    config: CodingConfig,
    user_info: UserInfo,
}

impl ValueEncoder {
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

    /// Context handed to every [`Encoder`] during traversal.
    pub fn user_info(&self) -> &UserInfo {
        &self.user_info
    }

    pub fn user_info_mut(&mut self) -> &mut UserInfo {
        &mut self.user_info
    }

    /// Encode `value` into a fresh tree.
    pub fn encode<T: Encodable + ?Sized>(&self, value: &T) -> EncodingResult<Value> {
        let mut root = Value::Null;
        value.encode(&mut SlotEncoder::new(&mut root, CodingPath::root(), &self.user_info))?;
        if self.config.sort_keys {
            root.sort_keys();
        }
        debug!(kind = root.kind_name(), sorted = self.config.sort_keys, "encoded value");
        Ok(root)
    }

    /// Encode `value` and render it as JSON text.
    pub fn encode_json<T: Encodable + ?Sized>(&self, value: &T) -> ValueResult<String> {
        let json = self.encode(value)?.to_json()?;
        let text = if self.config.pretty {
            serde_json::to_string_pretty(&json)?
        } else {
            serde_json::to_string(&json)?
        };
        debug!(bytes = text.len(), pretty = self.config.pretty, "encoded json");
        Ok(text)
    }
}
