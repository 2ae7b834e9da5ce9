//! Typed keyed containers.
//!
//! [`KeyedEncodingContainer`] and [`KeyedDecodingContainer`] are thin
//! adapters over a backend's boxed protocol object. They add the key type
//! parameter and the generic conveniences, and forward everything else.

use std::marker::PhantomData;

use crate::error::{DecodingResult, EncodingResult};
use crate::key::{AnyKey, CodingKey};
use crate::path::CodingPath;
use crate::traits::{
    Decodable, Decoder, Encodable, Encoder, KeyedDecodingContainerProtocol,
    KeyedEncodingContainerProtocol,
};
use crate::unkeyed::{UnkeyedDecodingContainer, UnkeyedEncodingContainer};

macro_rules! forward_encode {
    ($($method:ident($ty:ty)),+ $(,)?) => {
        $(
            pub fn $method(&mut self, value: $ty, key: K) -> EncodingResult<()> {
                self.inner.$method(value, &AnyKey::of(&key))
            }
        )+
    };
}

macro_rules! forward_decode {
    ($($method:ident -> $ty:ty),+ $(,)?) => {
        $(
            pub fn $method(&self, key: K) -> DecodingResult<$ty> {
                self.inner.$method(&AnyKey::of(&key))
            }
        )+
    };
}

/// Keyed encode container whose fields are named by `K`.
pub struct KeyedEncodingContainer<'a, K> {
    inner: Box<dyn KeyedEncodingContainerProtocol + 'a>,
    _key: PhantomData<fn(K)>,
}

impl<'a, K: CodingKey> KeyedEncodingContainer<'a, K> {
    pub fn new(inner: Box<dyn KeyedEncodingContainerProtocol + 'a>) -> Self {
        Self {
            inner,
            _key: PhantomData,
        }
    }

    pub fn coding_path(&self) -> &CodingPath {
        self.inner.coding_path()
    }

    pub fn encode_nil(&mut self, key: K) -> EncodingResult<()> {
        self.inner.encode_nil(&AnyKey::of(&key))
    }

    forward_encode! {
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

    /// Encode any value through its [`Encodable`] impl.
    pub fn encode<T: Encodable>(&mut self, value: &T, key: K) -> EncodingResult<()> {
        self.inner.encode_encodable(value, &AnyKey::of(&key))
    }

    /// Encode `value` if present; otherwise leave `key` out entirely.
    pub fn encode_if_present<T: Encodable>(&mut self, value: Option<&T>, key: K) -> EncodingResult<()> {
        match value {
            Some(value) => self.encode(value, key),
            None => Ok(()),
        }
    }

    pub fn encode_conditional<T: Encodable>(&mut self, value: &T, key: K) -> EncodingResult<()> {
        self.inner.encode_conditional(value, &AnyKey::of(&key))
    }

    pub fn nested_container<N: CodingKey>(&mut self, key: K) -> KeyedEncodingContainer<'_, N> {
        KeyedEncodingContainer::new(self.inner.nested_keyed(&AnyKey::of(&key)))
    }

    pub fn nested_unkeyed_container(&mut self, key: K) -> UnkeyedEncodingContainer<'_> {
        UnkeyedEncodingContainer::new(self.inner.nested_unkeyed(&AnyKey::of(&key)))
    }

    pub fn super_encoder(&mut self) -> Box<dyn Encoder + '_> {
        self.inner.super_encoder()
    }

    pub fn super_encoder_for_key(&mut self, key: K) -> Box<dyn Encoder + '_> {
        self.inner.super_encoder_for_key(&AnyKey::of(&key))
    }
}

/// Keyed decode container whose fields are named by `K`.
pub struct KeyedDecodingContainer<'a, K> {
    inner: Box<dyn KeyedDecodingContainerProtocol + 'a>,
    _key: PhantomData<fn() -> K>,
}

impl<'a, K: CodingKey> KeyedDecodingContainer<'a, K> {
    pub fn new(inner: Box<dyn KeyedDecodingContainerProtocol + 'a>) -> Self {
        Self {
            inner,
            _key: PhantomData,
        }
    }

    pub fn coding_path(&self) -> &CodingPath {
        self.inner.coding_path()
    }

    /// Keys present in the container that `K` recognises.
    pub fn all_keys(&self) -> Vec<K> {
        self.inner
            .all_keys()
            .iter()
            .filter_map(|key| key.to_typed::<K>())
            .collect()
    }

    pub fn contains(&self, key: K) -> bool {
        self.inner.contains(&AnyKey::of(&key))
    }

    forward_decode! {
        decode_nil -> bool,
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

    /// Decode any value through its [`Decodable`] impl.
    pub fn decode<T: Decodable>(&self, key: K) -> DecodingResult<T> {
        T::decode(&*self.inner.decoder_for_key(&AnyKey::of(&key))?)
    }

    /// `None` iff `key` is absent. A present null still goes through
    /// [`decode`](Self::decode) and fails unless `T` accepts null.
    pub fn decode_if_present<T: Decodable>(&self, key: K) -> DecodingResult<Option<T>> {
        let key = AnyKey::of(&key);
        if !self.inner.contains(&key) {
            return Ok(None);
        }
        T::decode(&*self.inner.decoder_for_key(&key)?).map(Some)
    }

    pub fn nested_container<N: CodingKey>(&self, key: K) -> DecodingResult<KeyedDecodingContainer<'_, N>> {
        Ok(KeyedDecodingContainer::new(
            self.inner.nested_keyed(&AnyKey::of(&key))?,
        ))
    }

    pub fn nested_unkeyed_container(&self, key: K) -> DecodingResult<UnkeyedDecodingContainer<'_>> {
        Ok(UnkeyedDecodingContainer::new(
            self.inner.nested_unkeyed(&AnyKey::of(&key))?,
        ))
    }

    pub fn super_decoder(&self) -> DecodingResult<Box<dyn Decoder + '_>> {
        self.inner.super_decoder()
    }

    pub fn super_decoder_for_key(&self, key: K) -> DecodingResult<Box<dyn Decoder + '_>> {
        self.inner.super_decoder_for_key(&AnyKey::of(&key))
    }
}
