//! Unkeyed container adapters.

use crate::descriptor::{Element, ElementRef, TypeDescriptor};
use crate::dispatch;
use crate::error::{DecodingResult, EncodingResult};
use crate::key::CodingKey;
use crate::keyed::{KeyedDecodingContainer, KeyedEncodingContainer};
use crate::path::CodingPath;
use crate::traits::{
    Decodable, Decoder, Encodable, Encoder, UnkeyedDecodingContainerProtocol,
    UnkeyedEncodingContainerProtocol,
};

macro_rules! forward_encode {
    ($($method:ident($ty:ty)),+ $(,)?) => {
        $(
            pub fn $method(&mut self, value: $ty) -> EncodingResult<()> {
                self.inner.$method(value)
            }
        )+
    };
}

macro_rules! forward_decode {
    ($($method:ident -> $ty:ty),+ $(,)?) => {
        $(
            pub fn $method(&mut self) -> DecodingResult<$ty> {
                self.inner.$method()
            }
        )+
    };
}

/// Sequential encode container.
pub struct UnkeyedEncodingContainer<'a> {
    inner: Box<dyn UnkeyedEncodingContainerProtocol + 'a>,
}

impl<'a> UnkeyedEncodingContainer<'a> {
    pub fn new(inner: Box<dyn UnkeyedEncodingContainerProtocol + 'a>) -> Self {
        Self { inner }
    }

    pub fn coding_path(&self) -> &CodingPath {
        self.inner.coding_path()
    }

    pub fn count(&self) -> usize {
        self.inner.count()
    }

    pub fn encode_nil(&mut self) -> EncodingResult<()> {
        self.inner.encode_nil()
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

    pub fn encode<T: Encodable>(&mut self, value: &T) -> EncodingResult<()> {
        self.inner.encode_encodable(value)
    }

    pub fn encode_conditional<T: Encodable>(&mut self, value: &T) -> EncodingResult<()> {
        self.inner.encode_conditional(value)
    }

    /// Append every element of an erased sequence, dispatching each one on
    /// `descriptor`.
    ///
    /// # Panics
    ///
    /// Panics if an element's runtime kind has no entry under `descriptor`.
    pub fn encode_contents_of<'v, I>(&mut self, descriptor: TypeDescriptor, elements: I) -> EncodingResult<()>
    where
        I: IntoIterator<Item = ElementRef<'v>>,
    {
        dispatch::encode_sequence(&mut *self.inner, descriptor, elements)
    }

    /// Append a typed sequence, using the element type's own descriptor.
    pub fn encode_sequence<'v, T, I>(&mut self, elements: I) -> EncodingResult<()>
    where
        T: Element + 'v,
        I: IntoIterator<Item = &'v T>,
    {
        self.encode_contents_of(T::DESCRIPTOR, elements.into_iter().map(|e| e.erase()))
    }

    pub fn nested_container<K: CodingKey>(&mut self) -> KeyedEncodingContainer<'_, K> {
        KeyedEncodingContainer::new(self.inner.nested_keyed())
    }

    pub fn nested_unkeyed_container(&mut self) -> UnkeyedEncodingContainer<'_> {
        UnkeyedEncodingContainer::new(self.inner.nested_unkeyed())
    }

    pub fn super_encoder(&mut self) -> Box<dyn Encoder + '_> {
        self.inner.super_encoder()
    }
}

/// Sequential decode container with a forward-only cursor.
pub struct UnkeyedDecodingContainer<'a> {
    inner: Box<dyn UnkeyedDecodingContainerProtocol + 'a>,
}

impl<'a> UnkeyedDecodingContainer<'a> {
    pub fn new(inner: Box<dyn UnkeyedDecodingContainerProtocol + 'a>) -> Self {
        Self { inner }
    }

    pub fn coding_path(&self) -> &CodingPath {
        self.inner.coding_path()
    }

    pub fn count(&self) -> Option<usize> {
        self.inner.count()
    }

    pub fn is_at_end(&self) -> bool {
        self.inner.is_at_end()
    }

    pub fn current_index(&self) -> usize {
        self.inner.current_index()
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

    pub fn decode<T: Decodable>(&mut self) -> DecodingResult<T> {
        T::decode(&*self.inner.super_decoder()?)
    }

    /// `None` iff the container is at its end.
    ///
    /// A next element that is present but null is not distinguished from
    /// exhaustion here: it goes through [`decode`](Self::decode).
    pub fn decode_if_present<T: Decodable>(&mut self) -> DecodingResult<Option<T>> {
        if self.inner.is_at_end() {
            return Ok(None);
        }
        self.decode().map(Some)
    }

    /// Decode every remaining element, dispatching on `descriptor`.
    ///
    /// # Panics
    ///
    /// Panics if `descriptor` is not `T`'s declared kind.
    pub fn decode_contents<T: Element>(&mut self, descriptor: TypeDescriptor) -> DecodingResult<Vec<T>> {
        dispatch::decode_sequence(&mut *self.inner, descriptor)
    }

    pub fn nested_container<K: CodingKey>(&mut self) -> DecodingResult<KeyedDecodingContainer<'_, K>> {
        Ok(KeyedDecodingContainer::new(self.inner.nested_keyed()?))
    }

    pub fn nested_unkeyed_container(&mut self) -> DecodingResult<UnkeyedDecodingContainer<'_>> {
        Ok(UnkeyedDecodingContainer::new(self.inner.nested_unkeyed()?))
    }

    pub fn super_decoder(&mut self) -> DecodingResult<Box<dyn Decoder + '_>> {
        self.inner.super_decoder()
    }
}
