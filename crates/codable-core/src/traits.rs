//! The container protocol hierarchy.
//!
//! A backend implements [`Encoder`] and [`Decoder`] plus the six container
//! protocols over its own representation. All protocol traits are object
//! safe; the generic conveniences (`container::<K>()`, `decode::<T>()`, ...)
//! live on the typed adapters in [`keyed`](crate::keyed) and
//! [`unkeyed`](crate::unkeyed) and on inherent impls of the trait objects.
//!
//! # Invariants
//!
//! - A container is unidirectional: encode containers never read, decode
//!   containers never write.
//! - A nested container borrows its parent and cannot outlive it. Every
//!   `Box<dyn ... + '_>` returned here is tied to the `&self` / `&mut self`
//!   borrow that produced it.
//! - A nested container's path is its parent's path plus exactly one key.
//! - Unkeyed decode cursors only move forward.

use crate::error::{DecodingResult, EncodingResult};
use crate::key::{AnyKey, CodingKey};
use crate::keyed::{KeyedDecodingContainer, KeyedEncodingContainer};
use crate::path::CodingPath;
use crate::unkeyed::{UnkeyedDecodingContainer, UnkeyedEncodingContainer};
use crate::user_info::UserInfo;

/// A value that can write itself into an [`Encoder`].
pub trait Encodable {
    fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()>;
}

/// A value that can rebuild itself from a [`Decoder`].
pub trait Decodable: Sized {
    fn decode(decoder: &dyn Decoder) -> DecodingResult<Self>;
}

/// Both [`Encodable`] and [`Decodable`].
pub trait Codable: Encodable + Decodable {}

impl<T: Encodable + Decodable> Codable for T {}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Hands out containers rooted at the encoder's coding path.
pub trait Encoder {
    fn coding_path(&self) -> &CodingPath;

    /// Caller-supplied context, read-only during traversal.
    fn user_info(&self) -> &UserInfo;

    fn keyed(&mut self) -> Box<dyn KeyedEncodingContainerProtocol + '_>;

    fn unkeyed(&mut self) -> Box<dyn UnkeyedEncodingContainerProtocol + '_>;

    fn single_value_container(&mut self) -> Box<dyn SingleValueEncodingContainer + '_>;
}

/// Hands out containers over the value at the decoder's coding path.
///
/// Requesting a container fails if the stored value has the wrong shape
/// (type mismatch) or is null (value not found).
pub trait Decoder {
    fn coding_path(&self) -> &CodingPath;

    fn user_info(&self) -> &UserInfo;

    fn keyed(&self) -> DecodingResult<Box<dyn KeyedDecodingContainerProtocol + '_>>;

    fn unkeyed(&self) -> DecodingResult<Box<dyn UnkeyedDecodingContainerProtocol + '_>>;

    fn single_value_container(&self) -> DecodingResult<Box<dyn SingleValueDecodingContainer + '_>>;
}

impl<'e> dyn Encoder + 'e {
    /// A keyed container whose fields are named by `K`.
    pub fn container<K: CodingKey>(&mut self) -> KeyedEncodingContainer<'_, K> {
        KeyedEncodingContainer::new(self.keyed())
    }

    pub fn unkeyed_container(&mut self) -> UnkeyedEncodingContainer<'_> {
        UnkeyedEncodingContainer::new(self.unkeyed())
    }
}

impl<'d> dyn Decoder + 'd {
    /// A keyed container whose fields are named by `K`.
    pub fn container<K: CodingKey>(&self) -> DecodingResult<KeyedDecodingContainer<'_, K>> {
        Ok(KeyedDecodingContainer::new(self.keyed()?))
    }

    pub fn unkeyed_container(&self) -> DecodingResult<UnkeyedDecodingContainer<'_>> {
        Ok(UnkeyedDecodingContainer::new(self.unkeyed()?))
    }
}

// ---------------------------------------------------------------------------
// Keyed
// ---------------------------------------------------------------------------

/// Field-indexed writes.
///
/// Encoding the same key twice is not rejected; whether the second write
/// overwrites the first or emits a duplicate field is up to the backend.
pub trait KeyedEncodingContainerProtocol {
    fn coding_path(&self) -> &CodingPath;

    fn encode_nil(&mut self, key: &AnyKey) -> EncodingResult<()>;
    fn encode_bool(&mut self, value: bool, key: &AnyKey) -> EncodingResult<()>;
    fn encode_str(&mut self, value: &str, key: &AnyKey) -> EncodingResult<()>;
    fn encode_i8(&mut self, value: i8, key: &AnyKey) -> EncodingResult<()>;
    fn encode_i16(&mut self, value: i16, key: &AnyKey) -> EncodingResult<()>;
    fn encode_i32(&mut self, value: i32, key: &AnyKey) -> EncodingResult<()>;
    fn encode_i64(&mut self, value: i64, key: &AnyKey) -> EncodingResult<()>;
    fn encode_u8(&mut self, value: u8, key: &AnyKey) -> EncodingResult<()>;
    fn encode_u16(&mut self, value: u16, key: &AnyKey) -> EncodingResult<()>;
    fn encode_u32(&mut self, value: u32, key: &AnyKey) -> EncodingResult<()>;
    fn encode_u64(&mut self, value: u64, key: &AnyKey) -> EncodingResult<()>;
    fn encode_f32(&mut self, value: f32, key: &AnyKey) -> EncodingResult<()>;
    fn encode_f64(&mut self, value: f64, key: &AnyKey) -> EncodingResult<()>;

    /// Encode a value through its own [`Encodable`] impl, rooted at `key`.
    fn encode_encodable(&mut self, value: &dyn Encodable, key: &AnyKey) -> EncodingResult<()> {
        value.encode(&mut *self.super_encoder_for_key(key))
    }

    /// Encode a reference-like value. Backends without reference tracking
    /// treat this as [`encode_encodable`](Self::encode_encodable).
    fn encode_conditional(&mut self, value: &dyn Encodable, key: &AnyKey) -> EncodingResult<()> {
        self.encode_encodable(value, key)
    }

    fn nested_keyed(&mut self, key: &AnyKey) -> Box<dyn KeyedEncodingContainerProtocol + '_>;

    fn nested_unkeyed(&mut self, key: &AnyKey) -> Box<dyn UnkeyedEncodingContainerProtocol + '_>;

    /// Encoder for a base type's fields, under the synthetic `super` key.
    fn super_encoder(&mut self) -> Box<dyn Encoder + '_>;

    fn super_encoder_for_key(&mut self, key: &AnyKey) -> Box<dyn Encoder + '_>;
}

/// Field-indexed reads.
pub trait KeyedDecodingContainerProtocol {
    fn coding_path(&self) -> &CodingPath;

    /// Every key present in the underlying object, in backend order.
    fn all_keys(&self) -> Vec<AnyKey>;

    fn contains(&self, key: &AnyKey) -> bool;

    /// `true` if the value stored under `key` is null.
    fn decode_nil(&self, key: &AnyKey) -> DecodingResult<bool>;
    fn decode_bool(&self, key: &AnyKey) -> DecodingResult<bool>;
    fn decode_string(&self, key: &AnyKey) -> DecodingResult<String>;
    fn decode_i8(&self, key: &AnyKey) -> DecodingResult<i8>;
    fn decode_i16(&self, key: &AnyKey) -> DecodingResult<i16>;
    fn decode_i32(&self, key: &AnyKey) -> DecodingResult<i32>;
    fn decode_i64(&self, key: &AnyKey) -> DecodingResult<i64>;
    fn decode_u8(&self, key: &AnyKey) -> DecodingResult<u8>;
    fn decode_u16(&self, key: &AnyKey) -> DecodingResult<u16>;
    fn decode_u32(&self, key: &AnyKey) -> DecodingResult<u32>;
    fn decode_u64(&self, key: &AnyKey) -> DecodingResult<u64>;
    fn decode_f32(&self, key: &AnyKey) -> DecodingResult<f32>;
    fn decode_f64(&self, key: &AnyKey) -> DecodingResult<f64>;

    /// Decoder over the value stored under `key`.
    ///
    /// Fails with key-not-found if `key` is absent.
    fn decoder_for_key(&self, key: &AnyKey) -> DecodingResult<Box<dyn Decoder + '_>>;

    fn nested_keyed(&self, key: &AnyKey) -> DecodingResult<Box<dyn KeyedDecodingContainerProtocol + '_>>;

    fn nested_unkeyed(&self, key: &AnyKey) -> DecodingResult<Box<dyn UnkeyedDecodingContainerProtocol + '_>>;

    /// Decoder for a base type's fields, under the synthetic `super` key.
    fn super_decoder(&self) -> DecodingResult<Box<dyn Decoder + '_>>;

    /// Like [`decoder_for_key`](Self::decoder_for_key), but an absent key
    /// yields a decoder over null instead of an error.
    fn super_decoder_for_key(&self, key: &AnyKey) -> DecodingResult<Box<dyn Decoder + '_>>;
}

// ---------------------------------------------------------------------------
// Unkeyed
// ---------------------------------------------------------------------------

/// Sequential, index-ordered writes.
pub trait UnkeyedEncodingContainerProtocol {
    fn coding_path(&self) -> &CodingPath;

    /// Number of elements written so far.
    fn count(&self) -> usize;

    fn encode_nil(&mut self) -> EncodingResult<()>;
    fn encode_bool(&mut self, value: bool) -> EncodingResult<()>;
    fn encode_str(&mut self, value: &str) -> EncodingResult<()>;
    fn encode_i8(&mut self, value: i8) -> EncodingResult<()>;
    fn encode_i16(&mut self, value: i16) -> EncodingResult<()>;
    fn encode_i32(&mut self, value: i32) -> EncodingResult<()>;
    fn encode_i64(&mut self, value: i64) -> EncodingResult<()>;
    fn encode_u8(&mut self, value: u8) -> EncodingResult<()>;
    fn encode_u16(&mut self, value: u16) -> EncodingResult<()>;
    fn encode_u32(&mut self, value: u32) -> EncodingResult<()>;
    fn encode_u64(&mut self, value: u64) -> EncodingResult<()>;
    fn encode_f32(&mut self, value: f32) -> EncodingResult<()>;
    fn encode_f64(&mut self, value: f64) -> EncodingResult<()>;

    /// Append a value encoded through its own [`Encodable`] impl.
    fn encode_encodable(&mut self, value: &dyn Encodable) -> EncodingResult<()> {
        value.encode(&mut *self.super_encoder())
    }

    fn encode_conditional(&mut self, value: &dyn Encodable) -> EncodingResult<()> {
        self.encode_encodable(value)
    }

    fn nested_keyed(&mut self) -> Box<dyn KeyedEncodingContainerProtocol + '_>;

    fn nested_unkeyed(&mut self) -> Box<dyn UnkeyedEncodingContainerProtocol + '_>;

    /// Encoder for a newly appended element.
    fn super_encoder(&mut self) -> Box<dyn Encoder + '_>;
}

/// Sequential reads behind a forward-only cursor.
///
/// A successful decode advances [`current_index`](Self::current_index) by
/// one; a failed primitive decode leaves it in place. Decoding while
/// [`is_at_end`](Self::is_at_end) is a data-corrupted failure.
pub trait UnkeyedDecodingContainerProtocol {
    fn coding_path(&self) -> &CodingPath;

    /// Total number of elements, if the backend knows it.
    fn count(&self) -> Option<usize>;

    fn is_at_end(&self) -> bool;

    fn current_index(&self) -> usize;

    /// If the next element is null, consume it and return `true`; otherwise
    /// leave the cursor alone and return `false`.
    fn decode_nil(&mut self) -> DecodingResult<bool>;
    fn decode_bool(&mut self) -> DecodingResult<bool>;
    fn decode_string(&mut self) -> DecodingResult<String>;
    fn decode_i8(&mut self) -> DecodingResult<i8>;
    fn decode_i16(&mut self) -> DecodingResult<i16>;
    fn decode_i32(&mut self) -> DecodingResult<i32>;
    fn decode_i64(&mut self) -> DecodingResult<i64>;
    fn decode_u8(&mut self) -> DecodingResult<u8>;
    fn decode_u16(&mut self) -> DecodingResult<u16>;
    fn decode_u32(&mut self) -> DecodingResult<u32>;
    fn decode_u64(&mut self) -> DecodingResult<u64>;
    fn decode_f32(&mut self) -> DecodingResult<f32>;
    fn decode_f64(&mut self) -> DecodingResult<f64>;

    fn nested_keyed(&mut self) -> DecodingResult<Box<dyn KeyedDecodingContainerProtocol + '_>>;

    fn nested_unkeyed(&mut self) -> DecodingResult<Box<dyn UnkeyedDecodingContainerProtocol + '_>>;

    /// Decoder over the next element. Consumes it.
    fn super_decoder(&mut self) -> DecodingResult<Box<dyn Decoder + '_>>;
}

// ---------------------------------------------------------------------------
// Single value
// ---------------------------------------------------------------------------

/// Writes exactly one value at the container's path.
pub trait SingleValueEncodingContainer {
    fn coding_path(&self) -> &CodingPath;

    fn encode_nil(&mut self) -> EncodingResult<()>;
    fn encode_bool(&mut self, value: bool) -> EncodingResult<()>;
    fn encode_str(&mut self, value: &str) -> EncodingResult<()>;
    fn encode_i8(&mut self, value: i8) -> EncodingResult<()>;
    fn encode_i16(&mut self, value: i16) -> EncodingResult<()>;
    fn encode_i32(&mut self, value: i32) -> EncodingResult<()>;
    fn encode_i64(&mut self, value: i64) -> EncodingResult<()>;
    fn encode_u8(&mut self, value: u8) -> EncodingResult<()>;
    fn encode_u16(&mut self, value: u16) -> EncodingResult<()>;
    fn encode_u32(&mut self, value: u32) -> EncodingResult<()>;
    fn encode_u64(&mut self, value: u64) -> EncodingResult<()>;
    fn encode_f32(&mut self, value: f32) -> EncodingResult<()>;
    fn encode_f64(&mut self, value: f64) -> EncodingResult<()>;

    /// Encoder over the same slot, for values that encode themselves.
    fn value_encoder(&mut self) -> Box<dyn Encoder + '_>;
}

/// Reads exactly one value at the container's path.
pub trait SingleValueDecodingContainer {
    fn coding_path(&self) -> &CodingPath;

    fn decode_nil(&self) -> bool;
    fn decode_bool(&self) -> DecodingResult<bool>;
    fn decode_string(&self) -> DecodingResult<String>;
    fn decode_i8(&self) -> DecodingResult<i8>;
    fn decode_i16(&self) -> DecodingResult<i16>;
    fn decode_i32(&self) -> DecodingResult<i32>;
    fn decode_i64(&self) -> DecodingResult<i64>;
    fn decode_u8(&self) -> DecodingResult<u8>;
    fn decode_u16(&self) -> DecodingResult<u16>;
    fn decode_u32(&self) -> DecodingResult<u32>;
    fn decode_u64(&self) -> DecodingResult<u64>;
    fn decode_f32(&self) -> DecodingResult<f32>;
    fn decode_f64(&self) -> DecodingResult<f64>;

    /// Decoder over the same value, for types that decode themselves.
    fn value_decoder(&self) -> Box<dyn Decoder + '_>;
}

impl<'c> dyn SingleValueEncodingContainer + 'c {
    pub fn encode<T: Encodable + ?Sized>(&mut self, value: &T) -> EncodingResult<()> {
        value.encode(&mut *self.value_encoder())
    }
}

impl<'c> dyn SingleValueDecodingContainer + 'c {
    pub fn decode<T: Decodable>(&self) -> DecodingResult<T> {
        T::decode(&*self.value_decoder())
    }
}
