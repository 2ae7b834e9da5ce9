//! Standard conformances.
//!
//! Leaves go through a single-value container. Sequences, sets, and maps go
//! through the collection dispatcher with descriptors taken from their
//! declared element, key, and value types.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::{BuildHasher, Hash};

use indexmap::{IndexMap, IndexSet};

use crate::descriptor::Element;
use crate::dispatch::{decode_mapping, encode_typed_mapping};
use crate::error::{DecodingResult, EncodingResult};
use crate::traits::{Decodable, Decoder, Encodable, Encoder};

macro_rules! leaf_codable {
    ($($ty:ty => $encode:ident, $decode:ident;)+) => {
        $(
            impl Encodable for $ty {
                fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
                    encoder.single_value_container().$encode(*self)
                }
            }

            impl Decodable for $ty {
                fn decode(decoder: &dyn Decoder) -> DecodingResult<Self> {
                    decoder.single_value_container()?.$decode()
                }
            }
        )+
    };
}

leaf_codable! {
    bool => encode_bool, decode_bool;
    i8 => encode_i8, decode_i8;
    i16 => encode_i16, decode_i16;
    i32 => encode_i32, decode_i32;
    i64 => encode_i64, decode_i64;
    u8 => encode_u8, decode_u8;
    u16 => encode_u16, decode_u16;
    u32 => encode_u32, decode_u32;
    u64 => encode_u64, decode_u64;
    f32 => encode_f32, decode_f32;
    f64 => encode_f64, decode_f64;
}

impl Encodable for str {
    fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
        encoder.single_value_container().encode_str(self)
    }
}

impl Encodable for String {
    fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
        self.as_str().encode(encoder)
    }
}

impl Decodable for String {
    fn decode(decoder: &dyn Decoder) -> DecodingResult<Self> {
        decoder.single_value_container()?.decode_string()
    }
}

// ---------------------------------------------------------------------------
// Wrappers
// ---------------------------------------------------------------------------

impl<T: Encodable + ?Sized> Encodable for &T {
    fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
        (**self).encode(encoder)
    }
}

impl<T: Encodable + ?Sized> Encodable for Box<T> {
    fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
        (**self).encode(encoder)
    }
}

impl<T: Decodable> Decodable for Box<T> {
    fn decode(decoder: &dyn Decoder) -> DecodingResult<Self> {
        T::decode(decoder).map(Box::new)
    }
}

/// `None` is written as null.
impl<T: Encodable> Encodable for Option<T> {
    fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
        match self {
            Some(value) => value.encode(encoder),
            None => encoder.single_value_container().encode_nil(),
        }
    }
}

/// Null decodes as `None`; anything else must decode as `T`.
impl<T: Decodable> Decodable for Option<T> {
    fn decode(decoder: &dyn Decoder) -> DecodingResult<Self> {
        if decoder.single_value_container()?.decode_nil() {
            return Ok(None);
        }
        T::decode(decoder).map(Some)
    }
}

impl<T: Element> Element for Box<T> {}
impl<T: Element> Element for Option<T> {}

// ---------------------------------------------------------------------------
// Sequences and sets
// ---------------------------------------------------------------------------

impl<T: Element> Encodable for [T] {
    fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
        encoder.unkeyed_container().encode_sequence(self)
    }
}

impl<T: Element> Encodable for Vec<T> {
    fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
        self.as_slice().encode(encoder)
    }
}

impl<T: Element> Decodable for Vec<T> {
    fn decode(decoder: &dyn Decoder) -> DecodingResult<Self> {
        decoder.unkeyed_container()?.decode_contents(T::DESCRIPTOR)
    }
}

impl<T: Element> Element for Vec<T> {}

fn decode_distinct<T: Element, C: FromIterator<T>>(decoder: &dyn Decoder) -> DecodingResult<C> {
    let elements: Vec<T> = decoder.unkeyed_container()?.decode_contents(T::DESCRIPTOR)?;
    Ok(elements.into_iter().collect())
}

impl<T, S> Encodable for HashSet<T, S>
where
    T: Element + Eq + Hash,
    S: BuildHasher,
{
    fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
        encoder.unkeyed_container().encode_sequence(self)
    }
}

impl<T, S> Decodable for HashSet<T, S>
where
    T: Element + Eq + Hash,
    S: BuildHasher + Default,
{
    fn decode(decoder: &dyn Decoder) -> DecodingResult<Self> {
        decode_distinct(decoder)
    }
}

impl<T, S> Element for HashSet<T, S>
where
    T: Element + Eq + Hash,
    S: BuildHasher + Default,
{
}

impl<T: Element + Ord> Encodable for BTreeSet<T> {
    fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
        encoder.unkeyed_container().encode_sequence(self)
    }
}

impl<T: Element + Ord> Decodable for BTreeSet<T> {
    fn decode(decoder: &dyn Decoder) -> DecodingResult<Self> {
        decode_distinct(decoder)
    }
}

impl<T: Element + Ord> Element for BTreeSet<T> {}

impl<T, S> Encodable for IndexSet<T, S>
where
    T: Element + Eq + Hash,
    S: BuildHasher,
{
    fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
        encoder.unkeyed_container().encode_sequence(self)
    }
}

/// Keeps the first occurrence of each element, in encoded order.
impl<T, S> Decodable for IndexSet<T, S>
where
    T: Element + Eq + Hash,
    S: BuildHasher + Default,
{
    fn decode(decoder: &dyn Decoder) -> DecodingResult<Self> {
        decode_distinct(decoder)
    }
}

impl<T, S> Element for IndexSet<T, S>
where
    T: Element + Eq + Hash,
    S: BuildHasher + Default,
{
}

// ---------------------------------------------------------------------------
// Maps
// ---------------------------------------------------------------------------

impl<K, V, S> Encodable for HashMap<K, V, S>
where
    K: Element + Eq + Hash,
    V: Element,
    S: BuildHasher,
{
    fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
        encode_typed_mapping(encoder, self)
    }
}

impl<K, V, S> Decodable for HashMap<K, V, S>
where
    K: Element + Eq + Hash,
    V: Element,
    S: BuildHasher + Default,
{
    fn decode(decoder: &dyn Decoder) -> DecodingResult<Self> {
        decode_mapping::<K, V, Self>(decoder, K::DESCRIPTOR, V::DESCRIPTOR)
    }
}

impl<K, V, S> Element for HashMap<K, V, S>
where
    K: Element + Eq + Hash,
    V: Element,
    S: BuildHasher + Default,
{
}

impl<K: Element + Ord, V: Element> Encodable for BTreeMap<K, V> {
    fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
        encode_typed_mapping(encoder, self)
    }
}

impl<K: Element + Ord, V: Element> Decodable for BTreeMap<K, V> {
    fn decode(decoder: &dyn Decoder) -> DecodingResult<Self> {
        decode_mapping::<K, V, Self>(decoder, K::DESCRIPTOR, V::DESCRIPTOR)
    }
}

impl<K: Element + Ord, V: Element> Element for BTreeMap<K, V> {}

impl<K, V, S> Encodable for IndexMap<K, V, S>
where
    K: Element + Eq + Hash,
    V: Element,
    S: BuildHasher,
{
    fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
        encode_typed_mapping(encoder, self)
    }
}

/// A repeated key keeps its first position and its last value.
impl<K, V, S> Decodable for IndexMap<K, V, S>
where
    K: Element + Eq + Hash,
    V: Element,
    S: BuildHasher + Default,
{
    fn decode(decoder: &dyn Decoder) -> DecodingResult<Self> {
        decode_mapping::<K, V, Self>(decoder, K::DESCRIPTOR, V::DESCRIPTOR)
    }
}

impl<K, V, S> Element for IndexMap<K, V, S>
where
    K: Element + Eq + Hash,
    V: Element,
    S: BuildHasher + Default,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TypeDescriptor;

    #[test]
    fn collections_declare_codable() {
        assert_eq!(Vec::<u8>::DESCRIPTOR, TypeDescriptor::Codable);
        assert_eq!(Option::<i32>::DESCRIPTOR, TypeDescriptor::Codable);
        assert_eq!(BTreeSet::<String>::DESCRIPTOR, TypeDescriptor::Codable);
        assert_eq!(
            HashMap::<String, Vec<bool>>::DESCRIPTOR,
            TypeDescriptor::Codable
        );
        assert_eq!(IndexMap::<u32, f64>::DESCRIPTOR, TypeDescriptor::Codable);
    }

    #[test]
    fn nested_collections_erase_as_codable() {
        let inner = vec![1u8, 2, 3];
        assert_eq!(inner.erase().descriptor(), TypeDescriptor::Codable);
        assert_eq!(Some(4i64).erase().descriptor(), TypeDescriptor::Codable);
    }
}
