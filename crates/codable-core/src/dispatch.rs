//! The collection dispatcher.
//!
//! Sequences and mappings arrive here with their element types erased. The
//! caller names the declared kind with a [`TypeDescriptor`], and every
//! function in this module builds its dispatch table from that descriptor
//! alone. An element whose runtime kind has no entry under the declared
//! descriptor is not a decode error: it aborts the whole call with a panic.
//!
//! Mappings pick their layout with [`mapping_layout`] on both sides, so a
//! mapping always decodes from the shape it was encoded to.

use std::str::FromStr;

use tracing::{error, trace};

use crate::descriptor::{mapping_layout, Element, ElementRef, MappingLayout, Primitive, TypeDescriptor};
use crate::error::{DecodingError, DecodingResult, EncodingResult};
use crate::key::{AnyKey, CodingKey, DictionaryKey};
use crate::path::CodingPath;
use crate::traits::{
    Decoder, Encoder, KeyedDecodingContainerProtocol, KeyedEncodingContainerProtocol,
    UnkeyedDecodingContainerProtocol, UnkeyedEncodingContainerProtocol,
};

/// Decodes the next element of an unkeyed container.
pub type UnkeyedDecodeFn<T> = fn(&mut dyn UnkeyedDecodingContainerProtocol) -> DecodingResult<T>;

/// Decodes the value stored under a key of a keyed container.
pub type KeyedDecodeFn<T> = fn(&dyn KeyedDecodingContainerProtocol, &AnyKey) -> DecodingResult<T>;

#[cold]
#[track_caller]
fn unsupported(declared: TypeDescriptor, found: TypeDescriptor) -> ! {
    error!(%declared, %found, "no dispatch entry for element kind");
    panic!("cannot dispatch a {found} element under declared kind {declared}");
}

fn lift<T: Element>(value: Primitive) -> T {
    let found = value.descriptor();
    match T::from_primitive(value) {
        Some(value) => value,
        None => unsupported(T::DESCRIPTOR, found),
    }
}

fn check_declared<T: Element>(descriptor: TypeDescriptor) {
    if descriptor != T::DESCRIPTOR {
        unsupported(descriptor, T::DESCRIPTOR);
    }
}

// ---------------------------------------------------------------------------
// Element encode
// ---------------------------------------------------------------------------

/// Append one erased element to an unkeyed container.
///
/// # Panics
///
/// Panics if `element` is not of kind `descriptor`.
pub fn encode_element(
    container: &mut dyn UnkeyedEncodingContainerProtocol,
    descriptor: TypeDescriptor,
    element: ElementRef<'_>,
) -> EncodingResult<()> {
    use ElementRef as E;
    use TypeDescriptor as D;

    match (descriptor, element) {
        (D::Bool, E::Bool(v)) => container.encode_bool(v),
        (D::String, E::String(v)) => container.encode_str(v),
        (D::I8, E::I8(v)) => container.encode_i8(v),
        (D::I16, E::I16(v)) => container.encode_i16(v),
        (D::I32, E::I32(v)) => container.encode_i32(v),
        (D::I64, E::I64(v)) => container.encode_i64(v),
        (D::U8, E::U8(v)) => container.encode_u8(v),
        (D::U16, E::U16(v)) => container.encode_u16(v),
        (D::U32, E::U32(v)) => container.encode_u32(v),
        (D::U64, E::U64(v)) => container.encode_u64(v),
        (D::F32, E::F32(v)) => container.encode_f32(v),
        (D::F64, E::F64(v)) => container.encode_f64(v),
        (D::Codable, E::Codable(v)) => container.encode_encodable(v),
        (declared, found) => unsupported(declared, found.descriptor()),
    }
}

/// Write one erased element under `key` of a keyed container.
///
/// # Panics
///
/// Panics if `element` is not of kind `descriptor`.
pub fn encode_keyed_element(
    container: &mut dyn KeyedEncodingContainerProtocol,
    key: &AnyKey,
    descriptor: TypeDescriptor,
    element: ElementRef<'_>,
) -> EncodingResult<()> {
    use ElementRef as E;
    use TypeDescriptor as D;

    match (descriptor, element) {
        (D::Bool, E::Bool(v)) => container.encode_bool(v, key),
        (D::String, E::String(v)) => container.encode_str(v, key),
        (D::I8, E::I8(v)) => container.encode_i8(v, key),
        (D::I16, E::I16(v)) => container.encode_i16(v, key),
        (D::I32, E::I32(v)) => container.encode_i32(v, key),
        (D::I64, E::I64(v)) => container.encode_i64(v, key),
        (D::U8, E::U8(v)) => container.encode_u8(v, key),
        (D::U16, E::U16(v)) => container.encode_u16(v, key),
        (D::U32, E::U32(v)) => container.encode_u32(v, key),
        (D::U64, E::U64(v)) => container.encode_u64(v, key),
        (D::F32, E::F32(v)) => container.encode_f32(v, key),
        (D::F64, E::F64(v)) => container.encode_f64(v, key),
        (D::Codable, E::Codable(v)) => container.encode_encodable(v, key),
        (declared, found) => unsupported(declared, found.descriptor()),
    }
}

// ---------------------------------------------------------------------------
// Element decode tables
// ---------------------------------------------------------------------------

/// The unkeyed decode function for elements declared as `descriptor`.
///
/// # Panics
///
/// Panics if `descriptor` is not `T`'s declared kind.
pub fn unkeyed_decoder<T: Element>(descriptor: TypeDescriptor) -> UnkeyedDecodeFn<T> {
    use TypeDescriptor as D;

    check_declared::<T>(descriptor);

    macro_rules! primitive {
        ($method:ident, $variant:ident) => {
            (|c: &mut dyn UnkeyedDecodingContainerProtocol| {
                c.$method().map(|v| lift::<T>(Primitive::$variant(v)))
            }) as UnkeyedDecodeFn<T>
        };
    }

    match descriptor {
        D::Bool => primitive!(decode_bool, Bool),
        D::String => primitive!(decode_string, String),
        D::I8 => primitive!(decode_i8, I8),
        D::I16 => primitive!(decode_i16, I16),
        D::I32 => primitive!(decode_i32, I32),
        D::I64 => primitive!(decode_i64, I64),
        D::U8 => primitive!(decode_u8, U8),
        D::U16 => primitive!(decode_u16, U16),
        D::U32 => primitive!(decode_u32, U32),
        D::U64 => primitive!(decode_u64, U64),
        D::F32 => primitive!(decode_f32, F32),
        D::F64 => primitive!(decode_f64, F64),
        D::Codable => {
            (|c: &mut dyn UnkeyedDecodingContainerProtocol| T::decode(&*c.super_decoder()?))
                as UnkeyedDecodeFn<T>
        }
    }
}

/// The keyed decode function for values declared as `descriptor`.
///
/// # Panics
///
/// Panics if `descriptor` is not `T`'s declared kind.
pub fn keyed_decoder<T: Element>(descriptor: TypeDescriptor) -> KeyedDecodeFn<T> {
    use TypeDescriptor as D;

    check_declared::<T>(descriptor);

    macro_rules! primitive {
        ($method:ident, $variant:ident) => {
            (|c: &dyn KeyedDecodingContainerProtocol, key: &AnyKey| {
                c.$method(key).map(|v| lift::<T>(Primitive::$variant(v)))
            }) as KeyedDecodeFn<T>
        };
    }

    match descriptor {
        D::Bool => primitive!(decode_bool, Bool),
        D::String => primitive!(decode_string, String),
        D::I8 => primitive!(decode_i8, I8),
        D::I16 => primitive!(decode_i16, I16),
        D::I32 => primitive!(decode_i32, I32),
        D::I64 => primitive!(decode_i64, I64),
        D::U8 => primitive!(decode_u8, U8),
        D::U16 => primitive!(decode_u16, U16),
        D::U32 => primitive!(decode_u32, U32),
        D::U64 => primitive!(decode_u64, U64),
        D::F32 => primitive!(decode_f32, F32),
        D::F64 => primitive!(decode_f64, F64),
        D::Codable => {
            (|c: &dyn KeyedDecodingContainerProtocol, key: &AnyKey| {
                T::decode(&*c.decoder_for_key(key)?)
            }) as KeyedDecodeFn<T>
        }
    }
}

// ---------------------------------------------------------------------------
// Sequences
// ---------------------------------------------------------------------------

/// Append every element in iteration order.
pub fn encode_sequence<'v, I>(
    container: &mut dyn UnkeyedEncodingContainerProtocol,
    descriptor: TypeDescriptor,
    elements: I,
) -> EncodingResult<()>
where
    I: IntoIterator<Item = ElementRef<'v>>,
{
    trace!(element = %descriptor, path = %container.coding_path(), "encoding sequence");
    for element in elements {
        encode_element(container, descriptor, element)?;
    }
    Ok(())
}

/// Decode elements until the container reports its end.
pub fn decode_sequence<T: Element>(
    container: &mut dyn UnkeyedDecodingContainerProtocol,
    descriptor: TypeDescriptor,
) -> DecodingResult<Vec<T>> {
    let decode = unkeyed_decoder::<T>(descriptor);
    trace!(element = %descriptor, path = %container.coding_path(), "decoding sequence");

    let mut elements = Vec::with_capacity(container.count().unwrap_or(0));
    while !container.is_at_end() {
        elements.push(decode(&mut *container)?);
    }
    Ok(elements)
}

// ---------------------------------------------------------------------------
// Mappings
// ---------------------------------------------------------------------------

/// Field name for a map key under the keyed layout.
///
/// # Panics
///
/// Panics if `key` is not of kind `descriptor`, or `descriptor` does not
/// select the keyed layout.
pub fn dictionary_key(descriptor: TypeDescriptor, key: ElementRef<'_>) -> DictionaryKey {
    use ElementRef as E;
    use TypeDescriptor as D;

    match (descriptor, key) {
        (D::String, E::String(v)) => DictionaryKey::new(v),
        (D::I8, E::I8(v)) => DictionaryKey::new(v.to_string()),
        (D::I16, E::I16(v)) => DictionaryKey::new(v.to_string()),
        (D::I32, E::I32(v)) => DictionaryKey::new(v.to_string()),
        (D::I64, E::I64(v)) => DictionaryKey::new(v.to_string()),
        (D::U8, E::U8(v)) => DictionaryKey::new(v.to_string()),
        (D::U16, E::U16(v)) => DictionaryKey::new(v.to_string()),
        (D::U32, E::U32(v)) => DictionaryKey::new(v.to_string()),
        (D::U64, E::U64(v)) => DictionaryKey::new(v.to_string()),
        (declared, found) => unsupported(declared, found.descriptor()),
    }
}

fn parse_int<N>(key: &AnyKey, path: &CodingPath, descriptor: TypeDescriptor) -> DecodingResult<N>
where
    N: TryFrom<i64> + FromStr,
{
    key.int_value()
        .and_then(|v| N::try_from(v).ok())
        .or_else(|| key.string_value().parse::<N>().ok())
        .ok_or_else(|| {
            DecodingError::data_corrupted(
                &path.appending(key),
                format!("dictionary key {key} is not a valid {descriptor}"),
            )
        })
}

/// Rebuild a map key from the field name it was encoded under.
///
/// Integer keys come from the key's integer value, falling back to its
/// string value. A key that parses as neither is data-corrupted.
pub fn parse_dictionary_key<K: Element>(
    descriptor: TypeDescriptor,
    key: &AnyKey,
    path: &CodingPath,
) -> DecodingResult<K> {
    use TypeDescriptor as D;

    check_declared::<K>(descriptor);

    let primitive = match descriptor {
        D::String => Primitive::String(key.string_value().to_owned()),
        D::I8 => Primitive::I8(parse_int(key, path, descriptor)?),
        D::I16 => Primitive::I16(parse_int(key, path, descriptor)?),
        D::I32 => Primitive::I32(parse_int(key, path, descriptor)?),
        D::I64 => Primitive::I64(parse_int(key, path, descriptor)?),
        D::U8 => Primitive::U8(parse_int(key, path, descriptor)?),
        D::U16 => Primitive::U16(parse_int(key, path, descriptor)?),
        D::U32 => Primitive::U32(parse_int(key, path, descriptor)?),
        D::U64 => Primitive::U64(parse_int(key, path, descriptor)?),
        other => unsupported(other, D::String),
    };
    Ok(lift::<K>(primitive))
}

/// Encode a mapping in the layout its key kind selects.
///
/// String and integer keys produce a keyed container with one entry per
/// map key. Any other key kind produces an unkeyed container of
/// `2 * len` elements, key then value, in iteration order.
pub fn encode_mapping<'v, I>(
    encoder: &mut dyn Encoder,
    key_descriptor: TypeDescriptor,
    value_descriptor: TypeDescriptor,
    entries: I,
) -> EncodingResult<()>
where
    I: IntoIterator<Item = (ElementRef<'v>, ElementRef<'v>)>,
{
    let layout = mapping_layout(key_descriptor);
    trace!(
        key = %key_descriptor,
        value = %value_descriptor,
        ?layout,
        path = %encoder.coding_path(),
        "encoding mapping"
    );

    match layout {
        MappingLayout::Keyed => {
            let mut container = encoder.keyed();
            for (key, value) in entries {
                let key = AnyKey::from(dictionary_key(key_descriptor, key));
                encode_keyed_element(&mut *container, &key, value_descriptor, value)?;
            }
        }
        MappingLayout::Pairs => {
            let mut container = encoder.unkeyed();
            for (key, value) in entries {
                encode_element(&mut *container, key_descriptor, key)?;
                encode_element(&mut *container, value_descriptor, value)?;
            }
        }
    }
    Ok(())
}

/// Decode a mapping from the layout its key kind selects.
///
/// Entries are produced in consumption order; a repeated key keeps the
/// last value read.
pub fn decode_mapping<K, V, M>(
    decoder: &dyn Decoder,
    key_descriptor: TypeDescriptor,
    value_descriptor: TypeDescriptor,
) -> DecodingResult<M>
where
    K: Element,
    V: Element,
    M: FromIterator<(K, V)>,
{
    let layout = mapping_layout(key_descriptor);
    trace!(
        key = %key_descriptor,
        value = %value_descriptor,
        ?layout,
        path = %decoder.coding_path(),
        "decoding mapping"
    );

    match layout {
        MappingLayout::Keyed => {
            check_declared::<K>(key_descriptor);
            let decode_value = keyed_decoder::<V>(value_descriptor);
            let container = decoder.keyed()?;
            let path = container.coding_path().clone();
            container
                .all_keys()
                .into_iter()
                .map(|key| {
                    let parsed = parse_dictionary_key::<K>(key_descriptor, &key, &path)?;
                    let value = decode_value(&*container, &key)?;
                    Ok((parsed, value))
                })
                .collect()
        }
        MappingLayout::Pairs => {
            let decode_key = unkeyed_decoder::<K>(key_descriptor);
            let decode_value = unkeyed_decoder::<V>(value_descriptor);
            let mut container = decoder.unkeyed()?;

            let mut entries = Vec::with_capacity(container.count().map_or(0, |n| n / 2));
            while !container.is_at_end() {
                let key = decode_key(&mut *container)?;
                let value = decode_value(&mut *container)?;
                entries.push((key, value));
            }
            Ok(entries.into_iter().collect())
        }
    }
}

/// Typed form of [`encode_mapping`] for maps whose key and value types are
/// known statically.
pub fn encode_typed_mapping<'v, K, V, I>(encoder: &mut dyn Encoder, entries: I) -> EncodingResult<()>
where
    K: Element + 'v,
    V: Element + 'v,
    I: IntoIterator<Item = (&'v K, &'v V)>,
{
    encode_mapping(
        encoder,
        K::DESCRIPTOR,
        V::DESCRIPTOR,
        entries.into_iter().map(|(k, v)| (k.erase(), v.erase())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_keys_stringify() {
        assert_eq!(
            dictionary_key(TypeDescriptor::I32, ElementRef::I32(-7)).as_str(),
            "-7"
        );
        assert_eq!(
            dictionary_key(TypeDescriptor::U64, ElementRef::U64(u64::MAX)).as_str(),
            "18446744073709551615"
        );
        assert_eq!(
            dictionary_key(TypeDescriptor::String, ElementRef::String("name")).as_str(),
            "name"
        );
    }

    #[test]
    fn dictionary_key_carries_no_int_value() {
        let key = AnyKey::from(dictionary_key(TypeDescriptor::I64, ElementRef::I64(3)));
        assert_eq!(key.string_value(), "3");
        assert_eq!(key.int_value(), None);
    }

    #[test]
    fn parse_integer_key_from_string() {
        let path = CodingPath::root();
        let key = AnyKey::string("42");
        let parsed: u16 = parse_dictionary_key(TypeDescriptor::U16, &key, &path).unwrap();
        assert_eq!(parsed, 42);
    }

    #[test]
    fn parse_integer_key_prefers_int_value() {
        let path = CodingPath::root();
        let parsed: i8 = parse_dictionary_key(TypeDescriptor::I8, &AnyKey::int(-5), &path).unwrap();
        assert_eq!(parsed, -5);
    }

    #[test]
    fn unparseable_integer_key_is_data_corrupted() {
        let path = CodingPath::root().appending(&AnyKey::string("counts"));
        let key = AnyKey::string("seven");
        let err = parse_dictionary_key::<i32>(TypeDescriptor::I32, &key, &path).unwrap_err();

        assert!(matches!(err, DecodingError::DataCorrupted { .. }));
        assert_eq!(err.path().to_string(), "counts.seven");
    }

    #[test]
    fn out_of_range_integer_key_is_data_corrupted() {
        let path = CodingPath::root();
        let err = parse_dictionary_key::<u8>(TypeDescriptor::U8, &AnyKey::string("300"), &path).unwrap_err();
        assert!(matches!(err, DecodingError::DataCorrupted { .. }));
    }

    #[test]
    fn string_key_parses_verbatim() {
        let path = CodingPath::root();
        let parsed: String =
            parse_dictionary_key(TypeDescriptor::String, &AnyKey::string("Index 0"), &path).unwrap();
        assert_eq!(parsed, "Index 0");
    }

    #[test]
    #[should_panic(expected = "cannot dispatch")]
    fn mismatched_key_element_is_fatal() {
        dictionary_key(TypeDescriptor::I32, ElementRef::String("1"));
    }

    #[test]
    #[should_panic(expected = "cannot dispatch")]
    fn non_keyed_key_kind_has_no_field_name() {
        dictionary_key(TypeDescriptor::Bool, ElementRef::Bool(true));
    }

    #[test]
    #[should_panic(expected = "cannot dispatch")]
    fn decoder_for_wrong_declared_kind_is_fatal() {
        let _ = unkeyed_decoder::<i32>(TypeDescriptor::String);
    }

    #[test]
    #[should_panic(expected = "cannot dispatch")]
    fn keyed_decoder_for_wrong_declared_kind_is_fatal() {
        let _ = keyed_decoder::<String>(TypeDescriptor::Codable);
    }
}
