//! Type descriptors and element erasure.
//!
//! Collection values reach the dispatcher with their element types erased:
//! each element is handed over as an [`ElementRef`], and the caller names the
//! declared element kind with an explicit [`TypeDescriptor`]. The descriptor,
//! not the runtime value, selects the container operation. [`Element`] ties a
//! Rust type to its descriptor so call sites can reify it from the declared
//! type with [`TypeDescriptor::of`].

use std::fmt;

use crate::traits::{Decodable, Encodable};

/// The closed set of kinds the collection dispatcher knows how to drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Bool,
    String,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// Anything that encodes and decodes itself through an encoder.
    Codable,
}

impl TypeDescriptor {
    /// The descriptor declared by `T`.
    pub fn of<T: Element>() -> Self {
        T::DESCRIPTOR
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Codable => "codable",
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
        )
    }

    pub fn is_primitive(self) -> bool {
        self != Self::Codable
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a mapping is laid out in its container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MappingLayout {
    /// Keyed container, one entry per map key (stringified).
    Keyed,
    /// Unkeyed container of `2 * len` elements: key, value, key, value, ...
    Pairs,
}

impl fmt::Display for MappingLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyed => f.write_str("keyed"),
            Self::Pairs => f.write_str("pairs"),
        }
    }
}

/// Select the mapping layout from the key descriptor.
///
/// Encode and decode both call this, so the two sides always agree: string
/// and integer keys can be rendered as field names, nothing else can.
pub fn mapping_layout(key: TypeDescriptor) -> MappingLayout {
    if key == TypeDescriptor::String || key.is_integer() {
        MappingLayout::Keyed
    } else {
        MappingLayout::Pairs
    }
}

/// A borrowed, type-erased collection element.
#[derive(Clone, Copy)]
pub enum ElementRef<'a> {
    Bool(bool),
    String(&'a str),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Codable(&'a dyn Encodable),
}

impl ElementRef<'_> {
    /// The runtime kind of this element.
    pub fn descriptor(&self) -> TypeDescriptor {
        match self {
            Self::Bool(_) => TypeDescriptor::Bool,
            Self::String(_) => TypeDescriptor::String,
            Self::I8(_) => TypeDescriptor::I8,
            Self::I16(_) => TypeDescriptor::I16,
            Self::I32(_) => TypeDescriptor::I32,
            Self::I64(_) => TypeDescriptor::I64,
            Self::U8(_) => TypeDescriptor::U8,
            Self::U16(_) => TypeDescriptor::U16,
            Self::U32(_) => TypeDescriptor::U32,
            Self::U64(_) => TypeDescriptor::U64,
            Self::F32(_) => TypeDescriptor::F32,
            Self::F64(_) => TypeDescriptor::F64,
            Self::Codable(_) => TypeDescriptor::Codable,
        }
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "Bool({v})"),
            Self::String(v) => write!(f, "String({v:?})"),
            Self::I8(v) => write!(f, "I8({v})"),
            Self::I16(v) => write!(f, "I16({v})"),
            Self::I32(v) => write!(f, "I32({v})"),
            Self::I64(v) => write!(f, "I64({v})"),
            Self::U8(v) => write!(f, "U8({v})"),
            Self::U16(v) => write!(f, "U16({v})"),
            Self::U32(v) => write!(f, "U32({v})"),
            Self::U64(v) => write!(f, "U64({v})"),
            Self::F32(v) => write!(f, "F32({v})"),
            Self::F64(v) => write!(f, "F64({v})"),
            Self::Codable(_) => write!(f, "Codable(..)"),
        }
    }
}

/// An owned primitive produced by a dispatched decode.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Bool(bool),
    String(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Primitive {
    pub fn descriptor(&self) -> TypeDescriptor {
        match self {
            Self::Bool(_) => TypeDescriptor::Bool,
            Self::String(_) => TypeDescriptor::String,
            Self::I8(_) => TypeDescriptor::I8,
            Self::I16(_) => TypeDescriptor::I16,
            Self::I32(_) => TypeDescriptor::I32,
            Self::I64(_) => TypeDescriptor::I64,
            Self::U8(_) => TypeDescriptor::U8,
            Self::U16(_) => TypeDescriptor::U16,
            Self::U32(_) => TypeDescriptor::U32,
            Self::U64(_) => TypeDescriptor::U64,
            Self::F32(_) => TypeDescriptor::F32,
            Self::F64(_) => TypeDescriptor::F64,
        }
    }
}

/// A type usable as a collection element, map key, or map value.
///
/// User types normally take every default: they declare the
/// [`Codable`](TypeDescriptor::Codable) descriptor and are encoded through
/// their own [`Encodable`] implementation.
///
/// ```
/// use codable_core::{Decodable, DecodingResult, Decoder, Element, Encodable, Encoder, EncodingResult};
///
/// struct Tag(String);
///
/// impl Encodable for Tag {
///     fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
///         self.0.encode(encoder)
///     }
/// }
///
/// impl Decodable for Tag {
///     fn decode(decoder: &dyn Decoder) -> DecodingResult<Self> {
///         String::decode(decoder).map(Tag)
///     }
/// }
///
/// impl Element for Tag {}
/// ```
pub trait Element: Encodable + Decodable + Sized {
    /// The declared kind of this type.
    const DESCRIPTOR: TypeDescriptor = TypeDescriptor::Codable;

    /// Borrow this value as an erased element. Must report the same kind as
    /// [`DESCRIPTOR`](Self::DESCRIPTOR).
    fn erase(&self) -> ElementRef<'_> {
        ElementRef::Codable(self)
    }

    /// Rebuild a value from a dispatched primitive decode.
    ///
    /// Returns `None` if the primitive is not of this type's kind.
    fn from_primitive(_value: Primitive) -> Option<Self> {
        None
    }
}

macro_rules! primitive_element {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl Element for $ty {
                const DESCRIPTOR: TypeDescriptor = TypeDescriptor::$variant;

                fn erase(&self) -> ElementRef<'_> {
                    ElementRef::$variant(*self)
                }

                fn from_primitive(value: Primitive) -> Option<Self> {
                    match value {
                        Primitive::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )+
    };
}

primitive_element! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl Element for String {
    const DESCRIPTOR: TypeDescriptor = TypeDescriptor::String;

    fn erase(&self) -> ElementRef<'_> {
        ElementRef::String(self)
    }

    fn from_primitive(value: Primitive) -> Option<Self> {
        match value {
            Primitive::String(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_and_integer_keys_are_keyed() {
        assert_eq!(mapping_layout(TypeDescriptor::String), MappingLayout::Keyed);
        for key in [
            TypeDescriptor::I8,
            TypeDescriptor::I16,
            TypeDescriptor::I32,
            TypeDescriptor::I64,
            TypeDescriptor::U8,
            TypeDescriptor::U16,
            TypeDescriptor::U32,
            TypeDescriptor::U64,
        ] {
            assert_eq!(mapping_layout(key), MappingLayout::Keyed, "{key}");
        }
    }

    #[test]
    fn other_keys_are_pairs() {
        for key in [
            TypeDescriptor::Bool,
            TypeDescriptor::F32,
            TypeDescriptor::F64,
            TypeDescriptor::Codable,
        ] {
            assert_eq!(mapping_layout(key), MappingLayout::Pairs, "{key}");
        }
    }

    #[test]
    fn erased_kind_matches_declared_kind() {
        assert_eq!(true.erase().descriptor(), bool::DESCRIPTOR);
        assert_eq!(7u16.erase().descriptor(), u16::DESCRIPTOR);
        assert_eq!(1.5f32.erase().descriptor(), f32::DESCRIPTOR);
        assert_eq!("x".to_string().erase().descriptor(), String::DESCRIPTOR);
        assert_eq!(TypeDescriptor::of::<i64>(), TypeDescriptor::I64);
    }

    #[test]
    fn from_primitive_rejects_other_kinds() {
        assert_eq!(i32::from_primitive(Primitive::I32(4)), Some(4));
        assert_eq!(i32::from_primitive(Primitive::I64(4)), None);
        assert_eq!(
            String::from_primitive(Primitive::String("a".into())),
            Some("a".to_string())
        );
        assert_eq!(String::from_primitive(Primitive::Bool(true)), None);
    }

    #[test]
    fn primitive_descriptor() {
        assert_eq!(Primitive::U8(1).descriptor(), TypeDescriptor::U8);
        assert!(TypeDescriptor::U8.is_primitive());
        assert!(!TypeDescriptor::Codable.is_primitive());
        assert!(!TypeDescriptor::F64.is_integer());
    }
}
