//! Format-independent encoding and decoding of structured values.
//!
//! Types describe how they serialize by implementing [`Encodable`] and
//! [`Decodable`] against an abstract [`Encoder`] / [`Decoder`]. A concrete
//! backend supplies the encoder, the decoder, and the six container
//! variants over its own representation; this crate never touches bytes.
//!
//! # Containers
//!
//! - [`KeyedEncodingContainer`] / [`KeyedDecodingContainer`] -- named fields
//! - [`UnkeyedEncodingContainer`] / [`UnkeyedDecodingContainer`] -- ordered
//!   sequence with a forward-only decode cursor
//! - [`SingleValueEncodingContainer`] / [`SingleValueDecodingContainer`] --
//!   exactly one leaf
//!
//! # Collections
//!
//! Sequences and mappings are driven by the [`dispatch`] module from an
//! explicit [`TypeDescriptor`]. Mappings with string or integer keys become
//! keyed objects; every other key kind becomes a flat key/value sequence.
//!
//! # Design Rules
//!
//! 1. Containers are unidirectional: encode containers never read, decode
//!    containers never write.
//! 2. A nested container borrows its parent and extends its path by exactly
//!    one key.
//! 3. Every decode error carries the coding path at the point of failure.
//! 4. Encode and decode select a mapping layout with the same function.
//! 5. An element kind the dispatcher has no entry for panics; it is never
//!    reported as a decode error.

pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod impls;
pub mod key;
pub mod keyed;
pub mod path;
pub mod traits;
pub mod unkeyed;
pub mod user_info;

pub use descriptor::{mapping_layout, Element, ElementRef, MappingLayout, Primitive, TypeDescriptor};
pub use error::{DecodingError, DecodingResult, EncodingError, EncodingResult};
pub use key::{AnyKey, CodingKey, DictionaryKey};
pub use keyed::{KeyedDecodingContainer, KeyedEncodingContainer};
pub use path::CodingPath;
pub use traits::{
    Codable, Decodable, Decoder, Encodable, Encoder, KeyedDecodingContainerProtocol,
    KeyedEncodingContainerProtocol, SingleValueDecodingContainer, SingleValueEncodingContainer,
    UnkeyedDecodingContainerProtocol, UnkeyedEncodingContainerProtocol,
};
pub use unkeyed::{UnkeyedDecodingContainer, UnkeyedEncodingContainer};
pub use user_info::{CodingUserInfoKey, UserInfo};
