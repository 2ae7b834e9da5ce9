//! In-memory reference backend for `codable-core`.
//!
//! [`ValueEncoder`] encodes any [`Encodable`](codable_core::Encodable) into a
//! [`Value`] tree, and [`ValueDecoder`] decodes any
//! [`Decodable`](codable_core::Decodable) back out of one. Both implement
//! every container variant and bridge to JSON text through `serde_json`.
//!
//! # Representation
//!
//! - keyed containers become [`Value::Object`], in write order
//! - unkeyed containers become [`Value::Array`]
//! - signed integers become [`Value::Int`], unsigned [`Value::UInt`], both
//!   float widths [`Value::Float`]
//! - nil becomes [`Value::Null`]

pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod value;

pub use config::CodingConfig;
pub use decoder::ValueDecoder;
pub use encoder::ValueEncoder;
pub use error::{ValueError, ValueResult};
pub use value::{Object, Value};

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet, HashMap};

    use codable_core::{
        coding_keys, Decodable, Decoder, DecodingError, DecodingResult, Element, ElementRef,
        Encodable, Encoder, EncodingResult, TypeDescriptor,
    };
    use indexmap::{IndexMap, IndexSet};
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    fn round_trip<T: Encodable + Decodable>(value: &T) -> T {
        let encoded = ValueEncoder::new().encode(value).unwrap();
        ValueDecoder::new().decode(&encoded).unwrap()
    }

    fn json_of<T: Encodable + ?Sized>(value: &T) -> serde_json::Value {
        ValueEncoder::new().encode(value).unwrap().to_json().unwrap()
    }

    /// A map key that is neither a string nor an integer.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    enum Slot {
        KeyA,
        KeyB,
    }

    impl Encodable for Slot {
        fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
            let name = match self {
                Slot::KeyA => "KeyA",
                Slot::KeyB => "KeyB",
            };
            encoder.single_value_container().encode_str(name)
        }
    }

    impl Decodable for Slot {
        fn decode(decoder: &dyn Decoder) -> DecodingResult<Self> {
            match String::decode(decoder)?.as_str() {
                "KeyA" => Ok(Slot::KeyA),
                "KeyB" => Ok(Slot::KeyB),
                other => Err(DecodingError::data_corrupted(
                    decoder.coding_path(),
                    format!("unknown slot {other:?}"),
                )),
            }
        }
    }

    impl Element for Slot {}

    coding_keys! {
        enum OrderKey {
            Id = "id",
            Lines = "lines",
            Totals = "totals",
        }
    }

    #[derive(Debug, PartialEq)]
    struct Order {
        id: u64,
        lines: Vec<Line>,
        totals: BTreeMap<Slot, f64>,
    }

    #[derive(Debug, PartialEq)]
    struct Line {
        sku: String,
        qty: u16,
    }

    coding_keys! {
        enum LineKey {
            Sku = "sku",
            Qty = "qty",
        }
    }

    impl Encodable for Line {
        fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
            let mut container = encoder.container::<LineKey>();
            container.encode_str(&self.sku, LineKey::Sku)?;
            container.encode_u16(self.qty, LineKey::Qty)
        }
    }

    impl Decodable for Line {
        fn decode(decoder: &dyn Decoder) -> DecodingResult<Self> {
            let container = decoder.container::<LineKey>()?;
            Ok(Self {
                sku: container.decode_string(LineKey::Sku)?,
                qty: container.decode_u16(LineKey::Qty)?,
            })
        }
    }

    impl Element for Line {}

    impl Encodable for Order {
        fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
            let mut container = encoder.container::<OrderKey>();
            container.encode_u64(self.id, OrderKey::Id)?;
            container.encode(&self.lines, OrderKey::Lines)?;
            container.encode(&self.totals, OrderKey::Totals)
        }
    }

    impl Decodable for Order {
        fn decode(decoder: &dyn Decoder) -> DecodingResult<Self> {
            let container = decoder.container::<OrderKey>()?;
            Ok(Self {
                id: container.decode(OrderKey::Id)?,
                lines: container.decode(OrderKey::Lines)?,
                totals: container.decode(OrderKey::Totals)?,
            })
        }
    }

    // -----------------------------------------------------------------------
    // Primitives
    // -----------------------------------------------------------------------

    proptest! {
        #[test]
        fn signed_round_trip(a in any::<i8>(), b in any::<i16>(), c in any::<i32>(), d in any::<i64>()) {
            prop_assert_eq!(round_trip(&a), a);
            prop_assert_eq!(round_trip(&b), b);
            prop_assert_eq!(round_trip(&c), c);
            prop_assert_eq!(round_trip(&d), d);
        }

        #[test]
        fn unsigned_round_trip(a in any::<u8>(), b in any::<u16>(), c in any::<u32>(), d in any::<u64>()) {
            prop_assert_eq!(round_trip(&a), a);
            prop_assert_eq!(round_trip(&b), b);
            prop_assert_eq!(round_trip(&c), c);
            prop_assert_eq!(round_trip(&d), d);
        }

        #[test]
        fn float_round_trip(
            a in prop::num::f32::NORMAL | prop::num::f32::ZERO,
            b in prop::num::f64::NORMAL | prop::num::f64::ZERO,
        ) {
            prop_assert_eq!(round_trip(&a), a);
            prop_assert_eq!(round_trip(&b), b);
        }

        #[test]
        fn bool_and_string_round_trip(flag in any::<bool>(), text in ".*") {
            prop_assert_eq!(round_trip(&flag), flag);
            prop_assert_eq!(round_trip(&text), text);
        }

        #[test]
        fn integers_survive_json(v in any::<i64>(), u in any::<u64>()) {
            let encoder = ValueEncoder::new();
            let decoder = ValueDecoder::new();
            prop_assert_eq!(decoder.decode_json::<i64>(&encoder.encode_json(&v).unwrap()).unwrap(), v);
            prop_assert_eq!(decoder.decode_json::<u64>(&encoder.encode_json(&u).unwrap()).unwrap(), u);
        }
    }

    #[test]
    fn option_is_null_when_absent() {
        assert_eq!(json_of(&None::<i32>), json!(null));
        assert_eq!(round_trip(&Some(5i32)), Some(5));
        assert_eq!(round_trip(&None::<String>), None);
    }

    // -----------------------------------------------------------------------
    // Sequences and sets
    // -----------------------------------------------------------------------

    #[test]
    fn sequence_preserves_order() {
        let words = vec!["c".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(json_of(&words), json!(["c", "a", "b"]));
        assert_eq!(round_trip(&words), words);

        let nested = vec![vec![1u8], vec![], vec![2, 3]];
        assert_eq!(round_trip(&nested), nested);
    }

    #[test]
    fn sets_deduplicate_on_decode() {
        let decoder = ValueDecoder::new();
        let sorted: BTreeSet<i32> = decoder.decode(&Value::from(json!([3, 1, 3, 2]))).unwrap();
        assert_eq!(sorted.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);

        let ordered: IndexSet<i32> = decoder.decode(&Value::from(json!([3, 1, 3]))).unwrap();
        assert_eq!(ordered.into_iter().collect::<Vec<_>>(), vec![3, 1]);

        let set: BTreeSet<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
        assert_eq!(round_trip(&set), set);
    }

    #[test]
    fn records_inside_sequences_get_index_paths() {
        let err = ValueDecoder::new()
            .decode::<Vec<Line>>(&Value::from(json!([
                {"sku": "a", "qty": 1},
                {"sku": "b", "qty": "two"}
            ])))
            .unwrap_err();
        assert!(matches!(err, DecodingError::TypeMismatch { .. }));
        assert_eq!(err.path().to_string(), "Index 1.qty");
    }

    // -----------------------------------------------------------------------
    // Mappings
    // -----------------------------------------------------------------------

    #[test]
    fn integer_keyed_map_becomes_object() {
        let map: BTreeMap<i32, String> = [(1, "x".to_string()), (2, "y".to_string())].into();
        assert_eq!(json_of(&map), json!({"1": "x", "2": "y"}));
        assert_eq!(round_trip(&map), map);

        let parsed: BTreeMap<i32, String> = ValueDecoder::new()
            .decode_json(r#"{"1": "x", "2": "y"}"#)
            .unwrap();
        assert_eq!(parsed, map);
    }

    #[test]
    fn string_keyed_map_becomes_object() {
        let mut map = IndexMap::new();
        map.insert("b".to_string(), true);
        map.insert("a".to_string(), false);
        assert_eq!(
            ValueEncoder::new().encode_json(&map).unwrap(),
            r#"{"b":true,"a":false}"#
        );
        assert_eq!(round_trip(&map), map);
    }

    #[test]
    fn other_keys_become_interleaved_pairs() {
        let map: BTreeMap<Slot, i32> = [(Slot::KeyA, 1), (Slot::KeyB, 2)].into();
        let json = json_of(&map);
        assert_eq!(json, json!(["KeyA", 1, "KeyB", 2]));
        assert_eq!(json.as_array().map(Vec::len), Some(2 * map.len()));
        assert_eq!(round_trip(&map), map);
    }

    #[test]
    fn pair_decode_follows_consumption_order() {
        let map: IndexMap<Slot, i32> = ValueDecoder::new()
            .decode(&Value::from(json!(["KeyB", 2, "KeyA", 1])))
            .unwrap();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![Slot::KeyB, Slot::KeyA]);
    }

    #[test]
    fn repeated_pair_key_keeps_last_value() {
        let map: HashMap<Slot, i32> = ValueDecoder::new()
            .decode(&Value::from(json!(["KeyA", 1, "KeyA", 5])))
            .unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&Slot::KeyA], 5);
    }

    #[test]
    fn odd_pair_sequence_is_data_corrupted() {
        let err = ValueDecoder::new()
            .decode::<HashMap<Slot, i32>>(&Value::from(json!(["KeyA"])))
            .unwrap_err();
        assert!(matches!(err, DecodingError::DataCorrupted { .. }));
    }

    #[test]
    fn unparseable_integer_key_is_data_corrupted() {
        let err = ValueDecoder::new()
            .decode::<HashMap<u8, bool>>(&Value::from(json!({"1": true, "one": false})))
            .unwrap_err();
        assert!(matches!(err, DecodingError::DataCorrupted { .. }));
        assert_eq!(err.path().to_string(), "one");
    }

    #[test]
    fn nested_record_round_trip() {
        let order = Order {
            id: 42,
            lines: vec![
                Line { sku: "a-1".into(), qty: 2 },
                Line { sku: "b-7".into(), qty: 1 },
            ],
            totals: [(Slot::KeyA, 9.5), (Slot::KeyB, 0.0)].into(),
        };

        assert_eq!(
            json_of(&order),
            json!({
                "id": 42,
                "lines": [{"sku": "a-1", "qty": 2}, {"sku": "b-7", "qty": 1}],
                "totals": ["KeyA", 9.5, "KeyB", 0.0]
            })
        );
        assert_eq!(round_trip(&order), order);

        let text = ValueEncoder::with_config(CodingConfig::canonical())
            .encode_json(&order)
            .unwrap();
        assert_eq!(ValueDecoder::new().decode_json::<Order>(&text).unwrap(), order);
    }

    // -----------------------------------------------------------------------
    // Fatal dispatch
    // -----------------------------------------------------------------------

    #[test]
    #[should_panic(expected = "cannot dispatch a string element under declared kind i32")]
    fn mismatched_element_kind_aborts_encode() {
        struct Mixed;
        impl Encodable for Mixed {
            fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
                encoder
                    .unkeyed_container()
                    .encode_contents_of(TypeDescriptor::I32, [ElementRef::I32(1), ElementRef::String("x")])
            }
        }

        let _ = ValueEncoder::new().encode(&Mixed);
    }

    #[test]
    #[should_panic(expected = "cannot dispatch")]
    fn primitive_under_codable_descriptor_aborts_encode() {
        struct Loose;
        impl Encodable for Loose {
            fn encode(&self, encoder: &mut dyn Encoder) -> EncodingResult<()> {
                encoder
                    .unkeyed_container()
                    .encode_contents_of(TypeDescriptor::Codable, [ElementRef::Bool(true)])
            }
        }

        let _ = ValueEncoder::new().encode(&Loose);
    }

    #[test]
    #[should_panic(expected = "cannot dispatch")]
    fn mismatched_declared_kind_aborts_decode() {
        struct Wrong;
        impl Decodable for Wrong {
            fn decode(decoder: &dyn Decoder) -> DecodingResult<Self> {
                let mut items = decoder.unkeyed_container()?;
                let _: Vec<i32> = items.decode_contents(TypeDescriptor::String)?;
                Ok(Wrong)
            }
        }

        let _ = ValueDecoder::new().decode::<Wrong>(&Value::from(json!(["a"])));
    }
}
