//! String encoding of per-widget sizes and positions.
//!
//! Each map is stored as a JSON object keyed by the decimal widget id:
//!
//! ```text
//! {"3":{"width":320,"height":520}}
//! {"3":{"leftMargin":10,"topMargin":10}}
//! ```
//!
//! Decoding never fails. Anything that is not a well-formed object of
//! well-formed entries decodes to an empty map.

use super::{PositionMap, SizeMap};
use crate::host::WidgetId;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// Encoding of an empty map.
pub const EMPTY_ENCODING: &str = "{}";

/// Encode saved sizes.
pub fn encode_sizes(sizes: &SizeMap) -> String {
    encode(sizes, "sizes")
}

/// Decode saved sizes; malformed input yields an empty map.
pub fn decode_sizes(encoded: &str) -> SizeMap {
    decode(encoded, "sizes")
}

/// Encode saved positions.
pub fn encode_positions(positions: &PositionMap) -> String {
    encode(positions, "positions")
}

/// Decode saved positions; malformed input yields an empty map.
pub fn decode_positions(encoded: &str) -> PositionMap {
    decode(encoded, "positions")
}

fn encode<V: Serialize>(map: &BTreeMap<WidgetId, V>, what: &str) -> String {
    let mut object = serde_json::Map::new();
    for (id, value) in map {
        match serde_json::to_value(value) {
            Ok(value) => {
                object.insert(id.to_string(), value);
            }
            Err(e) => {
                log::error!("Failed to encode widget {}: {}", what, e);
                return EMPTY_ENCODING.to_string();
            }
        }
    }
    serde_json::Value::Object(object).to_string()
}

fn decode<V: DeserializeOwned>(encoded: &str, what: &str) -> BTreeMap<WidgetId, V> {
    let raw: BTreeMap<String, V> = match serde_json::from_str(encoded) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("Discarding malformed widget {}: {}", what, e);
            return BTreeMap::new();
        }
    };

    let mut decoded = BTreeMap::new();
    for (key, value) in raw {
        match key.parse::<WidgetId>() {
            // Only the form `encode` writes; "05" and "+5" would alias "5".
            Ok(id) if id.to_string() == key => {
                decoded.insert(id, value);
            }
            _ => {
                log::warn!("Discarding widget {}: invalid widget id '{}'", what, key);
                return BTreeMap::new();
            }
        }
    }
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{PositionState, SizeState};

    #[test]
    fn test_sizes_round_trip() {
        let mut sizes = SizeMap::new();
        sizes.insert(WidgetId(1), SizeState::new(300, 500));

        let encoded = encode_sizes(&sizes);
        assert_eq!(encoded, r#"{"1":{"width":300,"height":500}}"#);
        assert_eq!(decode_sizes(&encoded), sizes);
    }

    #[test]
    fn test_positions_round_trip() {
        let mut positions = PositionMap::new();
        positions.insert(WidgetId(3), PositionState::new(10, 10));
        positions.insert(WidgetId(12), PositionState::new(0, 240));
        positions.insert(WidgetId(-4), PositionState::new(7, 0));

        let encoded = encode_positions(&positions);
        assert!(encoded.contains(r#""3":{"leftMargin":10,"topMargin":10}"#));
        assert_eq!(decode_positions(&encoded), positions);
    }

    #[test]
    fn test_empty_map_encoding() {
        assert_eq!(encode_sizes(&SizeMap::new()), EMPTY_ENCODING);
        assert_eq!(encode_positions(&PositionMap::new()), EMPTY_ENCODING);
        assert!(decode_sizes(EMPTY_ENCODING).is_empty());
        assert!(decode_positions(EMPTY_ENCODING).is_empty());
    }

    #[test]
    fn test_malformed_input_decodes_empty() {
        for input in ["{", "", "[]", "42", "null", r#""text""#, "[{\"width\":1}]"] {
            assert!(decode_sizes(input).is_empty(), "sizes from {:?}", input);
            assert!(decode_positions(input).is_empty(), "positions from {:?}", input);
        }
    }

    #[test]
    fn test_bad_entries_decode_empty() {
        // Non-numeric id
        assert!(decode_sizes(r#"{"abc":{"width":1,"height":2}}"#).is_empty());
        // Missing field
        assert!(decode_sizes(r#"{"1":{"width":1}}"#).is_empty());
        // Wrong field names for positions
        assert!(decode_positions(r#"{"1":{"width":1,"height":2}}"#).is_empty());
        // Non-integer value
        assert!(decode_sizes(r#"{"1":{"width":"wide","height":2}}"#).is_empty());
        // Non-canonical ids
        assert!(decode_sizes(r#"{"05":{"width":1,"height":2}}"#).is_empty());
        assert!(decode_sizes(r#"{"+5":{"width":1,"height":2},"5":{"width":3,"height":4}}"#).is_empty());
        assert!(decode_positions(r#"{" 5":{"leftMargin":1,"topMargin":2}}"#).is_empty());
        // One bad entry spoils the whole map
        assert!(decode_sizes(r#"{"1":{"width":1,"height":2},"x":{"width":1,"height":2}}"#).is_empty());
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let sizes = decode_sizes(r#"{"5":{"width":200,"height":300,"dpi":2}}"#);
        assert_eq!(sizes.get(&WidgetId(5)), Some(&SizeState::new(200, 300)));
    }
}

#[cfg(test)]
mod proptest_roundtrip_tests {
    use super::*;
    use crate::layout::{PositionState, SizeState};
    use proptest::prelude::*;

    fn arb_id() -> impl Strategy<Value = WidgetId> {
        any::<i32>().prop_map(WidgetId)
    }

    fn arb_sizes() -> impl Strategy<Value = SizeMap> {
        prop::collection::btree_map(
            arb_id(),
            (any::<i32>(), any::<i32>()).prop_map(|(w, h)| SizeState::new(w, h)),
            0..16,
        )
    }

    fn arb_positions() -> impl Strategy<Value = PositionMap> {
        prop::collection::btree_map(
            arb_id(),
            (any::<i32>(), any::<i32>()).prop_map(|(l, t)| PositionState::new(l, t)),
            0..16,
        )
    }

    proptest! {
        #[test]
        fn test_sizes_survive_round_trip(sizes in arb_sizes()) {
            prop_assert_eq!(decode_sizes(&encode_sizes(&sizes)), sizes);
        }

        #[test]
        fn test_positions_survive_round_trip(positions in arb_positions()) {
            prop_assert_eq!(decode_positions(&encode_positions(&positions)), positions);
        }

        #[test]
        fn test_arbitrary_text_never_panics(text in ".{0,64}") {
            let _ = decode_sizes(&text);
            let _ = decode_positions(&text);
        }
    }
}
