//! # Raw JSON Views
//!
//! Request objects are walked in document order and a composite truth value
//! may repeat a key (several contexts under one indicator). `serde_json::Map`
//! keeps one value per key, so objects are read here as ordered entry lists
//! over unparsed [`RawValue`] text, and each value is parsed when visited.

use serde::de::{Deserialize, DeserializeOwned, Deserializer, MapAccess, Visitor};
use serde_json::value::RawValue;
use std::fmt;

// =============================================================================
// OBJECT ENTRIES
// =============================================================================

/// The entries of one JSON object in document order, duplicates included.
#[derive(Debug)]
pub struct ObjectEntries(Vec<(String, Box<RawValue>)>);

impl ObjectEntries {
    /// Read `raw` as an object. `None` if it holds any other JSON value.
    #[must_use]
    pub fn read(raw: &RawValue) -> Option<Self> {
        serde_json::from_str(raw.get()).ok()
    }

    /// All entries in document order.
    #[must_use]
    pub fn as_slice(&self) -> &[(String, Box<RawValue>)] {
        &self.0
    }

    /// Value of the first entry named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| &**value)
    }

    /// Number of entries named `key`.
    #[must_use]
    pub fn count(&self, key: &str) -> usize {
        self.0.iter().filter(|(name, _)| name == key).count()
    }
}

impl<'de> Deserialize<'de> for ObjectEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = ObjectEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Box<RawValue>>()? {
                    entries.push(entry);
                }
                Ok(ObjectEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

// =============================================================================
// SCALARS AND ARRAYS
// =============================================================================

/// Read `raw` as an array of unparsed elements.
#[must_use]
pub fn read_array(raw: &RawValue) -> Option<Vec<Box<RawValue>>> {
    serde_json::from_str(raw.get()).ok()
}

/// Parse `raw` as a `T`. `None` on a type mismatch (a string where a real is
/// expected, a negative or fractional id).
#[must_use]
pub fn read_as<T: DeserializeOwned>(raw: &RawValue) -> Option<T> {
    serde_json::from_str(raw.get()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(s: &str) -> Box<RawValue> {
        serde_json::from_str(s).expect("valid json")
    }

    #[test]
    fn duplicate_keys_are_kept_in_order() {
        let entries = ObjectEntries::read(&raw(r#"{"a": 1, "b": 2, "a": 3}"#)).expect("object");
        let keys: Vec<&str> = entries.as_slice().iter().map(|(k, _)| k.as_str()).collect();

        assert_eq!(keys, ["a", "b", "a"]);
        assert_eq!(entries.count("a"), 2);
        assert_eq!(entries.get("a").map(RawValue::get), Some("1"));
    }

    #[test]
    fn non_objects_are_not_entries() {
        for input in ["[1, 2]", "\"a\"", "0.5", "null"] {
            assert!(ObjectEntries::read(&raw(input)).is_none(), "{input}");
        }
    }

    #[test]
    fn scalar_reads_check_the_json_type() {
        assert_eq!(read_as::<f64>(&raw("12")), Some(12.0));
        assert_eq!(read_as::<f64>(&raw("\"12\"")), None);
        assert_eq!(read_as::<u64>(&raw("7")), Some(7));
        assert_eq!(read_as::<u64>(&raw("-7")), None);
        assert_eq!(read_as::<u64>(&raw("7.5")), None);
        assert_eq!(read_array(&raw("[1, {}]")).map(|a| a.len()), Some(2));
        assert!(read_array(&raw("{}")).is_none());
    }
}
