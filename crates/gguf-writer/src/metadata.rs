//! Ordered, append-only metadata key/value buffer.

use crate::encode::{encode_key, encode_value};
use gguf_format::{EncodingError, GgufValue, keys};
use std::collections::HashSet;
use tracing::{debug, trace, warn};

/// Encoded metadata entries in insertion order, plus their count.
///
/// Keys are not deduplicated: a repeated key is encoded again and logged.
#[derive(Debug, Default)]
pub struct MetadataBuffer {
    bytes: Vec<u8>,
    count: u32,
    seen: HashSet<String>,
}

impl MetadataBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode and append one key/value entry.
    ///
    /// Returns `Ok(false)` when the entry is skipped: empty string values are
    /// omitted rather than written. On error nothing is appended.
    pub fn push(&mut self, key: &str, value: &GgufValue) -> Result<bool, EncodingError> {
        if matches!(value, GgufValue::String(s) if s.is_empty()) {
            debug!(key, "skipping empty string metadata value");
            return Ok(false);
        }
        let count = self.count.checked_add(1).ok_or(EncodingError::CountOverflow)?;

        let mut entry = Vec::new();
        encode_key(&mut entry, key)?;
        encode_value(&mut entry, value, true)?;

        if keys::is_template(key) {
            warn!(key, "metadata key still contains an unresolved architecture placeholder");
        }
        if !self.seen.insert(key.to_string()) {
            warn!(key, "duplicate metadata key");
        }
        trace!(key, value_type = ?value.value_type(), bytes = entry.len(), "metadata entry");

        self.bytes.extend_from_slice(&entry);
        self.count = count;
        Ok(true)
    }

    /// Number of entries appended.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether `key` has been appended at least once.
    pub fn contains_key(&self, key: &str) -> bool {
        self.seen.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_appends_key_then_tagged_value() {
        let mut buf = MetadataBuffer::new();
        assert!(buf.push("answer", &GgufValue::Uint32(42)).unwrap());
        let mut expected = Vec::new();
        expected.extend_from_slice(&6u32.to_le_bytes());
        expected.extend_from_slice(b"answer");
        expected.extend_from_slice(&4u32.to_le_bytes());
        expected.extend_from_slice(&42u32.to_le_bytes());
        assert_eq!(buf.as_bytes(), &expected[..]);
        assert_eq!(buf.count(), 1);
    }

    #[test]
    fn empty_string_value_is_skipped() {
        let mut buf = MetadataBuffer::new();
        assert!(!buf.push("general.url", &GgufValue::from("")).unwrap());
        assert!(buf.as_bytes().is_empty());
        assert_eq!(buf.count(), 0);
        assert!(!buf.contains_key("general.url"));
    }

    #[test]
    fn zero_values_and_arrays_of_empty_strings_are_kept() {
        let mut buf = MetadataBuffer::new();
        assert!(buf.push("zero", &GgufValue::Int32(0)).unwrap());
        assert!(buf.push("blank", &GgufValue::from(vec![""])).unwrap());
        assert_eq!(buf.count(), 2);
    }

    #[test]
    fn array_counts_once_per_entry() {
        let mut buf = MetadataBuffer::new();
        buf.push("tokenizer.ggml.scores", &GgufValue::from(vec![0.0f32, 1.0, 2.0])).unwrap();
        assert_eq!(buf.count(), 1);
    }

    #[test]
    fn failed_push_leaves_buffer_untouched() {
        let mut buf = MetadataBuffer::new();
        buf.push("general.name", &GgufValue::from("test")).unwrap();
        let before = buf.as_bytes().to_vec();

        let mixed = GgufValue::Array(vec![GgufValue::Int32(1), GgufValue::from("x")]);
        assert!(buf.push("mixed", &mixed).is_err());
        assert!(buf.push("empty", &GgufValue::Array(vec![])).is_err());

        assert_eq!(buf.as_bytes(), &before[..]);
        assert_eq!(buf.count(), 1);
        assert!(!buf.contains_key("mixed"));
    }

    #[test]
    fn duplicate_keys_are_encoded_twice() {
        let mut buf = MetadataBuffer::new();
        buf.push("general.name", &GgufValue::from("a")).unwrap();
        let once = buf.as_bytes().len();
        buf.push("general.name", &GgufValue::from("b")).unwrap();
        assert_eq!(buf.count(), 2);
        assert_eq!(buf.as_bytes().len(), once * 2);
    }
}
