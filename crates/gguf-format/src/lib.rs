//! Portable GGUF container-format vocabulary.
//!
//! Everything a GGUF encoder needs to agree on with downstream readers, with
//! no I/O: the magic and version constants, value-type tags, the tagged
//! metadata value, tensor dtypes, the alignment helper, and the well-known
//! metadata keys.
//!
//! The stateful encoder that turns these into bytes lives in `gguf-writer`.
//!
//! # Example
//!
//! ```
//! use gguf_format::{GgufValue, GgufValueType, keys, pad};
//!
//! let key = keys::resolve(keys::llm::CONTEXT_LENGTH, "llama");
//! assert_eq!(key, "llama.context_length");
//!
//! let v = GgufValue::from(vec![1.0f32, 2.0, 3.0]);
//! assert_eq!(v.value_type(), GgufValueType::Array);
//! assert_eq!(pad(100, 32), 128);
//! ```

pub mod dtype;
pub mod error;
pub mod keys;
pub mod value;

pub use dtype::TensorDType;
pub use error::EncodingError;
pub use value::GgufValue;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// The four-byte magic that every GGUF file starts with.
pub const GGUF_MAGIC: [u8; 4] = *b"GGUF";
/// Container version written by this encoder.
pub const GGUF_VERSION: u32 = 1;
/// Alignment of tensor payloads when the writer is not told otherwise.
pub const GGUF_DEFAULT_ALIGNMENT: u32 = 32;
/// Size of the fixed header record: magic, version, tensor count, metadata count.
pub const GGUF_HEADER_LEN: usize = 16;

// ---------------------------------------------------------------------------
// Value-type discriminant
// ---------------------------------------------------------------------------

/// Discriminant tag for GGUF metadata values.
///
/// Numeric values are the on-disk codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum GgufValueType {
    Uint8 = 0,
    Int8 = 1,
    Uint16 = 2,
    Int16 = 3,
    Uint32 = 4,
    Int32 = 5,
    Float32 = 6,
    Bool = 7,
    String = 8,
    Array = 9,
}

impl GgufValueType {
    /// Convert from the raw u32 discriminant in the file.
    pub const fn from_u32(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Uint8),
            1 => Some(Self::Int8),
            2 => Some(Self::Uint16),
            3 => Some(Self::Int16),
            4 => Some(Self::Uint32),
            5 => Some(Self::Int32),
            6 => Some(Self::Float32),
            7 => Some(Self::Bool),
            8 => Some(Self::String),
            9 => Some(Self::Array),
            _ => None,
        }
    }

    /// The on-disk code for this tag.
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Encoded width of a scalar of this type, `None` for STRING and ARRAY.
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            Self::Uint8 | Self::Int8 | Self::Bool => Some(1),
            Self::Uint16 | Self::Int16 => Some(2),
            Self::Uint32 | Self::Int32 | Self::Float32 => Some(4),
            Self::String | Self::Array => None,
        }
    }
}

impl TryFrom<u32> for GgufValueType {
    type Error = EncodingError;

    fn try_from(v: u32) -> Result<Self, Self::Error> {
        Self::from_u32(v).ok_or(EncodingError::UnknownValueType(v))
    }
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Round `x` up to the next multiple of `n`.
///
/// `pad(0, n) == 0` and `pad(x, n) >= x` for every `x`.
///
/// # Panics
///
/// Panics when `n == 0`. Writers validate the alignment before it reaches here.
#[inline]
pub const fn pad(x: u64, n: u64) -> u64 {
    x.div_ceil(n) * n
}

/// Number of zero bytes needed after `x` bytes to reach the next multiple of `n`.
#[inline]
pub const fn padding_len(x: u64, n: u64) -> u64 {
    pad(x, n) - x
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_rounds_up_to_alignment() {
        assert_eq!(pad(0, 32), 0);
        assert_eq!(pad(1, 32), 32);
        assert_eq!(pad(32, 32), 32);
        assert_eq!(pad(33, 32), 64);
        assert_eq!(pad(100, 32), 128);
        assert_eq!(pad(50, 32), 64);
    }

    #[test]
    fn pad_with_non_power_of_two_alignment() {
        assert_eq!(pad(10, 3), 12);
        assert_eq!(pad(12, 3), 12);
        assert_eq!(pad(7, 1), 7);
    }

    #[test]
    fn padding_len_is_distance_to_boundary() {
        assert_eq!(padding_len(100, 32), 28);
        assert_eq!(padding_len(128, 32), 0);
        assert_eq!(padding_len(0, 64), 0);
    }

    #[test]
    #[should_panic]
    fn pad_zero_alignment_panics() {
        let _ = pad(10, std::hint::black_box(0));
    }

    #[test]
    fn value_type_roundtrip() {
        for n in 0u32..=9 {
            let vt = GgufValueType::from_u32(n);
            assert!(vt.is_some(), "missing variant for {n}");
            assert_eq!(vt.map(GgufValueType::as_u32), Some(n));
        }
        assert!(GgufValueType::from_u32(10).is_none());
        assert!(GgufValueType::from_u32(99).is_none());
    }

    #[test]
    fn value_type_try_from_reports_unknown_code() {
        let err = GgufValueType::try_from(12u32).unwrap_err();
        assert!(matches!(err, EncodingError::UnknownValueType(12)));
    }

    #[test]
    fn fixed_sizes_match_wire_widths() {
        assert_eq!(GgufValueType::Uint8.fixed_size(), Some(1));
        assert_eq!(GgufValueType::Bool.fixed_size(), Some(1));
        assert_eq!(GgufValueType::Int16.fixed_size(), Some(2));
        assert_eq!(GgufValueType::Float32.fixed_size(), Some(4));
        assert_eq!(GgufValueType::String.fixed_size(), None);
        assert_eq!(GgufValueType::Array.fixed_size(), None);
    }

    // --- proptest -----------------------------------------------------------

    proptest::proptest! {
        #[test]
        fn pad_is_smallest_multiple_not_below_x(x in 0u64..1_000_000_000, n in 1u64..4096) {
            let p = pad(x, n);
            proptest::prop_assert!(p >= x);
            proptest::prop_assert_eq!(p % n, 0);
            proptest::prop_assert!(p - x < n);
        }
    }
}
