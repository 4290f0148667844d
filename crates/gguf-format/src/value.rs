//! The tagged metadata value and its inference conversions.
//!
//! Callers that need a specific width build the variant directly
//! (`GgufValue::Uint16(7)`). The `From`/`TryFrom` impls are the inference
//! path: text becomes STRING, floats become FLOAT32, booleans become BOOL,
//! integers become INT32 and sequences become ARRAY.
//!
//! `u8` has no inference impl, so a `Vec<u8>` never silently becomes an
//! ARRAY of INT32. Byte sequences are text and go through
//! [`GgufValue::from_utf8_bytes`]; a single UINT8 is `GgufValue::Uint8`.

use crate::{EncodingError, GgufValueType};
use serde::{Deserialize, Serialize};

/// A GGUF metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GgufValue {
    Uint8(u8),
    Int8(i8),
    Uint16(u16),
    Int16(i16),
    Uint32(u32),
    Int32(i32),
    Float32(f32),
    Bool(bool),
    String(String),
    Array(Vec<GgufValue>),
}

impl GgufValue {
    /// The type tag written in front of this value.
    pub const fn value_type(&self) -> GgufValueType {
        match self {
            Self::Uint8(_) => GgufValueType::Uint8,
            Self::Int8(_) => GgufValueType::Int8,
            Self::Uint16(_) => GgufValueType::Uint16,
            Self::Int16(_) => GgufValueType::Int16,
            Self::Uint32(_) => GgufValueType::Uint32,
            Self::Int32(_) => GgufValueType::Int32,
            Self::Float32(_) => GgufValueType::Float32,
            Self::Bool(_) => GgufValueType::Bool,
            Self::String(_) => GgufValueType::String,
            Self::Array(_) => GgufValueType::Array,
        }
    }

    /// Build a STRING from raw bytes, rejecting invalid UTF-8.
    pub fn from_utf8_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, EncodingError> {
        Ok(Self::String(String::from_utf8(bytes.into())?))
    }

    /// Build an ARRAY by inferring each element's tag.
    pub fn array<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<GgufValue>,
    {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    /// Element tag of an array, taken from its first element.
    ///
    /// Returns `None` for scalars and for empty arrays.
    pub fn element_type(&self) -> Option<GgufValueType> {
        match self {
            Self::Array(items) => items.first().map(GgufValue::value_type),
            _ => None,
        }
    }

    /// Check that this value can be encoded.
    ///
    /// Arrays must be non-empty and homogeneous (every element shares the
    /// first element's tag); nested arrays are checked recursively. Lengths
    /// must fit the u32 length prefixes.
    pub fn validate(&self) -> Result<(), EncodingError> {
        match self {
            Self::String(s) => {
                if u32::try_from(s.len()).is_err() {
                    return Err(EncodingError::StringTooLong(s.len()));
                }
                Ok(())
            }
            Self::Array(items) => {
                let Some(first) = items.first() else {
                    return Err(EncodingError::EmptyArray);
                };
                if u32::try_from(items.len()).is_err() {
                    return Err(EncodingError::ArrayTooLong(items.len()));
                }
                let expected = first.value_type();
                for (index, item) in items.iter().enumerate() {
                    let found = item.value_type();
                    if found != expected {
                        return Err(EncodingError::HeterogeneousArray { index, expected, found });
                    }
                    item.validate()?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Inference
// ---------------------------------------------------------------------------

impl From<&str> for GgufValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for GgufValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for GgufValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f32> for GgufValue {
    fn from(v: f32) -> Self {
        Self::Float32(v)
    }
}

impl From<f64> for GgufValue {
    fn from(v: f64) -> Self {
        Self::Float32(v as f32)
    }
}

macro_rules! infer_int32 {
    ($($t:ty),*) => {$(
        impl From<$t> for GgufValue {
            fn from(v: $t) -> Self {
                Self::Int32(i32::from(v))
            }
        }
    )*};
}

infer_int32!(i8, i16, i32, u16);

macro_rules! infer_int32_checked {
    ($($t:ty),*) => {$(
        impl TryFrom<$t> for GgufValue {
            type Error = EncodingError;

            fn try_from(v: $t) -> Result<Self, Self::Error> {
                i32::try_from(v)
                    .map(Self::Int32)
                    .map_err(|_| EncodingError::IntegerOutOfRange { value: v as i128 })
            }
        }
    )*};
}

infer_int32_checked!(i64, u32, u64, usize);

impl<T: Into<GgufValue>> From<Vec<T>> for GgufValue {
    fn from(items: Vec<T>) -> Self {
        Self::array(items)
    }
}

impl<T: Clone + Into<GgufValue>> From<&[T]> for GgufValue {
    fn from(items: &[T]) -> Self {
        Self::array(items.iter().cloned())
    }
}
